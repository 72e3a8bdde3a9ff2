//! Progression state machine.
//!
//! The whole machine state for one challenge is the pair
//! (current level token, last_level_printed). There is no running/halted
//! state: each process invocation performs at most one transition attempt
//! and exits. The per-invocation ordering contract is
//! resolve -> (test passes => advance, which clears the printed flag) ->
//! (not yet printed => print and mark printed), so a single run may both
//! advance and print the new level's text.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::domain::Challenge;
use crate::errors::{Error, Result};
use crate::hooks::HookRunner;
use crate::ident;
use crate::render;
use crate::store::{StateStore, StateValues, NOT_PRINTED, PRINTED};

/// What the test hook decided for this invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
  /// Not solved yet: stay on the current level.
  Stay,
  /// Solved: advance along the configured graph.
  Advance,
  /// Solved, and the hook named the level to jump to.
  AdvanceTo(String),
}

/// One participant's session over one challenge. Holds the only mutable
/// state explicitly; nothing here is process-global.
pub struct Session<S, H, R> {
  challenge: Challenge,
  home: String,
  store: S,
  hooks: H,
  rng: R,
  state: StateValues,
}

impl<S: StateStore, H: HookRunner, R: Rng> Session<S, H, R> {
  /// Loads persisted state. On a first run (nothing persisted yet) the
  /// first parsed level becomes the current level; this is only written
  /// back once something actually mutates.
  pub fn start(challenge: Challenge, home: String, store: S, hooks: H, rng: R) -> Self {
    let mut state = store.load();
    if state.level.is_empty() {
      state.level =
        ident::level_token_for_home(&challenge.levels[0].name, &challenge.name, &home);
      debug!(target: "session", challenge = %challenge.name, "first run, starting at the first level");
    }
    Self { challenge, home, store, hooks, rng, state }
  }

  fn token_for(&self, level: &str) -> String {
    ident::level_token_for_home(level, &self.challenge.name, &self.home)
  }

  /// Maps the persisted token back to a level by recomputing every level's
  /// identifier. A token that matches nothing is stale, forged, or from a
  /// different challenge or home directory.
  pub fn resolve_current(&self) -> Result<usize> {
    self
      .challenge
      .levels
      .iter()
      .position(|l| self.token_for(&l.name) == self.state.level)
      .ok_or_else(|| {
        Error::UnresolvableLevel(format!(
          "persisted token matches no level of challenge '{}'",
          self.challenge.name
        ))
      })
  }

  /// Runs the current level's test hook and interprets the outcome.
  ///
  /// A pass with output names the level to jump to. The override may name
  /// any existing level, not just a declared next-candidate; dynamic
  /// overrides are a feature of the format. An override that names no
  /// existing level is failure-to-advance, never a partial transition.
  pub fn check_advance(&mut self) -> Result<Verdict> {
    let index = self.resolve_current()?;
    let level = &self.challenge.levels[index];
    let outcome = self.hooks.run(&level.test_cmd);
    if !outcome.passed {
      debug!(target: "session", level = %level.name, "test failed, staying");
      return Ok(Verdict::Stay);
    }
    if outcome.output.is_empty() {
      return Ok(Verdict::Advance);
    }
    if self.challenge.level_index(&outcome.output).is_none() {
      warn!(target: "session", level = %level.name, requested = %outcome.output,
        "test hook named an unknown level, staying");
      return Ok(Verdict::Stay);
    }
    Ok(Verdict::AdvanceTo(outcome.output))
  }

  /// One state transition: leave the current level, arrive at the next.
  ///
  /// Outgoing `postcmd` and incoming `precmd` are fire-and-forget; their
  /// own failure never gates the transition. With no override target the
  /// next level is drawn uniformly from the outgoing level's candidates.
  /// Persists the new token and resets the printed flag.
  pub fn advance(&mut self, target: Option<&str>) -> Result<()> {
    let index = self.resolve_current()?;
    let outgoing = &self.challenge.levels[index];
    self.hooks.run(&outgoing.post_cmd);

    let next_name = match target {
      Some(name) => name.to_string(),
      None => {
        if outgoing.next.is_empty() {
          return Err(Error::UnresolvableLevel(format!(
            "level '{}' is terminal, nothing to advance to",
            outgoing.name
          )));
        }
        let pick = self.rng.gen_range(0..outgoing.next.len());
        outgoing.next[pick].clone()
      }
    };
    let next_index = self.challenge.level_index(&next_name).ok_or_else(|| {
      Error::UnresolvableLevel(format!("next level '{next_name}' does not exist"))
    })?;
    let from = self.challenge.levels[index].name.clone();
    let incoming = &self.challenge.levels[next_index];
    self.hooks.run(&incoming.pre_cmd);

    self.state.level = self.token_for(&incoming.name);
    self.state.last_level_printed = NOT_PRINTED.into();
    self.store.save(&self.state)?;
    info!(target: "session", %from, to = %incoming.name, "advanced");
    Ok(())
  }

  /// Shows the current level's body at most once per advance, then runs its
  /// `postprintcmd` and persists the printed flag. Repeated invocations are
  /// no-ops until the next advance resets the flag.
  pub fn print_if_needed(&mut self, plain: bool) -> Result<()> {
    if self.state.last_level_printed == PRINTED {
      return Ok(());
    }
    let index = self.resolve_current()?;
    let level = &self.challenge.levels[index];
    render::print_level(level, plain);
    self.hooks.run(&level.post_print_cmd);
    self.state.last_level_printed = PRINTED.into();
    self.store.save(&self.state)?;
    Ok(())
  }

  /// `[challenge level]` trailer shown after every normal run, meant for
  /// embedding in a shell prompt.
  pub fn identifier(&self) -> Result<String> {
    let index = self.resolve_current()?;
    Ok(format!("[{} {}]", self.challenge.name, self.challenge.levels[index].name))
  }

  #[cfg(test)]
  pub fn state(&self) -> &StateValues {
    &self.state
  }
}
