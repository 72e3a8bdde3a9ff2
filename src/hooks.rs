//! Hook execution: opaque shell commands run at level transition points.
//!
//! The state machine depends only on the [`HookRunner`] capability, never on
//! a concrete process-spawning mechanism, so tests substitute in-memory
//! fakes.

use std::process::{Command, Stdio};

use tracing::{debug, warn};

/// Result of running one hook command.
#[derive(Clone, Debug, Default)]
pub struct HookOutcome {
  /// Exit-status success. For a test hook this is the pass/fail signal;
  /// for pre/post hooks it is observed but never gating.
  pub passed: bool,
  /// Trimmed stdout. A test hook may use it to name the next level.
  pub output: String,
}

impl HookOutcome {
  pub fn pass() -> Self {
    Self { passed: true, output: String::new() }
  }
}

pub trait HookRunner {
  fn run(&self, command: &str) -> HookOutcome;
}

/// Production runner: blocking `sh -c` with inherited stdin/stderr, so hooks
/// may legitimately wait on interactive input. No timeout: a hung hook hangs
/// the whole invocation (documented limitation).
pub struct ShellHooks;

impl HookRunner for ShellHooks {
  fn run(&self, command: &str) -> HookOutcome {
    if command.trim().is_empty() {
      // No hook configured: a no-op that always passes.
      return HookOutcome::pass();
    }
    match Command::new("sh")
      .arg("-c")
      .arg(command)
      .stdin(Stdio::inherit())
      .stderr(Stdio::inherit())
      .output()
    {
      Ok(out) => {
        let outcome = HookOutcome {
          passed: out.status.success(),
          output: String::from_utf8_lossy(&out.stdout).trim().to_string(),
        };
        debug!(target: "hooks", command, passed = outcome.passed, "hook finished");
        outcome
      }
      Err(e) => {
        // Cannot be invoked at all: report failure, never abort the run.
        warn!(target: "hooks", command, error = %e, "hook could not be spawned");
        HookOutcome::default()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_command_is_a_passing_noop() {
    let out = ShellHooks.run("   ");
    assert!(out.passed);
    assert!(out.output.is_empty());
  }

  #[test]
  fn exit_status_maps_to_passed() {
    assert!(ShellHooks.run("true").passed);
    assert!(!ShellHooks.run("false").passed);
  }

  #[test]
  fn stdout_is_captured_and_trimmed() {
    let out = ShellHooks.run("echo '  next-stop  '");
    assert!(out.passed);
    assert_eq!(out.output, "next-stop");
  }
}
