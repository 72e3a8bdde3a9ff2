//! Domain models: a Level node and the Challenge aggregate that owns the ladder.

use serde::{Deserialize, Serialize};

use crate::ident;

/// One node in the challenge graph.
/// Constructed once at load time from a parsed source block; immutable for
/// the rest of the invocation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Level {
  /// Unique, non-empty. An empty name is a fatal load-time defect.
  #[serde(default)]
  pub name: String,
  /// Run when this level becomes the current level.
  #[serde(default, rename = "precmd")]
  pub pre_cmd: String,
  /// Run when the participant leaves this level.
  #[serde(default, rename = "postcmd")]
  pub post_cmd: String,
  /// Run right after this level's text has been shown.
  #[serde(default, rename = "postprintcmd")]
  pub post_print_cmd: String,
  /// Decides whether the participant may advance. Empty means always pass.
  #[serde(default, rename = "test")]
  pub test_cmd: String,
  /// Ordered names of the levels reachable from here. Empty for terminal levels.
  #[serde(default, rename = "next")]
  pub next: Vec<String>,
  /// Instructional text shown to the participant. Not part of the metadata
  /// record; filled in from the remaining paragraphs of the block.
  #[serde(skip_deserializing)]
  pub body: String,
}

/// One complete ladder of levels, loaded from a single source file.
/// `name` comes from the file's base name and namespaces every identifier,
/// so two challenges with identically named levels never collide.
#[derive(Clone, Debug)]
pub struct Challenge {
  pub name: String,
  /// Source order. Used for diagnostics and the structured dump, never for
  /// traversal; the graph is walked by name.
  pub levels: Vec<Level>,
}

impl Challenge {
  pub fn load(name: String, source: &str) -> crate::errors::Result<Self> {
    let levels = crate::parser::parse_levels(source)?;
    Ok(Self { name, levels })
  }

  pub fn level_index(&self, name: &str) -> Option<usize> {
    self.levels.iter().position(|l| l.name == name)
  }

  /// Administrative reverse lookup: which level does `token` denote for a
  /// participant whose home directory is `homedir`? `None` is a normal
  /// negative result, not an error; the token may be stale, forged, or from
  /// another challenge.
  pub fn detect_level(&self, token: &str, homedir: &str) -> Option<&Level> {
    self
      .levels
      .iter()
      .find(|l| ident::level_token_for_home(&l.name, &self.name, homedir) == token)
  }
}
