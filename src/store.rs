//! Persisted per-participant state.
//!
//! Exactly two named string values survive across invocations: `level` (the
//! current identifier token) and `last_level_printed` ("yes"/"no"). They are
//! read once at startup and written back after any mutation, at most twice
//! per run. Concurrent invocations racing on one file are out of scope;
//! last-writer-wins is acceptable.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{Error, Result};

pub const PRINTED: &str = "yes";
pub const NOT_PRINTED: &str = "no";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateValues {
  /// Identifier token of the current level. Empty until first persisted.
  #[serde(default)]
  pub level: String,
  /// "yes" once the current level's text has been shown.
  #[serde(default = "default_printed")]
  pub last_level_printed: String,
}

impl Default for StateValues {
  fn default() -> Self {
    Self { level: String::new(), last_level_printed: NOT_PRINTED.into() }
  }
}

fn default_printed() -> String {
  NOT_PRINTED.into()
}

/// Read/write contract the session depends on. The file-backed
/// implementation below is the production collaborator; tests supply an
/// in-memory one.
pub trait StateStore {
  fn load(&self) -> StateValues;
  fn save(&mut self, values: &StateValues) -> Result<()>;
}

/// TOML state file under the user config directory, one per challenge.
pub struct FileStore {
  path: PathBuf,
}

impl FileStore {
  pub fn for_challenge(challenge: &str) -> Result<Self> {
    let base = dirs::config_dir().ok_or(Error::HomeDirUnavailable)?;
    Ok(Self::at(base.join("gauntlet").join(format!("{challenge}.toml"))))
  }

  pub fn at(path: PathBuf) -> Self {
    Self { path }
  }
}

impl StateStore for FileStore {
  fn load(&self) -> StateValues {
    match fs::read_to_string(&self.path) {
      Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
        // A damaged state file resets progress instead of aborting.
        warn!(target: "gauntlet", path = %self.path.display(), error = %e, "unreadable state file; starting fresh");
        StateValues::default()
      }),
      Err(_) => StateValues::default(),
    }
  }

  fn save(&mut self, values: &StateValues) -> Result<()> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    let body = toml::to_string(values).map_err(|e| Error::Store(e.to_string()))?;
    fs::write(&self.path, body)?;
    debug!(target: "gauntlet", path = %self.path.display(), "state written");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::at(dir.path().join("nope.toml"));
    let values = store.load();
    assert_eq!(values, StateValues::default());
    assert_eq!(values.last_level_printed, NOT_PRINTED);
  }

  #[test]
  fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    // Parent directories are created on demand.
    let mut store = FileStore::at(dir.path().join("gauntlet").join("chal.toml"));
    let values = StateValues { level: "abc123".into(), last_level_printed: PRINTED.into() };
    store.save(&values).expect("save");
    assert_eq!(store.load(), values);
  }

  #[test]
  fn damaged_file_resets_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chal.toml");
    fs::write(&path, "level = [this is not toml").expect("write");
    assert_eq!(FileStore::at(path).load(), StateValues::default());
  }
}
