//! Opaque save-slot identifiers.
//!
//! A token binds (level, challenge, home directory) so that progress state
//! cannot be reused across machines or challenges. It is an obfuscated,
//! portable save-slot key, not a security credential: no secrecy or
//! tamper-resistance is claimed.

use md5::{Digest, Md5};

use crate::errors::{Error, Result};

/// Token for a level under an explicit home directory.
///
/// The separator layout is fixed. Changing it (or escaping inputs that happen
/// to contain separator characters) would orphan every token already issued
/// to participants, so the residual collision risk is accepted.
pub fn level_token_for_home(level: &str, challenge: &str, homedir: &str) -> String {
  let mut hasher = Md5::new();
  hasher.update(format!("i{challenge}j{level}k{homedir}l").as_bytes());
  hex::encode(hasher.finalize())
}

/// Token for a level under the invoking user's home directory.
pub fn level_token(level: &str, challenge: &str) -> Result<String> {
  Ok(level_token_for_home(level, challenge, &current_home()?))
}

/// Home directory of the invoking user, as a path string.
pub fn current_home() -> Result<String> {
  dirs::home_dir()
    .map(|p| p.to_string_lossy().into_owned())
    .ok_or(Error::HomeDirUnavailable)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn token_is_deterministic() {
    let a = level_token_for_home("L1", "chal", "/home/alice");
    let b = level_token_for_home("L1", "chal", "/home/alice");
    assert_eq!(a, b);
    // MD5 hex digest: fixed length, lowercase hex.
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn token_changes_with_any_input() {
    let base = level_token_for_home("L1", "chal", "/home/alice");
    assert_ne!(base, level_token_for_home("L2", "chal", "/home/alice"));
    assert_ne!(base, level_token_for_home("L1", "other", "/home/alice"));
    assert_ne!(base, level_token_for_home("L1", "chal", "/home/bob"));
  }

  #[test]
  fn current_user_variant_matches_explicit_home() {
    let home = current_home().expect("home dir");
    assert_eq!(
      level_token("L1", "chal").expect("token"),
      level_token_for_home("L1", "chal", &home)
    );
  }
}
