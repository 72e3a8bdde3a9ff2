//! Error taxonomy for the level ladder.
//!
//! Test-hook failure is deliberately NOT an error: it is the ordinary
//! "not yet solved" outcome and never reaches this enum.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  /// A metadata block is not well-formed, a level has no name, or two
  /// levels share one. Fatal for the whole load: later levels may
  /// reference earlier ones by name, so no partial level set is usable.
  #[error("malformed challenge: {0}")]
  MalformedChallenge(String),

  /// Input is not valid armored ciphertext for the given key.
  #[error("decode failed: {0}")]
  DecodeError(String),

  /// A persisted token, hook override, or branch pick names no known level.
  #[error("unresolvable level: {0}")]
  UnresolvableLevel(String),

  /// No home directory can be resolved for the invoking user, so no
  /// identifier can be computed.
  #[error("cannot resolve a home directory for the current user")]
  HomeDirUnavailable,

  /// State file could not be written back.
  #[error("state store: {0}")]
  Store(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
