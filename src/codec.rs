//! Content codec: the keyed, reversible transform used to distribute
//! challenge content pre-encrypted.
//!
//! This is a content-distribution mechanism, not a security boundary: the
//! key ships inside the binary. ChaCha20-Poly1305 under a SHA-256-derived
//! key, fresh nonce per encryption, armored as base64 of nonce||ciphertext
//! so the result survives storage as a plain-text file next to unencrypted
//! challenges. The `.enc` file-extension convention lives at the CLI
//! boundary; the codec itself is extension-agnostic.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::errors::{Error, Result};

const NONCE_LEN: usize = 12;

fn cipher_for(key: &str) -> ChaCha20Poly1305 {
  let mut hasher = Sha256::new();
  hasher.update(key.as_bytes());
  let derived: [u8; 32] = hasher.finalize().into();
  // 32 bytes is always a valid ChaCha20-Poly1305 key size.
  ChaCha20Poly1305::new_from_slice(&derived).expect("sha256 output is a valid key")
}

/// Encrypts `plaintext` under `key` into transportable armored text.
pub fn encrypt(key: &str, plaintext: &str) -> Result<String> {
  let mut nonce_bytes = [0u8; NONCE_LEN];
  rand::thread_rng().fill_bytes(&mut nonce_bytes);
  let nonce = Nonce::from_slice(&nonce_bytes);
  let sealed = cipher_for(key)
    .encrypt(nonce, plaintext.as_bytes())
    .map_err(|_| Error::DecodeError("encryption failed".into()))?;
  let mut framed = Vec::with_capacity(NONCE_LEN + sealed.len());
  framed.extend_from_slice(&nonce_bytes);
  framed.extend_from_slice(&sealed);
  Ok(BASE64.encode(framed))
}

/// Reverses [`encrypt`]. Fails with `DecodeError` when the input is not
/// armored ciphertext produced with a compatible key: bad base64, truncated
/// frame, or a Poly1305 tag that does not verify (wrong key / tampering).
pub fn decrypt(key: &str, armored: &str) -> Result<String> {
  let framed = BASE64
    .decode(armored.trim())
    .map_err(|e| Error::DecodeError(format!("invalid base64 armor: {e}")))?;
  if framed.len() < NONCE_LEN {
    return Err(Error::DecodeError("ciphertext too short".into()));
  }
  let (nonce_bytes, sealed) = framed.split_at(NONCE_LEN);
  let plain = cipher_for(key)
    .decrypt(Nonce::from_slice(nonce_bytes), sealed)
    .map_err(|_| Error::DecodeError("ciphertext rejected (wrong key or corrupted input)".into()))?;
  String::from_utf8(plain).map_err(|_| Error::DecodeError("decrypted bytes are not UTF-8".into()))
}
