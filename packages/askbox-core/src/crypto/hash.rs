//! # Hashing
//!
//! Two primitives:
//!
//! | Function | Algorithm | Use |
//! |----------|-----------|-----|
//! | `generic_hash` | BLAKE2b-256, optionally keyed | Seed domain separation |
//! | `sha256` | SHA-256 | Asker-token storage hashing only |
//!
//! `generic_hash` with a key matches libsodium's
//! `crypto_generichash(out, 32, msg, key)` byte for byte.

use blake2::digest::consts::U32;
use blake2::digest::{Digest, Mac};
use blake2::{Blake2b, Blake2bMac};
use sha2::Sha256;

use crate::error::{Error, Result};

/// Default generic hash output size in bytes
pub const GENERIC_HASH_SIZE: usize = 32;

/// Maximum BLAKE2b key length in bytes
pub const GENERIC_HASH_KEY_MAX: usize = 64;

/// BLAKE2b-256 of `message`, keyed when `key` is given
pub fn generic_hash(message: &[u8], key: Option<&[u8]>) -> Result<[u8; GENERIC_HASH_SIZE]> {
    match key {
        Some(key) => {
            if key.len() > GENERIC_HASH_KEY_MAX {
                return Err(Error::InvalidKey(format!(
                    "Hash key must be at most {} bytes, got {}",
                    GENERIC_HASH_KEY_MAX,
                    key.len()
                )));
            }
            let mut mac = <Blake2bMac<U32> as Mac>::new_from_slice(key)
                .map_err(|e| Error::InvalidKey(format!("Invalid hash key: {}", e)))?;
            Mac::update(&mut mac, message);
            Ok(Mac::finalize(mac).into_bytes().into())
        }
        None => Ok(Blake2b::<U32>::digest(message).into()),
    }
}

/// Plain SHA-256
pub fn sha256(message: &[u8]) -> [u8; 32] {
    Sha256::digest(message).into()
}
