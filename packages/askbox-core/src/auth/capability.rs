//! # Asker Capability Tokens
//!
//! An asker has no account. When they submit a question the server returns
//! a random token once; whoever presents it later may read the answer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ASKER TOKEN                                        │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   submit question ──► token = 32 random bytes                          │
//! │                         │                                               │
//! │                         ├──► returned to asker (once, base64url)       │
//! │                         └──► server stores sha256(token) as hex        │
//! │                                                                         │
//! │   fetch answer ──► sha256(presented) == stored ?  (constant time)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is a bearer capability, not an identity. The raw token cannot be
//! recovered from the stored hash, so a lost token is gone for good, and
//! anyone who holds it has full read access.

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec::{from_base64url_array, to_base64url};
use crate::crypto::{random_bytes, sha256};
use crate::error::{Error, Result};

/// Size of a raw capability token in bytes
pub const CAPABILITY_TOKEN_SIZE: usize = 32;

/// Length of the stored hash as hex
pub const CAPABILITY_HASH_HEX_LEN: usize = 64;

/// Raw asker token
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CapabilityToken([u8; CAPABILITY_TOKEN_SIZE]);

impl CapabilityToken {
    /// Generate a fresh random token
    pub fn generate() -> Self {
        Self(random_bytes::<CAPABILITY_TOKEN_SIZE>())
    }

    /// Wrap raw token bytes
    pub fn from_bytes(bytes: [u8; CAPABILITY_TOKEN_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse the base64url form handed to the asker
    pub fn from_base64url(text: &str) -> Result<Self> {
        Ok(Self(from_base64url_array::<CAPABILITY_TOKEN_SIZE>(text)?))
    }

    /// The base64url form handed to the asker
    pub fn to_base64url(&self) -> String {
        to_base64url(&self.0)
    }

    /// Raw token bytes
    pub fn as_bytes(&self) -> &[u8; CAPABILITY_TOKEN_SIZE] {
        &self.0
    }

    /// Storage hash: hex SHA-256 of the raw token
    pub fn hash(&self) -> String {
        hex::encode(sha256(&self.0))
    }

    /// Check this token against a stored hash
    pub fn verify(&self, stored_hash: &str) -> Result<()> {
        verify_token(self.as_bytes(), stored_hash)
    }
}

impl ConstantTimeEq for CapabilityToken {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl PartialEq for CapabilityToken {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl Eq for CapabilityToken {}

impl std::fmt::Debug for CapabilityToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CapabilityToken([REDACTED])")
    }
}

/// Server side: check presented token bytes against the stored hash
///
/// The comparison is constant-time over the 32 hash bytes. A malformed
/// stored hash is treated as a mismatch.
pub fn verify_token(presented: &[u8], stored_hash: &str) -> Result<()> {
    let expected = hex::decode(stored_hash).map_err(|_| Error::CapabilityMismatch)?;
    if expected.len() != 32 {
        return Err(Error::CapabilityMismatch);
    }

    let actual = sha256(presented);
    if bool::from(actual[..].ct_eq(&expected[..])) {
        Ok(())
    } else {
        Err(Error::CapabilityMismatch)
    }
}
