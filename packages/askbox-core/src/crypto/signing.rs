//! # Digital Signatures
//!
//! Ed25519 signatures, used only for challenge/response login.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CHALLENGE SIGNING                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   Server nonce (32 bytes, raw)                                         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   Ed25519 Sign (owner's SigningKeyPair) ──► Signature (64 bytes)       │
//! │                                                                         │
//! │   Server: Ed25519 Verify(nonce, signature, bound public key)           │
//! │        ├── ✓ accept, consume challenge                                 │
//! │        └── ✗ InvalidSignature, consume challenge                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Signatures are deterministic: the same key and message always give the
//! same 64 bytes. Verification is strict (rejects small-order and
//! non-canonical encodings).

use ed25519_dalek::{Signature as Ed25519Signature, Signer, VerifyingKey};
use serde::{Deserialize, Serialize};

use super::keys::SigningKeyPair;
use super::{PUBLIC_KEY_SIZE, SIGNATURE_SIZE};
use crate::codec::{from_base64url, serde_base64url_array, to_base64url};
use crate::error::{Error, Result};

/// An Ed25519 digital signature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(#[serde(with = "serde_base64url_array")] pub [u8; SIGNATURE_SIZE]);

impl Signature {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create from a slice (must be exactly 64 bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != SIGNATURE_SIZE {
            return Err(Error::InvalidEncoding(format!(
                "Signature must be {} bytes, got {}",
                SIGNATURE_SIZE,
                slice.len()
            )));
        }
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    /// Encode as unpadded base64url
    pub fn to_base64url(&self) -> String {
        to_base64url(&self.0)
    }

    /// Decode from unpadded base64url
    pub fn from_base64url(text: &str) -> Result<Self> {
        Self::from_slice(&from_base64url(text)?)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Sign a message using Ed25519
///
/// ## Example
///
/// ```ignore
/// let keys = generate_account_keys()?;
/// let signature = sign(&keys.signing, &nonce);
/// ```
pub fn sign(keypair: &SigningKeyPair, message: &[u8]) -> Signature {
    let sig = keypair.signing_key().sign(message);
    Signature(sig.to_bytes())
}

/// Verify an Ed25519 signature
///
/// Returns `Ok(())` if valid, `Err(InvalidSignature)` otherwise. A public
/// key that is not a valid curve point also fails as `InvalidSignature`:
/// the caller learns nothing beyond "not accepted".
pub fn verify(
    public_key: &[u8; PUBLIC_KEY_SIZE],
    message: &[u8],
    signature: &Signature,
) -> Result<()> {
    let verifying_key = VerifyingKey::from_bytes(public_key).map_err(|_| Error::InvalidSignature)?;
    let sig = Ed25519Signature::from_bytes(&signature.0);

    verifying_key
        .verify_strict(message, &sig)
        .map_err(|_| Error::InvalidSignature)
}

// ============================================================================
// TESTS
// ============================================================================
