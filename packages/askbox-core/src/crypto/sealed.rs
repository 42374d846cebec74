//! # Anonymous Channel
//!
//! Sealed boxes: anyone holding the owner's X25519 public key can encrypt to
//! them, and nothing in the ciphertext identifies the sender.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SEALED BOX                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   ephemeral keypair (esk, epk)      fresh per message                  │
//! │   nonce = BLAKE2b-24(epk ‖ recipient_pk)                               │
//! │   box   = XSalsa20-Poly1305(X25519(esk, recipient_pk), nonce, msg)     │
//! │                                                                         │
//! │   output = epk (32) ‖ tag (16) ‖ ciphertext (len(msg))                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Byte-compatible with libsodium `crypto_box_seal`. One-way: the recipient
//! cannot reply, and cannot tell who sent the message.

use rand::rngs::OsRng;

use super::keys::{AccountKeys, EncryptionKeyPair};
use super::{PUBLIC_KEY_SIZE, SEALED_BOX_OVERHEAD};
use crate::codec;
use crate::error::{Error, Result};

/// Encrypt `message` anonymously to `recipient_public_key`
pub fn seal(message: &[u8], recipient_public_key: &[u8; PUBLIC_KEY_SIZE]) -> Result<Vec<u8>> {
    let public_key = crypto_box::PublicKey::from(*recipient_public_key);

    public_key
        .seal(&mut OsRng, message)
        .map_err(|_| Error::EncryptionFailed("Sealed box encryption failed".into()))
}

/// Open a sealed box with the recipient's keypair
///
/// Any authentication failure (wrong key, corruption, truncation) is
/// `DecryptionFailed`. No partial plaintext is ever returned.
pub fn open(ciphertext: &[u8], recipient: &EncryptionKeyPair) -> Result<Vec<u8>> {
    if ciphertext.len() < SEALED_BOX_OVERHEAD {
        return Err(Error::DecryptionFailed);
    }

    recipient
        .box_secret()
        .unseal(ciphertext)
        .map_err(|_| Error::DecryptionFailed)
}

/// Seal a question's text for a box owner
pub fn seal_question(text: &str, owner_public_key: &[u8; PUBLIC_KEY_SIZE]) -> Result<Vec<u8>> {
    let ciphertext = seal(text.as_bytes(), owner_public_key)?;
    tracing::debug!("Sealed question ({} bytes)", ciphertext.len());
    Ok(ciphertext)
}

/// Open a question addressed to `owner`
///
/// Non-UTF-8 plaintext is reported as `DecryptionFailed`.
pub fn open_question(ciphertext: &[u8], owner: &AccountKeys) -> Result<String> {
    let plaintext = open(ciphertext, &owner.encryption)?;
    codec::to_string(plaintext).map_err(|_| Error::DecryptionFailed)
}

// ============================================================================
// TESTS
// ============================================================================
