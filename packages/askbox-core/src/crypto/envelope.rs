//! # Envelope Encryption
//!
//! Answers are encrypted once under a random data-encryption key (DEK), and
//! the DEK is sealed separately to each reader.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ANSWER ENVELOPE                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   DEK (32B random) ─┐                                                  │
//! │   nonce (24B)       ├──► XChaCha20-Poly1305 ──► ciphertext (+16B tag)  │
//! │   aad "{qid}|v1"    ┘                                                  │
//! │   plaintext ────────┘                                                  │
//! │                                                                         │
//! │   DEK ──► seal(owner_pk) ──► dekForOwner       (always)                │
//! │   DEK ──► seal(asker_pk) ──► dekForAsker       (iff receipt key given) │
//! │                                                                         │
//! │   EnvelopeEncrypted { ciphertext, nonce, dekForOwner, dekForAsker? }   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Errors
//!
//! | Failure | Error |
//! |---------|-------|
//! | Sealed DEK does not open, or opens to the wrong length | `DekUnsealFailed` |
//! | AEAD tag mismatch (wrong AAD, tampering, bad nonce length) | `AadMismatchOrCorrupt` |

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::keys::EncryptionKeyPair;
use super::random::random_bytes;
use super::sealed::{open, seal};
use super::{NONCE_SIZE, PUBLIC_KEY_SIZE};
use crate::codec::{serde_base64url, serde_base64url_array, serde_base64url_option};
use crate::error::{Error, Result};

/// Size of a data-encryption key in bytes
pub const DEK_SIZE: usize = 32;

/// AAD format version suffix
const AAD_VERSION: &str = "v1";

/// Per-answer data-encryption key
#[derive(Zeroize, ZeroizeOnDrop)]
struct Dek([u8; DEK_SIZE]);

impl Dek {
    fn generate() -> Self {
        Self(random_bytes::<DEK_SIZE>())
    }

    fn from_unsealed(mut bytes: Vec<u8>) -> Result<Self> {
        let result = <[u8; DEK_SIZE]>::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| Error::DekUnsealFailed);
        bytes.zeroize();
        result
    }

    fn cipher(&self) -> Result<XChaCha20Poly1305> {
        XChaCha20Poly1305::new_from_slice(&self.0)
            .map_err(|e| Error::Internal(format!("Invalid DEK: {}", e)))
    }
}

/// Associated data binding an answer to its question
///
/// The only construction used for answers: `{questionId}|v1`. Both the
/// owner and the asker know the question id before any answer exists, so
/// the same bytes are rebuilt at every encrypt and decrypt site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerAad {
    question_id: String,
}

impl AnswerAad {
    /// AAD for answers to `question_id`
    pub fn new(question_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
        }
    }

    /// The question this AAD binds to
    pub fn question_id(&self) -> &str {
        &self.question_id
    }

    /// UTF-8 bytes fed to the AEAD
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl std::fmt::Display for AnswerAad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.question_id, AAD_VERSION)
    }
}

/// One encrypted answer with its sealed DEKs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeEncrypted {
    /// AEAD ciphertext including the 16-byte tag
    #[serde(with = "serde_base64url")]
    pub ciphertext: Vec<u8>,
    /// XChaCha20-Poly1305 nonce
    #[serde(with = "serde_base64url_array")]
    pub nonce: [u8; NONCE_SIZE],
    /// DEK sealed to the box owner
    #[serde(with = "serde_base64url")]
    pub dek_for_owner: Vec<u8>,
    /// DEK sealed to the asker's receipt key, if the question carried one
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_base64url_option"
    )]
    pub dek_for_asker: Option<Vec<u8>>,
}

impl EnvelopeEncrypted {
    /// Decrypt with the owner's copy of the DEK
    pub fn open_as_owner(&self, aad: &[u8], owner: &EncryptionKeyPair) -> Result<Vec<u8>> {
        decrypt(&self.ciphertext, &self.nonce, &self.dek_for_owner, aad, owner)
    }

    /// Decrypt with the asker's copy of the DEK
    ///
    /// An envelope without an asker copy cannot be opened by the asker and
    /// reports `DekUnsealFailed`.
    pub fn open_as_asker(&self, aad: &[u8], asker: &EncryptionKeyPair) -> Result<Vec<u8>> {
        let sealed_dek = self.dek_for_asker.as_deref().ok_or(Error::DekUnsealFailed)?;
        decrypt(&self.ciphertext, &self.nonce, sealed_dek, aad, asker)
    }
}

/// Encrypt `plaintext` for the owner and, optionally, the asker
pub fn encrypt(
    plaintext: &[u8],
    aad: &[u8],
    owner_public_key: &[u8; PUBLIC_KEY_SIZE],
    asker_public_key: Option<&[u8; PUBLIC_KEY_SIZE]>,
) -> Result<EnvelopeEncrypted> {
    let dek = Dek::generate();
    let nonce = random_bytes::<NONCE_SIZE>();

    let ciphertext = dek
        .cipher()?
        .encrypt(
            XNonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| Error::EncryptionFailed("Envelope encryption failed".into()))?;

    let dek_for_owner = seal(&dek.0, owner_public_key)?;
    let dek_for_asker = asker_public_key
        .map(|pk| seal(&dek.0, pk))
        .transpose()?;

    tracing::debug!(
        "Envelope encrypted ({} bytes, asker copy: {})",
        ciphertext.len(),
        dek_for_asker.is_some()
    );

    Ok(EnvelopeEncrypted {
        ciphertext,
        nonce,
        dek_for_owner,
        dek_for_asker,
    })
}

/// Decrypt an envelope with one reader's sealed DEK
///
/// `aad` must be byte-identical to what was used at encryption time.
pub fn decrypt(
    ciphertext: &[u8],
    nonce: &[u8],
    sealed_dek: &[u8],
    aad: &[u8],
    reader: &EncryptionKeyPair,
) -> Result<Vec<u8>> {
    let unsealed = open(sealed_dek, reader).map_err(|_| Error::DekUnsealFailed)?;
    let dek = Dek::from_unsealed(unsealed)?;

    if nonce.len() != NONCE_SIZE {
        return Err(Error::AadMismatchOrCorrupt);
    }

    dek.cipher()?
        .decrypt(
            XNonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| Error::AadMismatchOrCorrupt)
}

// ============================================================================
// TESTS
// ============================================================================
