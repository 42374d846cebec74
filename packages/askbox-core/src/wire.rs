//! # Wire Records
//!
//! Payloads a transport carries between client and server. The core does
//! not define routes; it defines what each payload holds.
//!
//! | Record | Direction | Carries |
//! |--------|-----------|---------|
//! | `AccountRegistration` | owner → server | public keys, password-wrapped seed |
//! | `QuestionSubmission` | asker → server | sealed question, receipt public key |
//! | `QuestionCreated` | server → asker | question id, asker token (once) |
//! | `AnswerPayload` | owner → server | answer envelope, visibility |
//! | `ChallengeIssued` | server → owner | challenge id, nonce, expiry |
//! | `ChallengeResponse` | owner → server | challenge id, signature |
//!
//! All binary fields are unpadded base64url; field names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{AuthChallenge, CapabilityToken, CHALLENGE_NONCE_SIZE};
use crate::codec::{serde_base64url, serde_base64url_array, serde_base64url_option};
use crate::crypto::{
    seal_question, EncryptedSeed, EnvelopeEncrypted, PublicKeys, ReceiptKeys, Signature,
    PUBLIC_KEY_SIZE,
};
use crate::error::{Error, Result};

/// Owner account upload: everything the server keeps about the keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRegistration {
    /// Published public keys
    pub public_keys: PublicKeys,
    /// Seed wrapped under the owner's password
    pub encrypted_seed: EncryptedSeed,
}

/// A new question from an asker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSubmission {
    /// Question text sealed to the owner
    #[serde(with = "serde_base64url")]
    pub ciphertext: Vec<u8>,
    /// Receipt public key, if the asker wants to read the answer
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_base64url_option"
    )]
    pub receipt_public_key: Option<Vec<u8>>,
}

impl QuestionSubmission {
    /// Seal `text` to the owner, optionally attaching a receipt key
    pub fn new(
        text: &str,
        owner_public_key: &[u8; PUBLIC_KEY_SIZE],
        receipt: Option<&ReceiptKeys>,
    ) -> Result<Self> {
        Ok(Self {
            ciphertext: seal_question(text, owner_public_key)?,
            receipt_public_key: receipt.map(|r| r.public_bytes().to_vec()),
        })
    }

    /// The receipt key as a fixed-size array
    pub fn receipt_public_key(&self) -> Result<Option<[u8; PUBLIC_KEY_SIZE]>> {
        self.receipt_public_key
            .as_deref()
            .map(|bytes| {
                <[u8; PUBLIC_KEY_SIZE]>::try_from(bytes).map_err(|_| {
                    Error::InvalidKey(format!(
                        "Receipt public key must be {} bytes, got {}",
                        PUBLIC_KEY_SIZE,
                        bytes.len()
                    ))
                })
            })
            .transpose()
    }
}

/// Server reply to a question submission
///
/// The asker token appears here and nowhere else, ever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCreated {
    /// Server-assigned question id (also the answer AAD input)
    pub question_id: String,
    /// Raw asker token, base64url
    pub asker_token: String,
}

impl QuestionCreated {
    /// Parse the asker token
    pub fn capability(&self) -> Result<CapabilityToken> {
        CapabilityToken::from_base64url(&self.asker_token)
    }
}

/// Whether an answered question is shown on the owner's public page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Listed publicly
    Public,
    /// Only the owner and the asker can find it
    #[default]
    Private,
}

/// An encrypted answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    /// Question being answered
    pub question_id: String,
    /// Listing choice
    #[serde(default)]
    pub visibility: Visibility,
    /// Ciphertext, nonce and sealed DEKs
    #[serde(flatten)]
    pub envelope: EnvelopeEncrypted,
}

/// Server reply to a login request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeIssued {
    /// Challenge identifier
    pub challenge_id: Uuid,
    /// Bytes to sign
    #[serde(with = "serde_base64url_array")]
    pub nonce: [u8; CHALLENGE_NONCE_SIZE],
    /// Deadline for the response
    pub expires_at: DateTime<Utc>,
}

impl From<&AuthChallenge> for ChallengeIssued {
    fn from(challenge: &AuthChallenge) -> Self {
        Self {
            challenge_id: challenge.id,
            nonce: challenge.nonce,
            expires_at: challenge.expires_at,
        }
    }
}

/// Client's signed answer to a challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    /// Challenge being answered
    pub challenge_id: Uuid,
    /// Ed25519 signature over the raw nonce
    pub signature: Signature,
}
