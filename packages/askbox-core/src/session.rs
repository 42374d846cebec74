//! # Client Sessions
//!
//! Caller-owned state for the two client roles. There is no global
//! "current user": each session value holds its own keys and credentials,
//! and dropping it zeroizes them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CLIENT ROLES                                     │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  OwnerSession                        AskerReceipt                      │
//! │  ────────────                        ────────────                      │
//! │  AccountKeys                         ReceiptKeys                       │
//! │  SessionCredential?                  question id + asker token         │
//! │                                                                         │
//! │  • open questions                    • read the answer to its own      │
//! │  • write answers (envelope)            question                        │
//! │  • read its own answers                                                │
//! │  • sign login challenges                                               │
//! │                                                                         │
//! │  AskerDraft ──(server: QuestionCreated)──► AskerReceipt                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::auth::{sign_challenge, CapabilityToken, SessionCredential};
use crate::codec;
use crate::crypto::{
    decrypt_seed_with_password, decrypt_seed_with_password_async, derive_account_keys,
    derive_receipt_keys, encrypt, encrypt_seed_with_password, generate_account_keys,
    generate_receipt_keys, open_question, AccountKeys, AnswerAad, EncryptedSeed, PublicKeys,
    ReceiptKeys, Seed, PUBLIC_KEY_SIZE,
};
use crate::error::Result;
use crate::wire::{
    AccountRegistration, AnswerPayload, ChallengeIssued, ChallengeResponse, QuestionCreated,
    QuestionSubmission, Visibility,
};

/// A box owner's unlocked session
pub struct OwnerSession {
    keys: AccountKeys,
    credential: Option<SessionCredential>,
}

impl OwnerSession {
    /// Start a session for a brand-new account
    pub fn create() -> Result<Self> {
        Ok(Self::new(generate_account_keys()?))
    }

    /// Wrap already-derived keys
    pub fn new(keys: AccountKeys) -> Self {
        Self {
            keys,
            credential: None,
        }
    }

    /// Derive the account from a raw seed
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        Ok(Self::new(derive_account_keys(seed)?))
    }

    /// Unlock a password-wrapped seed (blocking)
    pub fn unlock(encrypted: &EncryptedSeed, password: &str) -> Result<Self> {
        let seed = decrypt_seed_with_password(encrypted, password)?;
        Self::from_seed(seed.as_bytes())
    }

    /// Unlock a password-wrapped seed on the blocking pool
    pub async fn unlock_async(encrypted: &EncryptedSeed, password: &str) -> Result<Self> {
        let seed = decrypt_seed_with_password_async(encrypted, password).await?;
        Self::from_seed(seed.as_bytes())
    }

    /// The account keys
    pub fn keys(&self) -> &AccountKeys {
        &self.keys
    }

    /// Published public keys
    pub fn public_keys(&self) -> PublicKeys {
        self.keys.public_keys()
    }

    /// Build the registration upload, wrapping the seed under `password`
    pub fn registration(&self, password: &str) -> Result<AccountRegistration> {
        Ok(AccountRegistration {
            public_keys: self.public_keys(),
            encrypted_seed: encrypt_seed_with_password(self.keys.seed(), password)?,
        })
    }

    /// Decrypt a question sealed to this account
    pub fn open_question(&self, ciphertext: &[u8]) -> Result<String> {
        open_question(ciphertext, &self.keys)
    }

    /// Encrypt an answer for this owner and, if given, the asker's receipt key
    pub fn answer(
        &self,
        question_id: &str,
        text: &str,
        receipt_public_key: Option<&[u8; PUBLIC_KEY_SIZE]>,
        visibility: Visibility,
    ) -> Result<AnswerPayload> {
        let aad = AnswerAad::new(question_id).to_bytes();
        let envelope = encrypt(
            text.as_bytes(),
            &aad,
            &self.keys.encryption.public_bytes(),
            receipt_public_key,
        )?;

        tracing::debug!("Answered question {}", question_id);
        Ok(AnswerPayload {
            question_id: question_id.to_string(),
            visibility,
            envelope,
        })
    }

    /// Decrypt one of this owner's answers
    pub fn read_answer(&self, payload: &AnswerPayload) -> Result<String> {
        let aad = AnswerAad::new(&payload.question_id).to_bytes();
        let plaintext = payload
            .envelope
            .open_as_owner(&aad, &self.keys.encryption)?;
        codec::to_string(plaintext)
    }

    /// Sign a login challenge
    pub fn respond_to_challenge(&self, challenge: &ChallengeIssued) -> ChallengeResponse {
        ChallengeResponse {
            challenge_id: challenge.challenge_id,
            signature: sign_challenge(&self.keys.signing, &challenge.nonce),
        }
    }

    /// Remember the credential from a successful login
    pub fn set_credential(&mut self, credential: SessionCredential) {
        self.credential = Some(credential);
    }

    /// Current login credential, if any
    pub fn credential(&self) -> Option<&SessionCredential> {
        self.credential.as_ref()
    }

    /// Forget the login credential; keys stay unlocked
    pub fn sign_out(&mut self) {
        self.credential = None;
    }
}

impl std::fmt::Debug for OwnerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerSession")
            .field("fingerprint", &self.public_keys().fingerprint())
            .field("signed_in", &self.credential.is_some())
            .finish()
    }
}

/// A question that has been sealed but not yet acknowledged by the server
pub struct AskerDraft {
    receipt: ReceiptKeys,
    submission: QuestionSubmission,
}

impl AskerDraft {
    /// Seal `text` to the owner under a fresh receipt key
    pub fn new(text: &str, owner_public_key: &[u8; PUBLIC_KEY_SIZE]) -> Result<Self> {
        let receipt = generate_receipt_keys()?;
        let submission = QuestionSubmission::new(text, owner_public_key, Some(&receipt))?;
        Ok(Self {
            receipt,
            submission,
        })
    }

    /// Payload to send to the server
    pub fn submission(&self) -> &QuestionSubmission {
        &self.submission
    }

    /// Combine with the server's reply into a receipt
    pub fn finish(self, created: &QuestionCreated) -> Result<AskerReceipt> {
        Ok(AskerReceipt {
            question_id: created.question_id.clone(),
            keys: self.receipt,
            token: created.capability()?,
        })
    }
}

/// Everything an asker keeps to read the answer to one question
pub struct AskerReceipt {
    question_id: String,
    keys: ReceiptKeys,
    token: CapabilityToken,
}

impl AskerReceipt {
    /// Rebuild a stored receipt
    pub fn restore(
        question_id: impl Into<String>,
        seed: &Seed,
        token: CapabilityToken,
    ) -> Result<Self> {
        Ok(Self {
            question_id: question_id.into(),
            keys: derive_receipt_keys(seed.as_bytes())?,
            token,
        })
    }

    /// Question this receipt belongs to
    pub fn question_id(&self) -> &str {
        &self.question_id
    }

    /// Receipt keys (persist the seed to restore later)
    pub fn keys(&self) -> &ReceiptKeys {
        &self.keys
    }

    /// Bearer token presented to fetch the answer
    pub fn token(&self) -> &CapabilityToken {
        &self.token
    }

    /// Decrypt the answer to this receipt's question
    ///
    /// The AAD is rebuilt from the receipt's own question id, so an answer
    /// moved from another question fails to decrypt.
    pub fn read_answer(&self, payload: &AnswerPayload) -> Result<String> {
        let aad = AnswerAad::new(&self.question_id).to_bytes();
        let plaintext = payload
            .envelope
            .open_as_asker(&aad, &self.keys.encryption)?;
        codec::to_string(plaintext)
    }
}

impl std::fmt::Debug for AskerReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AskerReceipt")
            .field("question_id", &self.question_id)
            .field("token", &self.token)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::Utc;
    use uuid::Uuid;

    fn created(question_id: &str) -> (QuestionCreated, CapabilityToken) {
        let token = CapabilityToken::generate();
        (
            QuestionCreated {
                question_id: question_id.into(),
                asker_token: token.to_base64url(),
            },
            token,
        )
    }

    #[test]
    fn test_owner_and_asker_read_answer() {
        let owner = OwnerSession::create().unwrap();
        let owner_pk = owner.public_keys().encryption;

        let draft = AskerDraft::new("favourite book?", &owner_pk).unwrap();
        assert_eq!(
            owner.open_question(&draft.submission().ciphertext).unwrap(),
            "favourite book?"
        );
        let receipt_pk = draft.submission().receipt_public_key().unwrap();

        let (reply, token) = created("q-42");
        let receipt = draft.finish(&reply).unwrap();
        assert_eq!(receipt.token(), &token);

        let answer = owner
            .answer("q-42", "Dune", receipt_pk.as_ref(), Visibility::Private)
            .unwrap();

        assert_eq!(owner.read_answer(&answer).unwrap(), "Dune");
        assert_eq!(receipt.read_answer(&answer).unwrap(), "Dune");
    }

    #[test]
    fn test_receipt_rejects_answer_for_other_question() {
        let owner = OwnerSession::create().unwrap();
        let draft = AskerDraft::new("q?", &owner.public_keys().encryption).unwrap();
        let receipt_pk = draft.submission().receipt_public_key().unwrap();
        let receipt = draft.finish(&created("q-1").0).unwrap();

        let answer = owner
            .answer("q-2", "moved", receipt_pk.as_ref(), Visibility::Public)
            .unwrap();
        assert_eq!(
            receipt.read_answer(&answer).err(),
            Some(Error::AadMismatchOrCorrupt)
        );
    }

    #[test]
    fn test_restore_receipt() {
        let owner = OwnerSession::create().unwrap();
        let draft = AskerDraft::new("q?", &owner.public_keys().encryption).unwrap();
        let receipt_pk = draft.submission().receipt_public_key().unwrap();
        let receipt = draft.finish(&created("q-7").0).unwrap();

        let restored = AskerReceipt::restore(
            receipt.question_id(),
            receipt.keys().seed(),
            receipt.token().clone(),
        )
        .unwrap();

        let answer = owner
            .answer("q-7", "hello", receipt_pk.as_ref(), Visibility::Private)
            .unwrap();
        assert_eq!(restored.read_answer(&answer).unwrap(), "hello");
    }

    #[test]
    fn test_unlock_with_password() {
        let owner = OwnerSession::create().unwrap();
        let registration = owner.registration("hunter2").unwrap();

        let unlocked = OwnerSession::unlock(&registration.encrypted_seed, "hunter2").unwrap();
        assert_eq!(unlocked.public_keys(), owner.public_keys());
        assert_eq!(registration.public_keys, owner.public_keys());

        assert_eq!(
            OwnerSession::unlock(&registration.encrypted_seed, "wrong").err().map(|e| e.code()),
            Some(Error::WrongPasswordOrCorrupt.code())
        );
    }

    #[test]
    fn test_challenge_response_and_credential() {
        let mut owner = OwnerSession::from_seed(&[8u8; 32]).unwrap();
        let issued = ChallengeIssued {
            challenge_id: Uuid::new_v4(),
            nonce: [3u8; 32],
            expires_at: Utc::now(),
        };

        let response = owner.respond_to_challenge(&issued);
        assert_eq!(response.challenge_id, issued.challenge_id);
        assert!(crate::crypto::verify(
            &owner.public_keys().signing,
            &issued.nonce,
            &response.signature
        )
        .is_ok());

        assert!(owner.credential().is_none());
        owner.set_credential(SessionCredential {
            token: [1u8; 32],
            public_key: owner.public_keys().signing,
            issued_at: Utc::now(),
        });
        assert!(owner.credential().is_some());
        owner.sign_out();
        assert!(owner.credential().is_none());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let owner = OwnerSession::from_seed(&[8u8; 32]).unwrap();
        let debug = format!("{:?}", owner);
        assert!(debug.contains("fingerprint"));
        assert!(!debug.contains(&hex::encode([8u8; 32])));
    }
}
