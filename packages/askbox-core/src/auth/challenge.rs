//! # Challenge/Response Login
//!
//! Passwordless login for box owners: the server hands out a random nonce
//! bound to a public key, the client signs it, and the server checks the
//! signature exactly once.
//!
//! ## State Machine
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CHALLENGE LIFECYCLE                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │                 issue()                                                │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │              ┌──────────┐   now >= expiresAt    ┌──────────┐           │
//! │              │  Issued  │ ────────────────────► │ Expired  │           │
//! │              └────┬─────┘                       └──────────┘           │
//! │                   │ verify()                                           │
//! │         ┌─────────┴─────────┐                                          │
//! │         ▼                   ▼                                          │
//! │   ┌──────────┐        ┌──────────┐                                     │
//! │   │ Verified │        │ Rejected │   both consume the challenge       │
//! │   └──────────┘        └──────────┘                                     │
//! │                                                                         │
//! │   verify() checks, in order:                                           │
//! │     1. exists              else ChallengeNotFound                      │
//! │     2. now < expiresAt     else ChallengeExpired                       │
//! │     3. usedAt == null      else ChallengeUsed                          │
//! │     4. signature valid     else InvalidSignature                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Consumption goes through [`ChallengeStore::consume`], which only
//! succeeds for the first caller. Two racing verifications of the same
//! challenge cannot both succeed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::serde_base64url_array;
use crate::config::CoreConfig;
use crate::crypto::{random_bytes, sign, verify, Signature, SigningKeyPair, PUBLIC_KEY_SIZE};
use crate::error::{Error, Result};

/// Size of a challenge nonce in bytes
pub const CHALLENGE_NONCE_SIZE: usize = 32;

/// Size of a session token in bytes
pub const SESSION_TOKEN_SIZE: usize = 32;

/// Lifecycle state of a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    /// Waiting for a signature
    Issued,
    /// Signature accepted
    Verified,
    /// Lifetime ran out before a verification attempt
    Expired,
    /// A verification attempt carried a bad signature
    Rejected,
}

/// Server-side challenge record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthChallenge {
    /// Challenge identifier
    pub id: Uuid,
    /// Random bytes the client must sign
    #[serde(with = "serde_base64url_array")]
    pub nonce: [u8; CHALLENGE_NONCE_SIZE],
    /// Ed25519 key the signature must verify under
    #[serde(with = "serde_base64url_array")]
    pub bound_public_key: [u8; PUBLIC_KEY_SIZE],
    /// When the challenge was issued
    pub created_at: DateTime<Utc>,
    /// First instant at which the challenge is no longer accepted
    pub expires_at: DateTime<Utc>,
    /// When a verification attempt consumed the challenge
    pub used_at: Option<DateTime<Utc>>,
    /// Outcome recorded at consumption; `Issued` until then
    pub status: ChallengeStatus,
}

impl AuthChallenge {
    /// Whether the challenge has run out at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether a verification attempt already consumed this challenge
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Effective state at `now`
    ///
    /// Consumed challenges keep their recorded outcome. Unconsumed ones
    /// read as `Expired` once past `expires_at`.
    pub fn status_at(&self, now: DateTime<Utc>) -> ChallengeStatus {
        match self.status {
            ChallengeStatus::Issued if self.is_expired(now) => ChallengeStatus::Expired,
            status => status,
        }
    }
}

/// Credential handed out after a successful login
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCredential {
    /// Opaque bearer token for subsequent requests
    #[serde(with = "serde_base64url_array")]
    pub token: [u8; SESSION_TOKEN_SIZE],
    /// Public key that proved possession
    #[serde(with = "serde_base64url_array")]
    pub public_key: [u8; PUBLIC_KEY_SIZE],
    /// When the credential was issued
    pub issued_at: DateTime<Utc>,
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredential")
            .field("token", &"[REDACTED]")
            .field("public_key", &hex::encode(self.public_key))
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Result of [`ChallengeStore::consume`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// This call recorded the outcome
    Consumed,
    /// An earlier call already consumed the challenge
    AlreadyUsed,
    /// No such challenge (never issued, or purged)
    Missing,
}

/// Persistence for issued challenges
///
/// Implementations must make [`consume`](ChallengeStore::consume) atomic:
/// at most one call per challenge may return [`ConsumeOutcome::Consumed`].
pub trait ChallengeStore: Send + Sync {
    /// Persist a freshly issued challenge
    fn insert(&self, challenge: AuthChallenge) -> Result<()>;

    /// Look up a challenge by id
    fn get(&self, id: &Uuid) -> Result<Option<AuthChallenge>>;

    /// Set `used_at` and the final status if the challenge is still unused
    fn consume(
        &self,
        id: &Uuid,
        used_at: DateTime<Utc>,
        status: ChallengeStatus,
    ) -> Result<ConsumeOutcome>;

    /// Drop challenges that expired before `now`; returns how many
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}

impl<S: ChallengeStore + ?Sized> ChallengeStore for Arc<S> {
    fn insert(&self, challenge: AuthChallenge) -> Result<()> {
        (**self).insert(challenge)
    }

    fn get(&self, id: &Uuid) -> Result<Option<AuthChallenge>> {
        (**self).get(id)
    }

    fn consume(
        &self,
        id: &Uuid,
        used_at: DateTime<Utc>,
        status: ChallengeStatus,
    ) -> Result<ConsumeOutcome> {
        (**self).consume(id, used_at, status)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        (**self).purge_expired(now)
    }
}

/// In-memory challenge store
#[derive(Default)]
pub struct MemoryChallengeStore {
    challenges: RwLock<HashMap<Uuid, AuthChallenge>>,
}

impl MemoryChallengeStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored challenges
    pub fn len(&self) -> usize {
        self.challenges.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.challenges.read().is_empty()
    }
}

impl ChallengeStore for MemoryChallengeStore {
    fn insert(&self, challenge: AuthChallenge) -> Result<()> {
        self.challenges.write().insert(challenge.id, challenge);
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<AuthChallenge>> {
        Ok(self.challenges.read().get(id).cloned())
    }

    fn consume(
        &self,
        id: &Uuid,
        used_at: DateTime<Utc>,
        status: ChallengeStatus,
    ) -> Result<ConsumeOutcome> {
        let mut challenges = self.challenges.write();
        match challenges.get_mut(id) {
            Some(challenge) if challenge.used_at.is_none() => {
                challenge.used_at = Some(used_at);
                challenge.status = status;
                Ok(ConsumeOutcome::Consumed)
            }
            Some(_) => Ok(ConsumeOutcome::AlreadyUsed),
            None => Ok(ConsumeOutcome::Missing),
        }
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut challenges = self.challenges.write();
        let before = challenges.len();
        challenges.retain(|_, c| !c.is_expired(now));
        Ok(before - challenges.len())
    }
}

/// Server half of challenge/response login
pub struct ChallengeAuthority<S: ChallengeStore> {
    store: S,
    ttl: chrono::Duration,
}

impl<S: ChallengeStore> ChallengeAuthority<S> {
    /// Create an authority over `store` using the configured lifetime
    pub fn new(store: S, config: &CoreConfig) -> Self {
        Self {
            store,
            ttl: config.challenge_ttl(),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issue a challenge bound to `public_key`
    pub fn issue(
        &self,
        public_key: &[u8; PUBLIC_KEY_SIZE],
        now: DateTime<Utc>,
    ) -> Result<AuthChallenge> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| Error::Internal("Challenge expiry out of range".into()))?;

        let challenge = AuthChallenge {
            id: Uuid::new_v4(),
            nonce: random_bytes::<CHALLENGE_NONCE_SIZE>(),
            bound_public_key: *public_key,
            created_at: now,
            expires_at,
            used_at: None,
            status: ChallengeStatus::Issued,
        };

        self.store.insert(challenge.clone())?;
        tracing::debug!("Issued challenge {}", challenge.id);
        Ok(challenge)
    }

    /// Verify a signed challenge and, on success, issue a session credential
    pub fn verify(
        &self,
        challenge_id: &Uuid,
        signature: &Signature,
        now: DateTime<Utc>,
    ) -> Result<SessionCredential> {
        let challenge = self
            .store
            .get(challenge_id)?
            .ok_or(Error::ChallengeNotFound)?;

        if challenge.is_expired(now) {
            tracing::warn!("Challenge {} presented after expiry", challenge_id);
            return Err(Error::ChallengeExpired);
        }

        if challenge.is_used() {
            tracing::warn!("Challenge {} presented again after use", challenge_id);
            return Err(Error::ChallengeUsed);
        }

        let verified = verify(&challenge.bound_public_key, &challenge.nonce, signature);
        let outcome = if verified.is_ok() {
            ChallengeStatus::Verified
        } else {
            ChallengeStatus::Rejected
        };

        match self.store.consume(challenge_id, now, outcome)? {
            ConsumeOutcome::Consumed => {}
            ConsumeOutcome::AlreadyUsed => {
                tracing::warn!("Challenge {} consumed concurrently", challenge_id);
                return Err(Error::ChallengeUsed);
            }
            ConsumeOutcome::Missing => {
                tracing::debug!("Challenge {} removed before it was consumed", challenge_id);
                return Err(Error::ChallengeNotFound);
            }
        }

        if let Err(e) = verified {
            tracing::warn!("Challenge {} rejected: bad signature", challenge_id);
            return Err(e);
        }

        tracing::info!("Challenge {} verified", challenge_id);
        Ok(SessionCredential {
            token: random_bytes::<SESSION_TOKEN_SIZE>(),
            public_key: challenge.bound_public_key,
            issued_at: now,
        })
    }

    /// Remove expired challenges from the store
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let purged = self.store.purge_expired(now)?;
        if purged > 0 {
            tracing::debug!("Purged {} expired challenges", purged);
        }
        Ok(purged)
    }
}

/// Client half: sign the raw nonce bytes
pub fn sign_challenge(keypair: &SigningKeyPair, nonce: &[u8]) -> Signature {
    sign(keypair, nonce)
}

// ============================================================================
// TESTS
// ============================================================================
