//! # Authentication
//!
//! Two ways to prove you may read something, neither involving a password
//! sent to the server:
//!
//! | Who | Mechanism | Module |
//! |-----|-----------|--------|
//! | Box owner | Ed25519 challenge/response | [`challenge`] |
//! | Anonymous asker | Bearer capability token | [`capability`] |

pub mod capability;
pub mod challenge;

pub use capability::{verify_token, CapabilityToken, CAPABILITY_HASH_HEX_LEN, CAPABILITY_TOKEN_SIZE};
pub use challenge::{
    sign_challenge, AuthChallenge, ChallengeAuthority, ChallengeStatus, ChallengeStore,
    ConsumeOutcome, MemoryChallengeStore, SessionCredential, CHALLENGE_NONCE_SIZE,
    SESSION_TOKEN_SIZE,
};
