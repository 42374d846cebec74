//! # Askbox Core
//!
//! The end-to-end encryption core of Askbox, an anonymous question box. A
//! box owner publishes a link, anonymous askers send questions, and the
//! server only ever stores ciphertext.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ASKBOX CORE MODULES                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌──────────────┐   │
//! │  │   Session   │  │    Wire     │  │    Auth     │  │    Backup    │   │
//! │  │             │  │             │  │             │  │              │   │
//! │  │ - Owner     │  │ - Question  │  │ - Challenge │  │ - Base64url  │   │
//! │  │ - Asker     │  │ - Answer    │  │ - Asker     │  │ - BIP39      │   │
//! │  │   receipt   │  │ - Login     │  │   token     │  │   phrase     │   │
//! │  └──────┬──────┘  └──────┬──────┘  └──────┬──────┘  └──────┬───────┘   │
//! │         │                │                │                │           │
//! │         └────────────────┴────────────────┴────────────────┘           │
//! │                                   │                                     │
//! │  ┌────────────────────────────────┴──────────────────────────────────┐ │
//! │  │                            Crypto                                 │ │
//! │  │                                                                   │ │
//! │  │  keys · signing · vault · sealed box · envelope · hash · random  │ │
//! │  └────────────────────────────────┬──────────────────────────────────┘ │
//! │                                   │                                     │
//! │  ┌─────────────┐  ┌─────────────┐ │ ┌─────────────┐                    │
//! │  │    Codec    │  │    Error    │◄┘ │ Config/Time │                    │
//! │  └─────────────┘  └─────────────┘   └─────────────┘                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error type and codes
//! - [`codec`] - base64url and UTF-8 conversions
//! - [`crypto`] - Keys, signatures, password vault, sealed boxes, envelopes
//! - [`auth`] - Owner login challenges and asker capability tokens
//! - [`backup`] - Seed backup strings and recovery phrases
//! - [`session`] - Caller-owned owner and asker state
//! - [`wire`] - Payload records carried by the transport
//! - [`config`] - Runtime configuration
//!
//! ## Security Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          WHO SEES WHAT                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Question text    asker ──sealed box──► owner       server: ciphertext │
//! │  Answer text      owner ──envelope───► owner, asker server: ciphertext │
//! │  Owner seed       password vault                    server: ciphertext │
//! │  Owner login      Ed25519 challenge                 server: public key │
//! │  Asker access     bearer token                      server: SHA-256    │
//! │                                                                         │
//! │  The server performs no cryptographic operation on user data and      │
//! │  never holds a private key.                                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no global instance. Sessions, challenge stores and configuration
//! are ordinary values owned by the caller.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod auth;
pub mod backup;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod session;
pub mod time;
pub mod wire;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use auth::{CapabilityToken, ChallengeAuthority, MemoryChallengeStore, SessionCredential};
pub use backup::{RecoveryPhrase, SeedBackup};
pub use config::CoreConfig;
pub use crypto::{AccountKeys, EncryptedSeed, EnvelopeEncrypted, PublicKeys, ReceiptKeys, Seed};
pub use error::{Error, Result};
pub use session::{AskerDraft, AskerReceipt, OwnerSession};
pub use wire::Visibility;

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of Askbox Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns build information for debugging
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        kdf_version: crypto::KdfParams::current().version,
        profile: if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
    }
}

/// Build information for debugging
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Crate version
    pub version: &'static str,
    /// Password vault format version written by this build
    pub kdf_version: u8,
    /// Build profile (debug/release)
    pub profile: &'static str,
}

// ============================================================================
// TESTS
// ============================================================================
