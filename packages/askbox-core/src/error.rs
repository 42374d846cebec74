//! # Error Handling
//!
//! Error types for Askbox Core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Key Errors                                                        │
//! │  │   ├── InvalidSeedLength       - Seed is not exactly 32 bytes        │
//! │  │   ├── InvalidKey              - Malformed public/secret key         │
//! │  │   └── InvalidRecoveryPhrase   - Bad BIP39 phrase or backup string   │
//! │  │                                                                      │
//! │  ├── Vault Errors                                                      │
//! │  │   ├── WrongPasswordOrCorrupt  - Tag mismatch (never says which)     │
//! │  │   └── KeyDerivationFailed     - Argon2id could not run              │
//! │  │                                                                      │
//! │  ├── Channel / Envelope Errors                                         │
//! │  │   ├── DecryptionFailed        - Sealed box did not open             │
//! │  │   ├── DekUnsealFailed         - Reader does not hold the DEK key    │
//! │  │   ├── AadMismatchOrCorrupt    - AEAD tag failed                     │
//! │  │   └── EncryptionFailed        - Cipher refused the input            │
//! │  │                                                                      │
//! │  ├── Auth Errors (security events marked *)                            │
//! │  │   ├── ChallengeNotFound                                             │
//! │  │   ├── ChallengeExpired      *                                       │
//! │  │   ├── ChallengeUsed         *                                       │
//! │  │   ├── InvalidSignature      *                                       │
//! │  │   └── CapabilityMismatch      - Asker token does not match hash     │
//! │  │                                                                      │
//! │  └── Codec / Internal Errors                                           │
//! │      ├── InvalidEncoding         - Bad base64url / UTF-8               │
//! │      ├── SerializationError                                            │
//! │      └── Internal                                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Logging Policy
//!
//! Error messages never carry secret material, plaintext, or derived keys.
//! Callers should log `code()` and the variant name, and show users
//! `user_message()` rather than the `Display` text.

use thiserror::Error;

/// Result type alias for Askbox Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Askbox Core
///
/// Cryptographic failures are terminal: retrying with the same inputs
/// cannot succeed, so nothing here is marked recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Key Errors (100-199)
    // ========================================================================
    /// Seed was not exactly 32 bytes
    #[error("Seed must be 32 bytes, got {0}")]
    InvalidSeedLength(usize),

    /// Invalid key format or length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid recovery phrase or backup string
    #[error("Invalid recovery phrase: {0}")]
    InvalidRecoveryPhrase(String),

    // ========================================================================
    // Vault Errors (200-299)
    // ========================================================================
    /// Password-wrapped seed did not open
    #[error("Incorrect password or corrupted encrypted seed")]
    WrongPasswordOrCorrupt,

    /// Password key derivation could not run
    #[error("Failed to derive key: {0}")]
    KeyDerivationFailed(String),

    // ========================================================================
    // Channel / Envelope Errors (300-399)
    // ========================================================================
    /// Sealed box failed authentication
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Sealed DEK could not be opened by this reader
    #[error("Could not unseal the data encryption key")]
    DekUnsealFailed,

    /// AEAD tag verification failed (tampered ciphertext or wrong AAD)
    #[error("Associated data mismatch or corrupted ciphertext")]
    AadMismatchOrCorrupt,

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // ========================================================================
    // Auth Errors (400-499)
    // ========================================================================
    /// No challenge with this id exists
    #[error("Challenge not found")]
    ChallengeNotFound,

    /// Challenge was verified at or after its expiry
    #[error("Challenge expired")]
    ChallengeExpired,

    /// Challenge was already consumed
    #[error("Challenge already used")]
    ChallengeUsed,

    /// Signature did not verify against the bound public key
    #[error("Invalid signature")]
    InvalidSignature,

    /// Presented asker token does not match the stored hash
    #[error("Capability token does not match")]
    CapabilityMismatch,

    // ========================================================================
    // Codec Errors (500-599)
    // ========================================================================
    /// Malformed base64url or UTF-8 input
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================
    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the numeric error code
    ///
    /// Error codes are organized by category:
    /// - 100-199: Keys
    /// - 200-299: Password vault
    /// - 300-399: Sealed boxes and envelopes
    /// - 400-499: Authentication
    /// - 500-599: Codec
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            // Keys (100-199)
            Error::InvalidSeedLength(_) => 100,
            Error::InvalidKey(_) => 101,
            Error::InvalidRecoveryPhrase(_) => 102,

            // Vault (200-299)
            Error::WrongPasswordOrCorrupt => 200,
            Error::KeyDerivationFailed(_) => 201,

            // Channel / Envelope (300-399)
            Error::DecryptionFailed => 300,
            Error::DekUnsealFailed => 301,
            Error::AadMismatchOrCorrupt => 302,
            Error::EncryptionFailed(_) => 303,

            // Auth (400-499)
            Error::ChallengeNotFound => 400,
            Error::ChallengeExpired => 401,
            Error::ChallengeUsed => 402,
            Error::InvalidSignature => 403,
            Error::CapabilityMismatch => 404,

            // Codec (500-599)
            Error::InvalidEncoding(_) => 500,
            Error::SerializationError(_) => 501,

            // Internal (900-999)
            Error::Internal(_) => 900,
        }
    }

    /// Authentication failures the host system should audit-log
    pub fn is_security_event(&self) -> bool {
        matches!(
            self,
            Error::ChallengeExpired | Error::ChallengeUsed | Error::InvalidSignature
        )
    }

    /// Generic text safe to show an end user
    ///
    /// Deliberately coarse: it never distinguishes a wrong password from a
    /// corrupted blob, or a wrong key from a tampered ciphertext.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::WrongPasswordOrCorrupt => "Incorrect password",
            Error::DecryptionFailed | Error::DekUnsealFailed | Error::AadMismatchOrCorrupt => {
                "Cannot decrypt"
            }
            Error::ChallengeNotFound
            | Error::ChallengeExpired
            | Error::ChallengeUsed
            | Error::InvalidSignature
            | Error::CapabilityMismatch => "Authentication failed",
            Error::InvalidSeedLength(_) | Error::InvalidRecoveryPhrase(_) => {
                "Invalid backup key"
            }
            _ => "Something went wrong",
        }
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::InvalidEncoding(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::InvalidEncoding(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::InvalidSeedLength(31).code(), 100);
        assert_eq!(Error::WrongPasswordOrCorrupt.code(), 200);
        assert_eq!(Error::DecryptionFailed.code(), 300);
        assert_eq!(Error::ChallengeNotFound.code(), 400);
        assert_eq!(Error::InvalidEncoding("x".into()).code(), 500);
        assert_eq!(Error::Internal("x".into()).code(), 900);
    }

    #[test]
    fn test_security_events() {
        assert!(Error::ChallengeExpired.is_security_event());
        assert!(Error::ChallengeUsed.is_security_event());
        assert!(Error::InvalidSignature.is_security_event());
        assert!(!Error::ChallengeNotFound.is_security_event());
        assert!(!Error::WrongPasswordOrCorrupt.is_security_event());
    }

    #[test]
    fn test_user_messages_are_generic() {
        assert_eq!(Error::WrongPasswordOrCorrupt.user_message(), "Incorrect password");
        assert_eq!(Error::DekUnsealFailed.user_message(), "Cannot decrypt");
        assert_eq!(
            Error::AadMismatchOrCorrupt.user_message(),
            Error::DecryptionFailed.user_message()
        );
    }

    #[test]
    fn test_decode_error_conversion() {
        let err: Error = base64::DecodeError::InvalidPadding.into();
        assert_eq!(err.code(), 500);
    }
}
