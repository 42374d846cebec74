//! # Seed Backup
//!
//! Two user-facing encodings of the 32-byte seed, for users who want a copy
//! that does not depend on the password vault.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       BACKUP FORMATS                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   Seed (32 bytes)                                                      │
//! │     │                                                                   │
//! │     ├──► backup string:   base64url, 43 characters                     │
//! │     │                     "O2onvM62pC1io6jQKm8Nc2UyFXcd4kOmOsBIoYtZ2ik"│
//! │     │                                                                   │
//! │     └──► recovery phrase: BIP39, 24 words, entropy = seed              │
//! │                           (8-bit checksum catches typos)               │
//! │                                                                         │
//! │   Both round-trip exactly. Unlike a BIP39 wallet, the phrase is NOT    │
//! │   stretched with PBKDF2: the words *are* the seed.                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Considerations
//!
//! | Aspect | Measure |
//! |--------|---------|
//! | Display | Show once, never log |
//! | Storage | Write down offline, never store digitally in plaintext |
//! | Debug output | Redacted |

use bip39::{Language, Mnemonic};
use zeroize::Zeroize;

use crate::codec::{from_base64url, to_base64url};
use crate::crypto::{Seed, SEED_SIZE};
use crate::error::{Error, Result};

/// Number of words in a recovery phrase
pub const WORD_COUNT: usize = 24;

/// Maximum number of autocomplete suggestions
const MAX_SUGGESTIONS: usize = 10;

/// Base64url backup string for a seed
pub struct SeedBackup;

impl SeedBackup {
    /// Encode a seed as a backup string
    ///
    /// ## Security Warning
    ///
    /// The result is the seed itself. Show it to the user once; never log it.
    pub fn to_backup_string(seed: &Seed) -> String {
        to_base64url(seed.as_bytes())
    }

    /// Restore a seed from a backup string
    ///
    /// Surrounding whitespace is ignored. Anything that does not decode to
    /// exactly 32 bytes is `InvalidSeedLength` (or `InvalidEncoding` if it
    /// is not base64url at all).
    pub fn from_backup_string(backup: &str) -> Result<Seed> {
        let mut bytes = from_base64url(backup.trim())?;
        let seed = Seed::from_slice(&bytes);
        bytes.zeroize();
        seed
    }
}

/// A BIP39 recovery phrase encoding a seed
///
/// ## Security Warning
///
/// - This phrase can fully recover the user's account
/// - Should be shown to the user exactly once
/// - Should never be logged or stored in plaintext
pub struct RecoveryPhrase {
    mnemonic: Mnemonic,
}

impl RecoveryPhrase {
    /// Encode a seed as 24 words
    pub fn from_seed(seed: &Seed) -> Result<Self> {
        let mnemonic = Mnemonic::from_entropy(seed.as_bytes()).map_err(|e| {
            Error::InvalidRecoveryPhrase(format!("Failed to encode seed: {}", e))
        })?;
        Ok(Self { mnemonic })
    }

    /// Parse a recovery phrase from words
    ///
    /// ## Validation
    ///
    /// - Must be exactly 24 words
    /// - All words must be in BIP39 English wordlist
    /// - Checksum must be valid
    pub fn from_phrase(phrase: &str) -> Result<Self> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
            .map_err(|e| Error::InvalidRecoveryPhrase(format!("{}", e)))?;

        if mnemonic.word_count() != WORD_COUNT {
            return Err(Error::InvalidRecoveryPhrase(format!(
                "Expected {} words, got {}",
                WORD_COUNT,
                mnemonic.word_count()
            )));
        }

        Ok(Self { mnemonic })
    }

    /// Parse from a list of words
    pub fn from_words(words: &[&str]) -> Result<Self> {
        if words.len() != WORD_COUNT {
            return Err(Error::InvalidRecoveryPhrase(format!(
                "Expected {} words, got {}",
                WORD_COUNT,
                words.len()
            )));
        }

        Self::from_phrase(&words.join(" "))
    }

    /// Get the words as a vector
    pub fn words(&self) -> Vec<&'static str> {
        self.mnemonic.words().collect()
    }

    /// Get the phrase as a single string (words separated by spaces)
    ///
    /// ## Security Warning
    ///
    /// Only use this for display to user. Never log or store.
    pub fn phrase(&self) -> String {
        self.mnemonic.to_string()
    }

    /// Recover the seed the phrase encodes
    pub fn to_seed(&self) -> Result<Seed> {
        let mut entropy = self.mnemonic.to_entropy();
        if entropy.len() != SEED_SIZE {
            let len = entropy.len();
            entropy.zeroize();
            return Err(Error::InvalidSeedLength(len));
        }
        let seed = Seed::from_slice(&entropy);
        entropy.zeroize();
        seed
    }

    /// Validate a phrase without creating a RecoveryPhrase
    ///
    /// Useful for UI validation before submission.
    pub fn validate(phrase: &str) -> Result<()> {
        Self::from_phrase(phrase)?;
        Ok(())
    }

    /// Check if a single word is in the BIP39 wordlist
    pub fn is_valid_word(word: &str) -> bool {
        let word_lower = word.to_lowercase();
        Language::English
            .word_list()
            .iter()
            .any(|w| *w == word_lower)
    }

    /// Get word suggestions for autocomplete
    pub fn suggest_words(prefix: &str) -> Vec<&'static str> {
        if prefix.is_empty() {
            return vec![];
        }

        let prefix_lower = prefix.to_lowercase();
        Language::English
            .word_list()
            .iter()
            .filter(|w| w.starts_with(&prefix_lower))
            .take(MAX_SUGGESTIONS)
            .copied()
            .collect()
    }
}

// Prevent accidental logging
impl std::fmt::Debug for RecoveryPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecoveryPhrase([REDACTED])")
    }
}

// ============================================================================
// TESTS
// ============================================================================
