//! Runtime configuration.
//!
//! Configuration is a plain value handed to the components that need it;
//! nothing is stored globally. KDF parameters are deliberately absent: they
//! belong to the stored format (see `crypto::KdfParams`).

use serde::{Deserialize, Serialize};

/// Default challenge lifetime in seconds
pub const DEFAULT_CHALLENGE_TTL_SECS: u64 = 300;

/// Longest accepted challenge lifetime (one day); larger values are clamped
pub const MAX_CHALLENGE_TTL_SECS: u64 = 86_400;

/// Configuration for askbox core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// How long an issued login challenge stays valid
    pub challenge_ttl_secs: u64,
    /// Enable verbose logging
    pub verbose_logging: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            challenge_ttl_secs: DEFAULT_CHALLENGE_TTL_SECS,
            verbose_logging: false,
        }
    }
}

impl CoreConfig {
    /// Challenge lifetime as a chrono duration
    pub fn challenge_ttl(&self) -> chrono::Duration {
        let secs = self.challenge_ttl_secs.min(MAX_CHALLENGE_TTL_SECS);
        chrono::Duration::seconds(secs as i64)
    }

    /// `tracing` filter directive matching `verbose_logging`
    pub fn log_directive(&self) -> &'static str {
        if self.verbose_logging {
            "askbox_core=debug"
        } else {
            "askbox_core=info"
        }
    }
}
