//! Clock helpers.
//!
//! Operations with time-dependent outcomes (challenge expiry) take `now`
//! explicitly; these helpers supply it in production code.

use chrono::{DateTime, Utc};

/// Returns the current UTC time.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
