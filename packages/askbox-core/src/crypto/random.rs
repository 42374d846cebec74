//! CSPRNG byte generation.
//!
//! Draws directly from the operating system (`OsRng`), which is safe to call
//! from any thread without locking.

use rand::rngs::OsRng;
use rand::RngCore;

use super::SEED_SIZE;

/// Fill a buffer with cryptographically random bytes
pub fn fill_random(buf: &mut [u8]) {
    OsRng.fill_bytes(buf);
}

/// Generate `N` cryptographically random bytes
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    fill_random(&mut bytes);
    bytes
}

/// Generate a fresh 32-byte root seed
pub fn generate_seed() -> super::Seed {
    super::Seed::from_bytes(random_bytes::<SEED_SIZE>())
}
