//! # Password Vault
//!
//! Wraps a 32-byte seed under a user password so it can be stored by the
//! server or on disk without exposing it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SEED WRAPPING                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   password ──┐                                                         │
//! │              ├──► Argon2id v1.3 (t=3, m=64 MiB, p=1) ──► key (32B)     │
//! │   salt (16B) ┘                                                         │
//! │                                                                         │
//! │   seed (32B) ──► XSalsa20-Poly1305(key, nonce 24B)                     │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                 tag (16B) ‖ ciphertext (32B)  = 48 bytes               │
//! │                                                                         │
//! │   EncryptedSeed { version, ciphertext, nonce, salt }                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The KDF parameters are part of the stored format. They are pinned per
//! `version` and never read from configuration.
//!
//! Decryption never says *why* it failed: a wrong password, a flipped bit
//! and a truncated field all come back as `WrongPasswordOrCorrupt`.

use argon2::{Algorithm, Argon2, Params, Version};
use crypto_secretbox::aead::generic_array::GenericArray;
use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::XSalsa20Poly1305;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use super::keys::Seed;
use super::random::random_bytes;
use super::{NONCE_SIZE, SALT_SIZE, SEED_SIZE, TAG_SIZE};
use crate::codec::serde_base64url;
use crate::error::{Error, Result};

/// Length of a wrapped seed: secretbox tag followed by the seed
pub const ENCRYPTED_SEED_SIZE: usize = SEED_SIZE + TAG_SIZE;

/// Argon2id cost parameters, pinned per format version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Format version these parameters belong to
    pub version: u8,
    /// Iterations (libsodium `opslimit`)
    pub ops_limit: u32,
    /// Memory in KiB (libsodium `memlimit` / 1024)
    pub mem_limit_kib: u32,
    /// Lanes
    pub parallelism: u32,
}

impl KdfParams {
    /// Profile shared with the web and mobile clients
    pub const V1: KdfParams = KdfParams {
        version: 1,
        ops_limit: 3,
        mem_limit_kib: 65536,
        parallelism: 1,
    };

    /// Parameters for the newest format version
    pub fn current() -> Self {
        Self::V1
    }

    /// Look up the parameters for a stored format version
    pub fn for_version(version: u8) -> Option<Self> {
        match version {
            1 => Some(Self::V1),
            _ => None,
        }
    }

    fn derive_key(&self, password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; 32]>> {
        let params = Params::new(
            self.mem_limit_kib,
            self.ops_limit,
            self.parallelism,
            Some(32),
        )
        .map_err(|e| Error::KeyDerivationFailed(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut key = Zeroizing::new([0u8; 32]);
        argon2
            .hash_password_into(password, salt, &mut key[..])
            .map_err(|e| Error::KeyDerivationFailed(e.to_string()))?;
        Ok(key)
    }
}

fn default_version() -> u8 {
    KdfParams::V1.version
}

/// A password-wrapped seed
///
/// Field lengths are not enforced at deserialization time so that a damaged
/// record surfaces as `WrongPasswordOrCorrupt` on decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedSeed {
    /// KDF parameter version
    #[serde(default = "default_version")]
    pub version: u8,
    /// Secretbox output: tag ‖ ciphertext (48 bytes)
    #[serde(with = "serde_base64url")]
    pub ciphertext: Vec<u8>,
    /// Secretbox nonce (24 bytes)
    #[serde(with = "serde_base64url")]
    pub nonce: Vec<u8>,
    /// Argon2id salt (16 bytes)
    #[serde(with = "serde_base64url")]
    pub salt: Vec<u8>,
}

/// Wrap a seed under a password
///
/// Blocking: Argon2id takes tens to hundreds of milliseconds and 64 MiB.
/// Use [`encrypt_seed_with_password_async`] from async code.
pub fn encrypt_seed_with_password(seed: &Seed, password: &str) -> Result<EncryptedSeed> {
    let params = KdfParams::current();
    let salt = random_bytes::<SALT_SIZE>();
    let nonce = random_bytes::<NONCE_SIZE>();

    tracing::debug!("Wrapping seed with password (kdf v{})", params.version);

    let key = params.derive_key(password.as_bytes(), &salt)?;
    let cipher = XSalsa20Poly1305::new_from_slice(&key[..])
        .map_err(|e| Error::EncryptionFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(GenericArray::from_slice(&nonce), &seed.as_bytes()[..])
        .map_err(|_| Error::EncryptionFailed("Secretbox encryption failed".into()))?;

    Ok(EncryptedSeed {
        version: params.version,
        ciphertext,
        nonce: nonce.to_vec(),
        salt: salt.to_vec(),
    })
}

/// Unwrap a seed with its password
pub fn decrypt_seed_with_password(encrypted: &EncryptedSeed, password: &str) -> Result<Seed> {
    let params = KdfParams::for_version(encrypted.version).ok_or_else(|| {
        Error::KeyDerivationFailed(format!("Unsupported KDF version {}", encrypted.version))
    })?;

    if encrypted.salt.len() != SALT_SIZE
        || encrypted.nonce.len() != NONCE_SIZE
        || encrypted.ciphertext.len() != ENCRYPTED_SEED_SIZE
    {
        tracing::debug!("Rejecting encrypted seed with malformed field lengths");
        return Err(Error::WrongPasswordOrCorrupt);
    }

    let key = params.derive_key(password.as_bytes(), &encrypted.salt)?;
    let cipher = XSalsa20Poly1305::new_from_slice(&key[..])
        .map_err(|e| Error::KeyDerivationFailed(e.to_string()))?;

    let mut plaintext = cipher
        .decrypt(
            GenericArray::from_slice(encrypted.nonce.as_slice()),
            encrypted.ciphertext.as_slice(),
        )
        .map_err(|_| Error::WrongPasswordOrCorrupt)?;

    let seed = Seed::from_slice(&plaintext);
    plaintext.zeroize();
    seed.map_err(|_| Error::WrongPasswordOrCorrupt)
}

/// Async wrapper around [`encrypt_seed_with_password`]
///
/// Runs the KDF on the tokio blocking pool. The work is not cancellable
/// once started.
pub async fn encrypt_seed_with_password_async(
    seed: &Seed,
    password: &str,
) -> Result<EncryptedSeed> {
    let seed = seed.clone();
    let password = Zeroizing::new(password.to_owned());

    tokio::task::spawn_blocking(move || encrypt_seed_with_password(&seed, &password))
        .await
        .map_err(|e| Error::Internal(format!("KDF task failed: {}", e)))?
}

/// Async wrapper around [`decrypt_seed_with_password`]
pub async fn decrypt_seed_with_password_async(
    encrypted: &EncryptedSeed,
    password: &str,
) -> Result<Seed> {
    let encrypted = encrypted.clone();
    let password = Zeroizing::new(password.to_owned());

    tokio::task::spawn_blocking(move || decrypt_seed_with_password(&encrypted, &password))
        .await
        .map_err(|e| Error::Internal(format!("KDF task failed: {}", e)))?
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let seed = Seed::from_bytes([7u8; 32]);
        let encrypted = encrypt_seed_with_password(&seed, "correct horse").unwrap();

        assert_eq!(encrypted.version, 1);
        assert_eq!(encrypted.ciphertext.len(), 48);
        assert_eq!(encrypted.nonce.len(), 24);
        assert_eq!(encrypted.salt.len(), 16);

        let decrypted = decrypt_seed_with_password(&encrypted, "correct horse").unwrap();
        assert_eq!(decrypted.as_bytes(), seed.as_bytes());
    }

    #[test]
    fn test_wrong_password_fails_closed() {
        let seed = Seed::from_bytes([7u8; 32]);
        let encrypted = encrypt_seed_with_password(&seed, "pw1").unwrap();

        assert_eq!(
            decrypt_seed_with_password(&encrypted, "pw2").err(),
            Some(Error::WrongPasswordOrCorrupt)
        );
    }

    #[test]
    fn test_corrupted_ciphertext_fails() {
        let seed = Seed::from_bytes([7u8; 32]);
        let mut encrypted = encrypt_seed_with_password(&seed, "pw").unwrap();
        encrypted.ciphertext[0] ^= 0x80;

        assert_eq!(
            decrypt_seed_with_password(&encrypted, "pw").err(),
            Some(Error::WrongPasswordOrCorrupt)
        );
    }

    #[test]
    fn test_malformed_lengths_fail_without_kdf() {
        let good = EncryptedSeed {
            version: 1,
            ciphertext: vec![0u8; 48],
            nonce: vec![0u8; 24],
            salt: vec![0u8; 16],
        };

        let mut short_salt = good.clone();
        short_salt.salt.truncate(15);
        let mut short_nonce = good.clone();
        short_nonce.nonce.truncate(23);
        let mut long_ct = good;
        long_ct.ciphertext.push(0);

        for bad in [short_salt, short_nonce, long_ct] {
            assert_eq!(
                decrypt_seed_with_password(&bad, "pw").err(),
                Some(Error::WrongPasswordOrCorrupt)
            );
        }
    }

    #[test]
    fn test_unknown_version_rejected() {
        let encrypted = EncryptedSeed {
            version: 9,
            ciphertext: vec![0u8; 48],
            nonce: vec![0u8; 24],
            salt: vec![0u8; 16],
        };
        assert!(matches!(
            decrypt_seed_with_password(&encrypted, "pw"),
            Err(Error::KeyDerivationFailed(_))
        ));
    }

    #[test]
    fn test_fresh_salt_and_nonce() {
        let seed = Seed::from_bytes([1u8; 32]);
        let a = encrypt_seed_with_password(&seed, "pw").unwrap();
        let b = encrypt_seed_with_password(&seed, "pw").unwrap();

        assert_ne!(a.salt, b.salt);
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_serialization_camel_case() {
        let encrypted = EncryptedSeed {
            version: 1,
            ciphertext: vec![1u8; 48],
            nonce: vec![2u8; 24],
            salt: vec![3u8; 16],
        };
        let json = serde_json::to_string(&encrypted).unwrap();
        assert!(json.contains("\"ciphertext\""));
        assert!(!json.contains('='));

        let restored: EncryptedSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, encrypted);

        // Records written before versioning default to v1
        let legacy = r#"{"ciphertext":"AA","nonce":"AA","salt":"AA"}"#;
        let parsed: EncryptedSeed = serde_json::from_str(legacy).unwrap();
        assert_eq!(parsed.version, 1);
    }

    #[test]
    fn test_kdf_params_pinned() {
        assert_eq!(KdfParams::current(), KdfParams::V1);
        assert_eq!(KdfParams::V1.ops_limit, 3);
        assert_eq!(KdfParams::V1.mem_limit_kib, 64 * 1024);
        assert_eq!(KdfParams::V1.parallelism, 1);
        assert!(KdfParams::for_version(2).is_none());
    }

    #[test]
    fn test_libsodium_known_answer() {
        // crypto_pwhash(ARGON2ID13, ops=3, mem=64 MiB) + crypto_secretbox_easy
        let password = "correct horse battery staple";
        let salt: Vec<u8> = (0u8..16).collect();
        let nonce: Vec<u8> = (100u8..124).collect();
        let seed: Vec<u8> = (32u8..64).collect();

        let key = KdfParams::V1.derive_key(password.as_bytes(), &salt).unwrap();
        assert_eq!(
            hex::encode(&key[..]),
            "0d1a3c6523c8f06e4e0af9c515aa5b5448cfebd6838f2d52c3d8b6ef8ddc3c2e"
        );

        let encrypted = EncryptedSeed {
            version: 1,
            ciphertext: hex::decode(
                "9888a92caf221184f910fdf5f1c9f4dd\
                 c39926f9c85a056b8a4f70f8e2656f3a\
                 1960875040c0ce033e170d16740887a6",
            )
            .unwrap(),
            nonce,
            salt,
        };
        let decrypted = decrypt_seed_with_password(&encrypted, password).unwrap();
        assert_eq!(&decrypted.as_bytes()[..], &seed[..]);

        // The same record as other clients upload it
        let json = r#"{"version":1,"ciphertext":"mIipLK8iEYT5EP318cn03cOZJvnIWgVrik9w-OJlbzoZYIdQQMDOAz4XDRZ0CIem","nonce":"ZGVmZ2hpamtsbW5vcHFyc3R1dnd4eXp7","salt":"AAECAwQFBgcICQoLDA0ODw"}"#;
        let parsed: EncryptedSeed = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, encrypted);
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let seed = Seed::from_bytes([4u8; 32]);
        let encrypted = encrypt_seed_with_password_async(&seed, "async pw")
            .await
            .unwrap();
        let decrypted = decrypt_seed_with_password_async(&encrypted, "async pw")
            .await
            .unwrap();
        assert_eq!(decrypted.as_bytes(), seed.as_bytes());

        assert_eq!(
            decrypt_seed_with_password_async(&encrypted, "nope").await.err(),
            Some(Error::WrongPasswordOrCorrupt)
        );
    }
}
