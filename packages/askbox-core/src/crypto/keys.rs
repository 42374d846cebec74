//! # Key Management
//!
//! Seed handling and deterministic key derivation.
//!
//! ## Derivation
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SEED → KEYPAIRS                                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   Seed (32 bytes)                                                      │
//! │     │                                                                   │
//! │     ├──► Ed25519 seed keypair ─────────────────► SigningKeyPair        │
//! │     │    (crypto_sign_seed_keypair)                (account only)      │
//! │     │                                                                   │
//! │     └──► BLAKE2b-256(key = "enc") ──► encSeed                          │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                     SHA-512(encSeed)[0..32] = X25519 secret            │
//! │                     (crypto_box_seed_keypair)                          │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                                  EncryptionKeyPair                     │
//! │                                                                         │
//! │   Receipt seeds skip the signing branch and the "enc" hash: the        │
//! │   X25519 construction is applied to the receipt seed directly.         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step is fixed by the web and mobile clients. The same seed must give
//! byte-identical keys on every platform.

use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::hash::{generic_hash, sha256};
use super::random::generate_seed;
use super::{ENCRYPTION_CONTEXT, PUBLIC_KEY_SIZE, SEED_SIZE, SIGNING_SECRET_KEY_SIZE};
use crate::codec::serde_base64url_array;
use crate::error::{Error, Result};

/// 32-byte root secret
///
/// Never transmitted. Zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_SIZE]);

impl Seed {
    /// Wrap raw seed bytes
    pub fn from_bytes(bytes: [u8; SEED_SIZE]) -> Self {
        Self(bytes)
    }

    /// Copy a seed out of a slice, failing unless it is exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; SEED_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::InvalidSeedLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Raw seed bytes
    ///
    /// ## Security Warning
    ///
    /// Only use this for backup/storage. Never log or transmit these bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_SIZE] {
        &self.0
    }
}

impl Clone for Seed {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seed([REDACTED])")
    }
}

/// Ed25519 signing keypair
#[derive(ZeroizeOnDrop)]
pub struct SigningKeyPair {
    /// Private signing key (secret)
    #[zeroize(skip)] // ed25519_dalek::SigningKey handles its own zeroization
    secret: SigningKey,
}

impl SigningKeyPair {
    /// Derive from a 32-byte seed (libsodium `crypto_sign_seed_keypair`)
    pub fn from_seed(seed: &[u8; SEED_SIZE]) -> Self {
        Self {
            secret: SigningKey::from_bytes(seed),
        }
    }

    /// The 64-byte secret key in libsodium layout (seed ‖ public key)
    ///
    /// ## Security Warning
    ///
    /// Only use this for secure storage. Never log or transmit these bytes.
    pub fn secret_bytes(&self) -> [u8; SIGNING_SECRET_KEY_SIZE] {
        self.secret.to_keypair_bytes()
    }

    /// Get the public key bytes
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.secret.verifying_key().to_bytes()
    }

    /// Get the verifying key for signature verification
    pub fn verifying_key(&self) -> VerifyingKey {
        self.secret.verifying_key()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.secret
    }
}

/// X25519 encryption keypair
#[derive(ZeroizeOnDrop)]
pub struct EncryptionKeyPair {
    /// Private encryption key (secret)
    #[zeroize(skip)] // x25519_dalek handles its own zeroization
    secret: StaticSecret,
    /// Public encryption key (derived from secret)
    #[zeroize(skip)]
    public: X25519PublicKey,
}

impl EncryptionKeyPair {
    /// Derive from a 32-byte seed (libsodium `crypto_box_seed_keypair`)
    ///
    /// The secret scalar is the first half of SHA-512(seed).
    pub fn from_seed(seed: &[u8; SEED_SIZE]) -> Self {
        let mut digest = Sha512::digest(seed);

        let mut secret_bytes = [0u8; 32];
        secret_bytes.copy_from_slice(&digest[..32]);
        digest.as_mut_slice().zeroize();

        let keypair = Self::from_secret_bytes(&secret_bytes);
        secret_bytes.zeroize();
        keypair
    }

    /// Rebuild from a stored secret key
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Self {
        let secret = StaticSecret::from(*bytes);
        let public = X25519PublicKey::from(&secret);
        Self { secret, public }
    }

    /// Get the secret key bytes (for backup/storage)
    ///
    /// ## Security Warning
    ///
    /// Only use this for secure storage. Never log or transmit these bytes.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }

    /// Get the public key bytes
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public.to_bytes()
    }

    /// Secret key in the form the sealed-box implementation wants
    pub(crate) fn box_secret(&self) -> crypto_box::SecretKey {
        crypto_box::SecretKey::from(self.secret.to_bytes())
    }
}

/// Keys for a box owner: seed, signing identity, and encryption keypair
#[derive(ZeroizeOnDrop)]
pub struct AccountKeys {
    /// Root seed
    seed: Seed,
    /// Ed25519 keypair for challenge signing
    pub signing: SigningKeyPair,
    /// X25519 keypair for sealed boxes and envelopes
    pub encryption: EncryptionKeyPair,
}

impl AccountKeys {
    /// The root seed these keys were derived from
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Get the public keys for publishing
    pub fn public_keys(&self) -> PublicKeys {
        PublicKeys {
            signing: self.signing.public_bytes(),
            encryption: self.encryption.public_bytes(),
        }
    }
}

/// Keys for one asked question: seed and encryption keypair, no signing
#[derive(ZeroizeOnDrop)]
pub struct ReceiptKeys {
    seed: Seed,
    /// X25519 keypair the answer's DEK is sealed to
    pub encryption: EncryptionKeyPair,
}

impl ReceiptKeys {
    /// The receipt seed
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Public half, sent alongside the question
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.encryption.public_bytes()
    }
}

/// Derive account keys from a root seed
///
/// Deterministic: the same seed yields byte-identical keys on every
/// conforming implementation. Fails only if `seed` is not 32 bytes.
pub fn derive_account_keys(seed: &[u8]) -> Result<AccountKeys> {
    let seed = Seed::from_slice(seed)?;

    let signing = SigningKeyPair::from_seed(seed.as_bytes());

    let mut enc_seed = generic_hash(seed.as_bytes(), Some(ENCRYPTION_CONTEXT))?;
    let encryption = EncryptionKeyPair::from_seed(&enc_seed);
    enc_seed.zeroize();

    Ok(AccountKeys {
        seed,
        signing,
        encryption,
    })
}

/// Derive receipt keys from a receipt seed
pub fn derive_receipt_keys(seed: &[u8]) -> Result<ReceiptKeys> {
    let seed = Seed::from_slice(seed)?;
    let encryption = EncryptionKeyPair::from_seed(seed.as_bytes());
    Ok(ReceiptKeys { seed, encryption })
}

/// Create a brand-new account from a random seed
pub fn generate_account_keys() -> Result<AccountKeys> {
    let seed = generate_seed();
    derive_account_keys(seed.as_bytes())
}

/// Create receipt keys for a new question
pub fn generate_receipt_keys() -> Result<ReceiptKeys> {
    let seed = generate_seed();
    derive_receipt_keys(seed.as_bytes())
}

/// Public keys that can be safely published
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeys {
    /// Ed25519 public key (32 bytes)
    #[serde(with = "serde_base64url_array")]
    pub signing: [u8; PUBLIC_KEY_SIZE],

    /// X25519 public key (32 bytes)
    #[serde(with = "serde_base64url_array")]
    pub encryption: [u8; PUBLIC_KEY_SIZE],
}

impl PublicKeys {
    /// Parse from raw bytes
    pub fn from_bytes(signing: [u8; PUBLIC_KEY_SIZE], encryption: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self {
            signing,
            encryption,
        }
    }

    /// Get the verifying key for signature verification
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        VerifyingKey::from_bytes(&self.signing)
            .map_err(|e| Error::InvalidKey(format!("Invalid signing public key: {}", e)))
    }

    /// Short fingerprint for out-of-band comparison
    ///
    /// First 8 bytes of SHA-256(signing ‖ encryption), hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut material = [0u8; PUBLIC_KEY_SIZE * 2];
        material[..PUBLIC_KEY_SIZE].copy_from_slice(&self.signing);
        material[PUBLIC_KEY_SIZE..].copy_from_slice(&self.encryption);
        hex::encode(&sha256(&material)[..8])
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::to_base64url;

    #[test]
    fn test_zero_seed_conformance_vector() {
        let keys = derive_account_keys(&[0u8; 32]).unwrap();

        assert_eq!(
            hex::encode(keys.signing.public_bytes()),
            "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29"
        );
        assert_eq!(
            hex::encode(keys.encryption.public_bytes()),
            "aa30ad56411be7391b7a1152e568bb90ff61496d07e32c72d62ba6f1a0e0aa6a"
        );
        assert_eq!(
            to_base64url(&keys.signing.public_bytes()),
            "O2onvM62pC1io6jQKm8Nc2UyFXcd4kOmOsBIoYtZ2ik"
        );
        assert_eq!(
            to_base64url(&keys.encryption.public_bytes()),
            "qjCtVkEb5zkbehFS5Wi7kP9hSW0H4yxy1ium8aDgqmo"
        );
    }

    #[test]
    fn test_zero_seed_receipt_vector() {
        let receipt = derive_receipt_keys(&[0u8; 32]).unwrap();
        assert_eq!(
            hex::encode(receipt.public_bytes()),
            "5bf55c73b82ebe22be80f3430667af570fae2556a6415e6b30d4065300aa947d"
        );
    }

    #[test]
    fn test_derivation_deterministic() {
        let seed = [42u8; 32];

        let kp1 = derive_account_keys(&seed).unwrap();
        let kp2 = derive_account_keys(&seed).unwrap();

        assert_eq!(kp1.signing.public_bytes(), kp2.signing.public_bytes());
        assert_eq!(kp1.signing.secret_bytes(), kp2.signing.secret_bytes());
        assert_eq!(kp1.encryption.public_bytes(), kp2.encryption.public_bytes());
        assert_eq!(kp1.encryption.secret_bytes(), kp2.encryption.secret_bytes());
    }

    #[test]
    fn test_signing_secret_layout() {
        let seed = [9u8; 32];
        let keys = derive_account_keys(&seed).unwrap();
        let secret = keys.signing.secret_bytes();

        assert_eq!(&secret[..32], &seed);
        assert_eq!(&secret[32..], &keys.signing.public_bytes());
    }

    #[test]
    fn test_receipt_differs_from_account_encryption() {
        let seed = [5u8; 32];
        let account = derive_account_keys(&seed).unwrap();
        let receipt = derive_receipt_keys(&seed).unwrap();

        // Account keys pass the seed through the "enc" hash first
        assert_ne!(account.encryption.public_bytes(), receipt.public_bytes());
    }

    #[test]
    fn test_invalid_seed_length() {
        assert_eq!(
            derive_account_keys(&[0u8; 31]).err(),
            Some(Error::InvalidSeedLength(31))
        );
        assert_eq!(
            derive_receipt_keys(&[0u8; 33]).err(),
            Some(Error::InvalidSeedLength(33))
        );
    }

    #[test]
    fn test_generated_keys_are_distinct() {
        let a = generate_account_keys().unwrap();
        let b = generate_account_keys().unwrap();
        assert_ne!(a.public_keys(), b.public_keys());

        let r1 = generate_receipt_keys().unwrap();
        let r2 = generate_receipt_keys().unwrap();
        assert_ne!(r1.public_bytes(), r2.public_bytes());
    }

    #[test]
    fn test_secret_round_trip() {
        let keys = derive_account_keys(&[3u8; 32]).unwrap();
        let restored = EncryptionKeyPair::from_secret_bytes(&keys.encryption.secret_bytes());
        assert_eq!(restored.public_bytes(), keys.encryption.public_bytes());
    }

    #[test]
    fn test_public_keys_serialization() {
        let keys = generate_account_keys().unwrap();
        let public = keys.public_keys();

        let json = serde_json::to_string(&public).unwrap();
        assert!(json.contains("\"signing\""));
        assert!(json.contains("\"encryption\""));

        let restored: PublicKeys = serde_json::from_str(&json).unwrap();
        assert_eq!(public, restored);
    }

    #[test]
    fn test_fingerprint_stable() {
        let keys = derive_account_keys(&[1u8; 32]).unwrap();
        let fp = keys.public_keys().fingerprint();
        assert_eq!(fp.len(), 16);
        assert_eq!(fp, keys.public_keys().fingerprint());
    }

    #[test]
    fn test_seed_debug_redacts() {
        let seed = Seed::from_bytes([0xAB; 32]);
        let debug = format!("{:?}", seed);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("ab"));
    }
}
