//! # Cryptography Module
//!
//! Every primitive the askbox clients share. Byte layouts match libsodium
//! so the web, mobile, and Rust clients interoperate.
//!
//! ## Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC ARCHITECTURE                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    KEY HIERARCHY                                │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  Seed (32 random bytes)  ◄── password vault / backup string    │   │
//! │  │              │                                                  │   │
//! │  │     ┌────────┴──────────────┐                                   │   │
//! │  │     ▼                       ▼                                   │   │
//! │  │  ┌─────────────────┐   ┌─────────────────┐                     │   │
//! │  │  │  Signing Key    │   │ Encryption Key  │                     │   │
//! │  │  │  (Ed25519)      │   │ (X25519)        │                     │   │
//! │  │  │                 │   │ via "enc" hash  │                     │   │
//! │  │  │ • Login         │   │ • Questions     │                     │   │
//! │  │  │   challenges    │   │ • Answer DEKs   │                     │   │
//! │  │  └─────────────────┘   └─────────────────┘                     │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 ENCRYPTION SCHEMES                              │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  Questions:  sealed box (asker → owner, anonymous)             │   │
//! │  │  Answers:    XChaCha20-Poly1305 under a fresh DEK,             │   │
//! │  │              DEK sealed to owner and optionally asker          │   │
//! │  │  Seed vault: Argon2id → XSalsa20-Poly1305 secretbox            │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices
//!
//! | Algorithm | Purpose |
//! |-----------|---------|
//! | Ed25519 | Challenge signatures |
//! | X25519 + XSalsa20-Poly1305 | Sealed boxes |
//! | XChaCha20-Poly1305 | Answer bodies |
//! | Argon2id v1.3 | Password key derivation |
//! | BLAKE2b | Seed domain separation |
//! | SHA-256 | Asker token hashing |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: seeds, secret keys, DEKs and password-derived
//!    keys are zeroized when dropped
//! 2. **Secure Random**: `rand::rngs::OsRng` for all randomness
//! 3. **No Nonce Reuse**: every encryption draws a fresh random nonce

mod envelope;
mod hash;
mod keys;
mod random;
mod sealed;
mod signing;
mod vault;

pub use envelope::{decrypt, encrypt, AnswerAad, EnvelopeEncrypted, DEK_SIZE};
pub use hash::{generic_hash, sha256, GENERIC_HASH_KEY_MAX, GENERIC_HASH_SIZE};
pub use keys::{
    derive_account_keys, derive_receipt_keys, generate_account_keys, generate_receipt_keys,
    AccountKeys, EncryptionKeyPair, PublicKeys, ReceiptKeys, Seed, SigningKeyPair,
};
pub use random::{fill_random, generate_seed, random_bytes};
pub use sealed::{open, open_question, seal, seal_question};
pub use signing::{sign, verify, Signature};
pub use vault::{
    decrypt_seed_with_password, decrypt_seed_with_password_async, encrypt_seed_with_password,
    encrypt_seed_with_password_async, EncryptedSeed, KdfParams, ENCRYPTED_SEED_SIZE,
};

/// Size of a root or receipt seed in bytes
pub const SEED_SIZE: usize = 32;

/// Size of Ed25519 and X25519 public keys in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of an Ed25519 secret key (seed ‖ public key) in bytes
pub const SIGNING_SECRET_KEY_SIZE: usize = 64;

/// Size of an Ed25519 signature in bytes
pub const SIGNATURE_SIZE: usize = 64;

/// Bytes a sealed box adds to its message (ephemeral key + tag)
pub const SEALED_BOX_OVERHEAD: usize = 48;

/// Nonce size for secretbox and XChaCha20-Poly1305
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size
pub const TAG_SIZE: usize = 16;

/// Argon2id salt size
pub const SALT_SIZE: usize = 16;

/// BLAKE2b key separating the encryption seed from the root seed
pub const ENCRYPTION_CONTEXT: &[u8] = b"enc";
