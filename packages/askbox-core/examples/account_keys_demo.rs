//! # Account Keys Demo
//!
//! This example walks through an owner account's key material:
//! 1. Derive keys from the all-zero conformance seed
//! 2. Create a random account and show its fingerprint
//! 3. Wrap the seed under a password and unwrap it again
//! 4. Produce the two backup forms of the seed
//!
//! ## Run
//!
//! ```bash
//! cargo run --example account_keys_demo
//! ```

use askbox_core::codec::to_base64url;
use askbox_core::crypto::{
    decrypt_seed_with_password, derive_account_keys, encrypt_seed_with_password,
    generate_account_keys,
};
use askbox_core::{RecoveryPhrase, SeedBackup};

fn main() {
    println!("=================================================");
    println!("          ASKBOX ACCOUNT KEYS DEMO");
    println!("=================================================\n");

    // =========================================================================
    // STEP 1: Conformance vector
    // =========================================================================
    println!("1. Deriving keys from 32 zero bytes...\n");

    let fixture = derive_account_keys(&[0u8; 32]).expect("Failed to derive keys");
    println!(
        "   Signing public key:    {}",
        hex::encode(fixture.signing.public_bytes())
    );
    println!(
        "   Encryption public key: {}",
        hex::encode(fixture.encryption.public_bytes())
    );
    println!(
        "   (base64url)            {}",
        to_base64url(&fixture.encryption.public_bytes())
    );
    println!();

    // =========================================================================
    // STEP 2: Fresh account
    // =========================================================================
    println!("2. Creating a random account...\n");

    let keys = generate_account_keys().expect("Failed to generate keys");
    let public = keys.public_keys();
    println!("   Fingerprint: {}", public.fingerprint());
    println!(
        "   Published keys: {}",
        serde_json::to_string(&public).expect("Failed to serialize")
    );
    println!();

    // =========================================================================
    // STEP 3: Password vault
    // =========================================================================
    println!("3. Wrapping the seed under a password (Argon2id, 64 MiB)...\n");

    let encrypted =
        encrypt_seed_with_password(keys.seed(), "correct horse battery").expect("Failed to wrap");
    println!("   Vault format version: {}", encrypted.version);
    println!("   Ciphertext: {} bytes", encrypted.ciphertext.len());

    let unwrapped =
        decrypt_seed_with_password(&encrypted, "correct horse battery").expect("Failed to unwrap");
    println!(
        "   Unwrapped seed matches: {}",
        unwrapped.as_bytes() == keys.seed().as_bytes()
    );

    match decrypt_seed_with_password(&encrypted, "wrong") {
        Ok(_) => println!("   Wrong password accepted?!"),
        Err(e) => println!("   Wrong password: {} (code {})", e.user_message(), e.code()),
    }
    println!();

    // =========================================================================
    // STEP 4: Backups
    // =========================================================================
    println!("4. Backup forms (never display these outside a demo)...\n");

    let backup = SeedBackup::to_backup_string(keys.seed());
    println!("   Backup string length: {} characters", backup.len());

    let phrase = RecoveryPhrase::from_seed(keys.seed()).expect("Failed to encode phrase");
    println!("   Recovery phrase: {} words", phrase.words().len());
    println!("   Debug output: {:?}", phrase);

    let restored = phrase.to_seed().expect("Failed to decode phrase");
    println!(
        "   Phrase restores seed: {}",
        restored.as_bytes() == keys.seed().as_bytes()
    );

    println!("\n=================================================");
    println!("                    DONE");
    println!("=================================================");
}
