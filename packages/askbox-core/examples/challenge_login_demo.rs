//! # Challenge Login Demo
//!
//! This example shows passwordless owner login:
//! 1. The server issues a nonce bound to the owner's signing key
//! 2. The owner signs it
//! 3. The server verifies once and hands out a session credential
//! 4. Replays, late answers and forged signatures are refused
//!
//! ## Run
//!
//! ```bash
//! cargo run --example challenge_login_demo
//! ```

use askbox_core::wire::ChallengeIssued;
use askbox_core::{time, ChallengeAuthority, CoreConfig, MemoryChallengeStore, OwnerSession};
use chrono::Duration;

fn main() {
    println!("=================================================");
    println!("          ASKBOX CHALLENGE LOGIN DEMO");
    println!("=================================================\n");

    let config = CoreConfig::default();
    let authority = ChallengeAuthority::new(MemoryChallengeStore::new(), &config);
    let mut owner = OwnerSession::create().expect("Failed to create owner");
    let signing_key = owner.public_keys().signing;

    // =========================================================================
    // STEP 1: Issue
    // =========================================================================
    println!("1. Server issues a challenge...\n");

    let now = time::now();
    let challenge = authority.issue(&signing_key, now).expect("Failed to issue");
    let issued = ChallengeIssued::from(&challenge);
    println!(
        "   {}",
        serde_json::to_string(&issued).expect("Failed to serialize")
    );
    println!();

    // =========================================================================
    // STEP 2-3: Sign and verify
    // =========================================================================
    println!("2. Owner signs, server verifies...\n");

    let response = owner.respond_to_challenge(&issued);
    let credential = authority
        .verify(&response.challenge_id, &response.signature, now)
        .expect("Login failed");
    println!("   Credential: {:?}", credential);
    owner.set_credential(credential);
    println!("   Session: {:?}", owner);
    println!();

    // =========================================================================
    // STEP 4: Failures
    // =========================================================================
    println!("3. Things that must fail...\n");

    let replay = authority.verify(&response.challenge_id, &response.signature, now);
    report("Replay", replay.err());

    let late = authority.issue(&signing_key, now).expect("Failed to issue");
    let late_response = owner.respond_to_challenge(&ChallengeIssued::from(&late));
    let after_expiry = late.expires_at + Duration::seconds(1);
    report(
        "Late answer",
        authority
            .verify(&late_response.challenge_id, &late_response.signature, after_expiry)
            .err(),
    );

    let intruder = OwnerSession::create().expect("Failed to create intruder");
    let target = authority.issue(&signing_key, now).expect("Failed to issue");
    let forged = intruder.respond_to_challenge(&ChallengeIssued::from(&target));
    report(
        "Forged signature",
        authority
            .verify(&forged.challenge_id, &forged.signature, now)
            .err(),
    );

    println!(
        "\n   Purged {} expired challenges",
        authority
            .purge_expired(after_expiry)
            .expect("Failed to purge")
    );

    println!("\n=================================================");
    println!("                    DONE");
    println!("=================================================");
}

fn report(label: &str, error: Option<askbox_core::Error>) {
    match error {
        Some(e) => println!(
            "   {:<17} -> {} (code {}, security event: {})",
            label,
            e,
            e.code(),
            e.is_security_event()
        ),
        None => println!("   {:<17} -> accepted?!", label),
    }
}
