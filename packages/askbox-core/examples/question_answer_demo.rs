//! # Question & Answer Demo
//!
//! This example runs one anonymous question through the system:
//! 1. The owner publishes their encryption key
//! 2. An asker seals a question and keeps a receipt
//! 3. The owner opens the question and writes an envelope-encrypted answer
//! 4. Both sides decrypt the answer
//!
//! ## Run
//!
//! ```bash
//! cargo run --example question_answer_demo
//! ```

use askbox_core::wire::QuestionCreated;
use askbox_core::{AskerDraft, CapabilityToken, CoreConfig, OwnerSession, Visibility};

fn main() {
    let config = CoreConfig {
        verbose_logging: true,
        ..CoreConfig::default()
    };
    tracing_subscriber::fmt()
        .with_env_filter(config.log_directive())
        .init();

    println!("=================================================");
    println!("          ASKBOX QUESTION & ANSWER DEMO");
    println!("=================================================\n");

    // =========================================================================
    // STEP 1: Owner
    // =========================================================================
    println!("1. Owner creates a box...\n");

    let owner = OwnerSession::create().expect("Failed to create owner");
    let owner_keys = owner.public_keys();
    println!("   Owner fingerprint: {}", owner_keys.fingerprint());
    println!();

    // =========================================================================
    // STEP 2: Asker
    // =========================================================================
    println!("2. Asker seals a question...\n");

    let draft = AskerDraft::new("What are you reading right now?", &owner_keys.encryption)
        .expect("Failed to seal question");
    let submission = draft.submission().clone();
    println!(
        "   Submission JSON: {}",
        serde_json::to_string(&submission).expect("Failed to serialize")
    );

    // Server side: id + token, only the hash is stored
    let token = CapabilityToken::generate();
    let stored_hash = token.hash();
    let created = QuestionCreated {
        question_id: "q-demo-1".to_string(),
        asker_token: token.to_base64url(),
    };
    println!("   Server stores token hash: {}", stored_hash);

    let receipt = draft.finish(&created).expect("Failed to build receipt");
    println!("   Asker keeps: {:?}", receipt);
    println!();

    // =========================================================================
    // STEP 3: Owner answers
    // =========================================================================
    println!("3. Owner reads and answers...\n");

    let question = owner
        .open_question(&submission.ciphertext)
        .expect("Failed to open question");
    println!("   Question: {}", question);

    let receipt_pk = submission
        .receipt_public_key()
        .expect("Malformed receipt key");
    let answer = owner
        .answer(
            &created.question_id,
            "A very long book about sandworms.",
            receipt_pk.as_ref(),
            Visibility::Public,
        )
        .expect("Failed to encrypt answer");
    println!(
        "   Answer JSON: {}",
        serde_json::to_string(&answer).expect("Failed to serialize")
    );
    println!();

    // =========================================================================
    // STEP 4: Both sides read
    // =========================================================================
    println!("4. Decrypting the answer...\n");

    receipt
        .token()
        .verify(&stored_hash)
        .expect("Token should match");
    println!(
        "   Asker reads: {}",
        receipt.read_answer(&answer).expect("Asker failed to decrypt")
    );
    println!(
        "   Owner reads: {}",
        owner.read_answer(&answer).expect("Owner failed to decrypt")
    );

    println!("\n=================================================");
    println!("                    DONE");
    println!("=================================================");
}
