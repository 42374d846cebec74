//! End-to-end protocol flow
//!
//! Drives both client roles and the server-side pieces through a complete
//! exchange, passing every payload through JSON as a transport would:
//!
//! 1. Owner creates an account and registers (public keys + vault)
//! 2. Owner logs in with a signed challenge
//! 3. Asker submits a question with a receipt key
//! 4. Owner reads and answers it
//! 5. Asker proves their token and reads the answer
//! 6. Owner restores the account on a new device from password or backup

use std::sync::Arc;

use askbox_core::auth::{verify_token, ChallengeStore};
use askbox_core::crypto::{derive_account_keys, AnswerAad};
use askbox_core::wire::{
    AccountRegistration, AnswerPayload, ChallengeIssued, ChallengeResponse, QuestionCreated,
    QuestionSubmission,
};
use askbox_core::{
    time, AskerDraft, CapabilityToken, ChallengeAuthority, CoreConfig, Error, MemoryChallengeStore,
    OwnerSession, RecoveryPhrase, SeedBackup, Visibility,
};
use chrono::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(CoreConfig::default().log_directive())
        .with_test_writer()
        .try_init();
}

/// JSON round trip, standing in for the network
fn transport<T: serde::Serialize + serde::de::DeserializeOwned>(value: &T) -> T {
    let json = serde_json::to_string(value).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[tokio::test]
async fn test_full_question_answer_flow() {
    init_tracing();

    // --- Owner registration ---
    let owner = OwnerSession::create().unwrap();
    let registration: AccountRegistration = transport(&owner.registration("s3cret!").unwrap());
    let owner_public = registration.public_keys;

    // --- Owner login ---
    let store = Arc::new(MemoryChallengeStore::new());
    let authority = ChallengeAuthority::new(Arc::clone(&store), &CoreConfig::default());

    let now = time::now();
    let challenge = authority.issue(&owner_public.signing, now).unwrap();
    let issued: ChallengeIssued = transport(&ChallengeIssued::from(&challenge));

    let response: ChallengeResponse = transport(&owner.respond_to_challenge(&issued));
    let credential = authority
        .verify(&response.challenge_id, &response.signature, now)
        .unwrap();
    assert_eq!(credential.public_key, owner_public.signing);

    // Replaying the same response fails
    let replay = authority.verify(&response.challenge_id, &response.signature, now);
    assert_eq!(replay.err(), Some(Error::ChallengeUsed));

    // --- Asker submits a question ---
    let draft = AskerDraft::new("Is the cake a lie?", &owner_public.encryption).unwrap();
    let submission: QuestionSubmission = transport(draft.submission());

    // Server: assign an id, mint the asker token, keep only its hash
    let token = CapabilityToken::generate();
    let stored_hash = token.hash();
    let created: QuestionCreated = transport(&QuestionCreated {
        question_id: "question-0001".into(),
        asker_token: token.to_base64url(),
    });
    let receipt = draft.finish(&created).unwrap();

    // --- Owner reads and answers ---
    assert_eq!(
        owner.open_question(&submission.ciphertext).unwrap(),
        "Is the cake a lie?"
    );
    let receipt_pk = submission.receipt_public_key().unwrap();
    assert!(receipt_pk.is_some());

    let answer: AnswerPayload = transport(
        &owner
            .answer(
                &created.question_id,
                "Yes.",
                receipt_pk.as_ref(),
                Visibility::Private,
            )
            .unwrap(),
    );
    assert!(answer.envelope.dek_for_asker.is_some());

    // --- Asker fetches the answer ---
    verify_token(receipt.token().as_bytes(), &stored_hash).unwrap();
    assert_eq!(receipt.read_answer(&answer).unwrap(), "Yes.");
    assert_eq!(owner.read_answer(&answer).unwrap(), "Yes.");

    // A guessed token is refused
    assert_eq!(
        verify_token(CapabilityToken::generate().as_bytes(), &stored_hash),
        Err(Error::CapabilityMismatch)
    );

    // --- Owner restores on a new device ---
    let restored = OwnerSession::unlock_async(&registration.encrypted_seed, "s3cret!")
        .await
        .unwrap();
    assert_eq!(restored.public_keys(), owner_public);
    assert_eq!(restored.read_answer(&answer).unwrap(), "Yes.");

    let wrong = OwnerSession::unlock_async(&registration.encrypted_seed, "guess").await;
    assert_eq!(wrong.err(), Some(Error::WrongPasswordOrCorrupt));
}

#[test]
fn test_public_answer_without_receipt() {
    init_tracing();

    let owner = OwnerSession::create().unwrap();
    let submission =
        QuestionSubmission::new("anonymous hello", &owner.public_keys().encryption, None).unwrap();
    assert!(submission.receipt_public_key().unwrap().is_none());

    let answer = owner
        .answer("q-public", "hi!", None, Visibility::Public)
        .unwrap();
    assert!(answer.envelope.dek_for_asker.is_none());
    assert_eq!(answer.visibility, Visibility::Public);
    assert_eq!(owner.read_answer(&answer).unwrap(), "hi!");
}

#[test]
fn test_backup_paths_restore_same_account() {
    let owner = OwnerSession::create().unwrap();
    let seed = owner.keys().seed();

    let backup = SeedBackup::to_backup_string(seed);
    let from_backup = SeedBackup::from_backup_string(&backup).unwrap();
    assert_eq!(
        derive_account_keys(from_backup.as_bytes())
            .unwrap()
            .public_keys(),
        owner.public_keys()
    );

    let phrase = RecoveryPhrase::from_seed(seed).unwrap();
    let from_phrase = RecoveryPhrase::from_phrase(&phrase.phrase())
        .unwrap()
        .to_seed()
        .unwrap();
    assert_eq!(from_phrase.as_bytes(), seed.as_bytes());
}

#[test]
fn test_challenge_lifecycle_against_shared_store() {
    init_tracing();

    let store = Arc::new(MemoryChallengeStore::new());
    let authority = ChallengeAuthority::new(Arc::clone(&store), &CoreConfig::default());
    let owner = OwnerSession::from_seed(&[0x11; 32]).unwrap();
    let now = time::now();

    // Expired
    let stale = authority
        .issue(&owner.public_keys().signing, now - Duration::minutes(6))
        .unwrap();
    let response = owner.respond_to_challenge(&ChallengeIssued::from(&stale));
    let err = authority
        .verify(&response.challenge_id, &response.signature, now)
        .unwrap_err();
    assert_eq!(err, Error::ChallengeExpired);
    assert!(err.is_security_event());

    // Signed by someone else: rejected and consumed
    let intruder = OwnerSession::from_seed(&[0x22; 32]).unwrap();
    let challenge = authority.issue(&owner.public_keys().signing, now).unwrap();
    let forged = intruder.respond_to_challenge(&ChallengeIssued::from(&challenge));
    assert_eq!(
        authority
            .verify(&forged.challenge_id, &forged.signature, now)
            .err(),
        Some(Error::InvalidSignature)
    );
    let genuine = owner.respond_to_challenge(&ChallengeIssued::from(&challenge));
    assert_eq!(
        authority
            .verify(&genuine.challenge_id, &genuine.signature, now)
            .err(),
        Some(Error::ChallengeUsed)
    );

    // Purge leaves only unexpired records
    assert_eq!(authority.purge_expired(now).unwrap(), 1);
    assert!(store.get(&stale.id).unwrap().is_none());
    assert!(store.get(&challenge.id).unwrap().is_some());
}

#[test]
fn test_answer_aad_is_shared_by_both_readers() {
    let owner = OwnerSession::create().unwrap();
    let draft = AskerDraft::new("?", &owner.public_keys().encryption).unwrap();
    let receipt_pk = draft.submission().receipt_public_key().unwrap();
    let receipt = draft
        .finish(&QuestionCreated {
            question_id: "q-aad".into(),
            asker_token: CapabilityToken::generate().to_base64url(),
        })
        .unwrap();

    let answer = owner
        .answer("q-aad", "bound", receipt_pk.as_ref(), Visibility::Private)
        .unwrap();

    let aad = AnswerAad::new("q-aad").to_bytes();
    assert_eq!(aad, b"q-aad|v1");
    assert_eq!(
        answer
            .envelope
            .open_as_owner(&aad, &owner.keys().encryption)
            .unwrap(),
        b"bound"
    );
    assert_eq!(
        answer
            .envelope
            .open_as_asker(&aad, &receipt.keys().encryption)
            .unwrap(),
        b"bound"
    );
}
