//! End-to-end integration tests for the SigNote protocol.
//!
//! These tests exercise the full note lifecycle from trust-root chartering
//! through minting, sealing, repeated custody transfers, and final
//! verification. They prove that the crate's components compose correctly:
//! keypair generation, init-section construction, the keyed integrity
//! seal, checkpoint appends, and the one-pass chain verifier.
//!
//! Each test builds its own keys and notes from scratch. No shared state,
//! no test ordering dependencies, no flaky failures.

use signote_protocol::crypto::keys::NoteKeypair;
use signote_protocol::note::init::{InitSection, InitSectionBuilder, SealedInit};
use signote_protocol::note::verification::VerificationError;
use signote_protocol::note::{append_checkpoint, verify};
use signote_protocol::sources::{random_nonce, tai64n_now};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Charters a mint under a fresh trust root and seals a test-currency
/// note. Returns the sealed note plus both keypairs.
fn mint_test_note() -> (SealedInit, NoteKeypair, NoteKeypair) {
    let trust_root = NoteKeypair::generate();
    let mint = NoteKeypair::generate();
    let charter = trust_root.sign(&mint.public_key_bytes());

    let sealed = InitSectionBuilder::new()
        .isocode(b"XTS")
        .serial_padded("TS001")
        .denomination(0, 10_000, 0)
        .mint_pk(&mint.public_key_bytes())
        .mint_pk_crsig(charter.as_bytes())
        .nonce(&random_nonce())
        .hashkey(b"Bill Gates never said that 640K ought to be enough for anybody!!")
        .build()
        .expect("test note fields are valid")
        .seal();

    (sealed, trust_root, mint)
}

/// Extends a note with one custody checkpoint: `signer` hands off to
/// `new_custodian`, stamped with the current time and a fresh nonce.
fn transfer(note: &[u8], new_custodian: &NoteKeypair, signer: &NoteKeypair) -> Vec<u8> {
    append_checkpoint(
        note,
        &tai64n_now(),
        &random_nonce(),
        &new_custodian.public_key(),
        signer,
    )
}

// ---------------------------------------------------------------------------
// 1. Mint, Seal, Verify
// ---------------------------------------------------------------------------

#[test]
fn minted_note_is_256_bytes_and_verifies() {
    let (sealed, trust_root, mint) = mint_test_note();
    assert_eq!(sealed.bytes.len(), 256);
    assert_eq!(sealed.digest_hex.len(), 128);

    let report = verify(&sealed.bytes, &trust_root.public_key()).expect("fresh note");
    assert!(report.valid);
    assert_eq!(report.confirmed_checkpoints, 0);
    assert_eq!(report.custodian, mint.public_key());
}

#[test]
fn sealing_is_deterministic_for_identical_fields() {
    // Same identity fields, same nonce, same hashkey: byte-identical notes
    // with byte-identical seals. The seal depends only on the sealed bytes.
    let trust_root = NoteKeypair::from_seed(&[1u8; 32]);
    let mint = NoteKeypair::from_seed(&[2u8; 32]);
    let charter = trust_root.sign(&mint.public_key_bytes());

    let build = || {
        InitSectionBuilder::new()
            .isocode(b"XTS")
            .serial_padded("TS001")
            .denomination(0, 10_000, 0)
            .mint_pk(&mint.public_key_bytes())
            .mint_pk_crsig(charter.as_bytes())
            .nonce(&[0x13, 0x37, 0xC0, 0xDE])
            .hashkey(&[0x42u8; 64])
            .build()
            .expect("valid fields")
            .seal()
    };

    let a = build();
    let b = build();
    assert_eq!(a.bytes, b.bytes);
    assert_eq!(a.digest_hex, b.digest_hex);
}

#[test]
fn parse_recovers_every_identity_field() {
    let (sealed, _trust_root, mint) = mint_test_note();
    let init = InitSection::parse(&sealed.bytes).expect("sealed note parses");

    assert_eq!(init.isocode.as_bytes(), b"XTS");
    assert_eq!(init.serial.to_string(), "TS001********");
    assert_eq!(init.denomination.amount(), 10_000);
    assert_eq!(init.denomination.decimal_place(), 0);
    assert_eq!(init.mint_pk, mint.public_key());
}

// ---------------------------------------------------------------------------
// 2. Seal Sensitivity
// ---------------------------------------------------------------------------

#[test]
fn every_sealed_byte_is_load_bearing() {
    // Flip one bit in each byte of the sealed prefix; every single
    // corruption must be caught by the seal (or by framing, for the
    // header bytes).
    let (sealed, trust_root, _mint) = mint_test_note();

    for position in 0..192 {
        let mut corrupted = sealed.bytes.clone();
        corrupted[position] ^= 0x01;
        assert!(
            verify(&corrupted, &trust_root.public_key()).is_err(),
            "bit flip at byte {position} went undetected"
        );
    }
}

#[test]
fn corrupting_the_stored_seal_itself_is_detected() {
    let (sealed, trust_root, _mint) = mint_test_note();
    let mut corrupted = sealed.bytes.clone();
    corrupted[200] ^= 0x80; // inside the 64-byte seal
    assert_eq!(
        verify(&corrupted, &trust_root.public_key()),
        Err(VerificationError::IntegritySealBroken)
    );
}

// ---------------------------------------------------------------------------
// 3. Custody Chain Growth
// ---------------------------------------------------------------------------

#[test]
fn ten_transfers_through_ten_holders() {
    let (sealed, trust_root, mint) = mint_test_note();

    let holders: Vec<NoteKeypair> = (0..10).map(|_| NoteKeypair::generate()).collect();
    let mut note = transfer(&sealed.bytes, &holders[0], &mint);
    for pair in holders.windows(2) {
        note = transfer(&note, &pair[1], &pair[0]);
    }

    assert_eq!(note.len(), 256 + 10 * 116);
    let report = verify(&note, &trust_root.public_key()).expect("honest chain");
    assert_eq!(report.confirmed_checkpoints, 10);
    assert_eq!(report.custodian, holders[9].public_key());
}

#[test]
fn each_transfer_leaves_the_prior_stream_as_a_prefix() {
    let (sealed, _trust_root, mint) = mint_test_note();
    let holder = NoteKeypair::generate();

    let once = transfer(&sealed.bytes, &holder, &mint);
    let twice = transfer(&once, &holder, &holder);

    assert_eq!(&once[..256], &sealed.bytes[..]);
    assert_eq!(&twice[..once.len()], &once[..]);
}

// ---------------------------------------------------------------------------
// 4. Tampering After Transfer
// ---------------------------------------------------------------------------

#[test]
fn rewriting_history_breaks_the_first_covering_checkpoint() {
    let (sealed, trust_root, mint) = mint_test_note();
    let alice = NoteKeypair::generate();
    let bob = NoteKeypair::generate();

    let mut note = transfer(&sealed.bytes, &alice, &mint);
    note = transfer(&note, &bob, &alice);
    note = transfer(&note, &bob, &bob);

    // Swap checkpoint 0's published custodian for an attacker key. The
    // seal doesn't cover checkpoints, but checkpoint 0's own signature
    // does, so the chain breaks right there.
    let attacker = NoteKeypair::generate();
    note[276..308].copy_from_slice(attacker.public_key().as_bytes());

    assert_eq!(
        verify(&note, &trust_root.public_key()),
        Err(VerificationError::ChainBroken { index: 0 })
    );
}

#[test]
fn a_checkpoint_cannot_be_excised() {
    // Dropping the last checkpoint yields a shorter but still well-formed
    // stream, and it verifies — with one fewer confirmation. The format
    // can't stop prefix truncation; holders compare confirmed counts.
    let (sealed, trust_root, mint) = mint_test_note();
    let alice = NoteKeypair::generate();

    let one = transfer(&sealed.bytes, &alice, &mint);
    let two = transfer(&one, &alice, &alice);

    let truncated = &two[..two.len() - 116];
    let report = verify(truncated, &trust_root.public_key()).expect("prefix is valid");
    assert_eq!(report.confirmed_checkpoints, 1);

    // But cutting mid-checkpoint is always malformed.
    let ragged = &two[..two.len() - 57];
    assert!(matches!(
        verify(ragged, &trust_root.public_key()),
        Err(VerificationError::TruncatedCheckpoint { index: 1, .. })
    ));
}

// ---------------------------------------------------------------------------
// 5. Trust Boundaries
// ---------------------------------------------------------------------------

#[test]
fn notes_from_an_unchartered_mint_are_rejected() {
    // A mint that signs its own charter instead of being chartered by the
    // trust root produces internally consistent bytes that verify against
    // nothing.
    let trust_root = NoteKeypair::generate();
    let rogue_mint = NoteKeypair::generate();
    let self_charter = rogue_mint.sign(&rogue_mint.public_key_bytes());

    let sealed = InitSectionBuilder::new()
        .isocode(b"XTS")
        .serial_padded("FAKE1")
        .denomination(0, 50_000, 2)
        .mint_pk(&rogue_mint.public_key_bytes())
        .mint_pk_crsig(self_charter.as_bytes())
        .nonce(&random_nonce())
        .hashkey(&[0u8; 64])
        .build()
        .expect("structurally valid")
        .seal();

    assert_eq!(
        verify(&sealed.bytes, &trust_root.public_key()),
        Err(VerificationError::UntrustedMint)
    );
}

#[test]
fn a_spent_note_cannot_be_respent_by_its_old_holder() {
    let (sealed, trust_root, mint) = mint_test_note();
    let alice = NoteKeypair::generate();
    let bob = NoteKeypair::generate();
    let carol = NoteKeypair::generate();

    // mint -> alice -> bob, then alice tries to spend to carol anyway.
    let mut note = transfer(&sealed.bytes, &alice, &mint);
    note = transfer(&note, &bob, &alice);
    let double_spend = transfer(&note, &carol, &alice);

    assert_eq!(
        verify(&double_spend, &trust_root.public_key()),
        Err(VerificationError::ChainBroken { index: 2 })
    );
}
