//! Note verification: the whole read path in one deterministic pass.
//!
//! Given a byte stream and the trust root's public key, [`verify`] checks
//! everything the format promises: framing, the init seal, the mint's
//! charter, and every checkpoint signature against the authorized signer
//! chain. The checks run cheapest-first so obviously broken notes waste
//! minimal CPU.
//!
//! Verification is total and read-only: the same bytes and trust root
//! always produce the same result, nothing is mutated, nothing is
//! retried (re-verifying the same signature over the same bytes cannot
//! change the outcome), and failures are returned, never thrown at the
//! process.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{
    CHECKPOINT_TOTAL_LEN, INIT_NOTE_LEN, SECTION_HEADER_LEN, SIGNATURE_LEN,
};
use crate::crypto::keys::NotePublicKey;
use crate::crypto::signatures::verify_raw;
use crate::note::checkpoint::Checkpoint;
use crate::note::init::{DecodeError, InitSection};
use crate::note::section::{decode_header, expect_length, FormatError, SectionKind};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while verifying a full note.
///
/// The taxonomy matters: a [`Format`](Self::Format) failure means the
/// bytes aren't a note at all; [`IntegritySealBroken`](Self::IntegritySealBroken)
/// and [`ChainBroken`](Self::ChainBroken) mean corruption or tampering;
/// [`UntrustedMint`](Self::UntrustedMint) means the bytes are internally
/// self-consistent but nobody we trust chartered that mint.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerificationError {
    /// Bad magic, bad version, unknown section type, or a length that
    /// doesn't match its type's constant.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The init section decodes but its fields or extent are wrong
    /// (truncated buffer, zero denomination, bad serial alphabet).
    #[error("malformed init section: {0}")]
    MalformedInit(DecodeError),

    /// The recomputed keyed digest does not match the init section's
    /// stored seal.
    #[error("integrity seal broken: init section bytes are corrupted")]
    IntegritySealBroken,

    /// `mint_pk_crsig` is not a valid trust-root signature over `mint_pk`.
    #[error("untrusted mint: key is not chartered by the supplied trust root")]
    UntrustedMint,

    /// A non-checkpoint section appeared after the init section.
    #[error("unexpected {found} section at offset {offset}")]
    UnexpectedSection { found: SectionKind, offset: usize },

    /// The buffer ends in the middle of checkpoint `index`.
    #[error("truncated checkpoint {index}: need {needed} bytes, {available} available")]
    TruncatedCheckpoint {
        index: usize,
        needed: usize,
        available: usize,
    },

    /// Checkpoint `index` fails signature verification against the
    /// authorized signer (the previous checkpoint's key, or the mint's
    /// for checkpoint 0). Every later checkpoint is transitively invalid,
    /// so the walk stops here.
    #[error("custody chain broken at checkpoint {index}")]
    ChainBroken { index: usize },
}

impl From<DecodeError> for VerificationError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Format(f) => Self::Format(f),
            DecodeError::IntegritySealBroken => Self::IntegritySealBroken,
            other => Self::MalformedInit(other),
        }
    }
}

// ---------------------------------------------------------------------------
// VerificationReport
// ---------------------------------------------------------------------------

/// The outcome of a successful verification pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Always `true` for a report produced by [`verify`] — failures are
    /// returned as [`VerificationError`] instead. The field exists so the
    /// report serializes meaningfully on its own.
    pub valid: bool,
    /// How many checkpoints verified, in order, from the front.
    pub confirmed_checkpoints: usize,
    /// The party currently authorized to append the next checkpoint: the
    /// last checkpoint's public key, or the mint's if there are none.
    pub custodian: NotePublicKey,
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a complete note byte stream against a trust root.
///
/// The checks, in order:
///
/// 1. **Framing** — version header magic and version, init section header
///    and declared length.
/// 2. **Integrity seal** — recompute the keyed BLAKE2b digest over the
///    sealed prefix and compare with the stored seal.
/// 3. **Mint charter** — `mint_pk_crsig` must be a valid signature by
///    `trust_root` over `mint_pk`. This is the note's actual authenticity
///    claim; the seal only proves the bytes weren't mangled.
/// 4. **Checkpoint walk** — each checkpoint's signature is verified over
///    the entire byte prefix ending at its own publickey field, against
///    the signer authorized by the previous checkpoint (the mint for
///    checkpoint 0). The first failure aborts with its index.
///
/// # Errors
///
/// Returns the first failing check as a [`VerificationError`]. A note
/// that fails is wholly failed — there is no partial credit for the
/// checkpoints before the break, because a chain that breaks anywhere
/// proves custody nowhere past that point.
pub fn verify(
    note_bytes: &[u8],
    trust_root: &NotePublicKey,
) -> Result<VerificationReport, VerificationError> {
    // 1–2. Framing and seal, via the init decoder.
    let init = InitSection::parse(note_bytes)?;

    // 3. Mint charter against the trust root.
    verify_raw(
        trust_root.as_bytes(),
        init.mint_pk.as_bytes(),
        init.mint_pk_crsig.as_bytes(),
    )
    .map_err(|_| VerificationError::UntrustedMint)?;

    // 4. Walk the checkpoint chain. `custodian` is whoever the previous
    //    link authorized; it starts at the mint.
    let mut custodian = init.mint_pk;
    let mut offset = INIT_NOTE_LEN;
    let mut index = 0usize;

    while offset < note_bytes.len() {
        let header = decode_header(&note_bytes[offset..])?;
        expect_length(header.kind, header.length)?;
        if header.kind != SectionKind::Checkpoint {
            return Err(VerificationError::UnexpectedSection {
                found: header.kind,
                offset,
            });
        }

        let end = offset + CHECKPOINT_TOTAL_LEN;
        if note_bytes.len() < end {
            return Err(VerificationError::TruncatedCheckpoint {
                index,
                needed: end - offset,
                available: note_bytes.len() - offset,
            });
        }

        let body: &[u8; 112] = note_bytes[offset + SECTION_HEADER_LEN..end]
            .try_into()
            .expect("checkpoint body span is exactly 112 bytes");
        let checkpoint = Checkpoint::from_body(header.flags, body);

        // The signature covers everything from byte 0 up to (but
        // excluding) the signature field itself.
        let covered = &note_bytes[..end - SIGNATURE_LEN];
        if verify_raw(custodian.as_bytes(), covered, checkpoint.signature.as_bytes()).is_err() {
            return Err(VerificationError::ChainBroken { index });
        }

        trace!(index, custodian = %checkpoint.publickey, "checkpoint verified");
        custodian = checkpoint.publickey;
        index += 1;
        offset = end;
    }

    debug!(
        confirmed_checkpoints = index,
        custodian = %custodian,
        "note verified"
    );

    Ok(VerificationReport {
        valid: true,
        confirmed_checkpoints: index,
        custodian,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
