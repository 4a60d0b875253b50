//! Custody-transfer checkpoints: the append-only spine of a note's history.
//!
//! Appending is a separate step from minting for the same reason signing
//! is separate from building a payment: the key that countersigns a
//! transfer usually isn't in the process that assembled the bytes.
//!
//! The one load-bearing rule: a checkpoint's signature covers the *entire*
//! note byte stream from offset 0, not just the checkpoint's own fields.
//! Flip any historical byte and every signature downstream of it dies.
//! That is what makes the chain tamper-evident in a single linear pass,
//! and it is why the note must be kept as one contiguous buffer — never a
//! tree, never a list of deltas.
//!
//! There is no remove and no undo. A checkpoint append consumes the old
//! byte stream and produces a new, longer, immutable one.

use serde::{Deserialize, Serialize};

use crate::config::{
    CHECKPOINT_BODY_LEN, CHECKPOINT_TOTAL_LEN, NONCE_LEN, PUBLIC_KEY_LEN, TIMESTAMP_LEN,
};
use crate::crypto::keys::{NoteKeypair, NotePublicKey, NoteSignature};
use crate::note::section::{encode_header, SectionKind};

/// A decoded custody-transfer record.
///
/// `timestamp` and `nonce` are opaque here: the core neither interprets
/// nor validates them beyond width. The 12 timestamp bytes come from a
/// trusted time source (TAI64N in practice, see [`crate::sources`]), the
/// 4 nonce bytes from a CSPRNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Reserved section-header flags, round-tripped unchanged.
    pub flags: u8,
    /// Opaque 12-byte transfer timestamp.
    pub timestamp: [u8; TIMESTAMP_LEN],
    /// Four random bytes.
    pub nonce: [u8; NONCE_LEN],
    /// The new custodian's public key. After this checkpoint, this is the
    /// only key authorized to sign the next one.
    pub publickey: NotePublicKey,
    /// Ed25519 signature over every note byte from offset 0 up to (but
    /// excluding) this field.
    pub signature: NoteSignature,
}

impl Checkpoint {
    /// Decode a checkpoint from its fixed 112-byte body.
    ///
    /// Framing (the section header) is the caller's job; this only slices
    /// the body at the format's fixed offsets.
    pub fn from_body(flags: u8, body: &[u8; CHECKPOINT_BODY_LEN as usize]) -> Self {
        let (timestamp, rest) = body.split_at(TIMESTAMP_LEN);
        let (nonce, rest) = rest.split_at(NONCE_LEN);
        let (publickey, signature) = rest.split_at(PUBLIC_KEY_LEN);

        Self {
            flags,
            timestamp: timestamp.try_into().expect("split_at(12) yields 12 bytes"),
            nonce: nonce.try_into().expect("split_at(4) yields 4 bytes"),
            publickey: NotePublicKey::from_bytes(
                publickey.try_into().expect("split_at(32) yields 32 bytes"),
            ),
            signature: NoteSignature::from_bytes(
                signature.try_into().expect("remainder is 64 bytes"),
            ),
        }
    }
}

/// Append a signed custody-transfer checkpoint to a note.
///
/// Appends the section header, the timestamp / nonce fields, and the
/// **new custodian's** public key; signs the entire intermediate buffer
/// from byte 0 with the signer's key; appends the 64-byte signature.
/// The result is `note_bytes` extended by exactly 116 bytes; the input
/// is not mutated.
///
/// Two parties appear here, and for everything but the first handoff
/// they are different people. `signer` is the *current* custodian — the
/// holder of the key published by the previous checkpoint, or the mint
/// for checkpoint zero. `new_custodian` is whoever custody moves to;
/// only their public key is needed, because accepting a note requires no
/// signature, only spending it does. A mint activating a fresh note
/// passes its own key for both roles.
///
/// This is a pure append primitive. It does **not** re-validate the
/// prefix — handing it garbage produces well-framed garbage. Callers are
/// responsible for appending only to previously verified notes (an init
/// section plus zero or more valid checkpoints), and for holding whatever
/// exclusive lease on the note's tail their storage layer requires;
/// verification of the whole chain lives in
/// [`crate::note::verification::verify`], including the rule that makes
/// `signer` matter: a checkpoint signed by anyone other than the current
/// custodian is a broken chain, not a transfer.
pub fn append_checkpoint(
    note_bytes: &[u8],
    timestamp: &[u8; TIMESTAMP_LEN],
    nonce: &[u8; NONCE_LEN],
    new_custodian: &NotePublicKey,
    signer: &NoteKeypair,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(note_bytes.len() + CHECKPOINT_TOTAL_LEN);
    out.extend_from_slice(note_bytes);
    out.extend_from_slice(&encode_header(SectionKind::Checkpoint, 0, CHECKPOINT_BODY_LEN));
    out.extend_from_slice(timestamp);
    out.extend_from_slice(nonce);
    out.extend_from_slice(new_custodian.as_bytes());

    // The signature covers everything appended so far, history included.
    let signature = signer.sign(&out);
    out.extend_from_slice(signature.as_bytes());

    debug_assert_eq!(out.len(), note_bytes.len() + CHECKPOINT_TOTAL_LEN);
    out
}
