//! # Digital Signatures
//!
//! Ed25519 signing and verification — the backbone of authority in a
//! SigNote. The trust root signs mint keys, the mint signs the first
//! checkpoint, and every custodian after that signs the growing note.
//!
//! ## Why not just use ed25519-dalek directly?
//!
//! We could, and the key wrappers do. But funnelling the raw-byte paths
//! through here gives us:
//!
//! 1. A single place to audit every verification the format performs.
//! 2. Consistent error types across the codebase.
//! 3. Type safety — you can't accidentally pass a seal digest where a
//!    signature goes.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use thiserror::Error;

use super::keys::{NoteKeypair, NotePublicKey, NoteSignature};

/// Errors during signature operations.
///
/// Intentionally vague — we don't tell attackers why verification failed.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Sign a message using a keypair.
///
/// Produces a 64-byte Ed25519 signature over the given message bytes.
/// Deterministic per RFC 8032 — signing the same bytes with the same key
/// always yields the same signature.
pub fn sign(keypair: &NoteKeypair, message: &[u8]) -> NoteSignature {
    keypair.sign(message)
}

/// Verify an Ed25519 signature against a public key and message.
///
/// Returns `true` if the signature is valid, `false` otherwise. We don't
/// distinguish "invalid signature" from "wrong public key" — both are
/// just "nope."
pub fn verify(public_key: &NotePublicKey, message: &[u8], signature: &NoteSignature) -> bool {
    public_key.verify(message, signature)
}

/// Verify a signature using raw byte components.
///
/// This is the "I pulled these bytes out of a note and need to check them"
/// variant, used by the verifier when walking the checkpoint chain where
/// everything is a fixed-width byte slice.
pub fn verify_raw(
    public_key_bytes: &[u8; 32],
    message: &[u8],
    signature_bytes: &[u8; 64],
) -> Result<(), SignatureError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key_bytes).map_err(|_| SignatureError::InvalidPublicKey)?;

    let signature = DalekSignature::from_bytes(signature_bytes);

    verifying_key
        .verify(message, &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}
