//! # Key Management
//!
//! Ed25519 keypair handling for every party that touches a SigNote: the
//! trust root that charters mints, the mints that print notes, and the
//! custodians that countersign transfers.
//!
//! ## Why Ed25519?
//!
//! - Deterministic signatures (no k-value footguns like ECDSA).
//! - 128-bit security level in 32+32 bytes. Compact enough to embed a
//!   public key in every checkpoint without bloating the note.
//! - Constant-time implementations exist and are well-audited.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, ed25519-dalek).
//! - Key generation uses OS-level RNG (`OsRng`). If your OS RNG is broken,
//!   you have bigger problems than counterfeit notes.
//! - Secret key bytes are never logged. If you add logging to this module,
//!   you will be asked to leave.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors that can occur during key operations.
///
/// Intentionally vague about *why* something failed — leaking details about
/// key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("invalid signature bytes: expected 64 bytes")]
    InvalidSignature,
}

/// An Ed25519 keypair held by a trust root, a mint, or a custodian.
///
/// Whoever holds the signing half of the most recently published checkpoint
/// key holds custody of the note. Guard it accordingly.
///
/// ## Serialization
///
/// `NoteKeypair` intentionally does NOT implement `Serialize`/`Deserialize`.
/// Serializing private keys should be a deliberate, conscious act, not
/// something that happens because someone shoved a keypair into a JSON
/// response. Use `secret_key_bytes()` / `from_seed()` explicitly.
///
/// # Examples
///
/// ```
/// use signote_protocol::crypto::keys::NoteKeypair;
///
/// let kp = NoteKeypair::generate();
/// let sig = kp.sign(b"note bytes");
/// assert!(kp.public_key().verify(b"note bytes", &sig));
/// ```
pub struct NoteKeypair {
    signing_key: SigningKey,
}

/// The public half of an identity, safe to share with the world.
///
/// This is the 32-byte value that gets embedded verbatim in the note:
/// as `mint_pk` in the init section, or as `publickey` in a checkpoint.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over some span of note bytes.
///
/// 64 bytes, deterministic for a given (key, message) pair. Wraps the raw
/// array so call sites can't confuse a signature with a seal digest —
/// both are 64 bytes, only one of them proves who signed.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSignature {
    // Serialized as hex: serde's derived array support stops at 32
    // elements, and a hex string is friendlier in JSON anyway.
    #[serde(with = "hex::serde")]
    bytes: [u8; 64],
}

impl NoteKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Constructs a keypair deterministically from a 32-byte seed.
    ///
    /// Useful for deriving keypairs from KDFs or recovered secrets, and for
    /// reproducible tests. **Warning**: a weak seed makes a weak key.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a keypair from a hex-encoded secret key.
    ///
    /// Convenience for loading key material from configuration in dev
    /// setups. Production key storage is the caller's problem, and hex in
    /// a config file is not a solution to it.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::InvalidSecretKey);
        }
        let mut arr = [0u8; SECRET_KEY_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self::from_seed(&arr))
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> NotePublicKey {
        NotePublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// The raw 32-byte public key, exactly as it appears in the wire format.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign a message and return a `NoteSignature`.
    ///
    /// Ed25519 signatures are deterministic — the same (key, message) pair
    /// always produces the same signature. No nonce games, no randomness
    /// needed at signing time.
    pub fn sign(&self, message: &[u8]) -> NoteSignature {
        NoteSignature {
            bytes: self.signing_key.sign(message).to_bytes(),
        }
    }

    /// Exports the raw 32-byte secret key material.
    ///
    /// **Handle with extreme care.** This is the only secret standing
    /// between an attacker and custody of every note this key controls.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }
}

impl Clone for NoteKeypair {
    /// Cloning a keypair is allowed but should make you uncomfortable.
    /// Every copy of a private key is another thing to protect.
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for NoteKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material in debug output. Not even
        // "partially" — a partial leak is still a leak.
        write!(f, "NoteKeypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for NoteKeypair {
    /// Two keypairs are equal if their public keys match. Comparing secret
    /// material in a non-constant-time way is a bad habit, and for identity
    /// purposes the public key is what matters.
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for NoteKeypair {}

// ---------------------------------------------------------------------------
// NotePublicKey
// ---------------------------------------------------------------------------

impl NotePublicKey {
    /// Create a `NotePublicKey` from raw bytes.
    ///
    /// No curve validation happens here — this is the "I copied 32 bytes
    /// out of a note" constructor, and verification against garbage bytes
    /// simply returns `false`. Use [`try_from_slice`](Self::try_from_slice)
    /// when you want point validation up front.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Try to create a `NotePublicKey` from a byte slice, validating both
    /// the length and that the bytes decompress to an Ed25519 point.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != 32 {
            return Err(KeyError::InvalidPublicKey);
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verify a signature against this public key.
    ///
    /// Returns `true` if the signature is valid, `false` otherwise. A
    /// boolean (rather than `Result`) because the vast majority of callers
    /// just want a yes/no answer, and an error oracle on the failure mode
    /// helps nobody but attackers.
    pub fn verify(&self, message: &[u8], signature: &NoteSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(&signature.bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }

    /// Hex-encoded representation. 64 characters for 32 bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key string.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        if bytes.len() != 32 {
            return Err(KeyError::InvalidPublicKey);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { bytes: arr })
    }
}

impl Hash for NotePublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for NotePublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for NotePublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NotePublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// NoteSignature
// ---------------------------------------------------------------------------

impl NoteSignature {
    /// Create a signature from its raw 64-byte representation.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self { bytes }
    }

    /// Try to create a signature from a byte slice. Fails on any length
    /// other than 64 — there is no such thing as a short Ed25519 signature.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 64] = slice.try_into().map_err(|_| KeyError::InvalidSignature)?;
        Ok(Self { bytes })
    }

    /// Returns the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.bytes
    }

    /// Returns the hex-encoded signature string. 128 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Display for NoteSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for NoteSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "NoteSignature({}...{})", &hex_str[..8], &hex_str[120..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_valid_keypair() {
        let kp = NoteKeypair::generate();
        assert_eq!(kp.public_key_bytes().len(), 32);
        assert_eq!(kp.secret_key_bytes().len(), 32);
    }

    #[test]
    fn sign_verify_roundtrip() {
        let kp = NoteKeypair::generate();
        let msg = b"256 bytes of freshly minted note";
        let sig = kp.sign(msg);
        assert!(kp.public_key().verify(msg, &sig));
    }

    #[test]
    fn wrong_message_fails_verification() {
        let kp = NoteKeypair::generate();
        let sig = kp.sign(b"correct message");
        assert!(!kp.public_key().verify(b"wrong message", &sig));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let kp1 = NoteKeypair::generate();
        let kp2 = NoteKeypair::generate();
        let sig = kp1.sign(b"message");
        assert!(!kp2.public_key().verify(b"message", &sig));
    }

    #[test]
    fn deterministic_from_seed() {
        let seed = [42u8; 32];
        let kp1 = NoteKeypair::from_seed(&seed);
        let kp2 = NoteKeypair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());
    }

    #[test]
    fn secret_key_roundtrip() {
        let kp = NoteKeypair::generate();
        let restored = NoteKeypair::from_seed(&kp.secret_key_bytes());
        assert_eq!(kp.public_key(), restored.public_key());
    }

    #[test]
    fn keypair_hex_roundtrip() {
        let kp = NoteKeypair::generate();
        let hex_str = hex::encode(kp.secret_key_bytes());
        let restored = NoteKeypair::from_hex(&hex_str).unwrap();
        assert_eq!(kp.public_key(), restored.public_key());
    }

    #[test]
    fn invalid_hex_rejected() {
        assert!(NoteKeypair::from_hex("deadbeef").is_err());
        assert!(NoteKeypair::from_hex("not-hex-at-all").is_err());
    }

    #[test]
    fn public_key_hex_roundtrip() {
        let pk = NoteKeypair::generate().public_key();
        let recovered = NotePublicKey::from_hex(&pk.to_hex()).unwrap();
        assert_eq!(pk, recovered);
    }

    #[test]
    fn public_key_rejects_wrong_length_slice() {
        assert!(NotePublicKey::try_from_slice(&[0u8; 16]).is_err());
    }

    #[test]
    fn garbage_key_bytes_never_verify() {
        // A key nobody holds the secret for can't validate anything.
        let kp = NoteKeypair::generate();
        let sig = kp.sign(b"message");
        let garbage = NotePublicKey::from_bytes([0u8; 32]);
        assert!(!garbage.verify(b"message", &sig));
    }

    #[test]
    fn two_generated_keypairs_are_different() {
        // If this fails, your RNG is broken and you should panic (the
        // emotion, not the macro).
        let kp1 = NoteKeypair::generate();
        let kp2 = NoteKeypair::generate();
        assert_ne!(kp1.public_key_bytes(), kp2.public_key_bytes());
    }

    #[test]
    fn deterministic_signatures() {
        // Ed25519 is deterministic — same key + same message = same
        // signature. This is a feature, not a bug.
        let kp = NoteKeypair::generate();
        let sig1 = kp.sign(b"determinism is underrated");
        let sig2 = kp.sign(b"determinism is underrated");
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn signature_slice_roundtrip() {
        let kp = NoteKeypair::generate();
        let sig = kp.sign(b"test");
        let recovered = NoteSignature::try_from_slice(sig.as_bytes()).unwrap();
        assert_eq!(sig, recovered);
        assert!(NoteSignature::try_from_slice(&[0u8; 63]).is_err());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = NoteKeypair::generate();
        let debug_str = format!("{:?}", kp);
        assert!(debug_str.starts_with("NoteKeypair(pub="));
        assert!(!debug_str.contains("signing_key"));
    }
}
