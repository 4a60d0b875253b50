//! # Integrity Seal
//!
//! The keyed digest that closes every init section: BLAKE2b with a 64-byte
//! output, keyed with the hash key embedded in the note itself.
//!
//! ## This is a tamper-evident sticker, not a lock
//!
//! The key travels *inside* the note, eight bytes upstream of the digest it
//! keys. Anyone who can read the note can recompute the seal, so it proves
//! nothing about who produced the bytes. What it does do — and does well —
//! is catch accidental corruption and transcription errors anywhere in the
//! sealed prefix. Authenticity of the mint is a separate claim, carried by
//! the trust root's Ed25519 signature over the mint key.
//!
//! Do not "upgrade" this to a secret-keyed MAC. That would silently change
//! the documented trust model, and downstream verifiers that only hold the
//! note bytes would stop being able to check the seal at all.
//!
//! ## Why BLAKE2b and not BLAKE3?
//!
//! The format calls for a 64-byte digest keyed with up to 64 bytes of key
//! material. BLAKE2b supports exactly that natively (keys up to 64 bytes,
//! digests up to 64 bytes). BLAKE3's keyed mode takes precisely 32 key
//! bytes, which doesn't fit the wire format, and truncating the embedded
//! key would change every digest in circulation.

use blake2b_simd::Params as Blake2bParams;

use crate::config::SEAL_LEN;

/// Compute the 64-byte keyed seal over `data`.
///
/// `key` may be any length from 0 to 64 bytes; the init section stores it
/// at its full 64-byte width, but the primitive itself doesn't care.
///
/// # Panics
///
/// Panics if `key` exceeds 64 bytes — that's a programming error, not an
/// input error, since every caller in this crate passes a fixed-width
/// field.
///
/// # Example
///
/// ```
/// use signote_protocol::crypto::seal::seal;
///
/// let digest = seal(b"sealed prefix bytes", b"the embedded hash key");
/// assert_eq!(digest.len(), 64);
/// ```
pub fn seal(data: &[u8], key: &[u8]) -> [u8; SEAL_LEN] {
    let hash = Blake2bParams::new()
        .hash_length(SEAL_LEN)
        .key(key)
        .hash(data);
    let mut out = [0u8; SEAL_LEN];
    out.copy_from_slice(hash.as_bytes());
    out
}

/// Compute the keyed seal and render it as lowercase hex.
///
/// 128 characters. This is the note's human-facing serial digest — the
/// string an issuer prints, displays, or reads over the phone.
pub fn seal_hex(data: &[u8], key: &[u8]) -> String {
    hex::encode(seal(data, key))
}

/// Constant-time-ish comparison of a computed seal against the 64 bytes
/// stored in a note.
///
/// The seal detects corruption, not adversaries, so a short-circuiting
/// comparison would be fine. We still compare the whole width because it
/// costs nothing and avoids explaining ourselves in every audit.
pub fn seal_matches(computed: &[u8; SEAL_LEN], stored: &[u8]) -> bool {
    if stored.len() != SEAL_LEN {
        return false;
    }
    let mut diff = 0u8;
    for (a, b) in computed.iter().zip(stored) {
        diff |= a ^ b;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_is_deterministic() {
        let a = seal(b"note bytes", b"key");
        let b = seal(b"note bytes", b"key");
        assert_eq!(a, b);
    }

    #[test]
    fn different_data_different_seal() {
        assert_ne!(seal(b"note bytes", b"key"), seal(b"Note bytes", b"key"));
    }

    #[test]
    fn different_key_different_seal() {
        assert_ne!(seal(b"note bytes", b"key1"), seal(b"note bytes", b"key2"));
    }

    #[test]
    fn empty_key_is_plain_blake2b() {
        // With no key, the output must equal unkeyed BLAKE2b-512.
        let sealed = seal(b"data", b"");
        let plain = Blake2bParams::new().hash_length(64).hash(b"data");
        assert_eq!(&sealed[..], plain.as_bytes());
    }

    #[test]
    fn full_width_key_accepted() {
        let key = [0x55u8; 64];
        let digest = seal(b"data", &key);
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn hex_is_128_chars() {
        let h = seal_hex(b"data", b"key");
        assert_eq!(h.len(), 128);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn single_bit_flip_changes_seal() {
        let mut data = b"a run of perfectly ordinary bytes".to_vec();
        let before = seal(&data, b"key");
        data[7] ^= 0x01;
        let after = seal(&data, b"key");
        assert_ne!(before, after);
    }

    #[test]
    fn seal_matches_detects_mismatch() {
        let digest = seal(b"data", b"key");
        assert!(seal_matches(&digest, &digest));

        let mut corrupted = digest;
        corrupted[63] ^= 0x80;
        assert!(!seal_matches(&digest, &corrupted));
        assert!(!seal_matches(&digest, &digest[..63]));
    }
}
