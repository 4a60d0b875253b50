//! # Format Constants
//!
//! Every magic number in the SigNote wire format lives here. If you're
//! hardcoding a constant somewhere else, you're doing it wrong and you owe
//! the team coffee.
//!
//! These values define the note format itself. Changing them invalidates
//! every note ever printed, so treat this file like the engraving plates
//! it effectively is.

// ---------------------------------------------------------------------------
// Version Header
// ---------------------------------------------------------------------------

/// The two magic bytes that open every SigNote. "SN" — short enough to
/// check with a single 16-bit compare, distinctive enough to reject
/// non-note bytes before parsing anything else.
pub const NOTE_MAGIC: [u8; 2] = *b"SN";

/// Current format version, encoded big-endian in the two bytes after the
/// magic. Bump on any breaking layout change. There is no negotiation:
/// a verifier either speaks a version or rejects the note.
pub const FORMAT_VERSION: u16 = 1;

/// Total size of the version header (magic + version).
pub const VERSION_HEADER_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Section Headers
// ---------------------------------------------------------------------------

/// Size of the generic section header: type (1) + flags (1) + length (2, BE).
pub const SECTION_HEADER_LEN: usize = 4;

/// Section type byte for the init section. Appears exactly once, immediately
/// after the version header.
pub const SECTION_TYPE_INIT: u8 = 0x00;

/// Section type byte for a custody-transfer checkpoint. Zero or more,
/// always appended after the previous section.
pub const SECTION_TYPE_CHECKPOINT: u8 = 0xFF;

/// Fixed body length of the init section. The length field in the header
/// exists for future extension; today it must equal this constant exactly.
pub const INIT_BODY_LEN: u16 = 248;

/// Fixed body length of a checkpoint section.
pub const CHECKPOINT_BODY_LEN: u16 = 112;

// ---------------------------------------------------------------------------
// Init Section field widths
// ---------------------------------------------------------------------------

/// ISO 4217-style currency code. Three ASCII bytes, e.g. `USD`, `JPY`,
/// or `XTS` for testing.
pub const ISOCODE_LEN: usize = 3;

/// Serial number: 13 bytes drawn from A–Z, 0–9, right-padded with `*`.
pub const SEQNUM_LEN: usize = 13;

/// The padding byte used to fill short serial numbers out to
/// [`SEQNUM_LEN`]. An asterisk, 0x2A.
pub const SEQNUM_PAD: u8 = b'*';

/// Ed25519 public key length. 32 bytes, always.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 signature length. 64 bytes. If yours isn't, something has gone
/// terribly wrong.
pub const SIGNATURE_LEN: usize = 64;

/// Nonce width for both the init section and checkpoints. Four random
/// bytes — a uniqueness aid, never validated.
pub const NONCE_LEN: usize = 4;

/// The keyed-digest key embedded in the note. Up to 64 bytes of key
/// material (BLAKE2b's maximum key size), stored at full width.
pub const HASHKEY_LEN: usize = 64;

/// Output width of the keyed integrity seal. BLAKE2b at its widest.
pub const SEAL_LEN: usize = 64;

/// Byte count the seal covers, from offset 0 of the note: version header +
/// section header + every body field up to and including the hash key.
/// Everything except the trailing seal itself.
pub const SEALED_PREFIX_LEN: usize =
    VERSION_HEADER_LEN + SECTION_HEADER_LEN + INIT_BODY_LEN as usize - SEAL_LEN;

/// Total size of a freshly minted note: version header + section header +
/// init body. 256 bytes on the nose.
pub const INIT_NOTE_LEN: usize = VERSION_HEADER_LEN + SECTION_HEADER_LEN + INIT_BODY_LEN as usize;

// ---------------------------------------------------------------------------
// Checkpoint field widths
// ---------------------------------------------------------------------------

/// TAI64N timestamp width. Eight bytes of seconds, four of nanoseconds.
pub const TIMESTAMP_LEN: usize = 12;

/// Bytes a single checkpoint adds to a note: section header + body.
pub const CHECKPOINT_TOTAL_LEN: usize = SECTION_HEADER_LEN + CHECKPOINT_BODY_LEN as usize;

// ---------------------------------------------------------------------------
// Lifetime
// ---------------------------------------------------------------------------

/// Default spend-by horizon: six months, in seconds. The core never
/// interprets timestamps; this constant exists so issuers computing a
/// spend-by limit all agree on what "six months" means.
pub const SPEND_BY_OFFSET_SECONDS: i64 = 15_778_463;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_field_widths_sum_to_body_length() {
        let body = ISOCODE_LEN
            + SEQNUM_LEN
            + 1 // denomination flags
            + 2 // denomination
            + 1 // decimal place
            + PUBLIC_KEY_LEN
            + SIGNATURE_LEN // mint_pk_crsig
            + NONCE_LEN
            + HASHKEY_LEN
            + SEAL_LEN;
        assert_eq!(body, INIT_BODY_LEN as usize);
    }

    #[test]
    fn checkpoint_field_widths_sum_to_body_length() {
        let body = TIMESTAMP_LEN + NONCE_LEN + PUBLIC_KEY_LEN + SIGNATURE_LEN;
        assert_eq!(body, CHECKPOINT_BODY_LEN as usize);
    }

    #[test]
    fn init_note_is_exactly_256_bytes() {
        assert_eq!(INIT_NOTE_LEN, 256);
    }

    #[test]
    fn sealed_prefix_stops_at_the_seal() {
        assert_eq!(SEALED_PREFIX_LEN, INIT_NOTE_LEN - SEAL_LEN);
        assert_eq!(SEALED_PREFIX_LEN, 192);
    }
}
