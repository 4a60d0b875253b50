//! Init section construction and parsing.
//!
//! A note is born here: the immutable founding section carrying the
//! currency identity, the mint's chartered public key, and the keyed
//! integrity seal. From the moment [`InitSection::seal`] returns, those
//! 256 bytes never change — custody transfers only ever append.
//!
//! The builder does not sign anything and holds no key material beyond
//! the public values that land on the wire. The trust-root signature over
//! the mint key is produced elsewhere (by the trust root, which is the
//! point) and arrives here as 64 opaque bytes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{
    HASHKEY_LEN, INIT_BODY_LEN, INIT_NOTE_LEN, NONCE_LEN, PUBLIC_KEY_LEN, SEALED_PREFIX_LEN,
    SEAL_LEN, SECTION_HEADER_LEN, SIGNATURE_LEN, VERSION_HEADER_LEN,
};
use crate::crypto::keys::{NotePublicKey, NoteSignature};
use crate::crypto::seal::{seal, seal_matches};
use crate::note::section::{
    decode_header, decode_version_header, encode_header, encode_version_header, expect_length,
    FormatError, SectionKind,
};
use crate::note::types::{Denomination, IsoCode, SerialNumber, ValidationError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors while decoding an init section from bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The framing is wrong: bad magic, bad version, unknown section type,
    /// or a declared length that doesn't match the constant.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The buffer ends before the section does.
    #[error("truncated init section: need {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// A well-formed section of the wrong kind sits where the init
    /// section belongs.
    #[error("expected init section immediately after the version header, found {found}")]
    UnexpectedSection { found: SectionKind },

    /// A decoded field violates its constraint (e.g. zero denomination).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The recomputed keyed digest does not match the stored seal. The
    /// sealed prefix has been corrupted somewhere in its 192 bytes.
    #[error("integrity seal broken: stored digest does not match recomputed digest")]
    IntegritySealBroken,
}

// ---------------------------------------------------------------------------
// InitSection
// ---------------------------------------------------------------------------

/// The immutable founding section of a note, in typed form.
///
/// This is the parsed/validated view. The canonical form is always the
/// byte stream — two `InitSection`s are the same note if and only if
/// [`seal`](Self::seal) produces the same 256 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitSection {
    /// Currency code, e.g. `XTS`.
    pub isocode: IsoCode,
    /// The 13-byte printed serial number.
    pub serial: SerialNumber,
    /// Face value, flags, and decimal position.
    pub denomination: Denomination,
    /// Reserved section-header flags. Round-trips unchanged.
    pub section_flags: u8,
    /// The mint's Ed25519 public key, chartered by the trust root.
    pub mint_pk: NotePublicKey,
    /// The trust root's signature over `mint_pk`. This — not the seal —
    /// is what makes the note authentic.
    pub mint_pk_crsig: NoteSignature,
    /// Four random bytes. A uniqueness aid, never validated.
    pub nonce: [u8; NONCE_LEN],
    /// The key for the integrity seal, embedded in the note itself.
    /// Serialized as hex for the same reason signatures are.
    #[serde(with = "hex::serde")]
    pub hashkey: [u8; HASHKEY_LEN],
}

/// The output of sealing an init section: the canonical 256-byte note and
/// the digest rendered as hex for external display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedInit {
    /// Version header + section header + 248-byte body. The note.
    pub bytes: Vec<u8>,
    /// The 128-character hex form of the trailing 64-byte seal.
    pub digest_hex: String,
}

impl InitSection {
    /// Serialize the section and compute the keyed seal.
    ///
    /// Layout, in order: version header, section header (init, declared
    /// length 248), isocode, serial, denomination (flags + amount + decimal),
    /// mint key, trust-root signature, nonce, hash key — then the BLAKE2b
    /// digest of everything so far, keyed with the hash key, as the final
    /// 64 bytes. Total: exactly 256 bytes.
    ///
    /// Pure function of the fields; no side effects beyond allocation.
    pub fn seal(&self) -> SealedInit {
        let mut bytes = Vec::with_capacity(INIT_NOTE_LEN);

        bytes.extend_from_slice(&encode_version_header());
        bytes.extend_from_slice(&encode_header(
            SectionKind::Init,
            self.section_flags,
            INIT_BODY_LEN,
        ));
        bytes.extend_from_slice(self.isocode.as_bytes());
        bytes.extend_from_slice(self.serial.as_bytes());
        bytes.extend_from_slice(&self.denomination.to_wire_bytes());
        bytes.extend_from_slice(self.mint_pk.as_bytes());
        bytes.extend_from_slice(self.mint_pk_crsig.as_bytes());
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.hashkey);

        debug_assert_eq!(bytes.len(), SEALED_PREFIX_LEN);

        let digest = seal(&bytes, &self.hashkey);
        bytes.extend_from_slice(&digest);

        debug_assert_eq!(bytes.len(), INIT_NOTE_LEN);

        SealedInit {
            bytes,
            digest_hex: hex::encode(digest),
        }
    }

    /// Parse and validate the init section at the front of `bytes`.
    ///
    /// The inverse of [`seal`](Self::seal): checks the version header,
    /// the section framing, every field constraint, and finally re-derives
    /// the keyed digest against the stored seal. Bytes past offset 256 are
    /// ignored — that's where checkpoints live, and they belong to the
    /// verifier.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        decode_version_header(bytes)?;

        let header = decode_header(&bytes[VERSION_HEADER_LEN..])?;
        expect_length(header.kind, header.length)?;
        if header.kind != SectionKind::Init {
            return Err(DecodeError::UnexpectedSection { found: header.kind });
        }

        if bytes.len() < INIT_NOTE_LEN {
            return Err(DecodeError::Truncated {
                needed: INIT_NOTE_LEN,
                available: bytes.len(),
            });
        }

        // Fixed offsets within the body, after the two headers.
        let body = &bytes[VERSION_HEADER_LEN + SECTION_HEADER_LEN..INIT_NOTE_LEN];
        let (isocode, rest) = body.split_at(3);
        let (serial, rest) = rest.split_at(13);
        let (denom, rest) = rest.split_at(4);
        let (mint_pk, rest) = rest.split_at(PUBLIC_KEY_LEN);
        let (crsig, rest) = rest.split_at(SIGNATURE_LEN);
        let (nonce, rest) = rest.split_at(NONCE_LEN);
        let (hashkey, stored_seal) = rest.split_at(HASHKEY_LEN);

        let denom_arr: [u8; 4] = denom.try_into().expect("split_at(4) yields 4 bytes");
        let section = Self {
            isocode: IsoCode::new(isocode)?,
            serial: SerialNumber::new(serial)?,
            denomination: Denomination::from_wire_bytes(&denom_arr)?,
            section_flags: header.flags,
            mint_pk: NotePublicKey::from_bytes(
                mint_pk.try_into().expect("split_at(32) yields 32 bytes"),
            ),
            mint_pk_crsig: NoteSignature::from_bytes(
                crsig.try_into().expect("split_at(64) yields 64 bytes"),
            ),
            nonce: nonce.try_into().expect("split_at(4) yields 4 bytes"),
            hashkey: hashkey.try_into().expect("split_at(64) yields 64 bytes"),
        };

        let computed = seal(&bytes[..SEALED_PREFIX_LEN], &section.hashkey);
        if !seal_matches(&computed, stored_seal) {
            return Err(DecodeError::IntegritySealBroken);
        }

        Ok(section)
    }

    /// The stored seal digest of a sealed note, as hex, without reparsing.
    ///
    /// Convenience for display paths that already hold valid note bytes.
    pub fn stored_digest_hex(note_bytes: &[u8]) -> Option<String> {
        let end = INIT_NOTE_LEN;
        if note_bytes.len() < end {
            return None;
        }
        Some(hex::encode(&note_bytes[end - SEAL_LEN..end]))
    }
}

// ---------------------------------------------------------------------------
// InitSectionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder assembling an [`InitSection`] from raw inputs.
///
/// Every byte field is taken as a slice and length-checked at
/// [`build`](Self::build) time, each violation its own
/// [`ValidationError`] variant. Until `build` succeeds, no wire bytes
/// exist.
///
/// # Usage
///
/// ```
/// use signote_protocol::crypto::keys::NoteKeypair;
/// use signote_protocol::note::init::InitSectionBuilder;
///
/// let trust_root = NoteKeypair::generate();
/// let mint = NoteKeypair::generate();
/// let charter = trust_root.sign(&mint.public_key_bytes());
///
/// let sealed = InitSectionBuilder::new()
///     .isocode(b"XTS")
///     .serial_padded("TS001")
///     .denomination(0, 10_000, 0)
///     .mint_pk(&mint.public_key_bytes())
///     .mint_pk_crsig(charter.as_bytes())
///     .nonce(&[0x13, 0x37, 0xC0, 0xDE])
///     .hashkey(b"Bill Gates never said that 640K ought to be enough for anybody!!")
///     .build()
///     .unwrap()
///     .seal();
///
/// assert_eq!(sealed.bytes.len(), 256);
/// assert_eq!(sealed.digest_hex.len(), 128);
/// ```
#[derive(Default)]
pub struct InitSectionBuilder {
    isocode: Vec<u8>,
    serial: Vec<u8>,
    serial_short: Option<String>,
    denomination_flags: u8,
    denomination: u16,
    decimal_place: u8,
    mint_pk: Vec<u8>,
    mint_pk_crsig: Vec<u8>,
    nonce: Vec<u8>,
    hashkey: Vec<u8>,
}

impl InitSectionBuilder {
    /// Creates an empty builder. Every field must be supplied; there are
    /// no defaults for the identity of money.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the 3-byte currency code.
    pub fn isocode(mut self, code: &[u8]) -> Self {
        self.isocode = code.to_vec();
        self
    }

    /// Sets the full-width 13-byte serial number.
    pub fn serial(mut self, serial: &[u8]) -> Self {
        self.serial = serial.to_vec();
        self.serial_short = None;
        self
    }

    /// Sets the serial from a short identifier, padding with `*` at build
    /// time. `"TS001"` becomes `TS001********`.
    pub fn serial_padded(mut self, short: &str) -> Self {
        self.serial_short = Some(short.to_string());
        self
    }

    /// Sets the denomination: reserved flags, non-zero amount, decimal
    /// position.
    pub fn denomination(mut self, flags: u8, amount: u16, decimal_place: u8) -> Self {
        self.denomination_flags = flags;
        self.denomination = amount;
        self.decimal_place = decimal_place;
        self
    }

    /// Sets the mint's 32-byte public key.
    pub fn mint_pk(mut self, key: &[u8]) -> Self {
        self.mint_pk = key.to_vec();
        self
    }

    /// Sets the trust root's 64-byte signature over the mint key.
    pub fn mint_pk_crsig(mut self, sig: &[u8]) -> Self {
        self.mint_pk_crsig = sig.to_vec();
        self
    }

    /// Sets the 4-byte nonce. Callers obtain this from a CSPRNG
    /// (see [`crate::sources::random_nonce`]); the builder takes it as a
    /// plain value so construction stays deterministic and testable.
    pub fn nonce(mut self, nonce: &[u8]) -> Self {
        self.nonce = nonce.to_vec();
        self
    }

    /// Sets the 64-byte seal key that travels inside the note.
    pub fn hashkey(mut self, key: &[u8]) -> Self {
        self.hashkey = key.to_vec();
        self
    }

    /// Validates every field and produces the typed section.
    ///
    /// Each precondition failure is a distinct [`ValidationError`]; the
    /// first one encountered is returned and nothing is serialized.
    pub fn build(self) -> Result<InitSection, ValidationError> {
        let isocode = IsoCode::new(&self.isocode)?;
        let serial = match &self.serial_short {
            Some(short) => SerialNumber::padded(short)?,
            None => SerialNumber::new(&self.serial)?,
        };
        let denomination =
            Denomination::new(self.denomination_flags, self.denomination, self.decimal_place)?;

        let mint_pk: [u8; PUBLIC_KEY_LEN] = self
            .mint_pk
            .as_slice()
            .try_into()
            .map_err(|_| ValidationError::MintKeyLength {
                got: self.mint_pk.len(),
            })?;
        let mint_pk_crsig: [u8; SIGNATURE_LEN] = self
            .mint_pk_crsig
            .as_slice()
            .try_into()
            .map_err(|_| ValidationError::MintSignatureLength {
                got: self.mint_pk_crsig.len(),
            })?;
        let nonce: [u8; NONCE_LEN] = self
            .nonce
            .as_slice()
            .try_into()
            .map_err(|_| ValidationError::NonceLength {
                got: self.nonce.len(),
            })?;
        let hashkey: [u8; HASHKEY_LEN] = self
            .hashkey
            .as_slice()
            .try_into()
            .map_err(|_| ValidationError::HashKeyLength {
                got: self.hashkey.len(),
            })?;

        Ok(InitSection {
            isocode,
            serial,
            denomination,
            section_flags: 0,
            mint_pk: NotePublicKey::from_bytes(mint_pk),
            mint_pk_crsig: NoteSignature::from_bytes(mint_pk_crsig),
            nonce,
            hashkey,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::NoteKeypair;

    const HASHKEY: &[u8; 64] =
        b"Bill Gates never said that 640K ought to be enough for anybody!!";

    fn sample_section() -> InitSection {
        let trust_root = NoteKeypair::from_seed(&[1u8; 32]);
        let mint = NoteKeypair::from_seed(&[2u8; 32]);
        let charter = trust_root.sign(&mint.public_key_bytes());

        InitSectionBuilder::new()
            .isocode(b"XTS")
            .serial_padded("TS001")
            .denomination(0, 10_000, 0)
            .mint_pk(&mint.public_key_bytes())
            .mint_pk_crsig(charter.as_bytes())
            .nonce(&[0xDE, 0xAD, 0xBE, 0xEF])
            .hashkey(HASHKEY)
            .build()
            .unwrap()
    }

    #[test]
    fn seal_produces_256_bytes_and_hex_digest() {
        let sealed = sample_section().seal();
        assert_eq!(sealed.bytes.len(), 256);
        assert_eq!(sealed.digest_hex.len(), 128);
        assert_eq!(
            sealed.digest_hex,
            hex::encode(&sealed.bytes[256 - 64..])
        );
    }

    #[test]
    fn seal_is_reproducible_for_fixed_inputs() {
        let a = sample_section().seal();
        let b = sample_section().seal();
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(a.digest_hex, b.digest_hex);
    }

    #[test]
    fn parse_inverts_seal() {
        let section = sample_section();
        let sealed = section.seal();
        let parsed = InitSection::parse(&sealed.bytes).unwrap();
        assert_eq!(parsed, section);
    }

    #[test]
    fn parse_ignores_trailing_bytes() {
        let section = sample_section();
        let mut bytes = section.seal().bytes;
        bytes.extend_from_slice(&[0xFF; 40]); // whatever follows is not ours
        assert_eq!(InitSection::parse(&bytes).unwrap(), section);
    }

    #[test]
    fn wire_layout_matches_the_format() {
        let section = sample_section();
        let bytes = section.seal().bytes;

        assert_eq!(&bytes[0..2], b"SN");
        assert_eq!(&bytes[2..4], &[0x00, 0x01]); // version 1, BE
        assert_eq!(bytes[4], 0x00); // init section type
        assert_eq!(bytes[5], 0x00); // flags
        assert_eq!(&bytes[6..8], &[0x00, 0xF8]); // 248, BE
        assert_eq!(&bytes[8..11], b"XTS");
        assert_eq!(&bytes[11..24], b"TS001********");
        assert_eq!(bytes[24], 0x00); // denomination flags
        assert_eq!(&bytes[25..27], &[0x27, 0x10]); // 10000, BE
        assert_eq!(bytes[27], 0x00); // decimal place
        assert_eq!(&bytes[28..60], section.mint_pk.as_bytes());
        assert_eq!(&bytes[60..124], &section.mint_pk_crsig.as_bytes()[..]);
        assert_eq!(&bytes[124..128], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(&bytes[128..192], HASHKEY);
    }

    #[test]
    fn any_corrupted_byte_breaks_the_seal() {
        let bytes = sample_section().seal().bytes;

        // Flip one bit in a spread of positions across the sealed prefix.
        for offset in [0usize, 3, 8, 20, 60, 127, 191] {
            let mut corrupted = bytes.clone();
            corrupted[offset] ^= 0x01;
            let result = InitSection::parse(&corrupted);
            assert!(
                result.is_err(),
                "corruption at offset {offset} went undetected"
            );
        }
    }

    #[test]
    fn bit_flip_in_body_is_seal_broken() {
        let mut bytes = sample_section().seal().bytes;
        bytes[100] ^= 0x40; // inside mint_pk_crsig
        assert_eq!(
            InitSection::parse(&bytes),
            Err(DecodeError::IntegritySealBroken)
        );
    }

    #[test]
    fn corrupted_seal_itself_is_detected() {
        let mut bytes = sample_section().seal().bytes;
        bytes[255] ^= 0x01; // last byte of the stored digest
        assert_eq!(
            InitSection::parse(&bytes),
            Err(DecodeError::IntegritySealBroken)
        );
    }

    #[test]
    fn truncated_note_is_rejected() {
        let bytes = sample_section().seal().bytes;
        assert_eq!(
            InitSection::parse(&bytes[..200]),
            Err(DecodeError::Truncated {
                needed: 256,
                available: 200
            })
        );
    }

    #[test]
    fn zero_denomination_never_builds() {
        let mint = NoteKeypair::from_seed(&[2u8; 32]);
        let result = InitSectionBuilder::new()
            .isocode(b"XTS")
            .serial_padded("TS001")
            .denomination(0, 0, 0)
            .mint_pk(&mint.public_key_bytes())
            .mint_pk_crsig(&[0u8; 64])
            .nonce(&[0u8; 4])
            .hashkey(HASHKEY)
            .build();
        assert_eq!(result, Err(ValidationError::ZeroDenomination));
    }

    #[test]
    fn each_field_length_is_its_own_failure() {
        let base = || {
            InitSectionBuilder::new()
                .isocode(b"XTS")
                .serial_padded("TS001")
                .denomination(0, 1, 0)
                .mint_pk(&[1u8; 32])
                .mint_pk_crsig(&[2u8; 64])
                .nonce(&[3u8; 4])
                .hashkey(&[4u8; 64])
        };

        assert_eq!(
            base().mint_pk(&[1u8; 31]).build(),
            Err(ValidationError::MintKeyLength { got: 31 })
        );
        assert_eq!(
            base().mint_pk_crsig(&[2u8; 65]).build(),
            Err(ValidationError::MintSignatureLength { got: 65 })
        );
        assert_eq!(
            base().nonce(&[3u8; 5]).build(),
            Err(ValidationError::NonceLength { got: 5 })
        );
        assert_eq!(
            base().hashkey(&[4u8; 63]).build(),
            Err(ValidationError::HashKeyLength { got: 63 })
        );
        assert_eq!(
            base().isocode(b"XTSX").build(),
            Err(ValidationError::IsoCodeLength { got: 4 })
        );
    }

    #[test]
    fn section_header_flags_round_trip() {
        let mut section = sample_section();
        section.section_flags = 0x5A;
        let sealed = section.seal();
        assert_eq!(sealed.bytes[5], 0x5A);
        let parsed = InitSection::parse(&sealed.bytes).unwrap();
        assert_eq!(parsed.section_flags, 0x5A);
    }

    #[test]
    fn stored_digest_hex_matches_seal_output() {
        let sealed = sample_section().seal();
        assert_eq!(
            InitSection::stored_digest_hex(&sealed.bytes),
            Some(sealed.digest_hex)
        );
        assert_eq!(InitSection::stored_digest_hex(&[0u8; 10]), None);
    }

    #[test]
    fn parse_rejects_checkpoint_where_init_belongs() {
        let sealed = sample_section().seal();
        let mut bytes = sealed.bytes.clone();
        bytes[4] = 0xFF; // claims to be a checkpoint section
        // The framing decodes (0xFF is a known type) but it fails the
        // declared-length check for a checkpoint.
        assert!(matches!(
            InitSection::parse(&bytes),
            Err(DecodeError::Format(FormatError::LengthMismatch { .. }))
        ));
    }

    #[test]
    fn init_section_serde_roundtrip() {
        let section = sample_section();
        let json = serde_json::to_string(&section).unwrap();
        let recovered: InitSection = serde_json::from_str(&json).unwrap();
        assert_eq!(section, recovered);
    }
}
