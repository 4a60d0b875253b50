//! Section codec: the 4-byte headers that frame everything in a note.
//!
//! Two headers exist. The version header opens the note (magic + format
//! version, both constants). The section header precedes every section
//! (type + reserved flags + declared body length). Lengths are not
//! attacker-controlled free-form values — each section type has exactly one
//! legal body length, and the declared length is checked against it at
//! decode time. The field exists so a future format version can grow a
//! section without re-laying the framing.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{
    CHECKPOINT_BODY_LEN, FORMAT_VERSION, INIT_BODY_LEN, NOTE_MAGIC, SECTION_HEADER_LEN,
    SECTION_TYPE_CHECKPOINT, SECTION_TYPE_INIT, VERSION_HEADER_LEN,
};

/// Framing errors. Always fatal to decoding — there is no "lenient mode"
/// for a currency note, and none of these are worth retrying.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer than four bytes where a header was expected.
    #[error("malformed header: expected {expected} bytes, {available} available")]
    MalformedHeader { expected: usize, available: usize },

    /// The first two bytes of the note are not `b"SN"`.
    #[error("bad magic: expected \"SN\", got {found:02x?}")]
    BadMagic { found: [u8; 2] },

    /// The format version is one we don't speak.
    #[error("unsupported format version {found} (expected {FORMAT_VERSION})")]
    BadVersion { found: u16 },

    /// The section type byte matched no known section.
    #[error("unknown section type 0x{found:02x}")]
    UnknownSectionType { found: u8 },

    /// The declared body length disagrees with the type's fixed constant.
    #[error("length mismatch for {kind} section: declared {declared}, expected {expected}")]
    LengthMismatch {
        kind: SectionKind,
        declared: u16,
        expected: u16,
    },
}

/// The two section types the format defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    /// The immutable founding section. Exactly one, right after the
    /// version header.
    Init,
    /// A signed custody-transfer record. Zero or more, appended in order.
    Checkpoint,
}

impl SectionKind {
    /// The wire byte for this section type.
    pub fn type_byte(self) -> u8 {
        match self {
            Self::Init => SECTION_TYPE_INIT,
            Self::Checkpoint => SECTION_TYPE_CHECKPOINT,
        }
    }

    /// The one legal body length for this section type.
    pub fn body_len(self) -> u16 {
        match self {
            Self::Init => INIT_BODY_LEN,
            Self::Checkpoint => CHECKPOINT_BODY_LEN,
        }
    }

    /// Map a wire byte back to a section type.
    pub fn from_byte(byte: u8) -> Result<Self, FormatError> {
        match byte {
            SECTION_TYPE_INIT => Ok(Self::Init),
            SECTION_TYPE_CHECKPOINT => Ok(Self::Checkpoint),
            other => Err(FormatError::UnknownSectionType { found: other }),
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Checkpoint => write!(f, "checkpoint"),
        }
    }
}

/// A decoded section header.
///
/// `flags` is reserved and currently unused, but it must round-trip
/// unchanged: whatever byte was there on decode comes back out on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    pub kind: SectionKind,
    pub flags: u8,
    pub length: u16,
}

/// Encode the 4-byte version header: magic + big-endian format version.
pub fn encode_version_header() -> [u8; VERSION_HEADER_LEN] {
    let v = FORMAT_VERSION.to_be_bytes();
    [NOTE_MAGIC[0], NOTE_MAGIC[1], v[0], v[1]]
}

/// Decode and check the version header at the front of `bytes`.
///
/// Both fields are constants; anything else is a hard decode failure,
/// not a warning.
pub fn decode_version_header(bytes: &[u8]) -> Result<(), FormatError> {
    if bytes.len() < VERSION_HEADER_LEN {
        return Err(FormatError::MalformedHeader {
            expected: VERSION_HEADER_LEN,
            available: bytes.len(),
        });
    }
    if bytes[0..2] != NOTE_MAGIC {
        return Err(FormatError::BadMagic {
            found: [bytes[0], bytes[1]],
        });
    }
    let version = u16::from_be_bytes([bytes[2], bytes[3]]);
    if version != FORMAT_VERSION {
        return Err(FormatError::BadVersion { found: version });
    }
    Ok(())
}

/// Encode a 4-byte section header.
pub fn encode_header(kind: SectionKind, flags: u8, length: u16) -> [u8; SECTION_HEADER_LEN] {
    let len = length.to_be_bytes();
    [kind.type_byte(), flags, len[0], len[1]]
}

/// Decode the section header at the front of `bytes`.
///
/// Only frames the section — the declared length is returned as-is.
/// Callers validate it against the type's constant with [`expect_length`],
/// so the error distinguishes "garbled framing" from "framing fine, wrong
/// size for this type".
pub fn decode_header(bytes: &[u8]) -> Result<SectionHeader, FormatError> {
    if bytes.len() < SECTION_HEADER_LEN {
        return Err(FormatError::MalformedHeader {
            expected: SECTION_HEADER_LEN,
            available: bytes.len(),
        });
    }
    let kind = SectionKind::from_byte(bytes[0])?;
    Ok(SectionHeader {
        kind,
        flags: bytes[1],
        length: u16::from_be_bytes([bytes[2], bytes[3]]),
    })
}

/// Check a declared body length against the fixed constant for the type.
pub fn expect_length(kind: SectionKind, declared: u16) -> Result<(), FormatError> {
    let expected = kind.body_len();
    if declared != expected {
        return Err(FormatError::LengthMismatch {
            kind,
            declared,
            expected,
        });
    }
    Ok(())
}
