//! Field value types for the init section.
//!
//! Each wire field with a nontrivial constraint gets its own small type
//! with a validating constructor, so a malformed value is rejected before
//! a single byte of note is produced. All of them are fixed-width and
//! `Copy`-friendly — no heap allocations on the encode path.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::{HASHKEY_LEN, ISOCODE_LEN, NONCE_LEN, PUBLIC_KEY_LEN, SEQNUM_LEN, SEQNUM_PAD, SIGNATURE_LEN};

/// A field constraint was violated at construction time.
///
/// Each variant is a distinct precondition from the format definition.
/// Validation always happens before serialization — a build that fails
/// here has produced no bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("isocode must be exactly {ISOCODE_LEN} bytes, got {got}")]
    IsoCodeLength { got: usize },

    #[error("serial number must be exactly {SEQNUM_LEN} bytes, got {got}")]
    SerialNumberLength { got: usize },

    #[error("serial number byte 0x{byte:02x} at position {position} is not in A-Z, 0-9, '*'")]
    SerialNumberChar { byte: u8, position: usize },

    #[error("serial number is longer than {SEQNUM_LEN} bytes and cannot be padded")]
    SerialNumberTooLong { got: usize },

    #[error("denomination must be non-zero")]
    ZeroDenomination,

    #[error("mint public key must be exactly {PUBLIC_KEY_LEN} bytes, got {got}")]
    MintKeyLength { got: usize },

    #[error("trust-root signature must be exactly {SIGNATURE_LEN} bytes, got {got}")]
    MintSignatureLength { got: usize },

    #[error("nonce must be exactly {NONCE_LEN} bytes, got {got}")]
    NonceLength { got: usize },

    #[error("hash key must be exactly {HASHKEY_LEN} bytes, got {got}")]
    HashKeyLength { got: usize },
}

// ---------------------------------------------------------------------------
// IsoCode
// ---------------------------------------------------------------------------

/// A three-byte ISO 4217-style currency code: `USD`, `JPY`, `XTS`, ...
///
/// The format requires exactly three ASCII bytes. We don't maintain a list
/// of real currencies — `XTS` (the ISO testing code) is as legal as `USD`,
/// and new currencies shouldn't need a library release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IsoCode([u8; ISOCODE_LEN]);

impl IsoCode {
    /// Validate and wrap a currency code.
    pub fn new(code: &[u8]) -> Result<Self, ValidationError> {
        let bytes: [u8; ISOCODE_LEN] = code
            .try_into()
            .map_err(|_| ValidationError::IsoCodeLength { got: code.len() })?;
        Ok(Self(bytes))
    }

    /// The raw wire bytes.
    pub fn as_bytes(&self) -> &[u8; ISOCODE_LEN] {
        &self.0
    }
}

impl fmt::Display for IsoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Codes are ASCII in practice; anything else renders lossily and
        // that's fine for display.
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

// ---------------------------------------------------------------------------
// SerialNumber
// ---------------------------------------------------------------------------

/// The 13-byte serial number: uppercase A–Z and 0–9, right-padded with `*`.
///
/// The alphabet is deliberately tiny — it has to survive being read aloud,
/// typed from a photograph, and printed in OCR fonts. The asterisk padding
/// is part of the value: `TS001********` and `TS001*******X` are different
/// serials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerialNumber([u8; SEQNUM_LEN]);

impl SerialNumber {
    /// Validate and wrap a full-width 13-byte serial.
    pub fn new(serial: &[u8]) -> Result<Self, ValidationError> {
        let bytes: [u8; SEQNUM_LEN] = serial
            .try_into()
            .map_err(|_| ValidationError::SerialNumberLength { got: serial.len() })?;
        for (position, &byte) in bytes.iter().enumerate() {
            if !Self::is_serial_byte(byte) {
                return Err(ValidationError::SerialNumberChar { byte, position });
            }
        }
        Ok(Self(bytes))
    }

    /// Build a serial from a short identifier, right-padding with `*` out
    /// to 13 bytes. `"TS001"` becomes `TS001********`.
    pub fn padded(short: &str) -> Result<Self, ValidationError> {
        let src = short.as_bytes();
        if src.len() > SEQNUM_LEN {
            return Err(ValidationError::SerialNumberTooLong { got: src.len() });
        }
        let mut bytes = [SEQNUM_PAD; SEQNUM_LEN];
        bytes[..src.len()].copy_from_slice(src);
        Self::new(&bytes)
    }

    /// The raw wire bytes.
    pub fn as_bytes(&self) -> &[u8; SEQNUM_LEN] {
        &self.0
    }

    fn is_serial_byte(byte: u8) -> bool {
        byte.is_ascii_uppercase() || byte.is_ascii_digit() || byte == SEQNUM_PAD
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The alphabet is validated ASCII, so this cannot actually be lossy.
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

// ---------------------------------------------------------------------------
// Denomination
// ---------------------------------------------------------------------------

/// The note's face value: flags, a non-zero big-endian amount, and the
/// subunit decimal position.
///
/// `decimal_place` counts positions from the start of the number — 2 for
/// USD (cents), 0 for JPY. The amount is always an integer in the smallest
/// unit; no floating point anywhere near money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Denomination {
    flags: u8,
    amount: u16,
    decimal_place: u8,
}

impl Denomination {
    /// Validate and wrap a denomination. Zero is the one illegal amount —
    /// a note worth nothing is not a note.
    pub fn new(flags: u8, amount: u16, decimal_place: u8) -> Result<Self, ValidationError> {
        if amount == 0 {
            return Err(ValidationError::ZeroDenomination);
        }
        Ok(Self {
            flags,
            amount,
            decimal_place,
        })
    }

    /// Reserved bit flags. Round-trip unchanged, never interpreted.
    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// The face value in the smallest unit.
    pub fn amount(&self) -> u16 {
        self.amount
    }

    /// Subunit position for display.
    pub fn decimal_place(&self) -> u8 {
        self.decimal_place
    }

    /// The four wire bytes: flags, amount (BE), decimal place.
    pub fn to_wire_bytes(&self) -> [u8; 4] {
        let amount = self.amount.to_be_bytes();
        [self.flags, amount[0], amount[1], self.decimal_place]
    }

    /// Rebuild from the four wire bytes.
    ///
    /// Decode applies the same non-zero rule as construction: a zero
    /// denomination on the wire is a corrupt note, not a representable one.
    pub fn from_wire_bytes(bytes: &[u8; 4]) -> Result<Self, ValidationError> {
        Self::new(bytes[0], u16::from_be_bytes([bytes[1], bytes[2]]), bytes[3])
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = self.decimal_place as u32;
        if decimals == 0 {
            return write!(f, "{}", self.amount);
        }
        let divisor = 10u16.pow(decimals.min(4));
        write!(
            f,
            "{}.{:0>width$}",
            self.amount / divisor,
            self.amount % divisor,
            width = decimals.min(4) as usize
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
