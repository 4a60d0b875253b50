//! # Field Sources
//!
//! Where the opaque bytes in a note actually come from. The codec treats
//! timestamps and nonces as inert fixed-width blobs; this module is the
//! one place that manufactures them, so the rest of the crate stays pure
//! and deterministic.
//!
//! Timestamps use TAI64N: a `u64` of `2^62 + unix_seconds` followed by a
//! `u32` nanosecond count, both big-endian, 12 bytes total. TAI64N labels
//! sort bytewise in time order and have no timezone, no leap-second
//! ambiguity in their encoding, and no year-2038 cliff. Nonces are four
//! bytes from the OS CSPRNG.

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::config::{NONCE_LEN, SPEND_BY_OFFSET_SECONDS, TIMESTAMP_LEN};

/// The TAI64 label base: `2^62`. Labels below this are reserved.
const TAI64_BASE: u64 = 1 << 62;

/// Encode a UTC instant as a 12-byte TAI64N label.
///
/// Instants before the Unix epoch saturate to the epoch; the format has
/// no use for notes minted in 1969.
pub fn tai64n_encode(when: DateTime<Utc>) -> [u8; TIMESTAMP_LEN] {
    let seconds = when.timestamp().max(0) as u64;
    let nanos = when.timestamp_subsec_nanos();

    let mut out = [0u8; TIMESTAMP_LEN];
    out[..8].copy_from_slice(&(TAI64_BASE + seconds).to_be_bytes());
    out[8..].copy_from_slice(&nanos.to_be_bytes());
    out
}

/// Decode a TAI64N label back into a UTC instant.
///
/// Returns `None` for labels outside the Unix-representable range
/// (pre-1970 TAI64 seconds, or nanoseconds beyond a real second).
pub fn tai64n_decode(label: &[u8; TIMESTAMP_LEN]) -> Option<DateTime<Utc>> {
    let seconds_raw = u64::from_be_bytes(label[..8].try_into().ok()?);
    let nanos = u32::from_be_bytes(label[8..].try_into().ok()?);

    let seconds = seconds_raw.checked_sub(TAI64_BASE)?;
    if nanos >= 1_000_000_000 {
        return None;
    }
    DateTime::from_timestamp(i64::try_from(seconds).ok()?, nanos)
}

/// The current instant as a TAI64N label. This is what goes into a
/// checkpoint's timestamp field at transfer time.
pub fn tai64n_now() -> [u8; TIMESTAMP_LEN] {
    tai64n_encode(Utc::now())
}

/// A TAI64N label six months from now: the spend-by horizon stamped on
/// checkpoints that carry an expiry.
pub fn tai64n_spend_by() -> [u8; TIMESTAMP_LEN] {
    let horizon = Utc::now() + chrono::Duration::seconds(SPEND_BY_OFFSET_SECONDS);
    tai64n_encode(horizon)
}

/// Four fresh bytes from the OS CSPRNG, for the init-section and
/// checkpoint nonce fields.
pub fn random_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    nonce
}
