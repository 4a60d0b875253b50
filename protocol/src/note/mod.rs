//! # Note Module
//!
//! Construction, framing, sealing, and verification of SigNote currency
//! notes. A note is one contiguous byte stream: an init section that fixes
//! the note's identity forever, followed by an append-only chain of
//! custody-transfer checkpoints.
//!
//! ## Architecture
//!
//! ```text
//! section.rs      — Version and section-header framing (the outermost 4+4 bytes)
//! types.rs        — Validated field newtypes (IsoCode, SerialNumber, Denomination)
//! init.rs         — InitSectionBuilder, sealing, and init-section decoding
//! checkpoint.rs   — Checkpoint records and the append_checkpoint primitive
//! verification.rs — One-pass verification of a full note against a trust root
//! ```
//!
//! ## Note Lifecycle
//!
//! 1. **Build** — Use [`InitSectionBuilder`] to assemble the identity fields.
//! 2. **Seal** — [`InitSection::seal`] serializes and stamps the keyed digest,
//!    producing the canonical 256-byte note.
//! 3. **Transfer** — Each custodian extends the stream with
//!    [`append_checkpoint`]; nothing upstream ever changes.
//! 4. **Verify** — Anyone holding the trust root's public key runs
//!    [`verify`] and gets a [`VerificationReport`] or the first failure.
//!
//! ## Design Decisions
//!
//! - All multi-byte integers on the wire are big-endian. A note must mean
//!   the same thing on every machine that ever reads it.
//! - The init seal is a keyed BLAKE2b-512 whose key travels *inside* the
//!   note. It detects corruption, not forgery; authenticity comes from the
//!   trust root's charter signature and the Ed25519 checkpoint chain.
//! - Checkpoint signatures cover the entire byte stream from offset 0, so
//!   one linear pass proves the whole custody history or pinpoints the
//!   first broken link.
//! - Decoding never panics on untrusted input. Every malformed byte stream
//!   maps to a typed error naming what was wrong and where.

pub mod checkpoint;
pub mod init;
pub mod section;
pub mod types;
pub mod verification;

pub use checkpoint::{append_checkpoint, Checkpoint};
pub use init::{DecodeError, InitSection, InitSectionBuilder, SealedInit};
pub use section::{FormatError, SectionHeader, SectionKind};
pub use types::{Denomination, IsoCode, SerialNumber, ValidationError};
pub use verification::{verify, VerificationError, VerificationReport};
