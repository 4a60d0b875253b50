// Copyright (c) 2026 SigNote Contributors. MIT License.
// See LICENSE for details.

//! # SigNote Protocol — Core Library
//!
//! The reference implementation of the SigNote format: digital currency
//! notes as self-contained byte streams, built for the world where a note
//! must survive a USB stick, an email attachment, and a decade of storage
//! without a server ever seeing it.
//!
//! SigNote takes a pragmatic stance: Ed25519 for signatures (because we're
//! not barbarians), keyed BLAKE2b-512 for the integrity seal (fast, boring,
//! 64-byte digests), and big-endian fixed-width framing (because a note
//! parsed differently on two machines is two different notes).
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of a
//! bearer instrument:
//!
//! - **config** — Format constants and field widths. The wire format, numerically.
//! - **crypto** — Keys, signatures, and the keyed seal. Don't roll your own.
//! - **note** — Building, sealing, extending, and verifying notes.
//! - **sources** — TAI64N timestamps and CSPRNG nonces. Impurity, quarantined.
//!
//! ## A Note's Life
//!
//! ```
//! use signote_protocol::crypto::keys::NoteKeypair;
//! use signote_protocol::note::{append_checkpoint, verify, InitSectionBuilder};
//! use signote_protocol::sources::{random_nonce, tai64n_now};
//!
//! // The trust root charters a mint; the mint builds and seals a note.
//! let trust_root = NoteKeypair::generate();
//! let mint = NoteKeypair::generate();
//! let charter = trust_root.sign(&mint.public_key_bytes());
//!
//! let sealed = InitSectionBuilder::new()
//!     .isocode(b"XTS")
//!     .serial_padded("TS001")
//!     .denomination(0, 10_000, 0)
//!     .mint_pk(&mint.public_key_bytes())
//!     .mint_pk_crsig(charter.as_bytes())
//!     .nonce(&random_nonce())
//!     .hashkey(b"Bill Gates never said that 640K ought to be enough for anybody!!")
//!     .build()
//!     .expect("all fields supplied")
//!     .seal();
//!
//! // The mint activates the note, then hands custody to a holder.
//! let holder = NoteKeypair::generate();
//! let note = append_checkpoint(
//!     &sealed.bytes,
//!     &tai64n_now(),
//!     &random_nonce(),
//!     &holder.public_key(),
//!     &mint,
//! );
//!
//! // Anyone with the trust root's public key can audit the whole thing.
//! let report = verify(&note, &trust_root.public_key()).expect("untampered");
//! assert_eq!(report.confirmed_checkpoints, 1);
//! assert_eq!(report.custodian, holder.public_key());
//! ```
//!
//! ## Design Philosophy
//!
//! 1. The byte stream is the note. No database row is authoritative.
//! 2. Append-only, forever. History is covered by every later signature.
//! 3. No unsafe code in crypto paths — we sleep at night.
//! 4. If it touches money, it has tests. Plural.

pub mod config;
pub mod crypto;
pub mod note;
pub mod sources;
