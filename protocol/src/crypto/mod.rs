//! # Cryptographic Primitives
//!
//! Everything security-related in the note format flows through here.
//!
//! We deliberately chose boring, well-audited cryptography:
//!
//! - **Ed25519** for signatures — fast, deterministic, and nobody has
//!   broken it.
//! - **Keyed BLAKE2b** for the integrity seal — the one 64-byte-key,
//!   64-byte-output keyed hash the format requires.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. Everything here is a thin, type-safe wrapper around audited
//! implementations. If you're tempted to optimize these functions, please
//! reconsider. Then reconsider again.

pub mod keys;
pub mod seal;
pub mod signatures;

// Re-export the things people actually need so they don't have to memorize
// our module hierarchy.
pub use keys::{NoteKeypair, NotePublicKey, NoteSignature};
pub use seal::{seal, seal_hex};
pub use signatures::{sign, verify, verify_raw};
