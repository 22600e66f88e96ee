//! # ntHash‑rs
//!
//! A pure‑Rust implementation of the *ntHash* rolling‑hash family for DNA
//! sequences.  Every hasher keeps a forward and a reverse‑complement
//! accumulator for the current window, moves it one base at a time in O(1)
//! and derives any number of 64‑bit hashes per window from that pair.
//!
//! This crate provides:
//! - [`NtHash`]: contiguous k‑mers over a borrowed sequence, skipping
//!   windows with bases outside `ACGTU`.
//! - [`BlindNtHash`]: contiguous k‑mers where the caller supplies each new
//!   base (graph traversal, speculative extension).
//! - [`SeedNtHash`]: spaced‑seed (masked) k‑mers, many seeds at once.
//! - [`sub_hash`]: re‑hash a window after point substitutions.
//!
//! All three hashers move forward and backward, can `peek` at the next
//! window without moving, and come with a builder + iterator facade.
//! Cloning a hasher deep‑copies it, so clones can be advanced independently
//! (e.g. one per worker thread).
//!
//! ## Example
//!
//! ```rust
//! use nthash_rs::{NtHash, Result};
//!
//! fn main() -> Result<()> {
//!     // k = 4, 2 hashes per k‑mer, start at position 0
//!     let mut hasher = NtHash::new(b"ACGTNACGT", 4, 2, 0)?;
//!
//!     // the first roll() finds the first valid k‑mer
//!     assert!(hasher.roll());
//!     let hashes = hasher.hashes();
//!     println!("First k‑mer hashes: {:#x}, {:#x}", hashes[0], hashes[1]);
//!
//!     // windows containing the N are skipped
//!     while hasher.roll() {
//!         println!("{:>3} {:#x}", hasher.pos(), hasher.hashes()[0]);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`] and never installs a subscriber.  A
//! `warn` event is emitted when a hasher is built with at least as many
//! hashes as `k` (usually swapped arguments); skipped invalid bases are
//! reported at `trace` level.

mod constants;
mod roller;
mod tables;
mod window;

pub mod blind;
/// Contiguous k‑mer rolling hasher and its low‑level primitives.
pub mod kmer;
pub mod seed;
pub mod sub;
pub mod util;

// ──────────────────────────────────────────────────────────────
// Re‑exports: public API surface
// --------------------------------------------------------------------------

/// One‑bit split‑rotate left (33 + 31 halves).
pub use tables::srol;
/// Arbitrary split‑rotate of a base seed via lookup tables.
pub use tables::srol_table;
/// One‑bit split‑rotate right (33 + 31 halves).
pub use tables::sror;

pub use util::{canonical, extend_hashes};

pub use kmer::{NtHash, NtHashBuilder, NtHashIter};

pub use blind::{BlindNtHash, BlindNtHashBuilder, BlindNtHashIter};

pub use seed::{
    parse_seeds, Polarity, SeedDecomposition, SeedNtHash, SeedNtHashBuilder, SeedNtHashIter,
    SpacedSeed,
};

pub use sub::sub_hash;

pub use roller::{HASH_NUM_MAX, K_MAX, NO_POS};

/// Name of the hash family produced by this crate, for tagging stored
/// hashes (e.g. Bloom filter headers).
pub const HASH_FN_NAME: &str = "ntHash_v1";

// ──────────────────────────────────────────────────────────────
// Crate‑wide result and error types
// --------------------------------------------------------------------------

/// Shorthand `Result` alias for this crate’s operations.
pub type Result<T, E = NtHashError> = std::result::Result<T, E>;

/// Configuration and substitution errors.
///
/// Running out of windows is not an error: `roll()` and friends return
/// `false`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NtHashError {
    /// `k` was zero.
    #[error("k must be > 0")]
    InvalidK,

    #[error("k ({k}) is larger than allowed ({max})", max = K_MAX)]
    KTooLarge { k: usize },

    #[error("number of hashes ({hash_num}) is larger than allowed ({max})", max = HASH_NUM_MAX)]
    HashNumTooLarge { hash_num: usize },

    /// A blind hasher must be given exactly one window.
    #[error("sequence length ({seq_len}) is not equal to k ({k})")]
    BlindLengthMismatch { seq_len: usize, k: usize },

    #[error("spaced seed mask {mask:?} may only contain '0' and '1'")]
    InvalidSeedMask { mask: String },

    #[error("spaced seed mask {mask:?} has length {len}, expected k ({k})")]
    SeedLengthMismatch { mask: String, len: usize, k: usize },

    /// A window offset (substitution or don't‑care position) outside `0..k`.
    #[error("window offset {offset} is outside a k-mer of length {k}")]
    InvalidWindowOffsets { offset: usize, k: usize },

    #[error("{positions} substitution positions but {bases} new bases")]
    SubstitutionMismatch { positions: usize, bases: usize },

    /// A substituted base is not one of `ACGTU`.
    #[error("invalid sequence")]
    InvalidSequence,

    /// The hasher has no current window.
    #[error("hasher is not positioned on a valid k-mer")]
    NotInitialized,
}
