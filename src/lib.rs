//! # kmerhash‑rs
//!
//! Canonical **multi‑resolution k‑mer hashing** for alignment‑free genome
//! fingerprinting.
//!
//! For every accepted nucleotide of a sequence, a [`KmerHash`] emits one
//! strand‑independent 64‑bit hash per tracked k‑mer length.  All lengths are
//! tracked at once from a pair of shared rolling registers, so the cost per
//! base does not grow with the number of windows.
//!
//! This crate provides:
//! - [`KmerMode`] / [`KmerParams`]: six fixed presets (densities and window
//!   lengths), shared across iterators with [`Arc`](std::sync::Arc).
//! - [`KmerHash`]: the rolling state machine over one borrowed sequence.
//! - [`KmerHashBuilder`] / [`KmerHashIter`]: one‑shot iterator facade.
//!
//! ## Example
//!
//! ```rust
//! use kmerhash_rs::{build_parameters, KmerHash};
//!
//! let params = build_parameters(1); // "fast"
//! let mut hasher = KmerHash::new(params.clone());
//!
//! hasher.link(b"AAAACCCCGGTTACGTACGT");
//! assert!(hasher.advance());
//! // the forward strand is the canonical one for AAAACCCC
//! assert_eq!(hasher.kmers()[0], 0x0055);
//!
//! while hasher.advance() {
//!     let h = hasher.hashes()[0];
//!     println!("8-mer hash ending at {}: {:#x}", hasher.pos(), h);
//! }
//! ```

/// Fixed masks, shifts, seeds and per‑preset rows.
// Not re‑exported directly.
mod constants;
pub mod tables;

pub mod util;
pub mod params;
/// Rolling canonical hasher and its builder/iterator facade.
pub mod kmer;

// ──────────────────────────────────────────────────────────────
// Re‑exports: public API surface
// --------------------------------------------------------------------------

/// Bit densities and their lookup.
pub use tables::{code, Density};

pub use util::{reverse_complement, xxh64_hash, HashFn};

pub use params::build_parameters;
pub use params::KmerMode;
pub use params::KmerParams;
pub use params::RegisterKind;
pub use params::WindowClass;

/// Primary rolling hasher.
///
/// See [`kmer::KmerHash`] for full documentation.
pub use kmer::KmerHash;
pub use kmer::KmerHashBuilder;
pub use kmer::KmerHashIter;
pub use kmer::KmerState;

// ──────────────────────────────────────────────────────────────
// Crate‑wide result and error types
// --------------------------------------------------------------------------

/// Shorthand `Result` alias for this crate’s operations.
pub type Result<T, E = KmerHashError> = std::result::Result<T, E>;

/// Errors raised by the strict (checked) entry points.
///
/// Scanning itself never fails: unknown integer modes fall back to the
/// default preset and invalid bases are skipped.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KmerHashError {
    /// Integer mode outside `0..=5` passed to a strict conversion.
    #[error("unknown k-mer mode {0} (expected 0..=5)")]
    UnknownMode(i32),

    #[error("unknown k-mer mode name `{0}`")]
    UnknownModeName(String),

    /// Class index past the end of the preset's class list.
    #[error("class index ({index}) out of range for {n_classes} classes")]
    ClassOutOfRange { index: usize, n_classes: usize },
}
