//! Small helpers shared by the parameter presets and the rolling iterator.
//!
//! - **`HashFn`** — the signature of the injected hash primitive.
//! - **`xxh64_hash`** — the default primitive (XXH64 over the packed bytes).
//! - **`canonical_single`** — strand‑independent choice for one‑register
//!   windows.
//! - **`reverse_complement`** — IUPAC‑aware reverse complement of a raw byte
//!   sequence, handy for checking strand invariance from the caller's side.

/// Hash primitive applied to the packed bytes of each canonical window.
///
/// Must be pure: the same `(bytes, seed)` always yields the same value.
pub type HashFn = fn(&[u8], u64) -> u64;

/// Default hash primitive: 64‑bit XXH64.
#[inline]
pub fn xxh64_hash(bytes: &[u8], seed: u64) -> u64 {
    xxhash_rust::xxh64::xxh64(bytes, seed)
}

/// Pick the strand‑independent value of a one‑register window.
///
/// Ties keep the forward value; equal values mean the window is its own
/// reverse complement.
#[inline(always)]
pub const fn canonical_single(fwd: u64, rev: u64) -> u64 {
    if rev < fwd {
        rev
    } else {
        fwd
    }
}

/// Complement of one IUPAC nucleotide letter (uppercase).
///
/// Bytes outside the IUPAC alphabet are returned unchanged.
#[inline]
pub const fn complement_base(b: u8) -> u8 {
    match b {
        b'A' => b'T',
        b'T' | b'U' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        other => other,
    }
}

/// Reverse complement of a nucleotide byte string.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement_base(b)).collect()
}
