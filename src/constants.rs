//! Fixed numeric catalog shared by every k‑mer preset.
//!
//! Each row of the `TBL_*` arrays describes one byte‑width (2 to 8 bytes) that
//! fits inside a single 64‑bit register.  Double‑register classes reuse a row
//! for their high register and add one full word (8 bytes) on top.
//!
//! These values are part of the fingerprint format: changing any of them
//! changes every hash the crate emits.

/// Number of distinct single‑register byte‑widths.
pub const N_WIDTHS: usize = 7;

/// Low‑bit mask selecting a window of `TBL_NBYTES[i]` bytes.
pub const TBL_MASK: [u64; N_WIDTHS] = [
    0x0000_0000_0000_FFFF,
    0x0000_0000_00FF_FFFF,
    0x0000_0000_FFFF_FFFF,
    0x0000_00FF_FFFF_FFFF,
    0x0000_FFFF_FFFF_FFFF,
    0x00FF_FFFF_FFFF_FFFF,
    0xFFFF_FFFF_FFFF_FFFF,
];

/// Right shift bringing the top `TBL_NBYTES[i]` bytes of a register down.
pub const TBL_SHIFT: [u32; N_WIDTHS] = [48, 40, 32, 24, 16, 8, 0];

/// Byte‑width of each row.
pub const TBL_NBYTES: [u8; N_WIDTHS] = [2, 3, 4, 5, 6, 7, 8];

/// Per‑row hash seed for single‑register classes.
pub const TBL_SEED: [u32; N_WIDTHS] = [
    0x0090_40a6,
    0x10be_a992,
    0x50ed_d67d,
    0xb05a_4f09,
    0xf070_46c5,
    0x9c94_45ab,
    0xb250_0f29,
];

/// Offset added to the shifted base seed of a double‑register class.
///
/// Wider than 32 bits; seeds are held as `u64` so nothing is truncated.
pub const DOUBLE_SEED_OFFSET: u64 = 0x4_2031_4A1D;

/// Rows of the tables above used by each preset, split into
/// (single‑register, double‑register) lists.  Indexed by `KmerMode as usize`.
pub const MODE_ROWS: [(&[usize], &[usize]); 6] = [
    (&[2, 6], &[]),                       // fastest
    (&[0, 2, 4, 6], &[2, 6]),             // fast
    (&[0, 1, 2, 4, 6], &[0, 2, 6]),       // genome
    (&[0, 1, 2, 3, 4, 5, 6], &[]),        // phylogenetics
    (&[0, 1, 2, 3, 4, 5, 6], &[0, 1, 2, 6]), // all
    (&[2, 6], &[2, 6]),                   // GC content
];

/// Derive the seed of a double‑register class from its base row seed.
#[inline(always)]
pub const fn double_seed(base: u32) -> u64 {
    ((base >> 2) as u64) + DOUBLE_SEED_OFFSET
}
