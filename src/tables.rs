//! Nucleotide → bit‑code lookup tables for the three bit densities.
//!
//! Every byte maps to a `[forward, complement]` pair.  The tables are built at
//! compile time, so there is no runtime initialisation and no first‑use race
//! between threads.
//!
//! - **4 bits** — IUPAC‑tolerant; one bit per possible base (A=1, C=2, G=4,
//!   T=8) and ambiguity codes are the OR of their constituents.  Never invalid.
//! - **2 bits** — exact A/C/G/T/U only; anything else is [`INVALID`].
//! - **1 bit** — strong/weak grouping (A,T → 0; C,G → 1); anything else is
//!   [`INVALID`].

use std::fmt;

/// Sentinel code for bytes that must be skipped under 1‑ and 2‑bit density.
pub const INVALID: u8 = 4;

/// Number of bits used to encode one nucleotide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Density {
    /// Strong/weak (GC content) encoding.
    One,
    /// Exact A/C/G/T encoding.
    Two,
    /// IUPAC ambiguity‑aware encoding.
    Four,
}

impl Density {
    /// Bits consumed per base.
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        match self {
            Density::One => 1,
            Density::Two => 2,
            Density::Four => 4,
        }
    }

    /// Bases packed into one byte.
    #[inline(always)]
    pub const fn bases_per_byte(self) -> usize {
        8 / self.bits() as usize
    }

    /// `(forward, complement)` code for `base`.
    #[inline(always)]
    pub fn code(self, base: u8) -> (u8, u8) {
        let [f, r] = self.table()[base as usize];
        (f, r)
    }

    /// Whether `base` is dropped from every window under this density.
    #[inline(always)]
    pub fn skips(self, base: u8) -> bool {
        match self {
            Density::Four => false,
            _ => self.table()[base as usize][0] == INVALID,
        }
    }

    /// Complement of an already‑encoded base.
    ///
    /// 2‑bit codes complement as `3 - c`, 1‑bit codes are self‑complementary,
    /// and 4‑bit codes complement by reversing their four bits.
    #[inline]
    pub const fn complement(self, code: u8) -> u8 {
        match self {
            Density::One => code,
            Density::Two => 3 - (code & 3),
            Density::Four => code.reverse_bits() >> 4,
        }
    }

    #[inline(always)]
    fn table(self) -> &'static [[u8; 2]; 256] {
        match self {
            Density::One => &DNA_IN_1_BITS,
            Density::Two => &DNA_IN_2_BITS,
            Density::Four => &DNA_IN_4_BITS,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Free‑function form of [`Density::code`].
#[inline(always)]
pub fn code(base: u8, density: Density) -> (u8, u8) {
    density.code(base)
}

/// IUPAC codes; unlisted bytes (including `-`) encode as the empty set `0`.
pub static DNA_IN_4_BITS: [[u8; 2]; 256] = {
    let mut t = [[0u8; 2]; 256];
    t[b'A' as usize] = [1, 8];
    t[b'B' as usize] = [14, 7];
    t[b'C' as usize] = [2, 4];
    t[b'D' as usize] = [13, 11];
    t[b'G' as usize] = [4, 2];
    t[b'H' as usize] = [11, 13];
    t[b'K' as usize] = [12, 3];
    t[b'M' as usize] = [3, 12];
    t[b'N' as usize] = [15, 15];
    t[b'O' as usize] = [15, 15];
    t[b'R' as usize] = [5, 10];
    t[b'S' as usize] = [6, 6];
    t[b'T' as usize] = [8, 1];
    t[b'U' as usize] = [8, 1];
    t[b'V' as usize] = [7, 14];
    t[b'W' as usize] = [9, 9];
    t[b'X' as usize] = [15, 15];
    t[b'Y' as usize] = [10, 5];
    t[b'?' as usize] = [15, 15];
    t[b'-' as usize] = [0, 0];
    t
};

pub static DNA_IN_2_BITS: [[u8; 2]; 256] = {
    let mut t = [[INVALID; 2]; 256];
    t[b'A' as usize] = [0, 3];
    t[b'C' as usize] = [1, 2];
    t[b'G' as usize] = [2, 1];
    t[b'T' as usize] = [3, 0];
    t[b'U' as usize] = [3, 0];
    t
};

pub static DNA_IN_1_BITS: [[u8; 2]; 256] = {
    let mut t = [[INVALID; 2]; 256];
    t[b'A' as usize] = [0, 0];
    t[b'T' as usize] = [0, 0];
    t[b'C' as usize] = [1, 1];
    t[b'G' as usize] = [1, 1];
    t
};
