//! Immutable k‑mer presets.
//!
//! A [`KmerParams`] is built once per [`KmerMode`] and then shared (via
//! [`Arc`]) by any number of [`KmerHash`](crate::KmerHash) iterators.  It lists
//! the tracked window classes in a fixed order: every single‑register class
//! first, then every double‑register class.  That order is the order of
//! [`KmerHash::hashes`](crate::KmerHash::hashes).

use std::{fmt, str::FromStr, sync::Arc};

use log::debug;

use crate::{
    constants::{double_seed, MODE_ROWS, TBL_MASK, TBL_NBYTES, TBL_SEED, TBL_SHIFT},
    tables::Density,
    util::{xxh64_hash, HashFn},
    KmerHashError, Result,
};

/// Named preset selecting a density and a set of window lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum KmerMode {
    /// Two 2‑bit classes (16 and 32 bases).
    Fastest = 0,
    /// Six 2‑bit classes, two of them double‑register.
    Fast = 1,
    /// Eight IUPAC 4‑bit classes.
    Genome = 2,
    /// Seven short 2‑bit classes (8 to 32 bases).
    #[default]
    Phylogenetics = 3,
    /// All eleven IUPAC 4‑bit classes.
    All = 4,
    /// Four 1‑bit strong/weak classes.
    GcContent = 5,
}

impl KmerMode {
    /// Every preset, in index order.
    pub const ALL: [KmerMode; 6] = [
        KmerMode::Fastest,
        KmerMode::Fast,
        KmerMode::Genome,
        KmerMode::Phylogenetics,
        KmerMode::All,
        KmerMode::GcContent,
    ];

    /// Map an integer selector to a preset; anything outside `0..=5` becomes
    /// [`KmerMode::Phylogenetics`].
    pub const fn from_index(mode: i32) -> Self {
        match mode {
            0 => KmerMode::Fastest,
            1 => KmerMode::Fast,
            2 => KmerMode::Genome,
            4 => KmerMode::All,
            5 => KmerMode::GcContent,
            _ => KmerMode::Phylogenetics,
        }
    }

    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            KmerMode::Fastest => "fastest",
            KmerMode::Fast => "fast",
            KmerMode::Genome => "genome",
            KmerMode::Phylogenetics => "phylogenetics",
            KmerMode::All => "all",
            KmerMode::GcContent => "GC-content",
        }
    }

    /// Longer human‑readable summary of the preset.
    pub const fn description(self) -> &'static str {
        match self {
            KmerMode::Fastest => "fastest (2 kmer sizes)",
            KmerMode::Fast => "fast (6 kmer sizes)",
            KmerMode::Genome => "genome",
            KmerMode::Phylogenetics => "phylogenetics (short kmers)",
            KmerMode::All => "all 11 kmer sizes",
            KmerMode::GcContent => "GC content kmers",
        }
    }

    /// Bit density used by the preset.
    pub const fn density(self) -> Density {
        match self {
            KmerMode::Genome | KmerMode::All => Density::Four,
            KmerMode::GcContent => Density::One,
            _ => Density::Two,
        }
    }
}

impl TryFrom<i32> for KmerMode {
    type Error = KmerHashError;

    /// Strict conversion: unlike [`KmerMode::from_index`], unknown values fail.
    fn try_from(mode: i32) -> Result<Self> {
        match mode {
            0..=5 => Ok(KmerMode::from_index(mode)),
            _ => Err(KmerHashError::UnknownMode(mode)),
        }
    }
}

impl FromStr for KmerMode {
    type Err = KmerHashError;

    /// Accepts the display name (any case, with `_`, `-` or space
    /// separators) or the decimal index.
    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim();
        if let Ok(idx) = key.parse::<i32>() {
            return KmerMode::try_from(idx);
        }
        let key = key.to_ascii_lowercase().replace(['_', ' '], "-");
        KmerMode::ALL
            .into_iter()
            .find(|m| m.name().to_ascii_lowercase() == key || (key == "gc" && *m == KmerMode::GcContent))
            .ok_or_else(|| KmerHashError::UnknownModeName(s.to_string()))
    }
}

impl fmt::Display for KmerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many 64‑bit registers a window spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterKind {
    Single,
    Double,
}

/// One tracked k‑mer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowClass {
    /// Packed width in bytes (2–8, or 10/11/12/16 for double classes).
    pub bytes: u8,
    /// Mask applied to the low register of the forward pair.
    pub mask: u64,
    /// Shift applied to the reverse register holding the matching slice.
    pub shift: u32,
    /// Seed handed to the hash primitive.
    pub seed: u64,
    pub kind: RegisterKind,
    size: usize,
}

impl WindowClass {
    fn single(row: usize, density: Density) -> Self {
        let bytes = TBL_NBYTES[row];
        Self {
            bytes,
            mask: TBL_MASK[row],
            shift: TBL_SHIFT[row],
            seed: TBL_SEED[row] as u64,
            kind: RegisterKind::Single,
            size: bytes as usize * density.bases_per_byte(),
        }
    }

    fn double(row: usize, density: Density) -> Self {
        let bytes = TBL_NBYTES[row] + 8;
        Self {
            bytes,
            mask: TBL_MASK[row],
            shift: TBL_SHIFT[row],
            seed: double_seed(TBL_SEED[row]),
            kind: RegisterKind::Double,
            size: bytes as usize * density.bases_per_byte(),
        }
    }

    /// Window length in bases.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Frozen configuration shared by every iterator of one preset.
#[derive(Clone)]
pub struct KmerParams {
    mode: KmerMode,
    density: Density,
    hash_fn: HashFn,
    classes: Vec<WindowClass>,
    n_single: usize,
}

impl KmerParams {
    /// Build the preset for `mode` with the default XXH64 primitive.
    pub fn new(mode: KmerMode) -> Self {
        Self::with_hash_fn(mode, xxh64_hash)
    }

    /// Build the preset for `mode` hashing windows with `hash_fn`.
    pub fn with_hash_fn(mode: KmerMode, hash_fn: HashFn) -> Self {
        let density = mode.density();
        let (single_rows, double_rows) = MODE_ROWS[mode as usize];
        let classes: Vec<WindowClass> = single_rows
            .iter()
            .map(|&row| WindowClass::single(row, density))
            .chain(double_rows.iter().map(|&row| WindowClass::double(row, density)))
            .collect();
        let params = Self {
            mode,
            density,
            hash_fn,
            classes,
            n_single: single_rows.len(),
        };
        debug!(
            "k-mer preset {} ({}): sizes {:?}",
            mode,
            density,
            params.kmer_sizes()
        );
        params
    }

    #[inline(always)]
    pub fn mode(&self) -> KmerMode {
        self.mode
    }

    #[inline(always)]
    pub fn density(&self) -> Density {
        self.density
    }

    #[inline(always)]
    pub fn hash_fn(&self) -> HashFn {
        self.hash_fn
    }

    /// All classes, single‑register first.
    #[inline(always)]
    pub fn classes(&self) -> &[WindowClass] {
        &self.classes
    }

    #[inline(always)]
    pub fn single_classes(&self) -> &[WindowClass] {
        &self.classes[..self.n_single]
    }

    #[inline(always)]
    pub fn double_classes(&self) -> &[WindowClass] {
        &self.classes[self.n_single..]
    }

    /// Number of hashes produced per accepted base.
    #[inline(always)]
    pub fn n_hashes(&self) -> usize {
        self.classes.len()
    }

    /// Whether any class needs the second register pair.
    #[inline(always)]
    pub fn uses_double(&self) -> bool {
        self.classes.len() > self.n_single
    }

    /// Window length in bases of every class, in hash order.
    pub fn kmer_sizes(&self) -> Vec<usize> {
        self.classes.iter().map(WindowClass::size).collect()
    }

    /// Bases needed before the first hash is emitted.
    #[inline(always)]
    pub fn min_kmer_size(&self) -> usize {
        self.classes[0].size
    }
}

impl fmt::Debug for KmerParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KmerParams")
            .field("mode", &self.mode)
            .field("density", &self.density)
            .field("classes", &self.classes)
            .field("n_single", &self.n_single)
            .finish()
    }
}

impl PartialEq for KmerParams {
    /// Two presets are equal when they track the same classes at the same
    /// density; the hash primitive is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.density == other.density
            && self.n_single == other.n_single
            && self.classes == other.classes
    }
}

/// Build a shared preset from an integer selector.
///
/// Never fails: values outside `0..=5` give the phylogenetics preset.
pub fn build_parameters(mode: i32) -> Arc<KmerParams> {
    Arc::new(KmerParams::new(KmerMode::from_index(mode)))
}
