//! Rolling multi‑resolution **canonical k‑mer hasher**.
//!
//! [`KmerHash`] packs each accepted nucleotide into a pair of forward 64‑bit
//! registers and, mirrored, a pair of reverse‑complement registers.  Every
//! tracked window length is a masked (forward) or shifted (reverse) view into
//! those shared registers, so one accepted base costs **O(1)** register work
//! plus one hash per class, whatever the number of classes.
//!
//! ```text
//!   forward:  [ forward[1] | forward[0] ]   <- new code enters at the low end
//!   reverse:  [ reverse[1] | reverse[0] ]   <- complement enters at the high end
//! ```
//!
//! Under 1‑ and 2‑bit density, bytes outside the alphabet are skipped and
//! never enter a window.  Under 4‑bit density nothing is skipped.
//!
//! A **builder + iterator** facade (`KmerHashBuilder` / `KmerHashIter`) is
//! provided for one‑shot scans.

use std::sync::Arc;

use log::trace;

use crate::{
    params::{build_parameters, KmerMode, KmerParams, WindowClass},
    util::{canonical_single, HashFn},
    KmerHashError, Result,
};

/// Where a [`KmerHash`] stands in its scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KmerState {
    /// Fewer accepted bases than the shortest window.
    Warming,
    /// At least the shortest window is populated.
    Steady,
    /// The buffer has no further acceptable base.
    Exhausted,
}

/// Rolling canonical hasher bound to one borrowed sequence.
///
/// - The sequence is borrowed, never copied.
/// - [`link`](Self::link) rebinds to a new sequence and clears all state.
/// - After [`advance`](Self::advance) returns `true`, [`hashes`](Self::hashes)
///   holds one hash per class of the shared [`KmerParams`], in class order.
///   Classes whose window is not yet populated read `0`.
#[derive(Debug, Clone)]
pub struct KmerHash<'a> {
    params: Arc<KmerParams>,
    seq: &'a [u8],
    pos: usize,
    accepted: usize,
    exhausted: bool,
    forward: [u64; 2],
    reverse: [u64; 2],
    hashes: Vec<u64>,
    kmers: Vec<u64>,
}

impl<'a> KmerHash<'a> {
    /// Create an unlinked hasher; `advance` returns `false` until
    /// [`link`](Self::link) is called.
    pub fn new(params: Arc<KmerParams>) -> Self {
        let n_hashes = params.n_hashes();
        let n_kmers = params.single_classes().len();
        Self {
            params,
            seq: &[],
            pos: 0,
            accepted: 0,
            exhausted: false,
            forward: [0; 2],
            reverse: [0; 2],
            hashes: vec![0; n_hashes],
            kmers: vec![0; n_kmers],
        }
    }

    /// Create a hasher already linked to `seq`.
    pub fn with_sequence(params: Arc<KmerParams>, seq: &'a [u8]) -> Self {
        let mut h = Self::new(params);
        h.link(seq);
        h
    }

    /// Create a hasher for the integer preset `mode` (see
    /// [`build_parameters`]) linked to `seq`.
    pub fn from_mode(mode: i32, seq: &'a [u8]) -> Self {
        Self::with_sequence(build_parameters(mode), seq)
    }

    /// Rebind to `seq` and reset registers, outputs and cursor.
    pub fn link(&mut self, seq: &'a [u8]) {
        trace!("linking {} preset to a sequence of {} bytes", self.params.mode(), seq.len());
        self.seq = seq;
        self.pos = 0;
        self.accepted = 0;
        self.exhausted = false;
        self.forward = [0; 2];
        self.reverse = [0; 2];
        self.hashes.fill(0);
        self.kmers.fill(0);
    }

    /// Accept the next base and refresh every populated class.
    ///
    /// The first `true` is only returned once the shortest window is full.
    /// Returns `false` once the sequence holds no further acceptable base.
    pub fn advance(&mut self) -> bool {
        let min_size = self.params.min_kmer_size();
        loop {
            if !self.push_next() {
                self.exhausted = true;
                return false;
            }
            if self.accepted >= min_size {
                break;
            }
        }
        self.update_hashes();
        true
    }

    /// Hashes of all classes, single‑register classes first.
    #[inline(always)]
    pub fn hashes(&self) -> &[u64] {
        &self.hashes
    }

    /// Raw canonical values of the single‑register classes.
    #[inline(always)]
    pub fn kmers(&self) -> &[u64] {
        &self.kmers
    }

    /// Hash of class `idx`.
    ///
    /// # Errors
    ///
    /// Returns [`KmerHashError::ClassOutOfRange`] if `idx` is not a class of
    /// the preset.
    pub fn try_class_hash(&self, idx: usize) -> Result<u64> {
        self.hashes
            .get(idx)
            .copied()
            .ok_or(KmerHashError::ClassOutOfRange {
                index: idx,
                n_classes: self.hashes.len(),
            })
    }

    /// Pairs every class with its current hash.
    pub fn class_hashes(&self) -> impl Iterator<Item = (&WindowClass, u64)> + '_ {
        self.params.classes().iter().zip(self.hashes.iter().copied())
    }

    /// Whether class `idx` has a fully populated window.
    pub fn is_populated(&self, idx: usize) -> bool {
        self.params
            .classes()
            .get(idx)
            .is_some_and(|c| self.accepted >= c.size())
    }

    /// Cursor: index one past the last byte consumed.
    #[inline(always)]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bases accepted since the last link.
    #[inline(always)]
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Current scan state; `Exhausted` as soon as no acceptable base is left
    /// after the cursor, even before `advance` has returned `false`.
    pub fn state(&self) -> KmerState {
        let density = self.params.density();
        let rest = self.seq.get(self.pos..).unwrap_or_default();
        if self.exhausted || rest.iter().all(|&b| density.skips(b)) {
            KmerState::Exhausted
        } else if self.accepted >= self.params.min_kmer_size() {
            KmerState::Steady
        } else {
            KmerState::Warming
        }
    }

    #[inline(always)]
    pub fn params(&self) -> &Arc<KmerParams> {
        &self.params
    }

    /// Skip invalid bytes, then push one base into the registers.
    #[inline]
    fn push_next(&mut self) -> bool {
        let density = self.params.density();
        while self.pos < self.seq.len() && density.skips(self.seq[self.pos]) {
            self.pos += 1;
        }
        let Some(&base) = self.seq.get(self.pos) else {
            return false;
        };
        let (fwd, rev) = density.code(base);
        self.push_code(fwd as u64, rev as u64);
        self.pos += 1;
        self.accepted += 1;
        true
    }

    #[inline(always)]
    fn push_code(&mut self, fwd: u64, rev: u64) {
        let bits = self.params.density().bits();
        let carry = 64 - bits;
        if self.params.uses_double() {
            self.forward[1] = self.forward[1] << bits | self.forward[0] >> carry;
            self.reverse[0] = self.reverse[0] >> bits | self.reverse[1] << carry;
        }
        self.forward[0] = self.forward[0] << bits | fwd;
        self.reverse[1] = self.reverse[1] >> bits | rev << carry;
    }

    fn update_hashes(&mut self) {
        let params = &self.params;
        let hash_fn = params.hash_fn();
        let n_single = params.single_classes().len();

        for (i, class) in params.single_classes().iter().enumerate() {
            if self.accepted < class.size() {
                continue;
            }
            let fwd = self.forward[0] & class.mask;
            let rev = self.reverse[1] >> class.shift;
            let kmer = canonical_single(fwd, rev);
            self.kmers[i] = kmer;
            self.hashes[i] = hash_fn(&kmer.to_le_bytes()[..class.bytes as usize], class.seed);
        }

        for (i, class) in params.double_classes().iter().enumerate() {
            if self.accepted < class.size() {
                continue;
            }
            self.hashes[n_single + i] = hash_double(&self.forward, &self.reverse, class, hash_fn);
        }
    }
}

/// Little‑endian bytes of a register pair, low word first.
#[inline(always)]
fn pair_bytes(words: &[u64; 2]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&words[0].to_le_bytes());
    out[8..].copy_from_slice(&words[1].to_le_bytes());
    out
}

/// Hash a double‑register window.
///
/// `forward[0]` is compared with `reverse[1]` first, then the masked
/// `forward[1]` with the shifted `reverse[0]`.  The forward span is the first
/// `bytes` bytes of the forward pair; the reverse span ends at the top of the
/// reverse pair, starting `shift / 8` bytes in.
#[inline]
fn hash_double(forward: &[u64; 2], reverse: &[u64; 2], class: &WindowClass, hash_fn: HashFn) -> u64 {
    let n = class.bytes as usize;
    let forward_wins = forward[0] < reverse[1]
        || (forward[0] == reverse[1] && (forward[1] & class.mask) < (reverse[0] >> class.shift));
    if forward_wins {
        hash_fn(&pair_bytes(forward)[..n], class.seed)
    } else {
        let offset = (class.shift / 8) as usize;
        hash_fn(&pair_bytes(reverse)[offset..offset + n], class.seed)
    }
}

// -------------------------------------------------------------------------
// Builder + Iterator facade
// -------------------------------------------------------------------------

/// Configure and consume a canonical k‑mer scan as an iterator.
pub struct KmerHashBuilder<'a> {
    seq: &'a [u8],
    mode: i32,
    mode_name: Option<String>,
    hash_fn: Option<HashFn>,
    params: Option<Arc<KmerParams>>,
}

impl<'a> KmerHashBuilder<'a> {
    /// Begin building over `seq` with the default preset.
    pub fn new(seq: &'a [u8]) -> Self {
        KmerHashBuilder {
            seq,
            mode: KmerMode::default() as i32,
            mode_name: None,
            hash_fn: None,
            params: None,
        }
    }

    /// Select a preset by integer; out‑of‑range values use the default.
    pub fn mode(mut self, mode: i32) -> Self {
        self.mode = mode;
        self
    }

    /// Select a preset by name, checked in [`finish`](Self::finish).
    pub fn mode_name(mut self, name: impl Into<String>) -> Self {
        self.mode_name = Some(name.into());
        self
    }

    /// Replace the default XXH64 primitive.
    pub fn hash_fn(mut self, f: HashFn) -> Self {
        self.hash_fn = Some(f);
        self
    }

    /// Reuse an existing shared preset; overrides `mode` and `hash_fn`.
    /// A `mode_name` is still checked by [`finish`](Self::finish).
    pub fn params(mut self, params: Arc<KmerParams>) -> Self {
        self.params = Some(params);
        self
    }

    /// Finalize into an iterator.
    ///
    /// # Errors
    ///
    /// Returns [`KmerHashError::UnknownModeName`] if `mode_name` is not a
    /// known preset.
    pub fn finish(self) -> Result<KmerHashIter<'a>> {
        let named = self.mode_name.map(|name| name.parse::<KmerMode>()).transpose()?;
        let params = match self.params {
            Some(p) => p,
            None => {
                let mode = named.unwrap_or(KmerMode::from_index(self.mode));
                let params = match self.hash_fn {
                    Some(f) => KmerParams::with_hash_fn(mode, f),
                    None => KmerParams::new(mode),
                };
                Arc::new(params)
            }
        };
        Ok(KmerHashIter {
            hasher: KmerHash::with_sequence(params, self.seq),
            done: false,
        })
    }
}

/// Iterator yielding `(pos, hashes)` after every accepted base.
pub struct KmerHashIter<'a> {
    hasher: KmerHash<'a>,
    done: bool,
}

impl<'a> KmerHashIter<'a> {
    /// Underlying hasher, e.g. to read [`KmerHash::kmers`] between steps.
    pub fn hasher(&self) -> &KmerHash<'a> {
        &self.hasher
    }
}

impl<'a> Iterator for KmerHashIter<'a> {
    type Item = (usize, Vec<u64>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.hasher.advance() {
            self.done = true;
            return None;
        }
        Some((self.hasher.pos(), self.hasher.hashes().to_owned()))
    }
}

impl<'a> IntoIterator for KmerHashBuilder<'a> {
    type Item = (usize, Vec<u64>);
    type IntoIter = KmerHashIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.finish().expect("invalid KmerHashBuilder configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::reverse_complement;

    fn first_kmers(mode: i32, seq: &[u8]) -> Option<(usize, Vec<u64>, Vec<u64>)> {
        let mut h = KmerHash::from_mode(mode, seq);
        h.advance()
            .then(|| (h.pos(), h.kmers().to_vec(), h.hashes().to_vec()))
    }

    /// Hashes every window with a constant so tests can see which strand won.
    fn length_hash(bytes: &[u8], seed: u64) -> u64 {
        bytes.iter().fold(seed, |acc, &b| acc.rotate_left(8) ^ b as u64)
    }

    #[test]
    fn forward_wins_on_aaaacccc() {
        let (pos, kmers, _) = first_kmers(1, b"AAAACCCC").unwrap();
        assert_eq!(pos, 8);
        assert_eq!(kmers[0], 0x0055);
    }

    #[test]
    fn reverse_register_holds_reverse_complement() {
        let mut h = KmerHash::from_mode(1, b"AAAACCCC");
        assert!(h.advance());
        assert_eq!(h.forward[0] & 0xFFFF, 0x0055);
        assert_eq!(h.reverse[1] >> 48, 0xAAFF);
    }

    #[test]
    fn invalid_bases_are_skipped_under_two_bits() {
        let (pos, kmers, hashes) = first_kmers(1, b"ANAAACCCC").unwrap();
        let (_, ref_kmers, ref_hashes) = first_kmers(1, b"AAAACCCC").unwrap();
        assert_eq!(pos, 9);
        assert_eq!(kmers, ref_kmers);
        assert_eq!(hashes, ref_hashes);
    }

    #[test]
    fn four_bits_never_skip() {
        let mut h = KmerHash::from_mode(2, b"ANAAACCCC");
        // shortest genome window is 4 bases
        assert!(h.advance());
        assert_eq!(h.pos(), 4);
        assert_eq!(h.accepted(), 4);
        // A N A A -> 0001 1111 0001 0001
        assert_eq!(h.forward[0] & 0xFFFF, 0x1F11);
        // reverse complement T T N T -> 1000 1000 1111 1000
        assert_eq!(h.reverse[1] >> 48, 0x88F8);
        assert_eq!(h.kmers()[0], 0x1F11);
        let mut n = 1;
        while h.advance() {
            n += 1;
        }
        assert_eq!(n, 6);
    }

    #[test]
    fn short_sequence_never_emits() {
        let mut h = KmerHash::from_mode(3, b"ACGT");
        assert!(!h.advance());
        assert!(!h.advance());
        assert_eq!(h.state(), KmerState::Exhausted);
        assert!(h.hashes().iter().all(|&x| x == 0));
    }

    #[test]
    fn skipped_bases_do_not_count_towards_warm_up() {
        // seven valid bases padded with invalid ones never fill an 8-mer
        let mut h = KmerHash::from_mode(1, b"NNACGNNTACNN-G");
        assert!(!h.advance());
        assert_eq!(h.accepted(), 7);
    }

    #[test]
    fn state_machine_transitions() {
        let seq = b"ACGTACGTAC";
        let mut h = KmerHash::from_mode(3, seq);
        assert_eq!(h.state(), KmerState::Warming);
        assert!(h.advance());
        assert_eq!(h.state(), KmerState::Steady);
        assert!(h.advance());
        assert!(h.advance());
        assert!(!h.advance());
        assert_eq!(h.state(), KmerState::Exhausted);
        h.link(seq);
        assert_eq!(h.state(), KmerState::Warming);
    }

    #[test]
    fn unlinked_hasher_is_exhausted_immediately() {
        let mut h = KmerHash::new(build_parameters(0));
        assert!(!h.advance());
    }

    #[test]
    fn classes_fill_in_order_of_size() {
        let seq = b"ACGTTGCAACGTTGCAACGTTGCA";
        let mut h = KmerHash::from_mode(3, seq);
        assert!(h.advance());
        assert!(h.is_populated(0));
        assert!(!h.is_populated(1));
        assert_eq!(h.hashes()[1], 0);
        for _ in 0..4 {
            assert!(h.advance());
        }
        // 12 accepted bases: 8- and 12-mers ready, 16-mer not yet
        assert!(h.is_populated(1));
        assert!(!h.is_populated(2));
        assert!(!h.is_populated(99));
    }

    #[test]
    fn single_canonical_is_strand_independent() {
        let seq = b"GATTACAGATTACAGGGCCCTTTAAAGCGCGTATATCCGG";
        let rc = reverse_complement(seq);
        for mode in [0, 1, 2, 3, 4, 5] {
            let mut f = KmerHash::from_mode(mode, seq);
            let mut r = KmerHash::from_mode(mode, &rc);
            let k = f.params().min_kmer_size();
            let mut fwd_first = Vec::new();
            while f.advance() {
                fwd_first.push((f.kmers()[0], f.hashes()[0]));
            }
            let mut rev_first = Vec::new();
            while r.advance() {
                rev_first.push((r.kmers()[0], r.hashes()[0]));
            }
            rev_first.reverse();
            assert_eq!(fwd_first.len(), seq.len() + 1 - k, "mode {mode}");
            assert_eq!(fwd_first, rev_first, "mode {mode}");
        }
    }

    #[test]
    fn double_class_picks_forward_span_when_smaller() {
        let params = Arc::new(KmerParams::with_hash_fn(KmerMode::Fast, length_hash));
        // 48 A's: forward registers are all zero, reverse all ones
        let seq = [b'A'; 48];
        let mut h = KmerHash::with_sequence(params.clone(), &seq);
        let mut last = None;
        while h.advance() {
            last = Some(h.hashes().to_vec());
        }
        let hashes = last.unwrap();
        let class = params.double_classes()[0];
        assert_eq!(class.bytes, 12);
        assert_eq!(hashes[4], length_hash(&[0u8; 12], class.seed));
    }

    #[test]
    fn double_class_reverse_span_ends_at_top_of_pair() {
        let params = Arc::new(KmerParams::with_hash_fn(KmerMode::Fast, length_hash));
        // poly-T: forward all ones, reverse complement all zero
        let seq = [b'T'; 64];
        let mut h = KmerHash::with_sequence(params.clone(), &seq);
        while h.advance() {}
        let d = params.double_classes();
        assert_eq!(h.hashes()[4], length_hash(&[0u8; 12], d[0].seed));
        assert_eq!(h.hashes()[5], length_hash(&[0u8; 16], d[1].seed));
    }

    #[test]
    fn try_class_hash_bounds() {
        let mut h = KmerHash::from_mode(0, b"ACGTACGTACGTACGT");
        assert!(h.advance());
        assert_eq!(h.try_class_hash(0).unwrap(), h.hashes()[0]);
        assert_eq!(
            h.try_class_hash(2),
            Err(KmerHashError::ClassOutOfRange { index: 2, n_classes: 2 })
        );
        assert_eq!(h.class_hashes().count(), 2);
    }

    #[test]
    fn builder_rejects_unknown_mode_name() {
        let err = KmerHashBuilder::new(b"ACGT").mode_name("bogus").finish().err();
        assert_eq!(err, Some(KmerHashError::UnknownModeName("bogus".into())));
    }

    #[test]
    fn state_is_exhausted_at_end_of_input() {
        let mut h = KmerHash::from_mode(3, b"ACGTACGT");
        assert_eq!(h.state(), KmerState::Warming);
        assert!(h.advance());
        assert_eq!(h.pos(), 8);
        assert_eq!(h.state(), KmerState::Exhausted);
        assert!(!h.advance());
        assert_eq!(h.state(), KmerState::Exhausted);
    }

    #[test]
    fn state_is_exhausted_when_only_skippable_bytes_remain() {
        let mut h = KmerHash::from_mode(3, b"ACGTACGTNNNN");
        assert!(h.advance());
        assert_eq!(h.pos(), 8);
        assert_eq!(h.state(), KmerState::Exhausted);
        assert!(!h.advance());

        // under 4-bit density N is a base, so the scan is still steady
        let mut g = KmerHash::from_mode(2, b"ACGTNN");
        assert!(g.advance());
        assert_eq!(g.state(), KmerState::Steady);
    }

    #[test]
    fn builder_hash_fn_matches_params_with_hash_fn() {
        let seq = b"GATTACAGATTACAGGGCCCTTTAAAGCGCGTATATCCGGATCGATCGATCGGGAT";
        let from_builder: Vec<_> = KmerHashBuilder::new(seq)
            .mode(1)
            .hash_fn(length_hash)
            .finish()
            .unwrap()
            .collect();
        let params = Arc::new(KmerParams::with_hash_fn(KmerMode::Fast, length_hash));
        let mut h = KmerHash::with_sequence(params, seq);
        let mut manual = Vec::new();
        while h.advance() {
            manual.push((h.pos(), h.hashes().to_vec()));
        }
        assert_eq!(from_builder, manual);
        assert!(!manual.is_empty());
    }

    #[test]
    fn builder_reuses_shared_params() {
        let params = build_parameters(4);
        let iter = KmerHashBuilder::new(b"ACGTACGT").params(params.clone()).finish().unwrap();
        assert!(Arc::ptr_eq(iter.hasher().params(), &params));
    }

    #[test]
    fn builder_checks_mode_name_even_with_params() {
        let err = KmerHashBuilder::new(b"ACGT")
            .params(build_parameters(0))
            .mode_name("bogus")
            .finish()
            .err();
        assert_eq!(err, Some(KmerHashError::UnknownModeName("bogus".into())));
    }

    #[test]
    fn builder_matches_manual_loop() {
        let seq = b"TTGACCATGANNNCGATCGGATCCATGCAAGT";
        let from_builder: Vec<_> = KmerHashBuilder::new(seq).mode_name("fast").into_iter().collect();
        let mut h = KmerHash::from_mode(1, seq);
        let mut manual = Vec::new();
        while h.advance() {
            manual.push((h.pos(), h.hashes().to_vec()));
        }
        assert_eq!(from_builder, manual);
        assert!(!manual.is_empty());
    }
}
