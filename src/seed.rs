//! **Spaced‑seed ntHash**: rolling hashes of *masked* k‑mers.
//!
//! A spaced seed is a mask over the k positions of a window; only the
//! positions marked `1` ("care") contribute to the hash.  Each seed is
//! decomposed once into contiguous **blocks** and isolated **monomers**
//! ([`SeedDecomposition`]) so that rolling costs two table lookups per block
//! and one per monomer instead of one per care position:
//!
//! - a block `[a, b)` contributes the rotated seeds of `window[a..b]`; sliding
//!   it by one base only swaps the base at `a` for the one at `b`, exactly
//!   like a contiguous k‑mer;
//! - monomers are XORed back in from scratch after every move.
//!
//! When the *don't‑care* positions form fewer terms, the seed is stored in
//! **ignore** polarity instead: the don't‑care runs plus one synthetic block
//! spanning the whole window.  Because XOR is its own inverse, the synthetic
//! block cancels the don't‑care terms out of the full‑window hash and both
//! polarities give identical hashes.
//!
//! [`SeedNtHash`] drives one accumulator set per seed through the shared
//! [`Roller`], so invalid bases are skipped the same way as in
//! [`NtHash`](crate::NtHash).

use crate::{
    constants::CP_OFF,
    roller::{Direction, HashEngine, Params, Roller},
    tables::{srol, srol_table, sror},
    util::extend_hashes,
    window::SeqView,
    NtHashError, Result,
};

/// Don't‑care positions of one seed, as 0‑based window offsets.
pub type SpacedSeed = Vec<usize>;

/// Which positions a [`SeedDecomposition`] enumerates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// Blocks and monomers are the positions that contribute.
    Care,
    /// Blocks and monomers are the excluded positions, plus a final
    /// `[0, k)` block.
    Ignore,
}

/// Run‑length description of one spaced seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedDecomposition {
    polarity: Polarity,
    span: usize,
    blocks: Vec<[usize; 2]>,
    monomers: Vec<usize>,
}

impl SeedDecomposition {
    /// Decompose a mask of `'0'` (don't care) and `'1'` (care), keeping
    /// whichever polarity needs fewer terms.  Ties go to [`Polarity::Care`].
    ///
    /// ```
    /// use nthash_rs::seed::{Polarity, SeedDecomposition};
    ///
    /// let d = SeedDecomposition::from_mask("1100111011")?;
    /// assert_eq!(d.polarity(), Polarity::Ignore);
    /// assert_eq!(d.blocks(), &[[2, 4], [0, 10]]);
    /// assert_eq!(d.monomers(), &[7]);
    /// # Ok::<(), nthash_rs::NtHashError>(())
    /// ```
    pub fn from_mask(mask: &str) -> Result<Self> {
        Ok(Self::choose(&parse_mask(mask)?))
    }

    /// Decompose the seed of length `k` whose don't‑care offsets are
    /// `dont_care`.
    pub fn from_dont_care(dont_care: &[usize], k: usize) -> Result<Self> {
        let mut care = vec![true; k];
        for &i in dont_care {
            *care.get_mut(i).ok_or(NtHashError::InvalidWindowOffsets { offset: i, k })? =
                false;
        }
        Ok(Self::choose(&care))
    }

    /// Decompose `mask` in the given polarity regardless of term count.
    pub fn with_polarity(mask: &str, polarity: Polarity) -> Result<Self> {
        Ok(Self::build(&parse_mask(mask)?, polarity))
    }

    fn choose(care: &[bool]) -> Self {
        let as_care = Self::build(care, Polarity::Care);
        let as_ignore = Self::build(care, Polarity::Ignore);
        if as_ignore.num_terms() < as_care.num_terms() {
            as_ignore
        } else {
            as_care
        }
    }

    fn build(care: &[bool], polarity: Polarity) -> Self {
        let wanted = polarity == Polarity::Care;
        let span = care.len();
        let mut blocks = Vec::new();
        let mut monomers = Vec::new();

        let mut start = 0;
        while start < span {
            let end = care[start..]
                .iter()
                .position(|&c| c != care[start])
                .map_or(span, |n| start + n);
            if care[start] == wanted {
                match end - start {
                    1 => monomers.push(start),
                    _ => blocks.push([start, end]),
                }
            }
            start = end;
        }
        if polarity == Polarity::Ignore {
            blocks.push([0, span]);
        }

        Self {
            polarity,
            span,
            blocks,
            monomers,
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Half‑open `[start, end)` ranges, including the synthetic full‑window
    /// block in ignore polarity.
    pub fn blocks(&self) -> &[[usize; 2]] {
        &self.blocks
    }

    pub fn monomers(&self) -> &[usize] {
        &self.monomers
    }

    /// Length of the mask this was built from.
    pub fn span(&self) -> usize {
        self.span
    }

    /// Table lookups per strand per roll: two per block, one per monomer.
    pub fn num_terms(&self) -> usize {
        2 * self.blocks.len() + self.monomers.len()
    }

    /// `true` if window offset `i` contributes to the hash.
    pub fn is_care(&self, i: usize) -> bool {
        if i >= self.span {
            return false;
        }
        let runs = match self.polarity {
            Polarity::Care => &self.blocks[..],
            Polarity::Ignore => self.blocks.split_last().map_or(&[][..], |(_, rest)| rest),
        };
        let listed =
            self.monomers.contains(&i) || runs.iter().any(|&[a, b]| (a..b).contains(&i));
        listed == (self.polarity == Polarity::Care)
    }

    /// Rebuild the `'0'`/`'1'` mask.
    pub fn to_mask(&self) -> String {
        (0..self.span)
            .map(|i| if self.is_care(i) { '1' } else { '0' })
            .collect()
    }
}

fn parse_mask(mask: &str) -> Result<Vec<bool>> {
    mask.bytes()
        .map(|b| match b {
            b'1' => Ok(true),
            b'0' => Ok(false),
            _ => Err(NtHashError::InvalidSeedMask {
                mask: mask.to_owned(),
            }),
        })
        .collect()
}

/// Turn `'0'`/`'1'` masks into don't‑care offset lists.
///
/// ```
/// use nthash_rs::seed::parse_seeds;
///
/// assert_eq!(parse_seeds(&["1101", "0110"])?, vec![vec![2], vec![0, 3]]);
/// # Ok::<(), nthash_rs::NtHashError>(())
/// ```
pub fn parse_seeds<S: AsRef<str>>(masks: &[S]) -> Result<Vec<SpacedSeed>> {
    masks
        .iter()
        .map(|m| -> Result<SpacedSeed> {
            Ok(parse_mask(m.as_ref())?
                .iter()
                .enumerate()
                .filter_map(|(i, &care)| (!care).then_some(i))
                .collect())
        })
        .collect()
}

/// Per‑seed accumulators.  The `*_nomono` pairs carry only the block terms
/// and are what gets rolled; monomers are added on top after each move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SeedStrands {
    fwd_nomono: Vec<u64>,
    rev_nomono: Vec<u64>,
    fwd: Vec<u64>,
    rev: Vec<u64>,
}

#[derive(Clone, Debug)]
pub(crate) struct SeedEngine {
    k: u16,
    per_seed: usize,
    seeds: Vec<SeedDecomposition>,
}

impl SeedEngine {
    /// Rotated forward / reverse‑complement terms of base `c` at offset `p`.
    #[inline(always)]
    fn terms(&self, c: u8, p: usize) -> (u64, u64) {
        let k = self.k as u32;
        let p32 = p as u32;
        (srol_table(c, k - 1 - p32), srol_table(c & CP_OFF, p32))
    }

    #[inline(always)]
    fn add_monomers<F: Fn(usize) -> u8>(&self, seed: usize, sym: F, state: &mut SeedStrands) {
        let (mut fwd, mut rev) = (state.fwd_nomono[seed], state.rev_nomono[seed]);
        for &m in &self.seeds[seed].monomers {
            let (f, r) = self.terms(sym(m), m);
            fwd ^= f;
            rev ^= r;
        }
        state.fwd[seed] = fwd;
        state.rev[seed] = rev;
    }
}

impl HashEngine for SeedEngine {
    type State = SeedStrands;

    fn empty_state(&self) -> SeedStrands {
        let n = self.seeds.len();
        SeedStrands {
            fwd_nomono: vec![0; n],
            rev_nomono: vec![0; n],
            fwd: vec![0; n],
            rev: vec![0; n],
        }
    }

    fn init(&self, window: &[u8], state: &mut SeedStrands) {
        for (i, seed) in self.seeds.iter().enumerate() {
            let (mut fwd, mut rev) = (0, 0);
            for &[a, b] in &seed.blocks {
                for (p, &c) in window.iter().enumerate().take(b).skip(a) {
                    let (f, r) = self.terms(c, p);
                    fwd ^= f;
                    rev ^= r;
                }
            }
            state.fwd_nomono[i] = fwd;
            state.rev_nomono[i] = rev;
            self.add_monomers(i, |m| window[m], state);
        }
    }

    fn shift<F: Fn(usize) -> u8>(&self, dir: Direction, sym: F, state: &mut SeedStrands) {
        let k = self.k as u32;
        for (i, seed) in self.seeds.iter().enumerate() {
            let (mut t_fwd, mut t_rev) = (0, 0);
            for &[a, b] in &seed.blocks {
                let (ca, cb) = (sym(a), sym(b));
                let (a32, b32) = (a as u32, b as u32);
                t_fwd ^= srol_table(ca, k - a32) ^ srol_table(cb, k - b32);
                t_rev ^= srol_table(ca & CP_OFF, a32) ^ srol_table(cb & CP_OFF, b32);
            }
            match dir {
                Direction::Forward => {
                    state.fwd_nomono[i] = srol(state.fwd_nomono[i]) ^ t_fwd;
                    state.rev_nomono[i] = sror(state.rev_nomono[i] ^ t_rev);
                    self.add_monomers(i, |m| sym(m + 1), state);
                }
                Direction::Backward => {
                    state.fwd_nomono[i] = sror(state.fwd_nomono[i] ^ t_fwd);
                    state.rev_nomono[i] = srol(state.rev_nomono[i]) ^ t_rev;
                    self.add_monomers(i, &sym, state);
                }
            }
        }
    }

    fn hashes(&self, state: &SeedStrands, out: &mut [u64]) {
        if self.per_seed == 0 {
            return;
        }
        for (i, slot) in out.chunks_exact_mut(self.per_seed).enumerate() {
            extend_hashes(state.fwd[i], state.rev[i], self.k as u32, slot);
        }
    }
}

/// Rolling spaced‑seed hasher over a borrowed sequence.
///
/// `hashes()` holds `hash_num_per_seed` values for every seed, seed‑major:
/// seed `i` owns `hashes()[i * m..(i + 1) * m]`.  A window is hashed only if
/// all `k` bases are valid, care positions or not.
///
/// ```
/// use nthash_rs::SeedNtHash;
///
/// let seq = b"ATCGTACGATGC";
/// let mut h = SeedNtHash::new(seq, &["110011", "101101"], 2, 6, 0)?;
/// while h.roll() {
///     assert_eq!(h.hashes().len(), 4);
/// }
/// # Ok::<(), nthash_rs::NtHashError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SeedNtHash<'a> {
    inner: Roller<SeqView<'a>, SeedEngine>,
    per_seed: usize,
}

impl<'a> SeedNtHash<'a> {
    /// Build from `'0'`/`'1'` masks, each exactly `k` long.
    ///
    /// # Errors
    ///
    /// Out‑of‑range `k` / `num_hashes_per_seed`, a mask with other
    /// characters, or a mask whose length is not `k`.
    pub fn new<S: AsRef<str>>(
        seq: &'a [u8],
        masks: &[S],
        num_hashes_per_seed: usize,
        k: usize,
        pos: usize,
    ) -> Result<Self> {
        let seeds = masks
            .iter()
            .map(|m| {
                let m = m.as_ref();
                if m.len() != k {
                    return Err(NtHashError::SeedLengthMismatch {
                        mask: m.to_owned(),
                        len: m.len(),
                        k,
                    });
                }
                SeedDecomposition::from_mask(m)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_decompositions(seq, seeds, num_hashes_per_seed, k, pos)
    }

    /// Build from don't‑care offset lists (see [`parse_seeds`]).
    pub fn from_dont_care(
        seq: &'a [u8],
        seeds: &[SpacedSeed],
        num_hashes_per_seed: usize,
        k: usize,
        pos: usize,
    ) -> Result<Self> {
        let seeds = seeds
            .iter()
            .map(|s| SeedDecomposition::from_dont_care(s, k))
            .collect::<Result<Vec<_>>>()?;
        Self::from_decompositions(seq, seeds, num_hashes_per_seed, k, pos)
    }

    /// Build from already decomposed seeds, each spanning `k`.
    pub fn from_decompositions(
        seq: &'a [u8],
        seeds: Vec<SeedDecomposition>,
        num_hashes_per_seed: usize,
        k: usize,
        pos: usize,
    ) -> Result<Self> {
        let params = Params::new("SeedNtHash", k, num_hashes_per_seed)?;
        if let Some(bad) = seeds.iter().find(|s| s.span != k) {
            return Err(NtHashError::SeedLengthMismatch {
                mask: bad.to_mask(),
                len: bad.span,
                k,
            });
        }
        let per_seed = params.hash_num as usize;
        let total = seeds.len() * per_seed;
        let engine = SeedEngine {
            k: params.k,
            per_seed,
            seeds,
        };
        Ok(Self {
            inner: Roller::new(SeqView(seq), engine, params.k, total, pos),
            per_seed,
        })
    }

    pub fn roll(&mut self) -> bool {
        self.inner.roll()
    }

    pub fn roll_back(&mut self) -> bool {
        self.inner.roll_back()
    }

    pub fn peek(&mut self) -> bool {
        self.inner.peek()
    }

    pub fn peek_char(&mut self, incoming: u8) -> bool {
        self.inner.peek_char(incoming)
    }

    pub fn peek_back(&mut self) -> bool {
        self.inner.peek_back()
    }

    pub fn peek_back_char(&mut self, incoming: u8) -> bool {
        self.inner.peek_back_char(incoming)
    }

    /// Point at a new sequence; the next move re‑initialises.
    pub fn change_seq(&mut self, seq: &'a [u8], pos: usize) {
        self.inner.reset(SeqView(seq), pos);
    }

    #[inline(always)]
    pub fn hashes(&self) -> &[u64] {
        self.inner.hashes()
    }

    /// Hashes of seed `i` only.
    pub fn seed_hashes(&self, i: usize) -> &[u64] {
        &self.inner.hashes()[i * self.per_seed..(i + 1) * self.per_seed]
    }

    #[inline(always)]
    pub fn pos(&self) -> usize {
        self.inner.pos()
    }

    /// Forward‑strand masked hash of every seed.
    pub fn forward_hashes(&self) -> &[u64] {
        &self.inner.state().fwd
    }

    /// Reverse‑complement masked hash of every seed.
    pub fn reverse_hashes(&self) -> &[u64] {
        &self.inner.state().rev
    }

    /// `true` if the forward strand is canonical for seed `i`.
    pub fn forward(&self, i: usize) -> bool {
        let s = self.inner.state();
        s.fwd[i] <= s.rev[i]
    }

    /// Total number of hashes per window (all seeds).
    #[inline(always)]
    pub fn hash_num(&self) -> usize {
        self.inner.hashes().len()
    }

    #[inline(always)]
    pub fn hash_num_per_seed(&self) -> usize {
        self.per_seed
    }

    pub fn num_seeds(&self) -> usize {
        self.inner.engine().seeds.len()
    }

    #[inline(always)]
    pub fn k(&self) -> u16 {
        self.inner.k()
    }

    #[inline(always)]
    pub fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    pub fn decompositions(&self) -> &[SeedDecomposition] {
        &self.inner.engine().seeds
    }
}

// -------------------------------------------------------------------------
// Builder + Iterator facade
// -------------------------------------------------------------------------

/// Builder for a [`SeedNtHashIter`].
///
/// ```rust
/// use nthash_rs::{SeedNtHashBuilder, Result};
///
/// # fn main() -> Result<()> {
/// let seq   = b"ATCGTACGATGCATGCATGCTGACG";
/// let masks = vec!["000111", "010101"];
///
/// for (pos, hashes) in SeedNtHashBuilder::new(seq)
///                        .k(6)
///                        .masks(masks)
///                        .num_hashes(2)
///                        .finish()? {
///     println!("{pos:2}  {:016x}", hashes[0]);
/// }
/// # Ok(()) }
/// ```
pub struct SeedNtHashBuilder<'a> {
    seq: &'a [u8],
    masks: Vec<String>,
    dont_care: Vec<SpacedSeed>,
    k: usize,
    num_hashes: usize,
    start_pos: usize,
}

impl<'a> SeedNtHashBuilder<'a> {
    pub fn new<S: AsRef<[u8]> + ?Sized>(seq: &'a S) -> Self {
        Self {
            seq: seq.as_ref(),
            masks: Vec::new(),
            dont_care: Vec::new(),
            k: 0,
            num_hashes: 1,
            start_pos: 0,
        }
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Seeds as `'0'`/`'1'` masks, `'1'` marking positions to hash.
    pub fn masks<S: Into<String>, I: IntoIterator<Item = S>>(mut self, m: I) -> Self {
        self.masks = m.into_iter().map(Into::into).collect();
        self
    }

    /// Seeds as don't‑care offset lists.  Hashed after any `masks`.
    pub fn dont_care<I: IntoIterator<Item = SpacedSeed>>(mut self, seeds: I) -> Self {
        self.dont_care = seeds.into_iter().collect();
        self
    }

    /// Hashes per seed.
    pub fn num_hashes(mut self, n: usize) -> Self {
        self.num_hashes = n;
        self
    }

    pub fn pos(mut self, p: usize) -> Self {
        self.start_pos = p;
        self
    }

    pub fn finish(self) -> Result<SeedNtHashIter<'a>> {
        let mut seeds = Vec::with_capacity(self.masks.len() + self.dont_care.len());
        for m in &self.masks {
            if m.len() != self.k {
                return Err(NtHashError::SeedLengthMismatch {
                    mask: m.clone(),
                    len: m.len(),
                    k: self.k,
                });
            }
            seeds.push(SeedDecomposition::from_mask(m)?);
        }
        for s in &self.dont_care {
            seeds.push(SeedDecomposition::from_dont_care(s, self.k)?);
        }
        let hasher = SeedNtHash::from_decompositions(
            self.seq,
            seeds,
            self.num_hashes,
            self.k,
            self.start_pos,
        )?;
        Ok(SeedNtHashIter { hasher, done: false })
    }
}

/// Yields `(pos, hashes)` for every valid window.
pub struct SeedNtHashIter<'a> {
    hasher: SeedNtHash<'a>,
    done: bool,
}

impl<'a> SeedNtHashIter<'a> {
    pub fn hasher(&self) -> &SeedNtHash<'a> {
        &self.hasher
    }
}

impl Iterator for SeedNtHashIter<'_> {
    type Item = (usize, Vec<u64>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.hasher.roll() {
            self.done = true;
            return None;
        }
        Some((self.hasher.pos(), self.hasher.hashes().to_vec()))
    }
}

impl<'a> IntoIterator for SeedNtHashBuilder<'a> {
    type Item = (usize, Vec<u64>);
    type IntoIter = SeedNtHashIter<'a>;

    /// # Panics
    ///
    /// On an invalid configuration.
    fn into_iter(self) -> Self::IntoIter {
        self.finish()
            .expect("invalid SeedNtHashBuilder configuration")
    }
}
