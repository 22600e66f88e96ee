//! Canonical **ntHash** for *contiguous* k‑mers.
//!
//! [`NtHash`] rolls over a borrowed DNA sequence in **O(1)** per base after
//! an **O(k)** initialisation, skipping every window that contains a base
//! outside `ACGTU` (either case).  The low‑level primitives it is built from
//! (`base_forward_hash`, `next_forward_hash`, …) are public so other crates
//! can drive their own loops.
//!
//! A builder + iterator facade ([`NtHashBuilder`] / [`NtHashIter`]) is
//! provided for the common "hash every k‑mer" case.

use crate::{
    constants::*,
    roller::{Direction, HashEngine, Params, Roller},
    sub::sub_hash,
    tables::{srol, srol_n, srol_table, sror},
    util::extend_hashes,
    window::SeqView,
    Result,
};

/// Rolling k‑mer hasher over a contiguous DNA sequence.
///
/// - Initialisation is deferred to the first `roll()` / `roll_back()`, which
///   finds the nearest window free of invalid bases.
/// - Each valid k‑mer yields `num_hashes` values: the canonical hash plus
///   extra mixes (see [`extend_hashes`]).
/// - Cloning copies the hash buffer, so clones advance independently.
///
/// ```
/// use nthash_rs::NtHash;
///
/// let seq = b"ACGTNACGTA";
/// let mut h = NtHash::new(seq, 4, 2, 0)?;
/// assert!(h.roll());
/// assert_eq!(h.pos(), 0);
/// // "GTNA".. windows are skipped
/// assert!(h.roll());
/// assert_eq!(h.pos(), 5);
/// # Ok::<(), nthash_rs::NtHashError>(())
/// ```
#[derive(Clone, Debug)]
pub struct NtHash<'a> {
    inner: Roller<SeqView<'a>, KmerEngine>,
}

impl<'a> NtHash<'a> {
    /// Create a hasher whose first window starts at or after `pos`.
    ///
    /// A sequence shorter than `k` is accepted; the first `roll()` simply
    /// fails.
    ///
    /// # Errors
    ///
    /// `k == 0`, `k > 65535` or `num_hashes > 255`.
    pub fn new(seq: &'a [u8], k: usize, num_hashes: usize, pos: usize) -> Result<Self> {
        let params = Params::new("NtHash", k, num_hashes)?;
        Ok(Self::with_params(seq, params, pos))
    }

    pub(crate) fn with_params(seq: &'a [u8], params: Params, pos: usize) -> Self {
        Self {
            inner: Roller::new(
                SeqView(seq),
                KmerEngine { k: params.k },
                params.k,
                params.hash_num as usize,
                pos,
            ),
        }
    }

    /// Advance forward by one base, skipping over k‑mers with invalid bases.
    /// Returns `true` if a new valid hash was produced.
    pub fn roll(&mut self) -> bool {
        self.inner.roll()
    }

    /// Move backward by one base, skipping over k‑mers with invalid bases.
    pub fn roll_back(&mut self) -> bool {
        self.inner.roll_back()
    }

    /// Hashes of the next k‑mer, written to [`hashes`](Self::hashes) without
    /// moving.
    pub fn peek(&mut self) -> bool {
        self.inner.peek()
    }

    /// Like [`peek`](Self::peek) with `incoming` as the next base.  Works at
    /// the end of the sequence too.
    pub fn peek_char(&mut self, incoming: u8) -> bool {
        self.inner.peek_char(incoming)
    }

    pub fn peek_back(&mut self) -> bool {
        self.inner.peek_back()
    }

    pub fn peek_back_char(&mut self, incoming: u8) -> bool {
        self.inner.peek_back_char(incoming)
    }

    /// Hashes of the current window with `new_bases[i]` written at offset
    /// `positions[i]`.
    ///
    /// The sequence is borrowed, so the edit is not committed: the forward /
    /// reverse hashes keep describing the real window and the next move
    /// continues from it.
    pub fn sub(&mut self, positions: &[usize], new_bases: &[u8]) -> Result<()> {
        let state = *self.inner.state();
        let (fwd, rev) = {
            let window = self
                .inner
                .current_window()
                .ok_or(crate::NtHashError::NotInitialized)?;
            sub_hash(state.fwd, state.rev, &window, positions, new_bases, self.k())?
        };
        self.inner.show(&Strands { fwd, rev });
        Ok(())
    }

    /// Point at a new sequence, keeping `k`, `num_hashes` and the hash
    /// buffer.  The next move re‑initialises.
    pub fn change_seq(&mut self, seq: &'a [u8], pos: usize) {
        self.inner.reset(SeqView(seq), pos);
    }

    /// Hashes of the last window rolled to or peeked at.
    #[inline(always)]
    pub fn hashes(&self) -> &[u64] {
        self.inner.hashes()
    }

    /// Start of the current k‑mer, or [`NO_POS`](crate::NO_POS) once exhausted.
    #[inline(always)]
    pub fn pos(&self) -> usize {
        self.inner.pos()
    }

    /// `true` if the forward strand is the canonical one.
    #[inline(always)]
    pub fn forward(&self) -> bool {
        let s = self.inner.state();
        s.fwd <= s.rev
    }

    #[inline(always)]
    pub fn forward_hash(&self) -> u64 {
        self.inner.state().fwd
    }

    #[inline(always)]
    pub fn reverse_hash(&self) -> u64 {
        self.inner.state().rev
    }

    #[inline(always)]
    pub fn hash_num(&self) -> usize {
        self.inner.hashes().len()
    }

    #[inline(always)]
    pub fn k(&self) -> u16 {
        self.inner.k()
    }

    #[inline(always)]
    pub fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }
}

/// Forward / reverse‑complement accumulators of one window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Strands {
    pub(crate) fwd: u64,
    pub(crate) rev: u64,
}

/// Contiguous k‑mer hashing, one accumulator pair per window.
#[derive(Clone, Copy, Debug)]
pub(crate) struct KmerEngine {
    pub(crate) k: u16,
}

impl HashEngine for KmerEngine {
    type State = Strands;

    fn empty_state(&self) -> Strands {
        Strands::default()
    }

    #[inline]
    fn init(&self, window: &[u8], state: &mut Strands) {
        state.fwd = base_forward_hash(window, self.k);
        state.rev = base_reverse_hash(window, self.k);
    }

    #[inline(always)]
    fn shift<F: Fn(usize) -> u8>(&self, dir: Direction, sym: F, state: &mut Strands) {
        let (first, last) = (sym(0), sym(self.k as usize));
        match dir {
            Direction::Forward => {
                state.fwd = next_forward_hash(state.fwd, self.k, first, last);
                state.rev = next_reverse_hash(state.rev, self.k, first, last);
            }
            Direction::Backward => {
                state.fwd = prev_forward_hash(state.fwd, self.k, last, first);
                state.rev = prev_reverse_hash(state.rev, self.k, last, first);
            }
        }
    }

    #[inline(always)]
    fn hashes(&self, state: &Strands, out: &mut [u64]) {
        extend_hashes(state.fwd, state.rev, self.k as u32, out);
    }
}

/// Start of the first window at or after `from` with no invalid base.
pub fn next_valid_window(seq: &[u8], from: usize, k: usize) -> Option<usize> {
    let mut pos = from;
    while k > 0 && pos + k <= seq.len() {
        match crate::roller::last_invalid(&seq[pos..pos + k]) {
            Some(i) => pos += i + 1,
            None => return Some(pos),
        }
    }
    None
}

/// Packs the 2‑bit codes of `bases` into a table index, first base most
/// significant.
#[inline(always)]
fn pack<'b>(codes: &[u8; 256], bases: impl Iterator<Item = &'b u8>) -> usize {
    bases.fold(0, |idx, &c| (idx << 2) | (codes[c as usize] & 0b11) as usize)
}

/// Hash of a run of 2 to 4 bases whose packed codes are `idx`.
#[inline(always)]
fn nmer_hash(idx: usize, n: usize) -> u64 {
    match n {
        4 => TETRAMER_TAB[idx],
        3 => TRIMER_TAB[idx],
        _ => DIMER_TAB[idx],
    }
}

/// Forward‑strand hash of `seq[..k]`.
///
/// Every base in the window must be one of `ACGTU` (either case).
#[inline]
pub fn base_forward_hash(seq: &[u8], k: u16) -> u64 {
    let window = &seq[..k as usize];
    let chunks = window.chunks_exact(4);
    let tail = chunks.remainder();

    let mut h = chunks.fold(0_u64, |h, quad| {
        srol_n(h, 4) ^ TETRAMER_TAB[pack(&CONVERT_TAB, quad.iter())]
    });
    h = srol_n(h, tail.len() as u32);
    match tail {
        [] => h,
        [c] => h ^ SEED_TAB[*c as usize],
        _ => h ^ nmer_hash(pack(&CONVERT_TAB, tail.iter()), tail.len()),
    }
}

/// Reverse‑complement hash of `seq[..k]`.
///
/// Every base in the window must be one of `ACGTU` (either case).
#[inline]
pub fn base_reverse_hash(seq: &[u8], k: u16) -> u64 {
    let window = &seq[..k as usize];
    let chunks = window.chunks_exact(4);
    let tail = chunks.remainder();

    // the tail ends up with the largest rotations, so it goes in first
    let h = match tail {
        [] => 0,
        [c] => SEED_TAB[(*c & CP_OFF) as usize],
        _ => nmer_hash(pack(&RC_CONVERT_TAB, tail.iter().rev()), tail.len()),
    };
    chunks.rev().fold(h, |h, quad| {
        srol_n(h, 4) ^ TETRAMER_TAB[pack(&RC_CONVERT_TAB, quad.iter().rev())]
    })
}

#[inline(always)]
pub fn next_forward_hash(prev: u64, k: u16, char_out: u8, char_in: u8) -> u64 {
    srol(prev) ^ SEED_TAB[char_in as usize] ^ srol_table(char_out, k as u32)
}

#[inline(always)]
pub fn prev_forward_hash(prev: u64, k: u16, char_out: u8, char_in: u8) -> u64 {
    sror(prev ^ srol_table(char_in, k as u32) ^ SEED_TAB[char_out as usize])
}

#[inline(always)]
pub fn next_reverse_hash(prev: u64, k: u16, char_out: u8, char_in: u8) -> u64 {
    sror(prev ^ srol_table(char_in & CP_OFF, k as u32) ^ SEED_TAB[(char_out & CP_OFF) as usize])
}

#[inline(always)]
pub fn prev_reverse_hash(prev: u64, k: u16, char_out: u8, char_in: u8) -> u64 {
    srol(prev) ^ SEED_TAB[(char_in & CP_OFF) as usize] ^ srol_table(char_out & CP_OFF, k as u32)
}

// -------------------------------------------------------------------------
// Builder + Iterator facade
// -------------------------------------------------------------------------

/// Configure and consume a rolling‐hash computation as an iterator.
pub struct NtHashBuilder<'a> {
    seq: &'a [u8],
    k: usize,
    num_hashes: usize,
    pos: usize,
}

impl<'a> NtHashBuilder<'a> {
    /// Begin building over `seq` (`&str`, `&[u8]`, `&Vec<u8>`, …).
    pub fn new<S: AsRef<[u8]> + ?Sized>(seq: &'a S) -> Self {
        NtHashBuilder {
            seq: seq.as_ref(),
            k: 0,
            num_hashes: 1,
            pos: 0,
        }
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn num_hashes(mut self, m: usize) -> Self {
        self.num_hashes = m;
        self
    }

    pub fn pos(mut self, pos: usize) -> Self {
        self.pos = pos;
        self
    }

    /// Validate the configuration and return the iterator.
    pub fn finish(self) -> Result<NtHashIter<'a>> {
        let hasher = NtHash::new(self.seq, self.k, self.num_hashes, self.pos)?;
        Ok(NtHashIter { hasher, done: false })
    }
}

/// Iterator yielding `(pos, hashes)` for each valid k‑mer.
pub struct NtHashIter<'a> {
    hasher: NtHash<'a>,
    done: bool,
}

impl<'a> NtHashIter<'a> {
    /// The underlying hasher, e.g. to read strand hashes of the last item.
    pub fn hasher(&self) -> &NtHash<'a> {
        &self.hasher
    }
}

impl Iterator for NtHashIter<'_> {
    type Item = (usize, Vec<u64>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.hasher.roll() {
            self.done = true;
            return None;
        }
        Some((self.hasher.pos(), self.hasher.hashes().to_owned()))
    }
}

impl<'a> IntoIterator for NtHashBuilder<'a> {
    type Item = (usize, Vec<u64>);
    type IntoIter = NtHashIter<'a>;

    /// # Panics
    ///
    /// On an invalid configuration; use [`finish`](NtHashBuilder::finish) to
    /// handle the error instead.
    fn into_iter(self) -> Self::IntoIter {
        self.finish().expect("invalid NtHashBuilder configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NtHashError, NO_POS};

    fn fresh(window: &[u8], m: usize) -> Vec<u64> {
        let mut h = NtHash::new(window, window.len(), m, 0).unwrap();
        assert!(h.roll());
        h.hashes().to_vec()
    }

    #[test]
    fn base_hash_matches_rolled_hash_for_every_k_mod_4() {
        let seq = b"ACGTTGCAAGCTTCAGGATCCATG";
        for k in 1..=12u16 {
            let mut fwd = base_forward_hash(seq, k);
            let mut rev = base_reverse_hash(seq, k);
            for pos in 1..=seq.len() - k as usize {
                let (out, inc) = (seq[pos - 1], seq[pos - 1 + k as usize]);
                fwd = next_forward_hash(fwd, k, out, inc);
                rev = next_reverse_hash(rev, k, out, inc);
                assert_eq!(fwd, base_forward_hash(&seq[pos..], k), "k={k} pos={pos}");
                assert_eq!(rev, base_reverse_hash(&seq[pos..], k), "k={k} pos={pos}");
            }
        }
    }

    #[test]
    fn reverse_hash_is_forward_hash_of_reverse_complement() {
        let seq = b"AACGTTTGCA";
        let rc: Vec<u8> = seq
            .iter()
            .rev()
            .map(|&c| match c {
                b'A' => b'T',
                b'C' => b'G',
                b'G' => b'C',
                _ => b'A',
            })
            .collect();
        let k = seq.len() as u16;
        assert_eq!(base_reverse_hash(seq, k), base_forward_hash(&rc, k));
    }

    #[test]
    fn lowercase_and_u_hash_like_uppercase_t() {
        assert_eq!(fresh(b"acgtacgu", 2), fresh(b"ACGTACGT", 2));
    }

    #[test]
    fn sequence_shorter_than_k_is_exhausted() {
        let mut h = NtHash::new(b"ACG", 4, 1, 0).unwrap();
        assert!(!h.roll());
        assert_eq!(h.pos(), NO_POS);
        assert!(!h.roll_back());
    }

    #[test]
    fn only_invalid_windows_exhaust() {
        let mut h = NtHash::new(b"ACGNTTANCA", 4, 1, 0).unwrap();
        assert!(!h.roll());
        assert_eq!(h.pos(), NO_POS);
    }

    #[test]
    fn roll_stops_at_end_without_losing_window() {
        let mut h = NtHash::new(b"ACGTA", 4, 1, 0).unwrap();
        assert!(h.roll());
        assert!(h.roll());
        assert_eq!(h.pos(), 1);
        assert!(!h.roll());
        assert_eq!(h.pos(), 1);
        assert!(h.is_initialized());
    }

    #[test]
    fn roll_back_from_uninitialized_finds_last_valid_window() {
        // only the windows at 4 and 5 avoid both Ns
        let seq = b"ACGNAACGTNGG";
        let mut h = NtHash::new(seq, 4, 1, seq.len()).unwrap();
        assert!(h.roll_back());
        assert_eq!(h.pos(), 5);
        assert_eq!(h.hashes(), &fresh(&seq[5..9], 1)[..]);
        assert!(h.roll_back());
        assert_eq!(h.pos(), 4);
        // seq[3] is N and nothing valid lies before it
        assert!(!h.roll_back());
        assert_eq!(h.pos(), NO_POS);
    }

    #[test]
    fn roll_back_jumps_over_invalid_base() {
        let seq = b"ACGTACNGTACGTA";
        let mut h = NtHash::new(seq, 4, 1, 7).unwrap();
        assert!(h.roll());
        assert_eq!(h.pos(), 7);
        assert!(h.roll_back());
        assert_eq!(h.pos(), 2);
        assert_eq!(h.hashes(), &fresh(&seq[2..6], 1)[..]);
    }

    #[test]
    fn peek_does_not_move() {
        let seq = b"ACGTACGGTA";
        let mut h = NtHash::new(seq, 5, 2, 0).unwrap();
        assert!(h.roll());
        let (fwd, rev) = (h.forward_hash(), h.reverse_hash());
        assert!(h.peek());
        assert_eq!(h.hashes(), &fresh(&seq[1..6], 2)[..]);
        assert_eq!(h.pos(), 0);
        assert_eq!((h.forward_hash(), h.reverse_hash()), (fwd, rev));
        assert!(h.roll());
        assert_eq!(h.hashes(), &fresh(&seq[1..6], 2)[..]);
    }

    #[test]
    fn peek_char_past_the_end() {
        let mut h = NtHash::new(b"ACGTA", 5, 1, 0).unwrap();
        assert!(h.roll());
        assert!(!h.peek());
        assert!(h.peek_char(b'G'));
        assert_eq!(h.hashes(), &fresh(b"CGTAG", 1)[..]);
        assert!(h.peek_back_char(b'T'));
        assert_eq!(h.hashes(), &fresh(b"TACGT", 1)[..]);
        assert!(!h.peek_char(b'N'));
    }

    #[test]
    fn peek_on_fresh_hasher_previews_first_window() {
        let seq = b"NNACGTAC";
        let mut h = NtHash::new(seq, 4, 1, 0).unwrap();
        assert!(h.peek());
        assert_eq!(h.hashes(), &fresh(&seq[2..6], 1)[..]);
        assert!(!h.is_initialized());
        assert_eq!(h.pos(), 0);
        assert!(h.roll());
        assert_eq!(h.pos(), 2);
    }

    #[test]
    fn forward_reports_smaller_strand() {
        let mut h = NtHash::new(b"ACGGTTACAGGT", 5, 1, 0).unwrap();
        while h.roll() {
            assert_eq!(h.forward(), h.forward_hash() <= h.reverse_hash());
        }
    }

    #[test]
    fn palindrome_has_equal_strands() {
        let mut h = NtHash::new(b"ACGT", 4, 1, 0).unwrap();
        assert!(h.roll());
        assert_eq!(h.forward_hash(), h.reverse_hash());
        assert!(h.forward());
    }

    #[test]
    fn change_seq_restarts() {
        let a = b"ACGTACGT".to_vec();
        let b = b"TTGCA".to_vec();
        let mut h = NtHash::new(&a, 4, 3, 0).unwrap();
        assert!(h.roll());
        assert!(h.roll());
        h.change_seq(&b, 1);
        assert!(!h.is_initialized());
        assert!(h.roll());
        assert_eq!(h.pos(), 1);
        assert_eq!(h.hashes(), &fresh(b"TGCA", 3)[..]);
        assert_eq!(h.hash_num(), 3);
    }

    #[test]
    fn sub_leaves_window_untouched() {
        let seq = b"ACGTACGTAC";
        let mut h = NtHash::new(seq, 6, 2, 0).unwrap();
        assert_eq!(h.sub(&[0], &[b'A']), Err(NtHashError::NotInitialized));
        assert!(h.roll());
        h.sub(&[1, 4], &[b'T', b'G']).unwrap();
        assert_eq!(h.hashes(), &fresh(b"ATGTGC", 2)[..]);
        assert!(h.roll());
        assert_eq!(h.hashes(), &fresh(&seq[1..7], 2)[..]);
    }

    #[test]
    fn clones_advance_independently() {
        let seq = b"ACGTTGCATTGA";
        let mut a = NtHash::new(seq, 4, 2, 0).unwrap();
        assert!(a.roll());
        let mut b = a.clone();
        assert!(b.roll());
        assert!(b.roll());
        assert_eq!(a.pos(), 0);
        assert_eq!(b.pos(), 2);
        assert_ne!(a.hashes(), b.hashes());
        assert!(a.roll());
        assert_eq!(a.pos(), 1);
    }

    #[test]
    fn next_valid_window_skips() {
        assert_eq!(next_valid_window(b"ACNGTAC", 0, 3), Some(3));
        assert_eq!(next_valid_window(b"ACNGTAC", 4, 3), Some(4));
        assert_eq!(next_valid_window(b"ACNGTAN", 0, 3), Some(3));
        assert_eq!(next_valid_window(b"ACNGTNA", 0, 3), None);
        assert_eq!(next_valid_window(b"AC", 0, 3), None);
    }

    #[test]
    fn builder_accepts_str() {
        let items: Vec<_> = NtHashBuilder::new("ACGTNACGT")
            .k(4)
            .num_hashes(1)
            .finish()
            .unwrap()
            .collect();
        let positions: Vec<usize> = items.iter().map(|(p, _)| *p).collect();
        assert_eq!(positions, vec![0, 5]);
        assert_eq!(items[0].1, items[1].1);
    }
}
