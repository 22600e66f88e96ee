//! **Blind ntHash**: the caller supplies every base.
//!
//! [`BlindNtHash`] owns a ring of exactly *k* bases instead of borrowing a
//! sequence.  Each `roll(c)` / `roll_back(c)` overwrites the outgoing slot
//! with `c`, so the ring always holds the last *k* bases fed in.  Nothing can
//! be read ahead, which means an invalid base cannot be skipped: it is simply
//! refused.  Typical use is graph exploration, where several candidate
//! extensions are `peek`ed (or tried on clones) before one is committed.
//!
//! [`BlindNtHashBuilder`] / [`BlindNtHashIter`] stream a whole sequence
//! through a blind hasher, restarting after every invalid base.

use crate::{
    kmer::{next_valid_window, KmerEngine, Strands},
    roller::{Params, Roller},
    sub::sub_hash,
    window::{RingWindow, WindowSource},
    NtHashError, Result,
};

/// Rolling hash over a window the caller moves one base at a time.
///
/// ```
/// use nthash_rs::BlindNtHash;
///
/// let mut h = BlindNtHash::new(b"ACGTA", 5, 1, 0)?;
/// assert!(h.peek(b'C'));        // hashes of "CGTAC", nothing moved
/// assert!(h.roll(b'G'));
/// assert_eq!(h.window(), b"CGTAG");
/// assert!(!h.roll(b'N'));       // refused, window unchanged
/// assert_eq!(h.pos(), 1);
/// # Ok::<(), nthash_rs::NtHashError>(())
/// ```
#[derive(Clone, Debug)]
pub struct BlindNtHash {
    inner: Roller<RingWindow, KmerEngine>,
}

impl BlindNtHash {
    /// Hash `seq` (exactly `k` bases) as the window starting at logical
    /// position `pos`.
    ///
    /// The window is hashed immediately.  If it contains an invalid base the
    /// hasher starts exhausted (`pos() == NO_POS`) until
    /// [`change_seq`](Self::change_seq) gives it a valid window.
    ///
    /// # Errors
    ///
    /// Out‑of‑range `k` / `num_hashes`, or `seq.len() != k`.
    pub fn new(seq: &[u8], k: usize, num_hashes: usize, pos: usize) -> Result<Self> {
        let params = Params::new("BlindNtHash", k, num_hashes)?;
        check_len(seq, k)?;
        Ok(Self::with_params(seq, params, pos))
    }

    pub(crate) fn with_params(seq: &[u8], params: Params, pos: usize) -> Self {
        let mut inner = Roller::new(
            RingWindow::new(seq, pos),
            KmerEngine { k: params.k },
            params.k,
            params.hash_num as usize,
            pos,
        );
        inner.init();
        Self { inner }
    }

    /// Shift forward with `incoming` as the new last base.
    ///
    /// Returns `false`, leaving everything unchanged, if `incoming` is not
    /// one of `ACGTU`.
    pub fn roll(&mut self, incoming: u8) -> bool {
        self.inner.roll_char(incoming)
    }

    /// Shift backward with `incoming` as the new first base.  Also fails at
    /// logical position 0.
    pub fn roll_back(&mut self, incoming: u8) -> bool {
        self.inner.roll_back_char(incoming)
    }

    /// Hashes of the window `roll(incoming)` would produce; nothing moves.
    pub fn peek(&mut self, incoming: u8) -> bool {
        self.inner.peek_char(incoming)
    }

    pub fn peek_back(&mut self, incoming: u8) -> bool {
        self.inner.peek_back_char(incoming)
    }

    /// Overwrite the bases at window offsets `positions` with `new_bases`.
    ///
    /// The ring owns its bases, so unlike [`NtHash::sub`](crate::NtHash::sub)
    /// the edit is committed: the window, both strand hashes and the hash
    /// buffer all describe the edited k‑mer afterwards.
    pub fn sub(&mut self, positions: &[usize], new_bases: &[u8]) -> Result<()> {
        let Strands { fwd, rev } = *self.inner.state();
        let (fwd, rev) = {
            let window = self
                .inner
                .current_window()
                .ok_or(NtHashError::NotInitialized)?;
            sub_hash(fwd, rev, &window, positions, new_bases, self.k())?
        };
        let pos = self.inner.pos();
        for (&p, &c) in positions.iter().zip(new_bases) {
            self.inner.source_mut().store(pos + p, c);
        }
        self.inner.commit(Strands { fwd, rev });
        Ok(())
    }

    /// Replace the window with `seq` (exactly `k` bases) at logical `pos`
    /// and hash it, reusing the ring and hash buffer.
    pub fn change_seq(&mut self, seq: &[u8], pos: usize) -> Result<()> {
        check_len(seq, self.k() as usize)?;
        self.reseed(seq, pos);
        Ok(())
    }

    fn reseed(&mut self, seq: &[u8], pos: usize) {
        self.inner.source_mut().fill(seq, pos);
        self.inner.reset_pos(pos);
        self.inner.init();
    }

    /// The `k` bases currently under the window, in order.
    pub fn window(&self) -> Vec<u8> {
        let ring = self.inner.source();
        let start = if self.is_initialized() { self.pos() } else { 0 };
        ring.window(start, ring.capacity()).into_owned()
    }

    #[inline(always)]
    pub fn hashes(&self) -> &[u64] {
        self.inner.hashes()
    }

    /// Logical start of the window, or [`NO_POS`](crate::NO_POS).
    #[inline(always)]
    pub fn pos(&self) -> usize {
        self.inner.pos()
    }

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

fn check_len(seq: &[u8], k: usize) -> Result<()> {
    if seq.len() != k {
        return Err(NtHashError::BlindLengthMismatch {
            seq_len: seq.len(),
            k,
        });
    }
    Ok(())
}

// -------------------------------------------------------------------------
// Builder + Iterator facade
// -------------------------------------------------------------------------

/// Stream a sequence through a [`BlindNtHash`], feeding it one base at a
/// time.
pub struct BlindNtHashBuilder<'a> {
    seq: &'a [u8],
    k: usize,
    num_hashes: usize,
    start_pos: usize,
}

impl<'a> BlindNtHashBuilder<'a> {
    pub fn new<S: AsRef<[u8]> + ?Sized>(seq: &'a S) -> Self {
        Self {
            seq: seq.as_ref(),
            k: 0,
            num_hashes: 1,
            start_pos: 0,
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
        self.start_pos = pos;
        self
    }

    pub fn finish(self) -> Result<BlindNtHashIter<'a>> {
        let params = Params::new("BlindNtHash", self.k, self.num_hashes)?;
        let k = params.k as usize;
        let hasher = next_valid_window(self.seq, self.start_pos, k)
            .map(|s| BlindNtHash::with_params(&self.seq[s..s + k], params, s));
        Ok(BlindNtHashIter {
            seq: self.seq,
            hasher,
            fresh: true,
        })
    }
}

/// Yields `(pos, hashes)` for every valid window.
///
/// Bases are fed with [`BlindNtHash::roll`]; when one is refused the hasher
/// is re‑seeded with the next valid window after it.
pub struct BlindNtHashIter<'a> {
    seq: &'a [u8],
    hasher: Option<BlindNtHash>,
    fresh: bool,
}

impl Iterator for BlindNtHashIter<'_> {
    type Item = (usize, Vec<u64>);

    fn next(&mut self) -> Option<Self::Item> {
        let hasher = self.hasher.as_mut()?;
        if std::mem::take(&mut self.fresh) {
            return Some((hasher.pos(), hasher.hashes().to_vec()));
        }

        let k = hasher.k() as usize;
        let end = hasher.pos() + k;
        let &incoming = self.seq.get(end)?;
        if !hasher.roll(incoming) {
            match next_valid_window(self.seq, end + 1, k) {
                Some(s) => hasher.reseed(&self.seq[s..s + k], s),
                None => {
                    self.hasher = None;
                    return None;
                }
            }
        }
        Some((hasher.pos(), hasher.hashes().to_vec()))
    }
}

impl<'a> IntoIterator for BlindNtHashBuilder<'a> {
    type Item = (usize, Vec<u64>);
    type IntoIter = BlindNtHashIter<'a>;

    /// # Panics
    ///
    /// On an invalid configuration.
    fn into_iter(self) -> Self::IntoIter {
        self.finish()
            .expect("invalid BlindNtHashBuilder configuration")
    }
}
