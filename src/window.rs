//! Where the symbols of the current window come from.
//!
//! The advancement logic in [`roller`](crate::roller) is written once and
//! asks a [`WindowSource`] for symbols by *logical* index.  Two sources
//! exist:
//!
//! - [`SeqView`] borrows the caller's sequence and can read past the current
//!   window, so invalid bases can be jumped over.
//! - [`RingWindow`] owns exactly `k` bytes.  Logical index `i` lives in slot
//!   `i % k`, so overwriting the outgoing slot on every step keeps the ring
//!   equal to the last `k` symbols fed in.

use std::borrow::Cow;

pub(crate) trait WindowSource {
    /// One past the last logical index that can hold a symbol.
    fn len(&self) -> usize;

    /// `true` if symbols outside the current window can be read.
    fn reads_ahead(&self) -> bool;

    fn symbol(&self, i: usize) -> u8;

    /// The `k` symbols starting at logical index `pos`, in order.
    fn window(&self, pos: usize, k: usize) -> Cow<'_, [u8]>;

    /// Record that `c` now occupies logical index `i`.  Read‑ahead sources
    /// already hold every symbol they hand out.
    fn store(&mut self, i: usize, c: u8);
}

/// Read‑only view over a caller‑owned sequence.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SeqView<'a>(pub(crate) &'a [u8]);

impl WindowSource for SeqView<'_> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    fn reads_ahead(&self) -> bool {
        true
    }

    #[inline(always)]
    fn symbol(&self, i: usize) -> u8 {
        self.0[i]
    }

    #[inline]
    fn window(&self, pos: usize, k: usize) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.0[pos..pos + k])
    }

    #[inline(always)]
    fn store(&mut self, i: usize, c: u8) {
        debug_assert_eq!(self.0[i], c);
    }
}

/// Owned circular buffer holding exactly one window.
#[derive(Clone, Debug)]
pub(crate) struct RingWindow {
    buf: Box<[u8]>,
}

impl RingWindow {
    /// Lay `window` out so that `window[j]` is logical index `pos + j`.
    pub(crate) fn new(window: &[u8], pos: usize) -> Self {
        let mut ring = Self {
            buf: vec![0; window.len()].into_boxed_slice(),
        };
        ring.fill(window, pos);
        ring
    }

    /// Overwrite the whole ring without reallocating.
    pub(crate) fn fill(&mut self, window: &[u8], pos: usize) {
        debug_assert_eq!(window.len(), self.buf.len());
        let k = self.buf.len();
        for (j, &c) in window.iter().enumerate() {
            self.buf[(pos + j) % k] = c;
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl WindowSource for RingWindow {
    /// Unbounded: a blind window can always be fed another symbol.
    #[inline(always)]
    fn len(&self) -> usize {
        usize::MAX
    }

    #[inline(always)]
    fn reads_ahead(&self) -> bool {
        false
    }

    #[inline(always)]
    fn symbol(&self, i: usize) -> u8 {
        self.buf[i % self.buf.len()]
    }

    fn window(&self, pos: usize, k: usize) -> Cow<'_, [u8]> {
        debug_assert_eq!(k, self.buf.len());
        Cow::Owned((0..k).map(|j| self.symbol(pos + j)).collect())
    }

    #[inline(always)]
    fn store(&mut self, i: usize, c: u8) {
        let k = self.buf.len();
        self.buf[i % k] = c;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_window_is_rotated_by_pos() {
        let ring = RingWindow::new(b"ACGT", 6);
        // 6 % 4 == 2, so the window starts in slot 2
        assert_eq!(&*ring.buf, b"GTAC");
        assert_eq!(&*ring.window(6, 4), b"ACGT");
        assert_eq!(ring.symbol(9), b'T');
    }

    #[test]
    fn ring_store_replaces_outgoing_slot() {
        let mut ring = RingWindow::new(b"ACGT", 0);
        // rolling forward from pos 0: the base entering at 4 reuses slot 0
        ring.store(4, b'G');
        assert_eq!(&*ring.window(1, 4), b"CGTG");
        // rolling back from pos 1: the base entering at 0 reuses slot 0 again
        ring.store(0, b'T');
        assert_eq!(&*ring.window(0, 4), b"TCGT");
    }

    #[test]
    fn seq_view_borrows() {
        let seq = b"ACGTTGCA";
        let view = SeqView(seq);
        assert!(matches!(view.window(2, 4), Cow::Borrowed(w) if w == b"GTTG"));
        assert_eq!(view.len(), 8);
    }
}
