//! Derivation of the per‑window hash values from an accumulator pair.
//!
//! Every hasher keeps exactly two accumulators per window (forward strand and
//! reverse‑complement strand).  The values callers see are derived from that
//! pair here, so asking for more hashes per window costs one multiply each
//! instead of another pass over the k‑mer.

use crate::constants::{MULTISEED, MULTISHIFT};

/// Strand‑independent hash of a window: the wrapping sum of both strands.
///
/// # Examples
///
/// ```
/// # use nthash_rs::util::canonical;
/// assert_eq!(canonical(u64::MAX, 1), 0);
/// assert_eq!(canonical(3, 4), canonical(4, 3));
/// ```
#[inline(always)]
pub const fn canonical(fwd: u64, rev: u64) -> u64 {
    fwd.wrapping_add(rev)
}

/// Fill `hashes` with the values derived from one accumulator pair.
///
/// `hashes[0]` is the canonical hash; every further slot `i` is
///
/// ```text
///   t = hashes[0] * (i ^ k * MULTISEED)
///   t ^= t >> MULTISHIFT
/// ```
///
/// `k` is the window length (the full span for spaced seeds too).
///
/// # Examples
///
/// ```
/// # use nthash_rs::util::extend_hashes;
/// let mut out = [0u64; 4];
/// extend_hashes(0x1234, 0x5678, 5, &mut out);
/// assert_eq!(out[0], 0x1234u64 + 0x5678);
/// assert_ne!(out[1], out[0]);
/// ```
#[inline]
pub fn extend_hashes(fwd: u64, rev: u64, k: u32, hashes: &mut [u64]) {
    let Some((first, rest)) = hashes.split_first_mut() else {
        return;
    };
    let base = canonical(fwd, rev);
    *first = base;

    let k_mix = (k as u64).wrapping_mul(MULTISEED);
    for (i, slot) in rest.iter_mut().enumerate() {
        let mut t = base.wrapping_mul((i as u64 + 1) ^ k_mix);
        t ^= t >> MULTISHIFT;
        *slot = t;
    }
}
