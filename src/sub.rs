//! Point substitutions inside a window.
//!
//! Every base contributes one independent XOR term to each strand, so
//! replacing the base at offset `p` only swaps that term:
//!
//! ```text
//!   fwd ^= srol^(k-1-p)(S[old]) ^ srol^(k-1-p)(S[new])
//!   rev ^= srol^p(S[~old])      ^ srol^p(S[~new])
//! ```

use crate::{constants::CP_OFF, roller::is_invalid, tables::srol_table, NtHashError, Result};

/// Apply the edits `window[positions[i]] = new_bases[i]` to the accumulator
/// pair `(fwd, rev)` of `window` and return the edited pair.
///
/// Edits are applied in order, so a repeated offset ends with its last base.
/// The result equals hashing the edited window from scratch.
///
/// # Errors
///
/// - [`SubstitutionMismatch`](NtHashError::SubstitutionMismatch) if the two
///   slices differ in length.
/// - [`InvalidWindowOffsets`](NtHashError::InvalidWindowOffsets) for an
///   offset `>= k`.
/// - [`InvalidSequence`](NtHashError::InvalidSequence) if a new base is not
///   one of `ACGTU`.
pub fn sub_hash(
    fwd: u64,
    rev: u64,
    window: &[u8],
    positions: &[usize],
    new_bases: &[u8],
    k: u16,
) -> Result<(u64, u64)> {
    if positions.len() != new_bases.len() {
        return Err(NtHashError::SubstitutionMismatch {
            positions: positions.len(),
            bases: new_bases.len(),
        });
    }
    let k = k as usize;
    if let Some(&offset) = positions.iter().find(|&&p| p >= k || p >= window.len()) {
        return Err(NtHashError::InvalidWindowOffsets { offset, k });
    }
    if new_bases.iter().any(|&c| is_invalid(c)) {
        return Err(NtHashError::InvalidSequence);
    }

    // later edits at the same offset must see the earlier ones
    let mut current: Vec<u8> = window.iter().copied().take(k).collect();
    let (mut fwd, mut rev) = (fwd, rev);
    for (&p, &new) in positions.iter().zip(new_bases) {
        let old = current[p];
        let (f_rot, r_rot) = ((k - 1 - p) as u32, p as u32);
        fwd ^= srol_table(old, f_rot) ^ srol_table(new, f_rot);
        rev ^= srol_table(old & CP_OFF, r_rot) ^ srol_table(new & CP_OFF, r_rot);
        current[p] = new;
    }
    Ok((fwd, rev))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kmer::{base_forward_hash, base_reverse_hash};

    fn strands(window: &[u8]) -> (u64, u64) {
        let k = window.len() as u16;
        (base_forward_hash(window, k), base_reverse_hash(window, k))
    }

    #[test]
    fn single_edit_matches_fresh_hash() {
        let (f, r) = strands(b"ACGTACGTAA");
        for p in 0..10 {
            for &c in b"ACGT" {
                let mut edited = b"ACGTACGTAA".to_vec();
                edited[p] = c;
                assert_eq!(
                    sub_hash(f, r, b"ACGTACGTAA", &[p], &[c], 10).unwrap(),
                    strands(&edited),
                    "p={p} c={}",
                    c as char
                );
            }
        }
    }

    #[test]
    fn repeated_offset_keeps_last_base() {
        let (f, r) = strands(b"AAAAAA");
        let got = sub_hash(f, r, b"AAAAAA", &[2, 2, 5], &[b'C', b'g', b'T'], 6).unwrap();
        assert_eq!(got, strands(b"AAGAAT"));
    }

    #[test]
    fn no_edits_is_identity() {
        let (f, r) = strands(b"ACGGT");
        assert_eq!(sub_hash(f, r, b"ACGGT", &[], &[], 5), Ok((f, r)));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            sub_hash(0, 0, b"ACGT", &[0, 1], &[b'A'], 4),
            Err(NtHashError::SubstitutionMismatch {
                positions: 2,
                bases: 1
            })
        );
        assert_eq!(
            sub_hash(0, 0, b"ACGT", &[4], &[b'A'], 4),
            Err(NtHashError::InvalidWindowOffsets { offset: 4, k: 4 })
        );
        assert_eq!(
            sub_hash(0, 0, b"ACGT", &[1], &[b'N'], 4),
            Err(NtHashError::InvalidSequence)
        );
    }
}
