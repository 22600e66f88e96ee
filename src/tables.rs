//! Split‑rotate primitives.
//!
//! ntHash never rotates a whole 64‑bit word.  The word is treated as two
//! independent rings, the low 33 bits (0–32) and the high 31 bits (33–63),
//! and each ring is rotated on its own.  Because 31 and 33 are coprime the
//! combined period is 1023 rotations instead of 64, which keeps long k‑mers
//! from aliasing.
//!
//! [`srol_table`] answers `srol^d(seed(c))` from the pre‑rotated tables in
//! `constants`, so the hot loops never iterate over `d`.

use crate::constants::{MS_TAB_31L, MS_TAB_33R};

/// One‑bit split‑rotate left.
///
/// Bit 63 wraps to bit 33 and bit 32 wraps to bit 0.
#[inline(always)]
pub const fn srol(x: u64) -> u64 {
    let m = ((x & 0x8000_0000_0000_0000) >> 30) | ((x & 0x0000_0001_0000_0000) >> 32);
    ((x << 1) & 0xFFFF_FFFD_FFFF_FFFF) | m
}

/// Split‑rotate left by `d` bits.
///
/// A plain 64‑bit rotation followed by a fix‑up of the bits that crossed the
/// 33/31 boundary.  Only equal to `d` applications of [`srol`] for
/// `d ≤ 31`; larger distances go through [`srol_table`].
#[inline(always)]
pub const fn srol_n(x: u64, d: u32) -> u64 {
    if d == 0 {
        return x;
    }
    let v = x.rotate_left(d);
    let y = (v ^ (v >> 33)) & (!0u64 >> (64 - d));
    v ^ (y | (y << 33))
}

/// One‑bit split‑rotate right, the inverse of [`srol`].
#[inline(always)]
pub const fn sror(x: u64) -> u64 {
    let m = ((x & 0x0000_0002_0000_0000) << 30) | ((x & 0x0000_0000_0000_0001) << 32);
    ((x >> 1) & 0xFFFF_FFFE_FFFF_FFFF) | m
}

/// `srol^d` applied to the seed of byte `c`, for any `d`.
#[inline(always)]
pub fn srol_table(c: u8, d: u32) -> u64 {
    MS_TAB_31L[c as usize][(d % 31) as usize] | MS_TAB_33R[c as usize][(d % 33) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SEED_A, SEED_TAB};

    #[test]
    fn srol_wraps_each_half() {
        // bit 32 → bit 0, bit 63 → bit 33
        assert_eq!(srol(0x0000_0001_0000_0000), 0x0000_0000_0000_0001);
        assert_eq!(srol(0x8000_0000_0000_0000), 0x0000_0002_0000_0000);
        assert_eq!(srol(0x0000_0000_FFFF_FFFF), 0x0000_0001_FFFF_FFFE);
        assert_eq!(srol(u64::MAX), u64::MAX);
        assert_eq!(srol(0x0123_4567_89AB_CDEF), 0x0246_8ACD_1357_9BDF);
    }

    #[test]
    fn sror_wraps_each_half() {
        // bit 0 → bit 32, bit 33 → bit 63
        assert_eq!(sror(0x0000_0000_0000_0001), 0x0000_0001_0000_0000);
        assert_eq!(sror(0x0000_0002_0000_0000), 0x8000_0000_0000_0000);
        assert_eq!(sror(0x8000_0001_0000_0001), 0x4000_0001_8000_0000);
        assert_eq!(sror(0x0123_4567_89AB_CDEF), 0x8091_A2B3_C4D5_E6F7);
    }

    #[test]
    fn srol_n_agrees_with_repeated_srol() {
        let start = 0xDEAD_BEEF_0BAD_F00D_u64;
        let mut x = start;
        for d in 0..32 {
            assert_eq!(srol_n(start, d), x, "d = {d}");
            x = srol(x);
        }
    }

    #[test]
    fn srol_table_known_values() {
        // slot 0 is N, 1 = T, 3 = G, 4 = A, 7 = C
        assert_eq!(srol_table(0, 17), 0);
        assert_eq!(srol_table(4, 0), SEED_A);
        assert_eq!(srol_table(7, 1), 0x6327_8308_C540_5699);
        assert_eq!(srol_table(1, 33), 0xA555_27D1_4BE2_4456);
        assert_eq!(srol_table(4, 64), 0xF22F_EEC8_6571_811D);
    }

    #[test]
    fn srol_table_matches_iterated_srol() {
        // 31 * 33 = 1023 is the full period
        for c in [b'A', b'c', b'G', b't'] {
            let mut x = SEED_TAB[c as usize];
            for d in 0..1100u32 {
                assert_eq!(srol_table(c, d), x, "c = {} d = {d}", c as char);
                x = srol(x);
            }
            assert_eq!(srol_table(c, 1023), SEED_TAB[c as usize]);
        }
    }

    #[test]
    fn sror_undoes_srol() {
        let mut x = 0x0F1E_2D3C_4B5A_6978_u64;
        for _ in 0..100 {
            let y = srol(x);
            assert_eq!(sror(y), x);
            x = y ^ 0x9E37_79B9_7F4A_7C15;
        }
    }
}
