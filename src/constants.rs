//! Seed values, lookup tables and mixing constants shared by every hasher.
//!
//! Everything here is evaluated at compile time.  The per‑base seeds are the
//! published ntHash constants; all other tables are derived from them:
//!
//! - `SEED_TAB` maps any byte to its seed (`SEED_N` for invalid bytes).
//!   Indices `1, 3, 4, 5, 7` hold the seeds reached through `c & CP_OFF`,
//!   which is how the reverse‑complement strand looks up `A↔T` / `C↔G`.
//! - `MS_TAB_31L` / `MS_TAB_33R` hold every split‑rotation of every seed so
//!   that `srol_table` never loops.
//! - `DIMER_TAB`, `TRIMER_TAB` and `TETRAMER_TAB` pre‑combine 2/3/4 rotated
//!   seeds for the O(k) window initialisation.

use crate::tables::srol_n;

pub const SEED_A: u64 = 0x3c8b_fbb3_95c6_0474;
pub const SEED_C: u64 = 0x3193_c185_62a0_2b4c;
pub const SEED_G: u64 = 0x2032_3ed0_8257_2324;
pub const SEED_T: u64 = 0x2955_49f5_4be2_4456;
/// Seed of every byte outside the nucleotide alphabet.
pub const SEED_N: u64 = 0x0000_0000_0000_0000;

/// `c & CP_OFF` maps a base to the table slot holding its complement's seed.
pub const CP_OFF: u8 = 0x07;

pub const MULTISEED: u64 = 0x90b4_5d39_fb6d_a1fa;
pub const MULTISHIFT: u32 = 27;

/// Marker in `CONVERT_TAB` / `RC_CONVERT_TAB` for bytes that are not a base.
pub const INVALID_CODE: u8 = u8::MAX;

pub const SEED_TAB: [u64; 256] = {
    let mut t = [SEED_N; 256];
    // complement slots (`c & CP_OFF`)
    t[1] = SEED_T; // A
    t[3] = SEED_G; // C
    t[4] = SEED_A; // T
    t[5] = SEED_A; // U
    t[7] = SEED_C; // G

    t[b'A' as usize] = SEED_A;
    t[b'a' as usize] = SEED_A;
    t[b'C' as usize] = SEED_C;
    t[b'c' as usize] = SEED_C;
    t[b'G' as usize] = SEED_G;
    t[b'g' as usize] = SEED_G;
    t[b'T' as usize] = SEED_T;
    t[b't' as usize] = SEED_T;
    t[b'U' as usize] = SEED_T;
    t[b'u' as usize] = SEED_T;
    t
};

const MASK_33: u64 = 0x0000_0001_FFFF_FFFF;
const MASK_31: u64 = 0x0000_0000_7FFF_FFFF;

const fn rotations_33r(seed: u64) -> [u64; 33] {
    let lo = seed & MASK_33;
    let mut out = [0u64; 33];
    out[0] = lo;
    let mut d = 1;
    while d < 33 {
        out[d] = ((lo << d) | (lo >> (33 - d))) & MASK_33;
        d += 1;
    }
    out
}

const fn rotations_31l(seed: u64) -> [u64; 31] {
    let hi = seed >> 33;
    let mut out = [0u64; 31];
    out[0] = hi << 33;
    let mut d = 1;
    while d < 31 {
        out[d] = (((hi << d) | (hi >> (31 - d))) & MASK_31) << 33;
        d += 1;
    }
    out
}

/// Upper 31‑bit half of `srol^d(SEED_TAB[c])`, indexed `[c][d % 31]`.
pub static MS_TAB_31L: [[u64; 31]; 256] = {
    let mut tab = [[0u64; 31]; 256];
    let mut c = 0;
    while c < 256 {
        tab[c] = rotations_31l(SEED_TAB[c]);
        c += 1;
    }
    tab
};

/// Lower 33‑bit half of `srol^d(SEED_TAB[c])`, indexed `[c][d % 33]`.
pub static MS_TAB_33R: [[u64; 33]; 256] = {
    let mut tab = [[0u64; 33]; 256];
    let mut c = 0;
    while c < 256 {
        tab[c] = rotations_33r(SEED_TAB[c]);
        c += 1;
    }
    tab
};

/// Seeds in 2‑bit code order (`A=0, C=1, G=2, T=3`).
const CODE_SEEDS: [u64; 4] = [SEED_A, SEED_C, SEED_G, SEED_T];

const fn code_of(seed: u64) -> u8 {
    match seed {
        SEED_A => 0,
        SEED_C => 1,
        SEED_G => 2,
        SEED_T => 3,
        _ => INVALID_CODE,
    }
}

/// Byte → 2‑bit code, consistent with `SEED_TAB`.
pub const CONVERT_TAB: [u8; 256] = {
    let mut t = [INVALID_CODE; 256];
    let mut c = 0;
    while c < 256 {
        t[c] = code_of(SEED_TAB[c]);
        c += 1;
    }
    t
};

/// Byte → 2‑bit code of its complement.
pub const RC_CONVERT_TAB: [u8; 256] = {
    let mut t = [INVALID_CODE; 256];
    let mut c = 0;
    while c < 256 {
        let code = CONVERT_TAB[c];
        if code != INVALID_CODE {
            t[c] = 3 - code;
        }
        c += 1;
    }
    t
};

/// `n`‑mer table: entry `i` hashes the `n` bases whose codes are the base‑4
/// digits of `i`, most significant digit first.
const fn nmer_table<const N: usize>(n: u32) -> [u64; N] {
    let mut tab = [0u64; N];
    let mut i = 0;
    while i < N {
        let mut h = 0u64;
        let mut j = 0;
        while j < n {
            let code = (i >> (2 * (n - 1 - j))) & 0b11;
            h = srol_n(h, 1) ^ CODE_SEEDS[code];
            j += 1;
        }
        tab[i] = h;
        i += 1;
    }
    tab
}

pub const DIMER_TAB: [u64; 16] = nmer_table::<16>(2);
pub const TRIMER_TAB: [u64; 64] = nmer_table::<64>(3);
pub static TETRAMER_TAB: [u64; 256] = nmer_table::<256>(4);
