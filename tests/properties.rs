use nthash_rs::{sub_hash, BlindNtHash, NtHash, SeedNtHash};
use proptest::prelude::*;

fn dna_seq(len: impl Into<proptest::collection::SizeRange>) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')],
        len,
    )
}

/// DNA with roughly one N in ten.
fn dna_with_n(len: impl Into<proptest::collection::SizeRange>) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        prop_oneof![
            9 => prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')],
            1 => Just(b'N'),
        ],
        len,
    )
}

fn mask(k: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just('0'), Just('1')], k)
        .prop_map(|v| v.into_iter().collect())
}

fn fresh(window: &[u8], m: usize) -> (u64, u64, Vec<u64>) {
    let mut h = NtHash::new(window, window.len(), m, 0).unwrap();
    assert!(h.roll());
    (h.forward_hash(), h.reverse_hash(), h.hashes().to_vec())
}

fn valid(window: &[u8]) -> bool {
    window.iter().all(|c| b"ACGT".contains(c))
}

proptest! {
    #[test]
    fn rolled_hashes_equal_fresh_hashes(
        seq in dna_with_n(1..120),
        k in 1usize..40,
        m in 1usize..5,
    ) {
        let mut h = NtHash::new(&seq, k, m, 0).unwrap();
        let mut expected = (0..seq.len().saturating_sub(k - 1))
            .filter(|&p| valid(&seq[p..p + k]));
        while h.roll() {
            prop_assert_eq!(Some(h.pos()), expected.next());
            let (_, _, hashes) = fresh(&seq[h.pos()..h.pos() + k], m);
            prop_assert_eq!(h.hashes(), &hashes[..]);
        }
        prop_assert_eq!(expected.next(), None);
    }

    #[test]
    fn roll_back_visits_the_same_windows(seq in dna_with_n(1..120), k in 1usize..20) {
        let mut fwd = NtHash::new(&seq, k, 2, 0).unwrap();
        let mut forward = Vec::new();
        while fwd.roll() {
            forward.push((fwd.pos(), fwd.hashes().to_vec()));
        }
        let mut bwd = NtHash::new(&seq, k, 2, seq.len()).unwrap();
        let mut backward = Vec::new();
        while bwd.roll_back() {
            backward.push((bwd.pos(), bwd.hashes().to_vec()));
        }
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn roll_then_roll_back_round_trips(seq in dna_seq(10..80), k in 1usize..10, start in 0usize..60) {
        prop_assume!(start + k < seq.len());
        let mut h = NtHash::new(&seq, k, 1, start).unwrap();
        prop_assert!(h.roll());
        let before = (h.pos(), h.forward_hash(), h.reverse_hash());
        prop_assert!(h.roll());
        prop_assert!(h.roll_back());
        prop_assert_eq!((h.pos(), h.forward_hash(), h.reverse_hash()), before);
    }

    #[test]
    fn canonical_hash_is_strand_independent(window in dna_seq(1..64)) {
        let rc: Vec<u8> = window
            .iter()
            .rev()
            .map(|&c| match c {
                b'A' => b'T',
                b'C' => b'G',
                b'G' => b'C',
                _ => b'A',
            })
            .collect();
        let (f, r, hashes) = fresh(&window, 3);
        let (rc_f, rc_r, rc_hashes) = fresh(&rc, 3);
        prop_assert_eq!((f, r), (rc_r, rc_f));
        prop_assert_eq!(hashes, rc_hashes);
    }

    #[test]
    fn sub_equals_rehash_of_edited_window(
        window in dna_seq(1..50),
        edits in proptest::collection::vec((0usize..50, prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')]), 0..6),
    ) {
        let k = window.len();
        let edits: Vec<(usize, u8)> = edits.into_iter().map(|(p, c)| (p % k, c)).collect();
        let positions: Vec<usize> = edits.iter().map(|e| e.0).collect();
        let bases: Vec<u8> = edits.iter().map(|e| e.1).collect();

        let mut edited = window.clone();
        for &(p, c) in &edits {
            edited[p] = c;
        }
        let (ef, er, ehashes) = fresh(&edited, 2);

        let (f, r, _) = fresh(&window, 2);
        prop_assert_eq!(sub_hash(f, r, &window, &positions, &bases, k as u16).unwrap(), (ef, er));

        let mut h = NtHash::new(&window, k, 2, 0).unwrap();
        prop_assert!(h.roll());
        h.sub(&positions, &bases).unwrap();
        prop_assert_eq!(h.hashes(), &ehashes[..]);

        let mut blind = BlindNtHash::new(&window, k, 2, 0).unwrap();
        blind.sub(&positions, &bases).unwrap();
        prop_assert_eq!(blind.hashes(), &ehashes[..]);
        prop_assert_eq!(blind.window(), edited);
    }

    #[test]
    fn blind_ring_holds_last_k_bases(start in dna_seq(1..20), feed in dna_seq(0..60)) {
        let k = start.len();
        let mut h = BlindNtHash::new(&start, k, 1, 0).unwrap();
        let mut all = start.clone();
        for &c in &feed {
            prop_assert!(h.roll(c));
            all.push(c);
            let tail = &all[all.len() - k..];
            prop_assert_eq!(h.window(), tail.to_vec());
            prop_assert_eq!(h.hashes(), &fresh(tail, 1).2[..]);
        }
        prop_assert_eq!(h.pos(), feed.len());
    }

    #[test]
    fn seed_hashes_equal_masked_fresh_hashes(
        (k, masks) in (1usize..16).prop_flat_map(|k| (Just(k), proptest::collection::vec(mask(k), 1..4))),
        seq in dna_with_n(1..80),
    ) {
        let mut h = SeedNtHash::new(&seq, &masks, 2, k, 0).unwrap();
        while h.roll() {
            let w = &seq[h.pos()..h.pos() + k];
            for (i, m) in masks.iter().enumerate() {
                // blank out the don't-care bases: N seeds are zero
                let kept: Vec<u8> = w
                    .iter()
                    .zip(m.bytes())
                    .map(|(&c, bit)| if bit == b'1' { c } else { b'N' })
                    .collect();
                let (f, r) = masked_strands(&kept);
                let mut expected = vec![0; 2];
                nthash_rs::extend_hashes(f, r, k as u32, &mut expected);
                prop_assert_eq!(h.seed_hashes(i), &expected[..]);
                prop_assert_eq!((h.forward_hashes()[i], h.reverse_hashes()[i]), (f, r));
            }
        }
    }
}

/// Strand hashes of a window in which `N` contributes nothing.
fn masked_strands(window: &[u8]) -> (u64, u64) {
    let k = window.len() as u32;
    window.iter().enumerate().fold((0, 0), |(f, r), (p, &c)| {
        let p = p as u32;
        (
            f ^ nthash_rs::srol_table(c, k - 1 - p),
            r ^ nthash_rs::srol_table(c & 0x07, p),
        )
    })
}
