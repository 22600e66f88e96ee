//! Greedy extension of a k-mer one base at a time, the way an assembly
//! graph walk would use `BlindNtHash`: every candidate base is peeked, the
//! one with the smallest hash is committed.

use nthash_rs::{BlindNtHash, Result};

fn main() -> Result<()> {
    let start = b"ACGTTGCAAGGCT";
    let k = start.len();
    let mut walker = BlindNtHash::new(start, k, 1, 0)?;

    println!("{} {:016x}", String::from_utf8_lossy(&walker.window()), walker.hashes()[0]);
    for _ in 0..10 {
        let mut best = None;
        for &c in b"ACGT" {
            if walker.peek(c) && best.map_or(true, |(_, h)| walker.hashes()[0] < h) {
                best = Some((c, walker.hashes()[0]));
            }
        }
        let Some((c, _)) = best else { break };
        walker.roll(c);
        println!(
            "{} {:016x} (+{})",
            String::from_utf8_lossy(&walker.window()),
            walker.hashes()[0],
            c as char
        );
    }

    // branches are independent copies
    let mut left = walker.clone();
    left.roll_back(b'T');
    println!("back: {} pos={}", String::from_utf8_lossy(&left.window()), left.pos());
    println!("kept: {} pos={}", String::from_utf8_lossy(&walker.window()), walker.pos());
    Ok(())
}
