use nthash_rs::{parse_seeds, Result, SeedNtHash, SeedNtHashBuilder};

fn main() -> Result<()> {
    println!("# SeedNtHash");
    let seq = "ATCGTACGATGCATGCATGCTGACG";
    let seed_masks = ["000111", "010101", "1100111011"];
    let k = 6;
    let m2 = 2;

    println!("## Decompositions");
    let mut h = SeedNtHash::new(seq.as_bytes(), &seed_masks[..2], m2, k, 0)?;
    for d in h.decompositions() {
        println!(
            "{} {:?} blocks={:?} monomers={:?}",
            d.to_mask(),
            d.polarity(),
            d.blocks(),
            d.monomers()
        );
    }

    println!("## Low-level API");
    while h.roll() {
        let pos = h.pos();
        println!("{} {:x?}", &seq[pos..pos + k], h.hashes());
    }

    println!("## SeedNtHashBuilder, k = 10, don't-care lists");
    let seeds = parse_seeds(&seed_masks[2..])?;
    let iter = SeedNtHashBuilder::new(seq)
        .k(10)
        .dont_care(seeds)
        .num_hashes(m2)
        .pos(0)
        .finish()?;

    for (pos, hashes) in iter {
        println!("{} {:x?}", &seq[pos..pos + 10], hashes);
    }

    Ok(())
}
