use nthash_rs::{NtHash, NtHashBuilder, NtHashError};

fn main() -> Result<(), NtHashError> {
    let seq = "ATCGTACGATGCNNATGCATGCTGACG";
    let kmer_size = 6;
    let num_hashes = 3;

    println!("## NtHashBuilder");
    let iter = NtHashBuilder::new(seq)
        .k(kmer_size)
        .num_hashes(num_hashes)
        .pos(0)
        .finish()?;

    for (pos, hashes) in iter {
        println!("{} {:x?}", &seq[pos..pos + kmer_size], hashes);
    }

    println!("## NtHash, backwards");
    let mut h = NtHash::new(seq.as_bytes(), kmer_size, num_hashes, seq.len())?;
    while h.roll_back() {
        let strand = if h.forward() { '+' } else { '-' };
        println!(
            "{:>2} {} {} {:016x}",
            h.pos(),
            &seq[h.pos()..h.pos() + kmer_size],
            strand,
            h.hashes()[0]
        );
    }

    Ok(())
}
