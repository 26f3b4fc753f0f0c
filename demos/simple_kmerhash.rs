use kmerhash_rs::{KmerHashBuilder, Result};

fn main() -> Result<()> {
    let seq = "ATCGTACGATGCATGCATGCTGACGNNATCGGGTTTAAACCC";

    // build the iterator
    let iter = KmerHashBuilder::new(seq.as_bytes())
        .mode_name("fast")
        .finish()?;

    for (pos, hashes) in iter {
        // print the cursor & the hashes (in hex debug)
        println!("{} {:x?}", pos, hashes);
    }

    Ok(())
}
