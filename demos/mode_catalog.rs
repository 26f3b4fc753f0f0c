use kmerhash_rs::{KmerHash, KmerMode, KmerParams};
use std::sync::Arc;

fn main() {
    let seqs: [&[u8]; 2] = [
        b"GATTACAGATTACAGGGCCCTTTAAAGCGCGTATATCCGGATC",
        b"TTNNACGTRYACGTACGTACGTACGTACGT",
    ];

    for mode in KmerMode::ALL {
        let params = Arc::new(KmerParams::new(mode));
        println!(
            "# {} [{}] {}: sizes {:?}",
            mode as u8,
            mode,
            params.density(),
            params.kmer_sizes()
        );

        // one hasher per preset, re-linked for each sequence
        let mut hasher = KmerHash::new(params.clone());
        for seq in seqs {
            hasher.link(seq);
            let mut n = 0usize;
            while hasher.advance() {
                n += 1;
            }
            println!("  {} bytes -> {} positions", seq.len(), n);
        }
    }
}
