use gotoh_aligner::{Aligner, AlignmentMode, BatchAligner, BatchConfig, Nucleotide, Sequence};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let aligner = Aligner::default().with_alignment_mode(AlignmentMode::Local);
    let config = BatchConfig::new().with_queue_depth(8)?;
    let mut pool: BatchAligner<Nucleotide> = BatchAligner::new(aligner, config);

    let pairs = [
        ("ACGTACGT", "ACGTAGCT"),
        ("GGTTAACC", "GGTTAACT"),
        ("TTGACCTAGGACT", "TGACTAGCACT"),
        ("AAAACCCCGGGGTTTT", "CCCCGGGG"),
    ]
    .iter()
    .map(|(a, b)| Ok((a.parse()?, b.parse()?)))
    .collect::<Result<Vec<(Sequence<Nucleotide>, Sequence<Nucleotide>)>, gotoh_aligner::AlignError>>()?;

    let results = pool.align_all(pairs)?;

    for (i, result) in results.iter().enumerate() {
        println!("Alignment {}: score = {}", i, result.score());
        println!("  {}", String::from_utf8_lossy(&result.gapped_a()));
        println!("  {}", String::from_utf8_lossy(&result.gapped_b()));
    }

    Ok(())
}
