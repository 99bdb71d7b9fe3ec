use std::env;

use gotoh_aligner::{Aligner, AlignmentMode, Sequence, VERSION};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let mode: AlignmentMode = match args.next() {
        Some(mode) => mode.parse()?,
        None => AlignmentMode::Global,
    };
    let seq_a: Sequence<u8> = args.next().as_deref().unwrap_or("ACGTACGT").parse()?;
    let seq_b: Sequence<u8> = args.next().as_deref().unwrap_or("ACGTAGCT").parse()?;

    println!("gotoh_aligner {}", VERSION);

    let aligner = Aligner::default().with_alignment_mode(mode);
    let alignment = aligner.align(&seq_a, &seq_b)?;

    println!("Mode: {}", alignment.mode());
    println!("Score: {}", alignment.score());
    println!("A[{:?}]: {}", alignment.a_range(), String::from_utf8_lossy(&alignment.gapped_a()));
    println!("B[{:?}]: {}", alignment.b_range(), String::from_utf8_lossy(&alignment.gapped_b()));

    let stats = alignment.stats();
    println!(
        "Matches: {}, mismatches: {}, gaps: {} ({} runs), identity: {:.1}%",
        stats.matches,
        stats.mismatches,
        stats.insertions + stats.deletions,
        stats.gap_opens,
        stats.identity() * 100.0
    );

    Ok(())
}
