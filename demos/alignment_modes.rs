use gotoh_aligner::{align, AlignmentMode, AminoAcid, GapModel, ScoringMatrix, Sequence};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matrix = ScoringMatrix::blosum62();
    let gaps = GapModel::new(10, 1)?;

    let seq1: Sequence<AminoAcid> = "MKTAYIAKQRQISFVKSHFSRQ".parse()?;
    let seq2: Sequence<AminoAcid> = "GSHMKTAYIAKQRQISFVKSHF".parse()?;

    for mode in [
        AlignmentMode::Global,
        AlignmentMode::SemiGlobal,
        AlignmentMode::Local,
    ] {
        let result = align(&seq1, &seq2, &matrix, &gaps, mode)?;

        println!("{} alignment, score {}", mode, result.score());
        println!(
            "  {:?} {}",
            result.a_range(),
            String::from_utf8_lossy(&result.gapped_a())
        );
        println!(
            "  {:?} {}",
            result.b_range(),
            String::from_utf8_lossy(&result.gapped_b())
        );
        println!("  identity {:.1}%", result.stats().identity() * 100.0);
        println!();
    }

    Ok(())
}
