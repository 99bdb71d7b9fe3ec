use gotoh_aligner::{
    AlignError, Aligner, AlignmentMode, AminoAcid, BatchAligner, BatchConfig, GapModel,
    ScoringMatrix, Sequence,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn protein(text: &str) -> Sequence<AminoAcid> {
    text.parse().unwrap()
}

fn blosum_aligner(mode: AlignmentMode) -> Aligner {
    Aligner::new(ScoringMatrix::blosum62(), GapModel::new(10, 1).unwrap()).with_alignment_mode(mode)
}

#[test]
fn batch_matches_sequential_alignment() {
    init();
    let aligner = blosum_aligner(AlignmentMode::Local);
    let sequences = [
        "HEAGAWGHEE",
        "PAWHEAE",
        "MKTAYIAKQRQISFVKSHFSRQ",
        "GSHMKTAYIAKQ",
        "WWWWW",
        "",
    ];
    let pairs: Vec<_> = sequences
        .iter()
        .flat_map(|a| sequences.iter().map(move |b| (protein(a), protein(b))))
        .collect();
    let expected: Vec<_> = pairs
        .iter()
        .map(|(a, b)| aligner.align(a, b).unwrap())
        .collect();

    let config = BatchConfig::new()
        .with_workers(4)
        .unwrap()
        .with_queue_depth(2)
        .unwrap();
    let mut pool = BatchAligner::new(aligner, config);
    assert_eq!(pool.config().workers, 4);

    let results = pool.align_all(pairs).unwrap();
    assert_eq!(results.len(), sequences.len() * sequences.len());
    assert_eq!(results, expected);
}

#[test]
fn batch_reports_lowest_failing_pair() {
    init();
    let matrix = ScoringMatrix::identity_over(b"ACDEFGHIKLMNPQRSTVWY", 5, -4).unwrap();
    let aligner = Aligner::new(matrix, GapModel::new(10, 1).unwrap());
    let mut pool = BatchAligner::new(aligner, BatchConfig::new().with_workers(3).unwrap());

    let err = pool
        .align_all(vec![
            (protein("MKTAY"), protein("MKTAY")),
            (protein("MKTAY"), protein("MKXAY")),
            (protein("BKTAY"), protein("MKTAY")),
        ])
        .unwrap_err();

    match err {
        AlignError::UnknownResidue { symbol, position, .. } => {
            assert_eq!(symbol, 'X');
            assert_eq!(position, 2);
        }
        other => panic!("unexpected error: {other}"),
    }

    // The pool keeps working after a failed batch.
    let results = pool
        .align_all(vec![(protein("MKTAY"), protein("MKTAY"))])
        .unwrap();
    assert_eq!(results[0].score(), 25);
}
