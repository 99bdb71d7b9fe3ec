use crate::alignment::{Alignment, AlignmentBuilder};
use crate::alignment_mode::AlignmentMode;
use crate::config::AlignerConfig;
use crate::engine;
use crate::gap::GapModel;
use crate::residue::Residue;
use crate::scoring::{Score, ScoringMatrix};
use crate::sequence::Sequence;
use crate::traceback::trace_back;
use crate::{AlignError, Side};

/// Optimal pairwise alignment of `a` against `b`.
///
/// Every residue of both sequences must belong to `matrix`'s alphabet.
pub fn align<R: Residue, S: Score>(
    a: &Sequence<R>,
    b: &Sequence<R>,
    matrix: &ScoringMatrix<S>,
    gaps: &GapModel<S>,
    mode: AlignmentMode,
) -> Result<Alignment<R, S>, AlignError> {
    align_with(a, b, matrix, gaps, &AlignerConfig::default().with_mode(mode))
}

fn check_size(n: usize, m: usize, limit: usize) -> Result<(), AlignError> {
    let cells = (n + 1)
        .checked_mul(m + 1)
        .ok_or(AlignError::SequenceTooLarge {
            cells: usize::MAX,
            limit,
        })?;
    if cells > limit {
        return Err(AlignError::SequenceTooLarge { cells, limit });
    }
    Ok(())
}

fn align_with<R: Residue, S: Score>(
    a: &Sequence<R>,
    b: &Sequence<R>,
    matrix: &ScoringMatrix<S>,
    gaps: &GapModel<S>,
    config: &AlignerConfig,
) -> Result<Alignment<R, S>, AlignError> {
    let encoded_a = matrix.encode(a, Side::A)?;
    let encoded_b = matrix.encode(b, Side::B)?;
    check_size(a.len(), b.len(), config.max_cells)?;

    log::debug!(
        "aligning {} x {} residues, mode {}, matrix {}",
        a.len(),
        b.len(),
        config.mode,
        matrix.name()
    );

    let (optimum, directions) =
        engine::fill_with_traceback(&encoded_a, &encoded_b, matrix, gaps, config.mode)?;

    let mut builder = AlignmentBuilder::with_capacity(config.mode, a.len() + b.len());
    let start = trace_back(
        &directions,
        a.residues(),
        b.residues(),
        (&encoded_a, &encoded_b),
        optimum.end,
        optimum.state,
        &mut builder,
    )?;

    builder.build(optimum.score, start.0..optimum.end.0, start.1..optimum.end.1)
}

/// Holds a scoring scheme and configuration for aligning many pairs.
///
/// Immutable after construction; share it across threads by reference or
/// behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Aligner<S: Score = i32> {
    matrix: ScoringMatrix<S>,
    gaps: GapModel<S>,
    config: AlignerConfig,
}

impl Default for Aligner<i32> {
    fn default() -> Self {
        Self::new(ScoringMatrix::dna_default(), GapModel::default())
    }
}

impl<S: Score> Aligner<S> {
    pub fn new(matrix: ScoringMatrix<S>, gaps: GapModel<S>) -> Self {
        Self {
            matrix,
            gaps,
            config: AlignerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AlignerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_alignment_mode(mut self, mode: AlignmentMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn matrix(&self) -> &ScoringMatrix<S> {
        &self.matrix
    }

    pub fn gaps(&self) -> &GapModel<S> {
        &self.gaps
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    pub fn mode(&self) -> AlignmentMode {
        self.config.mode
    }

    pub fn align<R: Residue>(
        &self,
        a: &Sequence<R>,
        b: &Sequence<R>,
    ) -> Result<Alignment<R, S>, AlignError> {
        align_with(a, b, &self.matrix, &self.gaps, &self.config)
    }

    /// The optimal score without the alignment itself. Needs no traceback
    /// storage, so the size guard does not apply.
    pub fn score<R: Residue>(&self, a: &Sequence<R>, b: &Sequence<R>) -> Result<S, AlignError> {
        let encoded_a = self.matrix.encode(a, Side::A)?;
        let encoded_b = self.matrix.encode(b, Side::B)?;
        engine::score_only(
            &encoded_a,
            &encoded_b,
            &self.matrix,
            &self.gaps,
            self.config.mode,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::AlignmentOperation;
    use crate::residue::{AminoAcid, Nucleotide};
    use crate::scoring::rescore;

    fn dna(text: &str) -> Sequence<Nucleotide> {
        text.parse().unwrap()
    }

    #[test]
    fn test_global_gattaca() {
        let matrix = ScoringMatrix::identity(1, -1);
        let gaps = GapModel::linear(1).unwrap();
        let alignment = align(
            &dna("GATTACA"),
            &dna("GCATGCU"),
            &matrix,
            &gaps,
            AlignmentMode::Global,
        )
        .unwrap();

        assert_eq!(alignment.score(), 0);
        assert_eq!(alignment.gapped_a(), b"G-ATTACA".to_vec());
        assert_eq!(alignment.gapped_b(), b"GCA-TGCU".to_vec());
        assert_eq!(alignment.a_range(), 0..7);
        assert_eq!(alignment.b_range(), 0..7);
    }

    #[test]
    fn test_local_textbook_blosum50() {
        let matrix = ScoringMatrix::blosum50();
        let gaps = GapModel::linear(8).unwrap();
        let a: Sequence<AminoAcid> = "HEAGAWGHEE".parse().unwrap();
        let b: Sequence<AminoAcid> = "PAWHEAE".parse().unwrap();
        let alignment = align(&a, &b, &matrix, &gaps, AlignmentMode::Local).unwrap();

        assert_eq!(alignment.score(), 28);
        assert_eq!(alignment.gapped_a(), b"AWGHE".to_vec());
        assert_eq!(alignment.gapped_b(), b"AW-HE".to_vec());
        assert_eq!(alignment.a_range(), 4..9);
        assert_eq!(alignment.b_range(), 1..5);
    }

    #[test]
    fn test_local_affine_blosum50() {
        // With a gap run costing open + extend, the gapped alignment above
        // drops to 20 and an ungapped one takes over.
        let matrix = ScoringMatrix::blosum50();
        let gaps = GapModel::new(8, 8).unwrap();
        let a: Sequence<AminoAcid> = "HEAGAWGHEE".parse().unwrap();
        let b: Sequence<AminoAcid> = "PAWHEAE".parse().unwrap();
        let alignment = align(&a, &b, &matrix, &gaps, AlignmentMode::Local).unwrap();

        assert_eq!(alignment.score(), 23);
        assert_eq!(alignment.gapped_a(), b"AWGHEE".to_vec());
        assert_eq!(alignment.gapped_b(), b"AWHEAE".to_vec());
        assert_eq!(alignment.a_range(), 4..10);
        assert_eq!(alignment.b_range(), 1..7);
    }

    #[test]
    fn test_empty_inputs() {
        let aligner = Aligner::default();
        let empty = dna("");
        let acgt = dna("ACGT");

        let global = aligner.align(&empty, &acgt).unwrap();
        assert_eq!(global.score(), -(crate::DNA_GAP_OPEN + 4 * crate::DNA_GAP_EXT));
        assert_eq!(global.len(), 4);
        assert!(global.operations().iter().all(|op| matches!(op, AlignmentOperation::Insertion(_))));
        assert_eq!(global.a_range(), 0..0);
        assert_eq!(global.b_range(), 0..4);

        let local = aligner
            .clone()
            .with_alignment_mode(AlignmentMode::Local)
            .align(&empty, &acgt)
            .unwrap();
        assert_eq!(local.score(), 0);
        assert!(local.is_empty());

        let both = aligner.align(&empty, &empty).unwrap();
        assert_eq!(both.score(), 0);
        assert!(both.is_empty());
    }

    #[test]
    fn test_unknown_residue_is_rejected() {
        let matrix = ScoringMatrix::identity_over(b"ACGT", 1, -1).unwrap();
        let gaps = GapModel::linear(1).unwrap();
        let err = align(&dna("ACGT"), &dna("ACNT"), &matrix, &gaps, AlignmentMode::Global)
            .unwrap_err();
        assert!(matches!(
            err,
            AlignError::UnknownResidue { symbol: 'N', position: 2, side: Side::B }
        ));
    }

    #[test]
    fn test_size_guard() {
        let config = AlignerConfig::new().with_max_cells(20).unwrap();
        let aligner = Aligner::default().with_config(config);
        let err = aligner.align(&dna("ACGTACGT"), &dna("ACGT")).unwrap_err();
        assert!(matches!(
            err,
            AlignError::SequenceTooLarge { cells: 45, limit: 20 }
        ));
        // Score-only needs no traceback storage.
        assert!(aligner.score(&dna("ACGTACGT"), &dna("ACGT")).is_ok());
    }

    #[test]
    fn test_alignment_rescores_to_reported_score() {
        let aligner = Aligner::new(ScoringMatrix::identity(2, -3), GapModel::new(5, 2).unwrap());
        let a = dna("TTGACCTAGGACTTTAGC");
        let b = dna("TGACTAGCACTAGC");
        for mode in [
            AlignmentMode::Global,
            AlignmentMode::Local,
            AlignmentMode::SemiGlobal,
        ] {
            let aligner = aligner.clone().with_alignment_mode(mode);
            let alignment = aligner.align(&a, &b).unwrap();
            let rescored = rescore(alignment.operations(), aligner.matrix(), aligner.gaps()).unwrap();
            assert_eq!(rescored, alignment.score(), "{mode}");
            assert_eq!(aligner.score(&a, &b).unwrap(), alignment.score(), "{mode}");
            assert_eq!(alignment.mode(), mode);
        }
    }

    #[test]
    fn test_tie_prefers_diagonal_then_deletion() {
        // AA vs A: the match can pair either A; the diagonal step is taken
        // first from the end, leaving the gap at the front.
        let matrix = ScoringMatrix::identity(1, -1);
        let gaps = GapModel::linear(1).unwrap();
        let seq = |s: &str| -> Sequence<u8> { s.parse().unwrap() };
        let alignment = align(&seq("AA"), &seq("A"), &matrix, &gaps, AlignmentMode::Global).unwrap();
        assert_eq!(alignment.gapped_a(), b"AA".to_vec());
        assert_eq!(alignment.gapped_b(), b"-A".to_vec());

        // AC vs CA: at (2, 2) Ix and Iy tie; Ix (deletion) is preferred.
        let alignment = align(&seq("AC"), &seq("CA"), &matrix, &gaps, AlignmentMode::Global).unwrap();
        assert_eq!(alignment.score(), -1);
        assert_eq!(alignment.gapped_a(), b"-AC".to_vec());
        assert_eq!(alignment.gapped_b(), b"CA-".to_vec());
    }

    #[test]
    fn test_long_gap_run_with_large_penalties() {
        let matrix = ScoringMatrix::identity(1, -1);
        let gaps = GapModel::linear(1_000_000).unwrap();
        let a: Sequence<u8> = "A".repeat(600).parse().unwrap();
        let empty: Sequence<u8> = "".parse().unwrap();

        let alignment = align(&a, &empty, &matrix, &gaps, AlignmentMode::Global).unwrap();
        assert_eq!(alignment.score(), -600_000_000);
        assert_eq!(alignment.len(), 600);
        assert_eq!(alignment.stats().deletions, 600);
        assert_eq!(alignment.a_range(), 0..600);
        assert_eq!(alignment.b_range(), 0..0);
    }

    #[test]
    fn test_score_overflow_is_reported() {
        let matrix = ScoringMatrix::identity(1, -1);
        let gaps = GapModel::linear(1_000_000).unwrap();
        let a: Sequence<u8> = "A".repeat(3000).parse().unwrap();
        let empty: Sequence<u8> = "".parse().unwrap();

        let err = align(&a, &empty, &matrix, &gaps, AlignmentMode::Global).unwrap_err();
        assert!(matches!(err, AlignError::ScoreOverflow { col: 0, .. }));

        let aligner = Aligner::new(matrix, gaps);
        assert!(matches!(
            aligner.score(&a, &empty),
            Err(AlignError::ScoreOverflow { .. })
        ));

        // The same alignment fits a wider score type.
        let wide = align(
            &a,
            &empty,
            &ScoringMatrix::<i64>::identity(1, -1),
            &GapModel::linear(1_000_000i64).unwrap(),
            AlignmentMode::Global,
        )
        .unwrap();
        assert_eq!(wide.score(), -3_000_000_000);
        assert_eq!(wide.a_range(), 0..3000);
    }

    #[test]
    fn test_case_folded_symbols_are_matches() {
        let matrix = ScoringMatrix::identity(1, -1);
        let gaps = GapModel::linear(1).unwrap();
        let a: Sequence<u8> = "acgt".parse().unwrap();
        let b: Sequence<u8> = "ACGT".parse().unwrap();

        let alignment = align(&a, &b, &matrix, &gaps, AlignmentMode::Global).unwrap();
        assert_eq!(alignment.score(), 4);
        assert!(alignment
            .operations()
            .iter()
            .all(|op| matches!(op, AlignmentOperation::Match(_))));
        assert_eq!(alignment.stats().identity(), 1.0);
    }

    #[test]
    fn test_float_scores() {
        let matrix: ScoringMatrix<f64> = ScoringMatrix::identity(1.0, -1.0);
        let gaps = GapModel::new(0.5, 0.25).unwrap();
        let alignment = align(&dna("ACGT"), &dna("AGT"), &matrix, &gaps, AlignmentMode::Global)
            .unwrap();
        assert_eq!(alignment.score(), 3.0 - 0.75);
        assert_eq!(alignment.gapped_b(), b"A-GT".to_vec());
    }
}
