use std::ops::Range;

use crate::alignment_mode::AlignmentMode;
use crate::residue::{Residue, GAP_SYMBOL};
use crate::scoring::{AlignmentStats, Score};
use crate::{AlignError, Side};

/// One column of a pairwise alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignmentOperation<R> {
    Match(R),
    Mismatch(R, R),
    /// Residue of A against a gap in B.
    Deletion(R),
    /// Gap in A against a residue of B.
    Insertion(R),
}

impl<R: Residue> AlignmentOperation<R> {
    pub fn a_residue(&self) -> Option<R> {
        match *self {
            AlignmentOperation::Match(r) => Some(r),
            AlignmentOperation::Mismatch(a, _) => Some(a),
            AlignmentOperation::Deletion(a) => Some(a),
            AlignmentOperation::Insertion(_) => None,
        }
    }

    pub fn b_residue(&self) -> Option<R> {
        match *self {
            AlignmentOperation::Match(r) => Some(r),
            AlignmentOperation::Mismatch(_, b) => Some(b),
            AlignmentOperation::Deletion(_) => None,
            AlignmentOperation::Insertion(b) => Some(b),
        }
    }

    /// Both sides of the column, `None` standing for the gap symbol.
    pub fn gap_pair(&self) -> (Option<R>, Option<R>) {
        (self.a_residue(), self.b_residue())
    }

    pub fn is_gap(&self) -> bool {
        matches!(
            self,
            AlignmentOperation::Deletion(_) | AlignmentOperation::Insertion(_)
        )
    }
}

/// The result of aligning two sequences. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment<R: Residue, S: Score = i32> {
    score: S,
    operations: Vec<AlignmentOperation<R>>,
    a_range: Range<usize>,
    b_range: Range<usize>,
    mode: AlignmentMode,
}

impl<R: Residue, S: Score> Alignment<R, S> {
    pub fn score(&self) -> S {
        self.score
    }

    /// Columns from the start of both sequences towards their end.
    pub fn operations(&self) -> &[AlignmentOperation<R>] {
        &self.operations
    }

    /// Half-open range of sequence A covered by the alignment.
    pub fn a_range(&self) -> Range<usize> {
        self.a_range.clone()
    }

    /// Half-open range of sequence B covered by the alignment.
    pub fn b_range(&self) -> Range<usize> {
        self.b_range.clone()
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Row A with `-` in gap columns.
    pub fn gapped_a(&self) -> Vec<u8> {
        self.operations
            .iter()
            .map(|op| op.a_residue().map_or(GAP_SYMBOL, Residue::symbol))
            .collect()
    }

    /// Row B with `-` in gap columns.
    pub fn gapped_b(&self) -> Vec<u8> {
        self.operations
            .iter()
            .map(|op| op.b_residue().map_or(GAP_SYMBOL, Residue::symbol))
            .collect()
    }

    pub fn stats(&self) -> AlignmentStats {
        let mut stats = AlignmentStats::default();
        let mut previous: Option<&AlignmentOperation<R>> = None;

        for op in &self.operations {
            match op {
                AlignmentOperation::Match(_) => stats.matches += 1,
                AlignmentOperation::Mismatch(..) => stats.mismatches += 1,
                AlignmentOperation::Deletion(_) => {
                    stats.deletions += 1;
                    if !matches!(previous, Some(AlignmentOperation::Deletion(_))) {
                        stats.gap_opens += 1;
                    }
                }
                AlignmentOperation::Insertion(_) => {
                    stats.insertions += 1;
                    if !matches!(previous, Some(AlignmentOperation::Insertion(_))) {
                        stats.gap_opens += 1;
                    }
                }
            }
            previous = Some(op);
        }

        stats
    }
}

/// Append-only construction of an [`Alignment`].
///
/// Operations are pushed in traceback order, i.e. from the end of the
/// sequences towards their start; `build` reverses them. A builder produces
/// exactly one alignment: any call after `build` fails with
/// [`AlignError::BuilderFinished`].
#[derive(Debug)]
pub struct AlignmentBuilder<R: Residue> {
    operations: Vec<AlignmentOperation<R>>,
    mode: AlignmentMode,
    finished: bool,
}

impl<R: Residue> AlignmentBuilder<R> {
    pub fn new(mode: AlignmentMode) -> Self {
        Self::with_capacity(mode, 0)
    }

    pub fn with_capacity(mode: AlignmentMode, capacity: usize) -> Self {
        Self {
            operations: Vec::with_capacity(capacity),
            mode,
            finished: false,
        }
    }

    pub fn add_match(&mut self, residue: R) -> Result<(), AlignError> {
        self.add_operation(AlignmentOperation::Match(residue))
    }

    pub fn add_mismatch(&mut self, a: R, b: R) -> Result<(), AlignError> {
        self.add_operation(AlignmentOperation::Mismatch(a, b))
    }

    /// Adds a gap column. Exactly one side must carry a residue.
    pub fn add_gap(&mut self, a: Option<R>, b: Option<R>) -> Result<(), AlignError> {
        let op = match (a, b) {
            (Some(a), None) => AlignmentOperation::Deletion(a),
            (None, Some(b)) => AlignmentOperation::Insertion(b),
            _ => return Err(AlignError::InvalidGap),
        };
        self.add_operation(op)
    }

    pub fn add_operation(&mut self, op: AlignmentOperation<R>) -> Result<(), AlignError> {
        if self.finished {
            return Err(AlignError::BuilderFinished);
        }
        self.operations.push(op);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Finalizes the alignment. `a_range` and `b_range` must span exactly the
    /// residues consumed on each side.
    pub fn build<S: Score>(
        &mut self,
        score: S,
        a_range: Range<usize>,
        b_range: Range<usize>,
    ) -> Result<Alignment<R, S>, AlignError> {
        if self.finished {
            return Err(AlignError::BuilderFinished);
        }

        let consumed_a = self.operations.iter().filter(|op| op.a_residue().is_some()).count();
        let consumed_b = self.operations.iter().filter(|op| op.b_residue().is_some()).count();
        check_range(Side::A, &a_range, consumed_a)?;
        check_range(Side::B, &b_range, consumed_b)?;

        self.finished = true;
        let mut operations = std::mem::take(&mut self.operations);
        operations.reverse();

        Ok(Alignment {
            score,
            operations,
            a_range,
            b_range,
            mode: self.mode,
        })
    }
}

fn check_range(side: Side, range: &Range<usize>, consumed: usize) -> Result<(), AlignError> {
    if range.start > range.end || range.end - range.start != consumed {
        return Err(AlignError::InconsistentRange {
            side,
            range: range.clone(),
            consumed,
        });
    }
    Ok(())
}
