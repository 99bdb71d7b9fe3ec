//! Gotoh's three-layer dynamic programme.
//!
//! With `first = open + extend`:
//!
//! ```text
//! M[i][j]  = max(M, Ix, Iy)[i-1][j-1] + s(A[i-1], B[j-1])
//! Ix[i][j] = max(M[i-1][j] - first, Ix[i-1][j] - extend, Iy[i-1][j] - first)
//! Iy[i][j] = max(M[i][j-1] - first, Ix[i][j-1] - first, Iy[i][j-1] - extend)
//! ```
//!
//! Ties go to `M`, then `Ix`, then `Iy`. Scores are kept in rolling rows; only
//! the packed pointers of [`TracebackMatrix`] are stored for every cell.

use crate::alignment_mode::AlignmentMode;
use crate::gap::GapModel;
use crate::scoring::{Score, ScoringMatrix};
use crate::traceback::{Cell, DirectionSink, Pointer, State, TracebackMatrix};
use crate::AlignError;

/// Where the optimal alignment ends and what it scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Optimum<S> {
    pub score: S,
    pub end: (usize, usize),
    pub state: State,
}

#[inline]
fn best_of<S: Score>(m: S, ix: S, iy: S) -> (S, State) {
    let mut best = (m, State::Match);
    if ix > best.0 {
        best = (ix, State::Deletion);
    }
    if iy > best.0 {
        best = (iy, State::Insertion);
    }
    best
}

/// `from + delta`. Unreachable cells stay unreachable; a reachable value that
/// would drop to the sentinel or past the type's range is an overflow.
#[inline]
fn step<S: Score>(from: S, delta: S, cell: (usize, usize)) -> Result<S, AlignError> {
    if from == S::UNREACHABLE {
        return Ok(S::UNREACHABLE);
    }
    match from.checked_add(delta) {
        Some(value) if value > S::UNREACHABLE => Ok(value),
        _ => Err(AlignError::ScoreOverflow {
            row: cell.0,
            col: cell.1,
        }),
    }
}

struct Rows<S> {
    m: Vec<S>,
    ix: Vec<S>,
    iy: Vec<S>,
}

impl<S: Score> Rows<S> {
    fn new(len: usize) -> Self {
        Self {
            m: vec![S::UNREACHABLE; len],
            ix: vec![S::UNREACHABLE; len],
            iy: vec![S::UNREACHABLE; len],
        }
    }
}

/// Fills the DP over encoded sequences `a` (rows) and `b` (columns), reporting
/// every cell's pointers to `sink`, and returns the traceback start.
pub(crate) fn fill<S: Score, D: DirectionSink>(
    a: &[usize],
    b: &[usize],
    matrix: &ScoringMatrix<S>,
    gaps: &GapModel<S>,
    mode: AlignmentMode,
    sink: &mut D,
) -> Result<Optimum<S>, AlignError> {
    let (n, m) = (a.len(), b.len());
    let first = gaps.open_contribution();
    let next = gaps.extend_contribution();
    // Local and semi-global alignments may start anywhere on the top row or
    // left column.
    let free_start = !mode.is_end_to_end();

    let mut prev = Rows::new(m + 1);
    let mut cur = Rows::new(m + 1);

    let mut best = Optimum {
        score: S::ZERO,
        end: (0, 0),
        state: State::Match,
    };
    let mut has_best = false;

    for i in 0..=n {
        for j in 0..=m {
            // M
            let (m_val, m_ptr) = if i == 0 || j == 0 {
                if free_start || (i == 0 && j == 0) {
                    (S::ZERO, Pointer::Start)
                } else {
                    (S::UNREACHABLE, Pointer::Start)
                }
            } else {
                let (diag, from) = best_of(prev.m[j - 1], prev.ix[j - 1], prev.iy[j - 1]);
                let value = step(diag, matrix.score_encoded(a[i - 1], b[j - 1]), (i, j))?;
                if mode == AlignmentMode::Local && value <= S::ZERO {
                    (S::ZERO, Pointer::Start)
                } else {
                    (value, Pointer::From(from))
                }
            };

            // Ix: consumes a residue of A.
            let (ix_val, ix_ptr) = if i == 0 {
                (S::UNREACHABLE, Pointer::Start)
            } else {
                let (value, from) = best_of(
                    step(prev.m[j], first, (i, j))?,
                    step(prev.ix[j], next, (i, j))?,
                    step(prev.iy[j], first, (i, j))?,
                );
                (value, Pointer::From(from))
            };

            // Iy: consumes a residue of B.
            let (iy_val, iy_ptr) = if j == 0 {
                (S::UNREACHABLE, Pointer::Start)
            } else {
                let (value, from) = best_of(
                    step(cur.m[j - 1], first, (i, j))?,
                    step(cur.ix[j - 1], first, (i, j))?,
                    step(cur.iy[j - 1], next, (i, j))?,
                );
                (value, Pointer::From(from))
            };

            cur.m[j] = m_val;
            cur.ix[j] = ix_val;
            cur.iy[j] = iy_val;
            sink.record(i, j, Cell::new(m_ptr, ix_ptr, iy_ptr));

            // Cells are visited in row-major order, so a strict comparison
            // keeps the smallest (i, j) among equal scores.
            let candidate = match mode {
                AlignmentMode::Global => None,
                AlignmentMode::Local => Some((m_val, State::Match)),
                AlignmentMode::SemiGlobal if i == n || j == m => {
                    Some(best_of(m_val, ix_val, iy_val))
                }
                AlignmentMode::SemiGlobal => None,
            };
            if let Some((score, state)) = candidate {
                if !has_best || score > best.score {
                    best = Optimum {
                        score,
                        end: (i, j),
                        state,
                    };
                    has_best = true;
                }
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    if mode == AlignmentMode::Global {
        // After the final swap the last row lives in `prev`.
        let (score, state) = best_of(prev.m[m], prev.ix[m], prev.iy[m]);
        best = Optimum {
            score,
            end: (n, m),
            state,
        };
    }

    log::debug!(
        "{} DP over {}x{} cells: best {} at {:?} ({:?})",
        mode,
        n + 1,
        m + 1,
        best.score,
        best.end,
        best.state
    );
    Ok(best)
}

/// Fills the DP keeping every cell's pointers for traceback.
pub(crate) fn fill_with_traceback<S: Score>(
    a: &[usize],
    b: &[usize],
    matrix: &ScoringMatrix<S>,
    gaps: &GapModel<S>,
    mode: AlignmentMode,
) -> Result<(Optimum<S>, TracebackMatrix), AlignError> {
    let mut directions = TracebackMatrix::new(a.len() + 1, b.len() + 1);
    let optimum = fill(a, b, matrix, gaps, mode, &mut directions)?;
    Ok((optimum, directions))
}

/// Optimal score only, in memory linear in `b.len()`.
pub(crate) fn score_only<S: Score>(
    a: &[usize],
    b: &[usize],
    matrix: &ScoringMatrix<S>,
    gaps: &GapModel<S>,
    mode: AlignmentMode,
) -> Result<S, AlignError> {
    Ok(fill(a, b, matrix, gaps, mode, &mut ())?.score)
}
