use std::cmp::Ordering;

use crate::scoring::Score;
use crate::AlignError;

/// Affine gap costs.
///
/// A run of `k` gap residues costs `open + k * extend`: `extend` is charged on
/// every residue of the run, the first included, and `open` once on top.
/// Setting `open` to zero gives a linear gap cost with no special casing
/// anywhere in the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapModel<S: Score = i32> {
    open: S,
    extend: S,
    // Score contributions, already negated.
    first: S,
    next: S,
}

impl<S: Score> GapModel<S> {
    pub fn new(open: S, extend: S) -> Result<Self, AlignError> {
        let invalid = || AlignError::InvalidGapModel {
            open: open.to_string(),
            extend: extend.to_string(),
        };
        if !non_negative(open) || !non_negative(extend) {
            return Err(invalid());
        }
        let first = open.checked_add(extend).ok_or_else(invalid)?;
        Ok(Self {
            open,
            extend,
            first: S::ZERO - first,
            next: S::ZERO - extend,
        })
    }

    pub fn linear(extend: S) -> Result<Self, AlignError> {
        Self::new(S::ZERO, extend)
    }

    pub fn open(&self) -> S {
        self.open
    }

    pub fn extend(&self) -> S {
        self.extend
    }

    /// Penalty (non-negative) of a single gap run of `len` residues.
    pub fn cost(&self, len: usize) -> S {
        if len == 0 {
            return S::ZERO;
        }
        let mut total = self.open;
        for _ in 0..len {
            total = total + self.extend;
        }
        total
    }

    /// Score added when a gap run starts.
    #[inline]
    pub(crate) fn open_contribution(&self) -> S {
        self.first
    }

    /// Score added for each further residue of a run.
    #[inline]
    pub(crate) fn extend_contribution(&self) -> S {
        self.next
    }
}

// NaN compares as unordered and is rejected.
fn non_negative<S: Score>(value: S) -> bool {
    matches!(
        value.partial_cmp(&S::ZERO),
        Some(Ordering::Greater | Ordering::Equal)
    )
}

impl Default for GapModel<i32> {
    fn default() -> Self {
        Self {
            open: crate::DNA_GAP_OPEN,
            extend: crate::DNA_GAP_EXT,
            first: -crate::DNA_GAP_FIRST,
            next: -crate::DNA_GAP_EXT,
        }
    }
}
