use std::fmt::{Debug, Display};
use std::ops::{Add, Sub};
use std::path::Path;
use std::str::FromStr;

use crate::alignment::AlignmentOperation;
use crate::gap::GapModel;
use crate::residue::{Residue, GAP_SYMBOL};
use crate::sequence::Sequence;
use crate::{AlignError, Side};

/// Numeric type used for substitution scores, gap penalties and DP cells.
pub trait Score:
    Copy
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Debug
    + Display
    + FromStr
    + Send
    + Sync
    + 'static
{
    const ZERO: Self;

    /// Marks DP cells no alignment can reach. Strictly below every score the
    /// engine will produce: sums that would reach it are reported as overflow.
    const UNREACHABLE: Self;

    /// `self + rhs`, or `None` when the sum is not representable (integer
    /// overflow, or a non-finite float).
    fn checked_add(self, rhs: Self) -> Option<Self>;

    fn is_finite(self) -> bool;
}

impl Score for i32 {
    const ZERO: Self = 0;
    const UNREACHABLE: Self = i32::MIN;

    fn checked_add(self, rhs: Self) -> Option<Self> {
        i32::checked_add(self, rhs)
    }

    fn is_finite(self) -> bool {
        true
    }
}

impl Score for i64 {
    const ZERO: Self = 0;
    const UNREACHABLE: Self = i64::MIN;

    fn checked_add(self, rhs: Self) -> Option<Self> {
        i64::checked_add(self, rhs)
    }

    fn is_finite(self) -> bool {
        true
    }
}

impl Score for f32 {
    const ZERO: Self = 0.0;
    const UNREACHABLE: Self = f32::NEG_INFINITY;

    fn checked_add(self, rhs: Self) -> Option<Self> {
        let sum = self + rhs;
        sum.is_finite().then_some(sum)
    }

    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl Score for f64 {
    const ZERO: Self = 0.0;
    const UNREACHABLE: Self = f64::NEG_INFINITY;

    fn checked_add(self, rhs: Self) -> Option<Self> {
        let sum = self + rhs;
        sum.is_finite().then_some(sum)
    }

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

/// The ordered set of symbols a scoring matrix is defined over.
///
/// Lookups fold ASCII case unless both cases of a letter were declared as
/// distinct symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    lookup: Vec<Option<usize>>,
}

impl Alphabet {
    pub fn new(symbols: &[u8]) -> Result<Self, AlignError> {
        let mut lookup = vec![None; 256];
        for (idx, &symbol) in symbols.iter().enumerate() {
            if symbol == GAP_SYMBOL || symbol.is_ascii_whitespace() {
                return Err(AlignError::InvalidConfig(format!(
                    "'{}' cannot be an alphabet symbol",
                    char::from(symbol)
                )));
            }
            if lookup[symbol as usize].is_some() {
                return Err(AlignError::InvalidConfig(format!(
                    "duplicate alphabet symbol '{}'",
                    char::from(symbol)
                )));
            }
            lookup[symbol as usize] = Some(idx);
        }

        for (idx, &symbol) in symbols.iter().enumerate() {
            let other = if symbol.is_ascii_uppercase() {
                symbol.to_ascii_lowercase()
            } else {
                symbol.to_ascii_uppercase()
            };
            if lookup[other as usize].is_none() {
                lookup[other as usize] = Some(idx);
            }
        }

        Ok(Self {
            symbols: symbols.to_vec(),
            lookup,
        })
    }

    /// Every byte except the gap symbol, lower-case letters folded onto
    /// upper-case ones.
    pub fn any() -> Self {
        let symbols: Vec<u8> = (0..=u8::MAX)
            .filter(|&b| b != GAP_SYMBOL && !b.is_ascii_lowercase())
            .collect();
        // Cannot fail: no duplicates, no gap symbol. Whitespace is allowed here.
        let mut lookup = vec![None; 256];
        for (idx, &symbol) in symbols.iter().enumerate() {
            lookup[symbol as usize] = Some(idx);
            if symbol.is_ascii_uppercase() {
                lookup[symbol.to_ascii_lowercase() as usize] = Some(idx);
            }
        }
        Self { symbols, lookup }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn index_of(&self, symbol: u8) -> Option<usize> {
        self.lookup[symbol as usize]
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.index_of(symbol).is_some()
    }
}

#[derive(Debug, Clone)]
enum Substitution<S> {
    Identity { matched: S, mismatched: S },
    // Row-major, alphabet.len() squared.
    Table(Vec<S>),
}

/// Substitution scores for every ordered pair of residues of an alphabet.
#[derive(Debug, Clone)]
pub struct ScoringMatrix<S: Score = i32> {
    name: String,
    alphabet: Alphabet,
    substitution: Substitution<S>,
}

impl<S: Score> ScoringMatrix<S> {
    /// Match/mismatch scoring over any residue.
    pub fn identity(match_score: S, mismatch_score: S) -> Self {
        Self {
            name: "identity".to_string(),
            alphabet: Alphabet::any(),
            substitution: Substitution::Identity {
                matched: match_score,
                mismatched: mismatch_score,
            },
        }
    }

    /// Match/mismatch scoring restricted to `symbols`; anything else is an
    /// unknown residue.
    pub fn identity_over(
        symbols: &[u8],
        match_score: S,
        mismatch_score: S,
    ) -> Result<Self, AlignError> {
        Ok(Self {
            name: "identity".to_string(),
            alphabet: Alphabet::new(symbols)?,
            substitution: Substitution::Identity {
                matched: match_score,
                mismatched: mismatch_score,
            },
        })
    }

    /// Builds a table by evaluating `f` on every ordered pair of `symbols`.
    /// `f` need not be symmetric.
    pub fn from_fn<F>(name: &str, symbols: &[u8], f: F) -> Result<Self, AlignError>
    where
        F: Fn(u8, u8) -> S,
    {
        let alphabet = Alphabet::new(symbols)?;
        let scores = symbols
            .iter()
            .flat_map(|&a| symbols.iter().map(move |&b| (a, b)))
            .map(|(a, b)| f(a, b))
            .collect();

        Ok(Self {
            name: name.to_string(),
            alphabet,
            substitution: Substitution::Table(scores),
        })
    }

    /// Parses a substitution matrix in the usual BLOSUM/PAM file layout:
    ///
    /// ```text
    /// # comment
    ///    A  R  N
    /// A  5 -2 -1
    /// R -2  7 -1
    /// N -1 -1  7
    /// ```
    pub fn from_table(text: &str) -> Result<Self, AlignError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (header_line, header) = lines.next().ok_or(AlignError::MatrixFormat {
            line: 0,
            reason: "no header row".to_string(),
        })?;

        let symbols = header
            .split_whitespace()
            .map(|token| match token.as_bytes() {
                [symbol] => Ok(*symbol),
                _ => Err(AlignError::MatrixFormat {
                    line: header_line,
                    reason: format!("header symbol '{token}' is not a single character"),
                }),
            })
            .collect::<Result<Vec<u8>, _>>()?;

        let alphabet = Alphabet::new(&symbols).map_err(|e| AlignError::MatrixFormat {
            line: header_line,
            reason: e.to_string(),
        })?;

        let size = symbols.len();
        let mut scores = Vec::with_capacity(size * size);
        let mut rows = 0;

        for (line_no, line) in lines {
            if rows == size {
                return Err(AlignError::MatrixFormat {
                    line: line_no,
                    reason: format!("more rows than the {size} header symbols"),
                });
            }

            let mut tokens = line.split_whitespace();
            let row_symbol = tokens.next().unwrap_or_default();
            if row_symbol.as_bytes() != [symbols[rows]].as_slice() {
                return Err(AlignError::MatrixFormat {
                    line: line_no,
                    reason: format!(
                        "expected row '{}', found '{row_symbol}'",
                        char::from(symbols[rows])
                    ),
                });
            }

            let values: Vec<&str> = tokens.collect();
            if values.len() != size {
                return Err(AlignError::MatrixFormat {
                    line: line_no,
                    reason: format!("row has {} columns, header has {size}", values.len()),
                });
            }

            for value in values {
                let parsed = value
                    .parse::<S>()
                    .ok()
                    .filter(|score| score.is_finite())
                    .ok_or_else(|| AlignError::MatrixFormat {
                        line: line_no,
                        reason: format!("cannot parse score '{value}'"),
                    })?;
                scores.push(parsed);
            }
            rows += 1;
        }

        if rows != size {
            return Err(AlignError::MatrixFormat {
                line: header_line,
                reason: format!("header declares {size} symbols but {rows} rows follow"),
            });
        }

        let matrix = Self {
            name: "custom".to_string(),
            alphabet,
            substitution: Substitution::Table(scores),
        };
        if !matrix.is_symmetric() {
            log::warn!("substitution table is not symmetric");
        }
        Ok(matrix)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AlignError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let name = path
            .as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());
        Ok(Self::from_table(&text)?.with_name(&name))
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn contains<R: Residue>(&self, residue: R) -> bool {
        self.alphabet.contains(residue.symbol())
    }

    pub fn score<R: Residue>(&self, a: R, b: R) -> Result<S, AlignError> {
        let i = self.index_or_err(a, Side::A, 0)?;
        let j = self.index_or_err(b, Side::B, 0)?;
        Ok(self.score_encoded(i, j))
    }

    pub fn is_symmetric(&self) -> bool {
        match &self.substitution {
            Substitution::Identity { .. } => true,
            Substitution::Table(scores) => {
                let size = self.alphabet.len();
                (0..size).all(|i| {
                    (i + 1..size).all(|j| scores[i * size + j] == scores[j * size + i])
                })
            }
        }
    }

    /// Maps every residue of `seq` to its alphabet index.
    pub(crate) fn encode<R: Residue>(
        &self,
        seq: &Sequence<R>,
        side: Side,
    ) -> Result<Vec<usize>, AlignError> {
        seq.iter()
            .enumerate()
            .map(|(position, residue)| self.index_or_err(residue, side, position))
            .collect()
    }

    #[inline]
    pub(crate) fn score_encoded(&self, i: usize, j: usize) -> S {
        match &self.substitution {
            Substitution::Identity { matched, mismatched } => {
                if i == j {
                    *matched
                } else {
                    *mismatched
                }
            }
            Substitution::Table(scores) => scores[i * self.alphabet.len() + j],
        }
    }

    fn index_or_err<R: Residue>(
        &self,
        residue: R,
        side: Side,
        position: usize,
    ) -> Result<usize, AlignError> {
        let symbol = residue.symbol();
        self.alphabet
            .index_of(symbol)
            .ok_or(AlignError::UnknownResidue {
                symbol: char::from(symbol),
                position,
                side,
            })
    }
}

impl ScoringMatrix<i32> {
    /// Nucleotide defaults: +1 match, -3 mismatch.
    pub fn dna_default() -> Self {
        Self::identity(crate::DNA_MATCH, crate::DNA_MISMATCH)
    }
}

/// Scores an operation stream from scratch, independently of the DP engine.
///
/// Operations are read left to right; consecutive gaps on the same side form
/// one run and pay `open` once.
pub fn rescore<R: Residue, S: Score>(
    operations: &[AlignmentOperation<R>],
    matrix: &ScoringMatrix<S>,
    gaps: &GapModel<S>,
) -> Result<S, AlignError> {
    let mut total = S::ZERO;
    let mut previous: Option<&AlignmentOperation<R>> = None;

    for op in operations {
        total = match op {
            AlignmentOperation::Match(r) => total + matrix.score(*r, *r)?,
            AlignmentOperation::Mismatch(a, b) => total + matrix.score(*a, *b)?,
            AlignmentOperation::Deletion(_) => match previous {
                Some(AlignmentOperation::Deletion(_)) => total + gaps.extend_contribution(),
                _ => total + gaps.open_contribution(),
            },
            AlignmentOperation::Insertion(_) => match previous {
                Some(AlignmentOperation::Insertion(_)) => total + gaps.extend_contribution(),
                _ => total + gaps.open_contribution(),
            },
        };
        previous = Some(op);
    }

    Ok(total)
}

/// Operation counts of an alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentStats {
    pub matches: u32,
    pub mismatches: u32,
    pub insertions: u32,
    pub deletions: u32,
    /// Number of contiguous gap runs, on either side.
    pub gap_opens: u32,
}

impl AlignmentStats {
    pub fn columns(&self) -> u32 {
        self.matches + self.mismatches + self.insertions + self.deletions
    }

    /// Fraction of alignment columns that are identical residues, 0.0 when empty.
    pub fn identity(&self) -> f64 {
        let columns = self.columns();
        if columns == 0 {
            return 0.0;
        }
        self.matches as f64 / columns as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::residue::{AminoAcid, Nucleotide};

    #[test]
    fn test_identity_scores() {
        let m = ScoringMatrix::identity(2, -1);
        assert_eq!(m.score(Nucleotide::A, Nucleotide::A).unwrap(), 2);
        assert_eq!(m.score(Nucleotide::A, Nucleotide::G).unwrap(), -1);
        assert_eq!(m.score(b'x', b'X').unwrap(), 2);
        assert!(m.is_symmetric());
    }

    #[test]
    fn test_identity_over_rejects_outside_symbols() {
        let m = ScoringMatrix::identity_over(b"ACGT", 1, -1).unwrap();
        let err = m.score(Nucleotide::A, Nucleotide::N).unwrap_err();
        assert!(matches!(
            err,
            AlignError::UnknownResidue { symbol: 'N', side: Side::B, .. }
        ));
    }

    #[test]
    fn test_from_fn_can_be_asymmetric() {
        let m = ScoringMatrix::from_fn("directional", b"AG", |a, b| {
            if a == b {
                3
            } else if a == b'A' {
                -1
            } else {
                -2
            }
        })
        .unwrap();
        assert_eq!(m.score(b'A', b'G').unwrap(), -1);
        assert_eq!(m.score(b'G', b'A').unwrap(), -2);
        assert!(!m.is_symmetric());
    }

    #[test]
    fn test_from_table_parses_comments_and_rows() {
        let text = "# toy matrix\n\n   A  C\nA  4 -2\nC -2  9\n";
        let m: ScoringMatrix<i32> = ScoringMatrix::from_table(text).unwrap();
        assert_eq!(m.alphabet().symbols(), b"AC");
        assert_eq!(m.score(b'C', b'C').unwrap(), 9);
        assert_eq!(m.score(b'a', b'c').unwrap(), -2);
    }

    #[test]
    fn test_from_table_floats() {
        let text = "  A C\nA 1.5 -0.5\nC -0.5 2.0\n";
        let m: ScoringMatrix<f64> = ScoringMatrix::from_table(text).unwrap();
        assert_eq!(m.score(b'A', b'A').unwrap(), 1.5);
    }

    #[test]
    fn test_from_table_rejects_ragged_row() {
        let text = "  A C\nA 1 -1\nC -1\n";
        let err = ScoringMatrix::<i32>::from_table(text).unwrap_err();
        assert!(matches!(err, AlignError::MatrixFormat { line: 3, .. }));
    }

    #[test]
    fn test_from_table_rejects_missing_rows() {
        let text = "  A C G\nA 1 -1 -1\nC -1 1 -1\n";
        let err = ScoringMatrix::<i32>::from_table(text).unwrap_err();
        assert!(matches!(err, AlignError::MatrixFormat { .. }));
    }

    #[test]
    fn test_from_table_rejects_extra_rows() {
        let text = "  A C\nA 1 -1\nC -1 1\nG 0 0\n";
        let err = ScoringMatrix::<i32>::from_table(text).unwrap_err();
        assert!(matches!(err, AlignError::MatrixFormat { line: 4, .. }));
    }

    #[test]
    fn test_from_table_rejects_out_of_order_row() {
        let text = "  A C\nC -1 1\nA 1 -1\n";
        let err = ScoringMatrix::<i32>::from_table(text).unwrap_err();
        assert!(matches!(err, AlignError::MatrixFormat { line: 2, .. }));
    }

    #[test]
    fn test_from_table_rejects_bad_values_and_headers() {
        assert!(ScoringMatrix::<i32>::from_table("  A C\nA 1 x\nC 1 1\n").is_err());
        assert!(ScoringMatrix::<i32>::from_table("  A A\nA 1 1\nA 1 1\n").is_err());
        assert!(ScoringMatrix::<i32>::from_table("  AB\nAB 1\n").is_err());
        assert!(ScoringMatrix::<i32>::from_table("# only a comment\n").is_err());
    }

    #[test]
    fn test_from_table_rejects_non_finite_scores() {
        for value in ["NaN", "inf", "-inf"] {
            let text = format!("  A C\nA 1.0 {value}\nC -1.0 1.0\n");
            let err = ScoringMatrix::<f64>::from_table(&text).unwrap_err();
            assert!(matches!(err, AlignError::MatrixFormat { line: 2, .. }), "{value}");
        }
        assert!(ScoringMatrix::<f32>::from_table("  A\nA NaN\n").is_err());
    }

    #[test]
    fn test_from_path_names_matrix_after_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("PAM_TOY.txt");
        std::fs::write(&path, "# toy\n   A  C\nA  4 -2\nC -2  9\n").unwrap();

        let m = ScoringMatrix::<i32>::from_path(&path).unwrap();
        assert_eq!(m.name(), "PAM_TOY");
        assert_eq!(m.score(b'C', b'A').unwrap(), -2);

        let bundled = dir.path().join("blosum62");
        std::fs::write(&bundled, crate::matrices::BLOSUM62).unwrap();
        let m = ScoringMatrix::<i32>::from_path(&bundled).unwrap();
        assert_eq!(m.name(), "blosum62");
        assert_eq!(m.score(b'W', b'W').unwrap(), 11);
    }

    #[test]
    fn test_from_path_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ScoringMatrix::<i32>::from_path(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, AlignError::Io(_)));
    }

    #[test]
    fn test_unknown_residue_reports_position() {
        let m = ScoringMatrix::<i32>::blosum62();
        let seq = Sequence::new(vec![b'A', b'W', b'1']);
        let err = m.encode(&seq, Side::A).unwrap_err();
        assert!(matches!(
            err,
            AlignError::UnknownResidue { symbol: '1', position: 2, side: Side::A }
        ));
    }

    #[test]
    fn test_rescore_charges_open_once_per_run() {
        let m = ScoringMatrix::identity(1, -1);
        let gaps = GapModel::new(3, 1).unwrap();
        let ops = vec![
            AlignmentOperation::Match(Nucleotide::A),
            AlignmentOperation::Deletion(Nucleotide::C),
            AlignmentOperation::Deletion(Nucleotide::C),
            AlignmentOperation::Insertion(Nucleotide::G),
            AlignmentOperation::Mismatch(Nucleotide::T, Nucleotide::A),
        ];
        // 1 - (3 + 2) - (3 + 1) - 1
        assert_eq!(rescore(&ops, &m, &gaps).unwrap(), -9);
    }

    #[test]
    fn test_rescore_uses_matrix() {
        let m = ScoringMatrix::<i32>::blosum62();
        let gaps = GapModel::new(11, 1).unwrap();
        let ops = vec![
            AlignmentOperation::Match(AminoAcid::Trp),
            AlignmentOperation::Mismatch(AminoAcid::Ile, AminoAcid::Leu),
        ];
        assert_eq!(rescore(&ops, &m, &gaps).unwrap(), 11 + 2);
    }

    #[test]
    fn test_stats_identity() {
        let stats = AlignmentStats {
            matches: 3,
            mismatches: 1,
            ..Default::default()
        };
        assert_eq!(stats.columns(), 4);
        assert!((stats.identity() - 0.75).abs() < 1e-12);
        assert_eq!(AlignmentStats::default().identity(), 0.0);
    }
}
