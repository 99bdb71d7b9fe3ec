use std::fmt;
use std::ops::Range;

use thiserror::Error;

pub mod aligner;
pub mod alignment;
pub mod alignment_mode;
pub mod batch;
pub mod config;
mod engine;
pub mod gap;
pub mod matrices;
pub mod residue;
pub mod scoring;
pub mod sequence;
mod traceback;

pub use aligner::{align, Aligner};
pub use alignment::{Alignment, AlignmentBuilder, AlignmentOperation};
pub use alignment_mode::AlignmentMode;
pub use batch::BatchAligner;
pub use config::{AlignerConfig, BatchConfig, DEFAULT_MAX_CELLS};
pub use gap::GapModel;
pub use residue::{AminoAcid, Nucleotide, Residue, GAP_SYMBOL};
pub use scoring::{rescore, Alphabet, AlignmentStats, Score, ScoringMatrix};
pub use sequence::Sequence;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// DNA scoring parameters
pub const DNA_MATCH: i32 = 1;
pub const DNA_MISMATCH: i32 = -3;
pub const DNA_GAP_OPEN: i32 = 3;
pub const DNA_GAP_EXT: i32 = 2;
pub const DNA_GAP_FIRST: i32 = DNA_GAP_EXT + DNA_GAP_OPEN;

/// Which of the two input sequences a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("residue '{symbol}' at position {position} of sequence {side} is not in the scoring alphabet")]
    UnknownResidue {
        symbol: char,
        position: usize,
        side: Side,
    },
    #[error("symbol '{symbol}' at position {position} is not a valid residue")]
    InvalidSymbol { symbol: char, position: usize },
    #[error("malformed scoring matrix at line {line}: {reason}")]
    MatrixFormat { line: usize, reason: String },
    #[error("invalid gap model: open {open}, extend {extend} (both must be non-negative and their sum representable)")]
    InvalidGapModel { open: String, extend: String },
    #[error("alignment needs {cells} DP cells, limit is {limit}")]
    SequenceTooLarge { cells: usize, limit: usize },
    #[error("score at DP cell ({row}, {col}) is out of range for the score type")]
    ScoreOverflow { row: usize, col: usize },
    #[error("alignment builder already finished")]
    BuilderFinished,
    #[error("range {range:?} of sequence {side} does not match the {consumed} residues consumed")]
    InconsistentRange {
        side: Side,
        range: Range<usize>,
        consumed: usize,
    },
    #[error("a gap column needs exactly one residue")]
    InvalidGap,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("traceback failed: {0}")]
    Traceback(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("worker error: {0}")]
    Worker(String),
}
