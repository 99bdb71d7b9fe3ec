use std::fmt;
use std::str::FromStr;

use crate::AlignError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlignmentMode {
    #[default]
    Global, // Needleman-Wunsch / Gotoh
    Local,      // Smith-Waterman / Gotoh
    SemiGlobal, // Free end-gaps
}

impl AlignmentMode {
    /// Whether the alignment must consume both sequences entirely.
    pub fn is_end_to_end(self) -> bool {
        self == AlignmentMode::Global
    }
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlignmentMode::Global => "global",
            AlignmentMode::Local => "local",
            AlignmentMode::SemiGlobal => "semi-global",
        };
        f.write_str(name)
    }
}

impl FromStr for AlignmentMode {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "global" | "nw" => Ok(AlignmentMode::Global),
            "local" | "sw" => Ok(AlignmentMode::Local),
            "semi-global" | "semiglobal" | "glocal" => Ok(AlignmentMode::SemiGlobal),
            other => Err(AlignError::InvalidConfig(format!(
                "unknown alignment mode '{other}'"
            ))),
        }
    }
}
