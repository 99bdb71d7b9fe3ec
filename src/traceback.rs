use crate::alignment::AlignmentBuilder;
use crate::residue::Residue;
use crate::AlignError;

/// The three DP layers of Gotoh's recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// `M`: the column pairs two residues.
    Match,
    /// `Ix`: residue of A against a gap.
    Deletion,
    /// `Iy`: gap against a residue of B.
    Insertion,
}

/// Where the best value of a layer at some cell came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pointer {
    /// No predecessor: the alignment starts here.
    Start,
    From(State),
}

impl Pointer {
    fn encode(self) -> u8 {
        match self {
            Pointer::Start => 0,
            Pointer::From(State::Match) => 1,
            Pointer::From(State::Deletion) => 2,
            Pointer::From(State::Insertion) => 3,
        }
    }

    fn decode(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Pointer::Start,
            1 => Pointer::From(State::Match),
            2 => Pointer::From(State::Deletion),
            _ => Pointer::From(State::Insertion),
        }
    }
}

/// Three 2-bit pointers packed into one byte: bits 0-1 for `M`, 2-3 for `Ix`,
/// 4-5 for `Iy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell(u8);

impl Cell {
    pub fn new(m: Pointer, ix: Pointer, iy: Pointer) -> Self {
        Cell(m.encode() | ix.encode() << 2 | iy.encode() << 4)
    }

    pub fn pointer(self, state: State) -> Pointer {
        let shift = match state {
            State::Match => 0,
            State::Deletion => 2,
            State::Insertion => 4,
        };
        Pointer::decode(self.0 >> shift)
    }
}

/// Receives the pointers of every DP cell as the engine fills it.
pub(crate) trait DirectionSink {
    fn record(&mut self, row: usize, col: usize, cell: Cell);
}

/// Score-only passes keep nothing.
impl DirectionSink for () {
    #[inline]
    fn record(&mut self, _row: usize, _col: usize, _cell: Cell) {}
}

pub(crate) struct TracebackMatrix {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl TracebackMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0; rows * cols],
            rows,
            cols,
        }
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.data[row * self.cols + col] = cell.0;
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        Cell(self.data[row * self.cols + col])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

impl DirectionSink for TracebackMatrix {
    #[inline]
    fn record(&mut self, row: usize, col: usize, cell: Cell) {
        self.set(row, col, cell);
    }
}

/// Walks the pointers back from `end` in layer `state`, pushing one operation
/// per step into `builder`, until an `M` cell without predecessor.
///
/// `codes` holds the matrix indices of `a` and `b`; a diagonal step is a match
/// when the indices agree, so case-folded symbols count as matches.
///
/// Returns the cell the alignment starts at.
pub(crate) fn trace_back<R: Residue>(
    matrix: &TracebackMatrix,
    a: &[R],
    b: &[R],
    codes: (&[usize], &[usize]),
    end: (usize, usize),
    mut state: State,
    builder: &mut AlignmentBuilder<R>,
) -> Result<(usize, usize), AlignError> {
    debug_assert!(end.0 < matrix.rows() && end.1 < matrix.cols());
    let (mut i, mut j) = end;

    loop {
        let pointer = matrix.get(i, j).pointer(state);
        let next = match (state, pointer) {
            (State::Match, Pointer::Start) => break,
            (_, Pointer::Start) => {
                return Err(AlignError::Traceback(format!(
                    "gap layer has no predecessor at ({i}, {j})"
                )))
            }
            (_, Pointer::From(next)) => next,
        };

        match state {
            State::Match if i > 0 && j > 0 => {
                let (x, y) = (a[i - 1], b[j - 1]);
                if codes.0[i - 1] == codes.1[j - 1] {
                    builder.add_match(x)?;
                } else {
                    builder.add_mismatch(x, y)?;
                }
                i -= 1;
                j -= 1;
            }
            State::Deletion if i > 0 => {
                builder.add_gap(Some(a[i - 1]), None)?;
                i -= 1;
            }
            State::Insertion if j > 0 => {
                builder.add_gap(None, Some(b[j - 1]))?;
                j -= 1;
            }
            _ => {
                return Err(AlignError::Traceback(format!(
                    "pointer leaves the matrix at ({i}, {j})"
                )))
            }
        }
        state = next;
    }

    log::trace!("traceback from {:?} stopped at ({}, {})", end, i, j);
    Ok((i, j))
}
