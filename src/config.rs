use crate::alignment_mode::AlignmentMode;
use crate::AlignError;

/// Default ceiling on `(n + 1) * (m + 1)` DP cells for one alignment. At one
/// pointer byte per cell this is 64 MiB of traceback state.
pub const DEFAULT_MAX_CELLS: usize = 1 << 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignerConfig {
    pub mode: AlignmentMode,
    pub max_cells: usize,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            mode: AlignmentMode::Global,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl AlignerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: AlignmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_cells(mut self, max_cells: usize) -> Result<Self, AlignError> {
        if max_cells == 0 {
            return Err(AlignError::InvalidConfig(
                "max_cells must be positive".to_string(),
            ));
        }
        self.max_cells = max_cells;
        Ok(self)
    }

    /// Lifts the size guard entirely.
    pub fn unbounded(mut self) -> Self {
        self.max_cells = usize::MAX;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub workers: usize,
    /// Pairs queued ahead of the workers. Together with `workers` this bounds
    /// how many DP matrices can be alive at once.
    pub queue_depth: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        let workers = num_cpus::get().max(1);
        Self {
            workers,
            queue_depth: workers * 2,
        }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Result<Self, AlignError> {
        if workers == 0 {
            return Err(AlignError::InvalidConfig(
                "at least one worker is required".to_string(),
            ));
        }
        self.workers = workers;
        Ok(self)
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Result<Self, AlignError> {
        if queue_depth == 0 {
            return Err(AlignError::InvalidConfig(
                "queue depth must be positive".to_string(),
            ));
        }
        self.queue_depth = queue_depth;
        Ok(self)
    }
}
