use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::aligner::Aligner;
use crate::alignment::Alignment;
use crate::config::BatchConfig;
use crate::residue::Residue;
use crate::scoring::Score;
use crate::sequence::Sequence;
use crate::AlignError;

struct WorkItem<R: Residue> {
    index: usize,
    a: Sequence<R>,
    b: Sequence<R>,
}

struct WorkResult<R: Residue, S: Score> {
    index: usize,
    worker_id: usize,
    result: Result<Alignment<R, S>, AlignError>,
}

/// A fixed pool of threads aligning independent sequence pairs.
///
/// All workers share one read-only [`Aligner`]. The work queue is bounded by
/// [`BatchConfig::queue_depth`], so at most `workers` DP matrices and
/// `queue_depth` pending pairs exist at any time.
pub struct BatchAligner<R: Residue, S: Score = i32> {
    work_tx: Option<Sender<WorkItem<R>>>,
    result_rx: Receiver<WorkResult<R, S>>,
    workers: Vec<thread::JoinHandle<()>>,
    config: BatchConfig,
}

impl<R: Residue, S: Score> BatchAligner<R, S> {
    pub fn new(aligner: Aligner<S>, config: BatchConfig) -> Self {
        let aligner = Arc::new(aligner);
        let (work_tx, work_rx) = bounded(config.queue_depth);
        let (result_tx, result_rx) = unbounded();

        let workers = (0..config.workers)
            .map(|worker_id| {
                let aligner = Arc::clone(&aligner);
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                thread::spawn(move || Self::worker(worker_id, aligner, work_rx, result_tx))
            })
            .collect();

        log::info!(
            "started {} alignment workers ({} mode, queue depth {})",
            config.workers,
            aligner.mode(),
            config.queue_depth
        );

        Self {
            work_tx: Some(work_tx),
            result_rx,
            workers,
            config,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    fn worker(
        worker_id: usize,
        aligner: Arc<Aligner<S>>,
        work_rx: Receiver<WorkItem<R>>,
        result_tx: Sender<WorkResult<R, S>>,
    ) {
        while let Ok(work) = work_rx.recv() {
            let result = aligner.align(&work.a, &work.b);
            if result_tx
                .send(WorkResult {
                    index: work.index,
                    worker_id,
                    result,
                })
                .is_err()
            {
                break;
            }
        }
    }

    /// Aligns every pair and returns the alignments in input order.
    ///
    /// All pairs are processed even when some fail; the error of the first
    /// failing pair (by input position) is returned.
    pub fn align_all(
        &mut self,
        pairs: Vec<(Sequence<R>, Sequence<R>)>,
    ) -> Result<Vec<Alignment<R, S>>, AlignError> {
        let work_tx = self
            .work_tx
            .as_ref()
            .ok_or_else(|| AlignError::Worker("worker pool is shut down".to_string()))?;

        let total = pairs.len();
        // The result channel is unbounded, so blocking on a full work queue
        // cannot deadlock against the workers.
        for (index, (a, b)) in pairs.into_iter().enumerate() {
            work_tx
                .send(WorkItem { index, a, b })
                .map_err(|e| AlignError::Worker(e.to_string()))?;
        }

        let mut slots: Vec<Option<Result<Alignment<R, S>, AlignError>>> =
            (0..total).map(|_| None).collect();
        for _ in 0..total {
            let done = self
                .result_rx
                .recv()
                .map_err(|e| AlignError::Worker(e.to_string()))?;
            log::trace!("worker {} finished pair {}", done.worker_id, done.index);
            slots[done.index] = Some(done.result);
        }

        log::info!("aligned {} pairs", total);

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| Err(AlignError::Worker("missing result".to_string())))
            })
            .collect()
    }
}

impl<R: Residue, S: Score> Drop for BatchAligner<R, S> {
    fn drop(&mut self) {
        // Closing the work channel stops the workers.
        self.work_tx.take();

        while let Some(worker) = self.workers.pop() {
            let _ = worker.join();
        }
    }
}
