use super::queue::{BatchSource, EstimateSink, ShutdownToken};
use crate::batch::{Batch, NoiseEstimate};
use crate::error::QueueError;
use crate::processing::NoiseEstimator;

/// Counters returned by a worker when it exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Batches taken from the input queue
    pub batches: u64,
    /// Estimates successfully published
    pub published: u64,
    /// Batches rejected as malformed
    pub rejected: u64,
}

impl WorkerStats {
    pub fn merge(&mut self, other: WorkerStats) {
        self.batches += other.batches;
        self.published += other.published;
        self.rejected += other.rejected;
    }
}

#[derive(Debug)]
enum WorkerState {
    WaitingForBatch,
    Processing(Batch),
    Publishing(NoiseEstimate),
    Shutdown,
}

/// One sequential estimation pipeline between two queues
///
/// Cancellation of either queue operation cancels the shared token so
/// sibling workers stop too. An input queue that disconnects (every
/// producer dropped) is end of stream: the worker exits without cancelling,
/// letting siblings finish publishing what they hold.
pub struct EstimationWorker {
    id: usize,
    estimator: NoiseEstimator,
    token: ShutdownToken,
}

impl EstimationWorker {
    pub fn new(id: usize, estimator: NoiseEstimator, token: ShutdownToken) -> Self {
        Self {
            id,
            estimator,
            token,
        }
    }

    pub fn run<S, K>(mut self, source: &S, sink: &K) -> WorkerStats
    where
        S: BatchSource + ?Sized,
        K: EstimateSink + ?Sized,
    {
        let mut stats = WorkerStats::default();
        let mut state = WorkerState::WaitingForBatch;

        log::debug!("Worker {} started", self.id);

        loop {
            state = match state {
                WorkerState::WaitingForBatch => self.wait_for_batch(source, &mut stats),
                WorkerState::Processing(batch) => self.process(batch, &mut stats),
                WorkerState::Publishing(estimate) => self.publish(estimate, sink, &mut stats),
                WorkerState::Shutdown => break,
            };
        }

        log::debug!(
            "Worker {} stopped: {} batches, {} published, {} rejected",
            self.id,
            stats.batches,
            stats.published,
            stats.rejected
        );
        stats
    }

    fn wait_for_batch<S>(&self, source: &S, stats: &mut WorkerStats) -> WorkerState
    where
        S: BatchSource + ?Sized,
    {
        if self.token.is_cancelled() {
            return WorkerState::Shutdown;
        }

        match source.take(&self.token) {
            Ok(Some(batch)) => {
                stats.batches += 1;
                log::trace!(
                    "Worker {} took batch {} ({} frames)",
                    self.id,
                    batch.sequence,
                    batch.frame_size()
                );
                WorkerState::Processing(batch)
            }
            Ok(None) => WorkerState::WaitingForBatch,
            Err(QueueError::Cancelled) => {
                self.token.cancel();
                WorkerState::Shutdown
            }
            Err(QueueError::Disconnected) => {
                log::debug!("Worker {}: input queue closed", self.id);
                WorkerState::Shutdown
            }
        }
    }

    fn process(&mut self, batch: Batch, stats: &mut WorkerStats) -> WorkerState {
        if self.token.is_cancelled() {
            return WorkerState::Shutdown;
        }

        match self.estimator.process(&batch) {
            Ok(estimate) => WorkerState::Publishing(estimate),
            Err(e) => {
                log::warn!(
                    "Worker {}: rejected batch {}: {}",
                    self.id,
                    batch.sequence,
                    e
                );
                stats.rejected += 1;
                WorkerState::WaitingForBatch
            }
        }
    }

    fn publish<K>(&self, estimate: NoiseEstimate, sink: &K, stats: &mut WorkerStats) -> WorkerState
    where
        K: EstimateSink + ?Sized,
    {
        match sink.publish(estimate, &self.token) {
            Ok(()) => {
                stats.published += 1;
                log::trace!(
                    "Worker {} published {:.6e} for batch {}",
                    self.id,
                    estimate.value,
                    estimate.sequence
                );
                WorkerState::WaitingForBatch
            }
            Err(e) => {
                if e == QueueError::Disconnected {
                    log::warn!("Worker {}: estimate queue closed", self.id);
                }
                self.token.cancel();
                WorkerState::Shutdown
            }
        }
    }
}
