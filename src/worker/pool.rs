use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use super::estimation::{EstimationWorker, WorkerStats};
use super::queue::{BatchSource, EstimateSink, ShutdownToken};
use crate::config::EstimatorConfig;
use crate::error::{ConfigurationError, Result};
use crate::processing::NoiseEstimator;

/// A fixed set of estimation workers sharing two queues and a token
pub struct WorkerPool {
    handles: Vec<JoinHandle<WorkerStats>>,
    token: ShutdownToken,
}

impl WorkerPool {
    /// Build `workers` estimators and start one thread per estimator.
    ///
    /// Every estimator is constructed before any thread starts, so a
    /// configuration error means no worker ever runs.
    pub fn spawn<S, K>(
        config: &EstimatorConfig,
        workers: usize,
        source: S,
        sink: K,
        token: ShutdownToken,
    ) -> Result<Self>
    where
        S: BatchSource + Clone + 'static,
        K: EstimateSink + Clone + 'static,
    {
        if workers == 0 {
            return Err(ConfigurationError::NoWorkers.into());
        }

        let estimators = (0..workers)
            .map(|_| NoiseEstimator::new(config))
            .collect::<Result<Vec<_>>>()?;

        if let Some(first) = estimators.first() {
            log::info!(
                "Starting {} workers: segment length {}, window {:?}",
                workers,
                first.seg_length(),
                first.window_source()
            );
        }

        let mut handles = Vec::with_capacity(workers);
        for (id, estimator) in estimators.into_iter().enumerate() {
            let worker = EstimationWorker::new(id, estimator, token.clone());
            let worker_token = token.clone();
            let source = source.clone();
            let sink = sink.clone();

            let spawned = thread::Builder::new()
                .name(format!("welch-worker-{}", id))
                .spawn(move || {
                    // A panic stops the whole pool
                    match panic::catch_unwind(AssertUnwindSafe(|| worker.run(&source, &sink))) {
                        Ok(stats) => stats,
                        Err(payload) => {
                            log::error!("Worker {} panicked; stopping the pool", id);
                            worker_token.cancel();
                            panic::resume_unwind(payload)
                        }
                    }
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Stop whatever already started before reporting
                    token.cancel();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(e.into());
                }
            }
        }

        Ok(Self { handles, token })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Ask every worker to stop.
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Wait for all workers and sum their counters.
    ///
    /// A worker that panics cancels the token from its own thread, so its
    /// siblings stop without waiting for this call. Its counters are lost.
    pub fn join(self) -> WorkerStats {
        let mut total = WorkerStats::default();
        for handle in self.handles {
            if let Ok(stats) = handle.join() {
                total.merge(stats);
            }
        }
        total
    }
}
