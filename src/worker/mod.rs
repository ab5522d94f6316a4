pub mod estimation;
pub mod pool;
pub mod queue;
pub mod resequence;

pub use estimation::{EstimationWorker, WorkerStats};
pub use pool::WorkerPool;
pub use queue::{BatchSource, EstimateSink, QueueReceiver, QueueSender, ShutdownToken, queue};
pub use resequence::Resequencer;
