pub mod accumulator;
pub mod source;

pub use accumulator::SegmentAccumulator;
pub use source::{MemorySource, SampleSource, WavFileSource};

use crate::batch::Batch;
use crate::error::Result;
use crate::worker::{QueueSender, ShutdownToken};

/// Read `source` to the end, queueing every completed batch.
///
/// Stops early, without error, when the token is cancelled or the workers
/// are gone. Returns the number of batches queued.
pub fn feed_batches<S>(
    source: &mut S,
    accumulator: &mut SegmentAccumulator,
    sender: &QueueSender<Batch>,
    token: &ShutdownToken,
) -> Result<u64>
where
    S: SampleSource + ?Sized,
{
    let mut queued = 0;

    while let Some(buffer) = source.next_buffer()? {
        for batch in accumulator.push_interleaved(&buffer) {
            if let Err(e) = sender.send(batch, token) {
                log::debug!("Producer stopped after {} batches: {}", queued, e);
                return Ok(queued);
            }
            queued += 1;
        }
    }

    log::debug!("Producer reached end of input after {} batches", queued);
    Ok(queued)
}
