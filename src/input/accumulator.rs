use crate::batch::Batch;
use crate::error::{ConfigurationError, Result};

/// Collects interleaved multichannel samples into batches
///
/// Each channel fills its own segment; once every channel holds
/// `seg_length` samples the segments are emitted together as one batch
/// (one segment per channel) and collection starts over. Trailing samples
/// that never complete a segment are discarded.
pub struct SegmentAccumulator {
    channels: usize,
    seg_length: usize,
    segments: Vec<Vec<f64>>,
    next_channel: usize,
    next_sequence: u64,
}

impl SegmentAccumulator {
    pub fn new(channels: usize, seg_length: usize) -> Result<Self> {
        if channels == 0 {
            return Err(ConfigurationError::NoChannels.into());
        }
        if seg_length < 2 {
            return Err(ConfigurationError::InvalidSegmentLength(seg_length).into());
        }

        Ok(Self {
            channels,
            seg_length,
            segments: (0..channels)
                .map(|_| Vec::with_capacity(seg_length))
                .collect(),
            next_channel: 0,
            next_sequence: 0,
        })
    }

    /// Push interleaved samples `[c0, c1, ..., c0, c1, ...]`.
    ///
    /// Frames may be split across calls; the channel position carries over.
    pub fn push_interleaved(&mut self, data: &[f64]) -> Vec<Batch> {
        let mut batches = Vec::new();

        for &sample in data {
            self.segments[self.next_channel].push(sample);
            self.next_channel = (self.next_channel + 1) % self.channels;

            if self.next_channel == 0 && self.segments[0].len() == self.seg_length {
                batches.push(self.take_batch());
            }
        }

        batches
    }

    fn take_batch(&mut self) -> Batch {
        let seg_length = self.seg_length;
        let segments = self
            .segments
            .iter_mut()
            .map(|s| std::mem::replace(s, Vec::with_capacity(seg_length)))
            .collect();

        let batch = Batch::new(self.next_sequence, segments);
        self.next_sequence += 1;
        batch
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn seg_length(&self) -> usize {
        self.seg_length
    }

    /// Number of batches emitted so far.
    pub fn emitted(&self) -> u64 {
        self.next_sequence
    }
}
