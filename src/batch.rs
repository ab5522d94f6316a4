/// One unit of work: a segment per channel, all the same length
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Producer-assigned position in the input stream
    pub sequence: u64,
    pub segments: Vec<Vec<f64>>,
}

impl Batch {
    pub fn new(sequence: u64, segments: Vec<Vec<f64>>) -> Self {
        Self { sequence, segments }
    }

    /// Number of segments (frames) in the batch.
    pub fn frame_size(&self) -> usize {
        self.segments.len()
    }
}

/// Scalar noise estimate for one batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseEstimate {
    /// Sequence number of the batch this was computed from
    pub sequence: u64,
    pub value: f64,
}
