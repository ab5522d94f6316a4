use std::collections::BTreeMap;

use crate::batch::NoiseEstimate;

/// Restores batch order on estimates published by several workers
///
/// Estimates are held until every lower sequence number has been seen. A
/// batch that never produces an estimate (rejected as malformed) stalls
/// the stream until [`flush`](Self::flush).
#[derive(Debug, Default)]
pub struct Resequencer {
    next: u64,
    pending: BTreeMap<u64, NoiseEstimate>,
}

impl Resequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept one estimate and return every estimate now in order.
    pub fn push(&mut self, estimate: NoiseEstimate) -> Vec<NoiseEstimate> {
        if estimate.sequence < self.next {
            log::warn!(
                "Dropping estimate for batch {} (already past {})",
                estimate.sequence,
                self.next
            );
            return Vec::new();
        }
        self.pending.insert(estimate.sequence, estimate);

        let mut ready = Vec::new();
        while let Some(estimate) = self.pending.remove(&self.next) {
            ready.push(estimate);
            self.next += 1;
        }
        ready
    }

    /// Release everything still held, in sequence order, skipping gaps.
    pub fn flush(&mut self) -> Vec<NoiseEstimate> {
        let ready: Vec<_> = std::mem::take(&mut self.pending).into_values().collect();
        if let Some(last) = ready.last() {
            self.next = last.sequence + 1;
        }
        ready
    }

    /// Number of estimates waiting on a lower sequence number.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn est(sequence: u64) -> NoiseEstimate {
        NoiseEstimate {
            sequence,
            value: sequence as f64,
        }
    }

    fn seqs(estimates: &[NoiseEstimate]) -> Vec<u64> {
        estimates.iter().map(|e| e.sequence).collect()
    }

    #[test]
    fn test_in_order_passes_through() {
        let mut r = Resequencer::new();
        assert_eq!(seqs(&r.push(est(0))), vec![0]);
        assert_eq!(seqs(&r.push(est(1))), vec![1]);
    }

    #[test]
    fn test_out_of_order_held_until_gap_filled() {
        let mut r = Resequencer::new();
        assert!(r.push(est(2)).is_empty());
        assert!(r.push(est(1)).is_empty());
        assert_eq!(r.pending(), 2);
        assert_eq!(seqs(&r.push(est(0))), vec![0, 1, 2]);
        assert_eq!(r.pending(), 0);
    }

    #[test]
    fn test_flush_skips_gaps() {
        let mut r = Resequencer::new();
        r.push(est(0));
        r.push(est(3));
        r.push(est(2));
        assert_eq!(seqs(&r.flush()), vec![2, 3]);
        assert_eq!(seqs(&r.push(est(4))), vec![4]);
    }

    #[test]
    fn test_stale_estimate_dropped() {
        let mut r = Resequencer::new();
        r.push(est(0));
        assert!(r.push(est(0)).is_empty());
    }
}
