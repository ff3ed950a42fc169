// Growable per-series container of time-ordered samples
use super::telemetry::{Sample, TimeWindow};

/// Time-ordered sample storage for one series.
///
/// Invariant: `points` is ascending by timestamp with unique timestamps
/// after every mutation. Live pushes may arrive out of order; appends
/// re-sort only the disturbed tail.
#[derive(Debug, Clone, Default)]
pub struct PointBuffer {
    points: Vec<Sample>,
}

impl PointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples(samples: impl IntoIterator<Item = Sample>) -> Self {
        let mut buffer = Self::new();
        buffer.append(samples);
        buffer
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.points
    }

    pub fn latest(&self) -> Option<Sample> {
        self.points.last().copied()
    }

    /// Append samples, dropping any with a non-finite value.
    ///
    /// Duplicate timestamps resolve last-write-wins. Only the slice from the
    /// first disturbed position onward is re-sorted, so in-order appends are
    /// cheap.
    pub fn append(&mut self, samples: impl IntoIterator<Item = Sample>) {
        let sorted_len = self.points.len();
        let mut dropped = 0usize;
        for sample in samples {
            if !sample.value.is_finite() {
                dropped += 1;
                continue;
            }
            self.points.push(sample);
        }
        if dropped > 0 {
            tracing::debug!("dropped {} malformed samples during append", dropped);
        }
        if self.points.len() == sorted_len {
            return;
        }

        let tail_min = self.points[sorted_len..]
            .iter()
            .map(|s| s.time_ms)
            .min()
            .unwrap_or(i64::MAX);
        let start = self.points[..sorted_len].partition_point(|s| s.time_ms < tail_min);

        // Stable sort keeps later appends after earlier ones at equal
        // timestamps, so last-write-wins falls out of the dedup below.
        self.points[start..].sort_by_key(|s| s.time_ms);

        let mut write = start;
        for read in start..self.points.len() {
            if write > start && self.points[write - 1].time_ms == self.points[read].time_ms {
                self.points[write - 1] = self.points[read];
            } else {
                self.points[write] = self.points[read];
                write += 1;
            }
        }
        self.points.truncate(write);
    }

    /// Keep only the most recent `max_len` samples (live sliding window).
    pub fn trim_to(&mut self, max_len: usize) {
        if self.points.len() > max_len {
            let excess = self.points.len() - max_len;
            self.points.drain(..excess);
        }
    }

    /// Sub-slice covering the window, `O(log n + k)` on the sorted buffer.
    pub fn range(&self, window: Option<TimeWindow>) -> &[Sample] {
        match window {
            None => &self.points,
            Some(w) => {
                let start = self.points.partition_point(|s| s.time_ms < w.start_ms);
                let end = self.points.partition_point(|s| s.time_ms <= w.end_ms);
                &self.points[start..end]
            }
        }
    }
}
