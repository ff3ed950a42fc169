// Stride and min/max decimation of time series for display
use crate::domain::telemetry::Sample;

/// Floor on decimation output. Below this the chart looks broken even on
/// tiny viewports, so targets are clamped up to it.
pub const MIN_DISPLAY_POINTS: usize = 100;

fn clamp_target(target: usize) -> usize {
    target.max(1).max(MIN_DISPLAY_POINTS)
}

/// Indices selected by evenly spacing `target` picks across the input:
/// `round(i * (len - 1) / (target - 1))` for each output slot.
///
/// When the input is longer than the target, slots are more than one
/// apart, so the rounded indices are distinct and the output holds
/// exactly `target` points with the first and last always among them.
/// An integer stride cannot do this: rounding the step up makes inputs
/// just past the target collapse to roughly half of it.
pub fn stride_indices(len: usize, target: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    if len <= target {
        return (0..len).collect();
    }
    if target <= 1 {
        return vec![0, len - 1];
    }
    let span = (len - 1) as f64 / (target - 1) as f64;
    let mut indices = Vec::with_capacity(target);
    for slot in 0..target {
        let index = ((slot as f64 * span).round() as usize).min(len - 1);
        if indices.last() != Some(&index) {
            indices.push(index);
        }
    }
    indices
}

/// Stride-sample `points` down to at most `target` output points.
///
/// Identity when the input already fits; first and last input points are
/// always retained otherwise. Idempotent: re-decimating the output at the
/// same target returns it unchanged.
pub fn decimate(points: &[Sample], target: usize) -> Vec<Sample> {
    let target = clamp_target(target);
    if points.len() <= target {
        return points.to_vec();
    }
    stride_indices(points.len(), target)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Envelope {
    min: Sample,
    max: Sample,
}

impl Envelope {
    fn new(sample: Sample) -> Self {
        Self {
            min: sample,
            max: sample,
        }
    }

    fn push(&mut self, sample: Sample) {
        if sample.value < self.min.value {
            self.min = sample;
        }
        if sample.value > self.max.value {
            self.max = sample;
        }
    }

    /// Emit min/max in timestamp order to keep the polyline monotonic.
    fn push_ordered(&self, out: &mut Vec<Sample>) {
        if self.min.time_ms == self.max.time_ms {
            out.push(self.min);
        } else if self.min.time_ms < self.max.time_ms {
            out.push(self.min);
            out.push(self.max);
        } else {
            out.push(self.max);
            out.push(self.min);
        }
    }
}

/// Bucketed min/max decimation: partition the covered time range into
/// `bucket_count` contiguous buckets and emit each bucket's extremes
/// (up to two points per bucket), retaining the exact first and last
/// input points. Preserves spikes that stride sampling would skip over.
pub fn decimate_minmax(points: &[Sample], bucket_count: usize) -> Vec<Sample> {
    let bucket_count = bucket_count.max(1);
    if points.len() <= bucket_count.saturating_mul(2) {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];
    let span = (last.time_ms - first.time_ms) as f64;
    if span <= 0.0 {
        return vec![first, last];
    }

    let mut buckets: Vec<Option<Envelope>> = vec![None; bucket_count];
    for sample in &points[1..points.len() - 1] {
        let t = (sample.time_ms - first.time_ms) as f64 / span;
        let index = ((t * bucket_count as f64) as usize).min(bucket_count - 1);
        match &mut buckets[index] {
            Some(envelope) => envelope.push(*sample),
            slot => *slot = Some(Envelope::new(*sample)),
        }
    }

    let mut out = Vec::with_capacity(bucket_count * 2 + 2);
    out.push(first);
    for envelope in buckets.iter().flatten() {
        envelope.push_ordered(&mut out);
    }
    out.push(last);
    out
}
