// Aligning independently-sampled series onto a shared timestamp axis
use crate::domain::telemetry::{ComparisonRow, SeriesData};
use std::collections::{BTreeSet, HashMap};

/// Merge N series into one row per distinct timestamp.
///
/// Every row carries every input series id; `None` marks a timestamp where
/// that series has no sample. No interpolation. Inputs are display-sized
/// (already decimated), so the timestamp union sort is cheap enough to
/// recompute from scratch on every change.
pub fn merge(series: &[SeriesData]) -> Vec<ComparisonRow> {
    let mut timestamps: BTreeSet<i64> = BTreeSet::new();
    let mut lookups: Vec<(&str, HashMap<i64, f64>)> = Vec::with_capacity(series.len());

    for s in series {
        let mut by_time = HashMap::with_capacity(s.points.len());
        for point in &s.points {
            timestamps.insert(point.time_ms);
            by_time.insert(point.time_ms, point.value);
        }
        lookups.push((s.meta.id.as_str(), by_time));
    }

    timestamps
        .into_iter()
        .map(|time_ms| ComparisonRow {
            time_ms,
            values: lookups
                .iter()
                .map(|(id, by_time)| (id.to_string(), by_time.get(&time_ms).copied()))
                .collect(),
        })
        .collect()
}
