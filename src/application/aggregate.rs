// Rolling average and per-day range overlays for display series
use crate::domain::telemetry::{DailyRange, DisplayPoint};
use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;

/// Window used by the reference dashboard's smoothing overlay.
pub const MOVING_AVERAGE_WINDOW: usize = 10;

/// Attach a rolling mean of the current point and the preceding
/// `window_size - 1` points.
///
/// Partial windows at the start divide by however many points are actually
/// present, never by the nominal window size.
pub fn moving_average(points: &[DisplayPoint], window_size: usize) -> Vec<DisplayPoint> {
    let window_size = window_size.max(1);
    let mut out = Vec::with_capacity(points.len());
    let mut sum = 0.0;
    for (i, point) in points.iter().enumerate() {
        sum += point.value;
        if i >= window_size {
            sum -= points[i - window_size].value;
        }
        let count = (i + 1).min(window_size);
        out.push(DisplayPoint {
            moving_average: Some(sum / count as f64),
            ..*point
        });
    }
    out
}

/// Bucket points by UTC calendar day and emit one min/max record per day,
/// stamped at noon UTC for stable chart placement.
pub fn daily_range(points: &[DisplayPoint]) -> Vec<DailyRange> {
    let mut days: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for point in points {
        let Some(timestamp) = DateTime::from_timestamp_millis(point.time_ms) else {
            continue;
        };
        let day = timestamp.date_naive();
        days.entry(day)
            .and_modify(|(min, max)| {
                *min = min.min(point.value);
                *max = max.max(point.value);
            })
            .or_insert((point.value, point.value));
    }

    days.into_iter()
        .filter_map(|(day, (min, max))| {
            let noon = day.and_hms_opt(12, 0, 0)?;
            Some(DailyRange {
                time_ms: noon.and_utc().timestamp_millis(),
                min,
                max,
                range: max - min,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[f64]) -> Vec<DisplayPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| DisplayPoint::new(i as i64 * 1000, v))
            .collect()
    }

    #[test]
    fn test_moving_average_boundaries() {
        let input = points(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let out = moving_average(&input, MOVING_AVERAGE_WINDOW);

        // Index 0 averages only itself.
        assert_eq!(out[0].moving_average, Some(0.0));
        // Index 9 averages indices 0..=9.
        assert_eq!(out[9].moving_average, Some(4.5));
        // Index 10 slides the window to 1..=10.
        assert_eq!(out[10].moving_average, Some(5.5));
    }

    #[test]
    fn test_moving_average_partial_window_divisor() {
        let out = moving_average(&points(&[2.0, 4.0]), 10);
        assert_eq!(out[0].moving_average, Some(2.0));
        assert_eq!(out[1].moving_average, Some(3.0));
    }

    #[test]
    fn test_moving_average_zero_window() {
        let out = moving_average(&points(&[5.0, 7.0]), 0);
        assert_eq!(out[1].moving_average, Some(7.0));
    }

    #[test]
    fn test_daily_range_buckets_by_utc_day() {
        const DAY_MS: i64 = 24 * 60 * 60 * 1000;
        let input = vec![
            DisplayPoint::new(0, 1.0),
            DisplayPoint::new(1000, 5.0),
            DisplayPoint::new(DAY_MS + 1000, -2.0),
            DisplayPoint::new(DAY_MS + 2000, 2.0),
        ];
        let ranges = daily_range(&input);
        assert_eq!(ranges.len(), 2);

        // 1970-01-01: min 1, max 5, stamped at noon UTC.
        assert_eq!(ranges[0].time_ms, DAY_MS / 2);
        assert_eq!(ranges[0].min, 1.0);
        assert_eq!(ranges[0].max, 5.0);
        assert_eq!(ranges[0].range, 4.0);

        assert_eq!(ranges[1].time_ms, DAY_MS + DAY_MS / 2);
        assert_eq!(ranges[1].range, 4.0);
    }

    #[test]
    fn test_daily_range_empty() {
        assert!(daily_range(&[]).is_empty());
    }
}
