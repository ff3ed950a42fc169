// Placeholder text and summaries for chart views
use crate::domain::chart::ChartView;

/// User-visible placeholder for non-drawable states. Decimation-internal
/// failures never produce a message here; they degrade to drawable data
/// upstream.
pub fn status_message(view: &ChartView) -> Option<&'static str> {
    match view {
        ChartView::Connecting => Some("connecting..."),
        ChartView::NoData => Some("no data available for this time range"),
        ChartView::Single { .. } | ChartView::Comparison { .. } => None,
    }
}

/// One-line description for logs and the demo driver.
pub fn summarize(view: &ChartView) -> String {
    match view {
        ChartView::Connecting => "connecting".to_string(),
        ChartView::NoData => "no data".to_string(),
        ChartView::Single {
            meta,
            points,
            daily_range,
        } => format!(
            "{}: {} points, {} daily ranges",
            meta.id,
            points.len(),
            daily_range.len()
        ),
        ChartView::Comparison { series_ids, rows } => {
            format!("{} series, {} rows", series_ids.len(), rows.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(status_message(&ChartView::Connecting), Some("connecting..."));
        assert_eq!(
            status_message(&ChartView::NoData),
            Some("no data available for this time range")
        );
    }
}
