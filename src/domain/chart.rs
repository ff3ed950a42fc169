// Chart request and output domain models
use super::telemetry::{ComparisonRow, DailyRange, DisplayPoint, SeriesMeta, TimeWindow};

/// What a chart wants to show: one sensor, or several aligned for comparison.
#[derive(Debug, Clone)]
pub enum ChartSpec {
    Single(SeriesMeta),
    Comparison(Vec<SeriesMeta>),
}

impl ChartSpec {
    pub fn series(&self) -> Vec<&SeriesMeta> {
        match self {
            ChartSpec::Single(meta) => vec![meta],
            ChartSpec::Comparison(metas) => metas.iter().collect(),
        }
    }
}

/// One decimation round-trip to the background worker.
///
/// `generation` is a monotonically increasing token; a response is only
/// applied when its generation still matches the latest issued request.
#[derive(Debug, Clone)]
pub struct DecimationRequest {
    pub series_ids: Vec<String>,
    pub window: Option<TimeWindow>,
    pub width_px: u32,
    pub generation: u64,
}

/// What the rendering sink receives for one chart.
///
/// `Connecting` covers sensors whose first fetch has not landed yet;
/// `NoData` covers an empty series or window. Decimation-path failures
/// never surface here, only degraded-but-drawable data.
#[derive(Debug, Clone)]
pub enum ChartView {
    Connecting,
    NoData,
    Single {
        meta: SeriesMeta,
        points: Vec<DisplayPoint>,
        daily_range: Vec<DailyRange>,
    },
    Comparison {
        series_ids: Vec<String>,
        rows: Vec<ComparisonRow>,
    },
}
