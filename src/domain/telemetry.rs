// Telemetry data domain models
use std::collections::HashMap;

/// One raw reading: millisecond epoch timestamp plus measured value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time_ms: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }

    /// Build a sample from wire-format numbers, rejecting NaN/infinite
    /// timestamps. A bad timestamp cannot be placed on the axis at all;
    /// a bad value is filtered later during buffer ingestion.
    pub fn from_raw(time_ms: f64, value: f64) -> Option<Self> {
        if !time_ms.is_finite() {
            return None;
        }
        Some(Self::new(time_ms as i64, value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    Humidity,
    Battery,
    Pressure,
    Other(String),
}

impl SensorKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "temperature" => SensorKind::Temperature,
            "humidity" => SensorKind::Humidity,
            "battery" => SensorKind::Battery,
            "pressure" => SensorKind::Pressure,
            other => SensorKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesMeta {
    pub id: String,
    pub unit: String,
    pub kind: SensorKind,
}

impl SeriesMeta {
    pub fn new(id: impl Into<String>, unit: impl Into<String>, kind: SensorKind) -> Self {
        Self {
            id: id.into(),
            unit: unit.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeriesData {
    pub meta: SeriesMeta,
    pub points: Vec<Sample>,
}

impl SeriesData {
    pub fn new(meta: SeriesMeta, points: Vec<Sample>) -> Self {
        Self { meta, points }
    }
}

/// Visible/zoomed time range. `None` at the call sites means "full series".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.end_ms - self.start_ms).max(0)
    }
}

/// Final per-point record handed to the rendering sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayPoint {
    pub time_ms: i64,
    pub value: f64,
    pub moving_average: Option<f64>,
}

impl DisplayPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self {
            time_ms,
            value,
            moving_average: None,
        }
    }
}

impl From<Sample> for DisplayPoint {
    fn from(sample: Sample) -> Self {
        Self::new(sample.time_ms, sample.value)
    }
}

impl From<DisplayPoint> for Sample {
    fn from(point: DisplayPoint) -> Self {
        Sample::new(point.time_ms, point.value)
    }
}

/// One merged row per distinct timestamp across compared series.
/// Absence is absence: `None` means the series had no sample there.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub time_ms: i64,
    pub values: HashMap<String, Option<f64>>,
}

/// Per-calendar-day min/max overlay record, stamped at noon UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRange {
    pub time_ms: i64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}
