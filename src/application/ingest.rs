// Telemetry ingestion - Per-sensor buffers and the live sliding window
use crate::domain::buffer::PointBuffer;
use crate::domain::telemetry::{Sample, SeriesMeta};
use crate::infrastructure::config::{LiveSettings, clamp_live_readings};
use std::collections::HashMap;
use tokio_stream::{Stream, StreamExt};

/// Owns one `PointBuffer` per selected sensor.
///
/// Buffers are created on selection, appended to on every push, trimmed to
/// the configured sliding window while live mode is on, and discarded on
/// deselection.
pub struct TelemetryIngest {
    buffers: HashMap<String, (SeriesMeta, PointBuffer)>,
    live_mode: bool,
    max_live_readings: usize,
}

impl TelemetryIngest {
    pub fn new(settings: &LiveSettings) -> Self {
        Self {
            buffers: HashMap::new(),
            live_mode: false,
            max_live_readings: clamp_live_readings(settings.max_readings),
        }
    }

    pub fn select(&mut self, meta: SeriesMeta) {
        self.buffers
            .entry(meta.id.clone())
            .or_insert_with(|| (meta, PointBuffer::new()));
    }

    pub fn deselect(&mut self, series_id: &str) {
        if self.buffers.remove(series_id).is_some() {
            tracing::debug!("discarded buffer for deselected series {}", series_id);
        }
    }

    pub fn selected_ids(&self) -> Vec<&str> {
        self.buffers.keys().map(String::as_str).collect()
    }

    pub fn meta(&self, series_id: &str) -> Option<&SeriesMeta> {
        self.buffers.get(series_id).map(|(meta, _)| meta)
    }

    pub fn buffer(&self, series_id: &str) -> Option<&PointBuffer> {
        self.buffers.get(series_id).map(|(_, buffer)| buffer)
    }

    pub fn is_live(&self) -> bool {
        self.live_mode
    }

    pub fn set_live(&mut self, live: bool) {
        self.live_mode = live;
    }

    pub fn max_live_readings(&self) -> usize {
        self.max_live_readings
    }

    pub fn set_max_live_readings(&mut self, requested: usize) {
        self.max_live_readings = clamp_live_readings(requested);
    }

    /// Append samples to a selected series. Pushes for series that were
    /// never selected are dropped; the store may still be streaming a
    /// sensor the user just deselected.
    pub fn append(&mut self, series_id: &str, samples: impl IntoIterator<Item = Sample>) {
        let Some((_, buffer)) = self.buffers.get_mut(series_id) else {
            tracing::debug!("ignoring push for unselected series {}", series_id);
            return;
        };
        buffer.append(samples);
        if self.live_mode {
            buffer.trim_to(self.max_live_readings);
        }
    }

    /// Drain a live push stream into the buffers until it ends. Pushes
    /// arrive as wire-format numbers; a push whose timestamp is not a
    /// finite number is dropped before it reaches any buffer.
    pub async fn run_live<S>(&mut self, stream: S)
    where
        S: Stream<Item = (String, f64, f64)> + Unpin,
    {
        let mut stream = stream;
        while let Some((series_id, time_ms, value)) = stream.next().await {
            match Sample::from_raw(time_ms, value) {
                Some(sample) => self.append(&series_id, std::iter::once(sample)),
                None => {
                    tracing::debug!("dropped push with malformed timestamp for {}", series_id);
                }
            }
        }
    }
}
