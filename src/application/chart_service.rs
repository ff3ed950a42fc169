// Chart data service - Orchestrates the decimation/LOD pipeline
use crate::application::backend::DecimationBackend;
use crate::application::ingest::TelemetryIngest;
use crate::application::{aggregate, decimator, merge, precision};
use crate::domain::chart::{ChartSpec, ChartView, DecimationRequest};
use crate::domain::telemetry::{DisplayPoint, Sample, SeriesData, SeriesMeta, TimeWindow};
use crate::infrastructure::config::PipelineConfig;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Where a series was last synced to the backend cache. When the buffer no
/// longer matches (live trim, out-of-order backfill), the whole series is
/// re-pushed.
#[derive(Debug, Clone, Copy)]
struct SyncMark {
    len: usize,
    last_time_ms: i64,
}

pub struct ChartDataService {
    backend: Arc<dyn DecimationBackend>,
    config: PipelineConfig,
    generation: AtomicU64,
    synced: Mutex<HashMap<String, SyncMark>>,
}

impl ChartDataService {
    pub fn new(backend: Arc<dyn DecimationBackend>, config: PipelineConfig) -> Self {
        Self {
            backend,
            config,
            generation: AtomicU64::new(0),
            synced: Mutex::new(HashMap::new()),
        }
    }

    /// Produce display data for one chart.
    ///
    /// Returns `None` when a newer request was issued while this one was in
    /// flight; stale results must never reach the sink. All worker failures
    /// degrade to main-thread decimation.
    pub async fn prepare(
        &self,
        spec: &ChartSpec,
        window: Option<TimeWindow>,
        viewport_px: u32,
        ingest: &TelemetryIngest,
    ) -> Option<ChartView> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let metas = spec.series();
        if metas.iter().all(|m| ingest.buffer(&m.id).is_none()) {
            return Some(ChartView::Connecting);
        }

        let slices: Vec<(&SeriesMeta, &[Sample])> = metas
            .iter()
            .map(|meta| {
                let slice = ingest
                    .buffer(&meta.id)
                    .map(|b| b.range(window))
                    .unwrap_or(&[]);
                (*meta, slice)
            })
            .collect();

        let total_points = slices.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
        if total_points == 0 {
            return Some(ChartView::NoData);
        }

        let plan = precision::plan(window, total_points, viewport_px);
        tracing::debug!(
            "prepared plan tier={:?} width={} total={} gen={}",
            plan.tier,
            plan.width_px,
            total_points,
            generation
        );

        let offload_ids: Vec<String> = if self.backend.is_ready() {
            slices
                .iter()
                .filter(|(_, slice)| slice.len() > self.config.worker.offload_threshold)
                .map(|(meta, _)| meta.id.clone())
                .collect()
        } else {
            Vec::new()
        };

        let mut decimated: HashMap<String, Vec<DisplayPoint>> = HashMap::new();
        if !offload_ids.is_empty() {
            decimated = self
                .offload(&offload_ids, window, plan.width_px, generation, ingest)
                .await;

            // A newer zoom or sensor selection may have superseded us while
            // the worker ran; expected race, never an error.
            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!("discarding superseded chart result gen={}", generation);
                return None;
            }
        }

        for &(meta, slice) in &slices {
            if decimated.contains_key(&meta.id) {
                continue;
            }
            let samples = if plan.skip_decimation {
                slice.to_vec()
            } else if self.config.chart.spike_fidelity {
                // Two points per bucket plus forced endpoints; keep the
                // bucket count low enough to stay within the planned width.
                let buckets = (plan.width_px as usize / 2).saturating_sub(1).max(1);
                decimator::decimate_minmax(slice, buckets)
            } else {
                decimator::decimate(slice, plan.width_px as usize)
            };
            decimated.insert(
                meta.id.clone(),
                samples.into_iter().map(DisplayPoint::from).collect(),
            );
        }

        Some(self.assemble(spec, decimated))
    }

    /// Forget a deselected series: drop its sync watermark and evict its
    /// columns from the backend cache. Deselection discards per-sensor
    /// data everywhere, not just the main-thread buffer.
    pub async fn discard_series(&self, series_id: &str) {
        self.synced.lock().unwrap().remove(series_id);
        if !self.backend.is_ready() {
            return;
        }
        if let Err(e) = self.backend.remove(series_id).await {
            tracing::warn!("failed to evict {} from worker cache: {}", series_id, e);
        }
    }

    fn assemble(
        &self,
        spec: &ChartSpec,
        mut decimated: HashMap<String, Vec<DisplayPoint>>,
    ) -> ChartView {
        match spec {
            ChartSpec::Single(meta) => {
                let points = decimated.remove(&meta.id).unwrap_or_default();
                if points.is_empty() {
                    return ChartView::NoData;
                }
                let points =
                    aggregate::moving_average(&points, self.config.chart.moving_average_window);
                let daily_range = aggregate::daily_range(&points);
                ChartView::Single {
                    meta: meta.clone(),
                    points,
                    daily_range,
                }
            }
            ChartSpec::Comparison(metas) => {
                let series: Vec<SeriesData> = metas
                    .iter()
                    .map(|meta| {
                        let points = decimated
                            .remove(&meta.id)
                            .unwrap_or_default()
                            .into_iter()
                            .map(Sample::from)
                            .collect();
                        SeriesData::new(meta.clone(), points)
                    })
                    .collect();
                ChartView::Comparison {
                    series_ids: metas.iter().map(|m| m.id.clone()).collect(),
                    rows: merge::merge(&series),
                }
            }
        }
    }

    /// Worker-path decimation for the listed series. Any failure falls back
    /// to the main-thread decimator by leaving the series out of the result.
    async fn offload(
        &self,
        series_ids: &[String],
        window: Option<TimeWindow>,
        width_px: u32,
        generation: u64,
        ingest: &TelemetryIngest,
    ) -> HashMap<String, Vec<DisplayPoint>> {
        if let Err(e) = self.sync_backend(series_ids, ingest).await {
            tracing::warn!("worker cache sync failed, using main-thread path: {}", e);
            return HashMap::new();
        }

        let request = DecimationRequest {
            series_ids: series_ids.to_vec(),
            window,
            width_px,
            generation,
        };
        match self.backend.decimate(request).await {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!("worker decimation failed, using main-thread path: {}", e);
                HashMap::new()
            }
        }
    }

    /// Push only what the backend cache is missing. A suffix push is enough
    /// while the buffer still ends where the last sync left it; otherwise
    /// the series is re-sent in full.
    async fn sync_backend(
        &self,
        series_ids: &[String],
        ingest: &TelemetryIngest,
    ) -> Result<(), crate::application::backend::WorkerError> {
        for series_id in series_ids {
            let Some(buffer) = ingest.buffer(series_id) else {
                continue;
            };
            let points = buffer.as_slice();

            let mark = {
                let synced = self.synced.lock().unwrap();
                synced.get(series_id).copied()
            };
            let start = match mark {
                Some(m)
                    if m.len <= points.len()
                        && m.len > 0
                        && points[m.len - 1].time_ms == m.last_time_ms =>
                {
                    m.len
                }
                _ => 0,
            };
            if start == points.len() {
                continue;
            }
            // The buffer no longer matches what was synced; the cached
            // columns may hold points a live trim or backfill displaced,
            // so evict them before the full re-push.
            if start == 0 && mark.is_some() {
                self.backend.remove(series_id).await?;
            }

            let suffix = &points[start..];
            let times: Vec<i64> = suffix.iter().map(|s| s.time_ms).collect();
            let values: Vec<f64> = suffix.iter().map(|s| s.value).collect();
            self.backend.append(series_id, times, values).await?;

            let mut synced = self.synced.lock().unwrap();
            synced.insert(
                series_id.clone(),
                SyncMark {
                    len: points.len(),
                    last_time_ms: points[points.len() - 1].time_ms,
                },
            );
        }
        Ok(())
    }
}
