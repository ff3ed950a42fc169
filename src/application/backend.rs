// Trait seam for offloaded decimation
use crate::domain::chart::DecimationRequest;
use crate::domain::telemetry::DisplayPoint;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("decimation worker is not ready")]
    NotReady,
    #[error("decimation worker channel closed")]
    Closed,
    #[error("decimation worker timed out after {0:?}")]
    Timeout(Duration),
}

/// Off-main-thread decimation contract.
///
/// Callers must fall back to the synchronous decimator whenever `is_ready`
/// is false or a call errors; the chart never blocks on an unavailable
/// backend.
#[async_trait]
pub trait DecimationBackend: Send + Sync {
    fn is_ready(&self) -> bool;

    /// Push raw columns into the backend's per-series cache. Repeated
    /// requests against the same series do not re-transfer raw data.
    async fn append(
        &self,
        series_id: &str,
        times: Vec<i64>,
        values: Vec<f64>,
    ) -> Result<(), WorkerError>;

    /// Drop a series from the backend cache. Deselecting a sensor discards
    /// its data everywhere, including here; removing an unknown series is
    /// a no-op.
    async fn remove(&self, series_id: &str) -> Result<(), WorkerError>;

    /// Decimate every requested series to the request's width, keyed by
    /// series id. Series the backend has never seen are absent from the
    /// result map.
    async fn decimate(
        &self,
        request: DecimationRequest,
    ) -> Result<HashMap<String, Vec<DisplayPoint>>, WorkerError>;
}
