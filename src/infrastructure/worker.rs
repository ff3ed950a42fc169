// Background decimation worker - Owns per-series columnar caches off the UI path
use crate::application::backend::{DecimationBackend, WorkerError};
use crate::application::decimator;
use crate::domain::chart::DecimationRequest;
use crate::domain::telemetry::{DisplayPoint, TimeWindow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

const COMMAND_QUEUE_DEPTH: usize = 64;

/// Raw sample columns for one series, kept sorted by timestamp.
///
/// Columns rather than sample structs so appends move two flat vectors
/// through the channel without per-point serialization.
#[derive(Debug, Default)]
struct SeriesColumns {
    times: Vec<i64>,
    values: Vec<f64>,
}

impl SeriesColumns {
    fn len(&self) -> usize {
        self.times.len()
    }

    /// Merge an incoming batch, keeping ascending unique timestamps with
    /// last-write-wins on duplicates. The common case of an in-order
    /// suffix is a plain extend.
    fn merge(&mut self, times: Vec<i64>, values: Vec<f64>) {
        if times.is_empty() || times.len() != values.len() {
            return;
        }

        let in_order_suffix = times.windows(2).all(|w| w[0] < w[1])
            && self.times.last().is_none_or(|&last| last < times[0]);
        if in_order_suffix {
            self.times.extend_from_slice(&times);
            self.values.extend_from_slice(&values);
            return;
        }

        let mut incoming: Vec<(i64, f64)> = times.into_iter().zip(values).collect();
        incoming.sort_by_key(|(t, _)| *t);

        let mut merged_times = Vec::with_capacity(self.len() + incoming.len());
        let mut merged_values = Vec::with_capacity(self.len() + incoming.len());
        let mut existing = 0usize;
        let mut push = |t: i64, v: f64, merged_times: &mut Vec<i64>, merged_values: &mut Vec<f64>| {
            if merged_times.last() == Some(&t) {
                *merged_values.last_mut().unwrap() = v;
            } else {
                merged_times.push(t);
                merged_values.push(v);
            }
        };
        for (t, v) in incoming {
            while existing < self.len() && self.times[existing] < t {
                push(
                    self.times[existing],
                    self.values[existing],
                    &mut merged_times,
                    &mut merged_values,
                );
                existing += 1;
            }
            if existing < self.len() && self.times[existing] == t {
                existing += 1;
            }
            push(t, v, &mut merged_times, &mut merged_values);
        }
        while existing < self.len() {
            push(
                self.times[existing],
                self.values[existing],
                &mut merged_times,
                &mut merged_values,
            );
            existing += 1;
        }

        self.times = merged_times;
        self.values = merged_values;
    }

    fn decimate(&self, window: Option<TimeWindow>, width_px: u32) -> Vec<DisplayPoint> {
        let (start, end) = match window {
            None => (0, self.len()),
            Some(w) => (
                self.times.partition_point(|&t| t < w.start_ms),
                self.times.partition_point(|&t| t <= w.end_ms),
            ),
        };
        let len = end - start;
        let target = (width_px as usize).max(decimator::MIN_DISPLAY_POINTS);
        decimator::stride_indices(len, target)
            .into_iter()
            .map(|i| DisplayPoint::new(self.times[start + i], self.values[start + i]))
            .collect()
    }
}

enum WorkerCommand {
    Append {
        series_id: String,
        times: Vec<i64>,
        values: Vec<f64>,
        reply: oneshot::Sender<()>,
    },
    Remove {
        series_id: String,
        reply: oneshot::Sender<()>,
    },
    Decimate {
        request: DecimationRequest,
        reply: oneshot::Sender<HashMap<String, Vec<DisplayPoint>>>,
    },
    Shutdown,
}

/// Handle to the single background decimation task.
///
/// Explicitly constructed and disposed; there is no module-level singleton.
/// All calls are bounded by the configured timeout so a hung task degrades
/// to main-thread decimation instead of hanging the chart.
pub struct DecimationWorker {
    tx: mpsc::Sender<WorkerCommand>,
    ready: watch::Receiver<bool>,
    timeout: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl DecimationWorker {
    pub fn spawn(timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (ready_tx, ready_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(rx, ready_tx));
        Self {
            tx,
            ready: ready_rx,
            timeout,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Block until the task has started its command loop. Callers that skip
    /// this and race the startup simply take the main-thread fallback.
    pub async fn wait_until_ready(&self) {
        let mut ready = self.ready.clone();
        let _ = ready.wait_for(|ready| *ready).await;
    }

    /// Stop the task and wait for it to drain.
    pub async fn shutdown(&self) {
        let handle = self.handle.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = self.tx.send(WorkerCommand::Shutdown).await;
            let _ = handle.await;
        }
    }

    async fn round_trip<T>(
        &self,
        command: WorkerCommand,
        rx: oneshot::Receiver<T>,
    ) -> Result<T, WorkerError> {
        if !self.is_ready() {
            return Err(WorkerError::NotReady);
        }
        self.tx
            .send(command)
            .await
            .map_err(|_| WorkerError::Closed)?;
        match tokio::time::timeout(self.timeout, rx).await {
            Err(_) => Err(WorkerError::Timeout(self.timeout)),
            Ok(Err(_)) => Err(WorkerError::Closed),
            Ok(Ok(value)) => Ok(value),
        }
    }
}

#[async_trait]
impl DecimationBackend for DecimationWorker {
    fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    async fn append(
        &self,
        series_id: &str,
        times: Vec<i64>,
        values: Vec<f64>,
    ) -> Result<(), WorkerError> {
        let (reply, rx) = oneshot::channel();
        self.round_trip(
            WorkerCommand::Append {
                series_id: series_id.to_string(),
                times,
                values,
                reply,
            },
            rx,
        )
        .await
    }

    async fn remove(&self, series_id: &str) -> Result<(), WorkerError> {
        let (reply, rx) = oneshot::channel();
        self.round_trip(
            WorkerCommand::Remove {
                series_id: series_id.to_string(),
                reply,
            },
            rx,
        )
        .await
    }

    async fn decimate(
        &self,
        request: DecimationRequest,
    ) -> Result<HashMap<String, Vec<DisplayPoint>>, WorkerError> {
        let (reply, rx) = oneshot::channel();
        self.round_trip(WorkerCommand::Decimate { request, reply }, rx)
            .await
    }
}

async fn run_loop(mut rx: mpsc::Receiver<WorkerCommand>, ready: watch::Sender<bool>) {
    let mut cache: HashMap<String, SeriesColumns> = HashMap::new();
    let _ = ready.send(true);
    tracing::debug!("decimation worker started");

    while let Some(command) = rx.recv().await {
        match command {
            WorkerCommand::Append {
                series_id,
                times,
                values,
                reply,
            } => {
                let columns = cache.entry(series_id).or_default();
                columns.merge(times, values);
                let _ = reply.send(());
            }
            WorkerCommand::Remove { series_id, reply } => {
                cache.remove(&series_id);
                let _ = reply.send(());
            }
            WorkerCommand::Decimate { request, reply } => {
                let mut out = HashMap::with_capacity(request.series_ids.len());
                for series_id in &request.series_ids {
                    if let Some(columns) = cache.get(series_id) {
                        out.insert(
                            series_id.clone(),
                            columns.decimate(request.window, request.width_px),
                        );
                    }
                }
                tracing::debug!(
                    "worker decimated {} series gen={}",
                    out.len(),
                    request.generation
                );
                // The requester may have been superseded and dropped its
                // receiver; that is fine.
                let _ = reply.send(out);
            }
            WorkerCommand::Shutdown => break,
        }
    }
    let _ = ready.send(false);
    tracing::debug!("decimation worker stopped");
}
