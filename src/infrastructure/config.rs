use serde::Deserialize;

/// Live-mode windows offered by the dashboard ("show last N readings").
pub const RECOGNIZED_LIVE_WINDOWS: [usize; 7] = [50, 100, 300, 600, 1200, 1800, 3600];

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    #[serde(default)]
    pub live: LiveSettings,
    #[serde(default)]
    pub worker: WorkerSettings,
    #[serde(default)]
    pub chart: ChartSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            live: LiveSettings::default(),
            worker: WorkerSettings::default(),
            chart: ChartSettings::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LiveSettings {
    /// Sliding-window length for live mode.
    #[serde(default = "default_max_readings")]
    pub max_readings: usize,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            max_readings: default_max_readings(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkerSettings {
    /// Series longer than this are decimated off the main thread.
    #[serde(default = "default_offload_threshold")]
    pub offload_threshold: usize,
    /// Bound on a single worker round-trip before falling back.
    #[serde(default = "default_worker_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            offload_threshold: default_offload_threshold(),
            timeout_ms: default_worker_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    #[serde(default = "default_moving_average_window")]
    pub moving_average_window: usize,
    /// Use min/max bucket decimation on the main-thread path. Costs more
    /// than stride sampling but keeps short spikes visible.
    #[serde(default)]
    pub spike_fidelity: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            moving_average_window: default_moving_average_window(),
            spike_fidelity: false,
        }
    }
}

fn default_max_readings() -> usize {
    300
}

fn default_offload_threshold() -> usize {
    10_000
}

fn default_worker_timeout_ms() -> u64 {
    3_000
}

fn default_moving_average_window() -> usize {
    crate::application::aggregate::MOVING_AVERAGE_WINDOW
}

/// Clamp a requested live window to the nearest recognized value.
pub fn clamp_live_readings(requested: usize) -> usize {
    let clamped = RECOGNIZED_LIVE_WINDOWS
        .into_iter()
        .min_by_key(|&candidate| candidate.abs_diff(requested))
        .unwrap_or(default_max_readings());
    if clamped != requested {
        tracing::warn!(
            "unrecognized live window {}, clamped to {}",
            requested,
            clamped
        );
    }
    clamped
}

pub fn load_pipeline_config() -> anyhow::Result<PipelineConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/pipeline").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_live_readings() {
        assert_eq!(clamp_live_readings(300), 300);
        assert_eq!(clamp_live_readings(0), 50);
        assert_eq!(clamp_live_readings(170), 100);
        assert_eq!(clamp_live_readings(1000), 1200);
        assert_eq!(clamp_live_readings(100_000), 3600);
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.live.max_readings, 300);
        assert_eq!(config.worker.offload_threshold, 10_000);
        assert_eq!(config.worker.timeout_ms, 3_000);
        assert_eq!(config.chart.moving_average_window, 10);
    }
}
