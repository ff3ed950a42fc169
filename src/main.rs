// Main entry point - Dependency injection and demo pipeline run
use std::sync::Arc;
use std::time::Duration;

use sensor_lod::application::chart_service::ChartDataService;
use sensor_lod::application::ingest::TelemetryIngest;
use sensor_lod::domain::chart::{ChartSpec, ChartView};
use sensor_lod::domain::telemetry::{Sample, SensorKind, SeriesMeta, TimeWindow};
use sensor_lod::infrastructure::config::load_pipeline_config;
use sensor_lod::infrastructure::csv_export::to_csv_string;
use sensor_lod::infrastructure::worker::DecimationWorker;
use sensor_lod::presentation::chart_view::summarize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration (defaults apply when config/pipeline.toml is absent)
    let config = load_pipeline_config()?;

    // Create the background worker (infrastructure layer)
    let worker = Arc::new(DecimationWorker::spawn(Duration::from_millis(
        config.worker.timeout_ms,
    )));
    worker.wait_until_ready().await;

    // Create services (application layer)
    let chart_service = ChartDataService::new(worker.clone(), config.clone());
    let mut ingest = TelemetryIngest::new(&config.live);

    // Feed a week of synthetic one-second telemetry for two sensors
    let temperature = SeriesMeta::new("sensor-a4:cf", "°C", SensorKind::Temperature);
    let humidity = SeriesMeta::new("sensor-b7:11", "%", SensorKind::Humidity);
    ingest.select(temperature.clone());
    ingest.select(humidity.clone());

    let week_points = 7 * 24 * 3600;
    ingest.append(
        &temperature.id,
        (0..week_points).map(|i| {
            let t = i as f64;
            Sample::new(i * 1000, 21.0 + 3.0 * (t / 43_200.0).sin())
        }),
    );
    ingest.append(
        &humidity.id,
        (0..week_points).step_by(5).map(|i| {
            let t = i as f64;
            Sample::new(i * 1000, 55.0 + 10.0 * (t / 86_400.0).cos())
        }),
    );

    // Zoomed single-sensor chart: the worker path decimates it
    let window = Some(TimeWindow::new(0, 3 * 24 * 3600 * 1000));
    let spec = ChartSpec::Single(temperature.clone());
    if let Some(view) = chart_service.prepare(&spec, window, 1920, &ingest).await {
        println!("single chart: {}", summarize(&view));
        if let ChartView::Single { points, .. } = &view {
            let csv = to_csv_string(&points[..points.len().min(5)])?;
            println!("first rows:\n{}", csv);
        }
    }

    // Comparison chart across both sensors
    let spec = ChartSpec::Comparison(vec![temperature, humidity]);
    if let Some(view) = chart_service.prepare(&spec, None, 1920, &ingest).await {
        println!("comparison chart: {}", summarize(&view));
    }

    worker.shutdown().await;
    Ok(())
}
