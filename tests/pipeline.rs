// End-to-end pipeline: ingest -> plan -> worker decimation -> merge -> export
use std::sync::Arc;
use std::time::Duration;

use sensor_lod::application::chart_service::ChartDataService;
use sensor_lod::application::ingest::TelemetryIngest;
use sensor_lod::domain::chart::{ChartSpec, ChartView};
use sensor_lod::domain::telemetry::{Sample, SensorKind, SeriesMeta, TimeWindow};
use sensor_lod::infrastructure::config::PipelineConfig;
use sensor_lod::infrastructure::csv_export::to_csv_string;
use sensor_lod::infrastructure::worker::DecimationWorker;

fn meta(id: &str, kind: SensorKind) -> SeriesMeta {
    SeriesMeta::new(id, "C", kind)
}

fn fill(ingest: &mut TelemetryIngest, id: &str, len: i64) {
    ingest.append(id, (0..len).map(|t| Sample::new(t * 1000, (t % 100) as f64)));
}

#[tokio::test]
async fn large_single_series_goes_through_the_worker() {
    let config = PipelineConfig::default();
    let worker = Arc::new(DecimationWorker::spawn(Duration::from_secs(3)));
    worker.wait_until_ready().await;
    let service = ChartDataService::new(worker.clone(), config.clone());

    let mut ingest = TelemetryIngest::new(&config.live);
    let temperature = meta("temp-1", SensorKind::Temperature);
    ingest.select(temperature.clone());
    fill(&mut ingest, "temp-1", 100_000);

    // A 10-day window plans the low tier and decimates aggressively.
    let window = Some(TimeWindow::new(0, 10 * 24 * 3600 * 1000));
    let view = service
        .prepare(&ChartSpec::Single(temperature), window, 800, &ingest)
        .await
        .expect("not superseded");

    let ChartView::Single {
        points,
        daily_range,
        ..
    } = view
    else {
        panic!("expected single chart");
    };
    assert!(points.len() <= 1200);
    assert!(points.len() >= 100);
    assert_eq!(points[0].time_ms, 0);
    assert_eq!(points.last().unwrap().time_ms, 99_999 * 1000);
    assert!(points.iter().all(|p| p.moving_average.is_some()));
    // 100k seconds of data spans two UTC days.
    assert_eq!(daily_range.len(), 2);

    // A tight zoom slices below the offload threshold and stays on the
    // main thread.
    let zoomed = Some(TimeWindow::new(0, 30 * 60 * 1000));
    let view = service
        .prepare(
            &ChartSpec::Single(meta("temp-1", SensorKind::Temperature)),
            zoomed,
            800,
            &ingest,
        )
        .await
        .expect("not superseded");
    let ChartView::Single { points, .. } = view else {
        panic!("expected single chart");
    };
    // Sub-hour window: ultra tier, every raw sample survives.
    assert_eq!(points.len(), 1801);

    worker.shutdown().await;
}

#[tokio::test]
async fn comparison_merges_decimated_series() {
    let config = PipelineConfig::default();
    let worker = Arc::new(DecimationWorker::spawn(Duration::from_secs(3)));
    worker.wait_until_ready().await;
    let service = ChartDataService::new(worker.clone(), config.clone());

    let mut ingest = TelemetryIngest::new(&config.live);
    let a = meta("a", SensorKind::Temperature);
    let b = meta("b", SensorKind::Humidity);
    ingest.select(a.clone());
    ingest.select(b.clone());
    fill(&mut ingest, "a", 20_000);
    // Offset timestamps so the union is strictly larger than either series.
    ingest.append("b", (0..500).map(|t| Sample::new(t * 1000 + 500, t as f64)));

    let view = service
        .prepare(&ChartSpec::Comparison(vec![a, b]), None, 800, &ingest)
        .await
        .expect("not superseded");

    let ChartView::Comparison { series_ids, rows } = view else {
        panic!("expected comparison chart");
    };
    assert_eq!(series_ids, vec!["a".to_string(), "b".to_string()]);
    assert!(!rows.is_empty());
    for row in &rows {
        assert_eq!(row.values.len(), 2);
    }
    // Rows are strictly ascending in time.
    assert!(rows.windows(2).all(|w| w[0].time_ms < w[1].time_ms));
    // Series b never overlaps a's timestamps, so its values are null on
    // a's rows and present on its own.
    let b_present = rows
        .iter()
        .filter(|r| r.values["b"].is_some())
        .count();
    assert_eq!(b_present, 500);

    worker.shutdown().await;
}

#[tokio::test]
async fn deselecting_a_sensor_discards_its_worker_cache() {
    use sensor_lod::domain::chart::DecimationRequest;

    let config = PipelineConfig::default();
    let worker = Arc::new(DecimationWorker::spawn(Duration::from_secs(3)));
    worker.wait_until_ready().await;
    let service = ChartDataService::new(worker.clone(), config.clone());

    let mut ingest = TelemetryIngest::new(&config.live);
    let pressure = meta("press-1", SensorKind::Pressure);
    ingest.select(pressure.clone());
    fill(&mut ingest, "press-1", 20_000);

    // A prepare above the offload threshold warms the worker cache.
    service
        .prepare(&ChartSpec::Single(pressure), None, 800, &ingest)
        .await
        .expect("not superseded");

    ingest.deselect("press-1");
    service.discard_series("press-1").await;
    assert!(ingest.buffer("press-1").is_none());

    // The worker no longer knows the series either.
    use sensor_lod::application::backend::DecimationBackend;
    let result = worker
        .decimate(DecimationRequest {
            series_ids: vec!["press-1".to_string()],
            window: None,
            width_px: 800,
            generation: 99,
        })
        .await
        .unwrap();
    assert!(result.is_empty());

    worker.shutdown().await;
}

#[tokio::test]
async fn live_mode_then_export() {
    let config = PipelineConfig::default();
    let worker = Arc::new(DecimationWorker::spawn(Duration::from_secs(3)));
    worker.wait_until_ready().await;
    let service = ChartDataService::new(worker.clone(), config.clone());

    let mut ingest = TelemetryIngest::new(&config.live);
    let battery = meta("bat-1", SensorKind::Battery);
    ingest.select(battery.clone());
    ingest.set_live(true);
    ingest.set_max_live_readings(100);
    for t in 0..150 {
        ingest.append("bat-1", vec![Sample::new(t * 1000, 4.1)]);
    }

    let view = service
        .prepare(&ChartSpec::Single(battery), None, 800, &ingest)
        .await
        .expect("not superseded");
    let ChartView::Single { points, .. } = view else {
        panic!("expected single chart");
    };
    // Sliding window kept the most recent 100 readings, all below the
    // decimation floor, so everything is drawn.
    assert_eq!(points.len(), 100);
    assert_eq!(points[0].time_ms, 50_000);

    let csv = to_csv_string(&points).unwrap();
    assert_eq!(csv.lines().count(), 101);
    assert!(csv.starts_with("Timestamp,Value\n"));
    assert!(csv.contains("1970-01-01T00:00:50.000Z,4.1"));

    worker.shutdown().await;
}
