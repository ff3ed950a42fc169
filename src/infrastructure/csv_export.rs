// CSV export of display series
use crate::domain::telemetry::DisplayPoint;
use anyhow::Context;
use chrono::{DateTime, SecondsFormat};
use std::io::Write;

/// Write `Timestamp,Value` rows with ISO-8601 (RFC 3339, UTC) timestamps.
/// Consumes whatever series it is handed, decimated or full.
pub fn write_csv<W: Write>(points: &[DisplayPoint], out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "Timestamp,Value")?;
    for point in points {
        let timestamp = DateTime::from_timestamp_millis(point.time_ms)
            .with_context(|| format!("timestamp {} out of range", point.time_ms))?;
        writeln!(
            out,
            "{},{}",
            timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            point.value
        )?;
    }
    Ok(())
}

pub fn to_csv_string(points: &[DisplayPoint]) -> anyhow::Result<String> {
    let mut buffer = Vec::new();
    write_csv(points, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_rows_are_iso8601() {
        let points = vec![
            DisplayPoint::new(0, 21.5),
            DisplayPoint::new(86_400_000, -3.25),
        ];
        let csv = to_csv_string(&points).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Timestamp,Value");
        assert_eq!(lines[1], "1970-01-01T00:00:00.000Z,21.5");
        assert_eq!(lines[2], "1970-01-02T00:00:00.000Z,-3.25");
    }

    #[test]
    fn test_empty_series_is_header_only() {
        let csv = to_csv_string(&[]).unwrap();
        assert_eq!(csv, "Timestamp,Value\n");
    }
}
