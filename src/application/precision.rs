// Level-of-detail planning: zoom window duration -> decimation width
use crate::domain::telemetry::TimeWindow;

pub const ULTRA_WINDOW_MS: i64 = 60 * 60 * 1000;
pub const HIGH_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;
pub const LOW_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Widest plan we ever produce; effectively disables decimation for
/// sub-hour windows.
pub const MAX_WIDTH_PX: u32 = 8000;
const MEDIUM_CAP_PX: u32 = 4000;
const MIN_WIDTH_PX: u32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionTier {
    Ultra,
    High,
    Medium,
    Low,
    Overview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionPlan {
    pub tier: PrecisionTier,
    pub width_px: u32,
    /// True when the series already fits the planned width and decimation
    /// can be skipped outright.
    pub skip_decimation: bool,
}

/// Pick a decimation width for the current zoom.
///
/// Shorter window means more screen pixels per unit time, so more raw
/// samples are kept; zooming in never lowers the planned width. The widths
/// are chained (`max` against the next lower tier) so the ordering holds
/// even for viewports wider than the per-tier caps.
pub fn plan(window: Option<TimeWindow>, total_points: usize, viewport_px: u32) -> PrecisionPlan {
    let low_width = MIN_WIDTH_PX.max(viewport_px);
    let medium_width = MEDIUM_CAP_PX
        .min(viewport_px.saturating_mul(2))
        .max(low_width);
    let high_width = MAX_WIDTH_PX
        .min(viewport_px.saturating_mul(4))
        .max(medium_width);
    let ultra_width = MAX_WIDTH_PX.max(high_width);

    let (tier, width_px) = match window.map(|w| w.duration_ms()) {
        None => (PrecisionTier::Overview, low_width),
        Some(d) if d < ULTRA_WINDOW_MS => (PrecisionTier::Ultra, ultra_width),
        Some(d) if d < HIGH_WINDOW_MS => (PrecisionTier::High, high_width),
        Some(d) if d < LOW_WINDOW_MS => (PrecisionTier::Medium, medium_width),
        Some(_) => (PrecisionTier::Low, low_width),
    };

    PrecisionPlan {
        tier,
        width_px,
        skip_decimation: total_points <= width_px as usize,
    }
}
