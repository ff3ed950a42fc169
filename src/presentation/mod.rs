// Presentation layer - Rendering-sink-facing view helpers
pub mod chart_view;
