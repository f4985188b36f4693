// Presentation layer - HTTP surface for the chart host
pub mod app_state;
pub mod handlers;
