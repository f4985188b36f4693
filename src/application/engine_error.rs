// Error taxonomy surfaced by the chart engine
use crate::domain::projection::RenderError;
use crate::domain::time_window::WindowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to load series and measurements")]
    Load(#[source] anyhow::Error),
    #[error(transparent)]
    Validation(#[from] WindowError),
    #[error("Failed to render chart. Please try again.")]
    Render(#[from] RenderError),
    #[error("Print trigger failed")]
    Print(#[source] anyhow::Error),
    #[error("Load was cancelled")]
    Cancelled,
}
