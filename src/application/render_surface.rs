// Ports towards the rendering surface, the print flow and the wall clock
use crate::domain::projection::ChartFrame;
use chrono::{DateTime, Utc};

/// Consumes chart frames. Owned by the engine, torn down by the host.
pub trait RenderSurface: Send {
    /// Replace the displayed datasets and repaint immediately.
    fn redraw(&mut self, frame: &ChartFrame) -> anyhow::Result<()>;

    /// Re-measure the drawing area, e.g. for print dimensions.
    fn resize(&mut self) -> anyhow::Result<()>;

    /// Release native resources. Called at most once.
    fn destroy(&mut self);
}

/// Opens the platform print flow. May block until the user dismisses it.
pub trait PrintTrigger: Send + Sync {
    fn print(&self) -> anyhow::Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
