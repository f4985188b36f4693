// Render surface that keeps the latest frame for HTTP clients and printing
use crate::application::render_surface::{PrintTrigger, RenderSurface};
use crate::domain::projection::ChartFrame;
use anyhow::Context;
use serde::Serialize;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceState {
    pub frame: Option<ChartFrame>,
    /// Bumped on every redraw so clients can poll for changes
    pub revision: u64,
    pub resizes: u64,
    pub destroyed: bool,
}

pub type SharedSurfaceState = Arc<RwLock<SurfaceState>>;

#[derive(Debug, Clone, Default)]
pub struct SnapshotSurface {
    state: SharedSurfaceState,
}

impl SnapshotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SharedSurfaceState {
        self.state.clone()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow::anyhow!("surface state lock poisoned")
}

impl RenderSurface for SnapshotSurface {
    fn redraw(&mut self, frame: &ChartFrame) -> anyhow::Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.destroyed {
            anyhow::bail!("render surface already destroyed");
        }
        state.frame = Some(frame.clone());
        state.revision += 1;
        Ok(())
    }

    fn resize(&mut self) -> anyhow::Result<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.resizes += 1;
        Ok(())
    }

    fn destroy(&mut self) {
        if let Ok(mut state) = self.state.write() {
            state.destroyed = true;
            state.frame = None;
        }
    }
}

/// Writes the displayed frame to a JSON file and hands it to an optional
/// print command such as `lp`.
pub struct FramePrintTrigger {
    state: SharedSurfaceState,
    output_path: PathBuf,
    command: Option<String>,
    args: Vec<String>,
}

impl FramePrintTrigger {
    pub fn new(
        state: SharedSurfaceState,
        output_path: PathBuf,
        command: Option<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            state,
            output_path,
            command,
            args,
        }
    }
}

impl PrintTrigger for FramePrintTrigger {
    fn print(&self) -> anyhow::Result<()> {
        let frame = {
            let state = self.state.read().map_err(poisoned)?;
            state.frame.clone().context("nothing has been rendered yet")?
        };

        let json = serde_json::to_vec_pretty(&frame)?;
        std::fs::write(&self.output_path, json)
            .with_context(|| format!("Failed to write {}", self.output_path.display()))?;
        tracing::info!("Exported chart frame to {}", self.output_path.display());

        let Some(program) = &self.command else {
            return Ok(());
        };

        let status = Command::new(program)
            .args(&self.args)
            .arg(&self.output_path)
            .status()
            .with_context(|| format!("Failed to run print command {}", program))?;

        if !status.success() {
            anyhow::bail!("Print command {} exited with {}", program, status);
        }
        Ok(())
    }
}
