// Print sequencer - Clear highlight, render, print, restore
use crate::application::chart_engine::ChartEngine;
use crate::application::engine_error::EngineError;
use crate::application::render_surface::PrintTrigger;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PrintPhase {
    Idle,
    Preparing,
    Rendered,
    Printed,
    Restoring,
}

/// Waits between phases. The surface gives no completion signal, so each
/// wait approximates the time it needs to apply a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintTiming {
    pub settle: Duration,
    pub pre_print: Duration,
    pub restore: Duration,
}

impl Default for PrintTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(400),
            pre_print: Duration::from_millis(100),
            restore: Duration::from_millis(150),
        }
    }
}

impl PrintTiming {
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            pre_print: Duration::ZERO,
            restore: Duration::ZERO,
        }
    }
}

/// Runs one print pass at a time; overlapping requests are not guarded.
pub struct PrintSequencer {
    trigger: Arc<dyn PrintTrigger>,
    timing: PrintTiming,
    phase: watch::Sender<PrintPhase>,
}

impl PrintSequencer {
    pub fn new(trigger: Arc<dyn PrintTrigger>, timing: PrintTiming) -> Self {
        let (phase, _) = watch::channel(PrintPhase::Idle);
        Self {
            trigger,
            timing,
            phase,
        }
    }

    pub fn phase(&self) -> PrintPhase {
        *self.phase.borrow()
    }

    /// The engine lock is released during every wait so other mutators can
    /// run between phases.
    pub async fn run(&self, engine: &Mutex<ChartEngine>) -> Result<(), EngineError> {
        self.enter(PrintPhase::Preparing);
        let snapshot = {
            let mut engine = engine.lock().await;
            let snapshot = engine.highlight();
            if let Err(e) = engine.clear_highlight() {
                tracing::warn!("Chart render before printing failed: {}", e);
            }
            snapshot
        };

        self.enter(PrintPhase::Rendered);
        tokio::time::sleep(self.timing.settle).await;
        if let Err(e) = engine.lock().await.refresh_surface(true) {
            tracing::warn!("Print-size redraw failed: {}", e);
        }
        tokio::time::sleep(self.timing.pre_print).await;

        self.enter(PrintPhase::Printed);
        let trigger = Arc::clone(&self.trigger);
        let printed = match tokio::task::spawn_blocking(move || trigger.print()).await {
            Ok(result) => result,
            Err(e) => Err(anyhow::Error::new(e).context("Print trigger task panicked")),
        };
        if let Err(e) = &printed {
            tracing::error!("Print trigger failed: {:#}", e);
        }

        self.enter(PrintPhase::Restoring);
        tokio::time::sleep(self.timing.restore).await;
        if let Err(e) = engine.lock().await.restore_highlight_after_print(snapshot) {
            tracing::warn!("Chart restore after printing failed: {}", e);
        }
        tokio::time::sleep(self.timing.settle).await;

        self.enter(PrintPhase::Idle);
        printed.map_err(EngineError::Print)
    }

    fn enter(&self, phase: PrintPhase) {
        tracing::info!("Print sequence: {:?}", phase);
        self.phase.send_replace(phase);
    }
}
