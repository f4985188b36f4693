// Chart session - Hosts one engine, its loads, prints and teardown
use crate::application::chart_engine::ChartEngine;
use crate::application::engine_error::EngineError;
use crate::application::print_sequencer::PrintSequencer;
use crate::application::series_loader::SeriesLoader;
use futures::future::{AbortHandle, Abortable};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct LoadLifecycle {
    generation: u64,
    in_flight: Option<AbortHandle>,
    closed: bool,
}

/// Fetches run without holding the engine lock; only the finished result is
/// published, and never after [`ChartSession::destroy`].
pub struct ChartSession {
    engine: Arc<Mutex<ChartEngine>>,
    loader: SeriesLoader,
    printer: PrintSequencer,
    lifecycle: Mutex<LoadLifecycle>,
}

impl ChartSession {
    pub fn new(engine: ChartEngine, loader: SeriesLoader, printer: PrintSequencer) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            loader,
            printer,
            lifecycle: Mutex::new(LoadLifecycle::default()),
        }
    }

    pub fn engine(&self) -> &Arc<Mutex<ChartEngine>> {
        &self.engine
    }

    pub fn printer(&self) -> &PrintSequencer {
        &self.printer
    }

    /// Re-runs the load. A newer reload supersedes one still in flight.
    pub async fn reload(&self) -> Result<(), EngineError> {
        let (handle, registration) = AbortHandle::new_pair();
        let generation = {
            let mut lifecycle = self.lifecycle.lock().await;
            if lifecycle.closed {
                return Err(EngineError::Cancelled);
            }
            if let Some(previous) = lifecycle.in_flight.replace(handle) {
                previous.abort();
            }
            lifecycle.generation += 1;
            lifecycle.generation
        };

        self.engine.lock().await.begin_load();

        let outcome = Abortable::new(self.loader.load(), registration).await;

        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.closed || lifecycle.generation != generation {
            tracing::debug!("Discarding result of superseded load {}", generation);
            return Err(EngineError::Cancelled);
        }
        lifecycle.in_flight = None;

        match outcome {
            Ok(result) => self.engine.lock().await.finish_load(result),
            Err(_aborted) => Err(EngineError::Cancelled),
        }
    }

    pub async fn print(&self) -> Result<(), EngineError> {
        self.printer.run(&self.engine).await
    }

    /// Abandons in-flight fetches and releases the render surface.
    pub async fn destroy(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        lifecycle.closed = true;
        if let Some(handle) = lifecycle.in_flight.take() {
            handle.abort();
        }
        self.engine.lock().await.destroy();
    }
}
