// In-memory collaborators for application tests
use crate::application::render_surface::{Clock, PrintTrigger, RenderSurface};
use crate::application::series_repository::{MeasurementStore, SeriesCatalog};
use crate::domain::projection::ChartFrame;
use crate::domain::series::{Measurement, MeasurementId, Series, SeriesId};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn series(id: i64, name: &str, min: f64, max: f64) -> Series {
    Series::new(
        SeriesId(id),
        name.to_string(),
        None,
        min,
        max,
        format!("#00000{}", id),
        "🌡️".to_string(),
    )
}

pub fn measurement(id: i64, series_id: i64, value: f64, days_ago: i64) -> Measurement {
    Measurement::new(
        MeasurementId(id),
        SeriesId(series_id),
        value,
        test_now() - Duration::days(days_ago),
    )
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct FakeCatalog {
    pub series: Option<Vec<Series>>,
}

#[async_trait]
impl SeriesCatalog for FakeCatalog {
    async fn list_series(&self) -> anyhow::Result<Vec<Series>> {
        self.series
            .clone()
            .ok_or_else(|| anyhow::anyhow!("catalog unavailable"))
    }
}

/// Serves measurements per series; ids in `failing` return an error and
/// every fetch waits for `gate` when one is installed.
#[derive(Default)]
pub struct FakeStore {
    pub measurements: HashMap<SeriesId, Vec<Measurement>>,
    pub failing: HashSet<SeriesId>,
    pub gate: Option<Arc<Notify>>,
}

impl FakeStore {
    pub fn with(mut self, series_id: i64, measurements: Vec<Measurement>) -> Self {
        self.measurements.insert(SeriesId(series_id), measurements);
        self
    }

    pub fn failing(mut self, series_id: i64) -> Self {
        self.failing.insert(SeriesId(series_id));
        self
    }
}

#[async_trait]
impl MeasurementStore for FakeStore {
    async fn list_measurements(
        &self,
        series_id: Option<SeriesId>,
    ) -> anyhow::Result<Vec<Measurement>> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match series_id {
            Some(id) if self.failing.contains(&id) => anyhow::bail!("store timeout for {}", id),
            Some(id) => Ok(self.measurements.get(&id).cloned().unwrap_or_default()),
            None => Ok(self.measurements.values().flatten().cloned().collect()),
        }
    }
}

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub frames: Vec<ChartFrame>,
    pub resizes: usize,
    pub destroyed: usize,
}

/// Records every frame; shares its log so tests can inspect it after the
/// surface has been moved into the engine.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    pub log: Arc<Mutex<SurfaceLog>>,
    pub fail_redraw: bool,
}

impl RenderSurface for RecordingSurface {
    fn redraw(&mut self, frame: &ChartFrame) -> anyhow::Result<()> {
        if self.fail_redraw && !frame.datasets.is_empty() {
            anyhow::bail!("canvas lost");
        }
        self.log.lock().unwrap().frames.push(frame.clone());
        Ok(())
    }

    fn resize(&mut self) -> anyhow::Result<()> {
        self.log.lock().unwrap().resizes += 1;
        Ok(())
    }

    fn destroy(&mut self) {
        self.log.lock().unwrap().destroyed += 1;
    }
}

/// Captures the last frame drawn at the moment printing was requested.
pub struct RecordingPrinter {
    pub surface_log: Arc<Mutex<SurfaceLog>>,
    pub printed_frames: Mutex<Vec<ChartFrame>>,
    pub fail: bool,
}

impl RecordingPrinter {
    pub fn new(surface_log: Arc<Mutex<SurfaceLog>>) -> Self {
        Self {
            surface_log,
            printed_frames: Mutex::new(Vec::new()),
            fail: false,
        }
    }
}

impl PrintTrigger for RecordingPrinter {
    fn print(&self) -> anyhow::Result<()> {
        if let Some(frame) = self.surface_log.lock().unwrap().frames.last() {
            self.printed_frames.lock().unwrap().push(frame.clone());
        }
        if self.fail {
            anyhow::bail!("no printer configured");
        }
        Ok(())
    }
}
