// Chart engine - Selection state, mutators and derived views
use crate::application::engine_error::EngineError;
use crate::application::render_surface::{Clock, RenderSurface};
use crate::domain::highlight::{Highlight, HighlightPalette};
use crate::domain::projection::{
    chart_datasets, table_rows, ChartDataset, ChartFrame, ChartOptions, RenderError, TableRow,
};
use crate::domain::selection::{selected_count, selected_series_names, SeriesSelection};
use crate::domain::series::SeriesId;
use crate::domain::time_window::TimeWindow;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub loading: bool,
    pub loaded: bool,
    pub message: Option<String>,
}

/// Read-only snapshot of everything the host displays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineView {
    pub window: TimeWindow,
    pub window_label: String,
    pub selected_series_names: String,
    pub selected_count: usize,
    pub has_selected_series: bool,
    pub highlight: Option<Highlight>,
    pub status: EngineStatus,
    pub rows: Vec<TableRow>,
    pub chart: ChartFrame,
}

/// Owns the per-series selection state and keeps both projections in step
/// with it. Every mutator recomputes the derived views before returning.
pub struct ChartEngine {
    selections: Vec<SeriesSelection>,
    window: TimeWindow,
    highlight: Option<Highlight>,
    rows: Vec<TableRow>,
    frame: ChartFrame,
    status: EngineStatus,
    palette: HighlightPalette,
    clock: Arc<dyn Clock>,
    surface: Box<dyn RenderSurface>,
    render_failed: bool,
    destroyed: bool,
}

impl ChartEngine {
    pub fn new(
        surface: Box<dyn RenderSurface>,
        clock: Arc<dyn Clock>,
        options: ChartOptions,
        window: TimeWindow,
    ) -> Self {
        Self {
            selections: Vec::new(),
            window,
            highlight: None,
            rows: Vec::new(),
            frame: ChartFrame {
                datasets: Vec::new(),
                options,
            },
            status: EngineStatus::default(),
            palette: HighlightPalette::default(),
            clock,
            surface,
            render_failed: false,
            destroyed: false,
        }
    }

    pub fn begin_load(&mut self) {
        self.status.loading = true;
        self.status.message = None;
    }

    /// Publishes a finished load. A failed load keeps the last good state.
    pub fn finish_load(
        &mut self,
        result: anyhow::Result<Vec<SeriesSelection>>,
    ) -> Result<(), EngineError> {
        self.status.loading = false;

        match result {
            Ok(selections) => {
                self.selections = selections;
                self.highlight = None;
                self.status.loaded = true;
                self.status.message = None;
                self.recompute()
            }
            Err(e) => {
                tracing::error!("Error loading data: {:#}", e);
                let err = EngineError::Load(e);
                self.render_failed = false;
                self.status.message = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Returns `Ok(false)` without touching anything for an unknown series.
    pub fn toggle_include(&mut self, series_id: SeriesId) -> Result<bool, EngineError> {
        let Some(selection) = self.selections.iter_mut().find(|s| s.id() == series_id) else {
            tracing::warn!("Toggle requested for unknown series {}", series_id);
            return Ok(false);
        };

        selection.included = !selection.included;
        self.highlight = None;
        self.recompute()?;
        Ok(true)
    }

    pub fn select_all(&mut self) -> Result<(), EngineError> {
        self.set_all_included(true)
    }

    pub fn deselect_all(&mut self) -> Result<(), EngineError> {
        self.set_all_included(false)
    }

    fn set_all_included(&mut self, included: bool) -> Result<(), EngineError> {
        for selection in &mut self.selections {
            selection.included = included;
        }
        self.highlight = None;
        self.recompute()
    }

    /// An invalid custom range only records a message; window, highlight
    /// and both views stay exactly as they were.
    pub fn set_window(&mut self, window: TimeWindow) -> Result<(), EngineError> {
        if let Err(e) = window.validate(self.clock.now()) {
            tracing::warn!("Rejected time window {:?}: {}", window, e);
            self.render_failed = false;
            self.status.message = Some(e.to_string());
            return Err(EngineError::Validation(e));
        }

        self.window = window;
        self.highlight = None;
        self.status.message = None;
        self.recompute()
    }

    /// Repaints point styles; the filtered sets do not change.
    pub fn set_highlight(&mut self, highlight: Option<Highlight>) -> Result<(), EngineError> {
        self.highlight = highlight;
        self.recompute()
    }

    pub fn clear_highlight(&mut self) -> Result<(), EngineError> {
        self.set_highlight(None)
    }

    /// Reapplies the highlight that was active before printing, if any.
    pub fn restore_highlight_after_print(
        &mut self,
        snapshot: Option<Highlight>,
    ) -> Result<(), EngineError> {
        if snapshot.is_some() {
            self.highlight = snapshot;
        }
        self.recompute()?;
        self.refresh_surface(true)
    }

    /// Pushes the current frame to the surface again, optionally resizing.
    pub fn refresh_surface(&mut self, resize: bool) -> Result<(), EngineError> {
        if self.destroyed {
            return Ok(());
        }
        if resize {
            if let Err(e) = self.surface.resize() {
                tracing::warn!("Render surface resize failed: {:#}", e);
            }
        }
        self.redraw()
    }

    /// Tears down the render surface. Later recomputes skip the surface and
    /// an abandoned load no longer counts as loading.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.status.loading = false;
        self.surface.destroy();
        tracing::info!("Chart engine destroyed");
    }

    fn recompute(&mut self) -> Result<(), EngineError> {
        let now = self.clock.now();
        let highlight = self.highlight.as_ref();

        match table_rows(&self.selections, &self.window, highlight, now) {
            Ok(rows) => self.rows = rows,
            Err(e) => tracing::error!("Error building table rows: {}", e),
        }

        match chart_datasets(&self.selections, &self.window, highlight, &self.palette, now) {
            Ok(datasets) => self.frame.datasets = datasets,
            Err(e) => return Err(self.degrade(e)),
        }

        if !self.destroyed {
            self.redraw()?;
        }
        if self.render_failed {
            self.render_failed = false;
            self.status.message = None;
        }
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), EngineError> {
        if let Err(e) = self.surface.redraw(&self.frame) {
            return Err(self.degrade(RenderError::Surface(format!("{:#}", e))));
        }
        Ok(())
    }

    /// Falls back to an empty chart and records the failure for display.
    fn degrade(&mut self, error: RenderError) -> EngineError {
        tracing::error!("Error updating chart: {}", error);
        let err = EngineError::Render(error);
        self.render_failed = true;
        self.status.message = Some(err.to_string());
        self.frame.datasets.clear();

        if !self.destroyed {
            if let Err(e) = self.surface.redraw(&self.frame) {
                tracing::error!("Render surface rejected empty frame: {:#}", e);
            }
        }
        err
    }

    pub fn selections(&self) -> &[SeriesSelection] {
        &self.selections
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn datasets(&self) -> &[ChartDataset] {
        &self.frame.datasets
    }

    pub fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn window_label(&self) -> String {
        self.window.label()
    }

    pub fn selected_series_names(&self) -> String {
        selected_series_names(&self.selections)
    }

    pub fn selected_count(&self) -> usize {
        selected_count(&self.selections)
    }

    pub fn has_selected_series(&self) -> bool {
        self.selections.iter().any(|s| s.included)
    }

    pub fn highlight(&self) -> Option<Highlight> {
        self.highlight
    }

    pub fn status(&self) -> &EngineStatus {
        &self.status
    }

    pub fn view(&self) -> EngineView {
        EngineView {
            window: self.window,
            window_label: self.window_label(),
            selected_series_names: self.selected_series_names(),
            selected_count: self.selected_count(),
            has_selected_series: self.has_selected_series(),
            highlight: self.highlight,
            status: self.status.clone(),
            rows: self.rows.clone(),
            chart: self.frame.clone(),
        }
    }
}
