// HTTP request handlers
use crate::application::chart_engine::EngineView;
use crate::application::engine_error::EngineError;
use crate::application::print_sequencer::PrintPhase;
use crate::domain::highlight::Highlight;
use crate::domain::projection::{ChartFrame, TableRow};
use crate::domain::series::SeriesId;
use crate::domain::time_window::TimeWindow;
use crate::infrastructure::snapshot_surface::SurfaceState;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        let status = match &e {
            EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::Load(_) => StatusCode::BAD_GATEWAY,
            EngineError::Cancelled => StatusCode::CONFLICT,
            EngineError::Render(_) | EngineError::Print(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

type ViewResult = Result<Json<EngineView>, ApiError>;

/// Render failures are already recovered inside the engine and reported in
/// the view's status, so they still answer with the current view.
fn tolerate_render(result: Result<(), EngineError>) -> Result<(), ApiError> {
    match result {
        Ok(()) => Ok(()),
        Err(EngineError::Render(e)) => {
            tracing::debug!("Serving degraded view after render failure: {}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn current_view(state: &AppState) -> Json<EngineView> {
    Json(state.session.engine().lock().await.view())
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_view(State(state): State<Arc<AppState>>) -> Json<EngineView> {
    current_view(&state).await
}

pub async fn get_table(State(state): State<Arc<AppState>>) -> Json<Vec<TableRow>> {
    Json(state.session.engine().lock().await.rows().to_vec())
}

pub async fn get_chart(State(state): State<Arc<AppState>>) -> Json<ChartFrame> {
    Json(state.session.engine().lock().await.frame().clone())
}

/// Frame as last applied by the render surface, with its revision counter
pub async fn get_surface(State(state): State<Arc<AppState>>) -> Result<Json<SurfaceState>, ApiError> {
    let surface = state
        .surface
        .read()
        .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "surface unavailable"))?;
    Ok(Json(surface.clone()))
}

pub async fn reload(State(state): State<Arc<AppState>>) -> ViewResult {
    tolerate_render(state.session.reload().await)?;
    Ok(current_view(&state).await)
}

pub async fn toggle_series(Path(id): Path<i64>, State(state): State<Arc<AppState>>) -> ViewResult {
    let mut engine = state.session.engine().lock().await;
    match engine.toggle_include(SeriesId(id)) {
        Ok(true) => {}
        Ok(false) => {
            return Err(ApiError::new(
                StatusCode::NOT_FOUND,
                format!("unknown series {}", id),
            ));
        }
        Err(e) => tolerate_render(Err(e))?,
    }
    Ok(Json(engine.view()))
}

pub async fn select_all(State(state): State<Arc<AppState>>) -> ViewResult {
    let mut engine = state.session.engine().lock().await;
    tolerate_render(engine.select_all())?;
    Ok(Json(engine.view()))
}

pub async fn deselect_all(State(state): State<Arc<AppState>>) -> ViewResult {
    let mut engine = state.session.engine().lock().await;
    tolerate_render(engine.deselect_all())?;
    Ok(Json(engine.view()))
}

pub async fn set_window(
    State(state): State<Arc<AppState>>,
    Json(window): Json<TimeWindow>,
) -> ViewResult {
    let mut engine = state.session.engine().lock().await;
    tolerate_render(engine.set_window(window))?;
    Ok(Json(engine.view()))
}

pub async fn set_highlight(
    State(state): State<Arc<AppState>>,
    Json(highlight): Json<Highlight>,
) -> ViewResult {
    let mut engine = state.session.engine().lock().await;
    tolerate_render(engine.set_highlight(Some(highlight)))?;
    Ok(Json(engine.view()))
}

pub async fn clear_highlight(State(state): State<Arc<AppState>>) -> ViewResult {
    let mut engine = state.session.engine().lock().await;
    tolerate_render(engine.clear_highlight())?;
    Ok(Json(engine.view()))
}

pub async fn print(State(state): State<Arc<AppState>>) -> ViewResult {
    tolerate_render(state.session.print().await)?;
    Ok(current_view(&state).await)
}

pub async fn get_print_phase(State(state): State<Arc<AppState>>) -> Json<PrintPhase> {
    Json(state.session.printer().phase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_engine::ChartEngine;
    use crate::application::chart_session::ChartSession;
    use crate::application::print_sequencer::{PrintSequencer, PrintTiming};
    use crate::application::series_loader::SeriesLoader;
    use crate::application::testing::{
        measurement, series, test_now, FakeCatalog, FakeStore, FixedClock,
    };
    use crate::domain::projection::ChartOptions;
    use crate::domain::series::MeasurementId;
    use crate::infrastructure::snapshot_surface::{FramePrintTrigger, SnapshotSurface};
    use chrono::Duration;

    async fn state() -> Arc<AppState> {
        let surface = SnapshotSurface::new();
        let surface_state = surface.state();
        let engine = ChartEngine::new(
            Box::new(surface),
            Arc::new(FixedClock(test_now())),
            ChartOptions::default(),
            TimeWindow::AllTime,
        );
        let catalog = FakeCatalog {
            series: Some(vec![series(1, "A", 0.0, 100.0), series(2, "B", -10.0, 10.0)]),
        };
        let store = FakeStore::default()
            .with(1, vec![measurement(7, 1, 20.0, 1), measurement(8, 1, 21.0, 2)])
            .with(2, vec![measurement(9, 2, 1.0, 3)]);
        let printer = PrintSequencer::new(
            Arc::new(FramePrintTrigger::new(
                surface_state.clone(),
                std::env::temp_dir().join(format!("handler-print-{}.json", std::process::id())),
                None,
                Vec::new(),
            )),
            PrintTiming::immediate(),
        );
        let session = ChartSession::new(
            engine,
            SeriesLoader::new(Arc::new(catalog), Arc::new(store)),
            printer,
        );
        session.reload().await.unwrap();

        Arc::new(AppState {
            session: Arc::new(session),
            surface: surface_state,
        })
    }

    #[tokio::test]
    async fn test_toggle_and_highlight_flow() {
        let state = state().await;

        let Json(view) = toggle_series(Path(1), State(state.clone())).await.unwrap();
        assert_eq!(view.chart.datasets.len(), 1);
        assert_eq!(view.rows.len(), 2);

        let Json(view) = set_highlight(
            State(state.clone()),
            Json(Highlight::new(SeriesId(1), MeasurementId(7))),
        )
        .await
        .unwrap();
        assert!(view.rows[0].highlighted);

        let Json(surface) = get_surface(State(state.clone())).await.unwrap();
        assert!(surface.revision > 0);
    }

    #[tokio::test]
    async fn test_unknown_series_is_not_found() {
        let state = state().await;
        let err = toggle_series(Path(99), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_window_is_unprocessable() {
        let state = state().await;
        let start = test_now() - Duration::days(1);

        let err = set_window(State(state.clone()), Json(TimeWindow::Custom { start, end: start }))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message, "End date must be after start date");
        let Json(view) = get_view(State(state)).await;
        assert_eq!(view.window, TimeWindow::AllTime);
    }

    #[tokio::test]
    async fn test_print_returns_restored_view() {
        let state = state().await;
        select_all(State(state.clone())).await.unwrap();
        set_highlight(
            State(state.clone()),
            Json(Highlight::new(SeriesId(1), MeasurementId(8))),
        )
        .await
        .unwrap();

        let Json(view) = print(State(state)).await.unwrap();
        assert_eq!(
            view.highlight,
            Some(Highlight::new(SeriesId(1), MeasurementId(8)))
        );
        let _ = std::fs::remove_file(
            std::env::temp_dir().join(format!("handler-print-{}.json", std::process::id())),
        );
    }
}
