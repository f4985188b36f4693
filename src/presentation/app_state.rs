// Application state for HTTP handlers
use crate::application::chart_session::ChartSession;
use crate::infrastructure::snapshot_surface::SharedSurfaceState;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ChartSession>,
    pub surface: SharedSurfaceState,
}
