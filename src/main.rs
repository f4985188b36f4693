// Main entry point - Dependency injection and server setup
use axum::{
    routing::{get, post, put},
    Router,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use series_tracker::application::chart_engine::ChartEngine;
use series_tracker::application::chart_session::ChartSession;
use series_tracker::application::print_sequencer::PrintSequencer;
use series_tracker::application::render_surface::SystemClock;
use series_tracker::application::series_loader::SeriesLoader;
use series_tracker::infrastructure::api_repository::ApiRepository;
use series_tracker::infrastructure::config::load_tracker_config;
use series_tracker::infrastructure::snapshot_surface::{FramePrintTrigger, SnapshotSurface};
use series_tracker::presentation::app_state::AppState;
use series_tracker::presentation::handlers::{
    clear_highlight, deselect_all, get_chart, get_print_phase, get_surface, get_table, get_view,
    health_check, print, reload, select_all, set_highlight, set_window, toggle_series,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = load_tracker_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(ApiRepository::new(
        config.api.base_url.clone(),
        config.api.token.clone(),
    ));

    // Rendering surface and print trigger share the displayed frame
    let surface = SnapshotSurface::new();
    let surface_state = surface.state();
    let trigger = FramePrintTrigger::new(
        surface_state.clone(),
        PathBuf::from(&config.print.output_path),
        config.print.command.clone(),
        config.print.args.clone(),
    );

    // Create engine and session (application layer)
    let engine = ChartEngine::new(
        Box::new(surface),
        Arc::new(SystemClock),
        config.chart.options(),
        config.chart.window()?,
    );
    let loader = SeriesLoader::new(repository.clone(), repository);
    let printer = PrintSequencer::new(Arc::new(trigger), config.print.timing());
    let session = Arc::new(ChartSession::new(engine, loader, printer));

    // Initial load; failures are reported through the view status
    if let Err(e) = session.reload().await {
        tracing::error!("Initial load failed: {:#}", e);
    }

    let state = Arc::new(AppState {
        session: session.clone(),
        surface: surface_state,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/view", get(get_view))
        .route("/view/table", get(get_table))
        .route("/view/chart", get(get_chart))
        .route("/view/surface", get(get_surface))
        .route("/reload", post(reload))
        .route("/series/select-all", post(select_all))
        .route("/series/deselect-all", post(deselect_all))
        .route("/series/:id/toggle", post(toggle_series))
        .route("/window", put(set_window))
        .route("/highlight", put(set_highlight).delete(clear_highlight))
        .route("/print", post(print))
        .route("/print/phase", get(get_print_phase))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting series-tracker service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The host owns teardown of the render surface
    session.destroy().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
