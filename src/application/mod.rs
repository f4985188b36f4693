// Application layer - Use cases and collaborator ports
pub mod chart_engine;
pub mod chart_session;
pub mod engine_error;
pub mod print_sequencer;
pub mod render_surface;
pub mod series_loader;
pub mod series_repository;

#[cfg(test)]
pub mod testing;
