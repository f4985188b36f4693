// Multi-series time-window chart engine and its HTTP host
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
