// Domain layer - Pure data types and projections
pub mod highlight;
pub mod projection;
pub mod selection;
pub mod series;
pub mod time_window;
