// Repository traits for series and measurement access
use crate::domain::series::{Measurement, Series, SeriesId};
use async_trait::async_trait;

#[async_trait]
pub trait SeriesCatalog: Send + Sync {
    /// List every defined series
    async fn list_series(&self) -> anyhow::Result<Vec<Series>>;
}

#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Measurements of one series, or of every series when `series_id` is `None`
    async fn list_measurements(
        &self,
        series_id: Option<SeriesId>,
    ) -> anyhow::Result<Vec<Measurement>>;
}
