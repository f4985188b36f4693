// Series loader - Fetches the catalog and every series' measurements
use crate::application::series_repository::{MeasurementStore, SeriesCatalog};
use crate::domain::selection::SeriesSelection;
use crate::domain::series::Series;
use anyhow::Context;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct SeriesLoader {
    catalog: Arc<dyn SeriesCatalog>,
    store: Arc<dyn MeasurementStore>,
}

impl SeriesLoader {
    pub fn new(catalog: Arc<dyn SeriesCatalog>, store: Arc<dyn MeasurementStore>) -> Self {
        Self { catalog, store }
    }

    /// Builds one excluded selection per catalog entry, in catalog order.
    ///
    /// Only a catalog failure fails the load. Measurement fetches run
    /// concurrently and a failed one leaves its series without data.
    pub async fn load(&self) -> anyhow::Result<Vec<SeriesSelection>> {
        let start_time = Instant::now();

        let catalog = self
            .catalog
            .list_series()
            .await
            .context("Failed to fetch series catalog")?;

        tracing::debug!("Catalog returned {} series", catalog.len());

        let selections = join_all(catalog.into_iter().map(|s| self.load_series(s))).await;

        tracing::info!(
            "Loaded {} series in {} ms",
            selections.len(),
            start_time.elapsed().as_millis()
        );

        Ok(selections)
    }

    async fn load_series(&self, series: Series) -> SeriesSelection {
        match self.store.list_measurements(Some(series.id)).await {
            Ok(measurements) => {
                let fetched = measurements.len();
                let resolved: Vec<_> = measurements
                    .into_iter()
                    .filter(|m| m.series_id == series.id)
                    .collect();

                if resolved.len() < fetched {
                    tracing::warn!(
                        "Dropped {} measurements with unresolved series for series {}",
                        fetched - resolved.len(),
                        series.id
                    );
                }

                tracing::debug!("Series {} has {} measurements", series.id, resolved.len());
                SeriesSelection::new(series, resolved)
            }
            Err(e) => {
                tracing::warn!(
                    "Error fetching measurements for series {} ({}): {:#}",
                    series.id,
                    series.name,
                    e
                );
                SeriesSelection::new(series, Vec::new())
            }
        }
    }
}
