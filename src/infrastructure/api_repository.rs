// Tracking API repository implementation
use crate::application::series_repository::{MeasurementStore, SeriesCatalog};
use crate::domain::series::{Measurement, Series, SeriesId};
use crate::infrastructure::dto_mapper::{
    measurement_from_dto, series_from_dto, MeasurementDto, SeriesDto,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct ApiRepository {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiRepository {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn series_url(&self) -> String {
        format!("{}/api/series", self.base_url)
    }

    fn measurements_url(&self, series_id: Option<SeriesId>) -> String {
        match series_id {
            Some(id) => format!("{}/api/measurements/series/{}", self.base_url, id),
            None => format!("{}/api/measurements", self.base_url),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Request to {} failed with status {}: {}", url, status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

#[async_trait]
impl SeriesCatalog for ApiRepository {
    async fn list_series(&self) -> Result<Vec<Series>> {
        let dtos: Vec<SeriesDto> = self.get_json(&self.series_url()).await?;
        Ok(dtos.into_iter().map(series_from_dto).collect())
    }
}

#[async_trait]
impl MeasurementStore for ApiRepository {
    async fn list_measurements(&self, series_id: Option<SeriesId>) -> Result<Vec<Measurement>> {
        let url = self.measurements_url(series_id);
        let dtos: Vec<MeasurementDto> = self.get_json(&url).await?;

        let fetched = dtos.len();
        let measurements: Vec<Measurement> =
            dtos.into_iter().filter_map(measurement_from_dto).collect();

        tracing::debug!(
            "Fetched {} measurements from {} ({} usable)",
            fetched,
            url,
            measurements.len()
        );
        Ok(measurements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let repo = ApiRepository::new("http://localhost:8081/".to_string(), None);

        assert_eq!(repo.series_url(), "http://localhost:8081/api/series");
        assert_eq!(
            repo.measurements_url(Some(SeriesId(4))),
            "http://localhost:8081/api/measurements/series/4"
        );
        assert_eq!(
            repo.measurements_url(None),
            "http://localhost:8081/api/measurements"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_error() {
        let repo = ApiRepository::new("http://127.0.0.1:9".to_string(), None);
        let err = repo.list_series().await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to send request"));
    }
}
