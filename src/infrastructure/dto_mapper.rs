// Mapper from tracking API payloads to domain models
use crate::domain::series::{Measurement, MeasurementId, Series, SeriesId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub min_value: f64,
    pub max_value: f64,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementDto {
    pub id: i64,
    /// Null when the owning series no longer exists
    pub series_id: Option<i64>,
    pub value: f64,
    pub timestamp: String,
}

pub fn series_from_dto(dto: SeriesDto) -> Series {
    Series::new(
        SeriesId(dto.id),
        dto.name,
        dto.description,
        dto.min_value,
        dto.max_value,
        dto.color,
        dto.icon,
    )
}

/// Drops rows without a series or with an unreadable timestamp.
pub fn measurement_from_dto(dto: MeasurementDto) -> Option<Measurement> {
    let Some(series_id) = dto.series_id else {
        tracing::warn!("Skipping measurement {} without a series", dto.id);
        return None;
    };

    let Some(timestamp) = parse_timestamp(&dto.timestamp) else {
        tracing::warn!(
            "Skipping measurement {} with unparseable timestamp '{}'",
            dto.id,
            dto.timestamp
        );
        return None;
    };

    Some(Measurement::new(
        MeasurementId(dto.id),
        SeriesId(series_id),
        dto.value,
        timestamp,
    ))
}

/// Accepts RFC 3339 and offset-less ISO-8601; the latter is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
