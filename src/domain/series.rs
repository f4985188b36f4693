// Series and measurement domain models
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(pub i64);

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique only within its owning series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementId(pub i64);

impl fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, bounded numeric channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: SeriesId,
    pub name: String,
    pub description: Option<String>,
    pub min_value: f64,
    pub max_value: f64,
    pub color: String,
    pub icon: String,
}

impl Series {
    pub fn new(
        id: SeriesId,
        name: String,
        description: Option<String>,
        min_value: f64,
        max_value: f64,
        color: String,
        icon: String,
    ) -> Self {
        Self {
            id,
            name,
            description,
            min_value,
            max_value,
            color,
            icon,
        }
    }

    /// Legend and summary label, e.g. "🌡️ Living Room".
    pub fn display_label(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: MeasurementId,
    pub series_id: SeriesId,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl Measurement {
    pub fn new(id: MeasurementId, series_id: SeriesId, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            series_id,
            value,
            timestamp,
        }
    }
}
