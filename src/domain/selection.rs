// Per-series inclusion state
use super::series::{Measurement, Series, SeriesId};

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSelection {
    pub series: Series,
    pub included: bool,
    /// Ascending by timestamp; arrival order is kept for equal timestamps.
    pub measurements: Vec<Measurement>,
}

impl SeriesSelection {
    /// Starts excluded and sorts the fetched measurements oldest first.
    pub fn new(series: Series, mut measurements: Vec<Measurement>) -> Self {
        measurements.sort_by_key(|m| m.timestamp);
        Self {
            series,
            included: false,
            measurements,
        }
    }

    pub fn id(&self) -> SeriesId {
        self.series.id
    }
}

/// Included series as "<icon> <name>" joined by ", ", or "None".
pub fn selected_series_names(selections: &[SeriesSelection]) -> String {
    let names: Vec<String> = selections
        .iter()
        .filter(|s| s.included)
        .map(|s| s.series.display_label())
        .collect();

    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}

pub fn selected_count(selections: &[SeriesSelection]) -> usize {
    selections.iter().filter(|s| s.included).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::MeasurementId;
    use chrono::{Duration, Utc};

    fn series(id: i64, name: &str, icon: &str) -> Series {
        Series::new(
            SeriesId(id),
            name.to_string(),
            None,
            0.0,
            100.0,
            "#336699".to_string(),
            icon.to_string(),
        )
    }

    #[test]
    fn test_new_sorts_ascending_and_starts_excluded() {
        let now = Utc::now();
        let measurements = vec![
            Measurement::new(MeasurementId(1), SeriesId(1), 1.0, now),
            Measurement::new(MeasurementId(2), SeriesId(1), 2.0, now - Duration::hours(2)),
            Measurement::new(MeasurementId(3), SeriesId(1), 3.0, now - Duration::hours(1)),
        ];

        let selection = SeriesSelection::new(series(1, "Attic", "🏠"), measurements);
        let ids: Vec<i64> = selection.measurements.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(!selection.included);
    }

    #[test]
    fn test_selected_series_names() {
        let mut selections = vec![
            SeriesSelection::new(series(1, "Attic", "🏠"), vec![]),
            SeriesSelection::new(series(2, "Cellar", "🍷"), vec![]),
        ];
        assert_eq!(selected_series_names(&selections), "None");

        selections[0].included = true;
        selections[1].included = true;
        assert_eq!(selected_series_names(&selections), "🏠 Attic, 🍷 Cellar");
        assert_eq!(selected_count(&selections), 2);
    }
}
