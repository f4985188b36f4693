// Highlighted measurement and per-point styling
use super::series::{Measurement, MeasurementId, SeriesId};
use serde::{Deserialize, Serialize};

/// Identifies at most one measurement across all series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub series_id: SeriesId,
    pub measurement_id: MeasurementId,
}

impl Highlight {
    pub fn new(series_id: SeriesId, measurement_id: MeasurementId) -> Self {
        Self {
            series_id,
            measurement_id,
        }
    }

    pub fn matches(&self, measurement: &Measurement) -> bool {
        self.series_id == measurement.series_id && self.measurement_id == measurement.id
    }
}

/// Style of a single chart point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointStyle {
    pub radius: f64,
    pub fill_color: String,
    pub border_color: String,
    pub border_width: f64,
}

/// Fixed styling constants shared by every dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightPalette {
    pub highlighted_radius: f64,
    pub normal_radius: f64,
    pub highlighted_fill: String,
    pub highlighted_border: String,
    pub highlighted_border_width: f64,
    pub normal_border_width: f64,
    /// Hex alpha appended to the series color for the area fill only.
    pub background_alpha: String,
    pub hover_radius: f64,
    pub tension: f64,
}

impl Default for HighlightPalette {
    fn default() -> Self {
        Self {
            highlighted_radius: 10.0,
            normal_radius: 4.0,
            highlighted_fill: "#FFD700".to_string(),
            highlighted_border: "#FF6B00".to_string(),
            highlighted_border_width: 3.0,
            normal_border_width: 1.0,
            background_alpha: "33".to_string(),
            hover_radius: 6.0,
            tension: 0.1,
        }
    }
}

impl HighlightPalette {
    pub fn point_style(&self, highlighted: bool, series_color: &str) -> PointStyle {
        if highlighted {
            PointStyle {
                radius: self.highlighted_radius,
                fill_color: self.highlighted_fill.clone(),
                border_color: self.highlighted_border.clone(),
                border_width: self.highlighted_border_width,
            }
        } else {
            PointStyle {
                radius: self.normal_radius,
                fill_color: series_color.to_string(),
                border_color: series_color.to_string(),
                border_width: self.normal_border_width,
            }
        }
    }

    pub fn background_color(&self, series_color: &str) -> String {
        format!("{}{}", series_color, self.background_alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_highlight_requires_both_ids() {
        let highlight = Highlight::new(SeriesId(1), MeasurementId(7));
        let same = Measurement::new(MeasurementId(7), SeriesId(1), 20.0, Utc::now());
        let other_series = Measurement::new(MeasurementId(7), SeriesId(2), 20.0, Utc::now());

        assert!(highlight.matches(&same));
        assert!(!highlight.matches(&other_series));
    }

    #[test]
    fn test_point_styles() {
        let palette = HighlightPalette::default();

        let normal = palette.point_style(false, "#123456");
        assert_eq!(normal.radius, 4.0);
        assert_eq!(normal.fill_color, "#123456");
        assert_eq!(normal.border_width, 1.0);

        let highlighted = palette.point_style(true, "#123456");
        assert_eq!(highlighted.radius, 10.0);
        assert_eq!(highlighted.fill_color, "#FFD700");
        assert_eq!(highlighted.border_color, "#FF6B00");
        assert_eq!(highlighted.border_width, 3.0);
    }

    #[test]
    fn test_background_alpha_applies_to_fill_only() {
        let palette = HighlightPalette::default();
        assert_eq!(palette.background_color("#FF0000"), "#FF000033");
    }
}
