// Table and chart projections over the current selection
use super::highlight::{Highlight, HighlightPalette, PointStyle};
use super::selection::SeriesSelection;
use super::series::{Measurement, MeasurementId, SeriesId};
use super::time_window::{TimeWindow, WindowError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("cannot filter measurements: {0}")]
    Window(#[from] WindowError),
    #[error("measurement {measurement_id} of series {series_id} has a non-finite value")]
    NonFiniteValue {
        series_id: SeriesId,
        measurement_id: MeasurementId,
    },
    #[error("render surface failed: {0}")]
    Surface(String),
}

/// A measurement annotated with its series' display attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(flatten)]
    pub measurement: Measurement,
    pub series_name: String,
    pub series_icon: String,
    pub series_color: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Milliseconds since the Unix epoch.
    pub x: i64,
    pub y: f64,
}

/// Per-point styles stored column-wise, indexed like the point array.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointStyles {
    pub point_radius: Vec<f64>,
    pub point_background_color: Vec<String>,
    pub point_border_color: Vec<String>,
    pub point_border_width: Vec<f64>,
}

impl PointStyles {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            point_radius: Vec::with_capacity(capacity),
            point_background_color: Vec::with_capacity(capacity),
            point_border_color: Vec::with_capacity(capacity),
            point_border_width: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, style: PointStyle) {
        self.point_radius.push(style.radius);
        self.point_background_color.push(style.fill_color);
        self.point_border_color.push(style.border_color);
        self.point_border_width.push(style.border_width);
    }

    pub fn len(&self) -> usize {
        self.point_radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point_radius.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PointStyle> {
        Some(PointStyle {
            radius: *self.point_radius.get(index)?,
            fill_color: self.point_background_color.get(index)?.clone(),
            border_color: self.point_border_color.get(index)?.clone(),
            border_width: *self.point_border_width.get(index)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub series_id: SeriesId,
    pub label: String,
    pub data: Vec<ChartPoint>,
    pub border_color: String,
    pub background_color: String,
    pub tension: f64,
    pub point_hover_radius: f64,
    #[serde(flatten)]
    pub styles: PointStyles,
}

/// Axis and legend configuration handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub x_axis_title: String,
    pub y_axis_title: String,
    /// Extra headroom above and below the data, in percent.
    pub y_grace_percent: f64,
    pub legend_position: String,
    pub tooltip_mode: String,
    pub tooltip_intersect: bool,
}

impl ChartOptions {
    pub fn new(x_axis_title: String, y_axis_title: String) -> Self {
        Self {
            x_axis_title,
            y_axis_title,
            y_grace_percent: 5.0,
            legend_position: "top".to_string(),
            tooltip_mode: "index".to_string(),
            tooltip_intersect: false,
        }
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::new("Time".to_string(), "Temperature Value".to_string())
    }
}

/// Everything a rendering surface needs for one redraw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFrame {
    pub datasets: Vec<ChartDataset>,
    pub options: ChartOptions,
}

/// Flattens the included series into rows, newest first.
///
/// Rows with equal timestamps keep selection order, then fetch order.
pub fn table_rows(
    selections: &[SeriesSelection],
    window: &TimeWindow,
    highlight: Option<&Highlight>,
    now: DateTime<Utc>,
) -> Result<Vec<TableRow>, WindowError> {
    let mut rows = Vec::new();

    for selection in selections.iter().filter(|s| s.included) {
        let series = &selection.series;
        for m in window.filter(&selection.measurements, now)? {
            rows.push(TableRow {
                measurement: m.clone(),
                series_name: series.name.clone(),
                series_icon: series.icon.clone(),
                series_color: series.color.clone(),
                highlighted: highlight.is_some_and(|h| h.matches(m)),
            });
        }
    }

    rows.sort_by(|a, b| b.measurement.timestamp.cmp(&a.measurement.timestamp));
    Ok(rows)
}

/// One dataset per included series, in selection order.
pub fn chart_datasets(
    selections: &[SeriesSelection],
    window: &TimeWindow,
    highlight: Option<&Highlight>,
    palette: &HighlightPalette,
    now: DateTime<Utc>,
) -> Result<Vec<ChartDataset>, RenderError> {
    selections
        .iter()
        .filter(|s| s.included)
        .map(|s| {
            let filtered = window.filter(&s.measurements, now)?;
            build_dataset(s, &filtered, highlight, palette)
        })
        .collect()
}

fn build_dataset(
    selection: &SeriesSelection,
    measurements: &[&Measurement],
    highlight: Option<&Highlight>,
    palette: &HighlightPalette,
) -> Result<ChartDataset, RenderError> {
    let series = &selection.series;
    let mut data = Vec::with_capacity(measurements.len());
    let mut styles = PointStyles::with_capacity(measurements.len());

    // Points and all four style columns are filled in the same pass.
    for m in measurements {
        if !m.value.is_finite() {
            return Err(RenderError::NonFiniteValue {
                series_id: series.id,
                measurement_id: m.id,
            });
        }

        let highlighted = highlight.is_some_and(|h| h.matches(m));
        data.push(ChartPoint {
            x: m.timestamp.timestamp_millis(),
            y: m.value,
        });
        styles.push(palette.point_style(highlighted, &series.color));
    }

    Ok(ChartDataset {
        series_id: series.id,
        label: series.display_label(),
        data,
        border_color: series.color.clone(),
        background_color: palette.background_color(&series.color),
        tension: palette.tension,
        point_hover_radius: palette.hover_radius,
        styles,
    })
}
