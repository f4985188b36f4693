// Time window selection and filtering
use super::series::Measurement;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

const LABEL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TimeWindow {
    Last24h,
    #[default]
    Last7d,
    Last30d,
    AllTime,
    Custom {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("End date must be after start date")]
    EndNotAfterStart,
    #[error("End date cannot be in the future")]
    EndInFuture,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time window '{0}' (expected 24h, 7d, 30d or all)")]
pub struct UnknownWindow(pub String);

impl FromStr for TimeWindow {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "24h" => Ok(TimeWindow::Last24h),
            "7d" => Ok(TimeWindow::Last7d),
            "30d" => Ok(TimeWindow::Last30d),
            "all" => Ok(TimeWindow::AllTime),
            other => Err(UnknownWindow(other.to_string())),
        }
    }
}

impl TimeWindow {
    /// Rejects custom ranges that are empty, inverted or end after `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), WindowError> {
        match *self {
            TimeWindow::Custom { start, end } => {
                if start >= end {
                    return Err(WindowError::EndNotAfterStart);
                }
                if end > now {
                    return Err(WindowError::EndInFuture);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Inclusive lower and upper bounds relative to `now`.
    pub fn bounds(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match *self {
            TimeWindow::Last24h => (Some(now - Duration::hours(24)), None),
            TimeWindow::Last7d => (Some(now - Duration::days(7)), None),
            TimeWindow::Last30d => (Some(now - Duration::days(30)), None),
            TimeWindow::AllTime => (None, None),
            TimeWindow::Custom { start, end } => (Some(start), Some(end)),
        }
    }

    /// Returns the measurements inside the window, keeping input order.
    ///
    /// Fails without filtering anything when the window itself is invalid, so
    /// callers can keep whatever they displayed before.
    pub fn filter<'a>(
        &self,
        measurements: &'a [Measurement],
        now: DateTime<Utc>,
    ) -> Result<Vec<&'a Measurement>, WindowError> {
        self.validate(now)?;
        let (lower, upper) = self.bounds(now);

        Ok(measurements
            .iter()
            .filter(|m| lower.is_none_or(|l| m.timestamp >= l))
            .filter(|m| upper.is_none_or(|u| m.timestamp <= u))
            .collect())
    }

    pub fn label(&self) -> String {
        match self {
            TimeWindow::Last24h => "Last 24 Hours".to_string(),
            TimeWindow::Last7d => "Last 7 Days".to_string(),
            TimeWindow::Last30d => "Last 30 Days".to_string(),
            TimeWindow::AllTime => "All Time".to_string(),
            TimeWindow::Custom { start, end } => format!(
                "Custom Range: {} to {}",
                start.format(LABEL_TIME_FORMAT),
                end.format(LABEL_TIME_FORMAT)
            ),
        }
    }
}
