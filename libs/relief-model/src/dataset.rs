//! # Contribution Dataset
//!
//! One year of daily activity counts, grouped into calendar weeks, as
//! delivered by the contribution API:
//!
//! ```json
//! {
//!   "contributions": [ { "days": [ { "count": 3, "date": "2020-01-05" } ] } ],
//!   "min": 0, "max": 42, "p99": 30, "total": 1200
//! }
//! ```
//!
//! Identity and year come from the request rather than the payload and are
//! attached with [`ContributionDataset::with_identity`].

use crate::error::ModelError;
use chrono::NaiveDate;
use config::constants::{DAYS_PER_WEEK, OUTLIER_PERCENTILE};
use serde::{Deserialize, Serialize};

/// One calendar day's activity count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionDay {
    /// Activity count; negative values fail validation
    pub count: i64,
    /// Calendar date, when the source provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl ContributionDay {
    /// Creates a day without a date.
    pub fn new(count: i64) -> Self {
        Self { count, date: None }
    }
}

/// One calendar week; boundary weeks may hold fewer than seven days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionWeek {
    /// Days in order, first day of the week first
    pub days: Vec<ContributionDay>,
}

impl ContributionWeek {
    /// Creates a week from bare counts.
    pub fn from_counts(counts: &[i64]) -> Self {
        Self {
            days: counts.iter().copied().map(ContributionDay::new).collect(),
        }
    }
}

/// A year of contributions plus the statistics the height policies need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionDataset {
    /// Identity the data belongs to
    #[serde(default)]
    pub username: String,
    /// Calendar year
    #[serde(default)]
    pub year: i32,
    /// Weeks in chronological order
    #[serde(rename = "contributions", alias = "weeks", default)]
    pub weeks: Vec<ContributionWeek>,
    /// Smallest daily count
    pub min: i64,
    /// Largest daily count
    pub max: i64,
    /// 99th percentile of daily counts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p99: Option<f64>,
    /// Total count for the year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl ContributionDataset {
    /// Parses the upstream JSON payload.
    ///
    /// # Example
    ///
    /// ```rust
    /// use relief_model::ContributionDataset;
    ///
    /// let json = r#"{"contributions":[{"days":[{"count":0},{"count":5}]}],"min":0,"max":5}"#;
    /// let dataset = ContributionDataset::from_json(json).unwrap();
    /// assert_eq!(dataset.day_count(), 2);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json)
            .map_err(|err| ModelError::invariant(format!("malformed dataset JSON: {err}")))
    }

    /// Attaches the requested identity and year.
    pub fn with_identity(mut self, username: impl Into<String>, year: i32) -> Self {
        self.username = username.into();
        self.year = year;
        self
    }

    /// Iterates over every day in chronological order.
    pub fn days(&self) -> impl Iterator<Item = &ContributionDay> {
        self.weeks.iter().flat_map(|week| week.days.iter())
    }

    /// Number of days across all weeks.
    pub fn day_count(&self) -> usize {
        self.weeks.iter().map(|week| week.days.len()).sum()
    }

    /// Sum of all daily counts.
    pub fn summed_total(&self) -> i64 {
        self.days().map(|day| day.count).sum()
    }

    /// Checks every invariant the pipeline relies on.
    ///
    /// - identity is non-empty
    /// - `min <= max`
    /// - no week has more than seven days
    /// - every count is non-negative and within `[min, max]`
    /// - `p99`, when present, is finite and within `[min, max]`
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.username.trim().is_empty() {
            return Err(ModelError::invariant("identity must not be empty"));
        }
        if self.min > self.max {
            return Err(ModelError::invariant(format!(
                "min {} exceeds max {}",
                self.min, self.max
            )));
        }
        if self.min < 0 {
            return Err(ModelError::invariant(format!(
                "min {} is negative",
                self.min
            )));
        }
        if let Some(p99) = self.p99 {
            if !p99.is_finite() || p99 < self.min as f64 || p99 > self.max as f64 {
                return Err(ModelError::invariant(format!(
                    "p99 {p99} outside [{}, {}]",
                    self.min, self.max
                )));
            }
        }
        for (column, week) in self.weeks.iter().enumerate() {
            if week.days.len() > DAYS_PER_WEEK {
                return Err(ModelError::invariant(format!(
                    "week {column} has {} days",
                    week.days.len()
                )));
            }
            for (row, day) in week.days.iter().enumerate() {
                if day.count < 0 {
                    return Err(ModelError::invariant(format!(
                        "negative count {} in week {column}, day {row}",
                        day.count
                    )));
                }
                if day.count < self.min || day.count > self.max {
                    return Err(ModelError::invariant(format!(
                        "count {} in week {column}, day {row} outside [{}, {}]",
                        day.count, self.min, self.max
                    )));
                }
            }
        }
        Ok(())
    }

    /// The dataset's 99th percentile, or one derived from the day counts by
    /// nearest rank when the payload did not include it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use relief_model::{ContributionDataset, ContributionWeek};
    ///
    /// let dataset = ContributionDataset {
    ///     weeks: vec![ContributionWeek::from_counts(&[1, 2, 3, 4])],
    ///     min: 1,
    ///     max: 4,
    ///     ..Default::default()
    /// };
    /// assert_eq!(dataset.outlier_threshold(), 4.0);
    /// ```
    pub fn outlier_threshold(&self) -> f64 {
        match self.p99 {
            Some(p99) => p99,
            None => nearest_rank_percentile(self.days().map(|day| day.count), OUTLIER_PERCENTILE)
                .map(|value| value as f64)
                .unwrap_or(self.max as f64),
        }
    }
}

/// Nearest-rank percentile of `values`, or `None` when empty.
pub fn nearest_rank_percentile(values: impl Iterator<Item = i64>, percentile: f64) -> Option<i64> {
    let mut sorted: Vec<i64> = values.collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_unstable();
    let rank = ((percentile / 100.0) * sorted.len() as f64).ceil() as usize;
    Some(sorted[rank.clamp(1, sorted.len()) - 1])
}
