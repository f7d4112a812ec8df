//! # Activity Normalizer
//!
//! Maps raw daily counts to bar heights. Activity data is sparse and heavily
//! skewed, so a plain linear map would let one busy day flatten the rest of
//! the year. Two policies are available:
//!
//! - **Percentile**: the minimum gets 10% of the height range, counts up to
//!   the 99th percentile share the next 80% linearly, and outliers above it
//!   are squeezed into the final 10%.
//! - **Logarithmic**: `ln(c + 1) / ln(max + 1)` scaled to the maximum height,
//!   never lower than one cell edge so every day is at least a cube.

use crate::dataset::ContributionDataset;
use crate::error::ModelError;
use config::constants::{
    ModelConfig, PERCENTILE_BODY_FRACTION, PERCENTILE_FLOOR_FRACTION, PERCENTILE_OUTLIER_FRACTION,
};
use std::fmt;
use std::str::FromStr;

/// Height mapping policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeightPolicy {
    /// Percentile-clamped linear mapping
    #[default]
    Percentile,
    /// Logarithmic mapping with a one-cube floor
    Logarithmic,
}

impl fmt::Display for HeightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightPolicy::Percentile => f.write_str("percentile"),
            HeightPolicy::Logarithmic => f.write_str("logarithmic"),
        }
    }
}

impl FromStr for HeightPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "percentile" | "linear" => Ok(HeightPolicy::Percentile),
            "logarithmic" | "log" => Ok(HeightPolicy::Logarithmic),
            other => Err(format!("unknown height policy: {other}")),
        }
    }
}

/// A validated `count -> height` map for one dataset.
///
/// Output is non-decreasing in `count` and always within
/// `[floor(), ceiling()]`.
///
/// # Example
///
/// ```rust
/// use config::constants::ModelConfig;
/// use relief_model::{ContributionDataset, ContributionWeek, HeightPolicy, Normalizer};
///
/// let dataset = ContributionDataset {
///     username: "octocat".into(),
///     weeks: vec![ContributionWeek::from_counts(&[0, 5, 10])],
///     min: 0,
///     max: 10,
///     p99: Some(8.0),
///     ..Default::default()
/// };
/// let config = ModelConfig::default();
/// let normalizer = Normalizer::new(HeightPolicy::Percentile, &dataset, &config).unwrap();
/// let h = config.max_height;
/// assert!((normalizer.height(5).unwrap() - 0.6 * h).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    policy: HeightPolicy,
    min: i64,
    max: i64,
    p99: f64,
    max_height: f64,
    cube_floor: f64,
}

impl Normalizer {
    /// Builds the height map from dataset statistics.
    ///
    /// Fails with [`ModelError::DataInvariantViolation`] when `max < min`,
    /// `min` is negative, or the outlier threshold lies outside `[min, max]`.
    pub fn new(
        policy: HeightPolicy,
        dataset: &ContributionDataset,
        config: &ModelConfig,
    ) -> Result<Self, ModelError> {
        Self::from_stats(
            policy,
            dataset.min,
            dataset.max,
            dataset.outlier_threshold(),
            config,
        )
    }

    /// Builds the height map from bare statistics.
    pub fn from_stats(
        policy: HeightPolicy,
        min: i64,
        max: i64,
        p99: f64,
        config: &ModelConfig,
    ) -> Result<Self, ModelError> {
        if max < min {
            return Err(ModelError::invariant(format!(
                "min {min} exceeds max {max}"
            )));
        }
        if min < 0 {
            return Err(ModelError::invariant(format!("min {min} is negative")));
        }
        if !p99.is_finite() || p99 < min as f64 || p99 > max as f64 {
            return Err(ModelError::invariant(format!(
                "p99 {p99} outside [{min}, {max}]"
            )));
        }
        Ok(Self {
            policy,
            min,
            max,
            p99,
            max_height: config.max_height,
            cube_floor: config.cell_size,
        })
    }

    /// Policy in use.
    pub fn policy(&self) -> HeightPolicy {
        self.policy
    }

    /// Lowest height this map produces.
    pub fn floor(&self) -> f64 {
        match self.policy {
            HeightPolicy::Percentile => PERCENTILE_FLOOR_FRACTION * self.max_height,
            HeightPolicy::Logarithmic => self.cube_floor,
        }
    }

    /// Highest height this map produces.
    pub fn ceiling(&self) -> f64 {
        self.max_height
    }

    /// Height for one day's count.
    ///
    /// Fails with [`ModelError::DataInvariantViolation`] for counts that are
    /// negative or outside the dataset's `[min, max]`.
    pub fn height(&self, count: i64) -> Result<f64, ModelError> {
        if count < 0 {
            return Err(ModelError::invariant(format!("negative count {count}")));
        }
        if count < self.min || count > self.max {
            return Err(ModelError::invariant(format!(
                "count {count} outside [{}, {}]",
                self.min, self.max
            )));
        }
        let height = match self.policy {
            HeightPolicy::Percentile => self.percentile_height(count),
            HeightPolicy::Logarithmic => self.logarithmic_height(count),
        };
        Ok(height.clamp(self.floor(), self.ceiling()))
    }

    fn percentile_height(&self, count: i64) -> f64 {
        let h = self.max_height;
        let c = count as f64;
        if count == self.min {
            PERCENTILE_FLOOR_FRACTION * h
        } else if c <= self.p99 {
            // count > min >= 0, so p99 > 0 here
            PERCENTILE_FLOOR_FRACTION * h + (PERCENTILE_BODY_FRACTION * h / self.p99) * c
        } else {
            // count > p99 >= 0, so max > 0 here
            (PERCENTILE_FLOOR_FRACTION + PERCENTILE_BODY_FRACTION) * h
                + (PERCENTILE_OUTLIER_FRACTION * h / self.max as f64) * c
        }
    }

    fn logarithmic_height(&self, count: i64) -> f64 {
        if count <= 0 || self.max <= 0 {
            return self.cube_floor;
        }
        let scaled = (count as f64).ln_1p() / (self.max as f64).ln_1p() * self.max_height;
        scaled.max(self.cube_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn config() -> ModelConfig {
        ModelConfig::default()
    }

    fn percentile(min: i64, max: i64, p99: f64) -> Normalizer {
        Normalizer::from_stats(HeightPolicy::Percentile, min, max, p99, &config()).unwrap()
    }

    fn logarithmic(max: i64) -> Normalizer {
        Normalizer::from_stats(HeightPolicy::Logarithmic, 0, max, max as f64, &config()).unwrap()
    }

    #[test]
    fn test_percentile_scenario() {
        let h = config().max_height;
        let n = percentile(0, 10, 8.0);
        assert_relative_eq!(n.height(0).unwrap(), 0.1 * h, epsilon = 1e-12);
        assert_relative_eq!(n.height(5).unwrap(), 0.6 * h, epsilon = 1e-12);
        assert_relative_eq!(n.height(10).unwrap(), 1.0 * h, epsilon = 1e-12);
    }

    #[test]
    fn test_percentile_minimum_is_exact_floor() {
        let h = config().max_height;
        for (min, max, p99) in [(0, 10, 8.0), (3, 50, 40.0), (7, 7, 7.0)] {
            assert_relative_eq!(percentile(min, max, p99).height(min).unwrap(), 0.1 * h);
        }
    }

    #[test]
    fn test_percentile_outliers_compressed() {
        let h = config().max_height;
        let n = percentile(0, 1000, 20.0);
        let outlier = n.height(1000).unwrap();
        let p99 = n.height(20).unwrap();
        assert_relative_eq!(p99, 0.9 * h, epsilon = 1e-12);
        assert!(outlier - p99 <= 0.1 * h + 1e-12);
    }

    #[test]
    fn test_percentile_zero_p99() {
        // Mostly idle year: p99 is zero, every active day is an outlier.
        let h = config().max_height;
        let n = percentile(0, 4, 0.0);
        assert_relative_eq!(n.height(0).unwrap(), 0.1 * h);
        assert_relative_eq!(n.height(4).unwrap(), h, epsilon = 1e-12);
    }

    #[test]
    fn test_logarithmic_zero_is_floor() {
        let n = logarithmic(25);
        assert_eq!(n.height(0).unwrap(), config().cell_size);
        assert_relative_eq!(n.height(25).unwrap(), config().max_height, epsilon = 1e-12);
    }

    #[test]
    fn test_logarithmic_all_zero_dataset() {
        let n = logarithmic(0);
        assert_eq!(n.height(0).unwrap(), config().cell_size);
    }

    #[test]
    fn test_logarithmic_small_counts_hit_floor() {
        // ln(2)/ln(10001) * 0.14 is below one cube edge
        let n = logarithmic(10_000);
        assert_eq!(n.height(1).unwrap(), config().cell_size);
    }

    #[test]
    fn test_rejects_inverted_stats() {
        let err = Normalizer::from_stats(HeightPolicy::Percentile, 5, 3, 4.0, &config()).unwrap_err();
        assert!(matches!(err, ModelError::DataInvariantViolation { .. }));
    }

    #[test]
    fn test_rejects_bad_counts() {
        let n = percentile(0, 10, 8.0);
        assert!(n.height(-1).is_err());
        assert!(n.height(11).is_err());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("log".parse::<HeightPolicy>(), Ok(HeightPolicy::Logarithmic));
        assert_eq!("Percentile".parse::<HeightPolicy>(), Ok(HeightPolicy::Percentile));
        assert!("cubic".parse::<HeightPolicy>().is_err());
        assert_eq!(HeightPolicy::Logarithmic.to_string(), "logarithmic");
    }

    proptest! {
        #[test]
        fn prop_monotone_and_bounded(
            counts in prop::collection::vec(0i64..5_000, 1..400),
            log_policy in any::<bool>(),
        ) {
            let min = *counts.iter().min().unwrap();
            let max = *counts.iter().max().unwrap();
            let p99 = crate::dataset::nearest_rank_percentile(counts.iter().copied(), 99.0).unwrap() as f64;
            let policy = if log_policy { HeightPolicy::Logarithmic } else { HeightPolicy::Percentile };
            let n = Normalizer::from_stats(policy, min, max, p99, &config()).unwrap();

            let mut sorted = counts.clone();
            sorted.sort_unstable();
            let mut previous = f64::MIN;
            for c in sorted {
                let h = n.height(c).unwrap();
                prop_assert!(h >= previous);
                prop_assert!(h >= n.floor() && h <= n.ceiling());
                previous = h;
            }
        }
    }
}
