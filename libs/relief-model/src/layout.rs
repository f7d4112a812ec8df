//! # Grid Layout Engine
//!
//! Places one bar per day on the week/day grid. Columns are weeks, left to
//! right; rows are days within a week, top to bottom. Short boundary weeks
//! keep their own row numbering and empty weeks still take a column, so the
//! timeline never shifts.
//!
//! ```text
//!  y
//!  ▲  row 0 ■ ■ ■ ■ ...
//!  │  row 1 ■ ■ ■ ■
//!  │   ...
//!  │  row 6 ■ ■ ■
//!  └──────────────────▶ x   (column = week index)
//! ```

use crate::dataset::ContributionWeek;
use crate::error::ModelError;
use crate::normalizer::Normalizer;
use config::constants::{ModelConfig, DAYS_PER_WEEK};
use glam::{DMat4, DVec3};
use relief_mesh::primitives::create_cube;
use relief_mesh::{SceneGroup, SceneNode};
use tracing::debug;

/// One positioned bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    /// Week index, 0-based
    pub column: usize,
    /// Day index within its week, 0-based
    pub row: usize,
    /// Raw count for the day
    pub count: i64,
    /// Bar height from the normalizer
    pub height: f64,
    /// Edge length of the square footprint
    pub footprint: f64,
    /// Center of the bar volume in layout coordinates
    pub center: DVec3,
}

impl GridCell {
    /// Box dimensions of this bar.
    pub fn size(&self) -> DVec3 {
        DVec3::new(self.footprint, self.footprint, self.height)
    }
}

/// Lays out every day of `weeks` in chronological column-major order.
///
/// Each bar's bottom rests on the base plate's top surface.
///
/// # Errors
///
/// Propagates [`ModelError::DataInvariantViolation`] from the normalizer, and
/// rejects weeks holding more than seven days.
pub fn layout_grid(
    weeks: &[ContributionWeek],
    normalizer: &Normalizer,
    config: &ModelConfig,
) -> Result<Vec<GridCell>, ModelError> {
    let pitch = config.cell_size;
    let base_top = config.base_top();
    let capacity = weeks.iter().map(|week| week.days.len()).sum();
    let mut cells = Vec::with_capacity(capacity);

    for (column, week) in weeks.iter().enumerate() {
        if week.days.len() > DAYS_PER_WEEK {
            return Err(ModelError::invariant(format!(
                "week {column} has {} days",
                week.days.len()
            )));
        }
        let x = column as f64 * pitch;
        for (row, day) in week.days.iter().enumerate() {
            let height = normalizer.height(day.count)?;
            let y = DAYS_PER_WEEK as f64 * pitch - (row + 1) as f64 * pitch;
            cells.push(GridCell {
                column,
                row,
                count: day.count,
                height,
                footprint: pitch,
                center: DVec3::new(x, y, base_top + height / 2.0),
            });
        }
    }

    debug!(weeks = weeks.len(), cells = cells.len(), "grid laid out");
    Ok(cells)
}

/// Builds the bar group: one box mesh per cell, positioned by its node
/// transform.
pub fn build_bars(cells: &[GridCell]) -> Result<SceneGroup, ModelError> {
    let mut bars = SceneGroup::with_capacity("bars", cells.len());
    for cell in cells {
        let mesh = create_cube(cell.size(), true)?;
        let name = format!("day-{}-{}", cell.column, cell.row);
        bars.add(SceneNode::mesh(name, mesh).with_transform(DMat4::from_translation(cell.center)));
    }
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::HeightPolicy;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use relief_mesh::TriangleSource;
    use std::collections::HashSet;

    fn normalizer(max: i64) -> Normalizer {
        Normalizer::from_stats(
            HeightPolicy::Percentile,
            0,
            max,
            max as f64,
            &ModelConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_cell_positions() {
        let config = ModelConfig::default();
        let weeks = vec![
            ContributionWeek::from_counts(&[1, 2]),
            ContributionWeek::from_counts(&[3]),
        ];
        let cells = layout_grid(&weeks, &normalizer(3), &config).unwrap();
        let pitch = config.cell_size;

        assert_eq!(cells.len(), 3);
        assert_eq!((cells[0].column, cells[0].row), (0, 0));
        assert_eq!((cells[1].column, cells[1].row), (0, 1));
        assert_eq!((cells[2].column, cells[2].row), (1, 0));

        assert_relative_eq!(cells[0].center.y, 6.0 * pitch, epsilon = 1e-12);
        assert_relative_eq!(cells[1].center.y, 5.0 * pitch, epsilon = 1e-12);
        assert_relative_eq!(cells[2].center.x, pitch, epsilon = 1e-12);
    }

    #[test]
    fn test_bars_rest_on_base_top() {
        let config = ModelConfig::default();
        let weeks = vec![ContributionWeek::from_counts(&[0, 4, 9])];
        let cells = layout_grid(&weeks, &normalizer(9), &config).unwrap();
        for cell in &cells {
            assert_relative_eq!(cell.center.z - cell.height / 2.0, config.base_top(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_week_advances_column() {
        let config = ModelConfig::default();
        let weeks = vec![
            ContributionWeek::from_counts(&[1]),
            ContributionWeek::default(),
            ContributionWeek::from_counts(&[1]),
        ];
        let cells = layout_grid(&weeks, &normalizer(1), &config).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].column, 2);
    }

    #[test]
    fn test_no_weeks_no_cells() {
        let cells = layout_grid(&[], &normalizer(0), &ModelConfig::default()).unwrap();
        assert!(cells.is_empty());
        assert!(build_bars(&cells).unwrap().is_empty());
    }

    #[test]
    fn test_overfull_week_rejected() {
        let weeks = vec![ContributionWeek::from_counts(&[0; 8])];
        let err = layout_grid(&weeks, &normalizer(0), &ModelConfig::default()).unwrap_err();
        assert!(matches!(err, ModelError::DataInvariantViolation { .. }));
    }

    #[test]
    fn test_count_outside_range_rejected() {
        let weeks = vec![ContributionWeek::from_counts(&[5])];
        assert!(layout_grid(&weeks, &normalizer(3), &ModelConfig::default()).is_err());
    }

    #[test]
    fn test_build_bars_places_boxes() {
        let config = ModelConfig::default();
        let weeks = vec![ContributionWeek::from_counts(&[2, 0])];
        let cells = layout_grid(&weeks, &normalizer(2), &config).unwrap();
        let bars = build_bars(&cells).unwrap();

        assert_eq!(bars.children().len(), 2);
        assert_eq!(bars.triangle_count(), 24);
        let bounds = bars.world_bounds().unwrap();
        assert_relative_eq!(bounds.min.z, config.base_top(), epsilon = 1e-12);
        // p99 == max, so the busiest day tops out at 90% of the range
        assert_relative_eq!(bounds.max.z, config.base_top() + 0.9 * config.max_height, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_one_cell_per_day(
            weeks in prop::collection::vec(prop::collection::vec(0i64..50, 0..=7), 0..60),
        ) {
            let weeks: Vec<ContributionWeek> =
                weeks.iter().map(|days| ContributionWeek::from_counts(days)).collect();
            let expected: usize = weeks.iter().map(|w| w.days.len()).sum();
            let cells = layout_grid(&weeks, &normalizer(49), &ModelConfig::default()).unwrap();

            prop_assert_eq!(cells.len(), expected);
            let unique: HashSet<(usize, usize)> = cells.iter().map(|c| (c.column, c.row)).collect();
            prop_assert_eq!(unique.len(), cells.len());
            prop_assert!(cells.windows(2).all(|pair| pair[0].column <= pair[1].column));
        }
    }
}
