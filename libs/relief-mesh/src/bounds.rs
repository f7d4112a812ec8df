//! # Bounding Boxes
//!
//! Axis-aligned bounding boxes used for recentering and sanity checks.

use glam::DVec3;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl Aabb {
    /// Creates a box from two corners.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Smallest box containing every point, or `None` for no points.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glam::DVec3;
    /// use relief_mesh::Aabb;
    ///
    /// let bounds = Aabb::from_points([DVec3::ZERO, DVec3::new(2.0, -1.0, 4.0)]).unwrap();
    /// assert_eq!(bounds.center(), DVec3::new(1.0, -0.5, 2.0));
    /// assert!(Aabb::from_points(std::iter::empty()).is_none());
    /// ```
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in points {
            bounds.include(p);
        }
        Some(bounds)
    }

    /// Grows the box to contain `point`.
    #[inline]
    pub fn include(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths.
    #[inline]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_orders_corners() {
        let bounds = Aabb::new(DVec3::ONE, DVec3::ZERO);
        assert_eq!(bounds.min, DVec3::ZERO);
        assert_eq!(bounds.max, DVec3::ONE);
    }

    #[test]
    fn test_union() {
        let a = Aabb::new(DVec3::ZERO, DVec3::ONE);
        let b = Aabb::new(DVec3::splat(-1.0), DVec3::splat(0.5));
        let u = a.union(&b);
        assert_eq!(u.min, DVec3::splat(-1.0));
        assert_eq!(u.max, DVec3::ONE);
    }

    #[test]
    fn test_include_grows_box() {
        let mut bounds = Aabb::new(DVec3::ZERO, DVec3::splat(0.0143));
        bounds.include(DVec3::new(0.5, 0.0, 0.14));
        assert_eq!(bounds.max, DVec3::new(0.5, 0.0143, 0.14));
        assert_relative_eq!(bounds.size().z, 0.14);
        assert_relative_eq!(bounds.center().x, 0.25);
    }
}
