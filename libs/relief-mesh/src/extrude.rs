//! # Linear Extrusion
//!
//! Extrudes a convex 2D profile along the Z axis into a closed prism.
//! The base plate is built this way from its cross-section.

use crate::error::MeshError;
use crate::mesh::Mesh;
use glam::{DVec2, DVec3};

/// A closed 2D profile for extrusion.
///
/// Vertices run counter-clockwise; the fan-triangulated caps assume the
/// profile is convex.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    /// Boundary vertices in counter-clockwise order
    pub outer: Vec<DVec2>,
}

impl Polygon2D {
    /// Creates a new polygon from boundary vertices.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glam::DVec2;
    /// use relief_mesh::extrude::Polygon2D;
    ///
    /// let square = Polygon2D::new(vec![
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(1.0, 0.0),
    ///     DVec2::new(1.0, 1.0),
    ///     DVec2::new(0.0, 1.0),
    /// ]);
    /// assert!(square.signed_area() > 0.0);
    /// ```
    pub fn new(outer: Vec<DVec2>) -> Self {
        Self { outer }
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.outer.len()
    }

    /// Shoelace area; positive for counter-clockwise vertices.
    pub fn signed_area(&self) -> f64 {
        let n = self.outer.len();
        (0..n)
            .map(|i| self.outer[i].perp_dot(self.outer[(i + 1) % n]))
            .sum::<f64>()
            * 0.5
    }
}

/// Extrudes a 2D polygon from `z = 0` to `z = height`, or centered on
/// `z = 0` when `center` is set.
///
/// Clockwise input is reversed so the result always winds outward.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use relief_mesh::extrude::{linear_extrude, Polygon2D};
///
/// let square = Polygon2D::new(vec![
///     DVec2::new(0.0, 0.0),
///     DVec2::new(10.0, 0.0),
///     DVec2::new(10.0, 10.0),
///     DVec2::new(0.0, 10.0),
/// ]);
/// let mesh = linear_extrude(&square, 20.0, false).unwrap();
/// assert_eq!(mesh.vertex_count(), 8);
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn linear_extrude(polygon: &Polygon2D, height: f64, center: bool) -> Result<Mesh, MeshError> {
    if height.is_nan() || height <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "extrusion height must be positive: {height}"
        )));
    }

    if polygon.vertex_count() < 3 {
        return Err(MeshError::degenerate(
            "Polygon must have at least 3 vertices",
        ));
    }

    let area = polygon.signed_area();
    if area.abs() <= f64::EPSILON {
        return Err(MeshError::degenerate("Polygon has zero area"));
    }
    let outer: Vec<DVec2> = if area > 0.0 {
        polygon.outer.clone()
    } else {
        polygon.outer.iter().rev().copied().collect()
    };

    let z0 = if center { -height / 2.0 } else { 0.0 };
    let z1 = z0 + height;

    let n = outer.len();
    let mut mesh = Mesh::with_capacity(n * 2, n * 2 + (n - 2) * 2);

    for v in &outer {
        mesh.add_vertex(DVec3::new(v.x, v.y, z0));
    }
    for v in &outer {
        mesh.add_vertex(DVec3::new(v.x, v.y, z1));
    }

    // Side faces, two triangles per edge, outward for CCW input
    let top = n as u32;
    for i in 0..n as u32 {
        let j = (i + 1) % n as u32;
        mesh.add_triangle(i, j, top + j);
        mesh.add_triangle(i, top + j, top + i);
    }

    // Bottom cap faces -Z
    for i in 1..n as u32 - 1 {
        mesh.add_triangle(0, i + 1, i);
    }

    // Top cap faces +Z
    for i in 1..n as u32 - 1 {
        mesh.add_triangle(top, top + i, top + i + 1);
    }

    Ok(mesh)
}
