//! # Meshes
//!
//! Shared-vertex triangle soup carried through the scene graph, and the
//! world-space [`Triangle`] the exporters consume.

use crate::bounds::Aabb;
use config::constants::DEGENERATE_AREA_EPSILON;
use glam::{DMat4, DVec3};

/// Positions plus index triples, optionally with one normal per position.
///
/// Coordinates stay in f64 until a binary STL record is written.
///
/// ```rust
/// use relief_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut facet = Mesh::new();
/// let a = facet.add_vertex(DVec3::ZERO);
/// let b = facet.add_vertex(DVec3::X);
/// let c = facet.add_vertex(DVec3::Y);
/// facet.add_triangle(a, b, c);
/// assert_eq!(facet.triangle_count(), 1);
/// assert!(facet.validate());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<DVec3>,
    /// Counter-clockwise seen from outside.
    triangles: Vec<[u32; 3]>,
    normals: Option<Vec<DVec3>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mesh with room reserved for the given counts.
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
            normals: None,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// A mesh without triangles contributes nothing to an export.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Appends a position, returning the index triangles refer to it by.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        self.vertices.push(position);
        (self.vertices.len() - 1) as u32
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.push([a, b, c]);
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Resolves the index triple at `index` into positions.
    pub fn triangle_at(&self, index: usize) -> Triangle {
        let [a, b, c] = self.triangles[index].map(|i| self.vertices[i as usize]);
        Triangle::new(a, b, c)
    }

    pub fn iter_triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.triangles.len()).map(move |index| self.triangle_at(index))
    }

    /// Attaches per-vertex normals; the count must match the vertex count
    /// for [`Mesh::validate`] to pass.
    pub fn set_normals(&mut self, normals: Vec<DVec3>) {
        self.normals = Some(normals);
    }

    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// `None` when the mesh has no positions.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().copied())
    }

    /// Bakes `matrix` into positions and normals.
    ///
    /// A mirroring matrix swaps two corners of every triangle so the
    /// outward winding survives.
    pub fn transform(&mut self, matrix: &DMat4) {
        self.vertices
            .iter_mut()
            .for_each(|v| *v = matrix.transform_point3(*v));

        if let Some(normals) = self.normals.as_mut() {
            let inverse_transpose = matrix.inverse().transpose();
            normals
                .iter_mut()
                .for_each(|n| *n = inverse_transpose.transform_vector3(*n).normalize_or_zero());
        }

        if matrix.determinant() < 0.0 {
            self.triangles.iter_mut().for_each(|tri| tri.swap(1, 2));
        }
    }

    /// True when every index is in range, no triangle repeats a corner or
    /// collapses to zero area, and any normals line up with the positions.
    pub fn validate(&self) -> bool {
        let normals_match = self
            .normals
            .as_ref()
            .map_or(true, |normals| normals.len() == self.vertices.len());
        if !normals_match {
            return false;
        }

        let count = self.vertices.len();
        self.triangles.iter().enumerate().all(|(index, &[a, b, c])| {
            let in_range = [a, b, c].iter().all(|&i| (i as usize) < count);
            let distinct = a != b && b != c && a != c;
            in_range && distinct && !self.triangle_at(index).is_degenerate()
        })
    }

    /// Positive for a closed mesh wound outward.
    pub fn signed_volume(&self) -> f64 {
        self.iter_triangles()
            .map(|t| t.vertices[0].dot(t.vertices[1].cross(t.vertices[2])) / 6.0)
            .sum()
    }
}

/// Three positions forming one facet, counter-clockwise seen from outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [DVec3; 3],
}

impl Triangle {
    #[inline]
    pub fn new(a: DVec3, b: DVec3, c: DVec3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Unnormalized normal; its length is twice the area.
    #[inline]
    pub fn cross(&self) -> DVec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a)
    }

    /// Right-hand-rule unit normal, zero for a degenerate facet.
    #[inline]
    pub fn normal(&self) -> DVec3 {
        self.cross().normalize_or_zero()
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.cross().length() * 0.5
    }

    /// Too thin to survive slicing.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.area() < DEGENERATE_AREA_EPSILON
    }

    /// World-space copy; mirroring matrices keep the outward winding.
    pub fn transformed(&self, matrix: &DMat4) -> Triangle {
        let [a, b, c] = self.vertices.map(|v| matrix.transform_point3(v));
        if matrix.determinant() < 0.0 {
            Triangle::new(a, c, b)
        } else {
            Triangle::new(a, b, c)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor_facet() -> Mesh {
        let mut mesh = Mesh::with_capacity(3, 1);
        for corner in [DVec3::ZERO, DVec3::X, DVec3::Y] {
            mesh.add_vertex(corner);
        }
        mesh.add_triangle(0, 1, 2);
        mesh
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!((mesh.vertex_count(), mesh.triangle_count()), (0, 0));
        assert!(mesh.bounding_box().is_none());
    }

    #[test]
    fn test_vertex_indices_are_sequential() {
        let mut mesh = Mesh::new();
        assert_eq!(mesh.add_vertex(DVec3::new(0.1, 0.2, 0.3)), 0);
        assert_eq!(mesh.add_vertex(DVec3::ONE), 1);
        assert_eq!(mesh.vertices()[0], DVec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_bounds_span_all_positions() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::new(-0.417, -0.0835, 0.0));
        mesh.add_vertex(DVec3::new(0.417, 0.0835, 0.05));
        let bounds = mesh.bounding_box().unwrap();
        assert_eq!(bounds.min, DVec3::new(-0.417, -0.0835, 0.0));
        assert_eq!(bounds.max, DVec3::new(0.417, 0.0835, 0.05));
    }

    #[test]
    fn test_validate_accepts_single_facet() {
        assert!(floor_facet().validate());
    }

    #[test]
    fn test_validate_rejects_dangling_index() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(DVec3::ZERO);
        mesh.add_triangle(0, 1, 2);
        assert!(!mesh.validate());
    }

    #[test]
    fn test_validate_rejects_collinear_corners() {
        let mut mesh = Mesh::new();
        for x in [0.0, 1.0, 2.0] {
            mesh.add_vertex(DVec3::new(x, 0.0, 0.0));
        }
        mesh.add_triangle(0, 1, 2);
        assert!(!mesh.validate());
    }

    #[test]
    fn test_validate_rejects_short_normal_list() {
        let mut mesh = floor_facet();
        mesh.set_normals(vec![DVec3::Z]);
        assert!(!mesh.validate());
    }

    #[test]
    fn test_transform_mirror_keeps_outward_winding() {
        let mut mesh = floor_facet();
        mesh.transform(&DMat4::from_scale(DVec3::new(1.0, 1.0, -1.0)));
        assert_eq!(mesh.triangles()[0], [0, 2, 1]);
        assert_relative_eq!(mesh.triangle_at(0).normal().z, -1.0);
    }

    #[test]
    fn test_triangle_normal_and_area() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::Y);
        assert_eq!(tri.normal(), DVec3::Z);
        assert_relative_eq!(tri.area(), 0.5);
        assert!(!tri.is_degenerate());
    }

    #[test]
    fn test_degenerate_triangle_normal_is_zero() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::X);
        assert!(tri.is_degenerate());
        assert_eq!(tri.normal(), DVec3::ZERO);
    }

    #[test]
    fn test_transformed_triangle_moves_and_keeps_winding() {
        let tri = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::Y);
        let moved = tri.transformed(&DMat4::from_translation(DVec3::Z));
        assert_eq!(moved.vertices[0], DVec3::Z);
        assert_eq!(moved.normal(), DVec3::Z);

        let mirrored = tri.transformed(&DMat4::from_scale(DVec3::new(-1.0, 1.0, 1.0)));
        assert_eq!(mirrored.normal(), DVec3::Z);
    }
}
