//! Facets, the unit both STL encodings are made of.

use glam::DVec3;
use relief_mesh::{Mesh, Triangle, TriangleSource};
use std::collections::HashMap;

/// One STL record: a unit normal and three corners, counter-clockwise seen
/// from outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    pub normal: DVec3,
    pub vertices: [DVec3; 3],
}

impl Facet {
    /// Facet of a triangle, with the normal taken from its winding.
    pub fn from_triangle(triangle: &Triangle) -> Self {
        Self {
            normal: triangle.normal(),
            vertices: triangle.vertices,
        }
    }

    /// Corner geometry, ignoring the stored normal.
    pub fn triangle(&self) -> Triangle {
        Triangle::new(self.vertices[0], self.vertices[1], self.vertices[2])
    }
}

/// What an export wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Triangles written
    pub triangles: usize,
    /// Zero-area triangles left out
    pub skipped_degenerate: usize,
}

/// Feeds every non-degenerate world-space triangle of `source` to `emit`.
pub(crate) fn for_each_facet(
    source: &dyn TriangleSource,
    mut emit: impl FnMut(&Facet),
) -> ExportStats {
    let mut stats = ExportStats::default();
    source.visit_triangles(&mut |triangle| {
        if triangle.is_degenerate() {
            stats.skipped_degenerate += 1;
        } else {
            emit(&Facet::from_triangle(&triangle));
            stats.triangles += 1;
        }
    });
    stats
}

/// Rebuilds an indexed mesh from decoded facets, merging corners with
/// identical coordinates.
pub fn facets_to_mesh(facets: &[Facet]) -> Mesh {
    let mut mesh = Mesh::with_capacity(facets.len(), facets.len());
    let mut seen: HashMap<[u64; 3], u32> = HashMap::new();
    for facet in facets {
        let [a, b, c] = facet.vertices.map(|v| {
            *seen
                .entry(v.to_array().map(f64::to_bits))
                .or_insert_with(|| mesh.add_vertex(v))
        });
        mesh.add_triangle(a, b, c);
    }
    mesh
}
