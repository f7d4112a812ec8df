//! # Cube Primitive
//!
//! Generates the rectangular prism used for every day bar.

use crate::error::MeshError;
use crate::mesh::Mesh;
use glam::DVec3;

/// Corner selectors: bit 0 picks max x, bit 1 max y, bit 2 max z.
const CORNERS: [u8; 8] = [0b000, 0b001, 0b011, 0b010, 0b100, 0b101, 0b111, 0b110];

/// Two triangles per side, counter-clockwise when viewed from outside.
const FACES: [[u32; 3]; 12] = [
    [0, 2, 1],
    [0, 3, 2],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [2, 3, 7],
    [2, 7, 6],
    [3, 0, 4],
    [3, 4, 7],
    [1, 2, 6],
    [1, 6, 5],
];

/// Builds an axis-aligned box with the given extent.
///
/// With `center` set the box straddles the origin, otherwise its minimum
/// corner sits on it. Every box is 8 shared vertices and 12 triangles.
///
/// ```rust
/// use relief_mesh::primitives::create_cube;
/// use glam::DVec3;
///
/// let bar = create_cube(DVec3::new(0.0143, 0.0143, 0.05), true).unwrap();
/// assert_eq!(bar.vertex_count(), 8);
/// assert_eq!(bar.triangle_count(), 12);
/// ```
pub fn create_cube(size: DVec3, center: bool) -> Result<Mesh, MeshError> {
    if !size.is_finite() || size.min_element() <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "box extent must be positive, got {size:?}"
        )));
    }

    let low = if center { -size / 2.0 } else { DVec3::ZERO };
    let high = low + size;

    let mut mesh = Mesh::with_capacity(CORNERS.len(), FACES.len());
    for bits in CORNERS {
        mesh.add_vertex(DVec3::new(
            if bits & 1 != 0 { high.x } else { low.x },
            if bits & 2 != 0 { high.y } else { low.y },
            if bits & 4 != 0 { high.z } else { low.z },
        ));
    }
    for [a, b, c] in FACES {
        mesh.add_triangle(a, b, c);
    }

    Ok(mesh)
}
