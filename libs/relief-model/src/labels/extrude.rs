//! Solid extrusion of text outlines.
//!
//! The back cap lies at `z = 0` and the front cap at `z = depth`. Side walls
//! run along the boundary edges of the cap triangulation, so every wall
//! vertex is a cap vertex and the solid has no T-junctions. Vertex normals
//! are smoothed across welded positions and then corrected on the side
//! walls, see [`fix_side_normals`].

use super::typeface::{contour_area, TextOutline};
use crate::error::ModelError;
use config::constants::{DEGENERATE_AREA_EPSILON, WELD_SCALE};
use glam::{DVec2, DVec3};
use lyon_tessellation::math::{point, Point};
use lyon_tessellation::path::Path;
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};
use relief_mesh::{Mesh, Triangle};
use std::collections::{HashMap, HashSet};

/// Outline units are scaled by `CAP_SCALE / size` before tessellation.
const CAP_SCALE: f64 = 1000.0;
const CAP_TOLERANCE: f32 = 0.01;

/// Which part of the solid a face belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacePart {
    /// Front or back cap
    Cap,
    /// Wall between the caps
    Side,
}

/// One triangle of the extruded text with per-corner normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextFace {
    pub corners: [DVec3; 3],
    pub normals: [DVec3; 3],
    pub part: FacePart,
}

impl TextFace {
    fn new(corners: [DVec3; 3], part: FacePart) -> Self {
        Self {
            corners,
            normals: [DVec3::ZERO; 3],
            part,
        }
    }

    fn triangle(&self) -> Triangle {
        Triangle::new(self.corners[0], self.corners[1], self.corners[2])
    }
}

/// Extrudes `outline` into a closed solid `depth` thick.
///
/// `size` is the em size the outline was produced at; it scales the cap
/// tessellation and the side-normal area threshold.
pub fn extrude_text(
    outline: &TextOutline,
    depth: f64,
    size: f64,
    area_threshold: f64,
) -> Result<Mesh, ModelError> {
    if outline.is_empty() {
        return Err(ModelError::label("outline has no contours"));
    }
    if depth <= 0.0 || size <= 0.0 {
        return Err(ModelError::label(format!(
            "invalid extrusion depth {depth} or size {size}"
        )));
    }

    let scale = CAP_SCALE / size;
    let cap = tessellate_cap(&outline.contours, scale)?;
    if cap.is_empty() {
        return Err(ModelError::label("outline encloses no area"));
    }

    let mut faces = Vec::with_capacity(cap.len() * 4);
    add_caps(&cap, depth, &mut faces);
    add_side_walls(&cap, depth, &mut faces);

    smooth_normals(&mut faces);
    fix_side_normals(&mut faces, area_threshold);

    Ok(to_mesh(&faces))
}

/// Triangulates the filled outline, counter-clockwise seen from +Z.
///
/// Slivers below [`DEGENERATE_AREA_EPSILON`] are dropped here rather than by
/// the exporter so the walls can close over whatever remains.
fn tessellate_cap(contours: &[Vec<DVec2>], scale: f64) -> Result<Vec<[DVec2; 3]>, ModelError> {
    let to_point = |p: &DVec2| point((p.x * scale) as f32, (p.y * scale) as f32);
    let mut builder = Path::builder();
    for contour in contours.iter().filter(|contour| contour.len() >= 3) {
        builder.begin(to_point(&contour[0]));
        for p in &contour[1..] {
            builder.line_to(to_point(p));
        }
        builder.end(true);
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
    let options = FillOptions::tolerance(CAP_TOLERANCE).with_fill_rule(FillRule::NonZero);
    FillTessellator::new()
        .tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| v.position()),
        )
        .map_err(|err| ModelError::label(format!("cap tessellation failed: {err:?}")))?;

    let to_plane = |index: u32| {
        let p = buffers.vertices[index as usize];
        DVec2::new(f64::from(p.x) / scale, f64::from(p.y) / scale)
    };
    let triangles = buffers
        .indices
        .chunks_exact(3)
        .filter_map(|tri| {
            let [a, b, c] = [to_plane(tri[0]), to_plane(tri[1]), to_plane(tri[2])];
            let area = contour_area(&[a, b, c]);
            if area.abs() < DEGENERATE_AREA_EPSILON {
                None
            } else if area < 0.0 {
                Some([c, b, a])
            } else {
                Some([a, b, c])
            }
        })
        .collect();
    Ok(triangles)
}

fn add_caps(cap: &[[DVec2; 3]], depth: f64, faces: &mut Vec<TextFace>) {
    for &[a, b, c] in cap {
        faces.push(TextFace::new(
            [a.extend(depth), b.extend(depth), c.extend(depth)],
            FacePart::Cap,
        ));
        faces.push(TextFace::new(
            [a.extend(0.0), c.extend(0.0), b.extend(0.0)],
            FacePart::Cap,
        ));
    }
}

fn plane_key(p: DVec2) -> [u64; 2] {
    // -0.0 and 0.0 must weld
    [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits()]
}

/// Directed cap edges whose reverse is not also a cap edge.
///
/// The cap is counter-clockwise, so the filled region lies to the left of
/// every returned edge.
fn boundary_edges(cap: &[[DVec2; 3]]) -> Vec<(DVec2, DVec2)> {
    let edges = || cap.iter().flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)]);
    let present: HashSet<([u64; 2], [u64; 2])> = edges()
        .map(|(a, b)| (plane_key(a), plane_key(b)))
        .collect();
    edges()
        .filter(|&(a, b)| !present.contains(&(plane_key(b), plane_key(a))))
        .collect()
}

fn add_side_walls(cap: &[[DVec2; 3]], depth: f64, faces: &mut Vec<TextFace>) {
    for (a, b) in boundary_edges(cap) {
        let (a0, b0) = (a.extend(0.0), b.extend(0.0));
        let (a1, b1) = (a.extend(depth), b.extend(depth));
        // the filled region is to the left of a -> b, so outward is right
        faces.push(TextFace::new([a0, b0, b1], FacePart::Side));
        faces.push(TextFace::new([a0, b1, a1], FacePart::Side));
    }
}

fn weld_key(position: DVec3) -> [i64; 3] {
    (position * WELD_SCALE).round().as_i64vec3().to_array()
}

/// Area-weighted vertex normals shared by every face touching a position.
fn smooth_normals(faces: &mut [TextFace]) {
    let mut sums: HashMap<[i64; 3], DVec3> = HashMap::new();
    for face in faces.iter() {
        let weighted = face.triangle().cross();
        for corner in face.corners {
            *sums.entry(weld_key(corner)).or_insert(DVec3::ZERO) += weighted;
        }
    }
    for face in faces.iter_mut() {
        for (normal, corner) in face.normals.iter_mut().zip(face.corners) {
            *normal = sums
                .get(&weld_key(corner))
                .copied()
                .unwrap_or(DVec3::ZERO)
                .normalize_or_zero();
        }
    }
}

/// Corrects side-wall shading.
///
/// Each side corner loses its out-of-plane component. Side faces larger than
/// `area_threshold` take the flat face normal on every corner instead, which
/// keeps long straight walls from picking up seams.
pub fn fix_side_normals(faces: &mut [TextFace], area_threshold: f64) {
    for face in faces.iter_mut().filter(|face| face.part == FacePart::Side) {
        for normal in &mut face.normals {
            normal.z = 0.0;
            *normal = normal.normalize_or_zero();
        }
        let triangle = face.triangle();
        if triangle.area() > area_threshold {
            face.normals = [triangle.normal(); 3];
        }
    }
}

fn to_mesh(faces: &[TextFace]) -> Mesh {
    let mut mesh = Mesh::with_capacity(faces.len() * 3, faces.len());
    let mut normals = Vec::with_capacity(faces.len() * 3);
    for face in faces {
        let [a, b, c] = face.corners.map(|corner| mesh.add_vertex(corner));
        mesh.add_triangle(a, b, c);
        normals.extend_from_slice(&face.normals);
    }
    mesh.set_normals(normals);
    mesh
}
