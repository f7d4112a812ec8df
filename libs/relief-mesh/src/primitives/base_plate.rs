//! # Base Plate Primitive
//!
//! The plinth every relief stands on: a prism running along X whose
//! cross-section is a trapezoid. The top is `base_width` deep and centered on
//! the origin; the front face (toward -Y) leans outward so that it meets the
//! top at `face_angle_degrees`. Labels are laid flat against that face.
//!
//! ```text
//!        top (z = +h/2)
//!    ┌───────────────┐
//!   ╱                │  back
//!  ╱ front           │
//! └──────────────────┘  bottom (z = -h/2)
//! ```

use crate::error::MeshError;
use crate::extrude::{linear_extrude, Polygon2D};
use crate::mesh::Mesh;
use config::constants::ModelConfig;
use glam::{DMat4, DVec2, DVec3, DVec4};

/// Creates the base plate mesh from the model dimensions.
///
/// The plate is centered on the origin in X and Z, with its top surface at
/// `base_height / 2`.
///
/// # Example
///
/// ```rust
/// use config::constants::ModelConfig;
/// use relief_mesh::primitives::create_base_plate;
///
/// let config = ModelConfig::default();
/// let plate = create_base_plate(&config).unwrap();
/// let bounds = plate.bounding_box().unwrap();
/// assert!((bounds.max.z - config.base_top()).abs() < 1e-12);
/// assert!((bounds.size().x - config.base_length).abs() < 1e-12);
/// ```
pub fn create_base_plate(config: &ModelConfig) -> Result<Mesh, MeshError> {
    let half_width = config.base_width / 2.0;
    let half_height = config.base_height / 2.0;
    let overhang = config.face_overhang();

    // Cross-section in the (y, z) plane, counter-clockwise
    let profile = Polygon2D::new(vec![
        DVec2::new(-half_width - overhang, -half_height),
        DVec2::new(half_width, -half_height),
        DVec2::new(half_width, half_height),
        DVec2::new(-half_width, half_height),
    ]);

    let mut mesh = linear_extrude(&profile, config.base_length, true)?;

    // Extruded (y, z, x) -> model (x, y, z); a cyclic permutation keeps winding
    let to_model = DMat4::from_cols(DVec4::Y, DVec4::Z, DVec4::X, DVec4::W);
    mesh.transform(&to_model);

    Ok(mesh)
}

/// Midpoint of the front face on the plate's center line.
pub fn front_face_anchor(config: &ModelConfig) -> DVec3 {
    DVec3::new(
        0.0,
        -config.base_width / 2.0 - config.face_overhang() / 2.0,
        0.0,
    )
}

/// Rotation taking the XY plane onto the front face.
///
/// Local +Y runs up the face and local +Z becomes the face's outward normal,
/// so geometry extruded along +Z stands proud of the face.
pub fn front_face_rotation(config: &ModelConfig) -> DMat4 {
    DMat4::from_rotation_x(std::f64::consts::PI - config.face_angle_degrees.to_radians())
}
