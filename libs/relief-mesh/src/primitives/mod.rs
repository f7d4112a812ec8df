//! # Primitives
//!
//! Mesh generation for the pieces of a relief model: one box per day bar
//! and the angled base plate the bars stand on.

pub mod base_plate;
pub mod cube;

pub use base_plate::{create_base_plate, front_face_anchor, front_face_rotation};
pub use cube::create_cube;
