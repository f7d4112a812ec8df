//! # Relief Mesh
//!
//! Geometry building blocks for contribution relief models: an indexed
//! triangle [`Mesh`], the primitives the model is made of, and a small scene
//! graph whose nodes carry local transforms.
//!
//! ## Architecture
//!
//! ```text
//! primitives (bar box, base plate) → Mesh → SceneGroup (transforms) → world triangles
//! ```
//!
//! Every consumer that needs world-space geometry (bounding boxes, export)
//! goes through [`TriangleSource`], so coordinates always include the full
//! chain of parent transforms.
//!
//! ## Usage
//!
//! ```rust
//! use glam::{DMat4, DVec3};
//! use relief_mesh::primitives::create_cube;
//! use relief_mesh::{SceneGroup, SceneNode, TriangleSource};
//!
//! let bar = create_cube(DVec3::new(1.0, 1.0, 2.0), true).unwrap();
//! let mut group = SceneGroup::new("bars");
//! group.add(SceneNode::mesh("day", bar).with_transform(DMat4::from_translation(DVec3::X)));
//! assert_eq!(group.triangle_count(), 12);
//! ```

pub mod bounds;
pub mod error;
pub mod extrude;
pub mod mesh;
pub mod primitives;
pub mod scene;

pub use bounds::Aabb;
pub use error::MeshError;
pub use mesh::{Mesh, Triangle};
pub use scene::{SceneGroup, SceneNode, TriangleSource};
