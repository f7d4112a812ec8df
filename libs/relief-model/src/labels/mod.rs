//! # Label Generator
//!
//! Turns the identity and year strings into extruded text solids lying flat
//! against the base plate's front face. Both labels share one anchor on the
//! face and differ only by their fixed x offsets.
//!
//! Geometry is built in label space (text on the XY plane, extruded along
//! +Z), shifted down by half the em size so the text straddles the anchor,
//! then rotated onto the face. The rotation is baked into the mesh; the node
//! transform only carries the anchor translation.

mod extrude;
mod typeface;


pub use extrude::{extrude_text, fix_side_normals, FacePart, TextFace};
pub use typeface::{TextOutline, TrueTypeFont, Typeface};

use crate::error::ModelError;
use config::constants::{ModelConfig, NAME_LABEL_OFFSET_X, YEAR_LABEL_OFFSET_X};
use glam::{DMat4, DVec3};
use relief_mesh::primitives::{front_face_anchor, front_face_rotation};
use relief_mesh::{Mesh, SceneGroup, SceneNode};
use tracing::debug;

/// Name of the identity label node.
pub const IDENTITY_LABEL: &str = "identity";
/// Name of the year label node.
pub const YEAR_LABEL: &str = "year";

/// Builds the `labels` group holding the identity and year solids.
///
/// # Errors
///
/// [`ModelError::LabelFailure`] when either string produces no geometry;
/// font errors from the typeface pass through. Both are non-fatal to a
/// pipeline run.
pub fn generate_labels(
    typeface: &dyn Typeface,
    identity: &str,
    year: &str,
    config: &ModelConfig,
) -> Result<SceneGroup, ModelError> {
    let anchor = front_face_anchor(config);
    let to_face = front_face_rotation(config)
        * DMat4::from_translation(DVec3::new(0.0, -config.label_size / 2.0, 0.0));

    let mut labels = SceneGroup::with_capacity("labels", 2);
    for (name, text, offset_x) in [
        (IDENTITY_LABEL, identity, NAME_LABEL_OFFSET_X),
        (YEAR_LABEL, year, YEAR_LABEL_OFFSET_X),
    ] {
        let mut mesh = label_mesh(typeface, text, config)
            .map_err(|err| ModelError::label(format!("{name} label \"{text}\": {err}")))?;
        mesh.transform(&to_face);
        let position = anchor + DVec3::new(offset_x, 0.0, 0.0);
        debug!(label = name, triangles = mesh.triangle_count(), "label extruded");
        labels.add(SceneNode::mesh(name, mesh).with_transform(DMat4::from_translation(position)));
    }
    Ok(labels)
}

/// Extrudes one string in label space, before any placement.
pub fn label_mesh(
    typeface: &dyn Typeface,
    text: &str,
    config: &ModelConfig,
) -> Result<Mesh, ModelError> {
    let outline = typeface.outline(text, config.label_size)?;
    extrude_text(
        &outline,
        config.label_depth,
        config.label_size,
        config.side_normal_area_threshold(),
    )
}
