//! # Model Assembler
//!
//! Composes base, bars and labels under one root and orients the result.
//!
//! ```text
//! model (rotate -90° about X: layout Z-up → Y-up)
//! ├── base
//! ├── bars   (translated so its bounding box is centered on x = y = 0)
//! └── labels (optional)
//! ```
//!
//! Only group transforms change here; mesh geometry is never touched.

use crate::error::{AssetKind, ModelError};
use config::constants::ModelConfig;
use glam::{DMat4, DVec3};
use relief_mesh::primitives::create_base_plate;
use relief_mesh::{Aabb, SceneGroup, SceneNode, Triangle, TriangleSource};
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, info};

/// Root group name.
pub const MODEL_GROUP: &str = "model";
/// Base group name.
pub const BASE_GROUP: &str = "base";
/// Bars group name.
pub const BARS_GROUP: &str = "bars";
/// Labels group name.
pub const LABELS_GROUP: &str = "labels";

/// Rotation from layout coordinates (Z up) to the exported orientation
/// (Y up).
pub fn orientation() -> DMat4 {
    DMat4::from_rotation_x(-FRAC_PI_2)
}

/// The assembled, oriented relief. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeModel {
    root: SceneGroup,
}

impl CompositeModel {
    /// Root group, including the orientation transform.
    pub fn root(&self) -> &SceneGroup {
        &self.root
    }

    /// Base plate group.
    pub fn base(&self) -> Option<&SceneGroup> {
        self.root.group(BASE_GROUP)
    }

    /// Bars group.
    pub fn bars(&self) -> Option<&SceneGroup> {
        self.root.group(BARS_GROUP)
    }

    /// Labels group, absent when labels were omitted.
    pub fn labels(&self) -> Option<&SceneGroup> {
        self.root.group(LABELS_GROUP)
    }

    /// Returns true if the labels made it into the model.
    pub fn has_labels(&self) -> bool {
        self.labels().is_some()
    }

    /// Number of day bars.
    pub fn bar_count(&self) -> usize {
        self.bars().map_or(0, |bars| bars.children().len())
    }
}

impl TriangleSource for CompositeModel {
    fn visit_triangles(&self, visit: &mut dyn FnMut(Triangle)) {
        self.root.visit_triangles(visit);
    }

    fn triangle_count(&self) -> usize {
        self.root.triangle_count()
    }

    fn world_bounds(&self) -> Option<Aabb> {
        self.root.world_bounds()
    }
}

/// Wraps the procedural base plate as a base node.
pub fn procedural_base(config: &ModelConfig) -> Result<SceneNode, ModelError> {
    Ok(SceneNode::mesh("plate", create_base_plate(config)?))
}

/// Assembles the composite.
///
/// The bars group is recentered on its own bounding box (x and y only)
/// before the single orientation rotation is applied to the root. Labels are
/// optional so a font failure still yields a printable model.
pub fn assemble(
    base: SceneNode,
    mut bars: SceneGroup,
    labels: Option<SceneGroup>,
) -> Result<CompositeModel, ModelError> {
    if base.triangle_count() == 0 {
        return Err(ModelError::asset(AssetKind::BaseModel, "base model has no triangles"));
    }

    if let Some(bounds) = bars.world_bounds() {
        let center = bounds.center();
        bars.translate(DVec3::new(-center.x, -center.y, 0.0));
        debug!(x = center.x, y = center.y, "bars recentered");
    }

    let mut base_group = SceneGroup::new(BASE_GROUP);
    base_group.add(base);

    let mut root = SceneGroup::with_capacity(MODEL_GROUP, 3);
    root.add(base_group);
    root.add(bars);
    if let Some(labels) = labels {
        root.add(labels);
    }
    root.apply(orientation());

    let model = CompositeModel { root };
    info!(
        bars = model.bar_count(),
        labels = model.has_labels(),
        triangles = model.triangle_count(),
        "model assembled"
    );
    Ok(model)
}
