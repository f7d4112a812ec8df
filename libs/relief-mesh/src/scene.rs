//! # Scene Graph
//!
//! Named groups and meshes with local transforms. A node's world transform is
//! the product of every ancestor transform with its own, applied parent-first.
//! Geometry is never rewritten when a node moves; only its transform changes.

use crate::bounds::Aabb;
use crate::mesh::{Mesh, Triangle};
use glam::{DMat4, DVec3};

/// Anything that can enumerate world-space triangles.
pub trait TriangleSource {
    /// Calls `visit` once per triangle in world space.
    fn visit_triangles(&self, visit: &mut dyn FnMut(Triangle));

    /// Number of triangles `visit_triangles` will produce.
    fn triangle_count(&self) -> usize;

    /// World-space bounding box, or `None` when there is no geometry.
    fn world_bounds(&self) -> Option<Aabb> {
        let mut bounds: Option<Aabb> = None;
        self.visit_triangles(&mut |tri| {
            for v in tri.vertices {
                match &mut bounds {
                    Some(b) => b.include(v),
                    None => bounds = Some(Aabb::new(v, v)),
                }
            }
        });
        bounds
    }
}

impl TriangleSource for Mesh {
    fn visit_triangles(&self, visit: &mut dyn FnMut(Triangle)) {
        for tri in self.iter_triangles() {
            visit(tri);
        }
    }

    fn triangle_count(&self) -> usize {
        Mesh::triangle_count(self)
    }

    fn world_bounds(&self) -> Option<Aabb> {
        self.bounding_box()
    }
}

/// A mesh or a group, each carrying a local transform.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    /// Leaf geometry
    Mesh {
        /// Node name
        name: String,
        /// Local transform
        transform: DMat4,
        /// Geometry in local space
        mesh: Mesh,
    },
    /// Nested group
    Group(SceneGroup),
}

impl SceneNode {
    /// Creates a mesh leaf with an identity transform.
    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self::Mesh {
            name: name.into(),
            transform: DMat4::IDENTITY,
            mesh,
        }
    }

    /// Replaces the node's local transform.
    pub fn with_transform(mut self, matrix: DMat4) -> Self {
        match &mut self {
            SceneNode::Mesh { transform, .. } => *transform = matrix,
            SceneNode::Group(group) => group.transform = matrix,
        }
        self
    }

    /// Node name.
    pub fn name(&self) -> &str {
        match self {
            SceneNode::Mesh { name, .. } => name,
            SceneNode::Group(group) => &group.name,
        }
    }

    /// Local transform.
    pub fn transform(&self) -> DMat4 {
        match self {
            SceneNode::Mesh { transform, .. } => *transform,
            SceneNode::Group(group) => group.transform,
        }
    }

    fn visit_with(&self, parent: &DMat4, visit: &mut dyn FnMut(Triangle)) {
        match self {
            SceneNode::Mesh {
                transform, mesh, ..
            } => {
                let world = *parent * *transform;
                for tri in mesh.iter_triangles() {
                    visit(tri.transformed(&world));
                }
            }
            SceneNode::Group(group) => group.visit_with(parent, visit),
        }
    }

    fn bounds_with(&self, parent: &DMat4) -> Option<Aabb> {
        match self {
            SceneNode::Mesh {
                transform, mesh, ..
            } => {
                let world = *parent * *transform;
                Aabb::from_points(mesh.vertices().iter().map(|v| world.transform_point3(*v)))
            }
            SceneNode::Group(group) => group.bounds_with(parent),
        }
    }
}

impl From<SceneGroup> for SceneNode {
    fn from(group: SceneGroup) -> Self {
        SceneNode::Group(group)
    }
}

impl TriangleSource for SceneNode {
    fn visit_triangles(&self, visit: &mut dyn FnMut(Triangle)) {
        self.visit_with(&DMat4::IDENTITY, visit);
    }

    fn triangle_count(&self) -> usize {
        match self {
            SceneNode::Mesh { mesh, .. } => mesh.triangle_count(),
            SceneNode::Group(group) => group.triangle_count(),
        }
    }

    fn world_bounds(&self) -> Option<Aabb> {
        self.bounds_with(&DMat4::IDENTITY)
    }
}

/// A named collection of nodes sharing one transform.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use relief_mesh::primitives::create_cube;
/// use relief_mesh::{SceneGroup, SceneNode, TriangleSource};
///
/// let mut group = SceneGroup::new("bars");
/// group.add(SceneNode::mesh("a", create_cube(DVec3::ONE, false).unwrap()));
/// group.translate(DVec3::new(-0.5, -0.5, 0.0));
///
/// let bounds = group.world_bounds().unwrap();
/// assert_eq!(bounds.center(), DVec3::new(0.0, 0.0, 0.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGroup {
    name: String,
    transform: DMat4,
    children: Vec<SceneNode>,
}

impl SceneGroup {
    /// Creates an empty group with an identity transform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: DMat4::IDENTITY,
            children: Vec::new(),
        }
    }

    /// Creates an empty group with room for `capacity` children.
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            transform: DMat4::IDENTITY,
            children: Vec::with_capacity(capacity),
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local transform.
    pub fn transform(&self) -> DMat4 {
        self.transform
    }

    /// Applies `matrix` after the current transform, in the parent's frame.
    pub fn apply(&mut self, matrix: DMat4) {
        self.transform = matrix * self.transform;
    }

    /// Moves the group in its parent's frame.
    pub fn translate(&mut self, offset: DVec3) {
        self.apply(DMat4::from_translation(offset));
    }

    /// Appends a child node.
    pub fn add(&mut self, node: impl Into<SceneNode>) {
        self.children.push(node.into());
    }

    /// Child nodes in insertion order.
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Returns true if the group has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Finds a direct child group by name.
    pub fn group(&self, name: &str) -> Option<&SceneGroup> {
        self.children.iter().find_map(|child| match child {
            SceneNode::Group(group) if group.name == name => Some(group),
            _ => None,
        })
    }

    /// Bounding box of the children in this group's own frame, ignoring
    /// the group's transform.
    pub fn local_bounds(&self) -> Option<Aabb> {
        self.bounds_in(&DMat4::IDENTITY)
    }

    fn bounds_in(&self, frame: &DMat4) -> Option<Aabb> {
        self.children
            .iter()
            .filter_map(|child| child.bounds_with(frame))
            .reduce(|a, b| a.union(&b))
    }

    fn bounds_with(&self, parent: &DMat4) -> Option<Aabb> {
        self.bounds_in(&(*parent * self.transform))
    }

    fn visit_with(&self, parent: &DMat4, visit: &mut dyn FnMut(Triangle)) {
        let world = *parent * self.transform;
        for child in &self.children {
            child.visit_with(&world, visit);
        }
    }
}

impl TriangleSource for SceneGroup {
    fn visit_triangles(&self, visit: &mut dyn FnMut(Triangle)) {
        self.visit_with(&DMat4::IDENTITY, visit);
    }

    fn triangle_count(&self) -> usize {
        self.children.iter().map(TriangleSource::triangle_count).sum()
    }

    fn world_bounds(&self) -> Option<Aabb> {
        self.bounds_with(&DMat4::IDENTITY)
    }
}
