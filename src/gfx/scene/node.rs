use std::fmt;

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};

use crate::gfx::picking::AABB;

/// Stable handle to a node in a [`SceneGraph`](super::SceneGraph).
///
/// The generation makes handles to removed nodes stale instead of silently
/// pointing at whatever reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Scene root; listeners bound here receive events for the whole scene
    Scene,
    Object,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub visible: bool,
    pub transform: Matrix4<f32>, // local, relative to the parent
    /// Local-space pick volume; nodes without one are never hit by a ray.
    pub bounds: Option<AABB>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visible: true,
            transform: Matrix4::identity(),
            bounds: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn scene(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Scene)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Object)
    }

    /// An object without pick bounds, used to group children.
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Object)
    }

    pub fn with_bounds(mut self, bounds: AABB) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_translation(mut self, translation: Vector3<f32>) -> Self {
        self.set_translation(translation);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_scene(&self) -> bool {
        self.kind == NodeKind::Scene
    }

    /// Set translation
    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.transform = Matrix4::from_translation(translation);
    }

    /// Apply translation (multiplies with existing transform)
    pub fn translate(&mut self, translation: Vector3<f32>) {
        self.transform = self.transform * Matrix4::from_translation(translation);
    }

    /// Set uniform scale
    pub fn set_scale(&mut self, scale: f32) {
        self.transform = Matrix4::from_scale(scale);
    }

    /// Apply rotation around Y axis
    pub fn rotate_y(&mut self, angle: Deg<f32>) {
        self.transform = self.transform * Matrix4::from_angle_y(angle);
    }

    /// Reset to identity matrix
    pub fn reset_transform(&mut self) {
        self.transform = Matrix4::identity();
    }
}
