//! Scene graph node types
//!
//! Core types for the CPU-side scene graph: node IDs, transforms, content
//! variants, and nodes. The graph stands in for the render engine boundary;
//! nodes carry the handles and flags the renderer needs, not geometry.

use std::collections::HashSet;

use glam::{Mat4, Quat, Vec3};

use crate::ar::tracking::Anchor;
use crate::scene::instance_pool::InstanceHandle;

/// Unique identifier for a scene graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneNodeId(pub u64);

/// One user-manipulable transform channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditTransform {
    Translate,
    Rotate,
    Scale,
}

/// Which transform channels the user may edit on a model node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditableTransforms {
    pub position: bool,
    pub rotation: bool,
    pub scale: bool,
}

impl EditableTransforms {
    /// Scale and rotation only — the common placement configuration.
    pub fn scale_and_rotation() -> Self {
        Self {
            position: false,
            rotation: true,
            scale: true,
        }
    }

    /// All three channels, for call sites that also allow repositioning.
    pub fn all() -> Self {
        Self {
            position: true,
            rotation: true,
            scale: true,
        }
    }

    pub fn allows(&self, transform: EditTransform) -> bool {
        match transform {
            EditTransform::Translate => self.position,
            EditTransform::Rotate => self.rotation,
            EditTransform::Scale => self.scale,
        }
    }
}

/// Local transform relative to the parent node.
#[derive(Clone, Debug)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl LocalTransform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.position,
        )
    }
}

/// What a scene node contains.
#[derive(Clone, Debug)]
pub enum NodeContent {
    /// A grouping node with no renderable of its own.
    Group,

    /// A container bound to a tracked spatial anchor.
    AnchorContainer { anchor: Anchor },

    /// A renderable model instance taken from the pool.
    Model {
        instance: InstanceHandle,
        /// Target size in normalized scene units.
        scale_to_units: f32,
        receives_shadows: bool,
        editable: EditableTransforms,
    },

    /// Invisible-by-default selection volume, rendered in a neutral
    /// material, shown only while its owner is being manipulated.
    BoundingHelper { extents: Vec3, center: Vec3 },
}

/// A single node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: SceneNodeId,
    pub name: String,
    pub parent: Option<SceneNodeId>,
    pub children: Vec<SceneNodeId>,
    pub local_transform: LocalTransform,
    pub visible: bool,
    pub content: NodeContent,
    /// Transform channels the user is actively manipulating right now.
    pub active_edits: HashSet<EditTransform>,
}

impl SceneNode {
    /// Create a new scene node.
    pub fn new(id: SceneNodeId, name: impl Into<String>, content: NodeContent) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local_transform: LocalTransform::identity(),
            visible: true,
            content,
            active_edits: HashSet::new(),
        }
    }

    /// Whether the user is currently editing any transform channel.
    pub fn is_editing(&self) -> bool {
        !self.active_edits.is_empty()
    }
}
