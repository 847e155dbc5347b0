//! Anchor placement: attaching a renderable and its bounding helper to an
//! anchor
//!
//! One parameterized path replaces the per-screen variants of the same
//! wiring: the options decide target scale, shadow behavior, and which
//! transform channels the user may edit.

use std::path::Path;

use crate::ar::tracking::Anchor;
use crate::scene::{
    EditableTransforms, InstancePool, ModelRenderer, NodeContent, SceneGraph, SceneNodeId,
};

/// Per-call-site placement options.
#[derive(Clone, Copy, Debug)]
pub struct PlacementConfig {
    /// Target size of the placed model in normalized scene units.
    pub scale_to_units: f32,
    pub receives_shadows: bool,
    /// Transform channels the user may manipulate on the placed model.
    pub editable: EditableTransforms,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            scale_to_units: 0.2,
            receives_shadows: false,
            editable: EditableTransforms::scale_and_rotation(),
        }
    }
}

/// Handle to one completed placement: the anchor container and its two
/// children.
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    pub container: SceneNodeId,
    pub model: SceneNodeId,
    pub helper: SceneNodeId,
}

/// Builds placements under anchors.
pub struct PlacementCoordinator {
    config: PlacementConfig,
}

impl PlacementCoordinator {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Attach a renderable for `asset` under `anchor`.
    ///
    /// Creates the anchor container, takes one pooled instance, wraps it as
    /// a model node, adds an invisible bounding helper sized to the
    /// instance's extents, and subscribes the helper's visibility to the
    /// edit state of both the model and the container. Infallible: bad
    /// anchors and unresolved assets are rejected upstream.
    pub fn place<R: ModelRenderer>(
        &self,
        graph: &mut SceneGraph,
        renderer: &mut R,
        pool: &mut InstancePool,
        anchor: Anchor,
        asset: &Path,
    ) -> Placement {
        let container = graph.add_child(
            graph.root(),
            "anchor",
            NodeContent::AnchorContainer { anchor },
        );

        let instance = pool.take(renderer, asset);
        let bounds = renderer.bounding_extents(instance);

        let model = graph.add_child(
            container,
            "model",
            NodeContent::Model {
                instance,
                scale_to_units: self.config.scale_to_units,
                receives_shadows: self.config.receives_shadows,
                editable: self.config.editable,
            },
        );

        let helper = graph.add_child(
            container,
            "bounds",
            NodeContent::BoundingHelper {
                extents: bounds.extents,
                center: bounds.center,
            },
        );
        if let Some(node) = graph.get_mut(helper) {
            node.visible = false;
        }

        graph.subscribe_edit_visibility(&[model, container], helper);

        log::debug!(
            "placed {:?} under anchor at {:?}",
            asset,
            anchor.pose.position
        );

        Placement {
            container,
            model,
            helper,
        }
    }
}
