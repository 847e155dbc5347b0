//! CPU-side scene graph and renderable instance pooling

pub mod node;
pub mod graph;
pub mod instance_pool;

pub use node::{EditTransform, EditableTransforms, LocalTransform, NodeContent, SceneNode, SceneNodeId};
pub use graph::SceneGraph;
pub use instance_pool::{Bounds, InstanceHandle, InstancePool, MockRenderer, ModelRenderer, REFILL_BATCH};
