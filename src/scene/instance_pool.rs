//! Reusable renderable instances, batched per asset
//!
//! Instantiating a model into the render engine is expensive, so instances
//! are created in batches and handed out LIFO. The pool never comes up
//! empty: an exhausted stack is refilled synchronously before the pop.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec3;

/// How many instances are materialized when a stack runs dry
pub const REFILL_BATCH: usize = 10;

/// Opaque handle to one renderable instance owned by the render engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceHandle(pub u64);

/// Axis-aligned bounding volume of a renderable, in local units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub extents: Vec3,
    pub center: Vec3,
}

/// Render engine boundary for model instantiation
///
/// The engine owns the actual renderables; this crate only holds handles.
/// `create_instances` must return exactly `count` handles for a valid
/// asset file — asset validity is checked upstream by the cache.
pub trait ModelRenderer {
    /// Materialize `count` instances of the model file at `asset`
    fn create_instances(&mut self, asset: &Path, count: usize) -> Vec<InstanceHandle>;

    /// Bounding extents and center of one instance
    fn bounding_extents(&self, instance: InstanceHandle) -> Bounds;
}

/// LIFO pool of pre-built instances, one stack per asset
#[derive(Default)]
pub struct InstancePool {
    stacks: HashMap<PathBuf, Vec<InstanceHandle>>,
}

impl InstancePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop an instance for `asset`, refilling the stack first if empty
    ///
    /// Never fails for a valid asset handle: an empty stack triggers a
    /// synchronous batch of [`REFILL_BATCH`] instances before the pop.
    /// Ownership of the returned handle transfers to the caller.
    pub fn take<R: ModelRenderer>(&mut self, renderer: &mut R, asset: &Path) -> InstanceHandle {
        let stack = self.stacks.entry(asset.to_path_buf()).or_default();

        if stack.is_empty() {
            log::debug!(
                "instance pool empty for {:?}, materializing batch of {}",
                asset,
                REFILL_BATCH
            );
            stack.extend(renderer.create_instances(asset, REFILL_BATCH));
        }

        stack.pop().expect("renderer returned an empty batch")
    }

    /// Instances currently available for an asset
    pub fn available(&self, asset: &Path) -> usize {
        self.stacks.get(asset).map(|s| s.len()).unwrap_or(0)
    }

    /// Drop all pooled instances (scene reset / session end)
    pub fn clear(&mut self) {
        self.stacks.clear();
    }
}

/// Counting renderer for tests: handles are sequential, every instance
/// reports the same fixed bounds.
#[derive(Default)]
pub struct MockRenderer {
    next_handle: u64,
    /// Every `create_instances` call, as (asset, count)
    pub created: Vec<(PathBuf, usize)>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total instances materialized across all calls
    pub fn total_created(&self) -> usize {
        self.created.iter().map(|(_, count)| count).sum()
    }
}

impl ModelRenderer for MockRenderer {
    fn create_instances(&mut self, asset: &Path, count: usize) -> Vec<InstanceHandle> {
        self.created.push((asset.to_path_buf(), count));
        (0..count)
            .map(|_| {
                let handle = InstanceHandle(self.next_handle);
                self.next_handle += 1;
                handle
            })
            .collect()
    }

    fn bounding_extents(&self, _instance: InstanceHandle) -> Bounds {
        Bounds {
            extents: Vec3::new(1.0, 1.0, 1.0),
            center: Vec3::new(0.0, 0.5, 0.0),
        }
    }
}
