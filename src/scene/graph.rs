//! Scene graph — CPU-side hierarchy of nodes
//!
//! The graph owns all nodes, tracks parent/child relationships, and carries
//! the edit-visibility subscriptions that tie bounding helpers to the edit
//! state of the nodes they outline. All mutation happens on the interactive
//! thread; the graph is never shared across threads.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::scene::node::{EditTransform, NodeContent, SceneNode, SceneNodeId};

/// Subscription making one helper node's visibility follow the edit state
/// of a set of watched nodes: visible while any watched node is being
/// edited, invisible once all report an empty edit set.
#[derive(Clone, Debug)]
struct EditVisibilityLink {
    watched: Vec<SceneNodeId>,
    helper: SceneNodeId,
}

/// CPU-side scene graph.
pub struct SceneGraph {
    nodes: HashMap<SceneNodeId, SceneNode>,
    root: SceneNodeId,
    next_id: u64,
    edit_links: Vec<EditVisibilityLink>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph with an empty root group node.
    pub fn new() -> Self {
        let root = SceneNodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, SceneNode::new(root, "root", NodeContent::Group));

        Self {
            nodes,
            root,
            next_id: 1,
            edit_links: Vec::new(),
        }
    }

    /// The root node id.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    /// Add a node under `parent` and return its id.
    ///
    /// An unknown parent falls back to the root rather than failing; the
    /// graph never dangles.
    pub fn add_child(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        content: NodeContent,
    ) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;

        let parent = if self.nodes.contains_key(&parent) {
            parent
        } else {
            self.root
        };

        let mut node = SceneNode::new(id, name, content);
        node.parent = Some(parent);
        self.nodes.insert(id, node);

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        id
    }

    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: SceneNodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: SceneNodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Total node count, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Number of direct children under a node.
    pub fn child_count(&self, id: SceneNodeId) -> usize {
        self.nodes.get(&id).map(|n| n.children.len()).unwrap_or(0)
    }

    /// Remove a node and its entire subtree.
    ///
    /// Subscriptions watching any removed node are dropped with it.
    pub fn remove_subtree(&mut self, id: SceneNodeId) {
        if id == self.root {
            self.clear_children(self.root);
            return;
        }

        let mut removed = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.iter().copied());
                if removed.insert(current) && current == id {
                    if let Some(parent) = node.parent {
                        if let Some(parent_node) = self.nodes.get_mut(&parent) {
                            parent_node.children.retain(|&c| c != current);
                        }
                    }
                }
            }
        }

        self.edit_links.retain(|link| {
            !removed.contains(&link.helper) && !link.watched.iter().any(|w| removed.contains(w))
        });
    }

    /// Remove all children of a node (used on scene reset).
    pub fn clear_children(&mut self, id: SceneNodeId) {
        let children: Vec<SceneNodeId> = self
            .nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default();

        for child in children {
            self.remove_subtree(child);
        }
    }

    /// Make `helper`'s visibility follow the edit state of `watched` nodes.
    pub fn subscribe_edit_visibility(&mut self, watched: &[SceneNodeId], helper: SceneNodeId) {
        self.edit_links.push(EditVisibilityLink {
            watched: watched.to_vec(),
            helper,
        });
        self.refresh_edit_visibility();
    }

    /// Replace a node's active edit-transform set and re-evaluate every
    /// subscription. Called by the gesture layer as manipulation starts,
    /// changes, and ends.
    pub fn set_editing(&mut self, id: SceneNodeId, edits: HashSet<EditTransform>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.active_edits = edits;
        }
        self.refresh_edit_visibility();
    }

    fn refresh_edit_visibility(&mut self) {
        let links = self.edit_links.clone();
        for link in links {
            let editing = link
                .watched
                .iter()
                .filter_map(|id| self.nodes.get(id))
                .any(|node| node.is_editing());

            if let Some(helper) = self.nodes.get_mut(&link.helper) {
                if helper.visible != editing {
                    log::trace!(
                        "bounding helper {:?} now {}",
                        link.helper,
                        if editing { "visible" } else { "hidden" }
                    );
                }
                helper.visible = editing;
            }
        }
    }
}
