/// Scene - the node arena and its hierarchy operations.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys. Parent links
/// are keys (non-owning); each node owns its ordered children list.
/// Any node can serve as a traversal/render root; a scene may therefore
/// hold several disjoint trees (e.g. detached or orphaned subtrees).

use glam::{Mat4, Vec3};
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use crate::error::Result;
use crate::{engine_bail, engine_err};
use crate::resource::Mesh;
use super::node::{Node, NodeKey};

const SOURCE: &str = "meridian3d::Scene";

/// Visitor decision for `Scene::traverse`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Visit this node's children next
    Continue,
    /// Skip this node's subtree; siblings are still visited
    SkipChildren,
}

/// A collection of nodes forming one or more trees
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeKey, Node>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self { nodes: SlotMap::with_key() }
    }

    // ===== NODE LIFECYCLE =====

    /// Create a detached, empty node (a group)
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeKey {
        self.nodes.insert(Node::new(name, None))
    }

    /// Create a detached node carrying a mesh
    pub fn create_mesh(&mut self, name: impl Into<String>, mesh: Mesh) -> NodeKey {
        self.nodes.insert(Node::new(name, Some(mesh)))
    }

    /// Destroy a node and its whole subtree.
    ///
    /// The node is first unlinked from its parent. Returns the number of
    /// nodes destroyed.
    pub fn destroy_node(&mut self, key: NodeKey) -> Result<usize> {
        let parent = self.node_ref(key)?.parent;
        if let Some(parent) = parent {
            self.remove_child(parent, key, true)?;
        }

        let mut stack = vec![key];
        let mut destroyed = 0;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                destroyed += 1;
            }
        }
        Ok(destroyed)
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    // ===== ACCESS =====

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Number of nodes in the arena (all trees)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes (arena order, not hierarchy order)
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// Parent of `key`, if attached
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|node| node.parent)
    }

    /// Children of `key` in order (empty for unknown keys)
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Topmost ancestor of `key` (itself when detached)
    pub fn root_of(&self, key: NodeKey) -> NodeKey {
        let mut current = key;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// True if `ancestor` appears on the parent chain of `key`
    pub fn is_ancestor(&self, ancestor: NodeKey, key: NodeKey) -> bool {
        let mut current = self.parent(key);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// World-space position as of the last `update_world_matrix` pass
    pub fn world_position(&self, key: NodeKey) -> Option<Vec3> {
        self.nodes.get(key).map(|node| node.transform().world_position())
    }

    /// World matrix as of the last `update_world_matrix` pass
    pub fn world_matrix(&self, key: NodeKey) -> Option<&Mat4> {
        self.nodes.get(key).map(|node| node.transform().world_matrix())
    }

    fn node_ref(&self, key: NodeKey) -> Result<&Node> {
        self.nodes
            .get(key)
            .ok_or_else(|| engine_err!(NodeNotFound, SOURCE, "node {:?} is not in the scene", key))
    }

    /// True when `target` is below `from` following children lists only.
    ///
    /// Half-links written with `notify == false` never set `parent`, so
    /// `is_ancestor` alone cannot see them.
    fn reaches_through_children(&self, from: NodeKey, target: NodeKey) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack = vec![from];
        while let Some(key) = stack.pop() {
            if !visited.insert(key) {
                continue;
            }
            let Some(node) = self.nodes.get(key) else { continue };
            for &child in &node.children {
                if child == target {
                    return true;
                }
                stack.push(child);
            }
        }
        false
    }

    fn validate_link(&self, parent: NodeKey, child: NodeKey) -> Result<()> {
        self.node_ref(parent)?;
        self.node_ref(child)?;
        if parent == child {
            engine_bail!(InvalidHierarchy, SOURCE, "node {:?} cannot be its own parent", child);
        }
        if self.is_ancestor(child, parent) || self.reaches_through_children(child, parent) {
            engine_bail!(
                InvalidHierarchy, SOURCE,
                "node {:?} cannot become a child of its descendant {:?}", child, parent
            );
        }
        Ok(())
    }

    // ===== HIERARCHY =====

    /// Attach `key` under `parent` (or detach it with `None`).
    ///
    /// Any previous parent drops `key` from its children first. With
    /// `notify_parent == false` the new parent's children list is left
    /// untouched: the caller is performing that half of the link.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if either key is unknown
    /// - `InvalidHierarchy` if `parent` is `key` or one of its descendants
    pub fn set_parent(
        &mut self,
        key: NodeKey,
        parent: Option<NodeKey>,
        notify_parent: bool,
    ) -> Result<()> {
        match parent {
            Some(parent) => self.validate_link(parent, key)?,
            None => {
                self.node_ref(key)?;
            }
        }

        let previous = self.nodes[key].parent;
        if let Some(previous) = previous {
            if Some(previous) != parent {
                self.remove_child(previous, key, false)?;
            }
        }

        let node = &mut self.nodes[key];
        node.parent = parent;
        node.transform_mut().mark_world_dirty();

        if let (true, Some(parent)) = (notify_parent, parent) {
            self.add_child(parent, key, false)?;
        }
        Ok(())
    }

    /// Append `child` to `parent`'s children (no duplicates).
    ///
    /// With `notify_child == true` the child's parent link is updated too,
    /// which also detaches it from any previous parent.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey, notify_child: bool) -> Result<()> {
        self.validate_link(parent, child)?;

        let children = &mut self.nodes[parent].children;
        if !children.contains(&child) {
            children.push(child);
        }

        if notify_child {
            self.set_parent(child, Some(parent), false)?;
        }
        Ok(())
    }

    /// Remove `child` from `parent`'s children.
    ///
    /// The child is detached, not destroyed: its own subtree stays attached
    /// to it. With `notify_child == true` the child's parent link is cleared
    /// (only if it still points at `parent`).
    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey, notify_child: bool) -> Result<()> {
        self.node_ref(child)?;
        let children = &mut self.nodes
            .get_mut(parent)
            .ok_or_else(|| engine_err!(NodeNotFound, SOURCE, "parent {:?} is not in the scene", parent))?
            .children;
        if let Some(index) = children.iter().position(|&c| c == child) {
            children.remove(index);
        }

        if notify_child && self.nodes[child].parent == Some(parent) {
            self.set_parent(child, None, false)?;
        }
        Ok(())
    }

    // ===== MATRICES =====

    /// Recompute world matrices of `root` and its subtree.
    ///
    /// A node rebuilds its local matrix only when its TRS changed, and its
    /// world matrix only when dirty, forced, or when any ancestor's world
    /// matrix was rewritten in this pass. `root` uses its parent's current
    /// world matrix when attached.
    pub fn update_world_matrix(&mut self, root: NodeKey, force: bool) -> Result<()> {
        self.node_ref(root)?;

        let mut stack = vec![(root, force)];
        while let Some((key, force)) = stack.pop() {
            let parent_world = self.nodes[key]
                .parent
                .and_then(|parent| self.nodes.get(parent))
                .map(|parent| *parent.transform().world_matrix());

            let node = &mut self.nodes[key];
            let changed = node.transform_mut().update_world_matrix(parent_world.as_ref(), force);
            let child_force = force || changed;
            stack.extend(node.children.iter().rev().map(|&child| (child, child_force)));
        }
        Ok(())
    }

    // ===== TRAVERSAL =====

    /// Depth-first, pre-order visit of `root` and its subtree.
    ///
    /// Returning `Traversal::SkipChildren` prunes the current subtree only.
    pub fn traverse<F>(&self, root: NodeKey, mut visitor: F)
    where
        F: FnMut(NodeKey, &Node) -> Traversal,
    {
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else { continue };
            if visitor(key, node) == Traversal::Continue {
                stack.extend(node.children.iter().rev());
            }
        }
    }

    /// Mutable variant of `traverse` (visibility toggles, per-frame tweaks).
    pub fn traverse_mut<F>(&mut self, root: NodeKey, mut visitor: F)
    where
        F: FnMut(NodeKey, &mut Node) -> Traversal,
    {
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get_mut(key) else { continue };
            if visitor(key, node) == Traversal::Continue {
                stack.extend(node.children.iter().rev());
            }
        }
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
