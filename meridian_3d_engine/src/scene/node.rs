/// Scene node - a Transform plus hierarchy links and an optional Mesh.
///
/// Nodes live in the `Scene` slot map and are addressed by `NodeKey`.
/// `parent` is a plain key (non-owning back-reference); `children` is the
/// ordered list the parent owns. Hierarchy edits go through `Scene` so the
/// two sides of a link stay consistent.

use slotmap::new_key_type;
use crate::resource::Mesh;
use super::transform::Transform;

new_key_type! {
    /// Stable key for a node within a Scene.
    ///
    /// Keys remain valid while other nodes are created or removed; a key
    /// becomes invalid only when its own node is removed.
    pub struct NodeKey;
}

/// A node of the scene graph
#[derive(Debug)]
pub struct Node {
    name: String,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    transform: Transform,
    visible: bool,
    mesh: Option<Mesh>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>, mesh: Option<Mesh>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            mesh,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Parent key, `None` for a root or detached node
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Children in draw/traversal order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// App-level visibility. A hidden node hides its whole subtree.
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn mesh_mut(&mut self) -> Option<&mut Mesh> {
        self.mesh.as_mut()
    }

    /// Attach or replace the drawable payload
    pub fn set_mesh(&mut self, mesh: Option<Mesh>) {
        self.mesh = mesh;
    }

    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }
}
