//! Scene graph module
//!
//! Provides the spatial `Transform`, the `Node` arena entry, and the
//! `Scene` that owns nodes and their parent/child links.

mod node;
mod scene;
mod transform;

pub use node::{Node, NodeKey};
pub use scene::{Scene, Traversal};
pub use transform::{Transform, max_scale_on_axis, try_inverse};
