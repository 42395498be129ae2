/// Render list - the flat, ordered draw sequence built once per frame.
///
/// Building the list walks the scene from a root, skips hidden subtrees,
/// frustum-culls mesh nodes against the camera, and partitions the
/// survivors into three queues drawn in order: opaque, transparent (depth
/// tested), and overlay (transparent without depth test).

use std::cmp::Ordering;
use crate::camera::Camera;
use crate::resource::ProgramId;
use crate::scene::{NodeKey, Scene, Traversal};

/// Queue a render item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderQueue {
    Opaque,
    Transparent,
    Overlay,
}

/// One mesh node scheduled for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub node: NodeKey,
    pub program_id: ProgramId,
    pub render_order: i32,
    /// View-space depth (distance in front of the camera along its -Z)
    pub depth: f32,
    pub queue: RenderQueue,
}

/// Per-frame draw list
#[derive(Debug, Clone, Default)]
pub struct RenderList {
    pub opaque: Vec<RenderItem>,
    pub transparent: Vec<RenderItem>,
    pub overlay: Vec<RenderItem>,
    /// Mesh nodes rejected by the frustum test
    pub culled: u32,
}

impl RenderList {
    /// Build the list for `root`.
    ///
    /// Each mesh's `in_frustum` flag is refreshed. Without a camera no
    /// culling happens and every depth is 0.
    pub fn build(
        scene: &mut Scene,
        root: NodeKey,
        camera: Option<&Camera>,
        frustum_cull: bool,
        sort: bool,
    ) -> Self {
        let mut list = Self::default();

        scene.traverse_mut(root, |key, node| {
            if !node.visible() {
                return Traversal::SkipChildren;
            }

            let world = *node.transform().world_matrix();
            let culled = match camera {
                Some(camera) if frustum_cull && node.mesh().is_some_and(|m| m.frustum_culled()) => {
                    !camera.frustum_intersects_mesh(node, Some(&world))
                }
                _ => false,
            };

            let Some(mesh) = node.mesh_mut() else {
                return Traversal::Continue;
            };
            mesh.set_in_frustum(!culled);
            if culled {
                list.culled += 1;
                return Traversal::Continue;
            }

            let program = mesh.program();
            let depth = camera.map_or(0.0, |camera| {
                -camera.view_matrix().transform_point3(world.w_axis.truncate()).z
            });
            let queue = if !program.transparent() {
                RenderQueue::Opaque
            } else if program.depth_test() {
                RenderQueue::Transparent
            } else {
                RenderQueue::Overlay
            };

            let item = RenderItem {
                node: key,
                program_id: program.id(),
                render_order: mesh.render_order(),
                depth,
                queue,
            };
            match queue {
                RenderQueue::Opaque => list.opaque.push(item),
                RenderQueue::Transparent => list.transparent.push(item),
                RenderQueue::Overlay => list.overlay.push(item),
            }
            Traversal::Continue
        });

        if sort {
            list.sort();
        }
        list
    }

    /// Sort every queue; ties keep traversal order (stable sort).
    ///
    /// - Opaque: render order, then program, then front-to-back
    /// - Transparent: render order, then back-to-front
    /// - Overlay: render order, then program
    pub fn sort(&mut self) {
        self.opaque.sort_by(compare_opaque);
        self.transparent.sort_by(compare_transparent);
        self.overlay.sort_by(compare_overlay);
    }

    /// Items in draw order
    pub fn iter(&self) -> impl Iterator<Item = &RenderItem> {
        self.opaque.iter().chain(&self.transparent).chain(&self.overlay)
    }

    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len() + self.overlay.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn compare_opaque(a: &RenderItem, b: &RenderItem) -> Ordering {
    a.render_order
        .cmp(&b.render_order)
        .then_with(|| a.program_id.cmp(&b.program_id))
        .then_with(|| a.depth.total_cmp(&b.depth))
}

fn compare_transparent(a: &RenderItem, b: &RenderItem) -> Ordering {
    a.render_order
        .cmp(&b.render_order)
        .then_with(|| b.depth.total_cmp(&a.depth))
}

fn compare_overlay(a: &RenderItem, b: &RenderItem) -> Ordering {
    a.render_order
        .cmp(&b.render_order)
        .then_with(|| a.program_id.cmp(&b.program_id))
}

#[cfg(test)]
#[path = "render_list_tests.rs"]
mod tests;
