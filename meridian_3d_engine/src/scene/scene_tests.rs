/// Tests for Scene
///
/// These tests validate node lifecycle via SlotMap keys, parent/child
/// links in both notify modes, cycle rejection, world matrix propagation,
/// and traversal order.

use super::*;
use crate::error::Error;
use crate::scene::Transform;
use glam::{Mat4, Quat, Vec3};

// ============================================================================
// Helper Functions
// ============================================================================

fn chain(scene: &mut Scene, len: usize) -> Vec<NodeKey> {
    let mut keys = Vec::new();
    for i in 0..len {
        let key = scene.create_node(format!("n{}", i));
        if let Some(&parent) = keys.last() {
            scene.set_parent(key, Some(parent), true).unwrap();
        }
        keys.push(key);
    }
    keys
}

fn set_trs(scene: &mut Scene, key: NodeKey, t: Vec3, r: Quat, s: Vec3) {
    let transform: &mut Transform = scene.node_mut(key).unwrap().transform_mut();
    transform.set_position(t);
    transform.set_rotation(r);
    transform.set_scale(s);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_create_node_is_detached() {
    let mut scene = Scene::new();
    let key = scene.create_node("group");
    assert!(scene.contains(key));
    assert_eq!(scene.node(key).unwrap().name(), "group");
    assert!(scene.parent(key).is_none());
    assert!(scene.children(key).is_empty());
    assert!(!scene.node(key).unwrap().is_mesh());
}

#[test]
fn test_destroy_node_removes_subtree_and_unlinks() {
    let mut scene = Scene::new();
    let keys = chain(&mut scene, 4);
    let sibling = scene.create_node("sibling");
    scene.add_child(keys[0], sibling, true).unwrap();

    let destroyed = scene.destroy_node(keys[1]).unwrap();
    assert_eq!(destroyed, 3);
    assert_eq!(scene.len(), 2);
    assert_eq!(scene.children(keys[0]), &[sibling]);
    assert!(!scene.contains(keys[3]));
}

#[test]
fn test_stale_key_reports_node_not_found() {
    let mut scene = Scene::new();
    let key = scene.create_node("gone");
    let other = scene.create_node("other");
    scene.destroy_node(key).unwrap();
    assert!(matches!(scene.set_parent(key, Some(other), true), Err(Error::NodeNotFound(_))));
    assert!(matches!(scene.update_world_matrix(key, false), Err(Error::NodeNotFound(_))));
}

// ============================================================================
// Hierarchy links
// ============================================================================

#[test]
fn test_set_parent_links_both_sides() {
    let mut scene = Scene::new();
    let parent = scene.create_node("parent");
    let child = scene.create_node("child");
    scene.set_parent(child, Some(parent), true).unwrap();

    assert_eq!(scene.parent(child), Some(parent));
    assert_eq!(scene.children(parent), &[child]);
}

#[test]
fn test_set_parent_moves_between_parents() {
    let mut scene = Scene::new();
    let a = scene.create_node("a");
    let b = scene.create_node("b");
    let child = scene.create_node("child");

    scene.set_parent(child, Some(a), true).unwrap();
    scene.set_parent(child, Some(b), true).unwrap();

    assert!(scene.children(a).is_empty());
    assert_eq!(scene.children(b), &[child]);
    assert_eq!(scene.parent(child), Some(b));
}

#[test]
fn test_set_parent_without_notify_leaves_children_untouched() {
    let mut scene = Scene::new();
    let parent = scene.create_node("parent");
    let child = scene.create_node("child");
    scene.set_parent(child, Some(parent), false).unwrap();

    assert_eq!(scene.parent(child), Some(parent));
    assert!(scene.children(parent).is_empty());
}

#[test]
fn test_add_child_appends_once_and_sets_parent() {
    let mut scene = Scene::new();
    let parent = scene.create_node("parent");
    let first = scene.create_node("first");
    let second = scene.create_node("second");

    scene.add_child(parent, first, true).unwrap();
    scene.add_child(parent, second, true).unwrap();
    scene.add_child(parent, first, true).unwrap();

    assert_eq!(scene.children(parent), &[first, second]);
    assert_eq!(scene.parent(first), Some(parent));
}

#[test]
fn test_add_child_without_notify_keeps_child_parent() {
    let mut scene = Scene::new();
    let parent = scene.create_node("parent");
    let child = scene.create_node("child");
    scene.add_child(parent, child, false).unwrap();
    assert_eq!(scene.children(parent), &[child]);
    assert!(scene.parent(child).is_none());
}

#[test]
fn test_remove_child_orphans_subtree_intact() {
    let mut scene = Scene::new();
    let keys = chain(&mut scene, 3);
    scene.remove_child(keys[0], keys[1], true).unwrap();

    assert!(scene.children(keys[0]).is_empty());
    assert!(scene.parent(keys[1]).is_none());
    assert_eq!(scene.children(keys[1]), &[keys[2]], "grandchild stays attached");
    assert_eq!(scene.root_of(keys[2]), keys[1]);
}

#[test]
fn test_set_parent_none_detaches() {
    let mut scene = Scene::new();
    let keys = chain(&mut scene, 2);
    scene.set_parent(keys[1], None, true).unwrap();
    assert!(scene.parent(keys[1]).is_none());
    assert!(scene.children(keys[0]).is_empty());
}

#[test]
fn test_cycle_is_rejected() {
    let mut scene = Scene::new();
    let keys = chain(&mut scene, 3);

    let err = scene.set_parent(keys[0], Some(keys[2]), true).unwrap_err();
    assert!(matches!(err, Error::InvalidHierarchy(_)));
    let err = scene.add_child(keys[2], keys[0], true).unwrap_err();
    assert!(matches!(err, Error::InvalidHierarchy(_)));
    let err = scene.set_parent(keys[1], Some(keys[1]), true).unwrap_err();
    assert!(matches!(err, Error::InvalidHierarchy(_)));

    // Graph unchanged
    assert!(scene.parent(keys[0]).is_none());
    assert_eq!(scene.children(keys[2]), &[] as &[NodeKey]);
}

#[test]
fn test_cycle_through_children_only_links_is_rejected() {
    let mut scene = Scene::new();
    let a = scene.create_node("a");
    let b = scene.create_node("b");
    let c = scene.create_node("c");

    // Children-side links only: no parent back-links are written
    scene.add_child(a, b, false).unwrap();
    scene.add_child(b, c, false).unwrap();

    let err = scene.add_child(b, a, false).unwrap_err();
    assert!(matches!(err, Error::InvalidHierarchy(_)));
    let err = scene.add_child(c, a, false).unwrap_err();
    assert!(matches!(err, Error::InvalidHierarchy(_)));
    let err = scene.set_parent(a, Some(c), false).unwrap_err();
    assert!(matches!(err, Error::InvalidHierarchy(_)));

    assert!(scene.children(b).iter().all(|&k| k != a));
    assert!(scene.children(c).is_empty());

    // Traversal terminates and visits each node once
    let mut visits = 0;
    scene.traverse(a, |_, _| {
        visits += 1;
        Traversal::Continue
    });
    assert_eq!(visits, 3);
}

#[test]
fn test_is_ancestor() {
    let mut scene = Scene::new();
    let keys = chain(&mut scene, 3);
    assert!(scene.is_ancestor(keys[0], keys[2]));
    assert!(!scene.is_ancestor(keys[2], keys[0]));
    assert!(!scene.is_ancestor(keys[1], keys[1]));
}

// ============================================================================
// World matrix propagation
// ============================================================================

#[test]
fn test_world_matrix_is_product_of_ancestor_locals() {
    let mut scene = Scene::new();
    let keys = chain(&mut scene, 5);
    for (i, &key) in keys.iter().enumerate() {
        let f = i as f32 + 1.0;
        set_trs(
            &mut scene,
            key,
            Vec3::new(f, -0.5 * f, 0.25 * f),
            Quat::from_rotation_y(0.3 * f) * Quat::from_rotation_x(0.1 * f),
            Vec3::new(1.0 + 0.1 * f, 1.0, 1.0 - 0.05 * f),
        );
    }

    scene.update_world_matrix(keys[0], false).unwrap();

    let mut expected = Mat4::IDENTITY;
    for &key in &keys {
        let node = scene.node(key).unwrap();
        expected = expected * *node.transform().local_matrix();
        assert!(node.transform().world_matrix().abs_diff_eq(expected, 1e-4));
    }
}

#[test]
fn test_ancestor_change_forces_descendants() {
    let mut scene = Scene::new();
    let keys = chain(&mut scene, 3);
    scene.update_world_matrix(keys[0], false).unwrap();

    // Only the root moves; grandchild's local is untouched.
    scene.node_mut(keys[0]).unwrap().transform_mut().set_position(Vec3::new(0.0, 10.0, 0.0));
    scene.update_world_matrix(keys[0], false).unwrap();

    assert_eq!(scene.world_position(keys[2]), Some(Vec3::new(0.0, 10.0, 0.0)));
}

#[test]
fn test_reparent_recomputes_world() {
    let mut scene = Scene::new();
    let a = scene.create_node("a");
    let b = scene.create_node("b");
    let child = scene.create_node("child");
    scene.node_mut(a).unwrap().transform_mut().set_position(Vec3::X);
    scene.node_mut(b).unwrap().transform_mut().set_position(Vec3::Y);
    scene.update_world_matrix(a, false).unwrap();
    scene.update_world_matrix(b, false).unwrap();

    scene.set_parent(child, Some(a), true).unwrap();
    scene.update_world_matrix(a, false).unwrap();
    assert_eq!(scene.world_position(child), Some(Vec3::X));

    scene.set_parent(child, Some(b), true).unwrap();
    scene.update_world_matrix(b, false).unwrap();
    assert_eq!(scene.world_position(child), Some(Vec3::Y));
}

#[test]
fn test_subtree_update_uses_parent_world() {
    let mut scene = Scene::new();
    let keys = chain(&mut scene, 2);
    scene.node_mut(keys[0]).unwrap().transform_mut().set_position(Vec3::new(3.0, 0.0, 0.0));
    scene.update_world_matrix(keys[0], false).unwrap();

    scene.node_mut(keys[1]).unwrap().transform_mut().set_position(Vec3::new(0.0, 1.0, 0.0));
    scene.update_world_matrix(keys[1], false).unwrap();
    assert_eq!(scene.world_position(keys[1]), Some(Vec3::new(3.0, 1.0, 0.0)));
}

// ============================================================================
// Traversal
// ============================================================================

fn tree(scene: &mut Scene) -> (NodeKey, NodeKey, NodeKey, NodeKey, NodeKey) {
    // root -> (a -> (a1), b -> (b1))
    let root = scene.create_node("root");
    let a = scene.create_node("a");
    let a1 = scene.create_node("a1");
    let b = scene.create_node("b");
    let b1 = scene.create_node("b1");
    scene.add_child(root, a, true).unwrap();
    scene.add_child(a, a1, true).unwrap();
    scene.add_child(root, b, true).unwrap();
    scene.add_child(b, b1, true).unwrap();
    (root, a, a1, b, b1)
}

#[test]
fn test_traverse_is_preorder_depth_first() {
    let mut scene = Scene::new();
    let (root, a, a1, b, b1) = tree(&mut scene);

    let mut visited = Vec::new();
    scene.traverse(root, |key, _| {
        visited.push(key);
        Traversal::Continue
    });
    assert_eq!(visited, vec![root, a, a1, b, b1]);
}

#[test]
fn test_traverse_skip_children_keeps_siblings() {
    let mut scene = Scene::new();
    let (root, a, _a1, b, b1) = tree(&mut scene);

    let mut visited = Vec::new();
    scene.traverse(root, |key, _| {
        visited.push(key);
        if key == a { Traversal::SkipChildren } else { Traversal::Continue }
    });
    assert_eq!(visited, vec![root, a, b, b1]);
}

#[test]
fn test_traverse_mut_can_toggle_visibility() {
    let mut scene = Scene::new();
    let (root, ..) = tree(&mut scene);
    scene.traverse_mut(root, |_, node| {
        node.set_visible(false);
        Traversal::Continue
    });
    assert!(scene.iter().all(|(_, node)| !node.visible()));
}
