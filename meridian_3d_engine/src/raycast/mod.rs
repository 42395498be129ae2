//! Raycast module
//!
//! `Ray` with the analytic sphere, box, plane and triangle tests, and the
//! `Raycaster` that picks scene meshes by bounds or by triangles.

mod ray;
mod raycaster;

pub use ray::{barycoord, intersect_box, intersect_plane, intersect_sphere, intersect_triangle, Ray};
pub use raycaster::{IntersectOptions, RaycastHit, Raycaster};
