//! Camera module - projection, view matrices and frustum culling.
//!
//! Cameras are plain values owned by the caller, not scene nodes.

mod camera;
mod frustum;

pub use camera::{Camera, CameraConfig, Projection, MIN_ASPECT};
pub use frustum::{
    Frustum, Plane,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
