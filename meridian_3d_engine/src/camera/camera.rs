/// Camera - a Transform plus a projection and the derived view data.
///
/// The camera is not a scene node; it owns its own `Transform`. It may
/// follow a scene node by naming it as its parent (`set_parent_node`),
/// in which case the renderer feeds that node's world matrix in.
///
/// Derived matrices are refreshed by `update_projection_matrix` and
/// `update_matrix_world`. Frustum planes are NOT: call `update_frustum`
/// after any matrix change that culling should see.

use glam::{Mat4, Vec3};
use crate::error::Result;
use crate::engine_err;
use crate::engine_warn;
use crate::scene::{Node, NodeKey, Transform, max_scale_on_axis, try_inverse};
use super::frustum::Frustum;

const SOURCE: &str = "meridian3d::Camera";

/// Smallest accepted aspect ratio
pub const MIN_ASPECT: f32 = 1e-6;

/// Field of view limits in degrees (exclusive of 0 and 180)
const MIN_FOV: f32 = 1e-3;
const MAX_FOV: f32 = 179.0;

/// Projection kind and its shape parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Vertical field of view in degrees
    Perspective { fov: f32, aspect: f32 },
    /// View volume bounds, divided by the camera zoom
    Orthographic { left: f32, right: f32, bottom: f32, top: f32 },
}

/// Camera creation parameters
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub near: f32,
    pub far: f32,
    /// Vertical field of view in degrees (perspective only)
    pub fov: f32,
    pub aspect: f32,
    /// Setting any of the four bounds makes the camera orthographic
    pub left: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub top: Option<f32>,
    pub zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100.0,
            fov: 45.0,
            aspect: 1.0,
            left: None,
            right: None,
            bottom: None,
            top: None,
            zoom: 1.0,
        }
    }
}

/// Perspective or orthographic camera
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Transform,
    parent_node: Option<NodeKey>,
    projection: Projection,
    near: f32,
    far: f32,
    zoom: f32,
    projection_matrix: Mat4,
    view_matrix: Mat4,
    projection_view_matrix: Mat4,
    frustum: Frustum,
}

impl Camera {
    /// Create a camera from a config (orthographic if any bound is set)
    pub fn new(config: CameraConfig) -> Self {
        let orthographic = config.left.is_some()
            || config.right.is_some()
            || config.bottom.is_some()
            || config.top.is_some();

        let projection = if orthographic {
            Projection::Orthographic {
                left: config.left.unwrap_or(-1.0),
                right: config.right.unwrap_or(1.0),
                bottom: config.bottom.unwrap_or(-1.0),
                top: config.top.unwrap_or(1.0),
            }
        } else {
            Projection::Perspective { fov: config.fov, aspect: config.aspect }
        };

        let mut camera = Self {
            transform: Transform::new(),
            parent_node: None,
            projection,
            near: config.near,
            far: config.far,
            zoom: config.zoom,
            projection_matrix: Mat4::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_view_matrix: Mat4::IDENTITY,
            frustum: Frustum::default(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Perspective camera (`fov` in degrees)
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::new(CameraConfig { fov, aspect, near, far, ..Default::default() })
    }

    /// Orthographic camera
    pub fn orthographic(
        left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32, zoom: f32,
    ) -> Self {
        Self::new(CameraConfig {
            left: Some(left),
            right: Some(right),
            bottom: Some(bottom),
            top: Some(top),
            near,
            far,
            zoom,
            ..Default::default()
        })
    }

    // ===== GETTERS =====

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    /// World-space position as of the last `update_matrix_world`
    pub fn world_position(&self) -> Vec3 {
        self.transform.world_position()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Vertical field of view in degrees, `None` for orthographic cameras
    pub fn fov(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { fov, .. } => Some(fov),
            Projection::Orthographic { .. } => None,
        }
    }

    pub fn aspect(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { aspect, .. } => Some(aspect),
            Projection::Orthographic { .. } => None,
        }
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Inverse of the camera's world matrix
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// `projection * view`
    pub fn projection_view_matrix(&self) -> &Mat4 {
        &self.projection_view_matrix
    }

    /// Frustum as of the last `update_frustum`
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Scene node this camera follows, if any
    pub fn parent_node(&self) -> Option<NodeKey> {
        self.parent_node
    }

    // ===== SETTERS =====

    /// Follow a scene node's world matrix (or stop following with `None`)
    pub fn set_parent_node(&mut self, parent: Option<NodeKey>) {
        self.parent_node = parent;
        self.transform.mark_world_dirty();
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.set_position(position);
    }

    /// Point the camera's -Z axis at `target`
    pub fn look_at(&mut self, target: Vec3) {
        self.transform.look_at(target, true);
    }

    /// Switch to (or update) a perspective projection
    pub fn set_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Projection::Perspective { fov, aspect };
        self.near = near;
        self.far = far;
        self.update_projection_matrix();
    }

    /// Switch to (or update) an orthographic projection
    pub fn set_orthographic(
        &mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32, zoom: f32,
    ) {
        self.projection = Projection::Orthographic { left, right, bottom, top };
        self.near = near;
        self.far = far;
        self.zoom = zoom;
        self.update_projection_matrix();
    }

    /// Replace the orthographic bounds (no effect on a perspective camera)
    pub fn set_orthographic_bounds(&mut self, left: f32, right: f32, bottom: f32, top: f32) {
        if let Projection::Orthographic { .. } = self.projection {
            self.projection = Projection::Orthographic { left, right, bottom, top };
            self.update_projection_matrix();
        }
    }

    /// Change the aspect ratio (no effect on an orthographic camera)
    pub fn set_aspect(&mut self, aspect: f32) {
        if let Projection::Perspective { fov, .. } = self.projection {
            self.projection = Projection::Perspective { fov, aspect };
            self.update_projection_matrix();
        }
    }

    /// Change the vertical field of view in degrees (perspective only)
    pub fn set_fov(&mut self, fov: f32) {
        if let Projection::Perspective { aspect, .. } = self.projection {
            self.projection = Projection::Perspective { fov, aspect };
            self.update_projection_matrix();
        }
    }

    /// Change the zoom factor (orthographic bounds are divided by it)
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
        self.update_projection_matrix();
    }

    pub fn set_near_far(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.update_projection_matrix();
    }

    // ===== MATRICES =====

    /// Rebuild the projection matrix from the current parameters.
    ///
    /// Degenerate parameters are replaced by safe values (logged at WARN).
    pub fn update_projection_matrix(&mut self) {
        self.sanitize();
        self.projection_matrix = match self.projection {
            Projection::Perspective { fov, aspect } => {
                Mat4::perspective_rh_gl(fov.to_radians(), aspect, self.near, self.far)
            }
            Projection::Orthographic { left, right, bottom, top } => Mat4::orthographic_rh_gl(
                left / self.zoom,
                right / self.zoom,
                bottom / self.zoom,
                top / self.zoom,
                self.near,
                self.far,
            ),
        };
        self.projection_view_matrix = self.projection_matrix * self.view_matrix;
    }

    /// Recompute the world, view and projection-view matrices (no parent)
    pub fn update_matrix_world(&mut self) -> Result<()> {
        self.update_matrix_world_with_parent(None, false)
    }

    /// Recompute the world matrix under `parent_world`, then the view matrix.
    ///
    /// # Errors
    ///
    /// `DegenerateTransform` if the world matrix cannot be inverted
    /// (e.g. a zero scale); the previous view matrix is kept.
    pub fn update_matrix_world_with_parent(
        &mut self,
        parent_world: Option<&Mat4>,
        force: bool,
    ) -> Result<()> {
        self.transform.update_world_matrix(parent_world, force);
        let world = *self.transform.world_matrix();
        self.view_matrix = try_inverse(&world).ok_or_else(|| {
            engine_err!(DegenerateTransform, SOURCE, "camera world matrix is not invertible")
        })?;
        self.projection_view_matrix = self.projection_matrix * self.view_matrix;
        Ok(())
    }

    /// Inverse of the projection-view matrix (NDC → world)
    pub fn projection_view_inverse(&self) -> Result<Mat4> {
        try_inverse(&self.projection_view_matrix).ok_or_else(|| {
            engine_err!(DegenerateTransform, SOURCE, "projection-view matrix is not invertible")
        })
    }

    /// World point → normalized device coordinates
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.projection_view_matrix.project_point3(world)
    }

    /// Normalized device coordinates → world point
    pub fn unproject(&self, ndc: Vec3) -> Result<Vec3> {
        Ok(self.projection_view_inverse()?.project_point3(ndc))
    }

    // ===== FRUSTUM =====

    /// Re-extract the six frustum planes from `projection_view_matrix`
    pub fn update_frustum(&mut self) {
        self.frustum = Frustum::from_projection_view(&self.projection_view_matrix);
    }

    /// Sphere against the last extracted frustum (conservative)
    pub fn frustum_intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.frustum.intersects_sphere(center, radius)
    }

    /// Test a mesh node's bounding sphere against the frustum.
    ///
    /// The sphere center is moved by `world_matrix` (or the node's own world
    /// matrix) and the radius is scaled by that matrix's largest axis scale.
    /// Nodes without a mesh or without computable bounds are reported
    /// visible.
    pub fn frustum_intersects_mesh(&self, node: &Node, world_matrix: Option<&Mat4>) -> bool {
        let Some(bounds) = node.mesh().and_then(|mesh| mesh.geometry().bounds()) else {
            return true;
        };
        let world = world_matrix.unwrap_or(node.transform().world_matrix());
        let center = world.transform_point3(bounds.center);
        let radius = bounds.radius * max_scale_on_axis(world);
        self.frustum_intersects_sphere(center, radius)
    }

    fn sanitize(&mut self) {
        match &mut self.projection {
            Projection::Perspective { fov, aspect } => {
                if !(*aspect > 0.0) || !aspect.is_finite() {
                    engine_warn!(SOURCE, "aspect {} is invalid, using {}", aspect, MIN_ASPECT);
                    *aspect = MIN_ASPECT;
                }
                if !(MIN_FOV..=MAX_FOV).contains(fov) {
                    let fixed = if fov.is_finite() { fov.clamp(MIN_FOV, MAX_FOV) } else { 45.0 };
                    engine_warn!(SOURCE, "fov {} is out of range, using {}", fov, fixed);
                    *fov = fixed;
                }
                if !(self.near > 0.0) || !self.near.is_finite() {
                    engine_warn!(SOURCE, "perspective near {} must be positive, using 0.1", self.near);
                    self.near = 0.1;
                }
            }
            Projection::Orthographic { left, right, bottom, top } => {
                if !((*right - *left).abs() > f32::EPSILON) {
                    engine_warn!(SOURCE, "orthographic width is zero, widening by 1");
                    *left -= 0.5;
                    *right += 0.5;
                }
                if !((*top - *bottom).abs() > f32::EPSILON) {
                    engine_warn!(SOURCE, "orthographic height is zero, widening by 1");
                    *bottom -= 0.5;
                    *top += 0.5;
                }
                if !self.near.is_finite() {
                    engine_warn!(SOURCE, "orthographic near {} is invalid, using 0.1", self.near);
                    self.near = 0.1;
                }
            }
        }

        if !(self.zoom > 0.0) || !self.zoom.is_finite() {
            engine_warn!(SOURCE, "zoom {} must be positive, using 1", self.zoom);
            self.zoom = 1.0;
        }
        if !(self.far > self.near) || !self.far.is_finite() {
            let far = self.near + 100.0;
            engine_warn!(SOURCE, "far {} must exceed near {}, using {}", self.far, self.near, far);
            self.far = far;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
