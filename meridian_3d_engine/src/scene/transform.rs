//! Local/world spatial state of a scene node.
//!
//! A `Transform` holds position / rotation / scale, the local matrix
//! composed from them, and the world matrix produced by the hierarchy pass.
//! Parent/child links are NOT stored here: the `Scene` arena owns those,
//! which lets a `Camera` embed a `Transform` without being a scene node.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Spatial state: TRS, local matrix, world matrix and dirty tracking.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    up: Vec3,
    local_matrix: Mat4,
    world_matrix: Mat4,
    /// When false, `local_matrix` is only rebuilt by `update_local_matrix()`.
    matrix_auto_update: bool,
    local_dirty: bool,
    world_dirty: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            up: Vec3::Y,
            local_matrix: Mat4::IDENTITY,
            world_matrix: Mat4::IDENTITY,
            matrix_auto_update: true,
            local_dirty: false,
            world_dirty: true,
        }
    }
}

impl Transform {
    /// Identity transform
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: initial position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Builder: initial rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Builder: initial scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    // ===== GETTERS =====

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Up vector used by `look_at`
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Local matrix as of the last hierarchy pass
    pub fn local_matrix(&self) -> &Mat4 {
        &self.local_matrix
    }

    /// World matrix as of the last hierarchy pass
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    /// Translation part of the world matrix
    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.w_axis.truncate()
    }

    /// Rotation as XYZ Euler angles (radians)
    pub fn rotation_euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// True when a TRS change has not been folded into the local matrix yet
    pub fn needs_update(&self) -> bool {
        self.local_dirty || self.world_dirty
    }

    pub fn matrix_auto_update(&self) -> bool {
        self.matrix_auto_update
    }

    // ===== SETTERS (mark dirty, compute nothing) =====

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.local_dirty = true;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation.normalize();
        self.local_dirty = true;
    }

    /// Set rotation from XYZ Euler angles (radians)
    pub fn set_rotation_euler(&mut self, euler: Vec3) {
        self.set_rotation(Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z));
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.local_dirty = true;
    }

    /// Uniform scale shortcut
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.set_scale(Vec3::splat(scale));
    }

    /// Move by `offset` in parent space
    pub fn translate(&mut self, offset: Vec3) {
        self.set_position(self.position + offset);
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
    }

    pub fn set_matrix_auto_update(&mut self, enabled: bool) {
        self.matrix_auto_update = enabled;
    }

    /// Assign the local matrix directly and decompose it back into TRS.
    pub fn set_local_matrix(&mut self, matrix: Mat4) {
        self.local_matrix = matrix;
        self.decompose();
        self.local_dirty = false;
        self.world_dirty = true;
    }

    /// Refresh position/rotation/scale from the current local matrix
    pub fn decompose(&mut self) {
        let (scale, rotation, translation) = self.local_matrix.to_scale_rotation_translation();
        self.scale = scale;
        self.rotation = rotation;
        self.position = translation;
    }

    /// Force the world matrix to be recomputed on the next pass
    pub fn mark_world_dirty(&mut self) {
        self.world_dirty = true;
    }

    /// Orient toward `target`.
    ///
    /// With `invert == false` the local +Z axis faces the target (objects);
    /// with `invert == true` the local -Z axis faces it (cameras).
    pub fn look_at(&mut self, target: Vec3, invert: bool) {
        let (eye, center) = if invert {
            (self.position, target)
        } else {
            (target, self.position)
        };
        self.set_rotation(look_rotation(eye, center, self.up));
    }

    // ===== MATRIX UPDATES =====

    /// Compose the local matrix from TRS and mark the world matrix stale
    pub fn update_local_matrix(&mut self) {
        self.local_matrix = Mat4::from_scale_rotation_translation(
            self.scale, self.rotation, self.position,
        );
        self.local_dirty = false;
        self.world_dirty = true;
    }

    /// Recompute the world matrix from the parent's world matrix.
    ///
    /// The local matrix is rebuilt only when TRS changed (or `force`).
    /// Returns true when the world matrix was rewritten, meaning every
    /// descendant must be updated with `force = true`.
    pub fn update_world_matrix(&mut self, parent_world: Option<&Mat4>, force: bool) -> bool {
        if self.matrix_auto_update && (self.local_dirty || force) {
            self.update_local_matrix();
        }
        if !(self.world_dirty || force) {
            return false;
        }
        self.world_matrix = match parent_world {
            Some(parent) => *parent * self.local_matrix,
            None => self.local_matrix,
        };
        self.world_dirty = false;
        true
    }
}

/// Largest axis scale of an affine matrix (length of the longest basis column)
pub fn max_scale_on_axis(matrix: &Mat4) -> f32 {
    let x = matrix.x_axis.truncate().length_squared();
    let y = matrix.y_axis.truncate().length_squared();
    let z = matrix.z_axis.truncate().length_squared();
    x.max(y).max(z).sqrt()
}

/// Inverse of `matrix`, or `None` when it is singular or not finite
pub fn try_inverse(matrix: &Mat4) -> Option<Mat4> {
    let det = matrix.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inverse = matrix.inverse();
    inverse.is_finite().then_some(inverse)
}

/// Rotation whose +Z axis points from `center` toward `eye`.
fn look_rotation(eye: Vec3, center: Vec3, up: Vec3) -> Quat {
    let mut z = eye - center;
    if z.length_squared() == 0.0 {
        z = Vec3::Z;
    }
    z = z.normalize();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        // up is parallel to z: nudge z so the cross product is defined
        if up.z.abs() == 1.0 {
            z.x += 0.0001;
        } else {
            z.z += 0.0001;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    x = x.normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
