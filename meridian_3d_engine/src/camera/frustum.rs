/// Frustum - six clipping planes for visibility culling.
///
/// Each plane stores an inward-pointing unit normal and a constant, so a
/// point P is on the visible side when `normal · P + constant >= 0`.
///
/// Planes are extracted from a projection-view matrix built with the GL
/// clip convention (NDC z in [-1, 1]).

use glam::{Mat4, Vec3, Vec4};

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// A plane `normal · p + constant = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    pub fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Build from (A, B, C, D) and normalize so |(A, B, C)| = 1
    fn from_row(row: Vec4) -> Self {
        let normal = row.truncate();
        let len = normal.length();
        if len > 0.0 {
            Self { normal: normal / len, constant: row.w / len }
        } else {
            Self { normal, constant: row.w }
        }
    }

    /// Signed distance (positive on the normal side)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self { normal: Vec3::Y, constant: 0.0 }
    }
}

/// Six frustum planes: left, right, bottom, top, near, far.
///
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract frustum planes from a projection-view matrix.
    ///
    /// Uses the Gribb & Hartmann method on the matrix rows.
    pub fn from_projection_view(pv: &Mat4) -> Self {
        let row0 = pv.row(0);
        let row1 = pv.row(1);
        let row2 = pv.row(2);
        let row3 = pv.row(3);

        Self {
            planes: [
                Plane::from_row(row3 + row0),
                Plane::from_row(row3 - row0),
                Plane::from_row(row3 + row1),
                Plane::from_row(row3 - row1),
                Plane::from_row(row3 + row2),
                Plane::from_row(row3 - row2),
            ],
        }
    }

    /// Conservative sphere test.
    ///
    /// Returns false only when the sphere lies entirely behind one plane.
    /// Spheres near frustum corners may be reported visible.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
