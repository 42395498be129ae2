/// Ray and the analytic intersection primitives used by the raycaster.
///
/// Every primitive returns the distance along the ray to the first hit, or
/// `None`. A ray parallel to the tested surface is a miss, even when its
/// origin lies on that surface.

use glam::{Mat4, Vec3};

/// Below this magnitude a denominator is treated as zero (parallel ray)
const PARALLEL_EPSILON: f32 = 1e-8;

/// Half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Default for Ray {
    fn default() -> Self {
        Self { origin: Vec3::ZERO, direction: Vec3::NEG_Z }
    }
}

impl Ray {
    /// Create a ray; `direction` is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray moved by an affine `matrix`.
    ///
    /// Returns the transformed ray (direction renormalized) and the length
    /// the unit direction took in the new space, which converts distances:
    /// `new_space_distance = distance * scale`. `None` if the direction
    /// collapses.
    pub fn transformed(&self, matrix: &Mat4) -> Option<(Ray, f32)> {
        let direction = matrix.transform_vector3(self.direction);
        let scale = direction.length();
        if !(scale > 0.0) || !scale.is_finite() {
            return None;
        }
        Some((
            Ray {
                origin: matrix.transform_point3(self.origin),
                direction: direction / scale,
            },
            scale,
        ))
    }
}

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Ray against a sphere.
///
/// An origin inside the sphere hits at distance 0.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - ray.origin;
    let tca = to_center.dot(ray.direction);
    let d2 = to_center.length_squared() - tca * tca;
    let radius2 = radius * radius;
    if d2 > radius2 {
        return None;
    }

    let thc = (radius2 - d2).sqrt();
    let t0 = tca - thc;
    let t1 = tca + thc;
    if t1 < 0.0 {
        return None;
    }
    Some(t0.max(0.0))
}

/// Ray against an axis-aligned box (slab method).
///
/// An origin inside the box hits at distance 0.
pub fn intersect_box(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];

        if direction.abs() < PARALLEL_EPSILON {
            // Parallel to this slab: inside it or never
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Ray against the plane `dot(normal, p) + constant = 0`
pub fn intersect_plane(ray: &Ray, normal: Vec3, constant: f32) -> Option<f32> {
    let denominator = normal.dot(ray.direction);
    if denominator.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -(ray.origin.dot(normal) + constant) / denominator;
    (t >= 0.0).then_some(t)
}

/// Ray against triangle `abc`.
///
/// The front face is counter-clockwise. With `backface_cull`, hits on the
/// back face are rejected.
pub fn intersect_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3, backface_cull: bool) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let normal = edge1.cross(edge2);

    let mut ddn = ray.direction.dot(normal);
    if ddn.abs() < PARALLEL_EPSILON {
        return None;
    }
    let sign = if ddn > 0.0 {
        if backface_cull {
            return None;
        }
        1.0
    } else {
        ddn = -ddn;
        -1.0
    };

    let diff = ray.origin - a;
    let ddqxe2 = sign * ray.direction.dot(diff.cross(edge2));
    if ddqxe2 < 0.0 {
        return None;
    }
    let dde1xq = sign * ray.direction.dot(edge1.cross(diff));
    if dde1xq < 0.0 {
        return None;
    }
    if ddqxe2 + dde1xq > ddn {
        return None;
    }

    let qdn = -sign * diff.dot(normal);
    if qdn < 0.0 {
        return None;
    }
    Some(qdn / ddn)
}

/// Barycentric weights of `point` for triangle `abc`, in vertex order.
///
/// `None` for a degenerate triangle.
pub fn barycoord(point: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<Vec3> {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = point - a;
    let dot00 = v0.dot(v0);
    let dot01 = v0.dot(v1);
    let dot02 = v0.dot(v2);
    let dot11 = v1.dot(v1);
    let dot12 = v1.dot(v2);

    let denominator = dot00 * dot11 - dot01 * dot01;
    if denominator == 0.0 {
        return None;
    }
    let inv = 1.0 / denominator;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;
    Some(Vec3::new(1.0 - u - v, v, u))
}

#[cfg(test)]
#[path = "ray_tests.rs"]
mod tests;
