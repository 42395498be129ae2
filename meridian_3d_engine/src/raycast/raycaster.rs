/// Raycaster - picking against scene meshes.
///
/// The ray lives in world space. Each candidate mesh is tested in its own
/// local space (ray moved through the inverse world matrix), so geometry
/// data is never transformed. Distances reported in hits are world-space.

use glam::{Mat3, Mat4, Vec2, Vec3};
use crate::camera::Camera;
use crate::error::Result;
use crate::engine_bail;
use crate::resource::{
    Attribute, Bounds, DrawMode, Geometry, Mesh, RaycastShape, ATTRIBUTE_NORMAL, ATTRIBUTE_UV,
};
use crate::scene::{NodeKey, Scene, try_inverse};
use super::ray::{barycoord, intersect_box, intersect_sphere, intersect_triangle, Ray};

const SOURCE: &str = "meridian3d::Raycaster";

/// One intersection, ordered by `distance` in query results
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub node: NodeKey,
    /// World-space distance from the ray origin
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Hit point in the mesh's local space
    pub local_point: Vec3,
    /// World-space geometric normal of the hit triangle
    pub face_normal: Option<Vec3>,
    /// World-space interpolated vertex normal
    pub normal: Option<Vec3>,
    /// Interpolated texture coordinate
    pub uv: Option<Vec2>,
}

/// Options for `Raycaster::intersect_meshes`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectOptions {
    /// Ignore back-facing triangles of meshes whose program culls faces
    pub cull_face: bool,
    /// World-space distance limit
    pub max_distance: Option<f32>,
    pub include_uv: bool,
    pub include_normal: bool,
    /// Reject meshes whose bounding volume the ray misses before testing triangles
    pub use_bounds: bool,
}

impl Default for IntersectOptions {
    fn default() -> Self {
        Self {
            cull_face: true,
            max_distance: None,
            include_uv: true,
            include_normal: true,
            use_bounds: true,
        }
    }
}

/// A ray plus the queries run against it
#[derive(Debug, Clone, Copy, Default)]
pub struct Raycaster {
    ray: Ray,
}

/// Mesh ready for a local-space test
struct Candidate<'a> {
    key: NodeKey,
    mesh: &'a Mesh,
    world: Mat4,
    local_ray: Ray,
    /// Local units per world unit along the ray
    scale: f32,
}

impl Raycaster {
    /// Ray from the origin toward -Z
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ray(ray: Ray) -> Self {
        Self { ray }
    }

    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    pub fn set_ray(&mut self, origin: Vec3, direction: Vec3) {
        self.ray = Ray::new(origin, direction);
    }

    /// Aim the ray through a point in normalized device coordinates.
    ///
    /// The origin is the point on the near plane, the direction runs to the
    /// matching far plane point. Works for both projections.
    ///
    /// # Errors
    ///
    /// `DegenerateTransform` if the projection-view matrix cannot be
    /// inverted or yields no usable direction.
    pub fn cast_mouse(&mut self, camera: &Camera, ndc: Vec2) -> Result<()> {
        let inverse = camera.projection_view_inverse()?;
        let near = inverse.project_point3(ndc.extend(-1.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = far - near;
        if !direction.is_finite() || direction.length_squared() == 0.0 {
            engine_bail!(DegenerateTransform, SOURCE, "cannot build a ray through {:?}", ndc);
        }
        self.ray = Ray::new(near, direction);
        Ok(())
    }

    /// Test the ray against the bounding volume of each node's mesh.
    ///
    /// The volume is the geometry's box or sphere per its `RaycastShape`.
    /// Nodes without a mesh, without bounds, or with a singular world
    /// matrix are skipped. Results are sorted by distance.
    pub fn intersect_bounds(
        &self,
        scene: &Scene,
        nodes: &[NodeKey],
        max_distance: Option<f32>,
    ) -> Vec<RaycastHit> {
        let mut hits: Vec<RaycastHit> = self
            .candidates(scene, nodes)
            .filter_map(|candidate| {
                let bounds = candidate.mesh.geometry().bounds()?;
                let t = intersect_bounds_volume(&candidate.local_ray, candidate.mesh.geometry(), bounds)?;
                if exceeds(t, max_distance, candidate.scale) {
                    return None;
                }
                let local_point = candidate.local_ray.at(t);
                Some(self.hit(&candidate, local_point))
            })
            .collect();
        sort_hits(&mut hits);
        hits
    }

    /// Test the ray against the triangles of each node's mesh.
    ///
    /// Keeps the closest triangle per mesh. Meshes drawn with a non-triangle
    /// mode produce no hits. Results are sorted by distance.
    pub fn intersect_meshes(
        &self,
        scene: &Scene,
        nodes: &[NodeKey],
        options: &IntersectOptions,
    ) -> Vec<RaycastHit> {
        let mut hits: Vec<RaycastHit> = self
            .candidates(scene, nodes)
            .filter_map(|candidate| self.intersect_candidate(&candidate, options))
            .collect();
        sort_hits(&mut hits);
        hits
    }

    // ===== INTERNALS =====

    fn candidates<'a>(
        &'a self,
        scene: &'a Scene,
        nodes: &'a [NodeKey],
    ) -> impl Iterator<Item = Candidate<'a>> + 'a {
        nodes.iter().filter_map(move |&key| {
            let node = scene.node(key)?;
            let mesh = node.mesh()?;
            let world = *node.transform().world_matrix();
            let (local_ray, scale) = self.ray.transformed(&try_inverse(&world)?)?;
            Some(Candidate { key, mesh, world, local_ray, scale })
        })
    }

    fn intersect_candidate(&self, candidate: &Candidate<'_>, options: &IntersectOptions) -> Option<RaycastHit> {
        let mesh = candidate.mesh;
        let geometry = mesh.geometry();
        if !mesh.mode().is_triangles() {
            return None;
        }
        let position = geometry.position()?;

        if options.use_bounds {
            let bounds = geometry.bounds()?;
            let t = intersect_bounds_volume(&candidate.local_ray, geometry, bounds)?;
            if exceeds(t, options.max_distance, candidate.scale) {
                return None;
            }
        }

        let backface_cull = options.cull_face && mesh.program().cull_face().is_some();
        let mut closest: Option<(f32, [usize; 3])> = None;
        for vertices in triangles(geometry, mesh.mode()) {
            let [a, b, c] = vertices.map(|i| position.vec3(i));
            let (Some(a), Some(b), Some(c)) = (a, b, c) else { continue };
            let Some(t) = intersect_triangle(&candidate.local_ray, a, b, c, backface_cull) else {
                continue;
            };
            if exceeds(t, options.max_distance, candidate.scale) {
                continue;
            }
            if closest.map_or(true, |(best, _)| t < best) {
                closest = Some((t, vertices));
            }
        }

        let (t, vertices) = closest?;
        let local_point = candidate.local_ray.at(t);
        let mut hit = self.hit(candidate, local_point);

        let [a, b, c] = vertices.map(|i| position.vec3(i).unwrap_or_default());
        let weights = barycoord(local_point, a, b, c);

        if options.include_normal {
            let normal_matrix = Mat3::from_mat4(candidate.world).inverse().transpose();
            hit.face_normal = Some((normal_matrix * (b - a).cross(c - a)).normalize_or_zero());
            hit.normal = geometry
                .attribute(ATTRIBUTE_NORMAL)
                .zip(weights)
                .and_then(|(normals, w)| interpolate3(normals, vertices, w))
                .map(|n| (normal_matrix * n).normalize_or_zero());
        }
        if options.include_uv {
            hit.uv = geometry
                .attribute(ATTRIBUTE_UV)
                .zip(weights)
                .and_then(|(uvs, w)| interpolate2(uvs, vertices, w));
        }
        Some(hit)
    }

    fn hit(&self, candidate: &Candidate<'_>, local_point: Vec3) -> RaycastHit {
        let point = candidate.world.transform_point3(local_point);
        RaycastHit {
            node: candidate.key,
            distance: point.distance(self.ray.origin),
            point,
            local_point,
            face_normal: None,
            normal: None,
            uv: None,
        }
    }
}

fn intersect_bounds_volume(ray: &Ray, geometry: &Geometry, bounds: &Bounds) -> Option<f32> {
    match geometry.raycast_shape() {
        RaycastShape::Box => intersect_box(ray, bounds.min, bounds.max),
        RaycastShape::Sphere => intersect_sphere(ray, bounds.center, bounds.radius),
    }
}

/// True if local distance `t` lies beyond a world-space limit
fn exceeds(t: f32, max_distance: Option<f32>, scale: f32) -> bool {
    max_distance.is_some_and(|max| t > max * scale)
}

fn sort_hits(hits: &mut [RaycastHit]) {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

/// Vertex index triples for the drawn part of `geometry`.
///
/// Honors the index buffer and the draw range; strips alternate winding so
/// every triangle keeps the strip's facing.
fn triangles(geometry: &Geometry, mode: DrawMode) -> Vec<[usize; 3]> {
    let index = geometry.index();
    let total = match index {
        Some(index) => index.count(),
        None => geometry.vertex_count(),
    };
    let range = geometry.draw_range();
    let start = range.start.min(total);
    let end = start + range.count.unwrap_or(total).min(total - start);

    let element = |i: usize| match index {
        Some(index) => index.index_at(i),
        None => Some(i),
    };
    let resolve = |[a, b, c]: [usize; 3]| Some([element(a)?, element(b)?, element(c)?]);

    let mut out = Vec::new();
    match mode {
        DrawMode::Triangles => {
            let mut i = start;
            while i + 2 < end {
                out.extend(resolve([i, i + 1, i + 2]));
                i += 3;
            }
        }
        DrawMode::TriangleStrip => {
            for i in start..end.saturating_sub(2) {
                let triple = if (i - start) % 2 == 0 { [i, i + 1, i + 2] } else { [i + 1, i, i + 2] };
                out.extend(resolve(triple));
            }
        }
        DrawMode::TriangleFan => {
            for i in start + 1..end.saturating_sub(1) {
                out.extend(resolve([start, i, i + 1]));
            }
        }
        _ => {}
    }
    out
}

fn interpolate3(attribute: &Attribute, [a, b, c]: [usize; 3], weights: Vec3) -> Option<Vec3> {
    Some(attribute.vec3(a)? * weights.x + attribute.vec3(b)? * weights.y + attribute.vec3(c)? * weights.z)
}

fn interpolate2(attribute: &Attribute, [a, b, c]: [usize; 3], weights: Vec3) -> Option<Vec2> {
    Some(attribute.vec2(a)? * weights.x + attribute.vec2(b)? * weights.y + attribute.vec2(c)? * weights.z)
}

#[cfg(test)]
#[path = "raycaster_tests.rs"]
mod tests;
