//! Resource-level geometry: named attribute buffers and cached bounds.
//!
//! A `Geometry` holds CPU-side vertex data keyed by attribute name
//! (`position`, `normal`, `uv`, `index`, or any custom name). Uploading the
//! data is the graphics device's job; the engine only reads positions for
//! bounds and raycasting, and indices for triangle iteration.
//!
//! Bounds are computed lazily on first use and cached until
//! `invalidate_bounds()` (or a `position` replacement) clears them.

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;
use std::sync::OnceLock;
use crate::error::{Error, Result};
use crate::engine_bail;

const SOURCE: &str = "meridian3d::Geometry";

/// Well-known attribute names
pub const ATTRIBUTE_POSITION: &str = "position";
pub const ATTRIBUTE_NORMAL: &str = "normal";
pub const ATTRIBUTE_UV: &str = "uv";
pub const ATTRIBUTE_INDEX: &str = "index";

// ============================================================================
// ATTRIBUTE
// ============================================================================

/// Typed attribute storage
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeData {
    Float32(Vec<f32>),
    Uint16(Vec<u16>),
    Uint32(Vec<u32>),
}

impl AttributeData {
    /// Number of scalar components stored
    pub fn len(&self) -> usize {
        match self {
            AttributeData::Float32(data) => data.len(),
            AttributeData::Uint16(data) => data.len(),
            AttributeData::Uint32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes for upload
    pub fn bytes(&self) -> &[u8] {
        match self {
            AttributeData::Float32(data) => bytemuck::cast_slice(data),
            AttributeData::Uint16(data) => bytemuck::cast_slice(data),
            AttributeData::Uint32(data) => bytemuck::cast_slice(data),
        }
    }

    /// Component `i` as f32
    fn scalar(&self, i: usize) -> Option<f32> {
        match self {
            AttributeData::Float32(data) => data.get(i).copied(),
            AttributeData::Uint16(data) => data.get(i).map(|&v| v as f32),
            AttributeData::Uint32(data) => data.get(i).map(|&v| v as f32),
        }
    }
}

impl From<Vec<f32>> for AttributeData {
    fn from(data: Vec<f32>) -> Self {
        AttributeData::Float32(data)
    }
}

impl From<Vec<u16>> for AttributeData {
    fn from(data: Vec<u16>) -> Self {
        AttributeData::Uint16(data)
    }
}

impl From<Vec<u32>> for AttributeData {
    fn from(data: Vec<u32>) -> Self {
        AttributeData::Uint32(data)
    }
}

/// One vertex attribute: data plus its layout
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    data: AttributeData,
    /// Components per element (3 for positions, 2 for uvs, 1 for indices)
    size: usize,
    normalized: bool,
    /// 0 for per-vertex data, N for one element per N instances
    divisor: u32,
}

impl Attribute {
    pub fn new(size: usize, data: impl Into<AttributeData>) -> Self {
        Self {
            data: data.into(),
            size,
            normalized: false,
            divisor: 0,
        }
    }

    /// Index buffer attribute (size 1)
    pub fn index(data: impl Into<AttributeData>) -> Self {
        Self::new(1, data)
    }

    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    pub fn with_divisor(mut self, divisor: u32) -> Self {
        self.divisor = divisor;
        self
    }

    pub fn data(&self) -> &AttributeData {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn normalized(&self) -> bool {
        self.normalized
    }

    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    pub fn is_instanced(&self) -> bool {
        self.divisor > 0
    }

    /// Number of elements (`len / size`)
    pub fn count(&self) -> usize {
        if self.size == 0 { 0 } else { self.data.len() / self.size }
    }

    pub fn bytes(&self) -> &[u8] {
        self.data.bytes()
    }

    /// Element `i` as a Vec3 (missing components read as 0)
    pub fn vec3(&self, i: usize) -> Option<Vec3> {
        if i >= self.count() {
            return None;
        }
        let base = i * self.size;
        let component = |c: usize| {
            if c < self.size { self.data.scalar(base + c).unwrap_or(0.0) } else { 0.0 }
        };
        Some(Vec3::new(component(0), component(1), component(2)))
    }

    /// Element `i` as a Vec2 (missing components read as 0)
    pub fn vec2(&self, i: usize) -> Option<Vec2> {
        self.vec3(i).map(|v| v.truncate())
    }

    /// Element `i` of an integer buffer as an index
    pub fn index_at(&self, i: usize) -> Option<usize> {
        match &self.data {
            AttributeData::Uint16(data) => data.get(i).map(|&v| v as usize),
            AttributeData::Uint32(data) => data.get(i).map(|&v| v as usize),
            AttributeData::Float32(_) => None,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.size == 0 {
            engine_bail!(GeometryInvalid, SOURCE, "attribute '{}' has component size 0", name);
        }
        if self.data.len() % self.size != 0 {
            engine_bail!(
                GeometryInvalid, SOURCE,
                "attribute '{}' holds {} components, not a multiple of size {}",
                name, self.data.len(), self.size
            );
        }
        if name == ATTRIBUTE_INDEX && matches!(self.data, AttributeData::Float32(_)) {
            engine_bail!(GeometryInvalid, SOURCE, "index attribute must hold u16 or u32 data");
        }
        Ok(())
    }
}

// ============================================================================
// BOUNDS / DRAW RANGE
// ============================================================================

/// Axis-aligned box and bounding sphere in local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
    /// Box center, also the bounding sphere center
    pub center: Vec3,
    /// Box extent (`max - min`)
    pub scale: Vec3,
    /// Largest distance from `center` to any vertex
    pub radius: f32,
}

impl Bounds {
    /// Compute from positions; `None` when there are no vertices
    pub fn from_points(points: impl Iterator<Item = Vec3> + Clone) -> Option<Self> {
        let (min, max) = points.clone().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(p), max.max(p)),
        );
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        let center = (min + max) * 0.5;
        let radius_squared = points.fold(0.0f32, |r, p| r.max(center.distance_squared(p)));
        Some(Self {
            min,
            max,
            center,
            scale: max - min,
            radius: radius_squared.sqrt(),
        })
    }
}

/// Shape used by `Raycaster::intersect_bounds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaycastShape {
    #[default]
    Box,
    Sphere,
}

/// Sub-range of elements (indices if indexed, else vertices) to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawRange {
    pub start: usize,
    /// `None` draws to the end of the buffer
    pub count: Option<usize>,
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Named vertex attributes plus draw range, instancing and cached bounds
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    attributes: FxHashMap<String, Attribute>,
    draw_range: DrawRange,
    instanced_count: Option<usize>,
    raycast_shape: RaycastShape,
    bounds: OnceLock<Option<Bounds>>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, attribute)` pairs
    pub fn from_attributes<I, S>(attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Attribute)>,
        S: Into<String>,
    {
        let mut geometry = Self::new();
        for (name, attribute) in attributes {
            geometry.add_attribute(name, attribute)?;
        }
        Ok(geometry)
    }

    /// Add or replace an attribute.
    ///
    /// Replacing `position` invalidates the cached bounds. Instanced
    /// attributes update the derived instance count.
    ///
    /// # Errors
    ///
    /// `GeometryInvalid` if the size is 0, the data length is not a
    /// multiple of the size, or an `index` attribute holds floats.
    pub fn add_attribute(&mut self, name: impl Into<String>, attribute: Attribute) -> Result<()> {
        let name = name.into();
        attribute.validate(&name)?;

        if name == ATTRIBUTE_POSITION {
            self.invalidate_bounds();
        }
        if attribute.is_instanced() {
            let instances = attribute.count() * attribute.divisor as usize;
            self.instanced_count = Some(match self.instanced_count {
                Some(current) => current.min(instances),
                None => instances,
            });
        }
        self.attributes.insert(name, attribute);
        Ok(())
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        if name == ATTRIBUTE_POSITION {
            self.invalidate_bounds();
        }
        self.attributes.remove(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(name, attribute)| (name.as_str(), attribute))
    }

    pub fn position(&self) -> Option<&Attribute> {
        self.attribute(ATTRIBUTE_POSITION)
    }

    pub fn index(&self) -> Option<&Attribute> {
        self.attribute(ATTRIBUTE_INDEX)
    }

    pub fn is_indexed(&self) -> bool {
        self.has_attribute(ATTRIBUTE_INDEX)
    }

    /// Number of vertices (0 without a position attribute)
    pub fn vertex_count(&self) -> usize {
        self.position().map_or(0, Attribute::count)
    }

    /// Fail with `GeometryInvalid` unless the geometry can be drawn.
    ///
    /// Not logged here: callers treat it as a per-draw skip and report it
    /// at their own severity.
    pub fn validate(&self) -> Result<&Attribute> {
        self.position().ok_or_else(|| {
            Error::GeometryInvalid(format!("missing mandatory '{}' attribute", ATTRIBUTE_POSITION))
        })
    }

    // ===== DRAW RANGE / INSTANCING =====

    pub fn draw_range(&self) -> DrawRange {
        self.draw_range
    }

    pub fn set_draw_range(&mut self, start: usize, count: Option<usize>) {
        self.draw_range = DrawRange { start, count };
    }

    /// Instance count, `None` when the geometry is not instanced
    pub fn instanced_count(&self) -> Option<usize> {
        self.instanced_count
    }

    pub fn set_instanced_count(&mut self, count: Option<usize>) {
        self.instanced_count = count;
    }

    // ===== BOUNDS =====

    pub fn raycast_shape(&self) -> RaycastShape {
        self.raycast_shape
    }

    pub fn set_raycast_shape(&mut self, shape: RaycastShape) {
        self.raycast_shape = shape;
    }

    /// Local-space bounds, computed from `position` on first use.
    ///
    /// `None` without a position attribute or without vertices.
    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds
            .get_or_init(|| {
                let position = self.position()?;
                Bounds::from_points((0..position.count()).filter_map(|i| position.vec3(i)))
            })
            .as_ref()
    }

    /// Drop cached bounds; the next `bounds()` call recomputes them
    pub fn invalidate_bounds(&mut self) {
        self.bounds = OnceLock::new();
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
