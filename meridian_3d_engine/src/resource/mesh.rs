//! Mesh: the drawable payload of a scene node.
//!
//! A `Mesh` pairs a shared `Geometry` with a shared `Program` and adds the
//! per-object draw parameters: primitive mode, render order, frustum
//! culling opt-out, per-mesh uniform overrides, and render callbacks.
//!
//! Callbacks run synchronously in render-list order. A before-render
//! callback receives the uniforms for this one draw and may change them,
//! which lets many meshes share one program with different values.

use std::fmt;
use std::sync::Arc;
use crate::camera::Camera;
use crate::error::Result;
use crate::scene::NodeKey;
use super::geometry::{AttributeData, Geometry};
use super::program::{Program, UniformValue, Uniforms};

/// Primitive assembly mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl DrawMode {
    /// True for the three triangle modes
    pub fn is_triangles(&self) -> bool {
        matches!(self, DrawMode::Triangles | DrawMode::TriangleStrip | DrawMode::TriangleFan)
    }
}

/// Index element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    Uint16,
    Uint32,
}

/// Everything the graphics device needs to issue one draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawPrimitive {
    pub mode: DrawMode,
    /// First element (index if indexed, else vertex)
    pub start: usize,
    pub count: usize,
    /// `Some` for instanced draws
    pub instance_count: Option<usize>,
    /// `Some` when drawing through the index buffer
    pub index_format: Option<IndexFormat>,
}

/// Data handed to render callbacks
pub struct RenderHook<'a> {
    pub node: NodeKey,
    pub camera: &'a Camera,
    /// Uniforms for this draw (program defaults + mesh overrides)
    pub uniforms: &'a mut Uniforms,
}

/// Callback run just before or just after a mesh draws
pub type RenderCallback = Box<dyn Fn(&mut RenderHook<'_>) + Send + Sync>;

/// Geometry + program + draw parameters
pub struct Mesh {
    geometry: Arc<Geometry>,
    program: Arc<Program>,
    mode: DrawMode,
    frustum_culled: bool,
    render_order: i32,
    in_frustum: bool,
    uniforms: Uniforms,
    before_render: Vec<RenderCallback>,
    after_render: Vec<RenderCallback>,
}

impl Mesh {
    pub fn new(geometry: Arc<Geometry>, program: Arc<Program>) -> Self {
        Self {
            geometry,
            program,
            mode: DrawMode::Triangles,
            frustum_culled: true,
            render_order: 0,
            in_frustum: true,
            uniforms: Uniforms::default(),
            before_render: Vec::new(),
            after_render: Vec::new(),
        }
    }

    pub fn with_mode(mut self, mode: DrawMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_render_order(mut self, render_order: i32) -> Self {
        self.render_order = render_order;
        self
    }

    pub fn with_frustum_culled(mut self, frustum_culled: bool) -> Self {
        self.frustum_culled = frustum_culled;
        self
    }

    // ===== ACCESSORS =====

    pub fn geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    /// Mutable geometry (cloned first if shared with other meshes)
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        Arc::make_mut(&mut self.geometry)
    }

    pub fn set_geometry(&mut self, geometry: Arc<Geometry>) {
        self.geometry = geometry;
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn set_program(&mut self, program: Arc<Program>) {
        self.program = program;
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
    }

    pub fn render_order(&self) -> i32 {
        self.render_order
    }

    pub fn set_render_order(&mut self, render_order: i32) {
        self.render_order = render_order;
    }

    /// False for meshes that must never be frustum culled
    pub fn frustum_culled(&self) -> bool {
        self.frustum_culled
    }

    pub fn set_frustum_culled(&mut self, frustum_culled: bool) {
        self.frustum_culled = frustum_culled;
    }

    /// Culling result of the last render list build
    pub fn in_frustum(&self) -> bool {
        self.in_frustum
    }

    pub(crate) fn set_in_frustum(&mut self, in_frustum: bool) {
        self.in_frustum = in_frustum;
    }

    /// Per-mesh uniform overrides
    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn set_uniform(&mut self, name: impl Into<String>, value: UniformValue) {
        self.uniforms.insert(name.into(), value);
    }

    /// Program defaults overlaid with this mesh's overrides
    pub fn merged_uniforms(&self) -> Uniforms {
        let mut uniforms = self.program.uniforms().clone();
        uniforms.extend(self.uniforms.iter().map(|(name, value)| (name.clone(), *value)));
        uniforms
    }

    // ===== CALLBACKS =====

    /// Register a callback run before each draw of this mesh
    pub fn on_before_render<F>(&mut self, callback: F)
    where
        F: Fn(&mut RenderHook<'_>) + Send + Sync + 'static,
    {
        self.before_render.push(Box::new(callback));
    }

    /// Register a callback run after each draw of this mesh
    pub fn on_after_render<F>(&mut self, callback: F)
    where
        F: Fn(&mut RenderHook<'_>) + Send + Sync + 'static,
    {
        self.after_render.push(Box::new(callback));
    }

    pub(crate) fn run_before_render(&self, hook: &mut RenderHook<'_>) {
        for callback in &self.before_render {
            callback(hook);
        }
    }

    pub(crate) fn run_after_render(&self, hook: &mut RenderHook<'_>) {
        for callback in &self.after_render {
            callback(hook);
        }
    }

    // ===== DRAW =====

    /// Resolve the draw call for the current geometry and draw range.
    ///
    /// The range is clamped to the available elements.
    ///
    /// # Errors
    ///
    /// `GeometryInvalid` if the geometry has no `position` attribute.
    pub fn draw_primitive(&self) -> Result<DrawPrimitive> {
        let position = self.geometry.validate()?;

        let (total, index_format) = match self.geometry.index() {
            Some(index) => {
                let format = match index.data() {
                    AttributeData::Uint32(_) => IndexFormat::Uint32,
                    _ => IndexFormat::Uint16,
                };
                (index.count(), Some(format))
            }
            None => (position.count(), None),
        };

        let range = self.geometry.draw_range();
        let start = range.start.min(total);
        let count = range.count.unwrap_or(total).min(total - start);

        Ok(DrawPrimitive {
            mode: self.mode,
            start,
            count,
            instance_count: self.geometry.instanced_count(),
            index_format,
        })
    }
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("program", &self.program.id())
            .field("mode", &self.mode)
            .field("frustum_culled", &self.frustum_culled)
            .field("render_order", &self.render_order)
            .field("in_frustum", &self.in_frustum)
            .field("before_render", &self.before_render.len())
            .field("after_render", &self.after_render.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
