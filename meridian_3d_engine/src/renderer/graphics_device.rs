/// GraphicsDevice trait - the GPU binding layer the renderer drives
///
/// The engine never talks to a graphics API directly. A backend (WebGL-like,
/// OpenGL, Vulkan, a test recorder...) implements this trait; the renderer
/// calls it in draw order and only for state that actually changed.

use crate::error::Result;
use crate::resource::{BlendState, CullFace, DepthFunc, DrawPrimitive, FrontFace, Geometry, Program, Uniforms};

/// Viewport in physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Offscreen render target description
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub depth: bool,
    pub stencil: bool,
}

impl RenderTarget {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            depth: true,
            stencil: false,
        }
    }
}

/// Buffers to clear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearRequest {
    /// RGBA clear color, `None` leaves color untouched
    pub color: Option<[f32; 4]>,
    pub depth: bool,
    pub stencil: bool,
}

/// GPU collaborator seam
///
/// State setters are infallible: a backend records or applies them
/// immediately. Calls that touch GPU resources return `BackendError` on
/// failure, which aborts the current frame.
pub trait GraphicsDevice: Send + Sync {
    /// Bind an offscreen target, or the default framebuffer with `None`
    fn bind_target(&mut self, target: Option<&RenderTarget>) -> Result<()>;

    fn set_viewport(&mut self, viewport: Viewport);

    fn clear(&mut self, request: ClearRequest) -> Result<()>;

    // ===== PIPELINE STATE =====

    /// `None` disables face culling
    fn set_cull_face(&mut self, cull_face: Option<CullFace>);

    fn set_front_face(&mut self, front_face: FrontFace);

    fn set_depth_test(&mut self, enabled: bool);

    fn set_depth_write(&mut self, enabled: bool);

    fn set_depth_func(&mut self, func: DepthFunc);

    /// `None` disables blending
    fn set_blend(&mut self, blend: Option<BlendState>);

    // ===== DRAW =====

    /// Make `program` current (compiling it on first use is the backend's job)
    fn use_program(&mut self, program: &Program) -> Result<()>;

    /// Upload the built-in matrix block (`MeshMatrices` as bytes)
    fn push_matrices(&mut self, data: &[u8]) -> Result<()>;

    /// Upload this draw's uniform values
    fn set_uniforms(&mut self, uniforms: &Uniforms) -> Result<()>;

    /// Issue the draw call
    fn draw(&mut self, geometry: &Geometry, primitive: &DrawPrimitive) -> Result<()>;
}
