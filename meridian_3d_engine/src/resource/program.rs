//! Program: a shader program handle plus the fixed-function state it draws with.
//!
//! Shader source and compilation belong to the graphics device. The engine
//! only needs a stable identity (for sorting and program switches), the
//! pipeline state (culling, depth, blending), the transparency flag that
//! picks the render queue, and default uniform values.

use std::sync::atomic::{AtomicU64, Ordering};
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;

static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(1);

/// Unique program identity, increasing in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramId(u64);

impl ProgramId {
    fn next() -> Self {
        Self(NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

// ============================================================================
// PIPELINE STATE ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullFace {
    Back,
    Front,
    FrontAndBack,
}

/// Winding order of front-facing triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontFace {
    #[default]
    CounterClockwise,
    Clockwise,
}

impl FrontFace {
    pub fn flipped(self) -> Self {
        match self {
            FrontFace::CounterClockwise => FrontFace::Clockwise,
            FrontFace::Clockwise => FrontFace::CounterClockwise,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthFunc {
    Never,
    #[default]
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendEquation {
    #[default]
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Blend function and equation (color and alpha)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendState {
    pub src: BlendFactor,
    pub dst: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
    pub equation: BlendEquation,
    pub alpha_equation: BlendEquation,
}

impl BlendState {
    /// Straight alpha: `src * a + dst * (1 - a)`
    pub fn alpha() -> Self {
        Self::separate(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)
    }

    /// Premultiplied alpha: `src + dst * (1 - a)`
    pub fn premultiplied() -> Self {
        Self::separate(BlendFactor::One, BlendFactor::OneMinusSrcAlpha)
    }

    /// Additive: `src + dst`
    pub fn additive() -> Self {
        Self::separate(BlendFactor::One, BlendFactor::One)
    }

    fn separate(src: BlendFactor, dst: BlendFactor) -> Self {
        Self {
            src,
            dst,
            src_alpha: src,
            dst_alpha: dst,
            equation: BlendEquation::Add,
            alpha_equation: BlendEquation::Add,
        }
    }
}

// ============================================================================
// UNIFORMS
// ============================================================================

/// A uniform value understood by the graphics device
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

/// Uniform values by name
pub type Uniforms = FxHashMap<String, UniformValue>;

// ============================================================================
// PROGRAM
// ============================================================================

/// Shader program identity plus draw state
#[derive(Debug, Clone)]
pub struct Program {
    id: ProgramId,
    name: String,
    cull_face: Option<CullFace>,
    front_face: FrontFace,
    depth_test: bool,
    depth_write: bool,
    depth_func: DepthFunc,
    blend: Option<BlendState>,
    transparent: bool,
    uniforms: Uniforms,
}

impl Program {
    /// Opaque program: back-face culling, depth test and write, no blending
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProgramId::next(),
            name: name.into(),
            cull_face: Some(CullFace::Back),
            front_face: FrontFace::CounterClockwise,
            depth_test: true,
            depth_write: true,
            depth_func: DepthFunc::Less,
            blend: None,
            transparent: false,
            uniforms: Uniforms::default(),
        }
    }

    /// Mark as transparent; enables straight alpha blending if no blend is set
    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        if transparent && self.blend.is_none() {
            self.blend = Some(BlendState::alpha());
        }
        self
    }

    pub fn with_cull_face(mut self, cull_face: Option<CullFace>) -> Self {
        self.cull_face = cull_face;
        self
    }

    pub fn with_front_face(mut self, front_face: FrontFace) -> Self {
        self.front_face = front_face;
        self
    }

    pub fn with_depth_test(mut self, enabled: bool) -> Self {
        self.depth_test = enabled;
        self
    }

    pub fn with_depth_write(mut self, enabled: bool) -> Self {
        self.depth_write = enabled;
        self
    }

    pub fn with_depth_func(mut self, func: DepthFunc) -> Self {
        self.depth_func = func;
        self
    }

    pub fn with_blend(mut self, blend: Option<BlendState>) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_uniform(mut self, name: impl Into<String>, value: UniformValue) -> Self {
        self.uniforms.insert(name.into(), value);
        self
    }

    // ===== GETTERS =====

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cull_face(&self) -> Option<CullFace> {
        self.cull_face
    }

    pub fn front_face(&self) -> FrontFace {
        self.front_face
    }

    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    pub fn depth_write(&self) -> bool {
        self.depth_write
    }

    pub fn depth_func(&self) -> DepthFunc {
        self.depth_func
    }

    pub fn blend(&self) -> Option<BlendState> {
        self.blend
    }

    pub fn transparent(&self) -> bool {
        self.transparent
    }

    /// Default uniform values
    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
