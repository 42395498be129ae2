//! Resource module
//!
//! CPU-side drawable data: geometry attributes and bounds, programs with
//! their pipeline state, and meshes tying the two to a scene node.

mod geometry;
mod mesh;
mod program;

pub use geometry::{
    Attribute, AttributeData, Bounds, DrawRange, Geometry, RaycastShape,
    ATTRIBUTE_INDEX, ATTRIBUTE_NORMAL, ATTRIBUTE_POSITION, ATTRIBUTE_UV,
};
pub use mesh::{DrawMode, DrawPrimitive, IndexFormat, Mesh, RenderCallback, RenderHook};
pub use program::{
    BlendEquation, BlendFactor, BlendState, CullFace, DepthFunc, FrontFace,
    Program, ProgramId, UniformValue, Uniforms,
};
