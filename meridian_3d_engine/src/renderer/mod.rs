//! Renderer module
//!
//! The `GraphicsDevice` seam a backend implements, the render state cache
//! that sends only what changed, the per-frame render list, and the
//! `Renderer` that ties them together.

mod graphics_device;
mod render_list;
mod render_state;
mod renderer;

#[cfg(test)]
mod mock_device;

pub use graphics_device::{ClearRequest, GraphicsDevice, RenderTarget, Viewport};
pub use render_list::{RenderItem, RenderList, RenderQueue};
pub use render_state::{RenderState, RenderStateCache, StateChanges};
pub use renderer::{FrameStats, MeshMatrices, RenderOptions, Renderer, RendererConfig};
