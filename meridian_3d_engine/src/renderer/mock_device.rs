/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every call as a `DeviceCommand` in a shared log so tests can
/// assert draw order and state diffing after handing the device to a
/// `Renderer`.

#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use crate::error::Result;
#[cfg(test)]
use crate::engine_bail;
#[cfg(test)]
use crate::resource::{
    BlendState, CullFace, DepthFunc, DrawPrimitive, FrontFace, Geometry, Program, ProgramId,
    Uniforms,
};
#[cfg(test)]
use super::graphics_device::{ClearRequest, GraphicsDevice, RenderTarget, Viewport};

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    BindTarget(Option<String>),
    SetViewport(Viewport),
    Clear(ClearRequest),
    SetCullFace(Option<CullFace>),
    SetFrontFace(FrontFace),
    SetDepthTest(bool),
    SetDepthWrite(bool),
    SetDepthFunc(DepthFunc),
    SetBlend(Option<BlendState>),
    UseProgram(ProgramId),
    PushMatrices(usize),
    SetUniforms(Uniforms),
    Draw(DrawPrimitive),
}

#[cfg(test)]
impl DeviceCommand {
    /// True for the six pipeline state setters
    pub fn is_state(&self) -> bool {
        matches!(
            self,
            DeviceCommand::SetCullFace(_)
                | DeviceCommand::SetFrontFace(_)
                | DeviceCommand::SetDepthTest(_)
                | DeviceCommand::SetDepthWrite(_)
                | DeviceCommand::SetDepthFunc(_)
                | DeviceCommand::SetBlend(_)
        )
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockGraphicsDevice {
    pub commands: Arc<Mutex<Vec<DeviceCommand>>>,
    /// Make the Nth draw call (0-based) fail with a backend error
    pub fail_draw_at: Option<usize>,
    draws: usize,
}

#[cfg(test)]
impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the command log
    pub fn log(&self) -> Arc<Mutex<Vec<DeviceCommand>>> {
        self.commands.clone()
    }

    fn push(&self, command: DeviceCommand) {
        self.commands.lock().unwrap().push(command);
    }
}

#[cfg(test)]
impl GraphicsDevice for MockGraphicsDevice {
    fn bind_target(&mut self, target: Option<&RenderTarget>) -> Result<()> {
        self.push(DeviceCommand::BindTarget(target.map(|t| t.name.clone())));
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.push(DeviceCommand::SetViewport(viewport));
    }

    fn clear(&mut self, request: ClearRequest) -> Result<()> {
        self.push(DeviceCommand::Clear(request));
        Ok(())
    }

    fn set_cull_face(&mut self, cull_face: Option<CullFace>) {
        self.push(DeviceCommand::SetCullFace(cull_face));
    }

    fn set_front_face(&mut self, front_face: FrontFace) {
        self.push(DeviceCommand::SetFrontFace(front_face));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.push(DeviceCommand::SetDepthTest(enabled));
    }

    fn set_depth_write(&mut self, enabled: bool) {
        self.push(DeviceCommand::SetDepthWrite(enabled));
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        self.push(DeviceCommand::SetDepthFunc(func));
    }

    fn set_blend(&mut self, blend: Option<BlendState>) {
        self.push(DeviceCommand::SetBlend(blend));
    }

    fn use_program(&mut self, program: &Program) -> Result<()> {
        self.push(DeviceCommand::UseProgram(program.id()));
        Ok(())
    }

    fn push_matrices(&mut self, data: &[u8]) -> Result<()> {
        self.push(DeviceCommand::PushMatrices(data.len()));
        Ok(())
    }

    fn set_uniforms(&mut self, uniforms: &Uniforms) -> Result<()> {
        self.push(DeviceCommand::SetUniforms(uniforms.clone()));
        Ok(())
    }

    fn draw(&mut self, _geometry: &Geometry, primitive: &DrawPrimitive) -> Result<()> {
        let index = self.draws;
        self.draws += 1;
        if self.fail_draw_at == Some(index) {
            engine_bail!(BackendError, "meridian3d::MockGraphicsDevice", "draw {} failed", index);
        }
        self.push(DeviceCommand::Draw(*primitive));
        Ok(())
    }
}
