/// Fixed-function render state and the cache that applies only differences.

use bitflags::bitflags;
use crate::resource::{BlendState, CullFace, DepthFunc, FrontFace, Program};
use super::graphics_device::GraphicsDevice;

bitflags! {
    /// Which parts of the render state changed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateChanges: u32 {
        const CULL_FACE   = 1 << 0;
        const FRONT_FACE  = 1 << 1;
        const DEPTH_TEST  = 1 << 2;
        const DEPTH_WRITE = 1 << 3;
        const DEPTH_FUNC  = 1 << 4;
        const BLEND       = 1 << 5;
    }
}

/// Pipeline state one draw requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub cull_face: Option<CullFace>,
    pub front_face: FrontFace,
    pub depth_test: bool,
    pub depth_write: bool,
    pub depth_func: DepthFunc,
    pub blend: Option<BlendState>,
}

impl RenderState {
    /// State for drawing with `program`.
    ///
    /// `flip_faces` inverts the front face, used for mirrored (negative
    /// determinant) world matrices.
    pub fn from_program(program: &Program, flip_faces: bool) -> Self {
        let front_face = if flip_faces {
            program.front_face().flipped()
        } else {
            program.front_face()
        };
        Self {
            cull_face: program.cull_face(),
            front_face,
            depth_test: program.depth_test(),
            depth_write: program.depth_write(),
            depth_func: program.depth_func(),
            blend: program.blend(),
        }
    }

    /// Fields that differ between `self` and `other`
    pub fn diff(&self, other: &RenderState) -> StateChanges {
        let mut changes = StateChanges::empty();
        changes.set(StateChanges::CULL_FACE, self.cull_face != other.cull_face);
        changes.set(StateChanges::FRONT_FACE, self.front_face != other.front_face);
        changes.set(StateChanges::DEPTH_TEST, self.depth_test != other.depth_test);
        changes.set(StateChanges::DEPTH_WRITE, self.depth_write != other.depth_write);
        changes.set(StateChanges::DEPTH_FUNC, self.depth_func != other.depth_func);
        changes.set(StateChanges::BLEND, self.blend != other.blend);
        changes
    }
}

/// Mirror of the state last sent to the device.
///
/// Starts unknown, so the first `apply` sends everything.
#[derive(Debug, Clone, Default)]
pub struct RenderStateCache {
    current: Option<RenderState>,
}

impl RenderStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// State last sent, `None` until the first `apply`
    pub fn current(&self) -> Option<&RenderState> {
        self.current.as_ref()
    }

    /// Forget the device state (e.g. after a backend context loss)
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    /// Send only the fields of `target` that differ from the cached state
    pub fn apply(&mut self, device: &mut dyn GraphicsDevice, target: &RenderState) -> StateChanges {
        let changes = match &self.current {
            Some(current) => current.diff(target),
            None => StateChanges::all(),
        };

        if changes.contains(StateChanges::CULL_FACE) {
            device.set_cull_face(target.cull_face);
        }
        if changes.contains(StateChanges::FRONT_FACE) {
            device.set_front_face(target.front_face);
        }
        if changes.contains(StateChanges::DEPTH_TEST) {
            device.set_depth_test(target.depth_test);
        }
        if changes.contains(StateChanges::DEPTH_WRITE) {
            device.set_depth_write(target.depth_write);
        }
        if changes.contains(StateChanges::DEPTH_FUNC) {
            device.set_depth_func(target.depth_func);
        }
        if changes.contains(StateChanges::BLEND) {
            device.set_blend(target.blend);
        }

        self.current = Some(*target);
        changes
    }

    /// Ensure depth test and depth write are on (needed before a depth clear)
    pub fn enable_depth_writes(&mut self, device: &mut dyn GraphicsDevice) -> StateChanges {
        match self.current {
            Some(current) => {
                let target = RenderState { depth_test: true, depth_write: true, ..current };
                self.apply(device, &target)
            }
            None => {
                device.set_depth_test(true);
                device.set_depth_write(true);
                // Other fields are still unknown to us
                StateChanges::DEPTH_TEST | StateChanges::DEPTH_WRITE
            }
        }
    }
}

#[cfg(test)]
#[path = "render_state_tests.rs"]
mod tests;
