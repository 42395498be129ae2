/// Renderer - turns a scene graph into an ordered stream of device calls
///
/// One `render` call is one frame: bind and clear the target, refresh world
/// and camera matrices, build the render list, then for every item apply
/// the state diff, upload matrices and uniforms, and draw.

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec4};
use crate::camera::Camera;
use crate::error::Result;
use crate::engine_trace;
use crate::engine_warn;
use crate::resource::{ProgramId, RenderHook};
use crate::scene::{NodeKey, Scene};
use super::graphics_device::{ClearRequest, GraphicsDevice, RenderTarget, Viewport};
use super::render_list::RenderList;
use super::render_state::{RenderState, RenderStateCache};

const SOURCE: &str = "meridian3d::Renderer";

/// Renderer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Canvas width in logical pixels
    pub width: u32,
    /// Canvas height in logical pixels
    pub height: u32,
    /// Device pixel ratio (physical pixels per logical pixel)
    pub dpr: f32,
    /// Clear the target at the start of every frame unless overridden
    pub auto_clear: bool,
    pub clear_color: [f32; 4],
    /// The default framebuffer has a depth buffer
    pub depth: bool,
    /// The default framebuffer has a stencil buffer
    pub stencil: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 150,
            dpr: 1.0,
            auto_clear: true,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            depth: true,
            stencil: false,
        }
    }
}

/// Per-frame options for `Renderer::render`
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Offscreen target, `None` for the default framebuffer
    pub target: Option<RenderTarget>,
    /// Refresh scene world matrices and the camera before drawing
    pub update: bool,
    pub sort: bool,
    pub frustum_cull: bool,
    /// Override `RendererConfig::auto_clear` for this frame
    pub clear: Option<bool>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            target: None,
            update: true,
            sort: true,
            frustum_cull: true,
            clear: None,
        }
    }
}

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    /// Mesh nodes rejected by the frustum test
    pub culled: u32,
    /// Mesh nodes whose geometry could not be drawn
    pub skipped: u32,
    /// Individual pipeline state fields sent to the device
    pub state_changes: u32,
    pub program_switches: u32,
}

/// Built-in matrices uploaded before every draw
///
/// Laid out as consecutive column-major `mat4`s followed by a `vec4`, ready
/// for a uniform or push-constant block.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MeshMatrices {
    pub model: Mat4,
    pub view: Mat4,
    pub model_view: Mat4,
    pub projection: Mat4,
    /// Inverse-transpose of the model-view 3x3, padded to a mat4
    pub normal: Mat4,
    /// Camera world position (w = 1)
    pub camera_position: Vec4,
}

impl MeshMatrices {
    pub fn new(model: &Mat4, camera: &Camera) -> Self {
        let view = *camera.view_matrix();
        let model_view = view * *model;
        let linear = Mat3::from_mat4(model_view);
        let normal = if linear.determinant() != 0.0 {
            linear.inverse().transpose()
        } else {
            Mat3::ZERO
        };
        Self {
            model: *model,
            view,
            model_view,
            projection: *camera.projection_matrix(),
            normal: Mat4::from_mat3(normal),
            camera_position: camera.world_position().extend(1.0),
        }
    }
}

/// Frame renderer driving a `GraphicsDevice`
pub struct Renderer {
    device: Box<dyn GraphicsDevice>,
    config: RendererConfig,
    state_cache: RenderStateCache,
    current_program: Option<ProgramId>,
}

impl Renderer {
    pub fn new(device: Box<dyn GraphicsDevice>, config: RendererConfig) -> Self {
        Self {
            device,
            config,
            state_cache: RenderStateCache::new(),
            current_program: None,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn device(&self) -> &dyn GraphicsDevice {
        self.device.as_ref()
    }

    pub fn device_mut(&mut self) -> &mut dyn GraphicsDevice {
        self.device.as_mut()
    }

    /// Resize the default framebuffer (logical pixels)
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
    }

    pub fn set_dpr(&mut self, dpr: f32) {
        self.config.dpr = dpr;
    }

    /// Forget cached device state (e.g. after the backend lost its context)
    pub fn invalidate_state(&mut self) {
        self.state_cache.invalidate();
        self.current_program = None;
    }

    /// Build the render list for `root` without drawing.
    ///
    /// World matrices are taken as they are; call
    /// `Scene::update_world_matrix` first if they may be stale.
    pub fn render_list(
        &self,
        scene: &mut Scene,
        root: NodeKey,
        camera: Option<&Camera>,
        options: &RenderOptions,
    ) -> RenderList {
        RenderList::build(scene, root, camera, options.frustum_cull, options.sort)
    }

    /// Render the subtree under `root` as seen by `camera`.
    ///
    /// Meshes whose geometry is invalid are skipped (logged at WARN and
    /// counted in `FrameStats::skipped`); the frame continues.
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` if `root` is not in the scene
    /// - `DegenerateTransform` if the camera world matrix is singular
    /// - `BackendError` from the device, which aborts the frame
    pub fn render(
        &mut self,
        scene: &mut Scene,
        root: NodeKey,
        camera: &mut Camera,
        options: &RenderOptions,
    ) -> Result<FrameStats> {
        let mut stats = FrameStats::default();

        // ===== TARGET =====

        self.device.bind_target(options.target.as_ref())?;
        let viewport = match &options.target {
            Some(target) => Viewport {
                x: 0.0,
                y: 0.0,
                width: target.width as f32,
                height: target.height as f32,
            },
            None => Viewport {
                x: 0.0,
                y: 0.0,
                width: self.config.width as f32 * self.config.dpr,
                height: self.config.height as f32 * self.config.dpr,
            },
        };
        self.device.set_viewport(viewport);

        if options.clear.unwrap_or(self.config.auto_clear) {
            let (depth, stencil) = match &options.target {
                Some(target) => (target.depth, target.stencil),
                None => (self.config.depth, self.config.stencil),
            };
            if depth {
                // A masked-off depth buffer would not be cleared
                let changes = self.state_cache.enable_depth_writes(self.device.as_mut());
                stats.state_changes += changes.bits().count_ones();
            }
            self.device.clear(ClearRequest {
                color: Some(self.config.clear_color),
                depth,
                stencil,
            })?;
        }

        // ===== MATRICES =====

        if options.update {
            scene.update_world_matrix(root, false)?;

            let parent_world = match camera.parent_node() {
                Some(key) => match scene.world_matrix(key) {
                    Some(world) => Some(*world),
                    None => {
                        engine_warn!(SOURCE, "camera parent node {:?} is not in the scene", key);
                        None
                    }
                },
                None => None,
            };
            camera.update_matrix_world_with_parent(parent_world.as_ref(), parent_world.is_some())?;
        }
        if options.frustum_cull {
            camera.update_frustum();
        }

        // ===== DRAW =====

        let list = RenderList::build(scene, root, Some(&*camera), options.frustum_cull, options.sort);
        stats.culled = list.culled;
        let camera: &Camera = camera;

        for item in list.iter() {
            let Some(node) = scene.node(item.node) else { continue };
            let Some(mesh) = node.mesh() else { continue };

            let primitive = match mesh.draw_primitive() {
                Ok(primitive) => primitive,
                Err(err) => {
                    engine_warn!(SOURCE, "skipping mesh '{}': {}", node.name(), err);
                    stats.skipped += 1;
                    continue;
                }
            };

            let world = *node.transform().world_matrix();
            let program = mesh.program();
            let mut uniforms = mesh.merged_uniforms();

            mesh.run_before_render(&mut RenderHook {
                node: item.node,
                camera,
                uniforms: &mut uniforms,
            });

            let flip_faces = program.cull_face().is_some() && world.determinant() < 0.0;
            let state = RenderState::from_program(program, flip_faces);
            let changes = self.state_cache.apply(self.device.as_mut(), &state);
            stats.state_changes += changes.bits().count_ones();

            if self.current_program != Some(program.id()) {
                self.device.use_program(program)?;
                self.current_program = Some(program.id());
                stats.program_switches += 1;
            }

            let matrices = MeshMatrices::new(&world, camera);
            self.device.push_matrices(bytemuck::bytes_of(&matrices))?;
            self.device.set_uniforms(&uniforms)?;
            self.device.draw(mesh.geometry(), &primitive)?;
            stats.draw_calls += 1;

            mesh.run_after_render(&mut RenderHook {
                node: item.node,
                camera,
                uniforms: &mut uniforms,
            });
        }

        engine_trace!(
            SOURCE,
            "frame: {} draw calls, {} culled, {} skipped, {} state changes, {} program switches",
            stats.draw_calls,
            stats.culled,
            stats.skipped,
            stats.state_changes,
            stats.program_switches
        );

        Ok(stats)
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
