/// Orbit controller - a damped spherical camera rig around a target point.
///
/// Gestures (`rotate`, `zoom`, `pan`) only accumulate deltas. `update`,
/// called once per displayed frame, integrates them: the target spherical
/// position moves by the deltas and is clamped, the camera eases toward it,
/// and the remaining rotate/pan deltas decay by `inertia` so motion carries
/// on briefly after input stops.

use std::f32::consts::PI;
use glam::{Vec2, Vec3};
use crate::camera::Camera;

/// Keeps the polar angle off the poles, where look-at is undefined
const POLE_EPSILON: f32 = 1e-6;

/// Field of view used for pan speed with an orthographic camera (degrees)
const ORTHOGRAPHIC_PAN_FOV: f32 = 45.0;

/// Spherical coordinates around a center.
///
/// `phi` is the polar angle from +Y, `theta` the azimuth around +Y measured
/// from +Z toward +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Default for Spherical {
    fn default() -> Self {
        Self { radius: 1.0, phi: 0.0, theta: 0.0 }
    }
}

impl Spherical {
    pub fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    /// Coordinates of `offset` relative to the origin
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self { radius, phi: 0.0, theta: 0.0 };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    /// Cartesian offset (the polar angle is kept off 0)
    pub fn to_offset(&self) -> Vec3 {
        let sin_phi_radius = self.radius * self.phi.max(POLE_EPSILON).sin();
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.radius * self.phi.cos(),
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// How zoom gestures act on the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomStyle {
    /// Move the camera toward or away from the target
    #[default]
    Dolly,
    /// Narrow or widen the field of view, keeping the distance
    Fov,
}

/// Orbit controller configuration
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitConfig {
    /// Gate for gesture input (`update` always runs)
    pub enabled: bool,
    pub target: Vec3,
    /// Fraction of the remaining distance covered per update (0..1]
    pub ease: f32,
    /// Fraction of the rotate/pan delta kept for the next update [0..1)
    pub inertia: f32,
    pub enable_rotate: bool,
    pub rotate_speed: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub zoom_style: ZoomStyle,
    pub enable_pan: bool,
    pub pan_speed: f32,
    /// Polar angle limits in radians
    pub min_polar: f32,
    pub max_polar: f32,
    /// Azimuth limits in radians
    pub min_azimuth: f32,
    pub max_azimuth: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target: Vec3::ZERO,
            ease: 0.25,
            inertia: 0.85,
            enable_rotate: true,
            rotate_speed: 0.1,
            auto_rotate: false,
            auto_rotate_speed: 1.0,
            enable_zoom: true,
            zoom_speed: 1.0,
            zoom_style: ZoomStyle::Dolly,
            enable_pan: true,
            pan_speed: 0.1,
            min_polar: 0.0,
            max_polar: PI,
            min_azimuth: f32::NEG_INFINITY,
            max_azimuth: f32::INFINITY,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}

/// Damped orbit rig driving one camera
#[derive(Debug, Clone)]
pub struct OrbitController {
    config: OrbitConfig,
    target: Vec3,
    /// Where the camera currently is
    spherical: Spherical,
    /// Where the camera is easing to
    spherical_target: Spherical,
    /// Pending rotation (phi/theta, additive) and dolly (radius, multiplicative)
    spherical_delta: Spherical,
    pan_delta: Vec3,
}

impl OrbitController {
    /// Create a controller around `config.target`, starting from the
    /// camera's current position.
    pub fn new(camera: &Camera, config: OrbitConfig) -> Self {
        let target = config.target;
        let spherical = Spherical::from_offset(camera.position() - target);
        Self {
            config,
            target,
            spherical,
            spherical_target: spherical,
            spherical_delta: Spherical::new(1.0, 0.0, 0.0),
            pan_delta: Vec3::ZERO,
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut OrbitConfig {
        &mut self.config
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn spherical(&self) -> &Spherical {
        &self.spherical
    }

    pub fn spherical_target(&self) -> &Spherical {
        &self.spherical_target
    }

    /// Advance one frame and move `camera`.
    ///
    /// Camera moves made outside the controller are overwritten; call
    /// `force_position` after moving the camera by hand.
    pub fn update(&mut self, camera: &mut Camera) {
        if self.config.auto_rotate {
            self.rotate_left(2.0 * PI / 60.0 / 60.0 * self.config.auto_rotate_speed);
        }

        self.spherical_target.radius *= self.spherical_delta.radius;
        self.spherical_target.theta += self.spherical_delta.theta;
        self.spherical_target.phi += self.spherical_delta.phi;
        self.spherical_target = self.clamp(self.spherical_target);

        let ease = self.config.ease;
        let eased = Spherical {
            radius: self.spherical.radius + (self.spherical_target.radius - self.spherical.radius) * ease,
            phi: self.spherical.phi + (self.spherical_target.phi - self.spherical.phi) * ease,
            theta: self.spherical.theta + (self.spherical_target.theta - self.spherical.theta) * ease,
        };
        self.spherical = self.clamp(eased);

        self.target += self.pan_delta;

        camera.set_position(self.target + self.spherical.to_offset());
        camera.look_at(self.target);

        let inertia = self.config.inertia;
        self.spherical_delta.theta *= inertia;
        self.spherical_delta.phi *= inertia;
        self.spherical_delta.radius = 1.0;
        self.pan_delta *= inertia;
    }

    /// Snap the rig to the camera's current position, dropping pending
    /// motion and easing.
    pub fn force_position(&mut self, camera: &mut Camera) {
        self.spherical = Spherical::from_offset(camera.position() - self.target);
        self.spherical_target = self.spherical;
        self.spherical_delta = Spherical::new(1.0, 0.0, 0.0);
        self.pan_delta = Vec3::ZERO;
        camera.look_at(self.target);
    }

    // ===== GESTURES =====

    /// Drag rotation: a full viewport height turns `2π · rotate_speed`
    pub fn rotate(&mut self, delta_px: Vec2, viewport_height: f32) {
        if !self.config.enabled || !self.config.enable_rotate || !(viewport_height > 0.0) {
            return;
        }
        let scale = 2.0 * PI * self.config.rotate_speed / viewport_height;
        self.rotate_left(delta_px.x * scale);
        self.rotate_up(delta_px.y * scale);
    }

    /// Wheel zoom: negative deltas zoom in, positive zoom out
    pub fn zoom(&mut self, camera: &mut Camera, wheel_delta: f32) {
        if !self.config.enabled || !self.config.enable_zoom {
            return;
        }
        let scale = self.zoom_scale();
        if wheel_delta < 0.0 {
            self.dolly(camera, 1.0 / scale);
        } else if wheel_delta > 0.0 {
            self.dolly(camera, scale);
        }
    }

    /// Zoom by `scale` (> 1 zooms in) according to the zoom style.
    ///
    /// With the `Fov` style an orthographic camera changes its zoom factor.
    pub fn dolly(&mut self, camera: &mut Camera, scale: f32) {
        if !self.config.enabled || !self.config.enable_zoom || !(scale > 0.0) {
            return;
        }
        match self.config.zoom_style {
            ZoomStyle::Dolly => self.spherical_delta.radius /= scale,
            ZoomStyle::Fov => match camera.fov() {
                Some(fov) => camera.set_fov(fov / scale),
                None => camera.set_zoom(camera.zoom() * scale),
            },
        }
    }

    /// Drag pan: moves the target in the camera's view plane so the point
    /// under the cursor roughly follows it.
    pub fn pan(&mut self, camera: &Camera, delta_px: Vec2, viewport_height: f32) {
        if !self.config.enabled || !self.config.enable_pan || !(viewport_height > 0.0) {
            return;
        }
        let delta = delta_px * self.config.pan_speed;
        let fov = camera.fov().unwrap_or(ORTHOGRAPHIC_PAN_FOV);
        let target_distance = (camera.position() - self.target).length() * (fov.to_radians() / 2.0).tan();

        let rotation = camera.transform().rotation();
        let left = rotation * Vec3::X * -(2.0 * delta.x * target_distance / viewport_height);
        let up = rotation * Vec3::Y * (2.0 * delta.y * target_distance / viewport_height);
        self.pan_delta += left + up;
    }

    // ===== INTERNALS =====

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.config.zoom_speed)
    }

    fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    fn clamp(&self, spherical: Spherical) -> Spherical {
        let config = &self.config;
        let theta = spherical.theta.max(config.min_azimuth).min(config.max_azimuth);
        let phi = spherical
            .phi
            .max(config.min_polar.max(POLE_EPSILON))
            .min(config.max_polar.min(PI - POLE_EPSILON));
        let radius = spherical.radius.max(config.min_distance).min(config.max_distance);
        Spherical { radius, phi, theta }
    }
}

#[cfg(test)]
#[path = "orbit_tests.rs"]
mod tests;
