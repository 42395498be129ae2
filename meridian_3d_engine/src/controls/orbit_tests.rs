use std::f32::consts::PI;
use glam::{Vec2, Vec3};
use crate::camera::Camera;
use super::*;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

fn camera_at(position: Vec3) -> Camera {
    let mut camera = Camera::perspective(45.0, 1.0, 0.1, 100.0);
    camera.set_position(position);
    camera
}

fn run(controller: &mut OrbitController, camera: &mut Camera, ticks: usize) {
    for _ in 0..ticks {
        controller.update(camera);
    }
}

// ============================================================================
// SPHERICAL
// ============================================================================

#[test]
fn test_spherical_from_offset() {
    let s = Spherical::from_offset(Vec3::new(0.0, 0.0, 5.0));
    assert!(approx(s.radius, 5.0));
    assert!(approx(s.phi, PI / 2.0));
    assert!(approx(s.theta, 0.0));

    let s = Spherical::from_offset(Vec3::new(3.0, 0.0, 0.0));
    assert!(approx(s.theta, PI / 2.0));

    let s = Spherical::from_offset(Vec3::ZERO);
    assert_eq!(s.radius, 0.0);
}

#[test]
fn test_spherical_offset_roundtrip() {
    let offset = Vec3::new(-2.0, 1.0, 2.0);
    assert!(approx_vec(Spherical::from_offset(offset).to_offset(), offset));
}

// ============================================================================
// UPDATE
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = OrbitConfig::default();
    assert!(config.enabled);
    assert_eq!(config.ease, 0.25);
    assert_eq!(config.inertia, 0.85);
    assert_eq!(config.zoom_style, ZoomStyle::Dolly);
    assert_eq!(config.max_polar, PI);
    assert_eq!(config.max_distance, f32::INFINITY);
}

#[test]
fn test_update_without_input_is_fixed_point() {
    let start = Vec3::new(-2.0, 1.0, 2.0);
    let mut camera = camera_at(start);
    let mut controller = OrbitController::new(&camera, OrbitConfig::default());
    let before = *controller.spherical();

    run(&mut controller, &mut camera, 100);

    assert!(approx_vec(camera.position(), start));
    let after = *controller.spherical();
    assert!(approx(after.radius, before.radius));
    assert!(approx(after.phi, before.phi));
    assert!(approx(after.theta, before.theta));
}

#[test]
fn test_update_points_camera_at_target() {
    let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
    let config = OrbitConfig { target: Vec3::new(0.0, 0.0, 1.0), ..Default::default() };
    let mut controller = OrbitController::new(&camera, config);

    controller.update(&mut camera);
    let forward = camera.transform().rotation() * Vec3::NEG_Z;
    assert!(approx_vec(forward, Vec3::NEG_Z));
}

#[test]
fn test_rotation_eases_and_decays() {
    let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
    let mut controller = OrbitController::new(&camera, OrbitConfig::default());

    controller.rotate(Vec2::new(-50.0, 0.0), 500.0);
    controller.update(&mut camera);
    let first = controller.spherical().theta;
    assert!(first > 0.0);
    // Eased: only part of the way to the target
    assert!(first < controller.spherical_target().theta);

    // Motion continues without new input, then settles
    run(&mut controller, &mut camera, 1);
    assert!(controller.spherical().theta > first);
    run(&mut controller, &mut camera, 300);
    let settled = controller.spherical().theta;
    run(&mut controller, &mut camera, 10);
    assert!(approx(controller.spherical().theta, settled));
    assert!(approx(camera.position().length(), 5.0));
}

#[test]
fn test_angles_never_leave_clamps() {
    let mut camera = camera_at(Vec3::new(0.0, 2.0, 5.0));
    let config = OrbitConfig {
        min_polar: 0.5,
        max_polar: 1.2,
        min_azimuth: -0.3,
        max_azimuth: 0.3,
        ..Default::default()
    };
    let mut controller = OrbitController::new(&camera, config);

    let inputs = [
        Vec2::new(400.0, 300.0),
        Vec2::new(-900.0, -50.0),
        Vec2::new(20.0, -700.0),
        Vec2::new(1000.0, 1000.0),
        Vec2::new(-3.0, 4.0),
    ];
    for (i, delta) in inputs.iter().cycle().take(60).enumerate() {
        if i % 3 == 0 {
            controller.rotate(*delta, 300.0);
        }
        controller.update(&mut camera);

        for s in [controller.spherical(), controller.spherical_target()] {
            assert!(s.phi >= 0.5 - 1e-6 && s.phi <= 1.2 + 1e-6, "phi {} out of range", s.phi);
            assert!(s.theta >= -0.3 - 1e-6 && s.theta <= 0.3 + 1e-6, "theta {} out of range", s.theta);
        }
    }
}

#[test]
fn test_disabled_ignores_gestures() {
    let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
    let config = OrbitConfig { enabled: false, ..Default::default() };
    let mut controller = OrbitController::new(&camera, config);

    controller.rotate(Vec2::new(100.0, 100.0), 100.0);
    controller.zoom(&mut camera, -1.0);
    controller.pan(&camera, Vec2::new(100.0, 0.0), 100.0);
    run(&mut controller, &mut camera, 10);

    assert!(approx_vec(camera.position(), Vec3::new(0.0, 0.0, 5.0)));
}

#[test]
fn test_auto_rotate_turns_every_tick() {
    let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
    let config = OrbitConfig { auto_rotate: true, enabled: false, ..Default::default() };
    let mut controller = OrbitController::new(&camera, config);

    run(&mut controller, &mut camera, 30);
    assert!(controller.spherical().theta < 0.0);
    assert!(camera.position().x < 0.0);
    assert!(approx(camera.position().length(), 5.0));
}

// ============================================================================
// ZOOM
// ============================================================================

#[test]
fn test_dolly_zoom_changes_radius_within_limits() {
    let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
    let config = OrbitConfig { min_distance: 2.0, max_distance: 8.0, ..Default::default() };
    let mut controller = OrbitController::new(&camera, config);

    controller.zoom(&mut camera, -1.0);
    run(&mut controller, &mut camera, 1);
    assert!(approx(controller.spherical_target().radius, 5.0 * 0.95));

    for _ in 0..100 {
        controller.zoom(&mut camera, -1.0);
        controller.update(&mut camera);
    }
    run(&mut controller, &mut camera, 100);
    assert!(approx(camera.position().length(), 2.0));

    for _ in 0..100 {
        controller.zoom(&mut camera, 1.0);
        controller.update(&mut camera);
    }
    run(&mut controller, &mut camera, 100);
    assert!(approx(camera.position().length(), 8.0));
    assert_eq!(camera.fov(), Some(45.0));
}

#[test]
fn test_fov_zoom_keeps_distance() {
    let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
    let config = OrbitConfig { zoom_style: ZoomStyle::Fov, ..Default::default() };
    let mut controller = OrbitController::new(&camera, config);

    controller.zoom(&mut camera, 1.0);
    run(&mut controller, &mut camera, 20);
    assert!(approx(camera.fov().unwrap(), 45.0 / 0.95));
    assert!(approx(camera.position().length(), 5.0));
}

#[test]
fn test_fov_zoom_on_orthographic_scales_zoom() {
    let mut camera = Camera::orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, 100.0, 1.0);
    camera.set_position(Vec3::new(0.0, 0.0, 5.0));
    let config = OrbitConfig { zoom_style: ZoomStyle::Fov, ..Default::default() };
    let mut controller = OrbitController::new(&camera, config);

    controller.zoom(&mut camera, -1.0);
    assert!(approx(camera.zoom(), 1.0 / 0.95));
}

// ============================================================================
// PAN
// ============================================================================

#[test]
fn test_pan_moves_target_and_camera_together() {
    let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
    let mut controller = OrbitController::new(&camera, OrbitConfig::default());
    controller.update(&mut camera);

    controller.pan(&camera, Vec2::new(10.0, 0.0), 100.0);
    controller.update(&mut camera);

    let expected = -2.0 * 1.0 * 5.0 * (22.5f32).to_radians().tan() / 100.0;
    assert!(approx(controller.target().x, expected));
    assert!(approx(camera.position().x, expected));
    assert!(approx(camera.position().z, 5.0));

    // Inertia keeps the pan going
    controller.update(&mut camera);
    assert!(controller.target().x < expected);
}

#[test]
fn test_force_position_drops_pending_motion() {
    let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
    let mut controller = OrbitController::new(&camera, OrbitConfig::default());
    controller.rotate(Vec2::new(100.0, 0.0), 100.0);

    camera.set_position(Vec3::new(0.0, 0.0, 3.0));
    controller.force_position(&mut camera);
    run(&mut controller, &mut camera, 10);

    assert!(approx_vec(camera.position(), Vec3::new(0.0, 0.0, 3.0)));
}
