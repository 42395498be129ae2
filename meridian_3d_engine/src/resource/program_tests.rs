use glam::Vec3;
use super::*;

#[test]
fn test_program_ids_are_unique_and_increasing() {
    let a = Program::new("a");
    let b = Program::new("b");
    assert_ne!(a.id(), b.id());
    assert!(a.id() < b.id());
}

#[test]
fn test_clone_keeps_identity() {
    let a = Program::new("a");
    assert_eq!(a.clone().id(), a.id());
}

#[test]
fn test_default_state_is_opaque() {
    let program = Program::new("basic");
    assert_eq!(program.cull_face(), Some(CullFace::Back));
    assert_eq!(program.front_face(), FrontFace::CounterClockwise);
    assert!(program.depth_test());
    assert!(program.depth_write());
    assert_eq!(program.depth_func(), DepthFunc::Less);
    assert_eq!(program.blend(), None);
    assert!(!program.transparent());
}

#[test]
fn test_transparent_enables_alpha_blend() {
    let program = Program::new("glass").with_transparent(true);
    assert!(program.transparent());
    assert_eq!(program.blend(), Some(BlendState::alpha()));

    let additive = Program::new("glow")
        .with_blend(Some(BlendState::additive()))
        .with_transparent(true);
    assert_eq!(additive.blend(), Some(BlendState::additive()));
}

#[test]
fn test_front_face_flip() {
    assert_eq!(FrontFace::CounterClockwise.flipped(), FrontFace::Clockwise);
    assert_eq!(FrontFace::Clockwise.flipped().flipped(), FrontFace::Clockwise);
}

#[test]
fn test_default_uniforms() {
    let program = Program::new("tinted").with_uniform("uColor", UniformValue::Vec3(Vec3::ONE));
    assert_eq!(program.uniforms().get("uColor"), Some(&UniformValue::Vec3(Vec3::ONE)));
}
