#![cfg(feature = "gl-engine")]

use std::sync::Arc;

use block_ngin::{
    data_structures::{block::BlockKey, light::Sun, material::Material},
    engine::{BlockEngine, EngineConfig, EngineError, GlEngine},
    gl::{Primitive, ShaderStage},
};
use image::{Rgba, RgbaImage};

mod common;
use common::recording_gl::{Call, RecordingGl};

fn engine(gl: &RecordingGl) -> GlEngine<RecordingGl> {
    GlEngine::new(gl.clone(), &EngineConfig::default(), 320, 240).unwrap()
}

fn red() -> Material {
    Material::flat([1.0, 0.0, 0.0])
}

#[test]
fn nothing_is_drawn_until_started() {
    let gl = RecordingGl::new();
    let mut engine = engine(&gl);
    engine.add_block(BlockKey::new(0, 0, 0), &red()).unwrap();

    gl.clear_calls();
    engine.render_frame().unwrap();
    assert!(gl.calls().is_empty());

    engine.start();
    engine.render_frame().unwrap();
    assert!(gl.calls().contains(&Call::Viewport(0, 0, 320, 240)));
    assert_eq!(gl.draws(), vec![Call::DrawElements(Primitive::Triangles, 36, 0)]);

    engine.stop();
    gl.clear_calls();
    engine.render_frame().unwrap();
    assert!(gl.draws().is_empty());
}

#[test]
fn one_draw_per_block() {
    let gl = RecordingGl::new();
    let mut engine = engine(&gl);
    for x in 0..3 {
        engine.add_block(BlockKey::new(x, 0, 0), &red()).unwrap();
    }
    // same key again replaces the block
    engine.add_block(BlockKey::new(1, 0, 0), &red()).unwrap();
    assert_eq!(engine.block_count(), 3);
    assert_eq!(engine.scene().len(), 3);

    engine.start();
    gl.clear_calls();
    engine.render_frame().unwrap();
    assert_eq!(gl.draws().len(), 3);
}

#[test]
fn block_mesh_sits_on_its_coordinate() {
    let gl = RecordingGl::new();
    let mut engine = engine(&gl);
    let key = BlockKey::new(2, -1, 5);
    engine.add_block(key, &red()).unwrap();
    let mesh = engine.block_mesh(key).unwrap().borrow();
    assert_eq!(mesh.position(), [2.0, -1.0, 5.0]);
    assert_eq!(&mesh.model_matrix()[12..15], &[2.0, -1.0, 5.0]);
}

#[test]
fn textured_block_uploads_its_image() {
    let gl = RecordingGl::new();
    let mut engine = engine(&gl);
    let material = Material {
        color: [1.0; 3],
        image: Some(Arc::new(RgbaImage::from_pixel(4, 2, Rgba([0, 255, 0, 255])))),
    };
    engine.add_block(BlockKey::new(0, 0, 0), &material).unwrap();
    let texture = gl
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::CreateTexture { id, width: 4, height: 2 } => Some(id),
            _ => None,
        })
        .expect("texture created");

    engine.start();
    gl.clear_calls();
    engine.render_frame().unwrap();
    assert!(gl.calls().contains(&Call::BindTexture(0, Some(texture))));
}

#[test]
fn removing_a_block_releases_its_buffers() {
    let gl = RecordingGl::new();
    let mut engine = engine(&gl);
    let key = BlockKey::new(0, 0, 0);
    engine.add_block(key, &red()).unwrap();

    gl.clear_calls();
    assert!(engine.remove_block(key));
    assert_eq!(gl.count(|c| matches!(c, Call::DeleteBuffer(_))), 2);
    assert!(!engine.remove_block(key));
    assert!(engine.scene().is_empty());

    engine.start();
    gl.clear_calls();
    engine.render_frame().unwrap();
    assert!(gl.draws().is_empty());
}

#[test]
fn sun_reaches_the_shader() {
    let gl = RecordingGl::new();
    let mut engine = engine(&gl);
    engine.add_block(BlockKey::new(0, 0, 0), &red()).unwrap();
    engine.set_sun(Sun::new(cgmath::Vector3::new(0.0, -1.0, 0.0), [1.0, 0.5, 0.25], 2.0));
    engine.start();
    gl.clear_calls();
    engine.render_frame().unwrap();
    let calls = gl.calls();
    assert!(calls.contains(&Call::UniformVec3("sun_direction".into(), [0.0, -1.0, 0.0])));
    assert!(calls.contains(&Call::UniformVec3("sun_color".into(), [2.0, 1.0, 0.5])));
}

#[test]
fn resize_updates_viewport_and_aspect() {
    let gl = RecordingGl::new();
    let mut engine = engine(&gl);
    engine.resize(100, 50);
    assert_eq!(engine.camera().borrow().aspect(), 2.0);
    engine.resize(0, 50);
    assert_eq!(engine.camera().borrow().aspect(), 2.0);

    engine.start();
    gl.clear_calls();
    engine.render_frame().unwrap();
    assert!(gl.calls().contains(&Call::Viewport(0, 0, 100, 50)));
}

#[test]
fn shader_failure_fails_engine_init() {
    let gl = RecordingGl::new().failing_compile(ShaderStage::Vertex);
    let err = GlEngine::new(gl, &EngineConfig::default(), 10, 10).unwrap_err();
    assert!(matches!(err, EngineError::Shader(_)));
}

#[test]
fn dispose_releases_everything() {
    let gl = RecordingGl::new();
    let mut engine = engine(&gl);
    engine.add_block(BlockKey::new(0, 0, 0), &red()).unwrap();
    engine.add_block(BlockKey::new(1, 0, 0), &red()).unwrap();
    gl.clear_calls();
    engine.dispose();
    assert_eq!(gl.count(|c| matches!(c, Call::DeleteBuffer(_))), 4);
    assert_eq!(gl.count(|c| matches!(c, Call::DeleteProgram(_))), 1);
}

#[test]
fn failed_replace_keeps_the_old_block() {
    let gl = RecordingGl::new();
    let mut engine = engine(&gl);
    let key = BlockKey::new(0, 0, 0);
    engine.add_block(key, &red()).unwrap();

    gl.set_failing_texture(true);
    gl.clear_calls();
    let textured = Material {
        color: [1.0; 3],
        image: Some(Arc::new(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255])))),
    };
    let err = engine.add_block(key, &textured).unwrap_err();
    assert!(matches!(err, EngineError::Texture(_)));

    // only the half-built replacement is released
    assert_eq!(gl.count(|c| matches!(c, Call::DeleteBuffer(_))), 2);
    assert_eq!(engine.block_count(), 1);
    assert_eq!(engine.scene().len(), 1);
    assert!(!engine.block_mesh(key).unwrap().borrow().is_disposed());

    engine.start();
    gl.clear_calls();
    engine.render_frame().unwrap();
    assert_eq!(gl.draws().len(), 1);
    assert!(gl.calls().contains(&Call::UniformVec4("color".into(), [1.0, 0.0, 0.0, 1.0])));
}
