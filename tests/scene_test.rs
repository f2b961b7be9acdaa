use std::{cell::RefCell, rc::Rc};

use block_ngin::{
    camera::Camera,
    data_structures::mesh::{Mesh, MeshDescriptor},
    gl::Primitive,
    scene::{FrameSignal, LoopControl, Scene, SceneError},
    shader::{self, ShaderProgram},
};

mod common;
use common::{
    quad_vertices,
    recording_gl::{Call, RecordingGl},
};

/// Delivers a fixed number of frames, optionally stopping the loop after
/// some of them.
struct Frames {
    left: usize,
    delivered: usize,
    stop_after: Option<(usize, LoopControl)>,
}

impl Frames {
    fn new(n: usize) -> Self {
        Self {
            left: n,
            delivered: 0,
            stop_after: None,
        }
    }
}

impl FrameSignal for Frames {
    fn wait_next_frame(&mut self) -> bool {
        if self.left == 0 {
            return false;
        }
        self.left -= 1;
        self.delivered += 1;
        if let Some((after, control)) = &self.stop_after {
            if self.delivered == *after {
                control.stop();
            }
        }
        true
    }
}

fn mesh(
    gl: &RecordingGl,
    program: &ShaderProgram<RecordingGl>,
    vertices: Vec<f32>,
) -> Rc<RefCell<Mesh<RecordingGl>>> {
    Rc::new(RefCell::new(
        Mesh::new(
            gl,
            program,
            MeshDescriptor {
                vertices,
                rotation_speed: [0.0, 0.1, 0.0],
                ..Default::default()
            },
        )
        .unwrap(),
    ))
}

fn scene_with_camera() -> Scene<RecordingGl> {
    let mut scene = Scene::new([0.1, 0.2, 0.3, 1.0]);
    scene.set_camera(Rc::new(RefCell::new(Camera::new(1.0, 1.5, 0.1, 100.0))));
    scene
}

#[test]
fn frame_clears_then_draws_in_insertion_order() {
    let gl = RecordingGl::new();
    let program = ShaderProgram::compile(&gl, shader::BASIC_VERTEX, shader::BASIC_FRAGMENT).unwrap();
    let mut scene = scene_with_camera();
    // 6 vertices first, 3 second, so the draw counts identify the meshes
    scene.add(mesh(&gl, &program, quad_vertices()));
    scene.add(mesh(&gl, &program, quad_vertices()[..24].to_vec()));

    gl.clear_calls();
    scene.render_frame(&gl).unwrap();

    let calls = gl.calls();
    assert_eq!(calls[0], Call::ClearColor([0.1, 0.2, 0.3, 1.0]));
    assert_eq!(calls[1], Call::Clear);
    assert_eq!(
        gl.draws(),
        vec![
            Call::DrawArrays(Primitive::Triangles, 0, 6),
            Call::DrawArrays(Primitive::Triangles, 0, 3),
        ]
    );
    assert_eq!(scene.frame_count(), 1);
}

#[test]
fn every_frame_updates_every_mesh() {
    let gl = RecordingGl::new();
    let program = ShaderProgram::compile(&gl, shader::BASIC_VERTEX, shader::BASIC_FRAGMENT).unwrap();
    let mut scene = scene_with_camera();
    let m = mesh(&gl, &program, quad_vertices());
    scene.add(m.clone());

    scene.start(&gl, &mut Frames::new(4)).unwrap();
    assert_eq!(scene.frame_count(), 4);
    approx::assert_abs_diff_eq!(m.borrow().rotation()[1], 0.4, epsilon = 1e-6);
}

#[test]
fn render_without_camera_fails() {
    let gl = RecordingGl::new();
    let mut scene: Scene<RecordingGl> = Scene::new([0.0; 4]);
    assert!(matches!(scene.render_frame(&gl), Err(SceneError::NoCamera)));
    assert!(matches!(
        scene.start(&gl, &mut Frames::new(1)),
        Err(SceneError::NoCamera)
    ));
    assert!(gl.draws().is_empty());
}

#[test]
fn empty_scene_only_clears() {
    let gl = RecordingGl::new();
    let mut scene = scene_with_camera();
    scene.render_frame(&gl).unwrap();
    assert_eq!(gl.count(|c| *c == Call::Clear), 1);
    assert!(gl.draws().is_empty());
}

#[test]
fn loop_ends_with_the_frame_signal() {
    let gl = RecordingGl::new();
    let mut scene = scene_with_camera();
    scene.start(&gl, &mut Frames::new(3)).unwrap();
    assert_eq!(scene.frame_count(), 3);
    assert!(gl.calls().contains(&Call::EnableDepthTest));
}

#[test]
fn loop_control_stops_the_loop() {
    let gl = RecordingGl::new();
    let mut scene = scene_with_camera();
    let mut frames = Frames::new(100);
    frames.stop_after = Some((2, scene.loop_control()));

    scene.start(&gl, &mut frames).unwrap();
    assert_eq!(scene.frame_count(), 2);
    // the switch is re-armed once the loop has returned
    assert!(!scene.loop_control().is_stopped());

    scene.start(&gl, &mut Frames::new(1)).unwrap();
    assert_eq!(scene.frame_count(), 3);
}

#[test]
fn stop_before_start_renders_nothing() {
    let gl = RecordingGl::new();
    let mut scene = scene_with_camera();
    scene.loop_control().stop();

    let mut frames = Frames::new(5);
    scene.start(&gl, &mut frames).unwrap();
    assert_eq!(scene.frame_count(), 0);
    assert_eq!(frames.delivered, 0);
    assert!(gl.draws().is_empty());

    scene.start(&gl, &mut Frames::new(2)).unwrap();
    assert_eq!(scene.frame_count(), 2);
}

#[test]
fn scene_shares_mesh_handles() {
    let gl = RecordingGl::new();
    let program = ShaderProgram::compile(&gl, shader::BASIC_VERTEX, shader::BASIC_FRAGMENT).unwrap();
    let mut scene = scene_with_camera();
    let a = mesh(&gl, &program, quad_vertices());
    scene.add(a.clone());
    assert_eq!(scene.len(), 1);
    assert!(Rc::ptr_eq(&scene.meshes()[0], &a));
}
