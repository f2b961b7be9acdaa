//! Scene and frame loop for the hand-rolled GL path.
//!
//! A [`Scene`] keeps meshes in insertion order (which is also the draw order;
//! there is no depth sorting or batching) and at most one camera. Every frame
//! clears color and depth, then calls `update` followed by `draw` on each mesh.
//!
//! The loop itself is driven by a [`FrameSignal`], the host's "next display
//! frame" notification. It runs until the signal reports that the host
//! context is gone, or until someone calls [`LoopControl::stop`].

use std::{
    cell::RefCell,
    rc::Rc,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use instant::Instant;

use crate::{
    camera::Camera,
    data_structures::{
        light::Sun,
        mesh::{Mesh, MeshError},
    },
    gl::GlContext,
};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene has no camera")]
    NoCamera,
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// The host's display refresh signal.
pub trait FrameSignal {
    /// Blocks (or yields) until the next frame should be drawn. Returns
    /// `false` once the host context is destroyed and no frame will come.
    fn wait_next_frame(&mut self) -> bool;
}

/// Cloneable stop switch for a running [`Scene::start`] loop.
#[derive(Debug, Clone, Default)]
pub struct LoopControl {
    stopped: Arc<AtomicBool>,
}

impl LoopControl {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.stopped.store(false, Ordering::Relaxed);
    }
}

pub type SharedMesh<G> = Rc<RefCell<Mesh<G>>>;
pub type SharedCamera = Rc<RefCell<Camera>>;

pub struct Scene<G: GlContext> {
    meshes: Vec<SharedMesh<G>>,
    camera: Option<SharedCamera>,
    sun: Sun,
    clear_color: [f32; 4],
    control: LoopControl,
    frames: u64,
    last_frame: Option<Instant>,
}

impl<G: GlContext> Scene<G> {
    pub fn new(clear_color: [f32; 4]) -> Self {
        Self {
            meshes: Vec::new(),
            camera: None,
            sun: Sun::default(),
            clear_color,
            control: LoopControl::default(),
            frames: 0,
            last_frame: None,
        }
    }

    /// Appends a mesh; it is drawn after every mesh added before it.
    pub fn add(&mut self, mesh: SharedMesh<G>) {
        self.meshes.push(mesh);
    }

    pub fn set_camera(&mut self, camera: SharedCamera) {
        self.camera = Some(camera);
    }

    pub fn camera(&self) -> Option<&SharedCamera> {
        self.camera.as_ref()
    }

    pub fn set_sun(&mut self, sun: Sun) {
        self.sun = sun;
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn meshes(&self) -> &[SharedMesh<G>] {
        &self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Drops the scene's reference to `mesh` (compared by identity).
    pub(crate) fn detach(&mut self, mesh: &SharedMesh<G>) {
        self.meshes.retain(|m| !Rc::ptr_eq(m, mesh));
    }

    /// Number of frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn render_frame(&mut self, gl: &G) -> Result<(), SceneError> {
        let camera = self.camera.as_ref().ok_or(SceneError::NoCamera)?.borrow();

        gl.clear_color(self.clear_color);
        gl.clear();
        for mesh in &self.meshes {
            let mut mesh = mesh.borrow_mut();
            mesh.update();
            mesh.draw(gl, &camera, &self.sun)?;
        }

        let now = Instant::now();
        if let Some(last) = self.last_frame {
            log::trace!("frame {} took {:?}", self.frames, now - last);
        }
        self.last_frame = Some(now);
        self.frames += 1;
        Ok(())
    }

    /// Handle that can stop a loop started with [`Scene::start`].
    pub fn loop_control(&self) -> LoopControl {
        self.control.clone()
    }

    /// Renders one frame per display signal until the signal ends or the loop
    /// is stopped through [`Scene::loop_control`]. A failing frame ends the
    /// loop and returns its error.
    ///
    /// A stop requested before `start` ends the loop before its first frame.
    /// The switch is re-armed when the loop returns, so the scene can be
    /// started again.
    pub fn start(&mut self, gl: &G, signal: &mut impl FrameSignal) -> Result<(), SceneError> {
        gl.enable_depth_test();
        let result = self.run_loop(gl, signal);
        self.control.reset();
        log::debug!("scene loop ended after {} frames", self.frames);
        result
    }

    fn run_loop(&mut self, gl: &G, signal: &mut impl FrameSignal) -> Result<(), SceneError> {
        while !self.control.is_stopped() && signal.wait_next_frame() {
            self.render_frame(gl)?;
        }
        Ok(())
    }
}
