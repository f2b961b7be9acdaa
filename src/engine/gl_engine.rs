use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    data_structures::{
        block::BlockKey,
        light::Sun,
        material::Material,
        mesh::{Mesh, MeshDescriptor},
    },
    engine::{BlockEngine, Canvas, EngineConfig, EngineError},
    gl::{GlContext, GlowContext},
    resources,
    scene::{Scene, SharedCamera, SharedMesh},
    shader::{self, ShaderProgram},
};

/// Block engine built on the hand-rolled GL path: one [`Mesh`] per block, all
/// sharing the built-in block program and drawn through a [`Scene`].
pub struct GlEngine<G: GlContext = GlowContext> {
    gl: G,
    program: ShaderProgram<G>,
    scene: Scene<G>,
    camera: SharedCamera,
    blocks: HashMap<BlockKey, SharedMesh<G>>,
    cube_vertices: Vec<f32>,
    cube_indices: Vec<u16>,
    viewport: (u32, u32),
    running: bool,
}

impl GlEngine<GlowContext> {
    pub(crate) fn from_canvas(canvas: &Canvas, config: &EngineConfig) -> Result<Self, EngineError> {
        let gl = canvas.gl().ok_or(EngineError::NoGlContext)?.clone();
        let (width, height) = canvas.physical_size();
        if width == 0 || height == 0 {
            return Err(EngineError::ZeroSize { width, height });
        }
        Self::new(gl, config, width, height)
    }
}

impl<G: GlContext> GlEngine<G> {
    /// Compiles the block program on `gl` and sets up camera and scene for a
    /// `width` x `height` viewport.
    pub fn new(gl: G, config: &EngineConfig, width: u32, height: u32) -> Result<Self, EngineError> {
        let program =
            ShaderProgram::compile(&gl, shader::BASIC_VERTEX, shader::BASIC_FRAGMENT)?;
        let camera = Rc::new(RefCell::new(
            config.camera(width as f32 / height.max(1) as f32),
        ));
        let mut scene = Scene::new(config.clear_color);
        scene.set_camera(camera.clone());
        scene.set_sun(config.sun);
        gl.enable_depth_test();
        log::info!("GL engine ready ({width}x{height})");

        Ok(Self {
            gl,
            program,
            scene,
            camera,
            blocks: HashMap::new(),
            cube_vertices: resources::cube_vertices(),
            cube_indices: resources::cube_indices(),
            viewport: (width, height),
            running: false,
        })
    }

    pub fn scene(&self) -> &Scene<G> {
        &self.scene
    }

    pub fn camera(&self) -> &SharedCamera {
        &self.camera
    }

    pub fn context(&self) -> &G {
        &self.gl
    }

    /// The mesh backing the block at `key`.
    pub fn block_mesh(&self, key: BlockKey) -> Option<&SharedMesh<G>> {
        self.blocks.get(&key)
    }

    pub fn dispose(mut self) {
        for (_, mesh) in self.blocks.drain() {
            mesh.borrow_mut().dispose(&self.gl);
        }
        self.program.dispose(&self.gl);
    }
}

impl<G: GlContext> BlockEngine for GlEngine<G> {
    /// A block already at `key` is only released once its replacement is
    /// fully built; on error the engine is left as it was.
    fn add_block(&mut self, key: BlockKey, material: &Material) -> Result<(), EngineError> {
        let mut mesh = Mesh::new(
            &self.gl,
            &self.program,
            MeshDescriptor {
                vertices: self.cube_vertices.clone(),
                indices: Some(self.cube_indices.clone()),
                position: key.center(),
                color: material.rgba(),
                ..Default::default()
            },
        )?;
        if let Some(image) = &material.image {
            match self
                .gl
                .create_texture_rgba8(image.width(), image.height(), image.as_raw())
            {
                Ok(texture) => mesh.set_texture(&self.gl, texture),
                Err(e) => {
                    mesh.dispose(&self.gl);
                    return Err(EngineError::Texture(e));
                }
            }
        }

        self.remove_block(key);
        let mesh = Rc::new(RefCell::new(mesh));
        self.scene.add(mesh.clone());
        self.blocks.insert(key, mesh);
        log::debug!("gl: added block {key}");
        Ok(())
    }

    fn remove_block(&mut self, key: BlockKey) -> bool {
        let Some(mesh) = self.blocks.remove(&key) else {
            return false;
        };
        self.scene.detach(&mesh);
        mesh.borrow_mut().dispose(&self.gl);
        log::debug!("gl: removed block {key}");
        true
    }

    fn set_sun(&mut self, sun: Sun) {
        self.scene.set_sun(sun);
    }

    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn render_frame(&mut self) -> Result<(), EngineError> {
        if !self.running {
            return Ok(());
        }
        let (width, height) = self.viewport;
        self.gl.viewport(0, 0, width as i32, height as i32);
        self.scene.render_frame(&self.gl)?;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.camera
            .borrow_mut()
            .set_aspect(width as f32 / height as f32);
    }

    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn contains_block(&self, key: BlockKey) -> bool {
        self.blocks.contains_key(&key)
    }
}

impl<G: GlContext> std::fmt::Debug for GlEngine<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlEngine")
            .field("blocks", &self.blocks.len())
            .field("viewport", &self.viewport)
            .field("running", &self.running)
            .finish()
    }
}
