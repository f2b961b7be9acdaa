use std::{collections::HashMap, path::Path};

use anyhow::Context as _;
use image::RgbaImage;

use crate::{
    camera::Camera,
    data_structures::{block::BlockKey, light::Sun, material::Material, mesh::DEFAULT_STRIDE},
    engine::{BlockEngine, Canvas, EngineConfig, EngineError},
    math::{self, Mat4},
    raster::{ClipVertex, Framebuffer},
    resources,
};

const AMBIENT: f32 = 0.2;

struct SoftBlock {
    model: Mat4,
    material: Material,
}

/// CPU fallback engine. Needs nothing from the host except a size and
/// renders into an in-memory image.
pub struct SoftwareEngine {
    framebuffer: Framebuffer,
    blocks: HashMap<BlockKey, SoftBlock>,
    camera: Camera,
    sun: Sun,
    clear_color: [f32; 4],
    cube_vertices: Vec<f32>,
    cube_indices: Vec<u16>,
    running: bool,
    frames: u64,
}

impl SoftwareEngine {
    pub fn new(canvas: &Canvas, config: &EngineConfig) -> Result<Self, EngineError> {
        let (width, height) = canvas.physical_size();
        if width == 0 || height == 0 {
            return Err(EngineError::ZeroSize { width, height });
        }
        log::info!("software engine ready ({width}x{height})");
        let mut framebuffer = Framebuffer::new(width, height);
        framebuffer.clear(config.clear_color);
        Ok(Self {
            framebuffer,
            blocks: HashMap::new(),
            camera: config.camera(width as f32 / height as f32),
            sun: config.sun,
            clear_color: config.clear_color,
            cube_vertices: resources::cube_vertices(),
            cube_indices: resources::cube_indices(),
            running: false,
            frames: 0,
        })
    }

    /// The last rendered frame.
    pub fn frame(&self) -> &RgbaImage {
        self.framebuffer.color()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Writes the last frame as an image, format picked from the extension.
    pub fn save_frame(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.frame()
            .save(path)
            .with_context(|| format!("writing frame to {}", path.display()))
    }

    pub fn dispose(mut self) {
        self.blocks.clear();
        log::debug!("software engine disposed after {} frames", self.frames);
    }

    fn draw_block(&mut self, view_projection: &Mat4, block: &SoftBlock) {
        let mut mvp = [0.0; 16];
        math::multiply(&mut mvp, view_projection, &block.model);

        let stride = DEFAULT_STRIDE;
        let vertex = |i: u16| -> (ClipVertex, [f32; 3]) {
            let v = &self.cube_vertices[i as usize * stride..(i as usize + 1) * stride];
            let clip = math::transform_point(&mvp, [v[0], v[1], v[2]]);
            let normal = math::transform_vector(&block.model, [v[3], v[4], v[5]]);
            (ClipVertex { clip, uv: [v[6], v[7]] }, normal)
        };

        let mut triangles = Vec::with_capacity(self.cube_indices.len() / 3);
        for tri in self.cube_indices.chunks_exact(3) {
            let (a, normal) = vertex(tri[0]);
            let (b, _) = vertex(tri[1]);
            let (c, _) = vertex(tri[2]);
            triangles.push(([a, b, c], normal));
        }

        let radiance = self.sun.radiance();
        for (vertices, normal) in triangles {
            let normal = math::normalize(normal).unwrap_or(normal);
            let diffuse = self.sun.diffuse(normal);
            let light = radiance.map(|r| AMBIENT + r * diffuse);
            let material = &block.material;
            self.framebuffer.draw_triangle(vertices, |uv| {
                let texel = material.sample(uv[0], uv[1]);
                [
                    material.color[0] * texel[0] * light[0],
                    material.color[1] * texel[1] * light[1],
                    material.color[2] * texel[2] * light[2],
                ]
            });
        }
    }
}

impl BlockEngine for SoftwareEngine {
    fn add_block(&mut self, key: BlockKey, material: &Material) -> Result<(), EngineError> {
        let mut model = [0.0; 16];
        math::translate(&mut model, &math::IDENTITY, key.center());
        self.blocks.insert(
            key,
            SoftBlock {
                model,
                material: material.clone(),
            },
        );
        log::debug!("software: added block {key}");
        Ok(())
    }

    fn remove_block(&mut self, key: BlockKey) -> bool {
        self.blocks.remove(&key).is_some()
    }

    fn set_sun(&mut self, sun: Sun) {
        self.sun = sun;
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
        self.framebuffer.clear(self.clear_color);
        let view_projection = self.camera.view_projection();
        let blocks = std::mem::take(&mut self.blocks);
        for block in blocks.values() {
            self.draw_block(&view_projection, block);
        }
        self.blocks = blocks;
        self.frames += 1;
        log::trace!("software frame {} ({} blocks)", self.frames, self.blocks.len());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.framebuffer.resize(width, height);
        self.framebuffer.clear(self.clear_color);
        self.camera.set_aspect(width as f32 / height as f32);
    }

    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn contains_block(&self, key: BlockKey) -> bool {
        self.blocks.contains_key(&key)
    }
}

impl std::fmt::Debug for SoftwareEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareEngine")
            .field("size", &(self.framebuffer.width(), self.framebuffer.height()))
            .field("blocks", &self.blocks.len())
            .field("running", &self.running)
            .finish()
    }
}
