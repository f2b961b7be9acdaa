use std::{collections::HashMap, iter};

use wgpu::util::DeviceExt;

use crate::{
    camera::Camera,
    context::Context,
    data_structures::{
        block::BlockKey,
        instance::{BlockVertex, InstanceRaw},
        light::Sun,
        material::Material,
        texture::{self, Texture},
    },
    engine::{BlockEngine, Canvas, EngineConfig, EngineError},
    math::{self, Mat4},
    pipelines::{
        basic::mk_block_pipeline,
        light::{SunUniform, UniformResources},
    },
    resources,
};

/// Maps the GL clip-space depth range `[-1, 1]` onto wgpu's `[0, 1]`.
#[rustfmt::skip]
const OPENGL_TO_WGPU_MATRIX: Mat4 = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
];

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    fn from_camera(camera: &Camera) -> Self {
        let mut view_proj = [0.0; 16];
        math::multiply(&mut view_proj, &OPENGL_TO_WGPU_MATRIX, &camera.view_projection());
        Self {
            view_proj: math::to_cols(&view_proj),
        }
    }
}

struct GpuBlock {
    instance: InstanceRaw,
    /// `None` draws with the shared white texture.
    bind_group: Option<wgpu::BindGroup>,
    texture: Option<Texture>,
}

/// Block engine on wgpu: one instanced draw per block over a shared cube,
/// presented to the canvas window.
pub struct WgpuEngine {
    ctx: Context,
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    white_bind_group: wgpu::BindGroup,
    camera: Camera,
    camera_uniform: UniformResources,
    sun_uniform: UniformResources,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    blocks: HashMap<BlockKey, GpuBlock>,
    /// Draw order, matching the slots of `instance_buffer`.
    order: Vec<BlockKey>,
    instance_buffer: Option<wgpu::Buffer>,
    instances_dirty: bool,
    clear_color: wgpu::Color,
    running: bool,
}

impl WgpuEngine {
    pub async fn new(canvas: &Canvas, config: &EngineConfig) -> Result<Self, EngineError> {
        let window = canvas.window().ok_or(EngineError::NoWindow)?.clone();
        let ctx = Context::new(window).await?;
        let device = &ctx.device;

        let camera = config.camera(ctx.config.width as f32 / ctx.config.height as f32);
        let camera_uniform =
            UniformResources::new(device, "camera", &CameraUniform::from_camera(&camera));
        let sun_uniform = UniformResources::new(device, "sun", &SunUniform::from(&config.sun));

        let texture_layout = texture::texture_bind_group_layout(device);
        let pipeline = mk_block_pipeline(
            device,
            ctx.config.format,
            &texture_layout,
            &camera_uniform.bind_group_layout,
            &sun_uniform.bind_group_layout,
        );
        let white = Texture::white(device, &ctx.queue);
        let white_bind_group = texture::texture_bind_group(device, &texture_layout, &white);

        let vertices = BlockVertex::from_interleaved(&resources::cube_vertices());
        let indices = resources::cube_indices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let [r, g, b, a] = config.clear_color.map(f64::from);
        log::info!(
            "wgpu engine ready ({}x{}, {:?})",
            ctx.config.width,
            ctx.config.height,
            ctx.config.format
        );

        Ok(Self {
            pipeline,
            texture_layout,
            white_bind_group,
            camera,
            camera_uniform,
            sun_uniform,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            blocks: HashMap::new(),
            order: Vec::new(),
            instance_buffer: None,
            instances_dirty: false,
            clear_color: wgpu::Color { r, g, b, a },
            running: false,
            ctx,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn dispose(self) {
        if let Some(buffer) = &self.instance_buffer {
            buffer.destroy();
        }
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        for block in self.blocks.values() {
            if let Some(texture) = &block.texture {
                texture.texture.destroy();
            }
        }
        log::debug!("wgpu engine disposed");
    }

    fn upload_instances(&mut self) {
        self.order = self.blocks.keys().copied().collect();
        let raws: Vec<InstanceRaw> = self.order.iter().map(|k| self.blocks[k].instance).collect();
        if let Some(old) = self.instance_buffer.take() {
            old.destroy();
        }
        if !raws.is_empty() {
            self.instance_buffer = Some(self.ctx.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some("Block Instance Buffer"),
                    contents: bytemuck::cast_slice(&raws),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            ));
        }
        self.instances_dirty = false;
    }
}

impl BlockEngine for WgpuEngine {
    fn add_block(&mut self, key: BlockKey, material: &Material) -> Result<(), EngineError> {
        let mut model = [0.0; 16];
        math::translate(&mut model, &math::IDENTITY, key.center());

        let (bind_group, texture) = match &material.image {
            Some(image) => {
                let texture = Texture::from_rgba(
                    &self.ctx.device,
                    &self.ctx.queue,
                    image,
                    Some(&format!("block {key}")),
                );
                let group =
                    texture::texture_bind_group(&self.ctx.device, &self.texture_layout, &texture);
                (Some(group), Some(texture))
            }
            None => (None, None),
        };

        self.blocks.insert(
            key,
            GpuBlock {
                instance: InstanceRaw::new(&model, material.rgba()),
                bind_group,
                texture,
            },
        );
        self.instances_dirty = true;
        log::debug!("wgpu: added block {key}");
        Ok(())
    }

    fn remove_block(&mut self, key: BlockKey) -> bool {
        let Some(block) = self.blocks.remove(&key) else {
            return false;
        };
        if let Some(texture) = block.texture {
            texture.texture.destroy();
        }
        self.instances_dirty = true;
        true
    }

    fn set_sun(&mut self, sun: Sun) {
        self.sun_uniform.write(&self.ctx.queue, &SunUniform::from(&sun));
    }

    fn start(&mut self) {
        self.running = true;
        self.ctx.window.request_redraw();
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
        if self.instances_dirty {
            self.upload_instances();
        }
        self.camera_uniform
            .write(&self.ctx.queue, &CameraUniform::from_camera(&self.camera));

        let output = self
            .ctx
            .surface
            .get_current_texture()
            .map_err(|e| EngineError::Surface(e.to_string()))?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Block Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(instances) = &self.instance_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(1, &self.camera_uniform.bind_group, &[]);
                render_pass.set_bind_group(2, &self.sun_uniform.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, instances.slice(..));
                render_pass
                    .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                for (slot, key) in self.order.iter().enumerate() {
                    let Some(block) = self.blocks.get(key) else {
                        continue;
                    };
                    let group = block.bind_group.as_ref().unwrap_or(&self.white_bind_group);
                    render_pass.set_bind_group(0, group, &[]);
                    let slot = slot as u32;
                    render_pass.draw_indexed(0..self.index_count, 0, slot..slot + 1);
                }
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        self.ctx.window.pre_present_notify();
        output.present();
        self.ctx.window.request_redraw();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.ctx.resize(width, height);
        self.camera.set_aspect(width as f32 / height as f32);
    }

    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn contains_block(&self, key: BlockKey) -> bool {
        self.blocks.contains_key(&key)
    }
}

impl std::fmt::Debug for WgpuEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuEngine")
            .field("size", &(self.ctx.config.width, self.ctx.config.height))
            .field("blocks", &self.blocks.len())
            .field("running", &self.running)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_remap_moves_near_plane_to_zero() {
        let near = math::transform_point(&OPENGL_TO_WGPU_MATRIX, [0.0, 0.0, -1.0]);
        let far = math::transform_point(&OPENGL_TO_WGPU_MATRIX, [0.0, 0.0, 1.0]);
        assert_eq!(near[2] / near[3], 0.0);
        assert_eq!(far[2] / far[3], 1.0);
    }
}
