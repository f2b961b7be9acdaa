use wgpu::util::DeviceExt;

use crate::data_structures::light::Sun;

/// Ambient term shared with the other engines' shading.
pub const AMBIENT: f32 = 0.2;

/// GPU side of the [`Sun`].
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SunUniform {
    direction: [f32; 3],
    intensity: f32,
    color: [f32; 3],
    ambient: f32,
}

impl From<&Sun> for SunUniform {
    fn from(sun: &Sun) -> Self {
        Self {
            direction: sun.direction().into(),
            intensity: sun.intensity,
            color: sun.color,
            ambient: AMBIENT,
        }
    }
}

/// Buffer and bind group for one uniform struct, bound at binding 0.
#[derive(Debug)]
pub struct UniformResources {
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl UniformResources {
    pub fn new<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, value: &T) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(std::slice::from_ref(value)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_bind_group_layout(device, label);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(label),
        });
        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write<T: bytemuck::Pod>(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(std::slice::from_ref(value)));
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some(label),
    })
}
