//! The slice of OpenGL ES 3 / WebGL2 the hand-rolled render path talks to.
//!
//! [`GlContext`] covers exactly the calls [`crate::shader`], the mesh and the
//! scene issue. Keeping the surface this narrow means the whole path runs
//! against any context that can provide these calls: a real [`glow`] context
//! (see [`GlowContext`]) or a recording fake in tests.

use std::fmt::Debug;

use crate::math::Mat4;

#[cfg(feature = "gl-engine")]
mod native;
#[cfg(feature = "gl-engine")]
pub use native::GlowContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// `ARRAY_BUFFER`
    Vertex,
    /// `ELEMENT_ARRAY_BUFFER`
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
}

/// GPU calls needed by the hand-rolled render path.
///
/// Handles are opaque and owned by whoever created them; nothing here is
/// reference counted. All calls take `&self` because GL contexts are
/// single-threaded state machines driven from one thread.
pub trait GlContext {
    type Shader: Copy + Debug;
    type Program: Copy + Debug;
    type Buffer: Copy + Debug;
    type Texture: Copy + Debug;
    type UniformLocation: Clone + Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);
    /// Uploads `data` with `STATIC_DRAW` usage to the buffer bound to `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: Self::Buffer);

    fn enable_vertex_attrib_array(&self, index: u32);
    /// Float attribute pointer; `stride` and `offset` are in bytes.
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);

    fn uniform_matrix4(&self, location: &Self::UniformLocation, value: &Mat4);
    fn uniform_vec3(&self, location: &Self::UniformLocation, value: [f32; 3]);
    fn uniform_vec4(&self, location: &Self::UniformLocation, value: [f32; 4]);
    fn uniform_i32(&self, location: &Self::UniformLocation, value: i32);

    /// Creates a 2D RGBA8 texture from tightly packed pixel rows.
    fn create_texture_rgba8(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self::Texture, String>;
    fn bind_texture(&self, unit: u32, texture: Option<Self::Texture>);
    fn delete_texture(&self, texture: Self::Texture);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn enable_depth_test(&self);
    fn clear_color(&self, rgba: [f32; 4]);
    /// Clears the color and depth buffers.
    fn clear(&self);

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32);
    /// Indexed draw over `u16` indices; `offset` is in bytes.
    fn draw_elements_u16(&self, mode: Primitive, count: i32, offset: i32);
}
