use std::rc::Rc;

use glow::HasContext;

use crate::{
    gl::{BufferTarget, GlContext, Primitive, ShaderStage},
    math::Mat4,
};

/// [`GlContext`] backed by a host-created [`glow::Context`].
///
/// The host owns window and context creation (glutin, SDL, a WebGL2 canvas...)
/// and hands the loaded context over. Cloning shares the same context.
#[derive(Clone)]
pub struct GlowContext {
    gl: Rc<glow::Context>,
}

impl GlowContext {
    pub fn new(gl: glow::Context) -> Self {
        Self { gl: Rc::new(gl) }
    }

    pub fn raw(&self) -> &glow::Context {
        &self.gl
    }
}

impl std::fmt::Debug for GlowContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GlowContext")
    }
}

impl From<glow::Context> for GlowContext {
    fn from(gl: glow::Context) -> Self {
        Self::new(gl)
    }
}

fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn target_enum(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn primitive_enum(mode: Primitive) -> u32 {
    match mode {
        Primitive::Triangles => glow::TRIANGLES,
    }
}

// SAFETY (all blocks below): the wrapped context is current on this thread
// for as long as the host keeps it alive, and every handle passed in was
// created by this same context.
impl GlContext for GlowContext {
    type Shader = <glow::Context as HasContext>::Shader;
    type Program = <glow::Context as HasContext>::Program;
    type Buffer = <glow::Context as HasContext>::Buffer;
    type Texture = <glow::Context as HasContext>::Texture;
    type UniformLocation = <glow::Context as HasContext>::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { self.gl.create_shader(stage_enum(stage)) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.detach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(target_enum(target), buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(target_enum(target), data, glow::STATIC_DRAW)
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset)
        }
    }

    fn uniform_matrix4(&self, location: &Self::UniformLocation, value: &Mat4) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(location), false, value)
        }
    }

    fn uniform_vec3(&self, location: &Self::UniformLocation, value: [f32; 3]) {
        unsafe {
            self.gl
                .uniform_3_f32(Some(location), value[0], value[1], value[2])
        }
    }

    fn uniform_vec4(&self, location: &Self::UniformLocation, value: [f32; 4]) {
        unsafe {
            self.gl
                .uniform_4_f32(Some(location), value[0], value[1], value[2], value[3])
        }
    }

    fn uniform_i32(&self, location: &Self::UniformLocation, value: i32) {
        unsafe { self.gl.uniform_1_i32(Some(location), value) }
    }

    fn create_texture_rgba8(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self::Texture, String> {
        unsafe {
            let texture = self.gl.create_texture()?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width.min(i32::MAX as u32) as i32,
                height.min(i32::MAX as u32) as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
            self.gl.bind_texture(glow::TEXTURE_2D, None);
            Ok(texture)
        }
    }

    fn bind_texture(&self, unit: u32, texture: Option<Self::Texture>) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, texture);
        }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { self.gl.delete_texture(texture) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn enable_depth_test(&self) {
        unsafe { self.gl.enable(glow::DEPTH_TEST) }
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        unsafe { self.gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]) }
    }

    fn clear(&self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT) }
    }

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(primitive_enum(mode), first, count) }
    }

    fn draw_elements_u16(&self, mode: Primitive, count: i32, offset: i32) {
        unsafe {
            self.gl
                .draw_elements(primitive_enum(mode), count, glow::UNSIGNED_SHORT, offset)
        }
    }
}
