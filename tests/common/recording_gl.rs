//! A [`GlContext`] that records every call instead of talking to a GPU.

use std::{
    cell::{Cell, RefCell},
    collections::HashSet,
    rc::Rc,
};

use block_ngin::{
    gl::{BufferTarget, GlContext, Primitive, ShaderStage},
    math::Mat4,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    CreateBuffer(u32),
    BindBuffer(BufferTarget, Option<u32>),
    BufferData(BufferTarget, usize),
    DeleteBuffer(u32),
    EnableAttrib(u32),
    AttribPointer {
        index: u32,
        size: i32,
        stride: i32,
        offset: i32,
    },
    UniformMatrix4(String, Mat4),
    UniformVec3(String, [f32; 3]),
    UniformVec4(String, [f32; 4]),
    UniformI32(String, i32),
    CreateTexture {
        id: u32,
        width: u32,
        height: u32,
    },
    BindTexture(u32, Option<u32>),
    DeleteTexture(u32),
    Viewport(i32, i32, i32, i32),
    EnableDepthTest,
    ClearColor([f32; 4]),
    Clear,
    DrawArrays(Primitive, i32, i32),
    DrawElements(Primitive, i32, i32),
}

impl Call {
    pub fn is_draw(&self) -> bool {
        matches!(self, Call::DrawArrays(..) | Call::DrawElements(..))
    }
}

#[derive(Debug, Default)]
struct Inner {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    fail_compile: Cell<Option<ShaderStage>>,
    fail_link: Cell<bool>,
    fail_texture: Cell<bool>,
    missing: RefCell<HashSet<String>>,
    stages: RefCell<Vec<(u32, ShaderStage)>>,
}

/// Cloning shares the call log, so a test can keep a handle while an engine
/// owns the context.
#[derive(Debug, Clone, Default)]
pub struct RecordingGl {
    inner: Rc<Inner>,
}

const ATTRIBUTES: [&str; 3] = ["position", "normal", "uv"];

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compilation of `stage` reports failure with a fixed info log.
    pub fn failing_compile(self, stage: ShaderStage) -> Self {
        self.inner.fail_compile.set(Some(stage));
        self
    }

    pub fn failing_link(self) -> Self {
        self.inner.fail_link.set(true);
        self
    }

    /// Makes texture creation fail (as an out-of-memory context would) on a
    /// context already in use.
    pub fn set_failing_texture(&self, fail: bool) {
        self.inner.fail_texture.set(fail);
    }

    /// Attribute and uniform names the "driver" reports as absent.
    pub fn without(self, names: &[&str]) -> Self {
        self.inner
            .missing
            .borrow_mut()
            .extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.inner.calls.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.inner.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn draws(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_draw).collect()
    }

    fn record(&self, call: Call) {
        self.inner.calls.borrow_mut().push(call);
    }

    fn next_id(&self) -> u32 {
        let id = self.inner.next_id.get() + 1;
        self.inner.next_id.set(id);
        id
    }

    fn is_missing(&self, name: &str) -> bool {
        self.inner.missing.borrow().contains(name)
    }
}

impl GlContext for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type Texture = u32;
    type UniformLocation = String;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let id = self.next_id();
        self.inner.stages.borrow_mut().push((id, stage));
        self.record(Call::CreateShader(stage, id));
        Ok(id)
    }

    fn shader_source(&self, _shader: u32, _source: &str) {}

    fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        let stage = self
            .inner
            .stages
            .borrow()
            .iter()
            .find(|(id, _)| *id == shader)
            .map(|(_, stage)| *stage);
        stage != self.inner.fail_compile.get() || stage.is_none()
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        "0:1: syntax error".to_string()
    }

    fn delete_shader(&self, shader: u32) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let id = self.next_id();
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::DetachShader(program, shader));
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, _program: u32) -> bool {
        !self.inner.fail_link.get()
    }

    fn program_info_log(&self, _program: u32) -> String {
        "varying v_uv not written".to_string()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        if self.is_missing(name) {
            return None;
        }
        ATTRIBUTES.iter().position(|a| *a == name).map(|i| i as u32)
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<String> {
        (!self.is_missing(name)).then(|| name.to_string())
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let id = self.next_id();
        self.record(Call::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<u32>) {
        self.record(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        self.record(Call::BufferData(target, data.len()));
    }

    fn delete_buffer(&self, buffer: u32) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableAttrib(index));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        self.record(Call::AttribPointer {
            index,
            size,
            stride,
            offset,
        });
    }

    fn uniform_matrix4(&self, location: &String, value: &Mat4) {
        self.record(Call::UniformMatrix4(location.clone(), *value));
    }

    fn uniform_vec3(&self, location: &String, value: [f32; 3]) {
        self.record(Call::UniformVec3(location.clone(), value));
    }

    fn uniform_vec4(&self, location: &String, value: [f32; 4]) {
        self.record(Call::UniformVec4(location.clone(), value));
    }

    fn uniform_i32(&self, location: &String, value: i32) {
        self.record(Call::UniformI32(location.clone(), value));
    }

    fn create_texture_rgba8(&self, width: u32, height: u32, pixels: &[u8]) -> Result<u32, String> {
        if self.inner.fail_texture.get() {
            return Err("out of memory".to_string());
        }
        if pixels.len() != (width * height * 4) as usize {
            return Err(format!("{} bytes for {width}x{height}", pixels.len()));
        }
        let id = self.next_id();
        self.record(Call::CreateTexture { id, width, height });
        Ok(id)
    }

    fn bind_texture(&self, unit: u32, texture: Option<u32>) {
        self.record(Call::BindTexture(unit, texture));
    }

    fn delete_texture(&self, texture: u32) {
        self.record(Call::DeleteTexture(texture));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn enable_depth_test(&self) {
        self.record(Call::EnableDepthTest);
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.record(Call::ClearColor(rgba));
    }

    fn clear(&self) {
        self.record(Call::Clear);
    }

    fn draw_arrays(&self, mode: Primitive, first: i32, count: i32) {
        self.record(Call::DrawArrays(mode, first, count));
    }

    fn draw_elements_u16(&self, mode: Primitive, count: i32, offset: i32) {
        self.record(Call::DrawElements(mode, count, offset));
    }
}
