//! GPU mesh for the hand-rolled GL path.
//!
//! A [`Mesh`] uploads an interleaved vertex buffer (and optionally a `u16`
//! triangle index buffer) once, resolves the attribute and uniform locations
//! of its program once, and afterwards only spins and draws.
//!
//! Vertex records are `stride` floats long and start with
//! `position(3) + normal(3) + uv(2)`. A stride shorter than 8 simply drops
//! the trailing attributes; a longer one leaves room for extra data the
//! built-in attributes ignore.

use crate::{
    camera::Camera,
    data_structures::light::Sun,
    gl::{BufferTarget, GlContext, Primitive},
    math::{self, Mat4, Vec3},
    shader::ShaderProgram,
};

/// Floats per vertex of the standard position + normal + uv layout.
pub const DEFAULT_STRIDE: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("invalid vertex layout: {0}")]
    InvalidLayout(String),
    #[error("GL error: {0}")]
    Gl(String),
    #[error("mesh was disposed")]
    Disposed,
}

#[derive(Debug, Clone)]
pub struct MeshDescriptor {
    pub vertices: Vec<f32>,
    pub indices: Option<Vec<u16>>,
    /// Floats per vertex record.
    pub stride: usize,
    /// Radians added to the rotation of each axis on every [`Mesh::update`].
    pub rotation_speed: Vec3,
    pub position: Vec3,
    pub color: [f32; 4],
}

impl Default for MeshDescriptor {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            indices: None,
            stride: DEFAULT_STRIDE,
            rotation_speed: [0.0; 3],
            position: [0.0; 3],
            color: [1.0; 4],
        }
    }
}

/// Attribute and uniform locations resolved once per mesh.
///
/// Anything the program does not declare (or the driver optimized out) is
/// `None` and silently skipped at draw time.
#[derive(Debug)]
pub struct LocationCache<G: GlContext> {
    pub position: Option<u32>,
    pub normal: Option<u32>,
    pub uv: Option<u32>,
    pub projection: Option<G::UniformLocation>,
    pub view: Option<G::UniformLocation>,
    pub model: Option<G::UniformLocation>,
    pub color: Option<G::UniformLocation>,
    pub texture: Option<G::UniformLocation>,
    pub use_texture: Option<G::UniformLocation>,
    pub sun_direction: Option<G::UniformLocation>,
    pub sun_color: Option<G::UniformLocation>,
}

impl<G: GlContext> LocationCache<G> {
    fn resolve(gl: &G, program: G::Program) -> Self {
        let uniform = |name| gl.uniform_location(program, name);
        Self {
            position: gl.attrib_location(program, "position"),
            normal: gl.attrib_location(program, "normal"),
            uv: gl.attrib_location(program, "uv"),
            projection: uniform("projection"),
            view: uniform("view"),
            model: uniform("model"),
            color: uniform("color"),
            texture: uniform("texture"),
            use_texture: uniform("use_texture"),
            sun_direction: uniform("sun_direction"),
            sun_color: uniform("sun_color"),
        }
    }
}

/// An uploaded mesh with its own model transform.
///
/// The program is borrowed at construction and must outlive the mesh; the
/// buffers and the optional texture belong to the mesh and are released by
/// [`Mesh::dispose`]. Dropping a mesh without disposing it leaks them for the
/// lifetime of the context.
#[derive(Debug)]
pub struct Mesh<G: GlContext> {
    program: G::Program,
    vertex_buffer: Option<G::Buffer>,
    index_buffer: Option<G::Buffer>,
    texture: Option<G::Texture>,
    locations: Option<LocationCache<G>>,
    stride: usize,
    vertex_count: usize,
    index_count: usize,
    rotation: Vec3,
    rotation_speed: Vec3,
    position: Vec3,
    model: Mat4,
    color: [f32; 4],
}

impl<G: GlContext> Mesh<G> {
    pub fn new(
        gl: &G,
        program: &ShaderProgram<G>,
        desc: MeshDescriptor,
    ) -> Result<Self, MeshError> {
        let vertex_count = validate(&desc)?;

        let vertex_buffer = gl.create_buffer().map_err(MeshError::Gl)?;
        gl.bind_buffer(BufferTarget::Vertex, Some(vertex_buffer));
        gl.buffer_data(BufferTarget::Vertex, bytemuck::cast_slice(&desc.vertices));
        gl.bind_buffer(BufferTarget::Vertex, None);

        let (index_buffer, index_count) = match &desc.indices {
            Some(indices) => {
                let buffer = match gl.create_buffer() {
                    Ok(buffer) => buffer,
                    Err(e) => {
                        gl.delete_buffer(vertex_buffer);
                        return Err(MeshError::Gl(e));
                    }
                };
                gl.bind_buffer(BufferTarget::Index, Some(buffer));
                gl.buffer_data(BufferTarget::Index, bytemuck::cast_slice(indices));
                gl.bind_buffer(BufferTarget::Index, None);
                (Some(buffer), indices.len())
            }
            None => (None, 0),
        };

        let locations = LocationCache::resolve(gl, program.handle());

        let mut mesh = Self {
            program: program.handle(),
            vertex_buffer: Some(vertex_buffer),
            index_buffer,
            texture: None,
            locations: Some(locations),
            stride: desc.stride,
            vertex_count,
            index_count,
            rotation: [0.0; 3],
            rotation_speed: desc.rotation_speed,
            position: desc.position,
            model: math::IDENTITY,
            color: desc.color,
        };
        mesh.rebuild_model();
        Ok(mesh)
    }

    /// Advances the rotation by one step of `rotation_speed` and rebuilds the
    /// model matrix.
    pub fn update(&mut self) {
        for (angle, speed) in self.rotation.iter_mut().zip(self.rotation_speed) {
            *angle += speed;
        }
        self.rebuild_model();
    }

    // Order is fixed: translate, then X, Y, Z. Swapping axes changes the result.
    fn rebuild_model(&mut self) {
        let mut a = math::IDENTITY;
        let mut b = [0.0; 16];
        math::translate(&mut b, &a, self.position);
        math::rotate_x(&mut a, &b, self.rotation[0]);
        math::rotate_y(&mut b, &a, self.rotation[1]);
        math::rotate_z(&mut self.model, &b, self.rotation[2]);
    }

    /// Binds the program and buffers, uploads uniforms and issues one draw
    /// call covering the whole mesh.
    pub fn draw(&self, gl: &G, camera: &Camera, sun: &Sun) -> Result<(), MeshError> {
        let (Some(locations), Some(vertex_buffer)) = (&self.locations, self.vertex_buffer) else {
            return Err(MeshError::Disposed);
        };

        gl.use_program(Some(self.program));
        if let Some(l) = &locations.projection {
            gl.uniform_matrix4(l, camera.projection());
        }
        if let Some(l) = &locations.view {
            gl.uniform_matrix4(l, camera.view());
        }
        if let Some(l) = &locations.model {
            gl.uniform_matrix4(l, &self.model);
        }
        if let Some(l) = &locations.color {
            gl.uniform_vec4(l, self.color);
        }
        if let Some(l) = &locations.sun_direction {
            gl.uniform_vec3(l, sun.direction().into());
        }
        if let Some(l) = &locations.sun_color {
            gl.uniform_vec3(l, sun.radiance());
        }
        match self.texture {
            Some(texture) => {
                gl.bind_texture(0, Some(texture));
                if let Some(l) = &locations.texture {
                    gl.uniform_i32(l, 0);
                }
                if let Some(l) = &locations.use_texture {
                    gl.uniform_i32(l, 1);
                }
            }
            None => {
                if let Some(l) = &locations.use_texture {
                    gl.uniform_i32(l, 0);
                }
            }
        }

        gl.bind_buffer(BufferTarget::Vertex, Some(vertex_buffer));
        let stride_bytes = (self.stride * size_of::<f32>()) as i32;
        let attributes = [
            (locations.position, 0, 3),
            (locations.normal, 3, 3),
            (locations.uv, 6, 2),
        ];
        for (location, offset, size) in attributes {
            let Some(index) = location else { continue };
            if offset + size > self.stride {
                continue;
            }
            gl.enable_vertex_attrib_array(index);
            gl.vertex_attrib_pointer_f32(
                index,
                size as i32,
                stride_bytes,
                (offset * size_of::<f32>()) as i32,
            );
        }

        match self.index_buffer {
            Some(index_buffer) => {
                gl.bind_buffer(BufferTarget::Index, Some(index_buffer));
                gl.draw_elements_u16(Primitive::Triangles, self.index_count as i32, 0);
            }
            None => gl.draw_arrays(Primitive::Triangles, 0, self.vertex_count as i32),
        }
        Ok(())
    }

    /// Attaches a texture the mesh takes ownership of, releasing any previous one.
    pub fn set_texture(&mut self, gl: &G, texture: G::Texture) {
        if let Some(old) = self.texture.replace(texture) {
            gl.delete_texture(old);
        }
    }

    /// Releases the GPU buffers and texture. Further draws fail with
    /// [`MeshError::Disposed`]; disposing twice is a no-op.
    pub fn dispose(&mut self, gl: &G) {
        if let Some(buffer) = self.vertex_buffer.take() {
            gl.delete_buffer(buffer);
        }
        if let Some(buffer) = self.index_buffer.take() {
            gl.delete_buffer(buffer);
        }
        if let Some(texture) = self.texture.take() {
            gl.delete_texture(texture);
        }
        self.locations = None;
    }

    pub fn is_disposed(&self) -> bool {
        self.vertex_buffer.is_none()
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn rotation_speed(&self) -> Vec3 {
        self.rotation_speed
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn model_matrix(&self) -> &Mat4 {
        &self.model
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of indices, `0` for a non-indexed mesh.
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }

    pub fn locations(&self) -> Option<&LocationCache<G>> {
        self.locations.as_ref()
    }
}

/// Checks the descriptor and returns the vertex count.
fn validate(desc: &MeshDescriptor) -> Result<usize, MeshError> {
    if desc.stride < 3 {
        return Err(MeshError::InvalidLayout(format!(
            "stride {} cannot hold a position",
            desc.stride
        )));
    }
    if desc.vertices.is_empty() {
        return Err(MeshError::InvalidLayout("no vertices".to_string()));
    }
    if desc.vertices.len() % desc.stride != 0 {
        return Err(MeshError::InvalidLayout(format!(
            "{} floats is not a multiple of stride {}",
            desc.vertices.len(),
            desc.stride
        )));
    }
    let vertex_count = desc.vertices.len() / desc.stride;
    if let Some(indices) = &desc.indices {
        if indices.len() % 3 != 0 {
            return Err(MeshError::InvalidLayout(format!(
                "{} indices do not form whole triangles",
                indices.len()
            )));
        }
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::InvalidLayout(format!(
                "index {bad} out of range for {vertex_count} vertices"
            )));
        }
    }
    Ok(vertex_count)
}
