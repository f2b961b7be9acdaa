//! Shader compilation for the hand-rolled GL path.
//!
//! [`ShaderProgram::compile`] builds a linked program from a vertex and a
//! fragment source. Failures carry the driver's info log so the caller can
//! surface it; there is no retry and no fallback program.

use crate::gl::{GlContext, ShaderStage};

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("could not create GL object: {0}")]
    Create(String),
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("program failed to link: {log}")]
    Link { log: String },
}

/// A linked vertex + fragment program.
///
/// The program is owned by whoever compiled it and must be released with
/// [`ShaderProgram::dispose`]; dropping it leaks the GL object.
#[derive(Debug)]
pub struct ShaderProgram<G: GlContext> {
    program: G::Program,
}

impl<G: GlContext> ShaderProgram<G> {
    pub fn compile(gl: &G, vertex_src: &str, fragment_src: &str) -> Result<Self, ShaderError> {
        let vertex = compile_stage(gl, ShaderStage::Vertex, vertex_src)?;
        let fragment = match compile_stage(gl, ShaderStage::Fragment, fragment_src) {
            Ok(shader) => shader,
            Err(e) => {
                gl.delete_shader(vertex);
                return Err(e);
            }
        };

        let program = match gl.create_program() {
            Ok(program) => program,
            Err(e) => {
                gl.delete_shader(vertex);
                gl.delete_shader(fragment);
                return Err(ShaderError::Create(e));
            }
        };
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        let linked = gl.program_link_status(program);

        // Stage objects are no longer needed once linking has run.
        for shader in [vertex, fragment] {
            gl.detach_shader(program, shader);
            gl.delete_shader(shader);
        }

        if !linked {
            let log = gl.program_info_log(program);
            gl.delete_program(program);
            return Err(ShaderError::Link { log });
        }

        Ok(Self { program })
    }

    pub fn handle(&self) -> G::Program {
        self.program
    }

    pub fn dispose(self, gl: &G) {
        gl.delete_program(self.program);
    }
}

fn compile_stage<G: GlContext>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, ShaderError> {
    let shader = gl.create_shader(stage).map_err(ShaderError::Create)?;
    gl.shader_source(shader, source);
    gl.compile_shader(shader);
    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(ShaderError::Compile { stage, log });
    }
    Ok(shader)
}

/// Default block shader: lit, colored, optionally textured.
///
/// Written against GLSL ES 1.00 so the sampler can keep the `texture` uniform
/// name (in 3.00 that name shadows the sampling builtin). Runs on WebGL1,
/// WebGL2 and GLES contexts.
pub const BASIC_VERTEX: &str = r#"#version 100
precision highp float;

attribute vec3 position;
attribute vec3 normal;
attribute vec2 uv;

uniform mat4 projection;
uniform mat4 view;
uniform mat4 model;

varying vec3 v_normal;
varying vec2 v_uv;

void main() {
    v_normal = mat3(model[0].xyz, model[1].xyz, model[2].xyz) * normal;
    v_uv = uv;
    gl_Position = projection * view * model * vec4(position, 1.0);
}
"#;

pub const BASIC_FRAGMENT: &str = r#"#version 100
precision mediump float;

varying vec3 v_normal;
varying vec2 v_uv;

uniform vec4 color;
uniform sampler2D texture;
uniform int use_texture;
uniform vec3 sun_direction;
uniform vec3 sun_color;

void main() {
    vec4 base = color;
    if (use_texture != 0) {
        base *= texture2D(texture, v_uv);
    }
    float diffuse = max(dot(normalize(v_normal), -sun_direction), 0.0);
    vec3 lit = base.rgb * (0.2 + sun_color * diffuse);
    gl_FragColor = vec4(lit, base.a);
}
"#;
