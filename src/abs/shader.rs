//! OpenGL shader management.
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for
//! compiling and linking GLSL programs, the [`Uniform`] trait for setting
//! uniform variables by name, and the [`ShaderRegistry`] which owns linked
//! programs under string names. The registry is plain owned state; callers
//! pass it by reference wherever programs are needed.

use std::{path::Path, sync::Arc};

use fxhash::FxHashMap;
use glam::{Mat3, Mat4, Vec3};
use glow::HasContext;

/// A single pipeline stage of a shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_type(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<glow::Context>, stage: ShaderStage, source: &str) -> Result<Self, String> {
        unsafe {
            let shader = gl.create_shader(stage.gl_type()).map_err(|e| e.to_string())?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(format!("{} shader failed to compile: {log}", stage.label()));
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }

    /// Reads GLSL source from disk and compiles it.
    pub fn from_source_file(
        gl: &Arc<glow::Context>,
        stage: ShaderStage,
        path: &Path,
    ) -> Result<Self, String> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read shader source {}: {e}", path.display()))?;
        Self::new(gl, stage, &source).map_err(|e| format!("{}: {e}", path.display()))
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform variable in the given shader program.
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str);
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_1_i32(Some(&loc), *self);
            }
        }
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_3_f32(Some(&loc), self.x, self.y, self.z);
            }
        }
    }
}

impl Uniform for Mat3 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_matrix_3_f32_slice(Some(&loc), false, self.as_ref());
            }
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, self.as_ref());
            }
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        (*self).set_uniform(gl, program, name);
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, String> {
        unsafe {
            let program = gl.create_program().map_err(|e| e.to_string())?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(format!("shader program failed to link: {log}"));
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
            })
        }
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Sets a uniform variable in the shader program. Uniforms the GLSL
    /// compiler stripped resolve to no location and are skipped.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        value.set_uniform(&self.gl, self.id, name);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}

/// Owns linked shader programs under string names.
pub struct ShaderRegistry {
    gl: Arc<glow::Context>,
    programs: FxHashMap<String, ShaderProgram>,
}

impl ShaderRegistry {
    /// Creates an empty registry bound to the given context.
    pub fn new(gl: &Arc<glow::Context>) -> Self {
        Self {
            gl: Arc::clone(gl),
            programs: FxHashMap::default(),
        }
    }

    /// Compiles the vertex and fragment sources at the given paths, links
    /// them, and stores the program under `name`. Any failure carries the
    /// offending path or program name and the GL info log.
    pub fn load_program(
        &mut self,
        name: &str,
        vert_path: &Path,
        frag_path: &Path,
    ) -> Result<(), String> {
        let vert = Shader::from_source_file(&self.gl, ShaderStage::Vertex, vert_path)?;
        let frag = Shader::from_source_file(&self.gl, ShaderStage::Fragment, frag_path)?;
        let program = ShaderProgram::new(&self.gl, &[&vert, &frag])
            .map_err(|e| format!("program `{name}`: {e}"))?;
        log::debug!(
            "linked shader program `{name}` from {} + {}",
            vert_path.display(),
            frag_path.display()
        );
        self.programs.insert(name.to_string(), program);
        Ok(())
    }

    /// Looks up a linked program by name.
    pub fn program(&self, name: &str) -> Result<&ShaderProgram, String> {
        self.programs
            .get(name)
            .ok_or_else(|| format!("no shader program named `{name}`"))
    }
}
