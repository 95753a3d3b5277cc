//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing vertex data on the
//! GPU side. Vertices should implement the [`Vertex`] trait. Meshes are
//! uploaded once at creation and are immutable afterwards; the GPU handles
//! are released on drop.

use std::sync::Arc;

use glow::HasContext;

/// Trait that defines the necessary methods for a vertex.
///
/// Implementors must be `#[repr(C)]` so the attribute offsets match the
/// in-memory layout handed to the GPU.
pub trait Vertex {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs(gl: &glow::Context);
}

/// Represents a mesh stored on the GPU side, drawn either through an index
/// buffer or as a plain vertex array.
pub struct Mesh {
    gl: Arc<glow::Context>,
    draw_mode: u32,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: Option<glow::Buffer>,
    count: usize,
}

impl Mesh {
    /// Creates an indexed mesh from the given vertex and index data.
    pub fn new<V: Vertex>(
        gl: &Arc<glow::Context>,
        vertices: &[V],
        indices: &[u32],
        draw_mode: u32,
    ) -> Result<Self, String> {
        let mut mesh = Self::upload(gl, vertices, draw_mode)?;
        unsafe {
            gl.bind_vertex_array(Some(mesh.vao));
            let ebo = gl.create_buffer().map_err(|e| e.to_string())?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    indices.as_ptr() as *const u8,
                    indices.len() * std::mem::size_of::<u32>(),
                ),
                glow::STATIC_DRAW,
            );
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
            mesh.ebo = Some(ebo);
        }
        mesh.count = indices.len();
        Ok(mesh)
    }

    /// Creates a non-indexed mesh drawn with `draw_arrays`.
    pub fn without_indices<V: Vertex>(
        gl: &Arc<glow::Context>,
        vertices: &[V],
        draw_mode: u32,
    ) -> Result<Self, String> {
        Self::upload(gl, vertices, draw_mode)
    }

    fn upload<V: Vertex>(
        gl: &Arc<glow::Context>,
        vertices: &[V],
        draw_mode: u32,
    ) -> Result<Self, String> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(|e| e.to_string())?;
            let vbo = gl.create_buffer().map_err(|e| e.to_string())?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    vertices.as_ptr() as *const u8,
                    vertices.len() * std::mem::size_of::<V>(),
                ),
                glow::STATIC_DRAW,
            );

            V::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                draw_mode,
                vao,
                vbo,
                ebo: None,
                count: vertices.len(),
            })
        }
    }

    /// Draws the mesh.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            match self.ebo {
                Some(_) => self.gl.draw_elements(
                    self.draw_mode,
                    self.count as i32,
                    glow::UNSIGNED_INT,
                    0,
                ),
                None => self.gl.draw_arrays(self.draw_mode, 0, self.count as i32),
            }
            self.gl.bind_vertex_array(None);
        }
    }

    /// The number of indices (indexed) or vertices (non-indexed) drawn.
    pub fn element_count(&self) -> usize {
        self.count
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            if let Some(ebo) = self.ebo {
                self.gl.delete_buffer(ebo);
            }
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
