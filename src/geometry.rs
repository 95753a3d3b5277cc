//! Hand-built geometry for the demo scene: the axis-widget line and the
//! textured cube.
//!
//! Vertex data is fixed at compile time; the cube's scale factor is baked
//! into the uploaded positions, never applied per frame.

use std::sync::Arc;

use glam::{Vec2, Vec3, vec2, vec3};
use glow::HasContext;

use crate::abs::{Mesh, Vertex};

/// World-space length of one axis arm.
pub const AXIS_LENGTH: f32 = 5.0;

/// A position with a flat colour attribute, for line primitives.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineVertex {
    pub position: Vec3,
    pub colour: Vec3,
}

impl Vertex for LineVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<LineVertex>() as i32;
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(
                1,
                3,
                glow::FLOAT,
                false,
                stride,
                3 * std::mem::size_of::<f32>() as i32,
            );
        }
    }
}

/// A position with a texture coordinate, for the cube.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TexturedVertex {
    pub position: Vec3,
    pub uv: Vec2,
}

impl Vertex for TexturedVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<TexturedVertex>() as i32;
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(
                1,
                2,
                glow::FLOAT,
                false,
                stride,
                3 * std::mem::size_of::<f32>() as i32,
            );
        }
    }
}

/// One line along +Z, drawn three times under different local rotations to
/// form the axis widget.
pub fn axis_line_vertices() -> [LineVertex; 2] {
    [
        LineVertex {
            position: Vec3::ZERO,
            colour: vec3(1.0, 0.0, 0.0),
        },
        LineVertex {
            position: vec3(0.0, 0.0, AXIS_LENGTH),
            colour: vec3(1.0, 0.0, 0.0),
        },
    ]
}

/// Uploads the axis line as an indexed line list.
pub fn axis_line_mesh(gl: &Arc<glow::Context>) -> Result<Mesh, String> {
    Mesh::new(gl, &axis_line_vertices(), &[0, 1], glow::LINES)
}

/// Unit-cube triangle positions, two triangles per face.
const CUBE_POSITIONS: [[f32; 3]; 36] = [
    // back
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    // front
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    // top
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
    // bottom
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0],
    // left
    [-1.0, 1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    // right
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Texture coordinates matching [`CUBE_POSITIONS`] vertex for vertex.
const CUBE_UVS: [[f32; 2]; 36] = [
    // back
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    // front
    [0.0, 1.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [1.0, 0.0],
    [0.0, 1.0],
    // top
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [0.0, 0.0],
    // bottom
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
    [1.0, 1.0],
    [0.0, 0.0],
    // left
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
    // right
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [0.0, 0.0],
    [0.0, 1.0],
    [1.0, 1.0],
];

/// Builds the cube's 36 vertices with `scale` baked into the positions.
pub fn crate_vertices(scale: f32) -> Vec<TexturedVertex> {
    CUBE_POSITIONS
        .iter()
        .zip(CUBE_UVS.iter())
        .map(|(p, uv)| TexturedVertex {
            position: vec3(p[0], p[1], p[2]) * scale,
            uv: vec2(uv[0], uv[1]),
        })
        .collect()
}

/// Uploads the cube as a non-indexed triangle list.
pub fn crate_mesh(gl: &Arc<glow::Context>, scale: f32) -> Result<Mesh, String> {
    Mesh::without_indices(gl, &crate_vertices(scale), glow::TRIANGLES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_36_vertices() {
        assert_eq!(crate_vertices(0.2).len(), 36);
    }

    #[test]
    fn cube_scale_is_baked_into_positions() {
        let scaled = crate_vertices(0.2);
        for (vertex, raw) in scaled.iter().zip(CUBE_POSITIONS.iter()) {
            let expected = vec3(raw[0], raw[1], raw[2]) * 0.2;
            assert!((vertex.position - expected).length() < 1e-6);
            // every unit coordinate is +-1, so every baked one is +-scale
            for c in vertex.position.to_array() {
                assert!((c.abs() - 0.2).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn cube_uvs_stay_in_unit_square() {
        for vertex in crate_vertices(1.0) {
            assert!((0.0..=1.0).contains(&vertex.uv.x));
            assert!((0.0..=1.0).contains(&vertex.uv.y));
        }
    }

    #[test]
    fn axis_line_spans_positive_z() {
        let [a, b] = axis_line_vertices();
        assert_eq!(a.position, Vec3::ZERO);
        assert_eq!(b.position, vec3(0.0, 0.0, AXIS_LENGTH));
    }
}
