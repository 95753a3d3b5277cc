//! On-screen status text.
//!
//! The overlay renders one line of text through a tiny built-in 5x7 pixel
//! font. Glyphs are rasterized into an RGBA atlas once at startup, and each
//! label becomes a small quad batch drawn in screen space with an
//! orthographic projection. White atlas texels are tinted by a colour
//! uniform at draw time.

use std::sync::Arc;

use fxhash::FxHashMap;
use glam::{Mat4, Vec2, Vec3, vec2};
use glow::HasContext;

use crate::abs::{Mesh, ShaderRegistry, Texture, Vertex};

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Glyph cell in the atlas, one blank pixel of padding on each side.
const CELL_WIDTH: u32 = GLYPH_WIDTH + 1;
const CELL_HEIGHT: u32 = GLYPH_HEIGHT + 1;

/// Every renderable character, in atlas order. Lookup is case-insensitive;
/// anything not listed here renders as a blank advance.
const CHARSET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789&:.- ";

/// Row bitmaps per glyph, one entry per [`CHARSET`] character. Bit 4 is the
/// leftmost column.
#[rustfmt::skip]
const GLYPHS: [[u8; 7]; 41] = [
    [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // A
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110], // B
    [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110], // C
    [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110], // D
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111], // E
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000], // F
    [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111], // G
    [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // H
    [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // I
    [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100], // J
    [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001], // K
    [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111], // L
    [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001], // M
    [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001], // N
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // O
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000], // P
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101], // Q
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001], // R
    [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110], // S
    [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // T
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // U
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // V
    [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010], // W
    [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001], // X
    [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100], // Y
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111], // Z
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111], // 2
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110], // 3
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110], // 5
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000], // 7
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100], // 9
    [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101], // &
    [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000], // :
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100], // .
    [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000], // -
    [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000], // space
];

/// Screen-space vertex for overlay quads.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudVertex {
    pub position: Vec2,
    pub uv: Vec2,
}

impl Vertex for HudVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<HudVertex>() as i32;
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(
                1,
                2,
                glow::FLOAT,
                false,
                stride,
                2 * std::mem::size_of::<f32>() as i32,
            );
        }
    }
}

/// The built-in font: atlas layout and text measurement. Carries no GPU
/// state, so layout logic stays testable on its own.
pub struct BitmapFont {
    indices: FxHashMap<char, usize>,
}

impl BitmapFont {
    pub fn new() -> Self {
        let indices = CHARSET.chars().enumerate().map(|(i, c)| (c, i)).collect();
        Self { indices }
    }

    /// Pixel size of the rasterized atlas.
    pub fn atlas_size() -> (u32, u32) {
        (CHARSET.chars().count() as u32 * CELL_WIDTH, CELL_HEIGHT)
    }

    /// Rasterizes the glyph table into tightly packed RGBA bytes, white on
    /// transparent.
    pub fn rasterize(&self) -> Vec<u8> {
        let (width, height) = Self::atlas_size();
        let mut pixels = vec![0u8; (width * height * 4) as usize];
        for (index, rows) in GLYPHS.iter().enumerate() {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits >> (GLYPH_WIDTH - 1 - col) & 1 == 1 {
                        let x = index as u32 * CELL_WIDTH + col;
                        let offset = ((row as u32 * width + x) * 4) as usize;
                        pixels[offset..offset + 4].copy_from_slice(&[255, 255, 255, 255]);
                    }
                }
            }
        }
        pixels
    }

    fn glyph_index(&self, c: char) -> Option<usize> {
        self.indices.get(&c.to_ascii_uppercase()).copied()
    }

    /// Pixel footprint of `text` at the given scale.
    pub fn measure(&self, text: &str, scale: f32) -> Vec2 {
        let advances = text.chars().count() as f32;
        let width = (advances * CELL_WIDTH as f32 - 1.0).max(0.0);
        vec2(width * scale, GLYPH_HEIGHT as f32 * scale)
    }

    /// Builds one quad per visible glyph, advancing left to right from
    /// `origin` (top-left, y down). Spaces and unknown characters advance
    /// the pen without emitting geometry.
    pub fn layout(&self, text: &str, origin: Vec2, scale: f32) -> (Vec<HudVertex>, Vec<u32>) {
        let (atlas_w, atlas_h) = Self::atlas_size();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let mut pen_x = origin.x;
        for c in text.chars() {
            let index = self.glyph_index(c);
            if let Some(index) = index
                && !c.is_whitespace()
            {
                let u0 = (index as u32 * CELL_WIDTH) as f32 / atlas_w as f32;
                let u1 = (index as u32 * CELL_WIDTH + GLYPH_WIDTH) as f32 / atlas_w as f32;
                let v1 = GLYPH_HEIGHT as f32 / atlas_h as f32;
                let w = GLYPH_WIDTH as f32 * scale;
                let h = GLYPH_HEIGHT as f32 * scale;
                let base = vertices.len() as u32;
                vertices.extend_from_slice(&[
                    HudVertex {
                        position: vec2(pen_x, origin.y),
                        uv: vec2(u0, 0.0),
                    },
                    HudVertex {
                        position: vec2(pen_x + w, origin.y),
                        uv: vec2(u1, 0.0),
                    },
                    HudVertex {
                        position: vec2(pen_x + w, origin.y + h),
                        uv: vec2(u1, v1),
                    },
                    HudVertex {
                        position: vec2(pen_x, origin.y + h),
                        uv: vec2(u0, v1),
                    },
                ]);
                indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
            }
            pen_x += CELL_WIDTH as f32 * scale;
        }
        (vertices, indices)
    }
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-left-origin screen projection. Zero dimensions clamp to one pixel so
/// a minimized window cannot produce a non-finite matrix.
fn screen_projection(width: u32, height: u32) -> Mat4 {
    let (width, height) = (width.max(1), height.max(1));
    Mat4::orthographic_rh_gl(0.0, width as f32, height as f32, 0.0, -1.0, 1.0)
}

/// The overlay itself: font atlas on the GPU plus the current label batch.
pub struct Hud {
    gl: Arc<glow::Context>,
    font: BitmapFont,
    atlas: Texture,
    label: Option<Mesh>,
    text: String,
    colour: Vec3,
    projection: Mat4,
    origin: Vec2,
    scale: f32,
}

impl Hud {
    pub fn new(gl: &Arc<glow::Context>, width: u32, height: u32) -> Result<Self, String> {
        let font = BitmapFont::new();
        let (atlas_w, atlas_h) = BitmapFont::atlas_size();
        let atlas = Texture::from_rgba(gl, atlas_w, atlas_h, &font.rasterize())?;
        let mut hud = Self {
            gl: Arc::clone(gl),
            font,
            atlas,
            label: None,
            text: String::new(),
            colour: Vec3::ONE,
            projection: Mat4::IDENTITY,
            origin: vec2(10.0, 20.0),
            scale: 2.0,
        };
        hud.set_viewport(width, height);
        Ok(hud)
    }

    /// Rebuilds the screen-space projection after a resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.projection = screen_projection(width, height);
    }

    /// Replaces the label. The quad batch is only rebuilt when the text
    /// actually changes; a colour change alone is a uniform update.
    pub fn set_label(&mut self, text: &str, colour: Vec3) -> Result<(), String> {
        if self.text != text {
            let (vertices, indices) = self.font.layout(text, self.origin, self.scale);
            self.label = if vertices.is_empty() {
                None
            } else {
                Some(Mesh::new(&self.gl, &vertices, &indices, glow::TRIANGLES)?)
            };
            self.text = text.to_string();
            log::debug!(
                "label now \"{text}\", {}px wide",
                self.font.measure(text, self.scale).x
            );
        }
        self.colour = colour;
        Ok(())
    }

    /// Draws the label over the scene. Depth testing is suspended so the
    /// text always lands on top.
    pub fn draw(&self, registry: &ShaderRegistry) -> Result<(), String> {
        let Some(label) = &self.label else {
            return Ok(());
        };
        let program = registry.program("hud")?;
        program.use_program();
        program.set_uniform("u_projection", &self.projection);
        program.set_uniform("u_colour", self.colour);
        program.set_uniform("u_tex", 0i32);
        self.atlas.bind(0);
        unsafe {
            self.gl.disable(glow::DEPTH_TEST);
        }
        label.draw();
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_table_matches_charset() {
        assert_eq!(CHARSET.chars().count(), GLYPHS.len());
    }

    #[test]
    fn glyph_rows_fit_five_columns() {
        for rows in &GLYPHS {
            for bits in rows {
                assert!(*bits < 1 << GLYPH_WIDTH);
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let font = BitmapFont::new();
        assert_eq!(font.glyph_index('a'), font.glyph_index('A'));
        assert_eq!(font.glyph_index('A'), Some(0));
        assert!(font.glyph_index('~').is_none());
    }

    #[test]
    fn atlas_has_expected_pixels_for_a() {
        let font = BitmapFont::new();
        let pixels = font.rasterize();
        let (width, _) = BitmapFont::atlas_size();
        // 'A' is the first cell; its top row is .###.
        let alpha = |x: u32, y: u32| pixels[((y * width + x) * 4 + 3) as usize];
        assert_eq!(alpha(0, 0), 0);
        assert_eq!(alpha(1, 0), 255);
        assert_eq!(alpha(2, 0), 255);
        assert_eq!(alpha(3, 0), 255);
        assert_eq!(alpha(4, 0), 0);
    }

    #[test]
    fn layout_skips_spaces_but_advances_the_pen() {
        let font = BitmapFont::new();
        let scale = 2.0;
        let (vertices, indices) = font.layout("A B", Vec2::ZERO, scale);
        assert_eq!(vertices.len(), 8);
        assert_eq!(indices.len(), 12);
        // B sits two advances in
        assert_eq!(vertices[4].position.x, 2.0 * CELL_WIDTH as f32 * scale);
    }

    #[test]
    fn layout_of_blank_text_is_empty() {
        let font = BitmapFont::new();
        let (vertices, indices) = font.layout("   ", Vec2::ZERO, 1.0);
        assert!(vertices.is_empty());
        assert!(indices.is_empty());
    }

    #[test]
    fn measure_counts_advances() {
        let font = BitmapFont::new();
        let size = font.measure("ABC", 1.0);
        assert_eq!(size.x, (3 * CELL_WIDTH - 1) as f32);
        assert_eq!(size.y, GLYPH_HEIGHT as f32);
        assert_eq!(font.measure("", 1.0).x, 0.0);
    }

    #[test]
    fn screen_projection_puts_the_origin_top_left() {
        let p = screen_projection(720, 576);
        let corner = p.project_point3(Vec3::ZERO);
        assert!((corner.x + 1.0).abs() < 1e-6, "{corner:?}");
        assert!((corner.y - 1.0).abs() < 1e-6, "{corner:?}");
    }

    #[test]
    fn screen_projection_survives_a_minimized_window() {
        let p = screen_projection(0, 0);
        assert!(p.to_cols_array().iter().all(|f| f.is_finite()));
    }
}
