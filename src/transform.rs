//! A position plus Euler rotation, producible as a 4x4 matrix.

use glam::{Mat4, Vec3};

/// Rotation (degrees) and translation with a fixed composition order:
/// translation, then Z, Y, X rotation applied innermost-first. Angles are
/// not range-checked; the trigonometric functions wrap them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    rotation_degrees: Vec3,
    translation: Vec3,
}

impl Transform {
    /// Identity transform at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pure rotation, the shape every keyboard spin increment takes.
    pub fn from_rotation(rx: f32, ry: f32, rz: f32) -> Self {
        let mut t = Self::new();
        t.set_rotation(rx, ry, rz);
        t
    }

    /// Sets the Euler rotation in degrees.
    pub fn set_rotation(&mut self, rx: f32, ry: f32, rz: f32) {
        self.rotation_degrees = Vec3::new(rx, ry, rz);
    }

    /// Sets the translation.
    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.translation = Vec3::new(x, y, z);
    }

    /// Composes the transform as `T * Rz * Ry * Rx`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_z(self.rotation_degrees.z.to_radians())
            * Mat4::from_rotation_y(self.rotation_degrees.y.to_radians())
            * Mat4::from_rotation_x(self.rotation_degrees.x.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat4_eq(a: Mat4, b: Mat4) {
        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn identity_by_default() {
        assert_mat4_eq(Transform::new().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn angles_are_degrees() {
        // 90 degrees about X carries +Y onto +Z.
        let t = Transform::from_rotation(90.0, 0.0, 0.0);
        let v = t.matrix().transform_vector3(Vec3::Y);
        assert!((v - Vec3::Z).length() < 1e-5, "{v:?}");
    }

    #[test]
    fn composition_order_is_t_rz_ry_rx() {
        let mut t = Transform::new();
        t.set_rotation(30.0, 45.0, 60.0);
        t.set_position(1.0, 2.0, 3.0);
        let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_z(60.0_f32.to_radians())
            * Mat4::from_rotation_y(45.0_f32.to_radians())
            * Mat4::from_rotation_x(30.0_f32.to_radians());
        assert_mat4_eq(t.matrix(), expected);
    }

    #[test]
    fn translation_lands_in_w_column() {
        let mut t = Transform::new();
        t.set_position(4.0, -5.0, 6.0);
        let m = t.matrix();
        assert_eq!(m.w_axis.truncate(), Vec3::new(4.0, -5.0, 6.0));
    }
}
