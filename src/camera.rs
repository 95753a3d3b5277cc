//! A static look-at camera with a perspective projection.

use glam::{Mat4, Vec3};

/// Smallest aspect ratio `set_shape`/`set_aspect` will accept. Keeps a
/// zero-height window from producing a degenerate projection.
const MIN_ASPECT: f32 = 1.0e-3;

/// Holds eye/target/up and the projection parameters, with the derived view
/// and projection matrices rebuilt whenever either side changes.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    view: Mat4,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        let mut cam = Self {
            eye: Vec3::Z,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_degrees: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        cam.rebuild_view();
        cam.rebuild_projection();
        cam
    }
}

impl Camera {
    /// Establishes a static view from `eye` toward `target`.
    pub fn set(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.eye = eye;
        self.target = target;
        self.up = up;
        self.rebuild_view();
    }

    /// Rebuilds the projection from a vertical field of view in degrees,
    /// an aspect ratio, and the near/far clip planes.
    pub fn set_shape(&mut self, fov_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.fov_degrees = fov_degrees;
        self.aspect = aspect.max(MIN_ASPECT);
        self.near = near;
        self.far = far;
        self.rebuild_projection();
    }

    /// Tracks a window resize. Aspect becomes exactly `width / height` for
    /// any positive height and is clamped positive otherwise.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        let aspect = if height > 0 {
            width as f32 / height as f32
        } else {
            MIN_ASPECT
        };
        self.aspect = aspect.max(MIN_ASPECT);
        self.rebuild_projection();
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// The combined view-projection matrix.
    pub fn vp_matrix(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    fn rebuild_view(&mut self) {
        self.view = Mat4::look_at_rh(self.eye, self.target, self.up);
    }

    fn rebuild_projection(&mut self) {
        self.projection = Mat4::perspective_rh_gl(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_tracks_resize_exactly() {
        let mut cam = Camera::default();
        cam.set_aspect(1280, 720);
        assert_eq!(cam.aspect(), 1280.0 / 720.0);
        cam.set_aspect(333, 777);
        assert_eq!(cam.aspect(), 333.0 / 777.0);
    }

    #[test]
    fn degenerate_resize_clamps_aspect_positive() {
        let mut cam = Camera::default();
        cam.set_aspect(800, 0);
        assert!(cam.aspect() > 0.0 && cam.aspect().is_finite());
        cam.set_aspect(0, 600);
        assert!(cam.aspect() > 0.0 && cam.aspect().is_finite());
    }

    #[test]
    fn view_maps_eye_to_origin() {
        let mut cam = Camera::default();
        cam.set(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, Vec3::Y);
        let at_eye = cam.view_matrix().transform_point3(Vec3::new(0.0, 1.0, 5.0));
        assert!(at_eye.length() < 1e-5, "{at_eye:?}");
    }

    #[test]
    fn vp_is_finite() {
        let mut cam = Camera::default();
        cam.set(Vec3::new(0.0, 1.0, 5.0), Vec3::ZERO, Vec3::Y);
        cam.set_shape(45.0, 720.0 / 576.0, 0.05, 350.0);
        assert!(cam.vp_matrix().to_cols_array().iter().all(|f| f.is_finite()));
    }
}
