//! The demo scene: an axis widget, a textured crate, and a status line.
//!
//! All rotation state lives in [`SpinState`]. Key presses queue a single
//! incremental rotation which is folded into the running model matrix
//! exactly once, on the next frame; holding a key therefore steps the cube
//! rather than spinning it. Mouse drags orbit and pan the whole scene
//! through the global transform.

use std::sync::Arc;

use glam::{Mat3, Mat4, Vec3, vec3};
use glow::HasContext;
use sdl2::mouse::MouseState;

use crate::abs::{Mesh, ShaderRegistry, Texture};
use crate::camera::Camera;
use crate::config::SpinConfig;
use crate::geometry;
use crate::hud::Hud;
use crate::input::{Axis, SceneCommand};
use crate::transform::Transform;

/// Degrees of orbit per pixel of left-button drag.
const ORBIT_SENSITIVITY: f32 = 0.5;
/// World units of pan per pixel of right-button drag.
const PAN_INCREMENT: f32 = 0.01;
/// World units of dolly per wheel notch.
const ZOOM_STEP: f32 = 0.1;

/// The three arms of the axis widget: tint colour and the local rotation
/// (degrees) that swings the shared +Z line into place.
const AXIS_ARMS: [(Vec3, Vec3); 3] = [
    (vec3(0.0, 0.0, 1.0), vec3(0.0, 0.0, 0.0)),
    (vec3(0.0, 1.0, 0.0), vec3(90.0, 0.0, 0.0)),
    (vec3(1.0, 0.0, 0.0), vec3(0.0, 90.0, 0.0)),
];

fn status_text(axis: Axis) -> String {
    format!("drawing Back & Forth around Global {}", axis.name())
}

fn status_colour(axis: Axis) -> Vec3 {
    match axis {
        Axis::X => vec3(1.0, 0.0, 0.0),
        Axis::Y => vec3(0.0, 1.0, 0.0),
        Axis::Z => vec3(0.0, 0.0, 1.0),
    }
}

/// The fixed demo view from (0,1,5) toward the origin. Aspect comes from
/// the real window size, which under fullscreen is not the configured one.
fn demo_camera(config: &SpinConfig, window: (u32, u32)) -> Camera {
    let mut camera = Camera::default();
    camera.set(vec3(0.0, 1.0, 5.0), Vec3::ZERO, vec3(0.0, 1.0, 0.0));
    camera.set_shape(config.fov_degrees, 1.0, config.near_clip, config.far_clip);
    camera.set_aspect(window.0, window.1);
    camera
}

/// Rotation and translation state driven by input events.
pub struct SpinState {
    spin_x_face: f32,
    spin_y_face: f32,
    model_pos: Vec3,
    pending: Option<Vec3>,
    running: Mat4,
    active_axis: Option<Axis>,
    wireframe: bool,
}

impl SpinState {
    pub fn new() -> Self {
        Self {
            spin_x_face: 0.0,
            spin_y_face: 0.0,
            model_pos: Vec3::ZERO,
            pending: None,
            running: Mat4::IDENTITY,
            active_axis: None,
            wireframe: false,
        }
    }

    /// Applies one command. `Quit`, `Fullscreen` and `Windowed` belong to
    /// the application shell and are ignored here.
    pub fn apply(&mut self, command: SceneCommand, step_degrees: f32) {
        match command {
            SceneCommand::Wireframe => self.wireframe = true,
            SceneCommand::Fill => self.wireframe = false,
            SceneCommand::ResetView => self.reset(),
            SceneCommand::Spin { axis, negative } => {
                let signed = if negative { -step_degrees } else { step_degrees };
                self.pending = Some(axis.unit() * signed);
                self.active_axis = Some(axis);
            }
            SceneCommand::Quit | SceneCommand::Fullscreen | SceneCommand::Windowed => {}
        }
    }

    /// Folds the queued increment into the running model matrix, at most
    /// once per queued key press. The increment multiplies on the left so
    /// the rotation acts about the fixed world axes.
    pub fn fold_pending(&mut self) {
        if let Some(rotation) = self.pending.take() {
            let increment = Transform::from_rotation(rotation.x, rotation.y, rotation.z).matrix();
            self.running = increment * self.running;
        }
    }

    /// Zeroes the orbit angles and the scene translation. The accumulated
    /// model matrix is deliberately left alone.
    pub fn reset(&mut self) {
        self.spin_x_face = 0.0;
        self.spin_y_face = 0.0;
        self.model_pos = Vec3::ZERO;
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.spin_x_face += ORBIT_SENSITIVITY * dy;
        self.spin_y_face += ORBIT_SENSITIVITY * dx;
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.model_pos.x += PAN_INCREMENT * dx;
        self.model_pos.y -= PAN_INCREMENT * dy;
    }

    pub fn zoom(&mut self, notches: i32) {
        if notches > 0 {
            self.model_pos.z += ZOOM_STEP;
        } else if notches < 0 {
            self.model_pos.z -= ZOOM_STEP;
        }
    }

    /// The global transform shared by everything drawn: orbit rotations
    /// with the pan/dolly translation written into the last column.
    pub fn mouse_global(&self) -> Mat4 {
        let mut m = Mat4::from_rotation_x(self.spin_x_face.to_radians())
            * Mat4::from_rotation_y(self.spin_y_face.to_radians());
        m.w_axis = self.model_pos.extend(1.0);
        m
    }

    pub fn running_matrix(&self) -> Mat4 {
        self.running
    }

    pub fn active_axis(&self) -> Option<Axis> {
        self.active_axis
    }

    pub fn polygon_mode(&self) -> u32 {
        if self.wireframe { glow::LINE } else { glow::FILL }
    }
}

impl Default for SpinState {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the camera, geometry, texture and overlay, and issues the frame's
/// draw calls.
pub struct Scene {
    gl: Arc<glow::Context>,
    camera: Camera,
    state: SpinState,
    axis: Mesh,
    cube: Mesh,
    crate_texture: Texture,
    hud: Hud,
    rotation_step: f32,
    viewport: (u32, u32),
}

impl Scene {
    /// Builds the whole scene up front. `window` is the logical size the
    /// window actually opened at, `drawable` its device-pixel size. Any
    /// missing or broken asset is a startup failure; nothing here is
    /// recoverable at runtime.
    pub fn new(
        gl: &Arc<glow::Context>,
        config: &SpinConfig,
        window: (u32, u32),
        drawable: (u32, u32),
    ) -> Result<Self, String> {
        let camera = demo_camera(config, window);

        let axis = geometry::axis_line_mesh(gl)?;
        let cube = geometry::crate_mesh(gl, config.cube_scale)?;

        let image = image::open(&config.texture_path)
            .map_err(|e| format!("cannot load texture {}: {e}", config.texture_path.display()))?;
        let crate_texture = Texture::from_image(gl, &image)?;
        log::debug!(
            "loaded {} ({}x{})",
            config.texture_path.display(),
            crate_texture.width(),
            crate_texture.height()
        );

        let hud = Hud::new(gl, window.0, window.1)?;
        log::debug!(
            "camera at {:?}, axis line of {} indices, cube of {} vertices",
            camera.eye(),
            axis.element_count(),
            cube.element_count()
        );

        Ok(Self {
            gl: Arc::clone(gl),
            camera,
            state: SpinState::new(),
            axis,
            cube,
            crate_texture,
            hud,
            rotation_step: config.rotation_step_degrees,
            viewport: drawable,
        })
    }

    pub fn handle_command(&mut self, command: SceneCommand) {
        self.state.apply(command, self.rotation_step);
    }

    pub fn handle_mouse_motion(&mut self, mousestate: MouseState, xrel: i32, yrel: i32) {
        if mousestate.left() {
            self.state.orbit(xrel as f32, yrel as f32);
        } else if mousestate.right() {
            self.state.pan(xrel as f32, yrel as f32);
        }
    }

    pub fn handle_mouse_wheel(&mut self, notches: i32) {
        self.state.zoom(notches);
    }

    /// Tracks a window resize: logical size drives the camera aspect and
    /// the overlay projection, pixel size drives the viewport.
    pub fn resize(&mut self, width: u32, height: u32, drawable: (u32, u32)) {
        self.camera.set_aspect(width, height);
        self.hud.set_viewport(width, height);
        self.viewport = drawable;
    }

    /// Draws one frame. The order is fixed: clear, fold pending input,
    /// axis widget, cube, overlay.
    pub fn render(&mut self, registry: &ShaderRegistry) -> Result<(), String> {
        unsafe {
            self.gl
                .viewport(0, 0, self.viewport.0 as i32, self.viewport.1 as i32);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        let mouse_global = self.state.mouse_global();
        self.state.fold_pending();
        let vp = self.camera.vp_matrix();

        // three tinted copies of the same line
        let colour_program = registry.program("colour")?;
        colour_program.use_program();
        let mut local = Transform::new();
        for (colour, rotation) in AXIS_ARMS {
            local.set_rotation(rotation.x, rotation.y, rotation.z);
            local.set_position(0.0, 0.0, 0.0);
            let mvp = vp * mouse_global * local.matrix();
            colour_program.set_uniform("u_colour", colour);
            colour_program.set_uniform("u_mvp", &mvp);
            self.axis.draw();
        }

        let texture_program = registry.program("texture")?;
        texture_program.use_program();
        let m = self.state.running_matrix();
        let mv = self.camera.view_matrix() * mouse_global * m;
        let mvp = vp * mouse_global * m;
        let normal_matrix = Mat3::from_mat4(mv).inverse().transpose();
        texture_program.set_uniform("u_m", &m);
        texture_program.set_uniform("u_mv", &mv);
        texture_program.set_uniform("u_mvp", &mvp);
        texture_program.set_uniform("u_normal_matrix", &normal_matrix);
        texture_program.set_uniform("u_tex", 0i32);
        self.crate_texture.bind(0);
        unsafe {
            self.gl
                .polygon_mode(glow::FRONT_AND_BACK, self.state.polygon_mode());
        }
        self.cube.draw();
        unsafe {
            self.gl.polygon_mode(glow::FRONT_AND_BACK, glow::FILL);
        }

        if let Some(axis) = self.state.active_axis() {
            self.hud.set_label(&status_text(axis), status_colour(axis))?;
        }
        self.hud.draw(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_mat4_eq(a: Mat4, b: Mat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert!((x - y).abs() < 1e-5, "matrices differ: {a:?} vs {b:?}");
        }
    }

    #[test]
    fn running_matrix_is_the_event_order_product() {
        let mut state = SpinState::new();
        let step = 5.0;
        let presses = [
            (Axis::X, false),
            (Axis::Y, false),
            (Axis::Z, true),
            (Axis::X, true),
        ];
        for (axis, negative) in presses {
            state.apply(SceneCommand::Spin { axis, negative }, step);
            state.fold_pending();
        }
        // later presses act in world space, multiplying on the left
        let expected = Transform::from_rotation(-step, 0.0, 0.0).matrix()
            * Transform::from_rotation(0.0, 0.0, -step).matrix()
            * Transform::from_rotation(0.0, step, 0.0).matrix()
            * Transform::from_rotation(step, 0.0, 0.0).matrix();
        assert_mat4_eq(state.running_matrix(), expected);
    }

    #[test]
    fn pending_rotation_folds_exactly_once() {
        let mut state = SpinState::new();
        state.apply(
            SceneCommand::Spin {
                axis: Axis::Y,
                negative: false,
            },
            5.0,
        );
        state.fold_pending();
        let once = state.running_matrix();
        state.fold_pending();
        state.fold_pending();
        assert_eq!(state.running_matrix(), once);
    }

    #[test]
    fn reset_zeroes_orbit_and_translation() {
        let mut state = SpinState::new();
        state.orbit(40.0, -12.0);
        state.pan(300.0, 150.0);
        state.zoom(1);
        state.apply(SceneCommand::ResetView, 5.0);
        assert_mat4_eq(state.mouse_global(), Mat4::IDENTITY);
        // a second reset is a no-op
        state.reset();
        assert_mat4_eq(state.mouse_global(), Mat4::IDENTITY);
    }

    #[test]
    fn reset_leaves_the_running_matrix_alone() {
        let mut state = SpinState::new();
        state.apply(
            SceneCommand::Spin {
                axis: Axis::Z,
                negative: false,
            },
            30.0,
        );
        state.fold_pending();
        let folded = state.running_matrix();
        state.apply(SceneCommand::ResetView, 30.0);
        assert_eq!(state.running_matrix(), folded);
    }

    #[test]
    fn wireframe_toggle_restores_fill_exactly() {
        let mut state = SpinState::new();
        assert_eq!(state.polygon_mode(), glow::FILL);
        state.apply(SceneCommand::Wireframe, 5.0);
        assert_eq!(state.polygon_mode(), glow::LINE);
        state.apply(SceneCommand::Fill, 5.0);
        assert_eq!(state.polygon_mode(), glow::FILL);
    }

    #[test]
    fn mouse_global_embeds_orbit_then_translation() {
        let mut state = SpinState::new();
        state.orbit(90.0, 30.0);
        state.pan(100.0, -200.0);
        state.zoom(-1);
        let expected_rotation = Mat4::from_rotation_x((0.5f32 * 30.0).to_radians())
            * Mat4::from_rotation_y((0.5f32 * 90.0).to_radians());
        let mut expected = expected_rotation;
        expected.w_axis = vec3(1.0, 2.0, -0.1).extend(1.0);
        assert_mat4_eq(state.mouse_global(), expected);
    }

    #[test]
    fn zoom_ignores_zero_notches() {
        let mut state = SpinState::new();
        state.zoom(0);
        assert_eq!(state.mouse_global(), Mat4::IDENTITY);
    }

    #[test]
    fn active_axis_tracks_the_last_spin_only() {
        let mut state = SpinState::new();
        assert_eq!(state.active_axis(), None);
        state.apply(
            SceneCommand::Spin {
                axis: Axis::Y,
                negative: true,
            },
            5.0,
        );
        assert_eq!(state.active_axis(), Some(Axis::Y));
        state.apply(SceneCommand::Wireframe, 5.0);
        state.apply(SceneCommand::ResetView, 5.0);
        assert_eq!(state.active_axis(), Some(Axis::Y));
    }

    #[test]
    fn axis_arms_are_blue_green_red() {
        assert_eq!(AXIS_ARMS.len(), 3);
        let (colours, rotations): (Vec<_>, Vec<_>) = AXIS_ARMS.into_iter().unzip();
        assert_eq!(colours[0], vec3(0.0, 0.0, 1.0));
        assert_eq!(colours[1], vec3(0.0, 1.0, 0.0));
        assert_eq!(colours[2], vec3(1.0, 0.0, 0.0));
        assert_eq!(rotations[0], Vec3::ZERO);
        assert_eq!(rotations[1], vec3(90.0, 0.0, 0.0));
        assert_eq!(rotations[2], vec3(0.0, 90.0, 0.0));
    }

    #[test]
    fn status_lines_name_their_axis() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            assert!(status_text(axis).ends_with(axis.name()));
        }
        assert_ne!(status_colour(Axis::X), status_colour(Axis::Y));
        assert_ne!(status_colour(Axis::Y), status_colour(Axis::Z));
    }

    #[test]
    fn startup_camera_tracks_the_real_window_size() {
        let config = SpinConfig::default();
        // fullscreen opens the window at desktop size while the config
        // still carries the windowed 720x576
        let fullscreen = demo_camera(&config, (1920, 1080));
        assert_eq!(fullscreen.aspect(), 1920.0 / 1080.0);
        let windowed = demo_camera(&config, (config.window_width, config.window_height));
        assert_eq!(windowed.aspect(), 720.0 / 576.0);
    }
}
