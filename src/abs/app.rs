//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

/// The [`App`] struct encapsulates the SDL2 and OpenGL context. The
/// underscored handles are never touched again but must stay alive as long
/// as the window and GL context are in use.
pub struct App {
    _sdl: sdl2::Sdl,
    _video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    _gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a new [`App`] with an OpenGL 3.3 core context. The width and
    /// height are ignored if `fullscreen` is set to `true`.
    pub fn new(title: &str, width: u32, height: u32, fullscreen: bool) -> Result<Self, String> {
        let sdl = sdl2::init()?;
        let video_subsystem = sdl.video()?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_multisample_buffers(1);
        gl_attr.set_multisample_samples(4);
        let display_mode = video_subsystem.current_display_mode(0)?;
        let desktop_width = display_mode.w as u32;
        let desktop_height = display_mode.h as u32;
        let (width, height) = if fullscreen {
            (desktop_width, desktop_height)
        } else {
            (width, height)
        };
        let mut window = video_subsystem
            .window(title, width, height)
            .opengl()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;
        window.set_fullscreen(if fullscreen {
            sdl2::video::FullscreenType::Desktop
        } else {
            sdl2::video::FullscreenType::Off
        })?;
        let gl_context = window.gl_create_context()?;
        window.gl_make_current(&gl_context)?;
        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump()?;
        let gl = Arc::new(gl);

        Ok(Self {
            _sdl: sdl,
            _video_subsystem: video_subsystem,
            window,
            _gl_context: gl_context,
            gl,
            event_pump,
        })
    }

    /// Switches between desktop fullscreen and windowed mode.
    pub fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), String> {
        self.window.set_fullscreen(if fullscreen {
            sdl2::video::FullscreenType::Desktop
        } else {
            sdl2::video::FullscreenType::Off
        })
    }

    /// The window size in device pixels, which differs from the logical size
    /// on high-DPI displays.
    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }
}
