//! Interactive demo: a textured crate and an axis widget, spun about the
//! world axes from the keyboard and orbited with the mouse.

use std::sync::Arc;

use glow::HasContext;
use sdl2::event::{Event, WindowEvent};

use crate::abs::{App, ShaderRegistry};
use crate::config::SpinConfig;
use crate::input::SceneCommand;
use crate::scene::Scene;

mod abs;
mod camera;
mod config;
mod geometry;
mod hud;
mod input;
mod scene;
mod transform;

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .level_for("spincrate", log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn run() -> Result<(), String> {
    log::info!("spincrate {} starting", env!("CARGO_PKG_VERSION"));
    let config = SpinConfig::load();
    let mut app = App::new(
        "spincrate",
        config.window_width,
        config.window_height,
        config.fullscreen,
    )?;
    let gl = Arc::clone(&app.gl);

    unsafe {
        log::info!(
            "OpenGL {} on {}",
            gl.get_parameter_string(glow::VERSION),
            gl.get_parameter_string(glow::RENDERER)
        );
        gl.enable(glow::DEPTH_TEST);
        gl.enable(glow::MULTISAMPLE);
        gl.enable(glow::BLEND);
        gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        gl.clear_color(0.4, 0.4, 0.4, 1.0);
    }

    let mut registry = ShaderRegistry::new(&gl);
    for name in ["colour", "texture", "hud"] {
        registry.load_program(
            name,
            &config.shader_dir.join(format!("{name}.vert")),
            &config.shader_dir.join(format!("{name}.frag")),
        )?;
    }

    let mut scene = Scene::new(&gl, &config, app.window.size(), app.drawable_size())?;
    log::info!("scene ready, entering main loop");

    'running: loop {
        let events: Vec<Event> = app.event_pump.poll_iter().collect();
        for event in events {
            match event {
                Event::Quit { .. } => break 'running,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => match input::map_keycode(keycode) {
                    Some(SceneCommand::Quit) => break 'running,
                    Some(SceneCommand::Fullscreen) => app.set_fullscreen(true)?,
                    Some(SceneCommand::Windowed) => app.set_fullscreen(false)?,
                    Some(command) => scene.handle_command(command),
                    None => {}
                },
                Event::MouseMotion {
                    mousestate,
                    xrel,
                    yrel,
                    ..
                } => scene.handle_mouse_motion(mousestate, xrel, yrel),
                Event::MouseWheel { y, .. } => scene.handle_mouse_wheel(y),
                Event::Window {
                    win_event:
                        WindowEvent::Resized(width, height) | WindowEvent::SizeChanged(width, height),
                    ..
                } => scene.resize(
                    width.max(0) as u32,
                    height.max(0) as u32,
                    app.drawable_size(),
                ),
                _ => {}
            }
        }

        scene.render(&registry)?;
        app.window.gl_swap_window();
    }

    log::info!("shutting down");
    Ok(())
}

fn main() {
    if let Err(e) = setup_logger() {
        eprintln!("logging unavailable: {e}");
    }
    if let Err(e) = run() {
        log::error!("fatal: {e}");
        std::process::exit(1);
    }
}
