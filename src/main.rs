#![warn(clippy::pedantic)]
use std::{env, path::PathBuf};

use config::Config;
use exercise::ExerciseKind;
use winit::{
    event::{DeviceEvent, Event, MouseScrollDelta, WindowEvent},
    keyboard::KeyCode,
    window::{CursorGrabMode, Window},
};

mod bezier;
mod buffer;
mod camera;
mod config;
mod exercise;
mod frame;
mod geometry;
mod input;
mod load;
mod material;
mod scene;
mod shader;
mod texture;

const DEFAULT_CONFIG: &str = "assets/config.json";

/// Trackpads report pixels; roughly one line per 16.
const PIXELS_PER_LINE: f64 = 16.0;

#[allow(clippy::cast_possible_truncation)]
fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<(ExerciseKind, PathBuf)> {
    let kind = match args.next() {
        Some(name) => name.parse()?,
        None => ExerciseKind::Scene,
    };
    let config = args.next().map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    Ok((kind, config))
}

fn capture_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(err) = grabbed {
        log::warn!("could not grab the cursor: {err}");
    }
    window.set_cursor_visible(false);
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (kind, config_path) = parse_args(env::args().skip(1))?;
    let config = if kind == ExerciseKind::Scene {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    let event_loop = winit::event_loop::EventLoopBuilder::new().build()?;
    let (title, width, height) = kind.window(&config);
    let (window, display) = glium::backend::glutin::SimpleWindowBuilder::new()
        .with_title(&title)
        .with_inner_size(width, height)
        .build(&event_loop);
    log::info!(
        "{} on {}",
        display.get_opengl_version_string(),
        display.get_opengl_renderer_string()
    );

    let mut exercise = kind.build(&display, &config)?;
    if exercise.mouse_look() {
        capture_cursor(&window);
    }

    // mouse look works from raw motion, so the cursor is virtual once it is grabbed
    #[allow(clippy::cast_precision_loss)]
    let (mut cursor_x, mut cursor_y) = (width as f32 / 2.0, height as f32 / 2.0);

    event_loop.run(move |event, window_target| {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => window_target.exit(),

                WindowEvent::RedrawRequested => {
                    if let Err(err) = exercise.draw(&display) {
                        log::error!("drawing failed: {err:#}");
                        window_target.exit();
                    }
                }
                WindowEvent::Resized(window_size) => {
                    display.resize(window_size.into());
                    exercise.resize(window_size.width, window_size.height);
                }
                WindowEvent::KeyboardInput { event, .. } => match input::pressed_key(&event) {
                    Some(KeyCode::Escape) => window_target.exit(),
                    Some(key) => exercise.key(key),
                    None => (),
                },
                WindowEvent::MouseWheel { delta, .. } => exercise.scroll(scroll_lines(delta)),
                _ => (),
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => {
                #[allow(clippy::cast_possible_truncation)]
                {
                    cursor_x += delta.0 as f32;
                    cursor_y += delta.1 as f32;
                }
                exercise.cursor(cursor_x, cursor_y);
            }
            // ensures continuous rendering
            Event::AboutToWait => window.request_redraw(),
            _ => (),
        };
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| (*s).to_owned()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn defaults_to_configured_scene() {
        let (kind, path) = parse_args(args(&[])).unwrap();
        assert_eq!(kind, ExerciseKind::Scene);
        assert_eq!(path, PathBuf::from(DEFAULT_CONFIG));
    }

    #[test]
    fn takes_exercise_and_config_path() {
        let (kind, path) = parse_args(args(&["curves", "other.json"])).unwrap();
        assert_eq!(kind, ExerciseKind::Curves);
        assert_eq!(path, PathBuf::from("other.json"));
        assert!(parse_args(args(&["teapot"])).is_err());
    }

    #[test]
    fn pixel_scroll_is_converted_to_lines() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 32.0));
        assert_eq!(scroll_lines(pixels), 2.0);
    }
}
