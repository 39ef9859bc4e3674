//! The coursework programs, each driven by the shared event loop in `main`.

use std::str::FromStr;

use glium::Display;
use glutin::surface::WindowSurface;
use winit::keyboard::KeyCode;

use crate::config::Config;

mod cubes;
mod curves;
mod objects;
mod phong;
mod viewer;

pub trait Exercise {
    /// Called for presses and auto-repeats. Escape is handled by the event loop.
    fn key(&mut self, key: KeyCode);

    /// Absolute cursor position in window pixels.
    fn cursor(&mut self, _x: f32, _y: f32) {}

    /// Vertical scroll in lines, positive away from the user.
    fn scroll(&mut self, _lines: f32) {}

    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Whether the cursor should be hidden and captured for mouse look.
    fn mouse_look(&self) -> bool {
        false
    }

    fn draw(&mut self, display: &Display<WindowSurface>) -> anyhow::Result<()>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExerciseKind {
    Cubes,
    Objects,
    Phong,
    Curves,
    Scene,
}

impl FromStr for ExerciseKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cubes" => Ok(ExerciseKind::Cubes),
            "objects" => Ok(ExerciseKind::Objects),
            "phong" => Ok(ExerciseKind::Phong),
            "curves" => Ok(ExerciseKind::Curves),
            "scene" => Ok(ExerciseKind::Scene),
            other => anyhow::bail!(
                "unknown exercise `{other}`, expected one of: cubes, objects, phong, curves, scene"
            ),
        }
    }
}

impl ExerciseKind {
    /// Window title and size; the scene takes both from its configuration.
    pub fn window(self, config: &Config) -> (String, u32, u32) {
        let title = match self {
            ExerciseKind::Cubes => "Cubes",
            ExerciseKind::Objects => "Two cubes",
            ExerciseKind::Phong => "Phong",
            ExerciseKind::Curves => "Parametric curves",
            ExerciseKind::Scene => {
                return (
                    config.window.title.clone(),
                    config.window.width,
                    config.window.height,
                )
            }
        };
        (format!("glcourse - {title}"), 1000, 1000)
    }

    pub fn build(
        self,
        display: &Display<WindowSurface>,
        config: &Config,
    ) -> anyhow::Result<Box<dyn Exercise>> {
        Ok(match self {
            ExerciseKind::Cubes => Box::new(cubes::Cubes::new(display)?),
            ExerciseKind::Objects => Box::new(objects::Objects::new(display)?),
            ExerciseKind::Phong => Box::new(phong::Phong::new(display)?),
            ExerciseKind::Curves => Box::new(curves::Curves::new(display)?),
            ExerciseKind::Scene => Box::new(viewer::Viewer::new(display, config)?),
        })
    }
}
