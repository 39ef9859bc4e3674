use std::time::Instant;

use glam::{Mat4, Vec3};
use glium::{
    index::{NoIndices, PrimitiveType},
    uniform, Display, Program, Surface, VertexBuffer,
};
use glutin::surface::WindowSurface;
use winit::keyboard::KeyCode;

use super::Exercise;
use crate::{
    buffer::ColorVertex,
    frame::Application,
    shader,
};

const fn vertex(position: [f32; 3], color: [f32; 3]) -> ColorVertex {
    ColorVertex { position, color }
}

const YELLOW: [f32; 3] = [1.0, 1.0, 0.0];
const CYAN: [f32; 3] = [0.0, 1.0, 1.0];
const MAGENTA: [f32; 3] = [1.0, 0.0, 1.0];

/// Square-based pyramid: two base triangles and four sides.
const PYRAMID: [ColorVertex; 18] = [
    vertex([-0.5, -0.5, -0.5], YELLOW),
    vertex([-0.5, -0.5, 0.5], CYAN),
    vertex([0.5, -0.5, -0.5], MAGENTA),
    vertex([-0.5, -0.5, 0.5], YELLOW),
    vertex([0.5, -0.5, 0.5], CYAN),
    vertex([0.5, -0.5, -0.5], MAGENTA),
    vertex([-0.5, -0.5, -0.5], YELLOW),
    vertex([0.0, 0.5, 0.0], YELLOW),
    vertex([0.5, -0.5, -0.5], YELLOW),
    vertex([-0.5, -0.5, -0.5], MAGENTA),
    vertex([0.0, 0.5, 0.0], MAGENTA),
    vertex([-0.5, -0.5, 0.5], MAGENTA),
    vertex([-0.5, -0.5, 0.5], YELLOW),
    vertex([0.0, 0.5, 0.0], YELLOW),
    vertex([0.5, -0.5, 0.5], YELLOW),
    vertex([0.5, -0.5, 0.5], CYAN),
    vertex([0.0, 0.5, 0.0], CYAN),
    vertex([0.5, -0.5, -0.5], CYAN),
];

/// Spins about `axis` by `seconds` radians; without an axis the model lies on its side.
fn model_matrix(axis: Option<Vec3>, seconds: f32) -> Mat4 {
    match axis {
        Some(axis) => Mat4::from_axis_angle(axis, seconds),
        None => Mat4::from_rotation_x(90f32.to_radians()),
    }
}

pub struct Cubes {
    app: Application,
    program: Program,
    vertices: VertexBuffer<ColorVertex>,
    axis: Option<Vec3>,
    started: Instant,
}

impl Cubes {
    pub fn new(display: &Display<WindowSurface>) -> anyhow::Result<Self> {
        Ok(Self {
            app: Application::new().with_clear_color((1.0, 1.0, 1.0, 1.0)),
            program: shader::flat_color(display)?,
            vertices: VertexBuffer::new(display, &PYRAMID)?,
            axis: None,
            started: Instant::now(),
        })
    }
}

impl Exercise for Cubes {
    fn key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyX => self.axis = Some(Vec3::X),
            KeyCode::KeyY => self.axis = Some(Vec3::Y),
            KeyCode::KeyZ => self.axis = Some(Vec3::Z),
            _ => (),
        }
    }

    fn draw(&mut self, display: &Display<WindowSurface>) -> anyhow::Result<()> {
        let model = model_matrix(self.axis, self.started.elapsed().as_secs_f32());
        let uniforms = uniform! { model: model.to_cols_array_2d() };
        let params = self.app.params();
        self.app.render(display, |target| {
            target.draw(
                &self.vertices,
                NoIndices(PrimitiveType::TrianglesList),
                &self.program,
                &uniforms,
                params,
            )?;
            target.draw(
                &self.vertices,
                NoIndices(PrimitiveType::Points),
                &self.program,
                &uniforms,
                params,
            )?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_model_lies_on_its_side() {
        let apex = model_matrix(None, 12.0).transform_point3(Vec3::new(0.0, 0.5, 0.0));
        assert!((apex - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-6);
    }

    #[test]
    fn spins_about_chosen_axis() {
        let half_turn = model_matrix(Some(Vec3::Y), std::f32::consts::PI);
        let corner = half_turn.transform_point3(Vec3::new(0.5, -0.5, 0.5));
        assert!((corner - Vec3::new(-0.5, -0.5, -0.5)).length() < 1e-6);
        // points on the axis stay put
        let apex = half_turn.transform_point3(Vec3::new(0.0, 0.5, 0.0));
        assert!((apex - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn pyramid_has_six_triangles() {
        assert_eq!(PYRAMID.len() % 3, 0);
        assert_eq!(PYRAMID.len() / 3, 6);
    }
}
