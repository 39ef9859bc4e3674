use glium::{
    index::{NoIndices, PrimitiveType},
    uniform, Display, IndexBuffer, Program, Surface, VertexBuffer,
};
use glutin::surface::WindowSurface;
use winit::keyboard::KeyCode;

use super::Exercise;
use crate::{
    bezier::{self, Bezier},
    buffer::{DisplayPath, PointVertex},
    frame::Application,
    shader,
};

const POINTS_PER_SEGMENT: usize = 15;
const SQUARE_HALF_SIDE: f32 = 0.1;

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const GRAY: [f32; 4] = [0.6, 0.6, 0.6, 1.0];

/// Curve indices of the two squares: one walks forwards, the other backwards.
fn square_indices(step: usize, count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    (step % count, (count - step % count) % count)
}

pub struct Curves {
    app: Application,
    program: Program,
    bezier: Bezier,
    curve: VertexBuffer<PointVertex>,
    curve_indices: IndexBuffer<u32>,
    step: usize,
}

impl Curves {
    pub fn new(display: &Display<WindowSurface>) -> anyhow::Result<Self> {
        let mut bezier = Bezier::new(bezier::infinity_control_points());
        bezier.generate_curve(POINTS_PER_SEGMENT);
        log::info!("curve has {} points", bezier.curve_point_count());

        let points: Vec<PointVertex> = bezier
            .curve_points()
            .iter()
            .copied()
            .map(PointVertex::from)
            .collect();
        let curve = VertexBuffer::new(display, &points)?;
        let curve_indices = IndexBuffer::<u32>::try_from(DisplayPath(&curve, display))?;

        Ok(Self {
            app: Application::new()
                .without_depth_test()
                .with_clear_color((1.0, 1.0, 1.0, 1.0)),
            program: shader::solid(display)?,
            bezier,
            curve,
            curve_indices,
            step: 0,
        })
    }

    fn square(
        &self,
        display: &Display<WindowSurface>,
        index: usize,
    ) -> anyhow::Result<VertexBuffer<PointVertex>> {
        let center = self.bezier.point_on_curve(index).unwrap_or_default();
        let corners = bezier::square_around(center, SQUARE_HALF_SIDE).map(PointVertex::from);
        Ok(VertexBuffer::new(display, &corners)?)
    }
}

impl Exercise for Curves {
    fn key(&mut self, key: KeyCode) {
        if key == KeyCode::Space {
            let count = self.bezier.curve_point_count().max(1);
            self.step = (self.step + 1) % count;
        }
    }

    fn draw(&mut self, display: &Display<WindowSurface>) -> anyhow::Result<()> {
        let (a, b) = square_indices(self.step, self.bezier.curve_point_count());
        let square_a = self.square(display, a)?;
        let square_b = self.square(display, b)?;
        let params = self.app.params();

        self.app.render(display, |target| {
            target.draw(
                &self.curve,
                &self.curve_indices,
                &self.program,
                &uniform! { final_color: GRAY },
                params,
            )?;
            for (square, color) in [(&square_a, RED), (&square_b, GREEN)] {
                target.draw(
                    square,
                    NoIndices(PrimitiveType::TrianglesList),
                    &self.program,
                    &uniform! { final_color: color },
                    params,
                )?;
            }
            Ok(())
        })
    }
}
