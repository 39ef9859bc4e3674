use std::time::Instant;

use glam::{Mat4, Vec3};
use glium::{
    index::{NoIndices, PrimitiveType},
    uniform, Display, Program, Surface, VertexBuffer,
};
use glutin::surface::WindowSurface;
use winit::keyboard::KeyCode;

use super::Exercise;
use crate::{buffer::ColorVertex, frame::Application, shader};

const fn vertex(position: [f32; 3], color: [f32; 3]) -> ColorVertex {
    ColorVertex { position, color }
}

const fn side(corners: [[f32; 3]; 6], first: [f32; 3], second: [f32; 3]) -> [ColorVertex; 6] {
    [
        vertex(corners[0], first),
        vertex(corners[1], first),
        vertex(corners[2], first),
        vertex(corners[3], second),
        vertex(corners[4], second),
        vertex(corners[5], second),
    ]
}

/// Unit cube, each side split in two differently colored triangles.
const SIDES: [[ColorVertex; 6]; 6] = [
    // back
    side(
        [
            [-0.5, 0.5, -0.5],
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [-0.5, 0.5, -0.5],
            [0.5, 0.5, -0.5],
            [0.5, -0.5, -0.5],
        ],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
    ),
    // front
    side(
        [
            [-0.5, 0.5, 0.5],
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [-0.5, 0.5, 0.5],
            [0.5, 0.5, 0.5],
            [0.5, -0.5, 0.5],
        ],
        [1.0, 0.0, 1.0],
        [0.0, 1.0, 1.0],
    ),
    // top
    side(
        [
            [-0.5, 0.5, -0.5],
            [-0.5, 0.5, 0.5],
            [0.5, 0.5, -0.5],
            [-0.5, 0.5, 0.5],
            [0.5, 0.5, -0.5],
            [0.5, 0.5, 0.5],
        ],
        [0.0, 0.0, 0.0],
        [0.4, 1.0, 0.5],
    ),
    // bottom
    side(
        [
            [0.5, -0.5, -0.5],
            [0.5, -0.5, 0.5],
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, 0.5],
            [-0.5, -0.5, -0.5],
            [-0.5, -0.5, 0.5],
        ],
        [0.3, 0.3, 0.3],
        [0.4, 0.3, 0.7],
    ),
    // left
    side(
        [
            [-0.5, 0.5, -0.5],
            [-0.5, -0.5, -0.5],
            [-0.5, -0.5, 0.5],
            [-0.5, 0.5, -0.5],
            [-0.5, 0.5, 0.5],
            [-0.5, -0.5, 0.5],
        ],
        [0.2, 0.7, 0.4],
        [1.0, 0.2, 0.7],
    ),
    // right
    side(
        [
            [0.5, 0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, -0.5],
            [0.5, 0.5, 0.5],
            [0.5, -0.5, 0.5],
        ],
        [0.4, 0.5, 0.4],
        [1.0, 0.4, 0.3],
    ),
];

fn cube() -> Vec<ColorVertex> {
    SIDES.iter().flatten().copied().collect()
}

/// Where each of the two cubes sits.
const OFFSETS: [Vec3; 2] = [Vec3::new(-0.4, -0.4, 0.0), Vec3::new(0.4, 0.4, 0.0)];

const ZOOM_STEP: f32 = 0.2;
const MAX_ZOOM: f32 = 0.2;
const MIN_ZOOM: f32 = -0.7;

/// Continuous spin chosen from the keyboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Spin {
    Top,
    Bottom,
    Left,
    Right,
    TopRight,
    BottomLeft,
}

impl Spin {
    fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW => Some(Spin::Top),
            KeyCode::KeyS => Some(Spin::Bottom),
            KeyCode::KeyA => Some(Spin::Left),
            KeyCode::KeyD => Some(Spin::Right),
            KeyCode::KeyX => Some(Spin::TopRight),
            KeyCode::KeyZ => Some(Spin::BottomLeft),
            _ => None,
        }
    }

    fn axis(self) -> Vec3 {
        match self {
            Spin::Top => Vec3::X,
            Spin::Bottom => Vec3::NEG_X,
            Spin::Left => Vec3::Y,
            Spin::Right => Vec3::NEG_Y,
            Spin::TopRight => Vec3::new(1.0, -1.0, 1.0).normalize(),
            Spin::BottomLeft => Vec3::new(-1.0, 1.0, -1.0).normalize(),
        }
    }
}

/// Keyboard state shared by both cubes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct Controls {
    spin: Option<Spin>,
    zoom: f32,
}

impl Controls {
    fn key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyL if self.zoom < MAX_ZOOM => self.zoom += ZOOM_STEP,
            KeyCode::KeyK if self.zoom > MIN_ZOOM => self.zoom -= ZOOM_STEP,
            KeyCode::Space => self.spin = None,
            _ => {
                if let Some(spin) = Spin::from_key(key) {
                    self.spin = Some(spin);
                }
            }
        }
    }

    /// Both cubes start at half size; zoom grows or shrinks that.
    fn model(&self, offset: Vec3, seconds: f32) -> Mat4 {
        let scale = Mat4::from_scale(Vec3::splat((1.0 + self.zoom) / 2.0));
        let spin = self
            .spin
            .map_or(Mat4::IDENTITY, |spin| Mat4::from_axis_angle(spin.axis(), seconds));
        Mat4::from_translation(offset) * scale * spin
    }
}

pub struct Objects {
    app: Application,
    program: Program,
    vertices: VertexBuffer<ColorVertex>,
    controls: Controls,
    started: Instant,
}

impl Objects {
    pub fn new(display: &Display<WindowSurface>) -> anyhow::Result<Self> {
        Ok(Self {
            app: Application::new().with_clear_color((1.0, 1.0, 1.0, 1.0)),
            program: shader::flat_color(display)?,
            vertices: VertexBuffer::new(display, &cube())?,
            controls: Controls::default(),
            started: Instant::now(),
        })
    }
}

impl Exercise for Objects {
    fn key(&mut self, key: KeyCode) {
        self.controls.key(key);
    }

    fn draw(&mut self, display: &Display<WindowSurface>) -> anyhow::Result<()> {
        let seconds = self.started.elapsed().as_secs_f32();
        let params = self.app.params();
        let controls = self.controls;
        self.app.render(display, |target| {
            for offset in OFFSETS {
                let model = controls.model(offset, seconds);
                target.draw(
                    &self.vertices,
                    NoIndices(PrimitiveType::TrianglesList),
                    &self.program,
                    &uniform! { model: model.to_cols_array_2d() },
                    params,
                )?;
            }
            Ok(())
        })
    }
}
