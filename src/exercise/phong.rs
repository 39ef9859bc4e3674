use anyhow::Context;
use glam::{Mat4, Vec3};
use glium::{texture::SrgbTexture2d, Display, Program};
use glutin::surface::WindowSurface;
use winit::keyboard::KeyCode;

use super::Exercise;
use crate::{
    buffer::GpuMesh,
    camera::Camera,
    frame::{Application, Light, RenderObject},
    input::CameraMove,
    load,
    material::Material,
    shader, texture,
};

const CUBE_OBJ: &[u8] = include_bytes!("../../assets/cube.obj");

/// Color, x offset and shininess of each cube.
const CUBES: [(Vec3, f32, f32); 3] = [
    (Vec3::new(1.0, 0.0, 0.0), -2.75, 10.0),
    (Vec3::new(0.0, 1.0, 0.0), 0.0, 1.0),
    (Vec3::new(1.0, 1.0, 1.0), 2.75, 250.0),
];

/// Only the shininess differs between the cubes.
fn cube_material(shininess: f32) -> Material {
    Material {
        ka: Vec3::splat(0.2),
        kd: Vec3::splat(0.5),
        ks: Vec3::splat(0.5),
        ns: shininess,
        ..Material::default()
    }
}

struct LitCube {
    mesh: GpuMesh,
    material: Material,
    model: Mat4,
}

pub struct Phong {
    app: Application,
    light: Light,
    camera: Camera,
    program: Program,
    texture: SrgbTexture2d,
    cubes: Vec<LitCube>,
}

impl Phong {
    pub fn new(display: &Display<WindowSurface>) -> anyhow::Result<Self> {
        let model = load::parse(CUBE_OBJ).context("parsing the bundled cube")?;
        let cubes = CUBES
            .iter()
            .map(|&(color, x, shininess)| -> anyhow::Result<LitCube> {
                Ok(LitCube {
                    // color is baked into the vertices
                    mesh: GpuMesh::expanded(display, &model.to_mesh(color))?,
                    material: cube_material(shininess),
                    model: Mat4::from_translation(Vec3::new(x, 0.0, 0.0)),
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let (width, height) = display.get_framebuffer_dimensions();
        #[allow(clippy::cast_precision_loss)]
        let camera = Camera::new(width as f32, height as f32).with_speed(0.05);

        Ok(Self {
            app: Application::new().with_clear_color((1.0, 1.0, 1.0, 1.0)),
            light: Light {
                position: Vec3::new(-2.0, 10.0, 2.0),
                color: Vec3::new(1.0, 1.0, 0.0),
            },
            camera,
            program: shader::phong(display)?,
            texture: texture::white(display)?,
            cubes,
        })
    }
}

impl Exercise for Phong {
    fn key(&mut self, key: KeyCode) {
        if let Some(step) = CameraMove::from_key(key) {
            step.apply(&mut self.camera);
        }
    }

    fn cursor(&mut self, x: f32, y: f32) {
        self.camera.update_by_mouse_position(x, y);
    }

    #[allow(clippy::cast_precision_loss)]
    fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width as f32, height as f32);
    }

    fn mouse_look(&self) -> bool {
        true
    }

    fn draw(&mut self, display: &Display<WindowSurface>) -> anyhow::Result<()> {
        self.camera.recalculate_view();
        let camera = &self.camera;
        self.app.render(display, |target| {
            for cube in &self.cubes {
                let object = RenderObject {
                    mesh: &cube.mesh,
                    program: &self.program,
                    texture: &self.texture,
                    material: &cube.material,
                    model: cube.model,
                    projection: camera.projection(),
                };
                self.app.draw_object(target, &object, camera, &self.light)?;
            }
            Ok(())
        })
    }
}
