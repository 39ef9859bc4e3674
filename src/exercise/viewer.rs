use anyhow::Context;
use glium::{texture::SrgbTexture2d, Display, Program};
use glutin::surface::WindowSurface;
use winit::keyboard::KeyCode;

use super::Exercise;
use crate::{
    buffer::GpuMesh,
    camera::Camera,
    config::{CameraConfig, Config, ObjectConfig},
    frame::{Application, Light, RenderObject},
    input::{self, CameraMove},
    load,
    material::{self, Material},
    scene::Scene,
    shader, texture,
};

/// GPU resources of one configured object. Its placement lives in the [`Scene`].
struct LoadedObject {
    mesh: GpuMesh,
    material: Material,
    texture: SrgbTexture2d,
}

impl LoadedObject {
    fn load(display: &Display<WindowSurface>, config: &ObjectConfig) -> anyhow::Result<Self> {
        let path = &config.obj_path;
        let model = load::load(path).with_context(|| format!("loading {}", path.display()))?;
        let material = material::resolve(path, &model);
        // an explicit texture wins over the material's diffuse map
        let texture_path = config
            .texture_path
            .as_deref()
            .or(material.diffuse_map.as_deref());
        let texture = texture::load_or_white(display, texture_path)?;
        let mesh = GpuMesh::indexed(display, &model.to_indexed_mesh(config.color))
            .with_context(|| format!("uploading {}", path.display()))?;
        Ok(Self {
            mesh,
            material,
            texture,
        })
    }
}

#[allow(clippy::cast_precision_loss)]
fn camera(display: &Display<WindowSurface>, config: &CameraConfig) -> Camera {
    let (width, height) = display.get_framebuffer_dimensions();
    let mut camera = Camera::new(width as f32, height as f32)
        .with_speed(config.speed)
        .with_sensitivity(config.sensitivity)
        .with_fov(config.fov);
    camera.set_position(config.position);
    if let Some(look_at) = config.look_at {
        camera.look_at(look_at.eye, look_at.target, look_at.up);
    }
    camera
}

fn program(display: &Display<WindowSurface>, config: &Config) -> anyhow::Result<Program> {
    match (&config.shaders.vertex, &config.shaders.fragment) {
        (Some(vertex), Some(fragment)) => shader::from_files(display, vertex, fragment),
        (None, None) => shader::phong(display),
        _ => {
            log::warn!("both shader paths are needed, using the built-in program");
            shader::phong(display)
        }
    }
}

/// The configured scene: Tab cycles between the camera and each static object,
/// WASD moves whichever is selected.
pub struct Viewer {
    app: Application,
    light: Light,
    camera: Camera,
    program: Program,
    objects: Vec<LoadedObject>,
    scene: Scene,
}

impl Viewer {
    pub fn new(display: &Display<WindowSurface>, config: &Config) -> anyhow::Result<Self> {
        let objects = config
            .objects
            .iter()
            .map(|object| LoadedObject::load(display, object))
            .collect::<anyhow::Result<Vec<_>>>()?;
        log::info!(
            "scene has {} objects, {} selectable with the camera",
            objects.len(),
            config.selectable_count()
        );

        Ok(Self {
            app: Application::new(),
            light: Light::from(config.light),
            camera: camera(display, &config.camera),
            program: program(display, config)?,
            objects,
            scene: Scene::new(&config.objects),
        })
    }
}

impl Exercise for Viewer {
    fn key(&mut self, key: KeyCode) {
        if key == KeyCode::Tab {
            self.scene.cycle_selection();
        } else if self.scene.camera_selected() {
            if let Some(step) = CameraMove::from_key(key) {
                step.apply(&mut self.camera);
            }
        } else {
            self.scene.request(input::object_rotation(key));
        }
    }

    fn cursor(&mut self, x: f32, y: f32) {
        self.camera.update_by_mouse_position(x, y);
    }

    fn scroll(&mut self, lines: f32) {
        self.camera.zoom(lines);
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
        self.scene.update();

        let camera = &self.camera;
        self.app.render(display, |target| {
            for (object, placement) in self.objects.iter().zip(self.scene.placements()) {
                let render = RenderObject {
                    mesh: &object.mesh,
                    program: &self.program,
                    texture: &object.texture,
                    material: &object.material,
                    model: placement.model(),
                    projection: placement.projection(camera),
                };
                self.app.draw_object(target, &render, camera, &self.light)?;
            }
            Ok(())
        })
    }
}
