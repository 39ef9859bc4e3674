use glam::{Mat4, Vec3};
use glium::{
    texture::SrgbTexture2d,
    uniform,
    uniforms::{MagnifySamplerFilter, MinifySamplerFilter, SamplerWrapFunction},
    Display, DrawError, DrawParameters, Frame, Program, Surface,
};
use glutin::surface::WindowSurface;

use crate::{buffer::GpuMesh, camera::Camera, config::LightConfig, material::Material};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
}

impl From<LightConfig> for Light {
    fn from(config: LightConfig) -> Self {
        Self {
            position: config.position,
            color: config.color,
        }
    }
}

/// Per-frame state shared by every draw call of an exercise.
pub struct Application {
    params: DrawParameters<'static>,
    clear_color: (f32, f32, f32, f32),
}

impl Application {
    pub fn new() -> Self {
        Self {
            params: glium::DrawParameters {
                depth: glium::Depth {
                    test: glium::DepthTest::IfLess,
                    write: true,
                    ..Default::default()
                },
                blend: glium::Blend::alpha_blending(),
                polygon_mode: glium::PolygonMode::Fill,
                line_width: Some(10.0),
                point_size: Some(20.0),
                ..Default::default()
            },
            clear_color: (0.1, 0.1, 0.1, 1.0),
        }
    }

    /// Later draws always cover earlier ones.
    pub fn without_depth_test(mut self) -> Self {
        self.params.depth = glium::Depth::default();
        self
    }

    pub fn with_clear_color(mut self, color: (f32, f32, f32, f32)) -> Self {
        self.clear_color = color;
        self
    }

    pub fn params(&self) -> &DrawParameters<'static> {
        &self.params
    }

    /// Clears a new frame, runs `draw` on it and presents it. The frame is presented
    /// even when `draw` fails.
    pub fn render<F>(&self, display: &Display<WindowSurface>, draw: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut Frame) -> anyhow::Result<()>,
    {
        let mut target = display.draw();
        target.clear_color_and_depth(self.clear_color, 1.0);
        let drawn = draw(&mut target);
        target.finish()?;
        drawn
    }

    pub fn draw_object(
        &self,
        target: &mut Frame,
        object: &RenderObject,
        camera: &Camera,
        light: &Light,
    ) -> Result<(), DrawError> {
        let material = object.material;
        let diffuse = object
            .texture
            .sampled()
            .wrap_function(SamplerWrapFunction::Repeat)
            .minify_filter(MinifySamplerFilter::LinearMipmapLinear)
            .magnify_filter(MagnifySamplerFilter::Linear);
        let uniforms = uniform! {
            model: object.model.to_cols_array_2d(),
            view: camera.view().to_cols_array_2d(),
            projection: object.projection.to_cols_array_2d(),
            light_pos: light.position.to_array(),
            light_color: light.color.to_array(),
            camera_pos: camera.position().to_array(),
            ka: material.ka.to_array(),
            kd: material.kd.to_array(),
            ks: material.ks.to_array(),
            ke: material.ke.to_array(),
            ns: material.ns,
            d: material.d,
            tex_buffer: diffuse,
        };
        object
            .mesh
            .draw(target, object.program, &uniforms, &self.params)
    }
}

/// Everything one lit draw call needs, borrowed from the exercise that owns it.
pub struct RenderObject<'a> {
    pub mesh: &'a GpuMesh,
    pub program: &'a Program,
    pub texture: &'a SrgbTexture2d,
    pub material: &'a Material,
    pub model: Mat4,
    pub projection: Mat4,
}

#[cfg(test)]
mod tests {
    use glium::DepthTest;

    use super::*;

    #[test]
    fn unlit_application_needs_no_light() {
        let app = Application::new();
        assert_eq!(app.params().depth.test, DepthTest::IfLess);
        assert!(app.params().depth.write);
        assert_eq!(app.params().point_size, Some(20.0));

        let flat = Application::new().without_depth_test();
        assert_eq!(flat.params().depth.test, DepthTest::Overwrite);
        assert!(!flat.params().depth.write);
    }

    #[test]
    fn light_comes_from_config() {
        let light = Light::from(LightConfig::default());
        assert_eq!(light.position, Vec3::new(-2.0, 10.0, 2.0));
        assert_eq!(light.color, Vec3::ONE);
    }
}
