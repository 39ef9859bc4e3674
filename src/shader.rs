use std::{fs, path::Path};

use anyhow::Context;
use glium::{program, Display, Program};
use glutin::surface::WindowSurface;

/// Textured Phong lighting for [`crate::load::MeshVertex`] meshes.
pub fn phong(display: &Display<WindowSurface>) -> anyhow::Result<Program> {
    program! (display,
        140 => { vertex: "
                    #version 140

                    uniform mat4 model;
                    uniform mat4 view;
                    uniform mat4 projection;

                    in vec3 position;
                    in vec3 color;
                    in vec2 tex_coords;
                    in vec3 normal;

                    out vec3 v_position;
                    out vec3 v_color;
                    out vec2 v_tex_coords;
                    out vec3 v_normal;

                    void main() {
                        vec4 world = model * vec4(position, 1.0);
                        v_position = world.xyz;
                        v_color = color;
                        v_tex_coords = tex_coords;
                        v_normal = mat3(transpose(inverse(model))) * normal;
                        gl_Position = projection * view * world;
                    }
                ",

        fragment: "
                    #version 140

                    in vec3 v_position;
                    in vec3 v_color;
                    in vec2 v_tex_coords;
                    in vec3 v_normal;
                    out vec4 f_color;

                    uniform vec3 light_pos;
                    uniform vec3 light_color;
                    uniform vec3 camera_pos;

                    uniform vec3 ka;
                    uniform vec3 kd;
                    uniform vec3 ks;
                    uniform vec3 ke;
                    uniform float ns;
                    uniform float d;

                    uniform sampler2D tex_buffer;

                    void main() {
                        vec3 base = texture(tex_buffer, v_tex_coords).rgb * v_color;

                        vec3 n = normalize(v_normal);
                        vec3 to_light = normalize(light_pos - v_position);
                        vec3 to_camera = normalize(camera_pos - v_position);
                        vec3 reflected = reflect(-to_light, n);

                        vec3 ambient = ka * light_color;
                        vec3 diffuse = kd * max(dot(n, to_light), 0.0) * light_color;
                        float spec = pow(max(dot(reflected, to_camera), 0.0), ns);
                        vec3 specular = ks * spec * light_color;

                        f_color = vec4((ambient + diffuse) * base + specular + ke, d);
                    }
                ",
    })
    .context("compiling the phong program")
}

/// Per-vertex color, positioned by `model` alone.
pub fn flat_color(display: &Display<WindowSurface>) -> anyhow::Result<Program> {
    program! (display,
        140 => { vertex: "
                    #version 140

                    uniform mat4 model;

                    in vec3 position;
                    in vec3 color;

                    out vec4 final_color;

                    void main() {
                        gl_Position = model * vec4(position, 1.0);
                        final_color = vec4(color, 1.0);
                    }
                ",

        fragment: "
                    #version 140

                    in vec4 final_color;
                    out vec4 f_color;

                    void main() {
                        f_color = final_color;
                    }
                ",
    })
    .context("compiling the flat color program")
}

/// Positions already in clip space, painted with the `final_color` uniform.
pub fn solid(display: &Display<WindowSurface>) -> anyhow::Result<Program> {
    program! (display,
        140 => { vertex: "
                    #version 140

                    in vec3 position;

                    void main() {
                        gl_Position = vec4(position, 1.0);
                    }
                ",

        fragment: "
                    #version 140

                    uniform vec4 final_color;
                    out vec4 f_color;

                    void main() {
                        f_color = final_color;
                    }
                ",
    })
    .context("compiling the solid program")
}

/// Builds a program from GLSL files. They must declare the inputs and uniforms of
/// [`phong`] that they use.
pub fn from_files(
    display: &Display<WindowSurface>,
    vertex_path: &Path,
    fragment_path: &Path,
) -> anyhow::Result<Program> {
    let vertex = fs::read_to_string(vertex_path)
        .with_context(|| format!("reading {}", vertex_path.display()))?;
    let fragment = fs::read_to_string(fragment_path)
        .with_context(|| format!("reading {}", fragment_path.display()))?;
    Program::from_source(display, &vertex, &fragment, None).with_context(|| {
        format!(
            "compiling {} and {}",
            vertex_path.display(),
            fragment_path.display()
        )
    })
}
