use std::{
    error::Error,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use glam::Vec3;
use serde::Deserialize;

use crate::{camera, load};

/// Scene description read from a JSON file. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub shaders: ShaderPaths,
    pub light: LightConfig,
    pub objects: Vec<ObjectConfig>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: String::from("glcourse"),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov: f32,
    pub position: Vec3,
    /// Initial view, replaced by the free-fly view on the first frame.
    pub look_at: Option<LookAt>,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: camera::MAX_FOV,
            position: Vec3::new(0.0, 0.0, 3.0),
            look_at: None,
            speed: 0.25,
            sensitivity: 0.05,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct LookAt {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

/// GLSL sources to use instead of the built-in Phong program.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShaderPaths {
    pub vertex: Option<PathBuf>,
    pub fragment: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: Vec3,
    pub color: Vec3,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(-2.0, 10.0, 2.0),
            color: Vec3::ONE,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ObjectConfig {
    pub obj_path: PathBuf,
    /// Overrides the material's `map_Kd`.
    #[serde(default)]
    pub texture_path: Option<PathBuf>,
    #[serde(default = "default_color")]
    pub color: Vec3,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    /// Degrees about +y.
    #[serde(default)]
    pub rotation: f32,
    /// Orbiting objects animate on their own and cannot be selected.
    #[serde(default)]
    pub orbit: Option<OrbitConfig>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub radius: f32,
    pub height: f32,
    /// Angle added every frame.
    pub step: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            height: 3.0,
            step: 0.01,
        }
    }
}

fn default_color() -> Vec3 {
    load::DEFAULT_COLOR
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, .. } => {
                write!(f, "I/O error while reading {}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "parse error at {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads `path` and makes every relative path in it relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let mut config = Self::from_json(&text)?;
        if let Some(dir) = path.parent() {
            config.rebase(dir);
        }
        Ok(config)
    }

    fn rebase(&mut self, dir: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        };
        self.shaders.vertex.iter_mut().for_each(join);
        self.shaders.fragment.iter_mut().for_each(join);
        for object in &mut self.objects {
            join(&mut object.obj_path);
            object.texture_path.iter_mut().for_each(join);
        }
    }

    /// The camera plus every object that does not orbit.
    pub fn selectable_count(&self) -> usize {
        1 + self.objects.iter().filter(|o| o.orbit.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera.fov, 45.0);
        assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 3.0));
        assert!(config.objects.is_empty());
        assert_eq!(config.selectable_count(), 1);
    }

    #[test]
    fn reads_objects_and_orbits() {
        let config = Config::from_json(
            r#"{
                "window": { "width": 1000, "title": "Scene" },
                "camera": {
                    "fov": 30.0,
                    "look_at": { "eye": [0, 0, 3], "target": [0, 0, 0], "up": [0, 1, 0] }
                },
                "light": { "position": [1, 2, 3], "color": [1, 1, 0] },
                "objects": [
                    { "obj_path": "cube.obj", "position": [2, 0, 0], "rotation": 45 },
                    { "obj_path": "moon.obj", "scale": [0.5, 0.5, 0.5], "orbit": { "radius": 4 } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.window.width, 1000);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.window.title, "Scene");
        assert_eq!(config.camera.look_at.unwrap().up, Vec3::Y);
        assert_eq!(config.light.color, Vec3::new(1.0, 1.0, 0.0));

        let cube = &config.objects[0];
        assert_eq!(cube.color, load::DEFAULT_COLOR);
        assert_eq!(cube.scale, Vec3::ONE);
        assert_eq!(cube.rotation, 45.0);
        assert!(cube.orbit.is_none());

        let orbit = config.objects[1].orbit.unwrap();
        assert_eq!(orbit.radius, 4.0);
        assert_eq!(orbit.height, 3.0);
        assert_eq!(config.selectable_count(), 2);
    }

    #[test]
    fn missing_obj_path_is_a_parse_error() {
        let err = Config::from_json(r#"{ "objects": [ {} ] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bundled_config_paths_are_rebased() {
        let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/config.json"));
        let config = Config::load(path).unwrap();
        assert!(!config.objects.is_empty());
        for object in &config.objects {
            assert!(object.obj_path.is_absolute());
            assert!(object.obj_path.exists());
        }
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Config::load(Path::new("nowhere/config.json")).unwrap_err();
        assert_eq!(err.to_string(), "I/O error while reading nowhere/config.json");
    }
}
