use std::{
    error::Error,
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use glam::Vec3;

use crate::load::ObjModel;

/// Surface parameters read from an MTL file.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    /// ambient color
    pub ka: Vec3,
    /// diffuse color
    pub kd: Vec3,
    /// specular color
    pub ks: Vec3,
    /// emissive color
    pub ke: Vec3,
    /// specular exponent
    pub ns: f32,
    /// optical density
    pub ni: f32,
    /// dissolve
    pub d: f32,
    pub illum: i32,
    pub diffuse_map: Option<PathBuf>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            ka: Vec3::splat(0.2),
            kd: Vec3::splat(0.5),
            ks: Vec3::splat(0.5),
            ke: Vec3::ZERO,
            ns: 10.0,
            ni: 1.0,
            d: 1.0,
            illum: 2,
            diffuse_map: None,
        }
    }
}

#[derive(Debug)]
pub enum MtlError {
    Io(io::Error),
    Syntax { line: usize, message: String },
}

impl fmt::Display for MtlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MtlError::Io(err) => write!(f, "could not read MTL file: {err}"),
            MtlError::Syntax { line, message } => write!(f, "line {line}: {message}"),
        }
    }
}

impl Error for MtlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MtlError::Io(err) => Some(err),
            MtlError::Syntax { .. } => None,
        }
    }
}

impl From<io::Error> for MtlError {
    fn from(err: io::Error) -> Self {
        MtlError::Io(err)
    }
}

/// Materials in declaration order.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl MaterialLibrary {
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn first(&self) -> Option<&Material> {
        self.materials.first()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Material statements before the first `newmtl` land in an unnamed material.
    fn current(&mut self) -> &mut Material {
        if self.materials.is_empty() {
            self.materials.push(Material::default());
        }
        let last = self.materials.len() - 1;
        &mut self.materials[last]
    }
}

fn number<'a>(words: &mut impl Iterator<Item = &'a str>, line: usize) -> Result<f32, MtlError> {
    let word = words.next().ok_or_else(|| MtlError::Syntax {
        line,
        message: "missing value".to_owned(),
    })?;
    word.parse().map_err(|_| MtlError::Syntax {
        line,
        message: format!("invalid number `{word}`"),
    })
}

fn color<'a>(words: &mut impl Iterator<Item = &'a str>, line: usize) -> Result<Vec3, MtlError> {
    Ok(Vec3::new(
        number(words, line)?,
        number(words, line)?,
        number(words, line)?,
    ))
}

pub fn parse<R: BufRead>(reader: R) -> Result<MaterialLibrary, MtlError> {
    let mut library = MaterialLibrary::default();
    for (index, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let text = String::from_utf8_lossy(&bytes);
        let line = index + 1;
        let mut words = text.split_whitespace();
        match words.next() {
            Some("newmtl") => library.materials.push(Material {
                name: words.next().unwrap_or_default().to_owned(),
                ..Material::default()
            }),
            Some("Ka") => library.current().ka = color(&mut words, line)?,
            Some("Kd") => library.current().kd = color(&mut words, line)?,
            Some("Ks") => library.current().ks = color(&mut words, line)?,
            Some("Ke") => library.current().ke = color(&mut words, line)?,
            Some("Ns") => library.current().ns = number(&mut words, line)?,
            Some("Ni") => library.current().ni = number(&mut words, line)?,
            Some("d") => library.current().d = number(&mut words, line)?,
            Some("Tr") => library.current().d = 1.0 - number(&mut words, line)?,
            Some("illum") => {
                let word = words.next().unwrap_or_default();
                library.current().illum = word.parse().map_err(|_| MtlError::Syntax {
                    line,
                    message: format!("invalid illumination model `{word}`"),
                })?;
            }
            Some("map_Kd") => {
                // options such as `-s 1 1 1` precede the file name
                library.current().diffuse_map = words.last().map(PathBuf::from);
            }
            _ => (),
        }
    }
    Ok(library)
}

/// Loads an MTL file; texture paths are made relative to the file's directory.
pub fn load(path: &Path) -> Result<MaterialLibrary, MtlError> {
    let file = File::open(path)?;
    let mut library = parse(BufReader::new(file))?;
    if let Some(dir) = path.parent() {
        for material in &mut library.materials {
            if let Some(map) = material.diffuse_map.take() {
                material.diffuse_map = Some(dir.join(map));
            }
        }
    }
    log::info!("loaded {}: {} materials", path.display(), library.len());
    Ok(library)
}

/// Picks the material an OBJ model asks for: its `usemtl` entry, else the first one in
/// its `mtllib`. Anything missing falls back to [`Material::default`].
pub fn resolve(obj_path: &Path, model: &ObjModel) -> Material {
    let Some(path) = model.mtl_path(obj_path) else {
        log::debug!("{} has no mtllib, using default material", obj_path.display());
        return Material::default();
    };
    match load(&path) {
        Ok(library) => model
            .material_name()
            .and_then(|name| library.get(name))
            .or_else(|| library.first())
            .cloned()
            .unwrap_or_default(),
        Err(err) => {
            log::warn!("Failed to open MTL file {}: {err}", path.display());
            Material::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_MATERIALS: &str = "\
# two materials
newmtl shiny
Ns 250.0
Ka 1.0 1.0 1.0
Kd 0.8 0.1 0.1
Ks 0.5 0.5 0.5
Ke 0.0 0.0 0.0
Ni 1.45
d 1.0
illum 2
map_Kd -s 1 1 1 textures/red.png

newmtl glass
Tr 0.75
illum 4
";

    #[test]
    fn reads_every_field() {
        let library = parse(TWO_MATERIALS.as_bytes()).unwrap();
        assert_eq!(library.len(), 2);
        let shiny = library.get("shiny").unwrap();
        assert_eq!(shiny.ns, 250.0);
        assert_eq!(shiny.ka, Vec3::ONE);
        assert_eq!(shiny.kd, Vec3::new(0.8, 0.1, 0.1));
        assert_eq!(shiny.ks, Vec3::splat(0.5));
        assert_eq!(shiny.ke, Vec3::ZERO);
        assert_eq!(shiny.ni, 1.45);
        assert_eq!(shiny.d, 1.0);
        assert_eq!(shiny.illum, 2);
        assert_eq!(shiny.diffuse_map, Some(PathBuf::from("textures/red.png")));
    }

    #[test]
    fn unset_fields_keep_defaults() {
        let library = parse(TWO_MATERIALS.as_bytes()).unwrap();
        let glass = library.get("glass").unwrap();
        assert!((glass.d - 0.25).abs() < 1e-6);
        assert_eq!(glass.illum, 4);
        assert_eq!(glass.kd, Material::default().kd);
        assert_eq!(glass.ns, 10.0);
    }

    #[test]
    fn statements_without_newmtl_build_an_unnamed_material() {
        let library = parse("Kd 1 0 0\n".as_bytes()).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.first().unwrap().name, "");
        assert_eq!(library.first().unwrap().kd, Vec3::X);
    }

    #[test]
    fn latin1_comment_does_not_stop_parsing() {
        let library = parse(&b"# Cria\xE7\xE3o do material\nnewmtl red\nKd 1 0 0\n"[..]).unwrap();
        assert_eq!(library.get("red").unwrap().kd, Vec3::X);
    }

    #[test]
    fn bad_number_reports_line() {
        let err = parse("newmtl a\nKd 1 x 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MtlError::Syntax { line: 2, .. }));
        let err = parse("Ka 1 1\n".as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "line 1: missing value");
    }

    #[test]
    fn resolves_bundled_cube_material() {
        let obj_path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/cube.obj"));
        let model = crate::load::load(obj_path).unwrap();
        let material = resolve(obj_path, &model);
        assert_eq!(material.name, "Cube");
        assert_eq!(material.ns, 250.0);
        assert_eq!(
            material.diffuse_map,
            Some(obj_path.parent().unwrap().join("cube.png"))
        );
    }

    #[test]
    fn missing_library_falls_back_to_default() {
        let model = crate::load::parse("mtllib nowhere.mtl\nv 0 0 0\n".as_bytes()).unwrap();
        assert_eq!(
            resolve(Path::new("/tmp/model.obj"), &model),
            Material::default()
        );
    }
}
