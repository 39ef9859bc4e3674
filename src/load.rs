//! Line-oriented Wavefront OBJ loading.
//!
//! Faces are expanded into [`MeshVertex`]es carrying position, a flat color, texture
//! coordinates and a normal, which is the 11-float layout the shaders in
//! [`crate::shader`] consume. [`ObjModel::to_indexed_mesh`] produces the same vertices
//! with duplicates folded into an index buffer.

use std::{
    error::Error,
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use glam::{Vec2, Vec3};
use glium::implement_vertex;
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::geometry;

/// Floats per interleaved vertex: position (3), color (3), texture (2), normal (3).
pub const FLOATS_PER_VERTEX: usize = 11;

/// Color given to meshes when the caller has no preference.
pub const DEFAULT_COLOR: Vec3 = Vec3::new(1.0, 0.0, 1.0);

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

implement_vertex!(MeshVertex, position, color, tex_coords, normal);

#[derive(Debug)]
pub enum ObjError {
    Io(io::Error),
    Syntax { line: usize, message: String },
    /// An index that is zero or points outside the attribute pool declared so far.
    Index {
        line: usize,
        kind: &'static str,
        index: i64,
    },
}

impl fmt::Display for ObjError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjError::Io(err) => write!(f, "could not read OBJ file: {err}"),
            ObjError::Syntax { line, message } => write!(f, "line {line}: {message}"),
            ObjError::Index { line, kind, index } => {
                write!(f, "line {line}: {kind} index {index} is out of range")
            }
        }
    }
}

impl Error for ObjError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ObjError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ObjError {
    fn from(err: io::Error) -> Self {
        ObjError::Io(err)
    }
}

/// Zero-based indices of one face corner into the attribute pools of an [`ObjModel`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FaceIndex {
    pub position: usize,
    pub tex_coord: Option<usize>,
    pub normal: Option<usize>,
}

/// Attribute pools and triangles read from an OBJ file.
///
/// Every [`FaceIndex`] stored in `triangles` has been checked against the pools, so
/// expanding the model never fails.
#[derive(Clone, Debug, Default)]
pub struct ObjModel {
    positions: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    normals: Vec<Vec3>,
    triangles: Vec<[FaceIndex; 3]>,
    material_lib: Option<String>,
    material_name: Option<String>,
}

/// Face vertices expanded in draw order, three per triangle.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
}

/// Unique vertices plus a triangle list indexing into them.
#[derive(Clone, Debug, Default)]
pub struct IndexedMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Flattens the mesh into `x y z r g b s t nx ny nz` runs.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(self.vertices.len() * FLOATS_PER_VERTEX);
        for vertex in &self.vertices {
            buffer.extend_from_slice(&vertex.position);
            buffer.extend_from_slice(&vertex.color);
            buffer.extend_from_slice(&vertex.tex_coords);
            buffer.extend_from_slice(&vertex.normal);
        }
        buffer
    }
}

/// Number of vertices stored in an interleaved buffer.
pub fn vertex_count(buffer: &[f32]) -> usize {
    buffer.len() / FLOATS_PER_VERTEX
}

impl ObjModel {
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn tex_coords(&self) -> &[Vec2] {
        &self.tex_coords
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn triangles(&self) -> &[[FaceIndex; 3]] {
        &self.triangles
    }

    /// The first `mtllib` statement, as written in the file.
    pub fn material_lib(&self) -> Option<&str> {
        self.material_lib.as_deref()
    }

    /// The first `usemtl` statement.
    pub fn material_name(&self) -> Option<&str> {
        self.material_name.as_deref()
    }

    /// Resolves `mtllib` against the directory holding the OBJ file.
    pub fn mtl_path(&self, obj_path: &Path) -> Option<PathBuf> {
        let lib = self.material_lib.as_ref()?;
        Some(
            obj_path
                .parent()
                .map_or_else(|| PathBuf::from(lib), |dir| dir.join(lib)),
        )
    }

    pub fn to_mesh(&self, color: Vec3) -> Mesh {
        let vertices = self
            .triangles
            .iter()
            .flat_map(|triangle| {
                let flat = self.flat_normal(triangle);
                triangle.map(|corner| self.vertex(corner, color, flat))
            })
            .collect();
        Mesh { vertices }
    }

    /// Like [`ObjModel::to_mesh`] but folds identical corners together. Corners without
    /// a normal get the flat normal of their triangle, so they are only shared within it.
    pub fn to_indexed_mesh(&self, color: Vec3) -> IndexedMesh {
        let mut seen: FxHashMap<(FaceIndex, Option<usize>), u32> = FxHashMap::default();
        let mut mesh = IndexedMesh::default();
        for (number, triangle) in self.triangles.iter().enumerate() {
            let flat = self.flat_normal(triangle);
            for &corner in triangle {
                let key = (corner, corner.normal.is_none().then_some(number));
                let index = *seen.entry(key).or_insert_with(|| {
                    mesh.vertices.push(self.vertex(corner, color, flat));
                    u32::try_from(mesh.vertices.len() - 1).unwrap_or(u32::MAX)
                });
                mesh.indices.push(index);
            }
        }
        mesh
    }

    fn flat_normal(&self, triangle: &[FaceIndex; 3]) -> Vec3 {
        geometry::face_normal(&triangle.map(|corner| self.positions[corner.position]))
    }

    fn vertex(&self, corner: FaceIndex, color: Vec3, flat_normal: Vec3) -> MeshVertex {
        MeshVertex {
            position: self.positions[corner.position].to_array(),
            color: color.to_array(),
            tex_coords: corner
                .tex_coord
                .map_or([0.0; 2], |i| self.tex_coords[i].to_array()),
            normal: corner
                .normal
                .map_or(flat_normal, |i| self.normals[i])
                .to_array(),
        }
    }

    fn push_face<'a>(
        &mut self,
        tokens: impl Iterator<Item = &'a str>,
        line: usize,
    ) -> Result<(), ObjError> {
        let corners = tokens
            .map(|token| self.parse_corner(token, line))
            .collect::<Result<Vec<_>, _>>()?;
        if corners.len() < 3 {
            return Err(ObjError::Syntax {
                line,
                message: format!("face has {} vertices, expected at least 3", corners.len()),
            });
        }

        // polygons are split into a fan around their first corner
        let first = corners[0];
        self.triangles.extend(
            corners[1..]
                .iter()
                .tuple_windows()
                .map(|(&second, &third)| [first, second, third]),
        );
        Ok(())
    }

    /// Reads a `v`, `v/vt`, `v//vn` or `v/vt/vn` token.
    fn parse_corner(&self, token: &str, line: usize) -> Result<FaceIndex, ObjError> {
        let mut parts = token.split('/');
        let position = resolve_index(
            parts.next().unwrap_or_default(),
            self.positions.len(),
            line,
            "position",
        )?;
        let tex_coord = match parts.next() {
            Some(raw) if !raw.is_empty() => Some(resolve_index(
                raw,
                self.tex_coords.len(),
                line,
                "texture",
            )?),
            _ => None,
        };
        let normal = match parts.next() {
            Some(raw) if !raw.is_empty() => {
                Some(resolve_index(raw, self.normals.len(), line, "normal")?)
            }
            _ => None,
        };
        Ok(FaceIndex {
            position,
            tex_coord,
            normal,
        })
    }
}

/// Converts a 1-based (or negative, end-relative) OBJ index into a 0-based one.
fn resolve_index(
    raw: &str,
    pool_len: usize,
    line: usize,
    kind: &'static str,
) -> Result<usize, ObjError> {
    let index: i64 = raw.parse().map_err(|_| ObjError::Syntax {
        line,
        message: format!("invalid {kind} index `{raw}`"),
    })?;
    let len = i64::try_from(pool_len).unwrap_or(i64::MAX);
    let resolved = if index < 0 { len + index } else { index - 1 };
    usize::try_from(resolved)
        .ok()
        .filter(|&i| i < pool_len)
        .ok_or(ObjError::Index { line, kind, index })
}

fn parse_floats<'a, I, const N: usize>(
    mut words: I,
    line: usize,
    keyword: &str,
) -> Result<[f32; N], ObjError>
where
    I: Iterator<Item = &'a str>,
{
    let mut values = [0.0; N];
    for value in &mut values {
        let word = words.next().ok_or_else(|| ObjError::Syntax {
            line,
            message: format!("`{keyword}` expects {N} numbers"),
        })?;
        *value = word.parse().map_err(|_| ObjError::Syntax {
            line,
            message: format!("invalid number `{word}`"),
        })?;
    }
    Ok(values)
}

/// Parse an OBJ byte stream. Unknown statements and comments are skipped.
pub fn parse<R: BufRead>(reader: R) -> Result<ObjModel, ObjError> {
    let mut model = ObjModel::default();
    // not every exporter writes UTF-8; stray bytes only ever sit in comments and names
    for (number, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let text = String::from_utf8_lossy(&bytes);
        let line = number + 1;
        let mut words = text.split_whitespace();
        match words.next() {
            Some("v") => {
                let [x, y, z] = parse_floats::<_, 3>(words, line, "v")?;
                model.positions.push(Vec3::new(x, y, z));
            }
            Some("vt") => {
                let [s, t] = parse_floats::<_, 2>(words, line, "vt")?;
                model.tex_coords.push(Vec2::new(s, t));
            }
            Some("vn") => {
                let [x, y, z] = parse_floats::<_, 3>(words, line, "vn")?;
                model.normals.push(Vec3::new(x, y, z));
            }
            Some("f") => model.push_face(words, line)?,
            Some("mtllib") if model.material_lib.is_none() => {
                model.material_lib = words.next().map(str::to_owned);
            }
            Some("usemtl") if model.material_name.is_none() => {
                model.material_name = words.next().map(str::to_owned);
            }
            _ => (),
        }
    }
    Ok(model)
}

pub fn load(path: &Path) -> Result<ObjModel, ObjError> {
    let file = File::open(path)?;
    let model = parse(BufReader::new(file))?;
    log::info!(
        "loaded {}: {} positions, {} triangles",
        path.display(),
        model.positions.len(),
        model.triangles.len()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# a single textured triangle
mtllib tri.mtl
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
usemtl red
f 1/1/1 2/2/1 3/3/1
";

    fn parse_str(text: &str) -> Result<ObjModel, ObjError> {
        parse(text.as_bytes())
    }

    #[test]
    fn converts_one_based_indices() {
        let model = parse_str(TRIANGLE).unwrap();
        assert_eq!(model.triangles().len(), 1);
        let [a, b, c] = model.triangles()[0];
        assert_eq!(
            a,
            FaceIndex {
                position: 0,
                tex_coord: Some(0),
                normal: Some(0)
            }
        );
        assert_eq!(b.position, 1);
        assert_eq!(c.tex_coord, Some(2));
        assert_eq!(model.material_lib(), Some("tri.mtl"));
        assert_eq!(model.material_name(), Some("red"));
    }

    #[test]
    fn interleaves_eleven_floats_per_vertex() {
        let mesh = parse_str(TRIANGLE).unwrap().to_mesh(Vec3::new(1.0, 0.0, 0.0));
        let buffer = mesh.interleaved();
        assert_eq!(buffer.len(), 3 * FLOATS_PER_VERTEX);
        assert_eq!(vertex_count(&buffer), 3);
        // second vertex: position, color, texture, normal
        assert_eq!(
            &buffer[11..22],
            &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        let model = parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        let positions: Vec<usize> = model.triangles()[0].iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn polygons_are_fan_triangulated() {
        let model =
            parse_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv -1 1 0\nf 1 2 3 4 5\n").unwrap();
        let fans: Vec<[usize; 3]> = model
            .triangles()
            .iter()
            .map(|t| t.map(|c| c.position))
            .collect();
        assert_eq!(fans, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4]]);
    }

    #[test]
    fn missing_attributes_get_defaults() {
        let model = parse_str("v 0 0 0\nv 0 1 0\nv 1 0 0\nf 1 2 3\n").unwrap();
        let mesh = model.to_mesh(DEFAULT_COLOR);
        for vertex in &mesh.vertices {
            assert_eq!(vertex.tex_coords, [0.0, 0.0]);
            assert_eq!(vertex.color, [1.0, 0.0, 1.0]);
            // clockwise when seen from +z
            assert_eq!(vertex.normal, [0.0, 0.0, -1.0]);
        }
    }

    #[test]
    fn skips_texture_slot_when_empty() {
        let model = parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n").unwrap();
        let corner = model.triangles()[0][0];
        assert_eq!(corner.tex_coord, None);
        assert_eq!(corner.normal, Some(0));
    }

    #[test]
    fn latin1_comment_does_not_stop_parsing() {
        let model = parse(&b"# Cria\xE7\xE3o\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n"[..]).unwrap();
        assert_eq!(model.positions().len(), 3);
        assert_eq!(model.triangles().len(), 1);
    }

    #[test]
    fn first_library_and_material_win() {
        let model = parse_str(
            "mtllib a.mtl\nmtllib b.mtl\nusemtl x\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl y\nf 1 2 3\n",
        )
        .unwrap();
        assert_eq!(model.material_lib(), Some("a.mtl"));
        assert_eq!(model.material_name(), Some("x"));
    }

    #[test]
    fn corners_without_normals_are_not_shared_across_triangles() {
        // two triangles meeting along the 2-3 edge, folded so their flat normals differ
        let model = parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 2 3 4\n").unwrap();
        let indexed = model.to_indexed_mesh(DEFAULT_COLOR);
        assert_eq!(indexed.vertices.len(), 6);
        assert_eq!(indexed.indices, vec![0, 1, 2, 3, 4, 5]);

        // with an explicit normal the shared edge is folded together
        let model = parse_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\nf 2//1 4//1 3//1\n",
        )
        .unwrap();
        let indexed = model.to_indexed_mesh(DEFAULT_COLOR);
        assert_eq!(indexed.vertices.len(), 4);
        assert_eq!(indexed.indices, vec![0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn out_of_range_index_reports_line() {
        let err = parse_str("v 0 0 0\nv 1 0 0\n\nf 1 2 3\n").unwrap_err();
        assert!(matches!(
            err,
            ObjError::Index {
                line: 4,
                kind: "position",
                index: 3
            }
        ));
    }

    #[test]
    fn zero_index_is_rejected() {
        let err = parse_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
        assert!(matches!(err, ObjError::Index { index: 0, .. }));
    }

    #[test]
    fn short_vertex_is_a_syntax_error() {
        let err = parse_str("v 0 0\n").unwrap_err();
        assert!(matches!(err, ObjError::Syntax { line: 1, .. }));
        assert_eq!(err.to_string(), "line 1: `v` expects 3 numbers");
    }

    #[test]
    fn degenerate_face_is_rejected() {
        let err = parse_str("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert!(matches!(err, ObjError::Syntax { line: 3, .. }));
    }

    #[test]
    fn resolves_mtl_next_to_obj() {
        let model = parse_str(TRIANGLE).unwrap();
        assert_eq!(
            model.mtl_path(Path::new("assets/models/tri.obj")),
            Some(PathBuf::from("assets/models/tri.mtl"))
        );
        assert_eq!(parse_str("v 0 0 0\n").unwrap().mtl_path(Path::new("a.obj")), None);
    }

    #[test]
    fn cube_shares_corners_within_a_side() {
        let model = parse(&include_bytes!("../assets/cube.obj")[..]).unwrap();
        assert_eq!(model.triangles().len(), 12);

        let expanded = model.to_mesh(DEFAULT_COLOR);
        assert_eq!(expanded.vertices.len(), 36);

        // four corners per side, each side with its own normal
        let indexed = model.to_indexed_mesh(DEFAULT_COLOR);
        assert_eq!(indexed.vertices.len(), 24);
        assert_eq!(indexed.indices.len(), 36);
        for (i, &index) in indexed.indices.iter().enumerate() {
            assert_eq!(indexed.vertices[index as usize], expanded.vertices[i]);
        }
    }

    #[test]
    fn agrees_with_obj_crate_on_cube() {
        let bytes = include_bytes!("../assets/cube.obj");
        let ours = parse(&bytes[..]).unwrap();
        let theirs = obj::ObjData::load_buf(&mut io::BufReader::new(&bytes[..])).unwrap();

        let positions: Vec<[f32; 3]> = ours.positions().iter().map(|p| p.to_array()).collect();
        let tex_coords: Vec<[f32; 2]> = ours.tex_coords().iter().map(|t| t.to_array()).collect();
        let normals: Vec<[f32; 3]> = ours.normals().iter().map(|n| n.to_array()).collect();
        assert_eq!(positions, theirs.position);
        assert_eq!(tex_coords, theirs.texture);
        assert_eq!(normals, theirs.normal);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load(Path::new("does/not/exist.obj")).unwrap_err();
        assert!(matches!(err, ObjError::Io(_)));
        assert!(err.source().is_some());
    }
}
