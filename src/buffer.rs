use std::{error::Error, fmt};

use glam::Vec3;
use glium::{
    implement_vertex,
    index::{self, NoIndices, PrimitiveType},
    uniforms::Uniforms,
    vertex, Display, DrawError, DrawParameters, Frame, IndexBuffer, Program, Surface,
    VertexBuffer,
};
use glutin::surface::WindowSurface;

use crate::load::{IndexedMesh, Mesh, MeshVertex};

#[derive(Copy, Clone, Debug, Default)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

implement_vertex!(ColorVertex, position, color);

#[derive(Copy, Clone, Debug, Default)]
pub struct PointVertex {
    pub position: [f32; 3],
}

implement_vertex!(PointVertex, position);

impl From<Vec3> for PointVertex {
    fn from(v: Vec3) -> Self {
        Self {
            position: v.to_array(),
        }
    }
}

#[derive(Debug)]
pub enum BufferError {
    Vertex(vertex::BufferCreationError),
    Index(index::BufferCreationError),
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::Vertex(err) => write!(f, "vertex buffer: {err}"),
            BufferError::Index(err) => write!(f, "index buffer: {err}"),
        }
    }
}

impl Error for BufferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BufferError::Vertex(err) => Some(err),
            BufferError::Index(err) => Some(err),
        }
    }
}

impl From<vertex::BufferCreationError> for BufferError {
    fn from(err: vertex::BufferCreationError) -> Self {
        BufferError::Vertex(err)
    }
}

impl From<index::BufferCreationError> for BufferError {
    fn from(err: index::BufferCreationError) -> Self {
        BufferError::Index(err)
    }
}

/// A mesh living on the GPU, drawn as a triangle list.
pub struct GpuMesh {
    vertices: VertexBuffer<MeshVertex>,
    indices: Option<IndexBuffer<u32>>,
}

impl GpuMesh {
    pub fn indexed(
        display: &Display<WindowSurface>,
        mesh: &IndexedMesh,
    ) -> Result<Self, BufferError> {
        Ok(Self {
            vertices: VertexBuffer::new(display, &mesh.vertices)?,
            indices: Some(IndexBuffer::new(
                display,
                PrimitiveType::TrianglesList,
                &mesh.indices,
            )?),
        })
    }

    /// Uploads already expanded vertices; they are drawn in order without indices.
    pub fn expanded(display: &Display<WindowSurface>, mesh: &Mesh) -> Result<Self, BufferError> {
        Ok(Self {
            vertices: VertexBuffer::new(display, &mesh.vertices)?,
            indices: None,
        })
    }

    pub fn draw<U: Uniforms>(
        &self,
        target: &mut Frame,
        program: &Program,
        uniforms: &U,
        params: &DrawParameters<'_>,
    ) -> Result<(), DrawError> {
        match &self.indices {
            Some(indices) => target.draw(&self.vertices, indices, program, uniforms, params),
            None => target.draw(
                &self.vertices,
                NoIndices(PrimitiveType::TrianglesList),
                program,
                uniforms,
                params,
            ),
        }
    }
}

/// Segment end points joining every vertex to the next one.
pub fn path_indices(len: usize) -> Vec<u32> {
    let len = u32::try_from(len).unwrap_or(u32::MAX);
    (0u32..len.saturating_sub(1))
        .flat_map(|idx| [idx, idx + 1])
        .collect()
}

pub struct DisplayPath<'a>(
    pub &'a VertexBuffer<PointVertex>,
    pub &'a Display<WindowSurface>,
);

/// uses `LinesList` since a path has no faces, only consecutive points
impl TryFrom<DisplayPath<'_>> for IndexBuffer<u32> {
    type Error = index::BufferCreationError;
    fn try_from(path: DisplayPath) -> Result<IndexBuffer<u32>, index::BufferCreationError> {
        IndexBuffer::new(path.1, PrimitiveType::LinesList, &path_indices(path.0.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_joins_neighbours() {
        assert_eq!(path_indices(4), vec![0, 1, 1, 2, 2, 3]);
    }

    #[test]
    fn short_paths_have_no_segments() {
        assert!(path_indices(1).is_empty());
        assert!(path_indices(0).is_empty());
    }
}
