use crate::geometry::vertex::Vertex;

/// CPU-side triangle geometry: a vertex buffer and a `u32` index buffer
/// grouped in triples.
///
/// A mesh is built once per render job by one of the shape generators and
/// never mutated afterwards; the render context uploads it and owns the
/// GPU copies for the rest of the job.
#[derive(Debug, Clone)]
pub struct Mesh
{
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
}

impl Mesh
{
        pub fn new(
                vertices: Vec<Vertex>,
                indices: Vec<u32>,
        ) -> Self
        {
                debug_assert!(indices.len() % 3 == 0, "index count must be a multiple of 3");
                debug_assert!(
                        indices.iter().all(|&i| (i as usize) < vertices.len()),
                        "every index must address a vertex"
                );

                Self {
                        vertices,
                        indices,
                }
        }

        pub fn vertices(&self) -> &[Vertex]
        {
                &self.vertices
        }

        pub fn indices(&self) -> &[u32]
        {
                &self.indices
        }

        pub fn vertex_count(&self) -> u32
        {
                self.vertices.len() as u32
        }

        pub fn index_count(&self) -> u32
        {
                self.indices.len() as u32
        }
}
