use std::f32::consts::PI;
use std::str::FromStr;

use crate::error::RenderError;
use crate::geometry::mesh::Mesh;
use crate::geometry::vertex::Vertex;

/// The closed set of solids the pipeline can render.
///
/// Dispatch is an exhaustive match; an unsupported identifier can only
/// exist at the string boundary, where [`Shape::from_str`] rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape
{
        Cube,
        Coin,
        Pyramid,
}

impl Shape
{
        /// Builds the mesh for this shape with its default parameters.
        pub fn mesh(self) -> Mesh
        {
                match self
                {
                        Shape::Cube => cube(1.0),
                        Shape::Coin => coin(32, 0.1, 1.0),
                        Shape::Pyramid => pyramid(1.0, 1.0),
                }
        }

        pub fn name(self) -> &'static str
        {
                match self
                {
                        Shape::Cube => "cube",
                        Shape::Coin => "coin",
                        Shape::Pyramid => "pyramid",
                }
        }

        /// Number of cube faces; the texture list for a cube is padded to
        /// this length.
        pub const CUBE_FACES: usize = 6;
}

impl FromStr for Shape
{
        type Err = RenderError;

        fn from_str(s: &str) -> Result<Self, Self::Err>
        {
                match s
                {
                        "cube" => Ok(Shape::Cube),
                        "coin" => Ok(Shape::Coin),
                        "pyramid" => Ok(Shape::Pyramid),
                        other => Err(RenderError::UnknownShape(other.to_string())),
                }
        }
}

impl std::fmt::Display for Shape
{
        fn fmt(
                &self,
                f: &mut std::fmt::Formatter<'_>,
        ) -> std::fmt::Result
        {
                f.write_str(self.name())
        }
}

/// Axis-aligned cube centered at the origin.
///
/// Each face owns its four vertices so it can map the full [0,1]² texture
/// space independently; positions shared between faces are deliberately
/// duplicated. The back and left faces flip their UVs horizontally so the
/// image reads correctly from outside; winding stays counter-clockwise
/// seen from outside for back-face culling.
pub fn cube(size: f32) -> Mesh
{
        let s = size / 2.0;

        let vertices = vec![
                // Front face (+Z)
                Vertex::new([-s, -s, s], [0.0, 0.0]),
                Vertex::new([s, -s, s], [1.0, 0.0]),
                Vertex::new([s, s, s], [1.0, 1.0]),
                Vertex::new([-s, s, s], [0.0, 1.0]),
                // Back face (-Z), mirrored
                Vertex::new([-s, -s, -s], [1.0, 0.0]),
                Vertex::new([-s, s, -s], [1.0, 1.0]),
                Vertex::new([s, s, -s], [0.0, 1.0]),
                Vertex::new([s, -s, -s], [0.0, 0.0]),
                // Top face (+Y)
                Vertex::new([-s, s, s], [0.0, 1.0]),
                Vertex::new([s, s, s], [1.0, 1.0]),
                Vertex::new([s, s, -s], [1.0, 0.0]),
                Vertex::new([-s, s, -s], [0.0, 0.0]),
                // Bottom face (-Y)
                Vertex::new([-s, -s, s], [0.0, 0.0]),
                Vertex::new([-s, -s, -s], [0.0, 1.0]),
                Vertex::new([s, -s, -s], [1.0, 1.0]),
                Vertex::new([s, -s, s], [1.0, 0.0]),
                // Right face (+X)
                Vertex::new([s, -s, s], [0.0, 0.0]),
                Vertex::new([s, -s, -s], [1.0, 0.0]),
                Vertex::new([s, s, -s], [1.0, 1.0]),
                Vertex::new([s, s, s], [0.0, 1.0]),
                // Left face (-X), mirrored
                Vertex::new([-s, -s, s], [1.0, 0.0]),
                Vertex::new([-s, s, s], [1.0, 1.0]),
                Vertex::new([-s, s, -s], [0.0, 1.0]),
                Vertex::new([-s, -s, -s], [0.0, 0.0]),
        ];

        let indices = vec![
                0, 1, 2, 2, 3, 0, // front
                4, 5, 6, 6, 7, 4, // back
                8, 9, 10, 10, 11, 8, // top
                12, 13, 14, 14, 15, 12, // bottom
                16, 17, 18, 18, 19, 16, // right
                20, 21, 22, 22, 23, 20, // left
        ];

        Mesh::new(vertices, indices)
}

/// Coin-like cylinder centered at the origin, axis along +Y.
///
/// Layout per side segment: a top-cap ring vertex, a bottom-cap ring
/// vertex, then a side-top and side-bottom pair. The cap rings project the
/// texture radially (center at UV (0.5, 0.5)); the side band wraps the
/// texture horizontally with `u = i / sides` and spans it top to bottom.
/// The bottom cap reverses its triangle order so it stays outward-facing.
///
/// `sides` must be at least 3.
pub fn coin(
        sides: u32,
        height: f32,
        radius: f32,
) -> Mesh
{
        assert!(sides >= 3, "a cylinder needs at least 3 sides");

        let n = sides as usize;
        let half = height / 2.0;

        let mut vertices = Vec::with_capacity(2 + n * 4);
        let mut indices = Vec::with_capacity(n * 12);

        // Cap centers
        let top_center = 0u32;
        let bottom_center = 1u32;
        vertices.push(Vertex::new([0.0, half, 0.0], [0.5, 0.5]));
        vertices.push(Vertex::new([0.0, -half, 0.0], [0.5, 0.5]));

        for i in 0..n
        {
                let angle = 2.0 * PI * i as f32 / sides as f32;
                let (sin, cos) = angle.sin_cos();
                let x = radius * cos;
                let z = radius * sin;

                let cap_uv = [cos * 0.5 + 0.5, sin * 0.5 + 0.5];
                let u = i as f32 / sides as f32;

                vertices.push(Vertex::new([x, half, z], cap_uv));
                vertices.push(Vertex::new([x, -half, z], cap_uv));
                vertices.push(Vertex::new([x, half, z], [u, 1.0]));
                vertices.push(Vertex::new([x, -half, z], [u, 0.0]));
        }

        for i in 0..n
        {
                let next = (i + 1) % n;

                // Ring vertices start after the two centers, 4 per segment.
                let top_curr = (2 + i * 4) as u32;
                let top_next = (2 + next * 4) as u32;
                let bottom_curr = (3 + i * 4) as u32;
                let bottom_next = (3 + next * 4) as u32;

                // Cap fans; the bottom one swaps curr/next to keep the
                // outside face front.
                indices.extend_from_slice(&[top_center, top_curr, top_next]);
                indices.extend_from_slice(&[bottom_center, bottom_next, bottom_curr]);

                let side_top_curr = (4 + i * 4) as u32;
                let side_bottom_curr = (5 + i * 4) as u32;
                let side_top_next = (4 + next * 4) as u32;
                let side_bottom_next = (5 + next * 4) as u32;

                indices.extend_from_slice(&[side_top_curr, side_bottom_curr, side_top_next]);
                indices.extend_from_slice(&[side_top_next, side_bottom_curr, side_bottom_next]);
        }

        Mesh::new(vertices, indices)
}

/// Square-based pyramid, base on the y = 0 plane, apex at `(0, height, 0)`.
///
/// The four base corners are shared by the two base triangles; every
/// triangular side owns its three vertices so each face maps the texture
/// independently (base corners at v = 0, apex at UV (0.5, 1)).
pub fn pyramid(
        size: f32,
        height: f32,
) -> Mesh
{
        let s = size / 2.0;
        let apex = [0.0, height, 0.0];
        let apex_uv = [0.5, 1.0];

        let vertices = vec![
                // Base quad
                Vertex::new([-s, 0.0, s], [0.0, 0.0]),
                Vertex::new([s, 0.0, s], [1.0, 0.0]),
                Vertex::new([s, 0.0, -s], [1.0, 1.0]),
                Vertex::new([-s, 0.0, -s], [0.0, 1.0]),
                // Front face
                Vertex::new([-s, 0.0, s], [0.0, 0.0]),
                Vertex::new([s, 0.0, s], [1.0, 0.0]),
                Vertex::new(apex, apex_uv),
                // Right face
                Vertex::new([s, 0.0, s], [0.0, 0.0]),
                Vertex::new([s, 0.0, -s], [1.0, 0.0]),
                Vertex::new(apex, apex_uv),
                // Back face
                Vertex::new([s, 0.0, -s], [0.0, 0.0]),
                Vertex::new([-s, 0.0, -s], [1.0, 0.0]),
                Vertex::new(apex, apex_uv),
                // Left face
                Vertex::new([-s, 0.0, -s], [0.0, 0.0]),
                Vertex::new([-s, 0.0, s], [1.0, 0.0]),
                Vertex::new(apex, apex_uv),
        ];

        let indices = vec![
                0, 1, 2, 2, 3, 0, // base
                4, 5, 6, // front
                7, 8, 9, // right
                10, 11, 12, // back
                13, 14, 15, // left
        ];

        Mesh::new(vertices, indices)
}

#[cfg(test)]
mod tests
{
        use super::*;

        fn assert_indices_valid(mesh: &Mesh)
        {
                assert_eq!(mesh.index_count() % 3, 0);
                for &index in mesh.indices()
                {
                        assert!(index < mesh.vertex_count());
                }
        }

        #[test]
        fn cube_counts()
        {
                let mesh = cube(1.0);
                assert_eq!(mesh.vertex_count(), 24);
                assert_eq!(mesh.index_count(), 36);
                assert_indices_valid(&mesh);
        }

        #[test]
        fn coin_counts_follow_sides()
        {
                for sides in [3u32, 8, 32]
                {
                        let mesh = coin(sides, 0.1, 1.0);
                        assert_eq!(mesh.vertex_count(), 2 + 4 * sides);
                        assert_eq!(mesh.index_count(), 12 * sides);
                        assert_indices_valid(&mesh);
                }
        }

        #[test]
        fn coin_with_eight_sides()
        {
                let mesh = coin(8, 0.1, 1.0);
                assert_eq!(mesh.vertex_count(), 34);
                assert_eq!(mesh.index_count(), 96);
        }

        #[test]
        fn pyramid_counts()
        {
                let mesh = pyramid(1.0, 1.0);
                assert_eq!(mesh.vertex_count(), 16);
                assert_eq!(mesh.index_count(), 18);
                assert_indices_valid(&mesh);
        }

        #[test]
        fn generators_are_deterministic()
        {
                let a = coin(32, 0.1, 1.0);
                let b = coin(32, 0.1, 1.0);
                assert_eq!(a.vertices(), b.vertices());
                assert_eq!(a.indices(), b.indices());
        }

        #[test]
        fn coin_side_band_wraps_horizontally()
        {
                let sides = 8u32;
                let mesh = coin(sides, 0.1, 1.0);

                for i in 0..sides as usize
                {
                        let side_top = mesh.vertices()[2 + i * 4 + 2];
                        let side_bottom = mesh.vertices()[2 + i * 4 + 3];
                        let u = i as f32 / sides as f32;

                        assert!((side_top.tex_coords[0] - u).abs() < 1e-6);
                        assert_eq!(side_top.tex_coords[1], 1.0);
                        assert!((side_bottom.tex_coords[0] - u).abs() < 1e-6);
                        assert_eq!(side_bottom.tex_coords[1], 0.0);
                }
        }

        #[test]
        fn shape_parses_known_names()
        {
                assert_eq!("cube".parse::<Shape>().unwrap(), Shape::Cube);
                assert_eq!("coin".parse::<Shape>().unwrap(), Shape::Coin);
                assert_eq!("pyramid".parse::<Shape>().unwrap(), Shape::Pyramid);
        }

        #[test]
        fn shape_rejects_unknown_names()
        {
                let err = "dodecahedron".parse::<Shape>().unwrap_err();
                assert!(matches!(
                        err,
                        crate::error::RenderError::UnknownShape(ref name) if name == "dodecahedron"
                ));
        }
}
