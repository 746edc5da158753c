//! Static mesh geometry
//!
//! A mesh owns its vertex array and index array; triangles are index
//! triples into the vertex arena, bound once at construction. Meshes are
//! immutable while rendering and replaced wholesale on reload.

mod obj;

pub use obj::*;

use crate::math::Vec3;

/// A vertex: position plus normal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    pub fn from_position(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            normal: Vec3::ZERO,
        }
    }
}

/// Index triple into the owning mesh's vertex array. Indices are
/// validated when the mesh is built; the rasterizer indexes without
/// re-checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { indices: [a, b, c] }
    }
}

/// Error raised while building a mesh from raw arrays.
#[derive(Debug)]
pub enum MeshError {
    /// The index count is not a multiple of three.
    IndexCountNotTriangles(usize),
    /// An index points past the end of the vertex array.
    IndexOutOfRange { index: usize, vertex_count: usize },
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::IndexCountNotTriangles(n) => {
                write!(f, "index count {} is not a multiple of 3", n)
            }
            MeshError::IndexOutOfRange { index, vertex_count } => {
                write!(f, "index {} out of range for {} vertices", index, vertex_count)
            }
        }
    }
}

/// Vertex arena plus index list plus the derived triangle list.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<usize>,
    tris: Vec<Triangle>,
}

impl Mesh {
    /// Build a mesh and bind its triangle list. Malformed indices are a
    /// load-time fault, never a runtime check in the rasterizer.
    pub fn new(vertices: Vec<Vertex>, indices: Vec<usize>) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotTriangles(indices.len()));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                index: bad,
                vertex_count: vertices.len(),
            });
        }
        let mut mesh = Self { vertices, indices, tris: Vec::new() };
        mesh.bind_tris();
        Ok(mesh)
    }

    /// Walk the index array three at a time and derive the triangle list.
    fn bind_tris(&mut self) {
        self.tris = self
            .indices
            .chunks_exact(3)
            .map(|c| Triangle::new(c[0], c[1], c[2]))
            .collect();
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }

    pub fn tris(&self) -> &[Triangle] {
        &self.tris
    }

    /// Replace all vertex normals with area-weighted averages of the
    /// adjacent face normals. Used when the source geometry carries none.
    pub fn compute_normals(&mut self) {
        for v in &mut self.vertices {
            v.normal = Vec3::ZERO;
        }
        for tri in &self.tris {
            let [a, b, c] = tri.indices;
            let e1 = self.vertices[b].position - self.vertices[a].position;
            let e2 = self.vertices[c].position - self.vertices[a].position;
            // Unnormalized cross weights by twice the face area
            let face = e1.cross(e2);
            self.vertices[a].normal += face;
            self.vertices[b].normal += face;
            self.vertices[c].normal += face;
        }
        for v in &mut self.vertices {
            v.normal = v.normal.normalized();
        }
    }

    /// Axis-aligned unit-ish cube centered at the origin, with per-face
    /// normals. Lets the shell render something with no assets on disk.
    pub fn unit_cube() -> Mesh {
        let faces: [(Vec3, [Vec3; 4]); 6] = [
            (
                Vec3::UNIT_Z,
                [
                    Vec3::new(-1.0, -1.0, 1.0),
                    Vec3::new(1.0, -1.0, 1.0),
                    Vec3::new(1.0, 1.0, 1.0),
                    Vec3::new(-1.0, 1.0, 1.0),
                ],
            ),
            (
                -Vec3::UNIT_Z,
                [
                    Vec3::new(1.0, -1.0, -1.0),
                    Vec3::new(-1.0, -1.0, -1.0),
                    Vec3::new(-1.0, 1.0, -1.0),
                    Vec3::new(1.0, 1.0, -1.0),
                ],
            ),
            (
                Vec3::UNIT_Y,
                [
                    Vec3::new(-1.0, 1.0, 1.0),
                    Vec3::new(1.0, 1.0, 1.0),
                    Vec3::new(1.0, 1.0, -1.0),
                    Vec3::new(-1.0, 1.0, -1.0),
                ],
            ),
            (
                -Vec3::UNIT_Y,
                [
                    Vec3::new(-1.0, -1.0, -1.0),
                    Vec3::new(1.0, -1.0, -1.0),
                    Vec3::new(1.0, -1.0, 1.0),
                    Vec3::new(-1.0, -1.0, 1.0),
                ],
            ),
            (
                Vec3::UNIT_X,
                [
                    Vec3::new(1.0, -1.0, 1.0),
                    Vec3::new(1.0, -1.0, -1.0),
                    Vec3::new(1.0, 1.0, -1.0),
                    Vec3::new(1.0, 1.0, 1.0),
                ],
            ),
            (
                -Vec3::UNIT_X,
                [
                    Vec3::new(-1.0, -1.0, -1.0),
                    Vec3::new(-1.0, -1.0, 1.0),
                    Vec3::new(-1.0, 1.0, 1.0),
                    Vec3::new(-1.0, 1.0, -1.0),
                ],
            ),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners) in faces {
            let base = vertices.len();
            for corner in corners {
                vertices.push(Vertex::new(corner, normal));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        // Statically valid; the error paths cover loader input only
        Mesh::new(vertices, indices).expect("cube indices are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_tris() {
        let vertices = vec![
            Vertex::from_position(0.0, 0.0, 0.0),
            Vertex::from_position(1.0, 0.0, 0.0),
            Vertex::from_position(0.0, 1.0, 0.0),
            Vertex::from_position(1.0, 1.0, 0.0),
        ];
        let mesh = Mesh::new(vertices, vec![0, 1, 2, 1, 3, 2]).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.tris().len(), 2);
        assert_eq!(mesh.tris()[1], Triangle::new(1, 3, 2));
    }

    #[test]
    fn test_index_count_must_be_triples() {
        let vertices = vec![Vertex::default(); 3];
        let err = Mesh::new(vertices, vec![0, 1]).unwrap_err();
        assert!(matches!(err, MeshError::IndexCountNotTriangles(2)));
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let vertices = vec![Vertex::default(); 3];
        let err = Mesh::new(vertices, vec![0, 1, 7]).unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { index: 7, vertex_count: 3 }));
    }

    #[test]
    fn test_compute_normals_flat_triangle() {
        let vertices = vec![
            Vertex::from_position(0.0, 0.0, 0.0),
            Vertex::from_position(1.0, 0.0, 0.0),
            Vertex::from_position(0.0, 1.0, 0.0),
        ];
        let mut mesh = Mesh::new(vertices, vec![0, 1, 2]).unwrap();
        mesh.compute_normals();
        for v in mesh.vertices() {
            assert!((v.normal - Vec3::UNIT_Z).length() < 1e-12);
        }
    }

    #[test]
    fn test_unit_cube_shape() {
        let cube = Mesh::unit_cube();
        assert_eq!(cube.num_vertices(), 24);
        assert_eq!(cube.tris().len(), 12);
        // Face normals are unit length and axis-aligned
        for v in cube.vertices() {
            assert!((v.normal.length() - 1.0).abs() < 1e-12);
        }
    }
}
