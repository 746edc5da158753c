//! Wavefront OBJ loading
//!
//! Supports the subset this engine renders: `v` position lines, optional
//! `vn` normal lines, and `f` face lines with 1-based references in the
//! `i`, `i/t`, `i//n` and `i/t/n` forms. Faces with more than three
//! references are fan-triangulated. Malformed lines abort the load.

use std::fs;
use std::path::Path;

use crate::math::Vec3;
use super::{Mesh, MeshError, Vertex};

/// Error type for OBJ loading
#[derive(Debug)]
pub enum ObjError {
    Io(std::io::Error),
    /// A line that could not be parsed, with its 1-based line number.
    Malformed { line: usize, message: String },
    Mesh(MeshError),
}

impl From<std::io::Error> for ObjError {
    fn from(e: std::io::Error) -> Self {
        ObjError::Io(e)
    }
}

impl From<MeshError> for ObjError {
    fn from(e: MeshError) -> Self {
        ObjError::Mesh(e)
    }
}

impl std::fmt::Display for ObjError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjError::Io(e) => write!(f, "IO error: {}", e),
            ObjError::Malformed { line, message } => {
                write!(f, "line {}: {}", line, message)
            }
            ObjError::Mesh(e) => write!(f, "mesh error: {}", e),
        }
    }
}

/// Load a mesh from an OBJ file on disk.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
    let contents = fs::read_to_string(path)?;
    parse_obj(&contents)
}

/// Parse OBJ text into a mesh. When the file carries no `vn` lines,
/// vertex normals are generated from the faces after parsing.
pub fn parse_obj(text: &str) -> Result<Mesh, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    // Normal per position slot, filled in as faces reference them
    let mut assigned: Vec<Option<Vec3>> = Vec::new();
    let mut indices: Vec<usize> = Vec::new();

    for (line_idx, raw) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields[0] {
            "v" => {
                if fields.len() != 4 {
                    return Err(malformed(
                        line_no,
                        format!("vertex line has {} coordinates, expected 3", fields.len() - 1),
                    ));
                }
                positions.push(parse_vec3(&fields[1..4], line_no)?);
                assigned.push(None);
            }
            "vn" => {
                if fields.len() != 4 {
                    return Err(malformed(
                        line_no,
                        format!("normal line has {} components, expected 3", fields.len() - 1),
                    ));
                }
                normals.push(parse_vec3(&fields[1..4], line_no)?);
            }
            "f" => {
                if fields.len() < 4 {
                    return Err(malformed(
                        line_no,
                        format!("face line has {} references, expected at least 3", fields.len() - 1),
                    ));
                }
                let mut face: Vec<usize> = Vec::with_capacity(fields.len() - 1);
                for field in &fields[1..] {
                    let (pi, ni) = parse_face_ref(field, positions.len(), normals.len(), line_no)?;
                    if let Some(ni) = ni {
                        assigned[pi] = Some(normals[ni]);
                    }
                    face.push(pi);
                }
                // Fan decomposition around the first referenced vertex
                for i in 1..face.len() - 1 {
                    indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                }
            }
            // Texture coordinates, groups, materials and smoothing flags
            // are outside this engine's subset
            "vt" | "o" | "g" | "s" | "usemtl" | "mtllib" => {}
            _ => {}
        }
    }

    let had_normals = !normals.is_empty();
    let vertices: Vec<Vertex> = positions
        .iter()
        .zip(&assigned)
        .map(|(&p, n)| Vertex::new(p, n.unwrap_or(Vec3::ZERO)))
        .collect();

    let mut mesh = Mesh::new(vertices, indices)?;
    if !had_normals {
        mesh.compute_normals();
    }
    Ok(mesh)
}

fn malformed(line: usize, message: String) -> ObjError {
    ObjError::Malformed { line, message }
}

fn parse_vec3(fields: &[&str], line_no: usize) -> Result<Vec3, ObjError> {
    let mut comps = [0.0f64; 3];
    for (slot, field) in comps.iter_mut().zip(fields) {
        *slot = field
            .parse()
            .map_err(|_| malformed(line_no, format!("bad number '{}'", field)))?;
    }
    Ok(Vec3::new(comps[0], comps[1], comps[2]))
}

/// Parse one `f` reference into a 0-based position index and optional
/// 0-based normal index.
fn parse_face_ref(
    field: &str,
    num_positions: usize,
    num_normals: usize,
    line_no: usize,
) -> Result<(usize, Option<usize>), ObjError> {
    let mut parts = field.split('/');
    let pos_part = parts.next().unwrap_or("");
    let _tex_part = parts.next();
    let normal_part = parts.next();

    let pi: usize = pos_part
        .parse()
        .map_err(|_| malformed(line_no, format!("bad vertex reference '{}'", field)))?;
    if pi == 0 || pi > num_positions {
        return Err(malformed(
            line_no,
            format!("vertex index {} out of range (1..{})", pi, num_positions),
        ));
    }

    let ni = match normal_part {
        Some(p) if !p.is_empty() => {
            let ni: usize = p
                .parse()
                .map_err(|_| malformed(line_no, format!("bad normal reference '{}'", field)))?;
            if ni == 0 || ni > num_normals {
                return Err(malformed(
                    line_no,
                    format!("normal index {} out of range (1..{})", ni, num_normals),
                ));
            }
            Some(ni - 1)
        }
        _ => None,
    };

    Ok((pi - 1, ni))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_file_loads_as_two_triangles() {
        let text = "\
# a quad split into two triangles
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
f 1 2 3
f 1 3 4
";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.tris().len(), 2);
    }

    #[test]
    fn test_quad_face_fan_triangulated() {
        let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.tris().len(), 2);
        assert_eq!(mesh.tris()[0].indices, [0, 1, 2]);
        assert_eq!(mesh.tris()[1].indices, [0, 2, 3]);
    }

    #[test]
    fn test_missing_normals_are_generated() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";
        let mesh = parse_obj(text).unwrap();
        for v in mesh.vertices() {
            assert!((v.normal.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_explicit_normals_honored() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 1 0
f 1//1 2//1 3//1
";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.vertex(0).normal, Vec3::UNIT_Y);
    }

    #[test]
    fn test_wrong_vertex_field_count_fails() {
        let err = parse_obj("v 1.0 2.0\n").unwrap_err();
        match err {
            ObjError::Malformed { line, .. } => assert_eq!(line, 1),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_face_index_out_of_range_fails() {
        let text = "\
v 0 0 0
v 1 0 0
f 1 2 3
";
        assert!(matches!(
            parse_obj(text).unwrap_err(),
            ObjError::Malformed { line: 3, .. }
        ));
    }

    #[test]
    fn test_short_face_line_fails() {
        let text = "\
v 0 0 0
v 1 0 0
f 1 2
";
        assert!(matches!(parse_obj(text).unwrap_err(), ObjError::Malformed { .. }));
    }
}
