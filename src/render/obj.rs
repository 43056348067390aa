//! Wavefront OBJ import for the decorative centerpiece.
//!
//! Only geometry matters here: `v` and `f` lines are read, everything else
//! (normals, texture coordinates, groups, materials) is skipped. Faces are
//! fan-triangulated.

use glam::Vec3;

use super::scene::Mesh;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ObjError {
    #[error("not UTF-8 text")]
    Encoding,
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("no faces found")]
    Empty,
}

fn parse_error(line_num: usize, message: impl Into<String>) -> ObjError {
    ObjError::Parse {
        line: line_num + 1,
        message: message.into(),
    }
}

pub fn parse_obj_bytes(bytes: &[u8]) -> Result<Mesh, ObjError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ObjError::Encoding)?;
    parse_obj(text)
}

pub fn parse_obj(contents: &str) -> Result<Mesh, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut triangles: Vec<[u32; 3]> = Vec::new();

    for (line_num, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" => {
                if parts.len() < 4 {
                    return Err(parse_error(line_num, "vertex needs 3 coordinates"));
                }
                let mut xyz = [0.0f32; 3];
                for (slot, raw) in xyz.iter_mut().zip(&parts[1..4]) {
                    *slot = raw
                        .parse()
                        .map_err(|_| parse_error(line_num, format!("bad coordinate {:?}", raw)))?;
                }
                positions.push(Vec3::from_array(xyz));
            }
            "f" => {
                if parts.len() < 4 {
                    return Err(parse_error(line_num, "face needs at least 3 vertices"));
                }
                let face = parts[1..]
                    .iter()
                    .map(|p| face_index(p, positions.len(), line_num))
                    .collect::<Result<Vec<u32>, _>>()?;
                for i in 1..face.len() - 1 {
                    triangles.push([face[0], face[i], face[i + 1]]);
                }
            }
            _ => {}
        }
    }

    if triangles.is_empty() {
        return Err(ObjError::Empty);
    }
    Ok(Mesh::new(positions, triangles))
}

/// Position index of one face corner (`a`, `a/b`, `a/b/c`, `a//c`).
/// Negative indices count back from the last vertex read so far.
fn face_index(raw: &str, vertex_count: usize, line_num: usize) -> Result<u32, ObjError> {
    let first = raw.split('/').next().unwrap_or("");
    let index: i64 = first
        .parse()
        .map_err(|_| parse_error(line_num, format!("bad face index {:?}", raw)))?;
    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => Some(vertex_count as i64 + i),
    };
    match resolved {
        Some(i) if i >= 0 && (i as usize) < vertex_count => Ok(i as u32),
        _ => Err(parse_error(
            line_num,
            format!("face index {} out of range ({} vertices)", index, vertex_count),
        )),
    }
}
