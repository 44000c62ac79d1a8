//! Minimal Wavefront OBJ reader
//!
//! Only the statements the collision extractor needs are read: vertex
//! positions (`v`), faces (`f`) and material switches (`usemtl`/`usemat`).
//! Texture coordinates, normals and material libraries are skipped.

use std::fs;
use std::path::Path;

use glam::Vec3;

use super::mesh::{LevelMesh, MeshFace};

/// Parse OBJ source text into a level mesh
///
/// # Errors
///
/// Returns [`LevelError::Parse`] for malformed vertex or face statements
pub fn parse_obj(source: &str) -> Result<LevelMesh, LevelError> {
    let mut mesh = LevelMesh::new();
    let mut material: Option<String> = None;

    for (number, line) in source.lines().enumerate() {
        let line_number = number + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let mut coords = [0.0_f32; 3];
                for coord in &mut coords {
                    let token = tokens
                        .next()
                        .ok_or_else(|| LevelError::parse(line_number, "vertex needs 3 coordinates"))?;
                    *coord = token.parse().map_err(|_| {
                        LevelError::parse(line_number, format!("invalid coordinate '{token}'"))
                    })?;
                }
                mesh.push_vertex(Vec3::from_array(coords));
            }
            "f" => {
                let mut indices = Vec::new();
                for token in tokens {
                    indices.push(resolve_index(token, mesh.vertices.len(), line_number)?);
                }
                mesh.push_face(MeshFace {
                    indices,
                    material: material.clone(),
                });
            }
            "usemtl" | "usemat" => {
                material = tokens.next().map(String::from);
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Read and parse an OBJ file
///
/// # Errors
///
/// Returns [`LevelError::Io`] if the file cannot be read, or
/// [`LevelError::Parse`] if its contents are malformed
pub fn load_obj(path: impl AsRef<Path>) -> Result<LevelMesh, LevelError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| LevelError::Io(e.to_string()))?;
    let mesh = parse_obj(&source)?;
    log::info!(
        "Loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.vertices.len(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Convert a `v`, `v/vt`, `v//vn` or `v/vt/vn` token to a zero-based index
///
/// Positive indices are 1-based; negative indices count back from the most
/// recently declared vertex. Positive indices past the end are kept and
/// dropped later when the face is resolved.
fn resolve_index(token: &str, vertex_count: usize, line: usize) -> Result<usize, LevelError> {
    let position = token.split('/').next().unwrap_or_default();
    let index: i64 = position
        .parse()
        .map_err(|_| LevelError::parse(line, format!("invalid face index '{token}'")))?;

    match index {
        0 => Err(LevelError::parse(line, "face index 0 is not valid")),
        i if i > 0 => Ok((i - 1) as usize),
        i => {
            let back = i.unsigned_abs() as usize;
            vertex_count
                .checked_sub(back)
                .ok_or_else(|| LevelError::parse(line, format!("relative index {i} out of range")))
        }
    }
}

/// Errors that can occur while loading level geometry
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// IO error
    Io(String),
    /// Malformed statement
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },
}

impl LevelError {
    fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Parse { line, message } => write!(f, "Parse error on line {line}: {message}"),
        }
    }
}

impl std::error::Error for LevelError {}
