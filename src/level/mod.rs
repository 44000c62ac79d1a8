//! Level geometry module
//!
//! Loads level meshes and extracts the static collision faces used by
//! player and monster movement.

mod extract;
mod mesh;
mod obj;

pub use extract::{
    CollisionFace, ExtractionReport, FaceKind, classify_face, extract_collision_faces,
    face_normal,
};
pub use mesh::{LevelMesh, MeshFace};
pub use obj::{LevelError, load_obj, parse_obj};
