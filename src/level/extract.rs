//! Collision geometry extraction
//!
//! Level faces are classified by their normal and vertical extent. Walls and
//! obstacles are kept as [`CollisionFace`]s; floors, ceilings and everything
//! else never block movement and are discarded.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::mesh::LevelMesh;

/// Faces whose normal has a vertical component above this are floors or ceilings
const HORIZONTAL_NORMAL_Y: f32 = 0.8;
/// Horizontal faces starting below this height are floors
const FLOOR_MAX_HEIGHT: f32 = 0.5;
/// Minimum horizontal normal magnitude for a vertical surface
const VERTICAL_NORMAL_XZ: f32 = 0.3;
/// Vertical surfaces taller than this are walls, shorter ones obstacles
const WALL_MIN_HEIGHT: f32 = 1.0;

/// Classification of a level face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceKind {
    /// Walkable ground
    Floor,
    /// Overhead surface
    Ceiling,
    /// Tall vertical surface
    Wall,
    /// Short vertical surface (furniture, ledges)
    Obstacle,
    /// Slanted faces that fit no other category
    Other,
}

impl FaceKind {
    /// Whether faces of this kind are kept for collision queries
    #[must_use]
    pub fn blocks_movement(self) -> bool {
        matches!(self, Self::Wall | Self::Obstacle)
    }

    /// Lowercase name for logging
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Ceiling => "ceiling",
            Self::Wall => "wall",
            Self::Obstacle => "obstacle",
            Self::Other => "other",
        }
    }
}

/// Classify a face from its unit normal and vertical extent
#[must_use]
pub fn classify_face(normal: Vec3, min_y: f32, max_y: f32) -> FaceKind {
    if normal.y.abs() > HORIZONTAL_NORMAL_Y {
        return if min_y < FLOOR_MAX_HEIGHT {
            FaceKind::Floor
        } else {
            FaceKind::Ceiling
        };
    }

    let horizontal = (normal.x * normal.x + normal.z * normal.z).sqrt();
    if horizontal > VERTICAL_NORMAL_XZ {
        return if max_y - min_y > WALL_MIN_HEIGHT {
            FaceKind::Wall
        } else {
            FaceKind::Obstacle
        };
    }

    FaceKind::Other
}

/// Unit normal from the first three vertices, or `None` for degenerate faces
#[must_use]
pub fn face_normal(vertices: &[Vec3]) -> Option<Vec3> {
    let [a, b, c, ..] = vertices else {
        return None;
    };
    (*b - *a).cross(*c - *a).try_normalize()
}

/// A static polygon tested by collision and line-of-sight queries.
///
/// The horizontal bounding rectangle is cached at construction so every
/// query is a clamp and a distance.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionFace {
    vertices: Vec<Vec3>,
    normal: Vec3,
    kind: FaceKind,
    min_y: f32,
    max_y: f32,
    /// Horizontal bounds as (x, z)
    min_xz: Vec2,
    max_xz: Vec2,
}

impl CollisionFace {
    /// Build a face from world-space vertices.
    ///
    /// Returns `None` for malformed faces: fewer than three vertices or a
    /// zero-length normal.
    #[must_use]
    pub fn from_vertices(vertices: Vec<Vec3>) -> Option<Self> {
        let normal = face_normal(&vertices)?;

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in &vertices {
            min = min.min(*v);
            max = max.max(*v);
        }

        Some(Self {
            kind: classify_face(normal, min.y, max.y),
            normal,
            min_y: min.y,
            max_y: max.y,
            min_xz: Vec2::new(min.x, min.z),
            max_xz: Vec2::new(max.x, max.z),
            vertices,
        })
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[must_use]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    #[must_use]
    pub fn kind(&self) -> FaceKind {
        self.kind
    }

    #[must_use]
    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    #[must_use]
    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    /// Horizontal bounding rectangle as `(min, max)` in (x, z)
    #[must_use]
    pub fn horizontal_bounds(&self) -> (Vec2, Vec2) {
        (self.min_xz, self.max_xz)
    }

    /// Closest point of the horizontal bounding rectangle to `point`
    #[must_use]
    pub fn closest_horizontal_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min_xz, self.max_xz)
    }
}

/// Per-kind face counts from one extraction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub floors: usize,
    pub ceilings: usize,
    pub walls: usize,
    pub obstacles: usize,
    pub other: usize,
    /// Faces skipped for having too few vertices or no usable normal
    pub malformed: usize,
}

impl ExtractionReport {
    fn record(&mut self, kind: FaceKind) {
        match kind {
            FaceKind::Floor => self.floors += 1,
            FaceKind::Ceiling => self.ceilings += 1,
            FaceKind::Wall => self.walls += 1,
            FaceKind::Obstacle => self.obstacles += 1,
            FaceKind::Other => self.other += 1,
        }
    }

    /// Number of faces kept for collision
    #[must_use]
    pub fn retained(&self) -> usize {
        self.walls + self.obstacles
    }
}

/// Classify every mesh face and keep the ones that block movement
#[must_use]
pub fn extract_collision_faces(mesh: &LevelMesh) -> (Vec<CollisionFace>, ExtractionReport) {
    let mut faces = Vec::new();
    let mut report = ExtractionReport::default();

    for (index, mesh_face) in mesh.faces.iter().enumerate() {
        let vertices = mesh.resolve(mesh_face);
        let vertex_count = vertices.len();

        let Some(face) = CollisionFace::from_vertices(vertices) else {
            log::debug!("Skipping malformed face {index} ({vertex_count} resolvable vertices)");
            report.malformed += 1;
            continue;
        };

        report.record(face.kind());
        if face.kind().blocks_movement() {
            faces.push(face);
        }
    }

    log::info!(
        "Extracted {} collision faces from {} mesh faces ({} walls, {} obstacles, {} malformed)",
        report.retained(),
        mesh.face_count(),
        report.walls,
        report.obstacles,
        report.malformed
    );

    (faces, report)
}
