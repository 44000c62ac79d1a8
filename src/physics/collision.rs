//! Cylinder-vs-box collision queries against the level's static faces
//!
//! Actors are vertical cylinders. Each face is approximated by its
//! horizontal bounding rectangle, so a query is a vertical overlap test
//! followed by a clamp and a circle test in the (x, z) plane.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::level::{CollisionFace, LevelMesh, extract_collision_faces};

/// Vertical cylinder occupied by an actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorBounds {
    /// Horizontal radius
    pub radius: f32,
    /// Lowest point
    pub min_y: f32,
    /// Highest point
    pub max_y: f32,
}

impl ActorBounds {
    /// Create bounds from explicit extents
    #[must_use]
    pub fn new(radius: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            radius,
            min_y,
            max_y,
        }
    }

    /// Create bounds for a cylinder of `height` centered at `center_y`
    #[must_use]
    pub fn centered(radius: f32, center_y: f32, height: f32) -> Self {
        Self::new(radius, center_y - height / 2.0, center_y + height / 2.0)
    }

    fn overlaps_vertically(&self, face: &CollisionFace) -> bool {
        !(self.max_y < face.min_y() || self.min_y > face.max_y())
    }
}

/// Whether an actor at `position` (x, z) overlaps `face`
#[must_use]
pub fn face_blocks(face: &CollisionFace, position: Vec2, bounds: &ActorBounds) -> bool {
    if !face.kind().blocks_movement() || !bounds.overlaps_vertically(face) {
        return false;
    }
    let closest = face.closest_horizontal_point(position);
    position.distance(closest) < bounds.radius
}

/// The static collision faces of a loaded level
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    faces: Vec<CollisionFace>,
}

impl CollisionWorld {
    /// Create a world from already extracted faces
    #[must_use]
    pub fn new(faces: Vec<CollisionFace>) -> Self {
        Self { faces }
    }

    /// A world with no faces; only boundaries constrain movement
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Extract collision faces from a level mesh
    #[must_use]
    pub fn from_mesh(mesh: &LevelMesh) -> Self {
        let (faces, _report) = extract_collision_faces(mesh);
        Self::new(faces)
    }

    #[must_use]
    pub fn faces(&self) -> &[CollisionFace] {
        &self.faces
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// First face blocking an actor at `position`, if any
    #[must_use]
    pub fn blocking_face(&self, position: Vec2, bounds: &ActorBounds) -> Option<&CollisionFace> {
        self.faces
            .iter()
            .find(|face| face_blocks(face, position, bounds))
    }

    /// Whether any face blocks an actor at `position`
    #[must_use]
    pub fn blocked(&self, position: Vec2, bounds: &ActorBounds) -> bool {
        self.blocking_face(position, bounds).is_some()
    }

    /// Whether `position` is inside the square boundary and unobstructed
    #[must_use]
    pub fn is_position_valid(&self, position: Vec2, bounds: &ActorBounds, boundary: f32) -> bool {
        if position.x.abs() > boundary || position.y.abs() > boundary {
            return false;
        }
        !self.blocked(position, bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Wall on the x = 2 plane spanning z in [-1, 1], y in [0, 3]
    fn wall() -> CollisionFace {
        CollisionFace::from_vertices(vec![
            Vec3::new(2.0, 0.0, -1.0),
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(2.0, 3.0, 1.0),
            Vec3::new(2.0, 3.0, -1.0),
        ])
        .unwrap()
    }

    fn actor() -> ActorBounds {
        ActorBounds::centered(0.5, 1.0, 1.0)
    }

    #[test]
    fn test_centered_bounds() {
        let bounds = ActorBounds::centered(0.4, 0.7, 1.0);
        assert!((bounds.min_y - 0.2).abs() < 1e-6);
        assert!((bounds.max_y - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_blocked_near_wall() {
        let world = CollisionWorld::new(vec![wall()]);

        assert!(world.blocked(Vec2::new(1.7, 0.0), &actor()));
        assert!(!world.blocked(Vec2::new(1.0, 0.0), &actor()));
    }

    #[test]
    fn test_boundary_distance_is_not_blocked() {
        let world = CollisionWorld::new(vec![wall()]);
        let bounds = actor();

        // Exactly one radius away from the clamped point
        assert!(!world.blocked(Vec2::new(1.5, 0.0), &bounds));
        assert!(!world.blocked(Vec2::new(2.0, 1.5), &bounds));
    }

    #[test]
    fn test_blocked_matches_clamped_distance_sweep() {
        let face = wall();
        let world = CollisionWorld::new(vec![face.clone()]);
        let bounds = actor();

        for ix in -8..=8 {
            for iz in -8..=8 {
                let point = Vec2::new(2.0 + ix as f32 * 0.25, iz as f32 * 0.25);
                let expected =
                    point.distance(face.closest_horizontal_point(point)) < bounds.radius;
                assert_eq!(world.blocked(point, &bounds), expected, "at {point}");
            }
        }
    }

    #[test]
    fn test_vertical_separation_rejects() {
        let world = CollisionWorld::new(vec![wall()]);
        let above = ActorBounds::new(0.5, 3.5, 4.5);
        let below = ActorBounds::new(0.5, -2.0, -0.1);

        assert!(!world.blocked(Vec2::new(2.0, 0.0), &above));
        assert!(!world.blocked(Vec2::new(2.0, 0.0), &below));
    }

    #[test]
    fn test_touching_heights_still_overlap() {
        let world = CollisionWorld::new(vec![wall()]);
        let resting_on_top = ActorBounds::new(0.5, 3.0, 4.0);

        assert!(world.blocked(Vec2::new(2.0, 0.0), &resting_on_top));
    }

    #[test]
    fn test_position_valid_respects_boundary() {
        let world = CollisionWorld::empty();
        let bounds = actor();

        assert!(world.is_position_valid(Vec2::new(19.0, -19.0), &bounds, 19.0));
        assert!(!world.is_position_valid(Vec2::new(19.01, 0.0), &bounds, 19.0));
        assert!(!world.is_position_valid(Vec2::new(0.0, -25.0), &bounds, 19.0));
    }

    #[test]
    fn test_from_mesh_ignores_floor() {
        let mut mesh = LevelMesh::new();
        mesh.add_floor(20.0, 0.0);
        let world = CollisionWorld::from_mesh(&mesh);

        assert!(world.is_empty());
        assert!(world.is_position_valid(Vec2::ZERO, &actor(), 19.0));
    }
}
