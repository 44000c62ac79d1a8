//! Distance-gated, occlusion-aware sight checks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::physics::{ActorBounds, CollisionWorld};

/// Sight parameters for an observer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perception {
    /// Maximum sight distance
    pub detection_range: f32,
    /// Spacing between occlusion samples along the sight line
    pub sample_spacing: f32,
}

impl Default for Perception {
    fn default() -> Self {
        Self {
            detection_range: 18.0,
            sample_spacing: 0.5,
        }
    }
}

impl Perception {
    #[must_use]
    pub fn new(detection_range: f32) -> Self {
        Self {
            detection_range,
            ..Self::default()
        }
    }

    /// Whether `target` is within detection range of `eye`
    #[must_use]
    pub fn in_range(&self, eye: Vec2, target: Vec2) -> bool {
        eye.distance(target) <= self.detection_range
    }

    /// Whether an observer at `eye` can see `target`.
    ///
    /// The sight line is sampled every `sample_spacing` units; a sample where
    /// an actor of `bounds` would not fit blocks sight.
    #[must_use]
    pub fn can_see(
        &self,
        eye: Vec2,
        target: Vec2,
        world: &CollisionWorld,
        bounds: &ActorBounds,
        boundary: f32,
    ) -> bool {
        if !self.in_range(eye, target) {
            return false;
        }
        line_of_sight(eye, target, self.sample_spacing, |point| {
            world.is_position_valid(point, bounds, boundary)
        })
    }
}

/// Sample interior points of `from`..`to` and require `is_clear` at each.
///
/// The endpoints are not sampled; segments shorter than two spacings have
/// no interior samples and are always clear. A non-positive spacing cannot
/// sample anything and is never clear.
pub fn line_of_sight(
    from: Vec2,
    to: Vec2,
    spacing: f32,
    mut is_clear: impl FnMut(Vec2) -> bool,
) -> bool {
    if spacing.is_nan() || spacing <= 0.0 {
        return false;
    }
    let samples = (from.distance(to) / spacing) as usize;
    (1..samples).all(|i| is_clear(from.lerp(to, i as f32 / samples as f32)))
}
