//! First-person player controller
//!
//! Tank-style movement: forward/backward along the heading and turning in
//! place. Every move is validated against the collision world before it is
//! committed, so the player can never end up inside a wall.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::physics::{ActorBounds, CollisionWorld};

/// Simulation rate the per-step speeds are expressed in
const REFERENCE_RATE: f32 = 60.0;

/// Tunables for the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Collision radius
    pub radius: f32,
    /// Collision height, centered on the eye
    pub height: f32,
    /// Eye height above the floor
    pub eye_height: f32,
    /// Distance covered per reference step
    pub move_speed: f32,
    /// Degrees turned per reference step
    pub rotation_speed: f32,
    /// Half extent of the square the player may occupy
    pub boundary: f32,
    /// Spawn position (x, z)
    pub spawn: Vec2,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            height: 1.0,
            eye_height: 1.0,
            move_speed: 0.3,
            rotation_speed: 3.5,
            boundary: 10.0,
            spawn: Vec2::ZERO,
        }
    }
}

impl PlayerConfig {
    /// Set the movement speed per reference step
    #[must_use]
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Set the play area half extent
    #[must_use]
    pub fn with_boundary(mut self, boundary: f32) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the spawn position
    #[must_use]
    pub fn with_spawn(mut self, spawn: Vec2) -> Self {
        self.spawn = spawn;
        self
    }

    /// Collision cylinder of the player
    #[must_use]
    pub fn bounds(&self) -> ActorBounds {
        ActorBounds::centered(self.radius, self.eye_height, self.height)
    }
}

/// Logical actions a player can request.
///
/// Decouples whatever produces input (keyboard, replay, script) from the
/// controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum InputAction {
    MoveForward,
    MoveBackward,
    TurnLeft,
    TurnRight,
    /// Start a new round after winning or losing
    Restart,
}

/// Actions held during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub restart: bool,
}

impl PlayerInput {
    /// No actions held
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Build input from a set of held actions
    #[must_use]
    pub fn from_actions(actions: &[InputAction]) -> Self {
        actions.iter().fold(Self::default(), |input, &action| input.with(action))
    }

    /// Add a held action
    #[must_use]
    pub fn with(mut self, action: InputAction) -> Self {
        match action {
            InputAction::MoveForward => self.forward = true,
            InputAction::MoveBackward => self.backward = true,
            InputAction::TurnLeft => self.turn_left = true,
            InputAction::TurnRight => self.turn_right = true,
            InputAction::Restart => self.restart = true,
        }
        self
    }
}

/// The player
#[derive(Debug, Clone)]
pub struct Player {
    config: PlayerConfig,
    position: Vec2,
    /// Heading in degrees; 0 faces +X
    theta: f32,
}

impl Player {
    /// Create a player at the configured spawn
    #[must_use]
    pub fn new(config: PlayerConfig) -> Self {
        let position = config.spawn;
        Self {
            config,
            position,
            theta: 0.0,
        }
    }

    /// Apply one tick of input.
    ///
    /// Turning happens before moving. A move whose destination is blocked or
    /// outside the play area is dropped and the player stays in place.
    pub fn update(&mut self, input: &PlayerInput, delta_time: f32, world: &CollisionWorld) {
        let steps = delta_time * REFERENCE_RATE;

        if input.turn_left {
            self.rotate(-self.config.rotation_speed * steps);
        }
        if input.turn_right {
            self.rotate(self.config.rotation_speed * steps);
        }

        let distance = self.config.move_speed * steps;
        if input.forward {
            self.try_move(self.direction() * distance, world);
        }
        if input.backward {
            self.try_move(-self.direction() * distance, world);
        }
    }

    fn rotate(&mut self, degrees: f32) {
        self.theta = (self.theta + degrees).rem_euclid(360.0);
    }

    /// Move by `delta` if the destination is valid
    pub fn try_move(&mut self, delta: Vec2, world: &CollisionWorld) -> bool {
        let target = self.position + delta;
        let valid = world.is_position_valid(target, &self.config.bounds(), self.config.boundary);
        if valid {
            self.position = target;
        } else {
            log::trace!("Player move to ({:.2}, {:.2}) rejected", target.x, target.y);
        }
        valid
    }

    /// Back to spawn, facing +X
    pub fn reset(&mut self) {
        self.position = self.config.spawn;
        self.theta = 0.0;
    }

    /// Horizontal position (x, z)
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Eye position in world space
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        Vec3::new(self.position.x, self.config.eye_height, self.position.y)
    }

    /// Heading in degrees
    #[must_use]
    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Unit facing direction (x, z)
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.theta.to_radians())
    }

    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }
}
