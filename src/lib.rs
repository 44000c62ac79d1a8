//! Monster AI and game logic for a backrooms-style horror game
//!
//! This crate provides:
//! - Level loading from OBJ and collision face extraction
//! - 2.5D collision queries for walking actors
//! - Grid navigation with breadth-first pathfinding
//! - Line-of-sight perception and the monster state machine
//! - Player, collectibles and the game session around them

pub mod ai;
pub mod core;
pub mod game;
pub mod level;
pub mod physics;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{AiContext, Monster, MonsterConfig, MonsterState, MonsterTick, NavGrid};
    pub use crate::core::{DebugInfo, EventQueue, GameConfig, GameEvent};
    pub use crate::game::{GameSession, GameState, InputAction, Player, PlayerInput};
    pub use crate::level::{LevelMesh, extract_collision_faces, load_obj};
    pub use crate::physics::{ActorBounds, CollisionWorld};
    pub use glam::{Vec2, Vec3};
}
