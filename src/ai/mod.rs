//! AI and navigation module
//!
//! Provides the navigation grid, breadth-first pathfinding, line-of-sight
//! perception, and the monster state machine built on top of them.

mod grid;
mod monster;
mod pathfinding;
mod perception;

pub use grid::{
    GridCell, LevelNav, NEIGHBOR_OFFSETS, NavGrid, NavigationSpace, walkable_neighbors,
};
pub use monster::{
    ActivePath, AiContext, DebugPath, Monster, MonsterConfig, MonsterDebugInfo, MonsterState,
    MonsterTick, PathPurpose,
};
pub use pathfinding::{DEFAULT_MAX_ITERATIONS, PathResult, find_path};
pub use perception::{Perception, line_of_sight};
