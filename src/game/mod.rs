//! Game module
//!
//! The player, collectibles, and the session tying them to the monster

mod collectible;
mod player;
mod session;

pub use collectible::{
    CollectibleConfig, CollectibleItem, CollectibleManager, SAFE_SPAWN_POSITIONS,
};
pub use player::{InputAction, Player, PlayerConfig, PlayerInput};
pub use session::{GameSession, GameState};
