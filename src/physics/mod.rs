//! Collision module
//!
//! Simplified static collision for walking actors

mod collision;

pub use collision::{ActorBounds, CollisionWorld, face_blocks};
