//! Collectible items the player must gather to escape

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Positions known to be reachable and clear of level geometry
pub const SAFE_SPAWN_POSITIONS: [Vec2; 13] = [
    Vec2::new(-7.0, -7.0),
    Vec2::new(6.0, -6.0),
    Vec2::new(-8.0, 8.0),
    Vec2::new(8.0, 8.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(-7.0, 0.0),
    Vec2::new(8.0, 0.0),
    Vec2::new(0.0, -6.0),
    Vec2::new(0.0, 7.0),
    Vec2::new(-5.0, -5.0),
    Vec2::new(5.0, -5.0),
    Vec2::new(-5.0, 5.0),
    Vec2::new(5.0, 5.0),
];

/// Display colors, cycled by item id
const ITEM_COLORS: [Vec3; 6] = [
    Vec3::new(1.0, 0.2, 0.2),
    Vec3::new(0.2, 1.0, 0.2),
    Vec3::new(0.2, 0.2, 1.0),
    Vec3::new(1.0, 1.0, 0.2),
    Vec3::new(1.0, 0.2, 1.0),
    Vec3::new(0.2, 1.0, 1.0),
];

/// Simulation rate the per-step rotation is expressed in
const REFERENCE_RATE: f32 = 60.0;

/// Collectible placement and animation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleConfig {
    /// Items spawned per round, capped at the number of safe positions
    pub count: usize,
    /// Placement seed; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Horizontal distance at which an item is picked up
    pub collection_radius: f32,
    /// Resting height of an item
    pub base_height: f32,
    /// Degrees turned per reference step
    pub rotation_speed: f32,
    /// Bob frequency in radians per second
    pub bob_speed: f32,
    /// Bob amplitude in world units
    pub bob_amplitude: f32,
}

impl Default for CollectibleConfig {
    fn default() -> Self {
        Self {
            count: 3,
            seed: None,
            collection_radius: 1.8,
            base_height: 0.6,
            rotation_speed: 1.5,
            bob_speed: 3.0,
            bob_amplitude: 0.3,
        }
    }
}

impl CollectibleConfig {
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// A single collectible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectibleItem {
    pub id: usize,
    /// Horizontal position (x, z)
    pub position: Vec2,
    pub collected: bool,
    /// Spin around +Y in degrees, in [0, 360)
    pub rotation: f32,
    /// Current vertical bob relative to the resting height
    pub bob_offset: f32,
    base_height: f32,
}

impl CollectibleItem {
    #[must_use]
    pub fn new(id: usize, position: Vec2, base_height: f32) -> Self {
        Self {
            id,
            position,
            collected: false,
            rotation: 0.0,
            bob_offset: 0.0,
            base_height,
        }
    }

    /// World position including the bob
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.base_height + self.bob_offset,
            self.position.y,
        )
    }

    #[must_use]
    pub fn color(&self) -> Vec3 {
        ITEM_COLORS[self.id % ITEM_COLORS.len()]
    }

    fn animate(&mut self, now: f64, degrees: f32, config: &CollectibleConfig) {
        self.rotation = (self.rotation + degrees).rem_euclid(360.0);
        self.bob_offset = (now as f32 * config.bob_speed).sin() * config.bob_amplitude;
    }
}

/// Owns the items of one round
#[derive(Debug, Clone)]
pub struct CollectibleManager {
    config: CollectibleConfig,
    items: Vec<CollectibleItem>,
    rng: StdRng,
}

impl CollectibleManager {
    /// Spawn a round of items
    #[must_use]
    pub fn new(config: CollectibleConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut manager = Self {
            config,
            items: Vec::new(),
            rng,
        };
        manager.spawn_items();
        manager
    }

    fn spawn_items(&mut self) {
        let count = self.config.count.min(SAFE_SPAWN_POSITIONS.len());
        let base_height = self.config.base_height;
        self.items = SAFE_SPAWN_POSITIONS
            .choose_multiple(&mut self.rng, count)
            .enumerate()
            .map(|(id, &position)| CollectibleItem::new(id, position, base_height))
            .collect();

        for item in &self.items {
            log::info!(
                "Item {} spawned at ({}, {})",
                item.id,
                item.position.x,
                item.position.y
            );
        }
    }

    /// Animate items and collect those within reach of `player`.
    ///
    /// Returns the ids collected this tick.
    pub fn update(&mut self, now: f64, delta_time: f32, player: Vec2) -> Vec<usize> {
        let degrees = self.config.rotation_speed * delta_time * REFERENCE_RATE;
        let radius = self.config.collection_radius;
        let mut collected = Vec::new();

        for item in self.items.iter_mut().filter(|item| !item.collected) {
            item.animate(now, degrees, &self.config);
            if item.position.distance(player) < radius {
                item.collected = true;
                collected.push(item.id);
            }
        }
        collected
    }

    /// Whether every item has been picked up
    #[must_use]
    pub fn all_collected(&self) -> bool {
        self.items.iter().all(|item| item.collected)
    }

    #[must_use]
    pub fn collected_count(&self) -> usize {
        self.items.iter().filter(|item| item.collected).count()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.items.len() - self.collected_count()
    }

    /// Closest item still in play
    #[must_use]
    pub fn nearest_uncollected(&self, player: Vec2) -> Option<&CollectibleItem> {
        self.items
            .iter()
            .filter(|item| !item.collected)
            .min_by(|a, b| {
                a.position
                    .distance_squared(player)
                    .total_cmp(&b.position.distance_squared(player))
            })
    }

    /// Start a new round with freshly drawn positions
    pub fn reset(&mut self) {
        self.spawn_items();
    }

    #[must_use]
    pub fn items(&self) -> &[CollectibleItem] {
        &self.items
    }

    #[must_use]
    pub fn config(&self) -> &CollectibleConfig {
        &self.config
    }
}
