//! The hunting monster
//!
//! A three-state machine (patrol, hunting, following a path) driven once per
//! simulation tick. Each [`Monster::update`] runs, in order:
//!
//! 1. perception: can the player be seen, and does the state change?
//! 2. replanning, gated by a fixed interval
//! 3. movement along the active path
//! 4. the catch check
//!
//! Later steps read state written by earlier ones, so the order is fixed.
//!
//! # Example
//!
//! ```ignore
//! let mut monster = Monster::new(Vec2::new(8.0, 8.0), MonsterConfig::default());
//!
//! let tick = monster.update(&AiContext {
//!     world: &world,
//!     player,
//!     delta_time: 1.0 / 60.0,
//!     now,
//! });
//! if tick.caught {
//!     // game over
//! }
//! ```

use std::fmt;

use glam::{Vec2, Vec3};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::grid::{GridCell, LevelNav, NavGrid};
use super::pathfinding::{DEFAULT_MAX_ITERATIONS, find_path};
use super::perception::Perception;
use crate::physics::{ActorBounds, CollisionWorld};

// ============================================================================
// Configuration
// ============================================================================

/// Tunables for a monster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Fixed height of the monster's center above the floor
    pub hover_height: f32,
    /// Collision radius
    pub radius: f32,
    /// Collision height
    pub height: f32,
    /// Movement speed in units per second
    pub speed: f32,
    /// Sight parameters
    pub perception: Perception,
    /// Out-of-sight time after which a hunt is abandoned, in seconds
    pub lost_sight_grace: f32,
    /// A hunt is abandoned at once past `detection_range * lost_range_factor`
    pub lost_range_factor: f32,
    /// Minimum time between path computations, in seconds
    pub replan_interval: f32,
    /// Distance at which a waypoint counts as reached
    pub waypoint_tolerance: f32,
    /// Distance at which a patrol point counts as reached
    pub patrol_tolerance: f32,
    /// The player is caught when closer than this
    pub catch_radius: f32,
    /// Half extent of the square the monster may occupy
    pub boundary: f32,
    /// Dequeue budget per pathfinding call
    pub max_path_iterations: usize,
    /// Grid used for pathfinding
    pub nav_grid: NavGrid,
    /// Patrol route, visited in order and repeated
    pub patrol_points: Vec<Vec2>,
    /// Expose the active path for overlay rendering
    pub debug: bool,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            hover_height: 0.7,
            radius: 0.4,
            height: 1.0,
            // 0.04 units per tick at 60 Hz
            speed: 2.4,
            perception: Perception::default(),
            lost_sight_grace: 2.0,
            lost_range_factor: 1.5,
            replan_interval: 1.0,
            waypoint_tolerance: 0.3,
            patrol_tolerance: 1.0,
            // Monster radius plus half a unit of player buffer
            catch_radius: 0.9,
            boundary: 19.0,
            max_path_iterations: DEFAULT_MAX_ITERATIONS,
            nav_grid: NavGrid::default(),
            patrol_points: vec![
                Vec2::new(8.0, 8.0),
                Vec2::new(8.0, -8.0),
                Vec2::new(-8.0, 8.0),
            ],
            debug: false,
        }
    }
}

impl MonsterConfig {
    /// Set movement speed in units per second
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the patrol route
    #[must_use]
    pub fn with_patrol_points(mut self, points: Vec<Vec2>) -> Self {
        self.patrol_points = points;
        self
    }

    /// Set the replanning interval in seconds
    #[must_use]
    pub fn with_replan_interval(mut self, seconds: f32) -> Self {
        self.replan_interval = seconds;
        self
    }

    /// Set the catch radius
    #[must_use]
    pub fn with_catch_radius(mut self, radius: f32) -> Self {
        self.catch_radius = radius;
        self
    }

    /// Enable or disable debug path exposure
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Collision cylinder of the monster
    #[must_use]
    pub fn bounds(&self) -> ActorBounds {
        ActorBounds::centered(self.radius, self.hover_height, self.height)
    }
}

// ============================================================================
// State
// ============================================================================

/// Behavior state of the monster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterState {
    /// Walking the patrol route
    Patrol,
    /// The player was seen; the next plan targets them
    Hunting,
    /// Executing a computed path
    FollowingPath,
}

impl MonsterState {
    /// State name for debugging and logging
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Patrol => "patrol",
            Self::Hunting => "hunting",
            Self::FollowingPath => "following_path",
        }
    }
}

impl fmt::Display for MonsterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a path was planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathPurpose {
    /// Toward a patrol point
    Patrol,
    /// Toward the player's last known position
    Pursuit,
}

/// A planned path and how far along it the monster is
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePath {
    waypoints: Vec<Vec2>,
    cursor: usize,
    purpose: PathPurpose,
}

impl ActivePath {
    fn new(waypoints: Vec<Vec2>, purpose: PathPurpose) -> Self {
        Self {
            waypoints,
            cursor: 0,
            purpose,
        }
    }

    /// Waypoint currently being walked toward
    #[must_use]
    pub fn current(&self) -> Option<Vec2> {
        self.waypoints.get(self.cursor).copied()
    }

    fn advance(&mut self) {
        self.cursor += 1;
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.waypoints.len()
    }

    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn purpose(&self) -> PathPurpose {
        self.purpose
    }
}

// ============================================================================
// Tick input and output
// ============================================================================

/// Everything the monster reads during one tick
#[derive(Debug, Clone, Copy)]
pub struct AiContext<'a> {
    /// Static level collision
    pub world: &'a CollisionWorld,
    /// Player position (x, z)
    pub player: Vec2,
    /// Seconds since the previous tick
    pub delta_time: f32,
    /// Current timestamp in seconds
    pub now: f64,
}

/// What the monster reports after one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterTick {
    /// World position for rendering
    pub position: Vec3,
    /// Facing angle around +Y in radians; 0 faces +Z
    pub yaw: f32,
    /// State after the tick
    pub state: MonsterState,
    /// The player is within the catch radius
    pub caught: bool,
}

/// Snapshot for debug overlays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterDebugInfo {
    pub position: Vec2,
    pub state: MonsterState,
    pub path_length: usize,
    pub current_waypoint: usize,
    pub patrol_index: usize,
}

/// Active path exposed when debug output is enabled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugPath<'a> {
    pub waypoints: &'a [Vec2],
    pub current: usize,
}

// ============================================================================
// Monster
// ============================================================================

/// The monster agent
#[derive(Debug, Clone)]
pub struct Monster {
    config: MonsterConfig,
    position: Vec2,
    yaw: f32,
    state: MonsterState,
    path: Option<ActivePath>,
    patrol_index: usize,
    last_plan_time: Option<f64>,
    last_seen_time: Option<f64>,
    last_known_player: Option<Vec2>,
    /// Waypoint cells the monster got stuck short of, left out of new plans
    blocked_cells: FxHashSet<GridCell>,
}

impl Monster {
    /// Spawn a monster at `spawn` (x, z)
    #[must_use]
    pub fn new(spawn: Vec2, config: MonsterConfig) -> Self {
        log::info!("Monster spawned at ({}, {})", spawn.x, spawn.y);
        Self {
            config,
            position: spawn,
            yaw: 0.0,
            state: MonsterState::Patrol,
            path: None,
            patrol_index: 0,
            last_plan_time: None,
            last_seen_time: None,
            last_known_player: None,
            blocked_cells: FxHashSet::default(),
        }
    }

    /// Put the monster back at `spawn` with all behavior state cleared
    pub fn reset(&mut self, spawn: Vec2) {
        self.position = spawn;
        self.yaw = 0.0;
        self.state = MonsterState::Patrol;
        self.path = None;
        self.patrol_index = 0;
        self.last_plan_time = None;
        self.last_seen_time = None;
        self.last_known_player = None;
        self.blocked_cells.clear();
        log::debug!("Monster reset to ({}, {})", spawn.x, spawn.y);
    }

    /// Advance the monster by one tick
    pub fn update(&mut self, ctx: &AiContext<'_>) -> MonsterTick {
        let visible = self.can_see(ctx.player, ctx.world);
        self.update_state(ctx, visible);

        if self.replan_due(ctx.now) {
            self.last_plan_time = Some(ctx.now);
            self.replan(ctx);
        }

        self.follow_path(ctx);

        MonsterTick {
            position: self.world_position(),
            yaw: self.yaw,
            state: self.state,
            caught: self.is_catching(ctx.player),
        }
    }

    /// Whether the monster can see a player at `player`
    #[must_use]
    pub fn can_see(&self, player: Vec2, world: &CollisionWorld) -> bool {
        self.config.perception.can_see(
            self.position,
            player,
            world,
            &self.config.bounds(),
            self.config.boundary,
        )
    }

    /// Whether a player at `player` is within the catch radius
    #[must_use]
    pub fn is_catching(&self, player: Vec2) -> bool {
        self.position.distance(player) < self.config.catch_radius
    }

    fn update_state(&mut self, ctx: &AiContext<'_>, visible: bool) {
        if visible {
            self.last_seen_time = Some(ctx.now);
            self.last_known_player = Some(ctx.player);
            if self.state != MonsterState::Hunting {
                self.set_state(MonsterState::Hunting);
            }
            return;
        }

        let pursuing = match self.state {
            MonsterState::Hunting => true,
            MonsterState::FollowingPath => self.path_purpose() == Some(PathPurpose::Pursuit),
            MonsterState::Patrol => false,
        };
        if !pursuing {
            return;
        }

        let unseen_for = self
            .last_seen_time
            .map_or(f64::INFINITY, |seen| ctx.now - seen);
        let too_far = self.position.distance(ctx.player)
            > self.config.perception.detection_range * self.config.lost_range_factor;

        if unseen_for > f64::from(self.config.lost_sight_grace) || too_far {
            log::debug!("Monster lost the player after {unseen_for:.2}s");
            self.set_state(MonsterState::Patrol);
        }
    }

    fn replan_due(&self, now: f64) -> bool {
        self.last_plan_time
            .is_none_or(|last| now - last > f64::from(self.config.replan_interval))
    }

    fn replan(&mut self, ctx: &AiContext<'_>) {
        match self.state {
            MonsterState::Hunting => {
                let Some(target) = self.last_known_player else {
                    return;
                };
                if self.plan_to(ctx.world, target, PathPurpose::Pursuit) {
                    self.set_state(MonsterState::FollowingPath);
                }
            }
            MonsterState::Patrol => {
                let Some(mut target) = self.patrol_target() else {
                    return;
                };
                if self.patrol_point_reached(target) {
                    self.patrol_index = (self.patrol_index + 1) % self.config.patrol_points.len();
                    target = self.config.patrol_points[self.patrol_index];
                    log::debug!("Monster heading to patrol point {}", self.patrol_index);
                }
                if self.plan_to(ctx.world, target, PathPurpose::Patrol) {
                    self.set_state(MonsterState::FollowingPath);
                }
            }
            MonsterState::FollowingPath => {}
        }
    }

    /// Plan toward `target`; an empty result keeps the current path
    fn plan_to(&mut self, world: &CollisionWorld, target: Vec2, purpose: PathPurpose) -> bool {
        let max_iterations = self.config.max_path_iterations;
        let mut result = find_path(&self.nav(world), self.position, target, max_iterations);

        if result.is_empty() && !self.blocked_cells.is_empty() {
            log::debug!(
                "No path around {} blocked cells, forgetting them",
                self.blocked_cells.len()
            );
            self.blocked_cells.clear();
            result = find_path(&self.nav(world), self.position, target, max_iterations);
        }

        if result.is_empty() {
            log::trace!(
                "No {purpose:?} path to ({}, {}) after {} dequeues",
                target.x,
                target.y,
                result.iterations
            );
            return false;
        }

        log::debug!(
            "Planned {purpose:?} path: {} waypoints, {:.1} units",
            result.len(),
            result.length
        );
        self.path = Some(ActivePath::new(result.waypoints, purpose));
        true
    }

    fn follow_path(&mut self, ctx: &AiContext<'_>) {
        let Some(target) = self.path.as_ref().and_then(ActivePath::current) else {
            return;
        };

        let offset = target - self.position;
        let distance = offset.length();

        if distance < self.config.waypoint_tolerance {
            let exhausted = self.path.as_mut().is_some_and(|path| {
                path.advance();
                path.is_exhausted()
            });
            if exhausted {
                self.blocked_cells.clear();
                self.finish_path(ctx.now);
            }
            return;
        }

        let step = (self.config.speed * ctx.delta_time).min(distance);
        let direction = offset / distance;
        self.step_towards(ctx.world, direction * step, ctx.now);
    }

    /// Commit `delta`, sliding along one axis if the full move is blocked
    fn step_towards(&mut self, world: &CollisionWorld, delta: Vec2, now: f64) {
        let candidates = [
            self.position + delta,
            self.position + Vec2::new(delta.x, 0.0),
            self.position + Vec2::new(0.0, delta.y),
        ];

        let bounds = self.config.bounds();
        let next = candidates.into_iter().find(|&candidate| {
            candidate != self.position
                && world.is_position_valid(candidate, &bounds, self.config.boundary)
        });

        match next {
            Some(position) => {
                let moved = position - self.position;
                self.yaw = moved.x.atan2(moved.y);
                self.position = position;
            }
            None => {
                log::debug!(
                    "Monster blocked at ({:.2}, {:.2}), abandoning path",
                    self.position.x,
                    self.position.y
                );
                if let Some(waypoint) = self.path.as_ref().and_then(ActivePath::current) {
                    let cell = self.config.nav_grid.world_to_grid(waypoint);
                    self.blocked_cells.insert(cell);
                }
                self.finish_path(now);
            }
        }
    }

    /// Drop the active path and pick the state that lets the next plan recover
    fn finish_path(&mut self, now: f64) {
        let purpose = self.path.take().map(|path| path.purpose);

        let next = match (self.state, purpose) {
            (MonsterState::FollowingPath, Some(PathPurpose::Pursuit))
                if self.seen_recently(now) =>
            {
                MonsterState::Hunting
            }
            (MonsterState::FollowingPath, _) => MonsterState::Patrol,
            (state, _) => state,
        };
        if next != self.state {
            self.set_state(next);
        }
    }

    fn seen_recently(&self, now: f64) -> bool {
        self.last_seen_time
            .is_some_and(|seen| now - seen <= f64::from(self.config.lost_sight_grace))
    }

    fn patrol_target(&self) -> Option<Vec2> {
        self.config.patrol_points.get(self.patrol_index).copied()
    }

    /// Reached when close to the point, or to where paths toward it end
    fn patrol_point_reached(&self, point: Vec2) -> bool {
        let grid = &self.config.nav_grid;
        let tolerance = self.config.patrol_tolerance;
        grid.same_cell(self.position, point)
            || self.position.distance(point) < tolerance
            || self.position.distance(grid.snap(point)) < tolerance
    }

    fn path_purpose(&self) -> Option<PathPurpose> {
        self.path.as_ref().map(ActivePath::purpose)
    }

    fn nav<'a>(&'a self, world: &'a CollisionWorld) -> LevelNav<'a> {
        LevelNav::new(
            self.config.nav_grid,
            world,
            self.config.bounds(),
            self.config.boundary,
        )
        .with_avoided(&self.blocked_cells)
    }

    fn set_state(&mut self, state: MonsterState) {
        log::debug!("Monster state: {} -> {}", self.state, state);
        self.state = state;
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Horizontal position (x, z)
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position including the fixed hover height
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.position.x, self.config.hover_height, self.position.y)
    }

    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[must_use]
    pub fn state(&self) -> MonsterState {
        self.state
    }

    #[must_use]
    pub fn path(&self) -> Option<&ActivePath> {
        self.path.as_ref()
    }

    #[must_use]
    pub fn patrol_index(&self) -> usize {
        self.patrol_index
    }

    #[must_use]
    pub fn last_known_player(&self) -> Option<Vec2> {
        self.last_known_player
    }

    #[must_use]
    pub fn config(&self) -> &MonsterConfig {
        &self.config
    }

    /// Current state, path progress and patrol progress
    #[must_use]
    pub fn debug_info(&self) -> MonsterDebugInfo {
        MonsterDebugInfo {
            position: self.position,
            state: self.state,
            path_length: self.path.as_ref().map_or(0, |p| p.waypoints.len()),
            current_waypoint: self.path.as_ref().map_or(0, |p| p.cursor),
            patrol_index: self.patrol_index,
        }
    }

    /// The active path, when debug output is enabled
    #[must_use]
    pub fn debug_path(&self) -> Option<DebugPath<'_>> {
        if !self.config.debug {
            return None;
        }
        self.path.as_ref().map(|path| DebugPath {
            waypoints: &path.waypoints,
            current: path.cursor,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::CollisionFace;

    const DT: f32 = 1.0 / 60.0;

    /// Drives a monster with a fixed tick clock
    struct Sim {
        world: CollisionWorld,
        monster: Monster,
        now: f64,
    }

    impl Sim {
        fn new(world: CollisionWorld, spawn: Vec2, config: MonsterConfig) -> Self {
            Self {
                world,
                monster: Monster::new(spawn, config),
                now: 0.0,
            }
        }

        fn tick(&mut self, player: Vec2) -> MonsterTick {
            self.now += f64::from(DT);
            self.monster.update(&AiContext {
                world: &self.world,
                player,
                delta_time: DT,
                now: self.now,
            })
        }

        /// Tick until `done` holds, returning the number of ticks taken
        fn run_until(
            &mut self,
            player: Vec2,
            max_ticks: usize,
            mut done: impl FnMut(&Monster) -> bool,
        ) -> Option<usize> {
            for tick in 1..=max_ticks {
                self.tick(player);
                if done(&self.monster) {
                    return Some(tick);
                }
            }
            None
        }
    }

    fn wall(from: Vec2, to: Vec2) -> CollisionFace {
        CollisionFace::from_vertices(vec![
            Vec3::new(from.x, 0.0, from.y),
            Vec3::new(to.x, 0.0, to.y),
            Vec3::new(to.x, 3.0, to.y),
            Vec3::new(from.x, 3.0, from.y),
        ])
        .unwrap()
    }

    /// Far outside detection range
    const UNSEEN: Vec2 = Vec2::new(100.0, 100.0);

    #[test]
    fn test_initial_state() {
        let monster = Monster::new(Vec2::new(8.0, 8.0), MonsterConfig::default());
        let info = monster.debug_info();

        assert_eq!(monster.state(), MonsterState::Patrol);
        assert_eq!(info.state.name(), "patrol");
        assert_eq!(info.path_length, 0);
        assert_eq!(info.patrol_index, 0);
        assert_eq!(monster.world_position(), Vec3::new(8.0, 0.7, 8.0));
    }

    #[test]
    fn test_first_tick_plans_patrol() {
        let mut sim = Sim::new(
            CollisionWorld::empty(),
            Vec2::new(8.0, 8.0),
            MonsterConfig::default(),
        );

        sim.tick(UNSEEN);

        // Already at the first patrol point, so it heads for the second
        assert_eq!(sim.monster.patrol_index(), 1);
        assert_eq!(sim.monster.state(), MonsterState::FollowingPath);
        let path = sim.monster.path().unwrap();
        assert_eq!(path.purpose(), PathPurpose::Patrol);
        assert_eq!(path.waypoints().last(), Some(&Vec2::new(7.0, -8.0)));
    }

    #[test]
    fn test_patrol_cycle() {
        let mut sim = Sim::new(
            CollisionWorld::empty(),
            Vec2::new(8.0, 8.0),
            MonsterConfig::default(),
        );
        let points = sim.monster.config().patrol_points.clone();
        let grid = sim.monster.config().nav_grid;

        sim.tick(UNSEEN);
        assert_eq!(sim.monster.patrol_index(), 1);

        for expected_next in [2, 0, 1] {
            let current = sim.monster.patrol_index();
            let target = points[current];

            // Walks to the current patrol point
            let reached = sim.run_until(UNSEEN, 60 * 30, |m| {
                m.position().distance(grid.snap(target)) < 0.3
            });
            assert!(reached.is_some(), "never reached patrol point {current}");

            // Then moves on to the next one
            let advanced = sim.run_until(UNSEEN, 60 * 5, |m| m.patrol_index() == expected_next);
            assert!(advanced.is_some(), "never advanced past patrol point {current}");
        }
    }

    #[test]
    fn test_catch_within_radius() {
        let config = MonsterConfig::default().with_catch_radius(0.5);
        let mut sim = Sim::new(CollisionWorld::empty(), Vec2::ZERO, config);

        let tick = sim.tick(Vec2::new(0.2, 0.0));

        assert!(tick.caught);
    }

    #[test]
    fn test_no_catch_outside_radius() {
        let config = MonsterConfig::default().with_catch_radius(0.5);
        let mut sim = Sim::new(CollisionWorld::empty(), Vec2::ZERO, config);

        let tick = sim.tick(Vec2::new(3.0, 0.0));

        assert!(!tick.caught);
    }

    #[test]
    fn test_visible_player_triggers_hunt() {
        let mut sim = Sim::new(
            CollisionWorld::empty(),
            Vec2::ZERO,
            MonsterConfig::default(),
        );
        let player = Vec2::new(6.0, 0.0);

        sim.tick(player);

        // Detected, then planned toward the player in the same tick
        assert_eq!(sim.monster.state(), MonsterState::FollowingPath);
        assert_eq!(sim.monster.last_known_player(), Some(player));
        let path = sim.monster.path().unwrap();
        assert_eq!(path.purpose(), PathPurpose::Pursuit);
        assert_eq!(path.waypoints().last(), Some(&Vec2::new(5.5, -0.5)));

        // Seen again on the next tick: back to hunting intent
        sim.tick(player);
        assert_eq!(sim.monster.state(), MonsterState::Hunting);
    }

    #[test]
    fn test_chase_closes_distance_and_catches() {
        let mut sim = Sim::new(
            CollisionWorld::empty(),
            Vec2::ZERO,
            MonsterConfig::default(),
        );
        // On a cell point, so the end of the path is within reach
        let player = Vec2::new(5.5, 2.5);

        let caught = (0..60 * 10).any(|_| sim.tick(player).caught);

        assert!(caught);
    }

    #[test]
    fn test_lost_and_regained() {
        let world = CollisionWorld::new(vec![wall(Vec2::new(2.0, -6.0), Vec2::new(2.0, 6.0))]);
        let mut sim = Sim::new(world, Vec2::new(6.0, 0.0), MonsterConfig::default());

        // Visible on the near side of the wall
        sim.tick(Vec2::new(6.0, 5.0));
        assert!(matches!(
            sim.monster.state(),
            MonsterState::Hunting | MonsterState::FollowingPath
        ));
        assert_eq!(sim.monster.path().map(ActivePath::purpose), Some(PathPurpose::Pursuit));

        // Hidden behind the wall, but still within the grace period
        let hidden = Vec2::new(-2.0, 0.0);
        for _ in 0..60 {
            sim.tick(hidden);
        }
        assert_ne!(sim.monster.state(), MonsterState::Patrol);

        // Past the grace period
        for _ in 0..(60 * 2) {
            sim.tick(hidden);
        }
        assert_ne!(sim.monster.state(), MonsterState::Hunting);
        assert_ne!(sim.monster.path().map(ActivePath::purpose), Some(PathPurpose::Pursuit));

        // Player steps into view again
        let nearby = sim.monster.position() + Vec2::new(0.0, 2.0);
        sim.tick(nearby);
        assert_ne!(sim.monster.state(), MonsterState::Patrol);
        assert_eq!(sim.monster.last_known_player(), Some(nearby));
    }

    #[test]
    fn test_far_player_ends_hunt_immediately() {
        let mut sim = Sim::new(
            CollisionWorld::empty(),
            Vec2::ZERO,
            MonsterConfig::default(),
        );
        sim.tick(Vec2::new(5.0, 0.0));
        assert_ne!(sim.monster.state(), MonsterState::Patrol);

        // 18 * 1.5 = 27 units away
        sim.tick(Vec2::new(40.0, 0.0));
        assert_eq!(sim.monster.state(), MonsterState::Patrol);
    }

    #[test]
    fn test_enclosed_monster_stays_put() {
        // Walls run through every neighboring cell point
        let spawn = Vec2::new(1.0, 1.0);
        let world = CollisionWorld::new(vec![
            wall(Vec2::new(-0.5, -0.5), Vec2::new(2.5, -0.5)),
            wall(Vec2::new(2.5, -0.5), Vec2::new(2.5, 2.5)),
            wall(Vec2::new(2.5, 2.5), Vec2::new(-0.5, 2.5)),
            wall(Vec2::new(-0.5, 2.5), Vec2::new(-0.5, -0.5)),
        ]);
        let mut sim = Sim::new(world, spawn, MonsterConfig::default());

        for _ in 0..(60 * 3) {
            sim.tick(UNSEEN);
        }

        assert_eq!(sim.monster.position(), spawn);
        assert!(sim.monster.path().is_none());
        assert_eq!(sim.monster.state(), MonsterState::Patrol);
    }

    #[test]
    fn test_empty_plan_keeps_previous_path() {
        let mut sim = Sim::new(
            CollisionWorld::empty(),
            Vec2::new(8.0, 8.0),
            MonsterConfig::default().with_replan_interval(0.0),
        );
        sim.tick(UNSEEN);
        let planned = sim.monster.path().cloned().unwrap();

        // A player standing in the monster's own cell yields an empty plan
        sim.monster.set_state(MonsterState::Hunting);
        sim.monster.last_known_player = Some(sim.monster.position());
        sim.monster.replan(&AiContext {
            world: &sim.world,
            player: UNSEEN,
            delta_time: DT,
            now: sim.now,
        });

        assert_eq!(sim.monster.path().unwrap().waypoints(), planned.waypoints());
        assert_eq!(sim.monster.state(), MonsterState::Hunting);
    }

    #[test]
    fn test_replan_waits_for_interval() {
        let mut sim = Sim::new(
            CollisionWorld::empty(),
            Vec2::ZERO,
            MonsterConfig::default(),
        );
        sim.tick(Vec2::new(6.0, 0.0));
        let first = sim.monster.path().cloned().unwrap();

        // Player moves; within the interval the old path stays
        sim.tick(Vec2::new(0.0, 6.0));
        assert_eq!(sim.monster.path().unwrap().waypoints(), first.waypoints());

        // After the interval a new path toward the new position is installed
        for _ in 0..61 {
            sim.tick(Vec2::new(0.0, 6.0));
        }
        let replanned = sim.monster.path().unwrap();
        assert_ne!(replanned.waypoints(), first.waypoints());
    }

    #[test]
    fn test_path_cursor_only_advances() {
        let mut sim = Sim::new(
            CollisionWorld::empty(),
            Vec2::new(8.0, 8.0),
            MonsterConfig::default(),
        );
        sim.tick(UNSEEN);

        let mut last_cursor = 0;
        for _ in 0..(60 * 3) {
            sim.tick(UNSEEN);
            let Some(path) = sim.monster.path() else {
                break;
            };
            assert!(path.cursor() >= last_cursor);
            last_cursor = path.cursor();
        }
        assert!(last_cursor > 0);
    }

    #[test]
    fn test_never_enters_blocked_position() {
        let world = CollisionWorld::new(vec![
            wall(Vec2::new(-5.0, 2.0), Vec2::new(5.0, 2.0)),
            wall(Vec2::new(3.0, -6.0), Vec2::new(3.0, 0.0)),
        ]);
        let config = MonsterConfig::default();
        let bounds = config.bounds();
        let boundary = config.boundary;
        let mut sim = Sim::new(world, Vec2::new(0.0, -2.0), config);

        for _ in 0..(60 * 20) {
            sim.tick(Vec2::new(0.0, 8.0));
            assert!(
                sim.world
                    .is_position_valid(sim.monster.position(), &bounds, boundary)
            );
        }
    }

    #[test]
    fn test_patrol_routes_around_thin_walls() {
        let world = CollisionWorld::new(vec![
            wall(Vec2::new(-5.0, 2.0), Vec2::new(5.0, 2.0)),
            wall(Vec2::new(3.0, -6.0), Vec2::new(3.0, 0.0)),
        ]);
        let mut sim = Sim::new(world, Vec2::new(0.0, -2.0), MonsterConfig::default());

        // Paths may not cut through the z = 2 wall between cell rows
        sim.tick(UNSEEN);
        let path = sim.monster.path().unwrap();
        let crossing = path.waypoints().windows(2).any(|leg| {
            let (a, b) = (leg[0], leg[1]);
            (a.y < 2.0) != (b.y < 2.0) && a.x.max(b.x) < 5.0 && a.x.min(b.x) > -5.0
        });
        assert!(!crossing);

        // Reaching (8, 8) moves patrol on to the next point
        let ticks = sim.run_until(UNSEEN, 60 * 30, |m| m.patrol_index() == 1);
        assert!(ticks.is_some());
        assert!(sim.monster.position().distance(Vec2::new(7.0, 7.0)) < 1.5);
    }

    #[test]
    fn test_blocked_waypoint_cell_is_avoided() {
        let world = CollisionWorld::new(vec![wall(Vec2::new(-5.0, 2.0), Vec2::new(5.0, 2.0))]);
        let mut sim = Sim::new(world, Vec2::new(2.5, 1.0), MonsterConfig::default());

        // A path straight into the wall
        sim.monster.path = Some(ActivePath::new(
            vec![Vec2::new(2.5, 2.5), Vec2::new(2.5, 4.0)],
            PathPurpose::Patrol,
        ));
        sim.monster.state = MonsterState::FollowingPath;
        sim.monster.last_plan_time = Some(0.0);

        let ticks = sim.run_until(UNSEEN, 120, |m| m.path().is_none());
        assert!(ticks.is_some());
        assert_eq!(sim.monster.state(), MonsterState::Patrol);
        let blocked = NavGrid::default().world_to_grid(Vec2::new(2.5, 2.5));
        assert!(sim.monster.blocked_cells.contains(&blocked));

        // The next plan leaves the blocked cell out
        sim.run_until(UNSEEN, 120, |m| m.path().is_some()).unwrap();
        let path = sim.monster.path().unwrap();
        assert!(
            path.waypoints()
                .iter()
                .all(|&waypoint| NavGrid::default().world_to_grid(waypoint) != blocked)
        );
    }

    #[test]
    fn test_blocked_cells_forgotten_without_alternative() {
        let mut sim = Sim::new(
            CollisionWorld::empty(),
            Vec2::new(0.0, 0.0),
            MonsterConfig::default().with_patrol_points(vec![Vec2::new(5.5, 0.0)]),
        );
        // Remember the only goal cell as blocked
        let goal = NavGrid::default().world_to_grid(Vec2::new(5.5, 0.0));
        sim.monster.blocked_cells.insert(goal);

        sim.tick(UNSEEN);

        assert!(sim.monster.path().is_some());
        assert!(sim.monster.blocked_cells.is_empty());
    }

    #[test]
    fn test_debug_path_requires_flag() {
        let mut plain = Sim::new(
            CollisionWorld::empty(),
            Vec2::new(8.0, 8.0),
            MonsterConfig::default(),
        );
        let mut debug = Sim::new(
            CollisionWorld::empty(),
            Vec2::new(8.0, 8.0),
            MonsterConfig::default().with_debug(true),
        );
        plain.tick(UNSEEN);
        debug.tick(UNSEEN);

        assert!(plain.monster.debug_path().is_none());
        let overlay = debug.monster.debug_path().unwrap();
        assert_eq!(overlay.waypoints.len(), debug.monster.debug_info().path_length);
        assert_eq!(overlay.current, 0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut sim = Sim::new(
            CollisionWorld::empty(),
            Vec2::ZERO,
            MonsterConfig::default(),
        );
        for _ in 0..30 {
            sim.tick(Vec2::new(6.0, 0.0));
        }
        assert!(sim.monster.path().is_some());

        sim.monster.reset(Vec2::new(8.0, 8.0));

        assert_eq!(sim.monster.position(), Vec2::new(8.0, 8.0));
        assert_eq!(sim.monster.state(), MonsterState::Patrol);
        assert!(sim.monster.path().is_none());
        assert_eq!(sim.monster.patrol_index(), 0);
        assert_eq!(sim.monster.last_known_player(), None);
        assert_eq!(sim.monster.yaw(), 0.0);

        // Plans again immediately after a reset
        sim.tick(UNSEEN);
        assert!(sim.monster.path().is_some());
    }

    #[test]
    fn test_yaw_faces_movement() {
        let mut sim = Sim::new(
            CollisionWorld::empty(),
            Vec2::ZERO,
            MonsterConfig::default(),
        );

        // Player straight ahead on +X
        sim.tick(Vec2::new(6.0, 0.1));
        sim.tick(Vec2::new(6.0, 0.1));
        let yaw = sim.monster.yaw();

        assert!(yaw > 0.0 && yaw < std::f32::consts::PI);
    }
}
