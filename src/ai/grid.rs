//! Navigation grid over the level's horizontal plane
//!
//! The grid is never materialized: cells are computed from world
//! coordinates on demand and their walkability is queried lazily against
//! the collision world.

use glam::Vec2;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::perception::line_of_sight;
use crate::physics::{ActorBounds, CollisionWorld};

/// Integer grid coordinates (x, z)
pub type GridCell = (i32, i32);

/// Neighbor offsets in expansion order: orthogonal first, then diagonal
pub const NEIGHBOR_OFFSETS: [GridCell; 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Slack added before flooring so a cell's own world point maps back to it
/// despite rounding in the forward transform
const SNAP_EPSILON: f32 = 1e-4;

/// Sample spacing along a move between two cells. Samples are checked with
/// the actor radius grown by this much, so the whole segment stays clear.
const TRAVERSE_SPACING: f32 = 0.1;

/// A discrete space the pathfinder can search
pub trait NavigationSpace {
    /// Cell containing a world position
    fn world_to_cell(&self, position: Vec2) -> GridCell;

    /// Canonical world position of a cell
    fn cell_to_world(&self, cell: GridCell) -> Vec2;

    /// Whether an agent may stand in a cell
    fn is_walkable(&self, cell: GridCell) -> bool;

    /// Whether an agent may move straight from `from` to the adjacent `to`
    fn can_traverse(&self, _from: GridCell, _to: GridCell) -> bool {
        true
    }
}

/// Walkable, reachable neighbors of `cell` in [`NEIGHBOR_OFFSETS`] order
pub fn walkable_neighbors<N: NavigationSpace + ?Sized>(
    nav: &N,
    cell: GridCell,
) -> SmallVec<[GridCell; 8]> {
    NEIGHBOR_OFFSETS
        .iter()
        .map(|&(dx, dz)| (cell.0 + dx, cell.1 + dz))
        .filter(|&neighbor| nav.is_walkable(neighbor) && nav.can_traverse(cell, neighbor))
        .collect()
}

/// Fixed-resolution mapping between world coordinates and grid cells.
///
/// `grid = floor((world + offset) / cell_size)` and
/// `world = grid * cell_size - offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavGrid {
    /// Cell edge length in world units
    pub cell_size: f32,
    /// Shift applied so the world region maps to non-negative cells
    pub offset: f32,
}

impl Default for NavGrid {
    fn default() -> Self {
        Self {
            cell_size: 1.5,
            offset: 20.0,
        }
    }
}

impl NavGrid {
    /// Create a grid mapping
    #[must_use]
    pub fn new(cell_size: f32, offset: f32) -> Self {
        Self { cell_size, offset }
    }

    /// Convert a world position to grid coordinates
    #[must_use]
    pub fn world_to_grid(&self, position: Vec2) -> GridCell {
        let snap = |v: f32| ((v + self.offset) / self.cell_size + SNAP_EPSILON).floor() as i32;
        (snap(position.x), snap(position.y))
    }

    /// Convert grid coordinates to the cell's canonical world position
    #[must_use]
    pub fn grid_to_world(&self, cell: GridCell) -> Vec2 {
        Vec2::new(
            cell.0 as f32 * self.cell_size - self.offset,
            cell.1 as f32 * self.cell_size - self.offset,
        )
    }

    /// Whether two world positions fall in the same cell
    #[must_use]
    pub fn same_cell(&self, a: Vec2, b: Vec2) -> bool {
        self.world_to_grid(a) == self.world_to_grid(b)
    }

    /// Snap a world position to its cell's canonical position
    #[must_use]
    pub fn snap(&self, position: Vec2) -> Vec2 {
        self.grid_to_world(self.world_to_grid(position))
    }
}

/// A [`NavGrid`] whose cells are walkable when an actor fits at their
/// world position, and whose moves are allowed when the actor fits all the
/// way along the segment between two cell positions
#[derive(Debug, Clone, Copy)]
pub struct LevelNav<'a> {
    grid: NavGrid,
    world: &'a CollisionWorld,
    bounds: ActorBounds,
    boundary: f32,
    avoided: Option<&'a FxHashSet<GridCell>>,
}

impl<'a> LevelNav<'a> {
    #[must_use]
    pub fn new(grid: NavGrid, world: &'a CollisionWorld, bounds: ActorBounds, boundary: f32) -> Self {
        Self {
            grid,
            world,
            bounds,
            boundary,
            avoided: None,
        }
    }

    /// Treat `cells` as unwalkable
    #[must_use]
    pub fn with_avoided(mut self, cells: &'a FxHashSet<GridCell>) -> Self {
        self.avoided = Some(cells);
        self
    }

    #[must_use]
    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }
}

impl NavigationSpace for LevelNav<'_> {
    fn world_to_cell(&self, position: Vec2) -> GridCell {
        self.grid.world_to_grid(position)
    }

    fn cell_to_world(&self, cell: GridCell) -> Vec2 {
        self.grid.grid_to_world(cell)
    }

    fn is_walkable(&self, cell: GridCell) -> bool {
        if self.avoided.is_some_and(|cells| cells.contains(&cell)) {
            return false;
        }
        self.world
            .is_position_valid(self.grid.grid_to_world(cell), &self.bounds, self.boundary)
    }

    fn can_traverse(&self, from: GridCell, to: GridCell) -> bool {
        let clearance = ActorBounds {
            radius: self.bounds.radius + TRAVERSE_SPACING,
            ..self.bounds
        };
        line_of_sight(
            self.grid.grid_to_world(from),
            self.grid.grid_to_world(to),
            TRAVERSE_SPACING,
            |point| self.world.is_position_valid(point, &clearance, self.boundary),
        )
    }
}
