//! Breadth-first pathfinding on a navigation grid
//!
//! Every step (orthogonal or diagonal) costs the same, so the search
//! returns paths that are shortest in cell count.

use std::collections::VecDeque;

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};

use super::grid::{GridCell, NavigationSpace, walkable_neighbors};

/// Default dequeue budget for one search
pub const DEFAULT_MAX_ITERATIONS: usize = 1024;

/// Result of pathfinding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathResult {
    /// Waypoints in world coordinates, excluding the start cell
    pub waypoints: Vec<Vec2>,
    /// Total length along the waypoints
    pub length: f32,
    /// Cells dequeued during the search
    pub iterations: usize,
}

impl PathResult {
    /// Check whether no path was produced
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of waypoints
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    fn not_found(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }
}

/// Find a path from `start` to `goal` with breadth-first search.
///
/// The result is empty when both points share a cell, when the goal is
/// unreachable, or when `max_iterations` dequeues pass without reaching it.
#[must_use]
pub fn find_path<N: NavigationSpace + ?Sized>(
    nav: &N,
    start: Vec2,
    goal: Vec2,
    max_iterations: usize,
) -> PathResult {
    let start_cell = nav.world_to_cell(start);
    let goal_cell = nav.world_to_cell(goal);

    if start_cell == goal_cell {
        return PathResult::default();
    }

    let mut queue: VecDeque<GridCell> = VecDeque::new();
    let mut visited: FxHashSet<GridCell> = FxHashSet::default();
    let mut came_from: FxHashMap<GridCell, GridCell> = FxHashMap::default();

    queue.push_back(start_cell);
    visited.insert(start_cell);

    let mut iterations = 0;
    while iterations < max_iterations {
        let Some(current) = queue.pop_front() else {
            break;
        };
        iterations += 1;

        if current == goal_cell {
            let cells = reconstruct(&came_from, goal_cell);
            let waypoints: Vec<Vec2> = cells.iter().map(|&c| nav.cell_to_world(c)).collect();
            let length = calculate_path_length(&waypoints);
            log::trace!(
                "Path {start_cell:?} -> {goal_cell:?}: {} cells after {iterations} dequeues",
                waypoints.len()
            );
            return PathResult {
                waypoints,
                length,
                iterations,
            };
        }

        for neighbor in walkable_neighbors(nav, current) {
            if visited.insert(neighbor) {
                came_from.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    log::trace!("No path {start_cell:?} -> {goal_cell:?} after {iterations} dequeues");
    PathResult::not_found(iterations)
}

/// Walk parent links back from `goal`; the start cell has no parent and is
/// left out
fn reconstruct(came_from: &FxHashMap<GridCell, GridCell>, goal: GridCell) -> Vec<GridCell> {
    let mut cells = vec![goal];
    let mut current = goal;
    while let Some(&previous) = came_from.get(&current) {
        cells.push(previous);
        current = previous;
    }
    // Drop the start cell
    cells.pop();
    cells.reverse();
    cells
}

/// Calculate total path length
fn calculate_path_length(waypoints: &[Vec2]) -> f32 {
    waypoints.windows(2).map(|w| w[0].distance(w[1])).sum()
}
