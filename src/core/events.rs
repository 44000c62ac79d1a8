//! Event Queue System for Decoupled Communication
//!
//! A double-buffered queue of session events. The simulation pushes events
//! while it ticks; consumers (logging, audio, HUD) read them after the next
//! swap, so what they see never depends on where in the tick an event fired.
//!
//! # Example
//!
//! ```ignore
//! // In the session tick
//! events.push(GameEvent::ItemCollected { id: 2, remaining: 1 });
//!
//! // In a consumer, after the frame boundary
//! events.swap();
//! for event in events.iter() {
//!     if let GameEvent::PlayerCaught { .. } = event {
//!         show_game_over();
//!     }
//! }
//! ```

use std::collections::VecDeque;

use glam::Vec3;

use crate::ai::MonsterState;

// ============================================================================
// Event Types
// ============================================================================

/// Things that happened during a session tick.
///
/// The `#[non_exhaustive]` attribute allows adding new variants without
/// breaking downstream code that uses wildcard patterns.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameEvent {
    // -------------------------------------------------------------------------
    // Monster Events
    // -------------------------------------------------------------------------
    /// The monster changed behavior state.
    MonsterStateChanged {
        from: MonsterState,
        to: MonsterState,
        /// Monster position when the change happened
        position: Vec3,
    },

    /// The monster reached the player.
    PlayerCaught {
        /// Monster position at the catch
        position: Vec3,
    },

    // -------------------------------------------------------------------------
    // Collectible Events
    // -------------------------------------------------------------------------
    /// The player picked up an item.
    ItemCollected {
        /// Item identifier
        id: usize,
        /// Items still to collect
        remaining: usize,
    },

    // -------------------------------------------------------------------------
    // Game State Events
    // -------------------------------------------------------------------------
    /// All items were collected.
    GameWon,

    /// The session was restarted.
    GameRestarted,

    /// Game state transition.
    StateChanged {
        /// New state name
        state: &'static str,
    },
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue for frame-consistent event processing.
///
/// Events pushed during tick N are available for reading after the swap
/// that starts tick N+1.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this tick
    pending: VecDeque<GameEvent>,
    /// Events from the previous tick, ready for processing
    processing: VecDeque<GameEvent>,
}

impl EventQueue {
    /// Default initial capacity for event queues.
    const DEFAULT_CAPACITY: usize = 16;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event to be processed after the next swap.
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues.
    ///
    /// Call this once per tick, before the simulation runs. After swapping:
    /// - `iter()` returns events from the previous tick
    /// - `push()` writes to the new pending queue
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous tick.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.processing.iter()
    }

    /// Drain all events from the previous tick.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.processing.drain(..)
    }

    /// Check if there are any events to process.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Get the number of events ready for processing.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Get the number of events pending for the next tick.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clear all events (both pending and processing).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
