//! Debug and statistics module

use std::collections::VecDeque;
use std::time::Duration;

use crate::ai::MonsterDebugInfo;

/// Rolling statistics over simulation step durations
#[derive(Debug)]
pub struct TickStats {
    /// Step time history for averaging
    step_times: VecDeque<Duration>,
    /// Maximum samples to keep
    max_samples: usize,
    /// Average step time in milliseconds
    avg_step_ms: f32,
    /// Minimum step time in milliseconds
    min_step_ms: f32,
    /// Maximum step time in milliseconds
    max_step_ms: f32,
    /// Total ticks simulated
    total_ticks: u64,
}

impl TickStats {
    /// Create a new tick stats tracker
    pub fn new() -> Self {
        Self::with_samples(120)
    }

    /// Create a tracker averaging over `max_samples` ticks
    pub fn with_samples(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            step_times: VecDeque::with_capacity(max_samples),
            max_samples,
            avg_step_ms: 0.0,
            min_step_ms: 0.0,
            max_step_ms: 0.0,
            total_ticks: 0,
        }
    }

    /// Record how long one simulation step took
    pub fn record_tick(&mut self, elapsed: Duration) {
        self.total_ticks += 1;

        if self.step_times.len() >= self.max_samples {
            self.step_times.pop_front();
        }
        self.step_times.push_back(elapsed);

        self.update_stats();
    }

    fn update_stats(&mut self) {
        if self.step_times.is_empty() {
            return;
        }

        let mut total = Duration::ZERO;
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;

        for &dt in &self.step_times {
            total += dt;
            min = min.min(dt);
            max = max.max(dt);
        }

        let count = self.step_times.len() as f32;
        self.avg_step_ms = total.as_secs_f32() / count * 1000.0;
        self.min_step_ms = min.as_secs_f32() * 1000.0;
        self.max_step_ms = max.as_secs_f32() * 1000.0;
    }

    /// Get average step time in milliseconds
    pub fn avg_step_ms(&self) -> f32 {
        self.avg_step_ms
    }

    /// Get minimum step time in milliseconds
    pub fn min_step_ms(&self) -> f32 {
        self.min_step_ms
    }

    /// Get maximum step time in milliseconds
    pub fn max_step_ms(&self) -> f32 {
        self.max_step_ms
    }

    /// Get total ticks simulated
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Get a formatted stats string
    pub fn format_stats(&self) -> String {
        format!(
            "Ticks: {} | Step: {:.3}ms (min: {:.3}, max: {:.3})",
            self.total_ticks, self.avg_step_ms, self.min_step_ms, self.max_step_ms
        )
    }
}

impl Default for TickStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a monster snapshot as a single overlay line
pub fn format_monster(info: &MonsterDebugInfo) -> String {
    format!(
        "Monster: {} at ({:.2}, {:.2}) | path {}/{} | patrol #{}",
        info.state,
        info.position.x,
        info.position.y,
        info.current_waypoint,
        info.path_length,
        info.patrol_index
    )
}

/// Debug overlay information
#[derive(Debug, Default)]
pub struct DebugInfo {
    /// Whether debug lines should be shown
    pub enabled: bool,
    /// Tick statistics
    pub tick_stats: TickStats,
    /// Latest monster snapshot
    monster: Option<MonsterDebugInfo>,
    /// Custom debug lines
    custom_lines: Vec<String>,
}

impl DebugInfo {
    /// Create new debug info
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest monster snapshot
    pub fn set_monster(&mut self, info: MonsterDebugInfo) {
        self.monster = Some(info);
    }

    /// Add a custom debug line
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.custom_lines.push(line.into());
    }

    /// Clear custom lines
    pub fn clear_lines(&mut self) {
        self.custom_lines.clear();
    }

    /// Get all debug lines
    pub fn get_all_lines(&self) -> Vec<String> {
        let mut lines = vec![self.tick_stats.format_stats()];
        lines.extend(self.monster.as_ref().map(format_monster));
        lines.extend(self.custom_lines.iter().cloned());
        lines
    }

    /// Record a tick
    pub fn record_tick(&mut self, elapsed: Duration) {
        self.tick_stats.record_tick(elapsed);
    }
}
