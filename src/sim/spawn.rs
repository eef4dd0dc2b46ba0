//! Periodic spawners
//!
//! Timers count simulation ticks, never wall clock, so spawning freezes
//! with the rest of the run the instant the phase leaves Running and picks
//! up a fresh phase on every restart.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, GameState, Rock};
use crate::consts::SPAWN_X_MAX;
use crate::ticks_from_ms;

/// Tick-counted periodic trigger
#[derive(Debug, Clone)]
pub struct PeriodicTimer {
    period: u32,
    remaining: u32,
}

impl PeriodicTimer {
    pub fn new(period: u32) -> Self {
        let period = period.max(1);
        Self {
            period,
            remaining: period,
        }
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    /// Count one tick; true each time the period lapses (then rewinds)
    pub fn advance(&mut self) -> bool {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = self.period;
            true
        } else {
            false
        }
    }
}

/// Inject one enemy at a random lateral position on the top edge
pub fn spawn_enemy(state: &mut GameState) {
    let x = state.rng.random_range(0.0..SPAWN_X_MAX);
    let fire_ticks = ticks_from_ms(state.config.enemy_fire_ms);
    state.enemies.push(Enemy::new(Vec2::new(x, 0.0), fire_ticks));
}

/// Inject one rock at a random lateral position on the top edge
pub fn spawn_rock(state: &mut GameState) {
    let x = state.rng.random_range(0.0..SPAWN_X_MAX);
    state.rocks.push(Rock {
        pos: Vec2::new(x, 0.0),
    });
}
