//! Starfall - a vertical-scroller arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, combat, game state)
//! - `config`: Data-driven game balance and capability flags
//!
//! The browser shell in `main.rs` owns the canvas and keyboard; everything
//! that decides gameplay lives under `sim`.

pub mod config;
pub mod sim;

pub use config::{Cadence, Config};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 700.0;

    /// Sprite bounding boxes (ship, enemy and rock share one footprint)
    pub const SHIP_SIZE: f32 = 40.0;
    pub const BULLET_WIDTH: f32 = 10.0;
    pub const BULLET_HEIGHT: f32 = 20.0;

    /// Player defaults
    pub const PLAYER_SPAWN_X: f32 = 200.0;
    pub const PLAYER_SPAWN_Y: f32 = 650.0;
    /// Rightmost x keeping the 40-wide ship inside the 400-wide field
    pub const PLAYER_MAX_X: f32 = FIELD_WIDTH - SHIP_SIZE;
    /// Offset from the ship's left edge to the bullet muzzle (centers the
    /// 10-wide bullet on the 40-wide ship)
    pub const MUZZLE_OFFSET_X: f32 = 15.0;

    /// Rightmost x for enemy/rock spawns
    pub const SPAWN_X_MAX: f32 = 350.0;

    /// Minimum gap between player shots
    pub const FIRE_COOLDOWN_MS: u32 = 100;

    /// Frames the impact sprite stays visible on a spent bullet
    pub const HIT_FLASH_TICKS: u32 = 6;
}

/// Convert a millisecond interval to whole ticks, never below one tick
#[inline]
pub fn ticks_from_ms(ms: u32) -> u32 {
    let ticks = (ms as f32 / (consts::SIM_DT * 1000.0)).round() as u32;
    ticks.max(1)
}
