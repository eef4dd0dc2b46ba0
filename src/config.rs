//! Game balance and capability flags
//!
//! Every tunable lives here: speeds, spawn cadences, score rates, and which
//! optional systems (enemy fire, particle backdrop) a run carries. Persisted
//! separately from game state in LocalStorage.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ticks_from_ms;

/// How often a periodic spawner fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    /// Period drawn uniformly from `[0, max_ms)` once per run start
    Randomized { max_ms: u32 },
    /// Fixed period
    Fixed { ms: u32 },
}

impl Cadence {
    /// Resolve to a concrete tick period for one run (floored at one tick)
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> u32 {
        match *self {
            Cadence::Randomized { max_ms } => ticks_from_ms(rng.random_range(0..max_ms.max(1))),
            Cadence::Fixed { ms } => ticks_from_ms(ms),
        }
    }
}

/// Per-run tuning, resolved once at every Running entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // === Speeds (pixels per tick) ===
    /// Player horizontal speed
    pub player_speed: f32,
    /// Player bullet speed (upward)
    pub bullet_speed: f32,
    /// Enemy descent speed
    pub enemy_speed: f32,
    /// Enemy bullet speed (downward)
    pub enemy_bullet_speed: f32,
    /// Rock descent speed
    pub rock_speed: f32,

    // === Spawning ===
    /// Enemy spawner cadence
    pub enemy_spawn: Cadence,
    /// Rock spawner cadence
    pub rock_spawn: Cadence,
    /// Interval between shots for each live enemy (ms)
    pub enemy_fire_ms: u32,

    // === Scoring ===
    /// Passive score awarded once per second of play
    pub score_per_second: u64,
    /// Bonus per destroyed enemy
    pub enemy_bounty: u64,

    // === Capabilities ===
    /// Whether enemies return fire
    pub enemy_fire: bool,
    /// Number of backdrop particles (0 disables the field)
    pub particle_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_speed: 10.0,
            bullet_speed: 5.0,
            enemy_speed: 2.0,
            enemy_bullet_speed: 4.0,
            rock_speed: 3.0,

            enemy_spawn: Cadence::Randomized { max_ms: 5000 },
            rock_spawn: Cadence::Randomized { max_ms: 1000 },
            enemy_fire_ms: 4000,

            score_per_second: 10,
            enemy_bounty: 50,

            enemy_fire: true,
            particle_count: 60,
        }
    }
}

impl Config {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "starfall_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Stored config unreadable, using defaults: {e}"),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
