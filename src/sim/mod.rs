//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - All pool mutation inside the tick, never in a render path
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::overlaps;
pub use input::{InputState, Key};
pub use spawn::PeriodicTimer;
pub use state::{
    Bullet, Enemy, EnemyBullet, GamePhase, GameState, Particle, Player, PlayerSprite, Rock,
    RngState,
};
pub use tick::{TickInput, tick};
