//! Game state and core simulation types
//!
//! Everything a run owns lives in `GameState`; pools are replaced wholesale
//! each tick and nothing outside the tick driver holds a reference into them.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::spawn::PeriodicTimer;
use crate::config::Config;
use crate::consts::*;
use crate::ticks_from_ms;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting on the start trigger; nothing moves
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended; pools frozen in place so the final frame stays visible
    Over,
}

/// Sprite variant the renderer should use for the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSprite {
    Idle,
    BankingLeft,
    BankingRight,
    /// Shown after the terminal collision
    Wrecked,
}

/// The player ship
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner of the 40x40 ship box
    pub pos: Vec2,
    /// Horizontal speed in pixels per tick
    pub speed: f32,
}

impl Player {
    pub fn spawn(speed: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
            speed,
        }
    }

    /// Apply one movement tick. Exactly one held direction displaces the
    /// ship; neither or both held leaves it where it is.
    pub fn step(&mut self, left: bool, right: bool) {
        match (left, right) {
            (true, false) => self.pos.x -= self.speed,
            (false, true) => self.pos.x += self.speed,
            _ => return,
        }
        self.pos.x = self.pos.x.clamp(0.0, PLAYER_MAX_X);
    }

    /// Muzzle position for a freshly fired bullet
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + MUZZLE_OFFSET_X, self.pos.y)
    }
}

/// A player-fired bullet
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    /// Upward speed in pixels per tick; 0 once the bullet has struck
    pub speed: f32,
    /// Frames of impact sprite remaining after a confirmed hit
    pub hit_ticks: u32,
}

impl Bullet {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            speed,
            hit_ticks: 0,
        }
    }

    /// Still flying and able to collide
    pub fn is_live(&self) -> bool {
        self.speed > 0.0
    }

    /// Mark a confirmed hit: stop in place and arm the impact flash
    pub fn strike(&mut self) {
        self.speed = 0.0;
        self.hit_ticks = HIT_FLASH_TICKS;
    }

    /// Stopped and done flashing, pending removal
    pub fn expired(&self) -> bool {
        self.speed == 0.0 && self.hit_ticks == 0
    }
}

/// A bullet fired by an enemy, owned by that enemy
#[derive(Debug, Clone)]
pub struct EnemyBullet {
    pub pos: Vec2,
}

/// A descending enemy ship with its own bullet sub-pool
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    /// Bullets this enemy has fired; dropped with the enemy
    pub bullets: Vec<EnemyBullet>,
    /// Ticks until the next shot
    pub fire_ticks: u32,
}

impl Enemy {
    pub fn new(pos: Vec2, fire_interval_ticks: u32) -> Self {
        Self {
            pos,
            bullets: Vec::new(),
            fire_ticks: fire_interval_ticks,
        }
    }
}

/// A descending rock
#[derive(Debug, Clone)]
pub struct Rock {
    pub pos: Vec2,
}

/// A backdrop particle. Purely cosmetic: wraps vertically, never collides,
/// never pruned.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Palette index for the renderer
    pub color: u32,
}

/// Particle palette size (the renderer maps indices to greys/blues)
pub const PARTICLE_COLORS: u32 = 4;

/// RNG state wrapper, kept so a run can be replayed from its seed
#[derive(Debug, Clone, Copy)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Periodic triggers for one run, re-resolved on every Running entry so no
/// interval phase survives a restart
#[derive(Debug, Clone)]
pub struct RunTimers {
    pub enemy_spawn: PeriodicTimer,
    pub rock_spawn: PeriodicTimer,
    pub score_tick: PeriodicTimer,
}

impl RunTimers {
    pub fn resolve(config: &Config, rng: &mut Pcg32) -> Self {
        Self {
            enemy_spawn: PeriodicTimer::new(config.enemy_spawn.resolve(rng)),
            rock_spawn: PeriodicTimer::new(config.rock_spawn.resolve(rng)),
            score_tick: PeriodicTimer::new(ticks_from_ms(1000)),
        }
    }
}

/// Complete game state (deterministic for a given seed + input script)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Tuning resolved for this session
    pub config: Config,
    /// Current phase
    pub phase: GamePhase,
    /// Score for the current run
    pub score: u64,
    /// Ticks elapsed in the current run
    pub time_ticks: u64,
    /// Player ship
    pub player: Player,
    /// Player bullets
    pub bullets: Vec<Bullet>,
    /// Enemies (each owning its bullet sub-pool)
    pub enemies: Vec<Enemy>,
    /// Rocks
    pub rocks: Vec<Rock>,
    /// Backdrop particles
    pub particles: Vec<Particle>,
    /// Periodic triggers, rebuilt at every Running entry
    pub timers: RunTimers,
    /// RNG stream for spawns
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game in `NotStarted` with the given seed
    pub fn new(seed: u64, config: Config) -> Self {
        let mut rng = RngState::new(seed).to_rng();
        let timers = RunTimers::resolve(&config, &mut rng);
        Self {
            seed,
            phase: GamePhase::NotStarted,
            score: 0,
            time_ticks: 0,
            player: Player::spawn(config.player_speed),
            bullets: Vec::new(),
            enemies: Vec::new(),
            rocks: Vec::new(),
            particles: Vec::new(),
            timers,
            rng,
            config,
        }
    }

    /// Enter `Running`: clear the pools, re-center the player, zero the
    /// score, re-resolve every interval. Serves both start and restart.
    pub fn begin_run(&mut self) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.time_ticks = 0;
        self.bullets.clear();
        self.enemies.clear();
        self.rocks.clear();
        self.player = Player::spawn(self.config.player_speed);
        self.timers = RunTimers::resolve(&self.config, &mut self.rng);
        self.spawn_particles();
        log::info!(
            "Run started (enemy period {}t, rock period {}t)",
            self.timers.enemy_spawn.period(),
            self.timers.rock_spawn.period()
        );
    }

    /// Terminal transition. All motion and spawning freeze from the next
    /// tick; pools are left in place for the final frame.
    pub fn game_over(&mut self) {
        self.phase = GamePhase::Over;
        log::info!("Game over at score {}", self.score);
    }

    /// Fire one bullet from the player's muzzle
    pub fn fire_bullet(&mut self) {
        let bullet = Bullet::new(self.player.muzzle(), self.config.bullet_speed);
        self.bullets.push(bullet);
    }

    /// Sprite variant for the ship, from damage and bank direction
    pub fn player_sprite(&self, moving_left: bool, moving_right: bool) -> PlayerSprite {
        if self.phase == GamePhase::Over {
            return PlayerSprite::Wrecked;
        }
        match (moving_left, moving_right) {
            (true, false) => PlayerSprite::BankingLeft,
            (false, true) => PlayerSprite::BankingRight,
            _ => PlayerSprite::Idle,
        }
    }

    /// Rebuild the backdrop particle field; the count is fixed for the run
    fn spawn_particles(&mut self) {
        self.particles.clear();
        self.particles.reserve(self.config.particle_count);
        for _ in 0..self.config.particle_count {
            let pos = Vec2::new(
                self.rng.random_range(0.0..FIELD_WIDTH),
                self.rng.random_range(0.0..FIELD_HEIGHT),
            );
            let vel = Vec2::new(
                self.rng.random_range(-0.2..0.2),
                self.rng.random_range(0.5..2.0),
            );
            let side = self.rng.random_range(1.0..3.0);
            self.particles.push(Particle {
                pos,
                vel,
                size: Vec2::splat(side),
                color: self.rng.random_range(0..PARTICLE_COLORS),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_step_clamps_both_edges() {
        let mut player = Player::spawn(10.0);
        player.pos.x = 5.0;
        player.step(true, false);
        assert_eq!(player.pos.x, 0.0);

        player.pos.x = 355.0;
        player.step(false, true);
        assert_eq!(player.pos.x, PLAYER_MAX_X);
    }

    #[test]
    fn player_step_ignores_conflicting_flags() {
        let mut player = Player::spawn(10.0);
        player.step(true, true);
        assert_eq!(player.pos.x, PLAYER_SPAWN_X);
        player.step(false, false);
        assert_eq!(player.pos.x, PLAYER_SPAWN_X);
    }

    #[test]
    fn bullet_strike_then_expire() {
        let mut bullet = Bullet::new(Vec2::new(100.0, 300.0), 5.0);
        assert!(bullet.is_live());
        bullet.strike();
        assert!(!bullet.is_live());
        assert!(!bullet.expired());
        bullet.hit_ticks = 0;
        assert!(bullet.expired());
    }

    #[test]
    fn begin_run_resets_everything() {
        let mut state = GameState::new(42, Config::default());
        state.begin_run();
        state.score = 500;
        state.player.pos.x = 0.0;
        state.rocks.push(Rock {
            pos: Vec2::new(10.0, 10.0),
        });
        state.fire_bullet();
        state.game_over();

        state.begin_run();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_ticks, 0);
        assert!(state.bullets.is_empty());
        assert!(state.enemies.is_empty());
        assert!(state.rocks.is_empty());
        assert_eq!(state.player.pos, Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y));
        assert_eq!(state.particles.len(), state.config.particle_count);
    }

    #[test]
    fn fire_bullet_spawns_at_muzzle() {
        let mut state = GameState::new(1, Config::default());
        state.begin_run();
        state.fire_bullet();
        assert_eq!(
            state.bullets[0].pos,
            Vec2::new(PLAYER_SPAWN_X + MUZZLE_OFFSET_X, PLAYER_SPAWN_Y)
        );
    }

    #[test]
    fn wrecked_sprite_wins_over_banking() {
        let mut state = GameState::new(1, Config::default());
        state.begin_run();
        assert_eq!(state.player_sprite(true, false), PlayerSprite::BankingLeft);
        state.game_over();
        assert_eq!(state.player_sprite(true, false), PlayerSprite::Wrecked);
    }
}
