//! Fixed timestep simulation tick
//!
//! One call advances the whole run by a single 60 Hz step in a fixed
//! order: input application, player movement, spawners, pool advancement,
//! combat resolution, terminal check. The renderer reads the state after
//! the tick returns and never mutates it.

use super::collision::overlaps;
use super::spawn::{spawn_enemy, spawn_rock};
use super::state::{EnemyBullet, GamePhase, GameState};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::ticks_from_ms;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Held-direction flags
    pub left: bool,
    pub right: bool,
    /// Fire a bullet this tick (already rate-limited by the edge tracker)
    pub fire: bool,
    /// Start trigger, honored only in `NotStarted`
    pub start: bool,
    /// Restart trigger, honored only in `Over`
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Outside Running only the phase triggers are live; a tick here is a
    // cheap no-op, so the driver can keep scheduling without guards.
    match state.phase {
        GamePhase::NotStarted => {
            if input.start {
                state.begin_run();
            }
            return;
        }
        GamePhase::Over => {
            if input.restart {
                state.begin_run();
            }
            return;
        }
        GamePhase::Running => {}
    }

    state.time_ticks += 1;

    // Input application
    if input.fire {
        state.fire_bullet();
    }

    // Player movement
    state.player.step(input.left, input.right);

    // Spawners and the passive score drip
    if state.timers.enemy_spawn.advance() {
        spawn_enemy(state);
    }
    if state.timers.rock_spawn.advance() {
        spawn_rock(state);
    }
    if state.timers.score_tick.advance() {
        state.score += state.config.score_per_second;
    }
    if state.config.enemy_fire {
        advance_enemy_fire(state);
    }

    advance_pools(state);
    resolve_combat(state);
}

/// Count down each enemy's fire timer; a lapse fires one bullet from the
/// enemy's own position and rearms the interval.
fn advance_enemy_fire(state: &mut GameState) {
    let interval = ticks_from_ms(state.config.enemy_fire_ms);
    for enemy in &mut state.enemies {
        enemy.fire_ticks = enemy.fire_ticks.saturating_sub(1);
        if enemy.fire_ticks == 0 {
            enemy.bullets.push(EnemyBullet { pos: enemy.pos });
            enemy.fire_ticks = interval;
        }
    }
}

/// Move every pool by its own stored speed, then prune past the bounds
fn advance_pools(state: &mut GameState) {
    // Player bullets fly upward; a struck bullet (speed 0) stays put while
    // its impact flash runs down, then leaves in the same prune.
    for bullet in &mut state.bullets {
        bullet.pos.y -= bullet.speed;
        bullet.hit_ticks = bullet.hit_ticks.saturating_sub(1);
    }
    state.bullets.retain(|b| b.pos.y > 0.0 && !b.expired());

    let enemy_speed = state.config.enemy_speed;
    let enemy_bullet_speed = state.config.enemy_bullet_speed;
    for enemy in &mut state.enemies {
        enemy.pos.y += enemy_speed;
        for bullet in &mut enemy.bullets {
            bullet.pos.y += enemy_bullet_speed;
        }
        enemy.bullets.retain(|b| b.pos.y < FIELD_HEIGHT);
    }
    // An enemy leaving the bottom takes its sub-pool with it
    state.enemies.retain(|e| e.pos.y < FIELD_HEIGHT);

    let rock_speed = state.config.rock_speed;
    for rock in &mut state.rocks {
        rock.pos.y += rock_speed;
    }
    state.rocks.retain(|r| r.pos.y < FIELD_HEIGHT);

    // Backdrop drifts down and wraps; never collides, never pruned
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        if particle.pos.y >= FIELD_HEIGHT {
            particle.pos.y -= FIELD_HEIGHT;
        }
        if particle.pos.x < 0.0 {
            particle.pos.x += FIELD_WIDTH;
        } else if particle.pos.x >= FIELD_WIDTH {
            particle.pos.x -= FIELD_WIDTH;
        }
    }
}

/// Cross-pool collision pass. Precedence is fixed because each rule
/// mutates pools the later rules consume.
fn resolve_combat(state: &mut GameState) {
    // 1. Player bullets vs enemies: enemy dies, bounty lands, the bullet
    // stops and flashes (it never collides again once stopped).
    for bullet in state.bullets.iter_mut() {
        if !bullet.is_live() {
            continue;
        }
        if let Some(idx) = state
            .enemies
            .iter()
            .position(|e| overlaps(bullet.pos, e.pos))
        {
            state.enemies.swap_remove(idx);
            state.score += state.config.enemy_bounty;
            bullet.strike();
        }
    }

    // 2. Player vs enemies and their bullets: terminal.
    let ship = state.player.pos;
    let rammed = state
        .enemies
        .iter()
        .any(|e| overlaps(ship, e.pos) || e.bullets.iter().any(|b| overlaps(ship, b.pos)));
    if rammed {
        state.game_over();
        return;
    }

    // 3. Player vs rocks: terminal.
    if state.rocks.iter().any(|r| overlaps(ship, r.pos)) {
        state.game_over();
        return;
    }

    // 4. Player bullets vs rocks: the bullet is consumed, the rock survives.
    for bullet in state.bullets.iter_mut() {
        if bullet.is_live() && state.rocks.iter().any(|r| overlaps(bullet.pos, r.pos)) {
            bullet.strike();
        }
    }

    // 5. Enemies vs rocks: both die, and each downed enemy is replaced at
    // once so the enemy population never shrinks through this rule.
    let mut respawns = 0usize;
    let mut i = 0;
    while i < state.enemies.len() {
        let enemy_pos = state.enemies[i].pos;
        if let Some(r) = state.rocks.iter().position(|r| overlaps(enemy_pos, r.pos)) {
            state.rocks.swap_remove(r);
            state.enemies.swap_remove(i);
            respawns += 1;
        } else {
            i += 1;
        }
    }
    for _ in 0..respawns {
        spawn_enemy(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Cadence, Config};
    use crate::consts::*;
    use crate::sim::state::{Bullet, Enemy, Rock};
    use crate::sim::{InputState, Key};
    use glam::Vec2;
    use proptest::prelude::*;

    /// Config with spawners pushed out of the way so tests can stage
    /// pools by hand
    fn quiet_config() -> Config {
        Config {
            enemy_spawn: Cadence::Fixed { ms: 600_000 },
            rock_spawn: Cadence::Fixed { ms: 600_000 },
            enemy_fire: false,
            particle_count: 0,
            ..Config::default()
        }
    }

    fn running_state(config: Config) -> GameState {
        let mut state = GameState::new(12345, config);
        state.begin_run();
        state
    }

    fn hold_right() -> TickInput {
        TickInput {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn start_trigger_is_the_only_way_out_of_not_started() {
        let mut state = GameState::new(1, quiet_config());
        assert_eq!(state.phase, GamePhase::NotStarted);

        // Movement and fire are dead before the run starts
        let busy = TickInput {
            left: true,
            fire: true,
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &busy);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert!(state.bullets.is_empty());
        assert_eq!(state.player.pos.x, PLAYER_SPAWN_X);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn held_right_reaches_the_clamp_exactly() {
        let mut state = running_state(quiet_config());
        assert_eq!(state.player.pos.x, 200.0);
        for _ in 0..16 {
            tick(&mut state, &hold_right());
        }
        // 200 + 16 * 10 == 360, the clamp boundary, not past it
        assert_eq!(state.player.pos.x, PLAYER_MAX_X);
        tick(&mut state, &hold_right());
        assert_eq!(state.player.pos.x, PLAYER_MAX_X);
    }

    #[test]
    fn bullet_kills_enemy_and_flashes_out() {
        let mut state = running_state(quiet_config());
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), 240));
        state
            .bullets
            .push(Bullet::new(Vec2::new(105.0, 130.0), state.config.bullet_speed));

        tick(&mut state, &TickInput::default());
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, state.config.enemy_bounty);
        // The bullet is stopped in place, flashing, no longer live
        assert_eq!(state.bullets.len(), 1);
        assert!(!state.bullets[0].is_live());
        let rest_pos = state.bullets[0].pos;

        // It holds position through the flash and is pruned when it lapses
        for _ in 0..HIT_FLASH_TICKS {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.bullets.is_empty());
        assert_eq!(rest_pos, Vec2::new(105.0, 125.0));
        // No double bounty
        assert_eq!(state.score, state.config.enemy_bounty);
    }

    #[test]
    fn enemy_leaving_the_bottom_is_pruned_without_score() {
        let mut state = running_state(quiet_config());
        state
            .enemies
            .push(Enemy::new(Vec2::new(100.0, FIELD_HEIGHT - 1.0), 240));
        tick(&mut state, &TickInput::default());
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn player_rock_overlap_ends_the_run_exactly_once() {
        let mut state = running_state(quiet_config());
        state.rocks.push(Rock {
            pos: Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y - 10.0),
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Over);

        // The overlap persists; further ticks change nothing
        let score = state.score;
        let rock_pos = state.rocks[0].pos;
        let ticks = state.time_ticks;
        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.score, score);
        assert_eq!(state.rocks[0].pos, rock_pos);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn enemy_bullet_is_terminal_too() {
        let mut state = running_state(quiet_config());
        let mut enemy = Enemy::new(Vec2::new(0.0, 0.0), 240);
        enemy.bullets.push(EnemyBullet {
            pos: Vec2::new(
                PLAYER_SPAWN_X + 5.0,
                PLAYER_SPAWN_Y - state.config.enemy_bullet_speed,
            ),
        });
        state.enemies.push(enemy);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Over);
    }

    #[test]
    fn bullet_is_consumed_by_a_rock_that_survives() {
        let mut state = running_state(quiet_config());
        state.rocks.push(Rock {
            pos: Vec2::new(100.0, 100.0),
        });
        state
            .bullets
            .push(Bullet::new(Vec2::new(105.0, 130.0), state.config.bullet_speed));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.rocks.len(), 1);
        assert!(!state.bullets[0].is_live());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn enemy_rock_collision_replaces_the_enemy() {
        let mut state = running_state(quiet_config());
        state.enemies.push(Enemy::new(Vec2::new(100.0, 300.0), 240));
        state.rocks.push(Rock {
            pos: Vec2::new(110.0, 301.0),
        });
        tick(&mut state, &TickInput::default());
        // Rock gone, enemy population unchanged, replacement on the top edge
        assert!(state.rocks.is_empty());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].pos.y, 0.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn enemy_fire_cadence_and_subpool_ownership() {
        let mut config = quiet_config();
        config.enemy_fire = true;
        config.enemy_fire_ms = 100; // 6 ticks
        let mut state = running_state(config);

        let mut enemy = Enemy::new(Vec2::new(100.0, 50.0), 0);
        enemy.fire_ticks = 3;
        state.enemies.push(enemy);

        for _ in 0..3 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.enemies[0].bullets.len(), 1);
        for _ in 0..6 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.enemies[0].bullets.len(), 2);

        // Killing the enemy drops its bullets with it
        state.bullets.push(Bullet::new(
            state.enemies[0].pos + Vec2::new(5.0, 5.0),
            0.5,
        ));
        tick(&mut state, &TickInput::default());
        assert!(state.enemies.is_empty());
        let orphans: usize = state.enemies.iter().map(|e| e.bullets.len()).sum();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn passive_score_drips_once_per_second() {
        let mut state = running_state(quiet_config());
        for _ in 0..59 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, 0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, state.config.score_per_second);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, 2 * state.config.score_per_second);
    }

    #[test]
    fn restart_only_works_from_over_and_resets_the_run() {
        let mut state = running_state(quiet_config());
        // Restart is ignored while Running
        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Running);

        // Park the ship off-center, then ram it with a rock
        state.player.pos.x = 40.0;
        state.rocks.push(Rock {
            pos: Vec2::new(40.0, PLAYER_SPAWN_Y - 10.0),
        });
        state.score = 370;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Over);

        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert!(state.bullets.is_empty());
        assert!(state.enemies.is_empty());
        assert!(state.rocks.is_empty());
        assert_eq!(state.player.pos, Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y));
    }

    #[test]
    fn same_seed_and_script_replays_identically() {
        let config = Config::default();
        let mut a = GameState::new(99999, config.clone());
        let mut b = GameState::new(99999, config);

        let mut input_a = InputState::new();
        let mut input_b = InputState::new();
        input_a.key_down(Key::Start);
        input_b.key_down(Key::Start);

        for i in 0u32..600 {
            if i % 7 == 0 {
                input_a.key_down(Key::Fire);
                input_b.key_down(Key::Fire);
            }
            if i % 50 == 0 {
                input_a.key_down(Key::Right);
                input_b.key_down(Key::Right);
            }
            if i % 50 == 25 {
                input_a.key_up(Key::Right);
                input_b.key_up(Key::Right);
            }
            let ta = input_a.drain_tick();
            let tb = input_b.drain_tick();
            tick(&mut a, &ta);
            tick(&mut b, &tb);
        }

        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score, b.score);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.bullets.len(), eb.bullets.len());
        }
        assert_eq!(a.rocks.len(), b.rocks.len());
        for (ra, rb) in a.rocks.iter().zip(&b.rocks) {
            assert_eq!(ra.pos, rb.pos);
        }
    }

    proptest! {
        #[test]
        fn player_x_stays_clamped_for_any_flag_script(
            script in prop::collection::vec((any::<bool>(), any::<bool>()), 0..300)
        ) {
            let mut state = running_state(quiet_config());
            for (left, right) in script {
                let input = TickInput { left, right, ..Default::default() };
                tick(&mut state, &input);
                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= PLAYER_MAX_X);
            }
        }

        #[test]
        fn score_never_decreases_while_running(
            script in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 0..300)
        ) {
            // Full default config: spawners and enemy fire all live
            let mut state = running_state(Config::default());
            let mut last_score = state.score;
            for (left, right, fire) in script {
                let input = TickInput { left, right, fire, ..Default::default() };
                tick(&mut state, &input);
                prop_assert!(state.score >= last_score);
                last_score = state.score;
                if state.phase != GamePhase::Running {
                    break;
                }
            }
        }
    }
}
