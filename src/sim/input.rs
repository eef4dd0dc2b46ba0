//! Keyboard edge tracking
//!
//! The shell forwards raw key-down/key-up edges; this tracker turns them
//! into held-direction flags, a rate-limited fire latch, and one-shot
//! start/restart triggers. Once per tick the driver drains it into an
//! immutable `TickInput`, so the simulation itself never sees raw events.

use super::tick::TickInput;
use crate::consts::FIRE_COOLDOWN_MS;
use crate::ticks_from_ms;

/// Logical keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Fire,
    Start,
    Restart,
}

/// Edge-tracked input state
#[derive(Debug, Clone, Default)]
pub struct InputState {
    moving_left: bool,
    moving_right: bool,
    fire_queued: bool,
    fire_cooldown: u32,
    start_queued: bool,
    restart_queued: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key-down edge. A movement key is ignored while the opposite
    /// direction is still held, so mashing both arrows cannot flip the
    /// ship mid-slide.
    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left if !self.moving_right => self.moving_left = true,
            Key::Right if !self.moving_left => self.moving_right = true,
            Key::Fire => self.fire_queued = true,
            Key::Start => self.start_queued = true,
            Key::Restart => self.restart_queued = true,
            _ => {}
        }
    }

    /// Key-up edge clears its movement flag unconditionally
    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.moving_left = false,
            Key::Right => self.moving_right = false,
            _ => {}
        }
    }

    /// Currently held direction flags (for sprite selection)
    pub fn held(&self) -> (bool, bool) {
        (self.moving_left, self.moving_right)
    }

    /// Drain one tick's worth of input. One-shot triggers are consumed;
    /// the fire latch only passes while its cooldown is idle, giving at
    /// most one shot per 100 ms regardless of the host's key-repeat rate.
    pub fn drain_tick(&mut self) -> TickInput {
        if self.fire_cooldown > 0 {
            self.fire_cooldown -= 1;
        }
        let fire = self.fire_queued && self.fire_cooldown == 0;
        if fire {
            self.fire_cooldown = ticks_from_ms(FIRE_COOLDOWN_MS);
        }
        self.fire_queued = false;

        let input = TickInput {
            left: self.moving_left,
            right: self.moving_right,
            fire,
            start: self.start_queued,
            restart: self.restart_queued,
        };
        self.start_queued = false;
        self.restart_queued = false;
        input
    }
}
