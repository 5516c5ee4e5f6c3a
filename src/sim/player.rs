//! Player controller: movement and rate-limited firing

use glam::Vec2;

use super::state::{Player, Projectile};
use crate::consts::*;

/// Horizontal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Player {
    pub fn new(fire_cooldown_ms: f64) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            projectiles: Vec::new(),
            last_fire_ms: None,
            fire_cooldown_ms,
            fire_held: false,
        }
    }

    /// Leftmost and rightmost x that keep the ship inside the padded playfield
    pub fn x_bounds(&self) -> (f32, f32) {
        (
            PLAYER_PADDING,
            PLAYFIELD_WIDTH - self.size.x - PLAYER_PADDING,
        )
    }

    /// Shift by `speed` in `direction`, clamped to the playfield
    pub fn move_in(&mut self, direction: Direction) {
        let delta = match direction {
            Direction::Left => -self.speed,
            Direction::Right => self.speed,
        };
        let (min_x, max_x) = self.x_bounds();
        self.pos.x = (self.pos.x + delta).clamp(min_x, max_x);
    }

    /// Fresh presses always fire; a held trigger fires once per cooldown
    pub fn can_fire(&self, now_ms: f64) -> bool {
        if !self.fire_held {
            return true;
        }
        match self.last_fire_ms {
            Some(last) => now_ms - last >= self.fire_cooldown_ms,
            None => true,
        }
    }

    /// Spawn a projectile at the ship's nose if allowed. Returns whether a
    /// shot was fired so the caller can cue the sound.
    pub fn fire(&mut self, now_ms: f64) -> bool {
        if !self.can_fire(now_ms) {
            return false;
        }
        let x = self.pos.x + self.size.x / 2.0 - PROJECTILE_WIDTH / 2.0;
        self.projectiles.push(Projectile::new(Vec2::new(x, self.pos.y)));
        self.last_fire_ms = Some(now_ms);
        true
    }

    /// Handle a new press of the fire control: shoot immediately, then treat
    /// the control as held.
    pub fn press_fire(&mut self, now_ms: f64) -> bool {
        self.fire_held = false;
        let fired = self.fire(now_ms);
        self.fire_held = true;
        fired
    }

    pub fn release_fire(&mut self) {
        self.fire_held = false;
    }

    /// Move projectiles and drop the ones past the top edge
    pub fn advance_projectiles(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.advance();
        }
        self.projectiles.retain(|p| !p.is_off_screen());
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}
