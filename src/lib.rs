//! Hefe Invaders - a wave-based arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (player, waves, collisions, lives)
//! - `game`: Loop driver tying the simulation to UI, storage and audio
//! - `session`: Score tracking, submission and leaderboard view
//! - `leaderboard`: Score service contract and implementations
//! - `wallet`: Chain provider contract, lives shop and prize pool
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction

pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod retry;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;
pub mod validate;
pub mod wallet;

pub use error::{ClientError, ValidationError};
pub use game::Game;
pub use highscores::HighScores;
pub use settings::{ColumnPolicy, LifeLossPolicy, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (canvas pixels, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_START_X: f32 = 400.0;
    pub const PLAYER_START_Y: f32 = 550.0;
    pub const PLAYER_WIDTH: f32 = 80.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    /// Horizontal distance per movement step
    pub const PLAYER_SPEED: f32 = 7.0;
    /// Gap kept between the ship and either playfield edge
    pub const PLAYER_PADDING: f32 = 10.0;
    /// Minimum time between auto-fire shots while fire is held (ms)
    pub const FIRE_COOLDOWN_MS: f64 = 200.0;

    /// Projectiles
    pub const PROJECTILE_WIDTH: f32 = 4.0;
    pub const PROJECTILE_HEIGHT: f32 = 10.0;
    /// Vertical speed per step (negative = upward)
    pub const PROJECTILE_SPEED: f32 = -8.0;

    /// Enemies
    pub const ENEMY_WIDTH: f32 = 30.0;
    pub const ENEMY_HEIGHT: f32 = 25.0;
    pub const FORMATION_LEFT_MARGIN: f32 = 30.0;
    pub const FORMATION_TOP_MARGIN: f32 = 100.0;
    /// Gap kept between the formation and either playfield edge
    pub const FORMATION_PADDING: f32 = 0.0;
    /// Vertical drop applied when the formation reaches an edge
    pub const FORMATION_DESCENT: f32 = 20.0;

    /// An enemy whose bottom edge reaches this y costs the player a life
    pub const DEFENSE_LINE_Y: f32 = PLAYFIELD_HEIGHT - 100.0;

    /// Lives granted when nothing is stored yet
    pub const DEFAULT_STARTING_LIVES: u32 = 1;
}

/// Axis-aligned bounding-box overlap test (edges touching do not overlap)
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

/// Shorten a wallet address for display (`0x1234...abcd`)
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let size = Vec2::new(10.0, 10.0);
        assert!(aabb_overlap(Vec2::ZERO, size, Vec2::new(5.0, 5.0), size));
        // Touching edges are not an overlap
        assert!(!aabb_overlap(Vec2::ZERO, size, Vec2::new(10.0, 0.0), size));
        assert!(!aabb_overlap(Vec2::ZERO, size, Vec2::new(0.0, 20.0), size));
    }

    #[test]
    fn test_short_address() {
        let addr = "0x18cd0B25309Df2e9c207f4417C5eaa7A7eaA19B8";
        assert_eq!(short_address(addr), "0x18cd...19B8");
        assert_eq!(short_address("0xabc"), "0xabc");
    }
}
