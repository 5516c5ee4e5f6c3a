//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - One `tick` per display frame; real time only for fire cooldown
//! - Seeded RNG only (enemy tier draws)
//! - Stable iteration order (spawn order)

pub mod collision;
pub mod player;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{CollisionResult, resolve_collisions};
pub use player::Direction;
pub use state::{Enemy, EnemyTier, GameEvent, GamePhase, GameState, Player, Projectile};
pub use tick::{
    TickInput, acknowledge_life_lost, check_defense_line, replace_cleared_wave, tick, update,
};
pub use wave::{Wave, WaveParams};
