//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::wave::Wave;
use crate::consts::*;
use crate::settings::{ColumnPolicy, LifeLossPolicy, Settings};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No session running (start screen)
    Idle,
    /// Active gameplay, loop scheduled every frame
    Playing,
    /// Loop paused after a breach; waiting for the player to continue
    LifeLost,
    /// Run ended, score frozen
    GameOver,
}

/// Things that happened during a tick, for audio/UI/persistence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ShotFired,
    EnemyDestroyed { tier: EnemyTier, points: u64 },
    WaveCleared { next_wave: u32 },
    LifeLost { lives_remaining: u32 },
    GameOver { final_score: u64 },
}

/// A projectile fired by the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical speed per step (negative = upward)
    pub speed: f32,
}

impl Projectile {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            speed: PROJECTILE_SPEED,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }

    /// Fully above the top of the playfield
    pub fn is_off_screen(&self) -> bool {
        self.pos.y + self.size.y < 0.0
    }
}

/// Enemy tiers (sprite and point value)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyTier {
    Scout = 1,
    Drone = 2,
    Warrior = 3,
    Commander = 4,
}

impl EnemyTier {
    pub const ALL: [EnemyTier; 4] = [
        EnemyTier::Scout,
        EnemyTier::Drone,
        EnemyTier::Warrior,
        EnemyTier::Commander,
    ];

    /// 1-based tier number
    pub fn level(self) -> u32 {
        self as u32
    }
}

/// A single enemy in a wave formation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub tier: EnemyTier,
    /// Score multiplier derived from the wave number
    pub points_multiplier: f32,
    pub alive: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, tier: EnemyTier, points_multiplier: f32) -> Self {
        Self {
            pos,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            tier,
            points_multiplier,
            alive: true,
        }
    }

    /// floor(tier * 100 * multiplier)
    pub fn points(&self) -> u64 {
        (self.tier.level() as f64 * 100.0 * self.points_multiplier as f64).floor() as u64
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal distance per movement step
    pub speed: f32,
    /// Live projectiles in firing order
    pub projectiles: Vec<Projectile>,
    /// Timestamp of the last shot (ms), None before the first shot
    pub last_fire_ms: Option<f64>,
    pub fire_cooldown_ms: f64,
    /// Fire control currently held down
    pub fire_held: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(FIRE_COOLDOWN_MS)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub player: Player,
    pub wave: Wave,
    pub column_policy: ColumnPolicy,
    pub life_loss_policy: LifeLossPolicy,
    /// Frames stepped this session
    pub frame: u64,
    /// Events produced by the last tick, drained by the driver
    pub events: Vec<GameEvent>,
    /// Enemies breached the defense line during the current tick
    pub(crate) breached_this_frame: bool,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Fresh session state: wave 1 spawned, phase `Playing`
    pub fn new(seed: u64, lives: u32, settings: &Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let wave = Wave::spawn(1, settings.column_policy, &mut rng);
        Self {
            seed,
            phase: GamePhase::Playing,
            score: 0,
            lives,
            player: Player::new(settings.fire_cooldown_ms),
            wave,
            column_policy: settings.column_policy,
            life_loss_policy: settings.life_loss_policy,
            frame: 0,
            events: Vec::new(),
            breached_this_frame: false,
            rng,
        }
    }

    /// State shown before any session has started
    pub fn idle(seed: u64) -> Self {
        let mut state = Self::new(seed, 0, &Settings::default());
        state.phase = GamePhase::Idle;
        state
    }

    pub fn wave_number(&self) -> u32 {
        self.wave.number
    }

    /// Add points; score only ever grows
    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Replace the current wave with a freshly spawned one
    pub fn spawn_wave(&mut self, wave_number: u32) {
        self.wave = Wave::spawn(wave_number, self.column_policy, &mut self.rng);
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
