//! Wave generation and formation movement
//!
//! Each wave is a grid of enemies whose size, density, speed and point value
//! scale with the wave number. The formation marches sideways and drops one
//! step every time it touches a playfield edge.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Enemy, EnemyTier};
use crate::consts::*;
use crate::settings::ColumnPolicy;

/// Difficulty parameters for one wave number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub rows: u32,
    pub columns: u32,
    /// Distance between neighbouring enemies, both axes
    pub spacing: f32,
    /// Horizontal formation speed per step
    pub speed: f32,
    pub points_multiplier: f32,
}

impl WaveParams {
    pub fn for_wave(wave_number: u32, column_policy: ColumnPolicy) -> Self {
        let w = wave_number.max(1);
        let extra_rows = ((w - 1) / 5).min(2);
        let rows = (3 + extra_rows).min(5);
        let columns = column_policy.columns(w);
        let spacing = (50.0 - 2.0 * w as f32).max(40.0);
        let speed = 2.0 + (0.5 * w as f32).min(4.0);
        let points_multiplier = 1.0 + 0.5 * w as f32;
        Self {
            rows,
            columns,
            spacing,
            speed,
            points_multiplier,
        }
    }

    pub fn enemy_count(&self) -> usize {
        (self.rows * self.columns) as usize
    }
}

/// One formation of enemies sharing direction, speed and descent
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    pub number: u32,
    pub enemies: Vec<Enemy>,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    pub speed: f32,
    /// Total descent applied to this formation so far
    pub y_offset: f32,
}

impl Wave {
    /// Lay out a fresh formation for `number`
    pub fn spawn(number: u32, column_policy: ColumnPolicy, rng: &mut Pcg32) -> Self {
        let params = WaveParams::for_wave(number, column_policy);
        let y_offset = 0.0;

        let mut enemies = Vec::with_capacity(params.enemy_count());
        for row in 0..params.rows {
            for col in 0..params.columns {
                let pos = Vec2::new(
                    col as f32 * params.spacing + FORMATION_LEFT_MARGIN,
                    row as f32 * params.spacing + FORMATION_TOP_MARGIN + y_offset,
                );
                let tier = EnemyTier::ALL[rng.random_range(0..EnemyTier::ALL.len())];
                enemies.push(Enemy::new(pos, tier, params.points_multiplier));
            }
        }

        log::info!(
            "Wave {}: {}x{} enemies, spacing {}, speed {}",
            number,
            params.rows,
            params.columns,
            params.spacing,
            params.speed
        );

        Self {
            number,
            enemies,
            direction: 1.0,
            speed: params.speed,
            y_offset,
        }
    }

    /// Allowed x range for an enemy of the given width
    pub fn x_bounds(enemy_width: f32) -> (f32, f32) {
        (
            FORMATION_PADDING,
            PLAYFIELD_WIDTH - enemy_width - FORMATION_PADDING,
        )
    }

    /// March one step. Returns true if the formation hit an edge, reversed
    /// and dropped.
    pub fn advance(&mut self) -> bool {
        let dx = self.speed * self.direction;
        let mut edge_reached = false;
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            enemy.pos.x += dx;
            let (min_x, max_x) = Self::x_bounds(enemy.size.x);
            if enemy.pos.x <= min_x || enemy.pos.x >= max_x {
                edge_reached = true;
            }
        }

        if edge_reached {
            self.direction = -self.direction;
            self.y_offset += FORMATION_DESCENT;
            for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
                enemy.pos.y += FORMATION_DESCENT;
            }
        }
        edge_reached
    }

    /// Drop killed enemies so they no longer count for edge checks
    pub fn prune_dead(&mut self) {
        self.enemies.retain(|e| e.alive);
    }

    pub fn live_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.live_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_first_wave_layout() {
        let wave = Wave::spawn(1, ColumnPolicy::Linear, &mut rng());
        assert_eq!(wave.enemies.len(), 36);
        assert_eq!(wave.speed, 2.5);
        assert_eq!(wave.direction, 1.0);
        assert_eq!(wave.y_offset, 0.0);

        // spacing at wave 1 is 48
        let first = wave.enemies[0];
        assert_eq!(first.pos, Vec2::new(30.0, 100.0));
        let second_row = wave.enemies[12];
        assert_eq!(second_row.pos, Vec2::new(30.0, 148.0));
        assert!(wave.enemies.iter().all(|e| e.points_multiplier == 1.5));
    }

    #[test]
    fn test_second_wave_has_extra_column() {
        let wave = Wave::spawn(2, ColumnPolicy::Linear, &mut rng());
        assert_eq!(wave.enemies.len(), 39);
    }

    #[test]
    fn test_stepped_policy_layout() {
        let wave = Wave::spawn(1, ColumnPolicy::Stepped, &mut rng());
        assert_eq!(wave.enemies.len(), 24);
    }

    #[test]
    fn test_spawn_is_deterministic_per_seed() {
        let a = Wave::spawn(3, ColumnPolicy::Linear, &mut rng());
        let b = Wave::spawn(3, ColumnPolicy::Linear, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn test_advance_without_edge() {
        let mut wave = Wave::spawn(1, ColumnPolicy::Linear, &mut rng());
        let before: Vec<_> = wave.enemies.iter().map(|e| e.pos).collect();
        assert!(!wave.advance());
        for (enemy, old) in wave.enemies.iter().zip(before) {
            assert_eq!(enemy.pos, old + Vec2::new(2.5, 0.0));
        }
    }

    #[test]
    fn test_advance_reverses_and_drops_at_right_edge() {
        let mut wave = Wave::spawn(1, ColumnPolicy::Linear, &mut rng());
        let (_, max_x) = Wave::x_bounds(ENEMY_WIDTH);
        let mut steps = 0;
        while !wave.advance() {
            steps += 1;
            assert!(steps < 1000, "formation never reached the edge");
        }
        let rightmost = wave
            .enemies
            .iter()
            .map(|e| e.pos.x)
            .fold(f32::MIN, f32::max);
        assert!(rightmost >= max_x);
        assert_eq!(wave.direction, -1.0);
        assert_eq!(wave.y_offset, FORMATION_DESCENT);
        assert_eq!(wave.enemies[0].pos.y, 100.0 + FORMATION_DESCENT);

        // Next step moves left without another drop
        let y = wave.enemies[0].pos.y;
        let x = wave.enemies[0].pos.x;
        assert!(!wave.advance());
        assert_eq!(wave.enemies[0].pos.y, y);
        assert_eq!(wave.enemies[0].pos.x, x - 2.5);
    }

    #[test]
    fn test_dead_enemies_do_not_trigger_edges() {
        let mut wave = Wave::spawn(1, ColumnPolicy::Linear, &mut rng());
        let (_, max_x) = Wave::x_bounds(ENEMY_WIDTH);
        // Park one enemy right at the edge, then kill and prune it
        wave.enemies[11].pos.x = max_x - 1.0;
        wave.enemies[11].alive = false;
        wave.prune_dead();
        assert_eq!(wave.enemies.len(), 35);
        assert!(!wave.advance());
        assert_eq!(wave.y_offset, 0.0);
    }

    proptest! {
        #[test]
        fn prop_wave_params_in_range(wave in 1u32..500) {
            let params = WaveParams::for_wave(wave, ColumnPolicy::Linear);
            prop_assert!((3..=5).contains(&params.rows));
            prop_assert!((12..=16).contains(&params.columns));
            prop_assert!(params.spacing >= 40.0);
            prop_assert!(params.speed <= 6.0);
            prop_assert_eq!(params.points_multiplier, 1.0 + 0.5 * wave as f32);
        }

        #[test]
        fn prop_descent_is_uniform_and_monotonic(wave in 1u32..20, steps in 1usize..400) {
            let mut formation = Wave::spawn(wave, ColumnPolicy::Linear, &mut rng());
            for _ in 0..steps {
                let before: Vec<f32> = formation.enemies.iter().map(|e| e.pos.y).collect();
                let dropped = formation.advance();
                for (enemy, y) in formation.enemies.iter().zip(&before) {
                    let expected = if dropped { y + FORMATION_DESCENT } else { *y };
                    prop_assert_eq!(enemy.pos.y, expected);
                }
            }
        }
    }
}
