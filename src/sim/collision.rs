//! Projectile/enemy collision detection and scoring

use super::state::{Enemy, EnemyTier, GameEvent, GameState, Projectile};
use crate::aabb_overlap;

/// Outcome of one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionResult {
    /// Tier and points of each enemy destroyed, in iteration order
    pub kills: Vec<(EnemyTier, u64)>,
    /// Total points awarded
    pub points: u64,
}

impl CollisionResult {
    pub fn is_empty(&self) -> bool {
        self.kills.is_empty()
    }
}

/// Check whether a projectile overlaps an enemy
#[inline]
pub fn projectile_hits(projectile: &Projectile, enemy: &Enemy) -> bool {
    aabb_overlap(projectile.pos, projectile.size, enemy.pos, enemy.size)
}

/// Match projectiles against live enemies, remove each matched pair and award
/// points.
///
/// Enemies are visited in formation order; each enemy takes the first
/// overlapping projectile. A projectile is removed the moment it matches, so
/// it can never kill a second enemy. Killed enemies are pruned from the wave
/// before returning.
pub fn resolve_collisions(state: &mut GameState) -> CollisionResult {
    let mut result = CollisionResult::default();
    let projectiles = &mut state.player.projectiles;

    for enemy in state.wave.enemies.iter_mut().filter(|e| e.alive) {
        if projectiles.is_empty() {
            break;
        }
        if let Some(index) = projectiles.iter().position(|p| projectile_hits(p, enemy)) {
            projectiles.remove(index);
            enemy.alive = false;
            let points = enemy.points();
            result.kills.push((enemy.tier, points));
            result.points += points;
        }
    }

    state.wave.prune_dead();

    for &(tier, points) in &result.kills {
        state.award(points);
        state.events.push(GameEvent::EnemyDestroyed { tier, points });
    }

    result
}
