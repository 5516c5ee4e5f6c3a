//! Per-frame simulation step
//!
//! A frame runs in two halves so the driver can render in between:
//! `update` (input, projectiles, formation, collisions) and the resolution
//! stage (`check_defense_line`, `replace_cleared_wave`).

use super::collision::resolve_collisions;
use super::player::Direction;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::DEFENSE_LINE_Y;
use crate::settings::LifeLossPolicy;

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Fire was pressed since the previous frame
    pub fire_pressed: bool,
    /// Fire is currently held down
    pub fire_held: bool,
}

/// Run one full frame without rendering
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    update(state, input, now_ms);
    check_defense_line(state);
    replace_cleared_wave(state);
}

/// Apply input, move projectiles and the formation, resolve collisions
pub fn update(state: &mut GameState, input: &TickInput, now_ms: f64) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.frame += 1;
    state.breached_this_frame = false;

    if input.move_left {
        state.player.move_in(Direction::Left);
    }
    if input.move_right {
        state.player.move_in(Direction::Right);
    }

    if input.fire_pressed && state.player.press_fire(now_ms) {
        state.events.push(GameEvent::ShotFired);
    }
    if input.fire_held {
        state.player.fire_held = true;
        if state.player.fire(now_ms) {
            state.events.push(GameEvent::ShotFired);
        }
    } else {
        state.player.release_fire();
    }

    state.player.advance_projectiles();
    state.wave.advance();
    resolve_collisions(state);
}

/// Remove enemies that reached the defense line and charge the player.
///
/// Every enemy that crosses costs one life, in formation order. Running out
/// of lives ends the session at once; otherwise the configured
/// `LifeLossPolicy` decides whether the loop pauses after the first breach.
pub fn check_defense_line(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut i = 0;
    while i < state.wave.enemies.len() {
        let enemy = &state.wave.enemies[i];
        if !(enemy.alive && enemy.bottom() >= DEFENSE_LINE_Y) {
            i += 1;
            continue;
        }

        // Each breaching enemy costs its own life
        state.wave.enemies.remove(i);
        state.breached_this_frame = true;
        state.lives = state.lives.saturating_sub(1);

        if state.lives == 0 {
            log::info!("Game over - final score {}", state.score);
            state.phase = GamePhase::GameOver;
            state.player.release_fire();
            state.events.push(GameEvent::GameOver {
                final_score: state.score,
            });
            return;
        }

        log::info!(
            "Defense line breached on wave {} - {} lives left",
            state.wave.number,
            state.lives
        );
        state.events.push(GameEvent::LifeLost {
            lives_remaining: state.lives,
        });
        // The wave is replaced on acknowledge, so the rest of the row is moot
        if state.life_loss_policy == LifeLossPolicy::PauseAndPrompt {
            state.phase = GamePhase::LifeLost;
            return;
        }
    }
}

/// Spawn the next formation once the current one is empty.
///
/// A wave emptied by kills advances the wave number; one emptied by a breach
/// is replayed at the same number.
pub fn replace_cleared_wave(state: &mut GameState) {
    if state.phase != GamePhase::Playing || !state.wave.is_cleared() {
        return;
    }

    let current = state.wave.number;
    if state.breached_this_frame {
        state.spawn_wave(current);
    } else {
        let next = current + 1;
        state.spawn_wave(next);
        state.events.push(GameEvent::WaveCleared { next_wave: next });
    }
}

/// Leave the life-lost prompt: replay the current wave number from the top
pub fn acknowledge_life_lost(state: &mut GameState) {
    if state.phase != GamePhase::LifeLost {
        return;
    }
    let current = state.wave.number;
    state.spawn_wave(current);
    state.player.projectiles.clear();
    state.player.release_fire();
    state.phase = GamePhase::Playing;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::state::{Enemy, EnemyTier};
    use glam::Vec2;

    fn new_state(lives: u32) -> GameState {
        GameState::new(12345, lives, &Settings::default())
    }

    /// Push the formation's first enemy just above the defense line
    fn park_enemy_on_line(state: &mut GameState) {
        state.wave.enemies[0].pos.y = DEFENSE_LINE_Y - ENEMY_HEIGHT;
    }

    #[test]
    fn test_tick_moves_player() {
        let mut state = new_state(1);
        let x = state.player.pos.x;
        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);
        assert_eq!(state.player.pos.x, x - PLAYER_SPEED);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_fire_press_then_hold() {
        let mut state = new_state(1);
        let press = TickInput {
            fire_pressed: true,
            fire_held: true,
            ..Default::default()
        };
        let hold = TickInput {
            fire_held: true,
            ..Default::default()
        };

        tick(&mut state, &press, 0.0);
        assert_eq!(state.drain_events(), vec![GameEvent::ShotFired]);

        // ~60Hz frames: nothing until the cooldown elapses
        tick(&mut state, &hold, 16.0);
        tick(&mut state, &hold, 100.0);
        assert!(state.drain_events().is_empty());
        tick(&mut state, &hold, 200.0);
        assert_eq!(state.drain_events(), vec![GameEvent::ShotFired]);
        assert_eq!(state.player.projectiles.len(), 2);
    }

    #[test]
    fn test_breach_with_one_life_is_game_over() {
        let mut state = new_state(1);
        state.score = 4200;
        park_enemy_on_line(&mut state);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert_eq!(state.score, 4200);
        assert!(
            state
                .events
                .contains(&GameEvent::GameOver { final_score: 4200 })
        );

        // Frozen: further ticks change nothing
        let frame = state.frame;
        tick(&mut state, &TickInput::default(), 16.0);
        assert_eq!(state.frame, frame);
        assert_eq!(state.score, 4200);
    }

    #[test]
    fn test_breach_with_two_lives_pauses_and_resets_wave() {
        let mut state = new_state(2);
        state.spawn_wave(3);
        let enemies_in_wave = state.wave.enemies.len();
        park_enemy_on_line(&mut state);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.phase, GamePhase::LifeLost);
        assert_eq!(state.lives, 1);
        assert!(
            state
                .events
                .contains(&GameEvent::LifeLost { lives_remaining: 1 })
        );

        acknowledge_life_lost(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.wave.number, 3);
        assert_eq!(state.wave.enemies.len(), enemies_in_wave);
        assert_eq!(state.wave.y_offset, 0.0);
        assert_eq!(state.lives, 1);
    }

    #[test]
    fn test_whole_row_breach_pauses_after_first_life() {
        let mut state = new_state(3);
        for enemy in state.wave.enemies.iter_mut().take(12) {
            enemy.pos.y = DEFENSE_LINE_Y;
        }
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::LifeLost);
    }

    #[test]
    fn test_each_breaching_enemy_costs_a_life() {
        let settings = Settings {
            life_loss_policy: LifeLossPolicy::ContinueImmediately,
            ..Settings::default()
        };
        let mut state = GameState::new(1, 3, &settings);
        let count = state.wave.enemies.len();
        for enemy in state.wave.enemies.iter_mut().take(2) {
            enemy.pos.y = DEFENSE_LINE_Y - ENEMY_HEIGHT;
        }

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.lives, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.wave.enemies.len(), count - 2);
        let lost: Vec<_> = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::LifeLost { lives_remaining } => Some(*lives_remaining),
                _ => None,
            })
            .collect();
        assert_eq!(lost, vec![2, 1]);
    }

    #[test]
    fn test_whole_row_breach_can_end_the_game() {
        let settings = Settings {
            life_loss_policy: LifeLossPolicy::ContinueImmediately,
            ..Settings::default()
        };
        let mut state = GameState::new(1, 3, &settings);
        state.score = 250;
        for enemy in state.wave.enemies.iter_mut().take(12) {
            enemy.pos.y = DEFENSE_LINE_Y;
        }

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.events.last(),
            Some(&GameEvent::GameOver { final_score: 250 })
        );
        let lost = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::LifeLost { .. }))
            .count();
        assert_eq!(lost, 2);
    }

    #[test]
    fn test_continue_policy_keeps_playing() {
        let settings = Settings {
            life_loss_policy: LifeLossPolicy::ContinueImmediately,
            ..Settings::default()
        };
        let mut state = GameState::new(1, 2, &settings);
        let count = state.wave.enemies.len();
        park_enemy_on_line(&mut state);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, 1);
        assert_eq!(state.wave.enemies.len(), count - 1);
        assert_eq!(state.wave.number, 1);
    }

    #[test]
    fn test_continue_policy_replays_wave_emptied_by_breach() {
        let settings = Settings {
            life_loss_policy: LifeLossPolicy::ContinueImmediately,
            ..Settings::default()
        };
        let mut state = GameState::new(1, 2, &settings);
        state.wave.enemies.truncate(1);
        park_enemy_on_line(&mut state);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.wave.number, 1);
        assert_eq!(state.wave.enemies.len(), 36);
        assert!(
            !state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::WaveCleared { .. }))
        );
    }

    #[test]
    fn test_clearing_wave_advances() {
        let mut state = new_state(1);
        // Leave a single enemy and line a projectile up with where it will be
        let enemy = Enemy::new(Vec2::new(300.0, 200.0), EnemyTier::Commander, 1.5);
        state.wave.enemies = vec![enemy];
        state.player.projectiles.clear();
        state
            .player
            .projectiles
            .push(crate::sim::Projectile::new(Vec2::new(310.0, 215.0)));

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.score, 600);
        assert_eq!(state.wave.number, 2);
        assert_eq!(state.wave.enemies.len(), 39);
        assert_eq!(state.wave.y_offset, 0.0);
        assert!(
            state
                .events
                .contains(&GameEvent::WaveCleared { next_wave: 2 })
        );
    }

    #[test]
    fn test_idle_state_does_not_step() {
        let mut state = GameState::idle(1);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.frame, 0);
    }
}
