//! Shape generation for 2D primitives
//!
//! All coordinates are playfield pixels, origin top-left, y down.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::consts::{DEFENSE_LINE_Y, PLAYFIELD_WIDTH};
use crate::sim::{Enemy, GamePhase, GameState, Player, Projectile};

/// Two triangles covering an axis-aligned rectangle
pub fn quad(pos: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    [
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> [Vertex; 3] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Ship: swept wings, hull and cockpit
pub fn player_ship(player: &Player) -> Vec<Vertex> {
    let Player { pos, size, .. } = *player;
    let mid = pos.x + size.x * 0.5;
    let bottom = pos.y + size.y;

    let mut vertices = Vec::with_capacity(15);
    // Wings
    vertices.extend(triangle(
        Vec2::new(mid, pos.y + size.y * 0.3),
        Vec2::new(pos.x, bottom),
        Vec2::new(pos.x + size.x, bottom),
        colors::PLAYER_HULL,
    ));
    // Hull
    vertices.extend(quad(
        Vec2::new(mid - size.x * 0.1, pos.y),
        Vec2::new(size.x * 0.2, size.y),
        colors::PLAYER_HULL,
    ));
    // Cockpit
    vertices.extend(quad(
        Vec2::new(mid - size.x * 0.05, pos.y + size.y * 0.35),
        Vec2::new(size.x * 0.1, size.y * 0.2),
        colors::PLAYER_COCKPIT,
    ));
    vertices
}

pub fn projectile(p: &Projectile) -> [Vertex; 6] {
    quad(p.pos, p.size, colors::PROJECTILE)
}

/// Body with two eyes; tier picks the colour
pub fn enemy(e: &Enemy) -> Vec<Vertex> {
    let eye = Vec2::splat(e.size.x * 0.15);
    let eye_y = e.pos.y + e.size.y * 0.3;
    let mut vertices = Vec::with_capacity(18);
    vertices.extend(quad(e.pos, e.size, colors::enemy(e.tier)));
    vertices.extend(quad(
        Vec2::new(e.pos.x + e.size.x * 0.2, eye_y),
        eye,
        colors::ENEMY_EYE,
    ));
    vertices.extend(quad(
        Vec2::new(e.pos.x + e.size.x * 0.65, eye_y),
        eye,
        colors::ENEMY_EYE,
    ));
    vertices
}

/// Every triangle for one frame, back to front
pub fn frame_vertices(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    if state.phase == GamePhase::Idle {
        return vertices;
    }

    vertices.extend(quad(
        Vec2::new(0.0, DEFENSE_LINE_Y),
        Vec2::new(PLAYFIELD_WIDTH, 2.0),
        colors::DEFENSE_LINE,
    ));
    for e in state.wave.enemies.iter().filter(|e| e.alive) {
        vertices.extend(enemy(e));
    }
    for p in &state.player.projectiles {
        vertices.extend(projectile(p));
    }
    vertices.extend(player_ship(&state.player));
    vertices
}
