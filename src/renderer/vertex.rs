//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use crate::sim::EnemyTier;

    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const PLAYER_HULL: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const PLAYER_COCKPIT: [f32; 4] = [0.7, 0.95, 1.0, 1.0];
    pub const PROJECTILE: [f32; 4] = [1.0, 0.95, 0.4, 1.0];
    pub const DEFENSE_LINE: [f32; 4] = [0.8, 0.2, 0.2, 0.35];
    pub const ENEMY_EYE: [f32; 4] = [0.05, 0.0, 0.1, 1.0];

    pub fn enemy(tier: EnemyTier) -> [f32; 4] {
        match tier {
            EnemyTier::Scout => [0.4, 0.7, 1.0, 1.0],
            EnemyTier::Drone => [0.6, 0.2, 0.8, 1.0],
            EnemyTier::Warrior => [1.0, 0.4, 0.2, 1.0],
            EnemyTier::Commander => [0.9, 0.85, 0.3, 1.0],
        }
    }
}
