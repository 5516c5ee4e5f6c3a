//! WebGPU rendering module
//!
//! Everything is drawn as flat-coloured triangles built on the CPU each frame
//! in playfield coordinates; the pipeline maps them to clip space.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;

use crate::sim::GameState;

/// Draws one frame of the simulation (clears first)
pub trait FrameRenderer {
    fn render(&mut self, state: &GameState);
}

/// Renderer for headless runs and tests
#[derive(Debug, Default)]
pub struct NullRenderer {
    /// Frames requested so far
    pub frames: u64,
}

impl FrameRenderer for NullRenderer {
    fn render(&mut self, _state: &GameState) {
        self.frames += 1;
    }
}

impl FrameRenderer for RenderState {
    fn render(&mut self, state: &GameState) {
        let vertices = shapes::frame_vertices(state);
        match self.draw(&vertices) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.resize(self.size.0, self.size.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of memory!"),
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}
