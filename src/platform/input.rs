//! Keyboard input queue
//!
//! Key events arrive between frames; they are recorded here and consumed by
//! the frame step so they never interleave with a simulation update.

use crate::sim::TickInput;

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Fire,
    Mute,
}

impl Key {
    /// Map a `KeyboardEvent.code` value to a game key
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            "Space" => Some(Key::Fire),
            "KeyM" => Some(Key::Mute),
            _ => None,
        }
    }
}

/// Held keys plus edges seen since the last frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    fire_held: bool,
    fire_pressed: bool,
    mute_toggled: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Fire => {
                // Auto-repeat keydowns while held are not fresh presses
                if !self.fire_held {
                    self.fire_pressed = true;
                }
                self.fire_held = true;
            }
            Key::Mute => self.mute_toggled = !self.mute_toggled,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Fire => self.fire_held = false,
            Key::Mute => {}
        }
    }

    /// Drop everything (session restart, tab hidden)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Snapshot for one frame step, consuming the press edges
    pub fn take_frame(&mut self) -> TickInput {
        let input = TickInput {
            move_left: self.left,
            move_right: self.right,
            fire_pressed: self.fire_pressed,
            fire_held: self.fire_held,
        };
        self.fire_pressed = false;
        input
    }

    /// Whether mute was toggled (odd number of presses) since last asked
    pub fn take_mute_toggle(&mut self) -> bool {
        std::mem::take(&mut self.mute_toggled)
    }
}
