//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (queued until the next frame step)
//! - Storage (LocalStorage on web, in-memory elsewhere)
//! - Time and delays for retry backoff

pub mod input;
pub mod storage;
pub mod time;

pub use input::{InputState, Key};
pub use storage::{KeyValueStore, MemoryStore};
pub use time::{Delay, NoDelay, now_ms};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
#[cfg(target_arch = "wasm32")]
pub use time::TimeoutDelay;
