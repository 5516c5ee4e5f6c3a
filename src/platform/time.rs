//! Wall-clock time and async delays

use std::cell::Cell;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Suspends the calling task without blocking the frame loop
#[allow(async_fn_in_trait)]
pub trait Delay {
    async fn sleep(&self, ms: u32);
}

/// Returns immediately, remembering how long it was asked to wait
#[derive(Debug, Default)]
pub struct NoDelay {
    requested_ms: Cell<u64>,
}

impl NoDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_requested_ms(&self) -> u64 {
        self.requested_ms.get()
    }
}

impl Delay for NoDelay {
    async fn sleep(&self, ms: u32) {
        self.requested_ms.set(self.requested_ms.get() + u64::from(ms));
    }
}

/// `setTimeout`-backed delay (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutDelay;

#[cfg(target_arch = "wasm32")]
impl Delay for TimeoutDelay {
    async fn sleep(&self, ms: u32) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
            }
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }
}
