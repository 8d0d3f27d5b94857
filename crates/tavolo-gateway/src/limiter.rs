// SPDX-FileCopyrightText: 2026 Tavolo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rolling-window request throttle.
//!
//! The upstream model API grants a fixed number of requests per cooldown
//! window. `RateLimiter` tracks one shared window and makes callers wait
//! instead of fail once the budget is spent: a blocked caller sleeps out
//! the remainder of the window, then takes the first slot of the fresh one.

use std::time::Duration;

use metrics::counter;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::warn;

/// Shared rolling-window throttle for upstream model calls.
///
/// The window state lives behind a `tokio::sync::Mutex` that is held across
/// the reset sleep, so blocked callers queue in arrival order instead of
/// stampeding the fresh window.
pub struct RateLimiter {
    max_requests: u32,
    cooldown: Duration,
    state: Mutex<WindowState>,
}

struct WindowState {
    /// Slots claimed in the current window.
    count: u32,
    /// When the current window opened.
    window_start: Instant,
}

impl RateLimiter {
    /// Create a limiter admitting `max_requests` per `cooldown` window.
    pub fn new(max_requests: u32, cooldown: Duration) -> Self {
        Self {
            // Zero would never admit a caller.
            max_requests: max_requests.max(1),
            cooldown,
            state: Mutex::new(WindowState {
                count: 0,
                window_start: Instant::now(),
            }),
        }
    }

    /// Wait until the current window has a free slot, then claim it.
    ///
    /// Returns immediately while the window has budget left. A window older
    /// than the cooldown is reset on arrival. Once the budget is spent the
    /// caller sleeps until the window rolls over and claims the first slot
    /// of the new window.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        if now.duration_since(state.window_start) >= self.cooldown {
            state.count = 0;
            state.window_start = now;
        }

        if state.count >= self.max_requests {
            let elapsed = now.duration_since(state.window_start);
            let wait = self.cooldown.saturating_sub(elapsed);
            warn!(
                wait_ms = wait.as_millis() as u64,
                max_requests = self.max_requests,
                "request budget exhausted, waiting for window reset"
            );
            counter!("tavolo_throttle_waits_total").increment(1);
            sleep(wait).await;
            state.count = 0;
            state.window_start = Instant::now();
        }

        state.count += 1;
    }

    /// Number of slots claimed in the current window.
    pub async fn window_count(&self) -> u32 {
        self.state.lock().await.count
    }
}
