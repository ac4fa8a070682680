//! Outbound rate limiting.
//!
//! # Design
//! A fixed-window counter: at most `max_requests` admissions per
//! `window_ms`. Callers queue on an admission `tokio::sync::Mutex`, whose
//! waiters are woken in the order they queued. When the window is full, the
//! caller at the head of the queue sleeps until the window rolls over while
//! still holding that lock, so admission order always equals arrival order.
//!
//! The window counters and settings live in a separate `std::sync::Mutex`
//! that is only held for a few instructions. `snapshot` and `reconfigure`
//! use it alone and never wait behind the queue; `reconfigure` also wakes
//! the sleeping head so it re-reads the settings.
//!
//! A limiter is an ordinary value. Share it through an `Arc` to make several
//! clients draw from one window; tests simply build their own.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info};

/// Rate limit settings. Disabled unless `enabled` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Admissions allowed per window (default: 100).
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in milliseconds (default: 10000).
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_ms() -> u64 {
    10_000
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_requests: default_max_requests(),
            window_ms: default_window_ms(),
        }
    }
}

impl RateLimitConfig {
    /// Enabled limiter admitting `max_requests` per `window_ms`.
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        Self {
            enabled: true,
            max_requests,
            window_ms,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

#[derive(Debug)]
struct WindowState {
    config: RateLimitConfig,
    window_start: Instant,
    count: u32,
}

/// Point-in-time view of a limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    pub enabled: bool,
    pub count_in_window: u32,
    pub pending: usize,
}

/// FIFO fixed-window admission gate.
#[derive(Debug)]
pub struct RateLimiter {
    admission: Mutex<()>,
    state: StdMutex<WindowState>,
    changed: Notify,
    pending: AtomicUsize,
}

struct PendingGuard<'a>(&'a AtomicUsize);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            admission: Mutex::new(()),
            state: StdMutex::new(WindowState {
                config,
                window_start: Instant::now(),
                count: 0,
            }),
            changed: Notify::new(),
            pending: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, WindowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait until this caller may send a request.
    ///
    /// Returns immediately when limiting is disabled. The caller at the head
    /// of the queue wakes early when the limiter is reconfigured.
    pub async fn acquire(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let _pending = PendingGuard(&self.pending);
        let _turn = self.admission.lock().await;

        loop {
            // Registered before the state check so a reconfigure in between
            // is not missed.
            let changed = self.changed.notified();

            let reopens_at = {
                let mut state = self.state();
                if !state.config.enabled {
                    return;
                }

                let window = state.config.window();
                let now = Instant::now();
                if now.duration_since(state.window_start) >= window {
                    state.window_start = now;
                    state.count = 0;
                }

                if state.count < state.config.max_requests {
                    state.count += 1;
                    debug!(count_in_window = state.count, "Request admitted");
                    return;
                }

                let reopens_at = state.window_start + window;
                debug!(
                    max_requests = state.config.max_requests,
                    wait_ms = reopens_at.saturating_duration_since(now).as_millis() as u64,
                    "Rate limit reached, waiting for next window"
                );
                reopens_at
            };

            // Either the window rolls over or the settings changed; both
            // mean the state must be checked again.
            let _ = timeout_at(reopens_at, changed).await;
        }
    }

    /// Number of callers currently inside `acquire`.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Current state. Never waits for queued callers.
    pub fn snapshot(&self) -> RateLimitSnapshot {
        let state = self.state();
        RateLimitSnapshot {
            enabled: state.config.enabled,
            count_in_window: state.count,
            pending: self.pending(),
        }
    }

    /// Replace the settings and start a fresh window.
    ///
    /// Takes effect at once, including for the caller already waiting at
    /// the head of the queue.
    pub fn reconfigure(&self, config: RateLimitConfig) {
        {
            let mut state = self.state();
            info!(
                enabled = config.enabled,
                max_requests = config.max_requests,
                window_ms = config.window_ms,
                "Rate limiter reconfigured"
            );
            state.config = config;
            state.window_start = Instant::now();
            state.count = 0;
        }
        self.changed.notify_waiters();
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
