// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window submission rate limiter.
//!
//! Caps how many applications a single identity (normally the client IP)
//! may submit per window: 3 per hour by default. The window is fixed, not
//! sliding — a burst just before a window boundary followed by another
//! just after is permitted, which is accepted imprecision here.
//!
//! The clock is injected so tests (or alternative deployments) can drive
//! window expiry without sleeping.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Time source for the limiter.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Wall-clock time, used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: Clock> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        C::now(self)
    }
}

/// Result of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmitDecision {
    /// Submission counted against the quota and admitted.
    Admitted {
        /// Submissions left in the current window.
        remaining: u32,
    },
    /// Quota exhausted for this window.
    Limited {
        /// Time until the window lapses.
        retry_after: Duration,
    },
}

impl AdmitDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

/// Per-identity window state.
#[derive(Debug)]
struct WindowRecord {
    count: u32,
    window_start: Instant,
}

/// Thread-safe fixed-window rate limiter.
///
/// The check-and-increment runs under a single write lock, so concurrent
/// submissions from the same identity can never jointly exceed the quota.
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    clock: Box<dyn Clock>,
    ledger: RwLock<HashMap<String, WindowRecord>>,
}

impl FixedWindowLimiter {
    /// Create a limiter driven by the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Create a limiter with an injected clock.
    pub fn with_clock(config: RateLimitConfig, clock: impl Clock) -> Self {
        Self {
            config,
            clock: Box::new(clock),
            ledger: RwLock::new(HashMap::new()),
        }
    }

    /// Admit or reject one submission for `identity`.
    ///
    /// First touch of an identity, or first touch after its window lapsed,
    /// resets the count to 1 and admits. Within a live window the count
    /// increments up to the quota; once exhausted, rejected attempts leave
    /// the record untouched so they cannot extend the window.
    pub async fn admit(&self, identity: &str) -> AdmitDecision {
        let now = self.clock.now();
        let window = self.config.window_duration();

        let mut ledger = self.ledger.write().await;
        match ledger.get_mut(identity) {
            Some(record) if now.duration_since(record.window_start) <= window => {
                if record.count < self.config.max_per_window {
                    record.count += 1;
                    AdmitDecision::Admitted {
                        remaining: self.config.max_per_window - record.count,
                    }
                } else {
                    let elapsed = now.duration_since(record.window_start);
                    let retry_after = window.saturating_sub(elapsed);
                    debug!(identity, ?retry_after, "submission quota exhausted");
                    AdmitDecision::Limited { retry_after }
                }
            }
            _ => {
                ledger.insert(
                    identity.to_string(),
                    WindowRecord {
                        count: 1,
                        window_start: now,
                    },
                );
                AdmitDecision::Admitted {
                    remaining: self.config.max_per_window.saturating_sub(1),
                }
            }
        }
    }

    /// Drop entries whose window has lapsed.
    ///
    /// Purely a memory bound; a lapsed window would reset on next touch
    /// anyway, so eviction never changes an admit decision.
    pub async fn cleanup(&self) {
        let now = self.clock.now();
        let window = self.config.window_duration();

        let mut ledger = self.ledger.write().await;
        ledger.retain(|_, record| now.duration_since(record.window_start) <= window);
    }

    /// Number of identities currently tracked.
    pub async fn tracked_identities(&self) -> usize {
        self.ledger.read().await.len()
    }
}
