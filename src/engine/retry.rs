// src/engine/retry.rs
//
// Fixed politeness delay before every attempt, exponential backoff after
// every failed one. Both block the calling thread through a `Sleeper`.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::consts::{DEFAULT_INITIAL_BACKOFF_SECS, DEFAULT_MAX_RETRIES, REQUEST_PAUSE_MS};
use crate::error::FetchError;

pub trait Sleeper {
    fn sleep(&self, d: Duration);
}

/// Real clock.
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            thread::sleep(d);
        }
    }
}

/// Outcome of a single attempt.
pub enum Attempt<T> {
    Done(T),
    /// Stop immediately; no more attempts.
    Fatal(FetchError),
    /// Transient failure with a human-readable reason.
    Retry(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub politeness_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_secs(DEFAULT_INITIAL_BACKOFF_SECS),
            politeness_delay: Duration::from_millis(REQUEST_PAUSE_MS),
        }
    }
}

impl RetryPolicy {
    /// No sleeping at all; for tests and offline tooling.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            politeness_delay: Duration::ZERO,
        }
    }

    /// Delay after failed attempt `attempt` (0-based): `initial * 2^attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Drive `op` until it succeeds, fails fatally, or attempts run out.
    /// No backoff is slept after the final attempt.
    pub fn run<T>(
        &self,
        sleeper: &dyn Sleeper,
        mut op: impl FnMut(u32) -> Attempt<T>,
    ) -> Result<T, FetchError> {
        let attempts = self.max_attempts.max(1);
        let mut last = s!("no attempt made");

        for i in 0..attempts {
            sleeper.sleep(self.politeness_delay);
            match op(i) {
                Attempt::Done(v) => return Ok(v),
                Attempt::Fatal(e) => return Err(e),
                Attempt::Retry(reason) => {
                    warn!("Fetch: attempt {}/{} failed: {}", i + 1, attempts, reason);
                    last = reason;
                }
            }
            if i + 1 < attempts {
                let d = self.backoff(i);
                debug!("Fetch: backing off {:?}", d);
                sleeper.sleep(d);
            }
        }
        Err(FetchError::RetriesExhausted { attempts, last })
    }
}
