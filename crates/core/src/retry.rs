//! Bounded Retry with Exponential Backoff
//!
//! Every network-calling stage of the pipeline (primary generation, fallback
//! generation, practice-problem curation, suggestions) goes through a single
//! [`RetryPolicy`], parameterized per call site.

use crate::error::TimedOut;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

/// How many times to attempt a unit of work and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for every further attempt.
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the random jitter added to each delay.
    pub max_jitter: Duration,
    /// When set, each attempt is raced against a timer of this length.
    pub timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_jitter: Duration::from_millis(1000),
            timeout: None,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Deterministic part of the wait after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }

    fn jitter(&self) -> Duration {
        if self.max_jitter.is_zero() {
            return Duration::ZERO;
        }
        self.max_jitter.mul_f64(rand::random::<f64>())
    }

    /// Runs `op` until it succeeds or the attempt budget is spent.
    ///
    /// On exhaustion the error of the last attempt is returned. A timeout is
    /// reported through `E::from(TimedOut)` and is retried like any other failure.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<TimedOut> + Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, op()).await {
                    Ok(result) => result,
                    Err(_) => Err(E::from(TimedOut(limit))),
                },
                None => op().await,
            };

            match outcome {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(%label, attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if attempt >= max_attempts => {
                    error!(%label, attempt, error = %err, "Retry budget exhausted");
                    return Err(err);
                }
                Err(err) => {
                    let delay = self.backoff(attempt) + self.jitter();
                    warn!(
                        %label,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
