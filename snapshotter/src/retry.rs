// File: snapshotter/src/retry.rs
//! Bounded retry with a fixed pause between attempts.
//!
//! An operation is attempted at most `max_retries + 1` times. Failures are
//! collected so that the final error shows every attempt, not only the last
//! one; operators reading it can tell a transient blip from a persistent
//! rejection.
//!
//! Destructive operations go through [`RetryPolicy::run_guarded`], which asks
//! a pre-check whether the target state was already reached before re-issuing
//! the call.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    interval: Duration,
}

/// Every error observed before giving up, oldest first
#[derive(Debug)]
pub struct RetryFailure<E> {
    pub errors: Vec<E>,
    /// False when an attempt failed with a non-retryable error
    pub exhausted: bool,
}

/// Result of a guarded run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    Completed(T),
    /// A previous attempt failed, but the pre-check found the work done
    AlreadyInTargetState,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, interval: Duration) -> Self {
        Self {
            max_retries,
            interval,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Initial attempt plus retries
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Run `operation` until it succeeds, fails with an error `is_retryable`
    /// rejects, or the attempt budget runs out.
    pub async fn run<T, E, F, Fut, R>(
        &self,
        label: &str,
        is_retryable: R,
        mut operation: F,
    ) -> Result<T, RetryFailure<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        E: fmt::Display,
    {
        let max_attempts = self.max_attempts();
        let mut errors = Vec::new();

        for attempt in 1..=max_attempts {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("{} succeeded on attempt {}/{}", label, attempt, max_attempts);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    let retryable = is_retryable(&err);
                    warn!(
                        "{} failed (attempt {}/{}): {}",
                        label, attempt, max_attempts, err
                    );
                    errors.push(err);

                    if !retryable {
                        return Err(RetryFailure {
                            errors,
                            exhausted: false,
                        });
                    }
                    if attempt < max_attempts {
                        sleep(self.interval).await;
                    }
                }
            }
        }

        Err(RetryFailure {
            errors,
            exhausted: true,
        })
    }

    /// Like [`run`](Self::run), but before every retry `already_done` is asked
    /// whether the operation's effect is already in place. A `true` answer
    /// stops the loop without re-issuing the operation. A failing pre-check is
    /// logged and the retry goes ahead.
    pub async fn run_guarded<T, E, F, Fut, R, G, GFut>(
        &self,
        label: &str,
        is_retryable: R,
        mut operation: F,
        mut already_done: G,
    ) -> Result<Guarded<T>, RetryFailure<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        G: FnMut() -> GFut,
        GFut: Future<Output = Result<bool, E>>,
        E: fmt::Display,
    {
        let max_attempts = self.max_attempts();
        let mut errors = Vec::new();

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                match already_done().await {
                    Ok(true) => {
                        info!(
                            "{}: target state already reached, skipping attempt {}/{}",
                            label, attempt, max_attempts
                        );
                        return Ok(Guarded::AlreadyInTargetState);
                    }
                    Ok(false) => {}
                    Err(e) => warn!("{}: pre-check failed, retrying anyway: {}", label, e),
                }
            }

            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("{} succeeded on attempt {}/{}", label, attempt, max_attempts);
                    }
                    return Ok(Guarded::Completed(value));
                }
                Err(err) => {
                    let retryable = is_retryable(&err);
                    warn!(
                        "{} failed (attempt {}/{}): {}",
                        label, attempt, max_attempts, err
                    );
                    errors.push(err);

                    if !retryable {
                        return Err(RetryFailure {
                            errors,
                            exhausted: false,
                        });
                    }
                    if attempt < max_attempts {
                        sleep(self.interval).await;
                    }
                }
            }
        }

        Err(RetryFailure {
            errors,
            exhausted: true,
        })
    }
}

impl<E: fmt::Display> RetryFailure<E> {
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

impl<E: fmt::Display> fmt::Display for RetryFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed after {} attempt(s)", self.errors.len())?;
        for err in &self.errors {
            write!(f, "\n\t{}", err)?;
        }
        Ok(())
    }
}
