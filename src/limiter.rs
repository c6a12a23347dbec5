//! Bounded-concurrency admission for submitted work.
//!
//! Each external service gets its own limiter so hosting-service throttling
//! and registry throttling cannot starve each other.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Admits at most a fixed number of tasks concurrently.
///
/// Excess submissions queue in FIFO order and are admitted as capacity
/// frees. A task's outcome has no effect on the admission of others, and an
/// admitted task always runs to completion.
#[derive(Clone)]
pub struct InFlightLimiter {
    permits: Arc<Semaphore>,
}

impl InFlightLimiter {
    /// Create a limiter admitting at most `max_in_flight` tasks at once.
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Run `task` once a permit is available, holding the permit until the
    /// task resolves.
    pub async fn run<T>(&self, task: impl Future<Output = T>) -> T {
        // The semaphore is never closed, so acquire can only succeed.
        let _permit = self
            .permits
            .acquire()
            .await
            .expect("limiter semaphore closed");
        task.await
    }
}
