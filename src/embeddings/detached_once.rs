// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! One-time initialization that outlives its callers
//!
//! The init future runs in its own tokio task and every caller awaits a
//! shared handle to it. Dropping a caller (an HTTP client disconnecting,
//! an aborted task) therefore neither cancels the work nor lets a second
//! attempt start while the first is still running. A failed attempt is
//! reported to every waiter and clears the slot; the next caller retries.

use crate::embeddings::EmbeddingError;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;
use std::sync::{Arc, Mutex, OnceLock};

type Attempt<T> = Shared<BoxFuture<'static, Result<T, EmbeddingError>>>;

struct Slot<T> {
    value: OnceLock<T>,
    in_flight: Mutex<Option<Attempt<T>>>,
}

pub struct DetachedOnce<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Default for DetachedOnce<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DetachedOnce<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Slot {
                value: OnceLock::new(),
                in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.slot.value.get()
    }

    /// Whether an attempt is currently running
    pub fn is_initializing(&self) -> bool {
        self.slot
            .in_flight
            .lock()
            .map(|in_flight| in_flight.is_some())
            .unwrap_or(false)
    }

    /// Returns the value, spawning `init` if no attempt is running
    ///
    /// `init` is only called when a new attempt starts. `task_error` builds
    /// the error reported if the init task panics or its lock is poisoned.
    pub async fn get_or_spawn<F, Fut>(
        &self,
        init: F,
        task_error: fn(String) -> EmbeddingError,
    ) -> Result<T, EmbeddingError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, EmbeddingError>> + Send + 'static,
    {
        if let Some(value) = self.get() {
            return Ok(value.clone());
        }

        let attempt = {
            let mut in_flight = self
                .slot
                .in_flight
                .lock()
                .map_err(|e| task_error(format!("initialization lock poisoned: {}", e)))?;

            // The previous attempt may have finished since the check above
            if let Some(value) = self.get() {
                return Ok(value.clone());
            }

            match in_flight.as_ref() {
                Some(attempt) => attempt.clone(),
                None => {
                    let attempt = self.spawn_attempt(init(), task_error);
                    *in_flight = Some(attempt.clone());
                    attempt
                }
            }
        };

        attempt.await
    }

    fn spawn_attempt<Fut>(&self, init: Fut, task_error: fn(String) -> EmbeddingError) -> Attempt<T>
    where
        Fut: Future<Output = Result<T, EmbeddingError>> + Send + 'static,
    {
        let slot = self.slot.clone();
        let handle = tokio::spawn(async move {
            let result = init.await;
            if let Ok(value) = &result {
                let _ = slot.value.set(value.clone());
            }
            if let Ok(mut in_flight) = slot.in_flight.lock() {
                *in_flight = None;
            }
            result
        });

        let slot = self.slot.clone();
        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    if let Ok(mut in_flight) = slot.in_flight.lock() {
                        *in_flight = None;
                    }
                    Err(task_error(format!("initialization task failed: {}", e)))
                }
            }
        }
        .boxed()
        .shared()
    }
}
