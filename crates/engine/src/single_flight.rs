// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight execution of poll cycles
//!
//! Each key owns a bounded queue drained by one worker task, so cycles
//! sharing a key run one at a time in submission order. A cycle that panics
//! shuts its queue down for good; the state stays observable.

use crate::error::panic_message;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A cycle ready to run
pub type CycleFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("queue {0} is full")]
    QueueFull(String),
    #[error("queue {key} is shut down: {reason}")]
    ShutDown { key: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueState {
    Running,
    ShutDown { reason: String },
}

struct Queue {
    sender: mpsc::Sender<CycleFuture>,
    state: Arc<Mutex<QueueState>>,
    worker: JoinHandle<()>,
}

pub struct SingleFlightScheduler {
    capacity: usize,
    queues: Mutex<HashMap<String, Queue>>,
}

impl SingleFlightScheduler {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            queues: Mutex::new(HashMap::new()),
        }
    }

    /// Queue `cycle` behind earlier cycles with the same key.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, key: &str, cycle: CycleFuture) -> Result<(), SchedulerError> {
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        let queue = queues
            .entry(key.to_string())
            .or_insert_with(|| spawn_queue(key, self.capacity));

        if let QueueState::ShutDown { reason } = lock_state(&queue.state).clone() {
            return Err(SchedulerError::ShutDown {
                key: key.to_string(),
                reason,
            });
        }

        queue.sender.try_send(cycle).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SchedulerError::QueueFull(key.to_string()),
            mpsc::error::TrySendError::Closed(_) => SchedulerError::ShutDown {
                key: key.to_string(),
                reason: lock_state(&queue.state).reason().to_string(),
            },
        })
    }

    /// State of the queue for `key`, if it was ever used
    pub fn state(&self, key: &str) -> Option<QueueState> {
        let queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        queues.get(key).map(|q| lock_state(&q.state).clone())
    }

    /// Stop accepting work and wait for queued cycles to finish
    pub async fn shutdown(&self) {
        let queues: Vec<(String, Queue)> = self
            .queues
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain()
            .collect();

        for (key, queue) in queues {
            drop(queue.sender);
            if let Err(e) = queue.worker.await {
                tracing::warn!(queue = %key, error = %e, "queue worker did not stop cleanly");
            }
        }
    }
}

impl QueueState {
    fn reason(&self) -> &str {
        match self {
            QueueState::Running => "closed",
            QueueState::ShutDown { reason } => reason,
        }
    }
}

fn lock_state(state: &Mutex<QueueState>) -> std::sync::MutexGuard<'_, QueueState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn spawn_queue(key: &str, capacity: usize) -> Queue {
    let (sender, receiver) = mpsc::channel(capacity);
    let state = Arc::new(Mutex::new(QueueState::Running));
    let worker = tokio::spawn(run_worker(key.to_string(), receiver, Arc::clone(&state)));
    tracing::debug!(queue = %key, capacity, "queue started");
    Queue {
        sender,
        state,
        worker,
    }
}

async fn run_worker(
    key: String,
    mut receiver: mpsc::Receiver<CycleFuture>,
    state: Arc<Mutex<QueueState>>,
) {
    while let Some(cycle) = receiver.recv().await {
        // Run on its own task so a panic is caught here
        match tokio::spawn(cycle).await {
            Ok(()) => {}
            Err(e) if e.is_panic() => {
                let reason = panic_message(e.into_panic());
                tracing::error!(queue = %key, reason = %reason, "cycle panicked, queue shut down");
                *lock_state(&state) = QueueState::ShutDown { reason };
                receiver.close();
                return;
            }
            Err(e) => {
                tracing::warn!(queue = %key, error = %e, "cycle cancelled");
            }
        }
    }
    tracing::debug!(queue = %key, "queue drained");
}

#[cfg(test)]
#[path = "single_flight_tests.rs"]
mod tests;
