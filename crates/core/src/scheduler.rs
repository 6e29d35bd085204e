//! Runs engine analysis off the caller's task, one request at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{EngineError, EngineGateway};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Idle,
    Running,
    Done,
    Failed,
}

/// Owns the engine handle and serializes access to it.
///
/// A dispatch while a job is running is rejected, never queued.
pub struct AnalysisScheduler<G> {
    gateway: Arc<Mutex<G>>,
    state: Arc<Mutex<SchedulerState>>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

/// Result of one dispatched job
#[must_use = "the analysis result is only delivered through wait()"]
pub struct AnalysisHandle<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> AnalysisHandle<T> {
    pub async fn wait(self) -> Result<T> {
        self.rx
            .await
            .map_err(|_| Error::AnalysisFailed("analysis worker stopped before replying".into()))?
    }
}

/// Sets the final state when the worker finishes, even if the job panics.
struct Completion {
    state: Arc<Mutex<SchedulerState>>,
    finished: SchedulerState,
}

impl Drop for Completion {
    fn drop(&mut self) {
        *lock(&self.state) = self.finished;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<G> AnalysisScheduler<G>
where
    G: EngineGateway + 'static,
{
    pub fn new(gateway: G) -> Self {
        Self {
            gateway: Arc::new(Mutex::new(gateway)),
            state: Arc::new(Mutex::new(SchedulerState::Idle)),
            in_flight: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SchedulerState {
        *lock(&self.state)
    }

    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Runs `job` against the engine on a blocking worker thread.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch<T, F>(&self, job: F) -> Result<AnalysisHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce(&mut G) -> Result<T> + Send + 'static,
    {
        if self.closed.load(Ordering::SeqCst) {
            return Err(EngineError::Closed.into());
        }

        {
            let mut state = lock(&self.state);
            if *state == SchedulerState::Running {
                warn!("rejecting analysis dispatch, one is already running");
                return Err(Error::ConcurrentDispatchRejected);
            }
            *state = SchedulerState::Running;
        }
        debug!("analysis dispatched");

        let (tx, rx) = oneshot::channel();
        let gateway = Arc::clone(&self.gateway);
        let mut completion = Completion {
            state: Arc::clone(&self.state),
            finished: SchedulerState::Failed,
        };

        let worker = tokio::task::spawn_blocking(move || {
            let result = {
                let mut engine = lock(&gateway);
                job(&mut engine)
            };
            match &result {
                Ok(_) => {
                    completion.finished = SchedulerState::Done;
                    debug!("analysis complete");
                }
                Err(e) => warn!(error = %e, "analysis failed"),
            }
            // State is final before the caller can observe the result
            drop(completion);
            if tx.send(result).is_err() {
                debug!("analysis result dropped, caller went away");
            }
        });

        *lock(&self.in_flight) = Some(worker);
        Ok(AnalysisHandle { rx })
    }

    /// Waits up to `grace` for the in-flight job. Returns `false` if it is
    /// still running afterwards.
    pub async fn drain(&self, grace: Duration) -> bool {
        let worker = lock(&self.in_flight).take();
        let Some(worker) = worker else {
            return true;
        };

        match tokio::time::timeout(grace, worker).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "analysis worker panicked");
                true
            }
            Err(_) => {
                warn!(grace_ms = grace.as_millis() as u64, "in-flight analysis did not finish in time");
                false
            }
        }
    }

    /// Closes the engine. Later dispatches fail with a closed-engine error.
    ///
    /// A job still holding the engine is waited for before the engine is
    /// shut down.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.is_running() {
            info!("waiting for in-flight analysis before closing engine");
        }

        let gateway = Arc::clone(&self.gateway);
        let closing = tokio::task::spawn_blocking(move || lock(&gateway).shutdown());
        match closing.await {
            Ok(Ok(())) => info!("engine closed"),
            Ok(Err(e)) => warn!(error = %e, "engine shutdown failed"),
            Err(e) => warn!(error = %e, "engine shutdown task panicked"),
        }
    }

    /// Drains, then closes the engine.
    pub async fn shutdown(&self, grace: Duration) {
        self.drain(grace).await;
        self.close().await;
    }
}
