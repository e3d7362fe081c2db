//! Concurrent task runner utilities
//!
//! Provides a bounded pool for running async tasks with:
//! - A per-task deadline (the task future is dropped when it expires)
//! - Concurrency limiting
//! - Panic isolation (a panicking task is reported, siblings keep running)
//!
//! ## Built on standard primitives
//!
//! - Uses `futures::stream::buffer_unordered` for concurrency limiting
//! - Uses `tokio::spawn` so tasks run on the runtime's worker threads
//! - Uses `tokio::time::timeout` inside the spawned task for deadlines
//!
//! ## Example
//!
//! ```ignore
//! use sparql_smoke::utils::concurrent::{collect_bounded, ConcurrentOpts, Scheduled};
//!
//! let reports = collect_bounded(
//!     vec![Scheduled::new("a", 1), Scheduled::new("b", 2)],
//!     |n| async move { Ok::<_, String>(n * 2) },
//!     ConcurrentOpts::default().with_deadline(Duration::from_secs(5)),
//! ).await;
//! ```

use futures::stream::{self, Stream, StreamExt};
use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Errors from bounded task execution
#[derive(Debug, Error)]
pub enum ConcurrentError<E: std::fmt::Display> {
    /// The task returned an error
    #[error("Task '{id}' failed: {error}")]
    TaskFailed { id: String, error: E },

    /// The task did not finish before its deadline
    #[error("Task '{id}' timed out after {deadline:?}")]
    TimedOut { id: String, deadline: Duration },

    /// The spawned task panicked
    #[error("Task '{id}' panicked: {message}")]
    Panic { id: String, message: String },
}

/// Report for a single task, whatever its outcome
#[derive(Debug)]
pub struct TaskReport<T, E: std::fmt::Display> {
    /// Identifier for the task
    pub id: String,
    /// Time from spawn to completion (or deadline)
    pub elapsed: Duration,
    /// The task's value, or why there is none
    pub result: Result<T, ConcurrentError<E>>,
}

/// Options for bounded execution
#[derive(Debug, Clone)]
pub struct ConcurrentOpts {
    /// Maximum concurrent tasks (None = one worker per task)
    pub max_concurrency: Option<usize>,
    /// Deadline for tasks that do not carry their own
    pub deadline: Duration,
}

impl Default for ConcurrentOpts {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            deadline: Duration::from_secs(5),
        }
    }
}

impl ConcurrentOpts {
    /// Set maximum concurrency
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = Some(max);
        self
    }

    /// Set the default per-task deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

/// A task input with its identifier and optional deadline override
#[derive(Debug, Clone)]
pub struct Scheduled<T> {
    pub id: String,
    pub value: T,
    pub deadline: Option<Duration>,
}

impl<T> Scheduled<T> {
    pub fn new(id: impl Into<String>, value: T) -> Self {
        Self {
            id: id.into(),
            value,
            deadline: None,
        }
    }

    /// Override the pool's default deadline for this task
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Run tasks on a bounded pool, yielding reports in completion order
///
/// At most `max_concurrency` tasks are in flight; the next one is spawned as
/// soon as a slot frees up. Each task runs under its own deadline. Failures,
/// timeouts and panics are all reported, never propagated, so one bad task
/// cannot stop its siblings.
///
/// Must be polled from within a tokio runtime.
pub fn run_bounded<V, T, E, F, Fut>(
    items: Vec<Scheduled<V>>,
    task_fn: F,
    opts: ConcurrentOpts,
) -> impl Stream<Item = TaskReport<T, E>>
where
    V: Send + 'static,
    F: Fn(V) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let limit = opts.max_concurrency.unwrap_or(items.len()).max(1);
    let default_deadline = opts.deadline;

    stream::iter(items)
        .map(move |item| {
            let deadline = item.deadline.unwrap_or(default_deadline);
            let id = item.id;
            let started = Instant::now();

            debug!(task_id = %id, deadline_ms = deadline.as_millis(), "Spawning task");
            let handle = tokio::spawn(tokio::time::timeout(deadline, task_fn(item.value)));

            async move {
                let result = match handle.await {
                    Ok(Ok(Ok(value))) => Ok(value),
                    Ok(Ok(Err(error))) => Err(ConcurrentError::TaskFailed {
                        id: id.clone(),
                        error,
                    }),
                    Ok(Err(_elapsed)) => Err(ConcurrentError::TimedOut {
                        id: id.clone(),
                        deadline,
                    }),
                    Err(join_error) => Err(ConcurrentError::Panic {
                        id: id.clone(),
                        message: panic_message(join_error),
                    }),
                };

                TaskReport {
                    id,
                    elapsed: started.elapsed(),
                    result,
                }
            }
        })
        .buffer_unordered(limit)
}

/// Run tasks on a bounded pool and collect every report
pub async fn collect_bounded<V, T, E, F, Fut>(
    items: Vec<Scheduled<V>>,
    task_fn: F,
    opts: ConcurrentOpts,
) -> Vec<TaskReport<T, E>>
where
    V: Send + 'static,
    F: Fn(V) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    run_bounded(items, task_fn, opts).collect().await
}

fn panic_message(join_error: tokio::task::JoinError) -> String {
    if !join_error.is_panic() {
        return join_error.to_string();
    }
    let payload = join_error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
