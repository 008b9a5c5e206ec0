// src/launcher/mod.rs

//! The `Launcher`: spawns and owns the threads behind every task.

pub mod options;
pub mod stats;
pub(crate) mod worker;

pub use options::{LauncherOptions, DEFAULT_THREAD_NAME_PREFIX};
pub use stats::LauncherStats;

use crate::error::{LaunchError, ShutdownError, TaskError};
use crate::runtime::{
  EventBus, OutcomeKind, TaskEvent, TaskMonitor, ThreadExitGuard, ThreadRegistry, ThreadRole, WaitGroup,
};
use crate::task::{Handle, TaskCell, TaskId, TaskKind, TaskResult};
use stats::StatsCounters;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// State shared by every `Launcher` clone and by the threads it spawned.
struct LauncherInner {
  options: LauncherOptions,
  registry: ThreadRegistry,
  /// Counts admitted threads until their exit guard drops.
  threads: WaitGroup,
  event_bus: EventBus,
  stats: StatsCounters,
  shutdown_initiated: AtomicBool,
}

impl LauncherInner {
  /// Settles `cell` on behalf of `role` and records who won.
  fn settle<T, E>(&self, cell: &TaskCell<T, E>, role: ThreadRole, result: TaskResult<T, E>) {
    let outcome = OutcomeKind::of(&result);
    let task_id = cell.id();
    if cell.settle(result) {
      self.stats.record_settled(outcome);
      tracing::debug!(task_id = %task_id, role = %role, outcome = ?outcome, "Task settled");
      self.event_bus.publish_forget(TaskEvent::Settled { task_id, role, outcome });
    } else {
      self.stats.record_claim_lost();
      tracing::trace!(task_id = %task_id, role = %role, discarded = ?outcome, "Lost settlement race");
      self.event_bus.publish_forget(TaskEvent::ClaimLost {
        task_id,
        role,
        discarded: outcome,
      });
    }
  }

  /// Retracts a `Launched` announcement whose threads could not all be spawned.
  fn abort_launch(&self, task_id: TaskId) {
    self.stats.record_launch_aborted();
    self.event_bus.publish_forget(TaskEvent::LaunchAborted { task_id });
  }

  /// Reserves `count` live-thread slots, honouring shutdown and the configured cap.
  fn admit(&self, count: usize) -> Result<(), LaunchError> {
    if self.shutdown_initiated.load(Ordering::Acquire) {
      return Err(LaunchError::ShuttingDown);
    }
    self.registry.reap();

    match self.options.max_live_threads {
      Some(limit) => {
        if !self.threads.try_add(count, limit) {
          tracing::debug!(limit, requested = count, "Live thread limit reached");
          return Err(LaunchError::ResourceLimitReached { limit });
        }
      }
      None => self.threads.add(count),
    }
    Ok(())
  }

  /// Spawns one thread into a slot previously reserved by `admit`.
  ///
  /// On failure the slot is released and `body` is dropped without running.
  fn spawn_tracked<B>(self: &Arc<Self>, task_id: TaskId, role: ThreadRole, body: B) -> Result<(), LaunchError>
  where
    B: FnOnce(&LauncherInner) + Send + 'static,
  {
    // Interior NULs are not allowed in thread names.
    let name = format!("{}-{}-{}", self.options.thread_name_prefix, task_id, role).replace('\0', "");
    let mut builder = thread::Builder::new().name(name);
    if let Some(stack_size) = self.options.stack_size {
      builder = builder.stack_size(stack_size);
    }

    let inner = Arc::clone(self);
    let spawned = builder.spawn(move || {
      let _exit = ThreadExitGuard::new(inner.threads.clone(), inner.event_bus.clone(), task_id, role);
      body(inner.as_ref());
    });

    match spawned {
      Ok(handle) => {
        self.registry.insert(task_id, role, handle);
        Ok(())
      }
      Err(e) => {
        self.threads.done();
        tracing::error!(task_id = %task_id, role = %role, error = %e, "Failed to spawn launcher thread");
        Err(LaunchError::Spawn(e))
      }
    }
  }
}

/// Starts tasks on dedicated threads and keeps ownership of those threads.
///
/// Cloning a `Launcher` yields another handle to the same thread registry,
/// statistics and event bus.
#[derive(Clone)]
pub struct Launcher {
  inner: Arc<LauncherInner>,
}

impl Launcher {
  pub fn new() -> Self {
    Self::with_options(LauncherOptions::default())
  }

  pub fn with_options(options: LauncherOptions) -> Self {
    let event_bus = EventBus::with_capacity(options.event_capacity);
    tracing::debug!(
      prefix = %options.thread_name_prefix,
      max_live_threads = ?options.max_live_threads,
      "Launcher created"
    );
    Self {
      inner: Arc::new(LauncherInner {
        options,
        registry: ThreadRegistry::new(),
        threads: WaitGroup::new(),
        event_bus,
        stats: StatsCounters::default(),
        shutdown_initiated: AtomicBool::new(false),
      }),
    }
  }

  pub fn options(&self) -> &LauncherOptions {
    &self.inner.options
  }

  /// Runs `f` on a new thread and returns immediately.
  ///
  /// `Ok` from `f` settles the handle with a value, `Err` with
  /// `TaskError::Failed`, and a panic with `TaskError::Panicked`.
  pub fn launch<T, E, F>(&self, f: F) -> Result<Handle<T, E>, LaunchError>
  where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
  {
    self.start(TaskKind::Immediate, f)
  }

  /// Like [`launch`](Self::launch), but the worker thread first sleeps until
  /// `delay` has elapsed since this call. The delay cannot be cancelled; a
  /// delay too large to represent as an `Instant` never elapses.
  pub fn launch_after<T, E, F>(&self, delay: Duration, f: F) -> Result<Handle<T, E>, LaunchError>
  where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
  {
    let not_before = Instant::now().checked_add(delay);
    self.start(TaskKind::Delayed(delay), move || {
      worker::sleep_until(not_before);
      f()
    })
  }

  /// Races `f` against a timer of length `timeout`.
  ///
  /// Whichever of the worker and the timer claims the handle first settles
  /// it; the other's result is discarded. A worker that loses keeps running
  /// to completion in the background. Abandonment is best-effort, nothing
  /// interrupts the callable. A timeout too large to represent as an
  /// `Instant` never fires.
  pub fn launch_with_timeout<T, E, F>(&self, timeout: Duration, f: F) -> Result<Handle<T, E>, LaunchError>
  where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
  {
    self.start(TaskKind::Timed(timeout), f)
  }

  fn start<T, E, F>(&self, kind: TaskKind, f: F) -> Result<Handle<T, E>, LaunchError>
  where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
  {
    // `None` for a timeout too large to represent: the timer never fires.
    let deadline = match kind {
      TaskKind::Timed(timeout) => Instant::now().checked_add(timeout),
      _ => None,
    };

    let inner = &self.inner;
    inner.admit(kind.thread_count())?;

    let task_id = TaskId::next();
    let cell = Arc::new(TaskCell::new(task_id, kind));

    // Published before any thread exists, so `Launched` precedes every other
    // event of the task.
    inner.stats.record_launch();
    inner.event_bus.publish_forget(TaskEvent::Launched { task_id, kind });

    if let TaskKind::Timed(timeout) = kind {
      let timer_cell = Arc::clone(&cell);
      if let Err(e) = inner.spawn_tracked(task_id, ThreadRole::Timer, move |inner| {
        if let Some(timed_out) = worker::await_deadline(&timer_cell, timeout, deadline) {
          inner.settle(&timer_cell, ThreadRole::Timer, timed_out);
        }
      }) {
        // The worker's slot was reserved together with the timer's.
        inner.threads.done();
        inner.abort_launch(task_id);
        return Err(e);
      }
    }

    let worker_cell = Arc::clone(&cell);
    if let Err(e) = inner.spawn_tracked(task_id, ThreadRole::Worker, move |inner| {
      let result = worker::run_task(f);
      inner.settle(&worker_cell, ThreadRole::Worker, result);
    }) {
      if let TaskKind::Timed(timeout) = kind {
        // Release the timer. No handle escapes, so this placeholder is never observed.
        cell.settle(Err(TaskError::Timeout(timeout)));
      }
      inner.abort_launch(task_id);
      return Err(e);
    }

    tracing::debug!(task_id = %task_id, kind = ?kind, "Task launched");
    Ok(Handle::new(cell))
  }

  /// Subscribes to this launcher's lifecycle events. Only events published
  /// after the call are received.
  pub fn monitor(&self) -> TaskMonitor {
    self.inner.event_bus.subscribe()
  }

  pub fn stats(&self) -> LauncherStats {
    self
      .inner
      .stats
      .snapshot(self.inner.threads.get_count(), self.inner.registry.len())
  }

  /// Threads admitted and not yet exited.
  pub fn live_threads(&self) -> usize {
    self.inner.threads.get_count()
  }

  /// Joins every launcher thread that has finished. Happens automatically on
  /// each launch; exposed for callers that launch rarely.
  pub fn reap(&self) -> usize {
    self.inner.registry.reap()
  }

  pub fn is_shutdown(&self) -> bool {
    self.inner.shutdown_initiated.load(Ordering::Acquire)
  }

  /// Stops accepting launches and waits up to `grace` for every launcher
  /// thread to exit, joining them all.
  ///
  /// Running callables are not interrupted. If some are still running when
  /// `grace` elapses their threads stay owned by the launcher, the finished
  /// ones are joined, and `GracePeriodElapsed` reports how many remain.
  /// Calling `shutdown` again waits again.
  pub fn shutdown(&self, grace: Duration) -> Result<(), ShutdownError> {
    let inner = &self.inner;
    if inner
      .shutdown_initiated
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
    {
      tracing::info!("Launcher shutdown initiated.");
      inner.event_bus.publish_forget(TaskEvent::ShutdownInitiated);
    } else {
      tracing::debug!("Launcher shutdown already initiated.");
    }

    let drained = inner.threads.wait_timeout(grace);
    if drained {
      // Every exit guard has run, so the remaining threads are about to return.
      inner.registry.join_all();
      return Ok(());
    }

    inner.registry.reap();
    let still_running = inner.threads.get_count();
    tracing::warn!(still_running, "Launcher shutdown grace period elapsed");
    Err(ShutdownError::GracePeriodElapsed { still_running })
  }
}

impl Default for Launcher {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Launcher {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Launcher")
      .field("options", &self.inner.options)
      .field("live_threads", &self.inner.threads.get_count())
      .field("shutdown", &self.is_shutdown())
      .field("monitors", &self.inner.event_bus.subscriber_count())
      .finish_non_exhaustive()
  }
}
