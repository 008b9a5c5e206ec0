// src/runtime/events.rs

use crate::error::TaskError;
use crate::task::{TaskId, TaskKind, TaskResult};
use std::fmt;

/// What a launcher thread is doing for its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadRole {
  /// Runs the callable (after the delay, for delayed tasks).
  Worker,
  /// Races the worker for a timed task and settles `Timeout` if it wins.
  Timer,
}

impl ThreadRole {
  pub fn as_str(&self) -> &'static str {
    match self {
      ThreadRole::Worker => "worker",
      ThreadRole::Timer => "timer",
    }
  }
}

impl fmt::Display for ThreadRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The shape of a task result, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
  Value,
  Failed,
  Panicked,
  TimedOut,
}

impl OutcomeKind {
  pub(crate) fn of<T, E>(result: &TaskResult<T, E>) -> Self {
    match result {
      Ok(_) => OutcomeKind::Value,
      Err(TaskError::Failed(_)) => OutcomeKind::Failed,
      Err(TaskError::Panicked(_)) => OutcomeKind::Panicked,
      Err(TaskError::Timeout(_)) => OutcomeKind::TimedOut,
    }
  }
}

/// Lifecycle notifications published on a launcher's event bus.
/// Subscribe with `Launcher::monitor`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskEvent {
  /// The task was admitted. Published before its threads are spawned, so it
  /// precedes every other event of the task.
  Launched { task_id: TaskId, kind: TaskKind },
  /// A thread of a `Launched` task failed to spawn. No handle was returned
  /// and the task will publish no `Settled` event.
  LaunchAborted { task_id: TaskId },
  /// `role` won the settlement claim and wrote `outcome`.
  Settled {
    task_id: TaskId,
    role: ThreadRole,
    outcome: OutcomeKind,
  },
  /// `role` lost the settlement claim; its `discarded` result was dropped.
  ClaimLost {
    task_id: TaskId,
    role: ThreadRole,
    discarded: OutcomeKind,
  },
  /// A launcher thread finished (normally or by unwinding).
  ThreadExited { task_id: TaskId, role: ThreadRole },
  /// `Launcher::shutdown` was called for the first time.
  ShutdownInitiated,
}
