// src/error.rs

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors reported synchronously by the `launch*` entry points.
///
/// A `LaunchError` means no task was started: the callable has been dropped
/// without running and no `Handle` exists.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LaunchError {
  /// The operating system refused to create a thread.
  #[error("Failed to spawn thread: {0}")]
  Spawn(#[from] io::Error),

  /// The launcher's configured cap on live threads would be exceeded.
  #[error("Live thread limit reached ({limit})")]
  ResourceLimitReached { limit: usize },

  /// `Launcher::shutdown` has been called; no new tasks are accepted.
  #[error("Launcher is shutting down")]
  ShuttingDown,
}

/// The failure side of a settled task, observed through its `Handle`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError<E> {
  /// The timer claimed the task before the callable finished.
  #[error("Task timed out after {0:?}")]
  Timeout(Duration),

  /// The callable returned `Err`.
  #[error("Task failed: {0}")]
  Failed(E),

  /// The callable panicked. Carries the panic payload when it was a string.
  #[error("Task panicked: {0}")]
  Panicked(String),
}

impl<E> TaskError<E> {
  pub fn is_timeout(&self) -> bool {
    matches!(self, TaskError::Timeout(_))
  }

  pub fn is_failed(&self) -> bool {
    matches!(self, TaskError::Failed(_))
  }

  pub fn is_panic(&self) -> bool {
    matches!(self, TaskError::Panicked(_))
  }

  /// Returns the callable's own error, if that is what settled the task.
  pub fn failure(&self) -> Option<&E> {
    match self {
      TaskError::Failed(e) => Some(e),
      _ => None,
    }
  }
}

/// Returned by `Launcher::shutdown` when threads outlive the grace period.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShutdownError {
  #[error("Shutdown grace period elapsed with {still_running} thread(s) still running")]
  GracePeriodElapsed { still_running: usize },
}

// Panic payloads are `&'static str` or `String` for the `panic!` macro forms.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&'static str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "non-string panic payload".to_string()
  }
}
