// src/task/id.rs

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Process-unique identifier of a launched task.
///
/// IDs are handed out from a single counter starting at 1 and are never
/// reused. They appear in thread names, log fields and `TaskEvent`s.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
  pub(crate) fn next() -> Self {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    Self(COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  pub fn as_u64(&self) -> u64 {
    self.0
  }
}

impl fmt::Display for TaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Which entry point started a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
  /// `launch`: runs as soon as its thread is scheduled.
  Immediate,
  /// `launch_after`: the worker sleeps for the delay before running.
  Delayed(Duration),
  /// `launch_with_timeout`: raced against a timer of this length.
  Timed(Duration),
}

impl TaskKind {
  /// Number of threads a task of this kind occupies.
  pub(crate) fn thread_count(&self) -> usize {
    match self {
      TaskKind::Timed(_) => 2,
      TaskKind::Immediate | TaskKind::Delayed(_) => 1,
    }
  }
}
