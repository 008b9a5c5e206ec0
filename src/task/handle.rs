// src/task/handle.rs

use crate::error::TaskError;
use crate::task::cell::TaskCell;
use crate::task::{TaskId, TaskKind};

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Snapshot of a task's state as returned by [`Handle::try_get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T, E> {
  /// Neither the worker nor the timer has settled the task yet.
  Pending,
  /// The callable returned `Ok`.
  Value(T),
  /// The task settled with a failure (callable error, panic or timeout).
  Failure(E),
}

impl<T, E> Outcome<T, E> {
  pub fn is_pending(&self) -> bool {
    matches!(self, Outcome::Pending)
  }

  /// Converts a settled outcome into a `Result`; `None` while pending.
  pub fn into_result(self) -> Option<Result<T, E>> {
    match self {
      Outcome::Pending => None,
      Outcome::Value(v) => Some(Ok(v)),
      Outcome::Failure(e) => Some(Err(e)),
    }
  }
}

/// An owned permission to observe the outcome of a launched task.
///
/// The task starts running as soon as it is launched, whether or not anyone
/// ever looks at the handle. Handles are cheap to clone; every clone observes
/// the same settle-once outcome.
///
/// Dropping every handle does not stop the task. It keeps running on its
/// thread and its result is dropped together with the last reference to the
/// shared cell.
pub struct Handle<T, E> {
  cell: Arc<TaskCell<T, E>>,
}

impl<T, E> Handle<T, E> {
  pub(crate) fn new(cell: Arc<TaskCell<T, E>>) -> Self {
    Self { cell }
  }

  pub fn id(&self) -> TaskId {
    self.cell.id()
  }

  pub fn kind(&self) -> TaskKind {
    self.cell.kind()
  }

  pub fn is_settled(&self) -> bool {
    self.cell.is_settled()
  }

  /// Blocks the calling thread until the task is settled.
  pub fn wait(&self) -> Result<&T, &TaskError<E>> {
    self.cell.wait().as_ref()
  }

  /// Blocks for at most `timeout`. Returns `None` if the task is still pending.
  ///
  /// Only the caller's wait is bounded; the task itself is unaffected.
  pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<&T, &TaskError<E>>> {
    match Instant::now().checked_add(timeout) {
      Some(deadline) => self.cell.wait_until(deadline).map(Result::as_ref),
      None => Some(self.wait()),
    }
  }

  /// Non-blocking poll of the task's state.
  pub fn try_get(&self) -> Outcome<&T, &TaskError<E>> {
    match self.cell.get() {
      None => Outcome::Pending,
      Some(Ok(value)) => Outcome::Value(value),
      Some(Err(err)) => Outcome::Failure(err),
    }
  }

  /// A future resolving once the task is settled, for callers on an async
  /// runtime that must not block.
  ///
  /// A pending future registers its task's waker with the handle's shared
  /// cell, and that waker stays registered until the task settles, even if
  /// the future is dropped first. Polling fresh futures from many different
  /// async tasks before settlement accumulates one waker per async task.
  pub fn settled(&self) -> Settled<'_, T, E> {
    Settled { cell: &self.cell }
  }

  /// Waits for the task and returns an owned copy of its outcome.
  pub fn join(self) -> Result<T, TaskError<E>>
  where
    T: Clone,
    E: Clone,
  {
    self.cell.wait().clone()
  }
}

impl<T, E> Clone for Handle<T, E> {
  fn clone(&self) -> Self {
    Self {
      cell: Arc::clone(&self.cell),
    }
  }
}

impl<T, E> fmt::Debug for Handle<T, E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Handle")
      .field("id", &self.cell.id())
      .field("kind", &self.cell.kind())
      .field("settled", &self.cell.is_settled())
      .finish()
  }
}

/// Future returned by [`Handle::settled`].
#[must_use = "futures do nothing unless polled"]
pub struct Settled<'a, T, E> {
  cell: &'a TaskCell<T, E>,
}

impl<'a, T, E> Future for Settled<'a, T, E> {
  type Output = Result<&'a T, &'a TaskError<E>>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let cell: &'a TaskCell<T, E> = self.cell;
    match cell.poll_settled(cx.waker()) {
      Some(result) => Poll::Ready(result.as_ref()),
      None => Poll::Pending,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn handle() -> Handle<u32, &'static str> {
    Handle::new(Arc::new(TaskCell::new(TaskId::next(), TaskKind::Immediate)))
  }

  #[test]
  fn try_get_reports_each_state() {
    let h = handle();
    assert!(h.try_get().is_pending());
    assert!(h.wait_timeout(Duration::from_millis(1)).is_none());

    h.cell.settle(Err(TaskError::Failed("bad input")));
    assert_eq!(h.try_get(), Outcome::Failure(&TaskError::Failed("bad input")));
    assert_eq!(h.wait(), Err(&TaskError::Failed("bad input")));
  }

  #[test]
  fn clones_observe_the_same_outcome() {
    let h = handle();
    let other = h.clone();
    h.cell.settle(Ok(9));
    assert_eq!(other.try_get().into_result(), Some(Ok(&9)));
    assert_eq!(other.join(), Ok(9));
    assert!(h.is_settled());
  }

  #[test]
  fn wait_timeout_accepts_any_duration() {
    let h = handle();
    h.cell.settle(Ok(4));
    assert_eq!(h.wait_timeout(Duration::MAX), Some(Ok(&4)));
  }
}
