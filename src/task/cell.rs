// src/task/cell.rs

//! The settle-once outcome cell shared by a task's handle, worker and timer.

use crate::error::TaskError;
use crate::task::{TaskId, TaskKind};

use once_cell::sync::OnceCell;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::Waker;
use std::time::Instant;

pub(crate) type TaskResult<T, E> = Result<T, TaskError<E>>;

/// Jointly owned (via `Arc`) by every `Handle` clone and by the threads
/// working on the task.
///
/// Writers go through `settle`, which first claims `claimed`. Exactly one
/// claim ever succeeds, so `outcome` is written at most once and losers never
/// touch it.
pub(crate) struct TaskCell<T, E> {
  id: TaskId,
  kind: TaskKind,
  claimed: AtomicBool,
  outcome: OnceCell<TaskResult<T, E>>,
  // Guards the condvar and the async waiters registered by `Settled`.
  waiters: Mutex<Vec<Waker>>,
  settled_cv: Condvar,
}

impl<T, E> TaskCell<T, E> {
  pub(crate) fn new(id: TaskId, kind: TaskKind) -> Self {
    Self {
      id,
      kind,
      claimed: AtomicBool::new(false),
      outcome: OnceCell::new(),
      waiters: Mutex::new(Vec::new()),
      settled_cv: Condvar::new(),
    }
  }

  pub(crate) fn id(&self) -> TaskId {
    self.id
  }

  pub(crate) fn kind(&self) -> TaskKind {
    self.kind
  }

  /// Attempts the unclaimed -> claimed transition. Succeeds for exactly one caller.
  fn claim(&self) -> bool {
    self
      .claimed
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }

  /// Settles the cell with `result` if this caller wins the claim.
  ///
  /// Returns `false`, without touching the outcome, when another activity
  /// already claimed the cell. That is the expected fate of a timeout race
  /// loser and is not an error.
  pub(crate) fn settle(&self, result: TaskResult<T, E>) -> bool {
    if !self.claim() {
      tracing::trace!(task_id = %self.id, "Settlement claim lost; discarding result");
      return false;
    }

    if self.outcome.set(result).is_err() {
      // Only the claim winner reaches this point.
      tracing::error!(task_id = %self.id, "Outcome slot already filled after a successful claim");
      return false;
    }

    // Taking the lock after publishing the outcome means a waiter that checked
    // `outcome` under the lock and found it empty is already parked on the
    // condvar (or registered its waker) and will see this notification.
    let wakers = {
      let mut waiters = self.waiters.lock();
      self.settled_cv.notify_all();
      std::mem::take(&mut *waiters)
    };
    for waker in wakers {
      waker.wake();
    }
    true
  }

  pub(crate) fn get(&self) -> Option<&TaskResult<T, E>> {
    self.outcome.get()
  }

  pub(crate) fn is_settled(&self) -> bool {
    self.outcome.get().is_some()
  }

  /// Blocks the calling thread until the cell is settled.
  pub(crate) fn wait(&self) -> &TaskResult<T, E> {
    if let Some(result) = self.outcome.get() {
      return result;
    }
    let mut guard = self.waiters.lock();
    loop {
      if let Some(result) = self.outcome.get() {
        return result;
      }
      self.settled_cv.wait(&mut guard);
    }
  }

  /// Blocks until the cell is settled or `deadline` passes, whichever is first.
  pub(crate) fn wait_until(&self, deadline: Instant) -> Option<&TaskResult<T, E>> {
    if let Some(result) = self.outcome.get() {
      return Some(result);
    }
    let mut guard = self.waiters.lock();
    loop {
      if let Some(result) = self.outcome.get() {
        return Some(result);
      }
      if self.settled_cv.wait_until(&mut guard, deadline).timed_out() {
        return self.outcome.get();
      }
    }
  }

  /// Returns the outcome if settled, otherwise registers `waker` to be woken
  /// on settlement.
  pub(crate) fn poll_settled(&self, waker: &Waker) -> Option<&TaskResult<T, E>> {
    if let Some(result) = self.outcome.get() {
      return Some(result);
    }
    let mut waiters = self.waiters.lock();
    if let Some(result) = self.outcome.get() {
      return Some(result);
    }
    if !waiters.iter().any(|w| w.will_wake(waker)) {
      waiters.push(waker.clone());
    }
    None
  }
}
