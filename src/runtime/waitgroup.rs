// src/runtime/waitgroup.rs

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A blocking WaitGroup, similar to Go's `sync.WaitGroup`, counting the
/// launcher's live threads.
///
/// Slots are reserved (`add`/`try_add`) before a thread is spawned and
/// released (`done`) when it exits, so `wait_timeout` observes every thread
/// that was ever admitted.
#[derive(Debug, Clone)]
pub(crate) struct WaitGroup {
  inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
  count: AtomicUsize,
  lock: Mutex<()>,
  zero: Condvar,
}

impl WaitGroup {
  pub fn new() -> Self {
    Self {
      inner: Arc::new(Inner {
        count: AtomicUsize::new(0),
        lock: Mutex::new(()),
        zero: Condvar::new(),
      }),
    }
  }

  pub fn add(&self, delta: usize) {
    if delta == 0 {
      return;
    }
    let old_count = self.inner.count.fetch_add(delta, Ordering::AcqRel);
    if old_count == 0 {
      tracing::trace!(delta, new_count = delta, "WaitGroup count increased from zero");
    }
  }

  /// Adds `delta` unless the count would exceed `limit`. Returns whether the
  /// slots were reserved.
  pub fn try_add(&self, delta: usize, limit: usize) -> bool {
    self
      .inner
      .count
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
        current.checked_add(delta).filter(|next| *next <= limit)
      })
      .is_ok()
  }

  /// Decrements the counter by one, waking waiters when it reaches zero.
  ///
  /// Panics if the counter would drop below zero.
  pub fn done(&self) {
    let old_count = self.inner.count.fetch_sub(1, Ordering::AcqRel);

    if old_count == 0 {
      self.inner.count.fetch_add(1, Ordering::Relaxed);
      panic!("WaitGroup::done() called when count was already zero!");
    } else if old_count == 1 {
      let _guard = self.inner.lock.lock();
      self.inner.zero.notify_all();
      tracing::trace!("WaitGroup count reached zero, notifying waiters");
    }
  }

  /// Blocks until the counter is zero or `timeout` elapses. Returns `true`
  /// if the counter reached zero.
  pub fn wait_timeout(&self, timeout: Duration) -> bool {
    if self.inner.count.load(Ordering::Acquire) == 0 {
      return true;
    }
    let deadline = Instant::now().checked_add(timeout);
    let mut guard = self.inner.lock.lock();
    loop {
      if self.inner.count.load(Ordering::Acquire) == 0 {
        return true;
      }
      let Some(deadline) = deadline else {
        self.inner.zero.wait(&mut guard);
        continue;
      };
      if self.inner.zero.wait_until(&mut guard, deadline).timed_out() {
        return self.inner.count.load(Ordering::Acquire) == 0;
      }
    }
  }

  pub fn get_count(&self) -> usize {
    self.inner.count.load(Ordering::Acquire)
  }
}
