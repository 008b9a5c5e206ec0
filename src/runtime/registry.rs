// src/runtime/registry.rs

use crate::runtime::ThreadRole;
use crate::task::TaskId;

use parking_lot::Mutex;
use std::thread::JoinHandle;

#[derive(Debug)]
struct TrackedThread {
  task_id: TaskId,
  role: ThreadRole,
  handle: JoinHandle<()>,
}

/// Owns the `JoinHandle` of every thread a launcher spawned until the
/// thread has finished and been joined. No launcher thread is ever detached.
#[derive(Debug, Default)]
pub(crate) struct ThreadRegistry {
  threads: Mutex<Vec<TrackedThread>>,
}

impl ThreadRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&self, task_id: TaskId, role: ThreadRole, handle: JoinHandle<()>) {
    self.threads.lock().push(TrackedThread { task_id, role, handle });
  }

  /// Joins every thread that has already finished. Returns how many were joined.
  ///
  /// Never blocks on a running thread: only handles reporting
  /// `is_finished()` are joined.
  pub fn reap(&self) -> usize {
    let finished: Vec<TrackedThread> = {
      let mut threads = self.threads.lock();
      let mut finished = Vec::new();
      let mut i = 0;
      while i < threads.len() {
        if threads[i].handle.is_finished() {
          finished.push(threads.swap_remove(i));
        } else {
          i += 1;
        }
      }
      finished
    };

    let reaped = finished.len();
    for tracked in finished {
      if tracked.handle.join().is_err() {
        // Task panics are caught inside the thread; this is a panic in the
        // launcher's own bookkeeping.
        tracing::warn!(
          task_id = %tracked.task_id,
          role = %tracked.role,
          "Launcher thread terminated by a panic"
        );
      }
    }
    if reaped > 0 {
      tracing::trace!(reaped, "Reaped finished launcher threads");
    }
    reaped
  }

  /// Joins every tracked thread, blocking on those still running.
  ///
  /// Only call once the launcher's WaitGroup is at zero; otherwise this
  /// waits on arbitrary user callables.
  pub fn join_all(&self) -> usize {
    let threads = std::mem::take(&mut *self.threads.lock());
    let joined = threads.len();
    for tracked in threads {
      if tracked.handle.join().is_err() {
        tracing::warn!(
          task_id = %tracked.task_id,
          role = %tracked.role,
          "Launcher thread terminated by a panic"
        );
      }
    }
    joined
  }

  /// Number of threads spawned but not yet reaped.
  pub fn len(&self) -> usize {
    self.threads.lock().len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::mpsc;
  use std::thread;
  use std::time::{Duration, Instant};

  #[test]
  fn reap_joins_only_finished_threads() {
    let registry = ThreadRegistry::new();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    registry.insert(TaskId::next(), ThreadRole::Worker, thread::spawn(|| {}));
    registry.insert(
      TaskId::next(),
      ThreadRole::Timer,
      thread::spawn(move || {
        let _ = release_rx.recv();
      }),
    );

    let deadline = Instant::now() + Duration::from_secs(5);
    while registry.reap() == 0 && Instant::now() < deadline {
      thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(registry.len(), 1);

    release_tx.send(()).unwrap();
    while registry.len() > 0 && Instant::now() < deadline {
      registry.reap();
      thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(registry.len(), 0);
  }
}
