// src/launcher/worker.rs

//! Bodies of the two kinds of launcher thread.

use crate::error::{panic_message, TaskError};
use crate::task::{TaskCell, TaskResult};

use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

/// Invokes the callable, converting an `Err` into `TaskError::Failed` and a
/// panic into `TaskError::Panicked`.
pub(crate) fn run_task<T, E, F>(f: F) -> TaskResult<T, E>
where
  F: FnOnce() -> Result<T, E>,
{
  match panic::catch_unwind(AssertUnwindSafe(f)) {
    Ok(Ok(value)) => Ok(value),
    Ok(Err(err)) => Err(TaskError::Failed(err)),
    Err(payload) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
  }
}

/// Sleeps until `deadline` on the monotonic clock. Spurious early wake-ups
/// go back to sleep, so this never returns before `deadline`.
///
/// `None` is a deadline beyond what `Instant` can represent; it never passes.
pub(crate) fn sleep_until(deadline: Option<Instant>) {
  let Some(deadline) = deadline else {
    loop {
      thread::park();
    }
  };
  loop {
    let now = Instant::now();
    if now >= deadline {
      return;
    }
    thread::sleep(deadline - now);
  }
}

/// Timer side of a timeout race. Waits on the cell until `deadline`; if the
/// cell is still pending then, returns the `Timeout` result to settle with.
///
/// Returns `None` when the worker settled first, so the timer thread exits as
/// soon as the race is decided instead of sleeping out the full timeout.
/// Without a deadline the timer only waits for the worker.
pub(crate) fn await_deadline<T, E>(
  cell: &TaskCell<T, E>,
  timeout: Duration,
  deadline: Option<Instant>,
) -> Option<TaskResult<T, E>> {
  let Some(deadline) = deadline else {
    cell.wait();
    return None;
  };
  match cell.wait_until(deadline) {
    Some(_) => None,
    None => Some(Err(TaskError::Timeout(timeout))),
  }
}
