// src/runtime/exit_guard.rs

use tracing::debug;

use crate::runtime::{EventBus, TaskEvent, ThreadRole, WaitGroup};
use crate::task::TaskId;

/// Lives on the stack of every launcher thread and releases the thread's
/// WaitGroup slot when dropped, including when the thread unwinds.
pub(crate) struct ThreadExitGuard {
  threads: WaitGroup,
  event_bus: EventBus,
  task_id: TaskId,
  role: ThreadRole,
}

impl ThreadExitGuard {
  pub fn new(threads: WaitGroup, event_bus: EventBus, task_id: TaskId, role: ThreadRole) -> Self {
    Self {
      threads,
      event_bus,
      task_id,
      role,
    }
  }
}

impl Drop for ThreadExitGuard {
  fn drop(&mut self) {
    if std::thread::panicking() {
      debug!(task_id = %self.task_id, role = %self.role, "Launcher thread exiting by unwinding");
    }
    self.threads.done();
    self.event_bus.publish_forget(TaskEvent::ThreadExited {
      task_id: self.task_id,
      role: self.role,
    });
  }
}
