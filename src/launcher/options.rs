// src/launcher/options.rs

use crate::runtime::DEFAULT_EVENT_BUS_CAPACITY;

/// Prefix of every launcher thread name; the full name is
/// `{prefix}-{task_id}-{worker|timer}`.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "rlaunch";

/// Configuration for a [`Launcher`](super::Launcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherOptions {
  pub thread_name_prefix: String,
  /// Stack size for launcher threads. `None` uses the platform default.
  pub stack_size: Option<usize>,
  /// Upper bound on threads alive at once (a timed task counts twice).
  /// Launches beyond it fail with `LaunchError::ResourceLimitReached`.
  /// `None` means unbounded.
  pub max_live_threads: Option<usize>,
  /// Capacity of the lifecycle event bus read by `Launcher::monitor`.
  pub event_capacity: usize,
}

impl Default for LauncherOptions {
  fn default() -> Self {
    Self {
      thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
      stack_size: None,
      max_live_threads: None,
      event_capacity: DEFAULT_EVENT_BUS_CAPACITY,
    }
  }
}

impl LauncherOptions {
  pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.thread_name_prefix = prefix.into();
    self
  }

  pub fn with_stack_size(mut self, bytes: usize) -> Self {
    self.stack_size = Some(bytes);
    self
  }

  pub fn with_max_live_threads(mut self, limit: usize) -> Self {
    self.max_live_threads = Some(limit);
    self
  }

  pub fn with_event_capacity(mut self, capacity: usize) -> Self {
    self.event_capacity = capacity.max(1);
    self
  }
}
