// src/lib.rs

//! rlaunch - thread-backed task launching with settle-once handles.
//!
//! Three ways to start a task, each returning a [`Handle`]:
//!
//! * [`launch`] runs a callable on a new thread right away.
//! * [`launch_after`] runs it once a delay has elapsed.
//! * [`launch_with_timeout`] races it against a timer; whichever finishes
//!   first settles the handle and the other's result is discarded.
//!
//! A handle settles exactly once. Reading it again, from any clone, always
//! returns that first outcome.
//!
//! ```
//! use std::time::Duration;
//!
//! let quick = rlaunch::launch_with_timeout(Duration::from_secs(2), || Ok::<_, String>(7)).unwrap();
//! assert_eq!(quick.wait(), Ok(&7));
//!
//! let slow = rlaunch::launch_with_timeout(Duration::from_millis(20), || {
//!   std::thread::sleep(Duration::from_millis(200));
//!   Ok::<_, String>(42)
//! })
//! .unwrap();
//! assert!(slow.wait().unwrap_err().is_timeout());
//! ```

/// Defines the launch and task error types.
pub mod error;
/// The `Launcher`, its options and statistics.
pub mod launcher;
/// Thread bookkeeping and lifecycle events.
pub mod runtime;
/// Task identity, the outcome cell and the caller-facing `Handle`.
pub mod task;

pub use error::{LaunchError, ShutdownError, TaskError};
pub use launcher::{Launcher, LauncherOptions, LauncherStats};
pub use runtime::{OutcomeKind, TaskEvent, TaskMonitor, ThreadRole};
pub use task::{Handle, Outcome, Settled, TaskId, TaskKind};

use once_cell::sync::Lazy;
use std::time::Duration;

static DEFAULT_LAUNCHER: Lazy<Launcher> = Lazy::new(Launcher::new);

/// The process-wide launcher behind the free functions, created on first use.
pub fn default_launcher() -> &'static Launcher {
  &DEFAULT_LAUNCHER
}

/// Runs `f` on a new thread of the default launcher.
/// See [`Launcher::launch`].
pub fn launch<T, E, F>(f: F) -> Result<Handle<T, E>, LaunchError>
where
  F: FnOnce() -> Result<T, E> + Send + 'static,
  T: Send + Sync + 'static,
  E: Send + Sync + 'static,
{
  DEFAULT_LAUNCHER.launch(f)
}

/// Runs `f` on the default launcher once `delay` has elapsed.
/// See [`Launcher::launch_after`].
pub fn launch_after<T, E, F>(delay: Duration, f: F) -> Result<Handle<T, E>, LaunchError>
where
  F: FnOnce() -> Result<T, E> + Send + 'static,
  T: Send + Sync + 'static,
  E: Send + Sync + 'static,
{
  DEFAULT_LAUNCHER.launch_after(delay, f)
}

/// Races `f` against a `timeout` timer on the default launcher.
/// See [`Launcher::launch_with_timeout`].
pub fn launch_with_timeout<T, E, F>(timeout: Duration, f: F) -> Result<Handle<T, E>, LaunchError>
where
  F: FnOnce() -> Result<T, E> + Send + 'static,
  T: Send + Sync + 'static,
  E: Send + Sync + 'static,
{
  DEFAULT_LAUNCHER.launch_with_timeout(timeout, f)
}

// --- Top-Level Library Information Functions ---

const VERSION_MAJOR: i32 = 0;
const VERSION_MINOR: i32 = 1;
const VERSION_PATCH: i32 = 0;

/// Returns the library version as a tuple (major, minor, patch).
///
/// # Examples
///
/// ```
/// let (major, minor, patch) = rlaunch::version();
/// println!("rlaunch version: {}.{}.{}", major, minor, patch);
/// ```
pub fn version() -> (i32, i32, i32) {
  (VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH)
}
