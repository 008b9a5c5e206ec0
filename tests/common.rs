// tests/common.rs
#![allow(dead_code)] // Not every test binary uses every helper

use rlaunch::{Launcher, LauncherOptions, TaskEvent, TaskMonitor};
use tokio::sync::broadcast::error::TryRecvError;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use std::sync::Once;
use std::time::{Duration, Instant};

static TRACING_INIT: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
/// Override the filter with RUST_LOG.
pub fn setup_tracing() {
  TRACING_INIT.call_once(|| {
    let default_filter = "rlaunch=debug,info";
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = FmtSubscriber::builder()
      .with_env_filter(env_filter)
      .with_target(true)
      .with_thread_names(true)
      .with_line_number(true)
      .with_test_writer()
      .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing subscriber");
  });
}

/// A fresh launcher per test, so statistics and events are not shared.
pub fn test_launcher() -> Launcher {
  setup_tracing();
  Launcher::with_options(LauncherOptions::default().with_thread_name_prefix("rlaunch-test"))
}

/// Receives events until `check` matches or `timeout` elapses.
pub fn wait_for_event(
  monitor: &mut TaskMonitor,
  timeout: Duration,
  check: impl Fn(&TaskEvent) -> bool,
) -> Result<TaskEvent, String> {
  let deadline = Instant::now() + timeout;
  loop {
    if Instant::now() > deadline {
      return Err(format!("No matching event after {:?}", timeout));
    }
    match monitor.try_recv() {
      Ok(event) if check(&event) => return Ok(event),
      Ok(_) => {}
      Err(TryRecvError::Empty) => std::thread::sleep(Duration::from_millis(1)),
      Err(e) => return Err(format!("Monitor error: {}", e)),
    }
  }
}

/// Polls `condition` every millisecond until it holds or `timeout` elapses.
pub fn eventually(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
  let deadline = Instant::now() + timeout;
  while Instant::now() < deadline {
    if condition() {
      return true;
    }
    std::thread::sleep(Duration::from_millis(1));
  }
  condition()
}
