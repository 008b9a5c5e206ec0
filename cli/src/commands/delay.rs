use crate::cli::DelayArgs;
use crate::commands::SHUTDOWN_GRACE;

use anyhow::{Context, Result};
use rlaunch::Launcher;
use std::time::{Duration, Instant};

pub fn run(args: DelayArgs) -> Result<()> {
  let launcher = Launcher::new();
  let delay = Duration::from_millis(args.delay_ms);

  let requested = Instant::now();
  let handle = launcher
    .launch_after(delay, move || Ok::<_, String>(requested.elapsed()))
    .context("Failed to launch delayed job")?;
  println!("launch_after returned in {:?}", requested.elapsed());

  match handle.wait() {
    Ok(started) => println!("job started {:?} after request (delay {:?})", started, delay),
    Err(e) => println!("delayed job: {}", e),
  }

  launcher.shutdown(SHUTDOWN_GRACE).context("Delayed job did not exit")?;
  Ok(())
}
