use crate::cli::BurstArgs;
use crate::commands::SHUTDOWN_GRACE;

use anyhow::{Context, Result};
use rand::Rng;
use rlaunch::{LaunchError, Launcher, LauncherOptions};
use std::thread;
use std::time::{Duration, Instant};

pub fn run(args: BurstArgs) -> Result<()> {
  let mut options = LauncherOptions::default().with_thread_name_prefix("burst");
  if let Some(limit) = args.max_threads {
    options = options.with_max_live_threads(limit);
  }
  let launcher = Launcher::with_options(options);
  let timeout = Duration::from_millis(args.timeout_ms);
  let mut rng = rand::rng();

  let start = Instant::now();
  let mut handles = Vec::with_capacity(args.tasks);
  let mut rejected = 0usize;
  for _ in 0..args.tasks {
    let work = Duration::from_millis(rng.random_range(0..=args.max_work_ms));
    let launched = launcher.launch_with_timeout(timeout, move || {
      thread::sleep(work);
      Ok::<_, String>(work)
    });
    match launched {
      Ok(handle) => handles.push(handle),
      Err(LaunchError::ResourceLimitReached { .. }) => rejected += 1,
      Err(e) => return Err(e).context("Failed to launch job"),
    }
  }

  for handle in &handles {
    let _ = handle.wait();
  }
  let settled_in = start.elapsed();

  launcher
    .shutdown(SHUTDOWN_GRACE)
    .context("Abandoned jobs did not finish")?;

  let stats = launcher.stats();
  println!("launched:    {}", stats.launched);
  println!("rejected:    {}", rejected);
  println!("completed:   {}", stats.completed);
  println!("timed out:   {}", stats.timed_out);
  println!("claims lost: {}", stats.claims_lost);
  println!("all settled in {:?}", settled_in);
  Ok(())
}
