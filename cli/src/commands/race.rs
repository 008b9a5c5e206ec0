use crate::cli::RaceArgs;
use crate::commands::SHUTDOWN_GRACE;

use anyhow::{Context, Result};
use rlaunch::{Launcher, TaskError};
use std::thread;
use std::time::{Duration, Instant};

pub fn run(args: RaceArgs) -> Result<()> {
  let launcher = Launcher::new();
  let timeout = Duration::from_millis(args.timeout_ms);
  let work = Duration::from_millis(args.work_ms);
  let (value, fail) = (args.value, args.fail);

  let start = Instant::now();
  let handle = launcher
    .launch_with_timeout(timeout, move || {
      thread::sleep(work);
      if fail {
        Err(format!("job failed after {:?}", work))
      } else {
        Ok(value)
      }
    })
    .context("Failed to launch job")?;

  match handle.wait() {
    Ok(v) => println!("value {} after {:?}", v, start.elapsed()),
    Err(TaskError::Timeout(t)) => println!("timed out after {:?} (limit {:?})", start.elapsed(), t),
    Err(e) => println!("{} after {:?}", e, start.elapsed()),
  }

  // The abandoned job, if any, still owns a thread; wait for it before exiting.
  launcher
    .shutdown(SHUTDOWN_GRACE)
    .context("Abandoned job did not finish")?;
  Ok(())
}
