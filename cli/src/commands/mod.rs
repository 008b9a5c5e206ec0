pub mod burst;
pub mod delay;
pub mod race;

use std::time::Duration;

/// How long commands wait for abandoned jobs before exiting.
pub(crate) const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);
