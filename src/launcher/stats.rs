// src/launcher/stats.rs

use crate::runtime::OutcomeKind;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time counters for a launcher. Counts are cumulative since the
/// launcher was created, except `live_threads` and `unreaped_threads`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LauncherStats {
  pub launched: u64,
  pub completed: u64,
  pub failed: u64,
  pub panicked: u64,
  pub timed_out: u64,
  /// Settlement attempts that lost the claim (timeout race losers).
  pub claims_lost: u64,
  /// Threads admitted and not yet exited.
  pub live_threads: usize,
  /// Threads spawned whose `JoinHandle` has not been joined yet.
  pub unreaped_threads: usize,
}

impl LauncherStats {
  pub fn settled(&self) -> u64 {
    self.completed + self.failed + self.panicked + self.timed_out
  }
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
  launched: AtomicU64,
  completed: AtomicU64,
  failed: AtomicU64,
  panicked: AtomicU64,
  timed_out: AtomicU64,
  claims_lost: AtomicU64,
}

impl StatsCounters {
  pub fn record_launch(&self) {
    self.launched.fetch_add(1, Ordering::Relaxed);
  }

  pub fn record_launch_aborted(&self) {
    self.launched.fetch_sub(1, Ordering::Relaxed);
  }

  pub fn record_settled(&self, outcome: OutcomeKind) {
    let counter = match outcome {
      OutcomeKind::Value => &self.completed,
      OutcomeKind::Failed => &self.failed,
      OutcomeKind::Panicked => &self.panicked,
      OutcomeKind::TimedOut => &self.timed_out,
    };
    counter.fetch_add(1, Ordering::Relaxed);
  }

  pub fn record_claim_lost(&self) {
    self.claims_lost.fetch_add(1, Ordering::Relaxed);
  }

  pub fn snapshot(&self, live_threads: usize, unreaped_threads: usize) -> LauncherStats {
    LauncherStats {
      launched: self.launched.load(Ordering::Relaxed),
      completed: self.completed.load(Ordering::Relaxed),
      failed: self.failed.load(Ordering::Relaxed),
      panicked: self.panicked.load(Ordering::Relaxed),
      timed_out: self.timed_out.load(Ordering::Relaxed),
      claims_lost: self.claims_lost.load(Ordering::Relaxed),
      live_threads,
      unreaped_threads,
    }
  }
}
