// tests/lifecycle.rs

use rand::Rng;
use rlaunch::{LaunchError, Launcher, LauncherOptions, OutcomeKind, ShutdownError, TaskEvent, TaskKind, ThreadRole};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

mod common;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn monitor_reports_launch_settlement_and_exit() -> Result<(), LaunchError> {
  let launcher = common::test_launcher();
  let mut monitor = launcher.monitor();

  let handle = launcher.launch(|| Ok::<_, ()>(1))?;
  handle.wait().unwrap();
  let task_id = handle.id();
  assert!(launcher.shutdown(SHUTDOWN_GRACE).is_ok());

  let mut events = Vec::new();
  while let Ok(event) = monitor.try_recv() {
    events.push(event);
  }
  let position = |wanted: &TaskEvent| events.iter().position(|e| e == wanted);
  let launched = position(&TaskEvent::Launched {
    task_id,
    kind: TaskKind::Immediate,
  })
  .expect("Launched event");
  let settled = position(&TaskEvent::Settled {
    task_id,
    role: ThreadRole::Worker,
    outcome: OutcomeKind::Value,
  })
  .expect("Settled event");
  let exited = position(&TaskEvent::ThreadExited {
    task_id,
    role: ThreadRole::Worker,
  })
  .expect("ThreadExited event");
  assert!(launched < settled, "Launched must precede Settled: {:?}", events);
  assert!(settled < exited, "Settled must precede ThreadExited: {:?}", events);
  assert!(events.contains(&TaskEvent::ShutdownInitiated));
  Ok(())
}

#[test]
fn settled_event_names_the_winning_role() -> Result<(), LaunchError> {
  let launcher = common::test_launcher();
  let mut monitor = launcher.monitor();

  let (release_tx, release_rx) = mpsc::channel::<()>();
  let handle = launcher.launch_with_timeout(Duration::from_millis(20), move || {
    let _ = release_rx.recv();
    Ok::<_, ()>(())
  })?;
  assert!(handle.wait().unwrap_err().is_timeout());

  let settled = common::wait_for_event(&mut monitor, EVENT_TIMEOUT, |e| matches!(e, TaskEvent::Settled { .. }));
  assert_eq!(
    settled,
    Ok(TaskEvent::Settled {
      task_id: handle.id(),
      role: ThreadRole::Timer,
      outcome: OutcomeKind::TimedOut,
    })
  );

  release_tx.send(()).unwrap();
  assert!(launcher.shutdown(SHUTDOWN_GRACE).is_ok());
  Ok(())
}

#[test]
fn shutdown_joins_every_thread() -> Result<(), LaunchError> {
  let launcher = common::test_launcher();
  let handles: Vec<_> = (0..8u64)
    .map(|i| {
      launcher.launch_with_timeout(Duration::from_secs(5), move || {
        thread::sleep(Duration::from_millis(5 * i));
        Ok::<_, ()>(i)
      })
    })
    .collect::<Result<_, _>>()?;

  assert!(launcher.shutdown(SHUTDOWN_GRACE).is_ok());
  assert!(launcher.is_shutdown());

  let stats = launcher.stats();
  assert_eq!(stats.live_threads, 0);
  assert_eq!(stats.unreaped_threads, 0);
  for (i, handle) in handles.iter().enumerate() {
    assert_eq!(handle.wait(), Ok(&(i as u64)));
  }
  Ok(())
}

#[test]
fn shutdown_reports_stragglers_and_can_be_retried() -> Result<(), LaunchError> {
  let launcher = common::test_launcher();
  let mut monitor = launcher.monitor();
  let (release_tx, release_rx) = mpsc::channel::<()>();
  let handle = launcher.launch(move || release_rx.recv().map_err(|e| e.to_string()))?;

  assert_eq!(
    launcher.shutdown(Duration::from_millis(20)),
    Err(ShutdownError::GracePeriodElapsed { still_running: 1 })
  );
  assert_eq!(
    common::wait_for_event(&mut monitor, EVENT_TIMEOUT, |e| matches!(e, TaskEvent::ShutdownInitiated)),
    Ok(TaskEvent::ShutdownInitiated)
  );
  assert!(matches!(launcher.launch(|| Ok::<_, ()>(())), Err(LaunchError::ShuttingDown)));

  // The straggler is still owned and its handle still settles.
  release_tx.send(()).unwrap();
  assert_eq!(handle.wait(), Ok(&()));
  assert!(launcher.shutdown(SHUTDOWN_GRACE).is_ok());
  assert_eq!(launcher.live_threads(), 0);
  Ok(())
}

#[test]
fn finished_threads_are_reaped_on_later_launches() -> Result<(), LaunchError> {
  let launcher = common::test_launcher();
  for _ in 0..4 {
    launcher.launch(|| Ok::<_, ()>(()))?.wait().unwrap();
  }
  assert!(common::eventually(EVENT_TIMEOUT, || launcher.live_threads() == 0));
  assert!(common::eventually(EVENT_TIMEOUT, || {
    launcher.reap();
    launcher.stats().unreaped_threads == 0
  }));
  Ok(())
}

#[test]
fn dropping_handles_early_is_safe() -> Result<(), LaunchError> {
  const TASKS: usize = 300;
  let launcher = Launcher::with_options(LauncherOptions::default().with_thread_name_prefix("early-drop"));
  common::setup_tracing();
  let completed = Arc::new(AtomicUsize::new(0));
  let mut rng = rand::rng();
  let mut kept = Vec::new();

  for i in 0..TASKS {
    let work = Duration::from_micros(rng.random_range(0..2_000));
    let completed = completed.clone();
    let task = move || {
      thread::sleep(work);
      completed.fetch_add(1, Ordering::SeqCst);
      Ok::<_, String>(vec![i; 16])
    };

    let handle = match i % 3 {
      0 => launcher.launch(task)?,
      1 => launcher.launch_after(Duration::from_micros(rng.random_range(0..1_000)), task)?,
      _ => launcher.launch_with_timeout(Duration::from_micros(rng.random_range(0..2_000)), task)?,
    };

    if rng.random_bool(0.5) {
      drop(handle);
    } else {
      kept.push(handle);
    }
  }

  assert!(launcher.shutdown(Duration::from_secs(30)).is_ok());
  assert_eq!(completed.load(Ordering::SeqCst), TASKS);
  assert_eq!(launcher.stats().settled(), TASKS as u64);

  for handle in kept {
    match handle.wait() {
      Ok(v) => assert_eq!(v.len(), 16),
      Err(e) => assert!(e.is_timeout(), "unexpected failure {:?}", e),
    }
  }
  Ok(())
}

#[test]
fn launched_always_precedes_settled() -> Result<(), LaunchError> {
  const TASKS: usize = 300;
  common::setup_tracing();
  let launcher = Launcher::with_options(LauncherOptions::default().with_event_capacity(TASKS * 8));
  let mut monitor = launcher.monitor();

  let mut handles = Vec::with_capacity(TASKS);
  for i in 0..TASKS {
    handles.push(launcher.launch(move || Ok::<_, ()>(i))?);
  }
  for handle in &handles {
    handle.wait().unwrap();
  }
  assert!(launcher.shutdown(SHUTDOWN_GRACE).is_ok());

  let mut launched = std::collections::HashSet::new();
  let mut settled = 0;
  while let Ok(event) = monitor.try_recv() {
    match event {
      TaskEvent::Launched { task_id, .. } => {
        launched.insert(task_id);
      }
      TaskEvent::Settled { task_id, .. } => {
        assert!(launched.contains(&task_id), "{} settled before it was launched", task_id);
        settled += 1;
      }
      _ => {}
    }
  }
  assert_eq!(settled, TASKS);
  Ok(())
}

#[test]
fn spawn_failure_is_reported_and_releases_slots() {
  common::setup_tracing();
  let launcher = Launcher::with_options(LauncherOptions::default().with_stack_size(usize::MAX / 2));
  let mut monitor = launcher.monitor();

  let immediate = launcher.launch(|| Ok::<_, ()>(1));
  assert!(matches!(immediate, Err(LaunchError::Spawn(_))));
  let timed = launcher.launch_with_timeout(Duration::from_secs(1), || Ok::<_, ()>(1));
  assert!(matches!(timed, Err(LaunchError::Spawn(_))));

  assert_eq!(launcher.live_threads(), 0);
  assert_eq!(launcher.stats().launched, 0);
  let aborted = common::wait_for_event(&mut monitor, EVENT_TIMEOUT, |e| {
    matches!(e, TaskEvent::LaunchAborted { .. })
  });
  assert!(aborted.is_ok());
  assert!(launcher.shutdown(SHUTDOWN_GRACE).is_ok());
}

#[test]
fn unrepresentable_delay_never_runs_and_keeps_its_thread() -> Result<(), LaunchError> {
  let launcher = common::test_launcher();
  let ran = Arc::new(AtomicUsize::new(0));
  let handle = {
    let ran = Arc::clone(&ran);
    launcher.launch_after(Duration::MAX, move || {
      ran.fetch_add(1, Ordering::SeqCst);
      Ok::<_, ()>(())
    })?
  };

  assert!(handle.wait_timeout(Duration::from_millis(50)).is_none());
  assert!(handle.try_get().is_pending());
  assert_eq!(ran.load(Ordering::SeqCst), 0);
  assert_eq!(
    launcher.shutdown(Duration::from_millis(50)),
    Err(ShutdownError::GracePeriodElapsed { still_running: 1 })
  );
  Ok(())
}
