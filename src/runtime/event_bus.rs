// src/runtime/event_bus.rs

use super::events::TaskEvent;
use tokio::sync::broadcast::{self, error::SendError, Receiver, Sender};

pub(crate) const DEFAULT_EVENT_BUS_CAPACITY: usize = 256;

/// Receiving side of a launcher's event bus.
///
/// Use `blocking_recv` from plain threads or `recv().await` from async code.
/// A receiver that falls more than the bus capacity behind observes
/// `RecvError::Lagged` and skips ahead.
pub type TaskMonitor = Receiver<TaskEvent>;

/// Broadcasts `TaskEvent`s to every current subscriber.
/// Internally uses tokio::sync::broadcast, which works without a runtime.
#[derive(Debug, Clone)]
pub(crate) struct EventBus {
  sender: Sender<TaskEvent>,
}

impl EventBus {
  pub fn with_capacity(capacity: usize) -> Self {
    let (sender, _) = broadcast::channel(capacity.max(1));
    tracing::debug!(capacity = capacity.max(1), "Created new EventBus with capacity");
    Self { sender }
  }

  /// Publishes an event onto the bus.
  ///
  /// Returns the number of receivers the event was sent to, or an error if
  /// there are none. Having no subscribers is the common case.
  pub fn publish(&self, event: TaskEvent) -> Result<usize, SendError<TaskEvent>> {
    tracing::trace!(event = ?event, "Publishing event");
    self.sender.send(event)
  }

  /// Same as `publish`, for call sites that do not care who is listening.
  pub fn publish_forget(&self, event: TaskEvent) {
    let _ = self.publish(event);
  }

  pub fn subscribe(&self) -> TaskMonitor {
    tracing::trace!("Creating new event bus subscription");
    self.sender.subscribe()
  }

  pub fn subscriber_count(&self) -> usize {
    self.sender.receiver_count()
  }
}

impl Default for EventBus {
  fn default() -> Self {
    Self::with_capacity(DEFAULT_EVENT_BUS_CAPACITY)
  }
}
