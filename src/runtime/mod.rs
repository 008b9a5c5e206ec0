// src/runtime/mod.rs

//! Thread bookkeeping shared by every launcher: the live-thread WaitGroup,
//! the JoinHandle registry, exit guards and the lifecycle event bus.

pub mod event_bus;
pub mod events;
pub(crate) mod exit_guard;
pub(crate) mod registry;
pub(crate) mod waitgroup;

pub use event_bus::TaskMonitor;
pub use events::{OutcomeKind, TaskEvent, ThreadRole};

pub(crate) use event_bus::{EventBus, DEFAULT_EVENT_BUS_CAPACITY};
pub(crate) use exit_guard::ThreadExitGuard;
pub(crate) use registry::ThreadRegistry;
pub(crate) use waitgroup::WaitGroup;
