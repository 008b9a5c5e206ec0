// src/task/mod.rs

//! Task identity, the settle-once outcome cell, and the caller-facing handle.

pub(crate) mod cell;
pub mod handle;
pub mod id;

pub(crate) use cell::{TaskCell, TaskResult};
pub use handle::{Handle, Outcome, Settled};
pub use id::{TaskId, TaskKind};
