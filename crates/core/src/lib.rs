//! Building blocks for settle
//!
//! This crate provides:
//! - Debounce configuration (wait window, edge selection, TOML loading)
//! - The deferred-execution capability (`Scheduler`) and its tokio backend
//! - A virtual-clock scheduler for deterministic tests
//! - The shared error type

pub mod config;
pub mod error;
pub mod manual;
pub mod timer;

// Re-exports
pub use config::{DebounceConfig, Edge, DEFAULT_WAIT};
pub use error::{Result, SettleError};
pub use manual::{ManualScheduler, ManualTimer};
pub use timer::{Scheduler, Task, TokioScheduler};
