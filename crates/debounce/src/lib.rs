//! Debounced function wrappers
//!
//! Collapse a rapid sequence of calls into at most one effective call per
//! quiet window. Typical uses are resize, scroll, keystroke or file change
//! handlers whose side effect should run far less often than the event fires.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # async fn demo() -> settle::Result<()> {
//! // Rebuild once the user stops typing for 300ms
//! let search = settle::debounce(
//!     |query: String| println!("searching for {query}"),
//!     Some(Duration::from_millis(300)),
//!     false,
//! )?;
//!
//! search.call("r".to_string());
//! search.call("ru".to_string());
//! search.call("rust".to_string()); // only this one runs
//! # Ok(())
//! # }
//! ```

mod debounce;

pub use debounce::{debounce, Debounced};

// Re-exports
pub use settle_core::{
    DebounceConfig, Edge, ManualScheduler, ManualTimer, Result, Scheduler, SettleError, Task,
    TokioScheduler, DEFAULT_WAIT,
};
