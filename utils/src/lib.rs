//! Shared utilities for the ballot workspace.

pub mod logging;
pub mod time;

pub use logging::{init_logging, try_init_logging, LogFormat, LoggingError};
pub use time::format_duration;
