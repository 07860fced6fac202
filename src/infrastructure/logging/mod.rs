//! Logging initialization built on tracing.

pub mod logger;

pub use logger::init_logging;
