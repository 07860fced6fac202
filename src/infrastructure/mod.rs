//! Infrastructure concerns: configuration, logging, and external APIs.

pub mod config;
pub mod gemini;
pub mod logging;
