//! Shared utilities for stock-analyzer
//!
//! Currently this is the tracing setup shared by every binary in the
//! workspace.

pub mod logging;

pub use logging::{DEFAULT_DIRECTIVE, init_tracing};
