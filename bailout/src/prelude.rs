//! Prelude module for common re-exports.
//!
//! `use bailout::prelude::*;` brings the handler, the `FailFast` trait,
//! the error types and the `ensure!` macro into scope.

// ─── Protocol ───────────────────────────────────────────────────────
pub use crate::error::{Abort, AssertionError, Class, Error, Flow, Kind};
pub use crate::failfast::FailFast;
pub use crate::handler::{Handler, HandlerBuilder};

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, Escalation, HandlerConfig, LogLevel};

// ─── Macros ─────────────────────────────────────────────────────────
pub use crate::ensure;
