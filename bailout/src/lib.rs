//! bailout
//!
//! Fail-fast error propagation for multi-step validation, parsing and
//! processing routines. Nested steps abort eagerly on failure and a single
//! boundary per unit turns the abort back into a typed error result.
//!
//! # Module Structure
//!
//! - [`error`] - `Error`, `Kind`, `Class`, `Abort` and `AssertionError`
//! - [`handler`] - The `Handler`: abort primitives and the unit boundary
//! - [`failfast`] - `FailFast` trait for types embedding a handler
//! - [`global`] - Process-wide variants backed by one installed handler
//! - [`config`] - Handler configuration and TOML loading
//! - [`logging`] - Tracing subscriber setup
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use bailout::prelude::*;
//!
//! let handler = Handler::new();
//! let flow = handler.must("not a number".parse::<u32>());
//! let err = handler.catch(flow, &[]).unwrap_err();
//! assert_eq!(err.message(), "invalid digit found in string");
//! ```

pub mod config;
pub mod error;
pub mod failfast;
pub mod global;
pub mod handler;
pub mod logging;
pub mod prelude;

mod macros;

pub use error::{Abort, AssertionError, Class, Error, Flow, Kind};
pub use failfast::FailFast;
pub use handler::{AssertionFactory, Handler, HandlerBuilder};
