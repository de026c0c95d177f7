//! # FailFast Trait
//!
//! Gives any caller-defined unit the fail-fast primitives by exposing the
//! [`Handler`] it embeds.
//!
//! # Design
//!
//! The trait has a single required method. Every primitive is a provided
//! method delegating to the embedded handler, so implementors only point at
//! their field:
//!
//! ```rust
//! use bailout::{Error, FailFast, Flow, Handler, Kind};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("{0}")]
//! struct ParseError(String);
//!
//! struct Parser {
//!     handler: Handler,
//! }
//!
//! impl FailFast for Parser {
//!     fn handler(&self) -> &Handler {
//!         &self.handler
//!     }
//! }
//!
//! impl Parser {
//!     fn parse(&self, input: &str) -> Result<u16, Error> {
//!         self.catch(self.parse_port(input), &[Kind::of::<ParseError>()])
//!     }
//!
//!     fn parse_port(&self, input: &str) -> Flow<u16> {
//!         self.assert(!input.is_empty(), ParseError("empty input".into()))?;
//!         let port: u16 = self.must(input.parse::<u16>().map_err(|e| ParseError(e.to_string())))?;
//!         self.expect(port >= 1024, "privileged port")?;
//!         Ok(port)
//!     }
//! }
//!
//! let parser = Parser { handler: Handler::new() };
//! assert_eq!(parser.parse("8080").unwrap(), 8080);
//! assert!(parser.parse("").unwrap_err().is::<ParseError>());
//! assert!(parser.parse("80").unwrap_err().is_assertion());
//! ```

use crate::error::{Abort, Error, Flow, Kind};
use crate::handler::Handler;
use std::fmt;

/// Fail-fast primitives for types embedding a [`Handler`].
pub trait FailFast {
    /// The embedded handler.
    fn handler(&self) -> &Handler;

    /// See [`Handler::must`].
    fn must<T, E>(&self, result: Result<T, E>) -> Flow<T>
    where
        E: Into<Error>,
    {
        self.handler().must(result)
    }

    /// See [`Handler::must_none`].
    fn must_none<E>(&self, error: Option<E>) -> Flow<()>
    where
        E: Into<Error>,
    {
        self.handler().must_none(error)
    }

    /// See [`Handler::assert`].
    fn assert<E>(&self, cond: bool, error: E) -> Flow<()>
    where
        E: Into<Error>,
    {
        self.handler().assert(cond, error)
    }

    /// See [`Handler::assert_fmt`].
    fn assert_fmt(&self, cond: bool, args: fmt::Arguments<'_>) -> Flow<()> {
        self.handler().assert_fmt(cond, args)
    }

    /// See [`Handler::expect`].
    fn expect(&self, cond: bool, message: impl Into<String>) -> Flow<()> {
        self.handler().expect(cond, message)
    }

    /// See [`Handler::catch`].
    fn catch<T>(&self, flow: Flow<T>, accepted: &[Kind]) -> Result<T, Error> {
        self.handler().catch(flow, accepted)
    }

    /// See [`Handler::resolve`].
    fn resolve<T>(&self, flow: Flow<T>, accepted: &[Kind]) -> Result<Result<T, Error>, Abort> {
        self.handler().resolve(flow, accepted)
    }
}

impl FailFast for Handler {
    fn handler(&self) -> &Handler {
        self
    }
}
