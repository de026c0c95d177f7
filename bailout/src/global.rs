//! Process-wide fail-fast functions.
//!
//! Every function here delegates to one shared [`Handler`]. Install it
//! once at process start with [`install`]; if nothing was installed, the
//! first use falls back to [`Handler::process_default`], which terminates
//! the process on aborts no boundary converts.
//!
//! ```rust,no_run
//! use bailout::config::{Escalation, HandlerConfig};
//! use bailout::{global, Handler};
//!
//! let config = HandlerConfig {
//!     escalation: Escalation::Exit,
//!     exit_code: 70,
//!     ..HandlerConfig::default()
//! };
//! global::install(Handler::from_config(&config)?)?;
//!
//! let port = global::catch(global::must("8080".parse::<u16>()), &[]);
//! assert_eq!(port.ok(), Some(8080));
//! # Ok::<(), bailout::config::ConfigError>(())
//! ```

use crate::config::ConfigError;
use crate::error::{Abort, Error, Flow, Kind};
use crate::handler::Handler;
use std::fmt;
use std::sync::OnceLock;
use tracing::info;

static PROCESS_HANDLER: OnceLock<Handler> = OnceLock::new();

/// Install the process-wide handler.
///
/// # Errors
///
/// Returns `ConfigError::AlreadyInstalled` if a handler was installed
/// before, or if a process-wide function already fell back to the default.
pub fn install(handler: Handler) -> Result<(), ConfigError> {
    let summary = format!("{handler:?}");
    PROCESS_HANDLER
        .set(handler)
        .map_err(|_| ConfigError::AlreadyInstalled)?;
    info!("process-wide handler installed: {summary}");
    Ok(())
}

/// The process-wide handler.
pub fn handler() -> &'static Handler {
    PROCESS_HANDLER.get_or_init(Handler::process_default)
}

/// See [`Handler::must`].
pub fn must<T, E>(result: Result<T, E>) -> Flow<T>
where
    E: Into<Error>,
{
    handler().must(result)
}

/// See [`Handler::must_none`].
pub fn must_none<E>(error: Option<E>) -> Flow<()>
where
    E: Into<Error>,
{
    handler().must_none(error)
}

/// See [`Handler::assert`].
pub fn assert<E>(cond: bool, error: E) -> Flow<()>
where
    E: Into<Error>,
{
    handler().assert(cond, error)
}

/// See [`Handler::assert_fmt`].
pub fn assert_fmt(cond: bool, args: fmt::Arguments<'_>) -> Flow<()> {
    handler().assert_fmt(cond, args)
}

/// See [`Handler::expect`].
pub fn expect(cond: bool, message: impl Into<String>) -> Flow<()> {
    handler().expect(cond, message)
}

/// See [`Handler::catch`].
pub fn catch<T>(flow: Flow<T>, accepted: &[Kind]) -> Result<T, Error> {
    handler().catch(flow, accepted)
}

/// See [`Handler::resolve`].
pub fn resolve<T>(flow: Flow<T>, accepted: &[Kind]) -> Result<Result<T, Error>, Abort> {
    handler().resolve(flow, accepted)
}
