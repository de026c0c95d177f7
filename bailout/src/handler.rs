//! The fail-fast handler: abort primitives and the unit boundary.
//!
//! A unit is any function whose body returns [`Flow<T>`]. Inside the body
//! the abort primitives ([`Handler::must`], [`Handler::assert`],
//! [`Handler::assert_fmt`], ...) turn failures into an in-flight
//! [`Abort`] that `?` carries to the end of the body. The boundary
//! ([`Handler::catch`] or [`Handler::resolve`]) then runs exactly once per
//! unit invocation and decides whether the abort becomes a returned
//! [`Error`] or keeps propagating.
//!
//! # Boundary rules
//!
//! 1. No abort in flight: the value is returned unchanged.
//! 2. [`Abort::Foreign`]: re-raised.
//! 3. [`Class::Fault`](crate::Class::Fault): re-raised, whatever the
//!    accepted kinds.
//! 4. No accepted kinds: every other error is converted.
//! 5. Otherwise an [`AssertionError`] is always converted, any other error
//!    only when its [`Kind`] is in the accepted list.
//!
//! # Example
//!
//! ```rust
//! use bailout::{ensure, Flow, Handler, Kind};
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("{0}")]
//! struct LimitError(String);
//!
//! fn limits(handler: &Handler, raw: &str) -> Flow<u32> {
//!     let limit: u32 = handler.must(raw.parse())?;
//!     handler.assert(limit > 0, LimitError("limit must be > 0".into()))?;
//!     ensure!(handler, limit <= 100, "limit {limit} is above 100")?;
//!     Ok(limit)
//! }
//!
//! let handler = Handler::new();
//! let err = handler.catch(limits(&handler, "0"), &[]).unwrap_err();
//! assert_eq!(err.to_string(), "limit must be > 0");
//!
//! let err = handler
//!     .catch(limits(&handler, "500"), &[Kind::of::<LimitError>()])
//!     .unwrap_err();
//! assert!(err.is_assertion());
//! ```

use crate::config::{ConfigError, DEFAULT_EXIT_CODE, Escalation, HandlerConfig};
use crate::error::{Abort, AssertionError, Error, Flow, Kind};
use static_assertions::assert_impl_all;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Caller-supplied constructor for failed formatted assertions.
///
/// Receives the rendered message; the returned error replaces the built-in
/// [`AssertionError`].
pub type AssertionFactory = Arc<dyn Fn(String) -> Error + Send + Sync + 'static>;

/// Fail-fast handler embedded in caller-defined units.
///
/// Holds configuration only and is immutable once built, so one instance
/// can be shared freely between threads.
#[derive(Clone)]
pub struct Handler {
    factory: Option<AssertionFactory>,
    escalation: Escalation,
    exit_code: u8,
    trace: bool,
}

assert_impl_all!(Handler: Send, Sync, Clone);
assert_impl_all!(Error: Send, Sync, Clone);
assert_impl_all!(Abort: Send);

impl Default for Handler {
    fn default() -> Self {
        Self {
            factory: None,
            escalation: Escalation::Unwind,
            exit_code: DEFAULT_EXIT_CODE,
            trace: false,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("assertion_factory", &self.factory.is_some())
            .field("escalation", &self.escalation)
            .field("exit_code", &self.exit_code)
            .field("trace", &self.trace)
            .finish()
    }
}

impl Handler {
    /// Unconfigured per-unit handler: built-in assertion errors, re-raise by
    /// unwinding, no tracing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> HandlerBuilder {
        HandlerBuilder::default()
    }

    /// Handler used by the process-wide functions when nothing else was
    /// installed. Aborts no boundary converts terminate the process.
    pub fn process_default() -> Self {
        Self {
            escalation: Escalation::Exit,
            ..Self::default()
        }
    }

    /// Build a handler from deployment settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the settings are invalid.
    pub fn from_config(config: &HandlerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::builder().config(config).build())
    }

    pub fn escalation(&self) -> Escalation {
        self.escalation
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn trace_enabled(&self) -> bool {
        self.trace
    }

    pub fn has_assertion_factory(&self) -> bool {
        self.factory.is_some()
    }

    // ─── Abort primitives ───────────────────────────────────────────

    /// Abort if `result` is an error, otherwise hand back its value.
    pub fn must<T, E>(&self, result: Result<T, E>) -> Flow<T>
    where
        E: Into<Error>,
    {
        result.map_err(|e| self.raise(e.into()))
    }

    /// Abort if an error is present. `None` has no effect.
    pub fn must_none<E>(&self, error: Option<E>) -> Flow<()>
    where
        E: Into<Error>,
    {
        match error {
            Some(e) => Err(self.raise(e.into())),
            None => Ok(()),
        }
    }

    /// Abort with `error` exactly when `cond` is false.
    pub fn assert<E>(&self, cond: bool, error: E) -> Flow<()>
    where
        E: Into<Error>,
    {
        if cond {
            return Ok(());
        }
        Err(self.raise(error.into()))
    }

    /// Abort with an assertion error when `cond` is false.
    ///
    /// The message is rendered only on failure. See [`ensure!`](crate::ensure)
    /// for the macro form.
    pub fn assert_fmt(&self, cond: bool, args: fmt::Arguments<'_>) -> Flow<()> {
        if cond {
            return Ok(());
        }
        Err(self.raise(self.assertion(fmt::format(args))))
    }

    /// Abort with an assertion error carrying `message` when `cond` is false.
    pub fn expect(&self, cond: bool, message: impl Into<String>) -> Flow<()> {
        if cond {
            return Ok(());
        }
        Err(self.raise(self.assertion(message.into())))
    }

    /// Build the error a failed formatted assertion aborts with: the
    /// factory's error when one is set, an [`AssertionError`] otherwise.
    pub fn assertion(&self, message: String) -> Error {
        match &self.factory {
            Some(factory) => factory(message),
            None => Error::new(AssertionError::new(message)),
        }
    }

    fn raise(&self, err: Error) -> Abort {
        if self.trace {
            trace!(kind = %err.kind(), class = ?err.class(), "abort raised: {err}");
        }
        Abort::Error(err)
    }

    // ─── Boundary ───────────────────────────────────────────────────

    /// Classify the outcome of a unit body.
    ///
    /// - `Ok(Ok(value))`: the body returned normally.
    /// - `Ok(Err(error))`: the abort was converted into a returned error.
    /// - `Err(abort)`: the abort is re-raised unchanged. A parent unit
    ///   propagates it with `?` to its own boundary.
    pub fn resolve<T>(&self, flow: Flow<T>, accepted: &[Kind]) -> Result<Result<T, Error>, Abort> {
        let err = match flow {
            Ok(value) => return Ok(Ok(value)),
            Err(Abort::Error(err)) => err,
            Err(foreign @ Abort::Foreign(_)) => {
                debug!("re-raising unclassified abort: {foreign}");
                return Err(foreign);
            }
        };

        if Self::accepts(&err, accepted) {
            return Ok(Err(err));
        }

        debug!(
            kind = %err.kind(),
            class = ?err.class(),
            accepted = accepted.len(),
            "re-raising abort: {err}"
        );
        Err(Abort::Error(err))
    }

    /// The unit boundary.
    ///
    /// Returns the body's value, or the converted error. An abort that is
    /// not converted is handed to the configured [`Escalation`] and never
    /// comes back.
    pub fn catch<T>(&self, flow: Flow<T>, accepted: &[Kind]) -> Result<T, Error> {
        match self.resolve(flow, accepted) {
            Ok(outcome) => outcome,
            Err(abort) => self.escalate(abort),
        }
    }

    /// Run `body` as a unit and apply the boundary to its outcome.
    pub fn run<T, F>(&self, accepted: &[Kind], body: F) -> Result<T, Error>
    where
        F: FnOnce() -> Flow<T>,
    {
        self.catch(body(), accepted)
    }

    /// Apply the escalation policy to an abort no boundary converted.
    pub fn escalate(&self, abort: Abort) -> ! {
        match self.escalation {
            Escalation::Unwind => {
                // The panic hook cannot print an `Abort` payload.
                error!(kind = ?abort.error().map(Error::kind), "unhandled abort: {abort}");
                std::panic::panic_any(abort)
            }
            Escalation::Exit => {
                error!(exit_code = self.exit_code, "unhandled abort: {abort}");
                std::process::exit(i32::from(self.exit_code))
            }
        }
    }

    fn accepts(err: &Error, accepted: &[Kind]) -> bool {
        if err.is_fault() {
            return false;
        }
        accepted.is_empty() || err.is_assertion() || accepted.contains(&err.kind())
    }
}

/// Builder for [`Handler`].
#[derive(Debug, Default)]
pub struct HandlerBuilder {
    handler: Handler,
}

impl HandlerBuilder {
    /// Replace [`AssertionError`] with the errors `factory` builds.
    pub fn assertion_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(String) -> Error + Send + Sync + 'static,
    {
        self.handler.factory = Some(Arc::new(factory));
        self
    }

    pub fn escalation(mut self, escalation: Escalation) -> Self {
        self.handler.escalation = escalation;
        self
    }

    pub fn exit_code(mut self, exit_code: u8) -> Self {
        self.handler.exit_code = exit_code;
        self
    }

    /// Emit a `trace` event for every raised abort.
    pub fn trace(mut self, enabled: bool) -> Self {
        self.handler.trace = enabled;
        self
    }

    /// Apply deployment settings. The assertion factory is left untouched.
    pub fn config(mut self, config: &HandlerConfig) -> Self {
        self.handler.escalation = config.escalation;
        self.handler.exit_code = config.exit_code;
        self.handler.trace = config.trace;
        self
    }

    pub fn build(self) -> Handler {
        self.handler
    }
}
