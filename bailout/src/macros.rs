/// Formatted assertion.
///
/// `ensure!(handler, cond, "fmt", args..)` aborts with an assertion error
/// carrying the rendered message when `cond` is false. `handler` is a
/// [`Handler`](crate::Handler) or any [`FailFast`](crate::FailFast)
/// implementor. Evaluates to a [`Flow<()>`](crate::Flow); apply `?`.
///
/// ```rust
/// use bailout::{ensure, Flow, Handler};
///
/// fn offset(handler: &Handler, offset: i64) -> Flow<i64> {
///     ensure!(handler, offset >= 0, "offset must be >= 0, got: {offset}")?;
///     Ok(offset)
/// }
///
/// let handler = Handler::new();
/// let err = handler.catch(offset(&handler, -1), &[]).unwrap_err();
/// assert_eq!(err.message(), "offset must be >= 0, got: -1");
/// ```
#[macro_export]
macro_rules! ensure {
    ($handler:expr, $cond:expr, $($arg:tt)+) => {
        $handler.assert_fmt($cond, ::core::format_args!($($arg)+))
    };
}
