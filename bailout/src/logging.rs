//! Tracing setup for binaries embedding the fail-fast handler.

use crate::config::LogLevel;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize a global fmt subscriber.
///
/// `RUST_LOG` directives are honoured; `level` is added as the default
/// directive. If a global subscriber is already set, the error from
/// `set_global_default` is ignored and the existing subscriber stays.
pub fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::from(level).into());

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_line_number(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
