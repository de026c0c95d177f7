//! Process-wide handler tests.
//!
//! The process-wide handler can be installed once per process, so every
//! check lives in a single test function of its own test binary.

use bailout::config::{ConfigError, ConfigLoader, Escalation, HandlerConfig};
use bailout::{Abort, Error, Handler, Kind, global};
use serde::Deserialize;
use std::fs;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tempfile::TempDir;

#[derive(Debug, Deserialize)]
struct AppConfig {
    handler: HandlerConfig,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct ConfigValueError(String);

#[derive(Debug, thiserror::Error)]
#[error("unrelated")]
struct UnrelatedError;

fn load_config(dir: &std::path::Path) -> AppConfig {
    let path = dir.join("app.toml");
    fs::write(
        &path,
        r#"
[handler]
escalation = "unwind"
exit_code = 70
trace = true
log_level = "debug"
"#,
    )
    .unwrap();
    AppConfig::load(&path).expect("config should load")
}

/// Test: install from configuration, then use the process-wide variants.
#[test]
fn process_wide_handler_lifecycle() {
    let tmp = TempDir::new().unwrap();
    let config = load_config(tmp.path());
    assert_eq!(config.handler.escalation, Escalation::Unwind);

    bailout::logging::init_tracing(config.handler.log_level);

    let handler = Handler::builder()
        .config(&config.handler)
        .assertion_factory(|msg| Error::new(ConfigValueError(msg)))
        .build();
    global::install(handler).expect("first install succeeds");

    // Only one installation per process.
    assert!(matches!(
        global::install(Handler::new()),
        Err(ConfigError::AlreadyInstalled)
    ));

    let installed = global::handler();
    assert_eq!(installed.exit_code(), 70);
    assert!(installed.trace_enabled());
    assert!(installed.has_assertion_factory());

    // Success path.
    let flow = global::must("7".parse::<u8>());
    assert_eq!(global::catch(flow, &[]).unwrap(), 7);
    assert!(global::catch(global::must_none(None::<UnrelatedError>), &[]).is_ok());

    // Formatted assertions go through the installed factory.
    let flow = global::assert_fmt(false, format_args!("port {} out of range", 99_999));
    let err = global::catch(flow, &[Kind::of::<ConfigValueError>()]).unwrap_err();
    assert!(err.is::<ConfigValueError>());
    assert_eq!(err.message(), "port 99999 out of range");

    let err = global::catch(global::expect(false, "missing key"), &[]).unwrap_err();
    assert!(err.is::<ConfigValueError>());

    // Explicit errors are kept as-is.
    let err = global::catch(global::assert(false, UnrelatedError), &[]).unwrap_err();
    assert!(err.is::<UnrelatedError>());

    // Unmatched kinds re-raise.
    let flow = global::assert(false, UnrelatedError);
    assert!(global::resolve(flow, &[Kind::of::<ConfigValueError>()]).is_err());

    // The configured escalation unwinds with the original abort.
    let payload = catch_unwind(AssertUnwindSafe(|| {
        global::catch(
            global::assert(false, UnrelatedError),
            &[Kind::of::<ConfigValueError>()],
        )
    }))
    .expect_err("unconverted abort must unwind");
    assert!(matches!(Abort::from_panic(payload), Abort::Error(ref e) if e.is::<UnrelatedError>()));
}
