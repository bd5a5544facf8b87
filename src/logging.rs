//! Tracing setup for hosts that do not install their own subscriber.
//!
//! Rejections are logged at `warn`, fail-closed errors at `error`, and each
//! validation runs inside a `validate` span carrying the path and size.
//! Filtering follows `RUST_LOG` and defaults to `info`.

use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static INIT: Once = Once::new();

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global subscriber in `format`.
///
/// Only the first call in a process does anything, and it backs off if the
/// host already set a global subscriber.
pub fn init_tracing_with(format: LogFormat) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(env_filter());
        let installed = match format {
            LogFormat::Text => registry
                .with(
                    fmt::layer()
                        .with_span_events(FmtSpan::CLOSE)
                        .with_target(true)
                        .with_thread_names(true),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_span_events(FmtSpan::CLOSE)
                        .with_current_span(true)
                        .with_span_list(false)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
        };
        if installed.is_ok() {
            info!(?format, "resguard tracing initialized");
        }
    });
}

pub fn init_tracing() {
    init_tracing_with(LogFormat::Text);
}

pub fn init_tracing_json() {
    init_tracing_with(LogFormat::Json);
}

/// `info`-level span around a validation or load step.
#[macro_export]
macro_rules! span_trace {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Log an error (optionally with the resource path) and evaluate to it.
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {{
        let e = $err;
        tracing::error!(error = %e, "resguard operation failed");
        e
    }};
    ($err:expr, $path:expr) => {{
        let e = $err;
        tracing::error!(error = %e, path = %$path, "Resource validation failed");
        e
    }};
}
