//! Tracing setup for provider binaries.
//!
//! The core itself never emits user-facing diagnostics — errors travel up to
//! the adapter as values — but it does carry `debug!`/`trace!`
//! instrumentation (page-walk progress, mostly). Provider binaries call one
//! of these helpers once at startup to surface it.
//!
//! Output goes to **stderr**: Terraform owns the provider's stdout for the
//! plugin handshake. Filtering follows the usual `RUST_LOG` conventions,
//! e.g. `RUST_LOG=dashboard_provider_core=debug`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
}

/// Install the default subscriber: stderr writer, `RUST_LOG` filtering,
/// `info` when `RUST_LOG` is unset.
///
/// # Panics
///
/// Panics if a global subscriber is already installed; use
/// [`try_init_logging`] when that can happen.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(build_filter("info"))
        .with(stderr_layer())
        .init();
}

/// Like [`init_logging`], returning `false` instead of panicking when a
/// subscriber is already installed.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(build_filter("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}
