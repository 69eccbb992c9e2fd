//! Diagnostics via `RUST_LOG`, written to stderr so stdout stays clean for
//! the answers.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the default is `warn`, or `debug`
/// with `--verbose`.
///
/// ```bash
/// RUST_LOG=handheld_vm=trace handheld input.txt
/// ```
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
