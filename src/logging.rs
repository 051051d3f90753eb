//! Tracing subscriber setup for the binary

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber once
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `warn`, or `debug`
/// with `verbose`. Output goes to stderr so command output stays clean.
pub fn init(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let default = if verbose {
            "envelope_wizard=debug"
        } else {
            "envelope_wizard=warn"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
