//! Log output setup.
//!
//! Logs go to stderr so the status line on stdout stays machine-readable.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "DEVPORT_LOG";

pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let filter = match verbose {
        0 => filter,
        1 => filter.add_directive(Level::INFO.into()),
        _ => filter.add_directive(Level::DEBUG.into()),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
