//! Logging initialization for the CLI.
//!
//! Library crates only emit `tracing` events; the subscriber is owned here.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the stderr subscriber.
///
/// `verbosity`: 0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE. `RUST_LOG` wins when set.
/// With `json`, every event is one JSON line.
pub fn init(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let subscriber = tracing_subscriber::registry().with(filter);

    // A subscriber may already be installed (tests); keep it.
    let _ = if json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        subscriber
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
}
