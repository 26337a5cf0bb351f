//! Logging setup
//!
//! Diagnostics go to stderr so command output on stdout stays pipeable.
//! `FOLIO_LOG` (falling back to `RUST_LOG`) sets the filter and
//! `FOLIO_LOG_FORMAT=json` switches to JSON lines.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "folio=warn";
const VERBOSE_FILTER: &str = "folio=debug";

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_env("FOLIO_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let json = std::env::var("FOLIO_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // A subscriber may already be installed (e.g. in tests)
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
