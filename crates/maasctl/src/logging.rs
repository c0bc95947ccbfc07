//! Diagnostic logging for maasctl
//!
//! Logs go to stderr so stdout stays clean for `--json` output.
//! RUST_LOG takes precedence over the -v flag.

use tracing_subscriber::EnvFilter;

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "maasctl=debug,maasclient=debug"
    } else {
        "warn"
    }
}

/// Install the global tracing subscriber
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
