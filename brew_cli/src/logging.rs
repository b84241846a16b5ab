use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set (e.g. `RUST_LOG=brew_core=trace`); otherwise the
/// level is `info`, or `debug` with `--verbose`. Logs go to stderr so the
/// JSON on stdout stays clean.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(verbose)
        .with_writer(std::io::stderr)
        .init();
}
