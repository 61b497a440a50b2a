// tracing subscriber setup for the command line tool

use tracing_subscriber::EnvFilter;

/// environment variable holding a tracing filter directive
pub const LOG_ENV_VAR: &str = "CHANGELOG_LOG";

/// filter used when the environment does not provide one
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// install a stderr subscriber; stdout is reserved for command output
///
/// calling this more than once keeps the first subscriber
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
