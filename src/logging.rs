//! stderr logging for the engine library.

use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber filtered by `filter`.
///
/// A host process that already installed a global subscriber keeps its own;
/// an unparsable filter falls back to `warn`.
pub(crate) fn init(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("planbridge: invalid log filter {filter:?} ({e}); using \"warn\"");
        EnvFilter::new("warn")
    });
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(filter, "logging initialized");
    }
}
