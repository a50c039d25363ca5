pub mod build_info;

/// Default filter directive applied when `RUST_LOG` does not mention this crate.
const DEFAULT_DIRECTIVE: &str = "cashflow_advisor=info";

/// Installs the global `tracing` subscriber, writing to stderr so shell output stays clean.
///
/// Called once from [`crate::init`].
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = DEFAULT_DIRECTIVE.parse() {
        filter = filter.add_directive(directive);
    }

    // A subscriber may already be installed by an embedding application.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
