use crate::config::Config;

/// Install a `tracing` fmt subscriber.
///
/// `RUST_LOG` wins over `config.log_level`; level `nope` disables output.
/// Safe to call more than once: later calls are ignored.
pub fn init_logging(config: &Config) {
    if config.log_level == "nope" {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init();
}
