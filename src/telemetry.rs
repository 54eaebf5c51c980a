//! Logging initialization for the command-line binary.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

/// Install a console subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` with
/// `verbose`. Library code only emits events and never installs a subscriber.
pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr),
    );

    tracing::subscriber::set_global_default(subscriber)?;
    tracing::debug!("console logging initialized");
    Ok(())
}
