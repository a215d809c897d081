//! Initialisation du logging
//!
//! Le niveau vient de `RUST_LOG` s'il est défini, sinon de
//! `host.logger.min_level`. Les logs partent sur stderr pour ne pas se
//! mélanger à la sortie des commandes.

use stvconfig::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config
            .get_log_min_level()
            .unwrap_or_else(|_| "INFO".to_string());
        EnvFilter::try_new(level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    let enable_console = config.get_log_enable_console().unwrap_or(true);

    let subscriber = tracing_subscriber::registry().with(filter);

    if enable_console {
        subscriber
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .init();
    } else {
        subscriber.init();
    }
}
