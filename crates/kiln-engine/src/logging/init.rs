use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// Filter precedence: `env_filter`, then the `RUST_LOG` environment variable,
/// then `default_level` for everything plus `warn` for the windowing crates,
/// which are chatty at `info` on some platforms.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter in `env_logger` syntax, e.g. `"kiln_engine=debug,glutin=warn"`.
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger.
///
/// Only the first call has an effect. Call it at the top of `main`, before the
/// window is created, so context creation diagnostics are captured.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder
                    .filter_level(config.default_level)
                    .filter_module("winit", LevelFilter::Warn)
                    .filter_module("glutin", LevelFilter::Warn);
            }
        }

        builder.write_style(config.write_style);

        // A logger installed by the host process wins; ours is then dropped.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
