use std::sync::Once;

/// Logger configuration for the CSG engine and its hosts.
///
/// Engine targets worth filtering on:
/// - `csg_engine::scene`: display-list rebuilds, partial scenes and shutdown;
/// - `csg_engine::compositor`: algorithm choice, layer limits and per-pass reports;
/// - `csg_engine::frame`: depth-state warnings and per-frame summaries (trace).
///
/// `env_filter` takes the `env_logger` directive syntax, for instance
/// `"warn,csg_engine::compositor=debug"`. It wins over `RUST_LOG`; when both are
/// absent, `default_level` applies to every target.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the `log` backend, once per process.
///
/// Later calls are no-ops. A logger installed earlier by the host process is
/// left in place, and the engine's records go to it instead.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(config.default_level);
            }
        }

        builder.write_style(config.write_style).format_target(true);

        if builder.try_init().is_err() {
            return;
        }

        log::debug!("engine logging ready");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig {
            env_filter: Some("warn,csg_engine::compositor=debug".to_owned()),
            ..LoggingConfig::default()
        });
        init_logging(LoggingConfig::default());
        log::debug!(target: "csg_engine::compositor", "still routed after a second init");
    }

    #[test]
    fn default_level_is_info() {
        let config = LoggingConfig::default();
        assert_eq!(config.default_level, log::LevelFilter::Info);
        assert!(config.env_filter.is_none());
    }
}
