use log::LevelFilter;

/// Installs the global logger; `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    env_logger::builder()
        .format_target(false)
        .format_timestamp_secs()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init()
}
