use log::LevelFilter;

/// Gets the log level from environment variable or defaults to Info
fn get_log_level() -> LevelFilter {
    match std::env::var("RUST_LOG").as_deref() {
        Ok("trace") => LevelFilter::Trace,
        Ok("debug") => LevelFilter::Debug,
        Ok("info") => LevelFilter::Info,
        Ok("warn") => LevelFilter::Warn,
        Ok("error") => LevelFilter::Error,
        Ok("off") => LevelFilter::Off,
        _ => {
            #[cfg(debug_assertions)]
            return LevelFilter::Debug;
            #[cfg(not(debug_assertions))]
            return LevelFilter::Info;
        }
    }
}

/// Installs the stderr logger. Safe to call more than once.
pub fn init() {
    let _ = env_logger::Builder::new()
        .filter_level(get_log_level())
        .format_timestamp_millis()
        .try_init();
}
