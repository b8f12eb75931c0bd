//! Utility which is needed to initialize logging.

use log::LevelFilter;

/// Enables printing logs to the console.
///
/// Repeated calls are ignored, so tests may call it freely.
pub fn enable_console_log() {
    init_with_level(LevelFilter::Debug);
}

/// Enables printing logs together with the per-tick event trace.
pub fn enable_tracing() {
    init_with_level(LevelFilter::Trace);
}

fn init_with_level(level: LevelFilter) {
    let _ = env_logger::Builder::new().filter_level(level).is_test(cfg!(test)).try_init();
}
