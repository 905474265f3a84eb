use log::LevelFilter;

/// Installs the process-wide logger writing to stderr without timestamps.
/// Later calls are no-ops, so tests may call this freely.
pub fn build_logger_for_level(level: LevelFilter) {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .try_init();
}

/// As [`build_logger_for_level`], but every `-v` occurrence raises the base
/// level by one step up to `Trace`.
pub fn build_logger_for_verbosity(base: LevelFilter, verbosity: u8) {
    const LEVELS: [LevelFilter; 6] = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];

    let base_idx = LEVELS.iter().position(|&l| l == base).unwrap_or(3);
    let idx = (base_idx + verbosity as usize).min(LEVELS.len() - 1);

    build_logger_for_level(LEVELS[idx]);
}
