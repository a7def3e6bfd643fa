use crate::config::Config;
use crate::data::DataStore;
use crate::pipeline::DashboardView;
use log::{debug, error, info, warn};
use std::io::Write;

/// Level for the given flags; quiet wins over verbose
pub fn level_filter(verbose: bool, quiet: bool) -> log::LevelFilter {
    if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off // Only show structured logs in verbose mode
    }
}

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = level_filter(verbose, quiet);

    let result = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .try_init();

    match result {
        Ok(()) => debug!("Logger initialized with level: {level:?}"),
        Err(_) => debug!("Logger already initialized"),
    }
}

/// Log configuration information
pub fn log_config_info(config: &Config) {
    let options = config.load_options();
    let seed = options
        .seed
        .map_or_else(|| "entropy".to_string(), |s| s.to_string());

    info!(
        "Configuration: data_dir={}, format={}, seed={seed}",
        config.data_dir(),
        config.output_format()
    );
    info!(
        "Governance default start year: {}",
        options.default_start_year
    );
}

/// One line for the loaded organizations, then one per failure
pub fn load_summary(store: &DataStore) -> (String, Vec<String>) {
    let available = store.available();
    let loaded = format!(
        "Loaded {} organization(s): {}",
        available.len(),
        available.join(", ")
    );
    let failed = store
        .failures()
        .iter()
        .map(|(name, reason)| format!("❌ {name} unavailable: {reason}"))
        .collect();
    (loaded, failed)
}

/// Log which organizations loaded and which did not
pub fn log_load_summary(store: &DataStore) {
    let (loaded, failed) = load_summary(store);
    info!("{loaded}");
    for line in failed {
        warn!("{line}");
    }
}

/// Outcome of one view
pub fn view_summary(view: &DashboardView) -> String {
    if view.no_data {
        format!(
            "{} / {}: no data for {}",
            view.header.name, view.tab, view.year
        )
    } else {
        format!(
            "✅ {} / {}: {} card(s) for {}",
            view.header.name,
            view.tab,
            view.snapshot.metrics.len(),
            view.snapshot
                .period
                .map_or_else(|| "-".to_string(), |d| d.to_string())
        )
    }
}

/// Log the outcome of building one view
pub fn log_view_summary(view: &DashboardView) {
    let summary = view_summary(view);
    if view.no_data {
        warn!("{summary}");
    } else {
        info!("{summary}");
    }
    if view.coercion_failures > 0 {
        debug!(
            "{} cell(s) were not numeric and count as missing",
            view.coercion_failures
        );
    }
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}
