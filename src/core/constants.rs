/// Application-wide constants to avoid magic values throughout the codebase.
///
/// Output format constants
pub mod output_formats {
    /// Text output format - colorful, sectioned terminal output
    pub const TEXT: &str = "text";
    /// JSON output format - structured output for automation
    pub const JSON: &str = "json";
    /// Minimal output format - plain text without colors or emojis
    pub const MINIMAL: &str = "minimal";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 3] = [TEXT, JSON, MINIMAL];
}

/// Column names of the KPI files
pub mod columns {
    /// Observation date, matched case-insensitively
    pub const DATE: &str = "Date";
}

/// Year selection sentinels
pub mod years {
    /// Label of the "all years" option
    pub const ALL_YEARS_LABEL: &str = "All Years";
    /// Accepted short form on the command line
    pub const ALL_YEARS_ARG: &str = "all";
    /// First year of the governance range when a table has no rows
    pub const DEFAULT_START_YEAR: i32 = 2020;
    /// Sane bounds for a configured start year
    pub const MIN_START_YEAR: i32 = 1900;
    pub const MAX_START_YEAR: i32 = 2100;
}

/// Parameters of the synthetic governance generator
pub mod governance {
    pub const BOARD_MEAN: f64 = 95.0;
    pub const BOARD_STD_DEV: f64 = 3.0;
    pub const BOARD_MIN: f64 = 80.0;
    pub const BOARD_MAX: f64 = 100.0;

    /// Probability that a year's audit opinion is clean
    pub const CLEAN_AUDIT_PROBABILITY: f64 = 0.9;

    pub const INTERNAL_AUDIT_MEAN: f64 = 80.0;
    pub const INTERNAL_AUDIT_STD_DEV: f64 = 7.0;
    pub const INTERNAL_AUDIT_MIN: f64 = 60.0;
    pub const INTERNAL_AUDIT_MAX: f64 = 100.0;
}

/// Regions of the regional breakdown, capital first
pub mod regions {
    pub const CAPITAL: &str = "Kigali City";
    pub const ALL: [&str; 5] = [
        CAPITAL,
        "Eastern Province",
        "Northern Province",
        "Southern Province",
        "Western Province",
    ];

    /// Regional values are percentages
    pub const MIN_VALUE: f64 = 0.0;
    pub const MAX_VALUE: f64 = 100.0;
}

/// Currency scaling units, largest first
pub mod currency {
    pub const TRILLION: f64 = 1_000_000_000_000.0;
    pub const BILLION: f64 = 1_000_000_000.0;
    pub const MILLION: f64 = 1_000_000.0;
    pub const THOUSAND: f64 = 1_000.0;

    pub const UNITS: [(f64, &str); 4] = [
        (TRILLION, "T"),
        (BILLION, "B"),
        (MILLION, "M"),
        (THOUSAND, "K"),
    ];

    /// Suffix appended to financial card values
    pub const SYMBOL: &str = "Frw";
}

/// Display and formatting constants
pub mod display {
    /// Rendered for any missing value
    pub const NOT_AVAILABLE: &str = "N/A";
    pub const COMPLIANT: &str = "Compliant";
    pub const NON_COMPLIANT: &str = "Non-Compliant";
    pub const AUDIT_CLEAN: &str = "Clean";
    pub const AUDIT_QUALIFIED: &str = "Qualified";
    /// Delta marker
    pub const DELTA: &str = "Δ";

    pub const SUCCESS_EMOJI: &str = "✅";
    pub const WARNING_EMOJI: &str = "⚠️";
    pub const ERROR_EMOJI: &str = "❌";
    pub const CHART_EMOJI: &str = "📊";
    pub const UP_ARROW: &str = "▲";
    pub const DOWN_ARROW: &str = "▼";
}

/// Configuration file lookup
pub mod config_files {
    pub const FILE_NAME: &str = ".kpidash.toml";
    /// How many parent directories are searched
    pub const MAX_PARENT_DEPTH: usize = 3;
    pub const DEFAULT_DATA_DIR: &str = ".";
}
