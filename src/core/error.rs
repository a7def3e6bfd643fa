use std::fmt;

/// Error types for kpidash operations.
///
/// Only fatal conditions live here. Unparsable cells are recovered as
/// missing values by the loader, and empty filter results surface as
/// explicit no-data markers on each metric.
#[derive(Debug)]
pub enum KpiDashError {
    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// CSV reading error
    Csv(csv::Error),

    /// JSON serialization error
    Json(serde_json::Error),

    /// TOML parsing error
    TomlParsing(toml::de::Error),

    /// Configuration error
    Config(String),

    /// Backing data file for an organization could not be located
    DataUnavailable { organization: String, path: String },

    /// A table was read but does not have the required shape
    MalformedTable(String),

    /// Organization is not part of the catalog
    UnknownOrganization(String),

    /// Tab is not defined for the organization
    UnknownTab { organization: String, tab: String },

    /// Invalid argument error
    InvalidArgument(String),
}

impl fmt::Display for KpiDashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpiDashError::Io(err) => write!(f, "IO error: {err}"),
            KpiDashError::Csv(err) => write!(f, "CSV error: {err}"),
            KpiDashError::Json(err) => write!(f, "JSON error: {err}"),
            KpiDashError::TomlParsing(err) => write!(f, "TOML parsing error: {err}"),
            KpiDashError::Config(msg) => write!(f, "Configuration error: {msg}"),
            KpiDashError::DataUnavailable { organization, path } => write!(
                f,
                "Data unavailable: no data file for {organization} at {path}"
            ),
            KpiDashError::MalformedTable(msg) => write!(f, "Malformed table: {msg}"),
            KpiDashError::UnknownOrganization(name) => {
                write!(f, "Unknown organization: {name}")
            }
            KpiDashError::UnknownTab { organization, tab } => {
                write!(f, "Unknown tab: '{tab}' is not defined for {organization}")
            }
            KpiDashError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for KpiDashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KpiDashError::Io(err) => Some(err),
            KpiDashError::Csv(err) => Some(err),
            KpiDashError::Json(err) => Some(err),
            KpiDashError::TomlParsing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for KpiDashError {
    fn from(err: std::io::Error) -> Self {
        KpiDashError::Io(err)
    }
}

impl From<csv::Error> for KpiDashError {
    fn from(err: csv::Error) -> Self {
        KpiDashError::Csv(err)
    }
}

impl From<serde_json::Error> for KpiDashError {
    fn from(err: serde_json::Error) -> Self {
        KpiDashError::Json(err)
    }
}

impl From<toml::de::Error> for KpiDashError {
    fn from(err: toml::de::Error) -> Self {
        KpiDashError::TomlParsing(err)
    }
}

impl KpiDashError {
    /// Whether this error only affects a single organization's dashboard
    pub fn is_organization_scoped(&self) -> bool {
        matches!(
            self,
            KpiDashError::DataUnavailable { .. } | KpiDashError::MalformedTable(_)
        )
    }
}

/// Type alias for Results using KpiDashError
pub type Result<T> = std::result::Result<T, KpiDashError>;
