//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::constants::{config_files, output_formats, years};
use crate::core::error::{KpiDashError, Result};
use crate::data::LoadOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the organization CSV files
    pub data_dir: Option<String>,

    /// Organization shown when none is given on the command line
    pub organization: Option<String>,

    /// Seed for the synthetic governance and regional tables
    pub seed: Option<u64>,

    /// Output format (text, json, minimal)
    pub output_format: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,

    /// Write an HTML dashboard to this path
    pub html_dashboard_path: Option<String>,

    /// First governance year for organizations without observations
    pub default_start_year: Option<i32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: Some(config_files::DEFAULT_DATA_DIR.to_string()),
            organization: None, // First catalog organization
            seed: None,         // Fresh synthetic data per run
            output_format: Some(output_formats::DEFAULT.to_string()),
            verbose: Some(false),
            html_dashboard_path: None, // No dashboard by default
            default_start_year: Some(years::DEFAULT_START_YEAR),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            KpiDashError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            KpiDashError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        // Validate the loaded configuration
        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        Self::load_from_ancestors(Path::new("."))
    }

    /// Look for the config file in `dir` and up to three parents, falling
    /// back to defaults
    pub fn load_from_ancestors(dir: &Path) -> Self {
        for depth in 0..=config_files::MAX_PARENT_DEPTH {
            let mut path = dir.to_path_buf();
            for _ in 0..depth {
                path.push("..");
            }
            path.push(config_files::FILE_NAME);

            if path.is_file() {
                match Self::load_from_file(&path) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Ignoring {}: {e}", path.display()),
                }
            }
        }

        // Fall back to defaults
        Self::default()
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        // Data
        if let Some(ref data_dir) = cli_config.data_dir {
            self.data_dir = Some(data_dir.clone());
        }
        if let Some(ref organization) = cli_config.organization {
            self.organization = Some(organization.clone());
        }
        if let Some(seed) = cli_config.seed {
            self.seed = Some(seed);
        }

        // Output & format
        if cli_config.verbose {
            self.verbose = Some(true);
        }
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
        if let Some(ref dashboard_path) = cli_config.html_dashboard_path {
            self.html_dashboard_path = Some(dashboard_path.clone());
        }
    }

    pub fn data_dir(&self) -> &str {
        self.data_dir
            .as_deref()
            .unwrap_or(config_files::DEFAULT_DATA_DIR)
    }

    pub fn output_format(&self) -> &str {
        self.output_format
            .as_deref()
            .unwrap_or(output_formats::DEFAULT)
    }

    /// Options for loading the data store
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            seed: self.seed,
            default_start_year: self
                .default_start_year
                .unwrap_or(years::DEFAULT_START_YEAR),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate data directory
        if let Some(ref dir) = self.data_dir
            && dir.trim().is_empty()
        {
            return Err(KpiDashError::Config(
                "Data directory cannot be empty. Expected a path to the CSV files.".to_string(),
            ));
        }

        // Validate output format
        if let Some(ref format) = self.output_format {
            match format.as_str() {
                f if output_formats::ALL.contains(&f) => {}
                _ => {
                    return Err(KpiDashError::Config(format!(
                        "Invalid output format '{format}'. Expected one of: {}.",
                        output_formats::ALL.join(", ")
                    )));
                }
            }
        }

        // Validate governance start year
        if let Some(year) = self.default_start_year
            && !(years::MIN_START_YEAR..=years::MAX_START_YEAR).contains(&year)
        {
            return Err(KpiDashError::Config(format!(
                "Default start year {year} is out of range. Expected a year between {}-{}.",
                years::MIN_START_YEAR,
                years::MAX_START_YEAR
            )));
        }

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Data
    pub data_dir: Option<String>,     // --data-dir
    pub organization: Option<String>, // --organization
    pub seed: Option<u64>,            // --seed

    // Output & format
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub output_format: Option<String>, // --format

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config

    pub html_dashboard_path: Option<String>, // --html-dashboard
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.data_dir(), ".");
        assert_eq!(config.output_format(), output_formats::DEFAULT);
        assert_eq!(config.seed, None);
        assert_eq!(config.default_start_year, Some(2020));
    }

    #[test]
    fn test_config_load_from_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(
            b"data_dir = \"data\"\norganization = \"WASAC\"\nseed = 42\ndefault_start_year = 2018",
        )?;

        let config = Config::load_from_file(file.path())?;
        assert_eq!(config.data_dir(), "data");
        assert_eq!(config.organization, Some("WASAC".to_string()));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.load_options().default_start_year, 2018);
        // Missing keys are unset, not defaulted
        assert_eq!(config.output_format, None);
        assert_eq!(config.output_format(), output_formats::DEFAULT);

        Ok(())
    }

    #[test]
    fn test_config_merge_with_cli() {
        let mut config = Config::default();
        let cli_config = CliConfig {
            data_dir: Some("/srv/kpi".to_string()),
            seed: Some(7),
            verbose: true,
            output_format: Some(output_formats::JSON.to_string()),
            ..Default::default()
        };

        config.merge_with_cli(&cli_config);

        assert_eq!(config.data_dir(), "/srv/kpi");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.verbose, Some(true));
        assert_eq!(config.output_format(), output_formats::JSON);
    }

    #[test]
    fn test_config_merge_preserves_unset_values() {
        let mut config = Config {
            organization: Some("EDCL".to_string()),
            seed: Some(1),
            ..Default::default()
        };

        let cli_config = CliConfig {
            seed: Some(2),
            ..Default::default()
        };

        config.merge_with_cli(&cli_config);

        assert_eq!(config.seed, Some(2)); // Overwritten
        assert_eq!(config.organization, Some("EDCL".to_string())); // Preserved
    }

    #[test]
    fn test_config_load_from_ancestors() -> Result<()> {
        let root = tempfile::tempdir()?;
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(
            root.path().join(config_files::FILE_NAME),
            "organization = \"EUCL\"\nseed = 9\n",
        )?;

        let config = Config::load_from_ancestors(&nested);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.organization, Some("EUCL".to_string()));
        Ok(())
    }

    #[test]
    fn test_config_load_from_ancestors_falls_back_to_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(config_files::FILE_NAME), "seed = [")?;

        let config = Config::load_from_ancestors(dir.path());
        assert_eq!(config.seed, None);
        assert_eq!(config.data_dir(), ".");
        Ok(())
    }

    #[test]
    fn test_config_load_from_file_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"invalid toml content [").unwrap();

        let result = Config::load_from_file(file.path());
        assert!(matches!(result, Err(KpiDashError::Config(_))));
    }

    #[test]
    fn test_config_load_from_file_nonexistent() {
        let result = Config::load_from_file("/path/that/does/not/exist.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_validation_invalid_output_format() {
        let config = Config {
            output_format: Some("yaml".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_data_dir() {
        let config = Config {
            data_dir: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_start_year_bounds() -> Result<()> {
        for bad in [1899, 2101] {
            let config = Config {
                default_start_year: Some(bad),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
        for good in [1900, 2100] {
            let config = Config {
                default_start_year: Some(good),
                ..Default::default()
            };
            config.validate()?;
        }
        Ok(())
    }

    #[test]
    fn test_config_load_from_file_with_validation() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"output_format = \"xml\"")?; // Invalid config

        let result = Config::load_from_file(file.path());
        assert!(result.is_err());

        Ok(())
    }

    #[test]
    fn test_cli_config_default() {
        let cli_config = CliConfig::default();
        assert_eq!(cli_config.data_dir, None);
        assert_eq!(cli_config.organization, None);
        assert_eq!(cli_config.seed, None);
        assert!(!cli_config.quiet);
        assert!(!cli_config.verbose);
        assert_eq!(cli_config.output_format, None);
        assert_eq!(cli_config.config_file, None);
        assert!(!cli_config.no_config);
        assert_eq!(cli_config.html_dashboard_path, None);
    }
}
