// Command-line interface definitions and parsing for kpidash

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::CliConfig;
use crate::core::constants::output_formats;
use crate::core::error::Result;
use crate::core::types::{DateRange, YearSelection};
use crate::pipeline::Selection;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // Selection
    /// Organization to display (default: first organization)
    #[arg(short = 'o', long, value_name = "NAME", help_heading = "Selection")]
    pub organization: Option<String>,

    /// Year to display, or "all" (default: all)
    #[arg(short = 'y', long, value_name = "YEAR", help_heading = "Selection")]
    pub year: Option<String>,

    /// Start of the date range (YYYY-MM or YYYY-MM-DD)
    #[arg(long, value_name = "DATE", help_heading = "Selection")]
    pub from: Option<String>,

    /// End of the date range (YYYY-MM or YYYY-MM-DD)
    #[arg(long, value_name = "DATE", help_heading = "Selection")]
    pub to: Option<String>,

    /// Tab to display (default: first tab)
    #[arg(short = 't', long, value_name = "NAME", help_heading = "Selection")]
    pub tab: Option<String>,

    /// Show a card for every KPI column instead of the tab's KPIs
    #[arg(long, help_heading = "Selection")]
    pub all_metrics: bool,

    // Data
    /// Directory holding the organization CSV files (default: .)
    #[arg(short = 'd', long, value_name = "DIR", help_heading = "Data")]
    pub data_dir: Option<String>,

    /// Seed for the synthetic governance and regional data
    #[arg(long, value_name = "N", help_heading = "Data")]
    pub seed: Option<u64>,

    // Output & Verbosity
    /// Suppress log output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Output format (default: text)
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Write a static HTML dashboard
    #[arg(long, value_name = "PATH", help_heading = "Output & Verbosity")]
    pub html_dashboard: Option<String>,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List organizations and their tabs
    List,
}

impl Cli {
    /// The year, range and tab picked on the command line
    pub fn selection(&self, organization: &str) -> Result<Selection> {
        let year = match self.year.as_deref() {
            Some(year) => year.parse::<YearSelection>()?,
            None => YearSelection::All,
        };
        let mut selection = Selection::new(organization)
            .with_year(year)
            .with_range(self.date_range()?)
            .with_all_metrics(self.all_metrics);
        if let Some(ref tab) = self.tab {
            selection = selection.with_tab(tab.clone());
        }
        Ok(selection)
    }

    /// Range from `--from`/`--to`; an omitted end is unbounded
    pub fn date_range(&self) -> Result<Option<DateRange>> {
        if self.from.is_none() && self.to.is_none() {
            return Ok(None);
        }
        let start = match self.from.as_deref() {
            Some(from) => DateRange::parse_start(from)?,
            None => NaiveDate::MIN,
        };
        let end = match self.to.as_deref() {
            Some(to) => DateRange::parse_end(to)?,
            None => NaiveDate::MAX,
        };
        DateRange::new(start, end).map(Some)
    }
}

/// Convert parsed CLI arguments into a CliConfig
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    CliConfig {
        // Data
        data_dir: cli.data_dir.clone(),
        organization: cli.organization.clone(),
        seed: cli.seed,

        // Output & format
        quiet: cli.quiet,
        verbose: cli.verbose,
        output_format: cli.format.clone(),

        // Configuration
        config_file: cli.config.clone(),
        no_config: cli.no_config,

        html_dashboard_path: cli.html_dashboard.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::KpiDashError;

    fn create_default_cli() -> Cli {
        Cli {
            command: None,
            organization: None,
            year: None,
            from: None,
            to: None,
            tab: None,
            all_metrics: false,
            data_dir: None,
            seed: None,
            quiet: false,
            verbose: false,
            format: None,
            html_dashboard: None,
            config: None,
            no_config: false,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cli_to_config_default() {
        let cli = create_default_cli();

        let config = cli_to_config(&cli);

        assert_eq!(config.data_dir, None);
        assert_eq!(config.organization, None);
        assert_eq!(config.seed, None);
        assert!(!config.quiet);
        assert!(!config.verbose);
        assert_eq!(config.output_format, None);
        assert_eq!(config.config_file, None);
        assert!(!config.no_config);
        assert_eq!(config.html_dashboard_path, None);
    }

    #[test]
    fn test_cli_to_config_all_options() {
        let mut cli = create_default_cli();
        cli.organization = Some("WASAC".to_string());
        cli.data_dir = Some("data".to_string());
        cli.seed = Some(99);
        cli.quiet = true;
        cli.verbose = true;
        cli.format = Some(output_formats::JSON.to_string());
        cli.html_dashboard = Some("out.html".to_string());
        cli.config = Some("config.toml".to_string());
        cli.no_config = true;

        let config = cli_to_config(&cli);

        assert_eq!(config.organization, Some("WASAC".to_string()));
        assert_eq!(config.data_dir, Some("data".to_string()));
        assert_eq!(config.seed, Some(99));
        assert!(config.quiet);
        assert!(config.verbose);
        assert_eq!(config.output_format, Some(output_formats::JSON.to_string()));
        assert_eq!(config.html_dashboard_path, Some("out.html".to_string()));
        assert_eq!(config.config_file, Some("config.toml".to_string()));
        assert!(config.no_config);
    }

    #[test]
    fn test_selection_defaults() -> Result<()> {
        let selection = create_default_cli().selection("EUCL")?;
        assert_eq!(selection.organization, "EUCL");
        assert_eq!(selection.year, YearSelection::All);
        assert_eq!(selection.range, None);
        assert_eq!(selection.tab, None);
        assert!(!selection.all_metrics);
        Ok(())
    }

    #[test]
    fn test_selection_parses_year_range_and_tab() -> Result<()> {
        let mut cli = create_default_cli();
        cli.year = Some("2023".to_string());
        cli.from = Some("2023-02".to_string());
        cli.to = Some("2023-04".to_string());
        cli.tab = Some("Financials & Projects".to_string());
        cli.all_metrics = true;

        let selection = cli.selection("EDCL")?;
        assert_eq!(selection.year, YearSelection::Year(2023));
        assert_eq!(
            selection.range,
            Some(DateRange {
                start: date(2023, 2, 1),
                end: date(2023, 4, 30)
            })
        );
        assert_eq!(selection.tab.as_deref(), Some("Financials & Projects"));
        assert!(selection.all_metrics);
        Ok(())
    }

    #[test]
    fn test_open_ended_range() -> Result<()> {
        let mut cli = create_default_cli();
        cli.from = Some("2022-06-15".to_string());
        let range = cli.date_range()?.unwrap();
        assert_eq!(range.start, date(2022, 6, 15));
        assert_eq!(range.end, NaiveDate::MAX);
        Ok(())
    }

    #[test]
    fn test_invalid_selection_arguments() {
        let mut cli = create_default_cli();
        cli.year = Some("twenty".to_string());
        assert!(matches!(
            cli.selection("EUCL"),
            Err(KpiDashError::InvalidArgument(_))
        ));

        let mut cli = create_default_cli();
        cli.from = Some("2023-05".to_string());
        cli.to = Some("2023-01".to_string());
        assert!(matches!(
            cli.date_range(),
            Err(KpiDashError::InvalidArgument(_))
        ));

        let mut cli = create_default_cli();
        cli.to = Some("May".to_string());
        assert!(cli.date_range().is_err());
    }

    #[test]
    fn test_cli_parses_from_args() {
        let cli = Cli::parse_from([
            "kpidash", "-o", "WASAC", "-y", "all", "--format", "json", "--seed", "3",
        ]);
        assert_eq!(cli.organization.as_deref(), Some("WASAC"));
        assert_eq!(cli.format.as_deref(), Some("json"));
        assert_eq!(cli.seed, Some(3));
        assert!(cli.command.is_none());

        let list = Cli::parse_from(["kpidash", "list"]);
        assert!(matches!(list.command, Some(Commands::List)));
    }
}
