use clap::Parser;
use kpidash::catalog;
use kpidash::config::{CliConfig, Config};
use kpidash::core::constants::output_formats;
use kpidash::core::error::Result;
use kpidash::data::{CsvDirectorySource, cache};
use kpidash::pipeline::DashboardView;
use kpidash::reporting::logging;
use kpidash::reporting::{DashboardData, HtmlDashboard};
use kpidash::ui::output;
use kpidash::ui::{Cli, Commands, cli_to_config};

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Load, filter, derive and render one dashboard, or list organizations
fn run(cli: &Cli) -> Result<()> {
    let cli_config = cli_to_config(cli);
    let config = load_and_merge_config(&cli_config)?;

    logging::init_logger(config.verbose.unwrap_or(false), cli_config.quiet);
    logging::log_config_info(&config);

    let source = CsvDirectorySource::new(config.data_dir());
    let store = cache::get_or_load(&source, &config.load_options());
    logging::log_load_summary(store);

    if let Some(Commands::List) = cli.command {
        return output::display_organization_list(store, config.output_format());
    }

    let organization = match config.organization.as_deref() {
        Some(name) => catalog::find(name)?,
        None => catalog::default_organization(),
    };
    let selection = cli.selection(organization.name)?;
    let dataset = store.dataset(organization.name).inspect_err(|e| {
        if e.is_organization_scoped() {
            logging::log_warning(&format!(
                "{} unavailable; loaded organizations: {}",
                organization.name,
                store.available().join(", ")
            ));
        }
    })?;
    let view = DashboardView::build(dataset, &selection)?;
    logging::log_view_summary(&view);

    output::display_view(&view, config.output_format())?;

    if let Some(ref dashboard_path) = config.html_dashboard_path {
        write_dashboard(view, dashboard_path, config.output_format());
    }

    Ok(())
}

/// Load configuration from file or standard locations and merge with CLI config
fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file).inspect_err(|e| {
            logging::log_error(
                &format!("Could not load config file '{config_file}'"),
                Some(e),
            );
        })?
    } else {
        Config::load_from_standard_locations()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    config.validate()?;
    Ok(config)
}

/// A failed dashboard write is reported but does not fail the run
fn write_dashboard(view: DashboardView, dashboard_path: &str, format: &str) {
    let dashboard_data = DashboardData {
        view,
        timestamp: chrono::Utc::now()
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
    };

    match HtmlDashboard::generate_dashboard(&dashboard_data, dashboard_path) {
        Err(e) => {
            logging::log_error("Failed to generate HTML dashboard", Some(&e));
            eprintln!("Warning: Failed to generate HTML dashboard: {e}");
        }
        // Keep machine-readable stdout clean
        Ok(()) if format == output_formats::TEXT => {
            println!("📊 HTML dashboard generated: {dashboard_path}");
        }
        Ok(()) => eprintln!("HTML dashboard generated: {dashboard_path}"),
    }
}
