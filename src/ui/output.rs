//! Output formatting and display logic for kpidash

use serde::Serialize;

use crate::catalog;
use crate::core::constants::{display, output_formats};
use crate::core::error::Result;
use crate::data::DataStore;
use crate::pipeline::metrics::{GovernanceStatus, MetricSnapshot, MetricStatus, TrendSeries};
use crate::pipeline::view::{DashboardView, RegionalBreakdown};
use crate::ui::color::{Colors, colorize, favorability_color, heading};

/// Print a dashboard view in the requested format
pub fn display_view(view: &DashboardView, format: &str) -> Result<()> {
    println!("{}", render_view(view, format)?);
    Ok(())
}

/// Render a dashboard view; unknown formats fall back to text
pub fn render_view(view: &DashboardView, format: &str) -> Result<String> {
    match format {
        output_formats::JSON => Ok(serde_json::to_string_pretty(view)?),
        output_formats::MINIMAL => Ok(render_minimal(view)),
        _ => Ok(render_text(view)),
    }
}

/// Colored, sectioned terminal output
fn render_text(view: &DashboardView) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "{} {}",
        display::CHART_EMOJI,
        heading(view.header.name, Colors::BRIGHT_CYAN)
    ));
    lines.push(format!(
        "{} {}",
        colorize("Mandate:", Colors::DIM),
        view.header.profile.mandate
    ));
    lines.push(format!(
        "{}: {}  {}: {}  {}: {}",
        colorize("Tab", Colors::BRIGHT_CYAN),
        colorize(view.tab, Colors::BRIGHT_WHITE),
        colorize("Year", Colors::BRIGHT_CYAN),
        colorize(&view.year.to_string(), Colors::BRIGHT_WHITE),
        colorize("Range", Colors::BRIGHT_CYAN),
        colorize(&range_label(view), Colors::BRIGHT_WHITE),
    ));
    lines.push(format!(
        "{}: {}",
        colorize("Tabs", Colors::DIM),
        view.header.tabs.join(", ")
    ));
    lines.push(String::new());

    // Snapshot cards
    if view.no_data {
        lines.push(format!(
            "{} {}",
            colorize(display::WARNING_EMOJI, Colors::BRIGHT_YELLOW),
            colorize(
                "No data available for the selected date range and year.",
                Colors::BRIGHT_YELLOW
            )
        ));
    } else {
        let period = view
            .snapshot
            .period
            .map_or_else(|| display::NOT_AVAILABLE.to_string(), |d| d.to_string());
        lines.push(heading(
            &format!("Snapshot (as of {period})"),
            Colors::BRIGHT_CYAN,
        ));
        for metric in &view.snapshot.metrics {
            lines.push(format!("   {}", text_card(metric)));
        }
    }

    if !view.trends.is_empty() {
        lines.push(String::new());
        lines.push(heading("Trends", Colors::BRIGHT_CYAN));
        for series in &view.trends {
            lines.push(format!("   {}: {}", series.kpi, trend_summary(series)));
        }
    }

    if let Some(ref regional) = view.regional {
        lines.push(String::new());
        lines.extend(regional_lines(regional));
    }

    lines.push(String::new());
    match view.governance {
        Some(ref governance) => lines.extend(governance_lines(governance)),
        None => {
            lines.push(heading("Governance", Colors::BRIGHT_CYAN));
            lines.push(format!("   {}", colorize("no governance data", Colors::DIM)));
        }
    }

    lines.join("\n")
}

fn text_card(metric: &MetricSnapshot) -> String {
    let value = match metric.status {
        MetricStatus::Ready => colorize(&metric.formatted, Colors::BRIGHT_WHITE),
        MetricStatus::NoData => colorize(display::NOT_AVAILABLE, Colors::DIM),
        MetricStatus::MissingColumn => {
            colorize(&format!("{} (column missing)", display::NOT_AVAILABLE), Colors::DIM)
        }
    };
    match metric.formatted_delta {
        Some(ref delta) => format!(
            "{}: {} {}",
            metric.kpi,
            value,
            colorize(
                &format!("{} {delta}", delta_arrow(metric)),
                favorability_color(metric.favorable)
            )
        ),
        None => format!("{}: {}", metric.kpi, value),
    }
}

/// Arrow follows the sign of the change, color follows its favorability
fn delta_arrow(metric: &MetricSnapshot) -> &'static str {
    match metric.delta {
        Some(d) if d > 0.0 => display::UP_ARROW,
        Some(d) if d < 0.0 => display::DOWN_ARROW,
        _ => display::DELTA,
    }
}

fn trend_summary(series: &TrendSeries) -> String {
    match series.status {
        MetricStatus::MissingColumn => "column missing".to_string(),
        _ => match (series.points.first(), series.points.last()) {
            (Some(first), Some(last)) => format!(
                "{} point(s), {} to {}",
                series.points.len(),
                first.date,
                last.date
            ),
            _ => "no trend data".to_string(),
        },
    }
}

fn regional_lines(regional: &RegionalBreakdown) -> Vec<String> {
    let mut lines = Vec::new();
    let date = regional
        .date
        .map_or_else(|| display::NOT_AVAILABLE.to_string(), |d| d.to_string());
    lines.push(heading(
        &format!("{} by region ({date})", regional.kpi),
        Colors::BRIGHT_CYAN,
    ));
    if regional.rows.is_empty() {
        lines.push(format!("   {}", colorize("no data", Colors::DIM)));
    }
    let width = regional
        .rows
        .iter()
        .map(|r| r.region.chars().count())
        .max()
        .unwrap_or(0);
    for row in &regional.rows {
        lines.push(format!("   {:<width$}  {:.1}%", row.region, row.value));
    }
    lines
}

fn governance_lines(governance: &GovernanceStatus) -> Vec<String> {
    let audit_color = if governance.audit_opinion.as_flag() == 1 {
        Colors::BRIGHT_GREEN
    } else {
        Colors::BRIGHT_RED
    };
    vec![
        heading(
            &format!("Governance ({})", governance.year),
            Colors::BRIGHT_CYAN,
        ),
        format!("   Board Completeness: {}", governance.board_completeness),
        format!(
            "   Audit Opinion: {}",
            colorize(&governance.audit_opinion_label, audit_color)
        ),
        format!(
            "   Internal Audit Score: {}",
            governance.internal_audit_score
        ),
    ]
}

fn range_label(view: &DashboardView) -> String {
    match view.range {
        Some(range) => format!("{} to {}", range.start, range.end),
        None => display::NOT_AVAILABLE.to_string(),
    }
}

/// Plain tab-separated lines without colors or emojis
fn render_minimal(view: &DashboardView) -> String {
    let mut lines = vec![format!("{}\t{}\t{}", view.header.name, view.tab, view.year)];
    if view.no_data {
        lines.push("no data".to_string());
        return lines.join("\n");
    }
    for metric in &view.snapshot.metrics {
        let value = match metric.status {
            MetricStatus::Ready => metric.formatted.as_str(),
            _ => display::NOT_AVAILABLE,
        };
        lines.push(format!(
            "{}\t{}\t{}",
            metric.kpi,
            value,
            metric.formatted_delta.as_deref().unwrap_or("")
        ));
    }
    lines.join("\n")
}

/// One row of the `list` command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationListing {
    pub name: &'static str,
    pub file_name: &'static str,
    pub available: bool,
    pub tabs: Vec<&'static str>,
    pub error: Option<String>,
}

/// Every catalog organization with its load outcome
pub fn organization_listing(store: &DataStore) -> Vec<OrganizationListing> {
    let failures = store.failures();
    catalog::organizations()
        .iter()
        .map(|org| {
            let error = failures
                .iter()
                .find(|(name, _)| *name == org.name)
                .map(|(_, reason)| reason.clone());
            OrganizationListing {
                name: org.name,
                file_name: org.file_name,
                available: error.is_none(),
                tabs: org.tab_names(),
                error,
            }
        })
        .collect()
}

/// Print the organization list in the requested format
pub fn display_organization_list(store: &DataStore, format: &str) -> Result<()> {
    println!("{}", render_organization_list(store, format)?);
    Ok(())
}

pub fn render_organization_list(store: &DataStore, format: &str) -> Result<String> {
    let listing = organization_listing(store);
    match format {
        output_formats::JSON => Ok(serde_json::to_string_pretty(&listing)?),
        output_formats::MINIMAL => Ok(listing
            .iter()
            .map(|l| {
                let state = if l.available { "available" } else { "unavailable" };
                format!("{}\t{}\t{}", l.name, state, l.tabs.join("|"))
            })
            .collect::<Vec<_>>()
            .join("\n")),
        _ => {
            let mut lines = vec![format!(
                "{} {}",
                display::CHART_EMOJI,
                heading("Organizations", Colors::BRIGHT_CYAN)
            )];
            for l in &listing {
                match l.error {
                    None => lines.push(format!(
                        "   {} {} ({})",
                        colorize(display::SUCCESS_EMOJI, Colors::BRIGHT_GREEN),
                        l.name,
                        l.file_name
                    )),
                    Some(ref reason) => lines.push(format!(
                        "   {} {} {}",
                        colorize(display::ERROR_EMOJI, Colors::BRIGHT_RED),
                        l.name,
                        colorize(reason, Colors::DIM)
                    )),
                }
                lines.push(format!("      Tabs: {}", l.tabs.join(", ")));
            }
            Ok(lines.join("\n"))
        }
    }
}
