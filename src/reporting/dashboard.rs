use crate::catalog::Favorability;
use crate::core::constants::display;
use crate::pipeline::DashboardView;
use crate::pipeline::metrics::{MetricSnapshot, MetricStatus, TrendSeries};
use crate::pipeline::view::RegionalBreakdown;
use std::fs;
use std::io;

/// Constants for dashboard styling and layout
mod dashboard_constants {
    /// Width of a full regional bar, in percent of the row
    pub const BAR_MAX_PERCENT: f64 = 100.0;

    /// Rows shown per trend table before it is truncated to the latest ones
    pub const MAX_TREND_ROWS: usize = 24;
}

/// Data structure containing all information needed for dashboard generation
#[derive(Debug, Clone)]
pub struct DashboardData {
    /// Assembled view of one organization and selection
    pub view: DashboardView,
    /// Timestamp when the dashboard was generated
    pub timestamp: String,
}

/// Error type for dashboard generation
#[derive(Debug)]
pub enum DashboardError {
    FileWrite(io::Error),
    Serialization(String),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::FileWrite(e) => write!(f, "Failed to write dashboard file: {e}"),
            DashboardError::Serialization(e) => write!(f, "Failed to serialize data: {e}"),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::FileWrite(e) => Some(e),
            DashboardError::Serialization(_) => None,
        }
    }
}

impl From<io::Error> for DashboardError {
    fn from(e: io::Error) -> Self {
        DashboardError::FileWrite(e)
    }
}

/// Static HTML rendering of a dashboard view
pub struct HtmlDashboard;

impl HtmlDashboard {
    /// Generate and write an HTML dashboard to the specified path
    pub fn generate_dashboard(
        data: &DashboardData,
        output_path: &str,
    ) -> Result<(), DashboardError> {
        let html_content = Self::generate_html_content(data)?;
        fs::write(output_path, html_content)?;
        Ok(())
    }

    /// Generate the complete HTML document content
    pub fn generate_html_content(data: &DashboardData) -> Result<String, DashboardError> {
        let view_json = serde_json::to_string(&data.view)
            .map_err(|e| DashboardError::Serialization(e.to_string()))?
            // Keep the payload from closing its script tag
            .replace("</", "<\\/");

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} Performance Overview - kpidash</title>
    <style>{}</style>
</head>
<body>
    {}
    <script>window.dashboardData = {};</script>
</body>
</html>"#,
            escape_html(data.view.header.name),
            Self::generate_css(data.view.header.branding.primary_color),
            Self::generate_body_content(data),
            view_json
        ))
    }

    fn generate_css(primary_color: &str) -> String {
        format!(
            r#"
        :root {{
            --primary-color: {primary_color};
            --success-color: #059669;
            --error-color: #dc2626;
            --muted-color: #64748b;
            --bg-color: #f8fafc;
            --card-bg: #ffffff;
            --border-color: #e2e8f0;
            --text-primary: #1e293b;
        }}

        * {{ margin: 0; padding: 0; box-sizing: border-box; }}

        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background-color: var(--bg-color);
            color: var(--text-primary);
            line-height: 1.6;
        }}

        .container {{ max-width: 1200px; margin: 0 auto; padding: 2rem; }}

        .header {{ display: flex; align-items: center; gap: 1.5rem; margin-bottom: 1.5rem; }}
        .header h1 {{ color: var(--primary-color); }}
        .header p {{ color: var(--muted-color); }}

        h3.section-title {{ color: var(--primary-color); margin: 2rem 0 1rem; }}

        .profile p {{ margin-bottom: 0.5rem; }}

        .cards {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
            gap: 1rem;
        }}

        .card {{
            background: var(--card-bg);
            border: 1px solid var(--border-color);
            border-radius: 8px;
            padding: 1rem 1.25rem;
        }}
        .card-label {{ font-size: 0.9rem; color: var(--muted-color); }}
        .card-value {{ font-size: 1.5rem; font-weight: 700; color: var(--primary-color); }}
        .card-delta {{ font-size: 0.9rem; }}
        .favorable {{ color: var(--success-color); }}
        .unfavorable {{ color: var(--error-color); }}
        .unknown {{ color: var(--muted-color); }}

        .notice {{
            background: var(--card-bg);
            border-left: 4px solid var(--primary-color);
            padding: 0.75rem 1rem;
            margin: 0.5rem 0;
        }}

        table {{ border-collapse: collapse; width: 100%; background: var(--card-bg); }}
        th, td {{ text-align: left; padding: 0.4rem 0.75rem; border-bottom: 1px solid var(--border-color); }}
        .trend {{ margin-bottom: 1.5rem; }}
        .trend h4 {{ margin-bottom: 0.5rem; }}

        .bar-row {{ display: flex; align-items: center; gap: 1rem; margin: 0.35rem 0; }}
        .bar-label {{ width: 160px; }}
        .bar-track {{ flex: 1; background: var(--border-color); border-radius: 4px; }}
        .bar {{ background: var(--primary-color); color: #fff; border-radius: 4px; padding: 0 0.5rem; white-space: nowrap; }}

        .footer {{ margin-top: 2rem; color: var(--muted-color); font-size: 0.9rem; }}
        "#
        )
    }

    /// Generate the main body content of the dashboard
    fn generate_body_content(data: &DashboardData) -> String {
        let view = &data.view;
        format!(
            r#"
            <div class="container">
                {}
                {}
                {}
                {}
                {}
                {}
                {}
                <p class="footer">This dashboard uses synthetic governance and regional data for demonstration purposes.</p>
            </div>
            "#,
            Self::generate_header_section(view, &data.timestamp),
            Self::generate_profile_section(view),
            Self::generate_snapshot_section(view),
            Self::generate_trends_section(view),
            Self::generate_regional_section(view.regional.as_ref()),
            Self::generate_governance_section(view),
            Self::generate_selection_section(view),
        )
    }

    /// Generate the dashboard header section
    fn generate_header_section(view: &DashboardView, timestamp: &str) -> String {
        format!(
            r#"
            <div class="header">
                <img src="{}" alt="{} logo" width="100" height="100">
                <div>
                    <h1>{} Performance Overview</h1>
                    <p>Tab: {} &bull; Generated on {} by kpidash</p>
                </div>
            </div>
            "#,
            escape_html(view.header.branding.logo_url),
            escape_html(view.header.name),
            escape_html(view.header.name),
            escape_html(view.tab),
            escape_html(timestamp)
        )
    }

    fn generate_profile_section(view: &DashboardView) -> String {
        let profile = &view.header.profile;
        format!(
            r#"
            <h3 class="section-title">Company Profile</h3>
            <div class="profile">
                <p><strong>Mandate:</strong> {}</p>
                <p><strong>Vision:</strong> {}</p>
                <p><strong>Strategic Plan Summary:</strong> {}</p>
            </div>
            "#,
            escape_html(profile.mandate),
            escape_html(profile.vision),
            escape_html(profile.strategic_plan)
        )
    }

    fn generate_selection_section(view: &DashboardView) -> String {
        let range = view.range.map_or_else(
            || display::NOT_AVAILABLE.to_string(),
            |r| format!("{} to {}", r.start, r.end),
        );
        let years = view
            .available_years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"
            <h3 class="section-title">Selection</h3>
            <div class="notice">Year: {} &bull; Date range: {} &bull; Available years: {}</div>
            "#,
            escape_html(&view.year.to_string()),
            range,
            if years.is_empty() { "none" } else { years.as_str() }
        )
    }

    /// Generate the metric cards section
    fn generate_snapshot_section(view: &DashboardView) -> String {
        if view.no_data {
            return r#"
                <h3 class="section-title">Current Performance Snapshot</h3>
                <div class="notice">No data available for the selected date range and year.</div>
                "#
            .to_string();
        }

        let cards = view
            .snapshot
            .metrics
            .iter()
            .map(Self::generate_metric_card)
            .collect::<Vec<_>>()
            .join("");

        format!(
            r#"
            <h3 class="section-title">Current Performance Snapshot</h3>
            <div class="cards">{cards}</div>
            "#
        )
    }

    /// Generate a single metric card
    fn generate_metric_card(metric: &MetricSnapshot) -> String {
        let delta = match &metric.formatted_delta {
            Some(delta) => format!(
                r#"<div class="card-delta {}">{} {}</div>"#,
                Self::favorability_class(metric.favorable),
                display::DELTA,
                escape_html(delta)
            ),
            None if metric.status == MetricStatus::MissingColumn => {
                r#"<div class="card-delta unknown">not in dataset</div>"#.to_string()
            }
            None => String::new(),
        };

        format!(
            r#"
            <div class="card">
                <div class="card-label">{}</div>
                <div class="card-value">{}</div>
                {}
            </div>
            "#,
            escape_html(&metric.kpi),
            escape_html(&metric.formatted),
            delta
        )
    }

    fn favorability_class(favorable: Favorability) -> &'static str {
        match favorable {
            Favorability::Favorable => "favorable",
            Favorability::Unfavorable => "unfavorable",
            Favorability::Unknown => "unknown",
        }
    }

    fn generate_trends_section(view: &DashboardView) -> String {
        let trends = view
            .trends
            .iter()
            .map(|t| Self::generate_trend_table(t, &view.header.name))
            .collect::<Vec<_>>()
            .join("");

        format!(
            r#"
            <h3 class="section-title">Key Trends Over Time ({})</h3>
            {}
            "#,
            escape_html(view.tab),
            trends
        )
    }

    /// Trend points as a table, latest rows last
    fn generate_trend_table(trend: &TrendSeries, organization: &str) -> String {
        match trend.status {
            MetricStatus::MissingColumn => {
                return format!(
                    r#"<div class="notice">The KPI column <strong>{}</strong> was not found in the dataset for {}.</div>"#,
                    escape_html(&trend.kpi),
                    escape_html(organization)
                );
            }
            MetricStatus::NoData => {
                return format!(
                    r#"<div class="notice">No trend data available for <strong>{}</strong> in the selected period for {}.</div>"#,
                    escape_html(&trend.kpi),
                    escape_html(organization)
                );
            }
            MetricStatus::Ready => {}
        }

        let skip = trend
            .points
            .len()
            .saturating_sub(dashboard_constants::MAX_TREND_ROWS);
        let rows = trend.points[skip..]
            .iter()
            .map(|p| format!("<tr><td>{}</td><td>{:.2}</td></tr>", p.date, p.value))
            .collect::<Vec<_>>()
            .join("");

        format!(
            r#"
            <div class="trend">
                <h4>{} Trend</h4>
                <table><thead><tr><th>Date</th><th>Value</th></tr></thead><tbody>{}</tbody></table>
            </div>
            "#,
            escape_html(&trend.kpi),
            rows
        )
    }

    /// Regional values as horizontal CSS bars
    fn generate_regional_section(regional: Option<&RegionalBreakdown>) -> String {
        let Some(regional) = regional else {
            return String::new();
        };
        if regional.rows.is_empty() {
            return format!(
                r#"
                <h3 class="section-title">{} by Region</h3>
                <div class="notice">No regional data in the selected period.</div>
                "#,
                escape_html(&regional.kpi)
            );
        }

        let bars = regional
            .rows
            .iter()
            .map(|row| {
                let width = row
                    .value
                    .clamp(0.0, dashboard_constants::BAR_MAX_PERCENT);
                format!(
                    r#"
                    <div class="bar-row">
                        <span class="bar-label">{}</span>
                        <div class="bar-track"><div class="bar" style="width: {width:.1}%">{:.1}%</div></div>
                    </div>
                    "#,
                    escape_html(&row.region),
                    row.value
                )
            })
            .collect::<Vec<_>>()
            .join("");

        let date = regional
            .date
            .map_or_else(String::new, |d| format!(" ({d})"));
        format!(
            r#"
            <h3 class="section-title">Latest {} by Region{}</h3>
            {}
            "#,
            escape_html(&regional.kpi),
            date,
            bars
        )
    }

    fn generate_governance_section(view: &DashboardView) -> String {
        let Some(status) = &view.governance else {
            return r#"
                <h3 class="section-title">Governance Status</h3>
                <div class="notice">No governance data available for the selected company or year.</div>
                "#
            .to_string();
        };

        let trend_rows = view
            .governance_trend
            .iter()
            .map(|p| {
                format!(
                    "<tr><td>{}</td><td>{:.1}%</td><td>{:.1}/100</td></tr>",
                    p.year, p.board_completeness, p.internal_audit_score
                )
            })
            .collect::<Vec<_>>()
            .join("");

        format!(
            r#"
            <h3 class="section-title">Governance Status ({})</h3>
            <div class="cards">
                <div class="card"><div class="card-label">Board Completeness</div><div class="card-value">{}</div></div>
                <div class="card"><div class="card-label">Audit Opinion (Latest)</div><div class="card-value">{}</div></div>
                <div class="card"><div class="card-label">Internal Audit Score</div><div class="card-value">{}</div></div>
            </div>
            <div class="trend">
                <h4>Governance Trend by Year</h4>
                <table><thead><tr><th>Year</th><th>Board Completeness</th><th>Internal Audit Score</th></tr></thead><tbody>{}</tbody></table>
            </div>
            "#,
            status.year,
            status.board_completeness,
            status.audit_opinion_label,
            status.internal_audit_score,
            trend_rows
        )
    }
}

/// Escape text for HTML element and attribute content
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::data::{OrgDataset, Synthesizer, read_kpi_csv};
    use crate::pipeline::Selection;
    use std::error::Error;
    use tempfile::NamedTempFile;

    const WASAC_CSV: &str = "\
Date,Water Coverage Rate (%),Non-Revenue Water (NRW %),Revenue
2023-01-31,71.0,38.0,900000
2023-02-28,72.5,37.0,950000
";

    fn dataset() -> OrgDataset {
        let organization = catalog::find("WASAC").unwrap();
        let loaded = read_kpi_csv(WASAC_CSV.as_bytes()).unwrap();
        let mut synth = Synthesizer::new(Some(3));
        OrgDataset {
            organization,
            governance: synth.governance_for(&loaded.table, 2020..=2020).unwrap(),
            regional: Some(
                synth
                    .regional(&loaded.table, organization.regional.as_ref().unwrap())
                    .unwrap(),
            ),
            kpis: loaded.table,
            coercion_failures: 0,
            dropped_rows: 0,
        }
    }

    fn create_test_dashboard_data(selection: Selection) -> DashboardData {
        DashboardData {
            view: DashboardView::build(&dataset(), &selection).unwrap(),
            timestamp: "2024-01-01 00:00:00 UTC".to_string(),
        }
    }

    #[test]
    fn test_generate_html_content() -> Result<(), DashboardError> {
        let data = create_test_dashboard_data(Selection::new("WASAC"));
        let html = HtmlDashboard::generate_html_content(&data)?;

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("WASAC Performance Overview"));
        assert!(html.contains("--primary-color: #007BFF"));
        assert!(html.contains("Current Performance Snapshot"));
        assert!(html.contains("Governance Status (2023)"));
        assert!(html.contains("window.dashboardData = {"));
        assert!(html.contains("</html>"));
        Ok(())
    }

    #[test]
    fn test_regional_bars_only_on_regional_tab() -> Result<(), DashboardError> {
        let overview = create_test_dashboard_data(Selection::new("WASAC"));
        assert!(!HtmlDashboard::generate_html_content(&overview)?.contains("class=\"bar-row\""));

        let supply = create_test_dashboard_data(
            Selection::new("WASAC").with_tab("Water Supply & Quality"),
        );
        let html = HtmlDashboard::generate_html_content(&supply)?;
        assert!(html.contains("by Region"));
        assert_eq!(html.matches("class=\"bar-row\"").count(), 5);
        assert!(html.contains("Water Supply &amp; Quality"));
        Ok(())
    }

    #[test]
    fn test_no_data_notice() -> Result<(), DashboardError> {
        let data = create_test_dashboard_data(
            Selection::new("WASAC").with_year(crate::core::types::YearSelection::Year(2001)),
        );
        let html = HtmlDashboard::generate_html_content(&data)?;
        assert!(html.contains("No data available for the selected date range and year."));
        assert!(html.contains("No governance data available"));
        Ok(())
    }

    #[test]
    fn test_generate_dashboard_file_creation() -> Result<(), Box<dyn std::error::Error>> {
        let data = create_test_dashboard_data(Selection::new("WASAC"));
        let temp_file = NamedTempFile::new()?;
        let temp_path = temp_file.path().to_str().unwrap();

        HtmlDashboard::generate_dashboard(&data, temp_path)?;

        let content = std::fs::read_to_string(temp_path)?;
        assert!(content.contains("<!DOCTYPE html>"));
        assert!(content.contains("Company Profile"));
        Ok(())
    }

    #[test]
    fn test_generate_metric_card_classes() {
        let data = create_test_dashboard_data(Selection::new("WASAC").with_all_metrics(true));
        let nrw = data
            .view
            .snapshot
            .get("Non-Revenue Water (NRW %)")
            .unwrap();
        let card = HtmlDashboard::generate_metric_card(nrw);
        assert!(card.contains("card-delta favorable"));
        assert!(card.contains("Δ -1.0%"));
    }

    #[test]
    fn test_dashboard_error_display() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let dashboard_error = DashboardError::FileWrite(io_error);
        let display_str = format!("{dashboard_error}");
        assert!(display_str.contains("Failed to write dashboard file"));
        assert!(display_str.contains("Permission denied"));

        let serialization_error = DashboardError::Serialization("Invalid JSON".to_string());
        assert!(
            format!("{serialization_error}").contains("Failed to serialize data: Invalid JSON")
        );
    }

    #[test]
    fn test_dashboard_error_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let dashboard_error = DashboardError::FileWrite(io_error);
        assert!(dashboard_error.source().is_some());

        let serialization_error = DashboardError::Serialization("Test".to_string());
        assert!(serialization_error.source().is_none());
    }

    #[test]
    fn test_dashboard_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::InvalidInput, "Invalid input");
        let dashboard_error = DashboardError::from(io_error);
        assert!(matches!(dashboard_error, DashboardError::FileWrite(_)));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">R&D's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;R&amp;D&#39;s&lt;/a&gt;"
        );
    }
}
