//! Display rule and favorable direction of each KPI
//!
//! Known KPIs are tagged explicitly in [`KNOWN_KPIS`]. Columns outside that
//! table fall back to [`MetricKind::classify`], which applies the name rules
//! in precedence order: compliance, financial, percentage/rate, bad-when-high,
//! count, plain decimal.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Which way a KPI should move to count as good news
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Whether a delta should be presented as positive news
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Favorability {
    Favorable,
    Unfavorable,
    Unknown,
}

impl Direction {
    /// A zero or missing delta is neither good nor bad news.
    pub fn favorability(self, delta: Option<f64>) -> Favorability {
        let Some(delta) = delta.filter(|d| d.is_finite()) else {
            return Favorability::Unknown;
        };
        if delta == 0.0 {
            return Favorability::Unknown;
        }
        let improved = match self {
            Direction::HigherIsBetter => delta > 0.0,
            Direction::LowerIsBetter => delta < 0.0,
        };
        if improved {
            Favorability::Favorable
        } else {
            Favorability::Unfavorable
        }
    }
}

/// Display rule of a KPI card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// 1/0 flag rendered as Compliant / Non-Compliant, no delta
    Compliance,
    /// Currency-scaled value
    Currency(Direction),
    /// One decimal with a percent suffix
    Percentage(Direction),
    /// One decimal, thousands grouped
    Decimal(Direction),
    /// Whole number, thousands grouped
    Count(Direction),
}

const COMPLIANCE_KPIS: [&str; 2] = [
    "Environmental & Social Compliance",
    "Accreditation/Standards Compliance",
];

const GROWTH_FINANCIALS: [&str; 2] = ["Revenue", "EBITDA"];
const COST_FINANCIALS: [&str; 2] = ["Expenses", "Cost per MW Installed"];

const PERCENTAGE_MARKERS: [&str; 4] = ["%", "Rate", "Efficiency", "Compliance"];

const BAD_WHEN_HIGH_MARKERS: [&str; 9] = [
    "Loss Rate",
    "Outage Duration",
    "Resolution Time",
    "Non-Revenue Water",
    "Expired Stock",
    "Length of Stay",
    "Mortality",
    "Delivery Time",
    "Lead Time",
];

const COUNT_MARKERS: [&str; 4] = ["MW", "km", "Number", "Count"];

impl MetricKind {
    /// Classify a KPI by its name alone.
    ///
    /// Rules are tried in order and the first match wins, so a rate-named
    /// bad-when-high KPI is caught by the percentage rule. Use
    /// [`metric_kind_for`] to get the explicit tag for known KPIs.
    pub fn classify(name: &str) -> Self {
        use Direction::*;

        if COMPLIANCE_KPIS.contains(&name) {
            return MetricKind::Compliance;
        }
        if GROWTH_FINANCIALS.contains(&name) {
            return MetricKind::Currency(HigherIsBetter);
        }
        if COST_FINANCIALS.contains(&name) || name.starts_with("Cost per ") {
            return MetricKind::Currency(LowerIsBetter);
        }
        if PERCENTAGE_MARKERS.iter().any(|m| name.contains(m)) {
            return MetricKind::Percentage(HigherIsBetter);
        }
        if BAD_WHEN_HIGH_MARKERS.iter().any(|m| name.contains(m)) {
            return if name.contains("Rate") {
                MetricKind::Percentage(LowerIsBetter)
            } else {
                MetricKind::Decimal(LowerIsBetter)
            };
        }
        if COUNT_MARKERS.iter().any(|m| name.contains(m)) {
            return MetricKind::Count(HigherIsBetter);
        }
        MetricKind::Decimal(HigherIsBetter)
    }

    /// Favorable direction, `None` for categorical KPIs
    pub fn direction(self) -> Option<Direction> {
        match self {
            MetricKind::Compliance => None,
            MetricKind::Currency(d)
            | MetricKind::Percentage(d)
            | MetricKind::Decimal(d)
            | MetricKind::Count(d) => Some(d),
        }
    }
}

/// Explicit tags for every KPI the catalog knows about
pub static KNOWN_KPIS: Lazy<HashMap<&'static str, MetricKind>> = Lazy::new(|| {
    use Direction::*;
    use MetricKind::*;

    HashMap::from([
        // Financials shared by several organizations
        ("Revenue", Currency(HigherIsBetter)),
        ("Expenses", Currency(LowerIsBetter)),
        ("EBITDA", Currency(HigherIsBetter)),
        ("Cost per MW Installed", Currency(LowerIsBetter)),
        ("Operational Expenditure per kWh", Currency(LowerIsBetter)),
        ("Revenue per kWh Sold", Currency(HigherIsBetter)),
        // Compliance flags
        ("Environmental & Social Compliance", Compliance),
        ("Accreditation/Standards Compliance", Compliance),
        // Energy
        ("Electricity Access Rate (%)", Percentage(HigherIsBetter)),
        ("System Loss Rate (%)", Percentage(LowerIsBetter)),
        ("Average Outage Duration (SAIDI)", Decimal(LowerIsBetter)),
        (
            "Customer Complaints Resolution Time (days)",
            Decimal(LowerIsBetter),
        ),
        ("Billing Efficiency (%)", Percentage(HigherIsBetter)),
        ("Collection Efficiency (%)", Percentage(HigherIsBetter)),
        (
            "Number of New Connections (per quarter)",
            Count(HigherIsBetter),
        ),
        ("New Generation Capacity Developed (MW)", Count(HigherIsBetter)),
        ("Projects Delivered On-Time (%)", Percentage(HigherIsBetter)),
        ("% of Funds Disbursed (Capex)", Percentage(HigherIsBetter)),
        ("Loan Absorption Rate (%)", Percentage(HigherIsBetter)),
        // Water
        ("Water Coverage Rate (%)", Percentage(HigherIsBetter)),
        ("Non-Revenue Water (NRW %)", Percentage(LowerIsBetter)),
        ("Average Water Outage Duration", Decimal(LowerIsBetter)),
        ("% of Water Quality Tests Passed", Percentage(HigherIsBetter)),
        ("Sewerage Network Coverage (%)", Percentage(HigherIsBetter)),
        ("Asset Maintenance Compliance (%)", Percentage(HigherIsBetter)),
        // Health
        ("Bed Occupancy Rate (%)", Percentage(HigherIsBetter)),
        ("Average Length of Stay (ALOS)", Decimal(LowerIsBetter)),
        ("Mortality Rate", Percentage(LowerIsBetter)),
        ("Patient Satisfaction Score", Decimal(HigherIsBetter)),
        ("Outpatient Visits per Month", Count(HigherIsBetter)),
        (
            "Insurance Claims Reimbursement Rate (%)",
            Percentage(HigherIsBetter),
        ),
        // Medical supply
        ("Stock Availability Rate (%)", Percentage(HigherIsBetter)),
        ("Order Fulfillment Rate (%)", Percentage(HigherIsBetter)),
        ("Cold Chain Compliance Rate (%)", Percentage(HigherIsBetter)),
        ("% of Expired Stock", Percentage(LowerIsBetter)),
        ("Health Facility Satisfaction Score", Decimal(HigherIsBetter)),
        ("Inventory Turnover Ratio", Decimal(HigherIsBetter)),
        (
            "Transportation Delivery Time (Avg. days)",
            Decimal(LowerIsBetter),
        ),
        ("Procurement Lead Time (Avg. days)", Decimal(LowerIsBetter)),
    ])
});

/// Explicit tag for a known KPI, name classification otherwise
pub fn metric_kind_for(name: &str) -> MetricKind {
    KNOWN_KPIS
        .get(name)
        .copied()
        .unwrap_or_else(|| MetricKind::classify(name))
}
