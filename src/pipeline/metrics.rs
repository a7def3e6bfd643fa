//! Snapshot cards, trend series and governance status.
//!
//! The snapshot is the last row of the filtered table compared with the row
//! before it. An empty table yields an explicit no-data card per KPI.

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::catalog::{Favorability, MetricKind, metric_kind_for};
use crate::core::constants::{currency, display};
use crate::core::types::{AuditOpinion, GovernanceTable, KpiTable};
use crate::pipeline::currency::{format_currency, group_thousands};

/// Whether a card or series could be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Ready,
    /// The filtered table has no rows
    NoData,
    /// The KPI is not a column of the table
    MissingColumn,
}

/// One metric card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSnapshot {
    pub kpi: String,
    pub kind: MetricKind,
    pub status: MetricStatus,
    pub latest: Option<f64>,
    /// Latest minus the previous row; `None` with fewer than two rows or a
    /// missing value on either side
    pub delta: Option<f64>,
    pub formatted: String,
    pub formatted_delta: Option<String>,
    pub favorable: Favorability,
}

impl MetricSnapshot {
    fn unavailable(kpi: &str, kind: MetricKind, status: MetricStatus) -> Self {
        Self {
            kpi: kpi.to_string(),
            kind,
            status,
            latest: None,
            delta: None,
            formatted: display::NOT_AVAILABLE.to_string(),
            formatted_delta: None,
            favorable: Favorability::Unknown,
        }
    }
}

/// Cards for one tab, in tab order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// True when the filtered table had no rows
    pub no_data: bool,
    /// Date of the row the cards were read from
    pub period: Option<NaiveDate>,
    pub metrics: Vec<MetricSnapshot>,
}

impl Snapshot {
    pub fn get(&self, kpi: &str) -> Option<&MetricSnapshot> {
        self.metrics.iter().find(|m| m.kpi == kpi)
    }
}

/// Latest value and delta of one column
pub fn latest_and_delta(table: &KpiTable, column: &str) -> (Option<f64>, Option<f64>) {
    let n = table.len();
    if n == 0 {
        return (None, None);
    }
    let latest = table.value(n - 1, column);
    let delta = if n >= 2 {
        latest
            .zip(table.value(n - 2, column))
            .map(|(current, previous)| current - previous)
    } else {
        None
    };
    (latest, delta)
}

/// Card for one KPI
pub fn derive_metric(table: &KpiTable, kpi: &str) -> MetricSnapshot {
    let kind = metric_kind_for(kpi);
    if table.is_empty() {
        return MetricSnapshot::unavailable(kpi, kind, MetricStatus::NoData);
    }
    if !table.has_column(kpi) {
        return MetricSnapshot::unavailable(kpi, kind, MetricStatus::MissingColumn);
    }

    let (latest, delta) = latest_and_delta(table, kpi);
    if kind == MetricKind::Compliance {
        return MetricSnapshot {
            kpi: kpi.to_string(),
            kind,
            status: MetricStatus::Ready,
            latest,
            delta: None,
            formatted: format_value(kind, latest),
            formatted_delta: None,
            favorable: Favorability::Unknown,
        };
    }

    let favorable = kind
        .direction()
        .map_or(Favorability::Unknown, |d| d.favorability(delta));
    MetricSnapshot {
        kpi: kpi.to_string(),
        kind,
        status: MetricStatus::Ready,
        latest,
        delta,
        formatted: format_value(kind, latest),
        formatted_delta: delta.map(|d| format_delta(kind, d)),
        favorable,
    }
}

/// Cards for `kpis` from the last two rows of `table`.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use kpidash::core::types::{KpiRow, KpiTable};
/// use kpidash::pipeline::metrics::derive_snapshot;
///
/// let row = |d, v| KpiRow { date: NaiveDate::from_ymd_opt(2023, 1, d).unwrap(), values: vec![Some(v)] };
/// let table = KpiTable::new(vec!["Revenue".into()], vec![row(1, 100.0), row(2, 120.0)]).unwrap();
/// let snapshot = derive_snapshot(&table, &["Revenue"]);
/// assert_eq!(snapshot.get("Revenue").unwrap().delta, Some(20.0));
/// ```
pub fn derive_snapshot<S: AsRef<str>>(table: &KpiTable, kpis: &[S]) -> Snapshot {
    let metrics: Vec<MetricSnapshot> = kpis
        .iter()
        .map(|kpi| derive_metric(table, kpi.as_ref()))
        .collect();
    debug!(
        "Derived {} card(s) from {} row(s)",
        metrics.len(),
        table.len()
    );
    Snapshot {
        no_data: table.is_empty(),
        period: table.last_date(),
        metrics,
    }
}

/// Display string of a card value
pub fn format_value(kind: MetricKind, value: Option<f64>) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return display::NOT_AVAILABLE.to_string();
    };
    match kind {
        MetricKind::Compliance => {
            if value == 1.0 {
                display::COMPLIANT.to_string()
            } else {
                display::NON_COMPLIANT.to_string()
            }
        }
        MetricKind::Currency(_) => {
            format!("{} {}", format_currency(Some(value)), currency::SYMBOL)
        }
        MetricKind::Percentage(_) => format!("{}%", group_thousands(value, 1)),
        MetricKind::Decimal(_) => group_thousands(value, 1),
        MetricKind::Count(_) => group_thousands(value, 0),
    }
}

/// Display string of a delta; increases carry a leading `+`
pub fn format_delta(kind: MetricKind, delta: f64) -> String {
    let body = match kind {
        MetricKind::Compliance => return display::NOT_AVAILABLE.to_string(),
        MetricKind::Currency(_) => {
            format!("{} {}", format_currency(Some(delta)), currency::SYMBOL)
        }
        MetricKind::Percentage(_) => format!("{}%", group_thousands(delta, 1)),
        MetricKind::Decimal(_) => group_thousands(delta, 1),
        MetricKind::Count(_) => group_thousands(delta, 0),
    };
    if delta > 0.0 { format!("+{body}") } else { body }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Line-chart data of one KPI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub kpi: String,
    pub status: MetricStatus,
    pub points: Vec<TrendPoint>,
}

/// Points of `kpi` in date order, missing values dropped
pub fn trend_series(table: &KpiTable, kpi: &str) -> TrendSeries {
    let Some(series) = table.column_series(kpi) else {
        return TrendSeries {
            kpi: kpi.to_string(),
            status: MetricStatus::MissingColumn,
            points: Vec::new(),
        };
    };

    let points: Vec<TrendPoint> = series
        .into_iter()
        .filter_map(|(date, value)| value.map(|value| TrendPoint { date, value }))
        .collect();
    let status = if points.is_empty() {
        MetricStatus::NoData
    } else {
        MetricStatus::Ready
    };
    TrendSeries {
        kpi: kpi.to_string(),
        status,
        points,
    }
}

/// Governance cards of the latest selected year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GovernanceStatus {
    pub year: i32,
    pub board_completeness: String,
    pub audit_opinion: AuditOpinion,
    pub audit_opinion_label: String,
    pub internal_audit_score: String,
}

impl GovernanceStatus {
    /// Status of the table's latest year, `None` when it has no rows
    pub fn from_table(table: &GovernanceTable) -> Option<Self> {
        let latest = table.latest()?;
        Some(Self {
            year: latest.year,
            board_completeness: format!("{:.1}%", latest.board_completeness),
            audit_opinion: latest.audit_opinion,
            audit_opinion_label: latest.audit_opinion.label().to_string(),
            internal_audit_score: format!("{:.1}/100", latest.internal_audit_score),
        })
    }
}

/// Yearly governance trend point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GovernanceTrendPoint {
    pub year: i32,
    pub board_completeness: f64,
    pub internal_audit_score: f64,
}

pub fn governance_trend(table: &GovernanceTable) -> Vec<GovernanceTrendPoint> {
    table
        .rows()
        .iter()
        .map(|r| GovernanceTrendPoint {
            year: r.year,
            board_completeness: r.board_completeness,
            internal_audit_score: r.internal_audit_score,
        })
        .collect()
}
