use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::core::constants::{display, years};
use crate::core::error::{KpiDashError, Result};

/// One observation date of a KPI table.
///
/// `values` is aligned with the owning table's columns; `None` means the
/// cell had no usable number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// Time-indexed KPI table for one organization.
///
/// Dates are strictly increasing. Tables are immutable once built; every
/// filter produces a new table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct KpiTable {
    columns: Vec<String>,
    rows: Vec<KpiRow>,
}

impl KpiTable {
    /// Build a table, checking row width and date ordering.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use kpidash::core::types::{KpiRow, KpiTable};
    ///
    /// let date = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
    /// let table = KpiTable::new(
    ///     vec!["Revenue".to_string()],
    ///     vec![KpiRow { date, values: vec![Some(100.0)] }],
    /// ).unwrap();
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn new(columns: Vec<String>, rows: Vec<KpiRow>) -> Result<Self> {
        for row in &rows {
            if row.values.len() != columns.len() {
                return Err(KpiDashError::MalformedTable(format!(
                    "row dated {} has {} values, expected {}",
                    row.date,
                    row.values.len(),
                    columns.len()
                )));
            }
        }
        if let Some(pair) = rows.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(KpiDashError::MalformedTable(format!(
                "dates must be strictly increasing, found {} before {}",
                pair[0].date, pair[1].date
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[KpiRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Value of `column` in row `row`; `None` when the cell is missing or
    /// either index is out of range.
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.values.get(idx).copied().flatten()
    }

    /// `(date, value)` pairs of one column in date order
    pub fn column_series(&self, column: &str) -> Option<Vec<(NaiveDate, Option<f64>)>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|r| (r.date, r.values[idx])).collect())
    }

    /// Distinct years present, ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|r| r.date.year()).collect();
        years.dedup();
        years
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// New table holding only the rows accepted by `keep`
    pub fn filter_rows<F>(&self, keep: F) -> Self
    where
        F: Fn(&KpiRow) -> bool,
    {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

/// Outcome of a year's external audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOpinion {
    Clean,
    Qualified,
}

impl AuditOpinion {
    /// Binary encoding: clean = 1, qualified = 0
    pub fn as_flag(self) -> u8 {
        match self {
            AuditOpinion::Clean => 1,
            AuditOpinion::Qualified => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AuditOpinion::Clean => display::AUDIT_CLEAN,
            AuditOpinion::Qualified => display::AUDIT_QUALIFIED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GovernanceRow {
    pub year: i32,
    pub board_completeness: f64,
    pub audit_opinion: AuditOpinion,
    pub internal_audit_score: f64,
}

/// One row per calendar year, ascending
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GovernanceTable {
    rows: Vec<GovernanceRow>,
}

impl GovernanceTable {
    pub fn new(mut rows: Vec<GovernanceRow>) -> Self {
        rows.sort_by_key(|r| r.year);
        rows.dedup_by_key(|r| r.year);
        Self { rows }
    }

    pub fn rows(&self) -> &[GovernanceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest(&self) -> Option<&GovernanceRow> {
        self.rows.last()
    }

    pub fn filter_rows<F>(&self, keep: F) -> Self
    where
        F: Fn(&GovernanceRow) -> bool,
    {
        Self {
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalRow {
    pub date: NaiveDate,
    pub region: String,
    pub value: f64,
}

/// Per-region split of a single KPI, keyed by `(date, region)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalTable {
    kpi: String,
    rows: Vec<RegionalRow>,
}

impl RegionalTable {
    pub fn new(kpi: impl Into<String>, rows: Vec<RegionalRow>) -> Self {
        Self {
            kpi: kpi.into(),
            rows,
        }
    }

    pub fn kpi(&self) -> &str {
        &self.kpi
    }

    pub fn rows(&self) -> &[RegionalRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values recorded for one region, in date order
    pub fn region_values(&self, region: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|r| r.region == region)
            .map(|r| r.value)
            .collect()
    }

    pub fn filter_rows<F>(&self, keep: F) -> Self
    where
        F: Fn(&RegionalRow) -> bool,
    {
        Self {
            kpi: self.kpi.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}

/// Year chosen in the dashboard, or every year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YearSelection {
    #[default]
    All,
    Year(i32),
}

impl YearSelection {
    pub fn matches(self, year: i32) -> bool {
        match self {
            YearSelection::All => true,
            YearSelection::Year(selected) => selected == year,
        }
    }

    pub fn is_all(self) -> bool {
        matches!(self, YearSelection::All)
    }
}

impl fmt::Display for YearSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSelection::All => write!(f, "{}", years::ALL_YEARS_LABEL),
            YearSelection::Year(year) => write!(f, "{year}"),
        }
    }
}

impl FromStr for YearSelection {
    type Err = KpiDashError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(years::ALL_YEARS_ARG)
            || trimmed.eq_ignore_ascii_case(years::ALL_YEARS_LABEL)
        {
            return Ok(YearSelection::All);
        }
        trimmed.parse::<i32>().map(YearSelection::Year).map_err(|_| {
            KpiDashError::InvalidArgument(format!(
                "Year '{trimmed}' is not valid. Expected a calendar year or '{}'.",
                years::ALL_YEARS_ARG
            ))
        })
    }
}

/// Inclusive date interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(KpiDashError::InvalidArgument(format!(
                "Date range start {start} is after its end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Overlap of two ranges, `None` when they are disjoint
    pub fn intersect(&self, other: &DateRange) -> Option<DateRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(DateRange { start, end })
    }

    /// Parse a range start; `YYYY-MM` means the first day of that month
    pub fn parse_start(s: &str) -> Result<NaiveDate> {
        parse_bound(s, false)
    }

    /// Parse a range end; `YYYY-MM` means the last day of that month
    pub fn parse_end(s: &str) -> Result<NaiveDate> {
        parse_bound(s, true)
    }
}

fn parse_bound(s: &str, end_of_month: bool) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let invalid = || {
        KpiDashError::InvalidArgument(format!(
            "Date '{s}' is not valid. Expected YYYY-MM or YYYY-MM-DD."
        ))
    };

    let (year, month) = s.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    if !end_of_month {
        return Ok(first);
    }

    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month.and_then(|d| d.pred_opt()).ok_or_else(invalid)
}
