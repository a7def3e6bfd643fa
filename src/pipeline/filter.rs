//! Year and date-range narrowing.
//!
//! Every filter returns a new table; inputs are never modified. An empty
//! result is a normal outcome and callers report it as "no data".

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::core::types::{
    DateRange, GovernanceTable, KpiTable, RegionalRow, RegionalTable, YearSelection,
};

/// Rows dated within the selected year; a no-op for all years
pub fn filter_by_year(table: &KpiTable, year: YearSelection) -> KpiTable {
    if year.is_all() {
        return table.clone();
    }
    table.filter_rows(|r| year.matches(r.date.year()))
}

/// Rows dated within `range`, both ends inclusive; a no-op without one
pub fn filter_by_range(table: &KpiTable, range: Option<&DateRange>) -> KpiTable {
    match range {
        Some(range) => table.filter_rows(|r| range.contains(r.date)),
        None => table.clone(),
    }
}

/// Year filter, then range filter
pub fn apply(table: &KpiTable, year: YearSelection, range: Option<&DateRange>) -> KpiTable {
    let by_year = filter_by_year(table, year);
    let selected = filter_by_range(&by_year, range);
    debug!(
        "Filter year={year} range={range:?}: {} -> {} -> {} rows",
        table.len(),
        by_year.len(),
        selected.len()
    );
    selected
}

/// Governance rows of the selected year
pub fn filter_governance(table: &GovernanceTable, year: YearSelection) -> GovernanceTable {
    table.filter_rows(|r| year.matches(r.year))
}

/// Regional rows of the selected year and range
pub fn filter_regional(
    table: &RegionalTable,
    year: YearSelection,
    range: Option<&DateRange>,
) -> RegionalTable {
    table.filter_rows(|r| {
        year.matches(r.date.year()) && range.is_none_or(|range| range.contains(r.date))
    })
}

/// First and last date of a table, `None` when it has no rows.
///
/// An empty table has no meaningful interval, so callers must show a
/// no-data state instead of a range.
pub fn range_bounds(table: &KpiTable) -> Option<DateRange> {
    let start = table.first_date()?;
    let end = table.last_date()?;
    Some(DateRange { start, end })
}

/// Years present in the table, newest first
pub fn available_years(table: &KpiTable) -> Vec<i32> {
    let mut years = table.years();
    years.reverse();
    years
}

/// Rows at the table's latest date, highest value first
pub fn latest_regional(table: &RegionalTable) -> Vec<RegionalRow> {
    let Some(latest) = latest_regional_date(table) else {
        return Vec::new();
    };
    let mut rows: Vec<RegionalRow> = table
        .rows()
        .iter()
        .filter(|r| r.date == latest)
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    rows
}

/// Date of the latest regional rows
pub fn latest_regional_date(table: &RegionalTable) -> Option<NaiveDate> {
    table.rows().iter().map(|r| r.date).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AuditOpinion, GovernanceRow, KpiRow};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> KpiTable {
        let dates = [
            date(2022, 11, 30),
            date(2022, 12, 31),
            date(2023, 1, 31),
            date(2023, 2, 28),
            date(2023, 3, 31),
        ];
        let rows = dates
            .iter()
            .enumerate()
            .map(|(i, d)| KpiRow {
                date: *d,
                values: vec![Some(100.0 + i as f64)],
            })
            .collect();
        KpiTable::new(vec!["Revenue".to_string()], rows).unwrap()
    }

    #[test]
    fn test_all_years_is_noop() {
        let table = sample();
        assert_eq!(filter_by_year(&table, YearSelection::All), table);
    }

    #[test]
    fn test_year_filter_keeps_only_that_year() {
        let filtered = filter_by_year(&sample(), YearSelection::Year(2023));
        assert_eq!(filtered.len(), 3);
        assert!(filtered.rows().iter().all(|r| r.date.year() == 2023));
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = DateRange::new(date(2022, 12, 31), date(2023, 2, 28)).unwrap();
        let filtered = apply(&sample(), YearSelection::All, Some(&range));
        assert_eq!(filtered.first_date(), Some(date(2022, 12, 31)));
        assert_eq!(filtered.last_date(), Some(date(2023, 2, 28)));
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_empty_year_has_no_bounds() {
        let filtered = filter_by_year(&sample(), YearSelection::Year(1999));
        assert!(filtered.is_empty());
        assert_eq!(filtered.columns(), ["Revenue"]);
        assert_eq!(range_bounds(&filtered), None);
    }

    #[test]
    fn test_range_bounds_and_available_years() {
        let table = sample();
        assert_eq!(
            range_bounds(&table),
            Some(DateRange {
                start: date(2022, 11, 30),
                end: date(2023, 3, 31)
            })
        );
        assert_eq!(available_years(&table), vec![2023, 2022]);
    }

    #[test]
    fn test_governance_year_filter() {
        let rows = (2020..=2023)
            .map(|year| GovernanceRow {
                year,
                board_completeness: 90.0,
                audit_opinion: AuditOpinion::Clean,
                internal_audit_score: 75.0,
            })
            .collect();
        let table = GovernanceTable::new(rows);
        assert_eq!(filter_governance(&table, YearSelection::All).len(), 4);
        let one = filter_governance(&table, YearSelection::Year(2021));
        assert_eq!(one.latest().map(|r| r.year), Some(2021));
        assert!(filter_governance(&table, YearSelection::Year(2030)).is_empty());
    }

    #[test]
    fn test_latest_regional_sorted_descending() {
        let row = |d: NaiveDate, region: &str, value: f64| RegionalRow {
            date: d,
            region: region.to_string(),
            value,
        };
        let table = RegionalTable::new(
            "Water Coverage Rate (%)",
            vec![
                row(date(2023, 1, 31), "Kigali City", 90.0),
                row(date(2023, 1, 31), "Eastern Province", 50.0),
                row(date(2023, 2, 28), "Kigali City", 92.0),
                row(date(2023, 2, 28), "Eastern Province", 55.0),
                row(date(2023, 2, 28), "Western Province", 60.0),
            ],
        );

        let latest = latest_regional(&table);
        let regions: Vec<&str> = latest.iter().map(|r| r.region.as_str()).collect();
        assert_eq!(
            regions,
            vec!["Kigali City", "Western Province", "Eastern Province"]
        );
        assert_eq!(latest_regional_date(&table), Some(date(2023, 2, 28)));

        let january = DateRange::new(date(2023, 1, 1), date(2023, 1, 31)).unwrap();
        let filtered = filter_regional(&table, YearSelection::Year(2023), Some(&january));
        assert_eq!(filtered.len(), 2);
        assert!(latest_regional(&filter_regional(&table, YearSelection::Year(2020), None)).is_empty());
    }
}
