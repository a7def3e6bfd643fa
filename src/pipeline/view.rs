use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;

use crate::catalog::{Branding, Organization, Profile};
use crate::core::error::Result;
use crate::core::types::{DateRange, RegionalRow, YearSelection};
use crate::data::OrgDataset;
use crate::pipeline::filter;
use crate::pipeline::metrics::{
    GovernanceStatus, GovernanceTrendPoint, Snapshot, TrendSeries, derive_snapshot,
    governance_trend, trend_series,
};

/// What the user picked: organization, year, range and tab
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub organization: String,
    pub year: YearSelection,
    /// Sub-range of the selected year; the whole year when `None`
    pub range: Option<DateRange>,
    /// Tab name; the first tab when `None`
    pub tab: Option<String>,
    /// Derive cards for every column instead of the tab's KPIs
    pub all_metrics: bool,
}

impl Selection {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            ..Self::default()
        }
    }

    pub fn with_year(mut self, year: YearSelection) -> Self {
        self.year = year;
        self
    }

    pub fn with_range(mut self, range: Option<DateRange>) -> Self {
        self.range = range;
        self
    }

    pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = Some(tab.into());
        self
    }

    pub fn with_all_metrics(mut self, all_metrics: bool) -> Self {
        self.all_metrics = all_metrics;
        self
    }
}

/// Organization name, branding and profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub name: &'static str,
    pub branding: Branding,
    pub profile: Profile,
    pub tabs: Vec<&'static str>,
}

impl From<&Organization> for Header {
    fn from(org: &Organization) -> Self {
        Self {
            name: org.name,
            branding: org.branding,
            profile: org.profile,
            tabs: org.tab_names(),
        }
    }
}

/// Latest per-region values of the regional KPI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalBreakdown {
    pub kpi: String,
    /// Date the values were read from, `None` when the selection is empty
    pub date: Option<NaiveDate>,
    /// Highest value first
    pub rows: Vec<RegionalRow>,
}

/// Everything one dashboard page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub header: Header,
    pub tab: &'static str,
    pub year: YearSelection,
    /// Newest first
    pub available_years: Vec<i32>,
    /// Effective date range within the year's bounds, `None` when nothing is selected
    pub range: Option<DateRange>,
    /// True when the selection has no rows
    pub no_data: bool,
    pub snapshot: Snapshot,
    pub trends: Vec<TrendSeries>,
    pub governance: Option<GovernanceStatus>,
    pub governance_trend: Vec<GovernanceTrendPoint>,
    /// Only on the tab that carries the organization's regional KPI
    pub regional: Option<RegionalBreakdown>,
    pub coercion_failures: usize,
}

impl DashboardView {
    /// Run filter and derivation for one selection.
    ///
    /// Fails only for a tab the organization does not define; empty
    /// selections produce a view with `no_data` set.
    pub fn build(dataset: &OrgDataset, selection: &Selection) -> Result<Self> {
        let org = dataset.organization;
        let tab = match selection.tab.as_deref() {
            Some(name) => org.tab_or_err(name)?,
            None => org.default_tab(),
        };

        let by_year = filter::filter_by_year(&dataset.kpis, selection.year);
        // Effective range lies within the year's bounds; open ends are clamped
        let range = filter::range_bounds(&by_year).and_then(|bounds| match selection.range {
            Some(requested) => requested.intersect(&bounds),
            None => Some(bounds),
        });
        // A disjoint request still filters with itself so nothing matches
        let window = range.or(selection.range);
        let selected = filter::filter_by_range(&by_year, window.as_ref());
        if selected.is_empty() {
            info!(
                "{}: no data for {} within {:?}",
                org.name, selection.year, range
            );
        }

        let snapshot = if selection.all_metrics {
            derive_snapshot(&selected, selected.columns())
        } else {
            derive_snapshot(&selected, tab.kpis)
        };

        let trend_table = if selection.year.is_all() {
            &dataset.kpis
        } else {
            &selected
        };
        let trends = tab
            .kpis
            .iter()
            .map(|kpi| trend_series(trend_table, kpi))
            .collect();

        let governance_by_year = filter::filter_governance(&dataset.governance, selection.year);
        let governance = GovernanceStatus::from_table(&governance_by_year);

        let regional = match (&org.regional, &dataset.regional) {
            (Some(spec), Some(table)) if spec.tab == tab.name => {
                let filtered = filter::filter_regional(table, selection.year, window.as_ref());
                Some(RegionalBreakdown {
                    kpi: table.kpi().to_string(),
                    date: filter::latest_regional_date(&filtered),
                    rows: filter::latest_regional(&filtered),
                })
            }
            _ => None,
        };

        debug!(
            "Built view for {} / {}: {} card(s), {} trend(s), regional={}",
            org.name,
            tab.name,
            snapshot.metrics.len(),
            tab.kpis.len(),
            regional.is_some()
        );

        Ok(Self {
            header: Header::from(org),
            tab: tab.name,
            year: selection.year,
            available_years: filter::available_years(&dataset.kpis),
            range,
            no_data: selected.is_empty(),
            snapshot,
            trends,
            governance,
            governance_trend: governance_trend(&dataset.governance),
            regional,
            coercion_failures: dataset.coercion_failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, Favorability};
    use crate::core::KpiDashError;
    use crate::data::loader::read_kpi_csv;
    use crate::data::synth::Synthesizer;
    use crate::pipeline::metrics::MetricStatus;

    const EUCL_CSV: &str = "\
Date,Electricity Access Rate (%),System Loss Rate (%),Average Outage Duration (SAIDI),Revenue
2022-11-30,60.0,19.0,12.0,1000000
2022-12-31,61.0,18.5,11.0,1100000
2023-01-31,62.0,18.0,10.5,1200000
2023-02-28,63.5,18.4,10.0,1500000
";

    fn eucl() -> OrgDataset {
        let organization = catalog::find("EUCL").unwrap();
        let loaded = read_kpi_csv(EUCL_CSV.as_bytes()).unwrap();
        let mut synth = Synthesizer::new(Some(5));
        let governance = synth.governance_for(&loaded.table, 2020..=2021).unwrap();
        let regional = synth
            .regional(&loaded.table, organization.regional.as_ref().unwrap())
            .unwrap();
        OrgDataset {
            organization,
            kpis: loaded.table,
            governance,
            regional: Some(regional),
            coercion_failures: loaded.coercion_failures,
            dropped_rows: loaded.dropped_rows,
        }
    }

    #[test]
    fn test_default_selection_uses_first_tab_and_all_years() {
        let view = DashboardView::build(&eucl(), &Selection::new("EUCL")).unwrap();

        assert_eq!(view.tab, "Overview");
        assert_eq!(view.available_years, vec![2023, 2022]);
        assert!(!view.no_data);
        assert_eq!(view.snapshot.metrics.len(), 3);

        let access = view.snapshot.get("Electricity Access Rate (%)").unwrap();
        assert_eq!(access.latest, Some(63.5));
        assert_eq!(access.delta, Some(1.5));
        assert_eq!(access.favorable, Favorability::Favorable);

        let loss = view.snapshot.get("System Loss Rate (%)").unwrap();
        assert_eq!(loss.favorable, Favorability::Unfavorable);

        assert!(view.trends.iter().all(|t| t.points.len() == 4));
        assert_eq!(view.governance.as_ref().map(|g| g.year), Some(2023));
        assert!(view.regional.is_none());
    }

    #[test]
    fn test_year_selection_narrows_snapshot_and_trends() {
        let selection = Selection::new("EUCL").with_year(YearSelection::Year(2022));
        let view = DashboardView::build(&eucl(), &selection).unwrap();

        let access = view.snapshot.get("Electricity Access Rate (%)").unwrap();
        assert_eq!(access.latest, Some(61.0));
        assert_eq!(access.delta, Some(1.0));
        assert!(view.trends.iter().all(|t| t.points.len() == 2));
        assert_eq!(view.governance.as_ref().map(|g| g.year), Some(2022));
        assert_eq!(view.governance_trend.len(), 2);
    }

    #[test]
    fn test_empty_year_is_explicit_no_data() {
        let selection = Selection::new("EUCL").with_year(YearSelection::Year(2019));
        let view = DashboardView::build(&eucl(), &selection).unwrap();

        assert!(view.no_data);
        assert_eq!(view.range, None);
        assert!(
            view.snapshot
                .metrics
                .iter()
                .all(|m| m.status == MetricStatus::NoData)
        );
        assert!(view.governance.is_none());
    }

    #[test]
    fn test_regional_breakdown_only_on_its_tab() {
        let selection = Selection::new("EUCL").with_tab("operational efficiency");
        let view = DashboardView::build(&eucl(), &selection).unwrap();

        let regional = view.regional.unwrap();
        assert_eq!(regional.kpi, "Electricity Access Rate (%)");
        assert_eq!(regional.rows.len(), 5);
        assert_eq!(regional.date, NaiveDate::from_ymd_opt(2023, 2, 28));
        assert!(regional.rows.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn test_all_metrics_covers_every_column() {
        let selection = Selection::new("EUCL").with_all_metrics(true);
        let view = DashboardView::build(&eucl(), &selection).unwrap();
        assert_eq!(view.snapshot.metrics.len(), 4);
        assert_eq!(
            view.snapshot.get("Revenue").map(|m| m.formatted.as_str()),
            Some("1.5 M Frw")
        );
    }

    #[test]
    fn test_unknown_tab() {
        let selection = Selection::new("EUCL").with_tab("Hydrology");
        let err = DashboardView::build(&eucl(), &selection).unwrap_err();
        assert!(matches!(err, KpiDashError::UnknownTab { .. }));
    }

    #[test]
    fn test_range_selects_window() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2022, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
        )
        .unwrap();
        let selection = Selection::new("EUCL").with_range(Some(range));
        let view = DashboardView::build(&eucl(), &selection).unwrap();

        let access = view.snapshot.get("Electricity Access Rate (%)").unwrap();
        assert_eq!(access.latest, Some(62.0));
        assert_eq!(access.delta, Some(1.0));
        assert_eq!(view.range, Some(range));
        // all years: trends keep the full table
        assert!(view.trends.iter().all(|t| t.points.len() == 4));
    }

    #[test]
    fn test_open_ended_range_is_clamped_to_year() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let open_end = DateRange::new(date(2023, 2, 1), NaiveDate::MAX).unwrap();
        let selection = Selection::new("EUCL")
            .with_year(YearSelection::Year(2023))
            .with_range(Some(open_end));
        let view = DashboardView::build(&eucl(), &selection).unwrap();

        assert_eq!(
            view.range,
            Some(DateRange::new(date(2023, 2, 1), date(2023, 2, 28)).unwrap())
        );
        let access = view.snapshot.get("Electricity Access Rate (%)").unwrap();
        assert_eq!(access.latest, Some(63.5));

        let open_start = DateRange::new(NaiveDate::MIN, date(2022, 12, 15)).unwrap();
        let view =
            DashboardView::build(&eucl(), &Selection::new("EUCL").with_range(Some(open_start)))
                .unwrap();
        assert_eq!(
            view.range,
            Some(DateRange::new(date(2022, 11, 30), date(2022, 12, 15)).unwrap())
        );
        assert!(!view.no_data);
    }

    #[test]
    fn test_range_outside_year_is_no_data() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::MAX,
        )
        .unwrap();
        let selection = Selection::new("EUCL")
            .with_year(YearSelection::Year(2023))
            .with_range(Some(range));
        let view = DashboardView::build(&eucl(), &selection).unwrap();

        assert!(view.no_data);
        assert_eq!(view.range, None);
    }
}
