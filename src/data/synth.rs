use chrono::{Datelike, Local};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use std::ops::RangeInclusive;

use crate::catalog::RegionalSpec;
use crate::core::constants::{governance, regions};
use crate::core::error::{KpiDashError, Result};
use crate::core::types::{
    AuditOpinion, GovernanceRow, GovernanceTable, KpiTable, RegionalRow, RegionalTable,
};

/// Generator of the synthetic governance and regional datasets.
///
/// Seeded generators reproduce the same tables for the same inputs;
/// unseeded ones draw from OS entropy.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    rng: StdRng,
}

impl Synthesizer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    fn draw(&mut self, mean: f64, std_dev: f64) -> Result<f64> {
        // Normal::new only rejects a non-finite spread
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(KpiDashError::InvalidArgument(format!(
                "Cannot sample N({mean}, {std_dev}): spread must be finite and non-negative"
            )));
        }
        let normal = Normal::new(mean, std_dev).map_err(|e| {
            KpiDashError::InvalidArgument(format!(
                "Cannot sample N({mean}, {std_dev}): {e}"
            ))
        })?;
        Ok(normal.sample(&mut self.rng))
    }

    /// One governance row per year
    pub fn governance(&mut self, years: &[i32]) -> Result<GovernanceTable> {
        let mut rows = Vec::with_capacity(years.len());
        for &year in years {
            let board_completeness = self
                .draw(governance::BOARD_MEAN, governance::BOARD_STD_DEV)?
                .clamp(governance::BOARD_MIN, governance::BOARD_MAX);
            let audit_opinion = if self.rng.gen_bool(governance::CLEAN_AUDIT_PROBABILITY) {
                AuditOpinion::Clean
            } else {
                AuditOpinion::Qualified
            };
            let internal_audit_score = self
                .draw(
                    governance::INTERNAL_AUDIT_MEAN,
                    governance::INTERNAL_AUDIT_STD_DEV,
                )?
                .clamp(
                    governance::INTERNAL_AUDIT_MIN,
                    governance::INTERNAL_AUDIT_MAX,
                );

            rows.push(GovernanceRow {
                year,
                board_completeness,
                audit_opinion,
                internal_audit_score,
            });
        }
        Ok(GovernanceTable::new(rows))
    }

    /// Governance keyed to the years of `table`, or to `default_years` when
    /// the table has no rows
    pub fn governance_for(
        &mut self,
        table: &KpiTable,
        default_years: RangeInclusive<i32>,
    ) -> Result<GovernanceTable> {
        let years = if table.is_empty() {
            debug!("No observations, synthesizing governance for {default_years:?}");
            default_years.collect()
        } else {
            table.years()
        };
        self.governance(&years)
    }

    /// Regional split of `spec.kpi`, one row per (date, region).
    ///
    /// Every region of a date shares one base draw plus a ramp that reaches
    /// `spec.ramp_scale` at the last observation; the capital gets a positive
    /// offset and every other region a negative one. Values are clipped to
    /// [0, 100].
    pub fn regional(&mut self, table: &KpiTable, spec: &RegionalSpec) -> Result<RegionalTable> {
        let steps = table.len().saturating_sub(1).max(1) as f64;
        let mut rows = Vec::with_capacity(table.len() * regions::ALL.len());

        for (position, row) in table.rows().iter().enumerate() {
            let ramp = position as f64 / steps * spec.ramp_scale;
            let base = self.draw(spec.base_mean, spec.base_std_dev)? + ramp;

            for region in regions::ALL {
                let offset = if region == regions::CAPITAL {
                    self.draw(spec.capital_mean, spec.capital_std_dev)?
                } else {
                    self.draw(spec.other_mean, spec.other_std_dev)?
                };
                rows.push(RegionalRow {
                    date: row.date,
                    region: region.to_string(),
                    value: (base + offset).clamp(regions::MIN_VALUE, regions::MAX_VALUE),
                });
            }
        }

        Ok(RegionalTable::new(spec.kpi, rows))
    }
}

/// Default governance years: `start_year` through the current year
pub fn default_years(start_year: i32) -> RangeInclusive<i32> {
    let current = Local::now().year();
    start_year..=current.max(start_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::core::types::KpiRow;
    use chrono::NaiveDate;

    fn monthly_table(months: usize) -> KpiTable {
        let start = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let rows = (0..months)
            .map(|i| KpiRow {
                date: start
                    .checked_add_months(chrono::Months::new(i as u32))
                    .unwrap(),
                values: vec![Some(i as f64)],
            })
            .collect();
        KpiTable::new(vec!["Electricity Access Rate (%)".to_string()], rows).unwrap()
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn test_governance_values_within_bounds() {
        let mut synth = Synthesizer::new(Some(7));
        let years: Vec<i32> = (1990..2090).collect();
        let table = synth.governance(&years).unwrap();

        assert_eq!(table.len(), 100);
        for row in table.rows() {
            assert!((80.0..=100.0).contains(&row.board_completeness));
            assert!((60.0..=100.0).contains(&row.internal_audit_score));
        }
        let clean = table
            .rows()
            .iter()
            .filter(|r| r.audit_opinion == AuditOpinion::Clean)
            .count();
        assert!(clean > 70, "expected mostly clean opinions, got {clean}");
    }

    #[test]
    fn test_governance_for_uses_table_years() {
        let mut synth = Synthesizer::new(Some(1));
        let table = monthly_table(18);
        let governance = synth.governance_for(&table, 2020..=2021).unwrap();
        let years: Vec<i32> = governance.rows().iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2019, 2020]);
    }

    #[test]
    fn test_governance_for_empty_table_uses_default_range() {
        let mut synth = Synthesizer::new(Some(1));
        let empty = monthly_table(0);
        let governance = synth.governance_for(&empty, 2020..=2023).unwrap();
        let years: Vec<i32> = governance.rows().iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2020, 2021, 2022, 2023]);
    }

    #[test]
    fn test_seeded_synthesis_is_reproducible() {
        let spec = catalog::find("EUCL").unwrap().regional.unwrap();
        let table = monthly_table(12);

        let first = Synthesizer::new(Some(42)).regional(&table, &spec).unwrap();
        let second = Synthesizer::new(Some(42)).regional(&table, &spec).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_regional_values_clipped_and_capital_leads() {
        for org in ["EUCL", "WASAC"] {
            let spec = catalog::find(org).unwrap().regional.unwrap();
            let table = monthly_table(240);
            let regional = Synthesizer::new(Some(2024))
                .regional(&table, &spec)
                .unwrap();

            assert_eq!(regional.len(), 240 * regions::ALL.len());
            assert_eq!(regional.kpi(), spec.kpi);
            assert!(
                regional
                    .rows()
                    .iter()
                    .all(|r| (0.0..=100.0).contains(&r.value))
            );

            let capital = mean(&regional.region_values(regions::CAPITAL));
            for region in regions::ALL.iter().skip(1) {
                let other = mean(&regional.region_values(region));
                assert!(capital > other, "{org}: {capital} <= {other} for {region}");
            }
        }
    }

    #[test]
    fn test_regional_rejects_invalid_spread() {
        let mut spec = catalog::find("WASAC").unwrap().regional.unwrap();
        spec.base_std_dev = -1.0;
        let result = Synthesizer::new(Some(3)).regional(&monthly_table(3), &spec);
        assert!(matches!(result, Err(KpiDashError::InvalidArgument(_))));

        spec.base_std_dev = f64::NAN;
        let result = Synthesizer::new(Some(3)).regional(&monthly_table(3), &spec);
        assert!(matches!(result, Err(KpiDashError::InvalidArgument(_))));
    }

    #[test]
    fn test_draw_rejects_negative_spread() {
        let mut synth = Synthesizer::new(Some(3));
        assert!(matches!(
            synth.draw(50.0, -0.5),
            Err(KpiDashError::InvalidArgument(_))
        ));
        assert!(synth.draw(50.0, 0.0).is_ok_and(|v| v == 50.0));
    }

    #[test]
    fn test_default_years_reaches_current_year() {
        let range = default_years(2020);
        assert_eq!(*range.start(), 2020);
        assert!(*range.end() >= 2024);
        assert_eq!(*default_years(3000).end(), 3000);
    }
}
