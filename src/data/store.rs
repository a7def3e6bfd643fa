use log::{debug, info, warn};

use crate::catalog::{self, Organization};
use crate::core::constants::years;
use crate::core::error::{KpiDashError, Result};
use crate::core::types::{GovernanceTable, KpiTable, RegionalTable};
use crate::data::loader::KpiSource;
use crate::data::synth::{Synthesizer, default_years};

/// Options that shape a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Seed for the synthetic tables; `None` draws from entropy
    pub seed: Option<u64>,
    /// First governance year when an organization has no observations
    pub default_start_year: i32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            seed: None,
            default_start_year: years::DEFAULT_START_YEAR,
        }
    }
}

/// Everything loaded for one organization
#[derive(Debug, Clone)]
pub struct OrgDataset {
    pub organization: &'static Organization,
    pub kpis: KpiTable,
    pub governance: GovernanceTable,
    /// Present only for organizations with a regional KPI
    pub regional: Option<RegionalTable>,
    pub coercion_failures: usize,
    pub dropped_rows: usize,
}

impl OrgDataset {
    /// Load one organization's table and synthesize its auxiliary tables
    pub fn load<S: KpiSource + ?Sized>(
        source: &S,
        organization: &'static Organization,
        synth: &mut Synthesizer,
        options: &LoadOptions,
    ) -> Result<Self> {
        let loaded = source.load_table(organization)?;
        let governance = synth.governance_for(
            &loaded.table,
            default_years(options.default_start_year),
        )?;
        let regional = match &organization.regional {
            Some(spec) => Some(synth.regional(&loaded.table, spec)?),
            None => None,
        };

        if loaded.coercion_failures > 0 {
            info!(
                "{}: {} cell(s) could not be read as numbers and are treated as missing",
                organization.name, loaded.coercion_failures
            );
        }
        debug!(
            "{}: {} rows, {} governance years, regional={}",
            organization.name,
            loaded.table.len(),
            governance.len(),
            regional.is_some()
        );

        Ok(Self {
            organization,
            kpis: loaded.table,
            governance,
            regional,
            coercion_failures: loaded.coercion_failures,
            dropped_rows: loaded.dropped_rows,
        })
    }
}

/// Every catalog organization, loaded once.
///
/// A failure only affects its own organization; the other dashboards stay
/// available.
#[derive(Debug)]
pub struct DataStore {
    entries: Vec<(&'static str, Result<OrgDataset>)>,
}

impl DataStore {
    pub fn load<S: KpiSource + ?Sized>(source: &S, options: &LoadOptions) -> Self {
        let mut synth = Synthesizer::new(options.seed);
        let entries = catalog::organizations()
            .iter()
            .map(|org| {
                let result = OrgDataset::load(source, org, &mut synth, options);
                if let Err(ref e) = result {
                    warn!("{}: {e}", org.name);
                }
                (org.name, result)
            })
            .collect();
        Self { entries }
    }

    /// Dataset of `name`, or the error that kept it from loading
    pub fn dataset(&self, name: &str) -> Result<&OrgDataset> {
        let organization = catalog::find(name)?;
        let (_, entry) = self
            .entries
            .iter()
            .find(|(n, _)| *n == organization.name)
            .ok_or_else(|| KpiDashError::UnknownOrganization(name.to_string()))?;

        match entry {
            Ok(dataset) => Ok(dataset),
            Err(e) => Err(replay(organization, e)),
        }
    }

    /// Names of the organizations that loaded
    pub fn available(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, r)| r.is_ok())
            .map(|(n, _)| *n)
            .collect()
    }

    /// Names of the organizations that failed, with the reason
    pub fn failures(&self) -> Vec<(&'static str, String)> {
        self.entries
            .iter()
            .filter_map(|(n, r)| r.as_ref().err().map(|e| (*n, e.to_string())))
            .collect()
    }
}

/// Owned copy of a stored load error
fn replay(organization: &Organization, err: &KpiDashError) -> KpiDashError {
    match err {
        KpiDashError::DataUnavailable { organization, path } => KpiDashError::DataUnavailable {
            organization: organization.clone(),
            path: path.clone(),
        },
        KpiDashError::MalformedTable(msg) => KpiDashError::MalformedTable(msg.clone()),
        other => KpiDashError::MalformedTable(format!("{}: {other}", organization.name)),
    }
}
