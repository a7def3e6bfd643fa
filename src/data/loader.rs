use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::catalog::Organization;
use crate::core::constants::columns;
use crate::core::error::{KpiDashError, Result};
use crate::core::types::{DateRange, KpiRow, KpiTable};

/// Cell contents that mean "no value" rather than a parse failure
const MISSING_MARKERS: [&str; 6] = ["", "nan", "n/a", "na", "null", "-"];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// KPI table as read from its source, with what was recovered on the way
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTable {
    pub table: KpiTable,
    /// Cells that held text which could not be read as a number
    pub coercion_failures: usize,
    /// Rows dropped for an unreadable or repeated date
    pub dropped_rows: usize,
}

/// Where organization tables come from
pub trait KpiSource {
    fn load_table(&self, organization: &Organization) -> Result<LoadedTable>;
}

/// Reads `<data_dir>/<organization file name>`
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    data_dir: PathBuf,
}

impl CsvDirectorySource {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, organization: &Organization) -> PathBuf {
        self.data_dir.join(organization.file_name)
    }
}

impl KpiSource for CsvDirectorySource {
    fn load_table(&self, organization: &Organization) -> Result<LoadedTable> {
        let path = self.path_for(organization);
        let unavailable = || KpiDashError::DataUnavailable {
            organization: organization.name.to_string(),
            path: path.display().to_string(),
        };

        if !path.is_file() {
            return Err(unavailable());
        }
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => unavailable(),
            _ => KpiDashError::Io(e),
        })?;

        debug!("Reading {} from {}", organization.name, path.display());
        read_kpi_csv(file).map_err(|e| match e {
            KpiDashError::MalformedTable(msg) => {
                KpiDashError::MalformedTable(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }
}

/// Read a KPI table from CSV.
///
/// The `Date` column is required; every other column is coerced to a
/// number or missing. Rows are sorted by date and a repeated date keeps its
/// first row.
pub fn read_kpi_csv<R: Read>(reader: R) -> Result<LoadedTable> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let date_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(columns::DATE))
        .ok_or_else(|| {
            KpiDashError::MalformedTable(format!("missing '{}' column", columns::DATE))
        })?;
    let value_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut rows: Vec<KpiRow> = Vec::new();
    let mut coercion_failures = 0;
    let mut dropped_rows = 0;

    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        let raw_date = record.get(date_idx).unwrap_or_default();
        let Some(date) = parse_date(raw_date) else {
            warn!("Dropping data row {}: unreadable date '{raw_date}'", line + 1);
            dropped_rows += 1;
            continue;
        };

        let values = value_columns
            .iter()
            .map(|(i, name)| {
                let cell = record.get(*i).unwrap_or_default();
                let (value, failed) = coerce_cell(cell);
                if failed {
                    debug!("Treating '{cell}' in '{name}' on {date} as missing");
                    coercion_failures += 1;
                }
                value
            })
            .collect();
        rows.push(KpiRow { date, values });
    }

    rows.sort_by_key(|r| r.date);
    let before = rows.len();
    rows.dedup_by(|later, earlier| {
        let duplicate = later.date == earlier.date;
        if duplicate {
            warn!("Dropping repeated observation dated {}", later.date);
        }
        duplicate
    });
    dropped_rows += before - rows.len();

    let names = value_columns.into_iter().map(|(_, name)| name).collect();
    Ok(LoadedTable {
        table: KpiTable::new(names, rows)?,
        coercion_failures,
        dropped_rows,
    })
}

/// Parse an observation date; `YYYY-MM` means the first of the month
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim().trim_matches('"');
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| chrono::NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            // "YYYY-MM"
            (raw.len() == 7)
                .then(|| DateRange::parse_start(raw).ok())
                .flatten()
        })
}

/// Coerce one cell to a number.
///
/// Returns the value and whether the cell held text that was not a number.
/// Missing markers and non-finite numbers become `None` without counting as
/// a failure.
pub fn coerce_cell(cell: &str) -> (Option<f64>, bool) {
    let cell = cell.trim();
    if MISSING_MARKERS
        .iter()
        .any(|m| cell.eq_ignore_ascii_case(m))
    {
        return (None, false);
    }

    let cleaned: String = cell
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => (Some(v), false),
        Ok(_) => (None, false),
        Err(_) => (None, true),
    }
}
