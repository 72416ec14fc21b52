//! A [`ReportFetcher`] that answers from a JSON fixture file.
//!
//! ```json
//! [
//!   { "module": "Referrers", "action": "getWebsites",
//!     "params": { "date": "2024-01-31", "period": "day" },
//!     "report": { "rows": [ { "label": "example.org", "columns": { "nb_visits": 5 } } ] } },
//!   { "module": "Referrers", "action": "getWebsites",
//!     "params": { "date": "last2" },
//!     "report": { "collection": { "2024-01-30": { "rows": [] }, "2024-01-31": { "rows": [] } } } }
//! ]
//! ```
//!
//! A fetch is answered by the first entry with the same module and action
//! whose `params` all appear with equal values in the request.

use super::{FetchedReport, ReportFetcher};
use crate::period::{Period, PeriodKind};
use crate::report::ReportId;
use crate::request::RequestParams;
use crate::table::{Table, TableCollection};
use crate::{CompareError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FixtureReport {
    Collection { collection: TableCollection },
    Table(Table),
}

#[derive(Debug, Clone, Deserialize)]
struct FixtureEntry {
    module: String,
    action: String,
    #[serde(default)]
    params: BTreeMap<String, String>,
    report: FixtureReport,
}

/// Fixture-backed report engine.
#[derive(Debug, Clone)]
pub struct FixtureFetcher {
    entries: Vec<FixtureEntry>,
    today: NaiveDate,
}

impl FixtureFetcher {
    /// Load fixtures from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            CompareError::FileError(format!("Failed to read fixture file {:?}: {}", path, e))
        })?;
        Self::from_json(&contents).map_err(|e| e.wrap_err(format!("in fixture file {:?}", path)))
    }

    /// Parse fixtures from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let deserializer = &mut serde_json::Deserializer::from_str(json);
        let entries: Vec<FixtureEntry> = serde_path_to_error::deserialize(deserializer)
            .map_err(|e| CompareError::Fixture(format!("{} at {}", e.inner(), e.path())))?;

        tracing::debug!(entries = entries.len(), "Loaded report fixtures");
        Ok(Self {
            entries,
            today: chrono::Local::now().date_naive(),
        })
    }

    /// Anchor for relative dates (`today`, `yesterday`, `lastN`).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attach the requested period to tables that do not declare one.
    fn tag_period(&self, table: &mut Table, period: &str, date: &str) {
        if table.period().is_some() {
            return;
        }
        match Period::from_request(period, date, self.today) {
            Ok(resolved) => table.set_period(resolved),
            Err(e) => tracing::debug!(period, date, error = %e, "Fixture table left without period"),
        }
    }

    /// Children of a collection are keyed by their start date.
    fn tag_child_periods(&self, collection: TableCollection, period: &str) -> TableCollection {
        let kind = PeriodKind::parse(period).unwrap_or(PeriodKind::Day);
        collection.map_tables(|key, mut table| {
            if table.period().is_none() {
                let resolved = NaiveDate::parse_from_str(key, "%Y-%m-%d")
                    .ok()
                    .and_then(|start| Period::containing(kind, start).ok());
                if let Some(resolved) = resolved {
                    table.set_period(resolved);
                }
            }
            table
        })
    }
}

impl ReportFetcher for FixtureFetcher {
    fn fetch(&self, report: &ReportId, params: &RequestParams) -> Result<FetchedReport> {
        let entry = self
            .entries
            .iter()
            .find(|entry| {
                entry.module == report.module
                    && entry.action == report.action
                    && params.matches(&entry.params)
            })
            .ok_or_else(|| CompareError::Fetch {
                report: report.to_string(),
                message: format!("no fixture matches {}", params),
            })?;

        let period = params.get("period").unwrap_or("day");
        let date = params.get("date").unwrap_or("today");

        Ok(match entry.report.clone() {
            FixtureReport::Table(mut table) => {
                self.tag_period(&mut table, period, date);
                FetchedReport::Table(table)
            }
            FixtureReport::Collection { collection } => {
                FetchedReport::Collection(self.tag_child_periods(collection, period))
            }
        })
    }
}
