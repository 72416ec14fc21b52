//! Access to the external report engine.
//!
//! The comparison never computes report values itself; it asks a
//! [`ReportFetcher`] for them. Fetches are independent of each other, so a
//! [`FetchBatch`] may run them in parallel while keeping results in request
//! order.

pub mod fixture;

pub use fixture::FixtureFetcher;

use crate::logging;
use crate::report::ReportId;
use crate::request::RequestParams;
use crate::table::{Table, TableCollection};
use crate::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// What the report engine returned: one table, or one table per sub-period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchedReport {
    Table(Table),
    Collection(TableCollection),
}

impl FetchedReport {
    /// Collapse into a single table; sub-period boundaries are merged away.
    pub fn into_table(self) -> Table {
        match self {
            FetchedReport::Table(table) => table,
            FetchedReport::Collection(collection) => collection.merge_children(),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            FetchedReport::Table(table) => table.row_count(),
            FetchedReport::Collection(collection) => {
                collection.iter().map(|(_, table)| table.row_count()).sum()
            }
        }
    }
}

impl From<Table> for FetchedReport {
    fn from(table: Table) -> Self {
        FetchedReport::Table(table)
    }
}

impl From<TableCollection> for FetchedReport {
    fn from(collection: TableCollection) -> Self {
        FetchedReport::Collection(collection)
    }
}

/// The report-computation capability.
pub trait ReportFetcher: Sync {
    fn fetch(&self, report: &ReportId, params: &RequestParams) -> Result<FetchedReport>;
}

impl<T: ReportFetcher + ?Sized> ReportFetcher for &T {
    fn fetch(&self, report: &ReportId, params: &RequestParams) -> Result<FetchedReport> {
        (**self).fetch(report, params)
    }
}

impl<T: ReportFetcher + ?Sized> ReportFetcher for Box<T> {
    fn fetch(&self, report: &ReportId, params: &RequestParams) -> Result<FetchedReport> {
        (**self).fetch(report, params)
    }
}

/// Why a comparison table is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchPurpose {
    DateComparison,
    SegmentComparison { segment: String },
}

/// One planned call to the report engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchRequest {
    pub report: ReportId,
    pub params: RequestParams,
    pub purpose: FetchPurpose,
}

impl FetchRequest {
    /// Segment expression the fetched table should be tagged with.
    pub fn segment(&self) -> Option<&str> {
        match &self.purpose {
            FetchPurpose::SegmentComparison { segment } => Some(segment),
            FetchPurpose::DateComparison => None,
        }
    }
}

/// Runs a set of fetch requests and returns one table per request, in order.
pub struct FetchBatch<'a, F: ?Sized> {
    fetcher: &'a F,
    parallel: bool,
}

impl<'a, F: ReportFetcher + ?Sized> FetchBatch<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            parallel: true,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Execute all requests. The first failure aborts the batch.
    pub fn execute(&self, requests: &[FetchRequest]) -> Result<Vec<Table>> {
        if self.parallel && requests.len() > 1 {
            requests
                .par_iter()
                .map(|request| self.execute_single(request))
                .collect()
        } else {
            requests
                .iter()
                .map(|request| self.execute_single(request))
                .collect()
        }
    }

    /// Fetch one table, merging sub-period collections and tagging segment
    /// tables with their segment expression.
    pub fn execute_single(&self, request: &FetchRequest) -> Result<Table> {
        let start = Instant::now();
        let fetched = self.fetcher.fetch(&request.report, &request.params)?;
        let is_collection = matches!(fetched, FetchedReport::Collection(_));

        let mut table = fetched.into_table();
        if let Some(segment) = request.segment() {
            table.set_segment(segment);
        }

        logging::log_fetch(
            &request.report,
            &request.params,
            table.row_count(),
            is_collection,
            start.elapsed().as_millis(),
        );
        Ok(table)
    }
}
