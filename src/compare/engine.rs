//! Comparison entry point.
//!
//! [`ComparisonEngine::compare`] fetches every comparison table first and
//! only then mutates the host table, so a failed fetch leaves the table
//! exactly as it came in. Failures are logged and never returned.

use super::merger::{self, MergeSummary, SegmentSets};
use super::planner::ComparisonPlanner;
use crate::fetcher::{FetchBatch, FetchedReport, ReportFetcher};
use crate::logging;
use crate::period::Period;
use crate::report::{ReportId, ReportMetadataProvider};
use crate::request::RequestParams;
use crate::table::Table;
use crate::Result;

/// Tables fetched for one host table.
#[derive(Debug, Default)]
struct ComparisonTables {
    date: Option<Table>,
    base_segments: Vec<Table>,
    compared_segments: Vec<Table>,
}

pub struct ComparisonEngine<'a, F: ?Sized, M: ?Sized> {
    fetcher: &'a F,
    metadata: &'a M,
    parallel: bool,
}

impl<'a, F, M> ComparisonEngine<'a, F, M>
where
    F: ReportFetcher + ?Sized,
    M: ReportMetadataProvider + ?Sized,
{
    pub fn new(fetcher: &'a F, metadata: &'a M) -> Self {
        Self {
            fetcher,
            metadata,
            parallel: true,
        }
    }

    /// Fetch comparison tables concurrently (default) or one by one.
    pub fn with_parallel_fetch(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn planner<'r>(
        &'r self,
        report: &ReportId,
        request: &'r RequestParams,
    ) -> ComparisonPlanner<'r, M> {
        ComparisonPlanner::new(report.clone(), request, self.metadata)
    }

    /// Add comparison subtables to `table`, the result of `report` for
    /// `request`. Returns `table` unchanged when comparison does not apply
    /// or any comparison fetch fails.
    pub fn compare(&self, report: &ReportId, request: &RequestParams, table: Table) -> Table {
        let planner = self.planner(report, request);
        if let Some(reason) = planner.skip_reason() {
            logging::log_comparison_skipped(report, &reason.to_string());
            return table;
        }

        logging::log_comparison_start(report, table.row_count());
        match self.fetch_comparisons(&planner, &table) {
            Ok(tables) => self.merge(&planner, table, tables),
            Err(error) => {
                logging::log_comparison_fallback(report, &error);
                table
            }
        }
    }

    /// Like [`ComparisonEngine::compare`], but also accepts a collection,
    /// in which case every child table is compared on its own.
    pub fn compare_report(
        &self,
        report: &ReportId,
        request: &RequestParams,
        fetched: FetchedReport,
    ) -> FetchedReport {
        match fetched {
            FetchedReport::Table(table) => self.compare(report, request, table).into(),
            FetchedReport::Collection(collection) => collection
                .map_tables(|_, table| self.compare(report, request, table))
                .into(),
        }
    }

    fn fetch_comparisons(
        &self,
        planner: &ComparisonPlanner<'_, M>,
        table: &Table,
    ) -> Result<ComparisonTables> {
        let batch = FetchBatch::new(self.fetcher).parallel(self.parallel);

        let date = match planner.date_comparison() {
            Some(request) => Some(batch.execute_single(&request)?),
            None => None,
        };
        if date.as_ref().is_some_and(Table::is_empty) {
            return Ok(ComparisonTables {
                date,
                ..ComparisonTables::default()
            });
        }

        let mut requests = planner.segment_comparisons(table.period());
        let base_count = requests.len();
        if let Some(date) = &date {
            requests.extend(planner.segment_comparisons(date.period()));
        }
        logging::log_fetch_plan(date.is_some(), requests.len());

        let mut base_segments = batch.execute(&requests)?;
        let compared_segments = base_segments.split_off(base_count);
        Ok(ComparisonTables {
            date,
            base_segments,
            compared_segments,
        })
    }

    fn merge(
        &self,
        planner: &ComparisonPlanner<'_, M>,
        mut table: Table,
        tables: ComparisonTables,
    ) -> Table {
        let report = planner.report();
        if let Some(segment) = planner.base_segment() {
            table.set_segment(segment);
        }

        let summary = match &tables.date {
            Some(date) if date.is_empty() => {
                logging::log_empty_comparison(report);
                return table.empty_clone(true);
            }
            Some(date) => {
                let request = planner.request();
                let base_label = period_label(table.period(), request.get("date"));
                let compared_label = period_label(date.period(), request.get("date1"));
                let segments = (!tables.base_segments.is_empty()
                    && !tables.compared_segments.is_empty())
                .then(|| SegmentSets {
                    base: &tables.base_segments,
                    compared: &tables.compared_segments,
                });
                merger::merge_date_comparison(&mut table, date, &base_label, &compared_label, segments)
            }
            None => merger::merge_segment_comparison(&mut table, &tables.base_segments),
        };

        let MergeSummary { kept, dropped } = summary;
        logging::log_rows_dropped(dropped);
        logging::log_merge_complete(kept, dropped);
        table
    }
}

/// Pretty period string, or the raw request date for tables without a period.
fn period_label(period: Option<&Period>, fallback: Option<&str>) -> String {
    match period {
        Some(period) => period.pretty_string(),
        None => fallback.unwrap_or_default().to_string(),
    }
}
