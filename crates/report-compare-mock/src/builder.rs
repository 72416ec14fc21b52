use crate::mock::MockFetcher;
use chrono::NaiveDate;
use report_compare::{FetchedReport, Period, ReportId, Row, Table};

/// Fluent construction of report tables.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row with a single `nb_visits` metric.
    pub fn row(self, label: &str, visits: f64) -> Self {
        self.row_with(Row::new(label).with_metric("nb_visits", visits))
    }

    pub fn row_with(mut self, row: Row) -> Self {
        self.table.add_row(row);
        self
    }

    /// Tag the table with the day `date` (`YYYY-MM-DD`).
    ///
    /// Panics on a malformed date; this is a test helper.
    pub fn day(self, date: &str) -> Self {
        self.period(Period::day(parse_date(date)))
    }

    pub fn period(mut self, period: Period) -> Self {
        self.table.set_period(period);
        self
    }

    pub fn segment(mut self, segment: &str) -> Self {
        self.table.set_segment(segment);
        self
    }

    pub fn filter(mut self, name: &str) -> Self {
        self.table.add_filter(name);
        self
    }

    pub fn build(self) -> Table {
        self.table
    }
}

pub(crate) fn parse_date(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("invalid test date '{}': {}", date, e))
}

/// Fluent construction of a [`MockFetcher`] for one report.
pub struct MockFetcherBuilder {
    report: ReportId,
    fetcher: MockFetcher,
}

impl MockFetcherBuilder {
    pub fn new(module: &str, action: &str) -> Self {
        Self {
            report: ReportId::new(module, action),
            fetcher: MockFetcher::new(),
        }
    }

    /// Answer requests for `date`.
    pub fn on_date(self, date: &str, result: impl Into<FetchedReport>) -> Self {
        self.on(&[("date", date)], result)
    }

    /// Answer requests for `segment` over `date`.
    pub fn on_segment(self, date: &str, segment: &str, result: impl Into<FetchedReport>) -> Self {
        self.on(&[("date", date), ("segment", segment)], result)
    }

    pub fn on(mut self, params: &[(&str, &str)], result: impl Into<FetchedReport>) -> Self {
        self.fetcher.register(self.report.clone(), params, result);
        self
    }

    pub fn build(self) -> MockFetcher {
        self.fetcher
    }
}
