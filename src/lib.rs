pub mod cli;
pub mod compare;
pub mod config;
pub mod fetcher;
pub mod logging;
pub mod output;
pub mod period;
pub mod report;
pub mod request;
pub mod table;
pub mod ui;
use miette::Diagnostic;

pub use compare::{ComparisonEngine, ComparisonPlan, ComparisonPlanner};
pub use fetcher::{FetchRequest, FetchedReport, ReportFetcher};
pub use period::{Period, PeriodKind};
pub use report::{ReportId, ReportMetadata, ReportMetadataProvider, ReportRegistry};
pub use request::RequestParams;
pub use table::{Row, RowId, Table, TableCollection};

/// Result type alias for report comparison
pub type Result<T> = miette::Result<T>;

/// Error types for report comparison
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum CompareError {
    #[error("Failed to fetch report {report}: {message}")]
    #[diagnostic(
        code(report_compare::fetch_failed),
        help("The report engine rejected the request. Stale `idSubtable` values are a common cause; retry without them.")
    )]
    Fetch { report: String, message: String },

    #[error("Unknown report: {0}")]
    #[diagnostic(
        code(report_compare::unknown_report),
        help("Register the report under [[reports]] in .report-compare.toml or check the module/action spelling.")
    )]
    UnknownReport(String),

    #[error("Invalid period: {0}")]
    #[diagnostic(
        code(report_compare::invalid_period),
        help("Use day, week, month, year or range with a date like 2024-01-31, today, yesterday, last7 or 2024-01-01,2024-01-31.")
    )]
    InvalidPeriod(String),

    #[error("Invalid request parameter: {0}")]
    #[diagnostic(
        code(report_compare::invalid_request),
        help("Request parameters are passed as KEY=VALUE, e.g. --param date1=2024-01-01.")
    )]
    InvalidRequest(String),

    #[error("Invalid fixture file: {0}")]
    #[diagnostic(
        code(report_compare::fixture_error),
        help("Fixture files are JSON arrays of entries with module, action, params and report keys.")
    )]
    Fixture(String),

    #[error("File operation failed: {0}")]
    #[diagnostic(
        code(report_compare::file_error),
        help("Check if you have necessary permissions and that the path exists.")
    )]
    FileError(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(report_compare::config_error),
        help("See the [fetch], [output] and [[reports]] sections of .report-compare.toml.")
    )]
    Config(String),
}
