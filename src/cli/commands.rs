use crate::cli::args::{CompareArgs, OutputFormat, PlanArgs, RequestArgs};
use crate::compare::{ComparisonEngine, ComparisonPlanner};
use crate::config::Config;
use crate::fetcher::{FetchedReport, FixtureFetcher, ReportFetcher};
use crate::logging;
use crate::period::Period;
use crate::report::ReportId;
use crate::request::RequestParams;
use crate::ui::formatter::Formatter;
use crate::{CompareError, Result};
use chrono::NaiveDate;
use miette::{IntoDiagnostic, WrapErr};

fn print_info(message: impl AsRef<str>) {
    println!("{}", Formatter::info(message));
}

fn print_warning(message: impl AsRef<str>) {
    println!("{}", Formatter::warning(message));
}

/// Execute the compare command
pub fn compare(args: CompareArgs, config: &Config) -> Result<()> {
    let (report, request, today) = parse_request(&args.request)?;

    let fetcher = FixtureFetcher::from_file(&args.fixtures)?.with_today(today);
    logging::log_display(
        format!("Loaded {} fixtures from {:?}", fetcher.len(), args.fixtures),
        logging::LogLevel::Debug,
    );

    let base = fetcher
        .fetch(&report, &request)
        .wrap_err_with(|| format!("Failed to load report {}", report))?;

    let registry = config.registry();
    let engine = ComparisonEngine::new(&fetcher, &registry).with_parallel_fetch(!args.sequential);
    let result = engine.compare_report(&report, &request, base);

    match args.request.format.unwrap_or_default() {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&result)
                .into_diagnostic()
                .wrap_err("Failed to serialize comparison result")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_report(&report, &result),
    }
    Ok(())
}

/// Execute the plan command
pub fn plan(args: PlanArgs, config: &Config) -> Result<()> {
    let (report, request, today) = parse_request(&args.request)?;
    let registry = config.registry();
    let planner = ComparisonPlanner::new(report, &request, &registry);

    let base_period = resolve_period(&request, today);
    let compared_period = planner
        .date_comparison()
        .and_then(|fetch| resolve_period(&fetch.params, today));
    let plan = planner.plan(base_period.as_ref(), compared_period.as_ref());

    match args.request.format.unwrap_or_default() {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&plan)
                .into_diagnostic()
                .wrap_err("Failed to serialize comparison plan")?;
            println!("{}", json);
        }
        OutputFormat::Text => println!("{}", Formatter::format_plan(&plan)),
    }
    Ok(())
}

fn parse_request(args: &RequestArgs) -> Result<(ReportId, RequestParams, NaiveDate)> {
    let report = ReportId::new(args.module.as_str(), args.action.as_str());
    if report.is_unknown() {
        return Err(CompareError::UnknownReport(format!("'{}'", report)).into());
    }
    let request = RequestParams::parse_pairs(&args.params)?;
    let today = match &args.today {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
            CompareError::InvalidRequest(format!("--today '{}': {}", value, e))
        })?,
        None => chrono::Local::now().date_naive(),
    };
    Ok((report, request, today))
}

/// Period selected by a request's `period`/`date`, when it is a single one.
fn resolve_period(params: &RequestParams, today: NaiveDate) -> Option<Period> {
    let period = params.non_empty("period")?;
    let date = params.non_empty("date")?;
    match Period::from_request(period, date, today) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            tracing::debug!(period, date, error = %e, "Request period not resolved");
            None
        }
    }
}

fn print_report(report: &ReportId, result: &FetchedReport) {
    print_info(format!("Report: {}", report));
    match result {
        FetchedReport::Table(table) => {
            if table.is_empty() {
                print_warning("No comparable rows.");
            }
            println!("{}", Formatter::format_table(table));
        }
        FetchedReport::Collection(collection) => {
            for (key, table) in collection.iter() {
                print_info(format!("\n{}", key));
                println!("{}", Formatter::format_table(table));
            }
        }
    }
}
