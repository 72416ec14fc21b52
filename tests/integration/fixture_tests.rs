//! Fixture-backed report engine driving the comparison end to end.

use chrono::NaiveDate;
use report_compare::fetcher::FixtureFetcher;
use report_compare::{
    ComparisonEngine, FetchedReport, ReportFetcher, ReportId, ReportRegistry, RequestParams,
};
use report_compare_mock::TableAssertions;
use std::io::Write;
use tempfile::NamedTempFile;

const FIXTURES: &str = r#"[
  { "module": "Referrers", "action": "getWebsites",
    "params": { "date": "2024-01-30", "segment": "browserCode==CH" },
    "report": { "rows": [ { "label": "example.org", "columns": { "nb_visits": 1 } } ] } },
  { "module": "Referrers", "action": "getWebsites",
    "params": { "date": "2024-01-31", "segment": "browserCode==CH" },
    "report": { "rows": [ { "label": "example.org", "columns": { "nb_visits": 3 } } ] } },
  { "module": "Referrers", "action": "getWebsites",
    "params": { "date": "2024-01-30" },
    "report": { "rows": [
      { "label": "example.org", "columns": { "nb_visits": 2 } },
      { "label": "example.com", "columns": { "nb_visits": 8 } } ] } },
  { "module": "Referrers", "action": "getWebsites",
    "params": { "date": "2024-01-31" },
    "report": { "rows": [
      { "label": "example.org", "columns": { "nb_visits": 5 } },
      { "label": "example.net", "columns": { "nb_visits": 4 } } ] } },
  { "module": "Referrers", "action": "getWebsites",
    "params": { "date": "last2" },
    "report": { "collection": {
      "2024-01-30": { "rows": [ { "label": "example.org", "columns": { "nb_visits": 2 } } ] },
      "2024-01-31": { "rows": [ { "label": "example.org", "columns": { "nb_visits": 5 } } ] } } } }
]"#;

fn write_fixtures(json: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("failed to create temp file");
    f.write_all(json.as_bytes()).expect("write failed");
    f.flush().expect("flush failed");
    f
}

fn fetcher() -> FixtureFetcher {
    let file = write_fixtures(FIXTURES);
    FixtureFetcher::from_file(file.path())
        .expect("fixtures should load")
        .with_today(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
}

fn request(pairs: &[(&str, &str)]) -> RequestParams {
    pairs.iter().copied().collect()
}

#[test]
fn test_fixture_tables_carry_requested_period() {
    let fetcher = fetcher();
    let report = ReportId::new("Referrers", "getWebsites");
    let fetched = fetcher
        .fetch(&report, &request(&[("date", "2024-01-31"), ("period", "day")]))
        .unwrap();

    let table = fetched.into_table();
    assert_eq!(table.period().map(|p| p.pretty_string()).as_deref(), Some("2024-01-31"));
    assert_eq!(table.labels(), vec!["example.org", "example.net"]);
}

#[test]
fn test_full_comparison_from_fixtures() {
    let fetcher = fetcher();
    let registry = ReportRegistry::new();
    let engine = ComparisonEngine::new(&fetcher, &registry);
    let report = ReportId::new("Referrers", "getWebsites");
    let params = request(&[
        ("date", "2024-01-31"),
        ("period", "day"),
        ("date1", "2024-01-30"),
        ("period1", "day"),
        ("segment", "browserCode==FF"),
        ("segment1", "browserCode==CH"),
    ]);

    let base = fetcher.fetch(&report, &params).unwrap();
    let FetchedReport::Table(result) = engine.compare_report(&report, &params, base) else {
        panic!("expected a single table");
    };

    TableAssertions::new(&result)
        .assert_labels(&["example.org"])
        .assert_compared("example.org", &["2024-01-31", "2024-01-30"])
        .assert_metric("example.org", &["2024-01-30", "browserCode==CH"], "nb_visits", 1.0)
        .assert_metric("example.org", &["2024-01-31", "browserCode==CH"], "nb_visits", 3.0);
}

#[test]
fn test_multi_period_fixture_children_get_their_own_period() {
    let fetcher = fetcher();
    let report = ReportId::new("Referrers", "getWebsites");
    let fetched = fetcher
        .fetch(&report, &request(&[("date", "last2"), ("period", "day")]))
        .unwrap();

    let FetchedReport::Collection(collection) = fetched else {
        panic!("expected a collection");
    };
    let child = collection.get("2024-01-30").unwrap();
    assert_eq!(child.period().map(|p| p.range_string()).as_deref(), Some("2024-01-30,2024-01-30"));
}

#[test]
fn test_unmatched_fixture_request_is_a_fetch_error() {
    let fetcher = fetcher();
    let err = fetcher
        .fetch(&ReportId::new("Actions", "getPageUrls"), &RequestParams::new())
        .unwrap_err();
    assert!(err.to_string().contains("Actions.getPageUrls"));
}

#[test]
fn test_invalid_fixture_reports_json_path() {
    let err = FixtureFetcher::from_json(r#"[{ "module": "Referrers", "action": 3, "report": {} }]"#)
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("[0].action"), "unexpected message: {}", message);
}
