//! End-to-end comparison passes against the mock report engine.

use report_compare::{
    ComparisonEngine, ReportId, ReportMetadata, ReportRegistry, RequestParams, Table,
    TableCollection,
};
use report_compare_mock::{FailingFetcher, MockFetcherBuilder, TableAssertions, TableBuilder};

fn websites() -> ReportId {
    ReportId::new("Referrers", "getWebsites")
}

fn registry() -> ReportRegistry {
    ReportRegistry::new()
        .with_report(ReportMetadata::new("Referrers", "getWebsites"))
        .with_report(ReportMetadata::new("VisitsSummary", "get").without_dimension())
}

fn request(pairs: &[(&str, &str)]) -> RequestParams {
    pairs.iter().copied().collect()
}

fn base_table() -> Table {
    TableBuilder::new()
        .row("A", 5.0)
        .row("B", 3.0)
        .row("C", 7.0)
        .day("2024-01-31")
        .filter("Sort")
        .build()
}

#[test]
fn test_date_comparison_aligns_by_label() {
    let fetcher = MockFetcherBuilder::new("Referrers", "getWebsites")
        .on_date(
            "2024-01-30",
            TableBuilder::new().row("A", 2.0).row("C", 1.0).day("2024-01-30").build(),
        )
        .build();
    let registry = registry();
    let engine = ComparisonEngine::new(&fetcher, &registry);
    let params = request(&[
        ("date", "2024-01-31"),
        ("period", "day"),
        ("date1", "2024-01-30"),
        ("period1", "day"),
    ]);

    let result = engine.compare(&websites(), &params, base_table());

    TableAssertions::new(&result)
        .assert_labels(&["A", "C"])
        .assert_compared("A", &["2024-01-31", "2024-01-30"])
        .assert_compared("C", &["2024-01-31", "2024-01-30"])
        .assert_metric("A", &["2024-01-31"], "nb_visits", 5.0)
        .assert_metric("A", &["2024-01-30"], "nb_visits", 2.0);
    assert_eq!(result.filters(), &["Sort".to_string()]);

    let (_, fetched) = &fetcher.calls()[0];
    assert_eq!(fetched.get("compare"), Some("0"));
    assert_eq!(fetched.get("flat"), Some("1"));
    assert_eq!(fetched.get("period"), Some("day"));
}

#[test]
fn test_weekly_comparison_uses_pretty_period_labels() {
    let fetcher = MockFetcherBuilder::new("Referrers", "getWebsites")
        .on_date(
            "2024-01-08",
            TableBuilder::new()
                .row("A", 20.0)
                .period(report_compare::Period::week(
                    chrono::NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                ))
                .build(),
        )
        .build();
    let registry = registry();
    let engine = ComparisonEngine::new(&fetcher, &registry);
    let base = TableBuilder::new()
        .row("A", 30.0)
        .period(report_compare::Period::week(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
        ))
        .build();
    let params = request(&[
        ("date", "2024-01-17"),
        ("period", "week"),
        ("date1", "2024-01-08"),
        ("period1", "week"),
    ]);

    let result = engine.compare(&websites(), &params, base);

    TableAssertions::new(&result).assert_compared(
        "A",
        &["week 2024-01-15 to 2024-01-21", "week 2024-01-08 to 2024-01-14"],
    );
}

#[test]
fn test_empty_date_comparison_returns_empty_clone() {
    let fetcher = MockFetcherBuilder::new("Referrers", "getWebsites")
        .on_date("2024-01-30", TableBuilder::new().day("2024-01-30").build())
        .build();
    let registry = registry();
    let engine = ComparisonEngine::new(&fetcher, &registry);
    let params = request(&[("date1", "2024-01-30"), ("period1", "day")]);

    let result = engine.compare(&websites(), &params, base_table());

    assert!(result.is_empty());
    assert_eq!(result.filters(), &["Sort".to_string()]);
}

#[test]
fn test_segment_comparison_requires_all_segments() {
    let fetcher = MockFetcherBuilder::new("Referrers", "getWebsites")
        .on_segment(
            "2024-01-31",
            "browserCode==CH",
            TableBuilder::new().row("A", 1.0).row("C", 2.0).build(),
        )
        .on_segment(
            "2024-01-31",
            "browserCode==SF",
            TableBuilder::new().row("C", 4.0).row("B", 1.0).build(),
        )
        .build();
    let registry = registry();
    let engine = ComparisonEngine::new(&fetcher, &registry);
    let params = request(&[
        ("date", "2024-01-31"),
        ("period", "day"),
        ("segment", "browserCode==FF"),
        ("segment1", "browserCode==CH"),
        ("segment2", "browserCode==SF"),
    ]);

    let result = engine.compare(&websites(), &params, base_table());

    TableAssertions::new(&result)
        .assert_labels(&["C"])
        .assert_compared("C", &["browserCode==FF", "browserCode==CH", "browserCode==SF"])
        .assert_metric("C", &["browserCode==FF"], "nb_visits", 7.0)
        .assert_metric("C", &["browserCode==SF"], "nb_visits", 4.0);
    assert_eq!(fetcher.call_count(), 2);
}

#[test]
fn test_date_and_segment_comparison_nests_segments_under_each_period() {
    let fetcher = MockFetcherBuilder::new("Referrers", "getWebsites")
        .on_date(
            "2024-01-30",
            TableBuilder::new().row("A", 2.0).row("C", 1.0).day("2024-01-30").build(),
        )
        .on_segment(
            "2024-01-31",
            "browserCode==CH",
            TableBuilder::new().row("A", 4.0).row("C", 3.0).build(),
        )
        .on_segment(
            "2024-01-30",
            "browserCode==CH",
            TableBuilder::new().row("A", 6.0).build(),
        )
        .build();
    let registry = registry();
    let engine = ComparisonEngine::new(&fetcher, &registry).with_parallel_fetch(false);
    let params = request(&[
        ("date", "2024-01-31"),
        ("period", "day"),
        ("date1", "2024-01-30"),
        ("period1", "day"),
        ("segment", "browserCode==FF"),
        ("segment1", "browserCode==CH"),
    ]);

    let result = engine.compare(&websites(), &params, base_table());

    TableAssertions::new(&result)
        .assert_labels(&["A"])
        .assert_compared("A", &["2024-01-31", "2024-01-30"])
        .assert_metric("A", &["2024-01-31", "browserCode==FF"], "nb_visits", 5.0)
        .assert_metric("A", &["2024-01-31", "browserCode==CH"], "nb_visits", 4.0)
        .assert_metric("A", &["2024-01-30", "browserCode==FF"], "nb_visits", 2.0)
        .assert_metric("A", &["2024-01-30", "browserCode==CH"], "nb_visits", 6.0);
}

#[test]
fn test_fetch_failure_returns_original_table() {
    let fetcher = FailingFetcher::default();
    let registry = registry();
    let engine = ComparisonEngine::new(&fetcher, &registry);
    let params = request(&[("date1", "2024-01-30"), ("period1", "day"), ("idSubtable", "9")]);

    let original = base_table();
    assert_eq!(engine.compare(&websites(), &params, original.clone()), original);
}

#[test]
fn test_inapplicable_comparisons_leave_table_untouched() {
    let fetcher = FailingFetcher::default();
    let registry = registry();
    let engine = ComparisonEngine::new(&fetcher, &registry);
    let original = base_table();
    let params = request(&[("date1", "2024-01-30"), ("period1", "day")]);

    let summary = ReportId::new("VisitsSummary", "get");
    assert_eq!(engine.compare(&summary, &params, original.clone()), original);

    let disabled = request(&[("compare", "0"), ("date1", "2024-01-30"), ("period1", "day")]);
    assert_eq!(engine.compare(&websites(), &disabled, original.clone()), original);

    let unknown = ReportId::new("", "getWebsites");
    assert_eq!(engine.compare(&unknown, &params, original.clone()), original);

    // Nothing requested: no fetch, no change.
    assert_eq!(engine.compare(&websites(), &RequestParams::new(), original.clone()), original);
}

#[test]
fn test_collection_date_comparison_merges_sub_periods() {
    let mut compared = TableCollection::new();
    compared.insert(
        "2024-01-01",
        TableBuilder::new().row("A", 1.0).day("2024-01-01").build(),
    );
    compared.insert(
        "2024-01-02",
        TableBuilder::new().row("A", 2.0).row("B", 1.0).day("2024-01-02").build(),
    );
    let fetcher = MockFetcherBuilder::new("Referrers", "getWebsites")
        .on(&[("date", "2024-01-01,2024-01-02"), ("period", "range")], compared)
        .build();
    let registry = registry();
    let engine = ComparisonEngine::new(&fetcher, &registry);
    let base = TableBuilder::new()
        .row("A", 5.0)
        .period(
            report_compare::Period::range(
                chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                chrono::NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            )
            .unwrap(),
        )
        .build();
    let params = request(&[
        ("date", "2024-02-01,2024-02-02"),
        ("period", "range"),
        ("date1", "2024-01-01,2024-01-02"),
        ("period1", "range"),
    ]);

    let result = engine.compare(&websites(), &params, base);

    TableAssertions::new(&result)
        .assert_compared("A", &["From 2024-02-01 to 2024-02-02", "From 2024-01-01 to 2024-01-02"])
        .assert_metric("A", &["From 2024-01-01 to 2024-01-02"], "nb_visits", 3.0);
}
