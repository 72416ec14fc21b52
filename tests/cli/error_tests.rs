use crate::common::TestContext;
use predicates::prelude::*;

#[test]
fn test_compare_with_missing_fixture_file() {
    TestContext::new()
        .command()
        .args([
            "compare",
            "--fixtures",
            "/nonexistent/fixtures.json",
            "--module",
            "Referrers",
            "--action",
            "getWebsites",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read fixture file"));
}

#[test]
fn test_malformed_param() {
    let ctx = TestContext::new();
    let fixtures = ctx.fixtures();
    ctx.command()
        .args([
            "compare",
            "--fixtures",
            fixtures.to_str().expect("utf-8 path"),
            "--module",
            "Referrers",
            "--action",
            "getWebsites",
            "--param",
            "date",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[test]
fn test_unmatched_base_report() {
    let ctx = TestContext::new();
    let fixtures = ctx.fixtures();
    ctx.command()
        .args([
            "compare",
            "--fixtures",
            fixtures.to_str().expect("utf-8 path"),
            "--module",
            "Actions",
            "--action",
            "getPageUrls",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load report Actions.getPageUrls"));
}

#[test]
fn test_missing_required_args() {
    TestContext::new()
        .command()
        .args(["compare", "--module", "Referrers"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_comparison_fetch_failure_falls_back_to_original() {
    let ctx = TestContext::new();
    let fixtures = ctx.fixtures();
    // No fixture answers date=2023-01-01, so the comparison is abandoned.
    ctx.command()
        .args([
            "compare",
            "--fixtures",
            fixtures.to_str().expect("utf-8 path"),
            "-m",
            "Referrers",
            "-a",
            "getWebsites",
            "-p",
            "date=2024-01-31",
            "-p",
            "period=day",
            "-p",
            "date1=2023-01-01",
            "-p",
            "period1=day",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("example.net  nb_visits=4"))
        .stderr(predicate::str::contains("Comparison failed"));
}

#[test]
fn test_blank_module_is_rejected() {
    TestContext::new()
        .command()
        .args(["plan", "--module", "", "--action", "getWebsites"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown report"));
}
