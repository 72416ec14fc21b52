use crate::common::TestContext;
use predicates::prelude::*;

fn compare_args(fixtures: &std::path::Path) -> Vec<String> {
    [
        "compare",
        "--fixtures",
        fixtures.to_str().expect("utf-8 path"),
        "--module",
        "Referrers",
        "--action",
        "getWebsites",
        "--param",
        "date=2024-01-31",
        "--param",
        "period=day",
        "--param",
        "date1=2024-01-30",
        "--param",
        "period1=day",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[test]
fn test_compare_prints_tree() {
    let ctx = TestContext::new();
    let fixtures = ctx.fixtures();

    ctx.command()
        .args(compare_args(&fixtures))
        .assert()
        .success()
        .stdout(predicate::str::contains("Report: Referrers.getWebsites"))
        .stdout(predicate::str::contains("example.org"))
        .stdout(predicate::str::contains("├─ 2024-01-31  nb_visits=5"))
        .stdout(predicate::str::contains("└─ 2024-01-30  nb_visits=2"))
        .stdout(predicate::str::contains("example.net").not());
}

#[test]
fn test_compare_no_unicode() {
    let ctx = TestContext::new();
    let fixtures = ctx.fixtures();

    ctx.command()
        .arg("--no-unicode")
        .args(compare_args(&fixtures))
        .assert()
        .success()
        .stdout(predicate::str::contains("+- 2024-01-30  nb_visits=2"))
        .stdout(predicate::str::contains("└").not());
}

#[test]
fn test_compare_json_output_with_segments() {
    let ctx = TestContext::new();
    let fixtures = ctx.fixtures();

    let output = ctx
        .command()
        .args(compare_args(&fixtures))
        .args([
            "--param",
            "segment=browserCode==FF",
            "--param",
            "segment1=browserCode==CH",
            "--format",
            "json",
            "--sequential",
        ])
        .output()
        .expect("Failed to run binary");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let rows = json["table"]["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["label"], "example.org");

    let periods = rows[0]["subtable"]["rows"].as_array().expect("period rows");
    assert_eq!(periods[0]["label"], "2024-01-31");
    assert_eq!(periods[1]["label"], "2024-01-30");
    let segments = periods[1]["subtable"]["rows"].as_array().expect("segment rows");
    assert_eq!(segments[0]["label"], "browserCode==FF");
    assert_eq!(segments[1]["label"], "browserCode==CH");
    assert_eq!(segments[1]["columns"]["nb_visits"], 1.0);
}

#[test]
fn test_compare_format_from_config() {
    let ctx = TestContext::new();
    let fixtures = ctx.fixtures();
    ctx.create_file(".report-compare.toml", "[output]\nformat = \"json\"\n");

    let output = ctx
        .command()
        .args(compare_args(&fixtures))
        .output()
        .expect("Failed to run binary");
    assert!(output.status.success());
    serde_json::from_slice::<serde_json::Value>(&output.stdout).expect("stdout should be JSON");
}

#[test]
fn test_compare_disabled_prints_original_rows() {
    let ctx = TestContext::new();
    let fixtures = ctx.fixtures();

    ctx.command()
        .args(compare_args(&fixtures))
        .args(["--param", "compare=0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("example.net  nb_visits=4"));
}
