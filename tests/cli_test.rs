use assert_cmd::cargo;
use predicates::prelude::*;

#[tokio::test]
async fn test_cli_help() {
    let mut cmd = cargo::cargo_bin_cmd!("seo-audit");
    let assert = cmd.arg("--help").assert();

    let expected_pattern = if cfg!(windows) {
        "seo-audit.exe [OPTIONS] <URL>"
    } else {
        "seo-audit [OPTIONS] <URL>"
    };

    assert
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains(expected_pattern))
        .stdout(predicate::str::contains("--page <PATH>"))
        .stdout(predicate::str::contains("--check-timeout"));
}

#[tokio::test]
async fn test_cli_rejects_url_without_scheme() {
    let mut cmd = cargo::cargo_bin_cmd!("seo-audit");
    cmd.arg("example.com")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "URL must start with http:// or https://",
        ));
}

#[tokio::test]
async fn test_cli_requires_url() {
    let mut cmd = cargo::cargo_bin_cmd!("seo-audit");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}
