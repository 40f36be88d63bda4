use crate::cli::{fixture, sedbuilder};
use predicates::prelude::PredicateBooleanExt as _;
use predicates::str::{contains, starts_with};

#[test]
fn show_table() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .arg("show")
        .arg(fixture("3c279.json"))
        .assert()
        .success()
        .stdout(
            contains("Data points")
                .and(contains("FREQUENCY [Hz]"))
                .and(contains("CATALOGNAME"))
                .and(contains("4FGL J1256.1-0547"))
                .and(contains("Upper Limit").not()),
        );

    Ok(())
}

#[test]
fn show_json() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let output = sedbuilder(home.path())
        .args(["-O", "json", "show"])
        .arg(fixture("3c279.json"))
        .output()?;
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(doc["ResponseInfo"]["statusCode"], "OK");
    assert_eq!(doc["Catalogs"][1]["SourceData"][1]["Info"], "Upper Limit");

    Ok(())
}

#[test]
fn show_csv() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .args(["-O", "csv", "show"])
        .arg(fixture("3c279.json"))
        .assert()
        .success()
        .stdout(starts_with("Name,Frequency,Nufnu,").and(contains(",2MASS,1.5")));

    Ok(())
}

#[test]
fn show_empty() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .arg("show")
        .arg(fixture("empty.json"))
        .assert()
        .success()
        .stderr(contains("No data points!"));

    Ok(())
}

#[test]
fn show_error_status() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .arg("show")
        .arg(fixture("error.json"))
        .assert()
        .failure()
        .stderr(contains("No data found for the given coordinates"));

    Ok(())
}

#[test]
fn show_missing_file() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .args(["show", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(contains("Failed to read does-not-exist.json"));

    Ok(())
}
