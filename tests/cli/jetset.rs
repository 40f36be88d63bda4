use crate::cli::{fixture, sedbuilder};
use predicates::prelude::PredicateBooleanExt as _;
use predicates::str::contains;

#[test]
fn jetset_csv() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let output = sedbuilder(home.path())
        .args(["-O", "csv", "jetset", "--z", "0.536", "--file"])
        .arg(fixture("3c279.json"))
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("x,dx,y,dy,T_start,T_stop,UL,dataset"));
    assert_eq!(lines.count(), 4);

    // 2MASS reports no times.
    let last: Vec<_> = stdout.lines().last().unwrap_or_default().split(',').collect();
    assert_eq!(last[6..], ["false", "2MASS"]);
    assert_eq!(last[4].parse::<f64>()?, 0.0);
    assert_eq!(last[5].parse::<f64>()?, 0.0);

    Ok(())
}

#[test]
fn jetset_json_metadata() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let output = sedbuilder(home.path())
        .args([
            "-O",
            "json",
            "jetset",
            "--z",
            "0.536",
            "--obj-name",
            "3C279",
            "--restframe",
            "src",
            "--data-scale",
            "log-log",
            "--file",
        ])
        .arg(fixture("3c279.json"))
        .output()?;
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(doc["metadata"]["obj_name"], "3C279");
    assert_eq!(doc["metadata"]["z"], "0.536");
    assert_eq!(doc["metadata"]["UL_CL"], "0.95");
    assert_eq!(doc["metadata"]["restframe"], "src");
    assert_eq!(doc["metadata"]["data_scale"], "log-log");
    assert_eq!(doc["rows"].as_array().map(Vec::len), Some(4));
    assert_eq!(doc["rows"][0]["dataset"], "FERMI4FGL");

    Ok(())
}

#[test]
fn jetset_table() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .args(["jetset", "--z", "0.1", "--file"])
        .arg(fixture("3c279.json"))
        .assert()
        .success()
        .stdout(
            contains("new-src")
                .and(contains("X [Hz]"))
                .and(contains("DATASET")),
        );

    Ok(())
}

#[test]
fn jetset_invalid_redshift() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .args(["jetset", "--z", "2", "--file"])
        .arg(fixture("3c279.json"))
        .assert()
        .failure()
        .stderr(contains("Invalid redshift 2"));

    Ok(())
}

#[test]
fn jetset_invalid_restframe() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .args(["jetset", "--z", "0.1", "--restframe", "rest", "--file"])
        .arg(fixture("3c279.json"))
        .assert()
        .failure()
        .stderr(contains("rest"));

    Ok(())
}

#[test]
fn jetset_needs_a_source() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .args(["jetset", "--z", "0.1"])
        .assert()
        .failure();

    Ok(())
}
