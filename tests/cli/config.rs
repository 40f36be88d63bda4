use crate::cli::sedbuilder;
use predicates::str::contains;

#[test]
fn config_defaults() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let output = sedbuilder(home.path())
        .args(["-O", "json", "config", "get"])
        .output()?;
    assert!(output.status.success());

    let profile: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(profile["name"], "default");
    assert_eq!(profile["api_endpoint"], "https://tools.ssdc.asi.it/");
    assert!(profile.get("timeout").is_none());

    Ok(())
}

#[test]
fn config_set_and_get() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;

    sedbuilder(home.path())
        .args(["config", "set", "timeout", "30"])
        .assert()
        .success()
        .stderr(contains("Set timeout for profile \"default\""));

    sedbuilder(home.path())
        .args(["-P", "mirror", "config", "set", "api_endpoint", "http://localhost:9999/sed"])
        .assert()
        .success();

    assert!(home.path().join(".config/sedbuilder.yaml").exists());

    let output = sedbuilder(home.path())
        .args(["-O", "json", "config", "get", "--all"])
        .output()?;
    assert!(output.status.success());

    let profiles: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(profiles[0]["name"], "default");
    assert_eq!(profiles[0]["timeout"], 30);
    assert_eq!(profiles[1]["name"], "mirror");
    assert_eq!(profiles[1]["api_endpoint"], "http://localhost:9999/sed");

    sedbuilder(home.path())
        .args(["-P", "mirror", "config", "get"])
        .assert()
        .success()
        .stdout(contains("http://localhost:9999/sed"));

    Ok(())
}

#[test]
fn config_set_rejects_bad_values() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;

    sedbuilder(home.path())
        .args(["config", "set", "api_endpoint", "ftp://example.com"])
        .assert()
        .failure()
        .stderr(contains("must be http or https"));

    sedbuilder(home.path())
        .args(["config", "set", "timeout", "soon"])
        .assert()
        .failure()
        .stderr(contains("expected whole seconds"));

    assert!(!home.path().join(".config/sedbuilder.yaml").exists());

    Ok(())
}

#[test]
fn unknown_profile() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    std::fs::create_dir_all(home.path().join(".config"))?;
    std::fs::write(
        home.path().join(".config/sedbuilder.yaml"),
        "profiles:\n  default:\n    timeout: 10\n",
    )?;

    sedbuilder(home.path())
        .args(["-P", "nope", "config", "get"])
        .assert()
        .failure()
        .stderr(contains("Profile 'nope' not found"));

    Ok(())
}
