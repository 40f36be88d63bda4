use crate::cli::sedbuilder;
use predicates::str::contains;

#[test]
fn ra_out_of_range() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .args(["get", "360", "0"])
        .assert()
        .failure()
        .stderr(contains("Invalid right ascension 360"));

    Ok(())
}

#[test]
fn dec_out_of_range() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .args(["get", "10", "-95"])
        .assert()
        .failure()
        .stderr(contains("Invalid declination -95"));

    Ok(())
}

#[test]
fn jetset_coordinates_checked() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .args(["jetset", "-1", "0", "--z", "0.1"])
        .assert()
        .failure()
        .stderr(contains("Invalid right ascension -1"));

    Ok(())
}

#[test]
fn invalid_client_timeout() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .args(["--client-timeout", "-5", "get", "10", "10"])
        .assert()
        .failure()
        .stderr(contains("Invalid timeout value: -5"));

    Ok(())
}
