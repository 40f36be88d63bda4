use crate::cli::sedbuilder;
use predicates::prelude::*;

#[test]
fn version() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    sedbuilder(home.path())
        .args(["version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(concat!(
            "sedbuilder ",
            env!("CARGO_PKG_VERSION")
        )));

    Ok(())
}
