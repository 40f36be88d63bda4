use crate::cli::{fixture, sedbuilder, serve_once};
use predicates::prelude::PredicateBooleanExt as _;
use predicates::str::contains;

#[test]
fn get_and_save() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let saved = home.path().join("3c279.json");
    let (endpoint, server) = serve_once("200 OK", std::fs::read_to_string(fixture("3c279.json"))?);

    let output = sedbuilder(home.path())
        .env("SEDBUILDER_API_ENDPOINT", &endpoint)
        .args(["-O", "json", "get", "194.04625", "-5.789167", "--save"])
        .arg(&saved)
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    assert_eq!(
        server.join().unwrap(),
        "GET /SED/api/v1/getData?ra=194.04625&dec=-5.789167 HTTP/1.1"
    );

    let printed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&saved)?)?;
    assert_eq!(printed, written);
    assert_eq!(written["Catalogs"][2]["Catalog"]["CatalogName"], "2MASS");

    // The saved dump can be shown again.
    sedbuilder(home.path())
        .arg("show")
        .arg(&saved)
        .assert()
        .success()
        .stdout(contains("SWIFTXRT"));

    Ok(())
}

#[test]
fn get_unsuccessful_status() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let (endpoint, server) = serve_once("200 OK", std::fs::read_to_string(fixture("error.json"))?);

    sedbuilder(home.path())
        .env("SEDBUILDER_API_ENDPOINT", &endpoint)
        .args(["get", "10", "10"])
        .assert()
        .failure()
        .stderr(contains("ERROR").and(contains("No data found for the given coordinates")));

    server.join().unwrap();
    Ok(())
}

#[test]
fn get_error_page() -> anyhow::Result<()> {
    let home = tempfile::tempdir()?;
    let (endpoint, server) = serve_once("503 Service Unavailable", "<html></html>".to_owned());

    sedbuilder(home.path())
        .env("SEDBUILDER_API_ENDPOINT", &endpoint)
        .args(["get", "10", "10"])
        .assert()
        .failure()
        .stderr(contains("Failed to fetch SED data"));

    server.join().unwrap();
    Ok(())
}
