//! Exit codes of the `sparql-smoke` binary

use std::io::Write;
use std::process::{Command, Output};

use sparql_smoke_testkit::mock::{DEFAULT_USER_KEY, DEFAULT_USER_SEED};
use sparql_smoke_testkit::MockSparqlEndpoint;
use tempfile::NamedTempFile;

fn sparql_smoke() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sparql-smoke"));
    cmd.env_remove("USER_KEY")
        .env_remove("USER_SEED")
        .env_remove("RUST_LOG");
    cmd
}

fn env_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

async fn run(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[test]
fn missing_endpoint_exits_with_usage() {
    let output = sparql_smoke().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn too_many_arguments_exit_one() {
    let output = sparql_smoke()
        .args(["http://localhost/sparql", "1", ".env", "extra"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn help_and_version_exit_zero() {
    for flag in ["--help", "--version"] {
        let output = sparql_smoke().arg(flag).output().unwrap();
        assert_eq!(output.status.code(), Some(0), "{flag}");
    }
}

#[test]
fn list_prints_probes_without_endpoint() {
    let output = sparql_smoke().arg("--list").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("select_get"));
    assert!(stdout.contains("named_graph_uri"));
}

#[test]
fn missing_credential_fails_fast() {
    let env = env_file("USER_KEY=only-a-key\n");
    let output = sparql_smoke()
        .arg("http://127.0.0.1:9/sparql/local")
        .arg("1")
        .arg(env.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("USER_SEED"));
}

#[tokio::test]
async fn probe_failures_only_change_exit_code_when_asked() {
    let endpoint = MockSparqlEndpoint::builder().force_status(503).start().await;
    let env = env_file(&format!(
        "USER_KEY={DEFAULT_USER_KEY}\nUSER_SEED={DEFAULT_USER_SEED}\n"
    ));

    let mut cmd = sparql_smoke();
    cmd.arg(endpoint.url()).arg("1").arg(env.path());
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(0));

    let mut cmd = sparql_smoke();
    cmd.arg(endpoint.url())
        .arg("1")
        .arg(env.path())
        .arg("--fail-on-error");
    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test]
async fn healthy_endpoint_passes_with_fail_on_error() {
    let endpoint = MockSparqlEndpoint::start().await;
    let env = env_file(&format!(
        "# credentials\n\nUSER_KEY={DEFAULT_USER_KEY}\nUSER_SEED={DEFAULT_USER_SEED}\n"
    ));

    let mut cmd = sparql_smoke();
    cmd.arg(endpoint.url())
        .arg("2")
        .arg(env.path())
        .args(["--fail-on-error", "--json"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Probe PASSED"));
}
