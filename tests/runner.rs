//! End-to-end batches against the mock endpoint

use std::sync::Arc;
use std::time::Duration;

use sparql_smoke::client::SparqlClient;
use sparql_smoke::config::{Credentials, EnvFile, Settings};
use sparql_smoke::probes::{get_probe, list_probes, Probe, ProbeContext, PROBES};
use sparql_smoke::report::Outcome;
use sparql_smoke::runner::{Runner, RunnerOpts};
use sparql_smoke_testkit::mock::{DEFAULT_USER_KEY, DEFAULT_USER_SEED};
use sparql_smoke_testkit::{MockSparqlEndpoint, Scope};

fn context(endpoint: &MockSparqlEndpoint) -> ProbeContext {
    let credentials = Credentials::new(DEFAULT_USER_KEY, DEFAULT_USER_SEED);
    ProbeContext::new(SparqlClient::new(&endpoint.url(), &credentials).unwrap())
}

fn all_probes() -> Vec<Arc<dyn Probe>> {
    PROBES.values().cloned().collect()
}

#[tokio::test]
async fn healthy_local_endpoint_passes_every_probe() {
    let endpoint = MockSparqlEndpoint::start().await;
    let runner = Runner::new(context(&endpoint), all_probes(), RunnerOpts::default());

    let batch = runner.run_batch(1).await;

    let names: Vec<_> = batch.results.iter().map(|r| r.probe.as_str()).collect();
    assert_eq!(names, list_probes());
    for result in &batch.results {
        assert_eq!(result.outcome, Outcome::Passed, "{} did not pass", result.probe);
    }
}

#[tokio::test]
async fn healthy_global_endpoint_passes_every_probe() {
    let endpoint = MockSparqlEndpoint::builder()
        .scope(Scope::Global)
        .start()
        .await;
    let runner = Runner::new(context(&endpoint), all_probes(), RunnerOpts::default());

    let batch = runner.run_batch(1).await;
    assert!(batch.all_passed(), "{batch:#?}");
}

#[tokio::test]
async fn status_mismatch_fails_each_probe_once() {
    let endpoint = MockSparqlEndpoint::builder().force_status(500).start().await;
    let probes = vec![get_probe("select_get").unwrap(), get_probe("post_form").unwrap()];
    let runner = Runner::new(context(&endpoint), probes, RunnerOpts::default());

    let batch = runner.run_batch(1).await;
    assert_eq!(batch.results.len(), 2);
    assert_eq!(batch.failed(), 2);
    for result in &batch.results {
        assert_eq!(
            result.outcome,
            Outcome::Failed("Expected status code 200, but got 500".into())
        );
    }
}

#[tokio::test]
async fn empty_bindings_only_fail_describe() {
    let endpoint = MockSparqlEndpoint::builder().empty_bindings().start().await;
    let runner = Runner::new(context(&endpoint), all_probes(), RunnerOpts::default());

    let batch = runner.run_batch(1).await;
    assert_eq!(batch.failed(), 1);
    assert_eq!(batch.passed(), 8);

    let describe = batch.get("describe_get").unwrap();
    assert_eq!(
        describe.outcome,
        Outcome::Failed("Resource lookup failed: SELECT returned no bindings".into())
    );
}

#[tokio::test]
async fn slow_probe_times_out_without_blocking_the_batch() {
    let endpoint = MockSparqlEndpoint::builder()
        .slow_query("ASK", Duration::from_secs(5))
        .start()
        .await;
    let opts = RunnerOpts::default().with_timeout(Duration::from_millis(500));
    let runner = Runner::new(context(&endpoint), all_probes(), opts);

    let started = std::time::Instant::now();
    let batch = runner.run_batch(1).await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(
        batch.get("ask_get").unwrap().outcome,
        Outcome::TimedOut(Duration::from_millis(500))
    );
    assert_eq!(batch.timed_out(), 1);
    assert_eq!(batch.passed(), 8);
}

#[tokio::test]
async fn repeated_runs_yield_identical_outcomes() {
    let endpoint = MockSparqlEndpoint::builder()
        .scope(Scope::Global)
        .empty_bindings()
        .start()
        .await;
    let runner = Runner::new(context(&endpoint), all_probes(), RunnerOpts::default());

    let report = runner.run(2).await;
    assert_eq!(report.batches.len(), 2);

    let outcomes = |i: usize| -> Vec<(String, Outcome)> {
        report.batches[i]
            .results
            .iter()
            .map(|r| (r.probe.clone(), r.outcome.clone()))
            .collect()
    };
    assert_eq!(outcomes(0), outcomes(1));
    assert_eq!(report.batches[1].iteration, 2);
}

#[tokio::test]
async fn single_worker_still_runs_every_probe() {
    let endpoint = MockSparqlEndpoint::start().await;
    let runner = Runner::new(
        context(&endpoint),
        all_probes(),
        RunnerOpts::default().with_max_concurrency(1),
    );

    let batch = runner.run_batch(1).await;
    assert!(batch.all_passed());
    // describe_get issues two requests
    assert_eq!(endpoint.received_count().await, 10);
}

#[tokio::test]
async fn credentials_from_env_file_authenticate() {
    let endpoint = MockSparqlEndpoint::builder()
        .credentials("file-key", "file-seed")
        .start()
        .await;

    let env = EnvFile::parse("# smoke credentials\n\nUSER_KEY=file-key\nUSER_SEED=file-seed\n")
        .unwrap();
    let credentials = Credentials::from_env(&env).unwrap();
    let ctx = ProbeContext::new(SparqlClient::new(&endpoint.url(), &credentials).unwrap());

    let runner = Runner::new(
        ctx,
        vec![get_probe("service_description").unwrap()],
        RunnerOpts::default(),
    );
    assert!(runner.run_batch(1).await.all_passed());
}

#[tokio::test]
async fn settings_drive_sentinel_and_timeouts() {
    let endpoint = MockSparqlEndpoint::builder()
        .scope(Scope::Global)
        .named_graph_error("Named graphs are not available")
        .slow_query("CONSTRUCT", Duration::from_millis(700))
        .start()
        .await;

    let settings = Settings::from_yaml(
        r"
timeout: 300ms
named_graph_sentinel: Named graphs are not available
probes:
  construct_get:
    timeout: 5s
",
    )
    .unwrap();

    let ctx = context(&endpoint).with_named_graph_sentinel(settings.named_graph_sentinel.clone());
    let probes = vec![
        get_probe("construct_get").unwrap(),
        get_probe("named_graph_uri").unwrap(),
    ];
    let runner = Runner::new(ctx, probes, RunnerOpts::from_settings(&settings));

    let batch = runner.run_batch(1).await;
    assert!(batch.all_passed(), "{batch:#?}");
}
