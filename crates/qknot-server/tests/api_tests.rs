//! Integration tests for the qknot HTTP API.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use qknot_hal::ConnectError;
use qknot_hal::testing::{FakeBackend, FakeConnector, FakeService, JobScript};
use qknot_server::{AppState, MISSING_CREDENTIALS, ServerConfig, create_router};
use serde_json::{Value, json};

// ============================================================================
// Test helpers
// ============================================================================

const TREFOIL: &str = "s1 s2^-1 s1 s2^-1";
const PLATFORM: &str = "ibm_quantum_platform";

fn backends() -> Vec<FakeBackend> {
    vec![
        FakeBackend::hardware("ibm_busy", 127, 40),
        FakeBackend::hardware("ibm_small", 2, 0),
        FakeBackend::hardware("ibm_quiet", 27, 3),
        FakeBackend::simulator("simulator_mps", 100),
    ]
}

fn completing() -> JobScript {
    JobScript::completing(&["QUEUED", "RUNNING", "JobStatus.DONE"], 600, 400)
}

fn connector(script: JobScript) -> Arc<FakeConnector> {
    Arc::new(FakeConnector::new(Arc::new(FakeService::new(backends(), script))).accepting(PLATFORM))
}

fn test_server_with(connector: Arc<FakeConnector>, config: ServerConfig) -> TestServer {
    let state = Arc::new(AppState::new(config, connector));
    TestServer::new(create_router(state)).expect("test server")
}

fn test_server(connector: Arc<FakeConnector>) -> TestServer {
    test_server_with(connector, ServerConfig::default())
}

fn offline_server() -> TestServer {
    test_server(connector(completing()))
}

fn submit_body(backend_name: &str) -> Value {
    json!({
        "credential": "test-token",
        "backend_name": backend_name,
        "braid_word": TREFOIL,
        "shots": 1000,
    })
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_returns_ok() {
    let response = offline_server().get("/api/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "status": "ok" }));
}

// ============================================================================
// Knot routes
// ============================================================================

#[tokio::test]
async fn test_ingest_trefoil() {
    let response = offline_server()
        .post("/api/knot/ingest")
        .json(&json!({ "dowker_notation": " 4, 6, 2 " }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["knot_name"], "Trefoil Knot (3_1)");
    assert_eq!(body["braid_word"], TREFOIL);
    assert_eq!(body["dowker_notation_normalized"], "4 6 2");
    assert_eq!(body["crossing_count"], 3);
    assert_eq!(body["is_catalog_match"], true);
}

#[tokio::test]
async fn test_ingest_rejects_invalid_notation() {
    let server = offline_server();

    let response = server
        .post("/api/knot/ingest")
        .json(&json!({ "dowker_notation": "   " }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["detail"], "Dowker notation cannot be empty.");

    let response = server
        .post("/api/knot/ingest")
        .json(&json!({ "dowker_notation": "4 3 2" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json::<Value>()["detail"].as_str().unwrap().contains("must be even"));
}

#[tokio::test]
async fn test_verify_reports_policy_outcome_as_data() {
    let server = offline_server();

    let response = server
        .post("/api/knot/verify")
        .json(&json!({ "braid_word": TREFOIL }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["is_verified"], true);
    assert_eq!(body["status"], "verified");

    let response = server
        .post("/api/knot/verify")
        .json(&json!({ "braid_word": "s1 s1 s1" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["is_verified"], false);
    assert_eq!(body["status"], "failed");

    let response = server
        .post("/api/knot/verify")
        .json(&json!({ "braid_word": "  " }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["detail"], "Braid word cannot be empty.");
}

#[tokio::test]
async fn test_generate_circuit_defaults() {
    let response = offline_server()
        .post("/api/knot/circuit/generate")
        .json(&json!({ "braid_word": TREFOIL, "target_backend": "  " }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["target_backend"], "unspecified");
    assert_eq!(body["optimization_level"], 3);
    assert_eq!(body["closure_method"], "trace");
    assert_eq!(body["braid_word"], TREFOIL);
    assert_eq!(body["circuit_summary"]["num_qubits"], 4);
    assert_eq!(body["circuit_summary"]["signature"].as_str().unwrap().len(), 16);
}

#[tokio::test]
async fn test_generate_circuit_rejects_bad_options() {
    let server = offline_server();

    for body in [
        json!({ "braid_word": TREFOIL, "closure_method": "loop" }),
        json!({ "braid_word": TREFOIL, "optimization_level": 4 }),
        json!({ "braid_word": "s1 s3 s1" }),
    ] {
        let response = server.post("/api/knot/circuit/generate").json(&body).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.json::<Value>()["detail"].is_string());
    }
}

#[tokio::test]
async fn test_malformed_body_uses_detail_shape() {
    let response = offline_server()
        .post("/api/knot/verify")
        .json(&json!({ "braid": TREFOIL }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json::<Value>()["detail"].as_str().unwrap().contains("braid_word"));
}

// ============================================================================
// Runtime routes
// ============================================================================

#[tokio::test]
async fn test_runtime_route_requires_credential() {
    let connector = connector(completing());
    let server = test_server(Arc::clone(&connector));

    let mut body = submit_body("ibm_quiet");
    body["credential"] = json!("   ");
    let response = server.post("/api/jobs/submit").json(&body).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["detail"], MISSING_CREDENTIALS);
    assert!(connector.attempted_channels().is_empty());
}

#[tokio::test]
async fn test_fallback_credential_from_config() {
    let config = ServerConfig {
        fallback_credential: Some("env-token".into()),
        ..ServerConfig::default()
    };
    let server = test_server_with(connector(completing()), config);

    let response = server
        .post("/api/backends")
        .json(&json!({}))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_submit_then_poll_to_completion() {
    let connector = connector(completing());
    let server = test_server(Arc::clone(&connector));

    let response = server.post("/api/jobs/submit").json(&submit_body("ibm_quiet")).await;
    response.assert_status_ok();
    let submitted: Value = response.json();
    assert_eq!(submitted["job_id"], "job-1");
    assert_eq!(submitted["backend"], "ibm_quiet");
    assert_eq!(submitted["runtime_channel_used"], PLATFORM);
    assert_eq!(submitted["runtime_instance_used"], Value::Null);
    assert_eq!(submitted["status"], "QUEUED");
    assert_eq!(submitted["closure_method"], "trace");
    assert_eq!(connector.service().submissions()[0].shots, 1000);

    let poll = json!({ "credential": "test-token", "job_id": " job-1 " });

    let response = server.post("/api/jobs/poll").json(&poll).await;
    response.assert_status_ok();
    let pending: Value = response.json();
    assert_eq!(pending["status"], "RUNNING");
    assert!(pending.get("expectation_value").is_none());

    let response = server.post("/api/jobs/poll").json(&poll).await;
    response.assert_status_ok();
    let completed: Value = response.json();
    assert_eq!(completed["status"], "COMPLETED");
    assert_eq!(completed["backend"], "ibm_quiet");
    assert!((completed["expectation_value"].as_f64().unwrap() - 0.2).abs() < 1e-12);
    assert_eq!(completed["counts"].as_array().unwrap().len(), 2);
    assert!(completed["jones_polynomial"].is_string());
}

#[tokio::test]
async fn test_submit_validates_before_connecting() {
    let connector = connector(completing());
    let server = test_server(Arc::clone(&connector));

    let mut body = submit_body("ibm_quiet");
    body["shots"] = json!(0);
    let response = server.post("/api/jobs/submit").json(&body).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json::<Value>()["detail"],
        "Shots must be between 1 and 100000."
    );

    let response = server
        .post("/api/jobs/submit")
        .json(&submit_body("   "))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["detail"], "Backend name cannot be empty.");

    assert!(connector.attempted_channels().is_empty());
}

#[tokio::test]
async fn test_submit_to_undersized_backend_is_input_error() {
    let server = test_server(connector(completing()));

    let response = server.post("/api/jobs/submit").json(&submit_body("ibm_small")).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        response.json::<Value>()["detail"]
            .as_str()
            .unwrap()
            .contains("has 2 qubits")
    );
}

#[tokio::test]
async fn test_channel_aliases_and_explicit_unsupported_channel() {
    let service = Arc::new(FakeService::new(backends(), completing()));
    let connector = Arc::new(
        FakeConnector::new(service)
            .accepting("ibm_cloud")
            .failing("ibm_quantum", ConnectError::ChannelNotSupported("no".into())),
    );
    let server = test_server(Arc::clone(&connector));

    let response = server
        .post("/api/backends")
        .json(&json!({
            "credential": "test-token",
            "channel": "ibm_cloud",
            "instance": " crn:v1:test ",
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["runtime_channel_used"], "ibm_cloud");
    assert_eq!(body["runtime_instance_used"], "crn:v1:test");

    let response = server
        .post("/api/backends")
        .json(&json!({ "credential": "test-token", "runtime_channel": "ibm_quantum" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        response.json::<Value>()["detail"]
            .as_str()
            .unwrap()
            .contains("'ibm_quantum'")
    );
    assert_eq!(connector.attempted_channels(), vec!["ibm_cloud", "ibm_quantum"]);
}

#[tokio::test]
async fn test_list_backends_sorted_with_recommendation() {
    let server = test_server(connector(completing()));

    let response = server
        .post("/api/backends")
        .json(&json!({ "credential": "test-token" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let names: Vec<&str> = body["backends"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ibm_small", "ibm_quiet", "ibm_busy"]);
    assert_eq!(body["recommended_backend"], "ibm_quiet");
    assert_eq!(body["runtime_channel_used"], PLATFORM);
}

#[tokio::test]
async fn test_poll_failed_job_carries_detail() {
    let service = FakeService::new(backends(), completing())
        .with_job("job-9", JobScript::failing("ERROR", "Calibration drift"));
    let connector = Arc::new(FakeConnector::new(Arc::new(service)).accepting(PLATFORM));
    let server = test_server(connector);

    let response = server
        .post("/api/jobs/poll")
        .json(&json!({ "credential": "test-token", "job_id": "job-9" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ERROR");
    assert_eq!(body["detail"], "Calibration drift");
}

#[tokio::test]
async fn test_poll_and_cancel_reject_blank_job_id() {
    let server = offline_server();
    for route in ["/api/jobs/poll", "/api/jobs/cancel"] {
        let response = server
            .post(route)
            .json(&json!({ "credential": "test-token", "job_id": "  " }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<Value>()["detail"], "Job id cannot be empty.");
    }
}

#[tokio::test]
async fn test_cancel_reports_detail() {
    let service = FakeService::new(backends(), completing())
        .with_job("job-3", JobScript::completing(&["RUNNING"], 1, 1));
    let connector = Arc::new(FakeConnector::new(Arc::new(service)).accepting(PLATFORM));
    let server = test_server(Arc::clone(&connector));

    let response = server
        .post("/api/jobs/cancel")
        .json(&json!({ "credential": "test-token", "job_id": "job-3" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["job_id"], "job-3");
    assert_eq!(body["status"], "RUNNING");
    assert_eq!(body["detail"], "Cancellation requested.");
    assert_eq!(connector.service().cancel_requests("job-3"), 1);
}

#[tokio::test]
async fn test_run_experiment_returns_formatted_result() {
    let server = test_server(connector(JobScript::completing(&["DONE"], 250, 750)));

    let response = server
        .post("/api/run-experiment")
        .json(&submit_body("least_busy"))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["backend"], "ibm_quiet");
    assert!((body["expectation_value"].as_f64().unwrap() + 0.5).abs() < 1e-12);
}

#[tokio::test]
async fn test_run_experiment_failure_is_server_fault() {
    let server = test_server(connector(JobScript::failing("FAILED", "Device offline")));

    let response = server
        .post("/api/run-experiment")
        .json(&submit_body("ibm_quiet"))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        response.json::<Value>()["detail"]
            .as_str()
            .unwrap()
            .contains("Device offline")
    );
}
