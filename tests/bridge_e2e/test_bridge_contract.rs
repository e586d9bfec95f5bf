//! E2E tests: bridge readiness and capability negotiation.

use std::sync::Arc;

use serde_json::json;
use test_history_bridge::bridge::{FunctionTable, HostBridge, RemoteMethod};
use test_history_bridge::config::Config;
use test_history_bridge::error::BridgeError;
use test_history_bridge::services::TestHistoryClient;

use super::test_helpers::*;

/// (1) No bridge → BridgeNotReady, and nothing is asked of any host.
#[tokio::test]
async fn test_absent_bridge_not_ready() {
    let result = TestHistoryClient::connect(None, &Config::default()).await;
    assert!(matches!(result, Err(BridgeError::BridgeNotReady)));
}

/// (2) Every front-door operation on an empty table → MethodNotFound, no invocation.
#[tokio::test]
async fn test_every_operation_reports_missing_method() {
    let bridge = CountingBridge::new(FunctionTable::new());
    let client = TestHistoryClient::connect(Some(bridge.clone()), &Config::default())
        .await
        .unwrap();

    let errors = vec![
        client.get_test_history("p", None).await.unwrap_err(),
        client.get_test_detail(1).await.unwrap_err(),
        client.update_test_ai_analysis(1, "x").await.unwrap_err(),
        client.get_test_statistics("p").await.unwrap_err(),
        client.cleanup_old_tests(7).await.unwrap_err(),
    ];

    let names: Vec<String> = errors
        .into_iter()
        .map(|e| match e {
            BridgeError::MethodNotFound(name) => name,
            other => panic!("expected MethodNotFound, got {other:?}"),
        })
        .collect();
    let expected: Vec<&str> = RemoteMethod::ALL.iter().map(|m| m.as_str()).collect();
    assert_eq!(names, expected);

    assert_eq!(bridge.invocations(), 0, "No remote function may be invoked");
    assert_eq!(bridge.lookups(), 1, "Table is negotiated once at connect");
}

/// (3) Capabilities are negotiated once, not per call.
#[tokio::test]
async fn test_capabilities_read_once() {
    let host = create_test_host();
    let (client, bridge) = connect_client(&host).await;

    client.get_test_statistics(TEST_PROJECT).await.unwrap();
    client.get_test_history(TEST_PROJECT, Some(3)).await.unwrap();

    assert_eq!(bridge.lookups(), 1);
    assert_eq!(bridge.invocations(), 2);
    assert_eq!(client.capabilities(), RemoteMethod::ALL.to_vec());
}

/// (4) Partial host: supported calls work, unsupported ones fail locally.
#[tokio::test]
async fn test_partial_host_table() {
    let mut table = FunctionTable::new();
    table.register("get_test_statistics", |_| async {
        Ok(json!({ "total_runs": 4, "passed_runs": 3, "failed_runs": 1, "unique_tests": 2 }))
    });
    table.register("some_other_function", |_| async { Ok(json!(null)) });
    let bridge = CountingBridge::new(table);
    let client = TestHistoryClient::connect(Some(bridge.clone()), &Config::default())
        .await
        .unwrap();

    let stats = client.get_test_statistics("p").await.unwrap();
    assert_eq!(stats.total_runs, 4);
    assert!(client.supports(RemoteMethod::GetTestStatistics));
    assert!(!client.supports(RemoteMethod::CleanupOldTests));

    let err = client.cleanup_old_tests(30).await.unwrap_err();
    assert!(matches!(err, BridgeError::MethodNotFound(ref name) if name == "cleanup_old_tests"));
    assert_eq!(bridge.invocations(), 1);
}

/// (5) Remote rejection reaches the caller unchanged.
#[tokio::test]
async fn test_remote_rejection_unchanged() {
    let host = create_test_host();
    let (client, _bridge) = connect_client(&host).await;

    let err = client.get_test_detail(404).await.unwrap_err();
    match err {
        BridgeError::Remote(remote) => {
            assert_eq!(remote.message, "Test run 404 not found");
            assert_eq!(remote.data, Some(json!({ "run_id": 404 })));
        }
        other => panic!("expected remote rejection, got {other:?}"),
    }
}

/// (6) Independent calls can run concurrently on a shared client.
#[tokio::test]
async fn test_concurrent_calls_share_client() {
    let host = create_test_host();
    host.store()
        .record_run(sample_run("test_scene", test_history_bridge::models::RunStatus::Passed))
        .await;
    let (client, bridge) = connect_client(&host).await;

    let a = client.clone();
    let b = client.clone();
    let (history, stats) = tokio::join!(
        a.get_test_history(TEST_PROJECT, None),
        b.get_test_statistics(TEST_PROJECT)
    );

    assert_eq!(history.unwrap().len(), 1);
    assert_eq!(stats.unwrap().total_runs, 1);
    assert_eq!(bridge.invocations(), 2);

    let direct: Arc<dyn HostBridge> = bridge;
    assert_eq!(direct.methods().await.len(), RemoteMethod::ALL.len());
}
