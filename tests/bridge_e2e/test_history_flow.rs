//! E2E tests: history operations against the in-process host.

use chrono::{Duration, Utc};
use test_history_bridge::models::{CaseStatus, RunStatus, TestType};

use super::test_helpers::*;

/// (7) History is newest first and respects the default limit of 50.
#[tokio::test]
async fn test_history_order_and_default_limit() {
    let host = create_test_host();
    let now = Utc::now();
    for i in 0..60 {
        let at = now - Duration::minutes(60 - i);
        seed_run_at(&host, &format!("test_{i}"), RunStatus::Passed, at).await;
    }
    let (client, _bridge) = connect_client(&host).await;

    let runs = client.get_test_history(TEST_PROJECT, None).await.unwrap();
    assert_eq!(runs.len(), 50);
    assert_eq!(runs[0].test_name, "test_59");
    assert!(runs.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let runs = client.get_test_history(TEST_PROJECT, Some(2)).await.unwrap();
    assert_eq!(runs.len(), 2);

    let runs = client.get_test_history("/elsewhere", None).await.unwrap();
    assert!(runs.is_empty());
}

/// (8) Detail carries cases and decodable screenshots.
#[tokio::test]
async fn test_detail_round_trip_through_bridge() {
    let host = create_test_host();
    let id = host
        .store()
        .record_run(sample_run("test_arrow_connection", RunStatus::Failed))
        .await;
    let (client, _bridge) = connect_client(&host).await;

    let detail = client.get_test_detail(id).await.unwrap();
    assert_eq!(detail.run.id, id);
    assert_eq!(detail.run.test_type, TestType::Ui);
    assert_eq!(detail.run.status, RunStatus::Failed);
    assert!(detail.output.contains("2 tests collected"));

    let failed: Vec<_> = detail.failed_cases().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].status, CaseStatus::Fail);
    assert_eq!(failed[0].message.as_deref(), Some("arrow endpoints not updated"));

    assert_eq!(detail.screenshots.len(), 2);
    assert_eq!(detail.screenshots[0].step_name, "open scene");
    assert_eq!(
        detail.screenshots[1].decode_image().unwrap(),
        b"\x89PNG-step2".to_vec()
    );
}

/// (9) AI analysis is stored by the host and visible in later reads.
#[tokio::test]
async fn test_update_ai_analysis() {
    let host = create_test_host();
    let id = host
        .store()
        .record_run(sample_run("test_item_operations", RunStatus::Failed))
        .await;
    let (client, _bridge) = connect_client(&host).await;

    let ack = client
        .update_test_ai_analysis(id, "## Root cause\nArrow not repainted")
        .await
        .unwrap();
    assert!(ack.success);

    let detail = client.get_test_detail(id).await.unwrap();
    assert_eq!(
        detail.run.ai_analysis.as_deref(),
        Some("## Root cause\nArrow not repainted")
    );

    let ack = client.update_test_ai_analysis(id + 1000, "nothing").await.unwrap();
    assert!(!ack.success);
}

/// (10) Statistics count runs per project.
#[tokio::test]
async fn test_statistics() {
    let host = create_test_host();
    host.store().record_run(sample_run("test_a", RunStatus::Passed)).await;
    host.store().record_run(sample_run("test_a", RunStatus::Passed)).await;
    host.store().record_run(sample_run("test_b", RunStatus::Failed)).await;
    host.store().record_run(sample_run("test_c", RunStatus::Error)).await;
    let (client, _bridge) = connect_client(&host).await;

    let stats = client.get_test_statistics(TEST_PROJECT).await.unwrap();
    assert_eq!(stats.total_runs, 4);
    assert_eq!(stats.passed_runs, 2);
    assert_eq!(stats.failed_runs, 2);
    assert_eq!(stats.unique_tests, 3);
}

/// (11) Cleanup deletes only runs past the retention period.
#[tokio::test]
async fn test_cleanup_old_tests() {
    let host = create_test_host();
    let now = Utc::now();
    let old = seed_run_at(&host, "test_old", RunStatus::Passed, now - Duration::days(45)).await;
    seed_run_at(&host, "test_older", RunStatus::Failed, now - Duration::days(90)).await;
    let recent =
        seed_run_at(&host, "test_recent", RunStatus::Passed, now - Duration::days(2)).await;
    let (client, _bridge) = connect_client(&host).await;

    let report = client.cleanup_old_tests(30).await.unwrap();
    assert!(report.success);
    assert_eq!(report.deleted, 2);

    assert!(client.get_test_detail(old).await.is_err());
    assert!(client.get_test_detail(recent).await.is_ok());

    let report = client.cleanup_old_tests(30).await.unwrap();
    assert_eq!(report.deleted, 0);
}

/// (12) A retention period beyond the calendar deletes nothing.
#[tokio::test]
async fn test_cleanup_with_unbounded_period() {
    let host = create_test_host();
    let id = seed_run_at(&host, "test_kept", RunStatus::Passed, Utc::now()).await;
    let (client, _bridge) = connect_client(&host).await;

    let report = client.cleanup_old_tests(u32::MAX).await.unwrap();
    assert!(report.success);
    assert_eq!(report.deleted, 0);
    assert!(client.get_test_detail(id).await.is_ok());
}
