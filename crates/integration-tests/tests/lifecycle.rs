//! Warehouse scenarios end to end over the HTTP store.

#![allow(clippy::unwrap_used)]

use storage_hub::HubError;
use storage_hub_core::{BoxRemoval, Customer, CustomerDraft, JobStatus, LifecycleError, Zone};
use storage_hub_integration_tests::{DocumentTable, TestContext, box_draft, job_draft};
use wiremock::MockServer;

async fn setup() -> (MockServer, DocumentTable, TestContext, Customer) {
    let server = MockServer::start().await;
    let table = DocumentTable::default();
    table.mount(&server).await;
    let ctx = TestContext::new(&server);
    let customer = ctx
        .warehouse
        .create_customer(CustomerDraft {
            name: "Siam Print".to_string(),
            contact: Some("02-555-0101".to_string()),
        })
        .await
        .unwrap();
    (server, table, ctx, customer)
}

#[tokio::test]
async fn test_pull_then_return_keeps_line() {
    let (_server, table, ctx, customer) = setup().await;
    let job = ctx
        .warehouse
        .create_job(job_draft(
            &customer.id,
            "A",
            vec![box_draft("BX-1001", 150), box_draft("BX-1002", 80)],
        ))
        .await
        .unwrap();
    assert_eq!(job.status(), JobStatus::Stored);

    let pulled = ctx.warehouse.pull_job(job.id(), 3).await.unwrap();
    assert_eq!(pulled.status(), JobStatus::Pulled);
    assert_eq!(pulled.line_production().map(|l| l.get()), Some(3));
    assert!(pulled.pulled_at().is_some());

    let returned = ctx
        .warehouse
        .return_job(job.id(), Zone::new("C"))
        .await
        .unwrap();
    assert_eq!(returned.status(), JobStatus::Stored);
    assert_eq!(returned.zone().as_str(), "C");
    assert!(returned.returned_at().is_some());
    assert_eq!(returned.line_production().map(|l| l.get()), Some(3));

    // The remote document holds the flat persisted shape.
    let document = table.document().unwrap();
    let stored = &document["jobs"][0];
    assert_eq!(stored["status"], "stored");
    assert_eq!(stored["zone"], "C");
    assert_eq!(stored["lineProduction"], 3);
    assert!(stored["pulledAt"].is_string());
    assert!(stored["returnedAt"].is_string());
}

#[tokio::test]
async fn test_job_without_boxes_is_rejected_before_io() {
    let (server, _table, ctx, customer) = setup().await;
    let requests_before = server.received_requests().await.unwrap().len();

    let err = ctx
        .warehouse
        .create_job(job_draft(&customer.id, "A", Vec::new()))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(server.received_requests().await.unwrap().len(), requests_before);
    assert!(ctx.warehouse.fetch_system_data().await.jobs.is_empty());
}

#[tokio::test]
async fn test_permanent_box_deletion_cascades_to_job() {
    let (_server, table, ctx, customer) = setup().await;
    let job = ctx
        .warehouse
        .create_job(job_draft(
            &customer.id,
            "B",
            vec![box_draft("BX-2001", 200), box_draft("BX-2002", 60)],
        ))
        .await
        .unwrap();
    let first = job.boxes()[0].id().clone();
    let second = job.boxes()[1].id().clone();

    ctx.warehouse.soft_delete_job(job.id()).await.unwrap();
    assert_eq!(ctx.warehouse.fetch_system_data().await.recycle_bin("").len(), 2);

    let removal = ctx
        .warehouse
        .permanently_delete_box(job.id(), &first)
        .await
        .unwrap();
    assert_eq!(removal, BoxRemoval::Removed { remaining: 1 });
    let data = ctx.warehouse.fetch_system_data().await;
    assert_eq!(data.job(job.id()).unwrap().boxes().len(), 1);

    let removal = ctx
        .warehouse
        .permanently_delete_box(job.id(), &second)
        .await
        .unwrap();
    assert_eq!(removal, BoxRemoval::JobRemoved);
    assert!(ctx.warehouse.fetch_system_data().await.job(job.id()).is_none());
    assert_eq!(table.document().unwrap()["jobs"], serde_json::json!([]));
}

#[tokio::test]
async fn test_pulling_a_pulled_job_is_rejected() {
    let (_server, _table, ctx, customer) = setup().await;
    let job = ctx
        .warehouse
        .create_job(job_draft(&customer.id, "D", vec![box_draft("BX-3001", 90)]))
        .await
        .unwrap();
    ctx.warehouse.pull_job(job.id(), 1).await.unwrap();

    let err = ctx.warehouse.pull_job(job.id(), 2).await.unwrap_err();
    assert!(matches!(
        err,
        HubError::Lifecycle(LifecycleError::InvalidTransition { .. })
    ));
    let data = ctx.warehouse.fetch_system_data().await;
    assert_eq!(
        data.job(job.id()).unwrap().line_production().map(|l| l.get()),
        Some(1)
    );
}

#[tokio::test]
async fn test_box_issue_round_trip_persists_note() {
    let (_server, table, ctx, customer) = setup().await;
    let job = ctx
        .warehouse
        .create_job(job_draft(&customer.id, "E", vec![box_draft("BX-4001", 75)]))
        .await
        .unwrap();
    let box_id = job.boxes()[0].id().clone();

    ctx.warehouse
        .flag_box_issue(job.id(), &box_id, "  crushed corner ")
        .await
        .unwrap();
    let stored_box = &table.document().unwrap()["jobs"][0]["boxes"][0];
    assert_eq!(stored_box["hasIssue"], true);
    assert_eq!(stored_box["issueNote"], "crushed corner");

    let cleared = ctx
        .warehouse
        .toggle_box_issue(job.id(), &box_id, None)
        .await
        .unwrap();
    assert!(!cleared.has_issue());
    let stored_box = &table.document().unwrap()["jobs"][0]["boxes"][0];
    assert!(stored_box.get("hasIssue").is_none());
    assert!(stored_box.get("issueNote").is_none());
}
