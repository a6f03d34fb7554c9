//! HTTP surface tests

use docname_core::{JobStatus, NamingJob};
use docname_jobs::{AgendaPreview, JobRunner, NamingConfig};
use docname_service::{routes, ErrorBody};
use docname_store::{DocumentStore, InMemoryStore};
use docname_test_utils::{expected_sample_names, sample_store, wait_for_job};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use warp::http::StatusCode;

fn runner(store: &Arc<InMemoryStore>) -> JobRunner {
    JobRunner::new(
        store.clone(),
        NamingConfig::default().with_retry(2, Duration::ZERO),
    )
}

fn commit_body(last_known_update: &str) -> serde_json::Value {
    let pieces: Vec<_> = expected_sample_names()
        .into_iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    json!({ "lastKnownUpdate": last_known_update, "pieces": pieces })
}

#[tokio::test]
async fn preview_lists_proposed_names() {
    let api = routes(runner(&sample_store()));
    let res = warp::test::request()
        .path("/agendas/a1/preview")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let preview: AgendaPreview = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(preview.items.len(), 4);
    assert_eq!(
        preview.items[0].pieces[0].new_title,
        "VR 2024 0703 DOC.0012-1 Annual Budget"
    );

    let raw: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(raw["items"][1]["purpose"], "announcement");
    assert_eq!(raw["items"][3]["pieces"][0]["alreadyNamed"], true);
}

#[tokio::test]
async fn preview_of_unknown_agenda_is_404() {
    let api = routes(runner(&sample_store()));
    let res = warp::test::request()
        .path("/agendas/nope/preview")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: ErrorBody = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(body.error, "agenda not found: nope");
}

#[tokio::test]
async fn commit_is_accepted_and_job_can_be_polled() {
    let store = sample_store();
    let api = routes(runner(&store));

    let res = warp::test::request()
        .method("POST")
        .path("/agendas/a1/commit")
        .json(&commit_body("2099-01-01T00:00:00Z"))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let job: NamingJob = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(job.status, JobStatus::Running);

    let done = wait_for_job(store.as_ref(), job.id).await;
    assert_eq!(done.status, JobStatus::Success);

    let res = warp::test::request()
        .path(&format!("/jobs/{}", job.id))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let polled: NamingJob = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(polled.status, JobStatus::Success);
    assert_eq!(polled.used_pieces.len(), 5);
}

#[tokio::test]
async fn stale_commit_is_409() {
    let store = sample_store();
    let api = routes(runner(&store));

    let res = warp::test::request()
        .method("POST")
        .path("/agendas/a1/commit")
        .json(&commit_body("2099-01-01T00:00:00Z"))
        .reply(&api)
        .await;
    let job: NamingJob = serde_json::from_slice(res.body()).unwrap();
    wait_for_job(store.as_ref(), job.id).await;

    let res = warp::test::request()
        .method("POST")
        .path("/agendas/a1/commit")
        .json(&commit_body("2000-01-01T00:00:00Z"))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn commit_without_timestamp_is_400() {
    let api = routes(runner(&sample_store()));
    let res = warp::test::request()
        .method("POST")
        .path("/agendas/a1/commit")
        .json(&json!({ "pieces": [{ "id": "p1", "name": "x" }] }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(body.error, "invalid request: lastKnownUpdate is required");
}

#[tokio::test]
async fn forbidden_job_is_403() {
    let store = sample_store();
    store.deny_job_access();
    let api = routes(runner(&store));

    let res = warp::test::request()
        .method("POST")
        .path("/agendas/a1/commit")
        .json(&commit_body("2099-01-01T00:00:00Z"))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.snapshot().jobs[0].status, JobStatus::Failed);
}

#[tokio::test]
async fn date_change_is_accepted() {
    let store = sample_store();
    let api = routes(runner(&store));

    let res = warp::test::request()
        .method("POST")
        .path("/meetings/m1/date-change")
        .json(&json!({ "from": "2024-03-07", "to": "2024-04-01" }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let job: NamingJob = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(job.source, "m1");

    let done = wait_for_job(store.as_ref(), job.id).await;
    assert_eq!(done.status, JobStatus::Success);
    assert!(store.job_exists(job.id).await.unwrap());
    assert_eq!(
        store.piece(&"p5".into()).unwrap().piece.title,
        "VR 2024 0104 DOC.0003-1 Old"
    );
}

#[tokio::test]
async fn date_change_for_unknown_meeting_is_404() {
    let api = routes(runner(&sample_store()));
    let res = warp::test::request()
        .method("POST")
        .path("/meetings/nope/date-change")
        .json(&json!({ "from": "2024-03-07", "to": "2024-04-01" }))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_job_is_404() {
    let api = routes(runner(&sample_store()));
    let res = warp::test::request()
        .path(&format!("/jobs/{}", docname_core::JobId::new()))
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_method_is_405() {
    let api = routes(runner(&sample_store()));
    let res = warp::test::request()
        .method("DELETE")
        .path("/agendas/a1/preview")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}
