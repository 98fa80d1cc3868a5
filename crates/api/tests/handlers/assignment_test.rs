use std::sync::Arc;

use axum::http::StatusCode;
use classdesk_core::{
    coordinator::ALL_DUPLICATE_MESSAGE,
    models::assignment::{ActionResult, Assignment, CountResponse, SubmissionState, SubmitResult},
};
use classdesk_db::mock::repositories::MockAssignmentRepo;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{build_server, TestContext};

#[tokio::test]
async fn test_submit_creates_one_row_per_course() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/assignments")
        .json(&ctx.submission(3))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let result = response.json::<SubmitResult>();
    assert!(result.success);
    assert_eq!(result.created, 3);
    assert_eq!(result.skipped, 0);
    assert_eq!(result.state, SubmissionState::Success);
    assert_eq!(result.message, "3 new assignments created.");
    assert_eq!(ctx.store.assignments().await.len(), 3);
}

#[test_log::test(tokio::test)]
async fn test_resubmit_is_conflict_and_writes_nothing() {
    let ctx = TestContext::new();
    ctx.server
        .post("/api/assignments")
        .json(&ctx.submission(2))
        .await;
    let writes = ctx.store.write_calls().await;

    let response = ctx
        .server
        .post("/api/assignments")
        .json(&ctx.submission(2))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let result = response.json::<SubmitResult>();
    assert_eq!(result.state, SubmissionState::AllDuplicate);
    assert_eq!(result.message, ALL_DUPLICATE_MESSAGE);
    assert_eq!(result.skipped, 2);
    assert_eq!(ctx.store.write_calls().await, writes);
    assert_eq!(ctx.store.assignments().await.len(), 2);
}

#[tokio::test]
async fn test_partial_overlap_creates_the_rest() {
    let ctx = TestContext::new();
    ctx.server
        .post("/api/assignments")
        .json(&ctx.submission(1))
        .await;

    let response = ctx
        .server
        .post("/api/assignments")
        .json(&ctx.submission(3))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let result = response.json::<SubmitResult>();
    assert_eq!(result.created, 2);
    assert_eq!(result.skipped, 1);
    assert_eq!(
        result.message,
        "2 new assignments created. 1 assignment already existed."
    );
}

#[tokio::test]
async fn test_incomplete_submission_is_rejected() {
    let ctx = TestContext::new();
    let mut body = ctx.submission(2);
    body["section"] = json!("   ");

    let response = ctx
        .server
        .post("/api/assignments")
        .json(&body)
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let result = response.json::<SubmitResult>();
    assert_eq!(result.state, SubmissionState::Rejected);
    assert!(result.field_errors.contains("section"));
    assert_eq!(ctx.store.write_calls().await, 0);
}

#[tokio::test]
async fn test_blank_choices_are_field_errors() {
    let ctx = TestContext::new();
    let mut body = ctx.submission(2);
    body["year_level"] = json!("");
    body["semester"] = json!("Winter");
    body["days"] = json!([""]);

    let response = ctx
        .server
        .post("/api/assignments")
        .json(&body)
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let result = response.json::<SubmitResult>();
    assert_eq!(result.state, SubmissionState::Rejected);
    assert_eq!(
        result.field_errors.fields().collect::<Vec<_>>(),
        vec!["days", "semester", "year_level"]
    );
    assert_eq!(result.field_errors.get("year_level"), Some("Year level is required"));
    assert_eq!(ctx.store.write_calls().await, 0);
}

#[tokio::test]
async fn test_unknown_course_is_rejected() {
    let ctx = TestContext::new();
    let mut ids = ctx.course_ids(1);
    ids.push(Uuid::new_v4());
    let mut body = ctx.submission(0);
    body["course_ids"] = json!(ids);

    let response = ctx
        .server
        .post("/api/assignments")
        .json(&body)
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json::<SubmitResult>().field_errors.contains("courses"));
    assert!(ctx.store.assignments().await.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_store_failure_is_bad_gateway_with_store_message() {
    let ctx = TestContext::new();
    let mut repo = MockAssignmentRepo::new();
    repo.expect_list_assignments()
        .times(1)
        .returning(|_| Ok(Vec::new()));
    repo.expect_insert_assignments()
        .times(1)
        .returning(|_| Err(eyre::eyre!("deadlock detected")));
    let server = build_server(Arc::new(ctx.store.clone()), Arc::new(repo));

    let response = server
        .post("/api/assignments")
        .json(&ctx.submission(2))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let result = response.json::<SubmitResult>();
    assert_eq!(result.state, SubmissionState::PersistError);
    assert_eq!(result.message, "deadlock detected");
    assert_eq!(result.created, 0);
}

#[tokio::test]
async fn test_list_and_count_with_filter() {
    let ctx = TestContext::new();
    ctx.server
        .post("/api/assignments")
        .json(&ctx.submission(3))
        .await;
    let first_course = ctx.courses[0].id;

    let response = ctx
        .server
        .get("/api/assignments")
        .add_query_param("course_id", first_course)
        .add_query_param("active", "true")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let rows = response.json::<Vec<Assignment>>();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].course_id, first_course);
    assert_eq!(rows[0].section, "BSIT-1A");

    let response = ctx
        .server
        .get("/api/assignments/count")
        .add_query_param("instructor_id", ctx.instructor.id)
        .await;

    assert_eq!(response.json::<CountResponse>(), CountResponse { count: 3 });
}

#[tokio::test]
async fn test_update_assignment() {
    let ctx = TestContext::new();
    ctx.server
        .post("/api/assignments")
        .json(&ctx.submission(1))
        .await;
    let existing = ctx.store.assignments().await.remove(0);

    let mut body = ctx.submission(0);
    body["course_id"] = json!(existing.course_id);
    body["time"] = json!("13:00-14:30");
    body["is_active"] = json!(false);

    let response = ctx
        .server
        .put(&format!("/api/assignments/{}", existing.id))
        .json(&body)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let result = response.json::<ActionResult>();
    assert!(result.success);
    let updated = result.assignment.expect("updated row");
    assert_eq!(updated.id, existing.id);
    assert_eq!(updated.time.to_string(), "13:00-14:30");
    assert!(!updated.is_active);
}

#[tokio::test]
async fn test_update_unknown_assignment_is_not_found() {
    let ctx = TestContext::new();
    let mut body = ctx.submission(0);
    body["course_id"] = json!(ctx.courses[0].id);

    let response = ctx
        .server
        .put(&format!("/api/assignments/{}", Uuid::new_v4()))
        .json(&body)
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.json::<ActionResult>().not_found);
}

#[tokio::test]
async fn test_update_with_bad_time_is_rejected() {
    let ctx = TestContext::new();
    let mut body = ctx.submission(0);
    body["course_id"] = json!(ctx.courses[0].id);
    body["time"] = json!("10:00-09:00");

    let response = ctx
        .server
        .put(&format!("/api/assignments/{}", Uuid::new_v4()))
        .json(&body)
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json::<ActionResult>().field_errors.contains("time"));
    assert_eq!(ctx.store.write_calls().await, 0);
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let ctx = TestContext::new();
    ctx.server
        .post("/api/assignments")
        .json(&ctx.submission(1))
        .await;
    let id = ctx.store.assignments().await[0].id;
    let path = format!("/api/assignments/{id}");

    let response = ctx.server.delete(&path).expect_failure().await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<ActionResult>().message, "Deletion cancelled.");
    assert_eq!(ctx.store.assignments().await.len(), 1);

    let response = ctx
        .server
        .delete(&path)
        .add_query_param("confirm", "true")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(ctx.store.assignments().await.is_empty());

    let response = ctx
        .server
        .delete(&path)
        .add_query_param("confirm", "true")
        .expect_failure()
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<ActionResult>().message,
        format!("Assignment {id} not found.")
    );
}
