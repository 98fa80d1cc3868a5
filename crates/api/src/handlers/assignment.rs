use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use classdesk_core::models::assignment::{
    ActionResult, Assignment, AssignmentDraft, AssignmentFilter, Confirmation, CountResponse,
    SubmissionState, SubmitAssignmentsRequest, SubmitResult,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteParams {
    pub confirm: bool,
}

#[axum::debug_handler]
pub async fn list_assignments(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<AssignmentFilter>,
) -> Result<Json<Vec<Assignment>>, AppError> {
    let assignments = state.coordinator.list(filter).await?;
    Ok(Json(assignments))
}

#[axum::debug_handler]
pub async fn count_assignments(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<AssignmentFilter>,
) -> Result<Json<CountResponse>, AppError> {
    let count = state.coordinator.count(filter).await?;
    Ok(Json(CountResponse { count }))
}

#[axum::debug_handler]
pub async fn submit_assignments(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SubmitAssignmentsRequest>,
) -> (StatusCode, Json<SubmitResult>) {
    let result = state
        .coordinator
        .submit(&payload.selection, &payload.course_ids)
        .await;

    (submit_status(result.state), Json(result))
}

#[axum::debug_handler]
pub async fn update_assignment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignmentDraft>,
) -> (StatusCode, Json<ActionResult>) {
    let result = state.coordinator.edit(id, &payload).await;
    (action_status(&result), Json(result))
}

#[axum::debug_handler]
pub async fn delete_assignment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> (StatusCode, Json<ActionResult>) {
    let confirmation = Confirmation::from(params.confirm);
    let result = state.coordinator.delete(id, confirmation).await;

    let status = match confirmation {
        Confirmation::Declined => StatusCode::BAD_REQUEST,
        Confirmation::Confirmed => action_status(&result),
    };
    (status, Json(result))
}

fn submit_status(state: SubmissionState) -> StatusCode {
    match state {
        SubmissionState::Success => StatusCode::CREATED,
        SubmissionState::Rejected => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionState::AllDuplicate => StatusCode::CONFLICT,
        SubmissionState::PersistError => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn action_status(result: &ActionResult) -> StatusCode {
    if result.success {
        StatusCode::OK
    } else if result.not_found {
        StatusCode::NOT_FOUND
    } else if !result.field_errors.is_empty() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::BAD_GATEWAY
    }
}
