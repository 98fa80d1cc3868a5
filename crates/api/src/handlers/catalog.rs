use axum::{
    extract::{Path, Query, State},
    Json,
};
use classdesk_core::{
    catalog::{group_by_year_level, CourseFilter, InstructorFilter, YearLevelGroup},
    models::catalog::{CatalogRefreshResponse, Course, InstructorResponse},
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn list_instructors(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<InstructorFilter>,
) -> Result<Json<Vec<InstructorResponse>>, AppError> {
    let instructors = state.catalog().load_instructors().await?;
    let response: Vec<InstructorResponse> = filter
        .apply(instructors)
        .into_iter()
        .map(InstructorResponse::from)
        .collect();

    debug!("Returning {} instructors", response.len());
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_instructor(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<InstructorResponse>, AppError> {
    let instructor = state.catalog().instructor(id).await?;
    Ok(Json(instructor.into()))
}

#[axum::debug_handler]
pub async fn list_courses(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.catalog().load_courses().await?;
    Ok(Json(filter.apply(courses)))
}

#[axum::debug_handler]
pub async fn get_course(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(state.catalog().course(id).await?))
}

#[axum::debug_handler]
pub async fn grouped_courses(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<YearLevelGroup>>, AppError> {
    let courses = state.catalog().load_courses().await?;
    Ok(Json(group_by_year_level(filter.apply(courses))))
}

/// Reloads the snapshot the coordinator resolves ids against.
#[axum::debug_handler]
pub async fn refresh_catalog(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<CatalogRefreshResponse>, AppError> {
    let snapshot = state.catalog().refresh().await?;

    Ok(Json(CatalogRefreshResponse {
        instructors: snapshot.instructor_count(),
        courses: snapshot.course_count(),
        loaded_at: snapshot.loaded_at(),
    }))
}
