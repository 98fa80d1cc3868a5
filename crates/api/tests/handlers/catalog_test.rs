use std::sync::Arc;

use axum::http::StatusCode;
use classdesk_core::{
    catalog::YearLevelGroup,
    models::catalog::{CatalogRefreshResponse, Course, InstructorResponse, InstructorRole, Semester, YearLevel},
};
use classdesk_db::mock::{repositories::MockCatalogRepo, InMemoryStore};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::test_utils::{build_server, course, instructor};

fn catalog_store() -> InMemoryStore {
    InMemoryStore::with_catalog(
        vec![
            instructor("Andres", "Bonifacio", InstructorRole::Teacher, true),
            instructor("Apolinario", "Mabini", InstructorRole::Instructor, true),
            instructor("Emilio", "Aguinaldo", InstructorRole::Instructor, true),
            instructor("Melchora", "Aquino", InstructorRole::Instructor, false),
        ],
        vec![
            course("IT201", YearLevel::Second, Semester::First),
            course("IT102", YearLevel::First, Semester::Second),
            course("IT101", YearLevel::First, Semester::First),
            course("IT401", YearLevel::Fourth, Semester::Summer),
        ],
    )
}

#[tokio::test]
async fn test_list_instructors_filters_and_sorts() {
    let store = catalog_store();
    let server = build_server(Arc::new(store.clone()), Arc::new(store));

    let response = server
        .get("/api/instructors")
        .add_query_param("role", "instructor")
        .add_query_param("active", "true")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let instructors = response.json::<Vec<InstructorResponse>>();
    let names: Vec<&str> = instructors.iter().map(|i| i.display_name.as_str()).collect();
    assert_eq!(names, vec!["Emilio Aguinaldo", "Apolinario Mabini"]);
}

#[tokio::test]
async fn test_list_instructors_unfiltered() {
    let store = catalog_store();
    let server = build_server(Arc::new(store.clone()), Arc::new(store));

    let response = server.get("/api/instructors").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<InstructorResponse>>().len(), 4);
}

#[tokio::test]
async fn test_list_courses_by_year_level() {
    let store = catalog_store();
    let server = build_server(Arc::new(store.clone()), Arc::new(store));

    let response = server
        .get("/api/courses")
        .add_query_param("year_level", "1st Year")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let codes: Vec<String> = response
        .json::<Vec<Course>>()
        .into_iter()
        .map(|c| c.code)
        .collect();
    assert_eq!(codes, vec!["IT101", "IT102"]);
}

#[tokio::test]
async fn test_grouped_courses_in_year_order() {
    let store = catalog_store();
    let server = build_server(Arc::new(store.clone()), Arc::new(store));

    let response = server.get("/api/courses/grouped").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let groups = response.json::<Vec<YearLevelGroup>>();
    let levels: Vec<YearLevel> = groups.iter().map(|g| g.year_level).collect();
    assert_eq!(levels, vec![YearLevel::First, YearLevel::Second, YearLevel::Fourth]);
    assert_eq!(groups[0].courses.len(), 2);
}

#[tokio::test]
async fn test_refresh_reports_counts() {
    let store = catalog_store();
    let server = build_server(Arc::new(store.clone()), Arc::new(store));

    let response = server.post("/api/catalog/refresh").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let refreshed = response.json::<CatalogRefreshResponse>();
    assert_eq!(refreshed.instructors, 4);
    assert_eq!(refreshed.courses, 4);
}

#[tokio::test]
async fn test_catalog_source_failure_is_bad_gateway() {
    let mut catalog = MockCatalogRepo::new();
    catalog
        .expect_fetch_instructors()
        .returning(|| Err(eyre::eyre!("connection refused")));

    let server = build_server(Arc::new(catalog), Arc::new(InMemoryStore::new()));

    let response = server.post("/api/catalog/refresh").expect_failure().await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<Value>()["error"], "connection refused");
}

#[tokio::test]
async fn test_get_course_reloads_catalog_on_miss() {
    let store = catalog_store();
    let server = build_server(Arc::new(store.clone()), Arc::new(store.clone()));
    server.post("/api/catalog/refresh").await;

    let added = course("IT202", YearLevel::Second, Semester::Second);
    store.add_course(added.clone()).await;

    let response = server.get(&format!("/api/courses/{}", added.id)).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Course>(), added);
}

#[tokio::test]
async fn test_get_unknown_instructor_is_not_found() {
    let store = catalog_store();
    let server = build_server(Arc::new(store.clone()), Arc::new(store));
    let id = uuid::Uuid::new_v4();

    let response = server
        .get(&format!("/api/instructors/{id}"))
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["error"],
        format!("Resource not found: Instructor {id}")
    );
}
