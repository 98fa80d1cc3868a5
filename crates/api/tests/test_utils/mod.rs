use std::sync::Arc;

use axum_test::TestServer;
use chrono::Utc;
use classdesk_api::{app, ApiState};
use classdesk_core::{
    models::catalog::{Course, Instructor, InstructorRole, Semester, YearLevel},
    store::{AssignmentStore, CatalogSource},
};
use classdesk_db::mock::InMemoryStore;
use serde_json::{json, Value};
use uuid::Uuid;

pub struct TestContext {
    pub store: InMemoryStore,
    pub server: TestServer,
    pub instructor: Instructor,
    pub courses: Vec<Course>,
}

impl TestContext {
    /// One active instructor and three first-year courses, all in memory.
    pub fn new() -> Self {
        let instructor = instructor("Jose", "Rizal", InstructorRole::Instructor, true);
        let courses = vec![
            course("IT101", YearLevel::First, Semester::First),
            course("IT102", YearLevel::First, Semester::First),
            course("IT103", YearLevel::First, Semester::First),
        ];
        let store = InMemoryStore::with_catalog(vec![instructor.clone()], courses.clone());
        let server = build_server(Arc::new(store.clone()), Arc::new(store.clone()));

        Self {
            store,
            server,
            instructor,
            courses,
        }
    }

    pub fn course_ids(&self, count: usize) -> Vec<Uuid> {
        self.courses.iter().take(count).map(|c| c.id).collect()
    }

    pub fn submission(&self, count: usize) -> Value {
        submission_body(self.instructor.id, &self.course_ids(count))
    }
}

pub fn build_server(
    catalog: Arc<dyn CatalogSource>,
    store: Arc<dyn AssignmentStore>,
) -> TestServer {
    let state = Arc::new(ApiState::new(catalog, store));
    TestServer::new(app(state)).expect("test server")
}

pub fn instructor(first: &str, last: &str, role: InstructorRole, is_active: bool) -> Instructor {
    Instructor {
        id: Uuid::new_v4(),
        first_name: first.to_string(),
        middle_name: None,
        last_name: last.to_string(),
        role,
        department: "Computer Studies".to_string(),
        is_active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn course(code: &str, year_level: YearLevel, semester: Semester) -> Course {
    Course {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: format!("{code} lecture"),
        units: 3,
        year_level,
        semester,
    }
}

pub fn submission_body(instructor_id: Uuid, course_ids: &[Uuid]) -> Value {
    json!({
        "instructor_id": instructor_id,
        "section": "BSIT-1A",
        "year_level": "1st Year",
        "semester": "First",
        "academic_year": "2024-2025",
        "days": ["Mon", "Wed"],
        "time": "08:00-09:30",
        "course_ids": course_ids,
    })
}
