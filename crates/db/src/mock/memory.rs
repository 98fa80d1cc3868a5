use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use classdesk_core::{
    models::{
        assignment::{Assignment, AssignmentFilter, NewAssignment},
        catalog::{Course, Instructor},
    },
    store::{AssignmentStore, CatalogSource},
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process store for tests and local demos. Counts every write call so
/// tests can assert that nothing was persisted.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    instructors: Vec<Instructor>,
    courses: Vec<Course>,
    assignments: Vec<Assignment>,
    writes: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(instructors: Vec<Instructor>, courses: Vec<Course>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                instructors,
                courses,
                ..Inner::default()
            })),
        }
    }

    pub async fn add_instructor(&self, instructor: Instructor) {
        self.inner.write().await.instructors.push(instructor);
    }

    pub async fn add_course(&self, course: Course) {
        self.inner.write().await.courses.push(course);
    }

    /// Stores rows directly, bypassing the write counter.
    pub async fn seed(&self, assignments: impl IntoIterator<Item = Assignment>) {
        self.inner.write().await.assignments.extend(assignments);
    }

    pub async fn assignments(&self) -> Vec<Assignment> {
        self.inner.read().await.assignments.clone()
    }

    /// Number of insert/update/delete calls received.
    pub async fn write_calls(&self) -> usize {
        self.inner.read().await.writes
    }
}

fn materialize(fields: NewAssignment, id: Uuid) -> Assignment {
    let now = Utc::now();
    Assignment {
        id,
        instructor_id: fields.instructor_id,
        course_id: fields.course_id,
        section: fields.section,
        academic_year: fields.academic_year,
        year_level: fields.year_level,
        semester: fields.semester,
        days: fields.days,
        time: fields.time,
        is_active: fields.is_active,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl CatalogSource for InMemoryStore {
    async fn fetch_instructors(&self) -> eyre::Result<Vec<Instructor>> {
        Ok(self.inner.read().await.instructors.clone())
    }

    async fn fetch_courses(&self) -> eyre::Result<Vec<Course>> {
        Ok(self.inner.read().await.courses.clone())
    }
}

#[async_trait]
impl AssignmentStore for InMemoryStore {
    async fn list_assignments(&self, filter: AssignmentFilter) -> eyre::Result<Vec<Assignment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .assignments
            .iter()
            .filter(|assignment| filter.matches(assignment))
            .cloned()
            .collect())
    }

    async fn count_assignments(&self, filter: AssignmentFilter) -> eyre::Result<u64> {
        let inner = self.inner.read().await;
        Ok(inner
            .assignments
            .iter()
            .filter(|assignment| filter.matches(assignment))
            .count() as u64)
    }

    async fn insert_assignments(&self, batch: Vec<NewAssignment>) -> eyre::Result<Vec<Assignment>> {
        let mut inner = self.inner.write().await;
        inner.writes += 1;

        let created: Vec<Assignment> = batch
            .into_iter()
            .map(|fields| materialize(fields, Uuid::new_v4()))
            .collect();
        inner.assignments.extend(created.iter().cloned());
        Ok(created)
    }

    async fn update_assignment(
        &self,
        id: Uuid,
        fields: NewAssignment,
    ) -> eyre::Result<Option<Assignment>> {
        let mut inner = self.inner.write().await;
        inner.writes += 1;

        let Some(slot) = inner.assignments.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        let created_at = slot.created_at;
        *slot = materialize(fields, id);
        slot.created_at = created_at;
        Ok(Some(slot.clone()))
    }

    async fn delete_assignment(&self, id: Uuid) -> eyre::Result<u64> {
        let mut inner = self.inner.write().await;
        inner.writes += 1;

        let before = inner.assignments.len();
        inner.assignments.retain(|assignment| assignment.id != id);
        Ok((before - inner.assignments.len()) as u64)
    }
}
