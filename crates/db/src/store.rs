use async_trait::async_trait;
use classdesk_core::{
    models::{
        assignment::{Assignment, AssignmentFilter, NewAssignment},
        catalog::{Course, Instructor},
    },
    store::{AssignmentStore, CatalogSource},
};
use eyre::Result;
use uuid::Uuid;

use crate::{repositories, DbPool};

/// PostgreSQL-backed catalog source and assignment store.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogSource for PgStore {
    async fn fetch_instructors(&self) -> Result<Vec<Instructor>> {
        repositories::instructor::get_instructors(&self.pool)
            .await?
            .into_iter()
            .map(Instructor::try_from)
            .collect()
    }

    async fn fetch_courses(&self) -> Result<Vec<Course>> {
        repositories::course::get_courses(&self.pool)
            .await?
            .into_iter()
            .map(Course::try_from)
            .collect()
    }
}

#[async_trait]
impl AssignmentStore for PgStore {
    async fn list_assignments(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>> {
        repositories::assignment::get_assignments(&self.pool, &filter)
            .await?
            .into_iter()
            .map(Assignment::try_from)
            .collect()
    }

    async fn count_assignments(&self, filter: AssignmentFilter) -> Result<u64> {
        let count = repositories::assignment::count_assignments(&self.pool, &filter).await?;
        Ok(u64::try_from(count)?)
    }

    async fn insert_assignments(&self, batch: Vec<NewAssignment>) -> Result<Vec<Assignment>> {
        repositories::assignment::create_assignments(&self.pool, &batch)
            .await?
            .into_iter()
            .map(Assignment::try_from)
            .collect()
    }

    async fn update_assignment(&self, id: Uuid, fields: NewAssignment) -> Result<Option<Assignment>> {
        repositories::assignment::update_assignment(&self.pool, id, &fields)
            .await?
            .map(Assignment::try_from)
            .transpose()
    }

    async fn delete_assignment(&self, id: Uuid) -> Result<u64> {
        repositories::assignment::delete_assignment(&self.pool, id).await
    }
}
