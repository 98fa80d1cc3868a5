//! Seams to the external relational store.

use async_trait::async_trait;
use eyre::Result;
use uuid::Uuid;

use crate::models::{
    assignment::{Assignment, AssignmentFilter, NewAssignment},
    catalog::{Course, Instructor},
};

/// Read access to the user directory and course catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_instructors(&self) -> Result<Vec<Instructor>>;

    async fn fetch_courses(&self) -> Result<Vec<Course>>;
}

/// Persistence for assignments.
///
/// Errors are reported as `eyre` reports whose message is shown to the user
/// unchanged, so implementations should not wrap them in extra context.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn list_assignments(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>>;

    async fn count_assignments(&self, filter: AssignmentFilter) -> Result<u64>;

    /// Inserts every row or none of them.
    async fn insert_assignments(&self, batch: Vec<NewAssignment>) -> Result<Vec<Assignment>>;

    /// Replaces the row with `id`. Returns `None` when no such row exists.
    async fn update_assignment(&self, id: Uuid, fields: NewAssignment) -> Result<Option<Assignment>>;

    /// Returns the number of rows removed.
    async fn delete_assignment(&self, id: Uuid) -> Result<u64>;
}
