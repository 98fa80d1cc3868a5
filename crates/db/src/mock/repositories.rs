use async_trait::async_trait;
use classdesk_core::{
    models::{
        assignment::{Assignment, AssignmentFilter, NewAssignment},
        catalog::{Course, Instructor},
    },
    store::{AssignmentStore, CatalogSource},
};
use mockall::mock;
use uuid::Uuid;

// Mock repositories for testing
mock! {
    pub CatalogRepo {}

    #[async_trait]
    impl CatalogSource for CatalogRepo {
        async fn fetch_instructors(&self) -> eyre::Result<Vec<Instructor>>;

        async fn fetch_courses(&self) -> eyre::Result<Vec<Course>>;
    }
}

mock! {
    pub AssignmentRepo {}

    #[async_trait]
    impl AssignmentStore for AssignmentRepo {
        async fn list_assignments(
            &self,
            filter: AssignmentFilter,
        ) -> eyre::Result<Vec<Assignment>>;

        async fn count_assignments(
            &self,
            filter: AssignmentFilter,
        ) -> eyre::Result<u64>;

        async fn insert_assignments(
            &self,
            batch: Vec<NewAssignment>,
        ) -> eyre::Result<Vec<Assignment>>;

        async fn update_assignment(
            &self,
            id: Uuid,
            fields: NewAssignment,
        ) -> eyre::Result<Option<Assignment>>;

        async fn delete_assignment(
            &self,
            id: Uuid,
        ) -> eyre::Result<u64>;
    }
}
