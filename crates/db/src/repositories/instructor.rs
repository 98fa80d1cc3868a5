use crate::models::DbInstructor;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_instructors(pool: &Pool<Postgres>) -> Result<Vec<DbInstructor>> {
    let instructors = sqlx::query_as::<_, DbInstructor>(
        r#"
        SELECT id, first_name, middle_name, last_name, role, department,
               is_active, created_at, updated_at
        FROM instructors
        ORDER BY last_name ASC, first_name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!("Fetched {} instructors", instructors.len());
    Ok(instructors)
}
