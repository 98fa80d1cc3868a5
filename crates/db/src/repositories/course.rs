use crate::models::DbCourse;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_courses(pool: &Pool<Postgres>) -> Result<Vec<DbCourse>> {
    let courses = sqlx::query_as::<_, DbCourse>(
        r#"
        SELECT id, code, name, units, year_level, semester
        FROM courses
        ORDER BY code ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    tracing::debug!("Fetched {} courses", courses.len());
    Ok(courses)
}
