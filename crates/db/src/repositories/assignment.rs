use crate::models::{days_column, DbAssignment};
use chrono::{DateTime, Utc};
use classdesk_core::models::assignment::{AssignmentFilter, NewAssignment};
use eyre::Result;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::uuid IS NULL OR instructor_id = $1)
      AND ($2::uuid IS NULL OR course_id = $2)
      AND ($3::text IS NULL OR section = $3)
      AND ($4::text IS NULL OR academic_year = $4)
      AND ($5::text IS NULL OR semester = $5)
      AND ($6::text IS NULL OR year_level = $6)
      AND ($7::boolean IS NULL OR is_active = $7)
"#;

const RETURNING_COLUMNS: &str = r#"
    id, instructor_id, course_id, section, academic_year, year_level, semester,
    days, start_time, end_time, is_active, created_at, updated_at
"#;

/// Bind values for [`FILTER_CLAUSE`], in placeholder order.
struct FilterBinds {
    instructor_id: Option<Uuid>,
    course_id: Option<Uuid>,
    section: Option<String>,
    academic_year: Option<String>,
    semester: Option<&'static str>,
    year_level: Option<&'static str>,
    is_active: Option<bool>,
}

impl From<&AssignmentFilter> for FilterBinds {
    fn from(filter: &AssignmentFilter) -> Self {
        Self {
            instructor_id: filter.instructor_id,
            course_id: filter.course_id,
            section: filter.section.clone(),
            academic_year: filter.academic_year.map(|year| year.to_string()),
            semester: filter.semester.map(|semester| semester.as_str()),
            year_level: filter.year_level.map(|level| level.as_str()),
            is_active: filter.is_active,
        }
    }
}

pub async fn get_assignments(
    pool: &Pool<Postgres>,
    filter: &AssignmentFilter,
) -> Result<Vec<DbAssignment>> {
    let binds = FilterBinds::from(filter);
    let sql = format!(
        "SELECT {RETURNING_COLUMNS} FROM assignments {FILTER_CLAUSE} ORDER BY year_level ASC, section ASC, created_at ASC"
    );

    let assignments = sqlx::query_as::<_, DbAssignment>(&sql)
        .bind(binds.instructor_id)
        .bind(binds.course_id)
        .bind(binds.section)
        .bind(binds.academic_year)
        .bind(binds.semester)
        .bind(binds.year_level)
        .bind(binds.is_active)
        .fetch_all(pool)
        .await?;

    tracing::debug!("Fetched {} assignments for {:?}", assignments.len(), filter);
    Ok(assignments)
}

pub async fn count_assignments(pool: &Pool<Postgres>, filter: &AssignmentFilter) -> Result<i64> {
    let binds = FilterBinds::from(filter);
    let sql = format!("SELECT COUNT(*) FROM assignments {FILTER_CLAUSE}");

    let count = sqlx::query_scalar::<_, i64>(&sql)
        .bind(binds.instructor_id)
        .bind(binds.course_id)
        .bind(binds.section)
        .bind(binds.academic_year)
        .bind(binds.semester)
        .bind(binds.year_level)
        .bind(binds.is_active)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Builds a single multi-row `INSERT ... RETURNING` for the batch.
fn insert_statement(batch: &[NewAssignment], now: DateTime<Utc>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "INSERT INTO assignments \
         (id, instructor_id, course_id, section, academic_year, year_level, semester, \
          days, start_time, end_time, is_active, created_at, updated_at) ",
    );

    builder.push_values(batch, |mut row, fields| {
        row.push_bind(Uuid::new_v4())
            .push_bind(fields.instructor_id)
            .push_bind(fields.course_id)
            .push_bind(fields.section.clone())
            .push_bind(fields.academic_year.to_string())
            .push_bind(fields.year_level.as_str())
            .push_bind(fields.semester.as_str())
            .push_bind(days_column(&fields.days))
            .push_bind(fields.time.start())
            .push_bind(fields.time.end())
            .push_bind(fields.is_active)
            .push_bind(now)
            .push_bind(now);
    });
    builder.push(" RETURNING ");
    builder.push(RETURNING_COLUMNS);
    builder
}

/// Inserts the whole batch with one statement, so either every row is
/// stored or none is.
pub async fn create_assignments(
    pool: &Pool<Postgres>,
    batch: &[NewAssignment],
) -> Result<Vec<DbAssignment>> {
    if batch.is_empty() {
        return Ok(Vec::new());
    }

    let created = insert_statement(batch, Utc::now())
        .build_query_as::<DbAssignment>()
        .fetch_all(pool)
        .await?;

    tracing::debug!("Inserted {} assignments", created.len());
    Ok(created)
}

pub async fn update_assignment(
    pool: &Pool<Postgres>,
    id: Uuid,
    fields: &NewAssignment,
) -> Result<Option<DbAssignment>> {
    let sql = format!(
        r#"
        UPDATE assignments
        SET instructor_id = $2, course_id = $3, section = $4, academic_year = $5,
            year_level = $6, semester = $7, days = $8, start_time = $9, end_time = $10,
            is_active = $11, updated_at = $12
        WHERE id = $1
        RETURNING {RETURNING_COLUMNS}
        "#
    );

    let updated = sqlx::query_as::<_, DbAssignment>(&sql)
        .bind(id)
        .bind(fields.instructor_id)
        .bind(fields.course_id)
        .bind(&fields.section)
        .bind(fields.academic_year.to_string())
        .bind(fields.year_level.as_str())
        .bind(fields.semester.as_str())
        .bind(days_column(&fields.days))
        .bind(fields.time.start())
        .bind(fields.time.end())
        .bind(fields.is_active)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

    Ok(updated)
}

pub async fn delete_assignment(pool: &Pool<Postgres>, id: Uuid) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM assignments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use classdesk_core::models::{
        assignment::Day,
        catalog::{Semester, YearLevel},
    };
    use pretty_assertions::assert_eq;

    fn new_assignment(section: &str) -> NewAssignment {
        NewAssignment {
            instructor_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            section: section.to_string(),
            academic_year: "2024-2025".parse().unwrap(),
            year_level: YearLevel::First,
            semester: Semester::First,
            days: [Day::Monday].into_iter().collect(),
            time: "08:00-09:30".parse().unwrap(),
            is_active: true,
        }
    }

    #[test]
    fn test_batch_insert_is_one_statement() {
        let batch = vec![new_assignment("BSIT-1A"), new_assignment("BSIT-1B"), new_assignment("BSIT-1C")];

        let builder = insert_statement(&batch, Utc::now());
        let sql = builder.sql();

        assert_eq!(sql.matches("INSERT INTO").count(), 1);
        assert_eq!(sql.matches("), (").count(), 2);
        assert!(sql.contains("$39"));
        assert!(!sql.contains("$40"));
        assert!(sql.contains("RETURNING"));
    }
}
