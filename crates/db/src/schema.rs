use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const INDEXES: [&str; 5] = [
    "CREATE INDEX IF NOT EXISTS idx_assignments_instructor_id ON assignments(instructor_id)",
    "CREATE INDEX IF NOT EXISTS idx_assignments_course_id ON assignments(course_id)",
    "CREATE INDEX IF NOT EXISTS idx_assignments_term ON assignments(academic_year, semester)",
    "CREATE INDEX IF NOT EXISTS idx_instructors_department ON instructors(department)",
    "CREATE INDEX IF NOT EXISTS idx_courses_year_level ON courses(year_level)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create instructors table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS instructors (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            first_name VARCHAR(255) NOT NULL,
            middle_name VARCHAR(255) NULL,
            last_name VARCHAR(255) NOT NULL,
            role VARCHAR(32) NOT NULL,
            department VARCHAR(255) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_role CHECK (role IN ('teacher', 'instructor'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create courses table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            code VARCHAR(64) NOT NULL UNIQUE,
            name VARCHAR(255) NOT NULL,
            units INTEGER NOT NULL,
            year_level VARCHAR(16) NOT NULL,
            semester VARCHAR(16) NOT NULL,
            CONSTRAINT positive_units CHECK (units > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create assignments table. No unique index on the composite key;
    // duplicates are filtered before insert.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assignments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            instructor_id UUID NOT NULL REFERENCES instructors(id),
            course_id UUID NOT NULL REFERENCES courses(id),
            section VARCHAR(64) NOT NULL,
            academic_year VARCHAR(9) NOT NULL,
            year_level VARCHAR(16) NOT NULL,
            semester VARCHAR(16) NOT NULL,
            days TEXT[] NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes, one statement per query
    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
