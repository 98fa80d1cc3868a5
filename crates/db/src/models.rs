use chrono::{DateTime, NaiveTime, Utc};
use classdesk_core::models::{
    assignment::{Assignment, DaySet, TimeRange},
    catalog::{Course, Instructor},
};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbInstructor {
    pub id: Uuid,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub role: String,
    pub department: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCourse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub units: i32,
    pub year_level: String,
    pub semester: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAssignment {
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub course_id: Uuid,
    pub section: String,
    pub academic_year: String,
    pub year_level: String,
    pub semester: String,
    pub days: Vec<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbInstructor> for Instructor {
    type Error = eyre::Report;

    fn try_from(row: DbInstructor) -> Result<Self> {
        Ok(Instructor {
            id: row.id,
            first_name: row.first_name,
            middle_name: row.middle_name,
            last_name: row.last_name,
            role: row.role.parse()?,
            department: row.department,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<DbCourse> for Course {
    type Error = eyre::Report;

    fn try_from(row: DbCourse) -> Result<Self> {
        let units = u32::try_from(row.units)
            .ok()
            .filter(|units| *units > 0)
            .ok_or_else(|| eyre!("Course {} has invalid units: {}", row.code, row.units))?;

        Ok(Course {
            id: row.id,
            code: row.code,
            name: row.name,
            units,
            year_level: row.year_level.parse()?,
            semester: row.semester.parse()?,
        })
    }
}

impl TryFrom<DbAssignment> for Assignment {
    type Error = eyre::Report;

    fn try_from(row: DbAssignment) -> Result<Self> {
        let days = row
            .days
            .iter()
            .map(|day| day.parse())
            .collect::<std::result::Result<DaySet, _>>()?;

        Ok(Assignment {
            id: row.id,
            instructor_id: row.instructor_id,
            course_id: row.course_id,
            section: row.section,
            academic_year: row.academic_year.parse()?,
            year_level: row.year_level.parse()?,
            semester: row.semester.parse()?,
            days,
            time: TimeRange::new(row.start_time, row.end_time)?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Day set as stored in the `days` text array.
pub fn days_column(days: &DaySet) -> Vec<String> {
    days.iter().map(|day| day.as_str().to_string()).collect()
}
