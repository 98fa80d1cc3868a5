use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DeskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructorRole {
    Teacher,
    Instructor,
}

impl InstructorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstructorRole::Teacher => "teacher",
            InstructorRole::Instructor => "instructor",
        }
    }
}

impl fmt::Display for InstructorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstructorRole {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teacher" => Ok(InstructorRole::Teacher),
            "instructor" => Ok(InstructorRole::Instructor),
            other => Err(DeskError::Validation(format!("Unknown instructor role: {other}"))),
        }
    }
}

/// Cohort a course or assignment belongs to. Ordered first to fourth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum YearLevel {
    #[serde(rename = "1st Year")]
    First,
    #[serde(rename = "2nd Year")]
    Second,
    #[serde(rename = "3rd Year")]
    Third,
    #[serde(rename = "4th Year")]
    Fourth,
}

impl YearLevel {
    pub const ALL: [YearLevel; 4] = [
        YearLevel::First,
        YearLevel::Second,
        YearLevel::Third,
        YearLevel::Fourth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            YearLevel::First => "1st Year",
            YearLevel::Second => "2nd Year",
            YearLevel::Third => "3rd Year",
            YearLevel::Fourth => "4th Year",
        }
    }
}

impl fmt::Display for YearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YearLevel {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        YearLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DeskError::Validation(format!("Unknown year level: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Semester {
    First,
    Second,
    Summer,
}

impl Semester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::First => "First",
            Semester::Second => "Second",
            Semester::Summer => "Summer",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Semester {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Semester::First),
            "second" => Ok(Semester::Second),
            "summer" => Ok(Semester::Summer),
            other => Err(DeskError::Validation(format!("Unknown semester: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: Uuid,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub role: InstructorRole,
    pub department: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Instructor {
    /// "First M. Last", or "First Last" without a middle name.
    pub fn display_name(&self) -> String {
        match self
            .middle_name
            .as_deref()
            .and_then(|middle| middle.trim().chars().next())
        {
            Some(initial) => format!("{} {}. {}", self.first_name, initial, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub units: u32,
    pub year_level: YearLevel,
    pub semester: Semester,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorResponse {
    #[serde(flatten)]
    pub instructor: Instructor,
    pub display_name: String,
}

impl From<Instructor> for InstructorResponse {
    fn from(instructor: Instructor) -> Self {
        let display_name = instructor.display_name();
        Self {
            instructor,
            display_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRefreshResponse {
    pub instructors: usize,
    pub courses: usize,
    pub loaded_at: DateTime<Utc>,
}
