use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DeskError, FieldErrors};
use crate::models::catalog::{Semester, YearLevel};

/// Month in which a new academic year starts.
const ACADEMIC_YEAR_START_MONTH: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    #[serde(rename = "Mon")]
    Monday,
    #[serde(rename = "Tue")]
    Tuesday,
    #[serde(rename = "Wed")]
    Wednesday,
    #[serde(rename = "Thu")]
    Thursday,
    #[serde(rename = "Fri")]
    Friday,
    #[serde(rename = "Sat")]
    Saturday,
    #[serde(rename = "Sun")]
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Mon",
            Day::Tuesday => "Tue",
            Day::Wednesday => "Wed",
            Day::Thursday => "Thu",
            Day::Friday => "Fri",
            Day::Saturday => "Sat",
            Day::Sunday => "Sun",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Day::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s) || format!("{day:?}").eq_ignore_ascii_case(s))
            .ok_or_else(|| DeskError::Validation(format!("Unknown day: {s}")))
    }
}

pub type DaySet = BTreeSet<Day>;

/// School year spanning two calendar years, written "YYYY-YYYY".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcademicYear {
    start: i32,
}

impl AcademicYear {
    pub fn new(start: i32) -> Self {
        Self { start }
    }

    pub fn start_year(&self) -> i32 {
        self.start
    }

    pub fn end_year(&self) -> i32 {
        self.start + 1
    }

    /// The academic year `date` falls in. A new year begins in June.
    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= ACADEMIC_YEAR_START_MONTH {
            Self::new(date.year())
        } else {
            Self::new(date.year() - 1)
        }
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end_year())
    }
}

impl FromStr for AcademicYear {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DeskError::Validation(format!("Academic year must look like YYYY-YYYY, got {s:?}"));

        let (first, second) = s.trim().split_once('-').ok_or_else(invalid)?;
        if first.len() != 4 || second.len() != 4 {
            return Err(invalid());
        }
        let first: i32 = first.parse().map_err(|_| invalid())?;
        let second: i32 = second.parse().map_err(|_| invalid())?;
        if second != first + 1 {
            return Err(DeskError::Validation(format!(
                "Academic year must span consecutive years, got {s:?}"
            )));
        }
        Ok(Self::new(first))
    }
}

impl TryFrom<String> for AcademicYear {
    type Error = DeskError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AcademicYear> for String {
    fn from(value: AcademicYear) -> Self {
        value.to_string()
    }
}

/// Class meeting time, written "HH:MM-HH:MM". Start is strictly before end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, DeskError> {
        if start >= end {
            return Err(DeskError::Validation(format!(
                "Time range must end after it starts ({} - {})",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

impl FromStr for TimeRange {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DeskError::Validation(format!("Time must look like HH:MM-HH:MM, got {s:?}"));

        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").map_err(|_| invalid())?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").map_err(|_| invalid())?;
        Self::new(start, end)
    }
}

impl TryFrom<String> for TimeRange {
    type Error = DeskError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeRange> for String {
    fn from(value: TimeRange) -> Self {
        value.to_string()
    }
}

/// Composite key that must be unique among active assignments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssignmentKey {
    pub instructor_id: Uuid,
    pub course_id: Uuid,
    pub section: String,
    pub academic_year: AcademicYear,
    pub semester: Semester,
    pub year_level: YearLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub instructor_id: Uuid,
    pub course_id: Uuid,
    pub section: String,
    pub academic_year: AcademicYear,
    pub year_level: YearLevel,
    pub semester: Semester,
    pub days: DaySet,
    pub time: TimeRange,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn key(&self) -> AssignmentKey {
        AssignmentKey {
            instructor_id: self.instructor_id,
            course_id: self.course_id,
            section: self.section.clone(),
            academic_year: self.academic_year,
            semester: self.semester,
            year_level: self.year_level,
        }
    }
}

/// A fully-formed assignment that has not been persisted. Used both for
/// batch inserts and as the replacement row on the edit path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignment {
    pub instructor_id: Uuid,
    pub course_id: Uuid,
    pub section: String,
    pub academic_year: AcademicYear,
    pub year_level: YearLevel,
    pub semester: Semester,
    pub days: DaySet,
    pub time: TimeRange,
    pub is_active: bool,
}

impl NewAssignment {
    pub fn key(&self) -> AssignmentKey {
        AssignmentKey {
            instructor_id: self.instructor_id,
            course_id: self.course_id,
            section: self.section.clone(),
            academic_year: self.academic_year,
            semester: self.semester,
            year_level: self.year_level,
        }
    }
}

/// Raw selection criteria as collected by the dashboard form. Every field
/// may be missing or blank; the validator parses the text values and reports
/// failures per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentSelection {
    pub instructor_id: Option<Uuid>,
    pub section: Option<String>,
    pub year_level: Option<String>,
    pub semester: Option<String>,
    pub academic_year: Option<String>,
    pub days: Vec<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitAssignmentsRequest {
    #[serde(flatten)]
    pub selection: AssignmentSelection,
    #[serde(default)]
    pub course_ids: Vec<Uuid>,
}

/// Single-row edit. Same fields as a selection, bound to one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    #[serde(flatten)]
    pub selection: AssignmentSelection,
    #[serde(default)]
    pub course_id: Option<Uuid>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Row filter for select and count queries. `None` fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentFilter {
    pub instructor_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub section: Option<String>,
    pub academic_year: Option<AcademicYear>,
    pub semester: Option<Semester>,
    pub year_level: Option<YearLevel>,
    #[serde(alias = "active")]
    pub is_active: Option<bool>,
}

impl AssignmentFilter {
    /// Active assignments of one instructor: the scope of a duplicate check.
    pub fn active_for_instructor(instructor_id: Uuid) -> Self {
        Self {
            instructor_id: Some(instructor_id),
            is_active: Some(true),
            ..Self::default()
        }
    }

    pub fn matches(&self, assignment: &Assignment) -> bool {
        self.instructor_id.is_none_or(|id| id == assignment.instructor_id)
            && self.course_id.is_none_or(|id| id == assignment.course_id)
            && self
                .section
                .as_deref()
                .is_none_or(|section| section == assignment.section)
            && self
                .academic_year
                .is_none_or(|year| year == assignment.academic_year)
            && self.semester.is_none_or(|semester| semester == assignment.semester)
            && self
                .year_level
                .is_none_or(|level| level == assignment.year_level)
            && self.is_active.is_none_or(|active| active == assignment.is_active)
    }
}

/// Where a submission ended up. See [`crate::flow::SubmissionFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Validating,
    Rejected,
    DuplicateCheck,
    AllDuplicate,
    Persisting,
    PersistError,
    Success,
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Rejected
                | SubmissionState::AllDuplicate
                | SubmissionState::PersistError
                | SubmissionState::Success
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub success: bool,
    pub message: String,
    pub created: usize,
    pub skipped: usize,
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub field_errors: FieldErrors,
    pub state: SubmissionState,
}

/// Result of the single-row edit and delete paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub field_errors: FieldErrors,
    #[serde(default)]
    pub not_found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Assignment>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>, assignment: Option<Assignment>) -> Self {
        Self {
            success: true,
            message: message.into(),
            field_errors: FieldErrors::new(),
            not_found: false,
            assignment,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            field_errors: FieldErrors::new(),
            not_found: false,
            assignment: None,
        }
    }

    pub fn rejected(field_errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: field_errors.summary(),
            field_errors,
            not_found: false,
            assignment: None,
        }
    }

    pub fn not_found(id: Uuid) -> Self {
        Self {
            success: false,
            message: format!("Assignment {id} not found."),
            field_errors: FieldErrors::new(),
            not_found: true,
            assignment: None,
        }
    }
}

/// Caller's answer to the delete confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}
