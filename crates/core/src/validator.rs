//! Completeness and duplicate checks for proposed assignments.
//!
//! Nothing in here touches the store. Duplicate detection takes the existing
//! rows as input so the caller can fetch them in one query.

use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::catalog::CatalogSnapshot;
use crate::errors::FieldErrors;
use crate::models::{
    assignment::{
        AcademicYear, Assignment, AssignmentDraft, AssignmentKey, AssignmentSelection, Day,
        DaySet, NewAssignment, TimeRange,
    },
    catalog::{Semester, YearLevel},
};

pub const FIELD_INSTRUCTOR: &str = "instructor";
pub const FIELD_COURSES: &str = "courses";
pub const FIELD_COURSE: &str = "course";
pub const FIELD_SECTION: &str = "section";
pub const FIELD_YEAR_LEVEL: &str = "year_level";
pub const FIELD_SEMESTER: &str = "semester";
pub const FIELD_ACADEMIC_YEAR: &str = "academic_year";
pub const FIELD_DAYS: &str = "days";
pub const FIELD_TIME: &str = "time";

/// A selection whose required fields are all present and well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteSelection {
    pub instructor_id: Uuid,
    pub section: String,
    pub year_level: YearLevel,
    pub semester: Semester,
    pub academic_year: AcademicYear,
    pub days: DaySet,
    pub time: TimeRange,
}

impl CompleteSelection {
    pub fn assignment_for(&self, course_id: Uuid) -> NewAssignment {
        NewAssignment {
            instructor_id: self.instructor_id,
            course_id,
            section: self.section.clone(),
            academic_year: self.academic_year,
            year_level: self.year_level,
            semester: self.semester,
            days: self.days.clone(),
            time: self.time,
            is_active: true,
        }
    }
}

/// Output of duplicate detection. Both sides keep input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicatePartition {
    pub acceptable: Vec<NewAssignment>,
    pub duplicates: Vec<NewAssignment>,
}

impl DuplicatePartition {
    /// Every proposal already existed.
    pub fn all_duplicate(&self) -> bool {
        self.acceptable.is_empty() && !self.duplicates.is_empty()
    }
}

/// Checks the shared selection plus the course list of a batch submission.
///
/// `today` decides the academic year when the selection leaves it blank.
pub fn check_completeness(
    selection: &AssignmentSelection,
    course_ids: &[Uuid],
    today: NaiveDate,
) -> Result<CompleteSelection, FieldErrors> {
    let mut errors = FieldErrors::new();
    if course_ids.is_empty() {
        errors.add(FIELD_COURSES, "Select at least one course");
    }

    let complete = check_selection(selection, today, &mut errors);
    errors.into_result()?;
    // check_selection only returns None after recording an error
    complete.ok_or_else(FieldErrors::new)
}

/// Checks a single-row edit and builds the replacement row.
pub fn check_draft(draft: &AssignmentDraft, today: NaiveDate) -> Result<NewAssignment, FieldErrors> {
    let mut errors = FieldErrors::new();
    if draft.course_id.is_none() {
        errors.add(FIELD_COURSE, "Course is required");
    }

    let complete = check_selection(&draft.selection, today, &mut errors);
    errors.into_result()?;

    match (complete, draft.course_id) {
        (Some(complete), Some(course_id)) => {
            let mut fields = complete.assignment_for(course_id);
            fields.is_active = draft.is_active;
            Ok(fields)
        }
        _ => Err(FieldErrors::new()),
    }
}

fn check_selection(
    selection: &AssignmentSelection,
    today: NaiveDate,
    errors: &mut FieldErrors,
) -> Option<CompleteSelection> {
    let instructor_id = selection.instructor_id;
    if instructor_id.is_none() {
        errors.add(FIELD_INSTRUCTOR, "Instructor is required");
    }

    let section = selection
        .section
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if section.is_none() {
        errors.add(FIELD_SECTION, "Section is required");
    }

    let year_level = parse_choice::<YearLevel>(
        selection.year_level.as_deref(),
        FIELD_YEAR_LEVEL,
        "Year level is required",
        errors,
    );
    let semester = parse_choice::<Semester>(
        selection.semester.as_deref(),
        FIELD_SEMESTER,
        "Semester is required",
        errors,
    );

    let academic_year = match selection.academic_year.as_deref().map(str::trim) {
        None | Some("") => Some(AcademicYear::containing(today)),
        Some(raw) => match raw.parse::<AcademicYear>() {
            Ok(year) => Some(year),
            Err(_) => {
                errors.add(FIELD_ACADEMIC_YEAR, "Academic year must look like YYYY-YYYY");
                None
            }
        },
    };

    let days = parse_days(&selection.days, errors);

    let time = match selection.time.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add(FIELD_TIME, "Time is required");
            None
        }
        Some(raw) => match raw.parse::<TimeRange>() {
            Ok(time) => Some(time),
            Err(_) => {
                errors.add(FIELD_TIME, "Time must be a range like 08:00-09:30 that ends after it starts");
                None
            }
        },
    };

    Some(CompleteSelection {
        instructor_id: instructor_id?,
        section: section?,
        year_level: year_level?,
        semester: semester?,
        academic_year: academic_year?,
        days: days?,
        time: time?,
    })
}

/// Parses an enumerated form value. Blank counts as missing.
fn parse_choice<T: FromStr>(
    raw: Option<&str>,
    field: &str,
    missing: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    match raw.map(str::trim) {
        None | Some("") => {
            errors.add(field, missing);
            None
        }
        Some(raw) => match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                errors.add(field, format!("Unknown value: {raw}"));
                None
            }
        },
    }
}

/// Blank entries are ignored; an unknown day fails the whole field.
fn parse_days(raw: &[String], errors: &mut FieldErrors) -> Option<DaySet> {
    let mut days = DaySet::new();
    for value in raw.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        match value.parse::<Day>() {
            Ok(day) => {
                days.insert(day);
            }
            Err(_) => {
                errors.add(FIELD_DAYS, format!("Unknown day: {value}"));
                return None;
            }
        }
    }

    if days.is_empty() {
        errors.add(FIELD_DAYS, "Select at least one day");
        return None;
    }
    Some(days)
}

/// Resolves the instructor and course ids against the catalog snapshot.
/// Unknown ids are reported as field errors.
pub fn check_references(
    snapshot: &CatalogSnapshot,
    instructor_id: Uuid,
    course_ids: &[Uuid],
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if snapshot.instructor(instructor_id).is_none() {
        errors.add(FIELD_INSTRUCTOR, format!("Unknown instructor: {instructor_id}"));
    }

    let missing: BTreeSet<String> = course_ids
        .iter()
        .filter(|id| snapshot.course(**id).is_none())
        .map(Uuid::to_string)
        .collect();
    if !missing.is_empty() {
        let missing: Vec<String> = missing.into_iter().collect();
        errors.add(FIELD_COURSES, format!("Unknown courses: {}", missing.join(", ")));
    }

    errors.into_result()
}

/// Splits proposals into those that can be inserted and those whose key is
/// already taken by an active assignment or by an earlier proposal.
pub fn validate(proposed: Vec<NewAssignment>, existing: &[Assignment]) -> DuplicatePartition {
    let mut taken: HashSet<AssignmentKey> = existing
        .iter()
        .filter(|assignment| assignment.is_active)
        .map(Assignment::key)
        .collect();

    let mut partition = DuplicatePartition::default();
    for proposal in proposed {
        if taken.insert(proposal.key()) {
            partition.acceptable.push(proposal);
        } else {
            partition.duplicates.push(proposal);
        }
    }
    partition
}
