//! Read-side snapshot of instructors and courses.
//!
//! `load_*` always goes to the source. The snapshot is what the coordinator
//! resolves ids against; it only changes when [`CatalogStore::refresh`] runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use eyre::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{DeskError, DeskResult};
use crate::models::catalog::{Course, Instructor, InstructorRole, Semester, YearLevel};
use crate::store::CatalogSource;

#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    instructors: HashMap<Uuid, Instructor>,
    courses: HashMap<Uuid, Course>,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(instructors: Vec<Instructor>, courses: Vec<Course>) -> Self {
        Self {
            instructors: instructors.into_iter().map(|i| (i.id, i)).collect(),
            courses: courses.into_iter().map(|c| (c.id, c)).collect(),
            loaded_at: Utc::now(),
        }
    }

    pub fn instructor(&self, id: Uuid) -> Option<&Instructor> {
        self.instructors.get(&id)
    }

    pub fn course(&self, id: Uuid) -> Option<&Course> {
        self.courses.get(&id)
    }

    pub fn instructor_count(&self) -> usize {
        self.instructors.len()
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

pub struct CatalogStore {
    source: Arc<dyn CatalogSource>,
    snapshot: RwLock<Option<Arc<CatalogSnapshot>>>,
}

impl CatalogStore {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            snapshot: RwLock::new(None),
        }
    }

    pub async fn load_instructors(&self) -> Result<Vec<Instructor>> {
        debug!("Loading instructors from catalog source");
        self.source.fetch_instructors().await
    }

    pub async fn load_courses(&self) -> Result<Vec<Course>> {
        debug!("Loading courses from catalog source");
        self.source.fetch_courses().await
    }

    /// Reloads both collections and swaps the snapshot in one step. On error
    /// the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>> {
        let instructors = self.load_instructors().await?;
        let courses = self.load_courses().await?;
        let snapshot = Arc::new(CatalogSnapshot::new(instructors, courses));

        info!(
            "Catalog refreshed: {} instructors, {} courses",
            snapshot.instructor_count(),
            snapshot.course_count()
        );

        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Instructor by id from the snapshot, reloading once on a miss.
    pub async fn instructor(&self, id: Uuid) -> DeskResult<Instructor> {
        let snapshot = self.snapshot().await?;
        if let Some(instructor) = snapshot.instructor(id) {
            return Ok(instructor.clone());
        }

        self.refresh()
            .await?
            .instructor(id)
            .cloned()
            .ok_or_else(|| DeskError::NotFound(format!("Instructor {id}")))
    }

    /// Course by id from the snapshot, reloading once on a miss.
    pub async fn course(&self, id: Uuid) -> DeskResult<Course> {
        let snapshot = self.snapshot().await?;
        if let Some(course) = snapshot.course(id) {
            return Ok(course.clone());
        }

        self.refresh()
            .await?
            .course(id)
            .cloned()
            .ok_or_else(|| DeskError::NotFound(format!("Course {id}")))
    }

    /// Current snapshot, loading it first if it has never been loaded.
    pub async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return Ok(snapshot.clone());
        }
        self.refresh().await
    }
}

/// Client-side instructor filter. `None` fields do not constrain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstructorFilter {
    pub role: Option<InstructorRole>,
    pub department: Option<String>,
    pub active: Option<bool>,
}

impl InstructorFilter {
    pub fn matches(&self, instructor: &Instructor) -> bool {
        self.role.is_none_or(|role| role == instructor.role)
            && self
                .department
                .as_deref()
                .is_none_or(|dept| dept.trim().eq_ignore_ascii_case(instructor.department.trim()))
            && self.active.is_none_or(|active| active == instructor.is_active)
    }

    /// Keeps matching instructors, sorted by last then first name.
    pub fn apply(&self, instructors: Vec<Instructor>) -> Vec<Instructor> {
        let mut kept: Vec<Instructor> = instructors.into_iter().filter(|i| self.matches(i)).collect();
        kept.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        kept
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CourseFilter {
    pub year_level: Option<YearLevel>,
    pub semester: Option<Semester>,
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        self.year_level.is_none_or(|level| level == course.year_level)
            && self.semester.is_none_or(|semester| semester == course.semester)
    }

    /// Keeps matching courses, sorted by code.
    pub fn apply(&self, courses: Vec<Course>) -> Vec<Course> {
        let mut kept: Vec<Course> = courses.into_iter().filter(|c| self.matches(c)).collect();
        kept.sort_by(|a, b| a.code.cmp(&b.code));
        kept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearLevelGroup {
    pub year_level: YearLevel,
    pub courses: Vec<Course>,
}

/// Groups courses by year level, first year first. Empty levels are omitted
/// and each group is ordered by course code.
pub fn group_by_year_level(courses: impl IntoIterator<Item = Course>) -> Vec<YearLevelGroup> {
    let mut groups: BTreeMap<YearLevel, Vec<Course>> = BTreeMap::new();
    for course in courses {
        groups.entry(course.year_level).or_default().push(course);
    }

    groups
        .into_iter()
        .map(|(year_level, mut courses)| {
            courses.sort_by(|a, b| a.code.cmp(&b.code));
            YearLevelGroup { year_level, courses }
        })
        .collect()
}
