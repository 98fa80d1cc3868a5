//! Drives assignment submissions, edits and deletions against the store.
//!
//! The coordinator is the boundary where store failures become structured
//! results: none of the workflow methods return `Err`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::CatalogStore;
use crate::errors::{DeskResult, FieldErrors};
use crate::flow::SubmissionFlow;
use crate::models::assignment::{
    ActionResult, Assignment, AssignmentDraft, AssignmentFilter, AssignmentSelection, Confirmation,
    NewAssignment, SubmissionState, SubmitResult,
};
use crate::store::AssignmentStore;
use crate::validator::{self, CompleteSelection};

pub const ALL_DUPLICATE_MESSAGE: &str = "All assignments already exist for this combination.";

pub struct AssignmentCoordinator {
    catalog: Arc<CatalogStore>,
    store: Arc<dyn AssignmentStore>,
}

impl AssignmentCoordinator {
    pub fn new(catalog: Arc<CatalogStore>, store: Arc<dyn AssignmentStore>) -> Self {
        Self { catalog, store }
    }

    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    /// Proposes one assignment per course for the shared selection and
    /// persists the ones that do not exist yet.
    pub async fn submit(&self, selection: &AssignmentSelection, course_ids: &[Uuid]) -> SubmitResult {
        let mut submission = Submission::new();
        let result = self.run_submission(&mut submission, selection, course_ids).await;

        match result {
            Ok(result) => result,
            // Only an illegal transition lands here; report it rather than panic.
            Err(err) => submission.persist_error(err.to_string(), 0),
        }
    }

    async fn run_submission(
        &self,
        submission: &mut Submission,
        selection: &AssignmentSelection,
        course_ids: &[Uuid],
    ) -> DeskResult<SubmitResult> {
        submission.flow.advance(SubmissionState::Validating)?;

        let complete = match validator::check_completeness(selection, course_ids, today()) {
            Ok(complete) => complete,
            Err(field_errors) => return submission.rejected(field_errors),
        };

        let mut snapshot = match self.catalog.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => return Ok(submission.persist_error(err.to_string(), 0)),
        };
        if validator::check_references(&snapshot, complete.instructor_id, course_ids).is_err() {
            // Catalog rows added since the last load; reload once before rejecting.
            debug!("Unknown ids in submission, refreshing catalog");
            snapshot = match self.catalog.refresh().await {
                Ok(snapshot) => snapshot,
                Err(err) => return Ok(submission.persist_error(err.to_string(), 0)),
            };
        }
        if let Err(field_errors) =
            validator::check_references(&snapshot, complete.instructor_id, course_ids)
        {
            return submission.rejected(field_errors);
        }

        let proposed = expand(&complete, course_ids);
        submission.flow.advance(SubmissionState::DuplicateCheck)?;

        // One existence query for the whole batch.
        let scope = AssignmentFilter::active_for_instructor(complete.instructor_id);
        let existing = match self.store.list_assignments(scope).await {
            Ok(existing) => existing,
            Err(err) => return Ok(submission.persist_error(err.to_string(), 0)),
        };
        debug!(
            "Checking {} proposed assignments against {} existing",
            proposed.len(),
            existing.len()
        );

        let partition = validator::validate(proposed, &existing);
        let skipped = partition.duplicates.len();
        if partition.all_duplicate() {
            submission.flow.advance(SubmissionState::AllDuplicate)?;
            info!("Submission skipped: all {skipped} assignments already exist");
            return Ok(submission.finish(false, ALL_DUPLICATE_MESSAGE.to_string(), 0, skipped));
        }

        submission.flow.advance(SubmissionState::Persisting)?;
        let created = match self.store.insert_assignments(partition.acceptable).await {
            Ok(rows) => rows.len(),
            Err(err) => {
                warn!("Assignment batch insert failed: {err}");
                submission.flow.advance(SubmissionState::PersistError)?;
                return Ok(submission.finish(false, err.to_string(), 0, skipped));
            }
        };

        submission.flow.advance(SubmissionState::Success)?;
        info!("Submission stored: {created} created, {skipped} skipped");
        Ok(submission.finish(true, created_message(created, skipped), created, skipped))
    }

    /// Replaces one assignment. Duplicate detection is intentionally not run.
    pub async fn edit(&self, id: Uuid, draft: &AssignmentDraft) -> ActionResult {
        let fields = match validator::check_draft(draft, today()) {
            Ok(fields) => fields,
            Err(field_errors) => return ActionResult::rejected(field_errors),
        };

        match self.store.update_assignment(id, fields).await {
            Ok(Some(assignment)) => {
                info!("Assignment {id} updated");
                ActionResult::ok("Assignment updated.", Some(assignment))
            }
            Ok(None) => ActionResult::not_found(id),
            Err(err) => {
                warn!("Assignment {id} update failed: {err}");
                ActionResult::failed(err.to_string())
            }
        }
    }

    /// Hard-deletes one assignment once the caller has confirmed. A missing
    /// row is reported as not found.
    pub async fn delete(&self, id: Uuid, confirmation: Confirmation) -> ActionResult {
        if confirmation == Confirmation::Declined {
            debug!("Deletion of assignment {id} declined");
            return ActionResult::failed("Deletion cancelled.");
        }

        match self.store.delete_assignment(id).await {
            Ok(0) => ActionResult::not_found(id),
            Ok(_) => {
                info!("Assignment {id} deleted");
                ActionResult::ok("Assignment deleted.", None)
            }
            Err(err) => {
                warn!("Assignment {id} delete failed: {err}");
                ActionResult::failed(err.to_string())
            }
        }
    }

    pub async fn list(&self, filter: AssignmentFilter) -> DeskResult<Vec<Assignment>> {
        Ok(self.store.list_assignments(filter).await?)
    }

    pub async fn count(&self, filter: AssignmentFilter) -> DeskResult<u64> {
        Ok(self.store.count_assignments(filter).await?)
    }
}

/// One proposed assignment per distinct course id, in first-seen order.
pub fn expand(selection: &CompleteSelection, course_ids: &[Uuid]) -> Vec<NewAssignment> {
    let mut seen = HashSet::new();
    course_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .map(|id| selection.assignment_for(*id))
        .collect()
}

/// "3 new assignments created. 1 assignment already existed."
pub fn created_message(created: usize, skipped: usize) -> String {
    let mut message = format!(
        "{created} new {} created.",
        if created == 1 { "assignment" } else { "assignments" }
    );
    if skipped > 0 {
        message.push_str(&format!(
            " {skipped} {} already existed.",
            if skipped == 1 { "assignment" } else { "assignments" }
        ));
    }
    message
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

struct Submission {
    flow: SubmissionFlow,
}

impl Submission {
    fn new() -> Self {
        Self {
            flow: SubmissionFlow::new(),
        }
    }

    fn finish(&self, success: bool, message: String, created: usize, skipped: usize) -> SubmitResult {
        SubmitResult {
            success,
            message,
            created,
            skipped,
            field_errors: FieldErrors::new(),
            state: self.flow.state(),
        }
    }

    fn rejected(&mut self, field_errors: FieldErrors) -> DeskResult<SubmitResult> {
        self.flow.advance(SubmissionState::Rejected)?;
        info!("Submission rejected: {}", field_errors.summary());
        Ok(SubmitResult {
            success: false,
            message: field_errors.summary(),
            created: 0,
            skipped: 0,
            field_errors,
            state: self.flow.state(),
        })
    }

    /// Moves to `PersistError` when the flow allows it and reports `message`.
    fn persist_error(&mut self, message: String, skipped: usize) -> SubmitResult {
        if self.flow.advance(SubmissionState::PersistError).is_err() {
            warn!("Submission failed in state {:?}: {message}", self.flow.state());
        }
        self.finish(false, message, 0, skipped)
    }
}
