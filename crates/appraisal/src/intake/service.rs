use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use super::domain::{
    AppraisalForm, AppraisalSubmission, CommitteeDecision, FacultyId, PublicationHit,
    SubmissionId, SubmissionReview, SubmissionSummary,
};
use super::repository::{DecisionStore, StoreError, SubmissionStore};
use crate::publications::{PublicationCatalog, PublicationDataset};
use crate::scoring::{compute_score, PublicationCounts, Rating, ScoreBreakdown};

const SUMMARY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Service composing the publication catalog, the scorer, and the two stores.
pub struct AppraisalService<S, D> {
    submissions: Arc<S>,
    decisions: Arc<D>,
    catalog: Arc<PublicationCatalog>,
}

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("apr-{id:06}"))
}

impl<S, D> AppraisalService<S, D>
where
    S: SubmissionStore + 'static,
    D: DecisionStore + 'static,
{
    pub fn new(submissions: Arc<S>, decisions: Arc<D>, catalog: Arc<PublicationCatalog>) -> Self {
        Self {
            submissions,
            decisions,
            catalog,
        }
    }

    pub fn catalog(&self) -> &Arc<PublicationCatalog> {
        &self.catalog
    }

    /// Install a freshly uploaded publication list, returning its row count.
    pub fn replace_dataset(&self, dataset: PublicationDataset) -> usize {
        self.catalog.replace(dataset).len()
    }

    /// Substring search over the active publication list.
    pub fn search(
        &self,
        query: Option<&str>,
    ) -> Result<Vec<PublicationHit>, AppraisalServiceError> {
        let dataset = self
            .catalog
            .current()
            .ok_or(AppraisalServiceError::DatasetUnavailable)?;
        Ok(dataset
            .search(query)
            .into_iter()
            .map(PublicationHit::from)
            .collect())
    }

    /// Score a form against the active publication list without storing anything.
    pub fn preview(&self, form: &AppraisalForm) -> ScoreBreakdown {
        let counts = self.publication_counts(form);
        compute_score(&form.teaching_scores(), counts, form.project_count())
    }

    fn publication_counts(&self, form: &AppraisalForm) -> PublicationCounts {
        let selection = &form.selected_publications;
        if selection.is_empty() {
            return PublicationCounts::default();
        }

        match self.catalog.current() {
            Some(dataset) => {
                let unknown = selection.unknown_rows(&dataset);
                if !unknown.is_empty() {
                    warn!(?unknown, "selected publication rows missing from dataset");
                }
                selection.counts(&dataset)
            }
            None => {
                warn!(
                    selected = selection.len(),
                    "publications selected before any dataset was uploaded"
                );
                PublicationCounts::default()
            }
        }
    }

    /// Score and append a faculty submission.
    pub fn submit(
        &self,
        faculty_id: FacultyId,
        form: AppraisalForm,
        submitted_at: NaiveDateTime,
    ) -> Result<AppraisalSubmission, AppraisalServiceError> {
        let breakdown = self.preview(&form);
        let submission = AppraisalSubmission {
            id: next_submission_id(),
            faculty_id,
            submitted_at,
            breakdown,
            target_sci: form.target_sci,
            target_srs: form.target_srs,
            feedback: form.feedback,
            thesis_count: form.theses.len(),
            patent_count: form.patents.len(),
            declaration_confirmed: form.declaration_confirmed,
        };

        let stored = self.submissions.append(submission)?;
        info!(
            submission = %stored.id,
            faculty = %stored.faculty_id.0,
            total = stored.breakdown.total_score,
            rating = %stored.breakdown.rating,
            "appraisal submitted"
        );
        Ok(stored)
    }

    /// Overview rows for the admin dashboard, in submission order.
    pub fn summaries(&self) -> Result<Vec<SubmissionSummary>, AppraisalServiceError> {
        let submissions = self.submissions.list()?;
        let mut rows = Vec::with_capacity(submissions.len());

        for submission in submissions {
            let decision = self.decisions.latest(&submission.id)?;
            rows.push(SubmissionSummary {
                faculty_name: submission.faculty_id.0.clone(),
                submitted_at: submission
                    .submitted_at
                    .format(SUMMARY_TIMESTAMP_FORMAT)
                    .to_string(),
                total_score: submission.breakdown.total_score,
                rating: submission.breakdown.rating,
                committee_rating: decision.as_ref().map(|decision| decision.rating),
                finalized: decision.map(|decision| decision.finalized).unwrap_or(false),
                id: submission.id,
            });
        }

        Ok(rows)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<AppraisalSubmission, AppraisalServiceError> {
        let submission = self
            .submissions
            .list()?
            .into_iter()
            .find(|submission| &submission.id == id)
            .ok_or(StoreError::NotFound)?;
        Ok(submission)
    }

    pub fn review(&self, id: &SubmissionId) -> Result<SubmissionReview, AppraisalServiceError> {
        let submission = self.fetch(id)?;
        let decision = self.decisions.latest(id)?;
        Ok(SubmissionReview::new(submission, decision))
    }

    /// Record the committee's rating for a submission. Earlier decisions stay
    /// in the store; the latest one is what reviews show.
    pub fn decide(
        &self,
        id: &SubmissionId,
        rating: Rating,
        decided_by: &str,
        finalize: bool,
        decided_at: NaiveDateTime,
    ) -> Result<CommitteeDecision, AppraisalServiceError> {
        let submission = self.fetch(id)?;
        if let Some(existing) = self.decisions.latest(id)? {
            if existing.finalized {
                return Err(AppraisalServiceError::AlreadyFinalized(id.clone()));
            }
        }

        let decision = CommitteeDecision {
            submission_id: submission.id.clone(),
            rating,
            decided_by: decided_by.to_string(),
            decided_at,
            finalized: finalize,
        };
        self.decisions.record(decision.clone())?;

        info!(
            submission = %submission.id,
            computed = %submission.breakdown.rating,
            committee = %rating,
            finalized = finalize,
            "committee decision recorded"
        );
        Ok(decision)
    }
}

/// Error raised by the appraisal service.
#[derive(Debug, thiserror::Error)]
pub enum AppraisalServiceError {
    #[error("the publication list has not been uploaded yet")]
    DatasetUnavailable,
    #[error("submission {0} has already been finalized")]
    AlreadyFinalized(SubmissionId),
    #[error(transparent)]
    Store(#[from] StoreError),
}
