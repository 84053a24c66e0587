use super::domain::{AppraisalSubmission, CommitteeDecision, SubmissionId};

/// Append-only log of submitted appraisals.
pub trait SubmissionStore: Send + Sync {
    fn append(&self, submission: AppraisalSubmission) -> Result<AppraisalSubmission, StoreError>;
    /// All submissions in the order they were appended.
    fn list(&self) -> Result<Vec<AppraisalSubmission>, StoreError>;
}

/// Committee decisions, recorded separately from the submissions they rate.
pub trait DecisionStore: Send + Sync {
    fn record(&self, decision: CommitteeDecision) -> Result<(), StoreError>;
    /// Most recently recorded decision for a submission, if any.
    fn latest(&self, id: &SubmissionId) -> Result<Option<CommitteeDecision>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("submission not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
