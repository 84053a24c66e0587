//! Appraisal intake and committee review.
//!
//! Faculty sign in, search the institute publication list, and submit the
//! appraisal form; the service scores it and appends it to the submission
//! store. Admins upload the publication list, review submissions, and record
//! committee ratings alongside (never instead of) the computed rating.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use domain::{
    AppraisalForm, AppraisalSubmission, CommitteeDecision, FacultyId, PatentRow, ProjectRow,
    PublicationHit, SubmissionId, SubmissionReview, SubmissionSummary, TargetSciPublications,
    TargetSrsScore, TeachingRow, ThesisRow,
};
pub use repository::{DecisionStore, StoreError, SubmissionStore};
pub use router::{appraisal_router, AppraisalApi};
pub use service::{AppraisalService, AppraisalServiceError};
pub use session::{
    authenticate, Role, Session, SessionError, SessionRegistry, SessionState, SessionToken,
};
