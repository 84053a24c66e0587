use appraisal::intake::{
    AppraisalSubmission, CommitteeDecision, DecisionStore, StoreError, SubmissionId,
    SubmissionStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}

/// Process-local submission log. Contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionStore {
    submissions: Arc<Mutex<Vec<AppraisalSubmission>>>,
}

impl SubmissionStore for InMemorySubmissionStore {
    fn append(&self, submission: AppraisalSubmission) -> Result<AppraisalSubmission, StoreError> {
        let mut guard = self.submissions.lock().map_err(poisoned)?;
        guard.push(submission.clone());
        Ok(submission)
    }

    fn list(&self) -> Result<Vec<AppraisalSubmission>, StoreError> {
        let guard = self.submissions.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }
}

/// Process-local committee decisions, every decision kept per submission.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDecisionStore {
    decisions: Arc<Mutex<HashMap<SubmissionId, Vec<CommitteeDecision>>>>,
}

impl DecisionStore for InMemoryDecisionStore {
    fn record(&self, decision: CommitteeDecision) -> Result<(), StoreError> {
        let mut guard = self.decisions.lock().map_err(poisoned)?;
        guard
            .entry(decision.submission_id.clone())
            .or_default()
            .push(decision);
        Ok(())
    }

    fn latest(&self, id: &SubmissionId) -> Result<Option<CommitteeDecision>, StoreError> {
        let guard = self.decisions.lock().map_err(poisoned)?;
        Ok(guard.get(id).and_then(|history| history.last().cloned()))
    }
}
