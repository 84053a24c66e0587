use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::config::AuthConfig;
use crate::intake::domain::{
    AppraisalForm, AppraisalSubmission, CommitteeDecision, ProjectRow, SubmissionId, TeachingRow,
};
use crate::intake::repository::{DecisionStore, StoreError, SubmissionStore};
use crate::intake::session::SessionRegistry;
use crate::intake::{appraisal_router, AppraisalService};
use crate::publications::{PublicationCatalog, PublicationDataset, SelectionSet};
use crate::scoring::TeachingCell;

pub(super) const PUBLICATIONS_CSV: &str = "Article Title,Abstract,Author Keywords,Authors,Index,Publication Year\n\
Graph Neural Networks for Traffic,Forecasting congestion on city roads,GNN; traffic,faculty1; Rahman A.,SCI,2023\n\
Perovskite Solar Cells,Stability under humidity,photovoltaics,faculty1; Karim M.,ESCI,2023\n\
Campus Energy Audit,Measuring building loads,energy,faculty2,SCOPUS,2022\n\
Neural Crop Yield Models,Deep learning for agriculture,agritech,faculty1,SCI,2024\n\
Local Workshop Notes,,,faculty1,UGC,2024\n";

pub(super) fn dataset() -> PublicationDataset {
    PublicationDataset::from_reader(Cursor::new(PUBLICATIONS_CSV)).expect("fixture parses")
}

pub(super) fn submitted_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 30)
        .expect("valid date")
        .and_hms_opt(14, 5, 0)
        .expect("valid time")
}

/// 10 teaching + 2 SCI + 1 ESCI + 1 Scopus + 1 project = 75 (Good)
pub(super) fn form() -> AppraisalForm {
    AppraisalForm {
        teaching: vec![
            TeachingRow {
                subject: "Data Structures".to_string(),
                sections: "A, B / 80 students".to_string(),
                score: TeachingCell::Number(10.0),
            },
            TeachingRow {
                subject: "Algorithms Lab".to_string(),
                sections: "C".to_string(),
                score: TeachingCell::Text("bad".to_string()),
            },
            TeachingRow::default(),
        ],
        selected_publications: SelectionSet::from_rows([0, 1, 2, 3, 4]),
        projects: vec![ProjectRow {
            title: "Smart Grid Testbed".to_string(),
            cost_lakhs: "12.5".to_string(),
            agency: "UGC".to_string(),
            status: "Ongoing".to_string(),
        }],
        feedback: "More lab assistants please".to_string(),
        declaration_confirmed: true,
        ..AppraisalForm::default()
    }
}

pub(super) fn auth() -> AuthConfig {
    AuthConfig::default()
}

pub(super) type TestService = AppraisalService<MemorySubmissions, MemoryDecisions>;

pub(super) fn build_service(
    with_dataset: bool,
) -> (TestService, Arc<MemorySubmissions>, Arc<MemoryDecisions>) {
    let submissions = Arc::new(MemorySubmissions::default());
    let decisions = Arc::new(MemoryDecisions::default());
    let catalog = if with_dataset {
        PublicationCatalog::with_dataset(dataset())
    } else {
        PublicationCatalog::default()
    };
    let service = AppraisalService::new(submissions.clone(), decisions.clone(), Arc::new(catalog));
    (service, submissions, decisions)
}

pub(super) fn router_with_service(service: TestService) -> (axum::Router, Arc<SessionRegistry>) {
    let sessions = Arc::new(SessionRegistry::new(auth()));
    (appraisal_router(Arc::new(service), sessions.clone()), sessions)
}

#[derive(Default, Clone)]
pub(super) struct MemorySubmissions {
    pub(super) records: Arc<Mutex<Vec<AppraisalSubmission>>>,
}

impl SubmissionStore for MemorySubmissions {
    fn append(&self, submission: AppraisalSubmission) -> Result<AppraisalSubmission, StoreError> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(submission.clone());
        Ok(submission)
    }

    fn list(&self) -> Result<Vec<AppraisalSubmission>, StoreError> {
        Ok(self.records.lock().expect("store mutex poisoned").clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDecisions {
    pub(super) history: Arc<Mutex<HashMap<SubmissionId, Vec<CommitteeDecision>>>>,
}

impl MemoryDecisions {
    pub(super) fn history_for(&self, id: &SubmissionId) -> Vec<CommitteeDecision> {
        self.history
            .lock()
            .expect("decision mutex poisoned")
            .get(id)
            .cloned()
            .unwrap_or_default()
    }
}

impl DecisionStore for MemoryDecisions {
    fn record(&self, decision: CommitteeDecision) -> Result<(), StoreError> {
        self.history
            .lock()
            .expect("decision mutex poisoned")
            .entry(decision.submission_id.clone())
            .or_default()
            .push(decision);
        Ok(())
    }

    fn latest(&self, id: &SubmissionId) -> Result<Option<CommitteeDecision>, StoreError> {
        Ok(self
            .history
            .lock()
            .expect("decision mutex poisoned")
            .get(id)
            .and_then(|history| history.last().cloned()))
    }
}

pub(super) struct UnavailableStore;

impl SubmissionStore for UnavailableStore {
    fn append(&self, _submission: AppraisalSubmission) -> Result<AppraisalSubmission, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<AppraisalSubmission>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
