use super::common::*;
use crate::intake::domain::{FacultyId, SubmissionId, TargetSciPublications};
use crate::intake::repository::StoreError;
use crate::intake::{AppraisalService, AppraisalServiceError};
use crate::publications::{PublicationCatalog, PublicationDataset, SelectionSet};
use crate::scoring::{IndexClass, Rating};
use std::sync::Arc;

#[test]
fn search_requires_an_uploaded_dataset() {
    let (service, _, _) = build_service(false);
    match service.search(Some("neural")) {
        Err(AppraisalServiceError::DatasetUnavailable) => {}
        other => panic!("expected dataset unavailable, got {other:?}"),
    }
}

#[test]
fn search_returns_hits_in_dataset_order_with_classification() {
    let (service, _, _) = build_service(true);
    let hits = service.search(Some("NEURAL")).expect("search succeeds");

    let rows: Vec<usize> = hits.iter().map(|hit| hit.row).collect();
    assert_eq!(rows, vec![0, 3]);
    assert_eq!(hits[0].index_class, IndexClass::Sci);
    assert_eq!(hits[0].author_count, 2);

    let everything = service.search(None).expect("search succeeds");
    assert_eq!(everything.len(), 5);
    assert_eq!(everything[1].index_class, IndexClass::NonSci);
}

#[test]
fn submit_scores_selection_and_appends() {
    let (service, submissions, _) = build_service(true);
    let submission = service
        .submit(FacultyId("faculty1".to_string()), form(), submitted_at())
        .expect("submit succeeds");

    let breakdown = &submission.breakdown;
    assert_eq!(breakdown.teaching_score, 10.0);
    assert_eq!(breakdown.sci_count, 2);
    assert_eq!(breakdown.non_sci_count, 1);
    assert_eq!(breakdown.scopus_count, 1);
    assert_eq!(breakdown.project_count, 1);
    assert_eq!(breakdown.total_score, 75.0);
    assert_eq!(breakdown.rating, Rating::Good);
    assert_eq!(submission.target_sci, TargetSciPublications::Zero);
    assert!(submission.declaration_confirmed);
    assert!(submission.id.0.starts_with("apr-"));

    let stored = submissions.records.lock().expect("lock").clone();
    assert_eq!(stored, vec![submission]);
}

#[test]
fn submit_without_dataset_still_scores_teaching_and_projects() {
    let (service, _, _) = build_service(false);
    let submission = service
        .submit(FacultyId("faculty2".to_string()), form(), submitted_at())
        .expect("submit succeeds");

    assert_eq!(submission.breakdown.sci_count, 0);
    assert_eq!(submission.breakdown.total_score, 30.0);
    assert_eq!(submission.breakdown.rating, Rating::Developing);
}

#[test]
fn submit_skips_rows_missing_from_replaced_dataset() {
    let (service, _, _) = build_service(true);
    service.replace_dataset(
        PublicationDataset::from_reader(std::io::Cursor::new("Article Title,Index\nOnly One,SCI\n"))
            .expect("parse"),
    );

    let mut selection_form = form();
    selection_form.selected_publications = SelectionSet::from_rows([0, 3]);
    let breakdown = service.preview(&selection_form);
    assert_eq!(breakdown.sci_count, 1);
    assert_eq!(breakdown.total_score, 10.0 + 15.0 + 20.0);
}

#[test]
fn submit_propagates_store_failures() {
    let service = AppraisalService::new(
        Arc::new(UnavailableStore),
        Arc::new(MemoryDecisions::default()),
        Arc::new(PublicationCatalog::with_dataset(dataset())),
    );

    match service.submit(FacultyId("faculty1".to_string()), form(), submitted_at()) {
        Err(AppraisalServiceError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected store failure, got {other:?}"),
    }
}

#[test]
fn summaries_list_submissions_in_order_with_formatted_dates() {
    let (service, _, _) = build_service(true);
    let first = service
        .submit(FacultyId("faculty1".to_string()), form(), submitted_at())
        .expect("first");
    let second = service
        .submit(
            FacultyId("faculty2".to_string()),
            Default::default(),
            submitted_at(),
        )
        .expect("second");

    let rows = service.summaries().expect("summaries");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, first.id);
    assert_eq!(rows[0].faculty_name, "faculty1");
    assert_eq!(rows[0].submitted_at, "2025-06-30 14:05");
    assert_eq!(rows[0].rating, Rating::Good);
    assert_eq!(rows[1].id, second.id);
    assert_eq!(rows[1].rating, Rating::Poor);
    assert!(rows.iter().all(|row| row.committee_rating.is_none() && !row.finalized));
}

#[test]
fn decisions_are_recorded_beside_the_computed_rating() {
    let (service, submissions, decisions) = build_service(true);
    let submission = service
        .submit(FacultyId("faculty1".to_string()), form(), submitted_at())
        .expect("submit");

    service
        .decide(&submission.id, Rating::Outstanding, "Administrator", false, submitted_at())
        .expect("first decision");
    service
        .decide(&submission.id, Rating::Developing, "Administrator", true, submitted_at())
        .expect("second decision");

    let review = service.review(&submission.id).expect("review");
    assert_eq!(review.submission.breakdown.rating, Rating::Good);
    assert_eq!(review.effective_rating, Rating::Developing);
    assert_eq!(review.rating_options, Rating::ALL);
    assert!(review.decision.expect("decision").finalized);

    assert_eq!(decisions.history_for(&submission.id).len(), 2);
    let stored = submissions.records.lock().expect("lock").clone();
    assert_eq!(stored[0].breakdown.rating, Rating::Good);

    let rows = service.summaries().expect("summaries");
    assert_eq!(rows[0].committee_rating, Some(Rating::Developing));
    assert!(rows[0].finalized);
}

#[test]
fn finalized_decisions_cannot_be_replaced() {
    let (service, _, _) = build_service(true);
    let submission = service
        .submit(FacultyId("faculty1".to_string()), form(), submitted_at())
        .expect("submit");
    service
        .decide(&submission.id, Rating::Good, "Administrator", true, submitted_at())
        .expect("finalize");

    match service.decide(&submission.id, Rating::Poor, "Administrator", false, submitted_at()) {
        Err(AppraisalServiceError::AlreadyFinalized(id)) => assert_eq!(id, submission.id),
        other => panic!("expected already finalized, got {other:?}"),
    }
}

#[test]
fn review_and_decide_report_unknown_submissions() {
    let (service, _, _) = build_service(true);
    let missing = SubmissionId("apr-999999".to_string());

    assert!(matches!(
        service.review(&missing),
        Err(AppraisalServiceError::Store(StoreError::NotFound))
    ));
    assert!(matches!(
        service.decide(&missing, Rating::Good, "Administrator", false, submitted_at()),
        Err(AppraisalServiceError::Store(StoreError::NotFound))
    ));
}
