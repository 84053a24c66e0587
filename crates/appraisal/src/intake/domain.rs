use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::publications::{PublicationRecord, SelectionSet};
use crate::scoring::{classify_index, IndexClass, Rating, ScoreBreakdown, TeachingCell};

/// Identifier wrapper for stored appraisal submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signed-in faculty member, keyed by the portal username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacultyId(pub String);

/// Lecture section taught during the appraisal year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeachingRow {
    #[serde(default)]
    pub subject: String,
    /// Section numbers or enrolment, free text.
    #[serde(default)]
    pub sections: String,
    #[serde(default)]
    pub score: TeachingCell,
}

/// Grant, consultancy, or infrastructure project. Only the row count is scored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRow {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cost_lakhs: String,
    #[serde(default)]
    pub agency: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThesisRow {
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub thesis_title: String,
    #[serde(default)]
    pub defense_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatentRow {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub date: String,
}

/// Number of SCI publications the faculty member aims for next year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSciPublications {
    #[default]
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5+")]
    FiveOrMore,
}

impl TargetSciPublications {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::FiveOrMore => "5+",
        }
    }
}

/// Student rating of service band targeted for next year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSrsScore {
    #[default]
    #[serde(rename = "< 3.0")]
    Below3,
    #[serde(rename = "3.0 - 4.0")]
    From3To4,
    #[serde(rename = "4.0 - 4.5")]
    From4To4Half,
    #[serde(rename = "4.5+")]
    Above4Half,
}

impl TargetSrsScore {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Below3 => "< 3.0",
            Self::From3To4 => "3.0 - 4.0",
            Self::From4To4Half => "4.0 - 4.5",
            Self::Above4Half => "4.5+",
        }
    }
}

/// Everything a faculty member enters on the appraisal form.
///
/// Every section is optional so a partially completed form still submits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppraisalForm {
    #[serde(default)]
    pub teaching: Vec<TeachingRow>,
    #[serde(default)]
    pub selected_publications: SelectionSet,
    #[serde(default)]
    pub projects: Vec<ProjectRow>,
    #[serde(default)]
    pub theses: Vec<ThesisRow>,
    #[serde(default)]
    pub patents: Vec<PatentRow>,
    #[serde(default)]
    pub target_sci: TargetSciPublications,
    #[serde(default)]
    pub target_srs: TargetSrsScore,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub declaration_confirmed: bool,
}

impl AppraisalForm {
    pub fn teaching_scores(&self) -> Vec<TeachingCell> {
        self.teaching.iter().map(|row| row.score.clone()).collect()
    }

    pub fn project_count(&self) -> u32 {
        u32::try_from(self.projects.len()).unwrap_or(u32::MAX)
    }
}

/// A submitted appraisal. Appended once and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppraisalSubmission {
    pub id: SubmissionId,
    pub faculty_id: FacultyId,
    pub submitted_at: NaiveDateTime,
    pub breakdown: ScoreBreakdown,
    pub target_sci: TargetSciPublications,
    pub target_srs: TargetSrsScore,
    pub feedback: String,
    pub thesis_count: usize,
    pub patent_count: usize,
    pub declaration_confirmed: bool,
}

/// Committee rating recorded next to a submission. The computed rating on the
/// submission itself is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeDecision {
    pub submission_id: SubmissionId,
    pub rating: Rating,
    pub decided_by: String,
    pub decided_at: NaiveDateTime,
    pub finalized: bool,
}

/// Row in the admin overview table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionSummary {
    pub id: SubmissionId,
    pub faculty_name: String,
    pub submitted_at: String,
    pub total_score: f64,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committee_rating: Option<Rating>,
    pub finalized: bool,
}

/// Detailed view an admin opens to review one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReview {
    pub submission: AppraisalSubmission,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<CommitteeDecision>,
    /// Committee rating when one was recorded, otherwise the computed rating.
    pub effective_rating: Rating,
    pub rating_options: [Rating; 4],
}

impl SubmissionReview {
    pub fn new(submission: AppraisalSubmission, decision: Option<CommitteeDecision>) -> Self {
        let effective_rating = decision
            .as_ref()
            .map(|decision| decision.rating)
            .unwrap_or(submission.breakdown.rating);
        Self {
            submission,
            decision,
            effective_rating,
            rating_options: Rating::ALL,
        }
    }
}

/// Search result row shown to faculty when picking their papers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicationHit {
    pub row: usize,
    pub title: String,
    pub authors: String,
    pub author_count: usize,
    pub index_label: String,
    pub index_class: IndexClass,
    pub year: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pages: String,
}

impl From<&PublicationRecord> for PublicationHit {
    fn from(record: &PublicationRecord) -> Self {
        Self {
            row: record.row,
            title: record.title.clone(),
            authors: record.authors.clone(),
            author_count: record.author_count(),
            index_label: record.index_label.clone(),
            index_class: classify_index(&record.index_label),
            year: record.year,
            pages: record.page_range(),
        }
    }
}
