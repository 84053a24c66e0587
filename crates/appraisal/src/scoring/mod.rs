//! Appraisal scoring: publication matching, index classification, and the
//! total score / rating formula.
//!
//! Everything here is pure. Unusable input is coerced to a safe default
//! (empty text, zero points) instead of being rejected, so a half-filled form
//! still produces a score.

mod classify;
mod rating;
mod search;

pub use classify::{classify_index, IndexClass, PublicationCounts};
pub use rating::{Rating, UnknownRating};
pub use search::filter_publications;

use serde::{Deserialize, Deserializer, Serialize};

/// Points credited per project row.
pub const PROJECT_POINTS: u32 = 20;

/// A raw cell from the teaching table's score column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TeachingCell {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl TeachingCell {
    /// Wrap text typed into a form cell. Blank cells become `Missing`.
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            TeachingCell::Missing
        } else {
            TeachingCell::Text(raw.to_string())
        }
    }

    /// Numeric contribution of the cell; anything unparseable or non-finite is 0.
    pub fn points(&self) -> f64 {
        let value = match self {
            TeachingCell::Number(value) => *value,
            TeachingCell::Text(text) => text.trim().parse::<f64>().unwrap_or(0.0),
            TeachingCell::Missing => 0.0,
        };

        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

impl From<serde_json::Value> for TeachingCell {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(number) => number
                .as_f64()
                .map(TeachingCell::Number)
                .unwrap_or(TeachingCell::Missing),
            serde_json::Value::String(text) => TeachingCell::Text(text),
            _ => TeachingCell::Missing,
        }
    }
}

// Any JSON shape is accepted; shapes without a number in them score zero.
impl<'de> Deserialize<'de> for TeachingCell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(TeachingCell::from)
    }
}

/// Derived score for one submission. Never mutated after it is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub teaching_score: f64,
    pub sci_count: u32,
    pub non_sci_count: u32,
    pub scopus_count: u32,
    pub project_count: u32,
    pub total_score: f64,
    pub rating: Rating,
}

impl ScoreBreakdown {
    pub fn publication_points(&self) -> u64 {
        self.counts().points()
    }

    pub fn project_points(&self) -> u64 {
        project_points(self.project_count)
    }

    pub fn counts(&self) -> PublicationCounts {
        PublicationCounts {
            sci: self.sci_count,
            non_sci: self.non_sci_count,
            scopus: self.scopus_count,
        }
    }
}

fn project_points(project_count: u32) -> u64 {
    u64::from(project_count) * u64::from(PROJECT_POINTS)
}

/// Combine teaching cells, publication buckets, and project rows into a total
/// score and rating.
pub fn compute_score(
    teaching_scores: &[TeachingCell],
    publications: PublicationCounts,
    project_count: u32,
) -> ScoreBreakdown {
    let teaching_score: f64 = teaching_scores.iter().map(TeachingCell::points).sum();
    let publication_points = publications.points();
    let project_points = project_points(project_count);
    // Both point sums stay far below 2^53, so the conversion is exact.
    let total_score = teaching_score + publication_points as f64 + project_points as f64;

    ScoreBreakdown {
        teaching_score,
        sci_count: publications.sci,
        non_sci_count: publications.non_sci,
        scopus_count: publications.scopus,
        project_count,
        total_score,
        rating: Rating::from_total(total_score),
    }
}
