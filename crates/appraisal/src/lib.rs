//! Faculty annual appraisal: publication matching, scoring, and committee review.

pub mod config;
pub mod error;
pub mod intake;
pub mod publications;
pub mod scoring;
pub mod telemetry;
