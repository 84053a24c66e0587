use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Four-tier appraisal outcome, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Outstanding,
    Good,
    Developing,
    Poor,
}

const OUTSTANDING_FLOOR: f64 = 100.0;
const GOOD_FLOOR: f64 = 60.0;
const DEVELOPING_FLOOR: f64 = 30.0;

impl Rating {
    /// Options offered to the review committee, in display order.
    pub const ALL: [Rating; 4] = [
        Rating::Outstanding,
        Rating::Good,
        Rating::Developing,
        Rating::Poor,
    ];

    /// Step function over the total score. Lower bounds are inclusive.
    pub fn from_total(total: f64) -> Self {
        if total >= OUTSTANDING_FLOOR {
            Rating::Outstanding
        } else if total >= GOOD_FLOOR {
            Rating::Good
        } else if total >= DEVELOPING_FLOOR {
            Rating::Developing
        } else {
            Rating::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Outstanding => "Outstanding",
            Rating::Good => "Good",
            Rating::Developing => "Developing",
            Rating::Poor => "Poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rating '{0}', expected one of Outstanding, Good, Developing, Poor")]
pub struct UnknownRating(pub String);

impl FromStr for Rating {
    type Err = UnknownRating;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Rating::ALL
            .into_iter()
            .find(|rating| rating.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownRating(value.to_string()))
    }
}
