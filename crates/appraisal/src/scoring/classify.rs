use serde::{Deserialize, Serialize};

/// Indexing bucket a publication is credited under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexClass {
    Sci,
    NonSci,
    Scopus,
    Unclassified,
}

/// Classify a free-form index label.
///
/// The label is trimmed and uppercased, then checked in a fixed order:
/// anything containing `ESCI` is Non-SCI, anything else containing `SCI` is
/// SCI, and only an exact `SCOPUS` counts as Scopus. `ESCI` must be tested
/// first because it contains `SCI`.
pub fn classify_index(label: &str) -> IndexClass {
    let normalized = label.trim().to_uppercase();

    if normalized.contains("ESCI") {
        IndexClass::NonSci
    } else if normalized.contains("SCI") {
        IndexClass::Sci
    } else if normalized == "SCOPUS" {
        IndexClass::Scopus
    } else {
        IndexClass::Unclassified
    }
}

/// Number of selected publications per credited bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationCounts {
    #[serde(default)]
    pub sci: u32,
    #[serde(default)]
    pub non_sci: u32,
    #[serde(default)]
    pub scopus: u32,
}

impl PublicationCounts {
    pub const SCI_POINTS: u32 = 15;
    pub const NON_SCI_POINTS: u32 = 10;
    pub const SCOPUS_POINTS: u32 = 5;

    pub fn tally<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels
            .into_iter()
            .fold(Self::default(), |mut counts, label| {
                counts.add(classify_index(label));
                counts
            })
    }

    pub fn add(&mut self, class: IndexClass) {
        match class {
            IndexClass::Sci => self.sci = self.sci.saturating_add(1),
            IndexClass::NonSci => self.non_sci = self.non_sci.saturating_add(1),
            IndexClass::Scopus => self.scopus = self.scopus.saturating_add(1),
            IndexClass::Unclassified => {}
        }
    }

    /// Widened to `u64` so every `u32` count combination stays exact.
    pub fn points(&self) -> u64 {
        u64::from(self.sci) * u64::from(Self::SCI_POINTS)
            + u64::from(self.non_sci) * u64::from(Self::NON_SCI_POINTS)
            + u64::from(self.scopus) * u64::from(Self::SCOPUS_POINTS)
    }
}
