use super::{PublicationDataset, PublicationRecord};
use crate::scoring::PublicationCounts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Dataset rows a faculty member ticked while filling in one form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    rows: BTreeSet<usize>,
}

impl SelectionSet {
    pub fn from_rows<I: IntoIterator<Item = usize>>(rows: I) -> Self {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Selected records in dataset order. Rows missing from the dataset are skipped.
    pub fn resolve<'a>(&self, dataset: &'a PublicationDataset) -> Vec<&'a PublicationRecord> {
        self.rows.iter().filter_map(|row| dataset.get(*row)).collect()
    }

    /// Rows that do not exist in `dataset`, usually left over from a replaced upload.
    pub fn unknown_rows(&self, dataset: &PublicationDataset) -> Vec<usize> {
        self.rows
            .iter()
            .copied()
            .filter(|row| dataset.get(*row).is_none())
            .collect()
    }

    pub fn counts(&self, dataset: &PublicationDataset) -> PublicationCounts {
        PublicationCounts::tally(
            self.resolve(dataset)
                .into_iter()
                .map(|record| record.index_label.as_str()),
        )
    }
}
