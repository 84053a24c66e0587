use super::PublicationDataset;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// The publication list faculty search against. Admin uploads swap the
/// whole dataset; readers keep whatever snapshot they already hold.
#[derive(Debug, Default)]
pub struct PublicationCatalog {
    current: RwLock<Option<Arc<PublicationDataset>>>,
}

impl PublicationCatalog {
    pub fn with_dataset(dataset: PublicationDataset) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(dataset))),
        }
    }

    pub fn replace(&self, dataset: PublicationDataset) -> Arc<PublicationDataset> {
        let dataset = Arc::new(dataset);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = guard.replace(dataset.clone());
        info!(
            records = dataset.len(),
            previous = previous.map(|old| old.len()),
            "publication dataset replaced"
        );
        dataset
    }

    pub fn current(&self) -> Option<Arc<PublicationDataset>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publications::PublicationRecord;

    fn dataset(titles: &[&str]) -> PublicationDataset {
        PublicationDataset::from_records(
            titles
                .iter()
                .map(|title| PublicationRecord {
                    title: title.to_string(),
                    ..PublicationRecord::default()
                })
                .collect(),
        )
    }

    #[test]
    fn starts_empty_until_first_upload() {
        let catalog = PublicationCatalog::default();
        assert!(catalog.current().is_none());

        catalog.replace(dataset(&["One"]));
        assert_eq!(catalog.current().expect("dataset").len(), 1);
    }

    #[test]
    fn replace_swaps_wholesale_without_touching_held_snapshots() {
        let catalog = PublicationCatalog::with_dataset(dataset(&["One", "Two"]));
        let held = catalog.current().expect("dataset");

        catalog.replace(dataset(&["Three"]));

        assert_eq!(held.len(), 2);
        let now = catalog.current().expect("dataset");
        assert_eq!(now.len(), 1);
        assert_eq!(now.records()[0].title, "Three");
    }
}
