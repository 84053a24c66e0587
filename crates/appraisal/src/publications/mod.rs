mod catalog;
mod parser;
mod selection;

pub use catalog::PublicationCatalog;
pub use selection::SelectionSet;

use crate::scoring::filter_publications;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One row of the institute publication list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    /// Zero-based position in the uploaded file; faculty select rows by it.
    pub row: usize,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: String,
    /// Semicolon separated author names.
    pub authors: String,
    pub index_label: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_page: Option<String>,
}

impl PublicationRecord {
    /// Number of `;`-separated segments. Empty segments still count, so
    /// `"A;B;"` is three authors; an empty cell is zero.
    pub fn author_count(&self) -> usize {
        if self.authors.is_empty() {
            0
        } else {
            self.authors.split(';').count()
        }
    }

    pub fn page_range(&self) -> String {
        match (self.start_page.as_deref(), self.end_page.as_deref()) {
            (Some(start), Some(end)) => format!("{start}-{end}"),
            (Some(page), None) | (None, Some(page)) => page.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// A loaded publication list. Replaced wholesale on every upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationDataset {
    records: Vec<PublicationRecord>,
}

impl PublicationDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let records = parser::parse_records(reader)?;
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<PublicationRecord>) -> Self {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(row, record)| PublicationRecord { row, ..record })
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[PublicationRecord] {
        &self.records
    }

    pub fn get(&self, row: usize) -> Option<&PublicationRecord> {
        self.records.get(row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn search(&self, query: Option<&str>) -> Vec<&PublicationRecord> {
        filter_publications(&self.records, query)
    }
}

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Csv(csv::Error),
    ExtraFields {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io(err) => write!(f, "failed to read publication list: {}", err),
            DatasetError::Csv(err) => write!(f, "invalid publication CSV: {}", err),
            DatasetError::ExtraFields {
                row,
                expected,
                found,
            } => write!(
                f,
                "publication row {} has {} fields but the header names {}",
                row, found, expected
            ),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(err) => Some(err),
            DatasetError::Csv(err) => Some(err),
            DatasetError::ExtraFields { .. } => None,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EXPORT: &str = "Article Title,Abstract,Author Keywords,Authors,Index,Publication Year,Start Page,End Page\n\
Graph Neural Networks for Traffic,Forecasting congestion,GNN; traffic,Rahman A.; Chowdhury S.,SCI,2023,101,115\n\
Solar Cell Efficiency,Perovskite layers,,Karim M.,ESCI,2022.0,7.0,\n\
Campus Energy Audit,,,, Scopus ,,,\n";

    #[test]
    fn parses_full_export() {
        let dataset = PublicationDataset::from_reader(Cursor::new(EXPORT)).expect("parse");
        assert_eq!(dataset.len(), 3);

        let first = dataset.get(0).expect("row 0");
        assert_eq!(first.row, 0);
        assert_eq!(first.title, "Graph Neural Networks for Traffic");
        assert_eq!(first.index_label, "SCI");
        assert_eq!(first.year, 2023);
        assert_eq!(first.author_count(), 2);
        assert_eq!(first.page_range(), "101-115");

        let second = dataset.get(1).expect("row 1");
        assert_eq!(second.year, 2022);
        assert_eq!(second.page_range(), "7");

        let third = dataset.get(2).expect("row 2");
        assert_eq!(third.row, 2);
        assert_eq!(third.index_label, "Scopus");
        assert_eq!(third.year, 0);
        assert_eq!(third.author_count(), 0);
        assert_eq!(third.page_range(), "");
    }

    #[test]
    fn missing_columns_read_as_empty() {
        let csv = "Article Title,Index\nLonely Paper,SCOPUS\n";
        let dataset = PublicationDataset::from_reader(Cursor::new(csv)).expect("parse");
        let record = dataset.get(0).expect("row");
        assert_eq!(record.title, "Lonely Paper");
        assert_eq!(record.abstract_text, "");
        assert_eq!(record.keywords, "");
        assert_eq!(record.authors, "");
        assert_eq!(record.year, 0);
        assert!(record.start_page.is_none());
    }

    #[test]
    fn search_delegates_to_substring_filter() {
        let dataset = PublicationDataset::from_reader(Cursor::new(EXPORT)).expect("parse");
        let hits = dataset.search(Some("perovskite"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].row, 1);
        assert_eq!(dataset.search(None).len(), 3);
    }

    #[test]
    fn from_records_renumbers_rows() {
        let dataset = PublicationDataset::from_records(vec![
            PublicationRecord {
                row: 9,
                title: "A".to_string(),
                ..PublicationRecord::default()
            },
            PublicationRecord {
                row: 9,
                title: "B".to_string(),
                ..PublicationRecord::default()
            },
        ]);
        let rows: Vec<usize> = dataset.records().iter().map(|record| record.row).collect();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn year_parsing_accepts_whole_floats_only() {
        assert_eq!(parser::parse_whole_number_for_tests("2021"), Some(2021));
        assert_eq!(parser::parse_whole_number_for_tests(" 2021.0 "), Some(2021));
        assert_eq!(parser::parse_whole_number_for_tests("2021.5"), None);
        assert_eq!(parser::parse_whole_number_for_tests("n/a"), None);
    }

    #[test]
    fn from_path_propagates_io_errors() {
        match PublicationDataset::from_path("./does-not-exist.csv") {
            Err(DatasetError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn author_count_keeps_empty_segments() {
        let record = |authors: &str| PublicationRecord {
            authors: authors.to_string(),
            ..PublicationRecord::default()
        };
        assert_eq!(record("A;B;").author_count(), 3);
        assert_eq!(record("Solo").author_count(), 1);
        assert_eq!(record("").author_count(), 0);
    }

    #[test]
    fn short_rows_fill_missing_trailing_fields() {
        let csv = "Article Title,Abstract,Author Keywords,Authors,Index,Publication Year\n\
Short Paper,abs,kw\n\
Full Paper,text,keys,Haque T.,SCI,2024\n";
        let dataset = PublicationDataset::from_reader(Cursor::new(csv)).expect("parse");
        assert_eq!(dataset.len(), 2);

        let short = dataset.get(0).expect("row 0");
        assert_eq!(short.title, "Short Paper");
        assert_eq!(short.abstract_text, "abs");
        assert_eq!(short.keywords, "kw");
        assert_eq!(short.authors, "");
        assert_eq!(short.index_label, "");
        assert_eq!(short.year, 0);

        let full = dataset.get(1).expect("row 1");
        assert_eq!(full.index_label, "SCI");
        assert_eq!(full.year, 2024);
    }

    #[test]
    fn rows_wider_than_header_are_rejected() {
        let csv = "Article Title,Index\nOne,SCI\nTwo,SCI,extra\n";
        match PublicationDataset::from_reader(Cursor::new(csv)) {
            Err(DatasetError::ExtraFields {
                row: 1,
                expected: 2,
                found: 3,
            }) => {}
            other => panic!("expected extra fields error, got {other:?}"),
        }
    }

    #[test]
    fn non_utf8_fields_are_reported_as_csv_errors() {
        let bytes: &[u8] = b"Article Title,Index\nCaf\xff,SCI\n";
        match PublicationDataset::from_reader(Cursor::new(bytes)) {
            Err(DatasetError::Csv(_)) => {}
            other => panic!("expected csv error, got {other:?}"),
        }
    }
}
