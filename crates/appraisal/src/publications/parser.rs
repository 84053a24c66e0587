use super::{DatasetError, PublicationRecord};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Parse the institute publication export. Absent columns and short rows read
/// as empty text; a row wider than the header is rejected.
pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<PublicationRecord>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let fields = result?;
        if fields.len() > headers.len() {
            return Err(DatasetError::ExtraFields {
                row,
                expected: headers.len(),
                found: fields.len(),
            });
        }
        let parsed: PublicationRow = fields.deserialize(Some(&headers))?;
        records.push(parsed.into_record(row));
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct PublicationRow {
    #[serde(rename = "Article Title", default)]
    title: String,
    #[serde(rename = "Abstract", default)]
    abstract_text: String,
    #[serde(rename = "Author Keywords", default)]
    keywords: String,
    #[serde(rename = "Authors", default)]
    authors: String,
    #[serde(rename = "Index", default)]
    index_label: String,
    #[serde(
        rename = "Publication Year",
        default,
        deserialize_with = "lenient_year"
    )]
    year: i32,
    #[serde(rename = "Start Page", default, deserialize_with = "page_number")]
    start_page: Option<String>,
    #[serde(rename = "End Page", default, deserialize_with = "page_number")]
    end_page: Option<String>,
}

impl PublicationRow {
    fn into_record(self, row: usize) -> PublicationRecord {
        PublicationRecord {
            row,
            title: self.title,
            abstract_text: self.abstract_text,
            keywords: self.keywords,
            authors: self.authors,
            index_label: self.index_label,
            year: self.year,
            start_page: self.start_page,
            end_page: self.end_page,
        }
    }
}

fn lenient_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_whole_number).unwrap_or(0))
}

fn page_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| normalize_page(&value)))
}

/// Spreadsheet exports often write whole numbers as `2021.0`.
fn parse_whole_number(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<i32>() {
        return Some(number);
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite() && number.fract() == 0.0)
        .filter(|number| *number >= f64::from(i32::MIN) && *number <= f64::from(i32::MAX))
        .map(|number| number as i32)
}

fn normalize_page(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }

    match parse_whole_number(trimmed) {
        Some(number) => Some(number.to_string()),
        None => Some(trimmed.to_string()),
    }
}

#[cfg(test)]
pub(crate) fn parse_whole_number_for_tests(value: &str) -> Option<i32> {
    parse_whole_number(value)
}
