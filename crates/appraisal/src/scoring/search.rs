use crate::publications::PublicationRecord;

/// Keep the records whose title, abstract, keywords, or authors contain
/// `query`, ignoring case. Input order is preserved.
///
/// A missing, empty, or whitespace-only query returns every record.
pub fn filter_publications<'a>(
    records: &'a [PublicationRecord],
    query: Option<&str>,
) -> Vec<&'a PublicationRecord> {
    let needle = match query.map(str::trim) {
        Some(needle) if !needle.is_empty() => needle.to_lowercase(),
        _ => return records.iter().collect(),
    };

    records
        .iter()
        .filter(|record| matches_query(record, &needle))
        .collect()
}

fn matches_query(record: &PublicationRecord, needle: &str) -> bool {
    [
        &record.title,
        &record.abstract_text,
        &record.keywords,
        &record.authors,
    ]
    .into_iter()
    .any(|field| !field.is_empty() && field.to_lowercase().contains(needle))
}
