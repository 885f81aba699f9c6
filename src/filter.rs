//! Search filter over a record collection.

use crate::record::Record;

/// Records whose name or profession contains `query`, ignoring case.
///
/// Order is preserved and an empty query returns the whole collection.
/// The query is matched as typed, without trimming.
pub fn filter(records: &[Record], query: &str) -> Vec<Record> {
    if query.is_empty() {
        return records.to_vec();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| matches(record, &needle))
        .cloned()
        .collect()
}

fn matches(record: &Record, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record.profession.to_lowercase().contains(needle)
}
