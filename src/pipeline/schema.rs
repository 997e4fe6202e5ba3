use crate::record::Record;

/// Derive the ordered column names of a record batch.
///
/// The schema is the key order of the first record. Later records may carry
/// extra or missing keys; they never widen the schema. An empty batch has an
/// empty schema, which the session treats as a diagnostic condition.
pub fn infer_schema(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default()
}
