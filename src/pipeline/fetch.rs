/// Result fetching and normalization.
///
/// Two response shapes are accepted:
///
/// 1. A list page: `{ "count": 82, "results": [ {...}, {...} ] }`. Every
///    element of `results` becomes one record.
/// 2. Anything else: the whole body is a single record (a singular resource
///    such as `/people/1`).
///
/// After normalization, every selected column holding a JSON number is
/// rounded up to the next integer so later stages see whole values.
use crate::http::{JsonSource, PipelineError, join_url};
use crate::record::{Record, Value, record_from_json};

/// Fetch `{base_url}/{endpoint}` and normalize it into records.
///
/// An empty `endpoint` is a no-op: no request is made and the batch is empty.
pub fn fetch(
    source: &dyn JsonSource,
    base_url: &str,
    endpoint: &str,
    selected_columns: &[String],
) -> Result<Vec<Record>, PipelineError> {
    if endpoint.is_empty() {
        return Ok(Vec::new());
    }

    let url = join_url(base_url, endpoint);
    let body = source.get_json(&url)?;
    Ok(normalize_body(&body, selected_columns))
}

/// Turn a parsed response body into a record batch.
pub fn normalize_body(body: &serde_json::Value, selected_columns: &[String]) -> Vec<Record> {
    let mut records: Vec<Record> = match body.get("results").and_then(|r| r.as_array()) {
        Some(results) => results.iter().map(record_from_json).collect(),
        None => vec![record_from_json(body)],
    };

    for record in &mut records {
        ceil_selected(record, selected_columns);
    }

    records
}

/// Round selected numeric columns up in place. Text, booleans and nulls are
/// left untouched, as are columns the record does not have.
fn ceil_selected(record: &mut Record, selected_columns: &[String]) {
    for column in selected_columns {
        if let Some(value) = record.get_mut(column)
            && let Some(n) = value.as_number()
        {
            *value = Value::Number(n.ceil());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// Records every requested URL and returns a fixed body.
    struct Recorder {
        body: serde_json::Value,
        calls: RefCell<Vec<String>>,
    }

    impl JsonSource for Recorder {
        fn get_json(&self, url: &str) -> Result<serde_json::Value, PipelineError> {
            self.calls.borrow_mut().push(url.to_string());
            Ok(self.body.clone())
        }
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn results_array_becomes_one_record_per_element() {
        let body: serde_json::Value = serde_json::from_str(
            r#"{"count": 3, "results": [
                {"name": "Luke", "height": 172.4, "mass": 77},
                {"name": "Leia", "height": 150},
                {"name": "Han", "height": 180.1, "extra": 1}
            ]}"#,
        )
        .unwrap();
        let records = normalize_body(&body, &[]);
        assert_eq!(records.len(), 3);
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "height", "mass"]);
        // Unselected columns are not rounded.
        assert_eq!(records[0]["height"], Value::Number(172.4));
    }

    #[test]
    fn singular_body_is_one_record() {
        let body = json!({"name": "Tatooine", "diameter": 10465.5, "climate": "arid"});
        let records = normalize_body(&body, &cols(&["diameter"]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], Value::Text("Tatooine".into()));
        assert_eq!(records[0]["diameter"], Value::Number(10466.0));
        assert_eq!(records[0]["climate"], Value::Text("arid".into()));
    }

    #[test]
    fn selected_numeric_columns_are_ceiled() {
        let body = json!({"results": [
            {"name": "a", "score": 1.2, "rank": -0.5},
            {"name": "b", "score": 2.0, "rank": "3.7"}
        ]});
        let records = normalize_body(&body, &cols(&["score", "rank", "missing"]));
        assert_eq!(records[0]["score"], Value::Number(2.0));
        assert_eq!(records[0]["rank"], Value::Number(-0.0));
        assert_eq!(records[1]["score"], Value::Number(2.0));
        // Numeric text is not a JSON number and stays as-is.
        assert_eq!(records[1]["rank"], Value::Text("3.7".into()));
    }

    #[test]
    fn results_that_is_not_an_array_is_treated_as_singular() {
        let body = json!({"results": "pending", "id": 4});
        let records = normalize_body(&body, &[]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["results"], Value::Text("pending".into()));
    }

    #[test]
    fn empty_results_array_is_empty_batch() {
        let body = json!({"count": 0, "results": []});
        assert!(normalize_body(&body, &[]).is_empty());
    }

    #[test]
    fn empty_endpoint_makes_no_request() {
        let source = Recorder {
            body: json!({}),
            calls: RefCell::new(Vec::new()),
        };
        let records = fetch(&source, "https://api.test", "", &[]).unwrap();
        assert!(records.is_empty());
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn fetch_requests_joined_url() {
        let source = Recorder {
            body: json!({"results": [{"a": 1}]}),
            calls: RefCell::new(Vec::new()),
        };
        let records = fetch(&source, "https://api.test/", "things", &[]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(*source.calls.borrow(), vec!["https://api.test/things"]);
    }
}
