/// Endpoint discovery.
///
/// The root of a browsable JSON API usually maps resource names to URLs:
///
/// ```json
/// { "people": "https://swapi.dev/api/people/", "films": "https://swapi.dev/api/films/" }
/// ```
///
/// Only keys whose value is a string are treated as endpoints. Numbers,
/// booleans, nulls and nested structures at the top level are metadata and
/// are skipped without error.
use crate::http::{JsonSource, PipelineError};

/// Fetch `base_url` and return the names of the sub-resources it exposes.
///
/// Names are returned in the order they appear in the response body.
pub fn discover(source: &dyn JsonSource, base_url: &str) -> Result<Vec<String>, PipelineError> {
    let body = source.get_json(base_url)?;
    Ok(endpoints_from_body(&body))
}

/// Extract endpoint names from a parsed root document.
///
/// A body that is not a JSON object exposes no endpoints.
pub fn endpoints_from_body(body: &serde_json::Value) -> Vec<String> {
    let Some(map) = body.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter(|(_, value)| value.is_string())
        .map(|(key, _)| key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_only_string_valued_keys() {
        let body: serde_json::Value = serde_json::from_str(
            r#"{
                "people": "https://swapi.dev/api/people/",
                "count": 6,
                "films": "https://swapi.dev/api/films/",
                "beta": true,
                "meta": {"version": "1"},
                "tags": ["a"],
                "deprecated": null
            }"#,
        )
        .unwrap();
        assert_eq!(endpoints_from_body(&body), vec!["people", "films"]);
    }

    #[test]
    fn non_object_body_has_no_endpoints() {
        assert!(endpoints_from_body(&json!(["people", "films"])).is_empty());
        assert!(endpoints_from_body(&json!("people")).is_empty());
    }

    #[test]
    fn empty_string_value_still_counts() {
        assert_eq!(endpoints_from_body(&json!({"root": ""})), vec!["root"]);
    }
}
