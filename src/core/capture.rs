use crate::domain::model::CapturedItem;
use serde_json::Value;

/// Lifts the items at `pointer` out of a JSON response body.
///
/// An array yields its object elements, an object yields itself, anything
/// else (or a missing pointer) yields nothing. Errors only on invalid JSON.
pub fn parse_items(body: &str, pointer: &str) -> serde_json::Result<Vec<CapturedItem>> {
    let document: Value = serde_json::from_str(body)?;

    let items = match document.pointer(pointer) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|value| value.as_object().cloned())
            .collect(),
        Some(Value::Object(object)) => vec![object.clone()],
        Some(_) | None => Vec::new(),
    };
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_pointer_yields_objects() {
        let body = r#"{"meta": {"code": 200}, "reviews": [{"id": "1", "text": "a"}, 5, {"id": "2"}]}"#;
        let items = parse_items(body, "/reviews").unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], "1");
        assert_eq!(items[1]["id"], "2");
    }

    #[test]
    fn test_object_pointer_and_whole_document() {
        let body = r#"{"review": {"id": "7"}}"#;
        assert_eq!(parse_items(body, "/review").unwrap().len(), 1);
        assert_eq!(parse_items(body, "").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_pointer_yields_nothing() {
        assert!(parse_items(r#"{"other": []}"#, "/reviews").unwrap().is_empty());
        assert!(parse_items(r#"{"reviews": "none"}"#, "/reviews").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(parse_items("<html>not json</html>", "/reviews").is_err());
    }
}
