//! Request-collection extraction.
//!
//! A request collection is a Postman collection export: a top-level `info`
//! object carrying `_postman_id`, and an `item` array whose entries are
//! either requests or folders with their own nested `item` arrays. Every
//! raw request body that parses as JSON is validated like a standalone
//! payload.

use serde_json::Value;

/// Marker key inside `info` identifying a collection export.
pub const COLLECTION_ID_KEY: &str = "_postman_id";

/// True if `document` is a request collection rather than a plain payload.
pub fn is_collection(document: &Value) -> bool {
    document
        .get("info")
        .and_then(Value::as_object)
        .is_some_and(|info| info.contains_key(COLLECTION_ID_KEY))
}

/// Collect the JSON request bodies of a collection in item order.
///
/// Folder contents come before the folder's own request, if it has one.
/// Bodies that are not raw or do not parse as JSON are skipped.
pub fn request_bodies(collection: &Value) -> Vec<Value> {
    let mut bodies = Vec::new();
    if let Some(items) = collection.get("item").and_then(Value::as_array) {
        collect_bodies(items, &mut bodies);
    }
    bodies
}

fn collect_bodies(items: &[Value], bodies: &mut Vec<Value>) {
    for item in items {
        if let Some(nested) = item.get("item").and_then(Value::as_array) {
            collect_bodies(nested, bodies);
        }
        let Some(body) = item.get("request").and_then(|r| r.get("body")) else {
            continue;
        };
        if body.get("mode").and_then(Value::as_str) != Some("raw") {
            continue;
        }
        let Some(raw) = body.get("raw").and_then(Value::as_str) else {
            continue;
        };
        match serde_json::from_str(raw) {
            Ok(payload) => bodies.push(payload),
            Err(e) => {
                let name = item.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
                tracing::debug!(request = name, error = %e, "request body is not JSON; skipped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(body: &str) -> Value {
        json!({"request": {"method": "POST", "body": {"mode": "raw", "raw": body}}})
    }

    #[test]
    fn detects_collections_by_info_marker() {
        assert!(is_collection(&json!({"info": {"_postman_id": "abc", "name": "x"}})));
        assert!(!is_collection(&json!({"info": {"name": "x"}})));
        assert!(!is_collection(&json!({"info": "x"})));
        assert!(!is_collection(&json!([{"info": {"_postman_id": "abc"}}])));
        assert!(!is_collection(&json!({"context": {}, "message": {}})));
    }

    #[test]
    fn extracts_bodies_from_nested_folders_in_order() {
        let collection = json!({
            "info": {"_postman_id": "abc"},
            "item": [
                raw(r#"{"n": 1}"#),
                {"name": "folder", "item": [raw(r#"{"n": 2}"#), {"item": [raw(r#"{"n": 3}"#)]}]},
                raw(r#"{"n": 4}"#)
            ]
        });
        let numbers: Vec<i64> = request_bodies(&collection)
            .iter()
            .map(|b| b["n"].as_i64().unwrap())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn skips_non_raw_and_non_json_bodies() {
        let collection = json!({
            "info": {"_postman_id": "abc"},
            "item": [
                {"request": {"method": "GET"}},
                {"request": {"body": {"mode": "urlencoded", "urlencoded": []}}},
                raw("{{templated_body}}"),
                raw(r#"{"ok": true}"#)
            ]
        });
        assert_eq!(request_bodies(&collection), vec![json!({"ok": true})]);
    }

    #[test]
    fn collection_without_items_has_no_bodies() {
        assert!(request_bodies(&json!({"info": {"_postman_id": "abc"}})).is_empty());
    }
}
