use serde_json::Value;

/// Assert a REST error body has the given `kind`, and return its `message`.
///
/// Panics with the whole body when the shape does not match.
pub fn assert_error_kind(body: &Value, kind: &str) -> String {
    assert_eq!(
        body.get("kind").and_then(Value::as_str),
        Some(kind),
        "unexpected error body: {body}"
    );
    body.get("message")
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("error body without message: {body}"))
        .to_owned()
}
