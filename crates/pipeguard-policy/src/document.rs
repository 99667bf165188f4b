//! Checked access into untyped JSON documents.
//!
//! Decision responses are open documents. Instead of casting and hoping,
//! each lookup reports whether the field was absent or present with the
//! wrong shape, and the caller decides what that means.

use serde_json::{Map, Value};

/// Why a field could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// The key is not in the document.
    Absent,
    /// The key is present but holds a different JSON type.
    WrongShape {
        /// The JSON type that was expected.
        expected: &'static str,
    },
}

/// View a value as an object.
pub fn as_object(value: &Value) -> Result<&Map<String, Value>, FieldError> {
    value
        .as_object()
        .ok_or(FieldError::WrongShape { expected: "object" })
}

/// Read `key` from `doc` as an object.
pub fn object_field<'a>(
    doc: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a Map<String, Value>, FieldError> {
    doc.get(key).ok_or(FieldError::Absent).and_then(as_object)
}

/// Read `key` from `doc` as an array.
pub fn array_field<'a>(doc: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], FieldError> {
    match doc.get(key) {
        None => Err(FieldError::Absent),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(FieldError::WrongShape { expected: "array" }),
    }
}

/// Render a scalar as plain text: strings without quotes, everything else as
/// its JSON form.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn object_field_present() {
        let d = doc(json!({"result": {"deny": []}}));
        let result = object_field(&d, "result").unwrap();
        assert!(result.contains_key("deny"));
    }

    #[test]
    fn object_field_absent() {
        let d = doc(json!({}));
        assert_eq!(object_field(&d, "result"), Err(FieldError::Absent));
    }

    #[test]
    fn object_field_wrong_shape() {
        let d = doc(json!({"result": true}));
        assert_eq!(
            object_field(&d, "result"),
            Err(FieldError::WrongShape { expected: "object" })
        );
    }

    #[test]
    fn array_field_cases() {
        let d = doc(json!({"deny": ["a", "b"], "allow": true}));
        assert_eq!(array_field(&d, "deny").unwrap().len(), 2);
        assert_eq!(
            array_field(&d, "allow"),
            Err(FieldError::WrongShape { expected: "array" })
        );
        assert_eq!(array_field(&d, "missing"), Err(FieldError::Absent));
    }

    #[test]
    fn to_text_unquotes_strings() {
        assert_eq!(to_text(&json!("missing owner tag")), "missing owner tag");
        assert_eq!(to_text(&json!(42)), "42");
        assert_eq!(to_text(&json!({"code": 7})), r#"{"code":7}"#);
    }
}
