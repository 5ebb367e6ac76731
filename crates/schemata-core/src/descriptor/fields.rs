//! Field accessors for hydration
//!
//! Each accessor checks presence and JSON kind of one field and reports
//! failures as [`DecodeError`]s rooted at that field. Nested descriptors and
//! lists of descriptors wrap their element errors with the field name and
//! index, so callers only need `?`.

use crate::descriptor::SchemaDescriptor;
use crate::error::DecodeError;
use serde_json::{Map, Value};

/// Require the value to be a JSON object
pub fn object<'a>(data: &'a Value, type_name: &str) -> Result<&'a Map<String, Value>, DecodeError> {
    data.as_object()
        .ok_or_else(|| DecodeError::not_an_object(type_name, data))
}

fn required<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Value, DecodeError> {
    match obj.get(field) {
        Some(value) => Ok(value),
        None => Err(DecodeError::missing_field(field)),
    }
}

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

pub fn required_str(obj: &Map<String, Value>, field: &str) -> Result<String, DecodeError> {
    let value = required(obj, field)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DecodeError::wrong_type(field, "string", value))
}

pub fn optional_str(obj: &Map<String, Value>, field: &str) -> Result<Option<String>, DecodeError> {
    match present(obj, field) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| DecodeError::wrong_type(field, "string", value)),
    }
}

pub fn required_i64(obj: &Map<String, Value>, field: &str) -> Result<i64, DecodeError> {
    let value = required(obj, field)?;
    value
        .as_i64()
        .ok_or_else(|| DecodeError::wrong_type(field, "integer", value))
}

pub fn required_f64(obj: &Map<String, Value>, field: &str) -> Result<f64, DecodeError> {
    let value = required(obj, field)?;
    value
        .as_f64()
        .ok_or_else(|| DecodeError::wrong_type(field, "number", value))
}

pub fn required_bool(obj: &Map<String, Value>, field: &str) -> Result<bool, DecodeError> {
    let value = required(obj, field)?;
    value
        .as_bool()
        .ok_or_else(|| DecodeError::wrong_type(field, "boolean", value))
}

/// Hydrate a nested descriptor stored under `field`
pub fn required_nested<T: SchemaDescriptor>(
    obj: &Map<String, Value>,
    field: &str,
) -> Result<T, DecodeError> {
    let value = required(obj, field)?;
    if !value.is_object() {
        return Err(DecodeError::wrong_type(field, "object", value));
    }
    T::hydrate(value).map_err(|e| DecodeError::nested(field, e))
}

/// Hydrate every element of the list stored under `field`
pub fn required_list<T: SchemaDescriptor>(
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Vec<T>, DecodeError> {
    let value = required(obj, field)?;
    hydrate_list(field, value)
}

/// Like [`required_list`], but an absent or null field yields an empty list
pub fn optional_list<T: SchemaDescriptor>(
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Vec<T>, DecodeError> {
    match present(obj, field) {
        None => Ok(Vec::new()),
        Some(value) => hydrate_list(field, value),
    }
}

fn hydrate_list<T: SchemaDescriptor>(field: &str, value: &Value) -> Result<Vec<T>, DecodeError> {
    let items = value
        .as_array()
        .ok_or_else(|| DecodeError::wrong_type(field, "array", value))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::hydrate(item).map_err(|e| DecodeError::nested(format!("{}[{}]", field, index), e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_scalars() {
        let data = obj(json!({"s": "a", "i": 3, "f": 1.5, "b": true}));
        assert_eq!(required_str(&data, "s").unwrap(), "a");
        assert_eq!(required_i64(&data, "i").unwrap(), 3);
        assert_eq!(required_f64(&data, "f").unwrap(), 1.5);
        assert_eq!(required_f64(&data, "i").unwrap(), 3.0);
        assert!(required_bool(&data, "b").unwrap());
    }

    #[test]
    fn test_missing_and_wrong_type() {
        let data = obj(json!({"i": "x"}));

        let missing = required_str(&data, "s").unwrap_err();
        assert_eq!(missing.kind(), DecodeErrorKind::MissingField);
        assert_eq!(missing.path(), "s");

        let wrong = required_i64(&data, "i").unwrap_err();
        assert_eq!(wrong.kind(), DecodeErrorKind::WrongType);
        assert_eq!(wrong.path(), "i");
    }

    #[test]
    fn test_optional_str_treats_null_as_absent() {
        let data = obj(json!({"a": null, "b": "x", "c": 1}));
        assert_eq!(optional_str(&data, "a").unwrap(), None);
        assert_eq!(optional_str(&data, "missing").unwrap(), None);
        assert_eq!(optional_str(&data, "b").unwrap(), Some("x".to_string()));
        assert!(optional_str(&data, "c").is_err());
    }

    #[test]
    fn test_object_rejects_non_objects() {
        let err = object(&json!([1]), "Step").unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::WrongType);
        assert_eq!(err.path(), "");
        assert_eq!(err.to_string(), "expected 'Step' object, found array");
    }

    #[derive(Debug, serde::Serialize)]
    struct Point {
        x: i64,
    }

    impl SchemaDescriptor for Point {
        const TYPE_NAME: &'static str = "Point";

        fn describe_schema(_ctx: &crate::descriptor::RootContext) -> Value {
            json!({"type": "object", "properties": {"x": {"type": "integer"}}})
        }

        fn hydrate(data: &Value) -> Result<Self, DecodeError> {
            let obj = object(data, Self::TYPE_NAME)?;
            Ok(Self {
                x: required_i64(obj, "x")?,
            })
        }
    }

    #[test]
    fn test_non_object_list_element_path_ends_at_index() {
        let data = obj(json!({"points": [{"x": 1}, 7]}));
        let err = required_list::<Point>(&data, "points").unwrap_err();

        assert_eq!(err.path(), "points[1]");
        assert_eq!(err.root_cause().kind(), DecodeErrorKind::WrongType);
        assert!(!err.to_string().contains("points[1].Point"));
        assert!(err.to_string().contains("expected 'Point' object, found integer"));
    }
}
