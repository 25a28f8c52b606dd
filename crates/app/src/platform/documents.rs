//! Firestore document wire format.
//!
//! Firestore's REST API wraps every field in a typed value object
//! (`{"stringValue": "Bike"}`). Serde's externally tagged enum
//! representation matches that shape exactly, so [`Value`] round-trips
//! the wire format without custom (de)serialization code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A Firestore document.
///
/// `name` is the full resource path
/// (`projects/{p}/databases/{d}/documents/{collection}/{id}`); it is
/// absent on create requests because the server assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource path, set by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Typed field values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
    /// Server-assigned creation time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    /// Server-assigned last update time (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// Build a document from field pairs, for create/overwrite bodies.
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v))
                .collect(),
            ..Self::default()
        }
    }

    /// The document id: the last segment of the resource path.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.name.as_deref()?.rsplit('/').next()
    }

    /// Look up a field value by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// A typed Firestore field value.
///
/// The full closed set of Firestore value kinds. This application only
/// writes strings, doubles, and string arrays; the remaining kinds are
/// carried so documents touched by foreign writers still deserialize,
/// and the accessors treat them as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    /// UTF-8 string.
    StringValue(String),
    /// 64-bit integer, encoded as a decimal string on the wire.
    IntegerValue(String),
    /// 64-bit float.
    DoubleValue(f64),
    /// Boolean.
    BooleanValue(bool),
    /// Explicit null.
    NullValue(()),
    /// RFC 3339 timestamp.
    TimestampValue(String),
    /// Base64-encoded bytes.
    BytesValue(String),
    /// Reference to another document, as a resource path.
    ReferenceValue(String),
    /// Geographic point; opaque to this application.
    GeoPointValue(serde_json::Value),
    /// Ordered array of values.
    ArrayValue(ArrayValue),
    /// Nested map of values.
    MapValue(MapValue),
}

/// Wrapper for array values (`{"arrayValue": {"values": [...]}}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    /// The array elements; Firestore omits the key for empty arrays.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

/// Wrapper for map values (`{"mapValue": {"fields": {...}}}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    /// The nested fields; Firestore omits the key for empty maps.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    /// A string value.
    pub fn string(s: impl Into<String>) -> Self {
        Self::StringValue(s.into())
    }

    /// A double value.
    #[must_use]
    pub const fn double(value: f64) -> Self {
        Self::DoubleValue(value)
    }

    /// An array of string values, preserving order.
    pub fn string_array<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::ArrayValue(ArrayValue {
            values: values.into_iter().map(Self::string).collect(),
        })
    }

    /// The value as a string, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::StringValue(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a float.
    ///
    /// Accepts both `doubleValue` and `integerValue` because Firestore
    /// stores whole numbers written by loosely typed clients as
    /// integers.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::DoubleValue(value) => Some(*value),
            Self::IntegerValue(raw) => raw.parse().ok(),
            _ => None,
        }
    }

    /// The value as a vec of strings, skipping non-string elements.
    #[must_use]
    pub fn as_string_array(&self) -> Option<Vec<String>> {
        match self {
            Self::ArrayValue(array) => Some(
                array
                    .values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect(),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_string_value_wire_shape() {
        let value = Value::string("Bike");
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"stringValue":"Bike"}"#);
    }

    #[test]
    fn test_double_value_wire_shape() {
        let value = Value::double(150.0);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"doubleValue":150.0}"#);
    }

    #[test]
    fn test_array_value_wire_shape() {
        let value = Value::string_array(["a", "b"]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(
            json,
            r#"{"arrayValue":{"values":[{"stringValue":"a"},{"stringValue":"b"}]}}"#
        );
    }

    #[test]
    fn test_integer_value_parses_as_f64() {
        let value: Value = serde_json::from_str(r#"{"integerValue":"150"}"#).unwrap();
        assert_eq!(value.as_f64(), Some(150.0));
    }

    #[test]
    fn test_foreign_value_kind_tolerated() {
        let value: Value =
            serde_json::from_str(r#"{"geoPointValue":{"latitude":0,"longitude":0}}"#).unwrap();
        assert!(matches!(value, Value::GeoPointValue(_)));
        assert!(value.as_str().is_none());
        assert!(value.as_f64().is_none());
    }

    #[test]
    fn test_document_id_from_name() {
        let doc = Document {
            name: Some(
                "projects/p/databases/(default)/documents/anuncio/abc123".to_string(),
            ),
            ..Document::default()
        };
        assert_eq!(doc.id(), Some("abc123"));
    }

    #[test]
    fn test_document_roundtrip() {
        let json = r#"{
            "name": "projects/p/databases/(default)/documents/anuncio/a1",
            "fields": {
                "title": {"stringValue": "Bike"},
                "preco": {"doubleValue": 150.0},
                "fotos": {"arrayValue": {"values": [{"stringValue": "file:///f.jpg"}]}}
            },
            "createTime": "2024-11-01T12:00:00Z",
            "updateTime": "2024-11-01T12:00:00Z"
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.field("title").and_then(Value::as_str), Some("Bike"));
        assert_eq!(doc.field("preco").and_then(Value::as_f64), Some(150.0));
        assert_eq!(
            doc.field("fotos").and_then(Value::as_string_array),
            Some(vec!["file:///f.jpg".to_string()])
        );
    }

    #[test]
    fn test_create_body_omits_server_fields() {
        let doc = Document::from_fields([("title", Value::string("Bike"))]);
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"fields":{"title":{"stringValue":"Bike"}}}"#);
    }
}
