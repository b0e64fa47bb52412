//! Document records and scalar metadata.
//!
//! Vector stores only accept flat, scalar metadata. `MetadataValue` makes
//! that constraint a type: nested structures are unrepresentable, which is
//! what forces callers to flatten before storage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single scalar metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    Str(String),
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<usize> for MetadataValue {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Flat string-keyed metadata attached to a document.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A document record as stored in the vector store.
///
/// The id is the content fingerprint of the text, so re-ingesting the same
/// content replaces the record instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier (content fingerprint).
    pub id: String,

    /// The stored text.
    pub text: String,

    /// Flat metadata.
    pub metadata: Metadata,

    /// The embedding vector.
    pub embedding: Vec<f32>,
}

/// A single match returned from a store query, ranked by ascending distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    /// Id of the matched document.
    pub id: String,

    /// Text of the matched document.
    pub text: String,

    /// Metadata of the matched document.
    pub metadata: Metadata,

    /// Distance reported by the store (smaller is closer).
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_metadata_value_serializes_as_scalar() {
        assert_eq!(
            serde_json::to_value(MetadataValue::from("story")).unwrap(),
            serde_json::json!("story")
        );
        assert_eq!(
            serde_json::to_value(MetadataValue::from(61usize)).unwrap(),
            serde_json::json!(61)
        );
        assert_eq!(
            serde_json::to_value(MetadataValue::from(true)).unwrap(),
            serde_json::json!(true)
        );
        assert_eq!(
            serde_json::to_value(MetadataValue::from(0.5)).unwrap(),
            serde_json::json!(0.5)
        );
    }

    #[test]
    fn test_metadata_value_deserializes_integers_as_int() {
        let value: MetadataValue = serde_json::from_value(serde_json::json!(42)).unwrap();
        assert_eq!(value, MetadataValue::Int(42));

        let value: MetadataValue = serde_json::from_value(serde_json::json!(4.2)).unwrap();
        assert_eq!(value, MetadataValue::Float(4.2));
    }

    #[test]
    fn test_metadata_round_trips_through_json() {
        let mut metadata = Metadata::new();
        metadata.insert("category".to_string(), "story".into());
        metadata.insert("text_length".to_string(), 61usize.into());

        let json = serde_json::to_string(&metadata).unwrap();
        let back: Metadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metadata);
    }
}
