//! The observation document.
//!
//! An [`Observation`] is an identifier plus an open set of caller-supplied
//! fields. No schema is enforced: fields are kept as a key-ordered map from
//! string to [`serde_json::Value`]. On the wire the document is one flat
//! JSON object whose identifier lives under [`ID_FIELD`].

use serde::{Deserialize, Serialize};

use crate::ids::ObservationId;

/// Wire name of the identifier key inside a serialized observation.
pub const ID_FIELD: &str = "_id";

/// Caller-supplied observation fields.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A stored observation document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Store-assigned identifier. Immutable after creation.
    #[serde(rename = "_id")]
    pub id: ObservationId,
    /// Every other field of the document.
    #[serde(flatten)]
    pub fields: Fields,
}

impl Observation {
    /// Build an observation from an id and a set of fields.
    ///
    /// Any identifier key in `fields` is dropped so the document can only
    /// ever carry the id it was created with.
    pub fn new(id: ObservationId, fields: Fields) -> Self {
        Self {
            id,
            fields: strip_id(fields),
        }
    }

    /// Look up a single field by name.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    /// Merge `patch` into this document's fields.
    ///
    /// Top-level keys in `patch` overwrite existing values; keys absent from
    /// `patch` keep their prior values. The identifier is never touched.
    pub fn merge(&mut self, patch: Fields) {
        for (key, value) in strip_id(patch) {
            self.fields.insert(key, value);
        }
    }
}

/// Remove the identifier key from a caller-supplied field map.
pub fn strip_id(mut fields: Fields) -> Fields {
    fields.remove(ID_FIELD);
    fields
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: serde_json::Value) -> Fields {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    #[test]
    fn serializes_flat_with_id_key() {
        let id = ObservationId::new();
        let obs = Observation::new(id, fields(json!({"species": "owl", "count": 3})));
        let value = serde_json::to_value(&obs).ok();
        assert_eq!(
            value,
            Some(json!({"_id": id.to_string(), "species": "owl", "count": 3}))
        );
    }

    #[test]
    fn deserializes_id_out_of_fields() {
        let id = ObservationId::new();
        let raw = json!({"_id": id.to_string(), "species": "owl"});
        let obs: Option<Observation> = serde_json::from_value(raw).ok();
        let obs = obs.unwrap_or_else(|| Observation::new(ObservationId::new(), Fields::new()));
        assert_eq!(obs.id, id);
        assert_eq!(obs.fields.len(), 1);
        assert_eq!(obs.get("species"), Some(&json!("owl")));
    }

    #[test]
    fn new_drops_caller_supplied_id() {
        let id = ObservationId::new();
        let obs = Observation::new(id, fields(json!({"_id": "forged", "a": 1})));
        assert_eq!(obs.id, id);
        assert!(obs.get(ID_FIELD).is_none());
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let mut obs = Observation::new(ObservationId::new(), fields(json!({"a": 1, "b": 2})));
        obs.merge(fields(json!({"b": 3})));
        assert_eq!(obs.fields, fields(json!({"a": 1, "b": 3})));
    }

    #[test]
    fn merge_stores_explicit_null() {
        let mut obs = Observation::new(ObservationId::new(), fields(json!({"a": 1})));
        obs.merge(fields(json!({"a": null})));
        assert_eq!(obs.get("a"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn merge_cannot_change_id() {
        let id = ObservationId::new();
        let mut obs = Observation::new(id, Fields::new());
        obs.merge(fields(json!({"_id": ObservationId::new().to_string()})));
        assert_eq!(obs.id, id);
        assert!(obs.fields.is_empty());
    }
}
