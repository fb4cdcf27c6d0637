//! Coercion of raw field input into stored text.
//!
//! Contact columns are text. Callers hand over whatever a form or a
//! spreadsheet produced: nothing, a single scalar, or the selection list of a
//! multi-select control. [`normalize`] turns each of those into the string
//! that is persisted.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::field::ContactField;

/// Separator used when flattening a multi-valued input.
pub const LIST_SEPARATOR: &str = ", ";

/// A single scalar input value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{}", value),
            Scalar::Integer(value) => write!(f, "{}", value),
            Scalar::Decimal(value) => write!(f, "{}", value),
            Scalar::Text(value) => f.write_str(value),
        }
    }
}

/// Raw input for one field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value supplied.
    #[default]
    Absent,
    /// A single scalar.
    One(Scalar),
    /// A multi-select result, in selection order.
    Many(Vec<Scalar>),
}

/// Normalize a raw value into its stored text form.
///
/// Absent values become the empty string and lists are joined with `", "`.
pub fn normalize(value: &FieldValue) -> String {
    match value {
        FieldValue::Absent => String::new(),
        FieldValue::One(scalar) => scalar.to_string(),
        FieldValue::Many(items) => items
            .iter()
            .map(Scalar::to_string)
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::One(Scalar::Text(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::One(Scalar::Text(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::One(Scalar::Integer(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::One(Scalar::Integer(value.into()))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::One(Scalar::Decimal(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::One(Scalar::Bool(value))
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::Many(
            values
                .into_iter()
                .map(|v| Scalar::Text(v.to_string()))
                .collect(),
        )
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Many(values.into_iter().map(Scalar::Text).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Absent)
    }
}

/// A mapping of recognized contact fields to raw values.
///
/// Built from arbitrary `(name, value)` pairs; names that are not recognized
/// contact fields are dropped on construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FieldMap(BTreeMap<ContactField, FieldValue>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from named pairs, ignoring unrecognized names.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let mut map = Self::new();
        for (name, value) in pairs {
            match ContactField::from_str(name.as_ref()) {
                Some(field) => {
                    map.0.insert(field, value.into());
                }
                None => tracing::debug!(field = name.as_ref(), "Ignoring unrecognized field"),
            }
        }
        map
    }

    /// Builder-style insert.
    pub fn with(mut self, field: ContactField, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: ContactField, value: impl Into<FieldValue>) {
        self.0.insert(field, value.into());
    }

    pub fn get(&self, field: ContactField) -> Option<&FieldValue> {
        self.0.get(&field)
    }

    /// Normalized text for a field, empty when the field is not present.
    pub fn text(&self, field: ContactField) -> String {
        self.get(field).map(normalize).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactField, &FieldValue)> {
        self.0.iter().map(|(field, value)| (*field, value))
    }

    /// Whether the record carries a name or a phone number.
    ///
    /// Records with neither cannot be messaged or told apart; callers check
    /// this before creating a contact.
    pub fn is_identifiable(&self) -> bool {
        [ContactField::Name, ContactField::Phone]
            .into_iter()
            .any(|field| !self.text(field).trim().is_empty())
    }
}

// Values under unrecognized keys are skipped without being parsed, so any
// JSON shape is accepted there.
impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of contact fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
                let mut map = FieldMap::new();
                while let Some(name) = access.next_key::<String>()? {
                    match ContactField::from_str(&name) {
                        Some(field) => map.insert(field, access.next_value::<FieldValue>()?),
                        None => {
                            access.next_value::<IgnoredAny>()?;
                            tracing::debug!(field = %name, "Ignoring unrecognized field");
                        }
                    }
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

impl FromIterator<(ContactField, FieldValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (ContactField, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_shapes() {
        assert_eq!(normalize(&FieldValue::Absent), "");
        assert_eq!(normalize(&"Jane Doe".into()), "Jane Doe");
        assert_eq!(normalize(&3i64.into()), "3");
        assert_eq!(normalize(&2.5f64.into()), "2.5");
        assert_eq!(normalize(&true.into()), "true");
        assert_eq!(
            normalize(&vec!["Luna", "GRW", "NRM"].into()),
            "Luna, GRW, NRM"
        );
        assert_eq!(normalize(&FieldValue::Many(vec![])), "");
        assert_eq!(normalize(&Option::<&str>::None.into()), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs: Vec<FieldValue> = vec![
            FieldValue::Absent,
            "  padded ".into(),
            42i64.into(),
            0.1f64.into(),
            vec!["b", "a"].into(),
        ];

        for input in inputs {
            let once = normalize(&input);
            let twice = normalize(&once.clone().into());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_field_map_ignores_unknown_names() {
        let map = FieldMap::from_pairs([
            ("name", FieldValue::from("Jane")),
            ("shoe_size", FieldValue::from(9i64)),
            ("E-mail", FieldValue::from("jane@example.com")),
        ]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.text(ContactField::Email), "jane@example.com");
        assert_eq!(map.text(ContactField::Phone), "");
    }

    #[test]
    fn test_field_map_from_json() {
        let map: FieldMap = serde_json::from_str(
            r#"{"name": "Jane", "level": 3, "interest": ["Luna", "GRW"], "notes": null, "unknown": 1}"#,
        )
        .unwrap();

        assert_eq!(map.len(), 4);
        assert_eq!(map.get(ContactField::Level), Some(&FieldValue::from(3i64)));
        assert_eq!(map.text(ContactField::Interest), "Luna, GRW");
        assert_eq!(map.get(ContactField::Notes), Some(&FieldValue::Absent));
    }

    #[test]
    fn test_field_map_skips_nested_unknown_values() {
        let map: FieldMap = serde_json::from_str(
            r#"{"meta": {"source": "form", "tags": [1, {"deep": true}]}, "name": "Jane", "extra": [[1]]}"#,
        )
        .unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.text(ContactField::Name), "Jane");
    }

    #[test]
    fn test_is_identifiable() {
        assert!(!FieldMap::new().is_identifiable());
        assert!(!FieldMap::new()
            .with(ContactField::Name, "   ")
            .is_identifiable());
        assert!(FieldMap::new()
            .with(ContactField::Phone, "0821234567")
            .is_identifiable());
    }
}
