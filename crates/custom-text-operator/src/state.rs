//! The declared-state attribute bag.
//!
//! The host tool hands every lifecycle operation a typed bag of named
//! attributes. Scalars can be null (explicitly unset) or unknown (not yet
//! resolved by the host), and the accessors on [`AttributeBag`] treat both as
//! absent.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// A single attribute value inside an [`AttributeBag`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttributeValue {
    /// Explicitly unset.
    Null,

    /// Not yet resolved by the host, e.g. because it is derived from another
    /// declaration that has not been reconciled.
    Unknown,

    String(String),
    Bool(bool),
    Int64(i64),
    Object(BTreeMap<String, AttributeValue>),
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Returns the contained string, or [`None`] for every other variant
    /// (including [`Null`](Self::Null) and [`Unknown`](Self::Unknown)).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// The JSON rendition of this value. Unknown values have no JSON
    /// counterpart and yield [`None`]; so do unknown members nested inside
    /// objects and lists.
    fn to_json(&self) -> Option<Value> {
        match self {
            Self::Null => Some(Value::Null),
            Self::Unknown => None,
            Self::String(value) => Some(Value::String(value.clone())),
            Self::Bool(value) => Some(Value::Bool(*value)),
            Self::Int64(value) => Some(Value::from(*value)),
            Self::Object(attributes) => Some(Value::Object(
                attributes
                    .iter()
                    .filter_map(|(name, value)| Some((name.clone(), value.to_json()?)))
                    .collect(),
            )),
            Self::List(elements) => Some(Value::Array(
                elements.iter().filter_map(Self::to_json).collect(),
            )),
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(*value),
            // Remote text payloads only carry integral numbers; anything else
            // degrades to null rather than a lossy conversion.
            Value::Number(number) => number.as_i64().map_or(Self::Null, Self::Int64),
            Value::String(value) => Self::String(value.clone()),
            Value::Array(elements) => Self::List(elements.iter().map(Self::from_json).collect()),
            Value::Object(members) => Self::Object(
                members
                    .iter()
                    .map(|(name, value)| (name.clone(), Self::from_json(value)))
                    .collect(),
            ),
        }
    }
}

/// The typed attribute map backing one resource instance's declared state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AttributeBag {
    attributes: BTreeMap<String, AttributeValue>,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(name.into(), value);
    }

    /// Returns the named attribute as a string. Absent, null and unknown
    /// attributes all yield [`None`].
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(AttributeValue::as_str)
    }

    pub fn set_string(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes
            .insert(name.into(), AttributeValue::String(value.into()));
    }

    /// The JSON object view of this bag, used to build remote request
    /// payloads. Unknown attributes are omitted, null attributes are kept as
    /// JSON null.
    pub fn to_json_object(&self) -> Map<String, Value> {
        self.attributes
            .iter()
            .filter_map(|(name, value)| Some((name.clone(), value.to_json()?)))
            .collect()
    }

    /// Overwrites the named attributes with values fetched from the remote
    /// record. Attributes not present in `content` are left untouched.
    pub fn merge_json_object(&mut self, content: &Map<String, Value>) {
        for (name, value) in content {
            self.attributes
                .insert(name.clone(), AttributeValue::from_json(value));
        }
    }
}

impl FromIterator<(String, AttributeValue)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn null_and_unknown_scalars_read_as_absent() {
        let mut bag = AttributeBag::new();
        bag.set("title", AttributeValue::Null);
        bag.set("greeting", AttributeValue::Unknown);
        bag.set_string("text", "Welcome");

        assert_eq!(bag.get_string("title"), None);
        assert_eq!(bag.get_string("greeting"), None);
        assert_eq!(bag.get_string("missing"), None);
        assert_eq!(bag.get_string("text"), Some("Welcome"));
    }

    #[test]
    fn json_view_omits_unknown_but_keeps_null() {
        let mut bag = AttributeBag::new();
        bag.set("title", AttributeValue::Null);
        bag.set("greeting", AttributeValue::Unknown);
        bag.set_string("text", "Welcome");
        bag.set(
            "login_text",
            AttributeValue::Object(BTreeMap::from([
                ("title".to_owned(), AttributeValue::String("Login".to_owned())),
                ("description".to_owned(), AttributeValue::Unknown),
            ])),
        );

        let object = bag.to_json_object();
        assert_eq!(
            Value::Object(object),
            json!({
                "title": null,
                "text": "Welcome",
                "login_text": { "title": "Login" },
            })
        );
    }

    #[test]
    fn merge_overwrites_named_attributes_only() {
        let mut bag = AttributeBag::new();
        bag.set_string("text", "Welcome");
        bag.set_string("language", "en");

        let content = json!({ "text": "Hello", "subject": "Greetings" });
        let Value::Object(content) = content else {
            unreachable!()
        };
        bag.merge_json_object(&content);

        assert_eq!(bag.get_string("text"), Some("Hello"));
        assert_eq!(bag.get_string("subject"), Some("Greetings"));
        assert_eq!(bag.get_string("language"), Some("en"));
    }

    #[test]
    fn merge_preserves_nested_structure() {
        let mut bag = AttributeBag::new();
        let content = json!({
            "login_text": { "title": "Login", "next_button_text": "Next" },
            "flag": true,
            "attempts": 3,
        });
        let Value::Object(content) = content else {
            unreachable!()
        };
        bag.merge_json_object(&content);

        assert_eq!(
            bag.get("login_text"),
            Some(&AttributeValue::Object(BTreeMap::from([
                ("title".to_owned(), AttributeValue::String("Login".to_owned())),
                (
                    "next_button_text".to_owned(),
                    AttributeValue::String("Next".to_owned())
                ),
            ])))
        );
        assert_eq!(bag.get("flag"), Some(&AttributeValue::Bool(true)));
        assert_eq!(bag.get("attempts"), Some(&AttributeValue::Int64(3)));
    }
}
