//! Conversion between declared state and the remote wire shapes.
//!
//! The remote set-requests recognize a different (and per category differing)
//! subset of the declared attributes. [`project_content`] projects a JSON
//! object onto a category's content shape: top-level attributes outside the
//! allow-list and fields the typed shape does not recognize, at any depth,
//! are silently dropped; recognized fields of the wrong shape are a hard
//! error.
//!
//! On read the remote API never reports "no customization" as absence.
//! Instead it returns the platform default flagged with `is_default`;
//! [`classify`] turns that flag into an explicit absent/override distinction.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum TranscodeError {
    #[snafu(display("text content does not match the category's content shape"))]
    MalformedContent { source: serde_json::Error },
}

/// Projects a JSON object onto a content shape.
///
/// Only top-level members named in `fields` are kept; everything else,
/// including the scope and identifier attributes, is dropped without error,
/// as are explicit nulls. The survivors are round-tripped through `T`, the
/// category's typed content shape: a recognized field of the wrong shape is
/// rejected, while fields `T` does not know, nested at any depth, fall away.
pub fn project_content<T>(
    mut content: Map<String, Value>,
    fields: &[&str],
) -> Result<Map<String, Value>, TranscodeError>
where
    T: DeserializeOwned + Serialize,
{
    content.retain(|name, value| fields.contains(&name.as_str()) && !value.is_null());

    let parsed: T =
        serde_json::from_value(Value::Object(content)).context(MalformedContentSnafu)?;
    let projected = serde_json::to_value(&parsed).context(MalformedContentSnafu)?;

    // Content shapes are structs, their JSON form is always an object.
    Ok(projected.as_object().cloned().unwrap_or_default())
}

/// The remote API's current value for one (category, scope) pair.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RemoteRecord {
    /// Set when no customization exists and the returned text is the
    /// platform's built-in default.
    pub is_default: bool,

    /// The category-specific text fields.
    #[serde(flatten)]
    pub content: Map<String, Value>,
}

/// What a fetched [`RemoteRecord`] means for reconciliation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Classification {
    /// No customization exists; the instance must be reported absent.
    Absent,

    /// A customization exists; its content is ready to merge into declared
    /// state.
    Override(Map<String, Value>),
}

/// Classifies a fetched record as platform default or override.
pub fn classify(record: RemoteRecord) -> Classification {
    if record.is_default {
        Classification::Absent
    } else {
        Classification::Override(record.content)
    }
}
