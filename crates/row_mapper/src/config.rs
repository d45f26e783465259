//! Mapper configuration.
//!
//! A mapper is described either by a bare list of field names or by a full
//! [`MapperConfig`] record. Both forms, plus a dynamic [`serde_json::Value`]
//! holding either of them, convert into a `MapperConfig` before the accessor
//! table is built.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MapperError;

/// Display name used when the configuration does not provide one.
pub const DEFAULT_CLASS_NAME: &str = "RowMapper";

/// Configuration for a mapper.
///
/// Deserialises from the camelCase record form:
///
/// ```json
/// { "headers": ["id", "name"], "className": "Person", "index": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperConfig {
    /// Ordered field names. Position `i` maps to offset `i` of each row.
    #[serde(default)]
    pub headers: Option<Vec<String>>,
    /// Display name of the generated descriptor.
    #[serde(default = "default_class_name")]
    pub class_name: String,
    /// Expose the reserved `index` pseudo-field (row position).
    #[serde(default = "enabled")]
    pub index: bool,
    /// Expose the reserved `array` pseudo-field (the backing sequence).
    #[serde(default = "enabled")]
    pub array: bool,
    /// When set, the first occurrence of a duplicated name wins for named
    /// access instead of the last.
    #[serde(default)]
    pub prevent_collisions: bool,
}

fn default_class_name() -> String {
    DEFAULT_CLASS_NAME.to_string()
}

fn enabled() -> bool {
    true
}

impl MapperConfig {
    /// Create a config for the given field names with every other option at
    /// its default.
    #[must_use]
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: Some(headers.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Override the descriptor's display name.
    #[must_use]
    pub fn with_class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = name.into();
        self
    }

    /// Toggle the reserved `index` pseudo-field.
    #[must_use]
    pub fn with_index(mut self, enabled: bool) -> Self {
        self.index = enabled;
        self
    }

    /// Toggle the reserved `array` pseudo-field.
    #[must_use]
    pub fn with_array(mut self, enabled: bool) -> Self {
        self.array = enabled;
        self
    }

    /// Select first-wins (`true`) or last-wins (`false`) for duplicate names.
    #[must_use]
    pub fn with_prevent_collisions(mut self, enabled: bool) -> Self {
        self.prevent_collisions = enabled;
        self
    }

    /// The configured field names.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::Configuration`] if no field list was supplied.
    pub fn headers(&self) -> Result<&[String], MapperError> {
        self.headers
            .as_deref()
            .ok_or_else(|| MapperError::Configuration("`headers` is missing".to_string()))
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            headers: None,
            class_name: default_class_name(),
            index: true,
            array: true,
            prevent_collisions: false,
        }
    }
}

impl From<Vec<String>> for MapperConfig {
    fn from(headers: Vec<String>) -> Self {
        Self::new(headers)
    }
}

impl From<Vec<&str>> for MapperConfig {
    fn from(headers: Vec<&str>) -> Self {
        Self::new(headers)
    }
}

impl From<&[&str]> for MapperConfig {
    fn from(headers: &[&str]) -> Self {
        Self::new(headers.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for MapperConfig {
    fn from(headers: [&str; N]) -> Self {
        Self::new(headers)
    }
}

/// Dynamic configuration: an array is taken as the field list, an object as
/// the full record. Anything else is rejected.
impl TryFrom<Value> for MapperConfig {
    type Error = MapperError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let invalid = |e: serde_json::Error| MapperError::Configuration(e.to_string());
        match value {
            Value::Array(items) => Ok(Self::new(field_names(items)?)),
            Value::Object(mut record) => {
                if let Some(Value::Array(items)) = record.get_mut("headers") {
                    let names = field_names(std::mem::take(items))?;
                    *items = names.into_iter().map(Value::String).collect();
                }
                serde_json::from_value(Value::Object(record)).map_err(invalid)
            }
            other => Err(MapperError::Configuration(format!(
                "expected an array of names or a configuration object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Scalar names are rendered as text; `["id", 3]` names its second column `"3"`.
fn field_names(items: Vec<Value>) -> Result<Vec<String>, MapperError> {
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| match item {
            Value::String(name) => Ok(name),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(MapperError::InvalidFieldName {
                position,
                found: json_kind(&other),
            }),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
