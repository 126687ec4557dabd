//! Loosely-typed configuration input
//!
//! A [`RawConfig`] maps section names to [`RawSection`]s, which map field
//! names to scalar [`RawValue`]s. Keys are matched ASCII case-insensitively
//! because environment sources lowercase everything they collect.

use crate::error::ConfigError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A single raw scalar, as delivered by a file or environment source
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => f.write_str(s),
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// Raw fields of one section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSection {
    fields: BTreeMap<String, RawValue>,
}

impl RawSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: &str, value: impl Into<RawValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Builder-style insert that skips `None`
    pub fn with_opt<V: Into<RawValue>>(mut self, field: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.insert(field, v);
        }
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<RawValue>) {
        self.fields.insert(field.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(&field.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Raw configuration tree: section name to (absent | raw fields)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfig {
    sections: BTreeMap<String, RawSection>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style section insert, replacing any existing section
    pub fn with_section(mut self, name: &str, section: RawSection) -> Self {
        self.sections.insert(name.to_ascii_lowercase(), section);
        self
    }

    /// Set one field, creating its section when needed
    pub fn set(&mut self, section: &str, field: &str, value: impl Into<RawValue>) {
        self.sections
            .entry(section.to_ascii_lowercase())
            .or_default()
            .insert(field, value);
    }

    /// Fields of `name`, or `None` when the section key is absent
    pub fn section(&self, name: &str) -> Option<&RawSection> {
        self.sections.get(&name.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl TryFrom<Value> for RawConfig {
    type Error = ConfigError;

    /// Convert a JSON-shaped tree. `null` anywhere counts as absent; sections
    /// must be objects and field values must be scalars.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let root = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(map) => map,
            other => {
                return Err(ConfigError::Load(format!(
                    "expected a table of sections, got {}",
                    json_type(&other)
                )));
            }
        };

        let mut raw = Self::new();
        for (section_name, section_value) in root {
            let fields = match section_value {
                Value::Null => continue,
                Value::Object(fields) => fields,
                other => {
                    return Err(ConfigError::Load(format!(
                        "{}: expected a table of fields, got {}",
                        section_name,
                        json_type(&other)
                    )));
                }
            };

            let mut section = RawSection::new();
            for (field_name, field_value) in fields {
                let value = match field_value {
                    Value::Null => continue,
                    Value::String(s) => RawValue::Text(s),
                    Value::Bool(b) => RawValue::Bool(b),
                    Value::Number(n) => match n.as_f64() {
                        Some(n) => RawValue::Number(n),
                        None => RawValue::Text(n.to_string()),
                    },
                    other => {
                        return Err(ConfigError::Load(format!(
                            "{}.{}: expected a scalar value, got {}",
                            section_name,
                            field_name,
                            json_type(&other)
                        )));
                    }
                };
                section.insert(&field_name, value);
            }
            raw.sections.insert(section_name.to_ascii_lowercase(), section);
        }

        Ok(raw)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut raw = RawConfig::new();
        raw.set("Server", "allowAnySite", "true");

        let section = raw.section("server").unwrap();
        assert_eq!(section.get("allowanysite"), Some(&RawValue::from("true")));
        assert_eq!(section.get("ALLOWANYSITE"), Some(&RawValue::from("true")));
    }

    #[test]
    fn test_from_json_scalars() {
        let raw = RawConfig::try_from(json!({
            "server": { "port": 9090, "cors": "a b", "trustProxy": true },
            "meta": { "description": null }
        }))
        .unwrap();

        let server = raw.section("server").unwrap();
        assert_eq!(server.get("port"), Some(&RawValue::Number(9090.0)));
        assert_eq!(server.get("cors"), Some(&RawValue::from("a b")));
        assert_eq!(server.get("trustProxy"), Some(&RawValue::Bool(true)));

        // present section, absent field
        let meta = raw.section("meta").unwrap();
        assert!(meta.is_empty());
    }

    #[test]
    fn test_null_section_is_absent() {
        let raw = RawConfig::try_from(json!({ "captcha": null })).unwrap();
        assert!(raw.section("captcha").is_none());
        assert!(raw.is_empty());
    }

    #[test]
    fn test_null_root_is_empty() {
        assert!(RawConfig::try_from(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_non_table_section_rejected() {
        let err = RawConfig::try_from(json!({ "server": 5 })).unwrap_err();
        assert!(err.to_string().contains("server: expected a table of fields"));
    }

    #[test]
    fn test_nested_field_rejected() {
        let err = RawConfig::try_from(json!({ "server": { "cors": ["a", "b"] } })).unwrap_err();
        assert!(err.to_string().contains("server.cors: expected a scalar value, got array"));
    }

    #[test]
    fn test_display_renders_raw_form() {
        assert_eq!(RawValue::Number(8080.0).to_string(), "8080");
        assert_eq!(RawValue::Number(1.5).to_string(), "1.5");
        assert_eq!(RawValue::Bool(false).to_string(), "false");
        assert_eq!(RawValue::from("abc").to_string(), "abc");
    }
}
