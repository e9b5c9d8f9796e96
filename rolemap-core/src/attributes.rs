use crate::{Result, RoleError};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

/// Top-level key that holds the subsystem sections of an environment document.
pub const DEFAULT_ATTRIBUTES_KEY: &str = "default_attributes";

/// The subsystem sections the resolvers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    ComputeFabric,
    ObjectStorage,
    Monitoring,
    NetworkOverlay,
}

impl Subsystem {
    pub fn key(self) -> &'static str {
        match self {
            Subsystem::ComputeFabric => "eucalyptus",
            Subsystem::ObjectStorage => "riakcs_cluster",
            Subsystem::Monitoring => "ceph",
            Subsystem::NetworkOverlay => "midokura",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Read-only view over the attributes of a parsed environment document.
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    attributes: Map<String, Value>,
}

impl AttributeStore {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    /// Extracts the attributes stored under `key` in a parsed document.
    pub fn from_document(document: Value, key: &str) -> Result<Self> {
        let Value::Object(mut root) = document else {
            return Err(RoleError::Config(
                "environment document must be a mapping".to_string(),
            ));
        };

        match root.remove(key) {
            Some(Value::Object(attributes)) => Ok(Self::new(attributes)),
            Some(Value::Null) => Ok(Self::default()),
            Some(_) => Err(RoleError::Config(format!(
                "'{}' must be a mapping of subsystem sections",
                key
            ))),
            None => Err(RoleError::Config(format!(
                "environment document has no '{}' key",
                key
            ))),
        }
    }

    /// Parses a YAML (or JSON) environment document.
    pub fn from_yaml_str(text: &str, key: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(text)?;
        Self::from_document(document, key)
    }

    pub fn from_path(path: impl AsRef<Path>, key: &str) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded environment document from {:?}", path);
        Self::from_yaml_str(&text, key)
    }

    /// Returns the section for `subsystem`, or `None` when the document does
    /// not configure it. Null and empty sections count as not configured.
    pub fn section(&self, subsystem: Subsystem) -> Option<&Value> {
        self.attributes
            .get(subsystem.key())
            .filter(|value| is_truthy(value))
    }

    /// Deserializes the section for `subsystem` into its typed shape.
    pub(crate) fn decode_section<'a, T>(&'a self, subsystem: Subsystem) -> Result<Option<T>>
    where
        T: Deserialize<'a>,
    {
        let Some(section) = self.section(subsystem) else {
            return Ok(None);
        };

        T::deserialize(section)
            .map(Some)
            .map_err(|error| RoleError::malformed(subsystem, error))
    }

    /// True when a top-level attribute is set to a non-empty value.
    pub fn has_flag(&self, key: &str) -> bool {
        self.attributes.get(key).is_some_and(is_truthy)
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}
