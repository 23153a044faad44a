//! Configuration sources and their parsed documents

use std::fmt;
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::host::{SourceStore, decode_source};
use crate::{Error, Result};

/// Where a configuration document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A file on disk.
    File(PathBuf),
    /// A named entry in the host's virtual source store (base64 payload).
    Virtual(String),
}

impl ConfigSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Read and parse the source.
    ///
    /// Returns `Ok(None)` when the source is absent. A source that exists
    /// but cannot be read, decoded or parsed is an error.
    pub fn load(&self, store: &dyn SourceStore) -> Result<Option<ConfigDocument>> {
        let origin = self.to_string();
        let text = match self {
            Self::File(path) => jx_fs::read_optional_text(path).map_err(|source| {
                Error::SourceUnreadable {
                    origin: origin.clone(),
                    source,
                }
            })?,
            Self::Virtual(name) => {
                if !store.exists_source(name) {
                    None
                } else {
                    let payload = store.read_source(name).unwrap_or_default();
                    Some(decode_source(name, &payload)?)
                }
            }
        };

        text.map(|text| ConfigDocument::parse(&text, &origin))
            .transpose()
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Virtual(name) => write!(f, "virtual:{name}"),
        }
    }
}

/// A parsed configuration document.
///
/// Only top-level keys matter. Keys holding `null` are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    entries: Map<String, Value>,
}

impl ConfigDocument {
    /// Parse JSON text.
    ///
    /// An object is used as-is. The literal `null` is rejected. Any other
    /// JSON value carries no keys and parses to an empty document.
    ///
    /// # Example
    ///
    /// ```
    /// use jx_config::ConfigDocument;
    ///
    /// let doc = ConfigDocument::parse(r#"{"maxCPU": 50, "maxMemory": null}"#, "inline").unwrap();
    /// assert!(doc.get("maxCPU").is_some());
    /// assert!(doc.get("maxMemory").is_none());
    /// ```
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|source| Error::SourceCorrupt {
            origin: origin.to_string(),
            source,
        })?;

        match value {
            Value::Object(entries) => Ok(Self { entries }),
            Value::Null => Err(Error::SourceNull {
                origin: origin.to_string(),
            }),
            other => {
                tracing::debug!(origin, kind = json_kind(&other), "Document is not an object");
                Ok(Self::default())
            }
        }
    }

    /// Value for `key` when present and non-null.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).filter(|value| !value.is_null())
    }

    /// All top-level keys, including unrecognized ones.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
