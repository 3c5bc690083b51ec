//! Module implementing the key-value dictionaries used to read and write connection parameters.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use itertools::Itertools;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::SynapseError;

/// The parameter names recognised by the connection models.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum StatusKey {
    Weight,
    Delay,
    DriftFactor,
    DiffusionFactor,
    /// In-memory footprint of the connection, in bytes (read-only).
    SizeOf,
    /// Resolved port on the target (read-only).
    Receptor,
    /// ID of the target node (read-only).
    Target,
    /// Name of the connection model (read-only).
    SynapseModel,
}

impl StatusKey {
    pub const ALL: [StatusKey; 8] = [
        StatusKey::Weight,
        StatusKey::Delay,
        StatusKey::DriftFactor,
        StatusKey::DiffusionFactor,
        StatusKey::SizeOf,
        StatusKey::Receptor,
        StatusKey::Target,
        StatusKey::SynapseModel,
    ];

    /// Returns the name of the key in a dictionary.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKey::Weight => "weight",
            StatusKey::Delay => "delay",
            StatusKey::DriftFactor => "drift_factor",
            StatusKey::DiffusionFactor => "diffusion_factor",
            StatusKey::SizeOf => "size_of",
            StatusKey::Receptor => "receptor",
            StatusKey::Target => "target",
            StatusKey::SynapseModel => "synapse_model",
        }
    }

    /// Returns the key with the provided name, if any.
    pub fn from_name(name: &str) -> Option<StatusKey> {
        StatusKey::ALL.into_iter().find(|key| key.as_str() == name)
    }

    /// Returns true if the key is reported by connections but never written from a dictionary.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            StatusKey::SizeOf | StatusKey::Receptor | StatusKey::Target | StatusKey::SynapseModel
        )
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dictionary of named values, used as status sink and source.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: Map<String, Value>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Dictionary::default()
    }

    /// Define the value of a known key, replacing the previous one.
    pub fn define<V: Into<Value>>(&mut self, key: StatusKey, value: V) {
        self.insert(key.as_str(), value);
    }

    /// Insert a value under an arbitrary name, replacing the previous one.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns a copy of the dictionary with the additional entry.
    pub fn with<V: Into<Value>>(mut self, key: StatusKey, value: V) -> Self {
        self.define(key, value);
        self
    }

    /// Returns true if the dictionary holds a value under the provided name.
    pub fn known(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns true if the dictionary holds a value for the provided key.
    pub fn contains(&self, key: StatusKey) -> bool {
        self.known(key.as_str())
    }

    /// Returns the raw value stored under the provided name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Extract the value of a key, if present.
    /// Returns an error if the stored value cannot be read as `T`.
    pub fn extract<T: DeserializeOwned>(&self, key: StatusKey) -> Result<Option<T>, SynapseError> {
        match self.entries.get(key.as_str()) {
            None => Ok(None),
            Some(value) => T::deserialize(value).map(Some).map_err(|e| {
                SynapseError::InvalidParameter(format!("{} = {}: {}", key, value, e))
            }),
        }
    }

    /// Extract the value of a key, or the provided current value if absent.
    pub fn extract_or<T: DeserializeOwned>(&self, key: StatusKey, current: T) -> Result<T, SynapseError> {
        Ok(self.extract(key)?.unwrap_or(current))
    }

    /// Returns an iterator over the names in the dictionary, in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|key| key.as_str()).sorted()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a dictionary from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, SynapseError> {
        serde_json::from_str(json).map_err(|e| SynapseError::InvalidParameter(e.to_string()))
    }

    /// Returns the dictionary as a JSON object.
    pub fn to_json(&self) -> String {
        Value::Object(self.entries.clone()).to_string()
    }

    /// Save the dictionary to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SynapseError> {
        let file = File::create(path).map_err(|e| SynapseError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| SynapseError::IOError(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| SynapseError::IOError(e.to_string()))
    }

    /// Load a dictionary from a JSON file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SynapseError> {
        let file = File::open(path).map_err(|e| SynapseError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| SynapseError::IOError(e.to_string()))
    }
}
