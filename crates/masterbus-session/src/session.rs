//! Session file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::SessionError;
use crate::params::ParamMap;
use crate::slots::SlotId;

/// A saved chain state: every parameter of the EQ and compressor as a
/// flat key-value table.
///
/// # TOML Format
///
/// ```toml
/// name = "Album Master"
/// description = "Gentle glue, bright top"
/// sample_rate = 48000
///
/// [params]
/// comp_thresh = -18.0
/// comp_ratio = 2.5
/// eq_b3_gain = 1.5
/// eq_out_gain = -0.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Name of the session.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint (defaults to 48000). Engines may run at a
    /// different rate; parameters are rate-independent.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Flat parameter table for the whole chain.
    #[serde(default)]
    pub params: ParamMap,

    /// Stored A/B/C/D slot snapshots, keyed by slot letter. Absent
    /// slots are simply not written.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slots: BTreeMap<String, ParamMap>,
}

fn default_sample_rate() -> u32 {
    48000
}

impl Session {
    /// Create a new empty session.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: 48000,
            params: ParamMap::new(),
            slots: BTreeMap::new(),
        }
    }

    /// Create a session with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the parameter table.
    pub fn with_params(mut self, params: ParamMap) -> Self {
        self.params = params;
        self
    }

    /// Store a slot snapshot.
    pub fn set_slot(&mut self, id: SlotId, snapshot: ParamMap) {
        self.slots.insert(id.as_str().to_string(), snapshot);
    }

    /// Look up a stored slot snapshot.
    pub fn slot(&self, id: SlotId) -> Option<&ParamMap> {
        self.slots.get(id.as_str())
    }

    /// Load a session from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| SessionError::read_file(path, e))?;
        let session: Session = toml::from_str(&content)?;
        Ok(session)
    }

    /// Load a session from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SessionError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the session to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| SessionError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the session to a TOML string.
    pub fn to_toml(&self) -> Result<String, SessionError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
