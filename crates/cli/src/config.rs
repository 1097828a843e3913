//! `phasegate.toml` configuration: the field registry and gate defaults.
//!
//! # Example
//!
//! ```toml
//! [gate]
//! default_message = "Requirements not met to advance to this stage"
//!
//! [[fields]]
//! path = "track.notes"
//! type = "text"
//! label = "Track notes"
//!
//! [[fields]]
//! path = "deal.volume"
//! type = "number"
//! label = "Master deal volume"
//! ```
//!
//! Fields are declared as an array of tables so that their order (the
//! order of rule editor pickers) is preserved. A config without any
//! `[[fields]]` entry uses the built-in registry.

use std::path::Path;

use phasegate_eval::{FieldRegistry, TransitionGate};
use phasegate_interchange::FieldRecord;
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "phasegate.toml";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub gate: GateSettings,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

/// `[gate]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct GateSettings {
    /// Message shown when a blocking rule carries a blank one.
    pub default_message: Option<String>,
}

/// One `[[fields]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FieldEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: Option<String>,
}

/// Resolved configuration: the registry and gate the commands use.
#[derive(Debug, Clone)]
pub(crate) struct GateConfig {
    pub gate: TransitionGate,
}

impl GateConfig {
    /// Load from `explicit`, else from `./phasegate.toml` if present, else
    /// fall back to the built-in registry.
    pub(crate) fn resolve(explicit: Option<&Path>) -> Result<GateConfig, String> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load(path)
                } else {
                    Ok(GateConfig {
                        gate: TransitionGate::default(),
                    })
                }
            }
        }
    }

    fn load(path: &Path) -> Result<GateConfig, String> {
        let file = read_config_file(path)?;
        tracing::debug!(path = %path.display(), fields = file.fields.len(), "loaded config");
        Self::from_file(file).map_err(|e| format!("invalid config '{}': {}", path.display(), e))
    }

    pub(crate) fn from_file(file: ConfigFile) -> Result<GateConfig, String> {
        let registry = if file.fields.is_empty() {
            FieldRegistry::builtin()
        } else {
            let records: Vec<FieldRecord> = file
                .fields
                .into_iter()
                .map(|entry| FieldRecord {
                    label: entry.label.unwrap_or_else(|| entry.path.clone()),
                    path: entry.path,
                    field_type: entry.field_type,
                })
                .collect();
            FieldRegistry::from_records(&records).map_err(|e| e.to_string())?
        };

        let mut gate = TransitionGate::new(registry);
        if let Some(message) = file.gate.default_message {
            gate = gate.with_default_message(message);
        }
        Ok(GateConfig { gate })
    }

    pub(crate) fn registry(&self) -> &FieldRegistry {
        self.gate.registry()
    }
}

/// Read and parse a config TOML file from `path`.
pub(crate) fn read_config_file(path: &Path) -> Result<ConfigFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}
