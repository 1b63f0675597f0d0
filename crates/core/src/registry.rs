use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::pincode::{PinCode, PinCodeError};

/// Label returned for any code without a registry entry.
pub const DEFAULT_UNASSIGNED_LABEL: &str = "Unassigned Center (Manual Verification)";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read registry file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse registry TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid registry key '{key}': {source}")]
    InvalidCode {
        key: String,
        source: PinCodeError,
    },
}

/// Immutable PIN-code → sorting-center mapping.
///
/// Lookup is total: every well-formed code resolves to a name, either an
/// explicit entry or the unassigned label. Built once and passed by
/// reference into `route` — there is no module-level singleton.
#[derive(Debug, Clone)]
pub struct Registry {
    centers: BTreeMap<PinCode, String>,
    unassigned_label: String,
}

/// On-disk registry format:
///
/// ```toml
/// unassigned_label = "Unassigned Center (Manual Verification)"
///
/// [centers]
/// 500001 = "Hyderabad GPO"
/// 110001 = "New Delhi GPO"
/// ```
#[derive(Debug, Deserialize)]
struct RegistryConfig {
    unassigned_label: Option<String>,
    #[serde(default)]
    centers: BTreeMap<String, String>,
}

impl Registry {
    pub fn new(
        centers: impl IntoIterator<Item = (PinCode, String)>,
        unassigned_label: impl Into<String>,
    ) -> Self {
        Self {
            centers: centers.into_iter().collect(),
            unassigned_label: unassigned_label.into(),
        }
    }

    /// The built-in demo mapping of metro GPO codes.
    pub fn demo() -> Self {
        let entries = [
            ("110001", "New Delhi GPO"),
            ("400001", "Mumbai GPO"),
            ("500001", "Hyderabad GPO"),
            ("560001", "Bengaluru GPO"),
            ("600001", "Chennai GPO"),
            ("700001", "Kolkata GPO"),
        ];
        Self {
            centers: entries
                .iter()
                .filter_map(|(code, name)| Some((code.parse().ok()?, name.to_string())))
                .collect(),
            unassigned_label: DEFAULT_UNASSIGNED_LABEL.to_string(),
        }
    }

    /// Load a registry from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, RegistryError> {
        let config: RegistryConfig = toml::from_str(text)?;
        let mut centers = BTreeMap::new();
        for (key, name) in config.centers {
            let pin = key.parse().map_err(|source| RegistryError::InvalidCode {
                key: key.clone(),
                source,
            })?;
            centers.insert(pin, name);
        }
        Ok(Self {
            centers,
            unassigned_label: config
                .unassigned_label
                .unwrap_or_else(|| DEFAULT_UNASSIGNED_LABEL.to_string()),
        })
    }

    /// Resolve a code to its sorting-center name.
    pub fn lookup(&self, pin: &PinCode) -> &str {
        self.centers
            .get(pin)
            .map(String::as_str)
            .unwrap_or(&self.unassigned_label)
    }

    pub fn contains(&self, pin: &PinCode) -> bool {
        self.centers.contains_key(pin)
    }

    pub fn unassigned_label(&self) -> &str {
        &self.unassigned_label
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(s: &str) -> PinCode {
        s.parse().unwrap()
    }

    #[test]
    fn lookup_known_code() {
        let registry = Registry::demo();
        assert_eq!(registry.lookup(&pin("500001")), "Hyderabad GPO");
        assert_eq!(registry.lookup(&pin("110001")), "New Delhi GPO");
    }

    #[test]
    fn lookup_unknown_code_is_unassigned_not_error() {
        let registry = Registry::demo();
        assert_eq!(registry.lookup(&pin("999999")), DEFAULT_UNASSIGNED_LABEL);
        assert_eq!(registry.lookup(&pin("000000")), DEFAULT_UNASSIGNED_LABEL);
    }

    #[test]
    fn custom_unassigned_label() {
        let registry = Registry::new([], "hold for review");
        assert_eq!(registry.lookup(&pin("123456")), "hold for review");
    }

    #[test]
    fn from_toml_str_full() {
        let text = r#"
            unassigned_label = "Hold Desk"

            [centers]
            500001 = "Hyderabad GPO"
            110001 = "New Delhi GPO"
        "#;
        let registry = Registry::from_toml_str(text).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup(&pin("500001")), "Hyderabad GPO");
        assert_eq!(registry.lookup(&pin("222222")), "Hold Desk");
    }

    #[test]
    fn from_toml_str_defaults_label() {
        let text = "[centers]\n600001 = \"Chennai GPO\"\n";
        let registry = Registry::from_toml_str(text).unwrap();
        assert_eq!(registry.unassigned_label(), DEFAULT_UNASSIGNED_LABEL);
    }

    #[test]
    fn from_toml_str_rejects_bad_key() {
        let text = "[centers]\n12345 = \"Too Short\"\n";
        let err = Registry::from_toml_str(text).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCode { .. }));
    }

    #[test]
    fn empty_config_is_valid() {
        let registry = Registry::from_toml_str("").unwrap();
        assert!(registry.is_empty());
        assert_eq!(registry.lookup(&pin("500001")), DEFAULT_UNASSIGNED_LABEL);
    }
}
