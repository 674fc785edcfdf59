//! Run configuration and packaged defaults.

use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::math::MathSpec;

/// A scalar configuration entry.
///
/// Untagged: booleans are listed before numbers so YAML `true` stays a flag
/// instead of being read as a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Flag(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Flat mapping of run configuration entries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RunConfig {
    entries: IndexMap<String, ConfigValue>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.entries.insert(key.into(), value);
    }

    /// Name of the backend to export with.
    pub fn backend(&self) -> &str {
        self.get("backend").and_then(ConfigValue::as_str).unwrap_or("lp")
    }

    /// Overlay `other` on top of `self`: same-key entries are replaced.
    pub fn merged_with(&self, other: &RunConfig) -> RunConfig {
        let mut merged = self.clone();
        for (key, value) in &other.entries {
            merged.entries.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Packaged model defaults: base configuration, parameter fallbacks, and the
/// base math every definition extends.
#[derive(Debug, Clone, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub config: RunConfig,
    #[serde(default)]
    pub parameters: IndexMap<String, f64>,
    #[serde(default)]
    pub math: MathSpec,
}

/// Packaged defaults, parsed once per process on first use.
pub fn defaults() -> &'static Defaults {
    static DEFAULTS: OnceLock<Defaults> = OnceLock::new();
    DEFAULTS.get_or_init(|| {
        serde_yaml::from_str(include_str!("defaults.yaml"))
            .expect("packaged defaults.yaml is well formed")
    })
}

#[cfg(test)]
mod tests {
    use super::{defaults, ConfigValue, RunConfig};

    #[test]
    fn packaged_defaults_parse() {
        let base = defaults();
        assert_eq!(base.config.backend(), "lp");
        assert!(base.math.variables.contains_key("flow_cap"));
        assert_eq!(base.parameters["flow_cap_max"], f64::INFINITY);
    }

    #[test]
    fn config_values_deserialize_by_shape() {
        let config: RunConfig =
            serde_yaml::from_str("backend: lp\nbigM: 1e6\nensure_feasibility: false").unwrap();
        assert_eq!(config.get("backend").unwrap().as_str(), Some("lp"));
        assert_eq!(config.get("bigM").unwrap().as_f64(), Some(1e6));
        assert_eq!(
            config.get("ensure_feasibility").unwrap().as_bool(),
            Some(false)
        );
    }

    #[test]
    fn merged_with_replaces_same_key_entries() {
        let mut base = RunConfig::new();
        base.set("backend", ConfigValue::Text("lp".to_string()));
        base.set("bigM", ConfigValue::Number(1e6));

        let mut overlay = RunConfig::new();
        overlay.set("bigM", ConfigValue::Number(500.0));

        let merged = base.merged_with(&overlay);
        assert_eq!(merged.get("bigM").unwrap().as_f64(), Some(500.0));
        assert_eq!(merged.get("backend").unwrap().as_str(), Some("lp"));
        assert_eq!(merged.len(), 2);
    }
}
