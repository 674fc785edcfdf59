//! Raw definition documents and their typed form.
//!
//! A definition is loaded in two stages. [`RawDefinition`] keeps the YAML
//! document untyped while scenarios and overrides are merged into it, because
//! overrides address arbitrary paths that a typed struct cannot anticipate.
//! [`RawDefinition::parse`] then produces the typed [`ModelDefinition`] the
//! assembly step works from.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::config::RunConfig;
use crate::error::ModelError;
use crate::math::MathSpec;

/// A value attached to a technology or node-technology entry.
///
/// Untagged: booleans before numbers before text, so YAML scalars land on
/// the matching variant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Flat mapping of technology entries: numeric parameters alongside
/// classification strings such as `base_tech`.
pub type TechDef = IndexMap<String, ParamValue>;

/// Technologies present at a node, each with optional parameter overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NodeDef {
    #[serde(default)]
    pub techs: IndexMap<String, Option<TechDef>>,
}

/// An inline timeseries table: ordered timestep labels plus named columns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeseriesTable {
    pub index: Vec<String>,
    pub columns: IndexMap<String, Vec<f64>>,
}

impl TimeseriesTable {
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Every column must carry one value per index entry.
    pub fn validate(&self) -> Result<(), ModelError> {
        for values in self.columns.values() {
            if values.len() != self.index.len() {
                return Err(ModelError::ShapeMismatch {
                    expected: self.index.len(),
                    actual: values.len(),
                });
            }
        }
        Ok(())
    }
}

/// Typed view of a definition document after overrides are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub config: RunConfig,
    #[serde(default)]
    pub techs: IndexMap<String, TechDef>,
    #[serde(default)]
    pub nodes: IndexMap<String, NodeDef>,
    #[serde(default)]
    pub timesteps: Vec<String>,
    #[serde(default)]
    pub data_tables: IndexMap<String, TimeseriesTable>,
    #[serde(default)]
    pub math: MathSpec,
}

/// Split a `df=<table>:<column>` timeseries reference.
///
/// Returns `Ok(None)` when `value` is not a reference at all.
pub fn parse_series_ref(value: &str) -> Result<Option<(&str, &str)>, ModelError> {
    let Some(rest) = value.strip_prefix("df=") else {
        return Ok(None);
    };
    match rest.split_once(':') {
        Some((table, column)) if !table.is_empty() && !column.is_empty() => {
            Ok(Some((table, column)))
        }
        _ => Err(ModelError::BadSeriesRef {
            value: value.to_string(),
        }),
    }
}

/// An untyped definition document with scenario and override merging.
#[derive(Debug, Clone)]
pub struct RawDefinition {
    document: Mapping,
}

impl RawDefinition {
    pub fn from_str(text: &str) -> Result<Self, ModelError> {
        let document: Value = serde_yaml::from_str(text).map_err(|err| ModelError::Yaml {
            context: "model definition".to_string(),
            message: err.to_string(),
        })?;
        let Value::Mapping(document) = document else {
            return Err(ModelError::Yaml {
                context: "model definition".to_string(),
                message: "top level must be a mapping".to_string(),
            });
        };
        Ok(Self { document })
    }

    /// Apply a named scenario, or a bare override name, returning the names
    /// of the overrides applied in order.
    pub fn apply_scenario(&mut self, name: &str) -> Result<Vec<String>, ModelError> {
        let scenario = self
            .document
            .get(&yaml_key("scenarios"))
            .and_then(Value::as_mapping)
            .and_then(|scenarios| scenarios.get(&yaml_key(name)))
            .cloned();
        let names: Vec<String> = match scenario {
            Some(Value::Sequence(entries)) => entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(_) => {
                return Err(ModelError::Yaml {
                    context: format!("scenario '{name}'"),
                    message: "must be a list of override names".to_string(),
                })
            }
            // not a scenario, try it as a single override
            None => vec![name.to_string()],
        };
        for override_name in &names {
            self.apply_named_override(override_name)?;
        }
        tracing::debug!(
            component = "definition",
            operation = "apply_scenario",
            status = "success",
            scenario = name,
            overrides = names.len(),
            "Scenario applied"
        );
        Ok(names)
    }

    fn apply_named_override(&mut self, name: &str) -> Result<(), ModelError> {
        let fragment = self
            .document
            .get(&yaml_key("overrides"))
            .and_then(Value::as_mapping)
            .and_then(|overrides| overrides.get(&yaml_key(name)))
            .cloned();
        match fragment {
            Some(Value::Mapping(fragment)) => merge_fragment(&mut self.document, &fragment),
            Some(_) => Err(ModelError::Yaml {
                context: format!("override '{name}'"),
                message: "must be a mapping".to_string(),
            }),
            None => Err(ModelError::UnknownScenario {
                name: name.to_string(),
            }),
        }
    }

    /// Apply one dotted-path override.
    pub fn apply_override_value(&mut self, path: &str, value: Value) -> Result<(), ModelError> {
        set_dotted(&mut self.document, path, value)
    }

    /// Typed deserialization of the merged document.
    pub fn parse(self) -> Result<ModelDefinition, ModelError> {
        serde_yaml::from_value(Value::Mapping(self.document)).map_err(|err| ModelError::Yaml {
            context: "model definition".to_string(),
            message: err.to_string(),
        })
    }
}

fn yaml_key(text: &str) -> Value {
    Value::String(text.to_string())
}

/// Merge `fragment` into `target`. String keys containing dots are applied as
/// paths, nested mappings merge recursively, anything else replaces.
fn merge_fragment(target: &mut Mapping, fragment: &Mapping) -> Result<(), ModelError> {
    for (key, value) in fragment {
        if let Some(path) = key.as_str().filter(|text| text.contains('.')) {
            set_dotted(target, path, value.clone())?;
            continue;
        }
        match (target.get_mut(key), value) {
            (Some(Value::Mapping(existing)), Value::Mapping(incoming)) => {
                merge_fragment(existing, incoming)?;
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(())
}

/// Set `value` at a dotted `path`, creating intermediate mappings as needed.
/// Null entries count as absent, so a path can descend through a technology
/// listed without overrides.
fn set_dotted(target: &mut Mapping, path: &str, value: Value) -> Result<(), ModelError> {
    let mut segments: Vec<&str> = path.split('.').collect();
    let leaf = match segments.pop() {
        Some(leaf) if !leaf.is_empty() && segments.iter().all(|s| !s.is_empty()) => leaf,
        _ => {
            return Err(ModelError::OverridePath {
                path: path.to_string(),
            })
        }
    };
    let mut current = target;
    for segment in segments {
        let key = yaml_key(segment);
        let absent = matches!(current.get(&key), None | Some(Value::Null));
        if absent {
            current.insert(key.clone(), Value::Mapping(Mapping::new()));
        }
        match current.get_mut(&key) {
            Some(Value::Mapping(next)) => current = next,
            _ => {
                return Err(ModelError::OverridePath {
                    path: path.to_string(),
                })
            }
        }
    }
    current.insert(yaml_key(leaf), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_series_ref, RawDefinition};
    use serde_yaml::Value;

    const DOC: &str = r#"
name: demo
techs:
  boiler:
    flow_cap_max: 10
nodes:
  a:
    techs:
      boiler:
overrides:
  bigger:
    techs.boiler.flow_cap_max: 20
  renamed:
    name: demo-renamed
scenarios:
  expanded: [bigger, renamed]
"#;

    #[test]
    fn dotted_override_replaces_leaf() {
        let mut raw = RawDefinition::from_str(DOC).unwrap();
        raw.apply_override_value("techs.boiler.flow_cap_max", Value::from(7.0))
            .unwrap();
        let definition = raw.parse().unwrap();
        assert_eq!(
            definition.techs["boiler"]["flow_cap_max"].as_number(),
            Some(7.0)
        );
    }

    #[test]
    fn dotted_override_descends_through_null_entries() {
        let mut raw = RawDefinition::from_str(DOC).unwrap();
        raw.apply_override_value("nodes.a.techs.boiler.flow_cap_max", Value::from(3.0))
            .unwrap();
        let definition = raw.parse().unwrap();
        let overrides = definition.nodes["a"].techs["boiler"].as_ref().unwrap();
        assert_eq!(overrides["flow_cap_max"].as_number(), Some(3.0));
    }

    #[test]
    fn dotted_override_rejects_paths_through_scalars() {
        let mut raw = RawDefinition::from_str(DOC).unwrap();
        let err = raw
            .apply_override_value("techs.boiler.flow_cap_max.deep", Value::from(1.0))
            .unwrap_err();
        assert_eq!(err.code(), "OVERRIDE_BAD_PATH");

        let err = raw
            .apply_override_value("techs..boiler", Value::from(1.0))
            .unwrap_err();
        assert_eq!(err.code(), "OVERRIDE_BAD_PATH");
    }

    #[test]
    fn scenario_applies_overrides_in_order() {
        let mut raw = RawDefinition::from_str(DOC).unwrap();
        let applied = raw.apply_scenario("expanded").unwrap();
        assert_eq!(applied, vec!["bigger".to_string(), "renamed".to_string()]);
        let definition = raw.parse().unwrap();
        assert_eq!(definition.name.as_deref(), Some("demo-renamed"));
        assert_eq!(
            definition.techs["boiler"]["flow_cap_max"].as_number(),
            Some(20.0)
        );
    }

    #[test]
    fn bare_override_name_works_as_scenario() {
        let mut raw = RawDefinition::from_str(DOC).unwrap();
        let applied = raw.apply_scenario("bigger").unwrap();
        assert_eq!(applied, vec!["bigger".to_string()]);
    }

    #[test]
    fn unknown_scenario_is_reported() {
        let mut raw = RawDefinition::from_str(DOC).unwrap();
        let err = raw.apply_scenario("nope").unwrap_err();
        assert_eq!(err.code(), "MODEL_UNKNOWN_SCENARIO");
    }

    #[test]
    fn series_references_split_or_reject() {
        assert_eq!(
            parse_series_ref("df=demand:heat").unwrap(),
            Some(("demand", "heat"))
        );
        assert_eq!(parse_series_ref("10").unwrap(), None);
        assert_eq!(
            parse_series_ref("df=demand").unwrap_err().code(),
            "TABLE_BAD_REFERENCE"
        );
    }
}
