//! Math component definitions.
//!
//! A [`MathSpec`] groups component definitions by kind, keyed the way
//! definition files spell the groups. [`MathSpec::from_groups`] rejects any
//! other key so a misspelled group fails loudly at load time instead of
//! silently dropping its components.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ModelError;

/// The component groups a math spec may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentGroup {
    Variables,
    GlobalExpressions,
    Constraints,
    Objectives,
}

impl ComponentGroup {
    pub const ALL: [ComponentGroup; 4] = [
        ComponentGroup::Variables,
        ComponentGroup::GlobalExpressions,
        ComponentGroup::Constraints,
        ComponentGroup::Objectives,
    ];

    /// Group key as spelled in definition files.
    pub fn key(self) -> &'static str {
        match self {
            ComponentGroup::Variables => "variables",
            ComponentGroup::GlobalExpressions => "global_expressions",
            ComponentGroup::Constraints => "constraints",
            ComponentGroup::Objectives => "objectives",
        }
    }

    pub fn from_key(key: &str) -> Option<ComponentGroup> {
        ComponentGroup::ALL
            .into_iter()
            .find(|group| group.key() == key)
    }
}

impl std::fmt::Display for ComponentGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Direction of an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

impl ObjectiveSense {
    /// Keyword used for the LP section header.
    pub fn keyword(self) -> &'static str {
        match self {
            ObjectiveSense::Minimize => "minimize",
            ObjectiveSense::Maximize => "maximize",
        }
    }
}

/// One equation of a component.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EquationDef {
    pub expression: String,
}

impl EquationDef {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }
}

/// A bound endpoint: a literal number or the name of a parameter.
///
/// Untagged, so YAML numbers stay numbers and everything else is read as a
/// parameter reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BoundExpr {
    Literal(f64),
    Reference(String),
}

impl BoundExpr {
    pub fn as_literal(&self) -> Option<f64> {
        match self {
            BoundExpr::Literal(value) => Some(*value),
            BoundExpr::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            BoundExpr::Literal(_) => None,
            BoundExpr::Reference(name) => Some(name.as_str()),
        }
    }
}

/// Variable bounds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BoundsDef {
    #[serde(default)]
    pub min: Option<BoundExpr>,
    #[serde(default)]
    pub max: Option<BoundExpr>,
}

/// A single named component of any group.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ComponentDef {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub foreach: Vec<String>,
    #[serde(default)]
    pub equations: Vec<EquationDef>,
    #[serde(default)]
    pub bounds: Option<BoundsDef>,
    #[serde(default)]
    pub sense: Option<ObjectiveSense>,
}

/// Component definitions grouped by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MathSpec {
    pub variables: IndexMap<String, ComponentDef>,
    pub global_expressions: IndexMap<String, ComponentDef>,
    pub constraints: IndexMap<String, ComponentDef>,
    pub objectives: IndexMap<String, ComponentDef>,
}

impl MathSpec {
    /// Build a spec from raw group mappings, rejecting unknown group keys.
    pub fn from_groups(
        groups: IndexMap<String, IndexMap<String, ComponentDef>>,
    ) -> Result<Self, ModelError> {
        let mut spec = MathSpec::default();
        for (key, components) in groups {
            let Some(group) = ComponentGroup::from_key(&key) else {
                return Err(ModelError::UnknownMathGroup { group: key });
            };
            spec.group_mut(group).extend(components);
        }
        Ok(spec)
    }

    pub fn group(&self, group: ComponentGroup) -> &IndexMap<String, ComponentDef> {
        match group {
            ComponentGroup::Variables => &self.variables,
            ComponentGroup::GlobalExpressions => &self.global_expressions,
            ComponentGroup::Constraints => &self.constraints,
            ComponentGroup::Objectives => &self.objectives,
        }
    }

    pub fn group_mut(&mut self, group: ComponentGroup) -> &mut IndexMap<String, ComponentDef> {
        match group {
            ComponentGroup::Variables => &mut self.variables,
            ComponentGroup::GlobalExpressions => &mut self.global_expressions,
            ComponentGroup::Constraints => &mut self.constraints,
            ComponentGroup::Objectives => &mut self.objectives,
        }
    }

    /// Overlay `other` on top of `self`: same-name components are replaced,
    /// everything else is kept.
    pub fn merged_with(&self, other: &MathSpec) -> MathSpec {
        let mut merged = self.clone();
        for group in ComponentGroup::ALL {
            for (name, def) in other.group(group) {
                merged.group_mut(group).insert(name.clone(), def.clone());
            }
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        ComponentGroup::ALL
            .into_iter()
            .all(|group| self.group(group).is_empty())
    }
}

impl<'de> Deserialize<'de> for MathSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let groups = IndexMap::<String, IndexMap<String, ComponentDef>>::deserialize(deserializer)?;
        MathSpec::from_groups(groups).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::{ComponentDef, ComponentGroup, EquationDef, MathSpec, ObjectiveSense};
    use indexmap::IndexMap;

    const DEMO_MATH: &str = r#"
variables:
  flow_cap:
    foreach: [nodes, techs]
    bounds:
      min: 0
      max: flow_cap_max
constraints:
  flow_out_max:
    foreach: [nodes, techs, timesteps]
    equations:
      - expression: flow_out <= flow_cap
objectives:
  min_cost:
    sense: minimize
    equations:
      - expression: "1 + 1"
"#;

    #[test]
    fn parses_groups_and_components() {
        let math: MathSpec = serde_yaml::from_str(DEMO_MATH).unwrap();
        let flow_cap = &math.variables["flow_cap"];
        assert_eq!(flow_cap.foreach, vec!["nodes", "techs"]);
        let bounds = flow_cap.bounds.as_ref().unwrap();
        assert_eq!(bounds.min.as_ref().unwrap().as_literal(), Some(0.0));
        assert_eq!(
            bounds.max.as_ref().unwrap().as_reference(),
            Some("flow_cap_max")
        );
        assert_eq!(
            math.objectives["min_cost"].sense,
            Some(ObjectiveSense::Minimize)
        );
        assert_eq!(
            math.constraints["flow_out_max"].equations[0].expression,
            "flow_out <= flow_cap"
        );
    }

    #[test]
    fn rejects_unknown_group_keys() {
        let mut groups: IndexMap<String, IndexMap<String, ComponentDef>> = IndexMap::new();
        groups.insert("piecewise_constraints".to_string(), IndexMap::new());
        let err = MathSpec::from_groups(groups).unwrap_err();
        assert_eq!(err.code(), "MATH_UNKNOWN_GROUP");

        let err = serde_yaml::from_str::<MathSpec>("piecewise_constraints: {}").unwrap_err();
        assert!(err.to_string().contains("MATH_UNKNOWN_GROUP"));
    }

    #[test]
    fn merged_with_replaces_same_name_components() {
        let base: MathSpec = serde_yaml::from_str(DEMO_MATH).unwrap();
        let mut overlay = MathSpec::default();
        overlay.constraints.insert(
            "flow_out_max".to_string(),
            ComponentDef {
                equations: vec![EquationDef::new("flow_out <= 2 * flow_cap")],
                ..ComponentDef::default()
            },
        );
        overlay
            .variables
            .insert("storage_cap".to_string(), ComponentDef::default());

        let merged = base.merged_with(&overlay);
        assert_eq!(
            merged.constraints["flow_out_max"].equations[0].expression,
            "flow_out <= 2 * flow_cap"
        );
        assert!(merged.variables.contains_key("flow_cap"));
        assert!(merged.variables.contains_key("storage_cap"));
        // the overlay input is untouched
        assert_eq!(overlay.variables.len(), 1);
        assert!(base.variables.contains_key("flow_cap"));
    }

    #[test]
    fn group_keys_round_trip() {
        for group in ComponentGroup::ALL {
            assert_eq!(ComponentGroup::from_key(group.key()), Some(group));
        }
        assert_eq!(ComponentGroup::from_key("objective"), None);
    }
}
