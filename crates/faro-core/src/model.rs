//! Model loading and assembly.
//!
//! [`Model::from_str`] runs the whole pipeline: parse the raw document,
//! merge scenario and override fragments, deserialize the typed definition,
//! merge packaged defaults underneath it, then assemble the dataset and the
//! parameter arrays the backend materializes from.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};

use crate::config::{defaults, Defaults, RunConfig};
use crate::dataset::{DataArray, Dataset};
use crate::definition::{
    parse_series_ref, ModelDefinition, ParamValue, RawDefinition, TimeseriesTable,
};
use crate::error::ModelError;
use crate::math::MathSpec;

/// Options controlling how a definition is turned into a model.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    scenario: Option<String>,
    overrides: Vec<(String, serde_yaml::Value)>,
    tables: Vec<(String, TimeseriesTable)>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a scenario (or bare override) by name.
    pub fn with_scenario(mut self, name: impl Into<String>) -> Self {
        self.scenario = Some(name.into());
        self
    }

    /// Apply one dotted-path override. Overrides run after the scenario, so
    /// they win on conflicting paths.
    pub fn with_override(
        mut self,
        path: impl Into<String>,
        value: impl Into<serde_yaml::Value>,
    ) -> Self {
        self.overrides.push((path.into(), value.into()));
        self
    }

    /// Supply a timeseries table directly, replacing any table the
    /// definition declares under the same name.
    pub fn with_table(mut self, name: impl Into<String>, table: TimeseriesTable) -> Self {
        self.tables.push((name.into(), table));
        self
    }
}

/// A fully assembled model: merged configuration and math, the dimension
/// dataset, and one data array per parameter.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    run_config: RunConfig,
    math: MathSpec,
    dataset: Dataset,
    parameters: IndexMap<String, DataArray>,
    applied_overrides: Vec<String>,
    scenario: Option<String>,
}

impl Model {
    pub fn from_path(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| ModelError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_str(&text, options)
    }

    pub fn from_str(text: &str, options: LoadOptions) -> Result<Self, ModelError> {
        let mut raw = RawDefinition::from_str(text)?;
        let mut applied_overrides = Vec::new();
        if let Some(name) = &options.scenario {
            applied_overrides = raw.apply_scenario(name)?;
        }
        for (path, value) in &options.overrides {
            raw.apply_override_value(path, value.clone())?;
        }
        let mut definition = raw.parse()?;
        for (name, table) in options.tables {
            definition.data_tables.insert(name, table);
        }
        let model = Self::assemble(definition, options.scenario, applied_overrides)?;
        tracing::debug!(
            component = "model",
            operation = "assemble",
            status = "success",
            name = model.name.as_str(),
            techs = model.dataset.labels("techs").map(<[String]>::len).unwrap_or(0),
            nodes = model.dataset.labels("nodes").map(<[String]>::len).unwrap_or(0),
            parameters = model.parameters.len(),
            "Model assembled"
        );
        Ok(model)
    }

    fn assemble(
        definition: ModelDefinition,
        scenario: Option<String>,
        applied_overrides: Vec<String>,
    ) -> Result<Self, ModelError> {
        let base = defaults();
        let run_config = base.config.merged_with(&definition.config);
        let math = base.math.merged_with(&definition.math);

        let mut dataset = Dataset::new();
        dataset.add_dimension("nodes", definition.nodes.keys().cloned().collect::<Vec<_>>());
        dataset.add_dimension("techs", definition.techs.keys().cloned().collect::<Vec<_>>());

        let mut timesteps = definition.timesteps.clone();
        for (table_name, table) in &definition.data_tables {
            table.validate()?;
            if timesteps.is_empty() {
                timesteps = table.index.clone();
            } else if table.index != timesteps {
                return Err(ModelError::TimestepMismatch {
                    table: table_name.clone(),
                });
            }
        }
        if !timesteps.is_empty() {
            dataset.add_dimension("timesteps", timesteps);
        }

        let parameters = Self::collect_parameters(&definition, &run_config, base)?;

        Ok(Self {
            name: definition.name.unwrap_or_else(|| "unnamed".to_string()),
            run_config,
            math,
            dataset,
            parameters,
            applied_overrides,
            scenario,
        })
    }

    /// One data array per parameter name: timeseries references resolve over
    /// `timesteps`, everything else is dense over `[nodes, techs]` with NaN
    /// where a technology is absent or carries no value. Numeric run
    /// configuration entries are appended as scalar parameters.
    fn collect_parameters(
        definition: &ModelDefinition,
        run_config: &RunConfig,
        base: &Defaults,
    ) -> Result<IndexMap<String, DataArray>, ModelError> {
        let mut names: IndexSet<String> = base.parameters.keys().cloned().collect();
        for tech in definition.techs.values() {
            for (key, value) in tech {
                if is_param_entry(value) {
                    names.insert(key.clone());
                }
            }
        }
        for node in definition.nodes.values() {
            for overrides in node.techs.values().flatten() {
                for (key, value) in overrides {
                    if is_param_entry(value) {
                        names.insert(key.clone());
                    }
                }
            }
        }

        let mut parameters = IndexMap::new();
        for name in &names {
            let array = match Self::series_for(definition, name)? {
                Some(array) => array,
                None => Self::dense_for(definition, base, name)?,
            };
            parameters.insert(name.clone(), array);
        }

        for (key, value) in run_config.iter() {
            if let Some(number) = value.as_f64() {
                if !parameters.contains_key(key) {
                    parameters.insert(key.to_string(), DataArray::scalar(number));
                }
            }
        }
        Ok(parameters)
    }

    /// Resolve a timeseries reference for `name`, if any entry carries one.
    /// Mixing a reference with numeric values, or two different references,
    /// is a conflict.
    fn series_for(
        definition: &ModelDefinition,
        name: &str,
    ) -> Result<Option<DataArray>, ModelError> {
        let mut reference: Option<(String, String)> = None;
        let mut has_numeric = false;
        let mut note = |value: &ParamValue| -> Result<(), ModelError> {
            match value {
                ParamValue::Number(_) => has_numeric = true,
                ParamValue::Text(text) => {
                    if let Some((table, column)) = parse_series_ref(text)? {
                        let next = (table.to_string(), column.to_string());
                        match &reference {
                            Some(existing) if *existing != next => {
                                return Err(ModelError::ParameterConflict {
                                    name: name.to_string(),
                                });
                            }
                            _ => reference = Some(next),
                        }
                    }
                }
                ParamValue::Flag(_) => {}
            }
            Ok(())
        };
        for tech in definition.techs.values() {
            if let Some(value) = tech.get(name) {
                note(value)?;
            }
        }
        for node in definition.nodes.values() {
            for overrides in node.techs.values().flatten() {
                if let Some(value) = overrides.get(name) {
                    note(value)?;
                }
            }
        }

        let Some((table_name, column_name)) = reference else {
            return Ok(None);
        };
        if has_numeric {
            return Err(ModelError::ParameterConflict {
                name: name.to_string(),
            });
        }
        let table =
            definition
                .data_tables
                .get(&table_name)
                .ok_or_else(|| ModelError::UnknownTable {
                    table: table_name.clone(),
                })?;
        let values = table
            .column(&column_name)
            .ok_or_else(|| ModelError::UnknownColumn {
                table: table_name.clone(),
                column: column_name.clone(),
            })?;
        DataArray::new(
            vec!["timesteps".to_string()],
            vec![values.len()],
            values.to_vec(),
        )
        .map(Some)
    }

    /// Dense `[nodes, techs]` array for `name`. Cell precedence: node-level
    /// override, then the technology value, then the packaged default. A
    /// technology not present at a node stays missing even when a default
    /// exists.
    fn dense_for(
        definition: &ModelDefinition,
        base: &Defaults,
        name: &str,
    ) -> Result<DataArray, ModelError> {
        let node_count = definition.nodes.len();
        let tech_count = definition.techs.len();
        let default = base.parameters.get(name).copied();
        let mut values = Vec::with_capacity(node_count * tech_count);
        for node in definition.nodes.values() {
            for (tech_name, tech) in &definition.techs {
                let cell = match node.techs.get(tech_name) {
                    None => None,
                    Some(overrides) => overrides
                        .as_ref()
                        .and_then(|params| params.get(name))
                        .and_then(ParamValue::as_number)
                        .or_else(|| tech.get(name).and_then(ParamValue::as_number))
                        .or(default),
                };
                values.push(cell.unwrap_or(f64::NAN));
            }
        }
        DataArray::new(
            vec!["nodes".to_string(), "techs".to_string()],
            vec![node_count, tech_count],
            values,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run_config(&self) -> &RunConfig {
        &self.run_config
    }

    pub fn math(&self) -> &MathSpec {
        &self.math
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &DataArray)> {
        self.parameters.iter().map(|(name, array)| (name.as_str(), array))
    }

    pub fn parameter(&self, name: &str) -> Option<&DataArray> {
        self.parameters.get(name)
    }

    pub fn applied_overrides(&self) -> &[String] {
        &self.applied_overrides
    }

    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }
}

fn is_param_entry(value: &ParamValue) -> bool {
    match value {
        ParamValue::Number(_) => true,
        ParamValue::Text(text) => text.starts_with("df="),
        ParamValue::Flag(_) => false,
    }
}
