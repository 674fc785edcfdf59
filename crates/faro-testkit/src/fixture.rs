//! Fixture models for export and diagnostics tests.

use std::path::{Path, PathBuf};

use faro_core::{LoadOptions, Model, ModelError, TimeseriesTable};

/// Directory holding the packaged fixture definitions.
pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Builder for models loaded from the fixture directory.
///
/// Override, scenario, and table semantics belong to the model loader; the
/// builder only collects them, so loader faults surface unchanged.
#[derive(Debug, Clone)]
pub struct ModelFixture {
    model_file: String,
    options: LoadOptions,
}

impl ModelFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fixture file other than `model.yaml`.
    pub fn with_model_file(mut self, name: impl Into<String>) -> Self {
        self.model_file = name.into();
        self
    }

    pub fn with_scenario(mut self, name: impl Into<String>) -> Self {
        self.options = self.options.with_scenario(name);
        self
    }

    pub fn with_override(
        mut self,
        path: impl Into<String>,
        value: impl Into<serde_yaml::Value>,
    ) -> Self {
        self.options = self.options.with_override(path, value);
        self
    }

    /// Supply a timeseries table directly, replacing any table the fixture
    /// declares under the same name.
    pub fn with_table(mut self, name: impl Into<String>, table: TimeseriesTable) -> Self {
        self.options = self.options.with_table(name, table);
        self
    }

    pub fn build(self) -> Result<Model, ModelError> {
        Model::from_path(fixture_dir().join(&self.model_file), self.options)
    }
}

impl Default for ModelFixture {
    fn default() -> Self {
        Self {
            model_file: "model.yaml".to_string(),
            options: LoadOptions::new(),
        }
    }
}
