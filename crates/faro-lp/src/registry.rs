//! Backend registry.
//!
//! Maps backend kind names to constructors, so the run configuration can
//! select an implementation by name.

use indexmap::IndexMap;

use crate::backend::LpBackend;
use crate::error::BackendError;
use faro_core::Dataset;

type BackendBuilder = fn(Dataset) -> LpBackend;

/// Named backend constructors.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    builders: IndexMap<String, BackendBuilder>,
}

impl BackendRegistry {
    /// Registry holding the built-in `lp` backend.
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            builders: IndexMap::new(),
        };
        registry.register("lp", LpBackend::new);
        registry
    }

    /// Register a constructor under a kind name, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, builder: BackendBuilder) {
        self.builders.insert(name.into(), builder);
    }

    /// Construct the backend registered under `name`.
    pub fn create(&self, name: &str, dataset: Dataset) -> Result<LpBackend, BackendError> {
        let Some(builder) = self.builders.get(name) else {
            return Err(BackendError::UnknownBackend {
                name: name.to_string(),
            });
        };
        Ok(builder(dataset))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.builders.keys().map(String::as_str)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
