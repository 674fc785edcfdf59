//! Model definitions, datasets, and math specifications for faro.

pub mod config;
pub mod dataset;
pub mod definition;
pub mod error;
pub mod math;
pub mod model;

pub use config::{defaults, ConfigValue, Defaults, RunConfig};
pub use dataset::{DataArray, Dataset};
pub use definition::{
    parse_series_ref, ModelDefinition, NodeDef, ParamValue, RawDefinition, TechDef,
    TimeseriesTable,
};
pub use error::ModelError;
pub use math::{
    BoundExpr, BoundsDef, ComponentDef, ComponentGroup, EquationDef, MathSpec, ObjectiveSense,
};
pub use model::{LoadOptions, Model};
