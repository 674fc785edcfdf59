//! Model loading and data errors.

/// Errors that can occur while loading a definition or assembling model data
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Definition file could not be read
    Io { path: String, message: String },
    /// Definition text is not valid YAML
    Yaml { context: String, message: String },
    /// Scenario name matches neither a scenario nor an override
    UnknownScenario { name: String },
    /// Dotted override path navigates through a non-mapping value
    OverridePath { path: String },
    /// Math group key is not one of the known component groups
    UnknownMathGroup { group: String },
    /// Timeseries reference names a table that is not defined
    UnknownTable { table: String },
    /// Timeseries reference names a column the table does not carry
    UnknownColumn { table: String, column: String },
    /// Timeseries reference is not of the form `df=<table>:<column>`
    BadSeriesRef { value: String },
    /// Table index disagrees with the timesteps established earlier
    TimestepMismatch { table: String },
    /// Parameter is defined with irreconcilable values
    ParameterConflict { name: String },
    /// Value count does not match the dimension extents
    ShapeMismatch { expected: usize, actual: usize },
    /// Dimension name is not present in the dataset
    UnknownDimension { name: String },
    /// Label is not present on a dimension
    UnknownLabel { dimension: String, label: String },
    /// Index arity does not match the array dimensionality
    DimensionMismatch { expected: usize, actual: usize },
    /// Index position is past the end of a dimension
    IndexOutOfRange {
        dimension: String,
        index: usize,
        extent: usize,
    },
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::Io { .. } => "MODEL_IO",
            ModelError::Yaml { .. } => "MODEL_BAD_YAML",
            ModelError::UnknownScenario { .. } => "MODEL_UNKNOWN_SCENARIO",
            ModelError::OverridePath { .. } => "OVERRIDE_BAD_PATH",
            ModelError::UnknownMathGroup { .. } => "MATH_UNKNOWN_GROUP",
            ModelError::UnknownTable { .. } => "TABLE_UNKNOWN",
            ModelError::UnknownColumn { .. } => "TABLE_UNKNOWN_COLUMN",
            ModelError::BadSeriesRef { .. } => "TABLE_BAD_REFERENCE",
            ModelError::TimestepMismatch { .. } => "TABLE_TIMESTEP_MISMATCH",
            ModelError::ParameterConflict { .. } => "DATA_PARAM_CONFLICT",
            ModelError::ShapeMismatch { .. } => "DATA_SHAPE_MISMATCH",
            ModelError::UnknownDimension { .. } => "DATA_UNKNOWN_DIMENSION",
            ModelError::UnknownLabel { .. } => "DATA_UNKNOWN_LABEL",
            ModelError::DimensionMismatch { .. } => "DATA_DIMENSION_MISMATCH",
            ModelError::IndexOutOfRange { .. } => "DATA_INDEX_RANGE",
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Io { path, message } => {
                write!(f, "[{}] Cannot read {}: {}", self.code(), path, message)
            }
            ModelError::Yaml { context, message } => {
                write!(f, "[{}] Invalid YAML in {}: {}", self.code(), context, message)
            }
            ModelError::UnknownScenario { name } => write!(
                f,
                "[{}] Scenario or override '{}' is not defined",
                self.code(),
                name
            ),
            ModelError::OverridePath { path } => write!(
                f,
                "[{}] Override path '{}' runs through a non-mapping value",
                self.code(),
                path
            ),
            ModelError::UnknownMathGroup { group } => write!(
                f,
                "[{}] Math group '{}' has no registration operation",
                self.code(),
                group
            ),
            ModelError::UnknownTable { table } => {
                write!(f, "[{}] Data table '{}' is not defined", self.code(), table)
            }
            ModelError::UnknownColumn { table, column } => write!(
                f,
                "[{}] Data table '{}' has no column '{}'",
                self.code(),
                table,
                column
            ),
            ModelError::BadSeriesRef { value } => write!(
                f,
                "[{}] Timeseries reference '{}' must look like df=<table>:<column>",
                self.code(),
                value
            ),
            ModelError::TimestepMismatch { table } => write!(
                f,
                "[{}] Data table '{}' index disagrees with the model timesteps",
                self.code(),
                table
            ),
            ModelError::ParameterConflict { name } => write!(
                f,
                "[{}] Parameter '{}' has conflicting definitions",
                self.code(),
                name
            ),
            ModelError::ShapeMismatch { expected, actual } => write!(
                f,
                "[{}] Expected {} values, got {}",
                self.code(),
                expected,
                actual
            ),
            ModelError::UnknownDimension { name } => {
                write!(f, "[{}] Dimension '{}' is not defined", self.code(), name)
            }
            ModelError::UnknownLabel { dimension, label } => write!(
                f,
                "[{}] Dimension '{}' has no label '{}'",
                self.code(),
                dimension,
                label
            ),
            ModelError::DimensionMismatch { expected, actual } => write!(
                f,
                "[{}] Expected {} index positions, got {}",
                self.code(),
                expected,
                actual
            ),
            ModelError::IndexOutOfRange {
                dimension,
                index,
                extent,
            } => write!(
                f,
                "[{}] Index {} is past the end of dimension '{}' (extent {})",
                self.code(),
                index,
                dimension,
                extent
            ),
        }
    }
}

impl std::error::Error for ModelError {}
