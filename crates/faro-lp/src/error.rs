//! Backend registration and serialization errors.

use faro_core::ModelError;
use faro_expr::ParseError;

/// Errors raised while registering components or lowering equations
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Component name is already registered in the group
    DuplicateName { group: &'static str, name: String },
    /// Requested backend kind is not registered
    UnknownBackend { name: String },
    /// Bound reference names a parameter that is not registered
    UnknownParameter { name: String },
    /// Equation identifier matches no variable, expression, or parameter
    UnknownIdentifier { component: String, name: String },
    /// Objective name is not registered
    UnknownObjective { name: String },
    /// Component carries no equation
    MissingEquation { component: String },
    /// Component carries more than one equation
    AmbiguousEquations { component: String },
    /// Constraint equation has no comparison operator
    MissingComparison { component: String },
    /// Expression or objective equation has a comparison operator
    UnexpectedComparison { component: String },
    /// Objective has no optimization sense
    MissingSense { component: String },
    /// Objective is indexed over dimensions
    ObjectiveNotScalar { name: String },
    /// Objective equation references a value that is missing everywhere
    MissingValue { component: String, name: String },
    /// Resolved bounds are NaN or crossed
    InvalidBounds {
        name: String,
        lower: f64,
        upper: f64,
    },
    /// Referenced component is indexed over a dimension the current frame
    /// does not carry
    DimensionMismatch { component: String, name: String },
    /// Equation multiplies or divides two variable expressions
    Nonlinear { component: String },
    /// Equation divides by a zero constant
    DivisionByZero { component: String },
    /// Equation text does not parse
    Equation {
        component: String,
        error: ParseError,
    },
    /// Array selection names a dimension the array does not carry
    UnknownArrayDimension { name: String },
    /// Array selection names a label the dimension does not carry
    UnknownArrayLabel { dimension: String, label: String },
    /// Dataset lookup failed while materializing
    Dataset(ModelError),
}

impl BackendError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            BackendError::DuplicateName { .. } => "BACKEND_DUPLICATE_NAME",
            BackendError::UnknownBackend { .. } => "BACKEND_UNKNOWN_KIND",
            BackendError::UnknownParameter { .. } => "BACKEND_UNKNOWN_PARAMETER",
            BackendError::UnknownIdentifier { .. } => "BACKEND_UNKNOWN_IDENTIFIER",
            BackendError::UnknownObjective { .. } => "BACKEND_UNKNOWN_OBJECTIVE",
            BackendError::MissingEquation { .. } => "BACKEND_MISSING_EQUATION",
            BackendError::AmbiguousEquations { .. } => "BACKEND_AMBIGUOUS_EQUATIONS",
            BackendError::MissingComparison { .. } => "BACKEND_MISSING_COMPARISON",
            BackendError::UnexpectedComparison { .. } => "BACKEND_UNEXPECTED_COMPARISON",
            BackendError::MissingSense { .. } => "BACKEND_MISSING_SENSE",
            BackendError::ObjectiveNotScalar { .. } => "BACKEND_OBJECTIVE_FOREACH",
            BackendError::MissingValue { .. } => "BACKEND_MISSING_VALUE",
            BackendError::InvalidBounds { .. } => "BACKEND_INVALID_BOUNDS",
            BackendError::DimensionMismatch { .. } => "BACKEND_DIMENSION_MISMATCH",
            BackendError::Nonlinear { .. } => "BACKEND_NONLINEAR",
            BackendError::DivisionByZero { .. } => "BACKEND_DIVISION_BY_ZERO",
            BackendError::Equation { .. } => "BACKEND_BAD_EQUATION",
            BackendError::UnknownArrayDimension { .. } => "ARRAY_UNKNOWN_DIMENSION",
            BackendError::UnknownArrayLabel { .. } => "ARRAY_UNKNOWN_LABEL",
            BackendError::Dataset(inner) => inner.code(),
        }
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::DuplicateName { group, name } => write!(
                f,
                "[{}] Component '{}' is already registered in {}",
                self.code(),
                name,
                group
            ),
            BackendError::UnknownBackend { name } => {
                write!(f, "[{}] Backend '{}' is not registered", self.code(), name)
            }
            BackendError::UnknownParameter { name } => write!(
                f,
                "[{}] Bound reference '{}' matches no registered parameter",
                self.code(),
                name
            ),
            BackendError::UnknownIdentifier { component, name } => write!(
                f,
                "[{}] Equation of '{}' references '{}', which matches no variable, expression, or parameter",
                self.code(),
                component,
                name
            ),
            BackendError::UnknownObjective { name } => {
                write!(f, "[{}] Objective '{}' is not registered", self.code(), name)
            }
            BackendError::MissingEquation { component } => {
                write!(f, "[{}] Component '{}' has no equation", self.code(), component)
            }
            BackendError::AmbiguousEquations { component } => write!(
                f,
                "[{}] Component '{}' has more than one equation",
                self.code(),
                component
            ),
            BackendError::MissingComparison { component } => write!(
                f,
                "[{}] Constraint '{}' has no comparison operator",
                self.code(),
                component
            ),
            BackendError::UnexpectedComparison { component } => write!(
                f,
                "[{}] Equation of '{}' must not contain a comparison operator",
                self.code(),
                component
            ),
            BackendError::MissingSense { component } => write!(
                f,
                "[{}] Objective '{}' declares no optimization sense",
                self.code(),
                component
            ),
            BackendError::ObjectiveNotScalar { name } => write!(
                f,
                "[{}] Objective '{}' must not be indexed over dimensions",
                self.code(),
                name
            ),
            BackendError::MissingValue { component, name } => write!(
                f,
                "[{}] Objective '{}' references '{}', which has no value",
                self.code(),
                component,
                name
            ),
            BackendError::InvalidBounds { name, lower, upper } => write!(
                f,
                "[{}] Variable '{}' resolved to invalid bounds [{}, {}]",
                self.code(),
                name,
                lower,
                upper
            ),
            BackendError::DimensionMismatch { component, name } => write!(
                f,
                "[{}] Component '{}' references '{}' over a dimension it does not iterate",
                self.code(),
                component,
                name
            ),
            BackendError::Nonlinear { component } => write!(
                f,
                "[{}] Equation of '{}' is not linear",
                self.code(),
                component
            ),
            BackendError::DivisionByZero { component } => write!(
                f,
                "[{}] Equation of '{}' divides by zero",
                self.code(),
                component
            ),
            BackendError::Equation { component, error } => write!(
                f,
                "[{}] Equation of '{}' does not parse: {}",
                self.code(),
                component,
                error
            ),
            BackendError::UnknownArrayDimension { name } => write!(
                f,
                "[{}] Selection names dimension '{}', which the array does not carry",
                self.code(),
                name
            ),
            BackendError::UnknownArrayLabel { dimension, label } => write!(
                f,
                "[{}] Selection names label '{}' on dimension '{}', which the array does not carry",
                self.code(),
                label,
                dimension
            ),
            BackendError::Dataset(inner) => inner.fmt(f),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<ModelError> for BackendError {
    fn from(inner: ModelError) -> Self {
        BackendError::Dataset(inner)
    }
}

/// Errors raised while serializing LP text
#[derive(Debug, Clone, PartialEq)]
pub enum WriterError {
    /// No objective is activated
    NoActiveObjective,
    /// LP file could not be written
    Io { path: String, message: String },
}

impl WriterError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            WriterError::NoActiveObjective => "LP_NO_ACTIVE_OBJECTIVE",
            WriterError::Io { .. } => "LP_IO",
        }
    }
}

impl std::fmt::Display for WriterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriterError::NoActiveObjective => {
                write!(f, "[{}] No objective is activated", self.code())
            }
            WriterError::Io { path, message } => {
                write!(f, "[{}] Cannot write {}: {}", self.code(), path, message)
            }
        }
    }
}

impl std::error::Error for WriterError {}
