//! LP backend for the faro export pipeline.

pub mod arrays;
pub mod backend;
pub mod error;
pub mod registry;
pub mod types;

pub use arrays::{ConstraintArray, ConstraintCell, ExprArray, IndexSelection};
pub use backend::{LpBackend, DUMMY_OBJECTIVE};
pub use error::{BackendError, WriterError};
pub use registry::BackendRegistry;
pub use types::Bounds;
