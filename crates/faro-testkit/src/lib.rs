//! Test support for faro: fixture models, canonical LP export, and
//! diagnostic inspection.

pub mod diagnostics;
pub mod export;
pub mod fixture;
pub mod logging;
pub mod sets;

pub use diagnostics::{
    check_error_or_warning, check_variable_exists, DiagnosticTarget, ExprSource, Patterns,
};
pub use export::{build_lp, canonicalize, ExportError};
pub use fixture::{fixture_dir, ModelFixture};
pub use logging::{enable_logging, LoggingError};
pub use sets::{constraint_sets, set_entries};
