//! Inspection helpers for diagnostics and backend expressions.
//!
//! Test assertions deal with two kinds of evidence: textual diagnostics from
//! model construction, and the rendered expressions a backend materialized.
//! Both helpers reduce their input to a single boolean so assertions stay
//! declarative.

use std::collections::BTreeSet;

use faro_lp::{BackendError, ConstraintArray, ExprArray, IndexSelection};

/// A diagnostic payload under test, by shape.
///
/// The shapes mirror what construction and validation hand back: an ordered
/// list of failure records, one value, or a bare set of strings. The variant
/// set is closed; a new shape has to add a variant and its rendering here.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticTarget {
    Collection(Vec<String>),
    Single(String),
    RawSet(BTreeSet<String>),
}

impl DiagnosticTarget {
    /// The text patterns are matched against: collections and sets join
    /// their entries with commas, a single value is used as is.
    pub fn rendered(&self) -> String {
        match self {
            DiagnosticTarget::Collection(records) => records.join(","),
            DiagnosticTarget::Single(value) => value.clone(),
            DiagnosticTarget::RawSet(values) => {
                values.iter().map(String::as_str).collect::<Vec<_>>().join(",")
            }
        }
    }
}

/// Substring patterns tested against a rendered diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum Patterns {
    One(String),
    All(Vec<String>),
}

impl Patterns {
    pub fn one(pattern: impl Into<String>) -> Self {
        Patterns::One(pattern.into())
    }

    pub fn all<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Patterns::All(patterns.into_iter().map(Into::into).collect())
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            Patterns::One(pattern) => text.contains(pattern.as_str()),
            Patterns::All(patterns) => {
                patterns.iter().all(|pattern| text.contains(pattern.as_str()))
            }
        }
    }
}

/// True when the rendered diagnostic text contains every pattern.
pub fn check_error_or_warning(target: &DiagnosticTarget, patterns: &Patterns) -> bool {
    patterns.matches(&target.rendered())
}

/// Expression content of one backend component, by provenance.
///
/// A constraint cell wraps a defining body plus its comparison; only the
/// body is searched. An expression cell is searched as rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprSource {
    Constraint(ConstraintArray),
    Expression(ExprArray),
}

impl ExprSource {
    fn select(&self, selection: &IndexSelection) -> Result<ExprSource, BackendError> {
        match self {
            ExprSource::Constraint(array) => array.select(selection).map(ExprSource::Constraint),
            ExprSource::Expression(array) => array.select(selection).map(ExprSource::Expression),
        }
    }

    fn any_cell_contains(&self, name: &str) -> bool {
        match self {
            ExprSource::Constraint(array) => {
                array.cells().flatten().any(|cell| cell.body.contains(name))
            }
            ExprSource::Expression(array) => {
                array.cells().flatten().any(|text| text.contains(name))
            }
        }
    }
}

/// True when `name` occurs as a substring in any cell of `source`.
///
/// An absent source is simply not a hit. `index` narrows the searched
/// positions before the reduction; an unknown dimension or label in the
/// selection is a fault, not a miss.
pub fn check_variable_exists(
    source: Option<ExprSource>,
    name: &str,
    index: Option<&IndexSelection>,
) -> Result<bool, BackendError> {
    let Some(source) = source else {
        return Ok(false);
    };
    let source = match index {
        Some(selection) => source.select(selection)?,
        None => source,
    };
    Ok(source.any_cell_contains(name))
}
