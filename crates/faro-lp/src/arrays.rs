//! Rendered component arrays and index selections.
//!
//! Inspection hands out component contents as rendered text, laid out over
//! the same dimensions the component was registered with. A selection
//! narrows the labels per dimension; it never collapses a dimension away.

use itertools::Itertools as _;

use crate::backend::format_lp_number;
use crate::error::BackendError;
use faro_expr::ComparisonSense;

/// Per-dimension label restriction applied before searching an array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSelection {
    entries: Vec<(String, Vec<String>)>,
}

impl IndexSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `dim` to the given labels, in the given order.
    pub fn with<I, S>(mut self, dim: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .push((dim.into(), labels.into_iter().map(Into::into).collect()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }
}

/// Rendered expressions of one component, one cell per index position.
///
/// Cells are row-major over the dimensions. A `None` cell is a position the
/// component skipped because a referenced value was missing there.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprArray {
    dims: Vec<String>,
    labels: Vec<Vec<String>>,
    cells: Vec<Option<String>>,
}

impl ExprArray {
    pub(crate) fn from_parts(
        dims: Vec<String>,
        labels: Vec<Vec<String>>,
        cells: Vec<Option<String>>,
    ) -> Self {
        Self { dims, labels, cells }
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Labels of one dimension, `None` when the array does not carry it.
    pub fn labels(&self, dim: &str) -> Option<&[String]> {
        let axis = self.dims.iter().position(|d| d == dim)?;
        Some(&self.labels[axis])
    }

    pub fn position_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.cells.iter().map(Option::as_deref)
    }

    /// Copy restricted to the selected labels.
    pub fn select(&self, selection: &IndexSelection) -> Result<ExprArray, BackendError> {
        let (labels, gather) = select_indices(&self.dims, &self.labels, selection)?;
        let cells = gather.iter().map(|&flat| self.cells[flat].clone()).collect();
        Ok(ExprArray {
            dims: self.dims.clone(),
            labels,
            cells,
        })
    }
}

/// One materialized constraint row: rendered body, sense, and RHS constant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintCell {
    pub body: String,
    pub sense: ComparisonSense,
    pub rhs: f64,
}

impl ConstraintCell {
    /// The full row as it appears in LP text, without the label prefix.
    pub fn full_text(&self) -> String {
        format!(
            "{} {} {}",
            self.body,
            self.sense.lp_symbol(),
            format_lp_number(self.rhs)
        )
    }
}

/// Materialized constraint rows of one component, one cell per position.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintArray {
    dims: Vec<String>,
    labels: Vec<Vec<String>>,
    cells: Vec<Option<ConstraintCell>>,
}

impl ConstraintArray {
    pub(crate) fn from_parts(
        dims: Vec<String>,
        labels: Vec<Vec<String>>,
        cells: Vec<Option<ConstraintCell>>,
    ) -> Self {
        Self { dims, labels, cells }
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Labels of one dimension, `None` when the array does not carry it.
    pub fn labels(&self, dim: &str) -> Option<&[String]> {
        let axis = self.dims.iter().position(|d| d == dim)?;
        Some(&self.labels[axis])
    }

    pub fn position_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = Option<&ConstraintCell>> + '_ {
        self.cells.iter().map(Option::as_ref)
    }

    /// Copy restricted to the selected labels.
    pub fn select(&self, selection: &IndexSelection) -> Result<ConstraintArray, BackendError> {
        let (labels, gather) = select_indices(&self.dims, &self.labels, selection)?;
        let cells = gather.iter().map(|&flat| self.cells[flat].clone()).collect();
        Ok(ConstraintArray {
            dims: self.dims.clone(),
            labels,
            cells,
        })
    }
}

/// Resolve a selection against dims/labels. Returns the narrowed labels and
/// the flat source position of every retained cell, row-major over the
/// narrowed shape.
fn select_indices(
    dims: &[String],
    labels: &[Vec<String>],
    selection: &IndexSelection,
) -> Result<(Vec<Vec<String>>, Vec<usize>), BackendError> {
    let mut keep: Vec<Vec<usize>> = labels
        .iter()
        .map(|axis_labels| (0..axis_labels.len()).collect())
        .collect();
    let mut new_labels = labels.to_vec();

    for (dim, chosen) in selection.entries() {
        let Some(axis) = dims.iter().position(|d| d == dim) else {
            return Err(BackendError::UnknownArrayDimension { name: dim.clone() });
        };
        let mut indices = Vec::with_capacity(chosen.len());
        for label in chosen {
            let Some(position) = labels[axis].iter().position(|l| l == label) else {
                return Err(BackendError::UnknownArrayLabel {
                    dimension: dim.clone(),
                    label: label.clone(),
                });
            };
            indices.push(position);
        }
        keep[axis] = indices;
        new_labels[axis] = chosen.clone();
    }

    let mut strides = vec![1usize; dims.len()];
    for axis in (0..dims.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * labels[axis + 1].len();
    }

    let mut gather = Vec::new();
    if keep.is_empty() {
        // Scalar array: a single position and nothing to narrow.
        gather.push(0);
    } else {
        for combo in keep
            .iter()
            .map(|indices| indices.iter().copied())
            .multi_cartesian_product()
        {
            let flat: usize = combo.iter().zip(&strides).map(|(i, s)| i * s).sum();
            gather.push(flat);
        }
    }
    Ok((new_labels, gather))
}
