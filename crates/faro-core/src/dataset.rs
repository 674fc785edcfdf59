//! Labeled model data.
//!
//! A [`Dataset`] holds named dimensions with ordered labels. A [`DataArray`]
//! holds numeric values laid out row-major over a subset of those dimensions;
//! missing entries are stored as NaN so sparse parameter coverage survives
//! array assembly and can be detected downstream.

use indexmap::IndexMap;
use itertools::Itertools;

use crate::error::ModelError;

/// Named dimensions with ordered labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    dimensions: IndexMap<String, Vec<String>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dimension, replacing any previous labels under the name.
    pub fn add_dimension(&mut self, name: impl Into<String>, labels: Vec<String>) {
        self.dimensions.insert(name.into(), labels);
    }

    pub fn has_dimension(&self, name: &str) -> bool {
        self.dimensions.contains_key(name)
    }

    /// Ordered labels of a dimension.
    pub fn labels(&self, name: &str) -> Result<&[String], ModelError> {
        self.dimensions
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ModelError::UnknownDimension {
                name: name.to_string(),
            })
    }

    /// Position of a label along a dimension.
    pub fn position(&self, dimension: &str, label: &str) -> Result<usize, ModelError> {
        self.labels(dimension)?
            .iter()
            .position(|candidate| candidate == label)
            .ok_or_else(|| ModelError::UnknownLabel {
                dimension: dimension.to_string(),
                label: label.to_string(),
            })
    }

    /// Extents of the given dimensions, in order.
    pub fn shape(&self, dims: &[String]) -> Result<Vec<usize>, ModelError> {
        dims.iter()
            .map(|dim| self.labels(dim).map(<[String]>::len))
            .collect()
    }

    /// Every label combination over the given dimensions, in row-major order.
    ///
    /// An empty dimension list yields a single empty combination: the scalar
    /// case still has one addressable position.
    pub fn index_product(&self, dims: &[String]) -> Result<Vec<Vec<String>>, ModelError> {
        let axes: Vec<&[String]> = dims
            .iter()
            .map(|dim| self.labels(dim))
            .collect::<Result<_, _>>()?;
        if axes.is_empty() {
            return Ok(vec![Vec::new()]);
        }
        Ok(axes
            .iter()
            .map(|labels| labels.iter().cloned())
            .multi_cartesian_product()
            .collect())
    }

    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.keys().map(String::as_str)
    }
}

/// Row-major numeric values over named dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    dims: Vec<String>,
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl DataArray {
    /// A dimensionless array holding a single value.
    pub fn scalar(value: f64) -> Self {
        Self {
            dims: Vec::new(),
            shape: Vec::new(),
            values: vec![value],
        }
    }

    pub fn new(dims: Vec<String>, shape: Vec<usize>, values: Vec<f64>) -> Result<Self, ModelError> {
        if dims.len() != shape.len() {
            return Err(ModelError::DimensionMismatch {
                expected: dims.len(),
                actual: shape.len(),
            });
        }
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(ModelError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            dims,
            shape,
            values,
        })
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    /// Value at a full index, or `None` where the entry is missing.
    pub fn value_at(&self, indices: &[usize]) -> Result<Option<f64>, ModelError> {
        let flat = self.flat_index(indices)?;
        let value = self.values[flat];
        Ok((!value.is_nan()).then_some(value))
    }

    fn flat_index(&self, indices: &[usize]) -> Result<usize, ModelError> {
        if indices.len() != self.shape.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.shape.len(),
                actual: indices.len(),
            });
        }
        let mut flat = 0usize;
        for (position, (&index, &extent)) in indices.iter().zip(&self.shape).enumerate() {
            if index >= extent {
                return Err(ModelError::IndexOutOfRange {
                    dimension: self.dims[position].clone(),
                    index,
                    extent,
                });
            }
            flat = flat * extent + index;
        }
        Ok(flat)
    }
}

#[cfg(test)]
mod tests {
    use super::{DataArray, Dataset};
    use crate::error::ModelError;

    fn demo_dataset() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.add_dimension("nodes", vec!["a".to_string(), "b".to_string()]);
        dataset.add_dimension("techs", vec!["supply".to_string(), "demand".to_string()]);
        dataset
    }

    #[test]
    fn position_finds_labels_in_order() {
        let dataset = demo_dataset();
        assert_eq!(dataset.position("nodes", "a").unwrap(), 0);
        assert_eq!(dataset.position("techs", "demand").unwrap(), 1);
    }

    #[test]
    fn position_reports_unknown_labels() {
        let dataset = demo_dataset();
        let err = dataset.position("nodes", "c").unwrap_err();
        assert_eq!(err.code(), "DATA_UNKNOWN_LABEL");

        let err = dataset.position("carriers", "heat").unwrap_err();
        assert_eq!(err.code(), "DATA_UNKNOWN_DIMENSION");
    }

    #[test]
    fn index_product_walks_row_major() {
        let dataset = demo_dataset();
        let combos = dataset
            .index_product(&["nodes".to_string(), "techs".to_string()])
            .unwrap();
        assert_eq!(
            combos,
            vec![
                vec!["a".to_string(), "supply".to_string()],
                vec!["a".to_string(), "demand".to_string()],
                vec!["b".to_string(), "supply".to_string()],
                vec!["b".to_string(), "demand".to_string()],
            ]
        );
    }

    #[test]
    fn index_product_of_no_dimensions_is_one_scalar_position() {
        let dataset = demo_dataset();
        assert_eq!(dataset.index_product(&[]).unwrap(), vec![Vec::<String>::new()]);
    }

    #[test]
    fn array_rejects_wrong_value_count() {
        let err = DataArray::new(
            vec!["nodes".to_string()],
            vec![2],
            vec![1.0, 2.0, 3.0],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ModelError::ShapeMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn value_at_treats_nan_as_missing() {
        let array = DataArray::new(
            vec!["nodes".to_string(), "techs".to_string()],
            vec![2, 2],
            vec![10.0, f64::NAN, 5.0, 0.0],
        )
        .unwrap();
        assert_eq!(array.value_at(&[0, 0]).unwrap(), Some(10.0));
        assert_eq!(array.value_at(&[0, 1]).unwrap(), None);
        assert_eq!(array.value_at(&[1, 0]).unwrap(), Some(5.0));
    }

    #[test]
    fn value_at_checks_index_arity_and_range() {
        let array = DataArray::new(vec!["nodes".to_string()], vec![2], vec![1.0, 2.0]).unwrap();
        assert_eq!(
            array.value_at(&[0, 0]).unwrap_err().code(),
            "DATA_DIMENSION_MISMATCH"
        );
        assert_eq!(array.value_at(&[2]).unwrap_err().code(), "DATA_INDEX_RANGE");
    }

    #[test]
    fn scalar_array_has_one_position() {
        let array = DataArray::scalar(42.0);
        assert!(array.is_scalar());
        assert_eq!(array.value_at(&[]).unwrap(), Some(42.0));
    }
}
