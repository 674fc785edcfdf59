//! Equation lowering.
//!
//! Identifiers resolve against the sub-registries in a fixed order: variable
//! first, then global expression, then parameter. A reference that has no
//! value at the current index position marks the cell as missing instead of
//! faulting, so indexed components skip sparse positions.

use crate::error::BackendError;
use faro_core::Dataset;
use faro_expr::{AstNode, BinOp, Expr};

use super::LpBackend;

/// Current index position while lowering one cell of a component.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexFrame<'a> {
    pub(crate) dims: &'a [String],
    pub(crate) labels: &'a [String],
}

impl IndexFrame<'_> {
    /// Dataset index of each `target_dims` entry, read from this frame.
    pub(crate) fn positions_for(
        &self,
        dataset: &Dataset,
        component: &str,
        name: &str,
        target_dims: &[String],
    ) -> Result<Vec<usize>, BackendError> {
        let mut positions = Vec::with_capacity(target_dims.len());
        for dim in target_dims {
            let Some(slot) = self.dims.iter().position(|d| d == dim) else {
                return Err(BackendError::DimensionMismatch {
                    component: component.to_string(),
                    name: name.to_string(),
                });
            };
            positions.push(dataset.position(dim, &self.labels[slot])?);
        }
        Ok(positions)
    }
}

/// Outcome of lowering one node at one index position.
pub(crate) enum Lowered {
    Expr(Expr),
    /// A referenced value is absent at this position; carries the name that
    /// had no value.
    Missing(String),
}

impl LpBackend {
    pub(crate) fn lower_node(
        &self,
        component: &str,
        node: &AstNode,
        frame: &IndexFrame<'_>,
    ) -> Result<Lowered, BackendError> {
        match node {
            AstNode::Number(value) => Ok(Lowered::Expr(Expr::from_constant(*value))),
            AstNode::Ident(name) => self.resolve_ident(component, name, frame),
            AstNode::Neg(inner) => Ok(match self.lower_node(component, inner, frame)? {
                Lowered::Expr(expr) => Lowered::Expr(expr.scale(-1.0)),
                missing => missing,
            }),
            AstNode::BinOp { op, lhs, rhs } => {
                let left = match self.lower_node(component, lhs, frame)? {
                    Lowered::Expr(expr) => expr,
                    missing => return Ok(missing),
                };
                let right = match self.lower_node(component, rhs, frame)? {
                    Lowered::Expr(expr) => expr,
                    missing => return Ok(missing),
                };
                self.combine(component, *op, &left, &right).map(Lowered::Expr)
            }
        }
    }

    fn combine(
        &self,
        component: &str,
        op: BinOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<Expr, BackendError> {
        match op {
            BinOp::Add => Ok(left.add(right)),
            BinOp::Sub => Ok(left.add(&right.scale(-1.0))),
            BinOp::Mul => {
                if left.is_constant() {
                    Ok(right.scale(left.constant()))
                } else if right.is_constant() {
                    Ok(left.scale(right.constant()))
                } else {
                    Err(BackendError::Nonlinear {
                        component: component.to_string(),
                    })
                }
            }
            BinOp::Div => {
                if !right.is_constant() {
                    return Err(BackendError::Nonlinear {
                        component: component.to_string(),
                    });
                }
                let divisor = right.constant();
                if divisor == 0.0 {
                    return Err(BackendError::DivisionByZero {
                        component: component.to_string(),
                    });
                }
                Ok(left.scale(1.0 / divisor))
            }
        }
    }

    fn resolve_ident(
        &self,
        component: &str,
        name: &str,
        frame: &IndexFrame<'_>,
    ) -> Result<Lowered, BackendError> {
        if let Some(group) = self.variables.get(name) {
            let indices = frame.positions_for(&self.dataset, component, name, &group.dims)?;
            let flat = flat_offset(&group.shape, &indices);
            return Ok(Lowered::Expr(Expr::var(group.ids[flat])));
        }
        if let Some(group) = self.global_expressions.get(name) {
            let indices = frame.positions_for(&self.dataset, component, name, &group.dims)?;
            let flat = flat_offset(&group.shape, &indices);
            return Ok(match &group.cells[flat] {
                Some(expr) => Lowered::Expr(expr.clone()),
                None => Lowered::Missing(name.to_string()),
            });
        }
        if let Some(array) = self.parameters.get(name) {
            let indices = frame.positions_for(&self.dataset, component, name, array.dims())?;
            return Ok(match array.value_at(&indices)? {
                Some(value) => Lowered::Expr(Expr::from_constant(value)),
                None => Lowered::Missing(name.to_string()),
            });
        }
        Err(BackendError::UnknownIdentifier {
            component: component.to_string(),
            name: name.to_string(),
        })
    }
}

/// Row-major flat offset of `indices` within `shape`.
pub(crate) fn flat_offset(shape: &[usize], indices: &[usize]) -> usize {
    indices
        .iter()
        .zip(shape)
        .fold(0, |flat, (&index, &extent)| flat * extent + index)
}
