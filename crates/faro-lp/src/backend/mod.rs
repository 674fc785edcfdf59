//! In-memory LP model builder.
//!
//! # Module Organization
//!
//! The backend is split across focused submodules:
//! - `materialize`: registration of parameters and math components
//! - `lower`: equation lowering against the index dataset
//! - `writer`: LP text serialization
//!
//! An [`LpBackend`] keeps one registry per component group. Registration
//! assigns dense positional IDs; labels are derived at render time, so
//! switching to verbose naming never re-registers anything.

mod lower;
mod materialize;
mod writer;

pub(crate) use writer::{float_approx_equal, format_lp_number};

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::arrays::{ConstraintArray, ConstraintCell, ExprArray};
use crate::error::BackendError;
use crate::types::Bounds;
use faro_core::{ComponentDef, DataArray, Dataset, EquationDef, ObjectiveSense};
use faro_expr::{ConstraintExpr, ConstraintId, Expr, VariableId};

/// Objective synthesized when the math defines none.
pub const DUMMY_OBJECTIVE: &str = "dummy_obj";

/// Optimization model under construction, with named sub-registries for
/// parameters, variables, global expressions, constraints, and objectives.
#[derive(Debug, Clone)]
pub struct LpBackend {
    pub(crate) dataset: Dataset,
    pub(crate) verbose: bool,
    pub(crate) parameters: IndexMap<String, DataArray>,
    pub(crate) variables: IndexMap<String, VariableGroup>,
    pub(crate) global_expressions: IndexMap<String, ExpressionGroup>,
    pub(crate) constraints: IndexMap<String, ConstraintGroup>,
    pub(crate) objectives: IndexMap<String, ObjectiveComponent>,
    pub(crate) active_objective: Option<String>,
    pub(crate) variable_entries: Vec<VariableEntry>,
    pub(crate) constraint_entries: Vec<ConstraintEntry>,
    pub(crate) component_meta: BTreeMap<String, serde_json::Value>,
}

/// Indexed variable component: one ID per position, row-major over `dims`.
#[derive(Debug, Clone)]
pub(crate) struct VariableGroup {
    pub(crate) dims: Vec<String>,
    pub(crate) shape: Vec<usize>,
    pub(crate) ids: Vec<VariableId>,
}

/// Indexed global expression component. A `None` cell marks a position the
/// defining equation could not be evaluated at.
#[derive(Debug, Clone)]
pub(crate) struct ExpressionGroup {
    pub(crate) dims: Vec<String>,
    pub(crate) shape: Vec<usize>,
    pub(crate) cells: Vec<Option<Expr>>,
}

/// Indexed constraint component, cells pointing into `constraint_entries`.
#[derive(Debug, Clone)]
pub(crate) struct ConstraintGroup {
    pub(crate) dims: Vec<String>,
    pub(crate) cells: Vec<Option<ConstraintId>>,
}

#[derive(Debug, Clone)]
pub(crate) struct ObjectiveComponent {
    pub(crate) sense: ObjectiveSense,
    pub(crate) equation_text: String,
}

#[derive(Debug, Clone)]
pub(crate) struct VariableEntry {
    pub(crate) component: String,
    pub(crate) labels: Vec<String>,
    pub(crate) bounds: Bounds,
}

#[derive(Debug, Clone)]
pub(crate) struct ConstraintEntry {
    pub(crate) component: String,
    pub(crate) labels: Vec<String>,
    pub(crate) row: ConstraintExpr,
}

impl LpBackend {
    /// Empty backend over the given index dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            verbose: false,
            parameters: IndexMap::new(),
            variables: IndexMap::new(),
            global_expressions: IndexMap::new(),
            constraints: IndexMap::new(),
            objectives: IndexMap::new(),
            active_objective: None,
            variable_entries: Vec::new(),
            constraint_entries: Vec::new(),
            component_meta: BTreeMap::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Switch rendering to human-readable labels built from component names
    /// and index labels, e.g. `flow_cap[a,boiler]`.
    pub fn verbose_strings(&mut self) {
        self.verbose = true;
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn num_variables(&self) -> usize {
        self.variable_entries.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraint_entries.len()
    }

    pub fn parameter(&self, name: &str) -> Option<&DataArray> {
        self.parameters.get(name)
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn expression_names(&self) -> impl Iterator<Item = &str> {
        self.global_expressions.keys().map(String::as_str)
    }

    pub fn constraint_names(&self) -> impl Iterator<Item = &str> {
        self.constraints.keys().map(String::as_str)
    }

    pub fn objective_names(&self) -> impl Iterator<Item = &str> {
        self.objectives.keys().map(String::as_str)
    }

    /// Registration metadata recorded for a component.
    pub fn component_meta(&self, name: &str) -> Option<&serde_json::Value> {
        self.component_meta.get(name)
    }

    // ── Objective management ────────────────────────────────

    /// Guarantee at least one objective exists. LP text cannot be written
    /// without an objective section, so when the math carries none a constant
    /// placeholder is synthesized.
    pub fn ensure_objective(&mut self) -> Result<(), BackendError> {
        if !self.objectives.is_empty() {
            return Ok(());
        }
        let def = ComponentDef {
            sense: Some(ObjectiveSense::Minimize),
            equations: vec![EquationDef::new("1 + 1")],
            ..ComponentDef::default()
        };
        self.add_objective(DUMMY_OBJECTIVE, &def)?;
        tracing::debug!(
            component = "backend",
            operation = "ensure_objective",
            status = "synthesized",
            name = DUMMY_OBJECTIVE,
            "No objective defined, synthesized a constant placeholder"
        );
        Ok(())
    }

    /// Mark `name` as the objective the LP file optimizes.
    pub fn activate_objective(&mut self, name: &str) -> Result<(), BackendError> {
        if !self.objectives.contains_key(name) {
            return Err(BackendError::UnknownObjective {
                name: name.to_string(),
            });
        }
        self.active_objective = Some(name.to_string());
        Ok(())
    }

    pub fn active_objective(&self) -> Option<&str> {
        self.active_objective.as_deref()
    }

    pub fn first_objective(&self) -> Option<&str> {
        self.objectives.keys().next().map(String::as_str)
    }

    // ── Rendered views ──────────────────────────────────────

    /// LP symbols of a variable component, one per index position.
    pub fn variable_array(&self, name: &str) -> Option<ExprArray> {
        let group = self.variables.get(name)?;
        let labels = self.dim_label_sets(&group.dims)?;
        let cells = group
            .ids
            .iter()
            .map(|id| Some(self.variable_label(*id)))
            .collect();
        Some(ExprArray::from_parts(group.dims.clone(), labels, cells))
    }

    /// Rendered defining expressions of a global expression component.
    pub fn expression_array(&self, name: &str) -> Option<ExprArray> {
        let group = self.global_expressions.get(name)?;
        let labels = self.dim_label_sets(&group.dims)?;
        let cells = group
            .cells
            .iter()
            .map(|cell| cell.as_ref().map(|expr| self.render_expr(expr)))
            .collect();
        Some(ExprArray::from_parts(group.dims.clone(), labels, cells))
    }

    /// Materialized rows of a constraint component.
    pub fn constraint_array(&self, name: &str) -> Option<ConstraintArray> {
        let group = self.constraints.get(name)?;
        let labels = self.dim_label_sets(&group.dims)?;
        let cells = group
            .cells
            .iter()
            .map(|cell| {
                cell.map(|id| {
                    let row = &self.constraint_entries[id.index()].row;
                    ConstraintCell {
                        body: self.render_expr(row.expr()),
                        sense: row.sense(),
                        rhs: row.rhs(),
                    }
                })
            })
            .collect();
        Some(ConstraintArray::from_parts(group.dims.clone(), labels, cells))
    }

    fn dim_label_sets(&self, dims: &[String]) -> Option<Vec<Vec<String>>> {
        dims.iter()
            .map(|dim| self.dataset.labels(dim).ok().map(<[String]>::to_vec))
            .collect()
    }

    // ── Label and expression rendering ──────────────────────

    pub(crate) fn variable_label(&self, id: VariableId) -> String {
        if self.verbose {
            let entry = &self.variable_entries[id.index()];
            component_label(&entry.component, &entry.labels)
        } else {
            format!("x{}", id.inner())
        }
    }

    pub(crate) fn constraint_label(&self, id: ConstraintId) -> String {
        if self.verbose {
            let entry = &self.constraint_entries[id.index()];
            component_label(&entry.component, &entry.labels)
        } else {
            format!("c{}", id.inner())
        }
    }

    /// Render a linear expression with merged terms, unit coefficients
    /// elided, and the constant folded onto the end.
    pub(crate) fn render_expr(&self, expr: &Expr) -> String {
        use std::fmt::Write as _;

        let mut rendered = String::new();
        for (index, (id, coeff)) in expr.normalized_terms().into_iter().enumerate() {
            let negative = coeff < 0.0;
            let magnitude = coeff.abs();
            let label = self.variable_label(id);
            let term = if float_approx_equal(magnitude, 1.0) {
                label
            } else {
                format!("{} {}", format_lp_number(magnitude), label)
            };
            if index == 0 {
                if negative {
                    rendered.push('-');
                }
                rendered.push_str(&term);
            } else if negative {
                let _ = write!(rendered, " - {term}");
            } else {
                let _ = write!(rendered, " + {term}");
            }
        }

        let constant = expr.constant();
        if rendered.is_empty() {
            return format_lp_number(constant);
        }
        if constant != 0.0 {
            if constant < 0.0 {
                let _ = write!(rendered, " - {}", format_lp_number(constant.abs()));
            } else {
                let _ = write!(rendered, " + {}", format_lp_number(constant));
            }
        }
        rendered
    }
}

fn component_label(component: &str, labels: &[String]) -> String {
    if labels.is_empty() {
        component.to_string()
    } else {
        format!("{}[{}]", component, labels.join(","))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    mod materialize;
    mod support;
    mod writer;

    fn backend_with_two_variables() -> LpBackend {
        let mut dataset = Dataset::new();
        dataset.add_dimension("techs", vec!["boiler".to_string(), "chp".to_string()]);
        let mut backend = LpBackend::new(dataset);
        for tech in ["boiler", "chp"] {
            backend.variable_entries.push(VariableEntry {
                component: "flow_cap".to_string(),
                labels: vec![tech.to_string()],
                bounds: Bounds::new(0.0, 10.0),
            });
        }
        backend.variables.insert(
            "flow_cap".to_string(),
            VariableGroup {
                dims: vec!["techs".to_string()],
                shape: vec![2],
                ids: vec![VariableId::new(0), VariableId::new(1)],
            },
        );
        backend
    }

    #[test]
    fn labels_are_positional_by_default() {
        let backend = backend_with_two_variables();
        assert!(!backend.is_verbose());
        assert_eq!(backend.variable_label(VariableId::new(1)), "x1");
        assert_eq!(backend.constraint_label(ConstraintId::new(0)), "c0");
    }

    #[test]
    fn verbose_labels_join_index_labels_with_commas() {
        let mut backend = backend_with_two_variables();
        backend.verbose_strings();
        assert_eq!(
            backend.variable_label(VariableId::new(0)),
            "flow_cap[boiler]"
        );
    }

    #[test]
    fn render_expr_merges_terms_and_elides_unit_coefficients() {
        let backend = backend_with_two_variables();
        let expr = Expr::term(VariableId::new(0), 2.0)
            .add(&Expr::term(VariableId::new(1), -1.0))
            .add(&Expr::term(VariableId::new(0), -1.0));
        assert_eq!(backend.render_expr(&expr), "x0 - x1");
    }

    #[test]
    fn render_expr_folds_constants() {
        let backend = backend_with_two_variables();
        assert_eq!(backend.render_expr(&Expr::from_constant(0.0)), "0");
        assert_eq!(backend.render_expr(&Expr::from_constant(-2.5)), "-2.5");

        let expr = Expr::var(VariableId::new(0)).add_constant(-3.0);
        assert_eq!(backend.render_expr(&expr), "x0 - 3");
    }

    #[test]
    fn variable_array_lists_symbols_row_major() {
        let backend = backend_with_two_variables();
        let array = backend.variable_array("flow_cap").unwrap();
        assert_eq!(array.dims(), ["techs"]);
        let cells: Vec<_> = array.cells().collect();
        assert_eq!(cells, vec![Some("x0"), Some("x1")]);
        assert!(backend.variable_array("flow_out").is_none());
    }
}
