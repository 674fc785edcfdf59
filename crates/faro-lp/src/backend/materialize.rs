//! Registration of parameters and math components.
//!
//! Each `add_*` operation materializes one named component over its
//! `foreach` dimensions: every index position is visited in row-major order
//! and lowered against the values registered so far. Registration order
//! therefore matters; a component can only reference what precedes it.

use crate::error::BackendError;
use crate::types::Bounds;
use faro_core::{
    BoundExpr, BoundsDef, ComponentDef, ComponentGroup, DataArray, EquationDef, MathSpec, Model,
};
use faro_expr::{parse_equation, ComparisonSense, ConstraintId, EquationAst, VariableId};

use super::lower::{IndexFrame, Lowered};
use super::{
    ConstraintEntry, ConstraintGroup, ExpressionGroup, LpBackend, ObjectiveComponent,
    VariableEntry, VariableGroup,
};

impl LpBackend {
    /// Register every parameter array of an assembled model.
    pub fn add_all_parameters(&mut self, model: &Model) -> Result<(), BackendError> {
        for (name, array) in model.parameters() {
            self.add_parameter(name, array.clone())?;
        }
        tracing::debug!(
            component = "backend",
            operation = "add_all_parameters",
            status = "success",
            count = self.parameters.len(),
            "Registered model parameters"
        );
        Ok(())
    }

    pub fn add_parameter(&mut self, name: &str, array: DataArray) -> Result<(), BackendError> {
        if self.parameters.contains_key(name) {
            return Err(BackendError::DuplicateName {
                group: "parameters",
                name: name.to_string(),
            });
        }
        self.parameters.insert(name.to_string(), array);
        Ok(())
    }

    /// Register a decision variable at every position of its `foreach`
    /// dimensions, resolving bounds per position.
    pub fn add_variable(&mut self, name: &str, def: &ComponentDef) -> Result<(), BackendError> {
        if self.variables.contains_key(name) {
            return Err(BackendError::DuplicateName {
                group: ComponentGroup::Variables.key(),
                name: name.to_string(),
            });
        }
        let dims = def.foreach.clone();
        let shape = self.dataset.shape(&dims)?;
        let combos = self.dataset.index_product(&dims)?;

        let mut ids = Vec::with_capacity(combos.len());
        for combo in &combos {
            let frame = IndexFrame {
                dims: &dims,
                labels: combo,
            };
            let bounds = self.resolve_bounds(name, def.bounds.as_ref(), &frame)?;
            let id = VariableId::new(self.variable_entries.len() as u32);
            self.variable_entries.push(VariableEntry {
                component: name.to_string(),
                labels: combo.clone(),
                bounds,
            });
            ids.push(id);
        }
        self.variables
            .insert(name.to_string(), VariableGroup { dims, shape, ids });
        self.record_meta(name, ComponentGroup::Variables, def);
        Ok(())
    }

    /// Register a named expression. Positions where the defining equation
    /// references a missing value are left empty.
    pub fn add_global_expression(
        &mut self,
        name: &str,
        def: &ComponentDef,
    ) -> Result<(), BackendError> {
        if self.global_expressions.contains_key(name) {
            return Err(BackendError::DuplicateName {
                group: ComponentGroup::GlobalExpressions.key(),
                name: name.to_string(),
            });
        }
        let ast = parse_component_equation(name, def)?;
        let EquationAst::Expression(body) = ast else {
            return Err(BackendError::UnexpectedComparison {
                component: name.to_string(),
            });
        };
        let dims = def.foreach.clone();
        let shape = self.dataset.shape(&dims)?;
        let combos = self.dataset.index_product(&dims)?;

        let mut cells = Vec::with_capacity(combos.len());
        for combo in &combos {
            let frame = IndexFrame {
                dims: &dims,
                labels: combo,
            };
            match self.lower_node(name, &body, &frame)? {
                Lowered::Expr(expr) => cells.push(Some(expr)),
                Lowered::Missing(_) => cells.push(None),
            }
        }
        self.global_expressions
            .insert(name.to_string(), ExpressionGroup { dims, shape, cells });
        self.record_meta(name, ComponentGroup::GlobalExpressions, def);
        Ok(())
    }

    /// Register a constraint row at every position where both sides of its
    /// comparison can be evaluated.
    pub fn add_constraint(&mut self, name: &str, def: &ComponentDef) -> Result<(), BackendError> {
        if self.constraints.contains_key(name) {
            return Err(BackendError::DuplicateName {
                group: ComponentGroup::Constraints.key(),
                name: name.to_string(),
            });
        }
        let ast = parse_component_equation(name, def)?;
        let EquationAst::Comparison { lhs, op, rhs } = ast else {
            return Err(BackendError::MissingComparison {
                component: name.to_string(),
            });
        };
        let dims = def.foreach.clone();
        let combos = self.dataset.index_product(&dims)?;

        let mut cells = Vec::with_capacity(combos.len());
        for combo in &combos {
            let frame = IndexFrame {
                dims: &dims,
                labels: combo,
            };
            let left = self.lower_node(name, &lhs, &frame)?;
            let right = self.lower_node(name, &rhs, &frame)?;
            match (left, right) {
                (Lowered::Expr(left), Lowered::Expr(right)) => {
                    let row = match op {
                        ComparisonSense::LessEqual => left.le_expr(&right),
                        ComparisonSense::GreaterEqual => left.ge_expr(&right),
                        ComparisonSense::Equal => left.eq_expr(&right),
                    };
                    let id = ConstraintId::new(self.constraint_entries.len() as u32);
                    self.constraint_entries.push(ConstraintEntry {
                        component: name.to_string(),
                        labels: combo.clone(),
                        row,
                    });
                    cells.push(Some(id));
                }
                _ => cells.push(None),
            }
        }
        self.constraints
            .insert(name.to_string(), ConstraintGroup { dims, cells });
        self.record_meta(name, ComponentGroup::Constraints, def);
        Ok(())
    }

    /// Register a scalar objective. The equation must evaluate at the scalar
    /// position; its canonical text is what the LP writer prints.
    pub fn add_objective(&mut self, name: &str, def: &ComponentDef) -> Result<(), BackendError> {
        if self.objectives.contains_key(name) {
            return Err(BackendError::DuplicateName {
                group: ComponentGroup::Objectives.key(),
                name: name.to_string(),
            });
        }
        if !def.foreach.is_empty() {
            return Err(BackendError::ObjectiveNotScalar {
                name: name.to_string(),
            });
        }
        let sense = def.sense.ok_or_else(|| BackendError::MissingSense {
            component: name.to_string(),
        })?;
        let ast = parse_component_equation(name, def)?;
        let EquationAst::Expression(body) = ast else {
            return Err(BackendError::UnexpectedComparison {
                component: name.to_string(),
            });
        };

        let frame = IndexFrame {
            dims: &[],
            labels: &[],
        };
        if let Lowered::Missing(missing) = self.lower_node(name, &body, &frame)? {
            return Err(BackendError::MissingValue {
                component: name.to_string(),
                name: missing,
            });
        }

        self.objectives.insert(
            name.to_string(),
            ObjectiveComponent {
                sense,
                equation_text: body.to_string(),
            },
        );
        self.record_meta(name, ComponentGroup::Objectives, def);
        Ok(())
    }

    /// Register every component of one math group, in declaration order.
    pub fn apply_group(
        &mut self,
        math: &MathSpec,
        group: ComponentGroup,
    ) -> Result<(), BackendError> {
        for (name, def) in math.group(group) {
            match group {
                ComponentGroup::Variables => self.add_variable(name, def)?,
                ComponentGroup::GlobalExpressions => self.add_global_expression(name, def)?,
                ComponentGroup::Constraints => self.add_constraint(name, def)?,
                ComponentGroup::Objectives => self.add_objective(name, def)?,
            }
        }
        Ok(())
    }

    /// Register every component of a math spec, group by group.
    pub fn apply_math(&mut self, math: &MathSpec) -> Result<(), BackendError> {
        for group in ComponentGroup::ALL {
            self.apply_group(math, group)?;
        }
        tracing::debug!(
            component = "backend",
            operation = "apply_math",
            status = "success",
            variables = self.variable_entries.len(),
            constraints = self.constraint_entries.len(),
            objectives = self.objectives.len(),
            "Materialized math components"
        );
        Ok(())
    }

    fn resolve_bounds(
        &self,
        name: &str,
        bounds: Option<&BoundsDef>,
        frame: &IndexFrame<'_>,
    ) -> Result<Bounds, BackendError> {
        let Some(bounds) = bounds else {
            return Ok(Bounds::unbounded());
        };
        let lower = self.resolve_bound_side(name, bounds.min.as_ref(), frame, f64::NEG_INFINITY)?;
        let upper = self.resolve_bound_side(name, bounds.max.as_ref(), frame, f64::INFINITY)?;
        let resolved = Bounds::new(lower, upper);
        if !resolved.is_valid() {
            return Err(BackendError::InvalidBounds {
                name: name.to_string(),
                lower,
                upper,
            });
        }
        Ok(resolved)
    }

    /// One side of a bound pair. A referenced parameter must be registered;
    /// a registered parameter that has no value at this position leaves the
    /// side unbounded.
    fn resolve_bound_side(
        &self,
        name: &str,
        side: Option<&BoundExpr>,
        frame: &IndexFrame<'_>,
        fallback: f64,
    ) -> Result<f64, BackendError> {
        match side {
            None => Ok(fallback),
            Some(BoundExpr::Literal(value)) => Ok(*value),
            Some(BoundExpr::Reference(param)) => {
                let Some(array) = self.parameters.get(param) else {
                    return Err(BackendError::UnknownParameter {
                        name: param.clone(),
                    });
                };
                let indices = frame.positions_for(&self.dataset, name, param, array.dims())?;
                match array.value_at(&indices)? {
                    Some(value) => Ok(value),
                    None => {
                        tracing::debug!(
                            component = "backend",
                            operation = "resolve_bounds",
                            status = "missing",
                            variable = name,
                            parameter = param.as_str(),
                            "Bound parameter has no value at this position, side left unbounded"
                        );
                        Ok(fallback)
                    }
                }
            }
        }
    }

    fn record_meta(&mut self, name: &str, group: ComponentGroup, def: &ComponentDef) {
        let meta = serde_json::json!({
            "group": group.key(),
            "description": def.description,
            "foreach": def.foreach,
        });
        self.component_meta.insert(name.to_string(), meta);
    }
}

fn single_equation<'a>(name: &str, def: &'a ComponentDef) -> Result<&'a EquationDef, BackendError> {
    match def.equations.as_slice() {
        [] => Err(BackendError::MissingEquation {
            component: name.to_string(),
        }),
        [only] => Ok(only),
        _ => Err(BackendError::AmbiguousEquations {
            component: name.to_string(),
        }),
    }
}

fn parse_component_equation(name: &str, def: &ComponentDef) -> Result<EquationAst, BackendError> {
    let equation = single_equation(name, def)?;
    parse_equation(&equation.expression).map_err(|error| BackendError::Equation {
        component: name.to_string(),
        error,
    })
}
