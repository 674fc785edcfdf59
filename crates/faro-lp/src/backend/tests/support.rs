//! Shared fixtures for backend tests.

use faro_core::{
    BoundExpr, BoundsDef, ComponentDef, DataArray, Dataset, EquationDef, ObjectiveSense,
};

use crate::backend::LpBackend;

pub fn demo_dataset() -> Dataset {
    let mut dataset = Dataset::new();
    dataset.add_dimension("nodes", vec!["a".to_string(), "b".to_string()]);
    dataset.add_dimension("techs", vec!["supply".to_string(), "demand".to_string()]);
    dataset
}

pub fn dims(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub fn variable_def(foreach: &[&str], bounds: Option<BoundsDef>) -> ComponentDef {
    ComponentDef {
        foreach: dims(foreach),
        bounds,
        ..ComponentDef::default()
    }
}

pub fn equation_def(foreach: &[&str], expression: &str) -> ComponentDef {
    ComponentDef {
        foreach: dims(foreach),
        equations: vec![EquationDef::new(expression)],
        ..ComponentDef::default()
    }
}

pub fn objective_def(expression: &str) -> ComponentDef {
    ComponentDef {
        equations: vec![EquationDef::new(expression)],
        sense: Some(ObjectiveSense::Minimize),
        ..ComponentDef::default()
    }
}

pub fn capped_bounds() -> Option<BoundsDef> {
    Some(BoundsDef {
        min: Some(BoundExpr::Literal(0.0)),
        max: Some(BoundExpr::Reference("flow_cap_max".to_string())),
    })
}

/// `flow_cap_max` over nodes x techs with the `(a, demand)` entry missing.
pub fn flow_cap_max_array() -> DataArray {
    DataArray::new(
        dims(&["nodes", "techs"]),
        vec![2, 2],
        vec![10.0, f64::NAN, 5.0, 20.0],
    )
    .unwrap()
}

pub fn cost_array() -> DataArray {
    DataArray::new(dims(&["techs"]), vec![2], vec![2.0, 3.0]).unwrap()
}

/// Backend with one component of every group registered.
pub fn materialized_backend() -> LpBackend {
    let mut backend = LpBackend::new(demo_dataset());
    backend
        .add_parameter("flow_cap_max", flow_cap_max_array())
        .unwrap();
    backend.add_parameter("cost_per_cap", cost_array()).unwrap();
    backend
        .add_variable(
            "flow_cap",
            &variable_def(&["nodes", "techs"], capped_bounds()),
        )
        .unwrap();
    backend
        .add_global_expression(
            "cost_investment",
            &equation_def(&["nodes", "techs"], "cost_per_cap * flow_cap"),
        )
        .unwrap();
    backend
        .add_constraint(
            "flow_cap_limit",
            &equation_def(&["nodes", "techs"], "flow_cap <= flow_cap_max"),
        )
        .unwrap();
    backend
        .add_objective("min_cost", &objective_def("1 + 1"))
        .unwrap();
    backend
}
