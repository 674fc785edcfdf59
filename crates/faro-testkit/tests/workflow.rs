//! End-to-end checks through the public surface only: fixture, export,
//! diagnostics, and the constraint-set catalog working together.

use faro_core::MathSpec;
use faro_lp::IndexSelection;
use faro_testkit::{
    build_lp, check_error_or_warning, check_variable_exists, enable_logging, set_entries,
    DiagnosticTarget, ExprSource, ModelFixture, Patterns,
};

const CAP_MATH: &str = r#"
constraints:
  cap_ceiling:
    foreach: [nodes, techs]
    equations:
      - expression: flow_cap <= flow_cap_max
objectives:
  total_cost:
    sense: minimize
    equations:
      - expression: "2 + 2"
"#;

#[test]
fn scenario_export_and_inspection_agree() {
    let _ = enable_logging(None);

    let model = ModelFixture::new()
        .with_scenario("constrained")
        .build()
        .expect("fixture model builds");
    let math: MathSpec = serde_yaml::from_str(CAP_MATH).expect("overlay math parses");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("model.lp");
    let backend = build_lp(&model, &path, Some(&math)).expect("export succeeds");

    let text = std::fs::read_to_string(&path).expect("exported file reads");
    assert!(text.starts_with("minimize\n total_cost: 2 + 2\n"));
    assert!(!text.contains("dummy_obj"));
    // the scenario caps test_supply at 5, the node-level override keeps b at 20
    assert!(text.contains(" cap_ceiling[a,test_supply]: flow_cap[a,test_supply] <= 5\n"));
    assert!(text.contains(" cap_ceiling[b,test_supply]: flow_cap[b,test_supply] <= 20\n"));
    assert!(text.ends_with("end\n"));

    let rows = backend.constraint_array("cap_ceiling").map(ExprSource::Constraint);
    assert_eq!(check_variable_exists(rows, "flow_cap", None), Ok(true));

    let supply_only = IndexSelection::new()
        .with("nodes", ["a"])
        .with("techs", ["test_supply"]);
    let rows = backend.constraint_array("cap_ceiling").map(ExprSource::Constraint);
    assert_eq!(
        check_variable_exists(rows, "flow_cap", Some(&supply_only)),
        Ok(true)
    );

    let absent = backend.constraint_array("no_such_component").map(ExprSource::Constraint);
    assert_eq!(check_variable_exists(absent, "flow_cap", None), Ok(false));
}

#[test]
fn loader_faults_read_as_diagnostics() {
    let _ = enable_logging(None);

    let err = ModelFixture::new()
        .with_scenario("absent_scenario")
        .build()
        .expect_err("unknown scenario fails");

    let target = DiagnosticTarget::Single(err.to_string());
    assert!(check_error_or_warning(
        &target,
        &Patterns::all(["MODEL_UNKNOWN_SCENARIO", "absent_scenario"]),
    ));
    assert!(!check_error_or_warning(&target, &Patterns::one("BACKEND_")));
}

#[test]
fn catalog_sets_tighten_the_fixture() {
    let _ = enable_logging(None);

    let mut fixture = ModelFixture::new();
    for (path, value) in set_entries("tight_system") {
        fixture = fixture.with_override(path, value.clone());
    }
    let model = fixture.build().expect("catalog overrides apply");
    assert_eq!(
        model.run_config().get("bigM").and_then(|value| value.as_f64()),
        Some(100.0)
    );

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("tight.lp");
    build_lp(&model, &path, None).expect("export succeeds");
    let text = std::fs::read_to_string(&path).expect("exported file reads");
    assert!(text.contains(" 0 <= flow_cap[a,test_supply] <= 2\n"));
}
