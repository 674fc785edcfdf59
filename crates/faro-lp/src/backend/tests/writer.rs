//! LP text layout.

use super::support;

#[test]
fn render_lp_lays_out_all_sections() {
    let mut backend = support::materialized_backend();
    backend.activate_objective("min_cost").unwrap();

    let text = backend.render_lp().unwrap();
    let expected = "\
minimize
 min_cost: 1 + 1

subject to
 c0: x0 <= 10
 c1: x2 <= 5
 c2: x3 <= 20

bounds
 0 <= x0 <= 10
 0 <= x1
 0 <= x2 <= 5
 0 <= x3 <= 20

end
";
    assert_eq!(text, expected);
}

#[test]
fn verbose_strings_switch_to_component_labels() {
    let mut backend = support::materialized_backend();
    backend.verbose_strings();
    backend.activate_objective("min_cost").unwrap();

    let text = backend.render_lp().unwrap();
    assert!(text.contains(" flow_cap_limit[a,supply]: flow_cap[a,supply] <= 10"));
    assert!(text.contains(" 0 <= flow_cap[a,demand]"));
    assert!(!text.contains("x0"));
}

#[test]
fn rendering_without_activation_faults() {
    let backend = support::materialized_backend();
    let err = backend.render_lp().unwrap_err();
    assert_eq!(err.code(), "LP_NO_ACTIVE_OBJECTIVE");
}

#[test]
fn to_lp_writes_the_rendered_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.lp");

    let mut backend = support::materialized_backend();
    backend.activate_objective("min_cost").unwrap();
    backend.to_lp(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, backend.render_lp().unwrap());
    assert!(written.ends_with("end\n"));
}

#[test]
fn write_failures_surface_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("model.lp");

    let mut backend = support::materialized_backend();
    backend.activate_objective("min_cost").unwrap();
    let err = backend.to_lp(&path).unwrap_err();
    assert_eq!(err.code(), "LP_IO");
}
