//! Canonical LP export.
//!
//! [`build_lp`] drives one full export: a fresh backend is created from the
//! model's run configuration, parameters and variables are materialized,
//! test-supplied math is layered on top for that call only, and the written
//! LP text is normalized for byte-stable comparison.

use std::path::Path;

use faro_core::{ComponentGroup, MathSpec, Model};
use faro_lp::{BackendError, BackendRegistry, LpBackend, WriterError};

/// Fault raised while exporting a model to canonical LP text.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    Backend(BackendError),
    Writer(WriterError),
    Io { path: String, message: String },
}

impl ExportError {
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::Backend(inner) => inner.code(),
            ExportError::Writer(inner) => inner.code(),
            ExportError::Io { .. } => "EXPORT_IO",
        }
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Backend(inner) => inner.fmt(f),
            ExportError::Writer(inner) => inner.fmt(f),
            ExportError::Io { path, message } => {
                write!(f, "[{}] Cannot canonicalize '{}': {}", self.code(), path, message)
            }
        }
    }
}

impl std::error::Error for ExportError {}

impl From<BackendError> for ExportError {
    fn from(error: BackendError) -> Self {
        ExportError::Backend(error)
    }
}

impl From<WriterError> for ExportError {
    fn from(error: WriterError) -> Self {
        ExportError::Writer(error)
    }
}

/// Export `model` to canonical LP text at `path`.
///
/// Every model parameter is registered, then every variable of the model's
/// math with `extra_math` merged on top. Beyond variables, only the
/// components `extra_math` itself supplies are added, so a test exports
/// exactly the rows under scrutiny. When no objective was supplied, a
/// constant placeholder is synthesized; the first registered objective is
/// the one activated. Labels are verbose. The populated backend is returned
/// for inspection; the model is never mutated.
pub fn build_lp(
    model: &Model,
    path: impl AsRef<Path>,
    extra_math: Option<&MathSpec>,
) -> Result<LpBackend, ExportError> {
    let path = path.as_ref();
    let registry = BackendRegistry::with_defaults();
    let mut backend = registry.create(model.run_config().backend(), model.dataset().clone())?;
    backend.add_all_parameters(model)?;

    let math = match extra_math {
        Some(extra) => model.math().merged_with(extra),
        None => model.math().clone(),
    };
    backend.apply_group(&math, ComponentGroup::Variables)?;
    if let Some(extra) = extra_math {
        backend.apply_group(extra, ComponentGroup::GlobalExpressions)?;
        backend.apply_group(extra, ComponentGroup::Constraints)?;
        backend.apply_group(extra, ComponentGroup::Objectives)?;
    }

    backend.ensure_objective()?;
    if let Some(objective) = backend.first_objective().map(str::to_string) {
        backend.activate_objective(&objective)?;
    }

    backend.verbose_strings();
    backend.to_lp(path)?;
    canonicalize(path)?;
    tracing::debug!(
        component = "export",
        operation = "build_lp",
        status = "success",
        path = %path.display(),
        variables = backend.num_variables(),
        constraints = backend.num_constraints(),
        "Exported canonical LP"
    );
    Ok(backend)
}

/// Normalize the LP text at `path` for byte-stable comparison.
///
/// Trailing whitespace is stripped from every line and trailing blank lines
/// are dropped, leaving exactly one final newline. Returns the canonical
/// text. Running it on an already canonical file rewrites the same bytes.
pub fn canonicalize(path: impl AsRef<Path>) -> Result<String, ExportError> {
    let path = path.as_ref();
    let mut lines = {
        let text = std::fs::read_to_string(path).map_err(|err| ExportError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        text.lines()
            .map(|line| line.trim_end().to_string())
            .collect::<Vec<_>>()
    };
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    let mut canonical = lines.join("\n");
    canonical.push('\n');
    std::fs::write(path, &canonical).map_err(|err| ExportError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::{build_lp, canonicalize};
    use crate::fixture::ModelFixture;
    use crate::sets::set_entries;
    use faro_core::MathSpec;
    use faro_lp::DUMMY_OBJECTIVE;
    use std::fs;

    #[test]
    fn export_registers_variables_and_synthesizes_the_placeholder_objective() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.lp");
        let model = ModelFixture::new()
            .with_override("techs.test_supply.flow_cap_max", 10.0)
            .build()
            .unwrap();

        let backend = build_lp(&model, &path, None).unwrap();
        assert_eq!(backend.active_objective(), Some(DUMMY_OBJECTIVE));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("minimize\n dummy_obj: 1 + 1\n"));
        assert!(text.contains("0 <= flow_cap[a,test_supply] <= 10"));
        // the node-level fixture value is not touched by the tech override
        assert!(text.contains("0 <= flow_cap[b,test_supply] <= 20"));
        assert!(text.ends_with("end\n"));
    }

    #[test]
    fn supplied_math_layers_on_top_for_one_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.lp");
        let model = ModelFixture::new().build().unwrap();
        let extra: MathSpec = serde_yaml::from_str(
            r#"
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
"#,
        )
        .unwrap();

        let backend = build_lp(&model, &path, Some(&extra)).unwrap();
        assert_eq!(backend.active_objective(), Some("total_cost"));
        assert!(!backend.objective_names().any(|name| name == DUMMY_OBJECTIVE));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("minimize\n total_cost: 2 + 2\n"));
        assert!(text.contains(" cap_ceiling[a,test_supply]: flow_cap[a,test_supply] <= 50"));
        assert!(text.contains(" cap_ceiling[b,test_supply]: flow_cap[b,test_supply] <= 20"));
        // no row where the capacity parameter has no value
        assert!(!text.contains("cap_ceiling[b,test_demand]"));

        // the overlay never reaches the model itself
        assert!(!model.math().constraints.contains_key("cap_ceiling"));
        assert!(model.math().objectives.is_empty());
    }

    #[test]
    fn the_first_supplied_objective_is_the_active_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.lp");
        let model = ModelFixture::new().build().unwrap();
        let extra: MathSpec = serde_yaml::from_str(
            r#"
objectives:
  cost_a:
    sense: minimize
    equations:
      - expression: "1 + 1"
  cost_b:
    sense: maximize
    equations:
      - expression: "2 + 2"
"#,
        )
        .unwrap();

        let backend = build_lp(&model, &path, Some(&extra)).unwrap();
        assert_eq!(backend.objective_names().count(), 2);
        assert_eq!(backend.active_objective(), Some("cost_a"));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("minimize\n cost_a: 1 + 1\n"));
        assert!(!text.contains("cost_b"));
    }

    #[test]
    fn catalog_sets_drive_override_combinations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.lp");
        let mut fixture = ModelFixture::new();
        for (override_path, value) in set_entries("supply_caps") {
            fixture = fixture.with_override(override_path, value.clone());
        }
        let model = fixture.build().unwrap();
        build_lp(&model, &path, None).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("0 <= flow_cap[a,test_supply] <= 10"));
        assert!(text.contains("0 <= flow_cap[b,test_supply] <= 10"));
    }

    #[test]
    fn exported_files_are_already_canonical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.lp");
        let model = ModelFixture::new().build().unwrap();
        build_lp(&model, &path, None).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
        assert!(!text.ends_with("\n\n"));
        for line in text.lines() {
            assert_eq!(line, line.trim_end());
        }
        assert_eq!(canonicalize(&path).unwrap(), text);
    }

    #[test]
    fn canonicalize_strips_trailing_noise_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messy.lp");
        fs::write(&path, "minimize \n obj: 1 + 1\t\r\n\nsubject to  \n\nend\n\n\n").unwrap();

        let first = canonicalize(&path).unwrap();
        assert_eq!(first, "minimize\n obj: 1 + 1\n\nsubject to\n\nend\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), first);

        let second = canonicalize(&path).unwrap();
        assert_eq!(second, first);
    }

    #[test]
    fn empty_files_canonicalize_to_a_single_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.lp");
        fs::write(&path, "").unwrap();
        assert_eq!(canonicalize(&path).unwrap(), "\n");
        assert_eq!(canonicalize(&path).unwrap(), "\n");
    }

    #[test]
    fn io_faults_carry_their_origin() {
        let dir = tempfile::tempdir().unwrap();
        let err = canonicalize(dir.path().join("absent.lp")).unwrap_err();
        assert_eq!(err.code(), "EXPORT_IO");

        let model = ModelFixture::new().build().unwrap();
        let path = dir.path().join("missing").join("model.lp");
        let err = build_lp(&model, &path, None).unwrap_err();
        assert_eq!(err.code(), "LP_IO");
    }

    #[test]
    fn backend_faults_propagate_with_their_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.lp");
        let model = ModelFixture::new().build().unwrap();
        let extra: MathSpec = serde_yaml::from_str(
            r#"
constraints:
  broken:
    equations:
      - expression: no_such_name <= 1
"#,
        )
        .unwrap();

        let err = build_lp(&model, &path, Some(&extra)).unwrap_err();
        assert_eq!(err.code(), "BACKEND_UNKNOWN_IDENTIFIER");
        assert!(err.to_string().contains("no_such_name"));
    }
}
