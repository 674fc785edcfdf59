//! LP text serialization.
//!
//! The emitted layout is fixed: sense keyword, objective line, `subject to`
//! rows, `bounds` lines, `end`. Section headers are printed even when a
//! section is empty, so downstream scrapers can anchor on them.

use std::path::Path;

use crate::error::WriterError;
use crate::types::Bounds;
use faro_expr::{ConstraintId, VariableId};

use super::LpBackend;

const FLOAT_EQ_EPSILON: f64 = 1e-12;

impl LpBackend {
    /// Serialize the current registry state to LP text at `path`.
    pub fn to_lp(&self, path: impl AsRef<Path>) -> Result<(), WriterError> {
        let path = path.as_ref();
        let text = self.render_lp()?;
        std::fs::write(path, text).map_err(|err| WriterError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        tracing::debug!(
            component = "backend",
            operation = "to_lp",
            status = "success",
            path = %path.display(),
            variables = self.num_variables(),
            constraints = self.num_constraints(),
            "Wrote LP file"
        );
        Ok(())
    }

    /// Render the LP text for the current registry state.
    pub fn render_lp(&self) -> Result<String, WriterError> {
        let name = self.active_objective().ok_or(WriterError::NoActiveObjective)?;
        let Some(objective) = self.objectives.get(name) else {
            return Err(WriterError::NoActiveObjective);
        };

        let mut lines = Vec::new();
        lines.push(objective.sense.keyword().to_string());
        lines.push(format!(" {}: {}", name, objective.equation_text));
        lines.push(String::new());

        lines.push("subject to".to_string());
        for (index, entry) in self.constraint_entries.iter().enumerate() {
            let label = self.constraint_label(ConstraintId::new(index as u32));
            lines.push(format!(
                " {}: {} {} {}",
                label,
                self.render_expr(entry.row.expr()),
                entry.row.sense().lp_symbol(),
                format_lp_number(entry.row.rhs()),
            ));
        }
        lines.push(String::new());

        lines.push("bounds".to_string());
        for (index, entry) in self.variable_entries.iter().enumerate() {
            let label = self.variable_label(VariableId::new(index as u32));
            lines.push(format!(" {}", format_bounds_line(&label, entry.bounds)));
        }
        lines.push(String::new());

        lines.push("end".to_string());
        let mut text = lines.join("\n");
        text.push('\n');
        Ok(text)
    }
}

/// Bounds line for one variable. Infinite sides are omitted; a variable
/// unbounded on both sides is declared `free`.
pub(crate) fn format_bounds_line(label: &str, bounds: Bounds) -> String {
    let lower_finite = bounds.lower.is_finite();
    let upper_finite = bounds.upper.is_finite();
    if lower_finite && upper_finite {
        format!(
            "{} <= {} <= {}",
            format_lp_number(bounds.lower),
            label,
            format_lp_number(bounds.upper)
        )
    } else if lower_finite {
        format!("{} <= {}", format_lp_number(bounds.lower), label)
    } else if upper_finite {
        format!("{} <= {}", label, format_lp_number(bounds.upper))
    } else {
        format!("{label} free")
    }
}

/// Fixed-precision float rendering with trailing zeros trimmed, so the same
/// value always prints the same way regardless of how it was computed.
pub(crate) fn format_lp_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let mut formatted = format!("{value:.12}");
    if formatted.contains('.') {
        while formatted.ends_with('0') {
            formatted.pop();
        }
        if formatted.ends_with('.') {
            formatted.pop();
        }
    }
    if formatted == "-0" {
        "0".to_string()
    } else {
        formatted
    }
}

pub(crate) fn float_approx_equal(lhs: f64, rhs: f64) -> bool {
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= FLOAT_EQ_EPSILON * scale
}

#[cfg(test)]
mod tests {
    use super::{float_approx_equal, format_bounds_line, format_lp_number};
    use crate::types::Bounds;

    #[test]
    fn numbers_trim_trailing_zeros() {
        assert_eq!(format_lp_number(10.0), "10");
        assert_eq!(format_lp_number(0.1), "0.1");
        assert_eq!(format_lp_number(-0.0), "0");
        assert_eq!(format_lp_number(1e6), "1000000");
        assert_eq!(format_lp_number(-2.5), "-2.5");
        assert_eq!(format_lp_number(f64::INFINITY), "inf");
        assert_eq!(format_lp_number(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn bounds_lines_skip_infinite_sides() {
        assert_eq!(
            format_bounds_line("x0", Bounds::new(0.0, 10.0)),
            "0 <= x0 <= 10"
        );
        assert_eq!(
            format_bounds_line("x1", Bounds::new(0.0, f64::INFINITY)),
            "0 <= x1"
        );
        assert_eq!(
            format_bounds_line("x2", Bounds::new(f64::NEG_INFINITY, 5.0)),
            "x2 <= 5"
        );
        assert_eq!(format_bounds_line("x3", Bounds::unbounded()), "x3 free");
    }

    #[test]
    fn approx_equality_scales_with_magnitude() {
        assert!(float_approx_equal(1.0, 1.0 + 1e-13));
        assert!(float_approx_equal(1e9, 1e9 + 1e-4));
        assert!(!float_approx_equal(1.0, 1.001));
    }
}
