//! Equation parse errors.

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Equation text is empty or all whitespace
    Empty,
    /// Character outside the equation grammar
    UnexpectedChar(char),
    /// Numeric literal that does not parse as f64
    BadNumber(String),
    /// Token in a position the grammar does not allow
    UnexpectedToken(String),
    /// Input ended mid-expression
    UnexpectedEnd,
    /// More than one comparison operator
    ChainedComparison,
}

impl ParseError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::Empty => "EXPR_EMPTY",
            ParseError::UnexpectedChar(_) => "EXPR_UNEXPECTED_CHAR",
            ParseError::BadNumber(_) => "EXPR_BAD_NUMBER",
            ParseError::UnexpectedToken(_) => "EXPR_UNEXPECTED_TOKEN",
            ParseError::UnexpectedEnd => "EXPR_UNEXPECTED_END",
            ParseError::ChainedComparison => "EXPR_CHAINED_COMPARISON",
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "[{}] Equation text is empty", self.code()),
            ParseError::UnexpectedChar(ch) => {
                write!(f, "[{}] Unexpected character '{}'", self.code(), ch)
            }
            ParseError::BadNumber(text) => {
                write!(f, "[{}] Invalid numeric literal '{}'", self.code(), text)
            }
            ParseError::UnexpectedToken(found) => {
                write!(f, "[{}] Unexpected {}", self.code(), found)
            }
            ParseError::UnexpectedEnd => {
                write!(f, "[{}] Equation ended unexpectedly", self.code())
            }
            ParseError::ChainedComparison => write!(
                f,
                "[{}] At most one comparison operator is allowed",
                self.code()
            ),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::ParseError;

    #[test]
    fn error_code_is_stable() {
        assert_eq!(ParseError::Empty.code(), "EXPR_EMPTY");
        assert_eq!(ParseError::UnexpectedEnd.code(), "EXPR_UNEXPECTED_END");
        assert_eq!(
            ParseError::ChainedComparison.code(),
            "EXPR_CHAINED_COMPARISON"
        );
    }

    #[test]
    fn display_prefixes_error_code() {
        let rendered = ParseError::UnexpectedChar('?').to_string();
        assert!(rendered.starts_with("[EXPR_UNEXPECTED_CHAR]"));
        assert!(rendered.contains('?'));
    }
}
