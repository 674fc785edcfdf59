//! Expression layer for the faro LP export pipeline.

pub mod expr;
pub mod ids;
pub mod parse;

pub use expr::{ComparisonSense, ConstraintExpr, Expr};
pub use ids::{ConstraintId, VariableId};
pub use parse::{parse_equation, AstNode, BinOp, EquationAst, ParseError};
