//! Equation-string parsing: tokens, AST, canonical rendering.
//!
//! - `token`  — Tokenizer for equation text
//! - `ast`    — AST nodes and canonical Display
//! - `parser` — Recursive-descent parser
//! - `error`  — Parse errors

pub mod ast;
pub mod error;
pub mod parser;
pub mod token;

pub use ast::{AstNode, BinOp, EquationAst};
pub use error::ParseError;
pub use parser::parse_equation;
pub use token::Token;
