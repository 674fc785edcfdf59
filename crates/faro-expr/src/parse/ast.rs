//! Equation AST and canonical text rendering.
//!
//! `Display` produces a normalized single-spaced form that is stable for a
//! given AST shape: `1+1` and `1 + 1` render identically, and parentheses
//! appear only where precedence requires them. The LP writer relies on this
//! when printing objective equations symbolically.

use std::fmt;

use crate::expr::ComparisonSense;

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
        }
    }
}

/// One side of a parsed equation.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Number(f64),
    Ident(String),
    Neg(Box<AstNode>),
    BinOp {
        op: BinOp,
        lhs: Box<AstNode>,
        rhs: Box<AstNode>,
    },
}

const NEG_PRECEDENCE: u8 = 3;

impl AstNode {
    fn write_with_precedence(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        match self {
            AstNode::Number(value) => write!(f, "{value}"),
            AstNode::Ident(name) => f.write_str(name),
            AstNode::Neg(inner) => {
                f.write_str("-")?;
                inner.write_with_precedence(f, NEG_PRECEDENCE)
            }
            AstNode::BinOp { op, lhs, rhs } => {
                let precedence = op.precedence();
                let parenthesize = precedence < parent;
                if parenthesize {
                    f.write_str("(")?;
                }
                lhs.write_with_precedence(f, precedence)?;
                write!(f, " {} ", op.symbol())?;
                // Left-associative grammar: an rhs at the same precedence
                // was explicitly parenthesized in the input.
                rhs.write_with_precedence(f, precedence + 1)?;
                if parenthesize {
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_with_precedence(f, 0)
    }
}

/// A parsed equation: a bare expression or a single comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum EquationAst {
    Expression(AstNode),
    Comparison {
        lhs: AstNode,
        op: ComparisonSense,
        rhs: AstNode,
    },
}

impl EquationAst {
    /// True when the equation carries a comparison operator.
    pub fn is_comparison(&self) -> bool {
        matches!(self, EquationAst::Comparison { .. })
    }
}

impl fmt::Display for EquationAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquationAst::Expression(node) => node.fmt(f),
            EquationAst::Comparison { lhs, op, rhs } => {
                let symbol = match op {
                    ComparisonSense::LessEqual => "<=",
                    ComparisonSense::GreaterEqual => ">=",
                    ComparisonSense::Equal => "==",
                };
                write!(f, "{lhs} {symbol} {rhs}")
            }
        }
    }
}
