//! Recursive-descent parser for equation strings.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! equation := sum ( ("<=" | ">=" | "==") sum )?
//! sum      := product ( ("+" | "-") product )*
//! product  := unary ( ("*" | "/") unary )*
//! unary    := "-" unary | atom
//! atom     := number | identifier | "(" equation-sum ")"
//! ```
//!
//! At most one comparison is allowed per equation; a second one is reported
//! as [`ParseError::ChainedComparison`] rather than silently reassociated.

use crate::expr::ComparisonSense;

use super::ast::{AstNode, BinOp, EquationAst};
use super::error::ParseError;
use super::token::{tokenize, Token};

/// Parse an equation string into its AST.
pub fn parse_equation(input: &str) -> Result<EquationAst, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let equation = parser.equation()?;
    parser.expect_end()?;
    Ok(equation)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn equation(&mut self) -> Result<EquationAst, ParseError> {
        let lhs = self.sum()?;
        let Some(op) = self.take_comparison() else {
            return Ok(EquationAst::Expression(lhs));
        };
        let rhs = self.sum()?;
        if self.peek().is_some_and(Token::is_comparison) {
            return Err(ParseError::ChainedComparison);
        }
        Ok(EquationAst::Comparison { lhs, op, rhs })
    }

    fn sum(&mut self) -> Result<AstNode, ParseError> {
        let mut node = self.product()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.take();
            let rhs = self.product()?;
            node = AstNode::BinOp {
                op,
                lhs: Box::new(node),
                rhs: Box::new(rhs),
            };
        }
        Ok(node)
    }

    fn product(&mut self) -> Result<AstNode, ParseError> {
        let mut node = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.take();
            let rhs = self.unary()?;
            node = AstNode::BinOp {
                op,
                lhs: Box::new(node),
                rhs: Box::new(rhs),
            };
        }
        Ok(node)
    }

    fn unary(&mut self) -> Result<AstNode, ParseError> {
        if let Some(Token::Minus) = self.peek() {
            self.take();
            let inner = self.unary()?;
            return Ok(AstNode::Neg(Box::new(inner)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<AstNode, ParseError> {
        let Some(token) = self.take() else {
            return Err(ParseError::UnexpectedEnd);
        };
        match token {
            Token::Number(value) => Ok(AstNode::Number(value)),
            Token::Ident(name) => Ok(AstNode::Ident(name)),
            Token::OpenParen => {
                let inner = self.sum()?;
                match self.take() {
                    Some(Token::CloseParen) => Ok(inner),
                    Some(other) => Err(ParseError::UnexpectedToken(other.describe())),
                    None => Err(ParseError::UnexpectedEnd),
                }
            }
            other => Err(ParseError::UnexpectedToken(other.describe())),
        }
    }

    fn take_comparison(&mut self) -> Option<ComparisonSense> {
        let sense = match self.peek()? {
            Token::LessEqual => ComparisonSense::LessEqual,
            Token::GreaterEqual => ComparisonSense::GreaterEqual,
            Token::EqualEqual => ComparisonSense::Equal,
            _ => return None,
        };
        self.take();
        Some(sense)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn take(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        match self.take() {
            None => Ok(()),
            Some(token) => Err(ParseError::UnexpectedToken(token.describe())),
        }
    }
}
