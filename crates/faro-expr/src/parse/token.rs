//! Tokenizer for equation text.

use crate::parse::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    OpenParen,
    CloseParen,
    LessEqual,
    GreaterEqual,
    EqualEqual,
}

impl Token {
    /// Short description used in parse error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Number(value) => format!("number '{value}'"),
            Token::Ident(name) => format!("identifier '{name}'"),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::OpenParen => "'('".to_string(),
            Token::CloseParen => "')'".to_string(),
            Token::LessEqual => "'<='".to_string(),
            Token::GreaterEqual => "'>='".to_string(),
            Token::EqualEqual => "'=='".to_string(),
        }
    }

    pub(crate) fn is_comparison(&self) -> bool {
        matches!(
            self,
            Token::LessEqual | Token::GreaterEqual | Token::EqualEqual
        )
    }
}

/// Split equation text into tokens.
///
/// Comparison operators are two-character only; a bare `<`, `>`, or `=` is
/// rejected so a typo cannot silently change an equation's meaning.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];
        match ch {
            c if c.is_whitespace() => pos += 1,
            '+' => {
                tokens.push(Token::Plus);
                pos += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                pos += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                pos += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                pos += 1;
            }
            '(' => {
                tokens.push(Token::OpenParen);
                pos += 1;
            }
            ')' => {
                tokens.push(Token::CloseParen);
                pos += 1;
            }
            '<' | '>' | '=' => {
                if chars.get(pos + 1) != Some(&'=') {
                    return Err(ParseError::UnexpectedChar(ch));
                }
                tokens.push(match ch {
                    '<' => Token::LessEqual,
                    '>' => Token::GreaterEqual,
                    _ => Token::EqualEqual,
                });
                pos += 2;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                    pos += 1;
                }
                // Optional exponent suffix: e or E, sign, digits.
                if pos < chars.len() && (chars[pos] == 'e' || chars[pos] == 'E') {
                    let mut lookahead = pos + 1;
                    if lookahead < chars.len() && (chars[lookahead] == '+' || chars[lookahead] == '-')
                    {
                        lookahead += 1;
                    }
                    if lookahead < chars.len() && chars[lookahead].is_ascii_digit() {
                        pos = lookahead;
                        while pos < chars.len() && chars[pos].is_ascii_digit() {
                            pos += 1;
                        }
                    }
                }
                let text: String = chars[start..pos].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::BadNumber(text))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_')
                {
                    pos += 1;
                }
                tokens.push(Token::Ident(chars[start..pos].iter().collect()));
            }
            other => return Err(ParseError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}
