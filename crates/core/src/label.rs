// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Label expressions restricting where a trigger may run
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr  := and ( "||" and )*
//! and   := unary ( "&&" unary )*
//! unary := "!" unary | "(" expr ")" | atom
//! ```
//!
//! An atom is a bare label or a double-quoted string.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("empty label expression")]
    Empty,
    #[error("unexpected '{token}' at position {pos} in '{expr}'")]
    Unexpected {
        token: String,
        pos: usize,
        expr: String,
    },
    #[error("unexpected end of label expression '{0}'")]
    UnexpectedEnd(String),
    #[error("unterminated quote in label expression '{0}'")]
    UnterminatedQuote(String),
    #[error("label expression '{0}' nests deeper than {max} levels", max = MAX_DEPTH)]
    TooDeep(String),
}

/// Deepest `!` / parenthesis nesting accepted
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelExpr {
    Atom(String),
    Not(Box<LabelExpr>),
    And(Box<LabelExpr>, Box<LabelExpr>),
    Or(Box<LabelExpr>, Box<LabelExpr>),
}

impl LabelExpr {
    pub fn parse(input: &str) -> Result<Self, LabelError> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(LabelError::Empty);
        }
        let mut parser = Parser {
            input,
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.or()?;
        match parser.tokens.get(parser.pos) {
            None => Ok(expr),
            Some((tok, at)) => Err(LabelError::Unexpected {
                token: tok.to_string(),
                pos: *at,
                expr: input.to_string(),
            }),
        }
    }

    /// Evaluate against a node's labels (the node name counts as a label)
    pub fn matches<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        match self {
            LabelExpr::Atom(name) => labels.iter().any(|l| l.as_ref() == name),
            LabelExpr::Not(inner) => !inner.matches(labels),
            LabelExpr::And(a, b) => a.matches(labels) && b.matches(labels),
            LabelExpr::Or(a, b) => a.matches(labels) || b.matches(labels),
        }
    }
}

impl fmt::Display for LabelExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelExpr::Atom(name) => write!(f, "{}", name),
            LabelExpr::Not(inner) => write!(f, "!{}", inner),
            LabelExpr::And(a, b) => write!(f, "({} && {})", a, b),
            LabelExpr::Or(a, b) => write!(f, "({} || {})", a, b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Atom(String),
    And,
    Or,
    Not,
    Open,
    Close,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Atom(a) => write!(f, "{}", a),
            Token::And => write!(f, "&&"),
            Token::Or => write!(f, "||"),
            Token::Not => write!(f, "!"),
            Token::Open => write!(f, "("),
            Token::Close => write!(f, ")"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, LabelError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '(' => tokens.push((Token::Open, i)),
            ')' => tokens.push((Token::Close, i)),
            '!' => tokens.push((Token::Not, i)),
            '&' | '|' => {
                if chars.peek().map(|(_, n)| *n) != Some(c) {
                    return Err(LabelError::Unexpected {
                        token: c.to_string(),
                        pos: i,
                        expr: input.to_string(),
                    });
                }
                chars.next();
                tokens.push((if c == '&' { Token::And } else { Token::Or }, i));
            }
            '"' => {
                let mut atom = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    if n == '"' {
                        closed = true;
                        break;
                    }
                    atom.push(n);
                }
                if !closed {
                    return Err(LabelError::UnterminatedQuote(input.to_string()));
                }
                tokens.push((Token::Atom(atom), i));
            }
            _ => {
                let mut atom = c.to_string();
                while let Some((_, n)) = chars.peek() {
                    if n.is_whitespace() || "()!&|\"".contains(*n) {
                        break;
                    }
                    atom.push(*n);
                    chars.next();
                }
                tokens.push((Token::Atom(atom), i));
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn descend(&mut self) -> Result<(), LabelError> {
        if self.depth >= MAX_DEPTH {
            return Err(LabelError::TooDeep(self.input.to_string()));
        }
        self.depth += 1;
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn or(&mut self) -> Result<LabelExpr, LabelError> {
        let mut left = self.and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let right = self.and()?;
            left = LabelExpr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<LabelExpr, LabelError> {
        let mut left = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let right = self.unary()?;
            left = LabelExpr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<LabelExpr, LabelError> {
        let Some((token, at)) = self.tokens.get(self.pos).cloned() else {
            return Err(LabelError::UnexpectedEnd(self.input.to_string()));
        };
        self.pos += 1;
        match token {
            Token::Not => {
                self.descend()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(LabelExpr::Not(Box::new(inner)))
            }
            Token::Atom(name) => Ok(LabelExpr::Atom(name)),
            Token::Open => {
                self.descend()?;
                let inner = self.or()?;
                self.depth -= 1;
                match self.tokens.get(self.pos) {
                    Some((Token::Close, _)) => {
                        self.pos += 1;
                        Ok(inner)
                    }
                    Some((tok, at)) => Err(LabelError::Unexpected {
                        token: tok.to_string(),
                        pos: *at,
                        expr: self.input.to_string(),
                    }),
                    None => Err(LabelError::UnexpectedEnd(self.input.to_string())),
                }
            }
            other => Err(LabelError::Unexpected {
                token: other.to_string(),
                pos: at,
                expr: self.input.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;
