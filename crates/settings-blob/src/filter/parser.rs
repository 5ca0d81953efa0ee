//! Recursive-descent parser for event filter expressions.
//!
//! ```text
//! expr    := and ( OR and )*
//! and     := unary ( AND unary )*
//! unary   := NOT unary | primary
//! primary := '(' expr ')' | key op value
//! ```
//!
//! `AND` binds tighter than `OR`. Keys are bare words; values are bare words
//! or double-quoted strings. Chains of `AND`/`OR` are kept flat, and nesting
//! through parentheses and `NOT` is capped at [`MAX_FILTER_DEPTH`].

use std::fmt;

use crate::error::FilterSyntaxError;
use crate::filter::lexer::{tokenize, CompareOp, Token};
use crate::limits::MAX_FILTER_DEPTH;

/// A parsed event filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    /// `key op value`
    Compare {
        key: String,
        op: CompareOp,
        value: String,
    },
    /// Two or more operands, all of which must match.
    And(Vec<EventFilter>),
    /// Two or more operands, any of which must match.
    Or(Vec<EventFilter>),
    Not(Box<EventFilter>),
}

impl EventFilter {
    /// Parses filter text into an expression tree.
    pub fn parse(input: &str) -> Result<EventFilter, FilterSyntaxError> {
        let tokens = tokenize(input)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.parse_or()?;
        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(unexpected(Some(token))),
        }
    }

    /// Keys compared anywhere in the expression, in textual order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys<'a>(&'a self, keys: &mut Vec<&'a str>) {
        match self {
            EventFilter::Compare { key, .. } => keys.push(key),
            EventFilter::And(operands) | EventFilter::Or(operands) => {
                for operand in operands {
                    operand.collect_keys(keys);
                }
            }
            EventFilter::Not(inner) => inner.collect_keys(keys),
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventFilter::Compare { key, op, value } => {
                write!(f, "{key}{op}\"")?;
                for c in value.chars() {
                    if matches!(c, '"' | '\\') {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("\"")
            }
            EventFilter::And(operands) => write_chain(f, operands, " AND "),
            EventFilter::Or(operands) => write_chain(f, operands, " OR "),
            EventFilter::Not(inner) => write!(f, "NOT {inner}"),
        }
    }
}

fn write_chain(f: &mut fmt::Formatter<'_>, operands: &[EventFilter], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{operand}")?;
    }
    f.write_str(")")
}

fn unexpected(token: Option<&Token<'_>>) -> FilterSyntaxError {
    match token {
        Some(token) => FilterSyntaxError::new(format!("syntax error, unexpected {}", token.describe())),
        None => FilterSyntaxError::new("syntax error, unexpected end of input"),
    }
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token<'a>) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Enters one level of nesting.
    fn descend(&mut self) -> Result<(), FilterSyntaxError> {
        if self.depth >= MAX_FILTER_DEPTH {
            return Err(FilterSyntaxError::new(
                "syntax error, expression nested too deeply",
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_or(&mut self) -> Result<EventFilter, FilterSyntaxError> {
        let first = self.parse_and()?;
        if self.peek() != Some(&Token::Or) {
            return Ok(first);
        }
        let mut operands = vec![first];
        while self.eat(&Token::Or) {
            operands.push(self.parse_and()?);
        }
        Ok(EventFilter::Or(operands))
    }

    fn parse_and(&mut self) -> Result<EventFilter, FilterSyntaxError> {
        let first = self.parse_unary()?;
        if self.peek() != Some(&Token::And) {
            return Ok(first);
        }
        let mut operands = vec![first];
        while self.eat(&Token::And) {
            operands.push(self.parse_unary()?);
        }
        Ok(EventFilter::And(operands))
    }

    fn parse_unary(&mut self) -> Result<EventFilter, FilterSyntaxError> {
        if self.eat(&Token::Not) {
            self.descend()?;
            let inner = self.parse_unary()?;
            self.depth -= 1;
            return Ok(EventFilter::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<EventFilter, FilterSyntaxError> {
        match self.next() {
            Some(Token::LParen) => {
                self.descend()?;
                let expr = self.parse_or()?;
                if !self.eat(&Token::RParen) {
                    return Err(unexpected(self.peek()));
                }
                self.depth -= 1;
                Ok(expr)
            }
            Some(Token::Word(key)) => {
                let op = match self.next() {
                    Some(Token::Op(op)) => op,
                    other => return Err(unexpected(other.as_ref())),
                };
                let value = match self.next() {
                    Some(Token::Word(value)) => value.to_string(),
                    Some(Token::Quoted(value)) => value.into_owned(),
                    other => return Err(unexpected(other.as_ref())),
                };
                Ok(EventFilter::Compare {
                    key: key.to_string(),
                    op,
                    value,
                })
            }
            other => Err(unexpected(other.as_ref())),
        }
    }
}
