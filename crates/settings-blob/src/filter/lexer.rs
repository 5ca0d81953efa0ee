//! Tokenizer for event filter expressions.

use std::borrow::Cow;
use std::fmt;

use crate::error::FilterSyntaxError;

/// Comparison operator between a key and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CompareOp {
    /// Operator as written in filter text.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Bare word: key, unquoted value or wildcard pattern.
    Word(&'a str),
    /// Double-quoted string with escapes resolved.
    Quoted(Cow<'a, str>),
    Op(CompareOp),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl Token<'_> {
    /// How the token is named in "unexpected ..." messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("'{w}'"),
            Token::Quoted(s) => format!("\"{s}\""),
            Token::Op(op) => format!("'{op}'"),
            Token::And => "AND".to_string(),
            Token::Or => "OR".to_string(),
            Token::Not => "NOT".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '=' | '<' | '>' | '"')
}

/// Splits filter text into tokens.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token<'_>>, FilterSyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Op(CompareOp::Eq));
            }
            '<' | '>' => {
                chars.next();
                let or_equal = matches!(chars.peek(), Some(&(_, '=')));
                if or_equal {
                    chars.next();
                }
                tokens.push(Token::Op(match (c, or_equal) {
                    ('<', false) => CompareOp::Lt,
                    ('<', true) => CompareOp::Le,
                    ('>', false) => CompareOp::Gt,
                    _ => CompareOp::Ge,
                }));
            }
            '"' => {
                chars.next();
                tokens.push(Token::Quoted(read_quoted(input, start + 1, &mut chars)?));
            }
            _ => {
                let mut end = input.len();
                while let Some(&(i, c)) = chars.peek() {
                    if !is_word_char(c) {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                let word = &input[start..end];
                tokens.push(match word.to_ascii_uppercase().as_str() {
                    "AND" => Token::And,
                    "OR" => Token::Or,
                    "NOT" => Token::Not,
                    _ => Token::Word(word),
                });
            }
        }
    }

    Ok(tokens)
}

/// Reads a quoted string body; the opening quote is already consumed.
///
/// Borrows from the input unless an escape forces a copy.
fn read_quoted<'a>(
    input: &'a str,
    body_start: usize,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'a>>,
) -> Result<Cow<'a, str>, FilterSyntaxError> {
    let mut owned: Option<String> = None;

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                return Ok(match owned {
                    Some(s) => Cow::Owned(s),
                    None => Cow::Borrowed(&input[body_start..i]),
                });
            }
            '\\' => {
                let (_, escaped) = chars
                    .next()
                    .ok_or_else(|| FilterSyntaxError::new("syntax error, unterminated quoted string"))?;
                owned
                    .get_or_insert_with(|| input[body_start..i].to_string())
                    .push(escaped);
            }
            c => {
                if let Some(s) = owned.as_mut() {
                    s.push(c);
                }
            }
        }
    }

    Err(FilterSyntaxError::new("syntax error, unterminated quoted string"))
}
