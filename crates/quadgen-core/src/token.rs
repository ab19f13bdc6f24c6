//! Lexer for the constrained equation surface syntax.
//!
//! Accepts numbers, the variable `x`, the operators `+ - * / ^`, and
//! parentheses. Any other identifier is rejected here so that free
//! variables surface as a parse error with a position instead of a
//! wrong value downstream.

use crate::error::{QuadError, QuadResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    X,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl Token {
    /// True for tokens that can begin an operand. Used by the parser to
    /// detect implicit multiplication (`2x`, `2(`, `)(`, `x(`).
    pub fn starts_operand(self) -> bool {
        matches!(self, Token::Number(_) | Token::X | Token::LParen)
    }
}

/// A token together with its byte offset in the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

pub fn tokenize(input: &str) -> QuadResult<Vec<Spanned>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let pos = i;
        match b {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'+' => tokens.push(Spanned { token: Token::Plus, pos }),
            b'-' => tokens.push(Spanned { token: Token::Minus, pos }),
            b'*' => tokens.push(Spanned { token: Token::Star, pos }),
            b'/' => tokens.push(Spanned { token: Token::Slash, pos }),
            b'^' => tokens.push(Spanned { token: Token::Caret, pos }),
            b'(' => tokens.push(Spanned { token: Token::LParen, pos }),
            b')' => tokens.push(Spanned { token: Token::RParen, pos }),
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                if i < bytes.len() && bytes[i] == b'.' {
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let text = &input[start..i];
                let value: f64 = text.parse().map_err(|_| {
                    QuadError::parse(start, format!("invalid number `{text}`"))
                })?;
                tokens.push(Spanned {
                    token: Token::Number(value),
                    pos: start,
                });
                continue;
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphabetic() || bytes[i] == b'_') {
                    i += 1;
                }
                let name = &input[start..i];
                if name == "x" {
                    tokens.push(Spanned {
                        token: Token::X,
                        pos: start,
                    });
                } else {
                    return Err(QuadError::parse(
                        start,
                        format!("unknown identifier `{name}` (only `x` is allowed)"),
                    ));
                }
                continue;
            }
            _ => {
                return Err(QuadError::parse(
                    pos,
                    format!("unexpected character `{}`", &input[pos..pos + 1]),
                ));
            }
        }
        i += 1;
    }

    Ok(tokens)
}
