//! Precedence-climbing parser for the equation surface syntax.
//!
//! The original data was written with implicit multiplication in several
//! shapes: `2(x+1)`, `-2(x+1)`, `)(`, `2x`, `x(`. Instead of ordered
//! rewrite rules, the parser treats any operand-start token that directly
//! follows a complete operand as an implicit `*` with multiplication
//! precedence. That covers every listed pattern plus nested occurrences,
//! and everything outside the grammar is a deterministic `ParseError`.
//!
//! Precedence, loosest to tightest: `+ -`, `* /` (and implicit `*`),
//! unary minus, `^` (right-associative). `2x^2` therefore parses as
//! `2*(x^2)` and `-x^2` as `-(x^2)`, matching conventional notation.

use crate::error::{QuadError, QuadResult};
use crate::expr::{BinOp, Expr};
use crate::token::{tokenize, Spanned, Token};

const BP_ADD: (u8, u8) = (10, 11);
const BP_MUL: (u8, u8) = (20, 21);
const BP_PREFIX: u8 = 25;
const BP_POW: (u8, u8) = (30, 30);

/// Parse an equation body (with optional `y =` label) into an expression
/// tree. Error positions refer to byte offsets in the original input.
pub fn parse_equation(input: &str) -> QuadResult<Expr> {
    let body = strip_label(input);
    let offset = input.len() - body.len();

    let mut tokens = tokenize(body).map_err(|e| shift(e, offset))?;
    for t in &mut tokens {
        t.pos += offset;
    }

    if tokens.is_empty() {
        return Err(QuadError::parse(input.len(), "empty expression"));
    }

    let mut parser = Parser {
        tokens: &tokens,
        index: 0,
        end: input.len(),
    };
    let expr = parser.parse_bp(0)?;

    if let Some(t) = parser.peek() {
        return Err(QuadError::parse(t.pos, "unexpected trailing token"));
    }
    Ok(expr)
}

/// Strip an optional leading `y =` / `y=` label.
fn strip_label(input: &str) -> &str {
    let trimmed = input.trim_start();
    if let Some(rest) = trimmed.strip_prefix(['y', 'Y']) {
        if let Some(body) = rest.trim_start().strip_prefix('=') {
            return body;
        }
    }
    trimmed
}

fn shift(err: QuadError, offset: usize) -> QuadError {
    match err {
        QuadError::Parse { pos, reason } => QuadError::Parse {
            pos: pos + offset,
            reason,
        },
        other => other,
    }
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    index: usize,
    end: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Spanned> {
        self.tokens.get(self.index).copied()
    }

    fn advance(&mut self) -> Option<Spanned> {
        let t = self.peek();
        if t.is_some() {
            self.index += 1;
        }
        t
    }

    fn parse_bp(&mut self, min_bp: u8) -> QuadResult<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let next = match self.peek() {
                Some(t) => t,
                None => break,
            };

            let (op, l_bp, r_bp, explicit) = match next.token {
                Token::Plus => (BinOp::Add, BP_ADD.0, BP_ADD.1, true),
                Token::Minus => (BinOp::Sub, BP_ADD.0, BP_ADD.1, true),
                Token::Star => (BinOp::Mul, BP_MUL.0, BP_MUL.1, true),
                Token::Slash => (BinOp::Div, BP_MUL.0, BP_MUL.1, true),
                Token::Caret => (BinOp::Pow, BP_POW.0, BP_POW.1, true),
                // Implicit multiplication: an operand starts right after a
                // complete operand, e.g. `2x`, `3(x+1)`, `)(`.
                t if t.starts_operand() => (BinOp::Mul, BP_MUL.0, BP_MUL.1, false),
                _ => break,
            };

            if l_bp < min_bp {
                break;
            }
            if explicit {
                self.advance();
            }

            let rhs = self.parse_bp(r_bp)?;
            lhs = Expr::Bin {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> QuadResult<Expr> {
        let t = self
            .advance()
            .ok_or_else(|| QuadError::parse(self.end, "unexpected end of expression"))?;

        match t.token {
            Token::Number(n) => Ok(Expr::Num(n)),
            Token::X => Ok(Expr::X),
            Token::Minus => Ok(Expr::Neg(Box::new(self.parse_bp(BP_PREFIX)?))),
            Token::Plus => self.parse_bp(BP_PREFIX),
            Token::LParen => {
                let inner = self.parse_bp(0)?;
                match self.advance() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(QuadError::parse(
                        other.pos,
                        "expected closing parenthesis",
                    )),
                    None => Err(QuadError::parse(t.pos, "missing closing parenthesis")),
                }
            }
            Token::RParen => Err(QuadError::parse(t.pos, "unmatched closing parenthesis")),
            Token::Star | Token::Slash | Token::Caret => {
                Err(QuadError::parse(t.pos, "operator without left operand"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str, x: f64) -> f64 {
        parse_equation(src).unwrap().eval(x).unwrap()
    }

    #[test]
    fn test_label_stripping() {
        assert_eq!(eval("y = x^2", 3.0), 9.0);
        assert_eq!(eval("y=x^2", 3.0), 9.0);
        assert_eq!(eval("x^2", 3.0), 9.0);
    }

    #[test]
    fn test_implicit_digit_paren() {
        assert_eq!(eval("2(x + 1)", 2.0), 6.0);
    }

    #[test]
    fn test_implicit_negative_digit_paren() {
        assert_eq!(eval("-2(x + 1)", 2.0), -6.0);
    }

    #[test]
    fn test_implicit_adjacent_parens() {
        assert_eq!(eval("(x + 2)(x - 1)", 2.0), 4.0);
    }

    #[test]
    fn test_implicit_digit_x() {
        assert_eq!(eval("4x", 2.5), 10.0);
    }

    #[test]
    fn test_implicit_x_paren() {
        assert_eq!(eval("x(x + 1)", 3.0), 12.0);
    }

    #[test]
    fn test_implicit_nested() {
        // Nested implicit multiplication the ordered-rewrite approach
        // could miss: a coefficient inside a parenthesized group.
        assert_eq!(eval("2(x 3(x + 1))", 1.0), 12.0);
    }

    #[test]
    fn test_explicit_form_is_equivalent() {
        // An already-explicit expression parses to the same tree as its
        // implicit-multiplication spelling.
        let implicit = parse_equation("y = -2(x - 3)^2 + 4").unwrap();
        let explicit = parse_equation("y = -2*(x - 3)^2 + 4").unwrap();
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn test_implicit_coefficient_binds_pow_to_variable() {
        // 2x^2 is 2*(x^2), not (2x)^2
        assert_eq!(eval("2x^2", 3.0), 18.0);
    }

    #[test]
    fn test_pow_right_associative() {
        assert_eq!(eval("2^3^2", 0.0), 512.0);
    }

    #[test]
    fn test_division() {
        assert_eq!(eval("(x + 4) / 2", 2.0), 3.0);
    }

    #[test]
    fn test_unbalanced_open_paren() {
        let err = parse_equation("y = 2(x - 3").unwrap_err();
        assert!(matches!(err, QuadError::Parse { .. }), "{err}");
    }

    #[test]
    fn test_unbalanced_close_paren() {
        let err = parse_equation("y = 2(x - 3))").unwrap_err();
        assert!(matches!(err, QuadError::Parse { .. }), "{err}");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_equation("").is_err());
        assert!(parse_equation("y = ").is_err());
    }

    #[test]
    fn test_operator_without_operand() {
        assert!(parse_equation("* x").is_err());
        assert!(parse_equation("x +").is_err());
    }

    #[test]
    fn test_free_variable_rejected() {
        let err = parse_equation("y = 2z + 1").unwrap_err();
        match err {
            QuadError::Parse { reason, .. } => assert!(reason.contains('z'), "{reason}"),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_vertex_form_grid() {
        // f(h) == k for a(x-h)^2 + k across integer coefficients.
        for a in [-3i32, -1, 2, 5] {
            for h in -4i32..=4 {
                for k in -4i32..=4 {
                    let src = format!("y = {a}(x - {h})^2 + {k}");
                    let eq = parse_equation(&src).unwrap();
                    let y = eq.eval(f64::from(h)).unwrap();
                    assert!(
                        (y - f64::from(k)).abs() < 1e-9,
                        "{src}: f({h}) = {y}, expected {k}"
                    );
                }
            }
        }
    }
}
