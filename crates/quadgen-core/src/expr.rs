//! Expression tree and numeric evaluation.
//!
//! Evaluation is a plain AST walk with a single bound variable `x` and a
//! fixed operator set. There is deliberately no general code-evaluation
//! facility here: malformed or adversarial input can only ever produce a
//! `QuadError`, never execute behavior.

use crate::error::{QuadError, QuadResult};
use crate::parser::parse_equation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    X,
    Neg(Box<Expr>),
    Bin {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn eval(&self, x: f64) -> QuadResult<f64> {
        let value = match self {
            Expr::Num(n) => *n,
            Expr::X => x,
            Expr::Neg(inner) => -inner.eval(x)?,
            Expr::Bin { op, lhs, rhs } => {
                let l = lhs.eval(x)?;
                let r = rhs.eval(x)?;
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => {
                        if r == 0.0 {
                            return Err(QuadError::Evaluation {
                                x,
                                reason: "division by zero".into(),
                            });
                        }
                        l / r
                    }
                    BinOp::Pow => l.powf(r),
                }
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(QuadError::Evaluation {
                x,
                reason: "result is not finite".into(),
            })
        }
    }
}

/// A parsed equation: the original source string plus its expression tree.
///
/// Parse once, evaluate many times. The value is immutable and every
/// `eval` call is independent, so it is safe to sample repeatedly.
#[derive(Debug, Clone)]
pub struct Equation {
    source: String,
    expr: Expr,
}

impl Equation {
    /// Parse an equation string such as `y = -2(x - 3)^2 + 4` into an
    /// evaluable form. The leading `y =` label is optional.
    pub fn parse(input: &str) -> QuadResult<Self> {
        let expr = parse_equation(input)?;
        Ok(Self {
            source: input.to_string(),
            expr,
        })
    }

    pub fn eval(&self, x: f64) -> QuadResult<f64> {
        self.expr.eval(x)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
