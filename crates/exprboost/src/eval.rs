//! Reference evaluator for the pure subset of the tree
//!
//! Evaluates constants, parameters, unary and binary operators, and
//! conditionals against an environment of parameter bindings. Anything with
//! control flow, side effects or runtime type information is rejected as
//! unsupported. Used to check that rewrites preserve values.

use std::collections::HashMap;

use thiserror::Error;

use crate::ast::{BinOp, Binary, Conditional, Expr, Lambda, Literal, Unary, UnaryOp};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("unbound parameter: {0}")]
    UnboundParameter(String),

    #[error("type error in `{op}`: expected {expected}, got {got}")]
    TypeMismatch {
        op: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("division by zero")]
    DivideByZero,

    #[error("cannot evaluate {0}")]
    Unsupported(String),
}

type Result<T> = std::result::Result<T, EvalError>;

/// Parameter bindings by name
pub type Env = HashMap<String, Literal>;

/// Evaluate `expr` under `env`. A lambda evaluates to its body.
pub fn eval(expr: &Expr, env: &Env) -> Result<Literal> {
    match expr {
        Expr::Constant(c) => Ok(c.value.clone()),
        Expr::Parameter(p) => env
            .get(&p.name)
            .cloned()
            .ok_or_else(|| EvalError::UnboundParameter(p.name.clone())),
        Expr::Unary(Unary { op, operand }) => eval_unary(*op, eval(operand, env)?),
        Expr::Binary(b) => eval_binary(b, env),
        Expr::Conditional(Conditional {
            test,
            if_true,
            if_false,
        }) => {
            if expect_bool("?:", eval(test, env)?)? {
                eval(if_true, env)
            } else {
                eval(if_false, env)
            }
        }
        Expr::Lambda(Lambda { body, .. }) => eval(body, env),
        other => Err(EvalError::Unsupported(format!("{} node", other.category()))),
    }
}

fn expect_bool(op: &str, value: Literal) -> Result<bool> {
    match value {
        Literal::Bool(b) => Ok(b),
        other => Err(mismatch(op, "bool", &other)),
    }
}

fn mismatch(op: &str, expected: &'static str, got: &Literal) -> EvalError {
    EvalError::TypeMismatch {
        op: op.to_string(),
        expected,
        got: got.kind(),
    }
}

fn eval_unary(op: UnaryOp, value: Literal) -> Result<Literal> {
    match (op, value) {
        (UnaryOp::Not, Literal::Bool(b)) => Ok(Literal::Bool(!b)),
        (UnaryOp::Not, other) => Err(mismatch("!", "bool", &other)),
        (UnaryOp::Negate, Literal::Int(i)) => Ok(Literal::Int(i.wrapping_neg())),
        (UnaryOp::Negate, Literal::Float(f)) => Ok(Literal::Float(-f)),
        (UnaryOp::Negate, other) => Err(mismatch("-", "number", &other)),
        (UnaryOp::Plus, v @ (Literal::Int(_) | Literal::Float(_))) => Ok(v),
        (UnaryOp::Plus, other) => Err(mismatch("+", "number", &other)),
        (UnaryOp::OnesComplement, Literal::Int(i)) => Ok(Literal::Int(!i)),
        (UnaryOp::OnesComplement, other) => Err(mismatch("~", "int", &other)),
        (op, _) => Err(EvalError::Unsupported(format!("unary {op:?}"))),
    }
}

fn eval_binary(b: &Binary, env: &Env) -> Result<Literal> {
    let Binary { op, left, right } = b;
    let op = *op;

    // Operators that may skip their right operand
    match op {
        BinOp::AndAlso => {
            return if expect_bool("&&", eval(left, env)?)? {
                Ok(Literal::Bool(expect_bool("&&", eval(right, env)?)?))
            } else {
                Ok(Literal::Bool(false))
            };
        }
        BinOp::OrElse => {
            return if expect_bool("||", eval(left, env)?)? {
                Ok(Literal::Bool(true))
            } else {
                Ok(Literal::Bool(expect_bool("||", eval(right, env)?)?))
            };
        }
        BinOp::Coalesce => {
            let l = eval(left, env)?;
            return if l.is_null() { eval(right, env) } else { Ok(l) };
        }
        _ => {}
    }

    let l = eval(left, env)?;
    let r = eval(right, env)?;
    let symbol = op.to_string();

    match op {
        BinOp::Equal => Ok(Literal::Bool(l.same_value(&r))),
        BinOp::NotEqual => Ok(Literal::Bool(!l.same_value(&r))),
        BinOp::LessThan
        | BinOp::LessThanOrEqual
        | BinOp::GreaterThan
        | BinOp::GreaterThanOrEqual => compare(op, &symbol, &l, &r),
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod | BinOp::Power => {
            arithmetic(op, &symbol, l, r)
        }
        BinOp::BitAnd | BinOp::BitOr | BinOp::ExclusiveOr => bitwise(op, &symbol, l, r),
        BinOp::LeftShift | BinOp::RightShift => match (l, r) {
            (Literal::Int(a), Literal::Int(n)) => {
                let n = n as u32;
                Ok(Literal::Int(if op == BinOp::LeftShift {
                    a.wrapping_shl(n)
                } else {
                    a.wrapping_shr(n)
                }))
            }
            (Literal::Int(_), other) | (other, _) => Err(mismatch(&symbol, "int", &other)),
        },
        _ => Err(EvalError::Unsupported(format!("binary `{symbol}`"))),
    }
}

/// Both operands as floats, when at least one is a float and both are numbers
fn as_floats(l: &Literal, r: &Literal) -> Option<(f64, f64)> {
    match (l, r) {
        (Literal::Float(a), Literal::Float(b)) => Some((*a, *b)),
        (Literal::Int(a), Literal::Float(b)) => Some((*a as f64, *b)),
        (Literal::Float(a), Literal::Int(b)) => Some((*a, *b as f64)),
        _ => None,
    }
}

fn compare(op: BinOp, symbol: &str, l: &Literal, r: &Literal) -> Result<Literal> {
    let ordering = match (l, r) {
        (Literal::Int(a), Literal::Int(b)) => Some(a.cmp(b)),
        (Literal::String(a), Literal::String(b)) => Some(a.cmp(b)),
        _ => match as_floats(l, r) {
            // NaN compares false against everything
            Some((a, b)) => a.partial_cmp(&b),
            None => {
                let bad = if matches!(l, Literal::Int(_) | Literal::Float(_) | Literal::String(_)) {
                    r
                } else {
                    l
                };
                return Err(mismatch(symbol, "comparable values", bad));
            }
        },
    };

    let result = ordering.is_some_and(|ord| match op {
        BinOp::LessThan => ord.is_lt(),
        BinOp::LessThanOrEqual => ord.is_le(),
        BinOp::GreaterThan => ord.is_gt(),
        _ => ord.is_ge(),
    });
    Ok(Literal::Bool(result))
}

fn arithmetic(op: BinOp, symbol: &str, l: Literal, r: Literal) -> Result<Literal> {
    match (&l, &r) {
        (Literal::Int(a), Literal::Int(b)) => {
            let (a, b) = (*a, *b);
            let value = match op {
                BinOp::Add => a.wrapping_add(b),
                BinOp::Sub => a.wrapping_sub(b),
                BinOp::Mul => a.wrapping_mul(b),
                BinOp::Div | BinOp::Mod if b == 0 => return Err(EvalError::DivideByZero),
                BinOp::Div => a.wrapping_div(b),
                BinOp::Mod => a.wrapping_rem(b),
                _ => return Ok(Literal::Float((a as f64).powf(b as f64))),
            };
            Ok(Literal::Int(value))
        }
        (Literal::String(a), Literal::String(b)) if op == BinOp::Add => {
            Ok(Literal::String(format!("{a}{b}")))
        }
        _ => {
            let Some((a, b)) = as_floats(&l, &r) else {
                let bad = if matches!(l, Literal::Int(_) | Literal::Float(_)) { &r } else { &l };
                return Err(mismatch(symbol, "number", bad));
            };
            let value = match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => a / b,
                BinOp::Mod => a % b,
                _ => a.powf(b),
            };
            Ok(Literal::Float(value))
        }
    }
}

fn bitwise(op: BinOp, symbol: &str, l: Literal, r: Literal) -> Result<Literal> {
    match (l, r) {
        (Literal::Int(a), Literal::Int(b)) => Ok(Literal::Int(match op {
            BinOp::BitAnd => a & b,
            BinOp::BitOr => a | b,
            _ => a ^ b,
        })),
        (Literal::Bool(a), Literal::Bool(b)) => Ok(Literal::Bool(match op {
            BinOp::BitAnd => a & b,
            BinOp::BitOr => a | b,
            _ => a ^ b,
        })),
        (Literal::Int(_) | Literal::Bool(_), other) | (other, _) => {
            Err(mismatch(symbol, "int or bool", &other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;

    fn env(bindings: &[(&str, Literal)]) -> Env {
        bindings
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_eval_arithmetic_comparison() {
        let e = eq(sub(int(6), param("a")), int(8));
        assert_eq!(eval(&e, &env(&[("a", Literal::Int(-2))])), Ok(Literal::Bool(true)));
        assert_eq!(eval(&e, &env(&[("a", Literal::Int(0))])), Ok(Literal::Bool(false)));
    }

    #[test]
    fn test_eval_short_circuit_skips_right() {
        // right side would fail: `b` is unbound
        let e = and(boolean(false), param("b"));
        assert_eq!(eval(&e, &Env::new()), Ok(Literal::Bool(false)));
        let e = or(boolean(true), param("b"));
        assert_eq!(eval(&e, &Env::new()), Ok(Literal::Bool(true)));
    }

    #[test]
    fn test_eval_conditional_and_lambda() {
        let e = lambda(&["t"], cond(param("t"), int(1), int(2)));
        assert_eq!(eval(&e, &env(&[("t", Literal::Bool(false))])), Ok(Literal::Int(2)));
    }

    #[test]
    fn test_eval_null_equality() {
        assert_eq!(eval(&eq(Expr::null(), Expr::null()), &Env::new()), Ok(Literal::Bool(true)));
        assert_eq!(eval(&ne(Expr::null(), int(1)), &Env::new()), Ok(Literal::Bool(true)));
    }

    #[test]
    fn test_eval_mixed_numbers() {
        let e = binop(int(1), BinOp::Add, Expr::constant(0.5));
        assert_eq!(eval(&e, &Env::new()), Ok(Literal::Float(1.5)));
        let e = binop(int(3), BinOp::LessThan, Expr::constant(3.5));
        assert_eq!(eval(&e, &Env::new()), Ok(Literal::Bool(true)));
    }

    #[test]
    fn test_eval_errors() {
        assert_eq!(
            eval(&param("x"), &Env::new()),
            Err(EvalError::UnboundParameter("x".into()))
        );
        assert_eq!(
            eval(&binop(int(1), BinOp::Div, int(0)), &Env::new()),
            Err(EvalError::DivideByZero)
        );
        assert!(matches!(
            eval(&not(int(1)), &Env::new()),
            Err(EvalError::TypeMismatch { expected: "bool", got: "int", .. })
        ));
        assert!(matches!(
            eval(&block(&[], vec![int(1)]), &Env::new()),
            Err(EvalError::Unsupported(_))
        ));
    }
}
