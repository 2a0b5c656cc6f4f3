//! Helper functions for building `Expr` trees
//!
//! Short names for the node shapes that come up most when writing scenarios
//! and tests by hand. Every helper takes its children by value.

use super::{BinOp, Expr, Literal, MemberRef, MethodRef, Parameter, TypeRef};
use super::{Block, Constant, Extension, Member, MethodCall, New};

/// Build a parameter reference
pub fn param(name: &str) -> Expr {
    Expr::param(name)
}

/// Build a boolean constant
pub fn boolean(value: bool) -> Expr {
    Expr::Constant(Constant {
        value: Literal::Bool(value),
    })
}

/// Build an integer constant
pub fn int(value: i64) -> Expr {
    Expr::constant(value)
}

/// Build a string constant
pub fn string(value: &str) -> Expr {
    Expr::constant(value)
}

/// Build `!operand`
pub fn not(operand: Expr) -> Expr {
    operand.not()
}

/// Build a binary operation
pub fn binop(left: Expr, op: BinOp, right: Expr) -> Expr {
    left.binop(op, right)
}

/// Build `left && right`
pub fn and(left: Expr, right: Expr) -> Expr {
    left.and_also(right)
}

/// Build `left || right`
pub fn or(left: Expr, right: Expr) -> Expr {
    left.or_else(right)
}

/// Build `left == right`
pub fn eq(left: Expr, right: Expr) -> Expr {
    left.equal(right)
}

/// Build `left != right`
pub fn ne(left: Expr, right: Expr) -> Expr {
    left.not_equal(right)
}

/// Build `left - right`
pub fn sub(left: Expr, right: Expr) -> Expr {
    left.binop(BinOp::Sub, right)
}

/// Build `left + right`
pub fn add(left: Expr, right: Expr) -> Expr {
    left.binop(BinOp::Add, right)
}

/// Build `test ? if_true : if_false`
pub fn cond(test: Expr, if_true: Expr, if_false: Expr) -> Expr {
    Expr::conditional(test, if_true, if_false)
}

/// Build `(params...) => body`
pub fn lambda(params: &[&str], body: Expr) -> Expr {
    Expr::lambda(params.iter().map(|p| Parameter::new(*p)).collect(), body)
}

/// Build a block with scoped variables
pub fn block(variables: &[&str], expressions: Vec<Expr>) -> Expr {
    Expr::Block(Block {
        variables: variables.iter().map(|v| Parameter::new(*v)).collect(),
        expressions,
    })
}

/// Build an instance method call: `object.method(args)`
pub fn call(object: Expr, declaring_type: &str, method: &str, arguments: Vec<Expr>) -> Expr {
    Expr::MethodCall(MethodCall {
        object: Some(Box::new(object)),
        method: MethodRef::new(declaring_type, method),
        arguments,
    })
}

/// Build an instance member access: `object.name`
pub fn member(object: Expr, declaring_type: &str, name: &str) -> Expr {
    Expr::Member(Member {
        expression: Some(Box::new(object)),
        member: MemberRef::new(declaring_type, name),
    })
}

/// Build the constructor node `new ty(args)`
pub fn new_object(ty: &str, arguments: Vec<Expr>) -> New {
    New {
        ty: TypeRef::new(ty),
        arguments,
    }
}

/// Build an extension node `@name(operands)`
pub fn extension(name: &str, operands: Vec<Expr>) -> Expr {
    Expr::Extension(Extension {
        name: name.into(),
        operands,
    })
}
