//! AST types for exprboost
//!
//! Split into:
//! - `expr`: the `Expr` enum and one node struct per category
//! - `build`: free-function builders for assembling trees in tests and drivers
//!
//! Leaf metadata shared by the node structs lives here.

pub mod build;
pub mod expr;

pub use expr::*;

// Shared types used by the node structs

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Literal {
    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Value equality used when folding `==` and `!=` over constants.
    ///
    /// Unlike `PartialEq`, two NaN floats are the same value and `0.0` equals
    /// `-0.0`. Literals of different kinds are never the same value.
    pub fn same_value(&self, other: &Literal) -> bool {
        match (self, other) {
            (Literal::Null, Literal::Null) => true,
            (Literal::Bool(a), Literal::Bool(b)) => a == b,
            (Literal::Int(a), Literal::Int(b)) => a == b,
            (Literal::Float(a), Literal::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Literal::String(a), Literal::String(b)) => a == b,
            _ => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Bool(_) => "bool",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::String(_) => "string",
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.into())
    }
}

/// Opaque type identity: `int`, `List<int>`, `System.Exception`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(pub String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        TypeRef(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Jump target for goto/label/loop nodes. Never inspected by rewrite rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelTarget {
    pub name: String,
}

impl LabelTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Field or property identity, qualified by its declaring type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
    pub declaring_type: TypeRef,
    pub name: String,
}

impl MemberRef {
    pub fn new(declaring_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            declaring_type: TypeRef::new(declaring_type),
            name: name.into(),
        }
    }
}

/// Bound method identity, qualified by its declaring type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub declaring_type: TypeRef,
    pub name: String,
}

impl MethodRef {
    pub fn new(declaring_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            declaring_type: TypeRef::new(declaring_type),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    // Logical
    Not,

    // Arithmetic
    Negate,
    Plus,
    OnesComplement,
    Increment,
    Decrement,

    // Truthiness
    IsTrue,
    IsFalse,

    // Misc
    ArrayLength,
    Quote,
    Throw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Power,

    // Bitwise
    BitAnd,
    BitOr,
    ExclusiveOr,
    LeftShift,
    RightShift,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // Logical, strictly short-circuiting
    AndAlso,
    OrElse,

    // Misc
    Coalesce,
    ArrayIndex,
    Assign,
}

impl BinOp {
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinOp::AndAlso | BinOp::OrElse)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Equal
                | BinOp::NotEqual
                | BinOp::LessThan
                | BinOp::LessThanOrEqual
                | BinOp::GreaterThan
                | BinOp::GreaterThanOrEqual
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GotoKind {
    Goto,
    Return,
    Break,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewArrayKind {
    /// `new T[] { a, b }`
    Init,
    /// `new T[n, m]`
    Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeBinaryOp {
    /// `x is T`, subtypes included
    TypeIs,
    /// exact runtime type match
    TypeEqual,
}
