//! Expression nodes - what the simplifier consumes and produces
//!
//! `Expr` is a closed enum with one variant per node category. Every variant
//! carries a named struct so that typed child positions (lambda parameters,
//! the constructor inside a list-init) can hold that struct directly.
//!
//! Nodes are plain owned values. A rewrite consumes a node and builds a new
//! one; unchanged children are moved across rather than copied.

use super::{
    BinOp, GotoKind, LabelTarget, Literal, MemberRef, MethodRef, NewArrayKind, TypeBinaryOp,
    TypeRef, UnaryOp,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value: `4`, `true`, `null`
    Constant(Constant),

    /// Variable reference, identified by name: `a`
    Parameter(Parameter),

    /// Operator with one operand: `!x`, `-x`
    Unary(Unary),

    /// Operator with two operands: `a == b`, `a && b`
    Binary(Binary),

    /// Ternary: `test ? a : b`
    Conditional(Conditional),

    /// Scoped variables plus a sequence of expressions
    Block(Block),

    /// Repeated body with optional break/continue targets
    Loop(Loop),

    /// Control transfer to a label, optionally carrying a value
    Goto(Goto),

    /// Jump target with a fall-through default value
    Label(Label),

    /// try/catch/finally/fault
    Try(Try),

    /// switch with ordered cases and an optional default
    Switch(Switch),

    /// Object construction: `new T(args)`
    New(New),

    /// Array construction: `new T[] { .. }` or `new T[n]`
    NewArray(NewArray),

    /// Collection initializer: `new List<T>() { a, b }`
    ListInit(ListInit),

    /// Member initializer: `new P() { X = 1 }`
    MemberInit(MemberInit),

    /// Delegate invocation: `f.Invoke(args)`
    Invocation(Invocation),

    /// Bound method call: `obj.M(args)` or `T.M(args)`
    MethodCall(MethodCall),

    /// Field or property access: `obj.x` or `T.x`
    Member(Member),

    /// Indexer access: `obj[i, j]`
    Index(Index),

    /// Runtime type test: `x is T`
    TypeBinary(TypeBinary),

    /// Late-bound operation, only its arguments are visible here
    Dynamic(Dynamic),

    /// Captured variables: `runtime_vars(a, b)`
    RuntimeVariables(RuntimeVariables),

    /// Function literal: `(a, b) => body`
    Lambda(Lambda),

    // === Categories the traversal does not rebuild ===
    /// Default value of a type: `default(T)`
    DefaultValue(DefaultValue),

    /// Named node that a registered reducer can lower into primitive nodes
    Extension(Extension),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub op: BinOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub test: Box<Expr>,
    pub if_true: Box<Expr>,
    pub if_false: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub variables: Vec<Parameter>,
    pub expressions: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub body: Box<Expr>,
    pub break_label: Option<LabelTarget>,
    pub continue_label: Option<LabelTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Goto {
    pub kind: GotoKind,
    pub target: LabelTarget,
    pub value: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub target: LabelTarget,
    pub default_value: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    pub body: Box<Expr>,
    pub handlers: Vec<CatchBlock>,
    pub finally: Option<Box<Expr>>,
    pub fault: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchBlock {
    /// Exception type this handler catches
    pub test: TypeRef,
    pub variable: Option<Parameter>,
    pub filter: Option<Expr>,
    pub body: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub value: Box<Expr>,
    pub cases: Vec<SwitchCase>,
    pub default_body: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test_values: Vec<Expr>,
    pub body: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct New {
    pub ty: TypeRef,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewArray {
    pub kind: NewArrayKind,
    pub element_type: TypeRef,
    pub expressions: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListInit {
    pub new: New,
    pub initializers: Vec<ElementInit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementInit {
    pub add_method: MethodRef,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberInit {
    pub new: New,
    /// Carried through simplification untouched
    pub bindings: Vec<MemberBinding>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberBinding {
    pub member: MemberRef,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub target: Box<Expr>,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// `None` for static methods
    pub object: Option<Box<Expr>>,
    pub method: MethodRef,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// `None` for static members
    pub expression: Option<Box<Expr>>,
    pub member: MemberRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub object: Box<Expr>,
    pub indexer: Option<MemberRef>,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeBinary {
    pub op: TypeBinaryOp,
    pub expression: Box<Expr>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dynamic {
    pub binder: String,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeVariables {
    pub variables: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub name: Option<String>,
    pub tail_call: bool,
    pub parameters: Vec<Parameter>,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue {
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    pub name: String,
    pub operands: Vec<Expr>,
}

// ============ Node categories ============

/// A node category that can stand in a typed child position.
///
/// The simplifier works on `Expr`; typed positions convert in and out through
/// this trait so that a transformer producing the wrong category is caught at
/// the position that required it.
pub trait Node: Sized {
    /// Category name used in diagnostics
    const CATEGORY: &'static str;

    fn into_expr(self) -> Expr;

    /// Convert back, handing the expression back unchanged on mismatch
    fn from_expr(expr: Expr) -> Result<Self, Expr>;
}

impl Node for Expr {
    const CATEGORY: &'static str = "expression";

    fn into_expr(self) -> Expr {
        self
    }

    fn from_expr(expr: Expr) -> Result<Self, Expr> {
        Ok(expr)
    }
}

macro_rules! impl_category {
    ($($variant:ident => $category:literal),* $(,)?) => {
        $(
            impl From<$variant> for Expr {
                fn from(node: $variant) -> Self {
                    Expr::$variant(node)
                }
            }
        )*

        impl Expr {
            /// Category name of the outermost node
            pub fn category(&self) -> &'static str {
                match self {
                    $(Expr::$variant(_) => $category,)*
                }
            }
        }
    };
}

impl_category! {
    Constant => "constant",
    Parameter => "parameter",
    Unary => "unary",
    Binary => "binary",
    Conditional => "conditional",
    Block => "block",
    Loop => "loop",
    Goto => "goto",
    Label => "label",
    Try => "try",
    Switch => "switch",
    New => "new",
    NewArray => "new-array",
    ListInit => "list-init",
    MemberInit => "member-init",
    Invocation => "invocation",
    MethodCall => "method-call",
    Member => "member",
    Index => "index",
    TypeBinary => "type-binary",
    Dynamic => "dynamic",
    RuntimeVariables => "runtime-variables",
    Lambda => "lambda",
    DefaultValue => "default",
    Extension => "extension",
}

macro_rules! impl_node {
    ($($variant:ident => $category:literal),* $(,)?) => {
        $(
            impl Node for $variant {
                const CATEGORY: &'static str = $category;

                fn into_expr(self) -> Expr {
                    Expr::$variant(self)
                }

                fn from_expr(expr: Expr) -> Result<Self, Expr> {
                    match expr {
                        Expr::$variant(node) => Ok(node),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_node! {
    Parameter => "parameter",
    New => "new",
    Lambda => "lambda",
}

// ============ Construction ============

impl Constant {
    pub fn new(value: impl Into<Literal>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Expr {
    pub fn constant(value: impl Into<Literal>) -> Self {
        Expr::Constant(Constant::new(value))
    }

    pub fn null() -> Self {
        Expr::Constant(Constant {
            value: Literal::Null,
        })
    }

    pub fn param(name: impl Into<String>) -> Self {
        Expr::Parameter(Parameter::new(name))
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary(Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn not(self) -> Self {
        Expr::unary(UnaryOp::Not, self)
    }

    pub fn negate(self) -> Self {
        Expr::unary(UnaryOp::Negate, self)
    }

    pub fn binop(self, op: BinOp, rhs: Expr) -> Self {
        Expr::Binary(Binary {
            op,
            left: Box::new(self),
            right: Box::new(rhs),
        })
    }

    pub fn and_also(self, rhs: Expr) -> Self {
        self.binop(BinOp::AndAlso, rhs)
    }

    pub fn or_else(self, rhs: Expr) -> Self {
        self.binop(BinOp::OrElse, rhs)
    }

    pub fn equal(self, rhs: Expr) -> Self {
        self.binop(BinOp::Equal, rhs)
    }

    pub fn not_equal(self, rhs: Expr) -> Self {
        self.binop(BinOp::NotEqual, rhs)
    }

    pub fn conditional(test: Expr, if_true: Expr, if_false: Expr) -> Self {
        Expr::Conditional(Conditional {
            test: Box::new(test),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    pub fn lambda(parameters: Vec<Parameter>, body: Expr) -> Self {
        Expr::Lambda(Lambda {
            name: None,
            tail_call: false,
            parameters,
            body: Box::new(body),
        })
    }
}

// ============ Inspection ============

impl Expr {
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expr::Constant(Constant { value }) => Some(value),
            _ => None,
        }
    }

    /// `Some(v)` for a boolean constant
    pub fn as_bool(&self) -> Option<bool> {
        self.as_literal().and_then(Literal::as_bool)
    }

    /// Operand of a logical NOT
    pub fn as_not(&self) -> Option<&Expr> {
        match self {
            Expr::Unary(Unary {
                op: UnaryOp::Not,
                operand,
            }) => Some(operand.as_ref()),
            _ => None,
        }
    }

    /// Operands of a binary node with the given operator
    pub fn as_binary(&self, op: BinOp) -> Option<(&Expr, &Expr)> {
        match self {
            Expr::Binary(b) if b.op == op => Some((b.left.as_ref(), b.right.as_ref())),
            _ => None,
        }
    }

    pub fn is_bool_constant(&self, value: bool) -> bool {
        self.as_bool() == Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_position_round_trip() {
        let param = Parameter::new("a");
        let expr = param.clone().into_expr();
        assert_eq!(expr.category(), "parameter");
        assert_eq!(Parameter::from_expr(expr), Ok(param));
    }

    #[test]
    fn typed_position_mismatch_hands_back_expr() {
        let expr = Expr::constant(true);
        let back = New::from_expr(expr.clone());
        assert_eq!(back, Err(expr));
    }

    #[test]
    fn inspection_helpers() {
        let e = Expr::param("a").not();
        assert_eq!(e.as_not(), Some(&Expr::param("a")));
        assert!(Expr::constant(false).is_bool_constant(false));
        assert_eq!(Expr::constant(1i64).as_bool(), None);

        let and = Expr::param("a").and_also(Expr::param("b"));
        assert!(and.as_binary(BinOp::AndAlso).is_some());
        assert!(and.as_binary(BinOp::OrElse).is_none());
    }
}
