//! Canonical rendering for expression trees
//!
//! `Display` output is a pure function of tree structure and is what the
//! equivalence checker compares. Every binary node is parenthesized so the
//! rendering never depends on operator precedence.

use std::fmt::{self, Display};

use crate::ast::{
    BinOp, CatchBlock, ElementInit, Expr, GotoKind, LabelTarget, Literal, MemberBinding,
    NewArrayKind, Parameter, SwitchCase, TypeBinaryOp, TypeRef, UnaryOp,
};

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{n:.1}")
                } else {
                    write!(f, "{}", n)
                }
            }
            Literal::String(s) => write!(f, "\"{}\"", escape_string(s)),
        }
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for LabelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Power => "**",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::ExclusiveOr => "^",
            BinOp::LeftShift => "<<",
            BinOp::RightShift => ">>",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::LessThan => "<",
            BinOp::LessThanOrEqual => "<=",
            BinOp::GreaterThan => ">",
            BinOp::GreaterThanOrEqual => ">=",
            BinOp::AndAlso => "&&",
            BinOp::OrElse => "||",
            BinOp::Coalesce => "??",
            BinOp::ArrayIndex => "[]",
            BinOp::Assign => "=",
        };
        write!(f, "{}", s)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(c) => write!(f, "{}", c.value),
            Expr::Parameter(p) => write!(f, "{}", p),
            Expr::Unary(u) => {
                let operand = &u.operand;
                match u.op {
                    UnaryOp::Not => write!(f, "!{}", operand),
                    UnaryOp::Negate => write!(f, "-{}", operand),
                    UnaryOp::Plus => write!(f, "+{}", operand),
                    UnaryOp::OnesComplement => write!(f, "~{}", operand),
                    UnaryOp::Increment => write!(f, "increment({})", operand),
                    UnaryOp::Decrement => write!(f, "decrement({})", operand),
                    UnaryOp::IsTrue => write!(f, "is_true({})", operand),
                    UnaryOp::IsFalse => write!(f, "is_false({})", operand),
                    UnaryOp::ArrayLength => write!(f, "len({})", operand),
                    UnaryOp::Quote => write!(f, "quote({})", operand),
                    UnaryOp::Throw => write!(f, "throw({})", operand),
                }
            }
            Expr::Binary(b) => {
                if b.op == BinOp::ArrayIndex {
                    write!(f, "{}[{}]", b.left, b.right)
                } else {
                    write!(f, "({} {} {})", b.left, b.op, b.right)
                }
            }
            Expr::Conditional(c) => write!(f, "({} ? {} : {})", c.test, c.if_true, c.if_false),
            Expr::Block(b) => {
                write!(f, "{{")?;
                if !b.variables.is_empty() {
                    write!(f, " var ")?;
                    write_list(f, &b.variables)?;
                    write!(f, ";")?;
                }
                for expr in &b.expressions {
                    write!(f, " {};", expr)?;
                }
                write!(f, " }}")
            }
            Expr::Loop(l) => {
                write!(f, "loop")?;
                if let Some(label) = &l.break_label {
                    write!(f, " break:{}", label)?;
                }
                if let Some(label) = &l.continue_label {
                    write!(f, " continue:{}", label)?;
                }
                write!(f, " {{ {} }}", l.body)
            }
            Expr::Goto(g) => {
                let keyword = match g.kind {
                    GotoKind::Goto => "goto",
                    GotoKind::Return => "return",
                    GotoKind::Break => "break",
                    GotoKind::Continue => "continue",
                };
                write!(f, "{} {}", keyword, g.target)?;
                if let Some(value) = &g.value {
                    write!(f, "({})", value)?;
                }
                Ok(())
            }
            Expr::Label(l) => {
                write!(f, "{}:", l.target)?;
                if let Some(value) = &l.default_value {
                    write!(f, " {}", value)?;
                }
                Ok(())
            }
            Expr::Try(t) => {
                write!(f, "try {{ {} }}", t.body)?;
                for handler in &t.handlers {
                    write!(f, " {}", handler)?;
                }
                if let Some(finally) = &t.finally {
                    write!(f, " finally {{ {} }}", finally)?;
                }
                if let Some(fault) = &t.fault {
                    write!(f, " fault {{ {} }}", fault)?;
                }
                Ok(())
            }
            Expr::Switch(s) => {
                write!(f, "switch ({}) {{", s.value)?;
                for case in &s.cases {
                    write!(f, " {}", case)?;
                }
                if let Some(default) = &s.default_body {
                    write!(f, " default: {};", default)?;
                }
                write!(f, " }}")
            }
            Expr::New(n) => {
                write!(f, "new {}(", n.ty)?;
                write_list(f, &n.arguments)?;
                write!(f, ")")
            }
            Expr::NewArray(a) => match a.kind {
                NewArrayKind::Init => {
                    write!(f, "new {}[] {{ ", a.element_type)?;
                    write_list(f, &a.expressions)?;
                    write!(f, " }}")
                }
                NewArrayKind::Bounds => {
                    write!(f, "new {}[", a.element_type)?;
                    write_list(f, &a.expressions)?;
                    write!(f, "]")
                }
            },
            Expr::ListInit(l) => {
                write!(f, "new {}(", l.new.ty)?;
                write_list(f, &l.new.arguments)?;
                write!(f, ") {{ ")?;
                write_list(f, &l.initializers)?;
                write!(f, " }}")
            }
            Expr::MemberInit(m) => {
                write!(f, "new {}(", m.new.ty)?;
                write_list(f, &m.new.arguments)?;
                write!(f, ") {{ ")?;
                write_list(f, &m.bindings)?;
                write!(f, " }}")
            }
            Expr::Invocation(i) => {
                write!(f, "{}.Invoke(", i.target)?;
                write_list(f, &i.arguments)?;
                write!(f, ")")
            }
            Expr::MethodCall(m) => {
                match &m.object {
                    Some(object) => write!(f, "{}.{}(", object, m.method.name)?,
                    None => write!(f, "{}.{}(", m.method.declaring_type, m.method.name)?,
                }
                write_list(f, &m.arguments)?;
                write!(f, ")")
            }
            Expr::Member(m) => match &m.expression {
                Some(object) => write!(f, "{}.{}", object, m.member.name),
                None => write!(f, "{}.{}", m.member.declaring_type, m.member.name),
            },
            Expr::Index(i) => {
                write!(f, "{}[", i.object)?;
                write_list(f, &i.arguments)?;
                write!(f, "]")
            }
            Expr::TypeBinary(t) => match t.op {
                TypeBinaryOp::TypeIs => write!(f, "({} is {})", t.expression, t.ty),
                TypeBinaryOp::TypeEqual => write!(f, "({} is exactly {})", t.expression, t.ty),
            },
            Expr::Dynamic(d) => {
                write!(f, "dynamic {}(", d.binder)?;
                write_list(f, &d.arguments)?;
                write!(f, ")")
            }
            Expr::RuntimeVariables(r) => {
                write!(f, "runtime_vars(")?;
                write_list(f, &r.variables)?;
                write!(f, ")")
            }
            Expr::Lambda(l) => {
                if l.tail_call {
                    write!(f, "tailcall ")?;
                }
                if let Some(name) = &l.name {
                    write!(f, "{} ", name)?;
                }
                write!(f, "(")?;
                write_list(f, &l.parameters)?;
                write!(f, ") => {}", l.body)
            }
            Expr::DefaultValue(d) => write!(f, "default({})", d.ty),
            Expr::Extension(e) => {
                write!(f, "@{}(", e.name)?;
                write_list(f, &e.operands)?;
                write!(f, ")")
            }
        }
    }
}

impl Display for CatchBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "catch ({}", self.test)?;
        if let Some(variable) = &self.variable {
            write!(f, " {}", variable)?;
        }
        write!(f, ")")?;
        if let Some(filter) = &self.filter {
            write!(f, " when ({})", filter)?;
        }
        write!(f, " {{ {} }}", self.body)
    }
}

impl Display for SwitchCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "case ")?;
        write_list(f, &self.test_values)?;
        write!(f, ": {};", self.body)
    }
}

impl Display for ElementInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.add_method.name)?;
        write_list(f, &self.arguments)?;
        write!(f, ")")
    }
}

impl Display for MemberBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.member.name, self.value)
    }
}

fn write_list<T: Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::ast::build::*;
    use crate::ast::{Expr, Literal};

    #[test]
    fn test_display_boolean_connectives() {
        let expr = and(param("a"), or(param("b"), not(param("a"))));
        assert_eq!(expr.to_string(), "(a && (b || !a))");
    }

    #[test]
    fn test_display_conditional_and_arithmetic() {
        let expr = eq(cond(param("t"), int(4), int(7)), sub(int(6), param("a")));
        assert_eq!(expr.to_string(), "((t ? 4 : 7) == (6 - a))");
    }

    #[test]
    fn test_display_lambda() {
        let expr = lambda(&["a", "b"], ne(param("a"), param("b")));
        assert_eq!(expr.to_string(), "(a, b) => (a != b)");
    }

    #[test]
    fn test_display_block_and_calls() {
        let expr = block(
            &["x"],
            vec![
                call(param("s"), "String", "Trim", vec![]),
                member(param("s"), "String", "Length"),
            ],
        );
        assert_eq!(expr.to_string(), "{ var x; s.Trim(); s.Length; }");
    }

    #[test]
    fn literal_kinds_render_distinctly() {
        let rendered: Vec<String> = [
            Literal::Null,
            Literal::Bool(true),
            Literal::Int(1),
            Literal::Float(1.0),
            Literal::String("1".into()),
        ]
        .into_iter()
        .map(|lit| Expr::constant(lit).to_string())
        .collect();
        assert_eq!(rendered, ["null", "true", "1", "1.0", "\"1\""]);
    }

    #[test]
    fn parameter_and_string_do_not_collide() {
        assert_ne!(param("a").to_string(), string("a").to_string());
    }
}
