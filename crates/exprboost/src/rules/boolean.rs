//! Boolean rewrite rules
//!
//! Each rule group runs once per node, in [`RuleGroup::ALL`] order, and sees
//! the output of the group before it. Groups that compare operands do so
//! through [`Simplifier::is_equivalent`], so `!!a && !a` is recognized as a
//! contradiction even though the two arms differ structurally.
//!
//! All rules assume operands are free of side effects. `a || (a && f())`
//! collapses to `a` whether or not `f` does something observable.

use crate::ast::{BinOp, Binary, Expr, Literal, Unary, UnaryOp};
use crate::simplify::Simplifier;
use crate::transformer::Transformer;

/// A family of related rewrites that can be switched on or off as a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleGroup {
    /// `!!x -> x`
    DoubleNegation,
    /// Constant tests, negations, comparisons and connectives
    ConstantFolding,
    /// `x == x -> true`, `x != x -> false` for parameters
    SelfComparison,
    /// A constant arm of `&&` / `||` decides or drops out
    ShortCircuit,
    /// `a && !a -> false`, `a || !a -> true`
    Complement,
    /// Idempotence, absorption and resolution
    ArmElimination,
}

impl RuleGroup {
    /// Every group, in execution order
    pub const ALL: [RuleGroup; 6] = [
        RuleGroup::DoubleNegation,
        RuleGroup::ConstantFolding,
        RuleGroup::SelfComparison,
        RuleGroup::ShortCircuit,
        RuleGroup::Complement,
        RuleGroup::ArmElimination,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleGroup::DoubleNegation => "double-negation",
            RuleGroup::ConstantFolding => "constant-folding",
            RuleGroup::SelfComparison => "self-comparison",
            RuleGroup::ShortCircuit => "short-circuit",
            RuleGroup::Complement => "complement",
            RuleGroup::ArmElimination => "arm-elimination",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The boolean rule set as a single transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanRules {
    enabled: [bool; RuleGroup::ALL.len()],
}

impl Default for BooleanRules {
    fn default() -> Self {
        Self {
            enabled: [true; RuleGroup::ALL.len()],
        }
    }
}

impl BooleanRules {
    /// No groups enabled; the transformer is the identity
    pub fn none() -> Self {
        Self {
            enabled: [false; RuleGroup::ALL.len()],
        }
    }

    /// Just one group
    pub fn only(group: RuleGroup) -> Self {
        Self::none().with(group)
    }

    pub fn with(mut self, group: RuleGroup) -> Self {
        self.enabled[group.index()] = true;
        self
    }

    pub fn without(mut self, group: RuleGroup) -> Self {
        self.enabled[group.index()] = false;
        self
    }

    pub fn is_enabled(&self, group: RuleGroup) -> bool {
        self.enabled[group.index()]
    }

    /// Enabled groups in execution order
    pub fn groups(&self) -> impl Iterator<Item = RuleGroup> + '_ {
        RuleGroup::ALL.into_iter().filter(|g| self.is_enabled(*g))
    }

    fn apply(group: RuleGroup, expr: Expr, simplifier: &Simplifier) -> Expr {
        match group {
            RuleGroup::DoubleNegation => double_negation(expr),
            RuleGroup::ConstantFolding => constant_folding(expr),
            RuleGroup::SelfComparison => self_comparison(expr),
            RuleGroup::ShortCircuit => short_circuit(expr),
            RuleGroup::Complement => complement(expr, simplifier),
            RuleGroup::ArmElimination => arm_elimination(expr, simplifier),
        }
    }
}

impl Transformer for BooleanRules {
    fn transform(&self, expr: Expr, simplifier: &Simplifier) -> Expr {
        self.groups().fold(expr, |expr, group| {
            let before = log::log_enabled!(log::Level::Trace).then(|| expr.to_string());
            let after = Self::apply(group, expr, simplifier);
            if let Some(before) = before {
                let rendered = after.to_string();
                if rendered != before {
                    log::trace!("{}: {before} => {rendered}", group.name());
                }
            }
            after
        })
    }

    fn name(&self) -> &str {
        "boolean"
    }
}

// ============ Rules ============

/// Operand of `!x`, or the node back unchanged
fn strip_not(expr: Expr) -> Result<Expr, Expr> {
    match expr {
        Expr::Unary(Unary {
            op: UnaryOp::Not,
            operand,
        }) => Ok(*operand),
        other => Err(other),
    }
}

fn double_negation(expr: Expr) -> Expr {
    match strip_not(expr) {
        Ok(operand) => match strip_not(operand) {
            Ok(inner) => inner,
            Err(operand) => operand.not(),
        },
        Err(expr) => expr,
    }
}

fn constant_folding(expr: Expr) -> Expr {
    match expr {
        Expr::Conditional(c) => match c.test.as_bool() {
            Some(true) => *c.if_true,
            Some(false) => *c.if_false,
            None => Expr::Conditional(c),
        },
        Expr::Unary(u) if u.op == UnaryOp::Not => match u.operand.as_bool() {
            Some(value) => Expr::constant(!value),
            None => Expr::Unary(u),
        },
        Expr::Binary(b) => {
            let folded = match (b.left.as_literal(), b.right.as_literal()) {
                (Some(left), Some(right)) => fold_constants(b.op, left, right),
                _ => None,
            };
            match folded {
                Some(value) => Expr::constant(value),
                None => Expr::Binary(b),
            }
        }
        other => other,
    }
}

/// Result of `left op right` when both sides are constants and the rule
/// set knows how to decide it
fn fold_constants(op: BinOp, left: &Literal, right: &Literal) -> Option<bool> {
    match op {
        BinOp::Equal => Some(left.same_value(right)),
        // `x != null` stays; it is a null check, not a value comparison
        BinOp::NotEqual if !left.is_null() && !right.is_null() => {
            Some(!left.same_value(right))
        }
        BinOp::AndAlso => Some(left.as_bool()? && right.as_bool()?),
        BinOp::OrElse => Some(left.as_bool()? || right.as_bool()?),
        _ => None,
    }
}

fn self_comparison(expr: Expr) -> Expr {
    match expr {
        Expr::Binary(b) if matches!(b.op, BinOp::Equal | BinOp::NotEqual) => {
            // Parameters are compared by name
            let same = matches!(
                (b.left.as_ref(), b.right.as_ref()),
                (Expr::Parameter(l), Expr::Parameter(r)) if l.name == r.name
            );
            if same {
                Expr::constant(b.op == BinOp::Equal)
            } else {
                Expr::Binary(b)
            }
        }
        other => other,
    }
}

fn short_circuit(expr: Expr) -> Expr {
    match expr {
        Expr::Binary(b) if b.op.is_short_circuit() => {
            // `&&` is decided by a false arm, `||` by a true one
            let decisive = b.op == BinOp::OrElse;
            if b.left.is_bool_constant(decisive) || b.right.is_bool_constant(decisive) {
                Expr::constant(decisive)
            } else if b.left.is_bool_constant(!decisive) {
                *b.right
            } else if b.right.is_bool_constant(!decisive) {
                *b.left
            } else {
                Expr::Binary(b)
            }
        }
        other => other,
    }
}

fn complement(expr: Expr, simplifier: &Simplifier) -> Expr {
    match expr {
        Expr::Binary(b) if b.op.is_short_circuit() => {
            if negates(&b.right, &b.left, simplifier) || negates(&b.left, &b.right, simplifier) {
                Expr::constant(b.op == BinOp::OrElse)
            } else {
                Expr::Binary(b)
            }
        }
        other => other,
    }
}

/// `negated` is `!x` with `x` equivalent to `other`
fn negates(negated: &Expr, other: &Expr, simplifier: &Simplifier) -> bool {
    negated
        .as_not()
        .is_some_and(|inner| simplifier.is_equivalent(other, inner))
}

/// Either side is the negation of the other
fn complementary(a: &Expr, b: &Expr, simplifier: &Simplifier) -> bool {
    negates(a, b, simplifier) || negates(b, a, simplifier)
}

fn arm_elimination(expr: Expr, simplifier: &Simplifier) -> Expr {
    match expr {
        Expr::Binary(b) if b.op.is_short_circuit() => eliminate_arm(b, simplifier),
        other => other,
    }
}

fn eliminate_arm(b: Binary, simplifier: &Simplifier) -> Expr {
    // a && a, a || a
    if simplifier.is_equivalent(&b.left, &b.right) {
        return *b.left;
    }

    // a || (a && x), a && (a || x) and their mirrors
    let inner = dual(b.op);
    if absorbs(&b.left, &b.right, inner, simplifier) {
        return *b.left;
    }
    if absorbs(&b.right, &b.left, inner, simplifier) {
        return *b.right;
    }

    // (x || y) && (x || !y)
    if b.op == BinOp::AndAlso {
        if let Some(shared) = resolve(&b.left, &b.right, simplifier) {
            return shared;
        }
    }

    Expr::Binary(b)
}

fn dual(op: BinOp) -> BinOp {
    match op {
        BinOp::AndAlso => BinOp::OrElse,
        _ => BinOp::AndAlso,
    }
}

/// `other` is `x inner y` with `arm` equivalent to `x` or `y`
fn absorbs(arm: &Expr, other: &Expr, inner: BinOp, simplifier: &Simplifier) -> bool {
    other.as_binary(inner).is_some_and(|(x, y)| {
        simplifier.is_equivalent(arm, x) || simplifier.is_equivalent(arm, y)
    })
}

/// Shared leg of two disjunctions whose remaining legs are complementary
fn resolve(left: &Expr, right: &Expr, simplifier: &Simplifier) -> Option<Expr> {
    let (l0, l1) = left.as_binary(BinOp::OrElse)?;
    let (r0, r1) = right.as_binary(BinOp::OrElse)?;

    for (shared, rest) in [(l0, l1), (l1, l0)] {
        for (candidate, other) in [(r0, r1), (r1, r0)] {
            if simplifier.is_equivalent(shared, candidate)
                && complementary(rest, other, simplifier)
            {
                return Some(shared.clone());
            }
        }
    }
    None
}
