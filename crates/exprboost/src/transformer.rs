//! Transformer plugin contract
//!
//! A transformer is applied once to every node the simplifier rebuilds, after
//! that node's children have been simplified. Transformers run in the order
//! they were registered, each seeing the previous one's output.

use crate::ast::Expr;
use crate::simplify::Simplifier;

/// A rewrite rule applied at every node during a simplification pass.
///
/// Implementations must be total: any structurally valid node goes in, a node
/// comes out, possibly the same one. A transformer may call back into the
/// simplifier (to simplify a synthesized sub-expression, or to ask
/// [`Simplifier::is_equivalent`]) but must not hold state that changes
/// between calls.
///
/// The returned node must be usable wherever the input was. In typed child
/// positions (lambda parameters, the constructor of a list-init) a change of
/// category is a contract violation and panics in the simplifier.
pub trait Transformer: Send + Sync {
    fn transform(&self, expr: Expr, simplifier: &Simplifier) -> Expr;

    /// Name shown in log output
    fn name(&self) -> &str {
        "anonymous"
    }
}

/// Closures are transformers
impl<F> Transformer for F
where
    F: Fn(Expr, &Simplifier) -> Expr + Send + Sync,
{
    fn transform(&self, expr: Expr, simplifier: &Simplifier) -> Expr {
        self(expr, simplifier)
    }
}
