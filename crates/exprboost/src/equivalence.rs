//! Syntactic equivalence after normalization
//!
//! Two expressions are equivalent when their simplified forms render to the
//! same text. This is not a prover: operand order matters, so `a == b` and
//! `b == a` are different unless some transformer canonicalizes the order.

use crate::ast::Expr;
use crate::simplify::Simplifier;

impl Simplifier {
    /// Simplify both sides independently and compare their renderings.
    ///
    /// Rewrite rules call this to decide whether two operands are "the same";
    /// it re-enters the simplifier, so a transformer that grows trees would
    /// not terminate here.
    pub fn is_equivalent(&self, left: &Expr, right: &Expr) -> bool {
        let left = self.simplify(left.clone());
        let right = self.simplify(right.clone());
        left.to_string() == right.to_string()
    }
}
