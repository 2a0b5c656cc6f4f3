//! exprboost - expression tree simplification
//!
//! Rewrites typed expression trees into smaller equivalent trees.
//!
//! Pipeline: reduce extensions -> simplify children -> run transformers at
//! the parent, bottom-up over the whole tree. The boolean rule set in
//! [`rules`] is the standard transformer; anything implementing
//! [`Transformer`] can be plugged in alongside it.

pub mod ast;
mod equivalence;
pub mod eval;
mod pretty;
pub mod reduce;
pub mod rules;
mod simplify;
mod transformer;

// Re-export commonly used types
pub use ast::{BinOp, Expr, Literal, Node, UnaryOp};
pub use eval::{Env, EvalError, eval};
pub use reduce::ReducerRegistry;
pub use rules::{BooleanRules, RuleGroup};
pub use simplify::{Simplifier, SimplifyError};
pub use transformer::Transformer;
