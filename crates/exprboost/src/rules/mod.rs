//! Rewrite rule sets shipped with exprboost

mod boolean;

pub use boolean::{BooleanRules, RuleGroup};
