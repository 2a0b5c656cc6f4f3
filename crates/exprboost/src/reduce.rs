//! Reducers for extension nodes
//!
//! An `Expr::Extension` is sugar defined outside this crate. Registering a
//! reducer for its name lets the simplifier lower it into primitive nodes
//! before traversal; unregistered extensions pass through untouched.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::{Expr, Extension};

/// Handler lowering an extension's operands into a primitive node
pub type Reducer = Arc<dyn Fn(&[Expr]) -> Expr + Send + Sync + 'static>;

/// Upper bound on chained reductions of a single node
const MAX_REDUCTIONS: usize = 64;

/// Registry of extension reducers, keyed by extension name
#[derive(Default, Clone)]
pub struct ReducerRegistry {
    reducers: HashMap<String, Reducer>,
}

impl ReducerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reducer for `@name(...)` nodes
    pub fn register<F>(&mut self, name: impl Into<String>, reducer: F)
    where
        F: Fn(&[Expr]) -> Expr + Send + Sync + 'static,
    {
        self.reducers.insert(name.into(), Arc::new(reducer));
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<F>(mut self, name: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(&[Expr]) -> Expr + Send + Sync + 'static,
    {
        self.register(name, reducer);
        self
    }

    pub fn can_reduce(&self, name: &str) -> bool {
        self.reducers.contains_key(name)
    }

    /// Lower `expr` until it is no longer a reducible extension.
    ///
    /// Anything else is returned as-is. A reducer that keeps producing
    /// reducible extensions is cut off after a fixed number of steps and the
    /// last node is returned.
    pub fn reduce(&self, expr: Expr) -> Expr {
        let mut current = expr;
        for _ in 0..MAX_REDUCTIONS {
            match current {
                Expr::Extension(Extension { ref name, ref operands }) => {
                    let Some(reducer) = self.reducers.get(name) else {
                        return current;
                    };
                    log::trace!("reducing @{name}");
                    current = reducer(operands);
                }
                _ => return current,
            }
        }
        log::warn!("extension reduction did not settle after {MAX_REDUCTIONS} steps");
        current
    }
}
