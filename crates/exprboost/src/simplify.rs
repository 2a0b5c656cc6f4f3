//! Generic tree-walking simplifier
//!
//! One pass rebuilds the tree bottom-up: every child position is simplified
//! before its parent is rebuilt, then the parent runs through the registered
//! transformers in order. A pass never loops at a single node; use
//! [`Simplifier::simplify_to_fixpoint`] when chained rewrites need to settle.

use thiserror::Error;

use crate::ast::{
    Binary, Block, CatchBlock, Conditional, Dynamic, ElementInit, Expr, Goto, Index, Invocation,
    Label, Lambda, ListInit, Loop, Member, MemberInit, MethodCall, New, NewArray, Node,
    RuntimeVariables, Switch, SwitchCase, Try, TypeBinary, Unary,
};
use crate::reduce::ReducerRegistry;
use crate::rules::BooleanRules;
use crate::transformer::Transformer;

#[derive(Error, Debug)]
pub enum SimplifyError {
    #[error("no fixpoint after {passes} passes, last result: {last}")]
    NoFixpoint { passes: usize, last: Expr },

    #[error("fixpoint search needs at least one pass")]
    ZeroPasses,
}

type Result<T> = std::result::Result<T, SimplifyError>;

/// Simplifies expression trees with an ordered list of transformers.
///
/// # Example
///
/// ```
/// use exprboost::Simplifier;
/// use exprboost::ast::build::*;
///
/// let simplifier = Simplifier::boolean();
/// let expr = or(param("x"), and(param("x"), param("y")));
/// assert_eq!(simplifier.simplify(expr), param("x"));
/// ```
pub struct Simplifier {
    /// Applied at every rebuilt node, in order
    transformers: Vec<Box<dyn Transformer>>,
    /// Lowers extension nodes before traversal
    reducers: ReducerRegistry,
}

impl Simplifier {
    pub fn new(transformers: Vec<Box<dyn Transformer>>) -> Self {
        Self {
            transformers,
            reducers: ReducerRegistry::new(),
        }
    }

    /// The standard pipeline: all boolean rewrite rules
    pub fn boolean() -> Self {
        Self::new(vec![Box::new(BooleanRules::default())])
    }

    pub fn with_reducers(mut self, reducers: ReducerRegistry) -> Self {
        self.reducers = reducers;
        self
    }

    pub fn reducers(&self) -> &ReducerRegistry {
        &self.reducers
    }

    pub fn transformer_names(&self) -> Vec<&str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    /// Simplify a node, preserving its category.
    ///
    /// # Panics
    ///
    /// If a transformer turns a node of a typed category (`Parameter`, `New`,
    /// `Lambda`) into a different category. That is a defect in the
    /// transformer, not a recoverable condition.
    pub fn simplify<N: Node>(&self, node: N) -> N {
        let simplified = self.simplify_expr(node.into_expr());
        match N::from_expr(simplified) {
            Ok(node) => node,
            Err(other) => panic!(
                "transformer changed a {} node into a {} node: {}",
                N::CATEGORY,
                other.category(),
                other
            ),
        }
    }

    /// Absent in, absent out
    pub fn simplify_opt<N: Node>(&self, node: Option<N>) -> Option<N> {
        node.map(|n| self.simplify(n))
    }

    /// Element-wise [`simplify`](Self::simplify), order and count preserved
    pub fn simplify_all<N: Node>(&self, nodes: Vec<N>) -> Vec<N> {
        nodes.into_iter().map(|n| self.simplify(n)).collect()
    }

    /// Run whole-tree passes until the rendering stops changing.
    ///
    /// Returns the settled tree, or [`SimplifyError::NoFixpoint`] with the
    /// last result if `max_passes` passes all changed something.
    pub fn simplify_to_fixpoint(&self, expr: Expr, max_passes: usize) -> Result<Expr> {
        if max_passes == 0 {
            return Err(SimplifyError::ZeroPasses);
        }

        let mut current = expr;
        let mut rendered = current.to_string();
        for pass in 1..=max_passes {
            let next = self.simplify(current);
            let next_rendered = next.to_string();
            log::debug!("pass {pass}: {next_rendered}");
            if next_rendered == rendered {
                return Ok(next);
            }
            current = next;
            rendered = next_rendered;
        }

        Err(SimplifyError::NoFixpoint {
            passes: max_passes,
            last: current,
        })
    }

    fn simplify_boxed(&self, expr: Box<Expr>) -> Box<Expr> {
        Box::new(self.simplify_expr(*expr))
    }

    fn simplify_boxed_opt(&self, expr: Option<Box<Expr>>) -> Option<Box<Expr>> {
        expr.map(|e| self.simplify_boxed(e))
    }

    fn simplify_expr(&self, expr: Expr) -> Expr {
        let rebuilt = match self.reducers.reduce(expr) {
            Expr::Unary(Unary { op, operand }) => Expr::Unary(Unary {
                op,
                operand: self.simplify_boxed(operand),
            }),
            Expr::Binary(Binary { op, left, right }) => Expr::Binary(Binary {
                op,
                left: self.simplify_boxed(left),
                right: self.simplify_boxed(right),
            }),
            Expr::Lambda(Lambda {
                name,
                tail_call,
                parameters,
                body,
            }) => Expr::Lambda(Lambda {
                name,
                tail_call,
                body: self.simplify_boxed(body),
                parameters: self.simplify_all(parameters),
            }),
            Expr::Try(Try {
                body,
                handlers,
                finally,
                fault,
            }) => Expr::Try(Try {
                body: self.simplify_boxed(body),
                handlers: self.simplify_catch_blocks(handlers),
                finally: self.simplify_boxed_opt(finally),
                fault: self.simplify_boxed_opt(fault),
            }),
            Expr::New(New { ty, arguments }) => Expr::New(New {
                ty,
                arguments: self.simplify_all(arguments),
            }),
            Expr::Goto(Goto {
                kind,
                target,
                value,
            }) => Expr::Goto(Goto {
                kind,
                target,
                value: self.simplify_boxed_opt(value),
            }),
            Expr::Loop(Loop {
                body,
                break_label,
                continue_label,
            }) => Expr::Loop(Loop {
                body: self.simplify_boxed(body),
                break_label,
                continue_label,
            }),
            Expr::Block(Block {
                variables,
                expressions,
            }) => Expr::Block(Block {
                variables: self.simplify_all(variables),
                expressions: self.simplify_all(expressions),
            }),
            Expr::Index(Index {
                object,
                indexer,
                arguments,
            }) => Expr::Index(Index {
                object: self.simplify_boxed(object),
                indexer,
                arguments: self.simplify_all(arguments),
            }),
            Expr::Label(Label {
                target,
                default_value,
            }) => Expr::Label(Label {
                target,
                default_value: self.simplify_boxed_opt(default_value),
            }),
            Expr::Member(Member { expression, member }) => Expr::Member(Member {
                expression: self.simplify_boxed_opt(expression),
                member,
            }),
            Expr::Switch(Switch {
                value,
                cases,
                default_body,
            }) => Expr::Switch(Switch {
                value: self.simplify_boxed(value),
                cases: self.simplify_switch_cases(cases),
                default_body: self.simplify_boxed_opt(default_body),
            }),
            Expr::Dynamic(Dynamic { binder, arguments }) => Expr::Dynamic(Dynamic {
                binder,
                arguments: self.simplify_all(arguments),
            }),
            Expr::ListInit(ListInit { new, initializers }) => Expr::ListInit(ListInit {
                new: self.simplify(new),
                initializers: self.simplify_element_inits(initializers),
            }),
            Expr::NewArray(NewArray {
                kind,
                element_type,
                expressions,
            }) => Expr::NewArray(NewArray {
                kind,
                element_type,
                expressions: self.simplify_all(expressions),
            }),
            Expr::Invocation(Invocation { target, arguments }) => Expr::Invocation(Invocation {
                target: self.simplify_boxed(target),
                arguments: self.simplify_all(arguments),
            }),
            Expr::MemberInit(MemberInit { new, bindings }) => Expr::MemberInit(MemberInit {
                new: self.simplify(new),
                bindings,
            }),
            Expr::MethodCall(MethodCall {
                object,
                method,
                arguments,
            }) => Expr::MethodCall(MethodCall {
                object: self.simplify_boxed_opt(object),
                method,
                arguments: self.simplify_all(arguments),
            }),
            Expr::TypeBinary(TypeBinary { op, expression, ty }) => Expr::TypeBinary(TypeBinary {
                op,
                expression: self.simplify_boxed(expression),
                ty,
            }),
            Expr::Conditional(Conditional {
                test,
                if_true,
                if_false,
            }) => Expr::Conditional(Conditional {
                test: self.simplify_boxed(test),
                if_true: self.simplify_boxed(if_true),
                if_false: self.simplify_boxed(if_false),
            }),
            Expr::RuntimeVariables(RuntimeVariables { variables }) => {
                Expr::RuntimeVariables(RuntimeVariables {
                    variables: self.simplify_all(variables),
                })
            }
            // Leaves, plus categories the traversal does not rebuild
            other @ (Expr::Constant(_)
            | Expr::Parameter(_)
            | Expr::DefaultValue(_)
            | Expr::Extension(_)) => other,
        };

        self.transformers
            .iter()
            .fold(rebuilt, |expr, transformer| self.apply(transformer.as_ref(), expr))
    }

    fn apply(&self, transformer: &dyn Transformer, expr: Expr) -> Expr {
        if !log::log_enabled!(log::Level::Trace) {
            return transformer.transform(expr, self);
        }
        let before = expr.to_string();
        let after = transformer.transform(expr, self);
        let after_rendered = after.to_string();
        if before != after_rendered {
            log::trace!("{}: {} => {}", transformer.name(), before, after_rendered);
        }
        after
    }

    fn simplify_catch_blocks(&self, handlers: Vec<CatchBlock>) -> Vec<CatchBlock> {
        handlers
            .into_iter()
            .map(
                |CatchBlock {
                     test,
                     variable,
                     filter,
                     body,
                 }| CatchBlock {
                    test,
                    variable: self.simplify_opt(variable),
                    filter: self.simplify_opt(filter),
                    body: self.simplify(body),
                },
            )
            .collect()
    }

    fn simplify_switch_cases(&self, cases: Vec<SwitchCase>) -> Vec<SwitchCase> {
        cases
            .into_iter()
            .map(|SwitchCase { test_values, body }| SwitchCase {
                test_values: self.simplify_all(test_values),
                body: self.simplify(body),
            })
            .collect()
    }

    fn simplify_element_inits(&self, initializers: Vec<ElementInit>) -> Vec<ElementInit> {
        initializers
            .into_iter()
            .map(|ElementInit { add_method, arguments }| ElementInit {
                add_method,
                arguments: self.simplify_all(arguments),
            })
            .collect()
    }
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::boolean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;
    use crate::ast::{
        BinOp, GotoKind, LabelTarget, MemberBinding, MemberRef, MethodRef, NewArrayKind,
        Parameter, TypeRef,
    };

    /// Rewrites every `true` constant to `false`
    fn flip_true(expr: Expr, _: &Simplifier) -> Expr {
        if expr.is_bool_constant(true) {
            boolean(false)
        } else {
            expr
        }
    }

    fn flipping() -> Simplifier {
        Simplifier::new(vec![Box::new(flip_true)])
    }

    #[test]
    fn no_transformers_is_identity() {
        let simplifier = Simplifier::new(vec![]);
        let expr = and(not(not(param("a"))), boolean(true));
        assert_eq!(simplifier.simplify(expr.clone()), expr);
    }

    #[test]
    fn absent_in_absent_out() {
        let simplifier = flipping();
        assert_eq!(simplifier.simplify_opt::<Expr>(None), None);
        assert_eq!(
            simplifier.simplify_opt(Some(boolean(true))),
            Some(boolean(false))
        );
    }

    #[test]
    fn simplify_all_preserves_order_and_count() {
        let simplifier = flipping();
        let out = simplifier.simplify_all(vec![boolean(true), param("x"), boolean(true)]);
        assert_eq!(out, vec![boolean(false), param("x"), boolean(false)]);
    }

    #[test]
    fn transformers_run_in_order_on_previous_output() {
        let wrap = |expr: Expr, _: &Simplifier| match expr {
            Expr::Parameter(_) => not(expr),
            other => other,
        };
        let unwrap_double = |expr: Expr, _: &Simplifier| match expr.as_not().and_then(Expr::as_not) {
            Some(inner) => inner.clone(),
            None => expr,
        };
        let simplifier = Simplifier::new(vec![Box::new(wrap), Box::new(unwrap_double)]);
        // a -> !a at the leaf; the parent `!(!a)` collapses in the second transformer
        assert_eq!(simplifier.simplify(not(param("a"))), param("a"));
    }

    #[test]
    fn children_are_simplified_in_every_category() {
        let simplifier = flipping();
        let t = || boolean(true);
        let f = || boolean(false);

        let cases: Vec<(Expr, Expr)> = vec![
            (
                Expr::Loop(Loop {
                    body: Box::new(t()),
                    break_label: Some(LabelTarget::new("brk")),
                    continue_label: None,
                }),
                Expr::Loop(Loop {
                    body: Box::new(f()),
                    break_label: Some(LabelTarget::new("brk")),
                    continue_label: None,
                }),
            ),
            (
                Expr::Goto(Goto {
                    kind: GotoKind::Return,
                    target: LabelTarget::new("ret"),
                    value: Some(Box::new(t())),
                }),
                Expr::Goto(Goto {
                    kind: GotoKind::Return,
                    target: LabelTarget::new("ret"),
                    value: Some(Box::new(f())),
                }),
            ),
            (
                Expr::Label(Label {
                    target: LabelTarget::new("ret"),
                    default_value: Some(Box::new(t())),
                }),
                Expr::Label(Label {
                    target: LabelTarget::new("ret"),
                    default_value: Some(Box::new(f())),
                }),
            ),
            (
                Expr::NewArray(NewArray {
                    kind: NewArrayKind::Init,
                    element_type: TypeRef::new("bool"),
                    expressions: vec![t(), param("x")],
                }),
                Expr::NewArray(NewArray {
                    kind: NewArrayKind::Init,
                    element_type: TypeRef::new("bool"),
                    expressions: vec![f(), param("x")],
                }),
            ),
            (
                Expr::Index(Index {
                    object: Box::new(param("m")),
                    indexer: Some(MemberRef::new("Map", "Item")),
                    arguments: vec![t()],
                }),
                Expr::Index(Index {
                    object: Box::new(param("m")),
                    indexer: Some(MemberRef::new("Map", "Item")),
                    arguments: vec![f()],
                }),
            ),
            (
                Expr::Invocation(Invocation {
                    target: Box::new(param("g")),
                    arguments: vec![t()],
                }),
                Expr::Invocation(Invocation {
                    target: Box::new(param("g")),
                    arguments: vec![f()],
                }),
            ),
            (
                Expr::Dynamic(Dynamic {
                    binder: "InvokeMember".into(),
                    arguments: vec![t(), t()],
                }),
                Expr::Dynamic(Dynamic {
                    binder: "InvokeMember".into(),
                    arguments: vec![f(), f()],
                }),
            ),
            (
                Expr::TypeBinary(TypeBinary {
                    op: crate::ast::TypeBinaryOp::TypeIs,
                    expression: Box::new(t()),
                    ty: TypeRef::new("bool"),
                }),
                Expr::TypeBinary(TypeBinary {
                    op: crate::ast::TypeBinaryOp::TypeIs,
                    expression: Box::new(f()),
                    ty: TypeRef::new("bool"),
                }),
            ),
            (
                Expr::Member(Member {
                    expression: None,
                    member: MemberRef::new("Config", "Enabled"),
                }),
                Expr::Member(Member {
                    expression: None,
                    member: MemberRef::new("Config", "Enabled"),
                }),
            ),
            (
                call(t(), "Boolean", "ToString", vec![t()]),
                call(f(), "Boolean", "ToString", vec![f()]),
            ),
            (
                cond(t(), t(), param("x")),
                cond(f(), f(), param("x")),
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(simplifier.simplify(input.clone()), expected, "for {}", input);
        }
    }

    #[test]
    fn try_and_switch_compound_children() {
        let simplifier = flipping();
        let expr = Expr::Try(Try {
            body: Box::new(boolean(true)),
            handlers: vec![CatchBlock {
                test: TypeRef::new("Exception"),
                variable: Some(Parameter::new("e")),
                filter: Some(boolean(true)),
                body: boolean(true),
            }],
            finally: None,
            fault: Some(Box::new(boolean(true))),
        });
        assert_eq!(
            simplifier.simplify(expr).to_string(),
            "try { false } catch (Exception e) when (false) { false } fault { false }"
        );

        let expr = Expr::Switch(Switch {
            value: Box::new(param("k")),
            cases: vec![SwitchCase {
                test_values: vec![boolean(true), int(1)],
                body: boolean(true),
            }],
            default_body: Some(Box::new(boolean(true))),
        });
        assert_eq!(
            simplifier.simplify(expr).to_string(),
            "switch (k) { case false, 1: false; default: false; }"
        );
    }

    #[test]
    fn list_init_and_member_init() {
        let simplifier = flipping();
        let expr = Expr::ListInit(ListInit {
            new: new_object("List<bool>", vec![boolean(true)]),
            initializers: vec![ElementInit {
                add_method: MethodRef::new("List<bool>", "Add"),
                arguments: vec![boolean(true)],
            }],
        });
        assert_eq!(
            simplifier.simplify(expr).to_string(),
            "new List<bool>(false) { Add(false) }"
        );

        // bindings are carried through untouched
        let expr = Expr::MemberInit(MemberInit {
            new: new_object("Flags", vec![boolean(true)]),
            bindings: vec![MemberBinding {
                member: MemberRef::new("Flags", "On"),
                value: boolean(true),
            }],
        });
        assert_eq!(
            simplifier.simplify(expr).to_string(),
            "new Flags(false) { On = true }"
        );
    }

    #[test]
    fn lambda_block_and_runtime_variables() {
        let simplifier = flipping();
        let expr = lambda(&["a"], block(&["t"], vec![boolean(true), param("a")]));
        assert_eq!(
            simplifier.simplify(expr).to_string(),
            "(a) => { var t; false; a; }"
        );

        let expr = Expr::RuntimeVariables(RuntimeVariables {
            variables: vec![Parameter::new("a"), Parameter::new("b")],
        });
        assert_eq!(simplifier.simplify(expr.clone()), expr);
    }

    #[test]
    fn unenumerated_categories_pass_through() {
        let simplifier = flipping();
        let ext = extension("opaque", vec![boolean(true)]);
        assert_eq!(simplifier.simplify(ext.clone()), ext);

        let default = Expr::DefaultValue(crate::ast::DefaultValue {
            ty: TypeRef::new("int"),
        });
        assert_eq!(simplifier.simplify(default.clone()), default);
    }

    #[test]
    fn extension_is_reduced_before_traversal() {
        let reducers = ReducerRegistry::new().with("always", |_| boolean(true));
        let simplifier = flipping().with_reducers(reducers);
        let expr = and(extension("always", vec![]), param("x"));
        assert_eq!(simplifier.simplify(expr), and(boolean(false), param("x")));
    }

    #[test]
    #[should_panic(expected = "transformer changed a parameter node into a constant node")]
    fn category_change_in_typed_position_panics() {
        let erase_params = |expr: Expr, _: &Simplifier| match expr {
            Expr::Parameter(_) => boolean(true),
            other => other,
        };
        let simplifier = Simplifier::new(vec![Box::new(erase_params)]);
        simplifier.simplify(lambda(&["a"], param("a")));
    }

    #[test]
    fn typed_entry_preserves_category() {
        let simplifier = flipping();
        let new = simplifier.simplify(new_object("Box", vec![boolean(true)]));
        assert_eq!(new.arguments, vec![boolean(false)]);
    }

    #[test]
    fn fixpoint_settles_and_reports_runaway() {
        let simplifier = Simplifier::boolean();
        let expr = not(not(and(param("a"), param("a"))));
        assert_eq!(simplifier.simplify_to_fixpoint(expr, 4).unwrap(), param("a"));

        assert!(matches!(
            simplifier.simplify_to_fixpoint(param("a"), 0),
            Err(SimplifyError::ZeroPasses)
        ));

        // grows the tree on every pass, so it never settles
        let grow = |expr: Expr, _: &Simplifier| match expr {
            Expr::Parameter(_) => expr.binop(BinOp::Add, int(1)),
            other => other,
        };
        let simplifier = Simplifier::new(vec![Box::new(grow)]);
        match simplifier.simplify_to_fixpoint(param("n"), 3) {
            Err(SimplifyError::NoFixpoint { passes, last }) => {
                assert_eq!(passes, 3);
                assert_eq!(last.to_string(), "(((n + 1) + 1) + 1)");
            }
            other => panic!("expected NoFixpoint, got {:?}", other),
        }
    }
}
