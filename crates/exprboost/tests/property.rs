use exprboost::ast::build::*;
use exprboost::{BooleanRules, Env, Expr, Literal, RuleGroup, Simplifier, eval};
use proptest::prelude::*;

const NAMES: [&str; 3] = ["p", "q", "r"];

fn arb_atom() -> impl Strategy<Value = Expr> {
    prop_oneof![
        prop::sample::select(NAMES.to_vec()).prop_map(param),
        any::<bool>().prop_map(boolean),
    ]
}

/// Well-typed boolean trees over `p`, `q`, `r`
fn arb_bool_expr(depth: u32) -> BoxedStrategy<Expr> {
    if depth == 0 {
        return arb_atom().boxed();
    }

    let sub = || arb_bool_expr(depth - 1);
    prop_oneof![
        arb_atom(),
        sub().prop_map(not),
        (sub(), sub()).prop_map(|(l, r)| and(l, r)),
        (sub(), sub()).prop_map(|(l, r)| or(l, r)),
        (sub(), sub()).prop_map(|(l, r)| eq(l, r)),
        (sub(), sub()).prop_map(|(l, r)| ne(l, r)),
        (sub(), sub(), sub()).prop_map(|(t, a, b)| cond(t, a, b)),
    ]
    .boxed()
}

fn arb_env() -> impl Strategy<Value = Env> {
    prop::array::uniform3(any::<bool>()).prop_map(|values| {
        NAMES
            .iter()
            .zip(values)
            .map(|(name, v)| (name.to_string(), Literal::Bool(v)))
            .collect()
    })
}

fn only(group: RuleGroup) -> Simplifier {
    Simplifier::new(vec![Box::new(BooleanRules::only(group))])
}

proptest! {
    #[test]
    fn each_rule_is_idempotent(expr in arb_bool_expr(3)) {
        for group in RuleGroup::ALL {
            let simplifier = only(group);
            let once = simplifier.simplify(expr.clone());
            let twice = simplifier.simplify(once.clone());
            prop_assert_eq!(once.to_string(), twice.to_string(), "{}", group.name());
        }
    }

    #[test]
    fn full_rule_set_is_idempotent(expr in arb_bool_expr(3)) {
        let simplifier = Simplifier::boolean();
        let once = simplifier.simplify(expr);
        let twice = simplifier.simplify(once.clone());
        prop_assert_eq!(once.to_string(), twice.to_string());
    }

    #[test]
    fn simplification_preserves_values(expr in arb_bool_expr(3), env in arb_env()) {
        let simplified = Simplifier::boolean().simplify(expr.clone());
        prop_assert_eq!(eval(&expr, &env), eval(&simplified, &env));
    }

    #[test]
    fn double_negation_cancels(expr in arb_bool_expr(3)) {
        let simplifier = Simplifier::boolean();
        prop_assert_eq!(
            simplifier.simplify(not(not(expr.clone()))),
            simplifier.simplify(expr)
        );
    }

    #[test]
    fn constant_connectives_fold(p in any::<bool>(), q in any::<bool>()) {
        let simplifier = Simplifier::boolean();
        prop_assert_eq!(simplifier.simplify(and(boolean(p), boolean(q))), boolean(p && q));
        prop_assert_eq!(simplifier.simplify(or(boolean(p), boolean(q))), boolean(p || q));
        prop_assert_eq!(simplifier.simplify(eq(boolean(p), boolean(p))), boolean(true));
    }

    #[test]
    fn constant_arm_decides(expr in arb_bool_expr(3)) {
        let simplifier = Simplifier::boolean();
        prop_assert_eq!(simplifier.simplify(and(boolean(false), expr.clone())), boolean(false));
        prop_assert_eq!(simplifier.simplify(or(boolean(true), expr)), boolean(true));
    }

    #[test]
    fn equivalence_is_reflexive(expr in arb_bool_expr(3)) {
        prop_assert!(Simplifier::boolean().is_equivalent(&expr, &expr));
    }

    #[test]
    fn expression_contradicts_its_negation(expr in arb_bool_expr(3)) {
        let simplifier = Simplifier::boolean();
        prop_assert_eq!(simplifier.simplify(and(expr.clone(), not(expr))), boolean(false));
    }
}
