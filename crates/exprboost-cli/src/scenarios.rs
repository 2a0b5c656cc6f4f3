//! Built-in trees the driver can simplify
//!
//! All scenarios are lambdas over integer parameters `a` and `b` so they can
//! be evaluated with `--bind`.

use exprboost::Expr;
use exprboost::ast::build::*;
use indexmap::IndexMap;

pub struct Scenario {
    pub description: &'static str,
    pub build: fn() -> Expr,
}

/// Scenarios in listing order
pub fn scenarios() -> IndexMap<&'static str, Scenario> {
    let mut map = IndexMap::new();
    map.insert(
        "demo",
        Scenario {
            description: "constant folding through a ternary, then resolution",
            build: demo,
        },
    );
    map.insert(
        "self-compare",
        Scenario {
            description: "parameters compared with themselves",
            build: self_compare,
        },
    );
    map.insert(
        "absorption",
        Scenario {
            description: "x || (x && y) keeps only x",
            build: absorption,
        },
    );
    map.insert(
        "resolution",
        Scenario {
            description: "(x || y) && (x || !y) keeps only x",
            build: resolution,
        },
    );
    map.insert(
        "contradiction",
        Scenario {
            description: "a compound condition and its negation",
            build: contradiction,
        },
    );
    map
}

fn over_ab(body: Expr) -> Expr {
    lambda(&["a", "b"], body)
}

fn a_is(n: i64) -> Expr {
    eq(param("a"), int(n))
}

fn b_is(n: i64) -> Expr {
    eq(param("b"), int(n))
}

fn demo() -> Expr {
    let six = || eq(sub(int(6), param("a")), int(8));
    let five = || eq(sub(int(5), param("a")), int(8));
    let ternary = cond(or(eq(param("a"), param("b")), boolean(true)), int(4), int(7));
    let first = eq(not(not(eq(ternary, int(7)))), boolean(false));
    let second = or(six(), not(five()));
    let third = or(not(five()), not(six()));
    over_ab(not(not(and(and(first, second), third))))
}

fn self_compare() -> Expr {
    over_ab(and(
        eq(param("a"), param("a")),
        or(ne(param("b"), param("b")), b_is(3)),
    ))
}

fn absorption() -> Expr {
    over_ab(or(a_is(1), and(a_is(1), b_is(2))))
}

fn resolution() -> Expr {
    over_ab(and(or(a_is(1), b_is(2)), or(a_is(1), not(b_is(2)))))
}

fn contradiction() -> Expr {
    let x = || or(a_is(1), not(not(b_is(2))));
    over_ab(and(x(), not(x())))
}
