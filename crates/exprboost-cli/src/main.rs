//! exprboost CLI
//!
//! Simplifies one of the built-in scenarios and prints the before and after
//! trees, optionally evaluating both under integer bindings.

mod scenarios;

use std::collections::BTreeMap;

use anyhow::{Context, bail};
use clap::Parser;
use exprboost::{Env, Expr, Literal, Simplifier, eval};
use serde::Serialize;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "exprboost")]
#[command(about = "Expression tree simplifier")]
#[command(after_help = "\
EXAMPLES:
    # Simplify the demonstration tree
    exprboost

    # Evaluate before and after with a = 3, b = 4
    exprboost demo --bind a=3 --bind b=4

    # Machine-readable output, repeating passes until nothing changes
    exprboost resolution --fixpoint --json
")]
struct Args {
    /// Scenario to simplify
    #[arg(default_value = "demo")]
    scenario: String,

    /// List scenarios and exit
    #[arg(long)]
    list: bool,

    /// Repeat whole-tree passes until the result stops changing
    #[arg(long)]
    fixpoint: bool,

    /// Pass limit for --fixpoint
    #[arg(long, default_value = "8", requires = "fixpoint")]
    max_passes: usize,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Bind a parameter to an integer, as NAME=INT. Repeatable.
    #[arg(long = "bind", value_name = "NAME=INT", value_parser = parse_binding)]
    bindings: Vec<(String, i64)>,
}

#[derive(Error, Debug, PartialEq)]
enum BindingError {
    #[error("expected NAME=INT, got `{0}`")]
    MissingEquals(String),

    #[error("parameter name is empty in `{0}`")]
    EmptyName(String),

    #[error("`{value}` is not an integer")]
    NotAnInteger { value: String },
}

fn parse_binding(raw: &str) -> Result<(String, i64), BindingError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| BindingError::MissingEquals(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(BindingError::EmptyName(raw.to_string()));
    }
    let value = value.trim();
    let value = value.parse().map_err(|_| BindingError::NotAnInteger {
        value: value.to_string(),
    })?;
    Ok((name.to_string(), value))
}

#[derive(Serialize)]
struct Report<'a> {
    scenario: &'a str,
    original: String,
    simplified: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    bindings: BTreeMap<&'a str, i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Values>,
}

#[derive(Serialize)]
struct Values {
    original: String,
    simplified: String,
}

fn evaluate(expr: &Expr, env: &Env) -> String {
    match eval(expr, env) {
        Ok(value) => value.to_string(),
        Err(e) => format!("error: {e}"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let scenarios = scenarios::scenarios();

    if args.list {
        for (name, scenario) in &scenarios {
            println!("{name:<14} {}", scenario.description);
        }
        return Ok(());
    }

    let Some(scenario) = scenarios.get(args.scenario.as_str()) else {
        let known: Vec<_> = scenarios.keys().copied().collect();
        bail!(
            "unknown scenario `{}` (known: {})",
            args.scenario,
            known.join(", ")
        );
    };

    let simplifier = Simplifier::boolean();
    log::info!("transformers: {}", simplifier.transformer_names().join(", "));

    let original = (scenario.build)();
    let simplified = if args.fixpoint {
        simplifier
            .simplify_to_fixpoint(original.clone(), args.max_passes)
            .with_context(|| format!("simplifying `{}`", args.scenario))?
    } else {
        simplifier.simplify(original.clone())
    };

    let bindings: BTreeMap<&str, i64> = args
        .bindings
        .iter()
        .map(|(name, value)| (name.as_str(), *value))
        .collect();
    let values = (!bindings.is_empty()).then(|| {
        let env: Env = bindings
            .iter()
            .map(|(name, value)| (name.to_string(), Literal::Int(*value)))
            .collect();
        Values {
            original: evaluate(&original, &env),
            simplified: evaluate(&simplified, &env),
        }
    });

    let report = Report {
        scenario: &args.scenario,
        original: original.to_string(),
        simplified: simplified.to_string(),
        bindings,
        values,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Original:   {}", report.original);
        println!("Simplified: {}", report.simplified);
        if let Some(values) = &report.values {
            println!("Value:      {} -> {}", values.original, values.simplified);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binding() {
        assert_eq!(parse_binding("a=3"), Ok(("a".to_string(), 3)));
        assert_eq!(parse_binding(" b = -12 "), Ok(("b".to_string(), -12)));
    }

    #[test]
    fn test_parse_binding_errors() {
        assert_eq!(
            parse_binding("a3"),
            Err(BindingError::MissingEquals("a3".into()))
        );
        assert_eq!(parse_binding("=3"), Err(BindingError::EmptyName("=3".into())));
        assert_eq!(
            parse_binding("a=x"),
            Err(BindingError::NotAnInteger { value: "x".into() })
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["exprboost", "absorption", "--bind", "a=1", "--json"])
            .unwrap();
        assert_eq!(args.scenario, "absorption");
        assert_eq!(args.bindings, vec![("a".to_string(), 1)]);
        assert!(args.json);
        assert_eq!(args.max_passes, 8);
    }

    #[test]
    fn test_report_json() {
        let report = Report {
            scenario: "demo",
            original: "a".into(),
            simplified: "a".into(),
            bindings: BTreeMap::new(),
            values: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["scenario"], "demo");
        assert!(json.get("bindings").is_none());
    }
}
