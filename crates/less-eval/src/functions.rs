/*
 * functions.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Native functions callable from expressions.
//!
//! Functions are looked up by name (case-insensitively) in a
//! [`FunctionRegistry`] owned by the caller of the evaluator. A call to a
//! name that is not registered is not an error: it is emitted literally, so
//! plain CSS functions such as `url(...)` or `rgba(...)` pass through.
//!
//! Results are never cached; every call site invokes the function again.

use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// A native function. Errors are plain messages; the evaluator attaches
/// the call's location.
pub type NativeFunction = Box<dyn Fn(&[Value]) -> Result<Value, String>>;

/// Table of functions available to one compilation.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, NativeFunction>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register("formatString", format_string)
            .register("percentage", percentage)
            .register("round", |args| rounding("round", args, f64::round))
            .register("ceil", |args| rounding("ceil", args, f64::ceil))
            .register("floor", |args| rounding("floor", args, f64::floor))
            .register("unit", unit);
        registry
    }

    /// Register (or replace) a function.
    pub fn register<F>(&mut self, name: &str, function: F) -> &mut Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + 'static,
    {
        self.functions
            .insert(name.to_lowercase(), Box::new(function));
        self
    }

    pub fn get(&self, name: &str) -> Option<&NativeFunction> {
        self.functions.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\d+)\}").expect("placeholder regex is valid"));

fn expect_args(args: &[Value], min: usize, max: usize) -> Result<(), String> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{} to {}", min, max)
        };
        return Err(format!("expected {} argument(s), got {}", expected, args.len()));
    }
    Ok(())
}

/// `formatString(template, args...)`: replace `{N}` with the N-th
/// remaining argument. String arguments are substituted without quotes.
fn format_string(args: &[Value]) -> Result<Value, String> {
    let Some((template, rest)) = args.split_first() else {
        return Err("expected a format string".to_string());
    };
    let template = template.to_unquoted();

    if let Some(missing) = PLACEHOLDER
        .captures_iter(&template)
        .filter_map(|caps| caps[1].parse::<usize>().ok())
        .find(|index| *index >= rest.len())
    {
        return Err(format!(
            "placeholder {{{}}} has no argument ({} supplied)",
            missing,
            rest.len()
        ));
    }

    let formatted = PLACEHOLDER.replace_all(&template, |caps: &regex::Captures| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| rest.get(index))
            .map(Value::to_unquoted)
            .unwrap_or_default()
    });
    Ok(Value::Keyword(formatted.into_owned()))
}

/// `percentage(0.5)` is `50%`.
fn percentage(args: &[Value]) -> Result<Value, String> {
    expect_args(args, 1, 1)?;
    match &args[0] {
        Value::Number(n) => Ok(Value::dimension(n * 100.0, "%")),
        other => Err(format!("expected a number, got {}", other.type_name())),
    }
}

fn rounding(name: &str, args: &[Value], op: fn(f64) -> f64) -> Result<Value, String> {
    expect_args(args, 1, 1)?;
    match &args[0] {
        Value::Number(n) => Ok(Value::Number(op(*n))),
        Value::Dimension { value, unit } => Ok(Value::dimension(op(*value), unit.clone())),
        other => Err(format!(
            "{} expects a number or dimension, got {}",
            name,
            other.type_name()
        )),
    }
}

/// `unit(5px)` is `5`; `unit(5, em)` is `5em`.
fn unit(args: &[Value]) -> Result<Value, String> {
    expect_args(args, 1, 2)?;
    let Some(value) = args[0].as_number() else {
        return Err(format!(
            "expected a number or dimension, got {}",
            args[0].type_name()
        ));
    };
    match args.get(1) {
        None => Ok(Value::Number(value)),
        Some(Value::Keyword(unit) | Value::Quoted { text: unit, .. }) => {
            Ok(Value::dimension(value, unit.clone()))
        }
        Some(other) => Err(format!("expected a unit, got {}", other.type_name())),
    }
}
