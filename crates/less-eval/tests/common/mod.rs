/*
 * common/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Syntax tree builders shared by the integration tests. They stand in for
 * the parser, which lives outside this crate.
 */

#![allow(dead_code)]

use less_eval::ast::{
    Combinator, Declaration, Element, Expression, MixinCall, MixinDefinition, Node, Parameter,
    Ruleset, Selector, Stylesheet, VariableDeclaration,
};
use less_eval::{Color, EvalError, ListSeparator, Operator, OutputRule, Value, render_css};
use less_source_map::SourceInfo;

fn si() -> SourceInfo {
    SourceInfo::default()
}

/// Split selector text into elements. Whitespace separates elements,
/// `>`, `+` and `~` set the combinator of the next one, and a leading `&`
/// attaches the element to the previous one (or to the parent selector).
pub fn elements(text: &str) -> Vec<Element> {
    let mut elements = Vec::new();
    let mut combinator = Combinator::Descendant;
    for token in text.split_whitespace() {
        match token {
            ">" => combinator = Combinator::Child,
            "+" => combinator = Combinator::Adjacent,
            "~" => combinator = Combinator::Sibling,
            _ => {
                if let Some(rest) = token.strip_prefix('&') {
                    elements.push(Element::new(Combinator::Attached, rest));
                } else {
                    elements.push(Element::new(combinator, token));
                }
                combinator = Combinator::Descendant;
            }
        }
    }
    elements
}

pub fn sel(text: &str) -> Selector {
    Selector::new(elements(text), si())
}

/// A ruleset; `selectors` may be comma-separated.
pub fn rule(selectors: &str, children: Vec<Node>) -> Node {
    Node::Ruleset(Ruleset::new(
        selectors.split(',').map(|s| sel(s.trim())).collect(),
        children,
        si(),
    ))
}

pub fn mixin(name: &str, params: Vec<Parameter>, children: Vec<Node>) -> Node {
    Node::MixinDefinition(MixinDefinition::new(name, params, children, si()))
}

pub fn mixin_at(
    name: &str,
    params: Vec<Parameter>,
    children: Vec<Node>,
    source_info: SourceInfo,
) -> Node {
    Node::MixinDefinition(MixinDefinition::new(name, params, children, source_info))
}

pub fn decl(property: &str, value: Expression) -> Node {
    Node::Declaration(Declaration::new(property, value, si()))
}

pub fn important(property: &str, value: Expression) -> Node {
    Node::Declaration(Declaration::new(property, value, si()).important())
}

pub fn var(name: &str, value: Expression) -> Node {
    Node::Variable(VariableDeclaration::new(name, value, si()))
}

/// `path(args)`
pub fn call(path: &str, args: Vec<Expression>) -> Node {
    Node::MixinCall(MixinCall::new(elements(path), args, si()))
}

/// `path;`
pub fn bare_call(path: &str) -> Node {
    Node::MixinCall(MixinCall::bare(elements(path), si()))
}

pub fn call_at(path: &str, args: Vec<Expression>, source_info: SourceInfo) -> Node {
    Node::MixinCall(MixinCall::new(elements(path), args, source_info))
}

pub fn param(name: &str) -> Parameter {
    Parameter::required(name)
}

pub fn param_default(name: &str, default: Expression) -> Parameter {
    Parameter::with_default(name, default)
}

pub fn pattern(value: Expression) -> Parameter {
    Parameter::pattern(value)
}

pub fn lit(value: Value) -> Expression {
    Expression::literal(value, si())
}

pub fn px(n: f64) -> Expression {
    dim(n, "px")
}

pub fn pct(n: f64) -> Expression {
    dim(n, "%")
}

pub fn dim(n: f64, unit: &str) -> Expression {
    lit(Value::dimension(n, unit))
}

pub fn num(n: f64) -> Expression {
    lit(Value::Number(n))
}

pub fn kw(name: &str) -> Expression {
    lit(Value::keyword(name))
}

/// A single-quoted string.
pub fn quoted(text: &str) -> Expression {
    lit(Value::Quoted {
        text: text.to_string(),
        quote: '\'',
    })
}

/// A double-quoted string.
pub fn dquoted(text: &str) -> Expression {
    lit(Value::quoted(text))
}

pub fn color(hex: &str) -> Expression {
    lit(Value::Color(
        Color::from_hex(hex).unwrap_or_else(|| panic!("bad color literal {hex}")),
    ))
}

pub fn var_ref(name: &str) -> Expression {
    Expression::variable(name, si())
}

pub fn op(lhs: Expression, symbol: char, rhs: Expression) -> Expression {
    op_at(lhs, symbol, rhs, si())
}

pub fn op_at(
    lhs: Expression,
    symbol: char,
    rhs: Expression,
    source_info: SourceInfo,
) -> Expression {
    let operator = match symbol {
        '+' => Operator::Add,
        '-' => Operator::Subtract,
        '*' => Operator::Multiply,
        '/' => Operator::Divide,
        other => panic!("unknown operator {other}"),
    };
    Expression::operation(operator, lhs, rhs, source_info)
}

pub fn func(name: &str, args: Vec<Expression>) -> Expression {
    Expression::call(name, args, si())
}

/// A space-separated list.
pub fn spaced(items: Vec<Expression>) -> Expression {
    Expression::list(ListSeparator::Space, items, si())
}

pub fn compile(nodes: Vec<Node>) -> Vec<OutputRule> {
    Stylesheet::new(nodes)
        .evaluate()
        .unwrap_or_else(|err| panic!("evaluation failed: {err}"))
}

pub fn css(nodes: Vec<Node>) -> String {
    render_css(&compile(nodes))
}

pub fn compile_err(nodes: Vec<Node>) -> EvalError {
    match Stylesheet::new(nodes).evaluate() {
        Ok(rules) => panic!("expected an error, got:\n{}", render_css(&rules)),
        Err(err) => err,
    }
}
