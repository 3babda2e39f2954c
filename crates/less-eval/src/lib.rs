/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluation engine for a CSS-superset stylesheet language.
//!
//! This crate takes a parsed stylesheet (variables, nested rulesets,
//! parameterized mixins, namespaces and arithmetic) and reduces it to a flat
//! list of [`OutputRule`]s: fully composed selectors with resolved
//! declarations. Parsing and textual formatting happen elsewhere.
//!
//! # Example
//!
//! ```
//! use less_eval::ast::{Declaration, Element, Expression, MixinCall, MixinDefinition, Node,
//!     Parameter, Ruleset, Selector, Stylesheet};
//! use less_eval::{Value, render_css};
//! use less_source_map::SourceInfo;
//!
//! let at = SourceInfo::default();
//! // .bordered(@width: 2px) { border-width: @width; }
//! // #header { .bordered(4px); }
//! let sheet = Stylesheet::new(vec![
//!     Node::MixinDefinition(MixinDefinition::new(
//!         ".bordered",
//!         vec![Parameter::with_default(
//!             "@width",
//!             Expression::literal(Value::dimension(2.0, "px"), at),
//!         )],
//!         vec![Node::Declaration(Declaration::new(
//!             "border-width",
//!             Expression::variable("@width", at),
//!             at,
//!         ))],
//!         at,
//!     )),
//!     Node::Ruleset(Ruleset::new(
//!         vec![Selector::new(vec![Element::descendant("#header")], at)],
//!         vec![Node::MixinCall(MixinCall::new(
//!             vec![Element::descendant(".bordered")],
//!             vec![Expression::literal(Value::dimension(4.0, "px"), at)],
//!             at,
//!         ))],
//!         at,
//!     )),
//! ]);
//!
//! let rules = sheet.evaluate().unwrap();
//! assert_eq!(render_css(&rules), "#header {\n  border-width: 4px;\n}\n");
//! ```
//!
//! # Architecture
//!
//! - [`ast`]: the immutable input tree
//! - [`value`]: runtime values and arithmetic
//! - [`expression`]: expression evaluation
//! - [`functions`]: native functions callable from expressions
//! - [`scope`]: frame arena and name lookup
//! - [`resolver`]: mixin call resolution and overload matching
//! - [`selector`]: selector composition for nested rulesets
//! - [`evaluator`]: the tree walk producing output rules

pub mod ast;
pub mod error;
pub mod eval_context;
pub mod evaluator;
pub mod expression;
pub mod functions;
pub mod output;
pub mod resolver;
pub mod scope;
pub mod selector;
pub mod value;

pub use ast::Stylesheet;
pub use error::{CallSite, EvalError, EvalErrorKind, EvalResult};
pub use eval_context::{EvalContext, EvalOptions};
pub use evaluator::evaluate;
pub use functions::FunctionRegistry;
pub use output::{OutputDeclaration, OutputRule, render_css};
pub use value::{Color, ListSeparator, Operator, Value};
