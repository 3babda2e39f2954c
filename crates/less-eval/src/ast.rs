/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Stylesheet syntax tree.
//!
//! The tree is produced by an external parser and is never mutated during
//! evaluation. Every node carries the [`SourceInfo`] of the text it was
//! parsed from so that errors can point back at the source. The `Display`
//! implementations reconstruct a normalized form of the source text, which
//! is what error messages quote.

use crate::value::{ListSeparator, Operator, Value};
use less_source_map::SourceInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed stylesheet: the root of the tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
}

impl Stylesheet {
    pub fn new(nodes: Vec<Node>) -> Self {
        Stylesheet { nodes }
    }
}

/// A statement inside a stylesheet or block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// `selector, selector { ... }`
    Ruleset(Ruleset),
    /// `.name(@a, @b: 1) { ... }`
    MixinDefinition(MixinDefinition),
    /// `.name(args);` or `#ns > .name;`
    MixinCall(MixinCall),
    /// `property: value [!important];`
    Declaration(Declaration),
    /// `@name: value;`
    Variable(VariableDeclaration),
}

/// Relationship between a selector element and the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    /// Whitespace: `.a .b`
    Descendant,
    /// `.a > .b`
    Child,
    /// `.a + .b`
    Adjacent,
    /// `.a ~ .b`
    Sibling,
    /// No separator at all, as with `&:hover` or `&.active`.
    Attached,
}

impl Combinator {
    /// The text placed between the previous element and this one.
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
            Combinator::Adjacent => " + ",
            Combinator::Sibling => " ~ ",
            Combinator::Attached => "",
        }
    }
}

/// One compound selector together with the combinator that precedes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    pub combinator: Combinator,
    pub value: String,
}

impl Element {
    pub fn new(combinator: Combinator, value: impl Into<String>) -> Self {
        Element {
            combinator,
            value: value.into(),
        }
    }

    pub fn descendant(value: impl Into<String>) -> Self {
        Self::new(Combinator::Descendant, value)
    }

    pub fn child(value: impl Into<String>) -> Self {
        Self::new(Combinator::Child, value)
    }
}

fn write_elements(f: &mut fmt::Formatter<'_>, elements: &[Element]) -> fmt::Result {
    for (i, element) in elements.iter().enumerate() {
        if i == 0 {
            match element.combinator {
                Combinator::Descendant | Combinator::Attached => {}
                other => write!(f, "{} ", other.as_str().trim())?,
            }
        } else {
            f.write_str(element.combinator.as_str())?;
        }
        f.write_str(&element.value)?;
    }
    Ok(())
}

/// A complex selector: a sequence of elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selector {
    pub elements: Vec<Element>,
    pub source_info: SourceInfo,
}

impl Selector {
    pub fn new(elements: Vec<Element>, source_info: SourceInfo) -> Self {
        Selector {
            elements,
            source_info,
        }
    }

    /// Whether this selector is exactly one element named `name`.
    ///
    /// `.mixin:after` and `.mixin .inner` do not qualify for `.mixin`, and
    /// neither do attached or sibling-combined elements such as `&.mixin`.
    pub fn is_single(&self, name: &str) -> bool {
        match self.elements.as_slice() {
            [only] => {
                matches!(only.combinator, Combinator::Descendant | Combinator::Child)
                    && only.value == name
            }
            _ => false,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_elements(f, &self.elements)
    }
}

/// A block of declarations and nested statements under one or more
/// selectors. Rulesets are emitted, and can also be called as
/// zero-argument mixins or used as namespaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub selectors: Vec<Selector>,
    pub children: Vec<Node>,
    pub source_info: SourceInfo,
}

impl Ruleset {
    pub fn new(selectors: Vec<Selector>, children: Vec<Node>, source_info: SourceInfo) -> Self {
        Ruleset {
            selectors,
            children,
            source_info,
        }
    }

    /// Whether a mixin call segment named `name` can refer to this ruleset.
    pub fn matches_name(&self, name: &str) -> bool {
        self.selectors.iter().any(|s| s.is_single(name))
    }
}

/// A mixin parameter.
///
/// A parameter with a `guard` is a pattern: the argument in that position
/// must equal the guard value. Pattern parameters have no name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: Option<String>,
    pub default: Option<Expression>,
    pub guard: Option<Expression>,
}

impl Parameter {
    /// `@name`
    pub fn required(name: impl Into<String>) -> Self {
        Parameter {
            name: Some(name.into()),
            default: None,
            guard: None,
        }
    }

    /// `@name: default`
    pub fn with_default(name: impl Into<String>, default: Expression) -> Self {
        Parameter {
            name: Some(name.into()),
            default: Some(default),
            guard: None,
        }
    }

    /// A literal pattern such as `left` or `'top'`.
    pub fn pattern(guard: Expression) -> Self {
        Parameter {
            name: None,
            default: None,
            guard: Some(guard),
        }
    }

    /// Parameters without a default must be supplied by the caller.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(guard) = &self.guard {
            return write!(f, "{}", guard);
        }
        if let Some(name) = &self.name {
            f.write_str(name)?;
        }
        if let Some(default) = &self.default {
            write!(f, ": {}", default)?;
        }
        Ok(())
    }
}

/// A parameterized mixin. Definitions are never emitted themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixinDefinition {
    pub name: String,
    pub params: Vec<Parameter>,
    pub children: Vec<Node>,
    pub source_info: SourceInfo,
}

impl MixinDefinition {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Parameter>,
        children: Vec<Node>,
        source_info: SourceInfo,
    ) -> Self {
        MixinDefinition {
            name: name.into(),
            params,
            children,
            source_info,
        }
    }

    /// Number of parameters a caller must supply.
    pub fn required_arity(&self) -> usize {
        self.params.iter().filter(|p| p.is_required()).count()
    }
}

impl fmt::Display for MixinDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")
    }
}

/// A mixin call. The path has one element per namespace segment, e.g.
/// `#ns > .mixin` is `[#ns, > .mixin]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixinCall {
    pub path: Vec<Element>,
    pub args: Vec<Expression>,
    /// Whether the call was written with parentheses.
    pub parenthesized: bool,
    pub source_info: SourceInfo,
}

impl MixinCall {
    /// `path(args)`
    pub fn new(path: Vec<Element>, args: Vec<Expression>, source_info: SourceInfo) -> Self {
        MixinCall {
            path,
            args,
            parenthesized: true,
            source_info,
        }
    }

    /// `path;` with no argument list.
    pub fn bare(path: Vec<Element>, source_info: SourceInfo) -> Self {
        MixinCall {
            path,
            args: Vec::new(),
            parenthesized: false,
            source_info,
        }
    }

    /// The path as written, without arguments.
    pub fn path_text(&self) -> String {
        struct Path<'a>(&'a [Element]);
        impl fmt::Display for Path<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_elements(f, self.0)
            }
        }
        Path(&self.path).to_string()
    }
}

impl fmt::Display for MixinCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_elements(f, &self.path)?;
        if self.parenthesized {
            f.write_str("(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// `property: value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub property: String,
    pub value: Expression,
    pub important: bool,
    pub source_info: SourceInfo,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: Expression, source_info: SourceInfo) -> Self {
        Declaration {
            property: property.into(),
            value,
            important: false,
            source_info,
        }
    }

    /// Mark the declaration `!important`.
    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }
}

/// `@name: value`. The name includes the leading `@`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub name: String,
    pub value: Expression,
    pub source_info: SourceInfo,
}

impl VariableDeclaration {
    pub fn new(name: impl Into<String>, value: Expression, source_info: SourceInfo) -> Self {
        VariableDeclaration {
            name: name.into(),
            value,
            source_info,
        }
    }
}

/// An unevaluated expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub source_info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    Literal(Value),
    /// `@name`
    Variable(String),
    Operation {
        op: Operator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    /// Unary minus.
    Negate(Box<Expression>),
    /// `a b c` or `a, b, c`
    List {
        separator: ListSeparator,
        items: Vec<Expression>,
    },
    /// `name(args)`
    Call { name: String, args: Vec<Expression> },
}

impl Expression {
    pub fn new(kind: ExpressionKind, source_info: SourceInfo) -> Self {
        Expression { kind, source_info }
    }

    pub fn literal(value: Value, source_info: SourceInfo) -> Self {
        Self::new(ExpressionKind::Literal(value), source_info)
    }

    pub fn variable(name: impl Into<String>, source_info: SourceInfo) -> Self {
        Self::new(ExpressionKind::Variable(name.into()), source_info)
    }

    pub fn operation(
        op: Operator,
        lhs: Expression,
        rhs: Expression,
        source_info: SourceInfo,
    ) -> Self {
        Self::new(
            ExpressionKind::Operation {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            source_info,
        )
    }

    pub fn negate(operand: Expression, source_info: SourceInfo) -> Self {
        Self::new(ExpressionKind::Negate(Box::new(operand)), source_info)
    }

    pub fn list(separator: ListSeparator, items: Vec<Expression>, source_info: SourceInfo) -> Self {
        Self::new(ExpressionKind::List { separator, items }, source_info)
    }

    pub fn call(name: impl Into<String>, args: Vec<Expression>, source_info: SourceInfo) -> Self {
        Self::new(
            ExpressionKind::Call {
                name: name.into(),
                args,
            },
            source_info,
        )
    }

    fn precedence(&self) -> u8 {
        match &self.kind {
            ExpressionKind::Operation { op, .. } => op.precedence(),
            _ => u8::MAX,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Literal(value) => write!(f, "{}", value),
            ExpressionKind::Variable(name) => f.write_str(name),
            ExpressionKind::Operation { op, lhs, rhs } => {
                let prec = op.precedence();
                if lhs.precedence() < prec {
                    write!(f, "({})", lhs)?;
                } else {
                    write!(f, "{}", lhs)?;
                }
                write!(f, " {} ", op)?;
                // Right operands of equal precedence need parentheses too,
                // since `a - (b - c)` differs from `a - b - c`.
                if rhs.precedence() <= prec {
                    write!(f, "({})", rhs)
                } else {
                    write!(f, "{}", rhs)
                }
            }
            ExpressionKind::Negate(operand) => {
                if operand.precedence() == u8::MAX {
                    write!(f, "-{}", operand)
                } else {
                    write!(f, "-({})", operand)
                }
            }
            ExpressionKind::List { separator, items } => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(separator.as_str())?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            ExpressionKind::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}
