/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for stylesheet evaluation.
//!
//! Every error is fatal to the compilation. An [`EvalError`] records where
//! evaluation failed (the literal text and position of the failing
//! expression or call) and, as it unwinds through mixin expansions, every
//! call site that led there.

use crate::value::Operator;
use less_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use less_source_map::SourceInfo;
use thiserror::Error;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalErrorKind {
    /// A variable reference with no binding in any reachable frame.
    #[error("variable {name} is undefined")]
    UndefinedVariable { name: String },

    /// A mixin call whose name matches nothing in any reachable frame.
    #[error("{path} is undefined")]
    MixinUndefined { path: String },

    /// The name exists but no definition accepts the arguments.
    #[error("No matching definition was found for `{call}`")]
    NoMatchingMixin { call: String },

    #[error("Attempted to divide by zero.")]
    DivideByZero,

    /// Arithmetic on values that do not support it.
    #[error("Cannot apply '{op}' to {lhs} and {rhs}")]
    InvalidOperation {
        op: Operator,
        lhs: String,
        rhs: String,
    },

    /// Two dimensions with different units under strict unit checking.
    #[error("Incompatible units: {lhs} {op} {rhs}")]
    IncompatibleUnits {
        op: Operator,
        lhs: String,
        rhs: String,
    },

    /// A built-in function rejected its arguments.
    #[error("Invalid arguments for function '{function}': {message}")]
    InvalidFunctionArgs { function: String, message: String },

    /// A declaration with no enclosing ruleset.
    #[error("Properties must be inside selector blocks, they cannot be in the root: {property}")]
    DeclarationOutsideRuleset { property: String },

    /// Mixin calls nested deeper than the configured limit.
    #[error("Maximum mixin call depth ({max_depth}) exceeded calling {call}")]
    RecursionLimitExceeded { call: String, max_depth: usize },
}

impl EvalErrorKind {
    /// Stable diagnostic code for this kind of error.
    pub fn code(&self) -> &'static str {
        match self {
            EvalErrorKind::UndefinedVariable { .. } => "L-2-1",
            EvalErrorKind::MixinUndefined { .. } => "L-2-2",
            EvalErrorKind::NoMatchingMixin { .. } => "L-2-3",
            EvalErrorKind::DivideByZero => "L-2-4",
            EvalErrorKind::InvalidOperation { .. } => "L-2-5",
            EvalErrorKind::IncompatibleUnits { .. } => "L-2-6",
            EvalErrorKind::InvalidFunctionArgs { .. } => "L-2-7",
            EvalErrorKind::DeclarationOutsideRuleset { .. } => "L-2-8",
            EvalErrorKind::RecursionLimitExceeded { .. } => "L-2-9",
        }
    }
}

/// A mixin call an error unwound through.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite {
    /// The call as written, e.g. `.mixin(0px)`.
    pub text: String,
    pub source_info: SourceInfo,
}

/// An evaluation failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} (`{text}` at {source_info})")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Literal text of the expression, declaration or call that failed.
    pub text: String,
    /// Position of `text`.
    pub source_info: SourceInfo,
    /// Mixin calls between the failure and the stylesheet, innermost first.
    pub call_stack: Vec<CallSite>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, text: impl Into<String>, source_info: SourceInfo) -> Self {
        EvalError {
            kind,
            text: text.into(),
            source_info,
            call_stack: Vec::new(),
        }
    }

    /// The error message without location information.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// 1-based line of the failing expression.
    pub fn line(&self) -> usize {
        self.source_info.line()
    }

    /// 1-based column of the failing expression.
    pub fn column(&self) -> usize {
        self.source_info.column()
    }

    /// Record that the error unwound through `site`.
    pub fn called_from(mut self, site: CallSite) -> Self {
        self.call_stack.push(site);
        self
    }

    /// The outermost call site: the call in the stylesheet that led to
    /// the failure. `None` when the failure was not inside a mixin.
    pub fn call_site(&self) -> Option<&CallSite> {
        self.call_stack.last()
    }

    /// Convert into a structured diagnostic.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let mut builder = DiagnosticMessageBuilder::error(self.message())
            .with_code(self.kind.code())
            .with_location(self.source_info)
            .problem(format!("Evaluating `{}` failed", self.text));

        for site in &self.call_stack {
            builder = builder.add_info_at(format!("Called from `{}`", site.text), site.source_info);
        }

        builder.build()
    }
}

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;
