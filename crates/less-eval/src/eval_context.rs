/*
 * eval_context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluation options and per-compilation state.
//!
//! [`EvalContext`] is threaded through every evaluation function. It owns
//! the scope arena and the mixin call depth counter, and borrows the
//! function table and options from the caller. A fresh context is built for
//! every compilation, so nothing leaks between two stylesheets.

use crate::ast::MixinCall;
use crate::error::{EvalError, EvalErrorKind, EvalResult};
use crate::functions::FunctionRegistry;
use crate::scope::ScopeChain;
use serde::{Deserialize, Serialize};

/// Options controlling evaluation.
///
/// Deserializes from kebab-case keys; missing keys take their defaults:
///
/// ```
/// use less_eval::EvalOptions;
///
/// let options: EvalOptions = serde_json::from_str(r#"{"strict-units": true}"#).unwrap();
/// assert!(options.strict_units);
/// assert_eq!(options.max_call_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EvalOptions {
    /// Maximum nesting of mixin calls before evaluation fails.
    pub max_call_depth: usize,

    /// Reject arithmetic between dimensions with different units instead of
    /// keeping the left-hand unit.
    pub strict_units: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            max_call_depth: 64,
            strict_units: false,
        }
    }
}

impl EvalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum mixin call depth.
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Enable or disable strict unit checking.
    pub fn with_strict_units(mut self, strict: bool) -> Self {
        self.strict_units = strict;
        self
    }
}

/// State for one compilation.
pub struct EvalContext<'a> {
    /// Frames for every scope created so far.
    pub scopes: ScopeChain<'a>,

    /// Functions callable from expressions.
    pub functions: &'a FunctionRegistry,

    pub options: &'a EvalOptions,

    /// Number of mixin expansions currently in progress.
    pub call_depth: usize,
}

impl<'a> EvalContext<'a> {
    pub fn new(functions: &'a FunctionRegistry, options: &'a EvalOptions) -> Self {
        Self {
            scopes: ScopeChain::new(),
            functions,
            options,
            call_depth: 0,
        }
    }

    /// Enter a mixin expansion, failing if the depth limit is reached.
    pub fn enter_call(&mut self, call: &MixinCall) -> EvalResult<()> {
        if self.call_depth >= self.options.max_call_depth {
            return Err(EvalError::new(
                EvalErrorKind::RecursionLimitExceeded {
                    call: call.path_text(),
                    max_depth: self.options.max_call_depth,
                },
                call.to_string(),
                call.source_info,
            ));
        }
        self.call_depth += 1;
        Ok(())
    }

    /// Leave a mixin expansion started with [`enter_call`](Self::enter_call).
    pub fn exit_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }
}
