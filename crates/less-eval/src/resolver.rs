/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Mixin call resolution.
//!
//! Resolution happens in two steps:
//!
//! 1. **Path lookup.** The first path segment collects every callable with
//!    that name visible from the caller, across all frames. Each further
//!    segment keeps only the rulesets found so far, enters each of them as a
//!    namespace, and collects the matching callables declared directly
//!    inside. Two rulesets with the same selector are both entered.
//!
//! 2. **Overload matching.** Every candidate whose parameter list accepts
//!    the arguments is returned, in lookup order. A ruleset accepts only an
//!    empty argument list. A mixin accepts `N` arguments when it has at most
//!    `N` required parameters and at least `N` parameters in total, and each
//!    pattern parameter equals its argument.

use crate::ast::{Element, MixinCall, Node};
use crate::error::{EvalError, EvalErrorKind, EvalResult};
use crate::eval_context::EvalContext;
use crate::expression::evaluate_expression;
use crate::scope::{Callable, Definition, FrameId};
use crate::value::Value;

/// Find every definition `call` expands to, given its evaluated arguments.
pub fn resolve<'a>(
    ctx: &mut EvalContext<'a>,
    call: &MixinCall,
    args: &[Value],
    frame: FrameId,
) -> EvalResult<Vec<Callable<'a>>> {
    let candidates = lookup_path(ctx, &call.path, frame)?;
    if candidates.is_empty() {
        return Err(EvalError::new(
            EvalErrorKind::MixinUndefined {
                path: call.path_text(),
            },
            call.to_string(),
            call.source_info,
        ));
    }

    let mut matched = Vec::new();
    for candidate in &candidates {
        if accepts(ctx, candidate, args)? {
            matched.push(*candidate);
        }
    }

    tracing::debug!(
        call = %call,
        candidates = candidates.len(),
        matched = matched.len(),
        "Resolved mixin call"
    );

    if matched.is_empty() {
        return Err(EvalError::new(
            EvalErrorKind::NoMatchingMixin {
                call: call.to_string(),
            },
            call.to_string(),
            call.source_info,
        ));
    }
    Ok(matched)
}

fn lookup_path<'a>(
    ctx: &mut EvalContext<'a>,
    path: &[Element],
    frame: FrameId,
) -> EvalResult<Vec<Callable<'a>>> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(Vec::new());
    };

    let mut candidates = ctx.scopes.lookup_mixins(frame, &first.value);
    for segment in rest {
        let namespaces: Vec<Callable<'a>> = candidates
            .into_iter()
            .filter(|c| c.definition.is_ruleset())
            .collect();

        candidates = Vec::new();
        for namespace in namespaces {
            let inner = enter_namespace(ctx, namespace)?;
            candidates.extend(
                ctx.scopes
                    .own_callables(inner)
                    .iter()
                    .filter(|c| c.definition.matches_name(&segment.value))
                    .copied(),
            );
        }

        if candidates.is_empty() {
            break;
        }
    }
    Ok(candidates)
}

/// Build a frame for a namespace ruleset: its definitions are registered
/// and its variables bound in order, as if the block had been entered.
fn enter_namespace<'a>(
    ctx: &mut EvalContext<'a>,
    namespace: Callable<'a>,
) -> EvalResult<FrameId> {
    let children = namespace.definition.children();
    let frame = ctx.scopes.push(namespace.closure);
    ctx.scopes.declare_definitions(frame, children);

    let bound = bind_variables(ctx, children, frame);
    ctx.scopes.pop();
    bound?;

    Ok(frame)
}

fn bind_variables(ctx: &mut EvalContext<'_>, children: &[Node], frame: FrameId) -> EvalResult<()> {
    for child in children {
        if let Node::Variable(variable) = child {
            let value = evaluate_expression(ctx, &variable.value, frame)?;
            ctx.scopes.declare_variable(frame, &variable.name, value);
        }
    }
    Ok(())
}

/// Whether `callable` accepts `args`. Patterns are evaluated in the
/// callable's closure.
fn accepts(ctx: &EvalContext<'_>, callable: &Callable<'_>, args: &[Value]) -> EvalResult<bool> {
    let mixin = match callable.definition {
        Definition::Ruleset(_) => return Ok(args.is_empty()),
        Definition::Mixin(mixin) => mixin,
    };

    if args.len() < mixin.required_arity() || args.len() > mixin.params.len() {
        return Ok(false);
    }

    for (param, arg) in mixin.params.iter().zip(args) {
        if let Some(pattern) = &param.guard {
            let expected = evaluate_expression(ctx, pattern, callable.closure)?;
            if !expected.matches_pattern(arg) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}
