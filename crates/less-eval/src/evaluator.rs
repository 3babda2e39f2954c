/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Stylesheet evaluation engine.
//!
//! Evaluation is a depth-first walk that turns the syntax tree into a flat
//! list of [`OutputRule`]s. Each block runs in three phases:
//!
//! 1. A frame is pushed whose parent is the block's lexical parent.
//! 2. The block's rulesets and mixin definitions are registered in it.
//! 3. Statements run in source order: variables bind, declarations append
//!    to the rule being built, mixin calls inline their bodies at the call
//!    site, and nested rulesets produce further rules.
//!
//! A ruleset yields one rule for its own declarations (when it has any)
//! followed by the rules of its nested rulesets, in pre-order.

use crate::ast::{MixinCall, Node, Ruleset, Selector, Stylesheet};
use crate::error::{CallSite, EvalError, EvalErrorKind, EvalResult};
use crate::eval_context::{EvalContext, EvalOptions};
use crate::expression::evaluate_expression;
use crate::functions::FunctionRegistry;
use crate::output::{OutputDeclaration, OutputRule};
use crate::resolver;
use crate::scope::{Callable, Definition, FrameId};
use crate::selector;
use crate::value::{ListSeparator, Value};

/// Declarations and nested rules collected for one selector context.
#[derive(Debug, Default)]
struct RuleBuilder {
    declarations: Vec<OutputDeclaration>,
    nested: Vec<OutputRule>,
}

impl RuleBuilder {
    fn finish(self, selectors: &[Selector]) -> Vec<OutputRule> {
        let mut rules = Vec::with_capacity(self.nested.len() + 1);
        if !self.declarations.is_empty() {
            rules.push(OutputRule {
                selectors: selectors.iter().map(ToString::to_string).collect(),
                declarations: self.declarations,
            });
        }
        rules.extend(self.nested);
        rules
    }
}

impl Stylesheet {
    /// Evaluate with default options and the built-in functions.
    pub fn evaluate(&self) -> EvalResult<Vec<OutputRule>> {
        let functions = FunctionRegistry::with_builtins();
        evaluate(self, &EvalOptions::default(), &functions)
    }

    /// Evaluate with the given options and function table.
    pub fn evaluate_with(
        &self,
        options: &EvalOptions,
        functions: &FunctionRegistry,
    ) -> EvalResult<Vec<OutputRule>> {
        evaluate(self, options, functions)
    }
}

/// Evaluate a stylesheet into output rules.
///
/// Every call builds fresh scope state, so evaluating the same tree twice
/// yields identical results.
pub fn evaluate(
    stylesheet: &Stylesheet,
    options: &EvalOptions,
    functions: &FunctionRegistry,
) -> EvalResult<Vec<OutputRule>> {
    let mut ctx = EvalContext::new(functions, options);
    let root = ctx.scopes.root();
    ctx.scopes.declare_definitions(root, &stylesheet.nodes);

    let mut builder = RuleBuilder::default();
    evaluate_body(&mut ctx, &stylesheet.nodes, &[], root, &mut builder)?;

    tracing::debug!(
        rules = builder.nested.len(),
        frames = ctx.scopes.frame_count(),
        "Evaluated stylesheet"
    );
    Ok(builder.nested)
}

/// Evaluate a nested or top-level ruleset under `context`.
pub fn evaluate_ruleset<'a>(
    ctx: &mut EvalContext<'a>,
    ruleset: &'a Ruleset,
    context: &[Selector],
    parent: FrameId,
) -> EvalResult<Vec<OutputRule>> {
    let selectors = selector::compose_list(context, &ruleset.selectors);
    tracing::trace!(
        selector = %ruleset.selectors.first().map(ToString::to_string).unwrap_or_default(),
        depth = ctx.scopes.depth(),
        "Evaluating ruleset"
    );

    let frame = ctx.scopes.push(parent);
    ctx.scopes.declare_definitions(frame, &ruleset.children);

    let mut builder = RuleBuilder::default();
    let result = evaluate_body(ctx, &ruleset.children, &selectors, frame, &mut builder);
    ctx.scopes.pop();
    result?;

    Ok(builder.finish(&selectors))
}

/// Run the statements of a block. Definitions must already be registered
/// in `frame`.
fn evaluate_body<'a>(
    ctx: &mut EvalContext<'a>,
    children: &'a [Node],
    context: &[Selector],
    frame: FrameId,
    out: &mut RuleBuilder,
) -> EvalResult<()> {
    for child in children {
        match child {
            Node::Variable(variable) => {
                let value = evaluate_expression(ctx, &variable.value, frame)?;
                ctx.scopes.declare_variable(frame, &variable.name, value);
            }

            Node::Declaration(declaration) => {
                if context.is_empty() {
                    return Err(EvalError::new(
                        EvalErrorKind::DeclarationOutsideRuleset {
                            property: declaration.property.clone(),
                        },
                        declaration.property.clone(),
                        declaration.source_info,
                    ));
                }
                let value = evaluate_expression(ctx, &declaration.value, frame)?;
                out.declarations.push(OutputDeclaration::new(
                    declaration.property.clone(),
                    value,
                    declaration.important,
                ));
            }

            Node::MixinCall(call) => execute_call(ctx, call, context, frame, out)?,

            Node::Ruleset(ruleset) => {
                let rules = evaluate_ruleset(ctx, ruleset, context, frame)?;
                out.nested.extend(rules);
            }

            // Registered when the block was entered; never emitted.
            Node::MixinDefinition(_) => {}
        }
    }
    Ok(())
}

/// Expand a mixin call in place.
fn execute_call<'a>(
    ctx: &mut EvalContext<'a>,
    call: &'a MixinCall,
    context: &[Selector],
    frame: FrameId,
    out: &mut RuleBuilder,
) -> EvalResult<()> {
    let args = call
        .args
        .iter()
        .map(|arg| evaluate_expression(ctx, arg, frame))
        .collect::<EvalResult<Vec<_>>>()?;

    let matched = resolver::resolve(ctx, call, &args, frame)?;

    ctx.enter_call(call)?;
    let result = matched
        .into_iter()
        .try_for_each(|callable| expand(ctx, call, callable, &args, context, frame, out));
    ctx.exit_call();
    result
}

/// Expand one matched definition into `out`, then make the definitions
/// its body declared callable from the caller's frame.
fn expand<'a>(
    ctx: &mut EvalContext<'a>,
    call: &MixinCall,
    callable: Callable<'a>,
    args: &[Value],
    context: &[Selector],
    caller: FrameId,
    out: &mut RuleBuilder,
) -> EvalResult<()> {
    tracing::trace!(
        call = %call,
        definition = %callable.definition.source_info(),
        depth = ctx.call_depth,
        "Expanding mixin"
    );
    let body = ctx.scopes.push(callable.closure);
    let result = expand_body(ctx, callable.definition, args, context, body, out);
    ctx.scopes.pop();

    result.map_err(|err| {
        err.called_from(CallSite {
            text: call.to_string(),
            source_info: call.source_info,
        })
    })?;

    ctx.scopes.export_callables(body, caller);
    Ok(())
}

fn expand_body<'a>(
    ctx: &mut EvalContext<'a>,
    definition: Definition<'a>,
    args: &[Value],
    context: &[Selector],
    body: FrameId,
    out: &mut RuleBuilder,
) -> EvalResult<()> {
    if let Definition::Mixin(mixin) = definition {
        let mut bound = Vec::with_capacity(mixin.params.len());
        for (index, param) in mixin.params.iter().enumerate() {
            // Defaults see earlier parameters and then the closure.
            let value = match (args.get(index), &param.default) {
                (Some(arg), _) => arg.clone(),
                (None, Some(default)) => evaluate_expression(ctx, default, body)?,
                (None, None) => continue,
            };
            if let Some(name) = &param.name {
                ctx.scopes.declare_variable(body, name, value.clone());
            }
            bound.push(value);
        }
        ctx.scopes
            .declare_variable(body, "@arguments", Value::list(ListSeparator::Space, bound));
    }

    let children = definition.children();
    ctx.scopes.declare_definitions(body, children);
    evaluate_body(ctx, children, context, body, out)
}
