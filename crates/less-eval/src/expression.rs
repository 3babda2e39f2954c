/*
 * expression.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Expression evaluation.

use crate::ast::{Expression, ExpressionKind};
use crate::error::{EvalError, EvalErrorKind, EvalResult};
use crate::eval_context::EvalContext;
use crate::scope::FrameId;
use crate::value::Value;

/// Evaluate `expr` against the scope visible from `frame`.
///
/// Failures carry the text and position of the innermost sub-expression
/// that failed, so a division by zero inside `width: 1px + 10px / @a`
/// points at `10px / @a`.
pub fn evaluate_expression(
    ctx: &EvalContext<'_>,
    expr: &Expression,
    frame: FrameId,
) -> EvalResult<Value> {
    match &expr.kind {
        ExpressionKind::Literal(value) => Ok(value.clone()),

        ExpressionKind::Variable(name) => ctx
            .scopes
            .lookup_variable(frame, name)
            .cloned()
            .ok_or_else(|| {
                EvalError::new(
                    EvalErrorKind::UndefinedVariable { name: name.clone() },
                    name.clone(),
                    expr.source_info,
                )
            }),

        ExpressionKind::Operation { op, lhs, rhs } => {
            let left = evaluate_expression(ctx, lhs, frame)?;
            let right = evaluate_expression(ctx, rhs, frame)?;
            left.operate(*op, &right, ctx.options.strict_units)
                .map_err(|kind| EvalError::new(kind, expr.to_string(), expr.source_info))
        }

        ExpressionKind::Negate(operand) => evaluate_expression(ctx, operand, frame)?
            .negate()
            .map_err(|kind| EvalError::new(kind, expr.to_string(), expr.source_info)),

        ExpressionKind::List { separator, items } => {
            let items = items
                .iter()
                .map(|item| evaluate_expression(ctx, item, frame))
                .collect::<EvalResult<Vec<_>>>()?;
            Ok(Value::list(*separator, items))
        }

        ExpressionKind::Call { name, args } => {
            let args = args
                .iter()
                .map(|arg| evaluate_expression(ctx, arg, frame))
                .collect::<EvalResult<Vec<_>>>()?;

            match ctx.functions.get(name) {
                Some(function) => function(&args).map_err(|message| {
                    EvalError::new(
                        EvalErrorKind::InvalidFunctionArgs {
                            function: name.clone(),
                            message,
                        },
                        expr.to_string(),
                        expr.source_info,
                    )
                }),
                None => {
                    tracing::trace!(function = %name, "Passing unknown function through");
                    let args: Vec<String> = args.iter().map(Value::to_string).collect();
                    Ok(Value::Keyword(format!("{}({})", name, args.join(", "))))
                }
            }
        }
    }
}
