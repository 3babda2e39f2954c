/*
 * errors_test.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error kinds, locations and call-site attribution.
 */

mod common;

use common::*;
use less_eval::ast::{Declaration, MixinDefinition, Node, Parameter, Ruleset, Stylesheet};
use less_eval::{EvalErrorKind, EvalOptions, FunctionRegistry};
use less_source_map::{FileId, SourceContext, SourceInfo};
use pretty_assertions::assert_eq;

const DIVISION_INPUT: &str = "
.mixin(@a: 5px) {
  width: 10px / @a;
}
.error {
  .mixin(0px);
}";

/// The division example with positions taken from `DIVISION_INPUT`.
fn division_stylesheet(ctx: &SourceContext, file: FileId) -> Stylesheet {
    let pos = |line, column, length| {
        ctx.source_info_at(file, line, column, length)
            .unwrap_or_else(|| panic!("no position {line}:{column}"))
    };

    let division = op_at(px(10.0), '/', var_ref("@a"), pos(3, 10, 9));
    let definition = MixinDefinition::new(
        ".mixin",
        vec![Parameter::with_default("@a", px(5.0))],
        vec![Node::Declaration(Declaration::new("width", division, pos(3, 3, 17)))],
        pos(2, 1, 15),
    );
    let error_rule = Ruleset::new(
        vec![sel(".error")],
        vec![call_at(".mixin", vec![px(0.0)], pos(6, 3, 11))],
        pos(5, 1, 6),
    );
    Stylesheet::new(vec![Node::MixinDefinition(definition), Node::Ruleset(error_rule)])
}

#[test]
fn test_division_fault_reports_inner_and_outer_locations() {
    let mut ctx = SourceContext::new();
    let file = ctx.add_file("division.less".into(), Some(DIVISION_INPUT.into()));
    let sheet = division_stylesheet(&ctx, file);

    let err = sheet.evaluate().unwrap_err();

    assert_eq!(err.kind, EvalErrorKind::DivideByZero);
    assert_eq!(err.message(), "Attempted to divide by zero.");
    assert_eq!(err.text, "10px / @a");
    assert_eq!((err.line(), err.column()), (3, 10));
    assert_eq!(ctx.line_text(&err.source_info), Some("  width: 10px / @a;"));
    assert_eq!(ctx.snippet(&err.source_info), Some("10px / @a"));

    let site = err.call_site().expect("error inside a mixin has a call site");
    assert_eq!(site.text, ".mixin(0px)");
    assert_eq!((site.source_info.line(), site.source_info.column()), (6, 3));
    assert_eq!(ctx.line_text(&site.source_info), Some("  .mixin(0px);"));
}

#[test]
fn test_division_fault_diagnostic() {
    let mut ctx = SourceContext::new();
    let file = ctx.add_file("division.less".into(), Some(DIVISION_INPUT.into()));
    let err = division_stylesheet(&ctx, file).evaluate().unwrap_err();

    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.code.as_deref(), Some("L-2-4"));

    let text = diagnostic.to_text(Some(&ctx));
    assert!(text.contains("division.less"), "missing file name:\n{text}");
    assert!(text.contains("Error [L-2-4]: Attempted to divide by zero. (at 3:10)"));
    assert!(text.contains("Called from `.mixin(0px)` (at 6:3)"));
}

#[test]
fn test_too_many_arguments() {
    let at = SourceInfo::at_line(FileId(0), 3, 10, 16);
    let nodes = vec![
        mixin(
            ".mixin",
            vec![param_default("@a", num(5.0))],
            vec![decl("width", op(var_ref("@a"), '*', num(5.0)))],
        ),
        rule(".class", vec![call_at(".mixin", vec![num(1.0), num(2.0), num(3.0)], at)]),
    ];

    let err = compile_err(nodes);
    assert_eq!(err.message(), "No matching definition was found for `.mixin(1, 2, 3)`");
    assert_eq!(err.text, ".mixin(1, 2, 3)");
    assert_eq!((err.line(), err.column()), (3, 10));
    assert!(err.call_site().is_none());
}

#[test]
fn test_no_pattern_matches() {
    let nodes = vec![
        mixin(".mixout", vec![pattern(quoted("left"))], vec![decl("left", num(1.0))]),
        mixin(".mixout", vec![pattern(quoted("right"))], vec![decl("right", num(1.0))]),
        rule(".none", vec![call(".mixout", vec![quoted("top")])]),
    ];
    let err = compile_err(nodes);
    assert_eq!(err.message(), "No matching definition was found for `.mixout('top')`");
}

#[test]
fn test_keyword_does_not_match_string_pattern() {
    let nodes = vec![
        mixin(".mixout", vec![pattern(quoted("left"))], vec![decl("left", num(1.0))]),
        rule(".none", vec![call(".mixout", vec![kw("left")])]),
    ];
    assert!(matches!(
        compile_err(nodes).kind,
        EvalErrorKind::NoMatchingMixin { .. }
    ));
}

#[test]
fn test_undefined_mixin() {
    let at = SourceInfo::at_line(FileId(0), 1, 9, 9);
    let err = compile_err(vec![rule(".none", vec![call_at(".mixin", vec![], at)])]);
    assert_eq!(err.message(), ".mixin is undefined");
    assert_eq!(err.text, ".mixin()");
    assert_eq!((err.line(), err.column()), (1, 9));
}

#[test]
fn test_undefined_namespace_member() {
    let nodes = vec![
        rule("#ns", vec![rule(".a", vec![decl("color", kw("red"))])]),
        rule(".x", vec![bare_call("#ns > .b")]),
    ];
    let err = compile_err(nodes);
    assert_eq!(err.message(), "#ns > .b is undefined");
}

#[test]
fn test_undefined_variable_inside_mixin() {
    let nodes = vec![
        mixin(".m", vec![], vec![decl("width", var_ref("@nope"))]),
        rule(".a", vec![call(".m", vec![])]),
    ];
    let err = compile_err(nodes);
    assert_eq!(err.message(), "variable @nope is undefined");
    assert_eq!(err.call_site().map(|s| s.text.as_str()), Some(".m()"));
}

#[test]
fn test_call_stack_is_innermost_first() {
    let nodes = vec![
        mixin(".inner", vec![], vec![decl("width", op(px(1.0), '/', num(0.0)))]),
        mixin(".outer", vec![], vec![bare_call(".inner")]),
        rule(".a", vec![call(".outer", vec![])]),
    ];
    let err = compile_err(nodes);
    let stack: Vec<_> = err.call_stack.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(stack, vec![".inner", ".outer()"]);
    assert_eq!(err.call_site().map(|s| s.text.as_str()), Some(".outer()"));
}

#[test]
fn test_direct_recursion_is_bounded() {
    let nodes = vec![
        mixin(".loop", vec![], vec![decl("a", num(1.0)), call(".loop", vec![])]),
        rule(".a", vec![call(".loop", vec![])]),
    ];
    let err = compile_err(nodes);
    assert_eq!(
        err.kind,
        EvalErrorKind::RecursionLimitExceeded {
            call: ".loop".into(),
            max_depth: 64
        }
    );
    assert_eq!(err.call_stack.len(), 64);
}

#[test]
fn test_mutual_recursion_respects_configured_limit() {
    let nodes = vec![
        mixin(".ping", vec![], vec![bare_call(".pong")]),
        mixin(".pong", vec![], vec![bare_call(".ping")]),
        rule(".a", vec![bare_call(".ping")]),
    ];
    let options = EvalOptions::new().with_max_call_depth(5);
    let functions = FunctionRegistry::with_builtins();
    let err = Stylesheet::new(nodes)
        .evaluate_with(&options, &functions)
        .unwrap_err();

    assert!(matches!(
        err.kind,
        EvalErrorKind::RecursionLimitExceeded { max_depth: 5, .. }
    ));
    assert_eq!(err.call_stack.len(), 5);
    assert_eq!(err.call_site().map(|s| s.text.as_str()), Some(".ping"));
}

#[test]
fn test_declaration_at_root() {
    let err = compile_err(vec![decl("color", kw("red"))]);
    assert_eq!(
        err.kind,
        EvalErrorKind::DeclarationOutsideRuleset {
            property: "color".into()
        }
    );
}

#[test]
fn test_mixin_called_at_root_cannot_emit_declarations() {
    let nodes = vec![
        mixin(".m", vec![], vec![decl("color", kw("red"))]),
        call(".m", vec![]),
    ];
    let err = compile_err(nodes);
    assert!(matches!(
        err.kind,
        EvalErrorKind::DeclarationOutsideRuleset { .. }
    ));
    assert_eq!(err.call_site().map(|s| s.text.as_str()), Some(".m()"));
}

#[test]
fn test_invalid_operation() {
    let nodes = vec![rule(".a", vec![decl("width", op(kw("auto"), '+', px(1.0)))])];
    let err = compile_err(nodes);
    assert_eq!(err.message(), "Cannot apply '+' to keyword and dimension");
    assert_eq!(err.text, "auto + 1px");
}

#[test]
fn test_first_error_wins() {
    let nodes = vec![
        rule(".a", vec![decl("width", var_ref("@first"))]),
        rule(".b", vec![decl("width", var_ref("@second"))]),
    ];
    let err = compile_err(nodes);
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "@first".into()
        }
    );
}
