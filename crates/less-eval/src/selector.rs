/*
 * selector.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Selector composition for nested rulesets.

use crate::ast::Selector;

/// Compose one child selector against every selector of the parent context.
///
/// The child's elements are appended to the parent's, keeping the child's
/// leading combinator: a descendant child is joined with a space, `> .b`
/// keeps its `>`, and an attached child (`&:hover`) is joined with nothing.
/// With no parent context the child is used unchanged.
pub fn compose(parent_context: &[Selector], child: &Selector) -> Vec<Selector> {
    if parent_context.is_empty() {
        return vec![child.clone()];
    }
    parent_context
        .iter()
        .map(|parent| {
            let mut elements = parent.elements.clone();
            elements.extend(child.elements.iter().cloned());
            Selector::new(elements, child.source_info)
        })
        .collect()
}

/// Compose a comma-separated child selector list against the parent
/// context: the full cross product, parent-major.
pub fn compose_list(parent_context: &[Selector], children: &[Selector]) -> Vec<Selector> {
    if parent_context.is_empty() {
        return children.to_vec();
    }
    parent_context
        .iter()
        .flat_map(|parent| {
            children
                .iter()
                .flat_map(move |child| compose(std::slice::from_ref(parent), child))
        })
        .collect()
}
