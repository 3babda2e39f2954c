/*
 * scope.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Lexical scope frames.
//!
//! Frames live in an arena for the whole compilation and are addressed by
//! [`FrameId`]. Each frame points at its lexical parent. A mixin or ruleset
//! registered in a frame remembers that frame as its closure, so a mixin
//! body always resolves names against the place it was defined, never the
//! place it was called from.
//!
//! Frames are never freed while a compilation runs: a definition exported
//! from a mixin body keeps its body frame reachable after the call returns.

use crate::ast::{MixinDefinition, Node, Ruleset};
use crate::value::Value;
use less_source_map::SourceInfo;
use std::collections::HashMap;

/// Index of a frame in a [`ScopeChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

/// Something a mixin call can expand.
#[derive(Debug, Clone, Copy)]
pub enum Definition<'a> {
    /// A plain ruleset, callable with no arguments.
    Ruleset(&'a Ruleset),
    Mixin(&'a MixinDefinition),
}

impl<'a> Definition<'a> {
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            Definition::Ruleset(ruleset) => ruleset.matches_name(name),
            Definition::Mixin(mixin) => mixin.name == name,
        }
    }

    pub fn children(&self) -> &'a [Node] {
        match self {
            Definition::Ruleset(ruleset) => &ruleset.children,
            Definition::Mixin(mixin) => &mixin.children,
        }
    }

    pub fn is_ruleset(&self) -> bool {
        matches!(self, Definition::Ruleset(_))
    }

    /// Whether both refer to the same syntax node.
    pub fn is_same(&self, other: &Definition<'_>) -> bool {
        match (self, other) {
            (Definition::Ruleset(a), Definition::Ruleset(b)) => std::ptr::eq(*a, *b),
            (Definition::Mixin(a), Definition::Mixin(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }

    pub fn source_info(&self) -> SourceInfo {
        match self {
            Definition::Ruleset(ruleset) => ruleset.source_info,
            Definition::Mixin(mixin) => mixin.source_info,
        }
    }
}

/// A definition together with the frame it closes over.
#[derive(Debug, Clone, Copy)]
pub struct Callable<'a> {
    pub definition: Definition<'a>,
    pub closure: FrameId,
}

#[derive(Debug, Default)]
struct Frame<'a> {
    parent: Option<FrameId>,
    variables: HashMap<String, Value>,
    callables: Vec<Callable<'a>>,
}

/// The frame arena plus the stack of frames currently being evaluated.
#[derive(Debug)]
pub struct ScopeChain<'a> {
    frames: Vec<Frame<'a>>,
    active: Vec<FrameId>,
}

impl Default for ScopeChain<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ScopeChain<'a> {
    /// A chain holding only the root frame.
    pub fn new() -> Self {
        ScopeChain {
            frames: vec![Frame::default()],
            active: vec![FrameId(0)],
        }
    }

    /// The stylesheet-level frame.
    pub fn root(&self) -> FrameId {
        FrameId(0)
    }

    /// Create a frame whose lexical parent is `parent` and make it active.
    pub fn push(&mut self, parent: FrameId) -> FrameId {
        let id = FrameId(self.frames.len());
        self.frames.push(Frame {
            parent: Some(parent),
            ..Frame::default()
        });
        self.active.push(id);
        id
    }

    /// Deactivate the most recently pushed frame. The frame itself stays in
    /// the arena. The root frame is never popped.
    pub fn pop(&mut self) -> Option<FrameId> {
        if self.active.len() > 1 {
            self.active.pop()
        } else {
            None
        }
    }

    /// Number of active frames, the root included.
    pub fn depth(&self) -> usize {
        self.active.len()
    }

    /// Total number of frames ever created.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn parent(&self, frame: FrameId) -> Option<FrameId> {
        self.frames.get(frame.0).and_then(|f| f.parent)
    }

    /// `frame` and then each of its ancestors.
    fn ancestors(&self, frame: FrameId) -> impl Iterator<Item = FrameId> + '_ {
        std::iter::successors(Some(frame), move |id| self.parent(*id))
    }

    /// Bind a variable in `frame`, replacing any earlier binding there.
    pub fn declare_variable(&mut self, frame: FrameId, name: impl Into<String>, value: Value) {
        if let Some(f) = self.frames.get_mut(frame.0) {
            f.variables.insert(name.into(), value);
        }
    }

    /// Register a callable in `frame`.
    pub fn declare_callable(&mut self, frame: FrameId, callable: Callable<'a>) {
        if let Some(f) = self.frames.get_mut(frame.0) {
            f.callables.push(callable);
        }
    }

    /// Register every ruleset and mixin definition among `nodes` in `frame`,
    /// closed over `frame`. Done before a block's statements run so that a
    /// mixin can be called ahead of its definition.
    pub fn declare_definitions(&mut self, frame: FrameId, nodes: &'a [Node]) {
        for node in nodes {
            let definition = match node {
                Node::Ruleset(ruleset) => Definition::Ruleset(ruleset),
                Node::MixinDefinition(mixin) => Definition::Mixin(mixin),
                _ => continue,
            };
            self.declare_callable(
                frame,
                Callable {
                    definition,
                    closure: frame,
                },
            );
        }
    }

    /// Copy the callables registered directly in `from` into `to`, keeping
    /// their closures. Exporting a definition that an earlier expansion
    /// already exported into `to` replaces that entry, so repeated calls
    /// leave one callable per definition.
    pub fn export_callables(&mut self, from: FrameId, to: FrameId) {
        let exported = self.own_callables(from).to_vec();
        let Some(target) = self.frames.get_mut(to.0) else {
            return;
        };
        for callable in exported {
            let previous = target.callables.iter_mut().find(|existing| {
                existing.closure != to && existing.definition.is_same(&callable.definition)
            });
            match previous {
                Some(existing) => *existing = callable,
                None => target.callables.push(callable),
            }
        }
    }

    /// Innermost binding of `name` visible from `frame`.
    pub fn lookup_variable(&self, frame: FrameId, name: &str) -> Option<&Value> {
        self.ancestors(frame)
            .find_map(|id| self.frames.get(id.0).and_then(|f| f.variables.get(name)))
    }

    /// Every callable named `name` visible from `frame`, across all frames,
    /// in source order. Definitions sharing a position (trees built without
    /// positions) keep lookup order: innermost frame first, then declaration
    /// order within a frame.
    pub fn lookup_mixins(&self, frame: FrameId, name: &str) -> Vec<Callable<'a>> {
        let mut found: Vec<Callable<'a>> = self
            .ancestors(frame)
            .flat_map(|id| self.own_callables(id).iter())
            .filter(|c| c.definition.matches_name(name))
            .copied()
            .collect();
        found.sort_by_key(|c| {
            let info = c.definition.source_info();
            (info.file_id.0, info.range.start)
        });
        found
    }

    /// Callables registered directly in `frame`.
    pub fn own_callables(&self, frame: FrameId) -> &[Callable<'a>] {
        self.frames
            .get(frame.0)
            .map(|f| f.callables.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Element, MixinDefinition, Selector};
    use less_source_map::FileId;
    use pretty_assertions::assert_eq;

    fn si() -> SourceInfo {
        SourceInfo::default()
    }

    fn ruleset(name: &str) -> Ruleset {
        Ruleset::new(
            vec![Selector::new(vec![Element::descendant(name)], si())],
            vec![],
            si(),
        )
    }

    #[test]
    fn test_variable_shadowing() {
        let mut scopes = ScopeChain::new();
        let root = scopes.root();
        scopes.declare_variable(root, "@a", Value::Number(1.0));
        scopes.declare_variable(root, "@b", Value::Number(2.0));

        let inner = scopes.push(root);
        scopes.declare_variable(inner, "@a", Value::Number(10.0));

        assert_eq!(scopes.lookup_variable(inner, "@a"), Some(&Value::Number(10.0)));
        assert_eq!(scopes.lookup_variable(inner, "@b"), Some(&Value::Number(2.0)));
        assert_eq!(scopes.lookup_variable(root, "@a"), Some(&Value::Number(1.0)));
        assert_eq!(scopes.lookup_variable(inner, "@c"), None);
    }

    #[test]
    fn test_redeclaration_replaces_binding() {
        let mut scopes = ScopeChain::new();
        let root = scopes.root();
        scopes.declare_variable(root, "@a", Value::Number(1.0));
        scopes.declare_variable(root, "@a", Value::Number(2.0));
        assert_eq!(scopes.lookup_variable(root, "@a"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_mixin_lookup_collects_all_frames() {
        let outer = ruleset(".mixin");
        let inner = ruleset(".mixin");
        let other = ruleset(".other");
        let outer_nodes = vec![Node::Ruleset(outer), Node::Ruleset(other)];
        let inner_nodes = vec![Node::Ruleset(inner)];

        let mut scopes = ScopeChain::new();
        let root = scopes.root();
        scopes.declare_definitions(root, &outer_nodes);
        let child = scopes.push(root);
        scopes.declare_definitions(child, &inner_nodes);

        let found = scopes.lookup_mixins(child, ".mixin");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].closure, child);
        assert_eq!(found[1].closure, root);

        assert_eq!(scopes.lookup_mixins(root, ".mixin").len(), 1);
        assert!(scopes.lookup_mixins(child, ".missing").is_empty());
    }

    #[test]
    fn test_push_pop_keeps_frames() {
        let mut scopes = ScopeChain::new();
        let root = scopes.root();
        let a = scopes.push(root);
        let b = scopes.push(a);
        assert_eq!(scopes.depth(), 3);

        assert_eq!(scopes.pop(), Some(b));
        assert_eq!(scopes.pop(), Some(a));
        assert_eq!(scopes.pop(), None);
        assert_eq!(scopes.depth(), 1);

        // Popped frames remain addressable.
        assert_eq!(scopes.frame_count(), 3);
        assert_eq!(scopes.parent(b), Some(a));
    }

    #[test]
    fn test_export_callables() {
        let nodes = vec![Node::Ruleset(ruleset(".inner"))];
        let mut scopes = ScopeChain::new();
        let root = scopes.root();
        let body = scopes.push(root);
        scopes.declare_definitions(body, &nodes);
        scopes.pop();

        let caller = scopes.push(root);
        assert!(scopes.lookup_mixins(caller, ".inner").is_empty());
        scopes.export_callables(body, caller);

        let found = scopes.lookup_mixins(caller, ".inner");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].closure, body);
    }

    #[test]
    fn test_mixin_lookup_follows_source_order() {
        let at = |line| SourceInfo::at_line(FileId(0), line, 1, 4);
        let outer = vec![Node::MixinDefinition(MixinDefinition::new(
            ".m",
            vec![],
            vec![],
            at(1),
        ))];
        let inner = vec![Node::MixinDefinition(MixinDefinition::new(
            ".m",
            vec![],
            vec![],
            at(3),
        ))];

        let mut scopes = ScopeChain::new();
        let root = scopes.root();
        scopes.declare_definitions(root, &outer);
        let child = scopes.push(root);
        scopes.declare_definitions(child, &inner);

        let found = scopes.lookup_mixins(child, ".m");
        let lines: Vec<_> = found.iter().map(|c| c.definition.source_info().line()).collect();
        assert_eq!(lines, vec![1, 3]);
        assert_eq!(found[0].closure, root);
    }

    #[test]
    fn test_repeated_export_keeps_one_entry() {
        let nodes = vec![Node::Ruleset(ruleset(".inner"))];
        let mut scopes = ScopeChain::new();
        let root = scopes.root();
        let caller = scopes.push(root);

        let first = scopes.push(root);
        scopes.declare_definitions(first, &nodes);
        scopes.pop();
        scopes.export_callables(first, caller);

        let second = scopes.push(root);
        scopes.declare_definitions(second, &nodes);
        scopes.pop();
        scopes.export_callables(second, caller);

        let found = scopes.lookup_mixins(caller, ".inner");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].closure, second);
    }

    #[test]
    fn test_variable_and_mixin_share_a_name() {
        let nodes = vec![Node::Ruleset(ruleset(".m"))];
        let mut scopes = ScopeChain::new();
        let root = scopes.root();
        scopes.declare_definitions(root, &nodes);
        scopes.declare_variable(root, ".m", Value::Number(1.0));

        assert_eq!(scopes.lookup_variable(root, ".m"), Some(&Value::Number(1.0)));
        assert_eq!(scopes.lookup_mixins(root, ".m").len(), 1);
    }
}
