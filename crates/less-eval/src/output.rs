/*
 * output.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Evaluated rules handed to the renderer.

use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// A resolved `property: value` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDeclaration {
    pub property: String,
    pub value: Value,
    pub important: bool,
}

impl OutputDeclaration {
    pub fn new(property: impl Into<String>, value: Value, important: bool) -> Self {
        OutputDeclaration {
            property: property.into(),
            value,
            important,
        }
    }
}

impl fmt::Display for OutputDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// A fully composed selector list with its declarations, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRule {
    pub selectors: Vec<String>,
    pub declarations: Vec<OutputDeclaration>,
}

impl fmt::Display for OutputRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.selectors.join(",\n"))?;
        for declaration in &self.declarations {
            writeln!(f, "  {};", declaration)?;
        }
        f.write_str("}")
    }
}

/// Render rules as plain CSS, one blank line between rules.
pub fn render_css(rules: &[OutputRule]) -> String {
    let mut css = rules
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n");
    if !css.is_empty() {
        css.push('\n');
    }
    css
}
