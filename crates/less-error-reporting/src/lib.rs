//! Diagnostic messages for stylesheet compilation errors.
//!
//! Errors raised while evaluating a stylesheet carry one primary location
//! (where evaluation failed) and, when the failure happened inside a mixin
//! body, the chain of call sites that led there. This crate gives those
//! errors a uniform shape:
//!
//! - [`DiagnosticMessage`]: title, code, problem statement, details, hints
//! - [`DetailItem`]: a bullet, optionally with its own source location
//! - [`DiagnosticMessageBuilder`]: tidyverse-style construction
//!
//! Rendering is either plain text (with an ariadne source snippet when a
//! [`less_source_map::SourceContext`] is supplied) or JSON.
//!
//! # Example
//!
//! ```
//! use less_error_reporting::DiagnosticMessageBuilder;
//!
//! let msg = DiagnosticMessageBuilder::error("Attempted to divide by zero.")
//!     .with_code("L-2-4")
//!     .problem("Evaluating `10px / @a` failed")
//!     .add_info("Called from `.mixin(0px)`")
//!     .build();
//!
//! let text = msg.to_text(None);
//! assert!(text.contains("Attempted to divide by zero."));
//! ```

pub mod builder;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
