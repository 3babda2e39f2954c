//! Source positions for stylesheet syntax trees.
//!
//! The parser that feeds the evaluation engine attaches a [`SourceInfo`] to
//! every node and sub-expression. The engine never reads source text itself;
//! it only carries these positions into its errors. A reporting layer that
//! owns a [`SourceContext`] can then turn them back into line text and
//! highlighted snippets.
//!
//! # Example
//!
//! ```rust
//! use less_source_map::*;
//!
//! let mut ctx = SourceContext::new();
//! let file_id = ctx.add_file("main.less".into(), Some(".a {\n  width: 1px;\n}".into()));
//!
//! let info = ctx.source_info_at(file_id, 2, 3, 5).unwrap();
//! assert_eq!(info.line(), 2);
//! assert_eq!(info.column(), 3);
//! assert_eq!(ctx.line_text(&info), Some("  width: 1px;"));
//! ```

pub mod context;
pub mod file_info;
pub mod source_info;
pub mod types;

pub use context::{SourceContext, SourceFile};
pub use file_info::FileInformation;
pub use source_info::SourceInfo;
pub use types::{FileId, Location, Range};
