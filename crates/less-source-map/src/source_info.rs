//! Source information attached to syntax nodes

use crate::types::{FileId, Location, Range};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a syntax node came from: a file and a byte range inside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceInfo {
    /// The file the range refers to
    pub file_id: FileId,
    /// The range in that file
    pub range: Range,
}

impl SourceInfo {
    /// Create source info for a range in an original file
    pub fn original(file_id: FileId, range: Range) -> Self {
        SourceInfo { file_id, range }
    }

    /// Source info for a single-row span given 1-based line and column.
    ///
    /// Byte offsets are left at zero; use
    /// [`SourceContext::source_info_at`](crate::SourceContext::source_info_at)
    /// when the file content is available.
    pub fn at_line(file_id: FileId, line: usize, column: usize, length: usize) -> Self {
        let start = Location {
            offset: 0,
            row: line.saturating_sub(1),
            column: column.saturating_sub(1),
        };
        let mut range = Range::on_row(start, length);
        range.end.offset = 0;
        SourceInfo { file_id, range }
    }

    pub fn start_offset(&self) -> usize {
        self.range.start.offset
    }

    pub fn end_offset(&self) -> usize {
        self.range.end.offset
    }

    /// 1-based line of the start position.
    pub fn line(&self) -> usize {
        self.range.start.row + 1
    }

    /// 1-based column of the start position.
    pub fn column(&self) -> usize {
        self.range.start.column + 1
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line(), self.column())
    }
}
