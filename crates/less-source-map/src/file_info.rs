//! Line index for offset <-> row/column conversion

use crate::types::Location;
use serde::{Deserialize, Serialize};

/// Line-break index of a source file.
///
/// Stores the byte offset of every newline so that offsets can be turned into
/// (row, column) positions, and rows back into byte spans, without rescanning
/// the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInformation {
    /// Byte offsets of each newline character in the file
    line_breaks: Vec<usize>,

    /// Total length of the file in bytes
    total_length: usize,
}

impl FileInformation {
    /// Scan `content` once and record its line breaks.
    ///
    /// ```
    /// use less_source_map::FileInformation;
    ///
    /// let info = FileInformation::new("a {\n}\n");
    /// assert_eq!(info.line_count(), 3);
    /// ```
    pub fn new(content: &str) -> Self {
        let line_breaks: Vec<usize> = content
            .char_indices()
            .filter_map(|(idx, ch)| if ch == '\n' { Some(idx) } else { None })
            .collect();

        FileInformation {
            line_breaks,
            total_length: content.len(),
        }
    }

    /// Convert a byte offset to a Location with row and column.
    ///
    /// Returns None if the offset is out of bounds.
    pub fn offset_to_location(&self, offset: usize) -> Option<Location> {
        if offset > self.total_length {
            return None;
        }

        // A newline belongs to the row it terminates.
        let row = match self.line_breaks.binary_search(&offset) {
            Ok(idx) | Err(idx) => idx,
        };
        let column = offset - self.row_start(row)?;

        Some(Location {
            offset,
            row,
            column,
        })
    }

    /// Convert a 0-indexed (row, column) pair to a Location.
    ///
    /// Returns None if the row does not exist or the column runs past the
    /// end of the row.
    pub fn location_at(&self, row: usize, column: usize) -> Option<Location> {
        let (start, end) = self.row_span(row)?;
        let offset = start + column;
        if offset > end {
            return None;
        }
        Some(Location {
            offset,
            row,
            column,
        })
    }

    /// Byte span `[start, end)` of a row, excluding its newline.
    pub fn row_span(&self, row: usize) -> Option<(usize, usize)> {
        let start = self.row_start(row)?;
        let end = self
            .line_breaks
            .get(row)
            .copied()
            .unwrap_or(self.total_length);
        Some((start, end))
    }

    fn row_start(&self, row: usize) -> Option<usize> {
        match row {
            0 => Some(0),
            _ => self.line_breaks.get(row - 1).map(|brk| brk + 1),
        }
    }

    /// Get the total length of the file in bytes
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Get the number of lines in the file
    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }
}
