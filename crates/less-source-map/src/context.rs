//! Source context for managing files

use crate::file_info::FileInformation;
use crate::source_info::SourceInfo;
use crate::types::{FileId, Range};
use serde::{Deserialize, Serialize};

/// Registry of the source files a compilation was parsed from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

/// A source file with content and its line index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path or identifier
    pub path: String,
    /// File content, when it is held in memory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Line index built from the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInformation>,
}

impl SourceContext {
    /// Create a new empty source context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the context and return its ID.
    ///
    /// Files registered without content still get an ID, but positions in
    /// them cannot be mapped back to text.
    pub fn add_file(&mut self, path: String, content: Option<String>) -> FileId {
        let id = FileId(self.files.len());
        let file_info = content.as_deref().map(FileInformation::new);
        self.files.push(SourceFile {
            path,
            content,
            file_info,
        });
        id
    }

    /// Get a file by ID
    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    /// Content of a file, if it is held in memory.
    pub fn content(&self, id: FileId) -> Option<&str> {
        self.get_file(id)?.content.as_deref()
    }

    /// Build a single-row [`SourceInfo`] from a 1-based line and column.
    ///
    /// This is what a parser uses to attach positions to the nodes it
    /// produces; offsets are filled in from the file's line index.
    pub fn source_info_at(
        &self,
        id: FileId,
        line: usize,
        column: usize,
        length: usize,
    ) -> Option<SourceInfo> {
        let info = self.get_file(id)?.file_info.as_ref()?;
        let start = info.location_at(line.checked_sub(1)?, column.checked_sub(1)?)?;
        Some(SourceInfo::original(id, Range::on_row(start, length)))
    }

    /// Full text of the line on which `source_info` starts, without its newline.
    pub fn line_text(&self, source_info: &SourceInfo) -> Option<&str> {
        let file = self.get_file(source_info.file_id)?;
        let content = file.content.as_deref()?;
        let (start, end) = file
            .file_info
            .as_ref()?
            .row_span(source_info.range.start.row)?;
        content.get(start..end)
    }

    /// Source text covered by `source_info`.
    pub fn snippet(&self, source_info: &SourceInfo) -> Option<&str> {
        self.content(source_info.file_id)?
            .get(source_info.start_offset()..source_info.end_offset())
    }
}
