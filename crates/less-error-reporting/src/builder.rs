//! Builder API for diagnostic messages.

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
use less_source_map::SourceInfo;

/// Builder for [`DiagnosticMessage`].
///
/// ```
/// use less_error_reporting::{DiagnosticKind, DiagnosticMessageBuilder};
///
/// let msg = DiagnosticMessageBuilder::error("No matching definition was found for `.m(1)`")
///     .with_code("L-2-3")
///     .add_hint("Check the number of arguments?")
///     .build();
/// assert_eq!(msg.kind, DiagnosticKind::Error);
/// assert_eq!(msg.hints.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    pub fn with_location(mut self, location: SourceInfo) -> Self {
        self.message.location = Some(location);
        self
    }

    pub fn problem(mut self, problem: impl Into<MessageContent>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    /// Add an error bullet.
    pub fn add_detail(self, content: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Error, content.into(), None)
    }

    /// Add an error bullet pointing at a source location.
    pub fn add_detail_at(self, content: impl Into<MessageContent>, location: SourceInfo) -> Self {
        self.push_detail(DetailKind::Error, content.into(), Some(location))
    }

    /// Add an info bullet.
    pub fn add_info(self, content: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Info, content.into(), None)
    }

    /// Add an info bullet pointing at a source location.
    pub fn add_info_at(self, content: impl Into<MessageContent>, location: SourceInfo) -> Self {
        self.push_detail(DetailKind::Info, content.into(), Some(location))
    }

    pub fn add_note(self, content: impl Into<MessageContent>) -> Self {
        self.push_detail(DetailKind::Note, content.into(), None)
    }

    pub fn add_hint(mut self, hint: impl Into<MessageContent>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    fn push_detail(
        mut self,
        kind: DetailKind,
        content: MessageContent,
        location: Option<SourceInfo>,
    ) -> Self {
        self.message.details.push(DetailItem {
            kind,
            content,
            location,
        });
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use less_source_map::FileId;

    #[test]
    fn test_builder_collects_details_in_order() {
        let call_site = SourceInfo::at_line(FileId(0), 6, 3, 11);
        let msg = DiagnosticMessageBuilder::error("Attempted to divide by zero.")
            .with_location(SourceInfo::at_line(FileId(0), 3, 10, 9))
            .problem("Evaluating `10px / @a` failed")
            .add_detail("The divisor evaluated to `0px`")
            .add_info_at("Called from `.mixin(0px)`", call_site)
            .add_note("Division is evaluated eagerly")
            .build();

        assert_eq!(msg.details.len(), 3);
        assert_eq!(msg.details[0].kind, DetailKind::Error);
        assert!(msg.details[0].location.is_none());
        assert_eq!(msg.details[1].kind, DetailKind::Info);
        assert_eq!(msg.details[1].location, Some(call_site));
        assert_eq!(msg.details[2].kind, DetailKind::Note);
        assert_eq!(
            msg.problem.as_ref().map(MessageContent::as_str),
            Some("Evaluating `10px / @a` failed")
        );
    }

    #[test]
    fn test_builder_kinds() {
        assert_eq!(
            DiagnosticMessageBuilder::warning("w").build().kind,
            DiagnosticKind::Warning
        );
        assert_eq!(
            DiagnosticMessageBuilder::info("i").build().kind,
            DiagnosticKind::Info
        );
    }
}
