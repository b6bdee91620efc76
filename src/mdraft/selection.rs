use std::ops::Range;

/// Operations the transform flow needs from the editing surface.
///
/// Selection absence is a normal state, not a fault: `selected_text`
/// returns an empty string and `replace_selection` is a no-op when nothing
/// is selected. Internal surface faults are logged and swallowed, never
/// surfaced to the user.
pub trait SelectionBridge {
    /// Text of the active selection, empty when there is none.
    fn selected_text(&self) -> String;

    /// Replace the selected range, leaving the cursor after the inserted
    /// text. No-op without an active selection.
    fn replace_selection(&mut self, text: &str);

    /// Insert `text` as a new block at the end of the document, separated
    /// from existing content by a blank line.
    fn append_to_document(&mut self, text: &str);
}

/// Markdown buffer with an optional byte-range selection. Stands in for a
/// rich editing surface; hosts with a real surface implement
/// [`SelectionBridge`] against it instead.
#[derive(Debug, Clone, Default)]
pub struct EditorBuffer {
    content: String,
    selection: Option<Range<usize>>,
}

impl EditorBuffer {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            selection: None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the whole buffer. Any selection is dropped since its range
    /// no longer refers to the new text.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.selection = None;
    }

    pub fn select(&mut self, range: Range<usize>) {
        self.selection = Some(range);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    // A range that no longer maps onto the buffer is an internal fault:
    // report it as "no selection" and leave a diagnostic.
    fn selected_range(&self) -> Option<Range<usize>> {
        let range = self.selection.clone()?;
        if self.content.get(range.clone()).is_none() {
            tracing::error!(
                start = range.start,
                end = range.end,
                buffer_len = self.content.len(),
                "selection range does not map onto the buffer"
            );
            return None;
        }
        Some(range)
    }
}

impl SelectionBridge for EditorBuffer {
    fn selected_text(&self) -> String {
        self.selected_range()
            .map(|range| self.content[range].to_string())
            .unwrap_or_default()
    }

    fn replace_selection(&mut self, text: &str) {
        let Some(range) = self.selected_range() else {
            return;
        };
        let caret = range.start + text.len();
        self.content.replace_range(range, text);
        self.selection = Some(caret..caret);
    }

    fn append_to_document(&mut self, text: &str) {
        self.content.push_str("\n\n");
        self.content.push_str(text);
    }
}
