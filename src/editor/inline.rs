//! Inline field editing.
//!
//! At most one field of one element is being edited at a time. The edit keeps
//! a draft of the field's text and the value it started from, so the two
//! commit policies only differ in when the draft reaches the document.

use serde::{Deserialize, Serialize};

use crate::template::{ContentPatch, Field, FieldValue};

/// When keystrokes reach the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitPolicy {
    /// Draft is written on Enter or blur; Escape restores the original text.
    #[default]
    Buffered,
    /// Every keystroke is merged at once; Escape only leaves edit mode.
    LiveMerge,
}

/// The field currently open for editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineEdit {
    pub element_id: String,
    pub field: Field,
    pub draft: String,
    pub original: String,
}

impl InlineEdit {
    pub fn new(element_id: impl Into<String>, field: Field, current: &str) -> Self {
        Self {
            element_id: element_id.into(),
            field,
            draft: current.to_string(),
            original: current.to_string(),
        }
    }

    pub fn targets(&self, element_id: &str, field: Field) -> bool {
        self.element_id == element_id && self.field == field
    }

    /// Replace the draft with the editor's current value.
    pub fn input(&mut self, text: String) {
        self.draft = text;
    }

    /// Shift+Enter: line break inside the draft.
    pub fn newline(&mut self) {
        self.draft.push('\n');
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    /// Patch writing the draft into the field.
    pub fn draft_patch(&self) -> ContentPatch {
        ContentPatch::from([(self.field, FieldValue::Text(self.draft.clone()))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_tracks_input() {
        let mut edit = InlineEdit::new("h", Field::Title, "Report Title");
        assert!(!edit.is_dirty());
        edit.input("CBC".into());
        edit.newline();
        assert_eq!(edit.draft, "CBC\n");
        assert!(edit.is_dirty());
        assert_eq!(
            edit.draft_patch().get(&Field::Title),
            Some(&FieldValue::Text("CBC\n".into()))
        );
        assert_eq!(edit.original, "Report Title");
    }

    #[test]
    fn test_targets() {
        let edit = InlineEdit::new("h", Field::Title, "");
        assert!(edit.targets("h", Field::Title));
        assert!(!edit.targets("h", Field::Subtitle));
        assert!(!edit.targets("x", Field::Title));
    }
}
