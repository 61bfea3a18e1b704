use serde::Serialize;

use super::inline::{CommitPolicy, InlineEdit};
use crate::geometry::{CanvasSize, Point, ResizeHandle};

/// The one gesture the editor is in.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging {
        element_id: String,
        /// Pointer position relative to the element origin, in percent.
        offset: Point,
    },
    Resizing {
        element_id: String,
        handle: ResizeHandle,
    },
    EditingField(InlineEdit),
}

impl InteractionMode {
    /// A drag or resize holds the pointer.
    pub fn is_pointer_captured(&self) -> bool {
        matches!(
            self,
            InteractionMode::Dragging { .. } | InteractionMode::Resizing { .. }
        )
    }

    /// Element the current gesture acts on.
    pub fn element_id(&self) -> Option<&str> {
        match self {
            InteractionMode::Idle => None,
            InteractionMode::Dragging { element_id, .. }
            | InteractionMode::Resizing { element_id, .. } => Some(element_id),
            InteractionMode::EditingField(edit) => Some(&edit.element_id),
        }
    }

    pub fn editing(&self) -> Option<&InlineEdit> {
        match self {
            InteractionMode::EditingField(edit) => Some(edit),
            _ => None,
        }
    }
}

/// Ephemeral editor state. Never serialized into a template.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EditorSession {
    pub selected: Option<String>,
    pub mode: InteractionMode,
    pub preview: bool,
    pub canvas: CanvasSize,
    pub policy: CommitPolicy,
}

impl EditorSession {
    pub fn new(policy: CommitPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }
}
