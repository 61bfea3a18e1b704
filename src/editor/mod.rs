//! # Template Editor
//!
//! An [`Editor`] owns one [`TemplateDocument`] and the ephemeral
//! [`EditorSession`] around it: selection, the current gesture, preview flag,
//! canvas size and inline-edit commit policy.
//!
//! Input arrives as [`Msg`] values folded by [`Editor::update`]; the returned
//! flag says whether the canvas needs a redraw. [`Editor::canvas`] produces
//! what to draw, using the same renderer as the read-only preview.
//!
//! ## Gestures
//!
//! ```text
//!            pointer-down (element)          pointer-up / leave
//!   Idle ───────────────────────────► Dragging ─────────────────► Idle
//!     │      pointer-down (handle)           pointer-up / leave
//!     ├─────────────────────────────► Resizing ─────────────────► Idle
//!     │      double-click (field)            Enter / blur / Escape
//!     └─────────────────────────────► EditingField ─────────────► Idle
//! ```

mod inline;
mod messages;
mod session;
mod update;

pub use inline::{CommitPolicy, InlineEdit};
pub use messages::{Key, Msg};
pub use session::{EditorSession, InteractionMode};

use serde::Serialize;

use crate::geometry::{CanvasSize, Point, ResizeHandle};
use crate::handoff::HandoffSlot;
use crate::render::{ElementView, RenderMode, render};
use crate::template::TemplateDocument;

/// Interactive editing state for one template.
#[derive(Debug, Clone)]
pub struct Editor {
    document: TemplateDocument,
    session: EditorSession,
}

/// One element as the editing canvas shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasElement {
    pub view: ElementView,
    pub selected: bool,
    /// Resize handles to draw; empty unless selected outside preview.
    pub handles: Vec<ResizeHandle>,
    /// Field open for inline editing, with the text to show in it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editing: Option<InlineEdit>,
}

/// Everything needed to draw the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasView {
    pub name: String,
    pub preview: bool,
    pub canvas: CanvasSize,
    pub elements: Vec<CanvasElement>,
}

impl Editor {
    pub fn new(document: TemplateDocument) -> Self {
        Self::with_policy(document, CommitPolicy::default())
    }

    pub fn with_policy(document: TemplateDocument, policy: CommitPolicy) -> Self {
        Self {
            document,
            session: EditorSession::new(policy),
        }
    }

    /// Open the document waiting in the hand-off slot, clearing it, or the
    /// default report layout when the slot is empty.
    pub fn from_handoff(slot: &HandoffSlot<TemplateDocument>) -> Self {
        match slot.take() {
            Some(doc) => {
                tracing::info!(id = %doc.id, name = %doc.name, "editor opened from hand-off");
                Self::new(doc)
            }
            None => Self::new(TemplateDocument::default_report()),
        }
    }

    pub fn document(&self) -> &TemplateDocument {
        &self.document
    }

    pub fn into_document(self) -> TemplateDocument {
        self.document
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Replace the document, e.g. after loading a file.
    ///
    /// The session is reset except for its policy and canvas size.
    pub fn load(&mut self, document: TemplateDocument) {
        self.document = document;
        self.session = EditorSession {
            canvas: self.session.canvas,
            ..EditorSession::new(self.session.policy)
        };
    }

    /// Fold one message. Returns `true` if the canvas needs a redraw.
    pub fn update(&mut self, msg: Msg) -> bool {
        update::update(self, msg)
    }

    /// Topmost element under a canvas pixel position.
    pub fn hit_test(&self, at: Point) -> Option<&str> {
        let p = self.session.canvas.to_percent(at);
        self.document
            .elements
            .iter()
            .rev()
            .find(|e| e.position.contains(p))
            .map(|e| e.id.as_str())
    }

    /// Render the canvas.
    pub fn canvas(&self) -> CanvasView {
        let mode = if self.session.preview {
            RenderMode::Preview
        } else {
            RenderMode::Edit
        };
        let elements = self
            .document
            .elements
            .iter()
            .map(|element| {
                let selected = self.session.is_selected(&element.id);
                let handles = if selected && !self.session.preview {
                    ResizeHandle::ALL.to_vec()
                } else {
                    Vec::new()
                };
                let editing = self
                    .session
                    .mode
                    .editing()
                    .filter(|edit| edit.element_id == element.id)
                    .cloned();
                CanvasElement {
                    view: render(element, mode),
                    selected,
                    handles,
                    editing,
                }
            })
            .collect();
        CanvasView {
            name: self.document.name.clone(),
            preview: self.session.preview,
            canvas: self.session.canvas,
            elements,
        }
    }
}
