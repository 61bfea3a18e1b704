use serde::{Deserialize, Serialize};

use crate::geometry::{CanvasSize, Point, ResizeHandle};
use crate::template::{ElementKind, ElementUpdate, Field};

/// Keys the inline editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Enter,
    Escape,
}

/// Editor input. Pointer positions are canvas-relative pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "kebab-case")]
pub enum Msg {
    /// Pointer pressed on the canvas background.
    PointerDownBackground,
    /// Pointer pressed on an element body; starts a drag.
    PointerDownElement { id: String, at: Point },
    /// Pointer pressed on a resize handle of an element; starts a resize.
    PointerDownHandle { id: String, handle: ResizeHandle },
    PointerMove { at: Point },
    PointerUp,
    /// Pointer left the canvas; ends the interaction like a pointer-up.
    PointerLeave,
    /// Click whose target is the canvas background itself.
    BackgroundClick,
    /// Enter inline editing for one field of one element.
    DoubleClick { id: String, field: Field },
    /// New value of the field being edited.
    TextInput { text: String },
    Key { key: Key, shift: bool },
    /// Inline editor lost focus.
    Blur,
    TogglePreview,
    AddElement { kind: ElementKind },
    DeleteSelected,
    DeleteElement { id: String },
    /// Style or content change from the properties panel.
    UpdateSelected { update: ElementUpdate },
    Rename { name: String },
    CanvasResized { size: CanvasSize },
}
