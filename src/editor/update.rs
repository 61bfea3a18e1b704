//! Update function for the template editor.
//!
//! `update` folds one [`Msg`] into the editor, mutating the document and the
//! session, and returns `true` when the canvas must be redrawn.
//!
//! Rules enforced here:
//! - one gesture at a time: pointer-down while a drag or resize is active is
//!   ignored
//! - pointer-up and pointer-leave always end a drag or resize
//! - starting anything on another element first commits an open inline edit
//! - preview mode accepts no editing gestures
//! - geometry comes from the geometry engine and is never rejected; any
//!   other refused update is logged and dropped

use tracing::{debug, warn};

use super::inline::{CommitPolicy, InlineEdit};
use super::messages::{Key, Msg};
use super::session::InteractionMode;
use super::Editor;
use crate::geometry::{grab_offset, move_rect, resize_rect};
use crate::template::{ContentPatch, ElementUpdate};

pub fn update(editor: &mut Editor, msg: Msg) -> bool {
    match msg {
        Msg::PointerDownBackground => {
            if editor.session.mode.is_pointer_captured() {
                return false;
            }
            finish_edit(editor)
        }
        Msg::BackgroundClick => {
            if editor.session.mode.is_pointer_captured() {
                return false;
            }
            let committed = finish_edit(editor);
            let had_selection = editor.session.selected.take().is_some();
            committed || had_selection
        }
        Msg::PointerDownElement { id, at } => {
            if !begin_pointer_gesture(editor, &id) {
                return false;
            }
            let Some(element) = editor.document.element(&id) else {
                warn!(id = %id, "pointer down on unknown element");
                return false;
            };
            let pointer = editor.session.canvas.to_percent(at);
            let offset = grab_offset(&element.position, pointer);
            debug!(id = %id, ?offset, "drag start");
            editor.session.selected = Some(id.clone());
            editor.session.mode = InteractionMode::Dragging {
                element_id: id,
                offset,
            };
            true
        }
        Msg::PointerDownHandle { id, handle } => {
            if !begin_pointer_gesture(editor, &id) {
                return false;
            }
            if editor.document.element(&id).is_none() {
                warn!(id = %id, "resize on unknown element");
                return false;
            }
            debug!(id = %id, %handle, "resize start");
            editor.session.selected = Some(id.clone());
            editor.session.mode = InteractionMode::Resizing {
                element_id: id,
                handle,
            };
            true
        }
        Msg::PointerMove { at } => {
            let pointer = editor.session.canvas.to_percent(at);
            let (id, rect) = match &editor.session.mode {
                InteractionMode::Dragging { element_id, offset } => {
                    let Some(element) = editor.document.element(element_id) else {
                        return false;
                    };
                    (element_id.clone(), move_rect(&element.position, pointer, *offset))
                }
                InteractionMode::Resizing { element_id, handle } => {
                    let Some(element) = editor.document.element(element_id) else {
                        return false;
                    };
                    let min = element.kind().min_size();
                    (element_id.clone(), resize_rect(&element.position, *handle, pointer, min))
                }
                _ => return false,
            };
            apply(editor, &id, ElementUpdate::Position(rect))
        }
        Msg::PointerUp | Msg::PointerLeave => {
            if editor.session.mode.is_pointer_captured() {
                debug!("pointer released");
                editor.session.mode = InteractionMode::Idle;
                true
            } else {
                false
            }
        }
        Msg::DoubleClick { id, field } => {
            if editor.session.preview || editor.session.mode.is_pointer_captured() {
                return false;
            }
            if let Some(edit) = editor.session.mode.editing() {
                if edit.targets(&id, field) {
                    return false;
                }
            }
            let Some(current) = editor
                .document
                .element(&id)
                .and_then(|e| e.content.text(field))
                .map(str::to_string)
            else {
                warn!(id = %id, %field, "no editable text field");
                return false;
            };
            finish_edit(editor);
            debug!(id = %id, %field, "inline edit start");
            editor.session.selected = Some(id.clone());
            editor.session.mode = InteractionMode::EditingField(InlineEdit::new(id, field, &current));
            true
        }
        Msg::TextInput { text } => {
            let InteractionMode::EditingField(edit) = &mut editor.session.mode else {
                return false;
            };
            edit.input(text);
            if editor.session.policy == CommitPolicy::LiveMerge {
                let (id, patch) = (edit.element_id.clone(), edit.draft_patch());
                apply(editor, &id, ElementUpdate::Content(patch));
            }
            true
        }
        Msg::Key { key, shift } => {
            if editor.session.mode.editing().is_none() {
                return false;
            }
            match (key, shift) {
                (Key::Enter, true) => {
                    let InteractionMode::EditingField(edit) = &mut editor.session.mode else {
                        return false;
                    };
                    edit.newline();
                    if editor.session.policy == CommitPolicy::LiveMerge {
                        let (id, patch) = (edit.element_id.clone(), edit.draft_patch());
                        apply(editor, &id, ElementUpdate::Content(patch));
                    }
                    true
                }
                (Key::Enter, false) => finish_edit(editor),
                (Key::Escape, _) => cancel_edit(editor),
            }
        }
        Msg::Blur => finish_edit(editor),
        Msg::TogglePreview => {
            finish_edit(editor);
            if editor.session.mode.is_pointer_captured() {
                editor.session.mode = InteractionMode::Idle;
            }
            editor.session.preview = !editor.session.preview;
            debug!(preview = editor.session.preview, "preview toggled");
            true
        }
        Msg::AddElement { kind } => {
            if editor.session.preview {
                return false;
            }
            finish_edit(editor);
            let id = editor.document.add_element(kind);
            editor.session.selected = Some(id);
            true
        }
        Msg::DeleteSelected => match editor.session.selected.clone() {
            Some(id) => delete(editor, &id),
            None => false,
        },
        Msg::DeleteElement { id } => delete(editor, &id),
        Msg::UpdateSelected { update } => {
            let Some(id) = editor.session.selected.clone() else {
                return false;
            };
            if let ElementUpdate::Content(patch) = &update {
                discard_overlapping_edit(editor, &id, patch);
            }
            apply(editor, &id, update)
        }
        Msg::Rename { name } => {
            if editor.document.name == name {
                return false;
            }
            editor.document.name = name;
            true
        }
        Msg::CanvasResized { size } => {
            if editor.session.canvas == size {
                return false;
            }
            editor.session.canvas = size;
            true
        }
    }
}

/// Shared gate for pointer-down on an element or handle.
///
/// Returns `false` when the gesture must be ignored.
fn begin_pointer_gesture(editor: &mut Editor, id: &str) -> bool {
    if editor.session.preview {
        return false;
    }
    if editor.session.mode.is_pointer_captured() {
        debug!(id = %id, "pointer captured; ignoring pointer down");
        return false;
    }
    if let Some(edit) = editor.session.mode.editing() {
        if edit.element_id == id {
            return false;
        }
        finish_edit(editor);
    }
    true
}

/// Commit the open inline edit, if any. Returns `true` if one was open.
fn finish_edit(editor: &mut Editor) -> bool {
    if editor.session.mode.editing().is_none() {
        return false;
    }
    let InteractionMode::EditingField(edit) = std::mem::take(&mut editor.session.mode) else {
        return false;
    };
    if editor.session.policy == CommitPolicy::Buffered && edit.is_dirty() {
        apply(editor, &edit.element_id, ElementUpdate::Content(edit.draft_patch()));
    }
    debug!(id = %edit.element_id, field = %edit.field, "inline edit committed");
    true
}

/// Leave the open inline edit without committing the draft.
fn cancel_edit(editor: &mut Editor) -> bool {
    if editor.session.mode.editing().is_none() {
        return false;
    }
    let InteractionMode::EditingField(edit) = std::mem::take(&mut editor.session.mode) else {
        return false;
    };
    debug!(id = %edit.element_id, field = %edit.field, "inline edit cancelled");
    true
}

/// A panel patch to the field being edited replaces the draft.
fn discard_overlapping_edit(editor: &mut Editor, id: &str, patch: &ContentPatch) {
    let overlaps = editor
        .session
        .mode
        .editing()
        .is_some_and(|edit| edit.element_id == id && patch.contains_key(&edit.field));
    if overlaps {
        editor.session.mode = InteractionMode::Idle;
    }
}

fn delete(editor: &mut Editor, id: &str) -> bool {
    if let Err(e) = editor.document.remove_element(id) {
        warn!(id = %id, error = %e, "delete refused");
        return false;
    }
    if editor.session.is_selected(id) {
        editor.session.selected = None;
    }
    if editor.session.mode.element_id() == Some(id) {
        editor.session.mode = InteractionMode::Idle;
    }
    debug!(id = %id, "element deleted");
    true
}

fn apply(editor: &mut Editor, id: &str, update: ElementUpdate) -> bool {
    match editor.document.apply(id, &update) {
        Ok(()) => true,
        Err(e) => {
            warn!(id = %id, error = %e, "update refused");
            false
        }
    }
}
