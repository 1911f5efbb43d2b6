//! Input abstraction layer.
//!
//! Normalizes drag-and-drop callbacks and key presses from the front end
//! into a unified `InputEvent` enum consumed by the drag coordinator and the
//! shortcut map. Missing sources or targets are represented explicitly so a
//! malformed gesture can be aborted instead of guessed at.

use fb_core::id::FieldId;
use fb_core::model::FieldKind;

/// Where a drag gesture started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// A toolbox button: a new field of this kind.
    Palette(FieldKind),
    /// A field already on the canvas.
    Element(FieldId),
}

/// Where a drag gesture was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// The canvas drop area itself (outside any field).
    Canvas,
    /// An existing field on the canvas.
    Element(FieldId),
}

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Drag began. `None` when the front end could not tell what was grabbed.
    DragStart { source: Option<DragSource> },

    /// Drag released. `None` when released outside every drop zone.
    DragEnd { target: Option<DropTarget> },

    /// Drag aborted by the front end (Escape, pointer lost).
    DragCancel,

    /// Key press.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn drag_from_palette(kind: FieldKind) -> Self {
        Self::DragStart {
            source: Some(DragSource::Palette(kind)),
        }
    }

    pub fn drag_from_element(id: FieldId) -> Self {
        Self::DragStart {
            source: Some(DragSource::Element(id)),
        }
    }

    pub fn drop_on_canvas() -> Self {
        Self::DragEnd {
            target: Some(DropTarget::Canvas),
        }
    }

    pub fn drop_on_element(id: FieldId) -> Self {
        Self::DragEnd {
            target: Some(DropTarget::Element(id)),
        }
    }

    pub fn drop_outside() -> Self {
        Self::DragEnd { target: None }
    }

    /// Whether this event ends the active gesture.
    pub fn ends_drag(&self) -> bool {
        matches!(self, Self::DragEnd { .. } | Self::DragCancel)
    }
}
