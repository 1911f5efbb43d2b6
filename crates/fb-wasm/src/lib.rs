//! WASM bridge for Form Draft: exposes the builder session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and loaded by the web UI.
//! Structured results cross the boundary as JSON strings.

mod sink;

use fb_core::catalog;
use fb_core::id::FieldId;
use fb_core::model::{Attribute, FieldKind};
use fb_core::template::{BuilderDocument, ExistingTemplate, TemplateField, TemplateMeta};
use fb_core::validate;
use fb_core::view::{ViewKind, fields_added_label};
use fb_editor::input::{DragSource, DropTarget, InputEvent, Modifiers};
use fb_editor::session::{BuilderConfig, BuilderSession, Notice};
use fb_editor::shortcuts::ShortcutAction;
use serde::{Deserialize, Serialize};
use sink::CallbackSink;
use wasm_bindgen::prelude::*;

/// Droppable id of the canvas area itself, as registered by the web UI.
pub const CANVAS_DROP_AREA: &str = "canvas-drop-area";

/// The main WASM-facing builder controller.
///
/// Holds the builder session. All interaction from the web UI goes
/// through this struct.
#[wasm_bindgen]
pub struct FormBuilderCanvas {
    session: BuilderSession,
    config: BuilderConfig,
}

#[wasm_bindgen]
impl FormBuilderCanvas {
    /// Create an empty builder. `undo_depth == 0` keeps the default depth.
    #[wasm_bindgen(constructor)]
    pub fn new(undo_depth: usize) -> Self {
        // Set up panic hook for better error messages in console
        console_error_panic_hook_setup();

        let mut config = BuilderConfig::default();
        if undo_depth > 0 {
            config.undo_depth = undo_depth;
        }
        Self {
            session: BuilderSession::new(config),
            config,
        }
    }

    // ─── Documents ───────────────────────────────────────────────────────

    /// Replace the session with a builder document.
    /// Returns JSON `{"ok":true}` or `{"ok":false,"error":"..."}`.
    pub fn load_document(&mut self, json: &str) -> String {
        let result = BuilderDocument::from_json(json)
            .and_then(|doc| BuilderSession::from_document(doc, self.config));
        match result {
            Ok(session) => {
                self.session = session;
                ok_json()
            }
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// Open a template fetched from storage:
    /// `{"meta":{...},"fields":[...],"existing":{"id":1,"mimeType":"..."}}`.
    pub fn load_template(&mut self, json: &str) -> String {
        let payload: SavedTemplatePayload = match serde_json::from_str(json) {
            Ok(p) => p,
            Err(e) => return error_json(&e.to_string()),
        };
        match BuilderSession::from_template(payload.meta, &payload.fields, payload.existing, self.config) {
            Ok(session) => {
                self.session = session;
                ok_json()
            }
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// The current builder document as JSON.
    pub fn get_document_json(&self) -> String {
        self.session
            .document()
            .to_json()
            .unwrap_or_else(|e| error_json(&e.to_string()))
    }

    /// Raw element list ("show custom fields").
    pub fn get_elements_json(&self) -> String {
        self.session
            .elements_json()
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// The save request a save would send ("show final JSON").
    pub fn get_request_preview_json(&self) -> String {
        serde_json::to_string_pretty(&self.session.request_preview()).unwrap_or_else(|e| error_json(&e.to_string()))
    }

    /// "1 Field Added", "3 Fields Added".
    pub fn get_fields_added_label(&self) -> String {
        fields_added_label(self.session.elements().len())
    }

    /// Replace the template header from JSON. Returns `true` on success.
    pub fn set_meta_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<TemplateMeta>(json) {
            Ok(meta) => {
                *self.session.meta_mut() = meta;
                true
            }
            Err(e) => {
                log::debug!("set_meta_json: {e}");
                false
            }
        }
    }

    /// Header validation issues as a JSON array.
    pub fn get_meta_issues_json(&self) -> String {
        serde_json::to_string(&validate::validate_meta(self.session.meta())).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Views ───────────────────────────────────────────────────────────

    /// Render descriptors for every field in one view
    /// (`"design"`, `"properties"`, `"runtime"`).
    pub fn get_views_json(&self, view: &str) -> String {
        let Some(view) = parse_view(view) else {
            return "[]".to_string();
        };
        let views: Vec<_> = self
            .session
            .elements()
            .iter()
            .map(|field| catalog::get(field.kind()).view(view, field))
            .collect();
        serde_json::to_string(&views).unwrap_or_else(|_| "[]".to_string())
    }

    /// Design-view descriptor of the active drag preview, or `null`.
    pub fn get_drag_overlay_json(&self) -> String {
        let Some(session) = self.session.drag().session() else {
            return "null".to_string();
        };
        let preview = &session.preview;
        let view = catalog::get(preview.kind).view_draft(ViewKind::Design, preview);
        serde_json::to_string(&view).unwrap_or_else(|_| "null".to_string())
    }

    // ─── Drag & drop ─────────────────────────────────────────────────────

    /// A toolbox button was grabbed. Unknown kinds abort the gesture.
    pub fn drag_start_palette(&mut self, kind: &str) -> bool {
        let source = FieldKind::parse(kind).map(DragSource::Palette);
        self.session.handle_input(&InputEvent::DragStart { source })
    }

    /// A field on the canvas was grabbed.
    pub fn drag_start_element(&mut self, id: &str) -> bool {
        let source = (!id.is_empty()).then(|| DragSource::Element(FieldId::intern(id)));
        self.session.handle_input(&InputEvent::DragStart { source })
    }

    /// The gesture was released over `over_id` (a field id, the canvas
    /// drop area, or `""` for nothing). Returns `true` if the canvas changed.
    pub fn drag_end(&mut self, over_id: &str) -> bool {
        let target = match over_id {
            "" => None,
            CANVAS_DROP_AREA => Some(DropTarget::Canvas),
            id => Some(DropTarget::Element(FieldId::intern(id))),
        };
        self.session.handle_input(&InputEvent::DragEnd { target })
    }

    pub fn drag_cancel(&mut self) {
        self.session.handle_input(&InputEvent::DragCancel);
    }

    pub fn is_dragging(&self) -> bool {
        self.session.drag().is_dragging()
    }

    // ─── Selection & properties ──────────────────────────────────────────

    /// Select a field by id; `""` clears the selection.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        let id = (!id.is_empty()).then(|| FieldId::intern(id));
        self.session.select(id)
    }

    /// Get the currently selected field id, or empty string if none.
    pub fn get_selected_id(&self) -> String {
        self.session
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// The properties form of the selected field:
    /// `{"id":"...","form":{...},"editable":[...],"issues":[...]}`, or `null`.
    pub fn get_properties_json(&self) -> String {
        let editor = self.session.editor();
        let Some(id) = editor.target() else {
            return "null".to_string();
        };
        let Some(field) = self.session.store().get(id) else {
            return "null".to_string();
        };
        let form = editor.form();
        let json = serde_json::json!({
            "id": id.as_str(),
            "form": {
                "label": form.label,
                "placeholder": form.placeholder,
                "description": form.description,
                "options": form.options,
                "required": form.required,
            },
            "editable": catalog::get(field.kind()).editable,
            "dirty": editor.is_dirty(),
            "issues": editor.issues(),
        });
        json.to_string()
    }

    /// Stage a text edit (`"label"`, `"placeholder"`, `"description"`,
    /// `"options"`). Returns `false` for inputs the field doesn't have.
    pub fn set_property(&mut self, attribute: &str, value: &str) -> bool {
        match parse_attribute(attribute) {
            Some(attribute) => self.session.edit(attribute, value),
            None => false,
        }
    }

    /// Commit staged edits. Returns `true` if the canvas changed; otherwise
    /// check `get_properties_json` for issues.
    pub fn commit_properties(&mut self) -> bool {
        self.session.blur()
    }

    pub fn set_required(&mut self, required: bool) -> bool {
        self.session.set_required(required)
    }

    // ─── Structure ───────────────────────────────────────────────────────

    pub fn remove_field(&mut self, id: &str) -> bool {
        self.session.remove(FieldId::intern(id))
    }

    pub fn clear(&mut self) -> bool {
        self.session.clear()
    }

    /// Undo the last action.
    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    /// Redo the last undone action.
    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>"}`
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        match self.session.handle_key(key, modifiers) {
            Some((action, changed)) => {
                let action_name = action_to_name(action);
                let c = if changed { "true" } else { "false" };
                format!(r#"{{"changed":{c},"action":"{action_name}"}}"#)
            }
            None => r#"{"changed":false,"action":"none"}"#.to_string(),
        }
    }

    // ─── Save ────────────────────────────────────────────────────────────

    /// Save through the web UI's storage callbacks.
    ///
    /// `create(requestJson)` and `update(id, requestJson)` must return
    /// `{"id":<number>,"name":"..."}` as a JSON string, or throw. Returns
    /// the notice as JSON `{"level":"success"|"error","message":"...","retryable":bool}`.
    pub fn save(&mut self, can_commit: bool, create: js_sys::Function, update: js_sys::Function) -> String {
        let mut sink = CallbackSink::new(create, update);
        let notice = self.session.save(&mut sink, can_commit);
        notice_json(&notice)
    }
}

/// Payload accepted by `load_template`.
#[derive(Deserialize)]
struct SavedTemplatePayload {
    #[serde(default)]
    meta: TemplateMeta,
    fields: Vec<TemplateField>,
    existing: ExistingTemplate,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolboxItem {
    kind: FieldKind,
    label: &'static str,
    icon: &'static str,
}

fn parse_view(name: &str) -> Option<ViewKind> {
    match name {
        "design" => Some(ViewKind::Design),
        "properties" => Some(ViewKind::Properties),
        "runtime" => Some(ViewKind::Runtime),
        _ => None,
    }
}

fn parse_attribute(name: &str) -> Option<Attribute> {
    match name {
        "label" => Some(Attribute::Label),
        "placeholder" => Some(Attribute::Placeholder),
        "description" => Some(Attribute::Description),
        "options" => Some(Attribute::Options),
        _ => None,
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Delete => "delete",
        ShortcutAction::MoveUp => "moveUp",
        ShortcutAction::MoveDown => "moveDown",
        ShortcutAction::Escape => "escape",
    }
}

fn notice_json(notice: &Notice) -> String {
    serde_json::to_string(notice).unwrap_or_else(|e| error_json(&e.to_string()))
}

fn ok_json() -> String {
    r#"{"ok":true}"#.to_string()
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "ok": false, "error": message }).to_string()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Form Draft WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Palette entries in toolbox order as JSON.
#[wasm_bindgen]
pub fn toolbox_json() -> String {
    let items: Vec<ToolboxItem> = catalog::toolbox()
        .map(|entry| ToolboxItem {
            kind: entry.kind,
            label: entry.label,
            icon: entry.icon,
        })
        .collect();
    serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string())
}

/// Validate a builder document. Returns JSON
/// `{"ok":true,"fields":[...],"meta":[...]}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_document(json: &str) -> String {
    match BuilderDocument::from_json(json) {
        Ok(doc) => serde_json::json!({
            "ok": true,
            "fields": validate::check_fields(&doc.fields),
            "meta": validate::validate_meta(&doc.meta),
        })
        .to_string(),
        Err(e) => error_json(&e.to_string()),
    }
}
