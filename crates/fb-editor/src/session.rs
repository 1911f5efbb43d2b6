//! Builder session: one open template in the builder.
//!
//! Owns the element store and wires the components around it. Gestures go
//! through the drag coordinator, property edits through the property editor,
//! and every resulting `StoreMutation` is applied through the command stack
//! so it can be undone. The session also tracks the selection and talks to
//! the template sink on save.

use crate::commands::CommandStack;
use crate::drag::DragCoordinator;
use crate::input::{InputEvent, Modifiers};
use crate::mutation::StoreMutation;
use crate::properties::PropertyEditor;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use fb_core::error::{SaveError, TemplateError};
use fb_core::id::FieldId;
use fb_core::model::{Attribute, FieldInstance};
use fb_core::store::{ElementStore, StoreListener, Subscription};
use fb_core::template::{
    self, BuilderDocument, ExistingTemplate, SaveOutcome, SaveRequest, TemplateField, TemplateMeta,
    TemplateSink,
};
use serde::Serialize;

const SAVE_FAILED: &str = "Failed to save template.";

/// Session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Maximum number of undo steps kept.
    pub undo_depth: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self { undo_depth: 100 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A user-facing notification (a toast in the web UI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Whether the same action may succeed when retried.
    pub retryable: bool,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            retryable: false,
        }
    }

    fn from_error(err: &SaveError) -> Self {
        let message = match err {
            SaveError::Sink(msg) if msg.trim().is_empty() => SAVE_FAILED.to_string(),
            other => other.to_string(),
        };
        Self {
            level: NoticeLevel::Error,
            message,
            retryable: err.is_retryable(),
        }
    }
}

pub struct BuilderSession {
    store: ElementStore,
    commands: CommandStack,
    drag: DragCoordinator,
    editor: PropertyEditor,
    selected: Option<FieldId>,
    meta: TemplateMeta,
    existing: Option<ExistingTemplate>,
}

impl BuilderSession {
    /// An empty canvas for a new template.
    pub fn new(config: BuilderConfig) -> Self {
        Self::with_store(ElementStore::new(), TemplateMeta::default(), None, config)
    }

    /// Reopen a saved builder document.
    pub fn from_document(doc: BuilderDocument, config: BuilderConfig) -> Result<Self, TemplateError> {
        let store = ElementStore::from_elements(doc.fields)?;
        Ok(Self::with_store(store, doc.meta, doc.existing, config))
    }

    /// Open a template fetched from storage for editing. Field names become
    /// the element ids.
    pub fn from_template(
        meta: TemplateMeta,
        fields: &[TemplateField],
        existing: ExistingTemplate,
        config: BuilderConfig,
    ) -> Result<Self, TemplateError> {
        let store = template::import_fields(fields)?;
        Ok(Self::with_store(store, meta, Some(existing), config))
    }

    fn with_store(
        store: ElementStore,
        meta: TemplateMeta,
        existing: Option<ExistingTemplate>,
        config: BuilderConfig,
    ) -> Self {
        log::debug!("session: open with {} fields", store.len());
        Self {
            store,
            commands: CommandStack::new(config.undo_depth),
            drag: DragCoordinator::new(),
            editor: PropertyEditor::new(),
            selected: None,
            meta,
            existing,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn elements(&self) -> &[FieldInstance] {
        self.store.elements()
    }

    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    pub fn editor(&self) -> &PropertyEditor {
        &self.editor
    }

    pub fn selected(&self) -> Option<FieldId> {
        self.selected
    }

    pub fn meta(&self) -> &TemplateMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut TemplateMeta {
        &mut self.meta
    }

    pub fn existing(&self) -> Option<&ExistingTemplate> {
        self.existing.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        self.commands.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.commands.can_redo()
    }

    /// Observe the element store.
    pub fn subscribe(&self, listener: StoreListener) -> Subscription {
        self.store.subscribe(listener)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one front-end event. Returns `true` if the canvas changed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::Key { key, modifiers } = event {
            return self.handle_key(key, *modifiers).is_some_and(|(_, changed)| changed);
        }
        match self.drag.handle(event, &self.store) {
            Some(mutation) => {
                let description = match &mutation {
                    StoreMutation::AddField { .. } => "Add field",
                    StoreMutation::MoveField { .. } => "Move field",
                    _ => "Edit canvas",
                };
                self.execute(mutation, description)
            }
            None => false,
        }
    }

    /// Resolve and run a keyboard shortcut. Returns the action (if the key
    /// is bound) and whether the canvas changed.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Option<(ShortcutAction, bool)> {
        let action = ShortcutMap::resolve_with(key, modifiers)?;
        let changed = match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.remove_selected(),
            ShortcutAction::MoveUp => self.move_selected(-1),
            ShortcutAction::MoveDown => self.move_selected(1),
            ShortcutAction::Escape => {
                if self.drag.is_dragging() {
                    self.drag.handle(&InputEvent::DragCancel, &self.store);
                } else {
                    self.select(None);
                }
                false
            }
        };
        Some((action, changed))
    }

    // ─── Selection & properties ──────────────────────────────────────────

    /// Select a field (or nothing). Staged property edits are discarded.
    /// Returns `false` if `id` is not on the canvas.
    pub fn select(&mut self, id: Option<FieldId>) -> bool {
        if id.is_some_and(|id| !self.store.contains(id)) {
            return false;
        }
        self.selected = id;
        self.editor.select(id.and_then(|id| self.store.get(id)));
        true
    }

    /// Stage a text edit on the selected field.
    pub fn edit(&mut self, attribute: Attribute, value: &str) -> bool {
        self.editor.set_text(attribute, value)
    }

    /// Commit staged edits. Returns `true` if the store changed; on a
    /// validation failure the issues are on `editor().issues()`.
    pub fn blur(&mut self) -> bool {
        match self.editor.blur(&self.store) {
            Some(mutation) => self.execute(mutation, "Edit field"),
            None => false,
        }
    }

    pub fn set_required(&mut self, required: bool) -> bool {
        match self.editor.toggle_required(required, &self.store) {
            Some(mutation) => self.execute(mutation, "Toggle required"),
            None => false,
        }
    }

    // ─── Structure ───────────────────────────────────────────────────────

    /// Remove a field. Removing the selected field clears the selection.
    pub fn remove(&mut self, id: FieldId) -> bool {
        let changed = self.execute(StoreMutation::RemoveField { id }, "Delete field");
        if changed && self.selected == Some(id) {
            self.select(None);
        }
        changed
    }

    pub fn remove_selected(&mut self) -> bool {
        match self.selected {
            Some(id) => self.remove(id),
            None => false,
        }
    }

    /// Move the selected field `delta` slots. Moves past either end are
    /// no-ops.
    pub fn move_selected(&mut self, delta: isize) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let Some(from) = self.store.index_of(id) else {
            return false;
        };
        match from.checked_add_signed(delta) {
            Some(to) if to < self.store.len() => self.execute(StoreMutation::MoveField { id, to }, "Move field"),
            _ => false,
        }
    }

    /// Remove every field as one undo step.
    pub fn clear(&mut self) -> bool {
        if self.store.is_empty() {
            return false;
        }
        self.commands.begin_batch(&self.store);
        for id in self.store.ids() {
            self.commands
                .execute(&mut self.store, StoreMutation::RemoveField { id }, "Delete field");
        }
        self.commands.end_batch(&self.store, "Clear canvas");
        self.select(None);
        true
    }

    pub fn undo(&mut self) -> bool {
        let result = self.commands.undo(&mut self.store);
        if let Some(desc) = &result {
            log::debug!("session: undo {desc}");
            self.resync_selection();
        }
        result.is_some()
    }

    pub fn redo(&mut self) -> bool {
        let result = self.commands.redo(&mut self.store);
        if let Some(desc) = &result {
            log::debug!("session: redo {desc}");
            self.resync_selection();
        }
        result.is_some()
    }

    fn execute(&mut self, mutation: StoreMutation, description: &str) -> bool {
        self.commands.execute(&mut self.store, mutation, description)
    }

    /// Refresh the property form from the store, dropping a selection whose
    /// field is gone.
    fn resync_selection(&mut self) {
        let current = self.selected.filter(|id| self.store.contains(*id));
        self.select(current);
    }

    // ─── Export & save ───────────────────────────────────────────────────

    /// The raw element list as pretty JSON.
    pub fn elements_json(&self) -> Result<String, TemplateError> {
        template::fields_to_json(self.store.elements())
    }

    /// The request a save would send, without permission or header checks.
    pub fn request_preview(&self) -> SaveRequest {
        template::build_request(&self.meta, self.store.elements(), self.existing.as_ref())
    }

    pub fn document(&self) -> BuilderDocument {
        BuilderDocument {
            meta: self.meta.clone(),
            fields: self.store.elements().to_vec(),
            existing: self.existing,
        }
    }

    /// Create or update the template. A failure leaves the canvas as it is.
    /// After a successful create, later saves update the new template.
    pub fn save(&mut self, sink: &mut dyn TemplateSink, can_commit: bool) -> Notice {
        let request =
            match template::prepare_save(&self.meta, self.store.elements(), self.existing.as_ref(), can_commit) {
                Ok(request) => request,
                Err(err) => return self.save_failed(&err),
            };

        match template::dispatch_save(sink, &request, self.existing.as_ref()) {
            Ok(SaveOutcome::Created(saved)) => {
                log::debug!("session: created template {}", saved.id);
                self.existing = Some(ExistingTemplate {
                    id: saved.id,
                    mime_type: request.mime_type,
                });
                Notice::success(format!("Template \"{}\" created successfully.", saved.name))
            }
            Ok(SaveOutcome::Updated(saved)) => {
                log::debug!("session: updated template {}", saved.id);
                Notice::success(format!("Template \"{}\" updated successfully.", saved.name))
            }
            Err(err) => self.save_failed(&err),
        }
    }

    fn save_failed(&self, err: &SaveError) -> Notice {
        log::warn!("save failed: {err}");
        Notice::from_error(err)
    }
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::model::FieldKind;
    use pretty_assertions::assert_eq;

    fn session_with(kinds: &[FieldKind]) -> BuilderSession {
        let mut session = BuilderSession::default();
        for kind in kinds {
            session.handle_input(&InputEvent::drag_from_palette(*kind));
            session.handle_input(&InputEvent::drop_on_canvas());
        }
        session
    }

    #[test]
    fn palette_drop_adds_undoable_field() {
        let mut session = session_with(&[FieldKind::String]);
        assert_eq!(session.elements().len(), 1);
        assert!(session.undo());
        assert!(session.elements().is_empty());
        assert!(session.redo());
        assert_eq!(session.elements().len(), 1);
    }

    #[test]
    fn accepts_any_undo_depth() {
        let mut session = BuilderSession::new(BuilderConfig {
            undo_depth: usize::MAX / 2,
        });
        session.handle_input(&InputEvent::drag_from_palette(FieldKind::String));
        assert!(session.handle_input(&InputEvent::drop_on_canvas()));
        assert!(session.undo());
    }

    #[test]
    fn select_rejects_unknown_ids() {
        let mut session = session_with(&[FieldKind::Number]);
        assert!(!session.select(Some(FieldId::intern("ss_missing"))));
        let id = session.elements()[0].id();
        assert!(session.select(Some(id)));
        assert_eq!(session.editor().target(), Some(id));
    }

    #[test]
    fn remove_selected_clears_selection() {
        let mut session = session_with(&[FieldKind::Date, FieldKind::File]);
        let id = session.elements()[0].id();
        session.select(Some(id));
        assert!(session.remove_selected());
        assert_eq!(session.selected(), None);
        assert_eq!(session.editor().target(), None);
        assert!(!session.remove_selected());
    }

    #[test]
    fn move_selected_stops_at_edges() {
        let mut session = session_with(&[FieldKind::String, FieldKind::Number]);
        let first = session.elements()[0].id();
        session.select(Some(first));
        assert!(!session.move_selected(-1));
        assert!(session.move_selected(1));
        assert_eq!(session.store().index_of(first), Some(1));
        assert!(!session.move_selected(1));
    }

    #[test]
    fn undo_of_edit_refreshes_form() {
        let mut session = session_with(&[FieldKind::String]);
        let id = session.elements()[0].id();
        session.select(Some(id));
        session.edit(Attribute::Label, "Full name");
        assert!(session.blur());
        assert_eq!(session.editor().form().label, "Full name");
        session.undo();
        assert_eq!(session.editor().form().label, "");
        assert_eq!(session.selected(), Some(id));
    }

    #[test]
    fn undo_of_add_drops_selection() {
        let mut session = session_with(&[FieldKind::Image]);
        let id = session.elements()[0].id();
        session.select(Some(id));
        session.undo();
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn clear_is_one_undo_step() {
        let mut session = session_with(&[FieldKind::String, FieldKind::Boolean, FieldKind::Select]);
        let before = session.elements().to_vec();
        assert!(session.clear());
        assert!(session.elements().is_empty());
        assert!(session.undo());
        assert_eq!(session.elements(), before.as_slice());
    }

    #[test]
    fn escape_cancels_drag_before_deselecting() {
        let mut session = session_with(&[FieldKind::String]);
        let id = session.elements()[0].id();
        session.select(Some(id));
        session.handle_input(&InputEvent::drag_from_palette(FieldKind::Date));
        session.handle_key("Escape", Modifiers::NONE);
        assert!(!session.drag().is_dragging());
        assert_eq!(session.selected(), Some(id));
        session.handle_key("Escape", Modifiers::NONE);
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn key_events_route_through_handle_input() {
        let mut session = session_with(&[FieldKind::String]);
        let undo = InputEvent::Key {
            key: "z".into(),
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        };
        assert!(session.handle_input(&undo));
        assert!(session.elements().is_empty());
    }

    #[test]
    fn empty_sink_message_falls_back() {
        let notice = Notice::from_error(&SaveError::Sink(String::new()));
        assert_eq!(notice.message, "Failed to save template.");
        assert!(notice.retryable);
        assert_eq!(notice.level, NoticeLevel::Error);
    }
}
