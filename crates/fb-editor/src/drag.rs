//! Drag coordinator: turns drag gestures into store mutations.
//!
//! Two states, `Idle` and `Dragging`. A gesture start opens a `DragSession`;
//! the matching end (or cancel) always closes it, whatever the outcome.
//!
//! | source | target | effect |
//! |--------|--------|--------|
//! | palette | canvas | append a new field |
//! | palette | field at `i` | insert a new field at `i` |
//! | palette | nothing | none |
//! | field `A` | canvas | none |
//! | field `A` | field `B ≠ A` | move `A` to `B`'s index |
//! | field `A` | `A` | none |
//!
//! New fields get their id only when the drop commits, so cancelled drags
//! never consume ids. A target that is no longer in the store resolves to
//! "no target".

use crate::input::{DragSource, DropTarget, InputEvent};
use crate::mutation::StoreMutation;
use fb_core::catalog;
use fb_core::id::FieldId;
use fb_core::model::FieldDraft;
use fb_core::store::ElementStore;

/// The in-flight gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub source: DragSource,
    /// What the drag overlay shows. For palette drags this is exactly what
    /// will be inserted, minus the id.
    pub preview: FieldDraft,
}

impl DragSession {
    pub fn from_palette(&self) -> bool {
        matches!(self.source, DragSource::Palette(_))
    }

    /// The grabbed field's id, for canvas drags.
    pub fn active_id(&self) -> Option<FieldId> {
        match self.source {
            DragSource::Element(id) => Some(id),
            DragSource::Palette(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Handle a gesture event, returning the mutation to apply, if any.
    pub fn handle(&mut self, event: &InputEvent, store: &ElementStore) -> Option<StoreMutation> {
        match event {
            InputEvent::DragStart { source } => {
                self.start(*source, store);
                None
            }
            InputEvent::DragEnd { target } => {
                // Take the session first: the state is Idle again no matter
                // how resolution goes.
                let session = match std::mem::take(&mut self.state) {
                    DragState::Dragging(session) => session,
                    DragState::Idle => {
                        log::debug!("drag end without a drag in progress, ignored");
                        return None;
                    }
                };
                resolve(session, *target, store)
            }
            InputEvent::DragCancel => {
                if self.is_dragging() {
                    log::debug!("drag cancelled");
                }
                self.state = DragState::Idle;
                None
            }
            InputEvent::Key { .. } => None,
        }
    }

    fn start(&mut self, source: Option<DragSource>, store: &ElementStore) {
        if self.is_dragging() {
            log::debug!("drag start while dragging, previous gesture dropped");
        }
        let preview = match source {
            Some(DragSource::Palette(kind)) => Some(catalog::construct(kind)),
            Some(DragSource::Element(id)) => store.get(id).map(|f| f.to_draft()),
            None => None,
        };
        self.state = match (source, preview) {
            (Some(source), Some(preview)) => DragState::Dragging(DragSession { source, preview }),
            _ => {
                log::debug!("drag start with unknown source {source:?}, aborted");
                DragState::Idle
            }
        };
    }
}

fn resolve(
    session: DragSession,
    target: Option<DropTarget>,
    store: &ElementStore,
) -> Option<StoreMutation> {
    let Some(target) = target else {
        log::debug!("dropped outside any drop zone, no change");
        return None;
    };

    match (session.source, target) {
        (DragSource::Palette(kind), DropTarget::Canvas) => {
            let field = session.preview.commit(store.fresh_id(kind));
            Some(StoreMutation::AddField {
                index: None,
                field: Box::new(field),
            })
        }
        (DragSource::Palette(kind), DropTarget::Element(over)) => {
            let Some(index) = store.index_of(over) else {
                log::debug!("drop target {over} no longer on canvas, no change");
                return None;
            };
            let field = session.preview.commit(store.fresh_id(kind));
            Some(StoreMutation::AddField {
                index: Some(index),
                field: Box::new(field),
            })
        }
        (DragSource::Element(_), DropTarget::Canvas) => None,
        (DragSource::Element(active), DropTarget::Element(over)) => {
            if active == over {
                return None;
            }
            match (store.index_of(active), store.index_of(over)) {
                (Some(_), Some(to)) => Some(StoreMutation::MoveField { id: active, to }),
                _ => {
                    log::debug!("reorder {active} onto {over} with a stale side, no change");
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::apply_mutation;
    use fb_core::model::FieldKind;
    use pretty_assertions::assert_eq;

    fn store_with(ids: &[&str]) -> ElementStore {
        let mut store = ElementStore::new();
        for id in ids {
            store.add(catalog::construct(FieldKind::String).commit(FieldId::intern(id)));
        }
        store
    }

    fn order(store: &ElementStore) -> Vec<&'static str> {
        store.ids().iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn palette_start_builds_preview_without_id() {
        let store = ElementStore::new();
        let mut drag = DragCoordinator::new();
        drag.handle(&InputEvent::drag_from_palette(FieldKind::Date), &store);
        let session = drag.session().unwrap();
        assert!(session.from_palette());
        assert_eq!(session.active_id(), None);
        assert_eq!(session.preview, catalog::construct(FieldKind::Date));
    }

    #[test]
    fn element_start_previews_snapshot() {
        let store = store_with(&["dr_a"]);
        let mut drag = DragCoordinator::new();
        drag.handle(&InputEvent::drag_from_element(FieldId::intern("dr_a")), &store);
        let session = drag.session().unwrap();
        assert_eq!(session.active_id(), Some(FieldId::intern("dr_a")));
        assert_eq!(session.preview, store.elements()[0].to_draft());
    }

    #[test]
    fn unknown_sources_abort() {
        let store = ElementStore::new();
        let mut drag = DragCoordinator::new();
        drag.handle(&InputEvent::DragStart { source: None }, &store);
        assert!(!drag.is_dragging());
        drag.handle(&InputEvent::drag_from_element(FieldId::intern("dr_nope")), &store);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn palette_to_canvas_appends() {
        let mut store = store_with(&["dr_p1"]);
        let mut drag = DragCoordinator::new();
        drag.handle(&InputEvent::drag_from_palette(FieldKind::Number), &store);
        let m = drag.handle(&InputEvent::drop_on_canvas(), &store).unwrap();
        assert!(!drag.is_dragging());
        assert!(apply_mutation(&mut store, m));
        assert_eq!(store.len(), 2);
        assert_eq!(store.elements()[1].kind(), FieldKind::Number);
    }

    #[test]
    fn palette_onto_element_inserts_before_it() {
        let mut store = store_with(&["dr_e1", "dr_e2", "dr_e3"]);
        let mut drag = DragCoordinator::new();
        drag.handle(&InputEvent::drag_from_palette(FieldKind::Date), &store);
        let m = drag
            .handle(&InputEvent::drop_on_element(FieldId::intern("dr_e2")), &store)
            .unwrap();
        apply_mutation(&mut store, m);
        let order = order(&store);
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], "dr_e1");
        assert!(order[1].starts_with("date_"));
        assert_eq!(&order[2..], &["dr_e2", "dr_e3"]);
    }

    #[test]
    fn element_onto_element_moves() {
        let mut store = store_with(&["dr_m1", "dr_m2", "dr_m3"]);
        let mut drag = DragCoordinator::new();
        drag.handle(&InputEvent::drag_from_element(FieldId::intern("dr_m3")), &store);
        let m = drag
            .handle(&InputEvent::drop_on_element(FieldId::intern("dr_m1")), &store)
            .unwrap();
        assert_eq!(
            m,
            StoreMutation::MoveField {
                id: FieldId::intern("dr_m3"),
                to: 0
            }
        );
        apply_mutation(&mut store, m);
        assert_eq!(order(&store), vec!["dr_m3", "dr_m1", "dr_m2"]);
    }

    #[test]
    fn no_op_combinations() {
        let store = store_with(&["dr_n1", "dr_n2"]);
        let mut drag = DragCoordinator::new();
        let n1 = FieldId::intern("dr_n1");

        drag.handle(&InputEvent::drag_from_element(n1), &store);
        assert_eq!(drag.handle(&InputEvent::drop_on_canvas(), &store), None);

        drag.handle(&InputEvent::drag_from_element(n1), &store);
        assert_eq!(drag.handle(&InputEvent::drop_on_element(n1), &store), None);

        drag.handle(&InputEvent::drag_from_palette(FieldKind::File), &store);
        assert_eq!(drag.handle(&InputEvent::drop_outside(), &store), None);

        drag.handle(&InputEvent::drag_from_palette(FieldKind::File), &store);
        assert_eq!(
            drag.handle(&InputEvent::drop_on_element(FieldId::intern("dr_stale")), &store),
            None
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn end_without_start_is_ignored() {
        let store = store_with(&["dr_i1"]);
        let mut drag = DragCoordinator::new();
        assert_eq!(drag.handle(&InputEvent::drop_on_canvas(), &store), None);
    }

    #[test]
    fn cancel_clears_session() {
        let store = ElementStore::new();
        let mut drag = DragCoordinator::new();
        drag.handle(&InputEvent::drag_from_palette(FieldKind::Image), &store);
        assert!(drag.is_dragging());
        drag.handle(&InputEvent::DragCancel, &store);
        assert_eq!(drag.state(), &DragState::Idle);
    }
}
