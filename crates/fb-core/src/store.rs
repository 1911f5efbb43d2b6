//! Element store: the ordered, id-unique collection of fields on the canvas.
//!
//! The store is a plain state container. It owns the only writable copy of
//! the element list, applies one mutation per call, and notifies subscribers
//! synchronously after each applied mutation. Ordering policy (where a drop
//! lands, what a reorder means) belongs to the caller.

use crate::error::TemplateError;
use crate::id::FieldId;
use crate::model::{FieldAttributes, FieldInstance, FieldKind};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// What changed in the last applied mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Added { id: FieldId, index: usize },
    Removed { id: FieldId, index: usize },
    Updated { id: FieldId, index: usize },
    Moved { id: FieldId, from: usize, to: usize },
    /// The whole list was replaced (`set_all`).
    Replaced,
}

/// Subscriber callback: the event plus the list after the mutation.
pub type StoreListener = Rc<dyn Fn(&StoreEvent, &[FieldInstance])>;

/// Keeps a listener registered; dropping it unsubscribes.
pub struct Subscription {
    listener: StoreListener,
    listeners: Rc<RefCell<Vec<StoreListener>>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain(|item| !Rc::ptr_eq(item, &self.listener));
    }
}

#[derive(Default)]
pub struct ElementStore {
    elements: Vec<FieldInstance>,
    /// Every id that has ever been in the store. Generated ids skip these,
    /// so an id is never handed out twice even after removal.
    seen: HashSet<FieldId>,
    listeners: Rc<RefCell<Vec<StoreListener>>>,
}

impl std::fmt::Debug for ElementStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementStore")
            .field("elements", &self.elements)
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a previously saved list, keeping its ids.
    pub fn from_elements(elements: Vec<FieldInstance>) -> Result<Self, TemplateError> {
        let mut seen = HashSet::with_capacity(elements.len());
        for field in &elements {
            if !seen.insert(field.id()) {
                return Err(TemplateError::DuplicateFieldName(field.id().to_string()));
            }
        }
        Ok(Self {
            elements,
            seen,
            listeners: Rc::default(),
        })
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn elements(&self) -> &[FieldInstance] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn index_of(&self, id: FieldId) -> Option<usize> {
        self.elements.iter().position(|f| f.id() == id)
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldInstance> {
        self.elements.iter().find(|f| f.id() == id)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.index_of(id).is_some()
    }

    /// The ids in canvas order.
    pub fn ids(&self) -> Vec<FieldId> {
        self.elements.iter().map(FieldInstance::id).collect()
    }

    /// A new id for a field of `kind`, distinct from every id this store has
    /// ever held.
    pub fn fresh_id(&self, kind: FieldKind) -> FieldId {
        loop {
            let id = FieldId::with_prefix(kind.id_prefix());
            if !self.seen.contains(&id) {
                return id;
            }
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Append a field.
    ///
    /// # Panics
    /// If a field with the same id is already present.
    pub fn add(&mut self, field: FieldInstance) {
        let index = self.elements.len();
        self.insert(index, field);
    }

    /// Insert a field at `index`, shifting later fields right.
    ///
    /// # Panics
    /// If the id is already present or `index > len`.
    pub fn insert(&mut self, index: usize, field: FieldInstance) {
        let id = field.id();
        assert!(!self.contains(id), "duplicate field id {id}");
        assert!(
            index <= self.elements.len(),
            "insert index {index} out of bounds (len {})",
            self.elements.len()
        );
        self.seen.insert(id);
        self.elements.insert(index, field);
        log::debug!("store: add {id} at {index}");
        self.notify(StoreEvent::Added { id, index });
    }

    /// Remove the field with `id`, returning its former index and value.
    /// Absent ids are a no-op.
    pub fn remove(&mut self, id: FieldId) -> Option<(usize, FieldInstance)> {
        let index = self.index_of(id)?;
        let field = self.elements.remove(index);
        log::debug!("store: remove {id} from {index}");
        self.notify(StoreEvent::Removed { id, index });
        Some((index, field))
    }

    /// Replace the attributes of `id`, keeping its id, kind and position.
    /// Returns the previous attributes; absent ids are a no-op.
    pub fn update(&mut self, id: FieldId, attrs: FieldAttributes) -> Option<FieldAttributes> {
        let index = self.index_of(id)?;
        let old = std::mem::replace(&mut self.elements[index].attrs, attrs);
        log::debug!("store: update {id}");
        self.notify(StoreEvent::Updated { id, index });
        Some(old)
    }

    /// Array-move: take the field at `from` out and reinsert it at `to`.
    /// Out-of-range indices and `from == to` are no-ops.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.elements.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let field = self.elements.remove(from);
        let id = field.id();
        self.elements.insert(to, field);
        log::debug!("store: move {id} {from} -> {to}");
        self.notify(StoreEvent::Moved { id, from, to });
        true
    }

    /// Replace the whole list. The caller is responsible for handing over a
    /// list without duplicate ids.
    pub fn set_all(&mut self, elements: Vec<FieldInstance>) {
        self.seen.extend(elements.iter().map(FieldInstance::id));
        self.elements = elements;
        log::debug!("store: replace all ({} fields)", self.elements.len());
        self.notify(StoreEvent::Replaced);
    }

    // ─── Subscriptions ───────────────────────────────────────────────────

    /// Register a listener called after every applied mutation. The
    /// listener stays registered while the returned handle is alive.
    pub fn subscribe(&self, listener: StoreListener) -> Subscription {
        self.listeners.borrow_mut().push(Rc::clone(&listener));
        Subscription {
            listener,
            listeners: Rc::clone(&self.listeners),
        }
    }

    fn notify(&self, event: StoreEvent) {
        // Clone the list so a listener dropping its own subscription
        // doesn't hit an outstanding borrow.
        let listeners = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&event, &self.elements);
        }
    }
}
