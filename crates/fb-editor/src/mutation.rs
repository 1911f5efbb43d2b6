//! Store mutations issued by the drag coordinator and the property editor.
//!
//! Components never write to the `ElementStore` directly; they describe the
//! change as a `StoreMutation`, and the session applies it (through the
//! command stack, so it can be undone).

use fb_core::id::FieldId;
use fb_core::model::{FieldAttributes, FieldInstance};
use fb_core::store::ElementStore;

/// A change to the element collection.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreMutation {
    /// Insert a committed field. `index: None` appends.
    AddField {
        index: Option<usize>,
        field: Box<FieldInstance>,
    },
    RemoveField {
        id: FieldId,
    },
    /// Replace all attributes of a field.
    UpdateField {
        id: FieldId,
        attrs: Box<FieldAttributes>,
    },
    /// Array-move `id` to position `to`.
    MoveField {
        id: FieldId,
        to: usize,
    },
    /// Replace the whole collection.
    ReplaceAll {
        fields: Vec<FieldInstance>,
    },
}

impl StoreMutation {
    /// The field this mutation targets, if it targets exactly one.
    pub fn target(&self) -> Option<FieldId> {
        match self {
            StoreMutation::AddField { field, .. } => Some(field.id()),
            StoreMutation::RemoveField { id }
            | StoreMutation::UpdateField { id, .. }
            | StoreMutation::MoveField { id, .. } => Some(*id),
            StoreMutation::ReplaceAll { .. } => None,
        }
    }
}

/// Apply one mutation. Returns `true` if the store changed.
///
/// Targets that vanished since the mutation was built are skipped.
pub fn apply_mutation(store: &mut ElementStore, mutation: StoreMutation) -> bool {
    match mutation {
        StoreMutation::AddField { index, field } => {
            let index = index.unwrap_or(store.len());
            if index > store.len() {
                log::debug!("add {} at stale index {index}, skipped", field.id());
                return false;
            }
            store.insert(index, *field);
            true
        }
        StoreMutation::RemoveField { id } => store.remove(id).is_some(),
        StoreMutation::UpdateField { id, attrs } => store.update(id, *attrs).is_some(),
        StoreMutation::MoveField { id, to } => match store.index_of(id) {
            Some(from) => store.reorder(from, to),
            None => false,
        },
        StoreMutation::ReplaceAll { fields } => {
            store.set_all(fields);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::catalog;
    use fb_core::model::FieldKind;

    fn field(id: &str) -> FieldInstance {
        catalog::construct(FieldKind::String).commit(FieldId::intern(id))
    }

    #[test]
    fn add_appends_or_inserts() {
        let mut store = ElementStore::new();
        assert!(apply_mutation(
            &mut store,
            StoreMutation::AddField {
                index: None,
                field: Box::new(field("mu_a")),
            }
        ));
        assert!(apply_mutation(
            &mut store,
            StoreMutation::AddField {
                index: Some(0),
                field: Box::new(field("mu_b")),
            }
        ));
        let ids: Vec<_> = store.ids().iter().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["mu_b", "mu_a"]);
    }

    #[test]
    fn stale_targets_are_skipped() {
        let mut store = ElementStore::new();
        assert!(!apply_mutation(
            &mut store,
            StoreMutation::AddField {
                index: Some(3),
                field: Box::new(field("mu_c")),
            }
        ));
        assert!(!apply_mutation(
            &mut store,
            StoreMutation::MoveField {
                id: FieldId::intern("mu_gone"),
                to: 0,
            }
        ));
        assert!(store.is_empty());
    }
}
