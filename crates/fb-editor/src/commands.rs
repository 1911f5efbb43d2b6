//! Undo/Redo command stack.
//!
//! Every store mutation is wrapped in a reversible `Command` that can be
//! undone. Commands are pushed to a stack; undo pops and applies the inverse.
//!
//! Multi-step edits (clearing the canvas) use **snapshot batching**: the
//! element list is captured at the start and end of the batch, so undo/redo
//! replaces the whole list in a single step.

use crate::mutation::{StoreMutation, apply_mutation};
use fb_core::model::FieldInstance;
use fb_core::store::ElementStore;

/// A command that captures both a forward mutation and its inverse.
#[derive(Debug, Clone)]
pub enum Command {
    /// Single mutation with its inverse.
    Single {
        forward: Box<StoreMutation>,
        inverse: Box<StoreMutation>,
        description: String,
    },
    /// Snapshot-based batch: the element list before and after.
    Snapshot {
        before: Vec<FieldInstance>,
        after: Vec<FieldInstance>,
        description: String,
    },
}

/// Manages undo/redo stacks with batch grouping.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Element list captured at the start of a batch.
    batch_snapshot: Option<Vec<FieldInstance>>,
    /// Whether any mutations occurred during the current batch.
    batch_dirty: bool,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
        }
    }

    /// Start a batch group. All mutations until `end_batch()` are applied
    /// live but tracked as one undo step.
    pub fn begin_batch(&mut self, store: &ElementStore) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(store.elements().to_vec());
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes, if the list
    /// actually changed, push one snapshot command.
    pub fn end_batch(&mut self, store: &ElementStore, description: &str) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            let before = self.batch_snapshot.take().unwrap_or_default();
            if self.batch_dirty && before.as_slice() != store.elements() {
                self.push(Command::Snapshot {
                    before,
                    after: store.elements().to_vec(),
                    description: description.to_string(),
                });
            }
            self.batch_dirty = false;
        }
    }

    /// Apply a mutation to the store and record it. Returns `true` if the
    /// store changed; no-op mutations leave no undo entry.
    pub fn execute(&mut self, store: &mut ElementStore, mutation: StoreMutation, description: &str) -> bool {
        if self.batch_depth > 0 {
            let changed = apply_mutation(store, mutation);
            self.batch_dirty |= changed;
            return changed;
        }

        let inverse = compute_inverse(store, &mutation);
        if !apply_mutation(store, mutation.clone()) {
            return false;
        }

        self.push(Command::Single {
            forward: Box::new(mutation),
            inverse: Box::new(inverse),
            description: description.to_string(),
        });
        true
    }

    /// Undo the last command. Returns its description.
    pub fn undo(&mut self, store: &mut ElementStore) -> Option<String> {
        let cmd = self.undo_stack.pop()?;
        let desc = match &cmd {
            Command::Single {
                inverse,
                description,
                ..
            } => {
                apply_mutation(store, *inverse.clone());
                description.clone()
            }
            Command::Snapshot {
                before,
                description,
                ..
            } => {
                store.set_all(before.clone());
                description.clone()
            }
        };
        self.redo_stack.push(cmd);
        Some(desc)
    }

    /// Redo the last undone command. Returns its description.
    pub fn redo(&mut self, store: &mut ElementStore) -> Option<String> {
        let cmd = self.redo_stack.pop()?;
        let desc = match &cmd {
            Command::Single {
                forward,
                description,
                ..
            } => {
                apply_mutation(store, *forward.clone());
                description.clone()
            }
            Command::Snapshot {
                after, description, ..
            } => {
                store.set_all(after.clone());
                description.clone()
            }
        };
        self.undo_stack.push(cmd);
        Some(desc)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn push(&mut self, cmd: Command) {
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        // Clear redo stack on new action
        self.redo_stack.clear();
    }
}

/// Compute the inverse mutation needed to undo `mutation`, from the store
/// state before it is applied.
fn compute_inverse(store: &ElementStore, mutation: &StoreMutation) -> StoreMutation {
    match mutation {
        StoreMutation::AddField { field, .. } => StoreMutation::RemoveField { id: field.id() },
        StoreMutation::RemoveField { id } => match store.index_of(*id) {
            Some(index) => StoreMutation::AddField {
                index: Some(index),
                field: Box::new(store.elements()[index].clone()),
            },
            None => StoreMutation::RemoveField { id: *id },
        },
        StoreMutation::UpdateField { id, .. } => {
            let old = store.get(*id).map(|f| f.attrs.clone()).unwrap_or_default();
            StoreMutation::UpdateField {
                id: *id,
                attrs: Box::new(old),
            }
        }
        StoreMutation::MoveField { id, to } => StoreMutation::MoveField {
            id: *id,
            to: store.index_of(*id).unwrap_or(*to),
        },
        StoreMutation::ReplaceAll { .. } => StoreMutation::ReplaceAll {
            fields: store.elements().to_vec(),
        },
    }
}
