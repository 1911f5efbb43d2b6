//! Property editor: the staged form behind the properties panel.
//!
//! Text inputs are staged in a `PropertyForm` and committed on blur, after
//! validation. The `required` toggle commits immediately. Both produce a
//! `StoreMutation::UpdateField` carrying the complete attribute set; the
//! field's id and kind are never touched.

use crate::mutation::StoreMutation;
use fb_core::catalog;
use fb_core::id::FieldId;
use fb_core::model::{Attribute, FieldAttributes, FieldInstance, FieldKind};
use fb_core::store::ElementStore;
use fb_core::validate::{AttributeInput, ValidationIssue, parse_options, validate_attributes};

/// Working values of the properties form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyForm {
    pub label: String,
    pub placeholder: String,
    pub description: String,
    /// Options as typed, comma-joined.
    pub options: String,
    pub required: bool,
}

impl PropertyForm {
    pub fn from_field(field: &FieldInstance) -> Self {
        let attrs = &field.attrs;
        Self {
            label: attrs.label.clone(),
            placeholder: attrs.placeholder.clone().unwrap_or_default(),
            description: attrs.description.clone().unwrap_or_default(),
            options: attrs.options.as_ref().map(|o| o.join(",")).unwrap_or_default(),
            required: attrs.is_required(),
        }
    }

    fn input(&self) -> AttributeInput<'_> {
        AttributeInput {
            label: &self.label,
            placeholder: &self.placeholder,
            description: &self.description,
        }
    }
}

#[derive(Debug, Default)]
pub struct PropertyEditor {
    target: Option<(FieldId, FieldKind)>,
    form: PropertyForm,
    dirty: bool,
    issues: Vec<ValidationIssue>,
}

impl PropertyEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the editor at a field, or at nothing. Working values are reset
    /// from the field; unsaved edits are discarded.
    pub fn select(&mut self, field: Option<&FieldInstance>) {
        if self.dirty {
            log::debug!("properties: discarding staged edits");
        }
        self.target = field.map(|f| (f.id(), f.kind()));
        self.form = field.map(PropertyForm::from_field).unwrap_or_default();
        self.dirty = false;
        self.issues.clear();
    }

    pub fn target(&self) -> Option<FieldId> {
        self.target.map(|(id, _)| id)
    }

    pub fn form(&self) -> &PropertyForm {
        &self.form
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Issues found by the last rejected commit.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn is_flagged(&self, attribute: Attribute) -> bool {
        self.issues.iter().any(|i| i.field == attribute.as_str())
    }

    /// Stage a text edit. Returns `false` when nothing is selected or the
    /// selected kind has no such input.
    pub fn set_text(&mut self, attribute: Attribute, value: &str) -> bool {
        let Some((_, kind)) = self.target else {
            return false;
        };
        if !catalog::get(kind).supports(attribute) {
            return false;
        }
        let slot = match attribute {
            Attribute::Label => &mut self.form.label,
            Attribute::Placeholder => &mut self.form.placeholder,
            Attribute::Description => &mut self.form.description,
            Attribute::Options => &mut self.form.options,
            Attribute::Required => return false,
        };
        value.clone_into(slot);
        self.dirty = true;
        true
    }

    /// Commit staged text edits. Returns `None` when there is nothing to
    /// commit, the field is gone, or validation fails (see `issues`).
    pub fn blur(&mut self, store: &ElementStore) -> Option<StoreMutation> {
        let (id, kind) = self.target?;
        if !self.dirty {
            return None;
        }
        let Some(current) = store.get(id) else {
            log::debug!("properties: {id} no longer on canvas");
            self.select(None);
            return None;
        };

        let issues = validate_attributes(kind, &self.form.input());
        if !issues.is_empty() {
            log::debug!("properties: commit to {id} rejected ({} issues)", issues.len());
            self.issues = issues;
            return None;
        }
        self.issues.clear();
        self.dirty = false;

        let attrs = self.committed_attrs(kind, &current.attrs);
        if attrs == current.attrs {
            return None;
        }
        Some(StoreMutation::UpdateField {
            id,
            attrs: Box::new(attrs),
        })
    }

    /// Commit the `required` toggle at once. Staged text edits stay staged.
    pub fn toggle_required(&mut self, required: bool, store: &ElementStore) -> Option<StoreMutation> {
        let (id, _) = self.target?;
        self.form.required = required;
        let current = store.get(id)?;
        if current.attrs.is_required() == required && current.attrs.required.is_some() {
            return None;
        }
        let attrs = FieldAttributes {
            required: Some(required),
            ..current.attrs.clone()
        };
        Some(StoreMutation::UpdateField {
            id,
            attrs: Box::new(attrs),
        })
    }

    fn committed_attrs(&self, kind: FieldKind, current: &FieldAttributes) -> FieldAttributes {
        let entry = catalog::get(kind);
        let form = &self.form;
        FieldAttributes {
            label: form.label.clone(),
            required: Some(form.required),
            placeholder: if entry.supports(Attribute::Placeholder) {
                Some(form.placeholder.clone())
            } else {
                current.placeholder.clone()
            },
            description: if entry.supports(Attribute::Description) {
                Some(form.description.clone())
            } else {
                current.description.clone()
            },
            options: if entry.supports(Attribute::Options) {
                Some(parse_options(&form.options))
            } else {
                current.options.clone()
            },
        }
    }
}
