//! Field catalog: one immutable entry per `FieldKind`.
//!
//! The catalog is total over `FieldKind`: every lookup is an exhaustive
//! `match`, so adding a kind fails to compile until it has an entry here.

use crate::model::{Attribute, FieldAttributes, FieldDraft, FieldInstance, FieldKind, Options};
use crate::view::{FieldView, ViewKind, render_view};

/// Display metadata and construction rule for one field kind.
#[derive(Debug)]
pub struct CatalogEntry {
    pub kind: FieldKind,
    /// Toolbox button text.
    pub label: &'static str,
    /// Icon reference understood by the front end (lucide icon name).
    pub icon: &'static str,
    /// Sample label shown as a hint while the real label is empty.
    pub example_label: &'static str,
    /// Attributes the property editor exposes for this kind.
    pub editable: &'static [Attribute],
    placeholder: Option<&'static str>,
}

const TEXT_LIKE: &[Attribute] = &[
    Attribute::Label,
    Attribute::Placeholder,
    Attribute::Description,
    Attribute::Required,
];

const CHOICE: &[Attribute] = &[
    Attribute::Label,
    Attribute::Placeholder,
    Attribute::Description,
    Attribute::Options,
    Attribute::Required,
];

const PLAIN: &[Attribute] = &[Attribute::Label, Attribute::Description, Attribute::Required];

static STRING: CatalogEntry = CatalogEntry {
    kind: FieldKind::String,
    label: "Text",
    icon: "type",
    example_label: "First Name",
    editable: TEXT_LIKE,
    placeholder: Some("Enter text"),
};

static NUMBER: CatalogEntry = CatalogEntry {
    kind: FieldKind::Number,
    label: "Number",
    icon: "hash",
    example_label: "Age",
    editable: TEXT_LIKE,
    placeholder: Some("0"),
};

static DATE: CatalogEntry = CatalogEntry {
    kind: FieldKind::Date,
    label: "Date",
    icon: "calendar",
    example_label: "Date of Birth",
    editable: TEXT_LIKE,
    placeholder: Some("Pick a date"),
};

static BOOLEAN: CatalogEntry = CatalogEntry {
    kind: FieldKind::Boolean,
    label: "Checkbox",
    icon: "check-square",
    example_label: "Are you a human?",
    editable: PLAIN,
    placeholder: None,
};

static SELECT: CatalogEntry = CatalogEntry {
    kind: FieldKind::Select,
    label: "Select",
    icon: "chevron-down-square",
    example_label: "Select your gender",
    editable: CHOICE,
    placeholder: Some("Select an option"),
};

static MULTI_SELECT: CatalogEntry = CatalogEntry {
    kind: FieldKind::MultiSelect,
    label: "Radio",
    icon: "list-checks",
    example_label: "Select hobbies",
    editable: CHOICE,
    placeholder: Some("Select options"),
};

static IMAGE: CatalogEntry = CatalogEntry {
    kind: FieldKind::Image,
    label: "Image",
    icon: "image",
    example_label: "Upload your PFP",
    editable: PLAIN,
    placeholder: None,
};

static FILE: CatalogEntry = CatalogEntry {
    kind: FieldKind::File,
    label: "File",
    icon: "paperclip",
    example_label: "Upload your resume",
    editable: PLAIN,
    placeholder: None,
};

static SIGNATURE: CatalogEntry = CatalogEntry {
    kind: FieldKind::Signature,
    label: "Signature",
    icon: "pen-square",
    example_label: "Sign a document",
    editable: PLAIN,
    placeholder: None,
};

/// Look up the entry for a kind.
pub fn get(kind: FieldKind) -> &'static CatalogEntry {
    match kind {
        FieldKind::String => &STRING,
        FieldKind::Number => &NUMBER,
        FieldKind::Date => &DATE,
        FieldKind::Boolean => &BOOLEAN,
        FieldKind::Select => &SELECT,
        FieldKind::MultiSelect => &MULTI_SELECT,
        FieldKind::Image => &IMAGE,
        FieldKind::File => &FILE,
        FieldKind::Signature => &SIGNATURE,
    }
}

/// Default attribute set for a new field of `kind`. Pure: same output on
/// every call.
pub fn construct(kind: FieldKind) -> FieldDraft {
    get(kind).construct()
}

/// Palette entries in toolbox order.
pub fn toolbox() -> impl Iterator<Item = &'static CatalogEntry> {
    FieldKind::ALL.into_iter().map(get)
}

impl CatalogEntry {
    pub fn construct(&self) -> FieldDraft {
        FieldDraft {
            kind: self.kind,
            attrs: FieldAttributes {
                label: String::new(),
                required: Some(false),
                placeholder: self.placeholder.map(str::to_string),
                description: Some(String::new()),
                options: self.kind.has_options().then(Options::new),
            },
        }
    }

    pub fn supports(&self, attribute: Attribute) -> bool {
        self.editable.contains(&attribute)
    }

    /// Renderer hook: describe `field` for one of the three views.
    pub fn view(&self, view: ViewKind, field: &FieldInstance) -> FieldView {
        debug_assert_eq!(field.kind(), self.kind);
        render_view(self, view, &field.attrs)
    }

    /// Renderer hook for an uncommitted field, such as the drag overlay.
    pub fn view_draft(&self, view: ViewKind, draft: &FieldDraft) -> FieldView {
        debug_assert_eq!(draft.kind, self.kind);
        render_view(self, view, &draft.attrs)
    }
}
