//! Core data model for form templates under construction.
//!
//! A template is an ordered list of `FieldInstance`s. Each instance has a
//! fixed identity (`FieldId`) and kind (`FieldKind`); everything else lives
//! in `FieldAttributes` and is replaced wholesale on edit. A `FieldDraft` is
//! the same shape without identity: what a palette drag carries before the
//! drop is committed.

use crate::id::FieldId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Ordered choices for `select` / `multi-select` fields.
pub type Options = SmallVec<[String; 4]>;

// ─── Field kinds ─────────────────────────────────────────────────────────

/// The closed set of field kinds the builder knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    String,
    Number,
    Date,
    Boolean,
    Select,
    MultiSelect,
    Image,
    File,
    Signature,
}

impl FieldKind {
    /// Every kind, in toolbox order.
    pub const ALL: [FieldKind; 9] = [
        FieldKind::String,
        FieldKind::Number,
        FieldKind::Date,
        FieldKind::Boolean,
        FieldKind::Select,
        FieldKind::MultiSelect,
        FieldKind::Image,
        FieldKind::File,
        FieldKind::Signature,
    ];

    /// Wire tag (`"multi-select"`, `"string"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Boolean => "boolean",
            FieldKind::Select => "select",
            FieldKind::MultiSelect => "multi-select",
            FieldKind::Image => "image",
            FieldKind::File => "file",
            FieldKind::Signature => "signature",
        }
    }

    /// Parse a wire tag. Returns `None` for unknown tags.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }

    /// Prefix for generated IDs: the identifier-safe form of the tag.
    pub const fn id_prefix(self) -> &'static str {
        match self {
            FieldKind::MultiSelect => "multi_select",
            other => other.as_str(),
        }
    }

    /// Whether instances of this kind carry a list of options.
    pub const fn has_options(self) -> bool {
        matches!(self, FieldKind::Select | FieldKind::MultiSelect)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Attributes ──────────────────────────────────────────────────────────

/// One editable attribute of a field. Used by the catalog to declare what a
/// kind supports and by validation to point at the offending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Label,
    Placeholder,
    Description,
    Options,
    Required,
}

impl Attribute {
    pub const fn as_str(self) -> &'static str {
        match self {
            Attribute::Label => "label",
            Attribute::Placeholder => "placeholder",
            Attribute::Description => "description",
            Attribute::Options => "options",
            Attribute::Required => "required",
        }
    }
}

/// The mutable part of a field. Replaced as a whole on commit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAttributes {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
}

impl FieldAttributes {
    /// `required` with a missing value read as `false`.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

// ─── Drafts & instances ──────────────────────────────────────────────────

/// A field without identity: the drag preview, or the output of
/// `catalog::construct`. Becomes a `FieldInstance` only via `commit`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDraft {
    pub kind: FieldKind,
    pub attrs: FieldAttributes,
}

impl FieldDraft {
    /// Attach an identity, producing a committed instance.
    pub fn commit(self, id: FieldId) -> FieldInstance {
        FieldInstance {
            id,
            kind: self.kind,
            attrs: self.attrs,
        }
    }
}

/// One concrete field on the canvas.
///
/// `id` and `kind` are fixed at creation and only readable; the attributes
/// are public and replaced through `ElementStore::update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInstance {
    id: FieldId,
    #[serde(rename = "type")]
    kind: FieldKind,
    #[serde(flatten)]
    pub attrs: FieldAttributes,
}

impl FieldInstance {
    pub fn new(id: FieldId, kind: FieldKind, attrs: FieldAttributes) -> Self {
        Self { id, kind, attrs }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Identity-free copy, e.g. for a drag preview of an existing element.
    pub fn to_draft(&self) -> FieldDraft {
        FieldDraft {
            kind: self.kind,
            attrs: self.attrs.clone(),
        }
    }
}
