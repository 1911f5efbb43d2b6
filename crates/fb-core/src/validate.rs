//! Validation rules for field attributes and the template header.
//!
//! Reports problems without modifying anything. The property editor uses
//! these to decide whether a staged edit may be committed; the CLI uses
//! `check_fields` to report on a whole document.

use crate::catalog;
use crate::id::FieldId;
use crate::model::{Attribute, FieldInstance, FieldKind, Options};
use crate::template::TemplateMeta;
use serde::Serialize;

pub const LABEL_MIN: usize = 2;
pub const LABEL_MAX: usize = 50;
pub const PLACEHOLDER_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 100;

pub const TEMPLATE_NAME_MAX: usize = 255;
pub const TEMPLATE_DESCRIPTION_MAX: usize = 1000;
pub const VERSION_MAX: usize = 50;
pub const LANGUAGE_MAX: usize = 10;

// ─── Issue types ─────────────────────────────────────────────────────────

/// A single rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// The input the issue points at (`"label"`, `"version"`, ...).
    pub field: &'static str,
    /// Short rule identifier (e.g. "too-short", "too-long").
    pub rule: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// A validation issue tied to a field on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub id: FieldId,
    #[serde(flatten)]
    pub issue: ValidationIssue,
}

/// Borrowed view of the text inputs of a property form.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeInput<'a> {
    pub label: &'a str,
    pub placeholder: &'a str,
    pub description: &'a str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Check the attributes `kind` supports. Unsupported attributes are ignored.
#[must_use]
pub fn validate_attributes(kind: FieldKind, input: &AttributeInput<'_>) -> Vec<ValidationIssue> {
    let entry = catalog::get(kind);
    let mut issues = Vec::new();
    check_range(&mut issues, Attribute::Label.as_str(), input.label, LABEL_MIN, LABEL_MAX);
    if entry.supports(Attribute::Placeholder) {
        check_max(&mut issues, Attribute::Placeholder.as_str(), input.placeholder, PLACEHOLDER_MAX);
    }
    if entry.supports(Attribute::Description) {
        check_max(&mut issues, Attribute::Description.as_str(), input.description, DESCRIPTION_MAX);
    }
    issues
}

/// Validate every field currently on the canvas.
#[must_use]
pub fn check_fields(fields: &[FieldInstance]) -> Vec<FieldIssue> {
    fields
        .iter()
        .flat_map(|field| {
            let attrs = &field.attrs;
            let input = AttributeInput {
                label: &attrs.label,
                placeholder: attrs.placeholder.as_deref().unwrap_or_default(),
                description: attrs.description.as_deref().unwrap_or_default(),
            };
            validate_attributes(field.kind(), &input)
                .into_iter()
                .map(|issue| FieldIssue {
                    id: field.id(),
                    issue,
                })
        })
        .collect()
}

/// Validate the template header.
#[must_use]
pub fn validate_meta(meta: &TemplateMeta) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if meta.name.is_empty() {
        issues.push(ValidationIssue {
            field: "name",
            rule: "required",
            message: "Template name is required".to_string(),
        });
    } else {
        check_max(&mut issues, "name", &meta.name, TEMPLATE_NAME_MAX);
    }
    check_max(&mut issues, "description", &meta.description, TEMPLATE_DESCRIPTION_MAX);
    if meta.version.is_empty() {
        issues.push(ValidationIssue {
            field: "version",
            rule: "required",
            message: "Version is required".to_string(),
        });
    } else {
        check_max(&mut issues, "version", &meta.version, VERSION_MAX);
    }
    check_max(&mut issues, "language", &meta.language, LANGUAGE_MAX);
    issues
}

/// Split a comma-joined option string into trimmed, non-empty entries.
/// Order and duplicates are kept.
pub fn parse_options(raw: &str) -> Options {
    split_list(raw).collect()
}

/// Same decomposition as `parse_options`, for template tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    split_list(raw).collect()
}

fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Length limits are measured in UTF-16 code units, the unit a browser's
/// `string.length` reports, so an emoji outside the BMP counts as two.
fn char_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn check_range(issues: &mut Vec<ValidationIssue>, field: &'static str, value: &str, min: usize, max: usize) {
    if char_len(value) < min {
        issues.push(ValidationIssue {
            field,
            rule: "too-short",
            message: format!("{field} must be at least {min} characters."),
        });
    } else {
        check_max(issues, field, value, max);
    }
}

fn check_max(issues: &mut Vec<ValidationIssue>, field: &'static str, value: &str, max: usize) {
    if char_len(value) > max {
        issues.push(ValidationIssue {
            field,
            rule: "too-long",
            message: format!("{field} must be at most {max} characters."),
        });
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
