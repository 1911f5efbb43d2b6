//! Template payload: the boundary with the template-storage service.
//!
//! - **Outbound**: the canvas is exported as an ordered list of
//!   `TemplateField`s and wrapped with the header into a `SaveRequest`.
//! - **Inbound**: a saved template's fields are turned back into
//!   `FieldInstance`s with their names kept as ids.
//!
//! Storage itself is behind the `TemplateSink` trait.

use crate::error::{SaveError, TemplateError};
use crate::id::FieldId;
use crate::model::{FieldAttributes, FieldInstance, FieldKind, Options};
use crate::store::ElementStore;
use crate::validate::{parse_tags, validate_meta};
use serde::{Deserialize, Serialize};

// ─── Persisted types ─────────────────────────────────────────────────────

/// Field type tag as understood by the storage service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistedFieldType {
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

/// Translate a builder kind into a storage type. Kinds without a storage
/// counterpart map to `None` and are left out of exports.
pub fn persisted_type(kind: FieldKind) -> Option<PersistedFieldType> {
    Some(match kind {
        FieldKind::String => PersistedFieldType::String,
        FieldKind::Number => PersistedFieldType::Number,
        FieldKind::Date => PersistedFieldType::Date,
        FieldKind::Boolean => PersistedFieldType::Boolean,
        FieldKind::Select => PersistedFieldType::Select,
        FieldKind::MultiSelect => PersistedFieldType::MultiSelect,
        FieldKind::Image => PersistedFieldType::Image,
        FieldKind::File => PersistedFieldType::File,
        FieldKind::Signature => PersistedFieldType::Signature,
    })
}

impl PersistedFieldType {
    pub fn field_kind(self) -> FieldKind {
        match self {
            PersistedFieldType::String => FieldKind::String,
            PersistedFieldType::Number => FieldKind::Number,
            PersistedFieldType::Date => FieldKind::Date,
            PersistedFieldType::Boolean => FieldKind::Boolean,
            PersistedFieldType::Select => FieldKind::Select,
            PersistedFieldType::MultiSelect => FieldKind::MultiSelect,
            PersistedFieldType::Image => FieldKind::Image,
            PersistedFieldType::File => FieldKind::File,
            PersistedFieldType::Signature => FieldKind::Signature,
        }
    }
}

/// Mime types a template document may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MimeType {
    #[serde(rename = "text/plain")]
    TextPlain,
    #[serde(rename = "application/pdf")]
    ApplicationPdf,
    #[serde(rename = "text/csv")]
    TextCsv,
    #[serde(rename = "text/html")]
    TextHtml,
    #[serde(rename = "text/markdown")]
    TextMarkdown,
    #[default]
    #[serde(rename = "application/json")]
    ApplicationJson,
    #[serde(rename = "image/png")]
    ImagePng,
    #[serde(rename = "image/jpeg")]
    ImageJpeg,
    #[serde(rename = "audio/mpeg")]
    AudioMpeg,
    #[serde(rename = "audio/wav")]
    AudioWav,
    #[serde(rename = "video/mp4")]
    VideoMp4,
}

// ─── Field payload ───────────────────────────────────────────────────────

/// One field as stored by the template service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateField {
    /// The builder's field id.
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: PersistedFieldType,
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl TemplateField {
    fn from_instance(field: &FieldInstance) -> Option<Self> {
        let field_type = persisted_type(field.kind())?;
        let attrs = &field.attrs;
        Some(Self {
            name: field.id().to_string(),
            label: attrs.label.clone(),
            field_type,
            required: attrs.is_required(),
            options: attrs.options.as_ref().map(|o| o.to_vec()).unwrap_or_default(),
            description: attrs.description.clone().unwrap_or_default(),
            default_value: None,
        })
    }

    /// Rebuild the builder instance, keeping `name` as its id.
    pub fn to_instance(&self) -> FieldInstance {
        let kind = self.field_type.field_kind();
        let options = kind
            .has_options()
            .then(|| self.options.iter().cloned().collect::<Options>());
        FieldInstance::new(
            FieldId::intern(&self.name),
            kind,
            FieldAttributes {
                label: self.label.clone(),
                required: Some(self.required),
                placeholder: None,
                description: Some(self.description.clone()),
                options,
            },
        )
    }
}

/// Export the canvas in order, skipping kinds with no storage type.
pub fn export_fields(fields: &[FieldInstance]) -> Vec<TemplateField> {
    fields.iter().filter_map(TemplateField::from_instance).collect()
}

/// Load a saved field list into a fresh store.
pub fn import_fields(fields: &[TemplateField]) -> Result<ElementStore, TemplateError> {
    ElementStore::from_elements(fields.iter().map(TemplateField::to_instance).collect())
}

/// Raw element list as pretty JSON, for inspection.
pub fn fields_to_json(fields: &[FieldInstance]) -> Result<String, TemplateError> {
    Ok(serde_json::to_string_pretty(fields)?)
}

// ─── Header & save request ───────────────────────────────────────────────

/// Template header edited next to the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateMeta {
    pub name: String,
    pub description: String,
    pub version: String,
    pub is_public: bool,
    /// Comma-separated, as typed.
    pub tags: String,
    pub language: String,
    /// Mime type of an attached source document, if one was picked.
    pub attachment_mime: Option<MimeType>,
}

impl Default for TemplateMeta {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            version: "1.0".to_string(),
            is_public: true,
            tags: String::new(),
            language: "en".to_string(),
            attachment_mime: None,
        }
    }
}

/// The template being edited, when the builder was opened on a saved one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingTemplate {
    pub id: u64,
    pub mime_type: MimeType,
}

/// Body sent to the storage service on create or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub name: String,
    pub description: String,
    pub fields: Vec<TemplateField>,
    pub is_public: bool,
    pub version: String,
    pub mime_type: MimeType,
    pub language: String,
    pub tags: Vec<String>,
}

/// Assemble the request without permission or header checks.
pub fn build_request(
    meta: &TemplateMeta,
    fields: &[FieldInstance],
    existing: Option<&ExistingTemplate>,
) -> SaveRequest {
    let mime_type = meta
        .attachment_mime
        .or(existing.map(|t| t.mime_type))
        .unwrap_or_default();
    SaveRequest {
        name: meta.name.clone(),
        description: meta.description.clone(),
        fields: export_fields(fields),
        is_public: meta.is_public,
        version: meta.version.clone(),
        mime_type,
        language: meta.language.clone(),
        tags: parse_tags(&meta.tags),
    }
}

/// Permission gate and header validation, then `build_request`.
pub fn prepare_save(
    meta: &TemplateMeta,
    fields: &[FieldInstance],
    existing: Option<&ExistingTemplate>,
    can_commit: bool,
) -> Result<SaveRequest, SaveError> {
    if !can_commit {
        return Err(SaveError::PermissionDenied);
    }
    let issues = validate_meta(meta);
    if !issues.is_empty() {
        return Err(SaveError::Invalid(issues));
    }
    Ok(build_request(meta, fields, existing))
}

// ─── Storage ─────────────────────────────────────────────────────────────

/// What the storage service returns for a saved template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTemplate {
    pub id: u64,
    pub name: String,
}

/// The external template-storage service.
pub trait TemplateSink {
    fn create(&mut self, request: &SaveRequest) -> Result<SavedTemplate, SaveError>;
    fn update(&mut self, id: u64, request: &SaveRequest) -> Result<SavedTemplate, SaveError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(SavedTemplate),
    Updated(SavedTemplate),
}

/// Update when editing a saved template, create otherwise.
pub fn dispatch_save(
    sink: &mut dyn TemplateSink,
    request: &SaveRequest,
    existing: Option<&ExistingTemplate>,
) -> Result<SaveOutcome, SaveError> {
    match existing {
        Some(t) => sink.update(t.id, request).map(SaveOutcome::Updated),
        None => sink.create(request).map(SaveOutcome::Created),
    }
}

// ─── Documents ───────────────────────────────────────────────────────────

/// A builder state on disk: header, canvas, and the template it edits.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderDocument {
    #[serde(default)]
    pub meta: TemplateMeta,
    #[serde(default)]
    pub fields: Vec<FieldInstance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing: Option<ExistingTemplate>,
}

impl BuilderDocument {
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use pretty_assertions::assert_eq;

    fn named(id: &str, kind: FieldKind, label: &str) -> FieldInstance {
        let mut draft = catalog::construct(kind);
        draft.attrs.label = label.to_string();
        draft.commit(FieldId::intern(id))
    }

    #[test]
    fn export_uses_id_as_name_and_fills_defaults() {
        let mut pick = named("tpl_pick", FieldKind::Select, "Colour");
        pick.attrs.options = Some(["Red", "Blue"].iter().map(|s| s.to_string()).collect());
        let mut sig = named("tpl_sig", FieldKind::Signature, "Sign here");
        sig.attrs.required = None;
        sig.attrs.description = None;

        let out = export_fields(&[pick, sig]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "tpl_pick");
        assert_eq!(out[0].field_type, PersistedFieldType::Select);
        assert_eq!(out[0].options, vec!["Red", "Blue"]);
        assert!(!out[1].required);
        assert_eq!(out[1].description, "");
        assert!(out[1].options.is_empty());
    }

    #[test]
    fn template_field_json_shape() {
        let out = export_fields(&[named("tpl_ms", FieldKind::MultiSelect, "Hobbies")]);
        let json = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "tpl_ms",
                "label": "Hobbies",
                "type": "multi-select",
                "required": false,
                "options": [],
                "description": ""
            })
        );
    }

    #[test]
    fn import_keeps_names_as_ids() {
        let saved = export_fields(&[
            named("imp_a", FieldKind::String, "First"),
            named("imp_b", FieldKind::Select, "Pick"),
        ]);
        let store = import_fields(&saved).unwrap();
        let ids: Vec<_> = store.ids().iter().map(|id| id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["imp_a", "imp_b"]);
        assert_eq!(store.elements()[1].attrs.options.as_ref().map(|o| o.len()), Some(0));
        assert_eq!(store.elements()[0].attrs.options, None);
    }

    #[test]
    fn mime_type_fallback_chain() {
        let mut meta = TemplateMeta::default();
        let existing = ExistingTemplate {
            id: 7,
            mime_type: MimeType::ApplicationPdf,
        };
        assert_eq!(build_request(&meta, &[], None).mime_type, MimeType::ApplicationJson);
        assert_eq!(
            build_request(&meta, &[], Some(&existing)).mime_type,
            MimeType::ApplicationPdf
        );
        meta.attachment_mime = Some(MimeType::TextMarkdown);
        assert_eq!(
            build_request(&meta, &[], Some(&existing)).mime_type,
            MimeType::TextMarkdown
        );
    }

    #[test]
    fn request_splits_tags() {
        let meta = TemplateMeta {
            name: "Intake".into(),
            tags: "hr, onboarding,, ".into(),
            ..Default::default()
        };
        let req = build_request(&meta, &[], None);
        assert_eq!(req.tags, vec!["hr", "onboarding"]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["isPublic"], true);
        assert_eq!(json["mimeType"], "application/json");
    }

    #[test]
    fn prepare_save_checks_permission_first() {
        let meta = TemplateMeta::default();
        assert!(matches!(
            prepare_save(&meta, &[], None, false),
            Err(SaveError::PermissionDenied)
        ));
        assert!(matches!(
            prepare_save(&meta, &[], None, true),
            Err(SaveError::Invalid(ref issues)) if issues[0].field == "name"
        ));
    }

    #[test]
    fn document_defaults() {
        let doc = BuilderDocument::from_json("{}").unwrap();
        assert_eq!(doc.meta.version, "1.0");
        assert!(doc.fields.is_empty());
        assert!(BuilderDocument::from_json("{").is_err());
    }
}
