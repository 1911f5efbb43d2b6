//! Integration tests: loading saved templates and exporting them back.

use fb_core::catalog;
use fb_core::error::TemplateError;
use fb_core::id::FieldId;
use fb_core::model::FieldKind;
use fb_core::template::{self, TemplateField, TemplateMeta};
use fb_core::validate;
use pretty_assertions::assert_eq;

fn saved() -> Vec<TemplateField> {
    serde_json::from_str(include_str!("fixtures/saved_fields.json")).unwrap()
}

#[test]
fn saved_fields_load_in_order_with_kinds() {
    let store = template::import_fields(&saved()).unwrap();
    let kinds: Vec<_> = store.elements().iter().map(|f| f.kind()).collect();
    assert_eq!(
        kinds,
        vec![FieldKind::String, FieldKind::MultiSelect, FieldKind::Boolean, FieldKind::File]
    );

    let hobbies = store.get(FieldId::intern("hobbies")).unwrap();
    assert_eq!(
        hobbies.attrs.options.as_ref().map(|o| o.to_vec()),
        Some(vec!["Reading".to_string(), "Climbing".to_string(), "Chess".to_string()])
    );
    let newsletter = store.get(FieldId::intern("newsletter")).unwrap();
    assert_eq!(newsletter.attrs.description.as_deref(), Some(""));
}

#[test]
fn export_after_import_keeps_payload_fields() {
    let fields = saved();
    let store = template::import_fields(&fields).unwrap();
    let exported = template::export_fields(store.elements());

    assert_eq!(exported.len(), fields.len());
    for (out, original) in exported.iter().zip(&fields) {
        assert_eq!(out.name, original.name);
        assert_eq!(out.label, original.label);
        assert_eq!(out.field_type, original.field_type);
        assert_eq!(out.required, original.required);
        assert_eq!(out.options, original.options);
        assert_eq!(out.description, original.description);
    }
}

#[test]
fn duplicate_names_are_rejected() {
    let fields: Vec<TemplateField> =
        serde_json::from_str(include_str!("fixtures/duplicate_names.json")).unwrap();
    let err = template::import_fields(&fields).unwrap_err();
    assert!(matches!(err, TemplateError::DuplicateFieldName(ref name) if name == "email"));
    assert_eq!(err.to_string(), "duplicate field name: email");
}

#[test]
fn new_fields_never_collide_with_loaded_names() {
    let mut store = template::import_fields(&saved()).unwrap();
    for _ in 0..20 {
        let id = store.fresh_id(FieldKind::String);
        assert!(!store.contains(id));
        store.add(catalog::construct(FieldKind::String).commit(id));
    }
    assert_eq!(store.len(), 24);
}

#[test]
fn loaded_fields_pass_validation() {
    let store = template::import_fields(&saved()).unwrap();
    assert_eq!(validate::check_fields(store.elements()), vec![]);
}

#[test]
fn request_carries_the_loaded_canvas() {
    let store = template::import_fields(&saved()).unwrap();
    let meta = TemplateMeta {
        name: "Membership".into(),
        tags: "clubs,  members".into(),
        ..Default::default()
    };
    let request = template::prepare_save(&meta, store.elements(), None, true).unwrap();
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["name"], "Membership");
    assert_eq!(json["version"], "1.0");
    assert_eq!(json["language"], "en");
    assert_eq!(json["tags"], serde_json::json!(["clubs", "members"]));
    assert_eq!(json["fields"][1]["type"], "multi-select");
    assert_eq!(json["fields"][3]["name"], "resume");
}
