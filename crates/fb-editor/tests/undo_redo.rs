//! Integration tests: undo/redo through a builder session opened on a
//! saved document.

use fb_core::id::FieldId;
use fb_core::model::Attribute;
use fb_core::template::BuilderDocument;
use fb_editor::input::{InputEvent, Modifiers};
use fb_editor::session::{BuilderConfig, BuilderSession};
use fb_editor::shortcuts::ShortcutAction;
use pretty_assertions::assert_eq;

fn open() -> BuilderSession {
    let doc = BuilderDocument::from_json(include_str!("fixtures/onboarding.json")).unwrap();
    BuilderSession::from_document(doc, BuilderConfig::default()).unwrap()
}

fn names(session: &BuilderSession) -> Vec<&'static str> {
    session.store().ids().iter().map(|id| id.as_str()).collect()
}

const CMD: Modifiers = Modifiers {
    ctrl: true,
    ..Modifiers::NONE
};

const CMD_SHIFT: Modifiers = Modifiers {
    ctrl: true,
    shift: true,
    ..Modifiers::NONE
};

#[test]
fn opened_document_keeps_ids_and_order() {
    let session = open();
    assert_eq!(names(&session), vec!["full_name", "start_date", "department", "signature"]);
    assert!(!session.can_undo());
    assert_eq!(session.existing().map(|t| t.id), Some(42));
}

#[test]
fn undo_walks_back_through_mixed_edits() {
    let mut session = open();
    let signature = FieldId::intern("signature");

    session.select(Some(signature));
    session.set_required(false);
    session.handle_key("ArrowUp", Modifiers { alt: true, ..Modifiers::NONE });
    session.remove(FieldId::intern("start_date"));
    assert_eq!(names(&session), vec!["full_name", "signature", "department"]);

    assert!(session.undo());
    assert_eq!(names(&session), vec!["full_name", "start_date", "signature", "department"]);
    assert!(session.undo());
    assert_eq!(names(&session), vec!["full_name", "start_date", "department", "signature"]);
    assert!(session.undo());
    assert_eq!(session.store().get(signature).unwrap().attrs.required, Some(true));
    assert!(!session.undo());
}

#[test]
fn shortcuts_drive_undo_and_redo() {
    let mut session = open();
    session.select(Some(FieldId::intern("department")));
    assert_eq!(
        session.handle_key("Delete", Modifiers::NONE),
        Some((ShortcutAction::Delete, true))
    );
    assert_eq!(session.elements().len(), 3);

    assert_eq!(session.handle_key("z", CMD), Some((ShortcutAction::Undo, true)));
    assert_eq!(session.elements().len(), 4);

    assert_eq!(session.handle_key("z", CMD_SHIFT), Some((ShortcutAction::Redo, true)));
    assert_eq!(session.elements().len(), 3);

    assert_eq!(session.handle_key("y", CMD), Some((ShortcutAction::Redo, false)));
    assert_eq!(session.handle_key("q", Modifiers::NONE), None);
}

#[test]
fn new_edit_clears_redo() {
    let mut session = open();
    let name = FieldId::intern("full_name");
    session.select(Some(name));
    session.edit(Attribute::Label, "Legal name");
    session.blur();
    session.undo();
    assert!(session.can_redo());

    session.edit(Attribute::Description, "As on your passport");
    assert!(session.blur());
    assert!(!session.can_redo());
    assert_eq!(
        session.store().get(name).unwrap().attrs.description.as_deref(),
        Some("As on your passport")
    );
}

#[test]
fn undo_depth_is_bounded() {
    let doc = BuilderDocument::from_json(include_str!("fixtures/onboarding.json")).unwrap();
    let mut session = BuilderSession::from_document(doc, BuilderConfig { undo_depth: 2 }).unwrap();
    for _ in 0..4 {
        session.handle_input(&InputEvent::drag_from_palette(fb_core::model::FieldKind::File));
        session.handle_input(&InputEvent::drop_on_canvas());
    }
    assert!(session.undo());
    assert!(session.undo());
    assert!(!session.undo());
    assert_eq!(session.elements().len(), 6);
}

#[test]
fn clear_and_undo_restores_document() {
    let mut session = open();
    let before = session.document();
    assert!(session.clear());
    assert!(session.elements().is_empty());
    assert!(session.undo());
    assert_eq!(session.document(), before);
}
