//! Renderer-agnostic view descriptors.
//!
//! The catalog's three renderer hooks (designer preview, property editor,
//! runtime form) all resolve to a `FieldView`: which widget to draw and the
//! text around it. Front ends map `Widget` onto real controls.

use crate::catalog::CatalogEntry;
use crate::model::{Attribute, FieldAttributes, FieldKind};
use serde::Serialize;

/// Which of the three renderings is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewKind {
    /// Disabled preview on the builder canvas.
    Design,
    /// Attribute editing form for the selected field.
    Properties,
    /// Interactive control in a published form.
    Runtime,
}

/// The control a front end should draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "camelCase")]
pub enum Widget {
    TextInput,
    NumberInput,
    DatePicker,
    Switch,
    Select { options: Vec<String> },
    MultiSelect { options: Vec<String> },
    ImageDrop,
    FileDrop,
    SignaturePad,
    /// Property editor: one input per editable attribute, in catalog order.
    AttributeForm { attributes: Vec<Attribute> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub view: ViewKind,
    /// Toolbox label of the field kind ("Text", "Signature", ...).
    pub kind_label: &'static str,
    pub icon: &'static str,
    /// The field's own label, or the kind's example label while empty.
    pub label: String,
    /// Show the required marker (`*`).
    pub required: bool,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    /// Controls are disabled on the design canvas.
    pub disabled: bool,
    #[serde(flatten)]
    pub widget: Widget,
}

pub(crate) fn render_view(entry: &CatalogEntry, view: ViewKind, attrs: &FieldAttributes) -> FieldView {
    let label = if attrs.label.is_empty() {
        entry.example_label.to_string()
    } else {
        attrs.label.clone()
    };
    let widget = match view {
        ViewKind::Properties => Widget::AttributeForm {
            attributes: entry.editable.to_vec(),
        },
        ViewKind::Design | ViewKind::Runtime => widget_for(entry.kind, attrs),
    };

    FieldView {
        view,
        kind_label: entry.label,
        icon: entry.icon,
        label,
        required: attrs.is_required(),
        placeholder: attrs.placeholder.clone().filter(|p| !p.is_empty()),
        description: attrs.description.clone().filter(|d| !d.is_empty()),
        disabled: view == ViewKind::Design,
        widget,
    }
}

fn widget_for(kind: FieldKind, attrs: &FieldAttributes) -> Widget {
    let options = || attrs.options.as_ref().map(|o| o.to_vec()).unwrap_or_default();
    match kind {
        FieldKind::String => Widget::TextInput,
        FieldKind::Number => Widget::NumberInput,
        FieldKind::Date => Widget::DatePicker,
        FieldKind::Boolean => Widget::Switch,
        FieldKind::Select => Widget::Select { options: options() },
        FieldKind::MultiSelect => Widget::MultiSelect { options: options() },
        FieldKind::Image => Widget::ImageDrop,
        FieldKind::File => Widget::FileDrop,
        FieldKind::Signature => Widget::SignaturePad,
    }
}

/// Canvas header badge: "1 Field Added", "3 Fields Added".
pub fn fields_added_label(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} Field{plural} Added")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::id::FieldId;
    use crate::model::FieldInstance;

    fn field(kind: FieldKind) -> FieldInstance {
        catalog::construct(kind).commit(FieldId::intern("v"))
    }

    #[test]
    fn design_view_is_disabled_and_uses_example_label() {
        let f = field(FieldKind::Number);
        let v = catalog::get(FieldKind::Number).view(ViewKind::Design, &f);
        assert!(v.disabled);
        assert_eq!(v.label, "Age");
        assert_eq!(v.widget, Widget::NumberInput);
        assert_eq!(v.placeholder.as_deref(), Some("0"));
        assert_eq!(v.description, None);
    }

    #[test]
    fn runtime_select_carries_options() {
        let mut f = field(FieldKind::Select);
        f.attrs.options = Some(["Red", "Blue"].iter().map(|s| s.to_string()).collect());
        f.attrs.required = Some(true);
        let v = catalog::get(FieldKind::Select).view(ViewKind::Runtime, &f);
        assert!(!v.disabled);
        assert!(v.required);
        assert_eq!(
            v.widget,
            Widget::Select {
                options: vec!["Red".into(), "Blue".into()]
            }
        );
    }

    #[test]
    fn properties_view_lists_editable_attributes() {
        let f = field(FieldKind::Signature);
        let v = catalog::get(FieldKind::Signature).view(ViewKind::Properties, &f);
        assert_eq!(
            v.widget,
            Widget::AttributeForm {
                attributes: vec![Attribute::Label, Attribute::Description, Attribute::Required]
            }
        );
    }

    #[test]
    fn draft_renders_like_its_committed_field() {
        let draft = catalog::construct(FieldKind::Date);
        let entry = catalog::get(FieldKind::Date);
        let overlay = entry.view_draft(ViewKind::Design, &draft);
        assert_eq!(overlay, entry.view(ViewKind::Design, &draft.clone().commit(FieldId::intern("v"))));
        assert_eq!(overlay.widget, Widget::DatePicker);
        assert!(overlay.disabled);
    }

    #[test]
    fn fields_added_pluralizes() {
        assert_eq!(fields_added_label(1), "1 Field Added");
        assert_eq!(fields_added_label(3), "3 Fields Added");
    }
}
