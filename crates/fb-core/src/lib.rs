pub mod catalog;
pub mod error;
pub mod id;
pub mod model;
pub mod store;
pub mod template;
pub mod validate;
pub mod view;

pub use catalog::CatalogEntry;
pub use error::{SaveError, TemplateError};
pub use id::FieldId;
pub use model::*;
pub use store::{ElementStore, StoreEvent, StoreListener, Subscription};
pub use template::{
    BuilderDocument, ExistingTemplate, MimeType, SaveRequest, TemplateField, TemplateMeta,
    TemplateSink,
};
pub use validate::{FieldIssue, ValidationIssue};
pub use view::{FieldView, ViewKind, Widget};
