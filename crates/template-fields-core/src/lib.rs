//! Template field editor core
//!
//! Target-independent state and persistence for placing data-entry fields on
//! a rendered document template. The browser component in
//! `template-fields-wasm` wires this to the DOM, pdf.js and the remote store.

pub mod collection;
pub mod config;
pub mod controller;
pub mod coords;
pub mod editor;
pub mod error;
pub mod field;
pub mod inspector;
pub mod notify;
pub mod pager;
pub mod persistence;
pub mod store;

pub use collection::FieldCollection;
pub use config::{EditorConfig, FieldDefaults, StoreConfig};
pub use controller::{load_template, save_fields};
pub use coords::SurfacePoint;
pub use editor::{FieldEditor, LoadOutcome, LoadTicket, SaveTicket};
pub use error::{ConfigError, EditError, EditorError, RemoteError, RemoteOperation};
pub use field::{Field, FieldAttribute, FieldEdit, FieldKind, Template};
pub use inspector::Inspector;
pub use notify::{Notice, NoticeLevel, NoticeLog, Notifier};
pub use pager::PageNavigator;
pub use persistence::{load_fields_for_template, replace_fields_for_template, ReplaceReport};
pub use store::{FieldStore, MemoryFieldStore, NewField, StoredField};
