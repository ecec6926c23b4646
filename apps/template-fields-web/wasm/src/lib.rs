//! WASM bindings for the template field editor
//!
//! The browser half of the editor: it renders a template document with
//! pdf.js, draws field regions over it, binds an inspector form to the
//! selected field and persists the collection to a PostgREST store.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { TemplateFieldEditor, initPdfJs } from './pkg/template_fields_wasm.js';
//!
//! await init();
//! await initPdfJs();
//!
//! const editor = new TemplateFieldEditor(document.getElementById('editor'), {
//!   store: { url: SUPABASE_URL, api_key: SUPABASE_ANON_KEY },
//! });
//! await editor.setTemplate(template.id, template.file_url);
//! ```

pub mod component;
pub mod dom;
pub mod inspector;
pub mod logging;
pub mod overlay;
pub mod pdf_viewer;
pub mod rest_store;
pub mod toast;

use wasm_bindgen::prelude::*;

pub use component::TemplateFieldEditor;
pub use pdf_viewer::{init_pdf_js, init_pdf_js_with_worker, DocumentSurface};
pub use rest_store::RestFieldStore;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
