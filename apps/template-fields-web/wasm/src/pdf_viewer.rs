//! pdf.js integration for the document display surface

use js_sys::Reflect;
use std::cell::Cell;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

// External JavaScript functions from pdf-bridge.js
#[wasm_bindgen(module = "/www/js/pdf-bridge.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = initPdfJs)]
    async fn init_pdf_js_internal(worker_src: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = loadDocumentFromUrl)]
    async fn load_document_from_url_internal(url: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = renderPage)]
    async fn render_page_internal(
        page_num: u32,
        canvas: &HtmlCanvasElement,
        scale: f64,
    ) -> Result<JsValue, JsValue>;
}

/// Default pdf.js worker, matching the pdf.js build the host page loads
pub const DEFAULT_WORKER_SRC: &str =
    "https://cdn.jsdelivr.net/npm/pdfjs-dist@3.11.174/build/pdf.worker.min.js";

/// Renders one page of a document at a time and reports its page count
#[derive(Debug, Default)]
pub struct DocumentSurface {
    page_count: Cell<u32>,
}

impl DocumentSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and parse the document at `url`, returning its page count
    pub async fn load(&self, url: &str) -> Result<u32, JsValue> {
        self.page_count.set(0);
        let doc = load_document_from_url_internal(url).await?;

        let num_pages = Reflect::get(&doc, &JsValue::from_str("numPages"))?
            .as_f64()
            .ok_or_else(|| JsValue::from_str("Document did not report a page count"))?;

        let count = num_pages as u32;
        self.page_count.set(count);
        Ok(count)
    }

    pub fn page_count(&self) -> u32 {
        self.page_count.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.page_count.get() > 0
    }

    /// Render `page_num` into `canvas` at `scale`
    pub async fn render_page(
        &self,
        page_num: u32,
        canvas: &HtmlCanvasElement,
        scale: f64,
    ) -> Result<(), JsValue> {
        self.check_page(page_num)?;
        render_page_internal(page_num, canvas, scale).await?;
        Ok(())
    }

    fn check_page(&self, page_num: u32) -> Result<(), JsValue> {
        if !self.is_loaded() {
            return Err(JsValue::from_str("No document loaded"));
        }
        if page_num < 1 || page_num > self.page_count() {
            return Err(JsValue::from_str(&format!(
                "Invalid page number: {} (document has {} pages)",
                page_num,
                self.page_count()
            )));
        }
        Ok(())
    }
}

/// Initialize PDF.js with the default worker.
/// Must be called before any document is loaded.
#[wasm_bindgen(js_name = initPdfJs)]
pub async fn init_pdf_js() -> Result<(), JsValue> {
    init_pdf_js_internal(DEFAULT_WORKER_SRC).await?;
    Ok(())
}

/// Initialize PDF.js with a custom worker URL
#[wasm_bindgen(js_name = initPdfJsWithWorker)]
pub async fn init_pdf_js_with_worker(worker_src: &str) -> Result<(), JsValue> {
    init_pdf_js_internal(worker_src).await?;
    Ok(())
}


#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_check_page_requires_document() {
        let surface = DocumentSurface::new();
        assert!(surface.check_page(1).is_err());
    }

    #[wasm_bindgen_test]
    fn test_check_page_bounds() {
        let surface = DocumentSurface::new();
        surface.page_count.set(3);
        assert!(surface.check_page(0).is_err());
        assert!(surface.check_page(1).is_ok());
        assert!(surface.check_page(3).is_ok());
        assert!(surface.check_page(4).is_err());
    }
}
