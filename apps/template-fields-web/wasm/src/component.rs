//! The `TemplateFieldEditor` browser component
//!
//! Builds the editor's DOM inside a host container and wires UI events to
//! the core `FieldEditor`. All state lives in Rust; event listeners hold weak
//! references to the view so freeing the component from JS releases it.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use template_fields_core::{
    load_template, save_fields, EditorConfig, FieldAttribute, FieldEditor, LoadOutcome, Notice,
    Notifier, Template,
};
use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{
    Document, Event, EventTarget, HtmlButtonElement, HtmlCanvasElement, HtmlElement, MouseEvent,
};

use crate::dom;
use crate::inspector::InspectorForm;
use crate::logging;
use crate::overlay::{OverlayHit, OverlayLayer};
use crate::pdf_viewer::DocumentSurface;
use crate::rest_store::{js_error_message, RestFieldStore};
use crate::toast::ToastNotifier;

struct Toolbar {
    previous: HtmlButtonElement,
    label: HtmlElement,
    next: HtmlButtonElement,
    save: HtmlButtonElement,
}

impl Toolbar {
    fn build(document: &Document, parent: &HtmlElement) -> Result<Self, JsValue> {
        let root = dom::create(document, "div", "tf-toolbar")?;
        let previous = button(document, "tf-prev", "Previous")?;
        let label = dom::create(document, "span", "tf-page-label")?;
        let next = button(document, "tf-next", "Next")?;
        let save = button(document, "tf-save", "Save fields")?;

        root.append_child(&previous)?;
        root.append_child(&label)?;
        root.append_child(&next)?;
        root.append_child(&save)?;
        parent.append_child(&root)?;

        Ok(Self {
            previous,
            label,
            next,
            save,
        })
    }

    fn update(&self, editor: &FieldEditor) {
        let pager = editor.pager();
        self.previous.set_disabled(!pager.can_go_previous());
        self.next.set_disabled(!pager.can_go_next());
        self.save
            .set_disabled(editor.is_saving() || editor.template().is_none());
        self.label
            .set_text_content(Some(&page_label(pager.current(), pager.num_pages())));
    }
}

fn button(document: &Document, class: &str, text: &str) -> Result<HtmlButtonElement, JsValue> {
    let button: HtmlButtonElement = dom::create_as(document, "button", class)?;
    button.set_type("button");
    button.set_text_content(Some(text));
    Ok(button)
}

/// Issues one token per template selection; only the latest token's
/// document load may touch the surface or raise a notice
#[derive(Debug, Default)]
struct DocumentRequests {
    latest: Cell<u64>,
}

impl DocumentRequests {
    fn begin(&self) -> u64 {
        let token = self.latest.get().wrapping_add(1);
        self.latest.set(token);
        token
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest.get() == token
    }
}

fn page_label(current: u32, num_pages: Option<u32>) -> String {
    match num_pages {
        Some(total) => format!("Page {} of {}", current, total),
        None => format!("Page {}", current),
    }
}

struct EditorView {
    editor: RefCell<FieldEditor>,
    store: RestFieldStore,
    toasts: ToastNotifier,
    surface: DocumentSurface,
    render_scale: f64,
    canvas: HtmlCanvasElement,
    overlay: OverlayLayer,
    inspector: InspectorForm,
    toolbar: Toolbar,
    /// Bumped on every document load so a render of the old document is
    /// never mistaken for the new one
    document_generation: Cell<u32>,
    rendering: Cell<bool>,
    document_requests: DocumentRequests,
}

impl EditorView {
    fn build(container: &HtmlElement, config: EditorConfig) -> Result<Rc<Self>, JsValue> {
        let document = container
            .owner_document()
            .ok_or("Container is not attached to a document")?;

        let root = dom::create(&document, "div", "tf-editor")?;
        let toolbar = Toolbar::build(&document, &root)?;

        let body = dom::create(&document, "div", "tf-body")?;
        let stage = dom::create(&document, "div", "tf-stage")?;
        dom::set_styles(
            &stage,
            &[
                ("position", "relative".to_string()),
                ("display", "inline-block".to_string()),
            ],
        )?;
        let canvas: HtmlCanvasElement = dom::create_as(&document, "canvas", "tf-canvas")?;
        let overlay = OverlayLayer::new(&document)?;
        stage.append_child(&canvas)?;
        stage.append_child(overlay.element())?;
        body.append_child(&stage)?;

        let inspector = InspectorForm::build(&document)?;
        body.append_child(inspector.element())?;
        root.append_child(&body)?;

        let toast_container = dom::create(&document, "div", "tf-toasts")?;
        root.append_child(&toast_container)?;
        container.append_child(&root)?;

        Ok(Rc::new(Self {
            editor: RefCell::new(FieldEditor::new(config.fields.clone())),
            store: RestFieldStore::new(&config.store),
            toasts: ToastNotifier::new(document, toast_container, config.toast_duration_ms),
            surface: DocumentSurface::new(),
            render_scale: config.render_scale,
            canvas,
            overlay,
            inspector,
            toolbar,
            document_generation: Cell::new(0),
            rendering: Cell::new(false),
            document_requests: DocumentRequests::default(),
        }))
    }

    /// Redraw overlay, inspector and toolbar from the editor state
    fn refresh(&self) {
        let editor = self.editor.borrow();
        self.toolbar.update(&editor);
        let result = self.overlay.render(&editor).and_then(|()| {
            match editor.selected_field() {
                Some(field) => self.inspector.show(field),
                None => self.inspector.hide(),
            }
        });
        if let Err(e) = result {
            warn!(error = %js_error_message(&e), "Failed to redraw editor");
        }
    }

    /// Redraw the overlay only, leaving the inspector inputs as typed
    fn redraw_overlay(&self) {
        if let Err(e) = self.overlay.render(&self.editor.borrow()) {
            warn!(error = %js_error_message(&e), "Failed to redraw overlay");
        }
    }

    // ---- Template and document --------------------------------------------

    async fn select_template(&self, template: Template) -> Result<JsValue, JsValue> {
        let request = self.document_requests.begin();
        self.canvas.set_width(0);
        self.canvas.set_height(0);

        let outcome = load_template(&self.editor, &self.store, &self.toasts, template.clone()).await;
        self.refresh();
        self.load_document(request, &template).await;

        match outcome {
            Ok(LoadOutcome::Applied { count }) => Ok(JsValue::from(count as u32)),
            Ok(LoadOutcome::Stale) => Ok(JsValue::UNDEFINED),
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }

    async fn load_document(&self, request: u64, template: &Template) {
        if !self.document_requests.is_latest(request) {
            return;
        }
        let loaded = self.surface.load(&template.file_url).await;
        if !self.document_requests.is_latest(request) {
            debug!(template_id = %template.id, "Dropping superseded document load");
            return;
        }
        match loaded {
            Ok(num_pages) => {
                self.document_generation
                    .set(self.document_generation.get().wrapping_add(1));
                self.editor.borrow_mut().document_loaded(num_pages);
                info!(template_id = %template.id, num_pages, "Document loaded");
                self.refresh();
                self.render_current_page().await;
            }
            Err(e) => {
                let message = js_error_message(&e);
                error!(template_id = %template.id, error = %message, "Failed to load document");
                self.toasts
                    .notify(Notice::error("Error loading document", message));
            }
        }
    }

    /// Render the current page, then keep going until the rendered page
    /// matches the current one. Only one render loop runs at a time.
    async fn render_current_page(&self) {
        if self.rendering.replace(true) {
            return;
        }
        let mut rendered = None;
        loop {
            let target = (self.document_generation.get(), self.editor.borrow().current_page());
            if rendered == Some(target) || !self.surface.is_loaded() {
                break;
            }
            if let Err(e) = self
                .surface
                .render_page(target.1, &self.canvas, self.render_scale)
                .await
            {
                warn!(page = target.1, error = %js_error_message(&e), "Failed to render page");
                break;
            }
            rendered = Some(target);
        }
        self.rendering.set(false);
    }

    fn turn_page(self: &Rc<Self>, forward: bool) -> bool {
        let moved = {
            let mut editor = self.editor.borrow_mut();
            if forward {
                editor.next_page()
            } else {
                editor.previous_page()
            }
        };
        if moved {
            self.refresh();
            let view = Rc::clone(self);
            spawn_local(async move { view.render_current_page().await });
        }
        moved
    }

    // ---- Save -------------------------------------------------------------

    async fn save(&self) -> Result<JsValue, JsValue> {
        self.toolbar.save.set_disabled(true);
        let result = save_fields(&self.editor, &self.store, &self.toasts).await;
        self.refresh();
        match result {
            Ok(report) => Ok(JsValue::from(report.inserted as u32)),
            Err(e) => {
                debug!(error = %e, "Save did not complete");
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    }

    // ---- DOM events -------------------------------------------------------

    fn on_overlay_click(&self, event: &MouseEvent) {
        let hit = match self.overlay.hit_test(event) {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %js_error_message(&e), "Overlay hit test failed");
                return;
            }
        };
        let result = {
            let mut editor = self.editor.borrow_mut();
            match hit {
                OverlayHit::Field(id) => editor.click_field(&id),
                OverlayHit::Surface(point) => editor.click_surface(point).map(|_| ()),
            }
        };
        if let Err(e) = result {
            debug!(error = %e, "Overlay click ignored");
        }
        self.refresh();
    }

    fn on_inspector_input(&self, attribute: FieldAttribute, raw: &str) {
        let result = self
            .editor
            .borrow_mut()
            .edit_selected_raw(attribute, raw)
            .map(|_| ());
        match result {
            Ok(()) => self.redraw_overlay(),
            Err(e) => debug!(attribute = attribute.as_str(), error = %e, "Inspector edit rejected"),
        }
    }

    fn on_delete(&self) {
        let result = self.editor.borrow_mut().delete_selected();
        if let Err(e) = result {
            debug!(error = %e, "Nothing to delete");
        }
        self.refresh();
    }
}

fn listen(
    target: &EventTarget,
    event_name: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn attach_listeners(view: &Rc<EditorView>) -> Result<(), JsValue> {
    let weak = Rc::downgrade(view);
    listen(view.overlay.element(), "click", move |event| {
        if let (Some(view), Some(event)) = (weak.upgrade(), event.dyn_ref::<MouseEvent>()) {
            view.on_overlay_click(event);
        }
    })?;

    for (attribute, control) in view.inspector.controls() {
        let weak = Rc::downgrade(view);
        let attribute = *attribute;
        let source = control.clone();
        listen(control.element(), control.event_name(), move |_| {
            if let Some(view) = weak.upgrade() {
                view.on_inspector_input(attribute, &source.value());
            }
        })?;
    }

    let weak = Rc::downgrade(view);
    listen(view.inspector.delete_button(), "click", move |_| {
        if let Some(view) = weak.upgrade() {
            view.on_delete();
        }
    })?;

    listen_page_turn(view, &view.toolbar.previous, false)?;
    listen_page_turn(view, &view.toolbar.next, true)?;

    let weak = Rc::downgrade(view);
    listen(&view.toolbar.save, "click", move |_| {
        if let Some(view) = weak.upgrade() {
            spawn_local(async move {
                let _ = view.save().await;
            });
        }
    })?;

    Ok(())
}

fn listen_page_turn(
    view: &Rc<EditorView>,
    button: &HtmlButtonElement,
    forward: bool,
) -> Result<(), JsValue> {
    let weak: Weak<EditorView> = Rc::downgrade(view);
    listen(button, "click", move |_| {
        if let Some(view) = weak.upgrade() {
            view.turn_page(forward);
        }
    })
}

/// Field placement editor mounted into a host element
///
/// ```javascript
/// const editor = new TemplateFieldEditor(container, {
///   store: { url: "https://db.example", api_key: "anon" },
/// });
/// await editor.setTemplate("tpl-1", "https://files/tpl-1.pdf");
/// await editor.save();
/// ```
#[wasm_bindgen]
pub struct TemplateFieldEditor {
    inner: Rc<EditorView>,
}

#[wasm_bindgen]
impl TemplateFieldEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, config: JsValue) -> Result<TemplateFieldEditor, JsValue> {
        let config: EditorConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid editor configuration: {}", e)))?;
        config
            .validate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        logging::init(&config.log_filter);

        let inner = EditorView::build(&container, config)?;
        attach_listeners(&inner)?;
        inner.refresh();
        info!("Template field editor ready");

        Ok(Self { inner })
    }

    /// Switch to a template: load its stored fields and its document.
    /// Resolves to the number of loaded fields, or `undefined` when a newer
    /// template was selected first.
    #[wasm_bindgen(js_name = setTemplate)]
    pub fn set_template(&self, template_id: String, file_url: String) -> js_sys::Promise {
        let view = Rc::clone(&self.inner);
        future_to_promise(async move {
            view.select_template(Template::new(template_id, file_url))
                .await
        })
    }

    /// Replace the template's stored fields with the in-memory ones.
    /// Resolves to the number of inserted rows.
    pub fn save(&self) -> js_sys::Promise {
        let view = Rc::clone(&self.inner);
        future_to_promise(async move { view.save().await })
    }

    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&self) -> bool {
        self.inner.turn_page(true)
    }

    #[wasm_bindgen(js_name = previousPage)]
    pub fn previous_page(&self) -> bool {
        self.inner.turn_page(false)
    }

    #[wasm_bindgen(js_name = currentPage)]
    pub fn current_page(&self) -> u32 {
        self.inner.editor.borrow().current_page()
    }

    /// Page count of the loaded document (0 before it is parsed)
    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> u32 {
        self.inner.editor.borrow().pager().num_pages().unwrap_or(0)
    }

    #[wasm_bindgen(js_name = selectedFieldId)]
    pub fn selected_field_id(&self) -> Option<String> {
        self.inner
            .editor
            .borrow()
            .inspector()
            .selected()
            .map(str::to_string)
    }

    /// The in-memory fields as plain JS objects
    pub fn fields(&self) -> Result<JsValue, JsValue> {
        let editor = self.inner.editor.borrow();
        serde_wasm_bindgen::to_value(editor.fields().as_slice())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// The in-memory fields as a JSON string
    #[wasm_bindgen(js_name = fieldsJson)]
    pub fn fields_json(&self) -> Result<String, JsValue> {
        let editor = self.inner.editor.borrow();
        serde_json::to_string(editor.fields().as_slice())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    #[wasm_bindgen(js_name = isSaving)]
    pub fn is_saving(&self) -> bool {
        self.inner.editor.borrow().is_saving()
    }
}


#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount() -> TemplateFieldEditor {
        let document = web_sys::window().unwrap().document().unwrap();
        let container = dom::create(&document, "div", "host").unwrap();
        document.body().unwrap().append_child(&container).unwrap();
        let config =
            js_sys::JSON::parse(r#"{"store":{"url":"https://db.invalid","api_key":"anon"}}"#)
                .unwrap();
        TemplateFieldEditor::new(container, config).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_mount_builds_disabled_toolbar() {
        let editor = mount();
        let toolbar = &editor.inner.toolbar;
        assert!(toolbar.previous.disabled());
        assert!(toolbar.next.disabled());
        assert!(toolbar.save.disabled());
        assert_eq!(toolbar.label.text_content().unwrap(), "Page 1");
        assert_eq!(editor.page_count(), 0);
        assert_eq!(editor.selected_field_id(), None);
    }

    #[wasm_bindgen_test]
    fn test_rejects_config_without_store_url() {
        let document = web_sys::window().unwrap().document().unwrap();
        let container = dom::create(&document, "div", "host").unwrap();
        let config = js_sys::JSON::parse(r#"{"store":{"url":""}}"#).unwrap();
        assert!(TemplateFieldEditor::new(container, config).is_err());
    }

    #[wasm_bindgen_test]
    fn test_surface_click_creates_and_selects_field() {
        let editor = mount();
        {
            let mut state = editor.inner.editor.borrow_mut();
            let ticket = state.set_template(Template::new("tpl", "https://files/tpl.pdf"));
            state.finish_load(&ticket, Ok(Vec::new())).unwrap();
            state.document_loaded(1);
        }
        editor.inner.refresh();

        let event = MouseEvent::new("click").unwrap();
        editor.inner.on_overlay_click(&event);

        let selected = editor.selected_field_id();
        assert!(selected.is_some());
        assert_eq!(editor.inner.overlay.element().child_element_count(), 1);
        assert!(!editor.inner.toolbar.save.disabled());

        editor.inner.on_inspector_input(FieldAttribute::Name, "Signature");
        assert_eq!(
            editor.inner.editor.borrow().selected_field().unwrap().name,
            "Signature"
        );

        editor.inner.on_delete();
        assert_eq!(editor.selected_field_id(), None);
        assert_eq!(editor.inner.overlay.element().child_element_count(), 0);
    }

    #[wasm_bindgen_test]
    fn test_field_click_selects_without_creating() {
        use crate::overlay::FIELD_ID_ATTR;
        use template_fields_core::SurfacePoint;

        let editor = mount();
        let (first, second) = {
            let mut state = editor.inner.editor.borrow_mut();
            let ticket = state.set_template(Template::new("tpl", "https://files/tpl.pdf"));
            state.finish_load(&ticket, Ok(Vec::new())).unwrap();
            state.document_loaded(1);
            let first = state.click_surface(SurfacePoint::new(10.0, 10.0)).unwrap().id.clone();
            let second = state.click_surface(SurfacePoint::new(200.0, 200.0)).unwrap().id.clone();
            (first, second)
        };
        editor.inner.refresh();
        assert_eq!(editor.selected_field_id(), Some(second));

        let region: HtmlElement = editor
            .inner
            .overlay
            .element()
            .query_selector(&format!("[{}=\"{}\"]", FIELD_ID_ATTR, first))
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap();
        // dispatched through the overlay's click listener
        region.click();

        assert_eq!(editor.inner.editor.borrow().fields().len(), 2);
        assert_eq!(editor.selected_field_id(), Some(first));
        assert_eq!(editor.inner.overlay.element().child_element_count(), 2);
    }
}
