//! Field overlay layer
//!
//! An absolutely positioned layer over the rendered page canvas. It draws one
//! region per field of the current page and resolves clicks either to an
//! existing field or to a point on the document surface.

use template_fields_core::{Field, FieldEditor, FieldKind, SurfacePoint};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use crate::dom;

/// Attribute carrying a region's field id
pub const FIELD_ID_ATTR: &str = "data-field-id";

/// What a click on the overlay landed on
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayHit {
    Field(String),
    Surface(SurfacePoint),
}

pub struct OverlayLayer {
    document: Document,
    element: HtmlElement,
}

impl OverlayLayer {
    /// Create the overlay element; the caller places it over the canvas
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let element = dom::create(document, "div", "tf-overlay")?;
        dom::set_styles(
            &element,
            &[
                ("position", "absolute".to_string()),
                ("top", "0".to_string()),
                ("left", "0".to_string()),
                ("width", "100%".to_string()),
                ("height", "100%".to_string()),
                ("cursor", "crosshair".to_string()),
            ],
        )?;
        Ok(Self {
            document: document.clone(),
            element,
        })
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    /// Redraw the regions of the editor's current page
    pub fn render(&self, editor: &FieldEditor) -> Result<(), JsValue> {
        self.element.set_inner_html("");
        let selected = editor.inspector().selected();

        for field in editor.visible_fields() {
            let is_selected = selected == Some(field.id.as_str());
            let region = dom::create(&self.document, "div", &region_class(field, is_selected))?;
            region.set_attribute(FIELD_ID_ATTR, &field.id)?;
            region.set_attribute("title", &field.name)?;
            region.set_text_content(Some(&field.name));
            dom::set_styles(&region, &region_style(field, is_selected))?;
            self.element.append_child(&region)?;
        }
        Ok(())
    }

    /// Resolve a click to a field region or a surface-relative point
    pub fn hit_test(&self, event: &MouseEvent) -> Result<OverlayHit, JsValue> {
        let target = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok());
        if let Some(target) = target {
            let region = target.closest(&format!("[{}]", FIELD_ID_ATTR))?;
            if let Some(id) = region.and_then(|r| r.get_attribute(FIELD_ID_ATTR)) {
                return Ok(OverlayHit::Field(id));
            }
        }

        let rect = self.element.get_bounding_client_rect();
        Ok(OverlayHit::Surface(SurfacePoint::from_client(
            f64::from(event.client_x()),
            f64::from(event.client_y()),
            rect.left(),
            rect.top(),
        )))
    }
}

fn region_class(field: &Field, selected: bool) -> String {
    let mut class = String::from("tf-field");
    if field.kind == FieldKind::Prefilled {
        class.push_str(" tf-field-prefilled");
    }
    if selected {
        class.push_str(" selected");
    }
    class
}

fn region_style(field: &Field, selected: bool) -> Vec<(&'static str, String)> {
    let border = if selected {
        "2px solid #2563eb"
    } else {
        "1px dashed #f59e0b"
    };
    vec![
        ("position", "absolute".to_string()),
        ("left", dom::px(field.x)),
        ("top", dom::px(field.y)),
        ("width", dom::px(field.width)),
        ("height", dom::px(field.height)),
        ("box-sizing", "border-box".to_string()),
        ("border", border.to_string()),
        ("overflow", "hidden".to_string()),
        ("cursor", "pointer".to_string()),
    ]
}
