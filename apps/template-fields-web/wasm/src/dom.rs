//! Small DOM construction helpers

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

/// Create an element of `tag` with the given class attribute
pub fn create(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("<{}> is not an HTML element", tag)))
}

/// Create an element and cast it to a concrete element type
pub fn create_as<T: JsCast>(document: &Document, tag: &str, class: &str) -> Result<T, JsValue> {
    create(document, tag, class)?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("<{}> has an unexpected element type", tag)))
}

pub fn set_styles(element: &HtmlElement, styles: &[(&str, String)]) -> Result<(), JsValue> {
    let style = element.style();
    for (property, value) in styles {
        style.set_property(property, value)?;
    }
    Ok(())
}

pub fn px(value: f64) -> String {
    format!("{}px", value)
}
