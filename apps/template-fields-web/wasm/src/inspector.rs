//! Inspector form bound to the selected field

use template_fields_core::{Field, FieldAttribute, FieldKind};
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlSelectElement};

use crate::dom;

/// One attribute's input element
#[derive(Clone)]
pub enum Control {
    Input(HtmlInputElement),
    Select(HtmlSelectElement),
}

impl Control {
    pub fn value(&self) -> String {
        match self {
            Control::Input(input) => input.value(),
            Control::Select(select) => select.value(),
        }
    }

    fn set_value(&self, value: &str) {
        match self {
            Control::Input(input) => input.set_value(value),
            Control::Select(select) => select.set_value(value),
        }
    }

    /// The element events are attached to
    pub fn element(&self) -> &HtmlElement {
        match self {
            Control::Input(input) => input,
            Control::Select(select) => select,
        }
    }

    /// DOM event that fires on every change of this control
    pub fn event_name(&self) -> &'static str {
        match self {
            Control::Input(_) => "input",
            Control::Select(_) => "change",
        }
    }
}

pub struct InspectorForm {
    root: HtmlElement,
    controls: Vec<(FieldAttribute, Control)>,
    delete_button: HtmlButtonElement,
}

impl InspectorForm {
    /// Build the (hidden) form; listeners are attached by the caller
    pub fn build(document: &Document) -> Result<Self, JsValue> {
        let root = dom::create(document, "div", "tf-inspector")?;
        let mut controls = Vec::with_capacity(FieldAttribute::ALL.len());

        for attribute in FieldAttribute::ALL {
            let row = dom::create(document, "label", "tf-inspector-row")?;
            let caption = dom::create(document, "span", "tf-inspector-label")?;
            caption.set_text_content(Some(attribute.label()));
            row.append_child(&caption)?;

            let control = build_control(document, attribute)?;
            control.element().set_attribute("name", attribute.as_str())?;
            row.append_child(control.element())?;
            root.append_child(&row)?;
            controls.push((attribute, control));
        }

        let delete_button: HtmlButtonElement =
            dom::create_as(document, "button", "tf-inspector-delete")?;
        delete_button.set_type("button");
        delete_button.set_text_content(Some("Delete field"));
        root.append_child(&delete_button)?;

        let form = Self {
            root,
            controls,
            delete_button,
        };
        form.hide()?;
        Ok(form)
    }

    pub fn element(&self) -> &HtmlElement {
        &self.root
    }

    pub fn controls(&self) -> &[(FieldAttribute, Control)] {
        &self.controls
    }

    pub fn delete_button(&self) -> &HtmlButtonElement {
        &self.delete_button
    }

    /// Fill every control from `field` and open the form
    pub fn show(&self, field: &Field) -> Result<(), JsValue> {
        for (attribute, control) in &self.controls {
            control.set_value(&attribute.read(field));
        }
        self.root.style().set_property("display", "block")
    }

    pub fn hide(&self) -> Result<(), JsValue> {
        self.root.style().set_property("display", "none")
    }
}

fn build_control(document: &Document, attribute: FieldAttribute) -> Result<Control, JsValue> {
    if attribute == FieldAttribute::Kind {
        let select: HtmlSelectElement = dom::create_as(document, "select", "tf-inspector-input")?;
        for kind in [FieldKind::Editable, FieldKind::Prefilled] {
            let option = dom::create(document, "option", "")?;
            option.set_attribute("value", kind.as_str())?;
            option.set_text_content(Some(kind_label(kind)));
            select.append_child(&option)?;
        }
        return Ok(Control::Select(select));
    }

    let input: HtmlInputElement = dom::create_as(document, "input", "tf-inspector-input")?;
    input.set_type(input_type(attribute));
    if attribute == FieldAttribute::Page {
        input.set_min("1");
        input.set_step("1");
    }
    Ok(Control::Input(input))
}

fn input_type(attribute: FieldAttribute) -> &'static str {
    if attribute.is_numeric() {
        "number"
    } else {
        "text"
    }
}

fn kind_label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Editable => "Editable",
        FieldKind::Prefilled => "Prefilled",
    }
}


#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use template_fields_core::{FieldDefaults, SurfacePoint};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_show_fills_controls() {
        let document = web_sys::window().unwrap().document().unwrap();
        let form = InspectorForm::build(&document).unwrap();
        let field = Field::at_point(
            "tpl",
            SurfacePoint::new(40.0, 60.0),
            2,
            &FieldDefaults::default(),
        );

        form.show(&field).unwrap();

        let value = |attr: FieldAttribute| {
            form.controls()
                .iter()
                .find(|(a, _)| *a == attr)
                .map(|(_, c)| c.value())
                .unwrap()
        };
        assert_eq!(value(FieldAttribute::Name), "New Field");
        assert_eq!(value(FieldAttribute::Kind), "editable");
        assert_eq!(value(FieldAttribute::X), "40");
        assert_eq!(value(FieldAttribute::Page), "2");
        assert_eq!(form.element().style().get_property_value("display").unwrap(), "block");
    }

    #[wasm_bindgen_test]
    fn test_built_hidden() {
        let document = web_sys::window().unwrap().document().unwrap();
        let form = InspectorForm::build(&document).unwrap();
        assert_eq!(form.element().style().get_property_value("display").unwrap(), "none");
        assert_eq!(form.controls().len(), FieldAttribute::ALL.len());
    }
}
