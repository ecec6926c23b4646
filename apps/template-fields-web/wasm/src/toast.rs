//! DOM toast notifications

use template_fields_core::{Notice, Notifier};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::dom;

/// Shows notices as toasts stacked in a container element
pub struct ToastNotifier {
    document: Document,
    container: HtmlElement,
    duration_ms: u32,
}

impl ToastNotifier {
    pub fn new(document: Document, container: HtmlElement, duration_ms: u32) -> Self {
        Self {
            document,
            container,
            duration_ms,
        }
    }

    fn show(&self, notice: &Notice) -> Result<(), JsValue> {
        let toast = dom::create(&self.document, "div", &toast_class(notice))?;
        toast.set_attribute("role", "status")?;

        let title = dom::create(&self.document, "strong", "tf-toast-title")?;
        title.set_text_content(Some(&notice.title));
        let message = dom::create(&self.document, "span", "tf-toast-message")?;
        message.set_text_content(Some(&notice.message));

        toast.append_child(&title)?;
        toast.append_child(&message)?;
        self.container.append_child(&toast)?;

        let window = web_sys::window().ok_or("No window")?;
        let dismiss = Closure::once_into_js(move || toast.remove());
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            dismiss.unchecked_ref(),
            self.duration_ms as i32,
        )?;
        Ok(())
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notice: Notice) {
        if let Err(e) = self.show(&notice) {
            warn!(error = ?e, message = %notice.message, "Failed to show toast");
        }
    }
}

fn toast_class(notice: &Notice) -> String {
    format!("tf-toast tf-toast-{}", notice.level.as_str())
}
