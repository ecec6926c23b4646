//! Field store backed by a PostgREST endpoint (e.g. Supabase)

use async_trait::async_trait;
use template_fields_core::{
    FieldStore, NewField, RemoteError, RemoteOperation, StoreConfig, StoredField,
};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

#[derive(Debug, Clone)]
pub struct RestFieldStore {
    base_url: String,
    api_key: String,
    table: String,
}

impl RestFieldStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            table: config.table.clone(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn scoped_url(&self, template_id: &str) -> String {
        let encoded: String = js_sys::encode_uri_component(template_id).into();
        format!("{}?template_id=eq.{}", self.table_url(), encoded)
    }

    /// Send one request and return the response body text
    async fn send(
        &self,
        operation: RemoteOperation,
        method: &str,
        url: &str,
        body: Option<String>,
    ) -> Result<String, RemoteError> {
        self.fetch(method, url, body)
            .await
            .map_err(|e| RemoteError::new(operation, js_error_message(&e)))?
            .map_err(|message| RemoteError::new(operation, message))
    }

    /// Outer error: the request could not be made. Inner error: the store
    /// answered with a failure status.
    async fn fetch(
        &self,
        method: &str,
        url: &str,
        body: Option<String>,
    ) -> Result<Result<String, String>, JsValue> {
        let window = web_sys::window().ok_or("No window")?;

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = &body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(url, &opts)?;
        let headers = request.headers();
        headers.set("apikey", &self.api_key)?;
        headers.set("Authorization", &format!("Bearer {}", self.api_key))?;
        if body.is_some() {
            headers.set("Content-Type", "application/json")?;
            headers.set("Prefer", "return=minimal")?;
        }

        let response = JsFuture::from(window.fetch_with_request(&request)).await?;
        let response: Response = response.dyn_into()?;
        let text = JsFuture::from(response.text()?)
            .await?
            .as_string()
            .unwrap_or_default();

        if response.ok() {
            Ok(Ok(text))
        } else {
            Ok(Err(error_message(
                response.status(),
                &response.status_text(),
                &text,
            )))
        }
    }
}

#[async_trait(?Send)]
impl FieldStore for RestFieldStore {
    async fn select_fields(&self, template_id: &str) -> Result<Vec<StoredField>, RemoteError> {
        let url = format!("{}&select=*&order=page.asc", self.scoped_url(template_id));
        let body = self
            .send(RemoteOperation::LoadFields, "GET", &url, None)
            .await?;
        serde_json::from_str(&body).map_err(|e| {
            RemoteError::new(
                RemoteOperation::LoadFields,
                format!("Unexpected field rows: {}", e),
            )
        })
    }

    async fn delete_fields(&self, template_id: &str) -> Result<(), RemoteError> {
        let url = self.scoped_url(template_id);
        self.send(RemoteOperation::DeleteFields, "DELETE", &url, None)
            .await?;
        debug!(template_id, "Store delete acknowledged");
        Ok(())
    }

    async fn insert_fields(&self, rows: &[NewField]) -> Result<(), RemoteError> {
        let body = serde_json::to_string(rows).map_err(|e| {
            RemoteError::new(RemoteOperation::InsertFields, e.to_string())
        })?;
        self.send(
            RemoteOperation::InsertFields,
            "POST",
            &self.table_url(),
            Some(body),
        )
        .await?;
        debug!(count = rows.len(), "Store insert acknowledged");
        Ok(())
    }
}

/// Message for a failed response: PostgREST's `message` field when the body
/// is a PostgREST error, otherwise the raw body, otherwise the status line
pub fn error_message(status: u16, status_text: &str, body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    if let Some(message) = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str())
    {
        return message.to_string();
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    format!("HTTP {} {}", status, status_text).trim_end().to_string()
}

/// Best-effort text for a thrown JS value
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_postgrest_message() {
        let body = r#"{"code":"42501","details":null,"hint":null,"message":"permission denied for table fields"}"#;
        assert_eq!(
            error_message(403, "Forbidden", body),
            "permission denied for table fields"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message(502, "Bad Gateway", "upstream down\n"), "upstream down");
    }

    #[test]
    fn test_error_message_falls_back_to_status_line() {
        assert_eq!(error_message(500, "Internal Server Error", ""), "HTTP 500 Internal Server Error");
        assert_eq!(error_message(500, "", ""), "HTTP 500");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let store = RestFieldStore::new(&StoreConfig {
            url: "https://db.example/".to_string(),
            api_key: "anon".to_string(),
            table: "fields".to_string(),
        });
        assert_eq!(store.table_url(), "https://db.example/rest/v1/fields");
    }
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn store() -> RestFieldStore {
        RestFieldStore::new(&StoreConfig {
            url: "https://db.example".to_string(),
            api_key: "anon".to_string(),
            table: "fields".to_string(),
        })
    }

    #[wasm_bindgen_test]
    fn test_scoped_url_encodes_template_id() {
        assert_eq!(
            store().scoped_url("a b&c"),
            "https://db.example/rest/v1/fields?template_id=eq.a%20b%26c"
        );
    }

    #[wasm_bindgen_test]
    fn test_js_error_message_from_error() {
        let err: JsValue = js_sys::Error::new("Failed to fetch").into();
        assert_eq!(js_error_message(&err), "Failed to fetch");
        assert_eq!(js_error_message(&JsValue::from_str("plain")), "plain");
    }
}
