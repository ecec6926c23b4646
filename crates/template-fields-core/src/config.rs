//! Editor configuration
//!
//! The host page hands the editor one JSON object. Every section except the
//! store URL has defaults, so `{"store": {"url": "..."}}` is a complete config.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Remote field store
    pub store: StoreConfig,
    /// Values given to newly created fields
    #[serde(default)]
    pub fields: FieldDefaults,
    /// Scale the document page is rendered at (default: 1.5)
    #[serde(default = "default_render_scale")]
    pub render_scale: f64,
    /// How long a notice stays on screen (default: 4000ms)
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u32,
    /// `tracing` filter directive (default: "template_fields=info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl EditorConfig {
    /// Parse configuration from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails
    /// [`EditorConfig::validate`]
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(s).context("Failed to parse editor configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.url.trim().is_empty() {
            return Err(ConfigError::Missing("store.url"));
        }
        if self.store.table.trim().is_empty() {
            return Err(ConfigError::Missing("store.table"));
        }
        if !(self.render_scale.is_finite() && self.render_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "render_scale must be positive, got {}",
                self.render_scale
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store, e.g. `https://project.supabase.co`
    #[serde(default)]
    pub url: String,
    /// Key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: String,
    /// Table holding field rows (default: "fields")
    #[serde(default = "default_table")]
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefaults {
    #[serde(default = "default_field_name")]
    pub default_name: String,
    #[serde(default = "default_field_width")]
    pub default_width: f64,
    #[serde(default = "default_field_height")]
    pub default_height: f64,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            default_name: default_field_name(),
            default_width: default_field_width(),
            default_height: default_field_height(),
        }
    }
}

fn default_render_scale() -> f64 {
    1.5
}

fn default_toast_duration_ms() -> u32 {
    4000
}

fn default_log_filter() -> String {
    "template_fields=info".to_string()
}

fn default_table() -> String {
    "fields".to_string()
}

fn default_field_name() -> String {
    "New Field".to_string()
}

fn default_field_width() -> f64 {
    100.0
}

fn default_field_height() -> f64 {
    20.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_config_fills_defaults() {
        let config = EditorConfig::from_json(r#"{"store": {"url": "https://db.example"}}"#).unwrap();
        assert_eq!(
            config,
            EditorConfig {
                store: StoreConfig {
                    url: "https://db.example".to_string(),
                    api_key: String::new(),
                    table: "fields".to_string(),
                },
                fields: FieldDefaults::default(),
                render_scale: 1.5,
                toast_duration_ms: 4000,
                log_filter: "template_fields=info".to_string(),
            }
        );
    }

    #[test]
    fn test_field_defaults() {
        let defaults = FieldDefaults::default();
        assert_eq!(defaults.default_name, "New Field");
        assert_eq!(defaults.default_width, 100.0);
        assert_eq!(defaults.default_height, 20.0);
    }

    #[test]
    fn test_overrides() {
        let json = r#"{
            "store": {"url": "https://db.example", "api_key": "anon", "table": "template_fields"},
            "fields": {"default_name": "Field"},
            "render_scale": 2.0
        }"#;
        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.store.table, "template_fields");
        assert_eq!(config.store.api_key, "anon");
        assert_eq!(config.fields.default_name, "Field");
        assert_eq!(config.fields.default_width, 100.0);
        assert_eq!(config.render_scale, 2.0);
    }

    #[test]
    fn test_missing_store_url_is_rejected() {
        let err = EditorConfig::from_json(r#"{"store": {}}"#).unwrap_err();
        assert!(err.to_string().contains("store.url"), "{err}");
    }

    #[test]
    fn test_missing_store_section_is_rejected() {
        let err = EditorConfig::from_json("{}").unwrap_err();
        assert!(err.to_string().contains("Failed to parse"), "{err}");
    }

    #[test]
    fn test_non_positive_scale_is_rejected() {
        let json = r#"{"store": {"url": "https://db.example"}, "render_scale": 0}"#;
        assert!(EditorConfig::from_json(json).is_err());
    }
}
