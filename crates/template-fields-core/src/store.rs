//! The remote field store seam and its row types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use uuid::Uuid;

use crate::error::RemoteError;
use crate::field::{Field, FieldKind};

/// A field row as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredField {
    pub id: String,
    pub template_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub page: u32,
}

impl From<StoredField> for Field {
    fn from(row: StoredField) -> Self {
        Field {
            id: row.id,
            template_id: row.template_id,
            name: row.name,
            kind: row.kind,
            x: row.x,
            y: row.y,
            width: row.width,
            height: row.height,
            page: row.page,
        }
    }
}

/// A field row to insert; the store assigns the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewField {
    pub template_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub page: u32,
}

impl NewField {
    /// Row for `field` keyed to `template_id`, dropping the client-side id
    pub fn from_field(field: &Field, template_id: &str) -> Self {
        Self {
            template_id: template_id.to_string(),
            name: field.name.clone(),
            kind: field.kind,
            x: field.x,
            y: field.y,
            width: field.width,
            height: field.height,
            page: field.page,
        }
    }
}

/// Field collection storage scoped by template id.
///
/// Futures are not `Send`: the browser implementation holds JS values
/// across awaits.
#[async_trait(?Send)]
pub trait FieldStore {
    /// `select fields where template_id = T`
    async fn select_fields(&self, template_id: &str) -> Result<Vec<StoredField>, RemoteError>;

    /// `delete fields where template_id = T`
    async fn delete_fields(&self, template_id: &str) -> Result<(), RemoteError>;

    /// `insert fields`, each row carrying its template id
    async fn insert_fields(&self, rows: &[NewField]) -> Result<(), RemoteError>;
}

/// Store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryFieldStore {
    rows: RefCell<Vec<StoredField>>,
}

impl MemoryFieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<StoredField>) -> Self {
        Self {
            rows: RefCell::new(rows),
        }
    }

    /// Snapshot of every stored row
    pub fn rows(&self) -> Vec<StoredField> {
        self.rows.borrow().clone()
    }

    pub fn count_for(&self, template_id: &str) -> usize {
        self.rows
            .borrow()
            .iter()
            .filter(|r| r.template_id == template_id)
            .count()
    }
}

#[async_trait(?Send)]
impl FieldStore for MemoryFieldStore {
    async fn select_fields(&self, template_id: &str) -> Result<Vec<StoredField>, RemoteError> {
        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|r| r.template_id == template_id)
            .cloned()
            .collect())
    }

    async fn delete_fields(&self, template_id: &str) -> Result<(), RemoteError> {
        self.rows
            .borrow_mut()
            .retain(|r| r.template_id != template_id);
        Ok(())
    }

    async fn insert_fields(&self, rows: &[NewField]) -> Result<(), RemoteError> {
        let mut stored = self.rows.borrow_mut();
        for row in rows {
            stored.push(StoredField {
                id: Uuid::new_v4().to_string(),
                template_id: row.template_id.clone(),
                name: row.name.clone(),
                kind: row.kind,
                x: row.x,
                y: row.y,
                width: row.width,
                height: row.height,
                page: row.page,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(template_id: &str, name: &str) -> NewField {
        NewField {
            template_id: template_id.to_string(),
            name: name.to_string(),
            kind: FieldKind::Editable,
            x: 1.0,
            y: 2.0,
            width: 100.0,
            height: 20.0,
            page: 1,
        }
    }

    #[test]
    fn test_stored_field_wire_format() {
        let json = r#"{
            "id": "f1", "template_id": "t1", "name": "Tenant", "type": "prefilled",
            "x": 40, "y": 60, "width": 100, "height": 20, "page": 2
        }"#;
        let stored: StoredField = serde_json::from_str(json).unwrap();
        let field: Field = stored.into();
        assert_eq!(field.kind, FieldKind::Prefilled);
        assert_eq!((field.x, field.y, field.page), (40.0, 60.0, 2));
    }

    #[test]
    fn test_new_field_has_no_id_column() {
        let value = serde_json::to_value(row("t1", "Tenant")).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["type"], "editable");
        assert_eq!(value["template_id"], "t1");
    }

    #[test]
    fn test_stored_field_rejects_negative_page() {
        let json = r#"{
            "id": "f1", "template_id": "t1", "name": "n", "type": "editable",
            "x": 0, "y": 0, "width": 1, "height": 1, "page": -1
        }"#;
        assert!(serde_json::from_str::<StoredField>(json).is_err());
    }

    #[tokio::test]
    async fn test_memory_store_scopes_by_template() {
        let store = MemoryFieldStore::new();
        store
            .insert_fields(&[row("t1", "a"), row("t2", "b"), row("t1", "c")])
            .await
            .unwrap();

        let t1 = store.select_fields("t1").await.unwrap();
        let names: Vec<_> = t1.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);

        store.delete_fields("t1").await.unwrap();
        assert_eq!(store.count_for("t1"), 0);
        assert_eq!(store.count_for("t2"), 1);
    }

    #[tokio::test]
    async fn test_memory_store_assigns_fresh_ids() {
        let store = MemoryFieldStore::new();
        store
            .insert_fields(&[row("t1", "a"), row("t1", "b")])
            .await
            .unwrap();
        let rows = store.rows();
        assert_ne!(rows[0].id, rows[1].id);
    }
}
